//! Wire layer: Briq endpoint paths, JSON field names and payload shapes.

pub(crate) mod campaign;
pub(crate) mod message;
pub(crate) mod page;
pub(crate) mod workspace;

use chrono::NaiveDate;

use crate::client::error::BriqError;
use crate::client::http::QueryParams;
use crate::domain::Pagination;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TransportError> for BriqError {
    fn from(err: TransportError) -> Self {
        // Only raised while post-processing a successful (2xx) response.
        BriqError::Server {
            message: format!("Unexpected response payload: {err}"),
            status: 200,
            details: None,
        }
    }
}

pub(crate) fn push_pagination(query: &mut QueryParams, pagination: &Pagination) {
    query
        .push_opt("page", pagination.page_number())
        .push_opt("limit", pagination.limit())
        .push_opt("offset", pagination.offset());
}

pub(crate) fn push_date(query: &mut QueryParams, key: &str, date: Option<NaiveDate>) {
    query.push_opt(key, date.map(|date| date.format("%Y-%m-%d").to_string()));
}
