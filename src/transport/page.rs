use serde::Deserialize;

use super::TransportError;
use crate::client::response::ApiResponse;
use crate::domain::{PageInfo, Paginated, Pagination};

const PAGINATION_FIELD: &str = "pagination";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfoJson {
    page: u32,
    limit: u32,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    total_pages: u64,
    #[serde(default)]
    has_next: bool,
    #[serde(default)]
    has_prev: bool,
}

impl From<PageInfoJson> for PageInfo {
    fn from(value: PageInfoJson) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            total: value.total,
            total_pages: value.total_pages,
            has_next: value.has_next,
            has_prev: value.has_prev,
        }
    }
}

/// Build a page from a list response.
///
/// The API's own `pagination` object wins when present. Otherwise the page info is
/// derived from the request: a single page holding every returned item.
pub(crate) fn paginate<W, T>(
    response: ApiResponse<Vec<W>>,
    requested: &Pagination,
) -> Result<Paginated<T>, TransportError>
where
    T: From<W>,
{
    let ApiResponse {
        success,
        data,
        mut extra,
        ..
    } = response;
    let data: Vec<T> = data.unwrap_or_default().into_iter().map(T::from).collect();

    let pagination = match extra.remove(PAGINATION_FIELD) {
        Some(value) if !value.is_null() => {
            serde_json::from_value::<PageInfoJson>(value)?.into()
        }
        _ => synthesize(data.len(), requested),
    };

    Ok(Paginated {
        success,
        data,
        pagination,
    })
}

fn synthesize(len: usize, requested: &Pagination) -> PageInfo {
    let page = requested.page_number().unwrap_or(Pagination::DEFAULT_PAGE);
    let limit = requested.limit().unwrap_or(Pagination::DEFAULT_LIMIT);
    let total = len as u64;
    PageInfo {
        page,
        limit,
        total,
        total_pages: total.div_ceil(u64::from(limit)),
        has_next: false,
        has_prev: page > 1,
    }
}
