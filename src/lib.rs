//! Typed Rust client for the Briq SMS and campaign HTTP API.
//!
//! The crate is split the same way throughout: a domain layer of validated types, a
//! wire layer for Briq's JSON field names, a client layer that builds, sends, retries
//! and interprets requests, and thin resource services on top.
//!
//! ```rust,no_run
//! use briq::{BriqClient, MessageContent, PhoneNumber, SendInstantMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), briq::BriqError> {
//!     let client = BriqClient::builder("your_api_key_here")
//!         .default_sender_id("BRIQ")
//!         .build()?;
//!     let request = SendInstantMessage::to_one(
//!         PhoneNumber::new("+255712345678")?,
//!         MessageContent::new("Hello from Briq")?,
//!     );
//!     let _sent = client.messages().send_instant(&request).await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod services;
mod transport;

pub use client::error::{BriqError, Details, ErrorKind};
pub use client::http::{
    BoxError, BoxFuture, HttpMethod, HttpResponse, HttpTransport, OutgoingRequest, QueryParams,
    ReqwestTransport,
};
pub use client::response::ApiResponse;
pub use client::retry::{Backoff, RetryEvent, RetryObserver, RetryPolicy, backoff_delay, is_retryable};
pub use client::{BriqClient, BriqClientBuilder, ClientConfig, Request, RequestOptions};
pub use config::EnvConfig;
pub use domain::{
    ApiKey, Campaign, CampaignId, CampaignListParams, CampaignName, CreateCampaign,
    CreateWorkspace, Deleted, Description, GroupId, LaunchDate, Message, MessageContent,
    MessageHistoryParams, MessageLogsParams, MessageStatus, PageInfo, Paginated, Pagination,
    PhoneNumber, SearchTerm, SendCampaignMessage, SendInstantMessage, SenderId, UpdateCampaign,
    UpdateWorkspace, ValidationError, Workspace, WorkspaceId, WorkspaceListParams, WorkspaceName,
};
pub use services::{Campaigns, Messages, Workspaces};
