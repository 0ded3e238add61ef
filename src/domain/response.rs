use crate::domain::value::MessageStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub workspace_id: String,
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Campaign {
    pub campaign_id: String,
    pub id: Option<String>,
    pub workspace_id: String,
    pub name: String,
    pub description: Option<String>,
    pub launch_date: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub message_id: String,
    pub recipients: Vec<String>,
    pub campaign_id: Option<String>,
    pub content: Option<String>,
    pub sender_id: Option<String>,
    /// `None` when the API reports a status this crate does not know.
    pub status: Option<MessageStatus>,
    pub timestamp: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deleted {
    pub deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// A page of items returned by a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageInfo,
}
