use serde::{Deserialize, Serialize};

use crate::client::http::QueryParams;
use crate::domain::{
    Campaign, CampaignId, CampaignListParams, CreateCampaign, Deleted, SearchTerm, UpdateCampaign,
    WorkspaceId,
};

pub(crate) const CREATE_PATH: &str = "campaign/create/";
pub(crate) const LIST_PATH: &str = "campaign/all/";

pub(crate) fn get_path(id: &CampaignId) -> String {
    format!("campaign/{}/", id.as_str())
}

pub(crate) fn update_path(id: &CampaignId) -> String {
    format!("campaign/update/{}", id.as_str())
}

pub(crate) fn delete_path(id: &CampaignId) -> String {
    format!("campaign/{}", id.as_str())
}

/// Delivery settings attached to every newly created campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CampaignSettings {
    send_rate: u32,
    retry_failures: bool,
    max_retries: u32,
    stop_on_failure: bool,
    track_clicks: bool,
    track_replies: bool,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            send_rate: 60,
            retry_failures: true,
            max_retries: 3,
            stop_on_failure: false,
            track_clicks: false,
            track_replies: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CampaignBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    workspace_id: &'a str,
    launch_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<CampaignSettings>,
}

pub(crate) fn encode_create_campaign(request: &CreateCampaign) -> CampaignBody<'_> {
    CampaignBody {
        name: request.name.as_str(),
        description: request.description.as_ref().map(|d| d.as_str()),
        workspace_id: request.workspace_id.as_str(),
        launch_date: request.launch_date.to_wire(),
        settings: Some(CampaignSettings::default()),
    }
}

pub(crate) fn encode_update_campaign(request: &UpdateCampaign) -> CampaignBody<'_> {
    CampaignBody {
        name: request.name.as_str(),
        description: request.description.as_ref().map(|d| d.as_str()),
        workspace_id: request.workspace_id.as_str(),
        launch_date: request.launch_date.to_wire(),
        settings: None,
    }
}

pub(crate) fn encode_campaign_list_query(params: &CampaignListParams) -> QueryParams {
    let mut query = QueryParams::new();
    super::push_pagination(&mut query, &params.pagination);
    query
        .push_opt("workspace_id", params.workspace_id.as_ref().map(WorkspaceId::as_str))
        .push_opt("search", params.search.as_ref().map(SearchTerm::as_str));
    super::push_date(&mut query, "from", params.from);
    super::push_date(&mut query, "to", params.to);
    query
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CampaignJson {
    #[serde(default)]
    campaign_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    workspace_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    launch_date: Option<String>,
    #[serde(default)]
    created_by: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<CampaignJson> for Campaign {
    fn from(value: CampaignJson) -> Self {
        Self {
            campaign_id: value
                .campaign_id
                .or_else(|| value.id.clone())
                .unwrap_or_default(),
            id: value.id,
            workspace_id: value.workspace_id,
            name: value.name,
            description: value.description,
            launch_date: value.launch_date,
            created_by: value.created_by,
            created_at: value.created_at,
        }
    }
}

/// Delete acknowledgement. A successful response without a `deleted` flag counts as deleted.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct DeletedJson {
    #[serde(default = "deleted_by_default")]
    deleted: bool,
}

fn deleted_by_default() -> bool {
    true
}

impl From<DeletedJson> for Deleted {
    fn from(value: DeletedJson) -> Self {
        Self {
            deleted: value.deleted,
        }
    }
}
