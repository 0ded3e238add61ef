use serde::{Deserialize, Serialize};

use crate::client::http::QueryParams;
use crate::domain::{
    CreateWorkspace, SearchTerm, UpdateWorkspace, Workspace, WorkspaceId, WorkspaceListParams,
};

pub(crate) const CREATE_PATH: &str = "workspace/create/";
pub(crate) const LIST_PATH: &str = "workspace/all/";

pub(crate) fn get_path(id: &WorkspaceId) -> String {
    format!("workspace/{}", id.as_str())
}

pub(crate) fn update_path(id: &WorkspaceId) -> String {
    format!("workspace/update/{}", id.as_str())
}

#[derive(Debug, Serialize)]
pub(crate) struct WorkspaceBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

pub(crate) fn encode_create_workspace(request: &CreateWorkspace) -> WorkspaceBody<'_> {
    WorkspaceBody {
        name: Some(request.name.as_str()),
        description: request.description.as_ref().map(|d| d.as_str()),
    }
}

pub(crate) fn encode_update_workspace(request: &UpdateWorkspace) -> WorkspaceBody<'_> {
    WorkspaceBody {
        name: request.name().map(|name| name.as_str()),
        description: request.description().map(|d| d.as_str()),
    }
}

pub(crate) fn encode_workspace_list_query(params: &WorkspaceListParams) -> QueryParams {
    let mut query = QueryParams::new();
    super::push_pagination(&mut query, &params.pagination);
    query.push_opt("search", params.search.as_ref().map(SearchTerm::as_str));
    query
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WorkspaceJson {
    #[serde(default)]
    workspace_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<WorkspaceJson> for Workspace {
    fn from(value: WorkspaceJson) -> Self {
        Self {
            workspace_id: value
                .workspace_id
                .or_else(|| value.id.clone())
                .unwrap_or_default(),
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            description: value.description,
            created_at: value.created_at,
        }
    }
}
