use crate::client::error::BriqError;
use crate::client::response::ApiResponse;
use crate::client::{BriqClient, RequestOptions};
use crate::domain::{
    CreateWorkspace, Paginated, UpdateWorkspace, Workspace, WorkspaceId, WorkspaceListParams,
};
use crate::transport::page::paginate;
use crate::transport::workspace::{self, WorkspaceJson};

#[derive(Debug, Clone, Copy)]
/// Workspace operations, obtained from [`BriqClient::workspaces`].
pub struct Workspaces<'a> {
    client: &'a BriqClient,
}

impl<'a> Workspaces<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreateWorkspace) -> Result<ApiResponse<Workspace>, BriqError> {
        let body = workspace::encode_create_workspace(request);
        let response: ApiResponse<WorkspaceJson> = self
            .client
            .post(workspace::CREATE_PATH, &body, RequestOptions::new())
            .await?;
        Ok(response.map(Workspace::from))
    }

    /// List workspaces. Page info is derived from `params` when the API returns a bare list.
    pub async fn list(&self, params: &WorkspaceListParams) -> Result<Paginated<Workspace>, BriqError> {
        let options = RequestOptions::new().query(workspace::encode_workspace_list_query(params));
        let response: ApiResponse<Vec<WorkspaceJson>> =
            self.client.get(workspace::LIST_PATH, options).await?;
        Ok(paginate(response, &params.pagination)?)
    }

    /// Errors with [`BriqError::NotFound`] naming the workspace when it does not exist.
    pub async fn get(&self, id: &WorkspaceId) -> Result<ApiResponse<Workspace>, BriqError> {
        let response: ApiResponse<WorkspaceJson> = self
            .client
            .get(&workspace::get_path(id), RequestOptions::new())
            .await
            .map_err(|err| super::not_found_as("Workspace", id.as_str(), err))?;
        Ok(response.map(Workspace::from))
    }

    pub async fn update(
        &self,
        id: &WorkspaceId,
        request: &UpdateWorkspace,
    ) -> Result<ApiResponse<Workspace>, BriqError> {
        let body = workspace::encode_update_workspace(request);
        let response: ApiResponse<WorkspaceJson> = self
            .client
            .patch(&workspace::update_path(id), &body, RequestOptions::new())
            .await
            .map_err(|err| super::not_found_as("Workspace", id.as_str(), err))?;
        Ok(response.map(Workspace::from))
    }

    pub async fn exists(&self, id: &WorkspaceId) -> Result<bool, BriqError> {
        super::found(self.get(id).await)
    }
}
