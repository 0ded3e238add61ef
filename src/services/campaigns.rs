use chrono::Utc;

use crate::client::error::BriqError;
use crate::client::response::ApiResponse;
use crate::client::{BriqClient, RequestOptions};
use crate::domain::{
    Campaign, CampaignId, CampaignListParams, CreateCampaign, Deleted, Paginated, UpdateCampaign,
};
use crate::transport::campaign::{self, CampaignJson, DeletedJson};
use crate::transport::page::paginate;

#[derive(Debug, Clone, Copy)]
/// Campaign operations, obtained from [`BriqClient::campaigns`].
pub struct Campaigns<'a> {
    client: &'a BriqClient,
}

impl<'a> Campaigns<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    /// Create a campaign with the default delivery settings.
    pub async fn create(&self, request: &CreateCampaign) -> Result<ApiResponse<Campaign>, BriqError> {
        let body = campaign::encode_create_campaign(request);
        let response: ApiResponse<CampaignJson> = self
            .client
            .post(campaign::CREATE_PATH, &body, RequestOptions::new())
            .await?;
        Ok(response.map(Campaign::from))
    }

    pub async fn list(&self, params: &CampaignListParams) -> Result<Paginated<Campaign>, BriqError> {
        let options = RequestOptions::new().query(campaign::encode_campaign_list_query(params));
        let response: ApiResponse<Vec<CampaignJson>> =
            self.client.get(campaign::LIST_PATH, options).await?;
        Ok(paginate(response, &params.pagination)?)
    }

    pub async fn get(&self, id: &CampaignId) -> Result<ApiResponse<Campaign>, BriqError> {
        let response: ApiResponse<CampaignJson> = self
            .client
            .get(&campaign::get_path(id), RequestOptions::new())
            .await
            .map_err(|err| super::not_found_as("Campaign", id.as_str(), err))?;
        Ok(response.map(Campaign::from))
    }

    /// Replace a campaign's fields. The launch date must lie in the future; this is
    /// checked before any request is sent.
    pub async fn update(
        &self,
        id: &CampaignId,
        request: &UpdateCampaign,
    ) -> Result<ApiResponse<Campaign>, BriqError> {
        request.launch_date.ensure_future(Utc::now())?;

        let body = campaign::encode_update_campaign(request);
        let response: ApiResponse<CampaignJson> = self
            .client
            .patch(&campaign::update_path(id), &body, RequestOptions::new())
            .await
            .map_err(|err| super::not_found_as("Campaign", id.as_str(), err))?;
        Ok(response.map(Campaign::from))
    }

    pub async fn delete(&self, id: &CampaignId) -> Result<ApiResponse<Deleted>, BriqError> {
        let response: ApiResponse<DeletedJson> = self
            .client
            .delete(&campaign::delete_path(id), RequestOptions::new())
            .await
            .map_err(|err| super::not_found_as("Campaign", id.as_str(), err))?;
        Ok(response.map(Deleted::from))
    }

    pub async fn exists(&self, id: &CampaignId) -> Result<bool, BriqError> {
        super::found(self.get(id).await)
    }
}
