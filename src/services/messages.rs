use crate::client::error::BriqError;
use crate::client::response::ApiResponse;
use crate::client::{BriqClient, RequestOptions};
use crate::domain::{
    Message, MessageHistoryParams, MessageLogsParams, Paginated, SendCampaignMessage,
    SendInstantMessage,
};
use crate::transport::message::{self, MessageJson, OneOrMany};
use crate::transport::page::paginate;

/// Envelope field some history responses use instead of `data`.
const HISTORY_FIELD: &str = "history";

#[derive(Debug, Clone, Copy)]
/// Messaging operations, obtained from [`BriqClient::messages`].
pub struct Messages<'a> {
    client: &'a BriqClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a BriqClient) -> Self {
        Self { client }
    }

    /// Send `request` right away.
    ///
    /// Without a sender id on the request, the client's default sender id is used.
    /// The API answers with one message or a list; both come back as a list.
    pub async fn send_instant(
        &self,
        request: &SendInstantMessage,
    ) -> Result<ApiResponse<Vec<Message>>, BriqError> {
        let body = message::encode_send_instant(request, self.client.config().default_sender_id());
        let response: ApiResponse<OneOrMany<MessageJson>> = self
            .client
            .post(message::SEND_INSTANT_PATH, &body, RequestOptions::new())
            .await?;
        tracing::debug!(
            recipients = request.recipients().len(),
            segments = request.content().segments(),
            "instant message accepted"
        );
        Ok(response.map(into_messages))
    }

    pub async fn send_campaign(
        &self,
        request: &SendCampaignMessage,
    ) -> Result<ApiResponse<Vec<Message>>, BriqError> {
        let body = message::encode_send_campaign(request);
        let response: ApiResponse<OneOrMany<MessageJson>> = self
            .client
            .post(message::SEND_CAMPAIGN_PATH, &body, RequestOptions::new())
            .await?;
        Ok(response.map(into_messages))
    }

    pub async fn logs(&self, params: &MessageLogsParams) -> Result<Paginated<Message>, BriqError> {
        let options = RequestOptions::new().query(message::encode_logs_query(params));
        let response: ApiResponse<Vec<MessageJson>> =
            self.client.get(message::LOGS_PATH, options).await?;
        Ok(paginate(response, &params.pagination)?)
    }

    pub async fn history(
        &self,
        params: &MessageHistoryParams,
    ) -> Result<Paginated<Message>, BriqError> {
        let options = RequestOptions::new().query(message::encode_history_query(params));
        let mut response: ApiResponse<Vec<MessageJson>> =
            self.client.get(message::HISTORY_PATH, options).await?;

        if response.data.is_none() {
            if let Some(history) = response.extra.remove(HISTORY_FIELD) {
                response.data = Some(
                    serde_json::from_value(history)
                        .map_err(crate::transport::TransportError::from)?,
                );
            }
        }
        Ok(paginate(response, &params.pagination)?)
    }
}

fn into_messages(messages: OneOrMany<MessageJson>) -> Vec<Message> {
    messages.into_vec().into_iter().map(Message::from).collect()
}
