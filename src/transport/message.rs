use serde::{Deserialize, Serialize};

use crate::client::http::QueryParams;
use crate::domain::{
    CampaignId, Message, MessageHistoryParams, MessageLogsParams, MessageStatus, PhoneNumber,
    SendCampaignMessage, SendInstantMessage, SenderId, WorkspaceId,
};

pub(crate) const SEND_INSTANT_PATH: &str = "message/send-instant";
pub(crate) const SEND_CAMPAIGN_PATH: &str = "message/send-campaign";
pub(crate) const LOGS_PATH: &str = "message/logs";
pub(crate) const HISTORY_PATH: &str = "message/history";

/// Query key for the recipient filter; the API spells it in camelCase.
const PHONE_NUMBER_PARAM: &str = "phoneNumber";

#[derive(Debug, Serialize)]
pub(crate) struct SendInstantBody<'a> {
    content: &'a str,
    recipients: Vec<&'a str>,
    sender_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    campaign_id: Option<&'a str>,
}

/// `sender_id` is always present on the wire; without one the API receives an empty string.
pub(crate) fn encode_send_instant<'a>(
    request: &'a SendInstantMessage,
    default_sender: Option<&'a SenderId>,
) -> SendInstantBody<'a> {
    SendInstantBody {
        content: request.content().as_str(),
        recipients: request.recipients().iter().map(PhoneNumber::as_str).collect(),
        sender_id: request
            .sender_id()
            .or(default_sender)
            .map_or("", SenderId::as_str),
        campaign_id: request.campaign_id().map(CampaignId::as_str),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SendCampaignBody<'a> {
    campaign_id: &'a str,
    group_id: &'a str,
    content: &'a str,
    sender_id: &'a str,
}

pub(crate) fn encode_send_campaign(request: &SendCampaignMessage) -> SendCampaignBody<'_> {
    SendCampaignBody {
        campaign_id: request.campaign_id.as_str(),
        group_id: request.group_id.as_str(),
        content: request.content.as_str(),
        sender_id: request.sender_id.as_str(),
    }
}

pub(crate) fn encode_logs_query(params: &MessageLogsParams) -> QueryParams {
    let mut query = QueryParams::new();
    super::push_pagination(&mut query, &params.pagination);
    query
        .push_opt("workspace_id", params.workspace_id.as_ref().map(WorkspaceId::as_str))
        .push_opt("campaign_id", params.campaign_id.as_ref().map(CampaignId::as_str))
        .push_opt("status", params.status.map(MessageStatus::as_str));
    super::push_date(&mut query, "from", params.from);
    super::push_date(&mut query, "to", params.to);
    query.push_opt(
        PHONE_NUMBER_PARAM,
        params.phone_number.as_ref().map(PhoneNumber::as_str),
    );
    query
}

pub(crate) fn encode_history_query(params: &MessageHistoryParams) -> QueryParams {
    let mut query = QueryParams::new();
    super::push_pagination(&mut query, &params.pagination);
    query
        .push_opt("workspace_id", params.workspace_id.as_ref().map(WorkspaceId::as_str))
        .push_opt(
            PHONE_NUMBER_PARAM,
            params.phone_number.as_ref().map(PhoneNumber::as_str),
        );
    super::push_date(&mut query, "from", params.from);
    super::push_date(&mut query, "to", params.to);
    query
}

/// A field the API returns either as a single value or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(values) => values,
            Self::One(value) => vec![value],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageJson {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    recipients: OneOrMany<String>,
    #[serde(default)]
    campaign_id: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    sender_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<MessageJson> for Message {
    fn from(value: MessageJson) -> Self {
        Self {
            message_id: value.message_id.or(value.id).unwrap_or_default(),
            recipients: value.recipients.into_vec(),
            campaign_id: value.campaign_id,
            content: value.content,
            sender_id: value.sender_id,
            status: value.status.as_deref().and_then(MessageStatus::from_wire),
            timestamp: value.timestamp,
            created_at: value.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{GroupId, MessageContent, Pagination};

    const CAMPAIGN: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";

    fn instant() -> SendInstantMessage {
        SendInstantMessage::new(
            vec![
                PhoneNumber::new("255 712-345-678").unwrap(),
                PhoneNumber::new("+255787654321").unwrap(),
            ],
            MessageContent::new("Hello").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn send_instant_uses_request_sender_over_default() {
        let default = SenderId::new("DEFAULT").unwrap();
        let request = instant().with_sender(SenderId::new("BRIQ").unwrap());
        let body = serde_json::to_value(encode_send_instant(&request, Some(&default))).unwrap();
        assert_eq!(
            body,
            json!({
                "content": "Hello",
                "recipients": ["+255712345678", "+255787654321"],
                "sender_id": "BRIQ"
            })
        );
    }

    #[test]
    fn send_instant_sender_falls_back_to_default_then_empty() {
        let default = SenderId::new("DEFAULT").unwrap();
        let request = instant().with_campaign(CampaignId::new(CAMPAIGN).unwrap());

        let body = serde_json::to_value(encode_send_instant(&request, Some(&default))).unwrap();
        assert_eq!(body["sender_id"], "DEFAULT");
        assert_eq!(body["campaign_id"], CAMPAIGN);

        let body = serde_json::to_value(encode_send_instant(&request, None)).unwrap();
        assert_eq!(body["sender_id"], "");
    }

    #[test]
    fn send_campaign_body_fields() {
        let request = SendCampaignMessage {
            campaign_id: CampaignId::new(CAMPAIGN).unwrap(),
            group_id: GroupId::new("group-1").unwrap(),
            content: MessageContent::new("Hi all").unwrap(),
            sender_id: SenderId::new("BRIQ").unwrap(),
        };
        let body = serde_json::to_value(encode_send_campaign(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "campaign_id": CAMPAIGN,
                "group_id": "group-1",
                "content": "Hi all",
                "sender_id": "BRIQ"
            })
        );
    }

    #[test]
    fn logs_query_uses_camel_case_phone_filter() {
        let params = MessageLogsParams {
            pagination: Pagination::page(1, 50).unwrap(),
            status: Some(MessageStatus::Delivered),
            phone_number: Some(PhoneNumber::new("255712345678").unwrap()),
            ..MessageLogsParams::default()
        };
        let query = encode_logs_query(&params);
        let pairs = query.pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_owned()),
                ("limit", "50".to_owned()),
                ("status", "delivered".to_owned()),
                ("phoneNumber", "+255712345678".to_owned())
            ]
        );
    }

    #[test]
    fn history_query_skips_unset_filters() {
        let params = MessageHistoryParams {
            phone_number: Some(PhoneNumber::new("+255712345678").unwrap()),
            ..MessageHistoryParams::default()
        };
        let query = encode_history_query(&params);
        assert_eq!(
            query.pairs(),
            vec![("phoneNumber", "+255712345678".to_owned())]
        );
    }

    #[test]
    fn message_json_accepts_single_recipient_and_unknown_status() {
        let json: MessageJson = serde_json::from_value(json!({
            "id": "m-1",
            "recipients": "+255712345678",
            "status": "queued"
        }))
        .unwrap();
        let message = Message::from(json);
        assert_eq!(message.message_id, "m-1");
        assert_eq!(message.recipients, vec!["+255712345678".to_owned()]);
        assert_eq!(message.status, None);

        let json: MessageJson = serde_json::from_value(json!({
            "message_id": "m-2",
            "recipients": ["+255712345678", "+255787654321"],
            "status": "SENT"
        }))
        .unwrap();
        let message = Message::from(json);
        assert_eq!(message.recipients.len(), 2);
        assert_eq!(message.status, Some(MessageStatus::Sent));
    }
}
