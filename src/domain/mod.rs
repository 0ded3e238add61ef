//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    CampaignListParams, CreateCampaign, CreateWorkspace, MessageHistoryParams, MessageLogsParams,
    SendCampaignMessage, SendInstantMessage, UpdateCampaign, UpdateWorkspace, WorkspaceListParams,
};
pub use response::{Campaign, Deleted, Message, PageInfo, Paginated, Workspace};
pub use validation::ValidationError;
pub use value::{
    ApiKey, CampaignId, CampaignName, Description, GroupId, LaunchDate, MessageContent,
    MessageStatus, Pagination, PhoneNumber, SearchTerm, SenderId, WorkspaceId, WorkspaceName,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_workspace_requires_a_field() {
        assert!(matches!(
            UpdateWorkspace::new(None, None),
            Err(ValidationError::EmptyUpdate)
        ));
        let update = UpdateWorkspace::new(Some(WorkspaceName::new("Ops").unwrap()), None).unwrap();
        assert_eq!(update.name().map(WorkspaceName::as_str), Some("Ops"));
        assert!(update.description().is_none());
    }

    #[test]
    fn send_instant_requires_recipients() {
        let content = MessageContent::new("hi").unwrap();
        assert!(matches!(
            SendInstantMessage::new(Vec::new(), content.clone()),
            Err(ValidationError::Empty {
                field: PhoneNumber::FIELD
            })
        ));

        let request = SendInstantMessage::to_one(PhoneNumber::new("255712345678").unwrap(), content)
            .with_sender(SenderId::new("BRIQ").unwrap());
        assert_eq!(request.recipients().len(), 1);
        assert_eq!(request.sender_id().map(SenderId::as_str), Some("BRIQ"));
        assert!(request.campaign_id().is_none());
    }
}
