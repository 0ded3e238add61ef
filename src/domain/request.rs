use chrono::NaiveDate;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CampaignId, CampaignName, Description, GroupId, LaunchDate, MessageContent, MessageStatus,
    Pagination, PhoneNumber, SearchTerm, SenderId, WorkspaceId, WorkspaceName,
};

#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: WorkspaceName,
    pub description: Option<Description>,
}

impl CreateWorkspace {
    pub fn new(name: WorkspaceName) -> Self {
        Self {
            name,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }
}

#[derive(Debug, Clone)]
pub struct UpdateWorkspace {
    name: Option<WorkspaceName>,
    description: Option<Description>,
}

impl UpdateWorkspace {
    /// At least one of the fields must be set.
    pub fn new(
        name: Option<WorkspaceName>,
        description: Option<Description>,
    ) -> Result<Self, ValidationError> {
        if name.is_none() && description.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }
        Ok(Self { name, description })
    }

    pub fn name(&self) -> Option<&WorkspaceName> {
        self.name.as_ref()
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceListParams {
    pub pagination: Pagination,
    pub search: Option<SearchTerm>,
}

#[derive(Debug, Clone)]
pub struct CreateCampaign {
    pub name: CampaignName,
    pub description: Option<Description>,
    pub workspace_id: WorkspaceId,
    pub launch_date: LaunchDate,
}

/// Full replacement of a campaign's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateCampaign {
    pub name: CampaignName,
    pub description: Option<Description>,
    pub workspace_id: WorkspaceId,
    pub launch_date: LaunchDate,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignListParams {
    pub pagination: Pagination,
    pub workspace_id: Option<WorkspaceId>,
    pub search: Option<SearchTerm>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct SendInstantMessage {
    recipients: Vec<PhoneNumber>,
    content: MessageContent,
    sender_id: Option<SenderId>,
    campaign_id: Option<CampaignId>,
}

impl SendInstantMessage {
    pub fn new(
        recipients: Vec<PhoneNumber>,
        content: MessageContent,
    ) -> Result<Self, ValidationError> {
        if recipients.is_empty() {
            return Err(ValidationError::Empty {
                field: PhoneNumber::FIELD,
            });
        }
        Ok(Self {
            recipients,
            content,
            sender_id: None,
            campaign_id: None,
        })
    }

    pub fn to_one(recipient: PhoneNumber, content: MessageContent) -> Self {
        Self {
            recipients: vec![recipient],
            content,
            sender_id: None,
            campaign_id: None,
        }
    }

    pub fn with_sender(mut self, sender_id: SenderId) -> Self {
        self.sender_id = Some(sender_id);
        self
    }

    pub fn with_campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    pub fn recipients(&self) -> &[PhoneNumber] {
        &self.recipients
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }

    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }

    pub fn campaign_id(&self) -> Option<&CampaignId> {
        self.campaign_id.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct SendCampaignMessage {
    pub campaign_id: CampaignId,
    pub group_id: GroupId,
    pub content: MessageContent,
    pub sender_id: SenderId,
}

#[derive(Debug, Clone, Default)]
pub struct MessageLogsParams {
    pub pagination: Pagination,
    pub workspace_id: Option<WorkspaceId>,
    pub campaign_id: Option<CampaignId>,
    pub status: Option<MessageStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub phone_number: Option<PhoneNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct MessageHistoryParams {
    pub pagination: Pagination,
    pub workspace_id: Option<WorkspaceId>,
    pub phone_number: Option<PhoneNumber>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
