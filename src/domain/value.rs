use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use phonenumber::country;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Briq API key sent as the `X-API-Key` header.
///
/// Invariant: at least 16 characters from `[A-Za-z0-9_-]` after trimming.
/// `Debug` output never contains the key itself.
pub struct ApiKey(String);

impl ApiKey {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "api_key";

    /// Minimum accepted key length.
    pub const MIN_LEN: usize = 16;

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let well_formed = trimmed.len() >= Self::MIN_LEN
            && trimmed
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !well_formed {
            return Err(ValidationError::InvalidFormat {
                field: Self::FIELD,
                input: redact(trimmed),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&redact(&self.0)).finish()
    }
}

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}***")
}

fn parse_uuid(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    // Only the canonical hyphenated form, versions 1-5, RFC 4122 variant.
    let valid = trimmed.len() == 36
        && uuid::Uuid::try_parse(trimmed).is_ok_and(|id| {
            (1..=5).contains(&id.get_version_num()) && id.get_variant() == uuid::Variant::RFC4122
        });
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field,
            input: trimmed.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Workspace identifier (`workspace_id`).
///
/// Invariant: hyphenated UUID (versions 1-5).
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Field name used by the Briq API (`workspace_id`).
    pub const FIELD: &'static str = "workspace_id";

    /// Create a validated [`WorkspaceId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        parse_uuid(Self::FIELD, value.into()).map(Self)
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Campaign identifier (`campaign_id`).
///
/// Invariant: hyphenated UUID (versions 1-5).
pub struct CampaignId(String);

impl CampaignId {
    /// Field name used by the Briq API (`campaign_id`).
    pub const FIELD: &'static str = "campaign_id";

    /// Create a validated [`CampaignId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        parse_uuid(Self::FIELD, value.into()).map(Self)
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Contact group identifier (`group_id`) targeted by a campaign send.
///
/// Invariant: non-empty after trimming.
pub struct GroupId(String);

impl GroupId {
    /// Field name used by the Briq API (`group_id`).
    pub const FIELD: &'static str = "group_id";

    /// Create a validated [`GroupId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number, normalized to a leading `+` followed by digits.
///
/// Spaces and dashes are stripped before validation; the remainder must be an
/// E.164-shaped number (`+?[1-9][0-9]{1,14}`).
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Field name used by the Briq API (`recipients`).
    pub const FIELD: &'static str = "recipients";

    /// Validate and normalize a phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let cleaned: String = trimmed.chars().filter(|c| *c != ' ' && *c != '-').collect();
        let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        let well_formed = (2..=15).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit())
            && !digits.starts_with('0');
        if !well_formed {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        }

        Ok(Self(format!("+{digits}")))
    }

    /// Parse a number in national or international notation and normalize it to E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix,
    /// e.g. `Some(country::Id::TZ)` for local Tanzanian numbers.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, trimmed).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            }
        })?;
        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Self::new(e164)
    }

    /// Normalized value as sent to Briq.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id (`sender_id`) registered on the Briq account.
///
/// Invariant: non-empty after trimming.
pub struct SenderId(String);

impl SenderId {
    /// Field name used by the Briq API (`sender_id`).
    pub const FIELD: &'static str = "sender_id";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body (`content`).
///
/// Invariant: not blank, at most [`MessageContent::MAX_CHARS`] characters. The original
/// value (including surrounding whitespace) is preserved.
pub struct MessageContent(String);

impl MessageContent {
    /// Field name used by the Briq API (`content`).
    pub const FIELD: &'static str = "content";

    /// Maximum accepted length in characters.
    pub const MAX_CHARS: usize = 1600;

    const GSM_SEGMENT_CHARS: usize = 160;
    const UNICODE_SEGMENT_CHARS: usize = 70;

    /// Create validated message content.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let len = value.chars().count();
        if len > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the content as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of SMS segments needed to deliver this content.
    ///
    /// Plain ASCII uses 160-character segments, anything else 70-character segments.
    pub fn segments(&self) -> usize {
        let per_segment = if self.0.is_ascii() {
            Self::GSM_SEGMENT_CHARS
        } else {
            Self::UNICODE_SEGMENT_CHARS
        };
        self.0.chars().count().div_ceil(per_segment)
    }
}

fn bounded_text(
    field: &'static str,
    max: usize,
    value: String,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: len,
        });
    }
    Ok(trimmed.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Workspace display name. Trimmed, 1..=100 characters.
pub struct WorkspaceName(String);

impl WorkspaceName {
    pub const FIELD: &'static str = "name";
    pub const MAX_CHARS: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(Self::FIELD, Self::MAX_CHARS, value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Campaign display name. Trimmed, 1..=150 characters.
pub struct CampaignName(String);

impl CampaignName {
    pub const FIELD: &'static str = "name";
    pub const MAX_CHARS: usize = 150;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(Self::FIELD, Self::MAX_CHARS, value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free-form description for workspaces and campaigns. Trimmed, 1..=500 characters.
pub struct Description(String);

impl Description {
    pub const FIELD: &'static str = "description";
    pub const MAX_CHARS: usize = 500;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(Self::FIELD, Self::MAX_CHARS, value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Search term for list endpoints. Trimmed, 1..=100 characters.
pub struct SearchTerm(String);

impl SearchTerm {
    pub const FIELD: &'static str = "search";
    pub const MAX_CHARS: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(Self::FIELD, Self::MAX_CHARS, value.into()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Campaign launch date in UTC (`launch_date`).
pub struct LaunchDate(DateTime<Utc>);

impl LaunchDate {
    /// Field name used by the Briq API (`launch_date`).
    pub const FIELD: &'static str = "launch_date";

    /// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` timestamp (UTC), or a
    /// plain `YYYY-MM-DD` date (midnight UTC).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(parsed.with_timezone(&Utc)));
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(parsed.and_utc()));
        }
        if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(Self(midnight.and_utc()));
        }

        Err(ValidationError::InvalidFormat {
            field: Self::FIELD,
            input: trimmed.to_owned(),
        })
    }

    /// Wrap an already-known instant.
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    /// Reject dates that are not strictly after `now`.
    pub fn ensure_future(self, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        if self.0 <= now {
            return Err(ValidationError::NotInFuture { field: Self::FIELD });
        }
        Ok(self)
    }

    /// Get the underlying instant.
    pub fn value(self) -> DateTime<Utc> {
        self.0
    }

    /// ISO 8601 form with millisecond precision, as sent to Briq.
    pub fn to_wire(self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Pagination parameters shared by list endpoints.
///
/// Invariant: `page >= 1` and `limit` within `1..=100` when set.
pub struct Pagination {
    page: Option<u32>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    /// Create validated pagination parameters.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, ValidationError> {
        if let Some(page @ 0) = page {
            return Err(ValidationError::OutOfRange {
                field: "page",
                min: 1,
                max: u32::MAX,
                actual: page,
            });
        }
        match limit {
            Some(limit) if !(1..=Self::MAX_LIMIT).contains(&limit) => {
                return Err(ValidationError::OutOfRange {
                    field: "limit",
                    min: 1,
                    max: Self::MAX_LIMIT,
                    actual: limit,
                });
            }
            _ => {}
        }
        Ok(Self {
            page,
            limit,
            offset,
        })
    }

    /// Shortcut for `page` + `limit` without an explicit offset.
    pub fn page(page: u32, limit: u32) -> Result<Self, ValidationError> {
        Self::new(Some(page), Some(limit), None)
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Delivery status of a message.
pub enum MessageStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
    Cancelled,
}

impl MessageStatus {
    /// Wire representation (`pending`, `sent`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a wire status; unknown values return `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            "cancelled" => Self::Cancelled,
            _ => return None,
        })
    }
}
