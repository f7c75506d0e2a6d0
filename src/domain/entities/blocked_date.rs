use crate::domain::entities::calendar::parse_date;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const DOG_SCOPE_PREFIX: &str = "dog:";

/// Who a date block applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockScope {
    Global,
    Dog(String),
}

impl BlockScope {
    pub fn from_dog_id(dog_id: Option<&str>) -> Self {
        match dog_id {
            Some(id) => BlockScope::Dog(id.to_string()),
            None => BlockScope::Global,
        }
    }

    /// Storage key; the `(date, key)` pair is unique
    pub fn key(&self) -> String {
        match self {
            BlockScope::Global => "global".to_string(),
            BlockScope::Dog(id) => format!("{}{}", DOG_SCOPE_PREFIX, id),
        }
    }

    pub fn dog_id(&self) -> Option<&str> {
        match self {
            BlockScope::Global => None,
            BlockScope::Dog(id) => Some(id),
        }
    }
}

impl fmt::Display for BlockScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockScope::Global => write!(f, "all dogs"),
            BlockScope::Dog(id) => write!(f, "dog {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockedDate {
    pub id: String,
    pub date: NaiveDate,
    pub dog_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dog_name: Option<String>,
    pub reason: String,
    pub created_by: String,
    pub created_at: String,
}

impl BlockedDate {
    pub fn new(date: NaiveDate, scope: &BlockScope, reason: String, created_by: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            dog_id: scope.dog_id().map(str::to_string),
            dog_name: None,
            reason,
            created_by,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn scope(&self) -> BlockScope {
        BlockScope::from_dog_id(self.dog_id.as_deref())
    }
}

/// DTO for blocking a date, globally or for one dog
#[derive(Debug, Deserialize)]
pub struct CreateBlockedDateRequest {
    #[serde(default)]
    pub date: String,
    pub dog_id: Option<String>,
    #[serde(default)]
    pub reason: String,
}

impl CreateBlockedDateRequest {
    pub fn validate(&self) -> DomainResult<(NaiveDate, BlockScope, String)> {
        if self.date.is_empty() {
            return Err(DomainError::validation("Date is required"));
        }
        let date = parse_date(&self.date).map_err(DomainError::ValidationError)?;

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("Reason is required"));
        }

        if let Some(dog_id) = &self.dog_id {
            if dog_id.trim().is_empty() {
                return Err(DomainError::validation("dog_id cannot be empty"));
            }
        }

        let scope = BlockScope::from_dog_id(self.dog_id.as_deref().map(str::trim));
        Ok((date, scope, reason.to_string()))
    }
}

/// Result of creating a block, including the cascade outcome
#[derive(Debug, Serialize)]
pub struct BlockCreatedResponse {
    pub blocked_date: BlockedDate,
    pub cancelled_bookings: usize,
    pub failed_cancellations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade_error: Option<String>,
}

/// Blocks affecting one dog on one date
#[derive(Debug, Clone, Default)]
pub struct BlockStatus {
    pub global: Option<BlockedDate>,
    pub dog: Option<BlockedDate>,
}

impl BlockStatus {
    pub fn is_blocked(&self) -> bool {
        self.global.is_some() || self.dog.is_some()
    }

    /// The block that wins when reporting to a caller: global first
    pub fn effective(&self) -> Option<&BlockedDate> {
        self.global.as_ref().or(self.dog.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_and_dog_scopes_have_distinct_keys() {
        assert_ne!(
            BlockScope::Global.key(),
            BlockScope::Dog("global".to_string()).key()
        );
    }

    #[test]
    fn test_request_validation() {
        let valid = CreateBlockedDateRequest {
            date: "2025-05-01".to_string(),
            dog_id: Some("dog-1".to_string()),
            reason: "Vet visit".to_string(),
        };
        let (_, scope, reason) = valid.validate().unwrap();
        assert_eq!(scope, BlockScope::Dog("dog-1".to_string()));
        assert_eq!(reason, "Vet visit");

        let missing_reason = CreateBlockedDateRequest {
            date: "2025-05-01".to_string(),
            dog_id: None,
            reason: " ".to_string(),
        };
        assert!(missing_reason.validate().is_err());

        let bad_date = CreateBlockedDateRequest {
            date: "01.05.2025".to_string(),
            dog_id: None,
            reason: "Closed".to_string(),
        };
        assert!(bad_date.validate().is_err());
    }
}
