use crate::domain::entities::calendar::parse_date;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayOrigin {
    Admin,
    Api,
}

impl fmt::Display for HolidayOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayOrigin::Admin => write!(f, "admin"),
            HolidayOrigin::Api => write!(f, "api"),
        }
    }
}

impl std::str::FromStr for HolidayOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(HolidayOrigin::Admin),
            "api" => Ok(HolidayOrigin::Api),
            _ => Err(format!("Invalid holiday source: {}", s)),
        }
    }
}

/// Locally stored holiday, entered by an admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
    pub is_active: bool,
    pub source: HolidayOrigin,
    pub created_by: Option<String>,
    pub created_at: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: String, created_by: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            name,
            is_active: true,
            source: HolidayOrigin::Admin,
            created_by,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Holiday as published by the external calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHoliday {
    pub date: NaiveDate,
    pub name: String,
}

/// One cached external calendar per (year, region)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCacheEntry {
    pub year: i32,
    pub region_code: String,
    pub holidays: Vec<ExternalHoliday>,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl HolidayCacheEntry {
    pub fn is_fresh(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now < self.expires_at
    }
}

/// DTO for creating a holiday
#[derive(Debug, Deserialize)]
pub struct CreateHolidayRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub name: String,
}

impl CreateHolidayRequest {
    pub fn validate(&self) -> DomainResult<(NaiveDate, String)> {
        let date = parse_date(&self.date).map_err(DomainError::ValidationError)?;
        let name = validate_name(&self.name)?;
        Ok((date, name))
    }
}

/// DTO for updating a holiday
#[derive(Debug, Deserialize)]
pub struct UpdateHolidayRequest {
    pub date: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated holiday changes
#[derive(Debug, Default)]
pub struct HolidayChanges {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateHolidayRequest {
    pub fn validate(&self) -> DomainResult<HolidayChanges> {
        let date = self
            .date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(DomainError::ValidationError)?;
        let name = self.name.as_deref().map(validate_name).transpose()?;
        Ok(HolidayChanges {
            date,
            name,
            is_active: self.is_active,
        })
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    Ok(name.to_string())
}

/// Entry of the merged holiday list for a year
#[derive(Debug, Clone, Serialize)]
pub struct HolidayListEntry {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub is_active: bool,
    pub source: HolidayOrigin,
}

/// DTO for holiday list response
#[derive(Debug, Serialize)]
pub struct HolidayListResponse {
    pub year: i32,
    pub holidays: Vec<HolidayListEntry>,
    pub count: usize,
}
