use crate::domain::entities::{DayType, Interval, WallTime};
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Named open or blocked window for a day type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRule {
    pub id: String,
    pub day_type: DayType,
    pub rule_name: String,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub is_blocked: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TimeRule {
    pub fn new(spec: TimeRuleSpec) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            day_type: spec.day_type,
            rule_name: spec.rule_name,
            start_time: spec.start_time,
            end_time: spec.end_time,
            is_blocked: spec.is_blocked,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn window(&self) -> Interval {
        Interval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Validated rule fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRuleSpec {
    pub day_type: DayType,
    pub rule_name: String,
    pub start_time: WallTime,
    pub end_time: WallTime,
    pub is_blocked: bool,
}

/// DTO for creating a rule
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimeRuleRequest {
    #[serde(default)]
    pub day_type: String,
    #[serde(default)]
    pub rule_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub is_blocked: bool,
}

impl CreateTimeRuleRequest {
    pub fn validate(&self) -> DomainResult<TimeRuleSpec> {
        validate_rule_fields(
            &self.day_type,
            &self.rule_name,
            &self.start_time,
            &self.end_time,
            self.is_blocked,
        )
    }
}

/// DTO for one entry of a bulk rule update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTimeRuleRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub day_type: String,
    #[serde(default)]
    pub rule_name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub is_blocked: bool,
}

impl UpdateTimeRuleRequest {
    pub fn validate(&self) -> DomainResult<TimeRuleSpec> {
        if self.id.trim().is_empty() {
            return Err(DomainError::validation("id is required for every rule"));
        }
        validate_rule_fields(
            &self.day_type,
            &self.rule_name,
            &self.start_time,
            &self.end_time,
            self.is_blocked,
        )
    }
}

fn validate_rule_fields(
    day_type: &str,
    rule_name: &str,
    start_time: &str,
    end_time: &str,
    is_blocked: bool,
) -> DomainResult<TimeRuleSpec> {
    let day_type: DayType = day_type.parse().map_err(DomainError::ValidationError)?;

    let rule_name = rule_name.trim();
    if rule_name.is_empty() {
        return Err(DomainError::validation("rule_name is required"));
    }
    if rule_name.len() > 100 {
        return Err(DomainError::validation(
            "rule_name cannot exceed 100 characters",
        ));
    }

    let start_time = WallTime::parse(start_time)?;
    let end_time = WallTime::parse(end_time)?;
    if end_time <= start_time {
        return Err(DomainError::validation("end_time must be after start_time"));
    }

    Ok(TimeRuleSpec {
        day_type,
        rule_name: rule_name.to_string(),
        start_time,
        end_time,
        is_blocked,
    })
}

/// Validates a bulk update batch as a whole before anything is written.
pub fn validate_rule_batch(
    requests: &[UpdateTimeRuleRequest],
) -> DomainResult<Vec<(String, TimeRuleSpec)>> {
    if requests.is_empty() {
        return Err(DomainError::validation("At least one rule is required"));
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    let mut validated = Vec::with_capacity(requests.len());

    for request in requests {
        let spec = request.validate()?;
        if !ids.insert(request.id.clone()) {
            return Err(DomainError::validation(format!(
                "Rule {} appears more than once",
                request.id
            )));
        }
        if !names.insert((spec.day_type, spec.rule_name.clone())) {
            return Err(DomainError::Conflict(format!(
                "Rule name '{}' is used twice for {}",
                spec.rule_name, spec.day_type
            )));
        }
        validated.push((request.id.clone(), spec));
    }

    Ok(validated)
}

/// Rules grouped by day type, each group sorted by start time
pub type RulesByDayType = BTreeMap<DayType, Vec<TimeRule>>;

pub fn group_rules(rules: Vec<TimeRule>) -> RulesByDayType {
    let mut grouped: RulesByDayType = DayType::ALL.iter().map(|d| (*d, Vec::new())).collect();
    for rule in rules {
        grouped.entry(rule.day_type).or_default().push(rule);
    }
    for rules in grouped.values_mut() {
        rules.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.end_time.cmp(&b.end_time)));
    }
    grouped
}

/// Rules applying to one concrete date
#[derive(Debug, Serialize)]
pub struct RulesForDateResponse {
    pub date: chrono::NaiveDate,
    pub day_type: DayType,
    pub rules: Vec<TimeRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(day_type: &str, name: &str, start: &str, end: &str) -> CreateTimeRuleRequest {
        CreateTimeRuleRequest {
            day_type: day_type.to_string(),
            rule_name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_blocked: false,
        }
    }

    #[test]
    fn test_valid_rule() {
        let spec = request("weekday", "Morning walk", "09:00", "12:00")
            .validate()
            .unwrap();
        assert_eq!(spec.day_type, DayType::Weekday);
        assert_eq!(spec.start_time.to_string(), "09:00");
    }

    #[test]
    fn test_rejects_bad_day_type() {
        let err = request("holiday", "Morning", "09:00", "12:00")
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_reversed_or_empty_window() {
        assert!(request("weekday", "Bad", "12:00", "09:00").validate().is_err());
        assert!(request("weekday", "Empty", "09:00", "09:00").validate().is_err());
    }

    #[test]
    fn test_rejects_loose_time_format() {
        assert!(request("weekday", "Loose", "9:00", "12:00").validate().is_err());
        assert!(request("weekday", "Seconds", "09:00:00", "12:00").validate().is_err());
    }

    #[test]
    fn test_rejects_blank_name() {
        assert!(request("weekend", "   ", "09:00", "12:00").validate().is_err());
    }

    #[test]
    fn test_batch_rejects_duplicate_names_as_conflict() {
        let entry = |id: &str| UpdateTimeRuleRequest {
            id: id.to_string(),
            day_type: "weekday".to_string(),
            rule_name: "Morning".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            is_blocked: false,
        };
        let err = validate_rule_batch(&[entry("a"), entry("b")]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_group_rules_sorts_by_start() {
        let late = TimeRule::new(request("weekday", "Late", "14:00", "15:00").validate().unwrap());
        let early = TimeRule::new(request("weekday", "Early", "09:00", "10:00").validate().unwrap());
        let grouped = group_rules(vec![late, early]);
        let weekday = &grouped[&DayType::Weekday];
        assert_eq!(weekday[0].rule_name, "Early");
        assert_eq!(weekday[1].rule_name, "Late");
        assert!(grouped[&DayType::Weekend].is_empty());
    }
}
