use crate::{
    domain::entities::{
        group_rules, parse_date, validate_rule_batch, CreateTimeRuleRequest, DayType,
        RulesByDayType, RulesForDateResponse, TimeRule, UpdateTimeRuleRequest,
    },
    domain::errors::DomainError,
    domain::ports::TimeRuleRepository,
    domain::services::{reduce, DayWindows},
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use std::sync::Arc;

/// Admin management of weekly time rules and their reduction to open ranges
#[derive(Clone)]
pub struct TimeRuleService {
    rule_repo: Arc<dyn TimeRuleRepository>,
}

impl TimeRuleService {
    pub fn new(rule_repo: Arc<dyn TimeRuleRepository>) -> Self {
        Self { rule_repo }
    }

    pub async fn list_rules(&self) -> ApiResult<RulesByDayType> {
        let rules = self.rule_repo.list_time_rules().await?;
        Ok(group_rules(rules))
    }

    pub async fn rules_for_date(&self, date: Option<&str>) -> ApiResult<RulesForDateResponse> {
        let date = date
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ApiError::BadRequest("date is required".to_string()))?;
        let date = parse_date(date).map_err(ApiError::BadRequest)?;
        let day_type = DayType::of(date);

        Ok(RulesForDateResponse {
            date,
            day_type,
            rules: self.rule_repo.list_time_rules_for(day_type).await?,
        })
    }

    /// Open and blocked windows for a day type
    pub async fn day_windows(&self, day_type: DayType) -> ApiResult<DayWindows> {
        let rules = self.rule_repo.list_time_rules_for(day_type).await?;
        Ok(reduce(&rules))
    }

    pub async fn create_rule(&self, request: CreateTimeRuleRequest) -> ApiResult<TimeRule> {
        let spec = request.validate()?;
        let rule = TimeRule::new(spec);

        self.rule_repo.create_time_rule(&rule).await?;

        Ok(rule)
    }

    /// Validates the whole batch, then replaces every listed rule atomically
    pub async fn update_rules(&self, requests: Vec<UpdateTimeRuleRequest>) -> ApiResult<Vec<TimeRule>> {
        let updates = validate_rule_batch(&requests)?;

        for (id, _) in &updates {
            if self.rule_repo.get_time_rule(id).await?.is_none() {
                return Err(DomainError::NotFound(format!("Time rule {} not found", id)).into());
            }
        }

        self.rule_repo.update_time_rules(&updates).await
    }

    pub async fn delete_rule(&self, id: &str) -> ApiResult<()> {
        if !self.rule_repo.delete_time_rule(id).await? {
            return Err(ApiError::NotFound(format!("Time rule {} not found", id)));
        }
        Ok(())
    }
}
