use crate::domain::entities::{DayType, TimeRule, TimeRuleSpec};
use crate::infrastructure::http::middleware::error::ApiResult;

/// Repository for the weekly time rules
#[async_trait::async_trait]
pub trait TimeRuleRepository: Send + Sync {
    async fn list_time_rules(&self) -> ApiResult<Vec<TimeRule>>;

    /// Rules for one day type, ordered by start time
    async fn list_time_rules_for(&self, day_type: DayType) -> ApiResult<Vec<TimeRule>>;

    async fn get_time_rule(&self, id: &str) -> ApiResult<Option<TimeRule>>;

    async fn create_time_rule(&self, rule: &TimeRule) -> ApiResult<()>;

    /// Replaces every listed rule in a single transaction.
    /// Fails with NotFound if any id is unknown, leaving all rules untouched.
    async fn update_time_rules(&self, updates: &[(String, TimeRuleSpec)]) -> ApiResult<Vec<TimeRule>>;

    /// Returns false when no rule has this id
    async fn delete_time_rule(&self, id: &str) -> ApiResult<bool>;
}
