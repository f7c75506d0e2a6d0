use shelter_walks::domain::entities::{
    CreateTimeRuleRequest, Dog, ExperienceLevel, TimeRule, Walker,
};
use shelter_walks::infrastructure::http::middleware::AppState;
use shelter_walks::infrastructure::persistence::Database;
use uuid::Uuid;

pub async fn create_test_walker(
    db: &Database,
    name: &str,
    level: ExperienceLevel,
    is_admin: bool,
) -> Walker {
    let walker = Walker {
        id: Uuid::new_v4().to_string(),
        email: format!("{}@shelter.example", name.to_lowercase().replace(' ', ".")),
        name: name.to_string(),
        is_admin,
        is_active: true,
        experience_level: level,
    };

    sqlx::query(
        "INSERT INTO users (id, email, name, is_admin, is_active, experience_level, created_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(&walker.id)
    .bind(&walker.email)
    .bind(&walker.name)
    .bind(i64::from(is_admin))
    .bind(level.to_string())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(db.pool())
    .await
    .expect("Failed to create walker");

    walker
}

pub async fn create_test_admin(db: &Database) -> Walker {
    create_test_walker(db, "Admin", ExperienceLevel::Blue, true).await
}

pub async fn deactivate_walker(db: &Database, walker: &mut Walker) {
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(&walker.id)
        .execute(db.pool())
        .await
        .expect("Failed to deactivate walker");
    walker.is_active = false;
}

pub async fn create_test_dog(db: &Database, name: &str, level: ExperienceLevel) -> Dog {
    let dog = Dog {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        required_level: level,
        is_available: true,
    };

    sqlx::query(
        "INSERT INTO dogs (id, name, required_level, is_available, created_at)
         VALUES (?, ?, ?, 1, ?)",
    )
    .bind(&dog.id)
    .bind(&dog.name)
    .bind(level.to_string())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(db.pool())
    .await
    .expect("Failed to create dog");

    dog
}

pub async fn set_dog_available(db: &Database, dog_id: &str, available: bool) {
    sqlx::query("UPDATE dogs SET is_available = ? WHERE id = ?")
        .bind(i64::from(available))
        .bind(dog_id)
        .execute(db.pool())
        .await
        .expect("Failed to update dog");
}

/// Creates a bearer session for the walker and returns its token
pub async fn create_test_session(db: &Database, user_id: &str) -> String {
    let token = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind("2099-01-01T00:00:00+00:00")
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(db.pool())
    .await
    .expect("Failed to create session");

    token
}

pub fn rule_request(
    day_type: &str,
    name: &str,
    start: &str,
    end: &str,
    is_blocked: bool,
) -> CreateTimeRuleRequest {
    CreateTimeRuleRequest {
        day_type: day_type.to_string(),
        rule_name: name.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_blocked,
    }
}

pub async fn add_rule(
    state: &AppState,
    day_type: &str,
    name: &str,
    start: &str,
    end: &str,
    is_blocked: bool,
) -> TimeRule {
    state
        .time_rule_service
        .create_rule(rule_request(day_type, name, start, end, is_blocked))
        .await
        .expect("Failed to create rule")
}
