use shelter_walks::infrastructure::persistence::Database;
use uuid::Uuid;

/// File-backed SQLite database with the real migrations applied.
///
/// One file per test so tests can run in parallel; the file is removed on drop.
pub struct TestDatabase {
    db: Database,
    path: String,
}

impl TestDatabase {
    pub fn db(&self) -> Database {
        self.db.clone()
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path, suffix));
        }
    }
}

pub async fn setup_test_db() -> TestDatabase {
    let path = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", path);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDatabase { db, path }
}

/// Removes the seeded default rules so a test can install its own
pub async fn clear_time_rules(db: &Database) {
    sqlx::query("DELETE FROM time_rules")
        .execute(db.pool())
        .await
        .expect("Failed to clear time rules");
}
