use serde::{Deserialize, Serialize};
use std::fmt;

/// Walker and dog access tier; ordered from least to most experienced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Green,
    Orange,
    Blue,
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Green
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Green => write!(f, "green"),
            ExperienceLevel::Orange => write!(f, "orange"),
            ExperienceLevel::Blue => write!(f, "blue"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green" => Ok(ExperienceLevel::Green),
            "orange" => Ok(ExperienceLevel::Orange),
            "blue" => Ok(ExperienceLevel::Blue),
            _ => Err(format!("Invalid experience level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Walker {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub experience_level: ExperienceLevel,
}

impl Walker {
    pub fn may_walk(&self, dog: &Dog) -> bool {
        self.is_admin || self.experience_level >= dog.required_level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dog {
    pub id: String,
    pub name: String,
    pub required_level: ExperienceLevel,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: String,
}

impl Session {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        chrono::DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|expires| expires.with_timezone(&chrono::Utc) <= now)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(level: ExperienceLevel, is_admin: bool) -> Walker {
        Walker {
            id: "w".to_string(),
            email: "w@example.com".to_string(),
            name: "W".to_string(),
            is_admin,
            is_active: true,
            experience_level: level,
        }
    }

    fn dog(level: ExperienceLevel) -> Dog {
        Dog {
            id: "d".to_string(),
            name: "Rex".to_string(),
            required_level: level,
            is_available: true,
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(ExperienceLevel::Green < ExperienceLevel::Orange);
        assert!(ExperienceLevel::Orange < ExperienceLevel::Blue);
    }

    #[test]
    fn test_walker_access_tier() {
        assert!(walker(ExperienceLevel::Blue, false).may_walk(&dog(ExperienceLevel::Orange)));
        assert!(walker(ExperienceLevel::Orange, false).may_walk(&dog(ExperienceLevel::Orange)));
        assert!(!walker(ExperienceLevel::Green, false).may_walk(&dog(ExperienceLevel::Blue)));
        assert!(walker(ExperienceLevel::Green, true).may_walk(&dog(ExperienceLevel::Blue)));
    }

    #[test]
    fn test_session_expiry() {
        let now = chrono::Utc::now();
        let session = Session {
            token: "t".to_string(),
            user_id: "u".to_string(),
            expires_at: (now + chrono::Duration::hours(1)).to_rfc3339(),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + chrono::Duration::hours(2)));

        let garbled = Session {
            expires_at: "tomorrow".to_string(),
            ..session
        };
        assert!(garbled.is_expired(now));
    }
}
