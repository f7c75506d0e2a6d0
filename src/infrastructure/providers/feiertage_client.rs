use crate::domain::entities::{parse_date, ExternalHoliday};
use crate::domain::ports::{HolidaySource, HolidaySourceError};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FeiertagEntry {
    datum: String,
}

/// Client for feiertage-api.de compatible public-holiday services.
///
/// `GET {base}/api/?jahr=YYYY&nur_land=RR` returns a map of holiday name to
/// `{datum, hinweis}`.
pub struct FeiertageClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeiertageClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HolidaySourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HolidaySourceError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Converts the name-keyed payload into a date-sorted list.
/// Entries with an unreadable date are skipped.
fn into_holidays(payload: HashMap<String, FeiertagEntry>) -> Vec<ExternalHoliday> {
    let mut holidays: Vec<ExternalHoliday> = payload
        .into_iter()
        .filter_map(|(name, entry)| match parse_date(&entry.datum) {
            Ok(date) => Some(ExternalHoliday { date, name }),
            Err(e) => {
                tracing::warn!("Skipping holiday '{}': {}", name, e);
                None
            }
        })
        .collect();
    holidays.sort_by(|a, b| a.date.cmp(&b.date).then(a.name.cmp(&b.name)));
    holidays
}

#[async_trait::async_trait]
impl HolidaySource for FeiertageClient {
    async fn fetch_holidays(
        &self,
        year: i32,
        region_code: &str,
    ) -> Result<Vec<ExternalHoliday>, HolidaySourceError> {
        let url = format!("{}/api/", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("jahr", year.to_string()), ("nur_land", region_code.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HolidaySourceError::Timeout
                } else {
                    HolidaySourceError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(HolidaySourceError::Status(response.status().as_u16()));
        }

        let payload: HashMap<String, FeiertagEntry> = response
            .json()
            .await
            .map_err(|e| HolidaySourceError::Payload(e.to_string()))?;

        let holidays = into_holidays(payload);
        tracing::info!(
            "Fetched {} holidays for {}/{}",
            holidays.len(),
            year,
            region_code
        );
        Ok(holidays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_is_sorted_and_filtered() {
        let payload: HashMap<String, FeiertagEntry> = serde_json::from_str(
            r#"{
                "Tag der Arbeit": {"datum": "2025-05-01", "hinweis": ""},
                "Neujahrstag": {"datum": "2025-01-01", "hinweis": ""},
                "Kaputt": {"datum": "kein Datum"}
            }"#,
        )
        .unwrap();

        let holidays = into_holidays(payload);
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].name, "Neujahrstag");
        assert_eq!(holidays[1].date.to_string(), "2025-05-01");
    }
}
