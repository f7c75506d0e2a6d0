use crate::{
    domain::entities::{
        BookingSettings, CalendarDay, CreateHolidayRequest, ExternalHoliday, Holiday,
        HolidayCacheEntry, HolidayListEntry, HolidayListResponse, HolidayOrigin,
        UpdateHolidayRequest,
    },
    domain::ports::{Clock, HolidayRepository, HolidaySource, HolidaySourceError},
    infrastructure::http::middleware::error::{ApiError, ApiResult},
};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Resolves day type and holiday status, and manages admin holidays
#[derive(Clone)]
pub struct CalendarService {
    holiday_repo: Arc<dyn HolidayRepository>,
    holiday_source: Arc<dyn HolidaySource>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
}

impl CalendarService {
    pub fn new(
        holiday_repo: Arc<dyn HolidayRepository>,
        holiday_source: Arc<dyn HolidaySource>,
        clock: Arc<dyn Clock>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            holiday_repo,
            holiday_source,
            clock,
            fetch_timeout,
        }
    }

    /// Day type plus holiday flag for one date.
    ///
    /// An admin row on the date decides alone: active marks the holiday,
    /// inactive suppresses the external calendar's entry for that date.
    pub async fn resolve(&self, date: NaiveDate, settings: &BookingSettings) -> ApiResult<CalendarDay> {
        let mut day = CalendarDay::plain(date);

        if let Some(holiday) = self.holiday_repo.find_holiday_on(date).await? {
            if holiday.is_active {
                day.is_holiday = true;
                day.holiday_name = Some(holiday.name);
            }
            return Ok(day);
        }

        if settings.use_holiday_api {
            let external = self.external_holidays(date.year(), settings).await;
            if let Some(holiday) = external.into_iter().find(|h| h.date == date) {
                day.is_holiday = true;
                day.holiday_name = Some(holiday.name);
            }
        }

        Ok(day)
    }

    /// External holidays for a year, served from the cache while it is fresh.
    ///
    /// Never fails: a failed or slow fetch falls back to the stale cache row,
    /// then to an empty list.
    pub async fn external_holidays(&self, year: i32, settings: &BookingSettings) -> Vec<ExternalHoliday> {
        let region = settings.holiday_region.as_str();
        let now = self.clock.now_utc();

        let cached = match self.holiday_repo.get_cached_holidays(year, region).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Holiday cache lookup failed for {}/{}: {}", year, region, e);
                None
            }
        };

        if let Some(entry) = &cached {
            if entry.is_fresh(now) {
                return entry.holidays.clone();
            }
        }

        let fetched = match tokio::time::timeout(
            self.fetch_timeout,
            self.holiday_source.fetch_holidays(year, region),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(HolidaySourceError::Timeout),
        };

        match fetched {
            Ok(holidays) => {
                metrics::counter!("holiday_fetches_total", "outcome" => "success").increment(1);

                let entry = HolidayCacheEntry {
                    year,
                    region_code: region.to_string(),
                    holidays,
                    fetched_at: now,
                    expires_at: now + chrono::Duration::days(settings.holiday_cache_days),
                };
                if let Err(e) = self.holiday_repo.upsert_cached_holidays(&entry).await {
                    tracing::warn!("Failed to cache holidays for {}/{}: {}", year, region, e);
                }
                entry.holidays
            }
            Err(e) => {
                metrics::counter!("holiday_fetches_total", "outcome" => "failure").increment(1);

                match cached {
                    Some(stale) => {
                        tracing::warn!(
                            "Holiday fetch for {}/{} failed ({}); using cache from {}",
                            year,
                            region,
                            e,
                            stale.fetched_at
                        );
                        stale.holidays
                    }
                    None => {
                        tracing::warn!(
                            "Holiday fetch for {}/{} failed ({}); no cached holidays available",
                            year,
                            region,
                            e
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Admin holidays merged with the external calendar for a year
    pub async fn holidays_for_year(&self, year: i32, settings: &BookingSettings) -> ApiResult<HolidayListResponse> {
        let (from, to) = match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(ApiError::BadRequest(format!("Invalid year {}", year))),
        };

        let admin = self.holiday_repo.list_holidays_between(from, to).await?;
        let admin_dates: HashSet<NaiveDate> = admin.iter().map(|h| h.date).collect();

        let mut holidays: Vec<HolidayListEntry> = admin
            .into_iter()
            .map(|h| HolidayListEntry {
                id: Some(h.id),
                date: h.date,
                name: h.name,
                is_active: h.is_active,
                source: h.source,
            })
            .collect();

        if settings.use_holiday_api {
            holidays.extend(
                self.external_holidays(year, settings)
                    .await
                    .into_iter()
                    .filter(|h| !admin_dates.contains(&h.date))
                    .map(|h| HolidayListEntry {
                        id: None,
                        date: h.date,
                        name: h.name,
                        is_active: true,
                        source: HolidayOrigin::Api,
                    }),
            );
        }

        holidays.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(HolidayListResponse {
            year,
            count: holidays.len(),
            holidays,
        })
    }

    pub async fn create_holiday(&self, request: CreateHolidayRequest, created_by: &str) -> ApiResult<Holiday> {
        let (date, name) = request.validate()?;
        let holiday = Holiday::new(date, name, Some(created_by.to_string()));

        self.holiday_repo.create_holiday(&holiday).await?;

        Ok(holiday)
    }

    pub async fn update_holiday(&self, id: &str, request: UpdateHolidayRequest) -> ApiResult<Holiday> {
        let changes = request.validate()?;

        self.holiday_repo
            .update_holiday(id, &changes)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Holiday {} not found", id)))
    }

    pub async fn delete_holiday(&self, id: &str) -> ApiResult<()> {
        if !self.holiday_repo.delete_holiday(id).await? {
            return Err(ApiError::NotFound(format!("Holiday {} not found", id)));
        }

        tracing::info!("Holiday deleted: id={}", id);
        Ok(())
    }
}
