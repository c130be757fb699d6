//! Calendar legend: which dates have slots, are closed or fully booked

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::{
    error::AppResult,
    models::{AuthFields, SessionContext, SlotDatesRequest, SlotDatesResponse},
    scheduling::dates::parse_calendar_date,
};

use super::backend::SchedulingBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    FullyBooked,
    NotAvailable,
    Available,
    /// No schedule covers the date
    Unscheduled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarLegend {
    pub available: BTreeSet<NaiveDate>,
    pub not_available: BTreeSet<NaiveDate>,
    pub fully_booked: BTreeSet<NaiveDate>,
}

impl CalendarLegend {
    pub async fn fetch(
        backend: &dyn SchedulingBackend,
        session: &SessionContext,
    ) -> AppResult<Self> {
        let request = SlotDatesRequest {
            auth: AuthFields::from(session),
            facility_id: session.facility_id.clone(),
        };
        let response = backend.slot_dates(&request).await?;
        let legend = Self::from_response(&response);

        tracing::info!(
            "Calendar legend for facility {}: {} available, {} closed, {} full",
            session.facility_id,
            legend.available.len(),
            legend.not_available.len(),
            legend.fully_booked.len()
        );
        Ok(legend)
    }

    pub fn from_response(response: &SlotDatesResponse) -> Self {
        Self {
            available: parse_date_list(response.available.as_deref()),
            not_available: parse_date_list(response.notavailable.as_deref()),
            fully_booked: parse_date_list(response.fullavailable.as_deref()),
        }
    }

    pub fn status_of(&self, date: NaiveDate) -> DayStatus {
        if self.fully_booked.contains(&date) {
            DayStatus::FullyBooked
        } else if self.not_available.contains(&date) {
            DayStatus::NotAvailable
        } else if self.available.contains(&date) {
            DayStatus::Available
        } else {
            DayStatus::Unscheduled
        }
    }
}

fn parse_date_list(csv: Option<&str>) -> BTreeSet<NaiveDate> {
    csv.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let date = parse_calendar_date(s);
            if date.is_none() {
                tracing::debug!("Skipping unparseable legend date {:?}", s);
            }
            date
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::MockSchedulingBackend;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    #[test]
    fn test_status_precedence() {
        let legend = CalendarLegend::from_response(&SlotDatesResponse {
            available: Some("01/09/2025,02/09/2025, 03/09/2025".into()),
            notavailable: Some("02/09/2025".into()),
            fullavailable: Some("03/09/2025,bogus".into()),
        });

        assert_eq!(legend.status_of(date(1)), DayStatus::Available);
        assert_eq!(legend.status_of(date(2)), DayStatus::NotAvailable);
        assert_eq!(legend.status_of(date(3)), DayStatus::FullyBooked);
        assert_eq!(legend.status_of(date(4)), DayStatus::Unscheduled);
        assert_eq!(legend.fully_booked.len(), 1);
    }

    #[test]
    fn test_missing_lists() {
        let legend = CalendarLegend::from_response(&SlotDatesResponse::default());
        assert_eq!(legend, CalendarLegend::default());
    }

    #[tokio::test]
    async fn test_fetch_sends_facility() {
        let mut backend = MockSchedulingBackend::new();
        backend
            .expect_slot_dates()
            .withf(|r| r.facility_id == "12")
            .returning(|_| {
                Ok(SlotDatesResponse {
                    available: Some("05/09/2025".into()),
                    ..SlotDatesResponse::default()
                })
            });

        let session = SessionContext {
            facility_id: "12".into(),
            ..SessionContext::default()
        };
        let legend = CalendarLegend::fetch(&backend, &session).await.unwrap();
        assert_eq!(legend.status_of(date(5)), DayStatus::Available);
    }
}
