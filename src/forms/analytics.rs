use chrono::NaiveDate;
use serde::Deserialize;

use crate::analytics::period::Period;
use crate::domain::types::ListingId;
use crate::forms::{FormError, parse_optional};

#[derive(Debug, Default, Deserialize)]
/// Period and filter selection shared by the report screens and the API.
pub struct ReportQuery {
    pub period: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    pub listing_id: Option<i32>,
    pub event_type: Option<String>,
    pub page: Option<usize>,
}

impl ReportQuery {
    pub fn period(&self) -> Result<Period, FormError> {
        let from = parse_optional::<NaiveDate>(&self.from, "od")?;
        let to = parse_optional::<NaiveDate>(&self.to, "do")?;
        Period::parse(self.period.as_deref(), from, to).map_err(|_| FormError::InvalidField("period"))
    }

    pub fn listing_id(&self) -> Option<ListingId> {
        self.listing_id.and_then(|id| ListingId::new(id).ok())
    }

    /// Event type filter; blank means all types.
    pub fn event_type(&self) -> Option<&str> {
        self.event_type
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::period::PeriodPreset;

    #[test]
    fn defaults_to_thirty_days() {
        let query = ReportQuery::default();
        assert_eq!(query.period().unwrap(), Period::Preset(PeriodPreset::Last30Days));
    }

    #[test]
    fn custom_dates_win_over_preset() {
        let query = ReportQuery {
            period: Some("7d".to_string()),
            from: "2025-01-01".to_string(),
            to: "2025-01-31".to_string(),
            ..ReportQuery::default()
        };
        assert!(matches!(query.period().unwrap(), Period::Custom { .. }));
    }

    #[test]
    fn unknown_preset_or_bad_date_is_an_error() {
        let unknown = ReportQuery {
            period: Some("1y".to_string()),
            ..ReportQuery::default()
        };
        assert!(unknown.period().is_err());

        let bad_date = ReportQuery {
            from: "01.01.2025".to_string(),
            to: "2025-01-31".to_string(),
            ..ReportQuery::default()
        };
        assert!(bad_date.period().is_err());
    }

    #[test]
    fn far_future_end_date_is_rejected() {
        let query = ReportQuery {
            from: "2025-01-01".to_string(),
            to: "+262142-12-31".to_string(),
            ..ReportQuery::default()
        };
        assert!(matches!(query.period(), Err(FormError::InvalidField("period"))));
    }
}
