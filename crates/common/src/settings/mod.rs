//! Dashboard settings sections
//!
//! Each section is stored as one JSON row in `dashboard_settings`, keyed by
//! the section name. Missing rows read as the defaults below.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidateEmail};

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSection {
    Processing,
    Budget,
    ContentFilters,
    Notifications,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 4] = [
        SettingsSection::Processing,
        SettingsSection::Budget,
        SettingsSection::ContentFilters,
        SettingsSection::Notifications,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SettingsSection::Processing => "processing",
            SettingsSection::Budget => "budget",
            SettingsSection::ContentFilters => "content_filters",
            SettingsSection::Notifications => "notifications",
        }
    }
}

impl FromStr for SettingsSection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        SettingsSection::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| AppError::SettingsSectionNotFound {
                section: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProcessingSettings {
    #[validate(range(min = 5, max = 1440))]
    pub fetch_interval_minutes: u32,

    #[validate(range(min = 1, max = 500))]
    pub batch_size: u32,

    #[validate(range(min = 0.0, max = 1.0))]
    pub min_relevance_threshold: f64,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            fetch_interval_minutes: 60,
            batch_size: 50,
            min_relevance_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_budget"))]
pub struct BudgetSettings {
    #[validate(range(min = 0.0))]
    pub daily_limit: f64,

    #[validate(range(min = 0.0))]
    pub monthly_limit: f64,

    /// Percentage of a limit at which an alert is raised
    #[validate(range(min = 1, max = 100))]
    pub alert_threshold_percent: u32,
}

fn validate_budget(budget: &BudgetSettings) -> std::result::Result<(), validator::ValidationError> {
    if budget.monthly_limit < budget.daily_limit {
        return Err(validator::ValidationError::new("monthly_limit_below_daily_limit"));
    }
    Ok(())
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            daily_limit: 10.0,
            monthly_limit: 250.0,
            alert_threshold_percent: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContentFilterSettings {
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_quality_score: f64,

    #[validate(length(max = 200))]
    pub blocked_keywords: Vec<String>,

    #[validate(length(max = 50))]
    pub preferred_categories: Vec<String>,
}

impl Default for ContentFilterSettings {
    fn default() -> Self {
        Self {
            min_quality_score: 0.3,
            blocked_keywords: Vec::new(),
            preferred_categories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NotificationSettings {
    #[validate(length(max = 20))]
    pub email_recipients: Vec<String>,

    #[validate(url)]
    pub webhook_url: Option<String>,

    pub daily_report_enabled: bool,

    pub urgent_alerts_enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_recipients: Vec::new(),
            webhook_url: None,
            daily_report_enabled: true,
            urgent_alerts_enabled: true,
        }
    }
}

/// All sections, as returned by `GET /api/settings`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub processing: ProcessingSettings,
    pub budget: BudgetSettings,
    pub content_filters: ContentFilterSettings,
    pub notifications: NotificationSettings,
}

impl DashboardSettings {
    /// Overlay one stored section. Rows that no longer parse keep the default.
    pub fn apply(&mut self, section: SettingsSection, value: serde_json::Value) {
        let applied = match section {
            SettingsSection::Processing => {
                serde_json::from_value(value).map(|v| self.processing = v)
            }
            SettingsSection::Budget => serde_json::from_value(value).map(|v| self.budget = v),
            SettingsSection::ContentFilters => {
                serde_json::from_value(value).map(|v| self.content_filters = v)
            }
            SettingsSection::Notifications => {
                serde_json::from_value(value).map(|v| self.notifications = v)
            }
        };

        if let Err(e) = applied {
            tracing::warn!(section = section.key(), error = %e, "Ignoring unreadable settings row");
        }
    }
}

/// Parse and validate an incoming section body, returning its normalized JSON
pub fn validate_section(section: SettingsSection, body: serde_json::Value) -> Result<serde_json::Value> {
    fn check<T>(body: serde_json::Value) -> Result<serde_json::Value>
    where
        T: Validate + serde::de::DeserializeOwned + Serialize,
    {
        let parsed: T = serde_json::from_value(body).map_err(|e| AppError::InvalidFormat {
            message: e.to_string(),
        })?;
        parsed.validate()?;
        Ok(serde_json::to_value(parsed)?)
    }

    match section {
        SettingsSection::Processing => check::<ProcessingSettings>(body),
        SettingsSection::Budget => check::<BudgetSettings>(body),
        SettingsSection::ContentFilters => check::<ContentFilterSettings>(body),
        SettingsSection::Notifications => {
            let normalized = check::<NotificationSettings>(body)?;
            let recipients = normalized
                .get("email_recipients")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            if let Some(bad) = recipients
                .iter()
                .filter_map(|r| r.as_str())
                .find(|r| !r.validate_email())
            {
                return Err(AppError::validation(
                    "email_recipients",
                    format!("invalid email address: {}", bad),
                ));
            }
            Ok(normalized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_section_keys_round_trip() {
        for section in SettingsSection::ALL {
            assert_eq!(section.key().parse::<SettingsSection>().unwrap(), section);
        }
        assert!("billing".parse::<SettingsSection>().is_err());
    }

    #[test]
    fn test_partial_body_fills_defaults() {
        let value = assert_ok!(validate_section(SettingsSection::Processing, json!({ "batch_size": 10 })));
        assert_eq!(value["batch_size"], 10);
        assert_eq!(value["fetch_interval_minutes"], 60);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = assert_err!(validate_section(
            SettingsSection::Processing,
            json!({ "fetch_interval_minutes": 1 })
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let err = validate_section(
            SettingsSection::Budget,
            json!({ "daily_limit": 50.0, "monthly_limit": 20.0 }),
        )
        .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_notification_addresses_checked() {
        assert_ok!(validate_section(
            SettingsSection::Notifications,
            json!({ "email_recipients": ["ops@example.com"] })
        ));

        let err = validate_section(
            SettingsSection::Notifications,
            json!({ "email_recipients": ["not-an-email"] }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not-an-email"));
    }

    #[test]
    fn test_apply_ignores_bad_rows() {
        let mut settings = DashboardSettings::default();
        settings.apply(SettingsSection::Budget, json!({ "daily_limit": "lots" }));
        assert_eq!(settings.budget, BudgetSettings::default());

        settings.apply(SettingsSection::Budget, json!({ "daily_limit": 5.0 }));
        assert_eq!(settings.budget.daily_limit, 5.0);
    }
}
