//! Dashboard settings handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::AppState;
use newsdesk_common::{
    errors::{AppError, Result},
    settings::{validate_section, DashboardSettings, SettingsSection},
};

/// `GET /api/settings`
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<DashboardSettings>> {
    Ok(Json(load(&state).await?))
}

/// `GET /api/settings/{section}`
pub async fn get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<Value>> {
    let section: SettingsSection = section.parse()?;
    let settings = serde_json::to_value(load(&state).await?)?;

    Ok(Json(settings.get(section.key()).cloned().unwrap_or(Value::Null)))
}

/// `PUT /api/settings/{section}`
///
/// Omitted fields take their defaults. Returns the stored section.
pub async fn update_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let section: SettingsSection = section.parse()?;
    let Json(body) = body.map_err(|e| AppError::InvalidFormat {
        message: e.body_text(),
    })?;

    let normalized = validate_section(section, body)?;
    state.repo.upsert_setting(section.key(), normalized.clone()).await?;

    tracing::info!(section = section.key(), "Settings section updated");

    Ok(Json(normalized))
}

async fn load(state: &AppState) -> Result<DashboardSettings> {
    let mut settings = DashboardSettings::default();

    for row in state.repo.load_settings().await? {
        match row.key.parse::<SettingsSection>() {
            Ok(section) => settings.apply(section, row.value),
            Err(_) => tracing::debug!(key = %row.key, "Skipping unknown settings row"),
        }
    }

    Ok(settings)
}
