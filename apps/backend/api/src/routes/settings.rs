use axum::{Extension, Json, Router, extract::State, routing::get};
use backoffice_core::{SessionContext, documents::SettingsDocument};

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(save_settings))
}

/// The stored settings document, `null` when nothing was saved yet.
#[tracing::instrument(name = "GET /scratchoff/settings", skip(state, session))]
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Option<SettingsDocument>>, ApiError> {
    session.require_admin()?;
    let settings = state.repository.load_settings().await?;
    Ok(Json(settings.as_ref().map(SettingsDocument::from)))
}

#[tracing::instrument(name = "PUT /scratchoff/settings", skip(state, session))]
pub async fn save_settings(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SettingsDocument>, ApiError> {
    let tracker = state.tracker(&session).await?;
    let tracker = tracker.read().await;

    match tracker.save_settings().await {
        Ok(settings) => {
            metrics::counter!("scratchoff_settings_saves_total", "outcome" => "ok").increment(1);
            Ok(Json(SettingsDocument::from(&settings)))
        }
        Err(e) => {
            metrics::counter!("scratchoff_settings_saves_total", "outcome" => "error")
                .increment(1);
            Err(e.into())
        }
    }
}
