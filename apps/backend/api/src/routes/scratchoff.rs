use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use backoffice_core::{
    BoardStats, Notice, NoticeLevel, ScratchoffTracker, SessionContext, SlotId, SortConfig,
    SortKey, TicketSlot, documents::{date_key, parse_date_key},
};
use backoffice_types::Value;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(board))
        .route("/date", post(select_date))
        .route("/slots/{id}", patch(update_slot))
        .route("/sort", post(sort))
        .route("/save", post(save))
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub date: String,
    pub slots: Vec<TicketSlot>,
    pub grand_total: f64,
    pub stats: BoardStats,
    pub sort: SortConfig,
    pub saving: bool,
    pub notices: Vec<Notice>,
}

impl BoardView {
    /// Pending notices are handed over to the caller once.
    fn of(tracker: &ScratchoffTracker) -> Self {
        Self {
            date: date_key(tracker.date()),
            slots: tracker.sorted_slots().into_iter().cloned().collect(),
            grand_total: tracker.grand_total(),
            stats: tracker.stats(),
            sort: tracker.sort_config(),
            saving: tracker.is_saving(),
            notices: tracker.take_notices(),
        }
    }
}

#[tracing::instrument(name = "GET /scratchoff", skip(state, session))]
pub async fn board(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<BoardView>, ApiError> {
    let tracker = state.tracker(&session).await?;
    let tracker = tracker.read().await;
    Ok(Json(BoardView::of(&tracker)))
}

#[derive(Deserialize, Debug)]
pub struct SelectDateRequest {
    pub date: String,
}

#[tracing::instrument(name = "POST /scratchoff/date", skip(state, session))]
pub async fn select_date(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<SelectDateRequest>,
) -> Result<Json<BoardView>, ApiError> {
    let date = parse_date_key(&request.date)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid date: {}", request.date)))?;

    let tracker = state.tracker(&session).await?;
    let mut tracker = tracker.write().await;
    let pending = tracker.notices().len();
    tracker.select_date(date).await?;

    metrics::counter!(
        "scratchoff_loads_total",
        "outcome" => load_outcome(&tracker.notices(), pending)
    )
    .increment(1);

    Ok(Json(BoardView::of(&tracker)))
}

/// Outcome of one load, judged only by the notices it queued after the
/// first `pending` ones.
pub(crate) fn load_outcome(notices: &[Notice], pending: usize) -> &'static str {
    let degraded = notices
        .iter()
        .skip(pending)
        .any(|notice| notice.level == NoticeLevel::Warning);
    if degraded { "degraded" } else { "ok" }
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateSlotRequest {
    pub today: Option<Value>,
    pub denomination: Option<Value>,
}

#[tracing::instrument(name = "PATCH /scratchoff/slots/{id}", skip(state, session, request))]
pub async fn update_slot(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<SlotId>,
    Json(request): Json<UpdateSlotRequest>,
) -> Result<Json<TicketSlot>, ApiError> {
    if request.today.is_none() && request.denomination.is_none() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    let tracker = state.tracker(&session).await?;
    let mut tracker = tracker.write().await;

    if let Some(denomination) = &request.denomination {
        tracker.set_denomination(id, denomination)?;
    }
    if let Some(today) = &request.today {
        tracker.set_today(id, today)?;
    }

    let slot = tracker
        .board()
        .slot(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("unknown ticket slot {}", id)))?;
    Ok(Json(slot))
}

#[derive(Deserialize, Debug)]
pub struct SortRequest {
    pub key: SortKey,
}

#[tracing::instrument(name = "POST /scratchoff/sort", skip(state, session))]
pub async fn sort(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<SortRequest>,
) -> Result<Json<BoardView>, ApiError> {
    let tracker = state.tracker(&session).await?;
    let mut tracker = tracker.write().await;
    tracker.sort_by(request.key);
    Ok(Json(BoardView::of(&tracker)))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SaveResponse {
    pub id: String,
}

#[tracing::instrument(name = "POST /scratchoff/save", skip(state, session))]
pub async fn save(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SaveResponse>, ApiError> {
    let tracker = state.tracker(&session).await?;
    // shared lock so an overlapping save reaches the tracker's guard
    let tracker = tracker.read().await;

    match tracker.save().await {
        Ok(id) => {
            metrics::counter!("scratchoff_saves_total", "outcome" => "ok").increment(1);
            Ok(Json(SaveResponse { id: id.to_string() }))
        }
        Err(e) => {
            metrics::counter!("scratchoff_saves_total", "outcome" => "error").increment(1);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_outcome_ignores_earlier_warnings() {
        let stale = Notice::warning("Failed to load yesterday's data");
        let loaded = Notice::success("Loaded data for 2024-03-02");

        assert_eq!(load_outcome(&[stale.clone(), loaded.clone()], 1), "ok");
        assert_eq!(load_outcome(&[stale.clone()], 1), "ok");
        assert_eq!(load_outcome(&[], 0), "ok");
        assert_eq!(
            load_outcome(&[loaded, Notice::warning("Failed to load selected date's data")], 1),
            "degraded"
        );
        assert_eq!(load_outcome(&[stale], 0), "degraded");
    }
}
