use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, WindowParams};
use crate::calculate::{filter_roster, filter_window, server_preferences, NicknameBook};
use crate::models::{ReportWindow, ServerPreference};
use crate::storage;

#[derive(Debug, Deserialize)]
pub struct ServersParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_records: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ServersResponse {
    /// `None` when all stored records were analysed
    pub window: Option<ReportWindow>,
    pub min_records: u32,
    pub players: Vec<ServerPreference>,
}

/// Server preferences over all records, or over a window when bounds are given.
pub async fn servers(
    State(state): State<AppState>,
    Query(params): Query<ServersParams>,
) -> Result<Json<ServersResponse>, ApiError> {
    let records = storage::load_records(&state.storage)?;
    let window_params = WindowParams {
        from: params.from,
        to: params.to,
    };

    let (window, records) = if window_params.is_set() {
        let window = window_params.resolve(&records)?;
        (Some(window), filter_window(&records, &window))
    } else {
        (None, records)
    };
    let records = filter_roster(records, &state.config.roster);

    let min_records = params
        .min_records
        .unwrap_or(state.config.server_analysis.min_records);
    let names = NicknameBook::from_records(&records);

    Ok(Json(ServersResponse {
        window,
        min_records,
        players: server_preferences(&records, &names, min_records),
    }))
}
