use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, WindowParams};
use crate::calculate::{build_weekly_report, WeeklyInputs, WeeklyReport};
use crate::models::{AchievementResult, RankedEntry, ReportWindow, RivalryRecord, WeeklyPulse};
use crate::report::write_leaderboard_csv;
use crate::storage;

/// Load everything from disk and build the report for the requested window.
pub(crate) fn load_report(
    state: &AppState,
    params: &WindowParams,
) -> Result<WeeklyReport, ApiError> {
    let records = storage::load_records(&state.storage)?;
    let info = storage::load_competition_info(&state.storage)?;
    let window = params.resolve(&records)?;

    let inputs = WeeklyInputs {
        records: &records,
        info: &info,
        roster: &state.config.roster,
        rivalry: &state.rivalry,
        achievements: &state.achievements,
    };
    Ok(build_weekly_report(window, window.previous(), &inputs))
}

pub async fn report(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<WeeklyReport>, ApiError> {
    Ok(Json(load_report(&state, &params)?))
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub window: ReportWindow,
    pub previous_window: ReportWindow,
    pub entries: Vec<RankedEntry>,
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let report = load_report(&state, &params)?;
    Ok(Json(LeaderboardResponse {
        window: report.window,
        previous_window: report.previous_window,
        entries: report.leaderboard,
    }))
}

pub async fn leaderboard_csv(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<impl IntoResponse, ApiError> {
    let report = load_report(&state, &params)?;
    let mut body = Vec::new();
    write_leaderboard_csv(&mut body, &report.leaderboard)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

#[derive(Debug, Serialize)]
pub struct RivalriesResponse {
    pub window: ReportWindow,
    pub rivalries: Vec<RivalryRecord>,
}

pub async fn rivalries(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<RivalriesResponse>, ApiError> {
    let report = load_report(&state, &params)?;
    Ok(Json(RivalriesResponse {
        window: report.window,
        rivalries: report.rivalries,
    }))
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub window: ReportWindow,
    pub achievements: Vec<AchievementResult>,
}

pub async fn achievements(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let report = load_report(&state, &params)?;
    Ok(Json(AchievementsResponse {
        window: report.window,
        achievements: report.achievements,
    }))
}

#[derive(Debug, Serialize)]
pub struct PulseResponse {
    pub window: ReportWindow,
    pub pulse: WeeklyPulse,
}

pub async fn pulse(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<PulseResponse>, ApiError> {
    let report = load_report(&state, &params)?;
    Ok(Json(PulseResponse {
        window: report.window,
        pulse: report.pulse,
    }))
}

/// One player's slice of the weekly report.
#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub window: ReportWindow,
    pub entry: RankedEntry,
    pub achievements: Vec<AchievementResult>,
    pub rivalries: Vec<RivalryRecord>,
}

pub async fn player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let report = load_report(&state, &params)?;
    let entry = report
        .entry(&player_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("No records for player {}", player_id)))?;

    let achievements = report
        .achievements
        .into_iter()
        .filter(|a| a.player_id == player_id)
        .collect();
    let rivalries = report
        .rivalries
        .into_iter()
        .filter(|r| r.leader_id == player_id || r.loser_id == player_id)
        .collect();

    Ok(Json(PlayerResponse {
        window: report.window,
        entry,
        achievements,
        rivalries,
    }))
}
