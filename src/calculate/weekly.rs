//! The weekly report pipeline.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculate::{
    deduplicate, detect_rivalries, featured_tracks, filter_roster, filter_window,
    rank_leaderboard, run_all,
    summarize_player, weekly_pulse, AchievementOptions, AnalyzerContext, DeduplicatedRecordSet,
    NicknameBook, PreviousRanking, RivalryOptions,
};
use crate::models::{
    AchievementResult, ChallengeCompetitionInfo, PlayerWeekSummary, RankedEntry, Record,
    ReportWindow, RivalryRecord, WeeklyPulse,
};

/// Everything the pipeline reads besides the two windows.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyInputs<'a> {
    /// Every known record, any date
    pub records: &'a [Record],
    pub info: &'a ChallengeCompetitionInfo,
    /// Players to include; empty means everyone
    pub roster: &'a [String],
    pub rivalry: &'a RivalryOptions,
    pub achievements: &'a AchievementOptions,
}

/// A finished week, ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub window: ReportWindow,
    pub previous_window: ReportWindow,
    pub leaderboard: Vec<RankedEntry>,
    pub rivalries: Vec<RivalryRecord>,
    pub achievements: Vec<AchievementResult>,
    pub pulse: WeeklyPulse,
}

impl WeeklyReport {
    pub fn entry(&self, player_id: &str) -> Option<&RankedEntry> {
        self.leaderboard
            .iter()
            .find(|e| e.summary.player_id == player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.pulse.raw_records == 0
    }
}

/// Summaries for every player in a deduplicated set, in first-seen order.
pub fn player_summaries(
    dedup: &DeduplicatedRecordSet,
    names: &NicknameBook,
    info: &ChallengeCompetitionInfo,
) -> Vec<PlayerWeekSummary> {
    let mut players: Vec<&str> = Vec::new();
    for record in dedup.iter() {
        if !players.contains(&record.player_id.as_str()) {
            players.push(&record.player_id);
        }
    }
    players
        .into_iter()
        .map(|player| summarize_player(player, names.name(player), dedup.for_player(player), info))
        .collect()
}

/// Window and roster filter, in that order.
pub fn window_records(inputs: &WeeklyInputs<'_>, window: &ReportWindow) -> Vec<Record> {
    filter_roster(filter_window(inputs.records, window), inputs.roster)
}

/// Build the report for `current`, with trends measured against `previous`.
pub fn build_weekly_report(
    current: ReportWindow,
    previous: ReportWindow,
    inputs: &WeeklyInputs<'_>,
) -> WeeklyReport {
    let raw = window_records(inputs, &current);
    let names = NicknameBook::from_records(&raw);
    let dedup = deduplicate(&raw);

    let previous_ranking = {
        let prev_raw = window_records(inputs, &previous);
        let prev_names = NicknameBook::from_records(&prev_raw);
        let prev_dedup = deduplicate(&prev_raw);
        PreviousRanking::from_summaries(player_summaries(&prev_dedup, &prev_names, inputs.info))
    };

    let leaderboard = rank_leaderboard(
        player_summaries(&dedup, &names, inputs.info),
        &previous_ranking,
    );
    let rivalries = detect_rivalries(&dedup, &names, inputs.rivalry);
    let featured = featured_tracks(inputs.records, inputs.achievements);
    let achievements = run_all(&AnalyzerContext {
        raw: &raw,
        dedup: &dedup,
        info: inputs.info,
        names: &names,
        options: inputs.achievements,
        featured_tracks: &featured,
    });
    let pulse = weekly_pulse(&raw, &dedup);

    info!(
        from = %current.from,
        to = %current.to,
        players = leaderboard.len(),
        rivalries = rivalries.len(),
        achievements = achievements.len(),
        "Built weekly report"
    );

    WeeklyReport {
        window: current,
        previous_window: previous,
        leaderboard,
        rivalries,
        achievements,
        pulse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AchievementKind, Rank, Trend};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn rec(player: &str, track: &str, rank: &str, ts: &str) -> Record {
        Record::new(player, track)
            .with_display_name(format!("[{}]", player))
            .with_rank(Rank::parse(rank))
            .with_timestamp_str(ts)
    }

    fn window() -> ReportWindow {
        ReportWindow::week_ending(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap())
    }

    fn fixture() -> Vec<Record> {
        vec![
            // previous week: bob ahead of alice
            rec("bob", "A", "1", "2025-06-05 20:00:00"),
            rec("alice", "A", "2", "2025-06-06 20:00:00"),
            // this week
            rec("alice", "A", "1", "2025-06-12 20:00:00"),
            rec("bob", "A", "2", "2025-06-12 21:00:00"),
            rec("alice", "B", "1", "2025-06-13 02:00:00"),
            rec("bob", "B", "3", "2025-06-13 21:00:00"),
            rec("alice", "C", "4", "2025-06-14 20:00:00"),
            rec("bob", "C", "2", "2025-06-14 21:00:00"),
            rec("mallory", "C", "1", "2025-06-15 21:00:00"),
            // next week, ignored
            rec("bob", "D", "1", "2025-06-19 10:00:00"),
        ]
    }

    #[test]
    fn test_full_pipeline() {
        let records = fixture();
        let info: ChallengeCompetitionInfo = [("A", 20), ("B", 20), ("C", 20)].into_iter().collect();
        let roster = vec!["alice".to_string(), "bob".to_string()];
        let rivalry = RivalryOptions::default();
        let achievements = AchievementOptions::default();
        let inputs = WeeklyInputs {
            records: &records,
            info: &info,
            roster: &roster,
            rivalry: &rivalry,
            achievements: &achievements,
        };

        let current = window();
        let report = build_weekly_report(current, current.previous(), &inputs);

        let order: Vec<(&str, f64, Trend)> = report
            .leaderboard
            .iter()
            .map(|e| (e.summary.player_id.as_str(), e.summary.points, e.trend))
            .collect();
        assert_eq!(
            order,
            vec![("alice", 12.0, Trend::Up(1)), ("bob", 9.0, Trend::Down(1))]
        );
        assert_eq!(report.leaderboard[0].summary.display_name, "[alice]");

        assert_eq!(report.rivalries.len(), 1);
        assert_eq!(report.rivalries[0].leader_id, "alice");
        assert_eq!(report.rivalries[0].score(), "2-1");

        assert_eq!(report.pulse.raw_records, 6);
        assert_eq!(report.pulse.players, 2);

        let night = report
            .achievements
            .iter()
            .find(|a| a.kind == AchievementKind::NightOwl)
            .unwrap();
        assert_eq!(night.player_id, "alice");
        assert!(report.entry("mallory").is_none());
    }

    #[test]
    fn test_featured_track_from_an_earlier_week() {
        let records = vec![
            rec("carol", "T1", "1", "2025-06-05 20:00:00").with_server("MiniLol FreeZone"),
            rec("alice", "T1", "2", "2025-06-13 20:00:00").with_server("Cavern"),
        ];
        let info = ChallengeCompetitionInfo::new();
        let roster = vec!["alice".to_string()];
        let rivalry = RivalryOptions::default();
        let achievements = AchievementOptions::default();
        let inputs = WeeklyInputs {
            records: &records,
            info: &info,
            roster: &roster,
            rivalry: &rivalry,
            achievements: &achievements,
        };
        let report = build_weekly_report(window(), window().previous(), &inputs);

        let champion = report
            .achievements
            .iter()
            .find(|a| a.kind == AchievementKind::ServerChampion)
            .unwrap();
        assert_eq!(champion.player_id, "alice");
        assert_eq!(champion.value, 1);
    }

    #[test]
    fn test_empty_week() {
        let records: Vec<Record> = vec![];
        let info = ChallengeCompetitionInfo::new();
        let rivalry = RivalryOptions::default();
        let achievements = AchievementOptions::default();
        let inputs = WeeklyInputs {
            records: &records,
            info: &info,
            roster: &[],
            rivalry: &rivalry,
            achievements: &achievements,
        };
        let report = build_weekly_report(window(), window().previous(), &inputs);

        assert!(report.is_empty());
        assert!(report.leaderboard.is_empty());
        assert!(report.rivalries.is_empty());
        assert!(report.achievements.is_empty());
    }
}
