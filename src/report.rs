//! Plain-text and CSV rendering of weekly results.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use csv::WriterBuilder;
use tracing::info;

use crate::calculate::WeeklyReport;
use crate::models::{
    AchievementDetail, AchievementKind, AchievementResult, RankedEntry, RivalryRecord,
    ServerPreference,
};
use crate::storage::{StorageConfig, StorageError};

/// Column headers of the leaderboard CSV.
pub const LEADERBOARD_HEADERS: [&str; 8] = [
    "Player", "#Top5", "#Top3", "#Top1", "#Dedi's", "Avg", "Points", "Trend",
];

/// `5` for whole numbers, `4.5` otherwise.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{}", points as i64)
    } else {
        format!("{:.1}", points)
    }
}

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) => format!("{:.1}", avg),
        None => "N/A".to_string(),
    }
}

/// Write the leaderboard as CSV, header first.
pub fn write_leaderboard_csv<W: Write>(out: W, entries: &[RankedEntry]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(LEADERBOARD_HEADERS)?;
    for entry in entries {
        let s = &entry.summary;
        writer.write_record([
            s.display_name.clone(),
            s.top_5.to_string(),
            s.top_3.to_string(),
            s.rank_1.to_string(),
            s.total_records.to_string(),
            format_average(s.average_rank),
            format_points(s.points),
            entry.trend.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// One-line description of what an award was won with.
pub fn describe_achievement(a: &AchievementResult) -> String {
    let metric = match (a.kind, &a.detail) {
        (AchievementKind::NightOwl, _) => format!("{} late-night dedi's", a.value),
        (AchievementKind::SaturdayNightFever, AchievementDetail::Share { percentage }) => {
            format!("{} weekend dedi's, {:.0}%", a.value, percentage)
        }
        (AchievementKind::JustOneMore, AchievementDetail::Day { date }) => {
            format!("{} dedi's on {}", a.value, date.format("%A, %b %d"))
        }
        (AchievementKind::CreatureOfHabit, _) => format!("played {}/7 days", a.value),
        (AchievementKind::CaffeineAddict, _) => format!("active in {} different hours", a.value),
        (AchievementKind::SoloExplorer, _) => format!("{} solo tracks", a.value),
        (AchievementKind::LuckyNumber, _) => format!("rank 1 x {}", a.value),
        (AchievementKind::FirstLoser, _) => format!("{} second places", a.value),
        (AchievementKind::ThirdTimesTheCharm, _) => format!("{} third places", a.value),
        (AchievementKind::TrackKing, _) => format!("{} track(s) owned", a.value),
        (AchievementKind::NoLifer, _) => format!("{} total dedi's", a.value),
        (AchievementKind::TrackHunter, _) => format!("{} unique tracks", a.value),
        (AchievementKind::KeywordAddict, _) => format!("{} matching tracks", a.value),
        (AchievementKind::ServerChampion, _) => format!("{} featured-server tracks", a.value),
        (AchievementKind::Benchwarmer, AchievementDetail::AverageRank { average_rank }) => {
            format!("{} track(s), avg rank {:.1}", a.value, average_rank)
        }
        (
            AchievementKind::RageQuit,
            AchievementDetail::RankDrop {
                track_id,
                original_rank,
                final_rank,
            },
        ) => format!("{} -> {} on {}", original_rank, final_rank, track_id),
        _ => a.value.to_string(),
    };
    format!("{}: {} ({})", a.title, a.player_name, metric)
}

pub fn render_leaderboard(entries: &[RankedEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<24} {:>5} {:>5} {:>5} {:>7} {:>6} {:>7}  {}",
        "#", "Player", "Top1", "Top3", "Top5", "Dedi's", "Avg", "Points", "Trend"
    );
    for entry in entries {
        let s = &entry.summary;
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>5} {:>5} {:>5} {:>7} {:>6} {:>7}  {}",
            entry.position,
            s.display_name,
            s.rank_1,
            s.top_3,
            s.top_5,
            s.total_records,
            format_average(s.average_rank),
            format_points(s.points),
            entry.trend
        );
    }
    out
}

pub fn render_rivalries(rivalries: &[RivalryRecord]) -> String {
    let mut out = String::new();
    for r in rivalries {
        let leader = r.leader().unwrap_or("Tied");
        let _ = writeln!(
            out,
            "{} vs {}: {} on {} shared tracks (leader: {})",
            r.leader_name,
            r.loser_name,
            r.score(),
            r.shared_tracks,
            leader
        );
    }
    out
}

pub fn render_servers(preferences: &[ServerPreference]) -> String {
    let mut out = String::new();
    for p in preferences {
        let _ = writeln!(
            out,
            "{} ({}): {} records, {} unique tracks, {} improvements, {} days",
            p.player_name,
            p.player_id,
            p.total_records,
            p.total_unique_tracks,
            p.total_improvements,
            p.total_days
        );
        for s in &p.servers {
            let _ = writeln!(
                out,
                "    {:<32} {:>4} records {:>4} tracks {:>4} days",
                s.server, s.total_records, s.unique_tracks, s.days_active
            );
        }
    }
    out
}

/// The full weekly report as text.
pub fn render_text(report: &WeeklyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "WEEKLY REPORT {} - {}",
        report.window.from.format("%b %d"),
        report.window.to.format("%b %d")
    );
    let _ = writeln!(out);

    if report.is_empty() {
        let _ = writeln!(out, "No data available for this week");
        return out;
    }

    let _ = writeln!(out, "LEADERBOARD");
    let _ = writeln!(out, "{}", "-".repeat(40));
    out.push_str(&render_leaderboard(&report.leaderboard));
    let _ = writeln!(out);

    let _ = writeln!(out, "RIVALRIES");
    let _ = writeln!(out, "{}", "-".repeat(40));
    if report.rivalries.is_empty() {
        let _ = writeln!(out, "No rivalries this week");
    } else {
        out.push_str(&render_rivalries(&report.rivalries));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "ACHIEVEMENTS");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for achievement in &report.achievements {
        let _ = writeln!(out, "{}", describe_achievement(achievement));
    }
    let _ = writeln!(out);

    let pulse = &report.pulse;
    let _ = writeln!(out, "PULSE");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(
        out,
        "{} dedi's ({} unique) on {} tracks by {} players",
        pulse.raw_records, pulse.unique_records, pulse.tracks, pulse.players
    );
    if let Some(hot) = &pulse.hottest_track {
        let _ = writeln!(out, "Hottest track: {} ({} records)", hot.track_id, hot.records);
    }
    out
}

/// Write `weekly_report.txt`, `leaderboard.csv` and `report.json` under
/// `reports/<window end>/`. Returns the written paths.
pub fn write_report_files(
    config: &StorageConfig,
    report: &WeeklyReport,
) -> Result<Vec<PathBuf>, StorageError> {
    let dir = config
        .reports_dir()
        .join(report.window.to.format("%Y-%m-%d").to_string());
    fs::create_dir_all(&dir)?;

    let text_path = dir.join("weekly_report.txt");
    fs::write(&text_path, render_text(report))?;

    let csv_path = dir.join("leaderboard.csv");
    write_leaderboard_csv(fs::File::create(&csv_path)?, &report.leaderboard)?;

    let json_path = dir.join("report.json");
    fs::write(&json_path, serde_json::to_string_pretty(report)?)?;

    info!("Wrote weekly report to {:?}", dir);
    Ok(vec![text_path, csv_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerWeekSummary, ReportWindow, Trend, WeeklyPulse};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(name: &str, points: f64, avg: Option<f64>, trend: Trend) -> RankedEntry {
        RankedEntry {
            position: 1,
            summary: PlayerWeekSummary {
                player_id: name.to_lowercase(),
                display_name: name.to_string(),
                rank_1: 1,
                top_3: 2,
                top_5: 3,
                total_records: 4,
                average_rank: avg,
                points,
            },
            trend,
        }
    }

    fn report(entries: Vec<RankedEntry>, raw: u32) -> WeeklyReport {
        let window = ReportWindow::week_ending(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        WeeklyReport {
            window,
            previous_window: window.previous(),
            leaderboard: entries,
            rivalries: vec![],
            achievements: vec![],
            pulse: WeeklyPulse {
                raw_records: raw,
                ..WeeklyPulse::default()
            },
        }
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(5.0), "5");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(4.5), "4.5");
        assert_eq!(format_points(12.3), "12.3");
    }

    #[test]
    fn test_leaderboard_csv() {
        let entries = vec![
            entry("Alice", 12.0, Some(2.0), Trend::Up(2)),
            entry("Bob, Jr", 0.5, None, Trend::New),
        ];
        let mut buf = Vec::new();
        write_leaderboard_csv(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Player,#Top5,#Top3,#Top1,#Dedi's,Avg,Points,Trend");
        assert_eq!(lines[1], "Alice,3,2,1,4,2.0,12,▲(2)");
        assert_eq!(lines[2], "\"Bob, Jr\",3,2,1,4,N/A,0.5,NEW");
    }

    #[test]
    fn test_describe_achievement() {
        let a = AchievementResult::new(AchievementKind::SaturdayNightFever, "alice", "Alice", 6)
            .with_detail(AchievementDetail::Share { percentage: 75.0 });
        assert_eq!(
            describe_achievement(&a),
            "SATURDAY NIGHT FEVER: Alice (6 weekend dedi's, 75%)"
        );

        let a = AchievementResult::new(AchievementKind::RageQuit, "bob", "Bob", 7).with_detail(
            AchievementDetail::RankDrop {
                track_id: "A05".to_string(),
                original_rank: 2,
                final_rank: 9,
            },
        );
        assert_eq!(describe_achievement(&a), "RAGE QUIT CANDIDATE: Bob (2 -> 9 on A05)");
    }

    #[test]
    fn test_render_text_empty_week() {
        let text = render_text(&report(vec![], 0));
        assert!(text.starts_with("WEEKLY REPORT Jun 12 - Jun 18"));
        assert!(text.contains("No data available for this week"));
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&report(vec![entry("Alice", 5.0, Some(1.0), Trend::Unchanged)], 3));
        assert!(text.contains("LEADERBOARD"));
        assert!(text.contains("Alice"));
        assert!(text.contains("■"));
        assert!(text.contains("No rivalries this week"));
    }

    #[test]
    fn test_write_report_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(temp_dir.path().to_path_buf());

        let paths = write_report_files(&config, &report(vec![], 0)).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(paths[0].starts_with(config.reports_dir().join("2025-06-18")));
    }
}
