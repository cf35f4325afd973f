//! Weekly award model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every award the analyzers can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    NightOwl,
    SaturdayNightFever,
    JustOneMore,
    CreatureOfHabit,
    CaffeineAddict,
    SoloExplorer,
    LuckyNumber,
    FirstLoser,
    ThirdTimesTheCharm,
    TrackKing,
    NoLifer,
    TrackHunter,
    KeywordAddict,
    ServerChampion,
    Benchwarmer,
    RageQuit,
}

impl AchievementKind {
    /// Default card title. Keyword and server awards are usually retitled from config.
    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::NightOwl => "NIGHT OWL",
            AchievementKind::SaturdayNightFever => "SATURDAY NIGHT FEVER",
            AchievementKind::JustOneMore => "JUST ONE MORE",
            AchievementKind::CreatureOfHabit => "CREATURE OF HABIT",
            AchievementKind::CaffeineAddict => "CAFFEINE ADDICT",
            AchievementKind::SoloExplorer => "SOLO EXPLORER",
            AchievementKind::LuckyNumber => "LUCKY NUMBER",
            AchievementKind::FirstLoser => "FIRST LOSER",
            AchievementKind::ThirdTimesTheCharm => "THIRD TIME'S THE CHARM",
            AchievementKind::TrackKing => "TRACK KING",
            AchievementKind::NoLifer => "NO-LIFER",
            AchievementKind::TrackHunter => "TRACK HUNTER",
            AchievementKind::KeywordAddict => "KEYWORD ADDICT",
            AchievementKind::ServerChampion => "SERVER CHAMPION",
            AchievementKind::Benchwarmer => "BENCHWARMER",
            AchievementKind::RageQuit => "RAGE QUIT CANDIDATE",
        }
    }
}

/// Extra facts an award carries besides its headline count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementDetail {
    None,
    /// Share of the player's own records, in percent.
    Share { percentage: f64 },
    /// The calendar day the count refers to.
    Day { date: NaiveDate },
    /// Average numeric rank used to break a tie.
    AverageRank { average_rank: f64 },
    /// A rank getting worse between two consecutive attempts.
    RankDrop {
        track_id: String,
        original_rank: u32,
        final_rank: u32,
    },
    /// The tracks that were counted.
    Tracks { tracks: Vec<String> },
}

/// One awarded superlative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementResult {
    pub kind: AchievementKind,
    pub title: String,
    pub player_id: String,
    pub player_name: String,
    /// Headline number (records, days, tracks, rank drop...)
    pub value: u32,
    pub detail: AchievementDetail,
}

impl AchievementResult {
    pub fn new(
        kind: AchievementKind,
        player_id: impl Into<String>,
        player_name: impl Into<String>,
        value: u32,
    ) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            player_id: player_id.into(),
            player_name: player_name.into(),
            value,
            detail: AchievementDetail::None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_detail(mut self, detail: AchievementDetail) -> Self {
        self.detail = detail;
        self
    }
}
