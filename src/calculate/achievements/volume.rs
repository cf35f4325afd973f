//! How much people race.

use std::collections::HashSet;

use super::{AchievementOptions, AnalyzerContext, Tally};
use crate::models::{AchievementDetail, AchievementKind, AchievementResult, Record};

/// Most attempts, repeats included (raw attempts).
pub fn no_lifer(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let tally: Tally = ctx.raw.iter().map(|r| r.player_id.as_str()).collect();
    let (player, attempts) = tally.leader()?;
    Some(ctx.award(AchievementKind::NoLifer, player, attempts))
}

/// Most distinct tracks (deduplicated).
pub fn track_hunter(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let tally: Tally = ctx.dedup.iter().map(|r| r.player_id.as_str()).collect();
    let (player, tracks) = tally.leader()?;
    Some(ctx.award(AchievementKind::TrackHunter, player, tracks))
}

/// Most distinct tracks whose name contains the configured keyword (deduplicated).
pub fn keyword_addict(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let keyword = ctx.options.keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return None;
    }

    let matching: Vec<(&str, &str)> = ctx
        .dedup
        .iter()
        .filter(|r| r.track_id.to_lowercase().contains(&keyword))
        .map(|r| (r.player_id.as_str(), r.track_id.as_str()))
        .collect();
    let tally: Tally = matching.iter().map(|&(player, _)| player).collect();
    let (player, count) = tally.leader()?;

    let mut tracks: Vec<String> = matching
        .iter()
        .filter(|&&(p, _)| p == player)
        .map(|&(_, track)| track.to_string())
        .collect();
    tracks.sort();
    Some(
        ctx.award(AchievementKind::KeywordAddict, player, count)
            .with_title(ctx.options.keyword_title())
            .with_detail(AchievementDetail::Tracks { tracks }),
    )
}

/// Tracks that any record, of any date, lists on the featured server.
pub fn featured_tracks<'a, I>(records: I, options: &AchievementOptions) -> HashSet<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let Some(pattern) = options.featured_server.as_ref() else {
        return HashSet::new();
    };
    records
        .into_iter()
        .filter(|r| r.server_label.as_deref().is_some_and(|s| pattern.is_match(s)))
        .map(|r| r.track_id.clone())
        .collect()
}

/// Most distinct featured tracks driven this window, on any server (raw attempts).
///
/// Whether a track is featured comes from [`AnalyzerContext::featured_tracks`],
/// which covers the whole record history rather than just the window.
pub fn server_champion(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    ctx.options.featured_server.as_ref()?;
    let featured = ctx.featured_tracks;
    if featured.is_empty() {
        return None;
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut tally = Tally::new();
    for record in ctx.raw {
        let track = record.track_id.as_str();
        if featured.contains(track) && seen.insert((record.player_id.as_str(), track)) {
            tally.add(&record.player_id, 1);
        }
    }
    let (player, count) = tally.leader()?;
    Some(
        ctx.award(AchievementKind::ServerChampion, player, count)
            .with_title(ctx.options.featured_server_title.clone()),
    )
}
