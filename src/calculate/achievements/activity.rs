//! When people race: time-of-day and calendar awards. All read raw attempts.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::{AnalyzerContext, Tally};
use crate::models::{AchievementDetail, AchievementKind, AchievementResult};

/// Most attempts inside the night hours. Date-only records have no hour and don't count.
pub fn night_owl(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let (start, end) = (ctx.options.night_start_hour, ctx.options.night_end_hour);
    let tally: Tally = ctx
        .raw
        .iter()
        .filter(|r| {
            r.timestamp
                .and_then(|t| t.hour())
                .is_some_and(|h| start <= h && h <= end)
        })
        .map(|r| r.player_id.as_str())
        .collect();

    let (player, count) = tally.leader()?;
    Some(ctx.award(AchievementKind::NightOwl, player, count))
}

/// Most weekend attempts, with the weekend share of the player's own attempts.
pub fn saturday_night_fever(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let mut weekend = Tally::new();
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for record in ctx.raw {
        let player = record.player_id.as_str();
        *totals.entry(player).or_default() += 1;
        if record.timestamp.is_some_and(|t| t.is_weekend()) {
            weekend.add(player, 1);
        }
    }

    let (player, count) = weekend.leader()?;
    let total = totals.get(player).copied().unwrap_or(count).max(1);
    let percentage = count as f64 / total as f64 * 100.0;
    Some(
        ctx.award(AchievementKind::SaturdayNightFever, player, count)
            .with_detail(AchievementDetail::Share { percentage }),
    )
}

/// Biggest single-day burst. Players and their days are walked in first-seen
/// order; a later day or player must beat the best strictly to take over.
pub fn just_one_more(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    // player -> (day, attempts), both in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut per_day: HashMap<&str, Vec<(NaiveDate, u32)>> = HashMap::new();
    for record in ctx.raw {
        let Some(date) = record.date() else { continue };
        let player = record.player_id.as_str();
        let days = per_day.entry(player).or_insert_with(|| {
            order.push(player);
            Vec::new()
        });
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, count)) => *count += 1,
            None => days.push((date, 1)),
        }
    }

    let mut best: Option<(&str, NaiveDate, u32)> = None;
    for player in order {
        for &(day, count) in &per_day[player] {
            if best.map_or(true, |(_, _, b)| count > b) {
                best = Some((player, day, count));
            }
        }
    }

    let (player, date, count) = best?;
    Some(
        ctx.award(AchievementKind::JustOneMore, player, count)
            .with_detail(AchievementDetail::Day { date }),
    )
}

/// Most distinct active days.
pub fn creature_of_habit(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let mut seen: HashSet<(&str, NaiveDate)> = HashSet::new();
    let mut tally = Tally::new();
    for record in ctx.raw {
        let Some(date) = record.date() else { continue };
        let player = record.player_id.as_str();
        if seen.insert((player, date)) {
            tally.add(player, 1);
        }
    }

    let (player, days) = tally.leader()?;
    Some(ctx.award(AchievementKind::CreatureOfHabit, player, days))
}

/// Most distinct clock hours with an attempt.
pub fn caffeine_addict(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let mut seen: HashSet<(&str, u32)> = HashSet::new();
    let mut tally = Tally::new();
    for record in ctx.raw {
        let Some(hour) = record.timestamp.and_then(|t| t.hour()) else {
            continue;
        };
        let player = record.player_id.as_str();
        if seen.insert((player, hour)) {
            tally.add(player, 1);
        }
    }

    let (player, hours) = tally.leader()?;
    Some(ctx.award(AchievementKind::CaffeineAddict, player, hours))
}
