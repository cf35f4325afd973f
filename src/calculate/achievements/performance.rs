//! How well people race: podium counts, track ownership, slumps.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{AnalyzerContext, Tally};
use crate::models::{
    AchievementDetail, AchievementKind, AchievementResult, Rank, Record, RecordTimestamp,
    UNRANKED_SENTINEL,
};

fn most_at_position(
    ctx: &AnalyzerContext<'_>,
    kind: AchievementKind,
    position: u32,
) -> Option<AchievementResult> {
    let mut tally = Tally::new();
    for record in ctx.dedup.iter() {
        let count = tally.touch(&record.player_id);
        if record.rank.position() == Some(position) {
            *count += 1;
        }
    }
    let (player, count) = tally.leader()?;
    Some(ctx.award(kind, player, count))
}

/// Most first places (deduplicated).
pub fn lucky_number(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    most_at_position(ctx, AchievementKind::LuckyNumber, 1)
}

/// Most second places (deduplicated).
pub fn first_loser(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    most_at_position(ctx, AchievementKind::FirstLoser, 2)
}

/// Most third places (deduplicated).
pub fn third_times_the_charm(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    most_at_position(ctx, AchievementKind::ThirdTimesTheCharm, 3)
}

/// Most tracks driven where nobody else has ever posted (deduplicated).
/// Tracks with unknown participation don't count.
pub fn solo_explorer(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let tally: Tally = ctx
        .dedup
        .iter()
        .filter(|r| ctx.info.participants(&r.track_id) == Some(1))
        .map(|r| r.player_id.as_str())
        .collect();
    let (player, tracks) = tally.leader()?;
    Some(ctx.award(AchievementKind::SoloExplorer, player, tracks))
}

/// Most tracks whose most recent first place belongs to the player (deduplicated).
pub fn track_king(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    // track -> (timestamp, holder); earlier entries keep equal timestamps
    let mut holders: BTreeMap<&str, (Option<RecordTimestamp>, &str)> = BTreeMap::new();
    let mut order: Vec<&str> = Vec::new();
    for record in ctx.dedup.iter() {
        if record.rank.position() != Some(1) {
            continue;
        }
        let player = record.player_id.as_str();
        if !order.contains(&player) {
            order.push(player);
        }
        match holders.get_mut(record.track_id.as_str()) {
            Some(held) if record.timestamp > held.0 => *held = (record.timestamp, player),
            Some(_) => {}
            None => {
                holders.insert(record.track_id.as_str(), (record.timestamp, player));
            }
        }
    }

    let mut tally = Tally::new();
    for player in order {
        tally.touch(player);
    }
    for (_, holder) in holders.values() {
        tally.add(*holder, 1);
    }
    let (player, count) = tally.leader()?;

    let tracks = holders
        .iter()
        .filter(|(_, (_, holder))| *holder == player)
        .map(|(track, _)| track.to_string())
        .collect();
    Some(
        ctx.award(AchievementKind::TrackKing, player, count)
            .with_detail(AchievementDetail::Tracks { tracks }),
    )
}

/// Fewest distinct tracks among everyone who raced (raw attempts).
///
/// Ties go to the worse average numeric rank; a player with no numeric rank
/// averages 999. Remaining ties go to the first player seen.
pub fn benchwarmer(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let mut order: Vec<&str> = Vec::new();
    let mut tracks: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut ranks: HashMap<&str, Vec<u32>> = HashMap::new();
    for record in ctx.raw {
        let player = record.player_id.as_str();
        tracks
            .entry(player)
            .or_insert_with(|| {
                order.push(player);
                HashSet::new()
            })
            .insert(record.track_id.as_str());
        if let Some(position) = record.rank.position() {
            ranks.entry(player).or_default().push(position);
        }
    }

    let average = |player: &str| match ranks.get(player) {
        Some(positions) if !positions.is_empty() => {
            positions.iter().map(|&p| p as f64).sum::<f64>() / positions.len() as f64
        }
        _ => UNRANKED_SENTINEL as f64,
    };

    let mut best: Option<(&str, u32, f64)> = None;
    for player in order {
        let count = tracks.get(player).map_or(0, |t| t.len() as u32);
        let avg = average(player);
        let better = match best {
            None => true,
            Some((_, best_count, best_avg)) => {
                count < best_count || (count == best_count && avg > best_avg)
            }
        };
        if better {
            best = Some((player, count, avg));
        }
    }

    let (player, count, average_rank) = best?;
    Some(
        ctx.award(AchievementKind::Benchwarmer, player, count)
            .with_detail(AchievementDetail::AverageRank { average_rank }),
    )
}

/// Largest rank worsening between two consecutive attempts on one track (raw attempts).
///
/// Attempts are taken in timestamp order. An empty rank counts as 999;
/// undated attempts and unparsable rank text are skipped. Players are walked
/// in first-seen order, then each player's tracks in first-seen order, and
/// the first drop found keeps a tie.
pub fn rage_quit(ctx: &AnalyzerContext<'_>) -> Option<AchievementResult> {
    let mut players: Vec<&str> = Vec::new();
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut attempts: HashMap<(&str, &str), Vec<&Record>> = HashMap::new();
    for record in ctx.raw {
        if record.timestamp.is_none() || matches!(record.rank, Rank::Unranked(_)) {
            continue;
        }
        if !players.contains(&record.player_id.as_str()) {
            players.push(&record.player_id);
        }
        let key = (record.player_id.as_str(), record.track_id.as_str());
        attempts
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    // stable, so tracks keep their first-seen order within a player
    order.sort_by_key(|(player, _)| players.iter().position(|p| p == player));

    let mut worst: Option<(&str, &str, u32, u32)> = None;
    for key in order {
        let Some(list) = attempts.get_mut(&key) else { continue };
        list.sort_by_key(|r| r.timestamp);
        for pair in list.windows(2) {
            let (before, after) = (pair[0].rank.coerced(), pair[1].rank.coerced());
            if after <= before {
                continue;
            }
            let drop = after - before;
            if worst.map_or(true, |(_, _, from, to)| drop > to - from) {
                worst = Some((key.0, key.1, before, after));
            }
        }
    }

    let (player, track, original_rank, final_rank) = worst?;
    Some(
        ctx.award(AchievementKind::RageQuit, player, final_rank - original_rank)
            .with_detail(AchievementDetail::RankDrop {
                track_id: track.to_string(),
                original_rank,
                final_rank,
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{rec, Harness};
    use super::*;
    use crate::models::ChallengeCompetitionInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_podium_counts_use_best_attempt() {
        let harness = Harness::new(vec![
            rec("alice", "A", "2", "2025-06-16"),
            rec("alice", "A", "1", "2025-06-17"),
            rec("bob", "B", "2", "2025-06-16"),
            rec("bob", "C", "2", "2025-06-16"),
            rec("carol", "C", "3", "2025-06-16"),
        ]);
        let ctx = harness.ctx();

        assert_eq!(lucky_number(&ctx).map(|a| (a.player_id, a.value)), Some(("alice".into(), 1)));
        assert_eq!(first_loser(&ctx).map(|a| (a.player_id, a.value)), Some(("bob".into(), 2)));
        assert_eq!(
            third_times_the_charm(&ctx).map(|a| (a.player_id, a.value)),
            Some(("carol".into(), 1))
        );
    }

    #[test]
    fn test_podium_none_when_nobody_placed() {
        let harness = Harness::new(vec![rec("alice", "A", "7", "2025-06-16")]);
        assert_eq!(lucky_number(&harness.ctx()), None);
    }

    #[test]
    fn test_solo_explorer() {
        let info: ChallengeCompetitionInfo =
            [("lonely1", 1), ("lonely2", 1), ("busy", 12)].into_iter().collect();
        let harness = Harness::new(vec![
            rec("alice", "busy", "1", "2025-06-16"),
            rec("bob", "lonely1", "1", "2025-06-16"),
            rec("bob", "lonely1", "1", "2025-06-17"),
            rec("bob", "lonely2", "1", "2025-06-17"),
            rec("carol", "unknown", "1", "2025-06-17"),
        ])
        .with_info(info);

        let award = solo_explorer(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "bob");
        assert_eq!(award.value, 2);
    }

    #[test]
    fn test_track_king_latest_holder() {
        let harness = Harness::new(vec![
            rec("alice", "A", "1", "2025-06-14 10:00:00"),
            rec("bob", "A", "1", "2025-06-15 10:00:00"),
            rec("bob", "B", "1", "2025-06-15 11:00:00"),
            rec("alice", "C", "1", "2025-06-16 09:00:00"),
            rec("carol", "B", "2", "2025-06-16 09:00:00"),
        ]);
        let award = track_king(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "bob");
        assert_eq!(award.value, 2);
        assert_eq!(
            award.detail,
            AchievementDetail::Tracks {
                tracks: vec!["A".to_string(), "B".to_string()]
            }
        );
    }

    #[test]
    fn test_benchwarmer_tiebreak_on_average_rank() {
        let harness = Harness::new(vec![
            rec("alice", "A", "1", "2025-06-16"),
            rec("alice", "B", "1", "2025-06-16"),
            rec("bob", "A", "4", "2025-06-16"),
            rec("carol", "A", "9", "2025-06-16"),
            rec("carol", "A", "7", "2025-06-17"),
        ]);
        let award = benchwarmer(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "carol");
        assert_eq!(award.value, 1);
        assert_eq!(award.detail, AchievementDetail::AverageRank { average_rank: 8.0 });
    }

    #[test]
    fn test_benchwarmer_unranked_average_is_worst() {
        let harness = Harness::new(vec![
            rec("bob", "A", "40", "2025-06-16"),
            rec("dave", "A", "--", "2025-06-16"),
        ]);
        let award = benchwarmer(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "dave");
        assert_eq!(award.detail, AchievementDetail::AverageRank { average_rank: 999.0 });
    }

    #[test]
    fn test_rage_quit_consecutive_chronological() {
        let harness = Harness::new(vec![
            // listed out of order on purpose
            rec("alice", "A", "9", "2025-06-16 12:00:00"),
            rec("alice", "A", "2", "2025-06-16 10:00:00"),
            rec("alice", "A", "3", "2025-06-16 11:00:00"),
            rec("bob", "B", "1", "2025-06-16 10:00:00"),
            rec("bob", "B", "7", "2025-06-17 10:00:00"),
            rec("bob", "C", "1", "2025-06-16 10:00:00"),
            rec("bob", "C", "50", "2025-06-17 10:00:00"),
            rec("bob", "C", "x", "2025-06-18 10:00:00"),
        ]);
        let award = rage_quit(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "bob");
        assert_eq!(award.value, 49);
        assert_eq!(
            award.detail,
            AchievementDetail::RankDrop {
                track_id: "C".to_string(),
                original_rank: 1,
                final_rank: 50,
            }
        );
    }

    #[test]
    fn test_rage_quit_empty_rank_counts_as_worst() {
        let harness = Harness::new(vec![
            rec("alice", "A", "2", "2025-06-16 10:00:00"),
            rec("alice", "A", "", "2025-06-16 11:00:00"),
            rec("alice", "A", "DNF", "2025-06-16 12:00:00"),
        ]);
        let award = rage_quit(&harness.ctx()).unwrap();
        assert_eq!(award.value, 997);
        assert_eq!(
            award.detail,
            AchievementDetail::RankDrop {
                track_id: "A".to_string(),
                original_rank: 2,
                final_rank: 999,
            }
        );
    }

    #[test]
    fn test_rage_quit_tie_goes_to_first_player_seen() {
        let harness = Harness::new(vec![
            rec("alice", "A", "1", "2025-06-16 10:00:00"),
            rec("bob", "B", "1", "2025-06-16 10:00:00"),
            rec("bob", "B", "6", "2025-06-16 11:00:00"),
            // alice's second track appears after bob's, still walked first
            rec("alice", "C", "2", "2025-06-16 10:00:00"),
            rec("alice", "C", "7", "2025-06-16 11:00:00"),
            rec("alice", "A", "3", "2025-06-16 11:00:00"),
        ]);
        let award = rage_quit(&harness.ctx()).unwrap();
        assert_eq!(award.player_id, "alice");
        assert_eq!(award.value, 5);
        assert_eq!(
            award.detail,
            AchievementDetail::RankDrop {
                track_id: "C".to_string(),
                original_rank: 2,
                final_rank: 7,
            }
        );
    }

    #[test]
    fn test_rage_quit_ignores_improvements() {
        let harness = Harness::new(vec![
            rec("alice", "A", "9", "2025-06-16 10:00:00"),
            rec("alice", "A", "2", "2025-06-16 11:00:00"),
        ]);
        assert_eq!(rage_quit(&harness.ctx()), None);
    }

    #[test]
    fn test_empty_input_awards_nothing() {
        let harness = Harness::new(vec![]);
        let ctx = harness.ctx();
        assert!(solo_explorer(&ctx).is_none());
        assert!(track_king(&ctx).is_none());
        assert!(benchwarmer(&ctx).is_none());
        assert!(rage_quit(&ctx).is_none());
    }
}
