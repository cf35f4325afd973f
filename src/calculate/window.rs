//! Date window and roster filters.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::models::{Record, ReportWindow};

/// Records dated inside the window. Undated records never match.
pub fn filter_window<'a, I>(records: I, window: &ReportWindow) -> Vec<Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|r| r.date().is_some_and(|d| window.contains(d)))
        .cloned()
        .collect()
}

/// Keep only roster players. An empty roster keeps everyone.
pub fn filter_roster(records: Vec<Record>, roster: &[String]) -> Vec<Record> {
    if roster.is_empty() {
        return records;
    }
    let roster: HashSet<&str> = roster.iter().map(String::as_str).collect();
    records
        .into_iter()
        .filter(|r| roster.contains(r.player_id.as_str()))
        .collect()
}

/// Newest record date, used to pick a default window.
pub fn latest_date<'a, I>(records: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().filter_map(Record::date).max()
}

/// Pick the report window from optional bounds.
///
/// Both bounds give that exact range, a single bound gives the seven days
/// starting or ending on it, and no bounds give the week ending on
/// `fallback_end`. Returns `None` when `from` is after `to`.
pub fn select_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    fallback_end: NaiveDate,
) -> Option<ReportWindow> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => None,
        (Some(from), Some(to)) => Some(ReportWindow::new(from, to)),
        (Some(from), None) => Some(ReportWindow::new(from, from + Duration::days(6))),
        (None, Some(to)) => Some(ReportWindow::week_ending(to)),
        (None, None) => Some(ReportWindow::week_ending(fallback_end)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(player: &str, ts: &str) -> Record {
        Record::new(player, "T").with_timestamp_str(ts)
    }

    #[test]
    fn test_filter_window_inclusive() {
        let records = vec![
            rec("a", "2025-06-11 23:59:59"),
            rec("a", "2025-06-12 00:00:00"),
            rec("a", "2025-06-18"),
            rec("a", "2025-06-19 00:00:01"),
            rec("a", ""),
        ];
        let window = ReportWindow::new(
            NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
        );
        assert_eq!(filter_window(&records, &window).len(), 2);
    }

    #[test]
    fn test_filter_roster() {
        let records = vec![rec("alice", "2025-06-12"), rec("mallory", "2025-06-12")];
        let kept = filter_roster(records.clone(), &["alice".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(filter_roster(records, &[]).len(), 2);
    }

    #[test]
    fn test_latest_date() {
        let records = vec![rec("a", "2025-06-12"), rec("b", "2025-06-20 08:00:00"), rec("c", "")];
        assert_eq!(latest_date(&records), NaiveDate::from_ymd_opt(2025, 6, 20));
        assert_eq!(latest_date(&Vec::<Record>::new()), None);
    }

    #[test]
    fn test_select_window() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();

        assert_eq!(select_window(None, None, d(18)), Some(ReportWindow::new(d(12), d(18))));
        assert_eq!(select_window(None, Some(d(20)), d(18)), Some(ReportWindow::new(d(14), d(20))));
        assert_eq!(select_window(Some(d(1)), None, d(18)), Some(ReportWindow::new(d(1), d(7))));
        assert_eq!(select_window(Some(d(3)), Some(d(4)), d(18)), Some(ReportWindow::new(d(3), d(4))));
        assert_eq!(select_window(Some(d(5)), Some(d(4)), d(18)), None);
    }
}
