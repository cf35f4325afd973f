//! Raw row → `Record` conversion.
//!
//! Rows arrive as plain string fields. Which field is which depends on the
//! source: the stored table has a fixed column order with the login first,
//! while a scraped page names its columns in a header row and leaves the
//! player implicit. A [`RowLayout`] captures either shape.

use crate::models::{Rank, Record, TimeValue};

/// Column positions of the record fields inside a raw row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLayout {
    pub player: Option<usize>,
    pub display_name: Option<usize>,
    pub track: Option<usize>,
    pub time: Option<usize>,
    pub rank: Option<usize>,
    pub timestamp: Option<usize>,
    pub environment: Option<usize>,
    pub mode: Option<usize>,
    pub server: Option<usize>,
}

impl RowLayout {
    /// `player_login, NickName, Challenge, Record, Rank, RecordDate, Envir, Mode, server`
    pub fn stored() -> Self {
        Self {
            player: Some(0),
            display_name: Some(1),
            track: Some(2),
            time: Some(3),
            rank: Some(4),
            timestamp: Some(5),
            environment: Some(6),
            mode: Some(7),
            server: Some(8),
        }
    }

    /// Build a layout from a header row. Matching is case-insensitive and
    /// ignores surrounding whitespace; unknown headers are ignored.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut layout = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let name = header.as_ref().trim().to_lowercase();
            let slot = match name.as_str() {
                "player_login" | "login" | "player" => &mut layout.player,
                "nickname" | "nick" | "display_name" => &mut layout.display_name,
                "challenge" | "track" | "track_id" => &mut layout.track,
                "record" | "time" | "time_value" => &mut layout.time,
                "rank" => &mut layout.rank,
                "envir" | "environment" => &mut layout.environment,
                "mode" => &mut layout.mode,
                "server" | "server_label" => &mut layout.server,
                // "RecordDate" sometimes carries a suffix such as "RecordDate (UTC)"
                n if n.starts_with("recorddate") || n == "timestamp" || n == "date" => {
                    &mut layout.timestamp
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(index);
            }
        }
        layout
    }

    /// Whether rows in this layout name their own player.
    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }
}

fn field<'a, S: AsRef<str>>(row: &'a [S], index: Option<usize>) -> &'a str {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.as_ref().trim())
        .unwrap_or("")
}

/// Convert one raw row into a `Record`.
///
/// `player_id` is used when the layout has no player column, or when that
/// column is empty. Nothing is validated: absent fields become empty values
/// and malformed ranks or times are carried through as-is.
pub fn normalize_row<S: AsRef<str>>(row: &[S], layout: &RowLayout, player_id: &str) -> Record {
    let player = match field(row, layout.player) {
        "" => player_id,
        login => login,
    };

    Record::new(player, field(row, layout.track))
        .with_display_name(field(row, layout.display_name))
        .with_time(TimeValue::new(field(row, layout.time)))
        .with_rank(Rank::parse(field(row, layout.rank)))
        .with_timestamp_str(field(row, layout.timestamp))
        .with_environment(field(row, layout.environment))
        .with_mode(field(row, layout.mode))
        .with_server(field(row, layout.server))
}

/// Normalize a batch of rows for one player.
pub fn normalize_rows<S: AsRef<str>>(
    rows: &[Vec<S>],
    layout: &RowLayout,
    player_id: &str,
) -> Vec<Record> {
    rows.iter()
        .map(|row| normalize_row(row, layout, player_id))
        .collect()
}
