//! Competition multiplier.

/// Scale a track's points by how contested it is.
///
/// Unknown or non-positive participant counts earn half credit.
pub fn competition_multiplier(total_participants: Option<i64>) -> f64 {
    match total_participants {
        None => 0.5,
        Some(n) if n <= 0 => 0.5,
        Some(1) => 0.1,
        Some(2..=4) => 0.2,
        Some(5..=9) => 0.4,
        Some(10..=14) => 0.6,
        Some(15..=19) => 0.8,
        Some(_) => 1.0,
    }
}
