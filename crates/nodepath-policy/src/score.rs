//! Path-count node score.
//!
//! Every eligible node starts at [`BASE_SCORE`]; each path explicitly
//! declared for it adds [`PER_PATH_BONUS`]. Nodes admitted only through
//! the default path get the base score.

/// Score of an eligible node with no declared paths.
pub const BASE_SCORE: i64 = 50;

/// Added per declared path.
pub const PER_PATH_BONUS: i64 = 10;

/// Score a node given its declared paths and an optional cap.
///
/// Saturates instead of overflowing, so the result is monotonic in the
/// path count up to `max_score` (or `i64::MAX`).
pub fn path_score(paths: Option<&[String]>, max_score: Option<i64>) -> i64 {
    let count = paths.map_or(0, <[String]>::len);
    let bonus = i64::try_from(count)
        .unwrap_or(i64::MAX)
        .saturating_mul(PER_PATH_BONUS);
    let score = BASE_SCORE.saturating_add(bonus);
    match max_score {
        Some(cap) => score.min(cap),
        None => score,
    }
}
