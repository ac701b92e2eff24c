/// Flat bonus for predicting the exact number of tricks.
pub const MATCH_BONUS: u32 = 10;
/// Points per trick won, paid only when the prediction was exact.
pub const POINTS_PER_TRICK_ON_MATCH: u32 = 2;

/// Points earned by one player for one round.
///
/// Returns `None` while either side is missing (no bid yet, or tricks not yet recorded).
/// An exact prediction pays `10 + 2 * actual`; a miss pays the raw trick count.
/// Widened to `u64` so no trick count a round accepts can overflow.
pub fn points(predicted: Option<u32>, actual: Option<u32>) -> Option<u64> {
    let (predicted, actual) = (predicted?, actual?);
    let tricks = u64::from(actual);
    if predicted == actual {
        Some(u64::from(MATCH_BONUS) + u64::from(POINTS_PER_TRICK_ON_MATCH) * tricks)
    } else {
        Some(tricks)
    }
}
