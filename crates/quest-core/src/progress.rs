//! Progress arithmetic.

use quest_model::Count;

/// New progress after adding `delta`, capped at `target`.
///
/// The cap is one-sided: once `current` has reached `target` every further delta is a no-op,
/// and a zero target always yields zero.
#[inline]
pub fn advance(current: Count, delta: Count, target: Count) -> Count {
    current.saturating_add(delta).min(target)
}
