//! Jittered exponential backoff between retry attempts.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (0-based): the base doubles per
/// attempt, capped, then jittered into the upper half of the window so
/// concurrent tasks don't resynchronize against the shared endpoint.
pub fn delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    let exp = base_ms.saturating_mul(1u64.checked_shl(attempt.min(20)).unwrap_or(u64::MAX));
    let capped = exp.min(max_ms).max(1);
    let jittered = rand::thread_rng().gen_range(capped / 2 + 1..=capped);
    Duration::from_millis(jittered)
}

/// Like [`delay`], but a server-provided retry hint takes precedence,
/// still clamped to the cap.
pub fn delay_with_hint(
    attempt: u32,
    base_ms: u64,
    max_ms: u64,
    hint_ms: Option<u64>,
) -> Duration {
    match hint_ms {
        Some(hint) => Duration::from_millis(hint.min(max_ms)),
        None => delay(attempt, base_ms, max_ms),
    }
}
