//! Retry policy
//!
//! Pure decision functions shared by every provider client: classify a
//! failure as transient or fatal, and compute the exponential backoff delay
//! between attempts. Attempts are infrequent interactive searches, so the
//! schedule carries no jitter.

use std::time::Duration;

use voyagr_domain::constants::{BASE_BACKOFF_MS, MAX_RETRIES};
use voyagr_domain::ProviderError;

/// Whether an HTTP status is safe to reattempt after a delay.
///
/// 429 (rate limit) and 5xx are transient. 401 is deliberately NOT
/// retryable: it must force a token refresh, which is a different control
/// path from a blind retry. Remaining 4xx mean the caller's input is wrong.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Whether a classified provider failure is safe to reattempt.
///
/// Network/connection failures (no status) are retryable; anything carrying
/// a status follows [`is_retryable_status`].
pub fn is_retryable(error: &ProviderError) -> bool {
    match error.status {
        Some(status) => is_retryable_status(status),
        None => error.retryable,
    }
}

/// Exponential backoff: `base * 2^attempt_index`, shift capped so the
/// multiplication cannot overflow.
pub fn backoff_delay(base: Duration, attempt_index: u32) -> Duration {
    let shift = attempt_index.min(8);
    base.saturating_mul(1u32 << shift)
}

/// Total attempts permitted: the first try plus [`MAX_RETRIES`] retries.
/// Exhausting the bound surfaces the last error to the caller verbatim.
pub fn max_attempts() -> u32 {
    MAX_RETRIES + 1
}

/// Default base delay for the backoff schedule.
pub fn default_base_backoff() -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(422));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn network_errors_are_retryable() {
        let err = ProviderError::network("amadeus", "connection reset");
        assert!(is_retryable(&err));
    }

    #[test]
    fn status_rule_overrides_for_http_errors() {
        assert!(is_retryable(&ProviderError::http("duffel", 500, "oops")));
        assert!(!is_retryable(&ProviderError::http("duffel", 401, "expired")));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(250));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
    }

    #[test]
    fn backoff_shift_is_capped() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff_delay(base, 64), backoff_delay(base, 8));
    }

    #[test]
    fn attempt_bound_is_small() {
        assert_eq!(max_attempts(), 3);
    }
}
