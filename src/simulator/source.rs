use std::error::Error;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;

use crate::constants::{RETRY_INITIAL_BACKOFF_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_BACKOFF_MS};
use crate::model::Token;

use super::generator::{generate_tokens, perturb_tokens, Perturbation};

/// Failure surfaced on the feed's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The initial collection could not be loaded within the retry budget.
    Unavailable { attempts: u32, last: String },
    Source(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Unavailable { attempts, last } => {
                write!(f, "feed unavailable after {attempts} attempt(s): {last}")
            }
            FeedError::Source(reason) => write!(f, "feed source error: {reason}"),
        }
    }
}

impl Error for FeedError {}

/// Where the simulator gets its rows from.
///
/// `snapshot` builds the collection delivered on readiness and `advance`
/// builds each following generation from the previous one.
pub trait TokenSource: Send + 'static {
    fn snapshot(&mut self, rng: &mut StdRng, now_ms: u64) -> Result<Vec<Token>, FeedError>;

    fn advance(
        &mut self,
        tokens: &[Token],
        rng: &mut StdRng,
        now_ms: u64,
    ) -> Result<Vec<Token>, FeedError>;
}

/// In-process random source. Never fails.
#[derive(Debug, Clone)]
pub struct MockSource {
    pub token_count: usize,
    pub step: Perturbation,
}

impl MockSource {
    pub fn new(token_count: usize, step: Perturbation) -> Self {
        Self { token_count, step }
    }
}

impl TokenSource for MockSource {
    fn snapshot(&mut self, rng: &mut StdRng, now_ms: u64) -> Result<Vec<Token>, FeedError> {
        Ok(generate_tokens(self.token_count, rng, now_ms))
    }

    fn advance(
        &mut self,
        tokens: &[Token],
        rng: &mut StdRng,
        now_ms: u64,
    ) -> Result<Vec<Token>, FeedError> {
        Ok(perturb_tokens(tokens, rng, now_ms, &self.step))
    }
}

/// Bounded exponential backoff for loading the initial collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt; the first failure is terminal.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` counts from 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(RETRY_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(RETRY_MAX_BACKOFF_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1_000));
        assert_eq!(policy.backoff(4), Duration::from_millis(2_000));
        assert_eq!(policy.backoff(40), Duration::from_millis(2_000));
    }

    #[test]
    fn mock_source_never_fails() {
        let mut source = MockSource::new(6, Perturbation::default());
        let mut rng = StdRng::seed_from_u64(1);

        let first = source.snapshot(&mut rng, 10).expect("snapshot");
        assert_eq!(first.len(), 6);
        let next = source.advance(&first, &mut rng, 20).expect("advance");
        assert_eq!(next.len(), 6);
        assert!(next.iter().all(|token| token.last_update == 20));
    }

    #[test]
    fn unavailable_error_mentions_attempts() {
        let err = FeedError::Unavailable {
            attempts: 3,
            last: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "feed unavailable after 3 attempt(s): connection refused"
        );
    }
}
