mod generator;
mod source;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::constants::{EVENT_BUFFER, READY_DELAY_MS, TICK_INTERVAL_MS, TOKEN_COUNT};
use crate::logging;
use crate::model::Token;

pub use generator::{generate_tokens, perturb_tokens, DriftPolicy, Perturbation};
pub use source::{FeedError, MockSource, RetryPolicy, TokenSource};

/// Immutable generation of the token collection. Replaced wholesale on every
/// tick, so readers never observe a half-updated collection.
pub type Snapshot = Arc<[Token]>;

#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    pub ready_delay: Duration,
    pub tick_interval: Duration,
    pub token_count: usize,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub step: Perturbation,
    pub retry: RetryPolicy,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            ready_delay: Duration::from_millis(READY_DELAY_MS),
            tick_interval: Duration::from_millis(TICK_INTERVAL_MS),
            token_count: TOKEN_COUNT,
            seed: None,
            step: Perturbation::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Connection status as the consumer sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedPhase {
    Inactive,
    /// Activated, waiting for the initial collection.
    Connecting,
    Streaming,
    Failed,
}

#[derive(Clone, Debug)]
pub enum FeedEvent {
    Ready(Snapshot),
    Update(Snapshot),
    Failed(FeedError),
}

#[derive(Clone, Debug)]
struct FeedState {
    generation: u64,
    phase: FeedPhase,
    tokens: Snapshot,
}

impl FeedState {
    fn is_live(&self, generation: u64) -> bool {
        self.generation == generation && self.phase != FeedPhase::Inactive
    }
}

/// Owned mock feed. Each `activate` starts a fresh collection on a tokio task;
/// `deactivate` (or dropping the simulator) cancels it.
pub struct FeedSimulator {
    config: SimulatorConfig,
    source: Arc<Mutex<Box<dyn TokenSource>>>,
    state: Arc<watch::Sender<FeedState>>,
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl FeedSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let source = MockSource::new(config.token_count, config.step);
        Self::with_source(config, source)
    }

    pub fn with_source(config: SimulatorConfig, source: impl TokenSource) -> Self {
        let source: Box<dyn TokenSource> = Box::new(source);
        let (state, _) = watch::channel(FeedState {
            generation: 0,
            phase: FeedPhase::Inactive,
            tokens: empty_snapshot(),
        });

        Self {
            config,
            source: Arc::new(Mutex::new(source)),
            state: Arc::new(state),
            task: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Start a new activation, discarding any previous one, and return the
    /// subscription that receives its events. Must be called from inside a
    /// tokio runtime.
    pub fn activate(&mut self) -> FeedSubscription {
        self.cancel_task();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        self.state.send_replace(FeedState {
            generation,
            phase: FeedPhase::Connecting,
            tokens: empty_snapshot(),
        });

        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let task = FeedTask {
            generation,
            ready_delay: self.config.ready_delay,
            tick_interval: self.config.tick_interval,
            retry: self.config.retry,
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            events: events_tx,
            rng,
        };

        logging::info(
            "feed.activate",
            "Feed simulator activated",
            json!({
                "generation": generation,
                "ready_delay_ms": millis(self.config.ready_delay),
                "tick_interval_ms": millis(self.config.tick_interval),
                "token_count": self.config.token_count,
            }),
        );

        self.task = Some(tokio::spawn(task.run()));

        FeedSubscription {
            generation,
            events: events_rx,
            state: self.state.subscribe(),
        }
    }

    /// Cancel the pending readiness load and the tick interval. Safe to call
    /// in any phase; queued events on an earlier subscription are dropped.
    ///
    /// The generation moves on as well: an aborted task may still be inside a
    /// tick on another worker, and its writes must not land.
    pub fn deactivate(&mut self) {
        let was_running = self.task.is_some();
        self.cancel_task();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        self.state.send_modify(|state| {
            state.generation = generation;
            state.phase = FeedPhase::Inactive;
            state.tokens = empty_snapshot();
        });

        if was_running {
            logging::info(
                "feed.deactivate",
                "Feed simulator deactivated",
                json!({ "generation": self.generation }),
            );
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.state.borrow().phase
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Latest collection; empty until the feed is ready.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.state.borrow().tokens)
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FeedSimulator {
    fn drop(&mut self) {
        self.cancel_task();
    }
}

/// Receiving side of one activation.
pub struct FeedSubscription {
    generation: u64,
    events: mpsc::Receiver<FeedEvent>,
    state: watch::Receiver<FeedState>,
}

impl FeedSubscription {
    /// Next event of this activation, or `None` once it has been deactivated,
    /// superseded, or has failed.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        if !self.is_live() {
            return None;
        }
        let event = self.events.recv().await?;
        if self.is_live() {
            Some(event)
        } else {
            None
        }
    }

    /// Non-blocking variant of [`FeedSubscription::recv`].
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        if !self.is_live() {
            return None;
        }
        self.events.try_recv().ok()
    }

    pub fn phase(&self) -> FeedPhase {
        let state = self.state.borrow();
        if state.generation == self.generation {
            state.phase
        } else {
            FeedPhase::Inactive
        }
    }

    fn is_live(&self) -> bool {
        self.state.borrow().is_live(self.generation)
    }
}

struct FeedTask {
    generation: u64,
    ready_delay: Duration,
    tick_interval: Duration,
    retry: RetryPolicy,
    source: Arc<Mutex<Box<dyn TokenSource>>>,
    state: Arc<watch::Sender<FeedState>>,
    events: mpsc::Sender<FeedEvent>,
    rng: StdRng,
}

impl FeedTask {
    async fn run(mut self) {
        time::sleep(self.ready_delay).await;

        let initial = match self.load_initial().await {
            Ok(tokens) => tokens,
            Err(err) => {
                logging::error(
                    "feed.failed",
                    "Feed could not produce an initial collection",
                    json!({ "generation": self.generation, "error": err.to_string() }),
                );
                let failed = self.state.send_if_modified(|state| {
                    if !state.is_live(self.generation) {
                        return false;
                    }
                    state.phase = FeedPhase::Failed;
                    true
                });
                if failed {
                    self.emit(FeedEvent::Failed(err));
                }
                return;
            }
        };

        let Some(snapshot) = self.publish(initial, FeedPhase::Streaming) else {
            return;
        };
        logging::info(
            "feed.ready",
            "Initial token collection delivered",
            json!({ "generation": self.generation, "tokens": snapshot.len() }),
        );
        self.emit(FeedEvent::Ready(snapshot));

        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let current = Arc::clone(&self.state.borrow().tokens);
            let next = {
                let mut source = self.source.lock().await;
                source.advance(&current, &mut self.rng, current_timestamp_ms())
            };

            match next {
                Ok(tokens) => {
                    let Some(snapshot) = self.publish(tokens, FeedPhase::Streaming) else {
                        return;
                    };
                    self.emit(FeedEvent::Update(snapshot));
                }
                Err(err) => {
                    logging::warn(
                        "feed.tick_failed",
                        "Feed tick failed; keeping previous collection",
                        json!({ "generation": self.generation, "error": err.to_string() }),
                    );
                }
            }
        }
    }

    async fn load_initial(&mut self) -> Result<Vec<Token>, FeedError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let result = {
                let mut source = self.source.lock().await;
                source.snapshot(&mut self.rng, current_timestamp_ms())
            };

            match result {
                Ok(tokens) => return Ok(tokens),
                Err(err) if attempt < max_attempts => {
                    let backoff = self.retry.backoff(attempt);
                    logging::warn(
                        "feed.retry",
                        "Initial load failed, retrying",
                        json!({
                            "generation": self.generation,
                            "attempt": attempt,
                            "backoff_ms": millis(backoff),
                            "error": err.to_string(),
                        }),
                    );
                    time::sleep(backoff).await;
                }
                Err(err) => {
                    return Err(FeedError::Unavailable {
                        attempts: attempt,
                        last: err.to_string(),
                    })
                }
            }
        }
    }

    /// Store a new collection, unless this task has been superseded or
    /// deactivated in the meantime.
    fn publish(&self, tokens: Vec<Token>, phase: FeedPhase) -> Option<Snapshot> {
        let snapshot: Snapshot = tokens.into();
        let published = self.state.send_if_modified(|state| {
            if !state.is_live(self.generation) {
                return false;
            }
            state.phase = phase;
            state.tokens = Arc::clone(&snapshot);
            true
        });
        published.then_some(snapshot)
    }

    fn emit(&self, event: FeedEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                logging::warn(
                    "feed.lagged",
                    "Subscriber is not draining events; dropping one",
                    json!({ "generation": self.generation, "buffer": EVENT_BUFFER }),
                );
            }
            // Subscription dropped; snapshot readers still see every generation.
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

fn empty_snapshot() -> Snapshot {
    Vec::<Token>::new().into()
}

pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(millis)
        .unwrap_or_default()
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

pub mod testkit {
    use super::*;

    /// Activate a simulator and gather `count` events, then deactivate it.
    pub async fn collect_events(config: SimulatorConfig, count: usize) -> Result<Vec<FeedEvent>> {
        let mut simulator = FeedSimulator::new(config);
        let mut subscription = simulator.activate();

        let mut collected = Vec::with_capacity(count);
        while collected.len() < count {
            match subscription.recv().await {
                Some(event) => collected.push(event),
                None => bail!(
                    "feed closed after {} of {count} events",
                    collected.len()
                ),
            }
        }

        simulator.deactivate();
        Ok(collected)
    }
}
