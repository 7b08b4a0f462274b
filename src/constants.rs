pub const READY_DELAY_MS: u64 = 2_000;
pub const TICK_INTERVAL_MS: u64 = 2_500;
pub const TOKEN_COUNT: usize = 30;
pub const EVENT_BUFFER: usize = 64;
pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_INITIAL_BACKOFF_MS: u64 = 250;
pub const RETRY_MAX_BACKOFF_MS: u64 = 2_000;
pub const MIN_PRICE: f64 = 1e-9;
pub const MIN_PRICE_CHANGE_PCT: f64 = -100.0;
