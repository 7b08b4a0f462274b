use rand::rngs::StdRng;
use rand::Rng;

use crate::constants::{MIN_PRICE, MIN_PRICE_CHANGE_PCT};
use crate::model::{Category, Token, Trend};

const NAMES: [&str; 10] = [
    "PEPE", "DOGE", "SHIB", "FLOKI", "BONK", "WIF", "BOME", "MEME", "WOJAK", "PEPE2",
];

const GRADIENTS: [&str; 5] = [
    "from-blue-400 to-purple-500",
    "from-green-400 to-teal-500",
    "from-pink-400 to-rose-500",
    "from-orange-400 to-red-500",
    "from-indigo-400 to-blue-500",
];

const WEEK_MS: f64 = 7.0 * 86_400_000.0;

/// How far numeric fields may wander under repeated ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DriftPolicy {
    /// Price stays strictly positive, volume non-negative, and the 24h change
    /// never drops below -100%.
    #[default]
    Clamped,
    Unbounded,
}

/// Width of the random steps applied on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    /// Total width of the uniform multiplicative price step (0.03 → ±1.5%).
    pub price_swing: f64,
    /// Half-width of the additive step applied to the 24h change percentage.
    pub change_swing: f64,
    /// Total width of the multiplicative volume step (0.1 → ±5%).
    pub volume_swing: f64,
    pub drift: DriftPolicy,
}

impl Default for Perturbation {
    fn default() -> Self {
        Self {
            price_swing: 0.03,
            change_swing: 1.0,
            volume_swing: 0.1,
            drift: DriftPolicy::default(),
        }
    }
}

pub fn generate_tokens(count: usize, rng: &mut StdRng, now_ms: u64) -> Vec<Token> {
    (0..count).map(|i| generate_token(i, rng, now_ms)).collect()
}

fn generate_token(i: usize, rng: &mut StdRng, now_ms: u64) -> Token {
    let category = Category::ALL[i % Category::ALL.len()];
    let name = NAMES[i % NAMES.len()];

    let progress = match category {
        Category::FinalStretch => rng.gen_range(60.0..95.0),
        _ => rng.gen_range(0.0..100.0),
    };
    let age_ms = rng.gen_range(0.0..WEEK_MS) as u64;

    Token {
        id: format!("token-{i}"),
        name: name.to_string(),
        symbol: format!("{name}{i}"),
        category,
        price: rng.gen_range(0.0..10.0),
        price_change_24h: rng.gen_range(-25.0..25.0),
        volume_24h: rng.gen_range(0.0..1_000_000.0),
        market_cap: rng.gen_range(0.0..10_000_000.0),
        holders: rng.gen_range(0..10_000),
        liquidity: rng.gen_range(0.0..500_000.0),
        progress,
        created_at: now_ms.saturating_sub(age_ms),
        tx_count: rng.gen_range(0..5_000),
        color_gradient: GRADIENTS[i % GRADIENTS.len()].to_string(),
        is_hot: rng.gen_bool(0.3),
        is_new: category == Category::New && rng.gen_bool(0.5),
        verified: rng.gen_bool(0.7),
        trend: if rng.gen_bool(0.5) { Trend::Up } else { Trend::Down },
        last_update: now_ms,
    }
}

/// Produce the next generation of `tokens`; the input is left untouched.
pub fn perturb_tokens(
    tokens: &[Token],
    rng: &mut StdRng,
    now_ms: u64,
    step: &Perturbation,
) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| perturb_token(token, rng, now_ms, step))
        .collect()
}

fn perturb_token(token: &Token, rng: &mut StdRng, now_ms: u64, step: &Perturbation) -> Token {
    let price_delta = symmetric(rng, step.price_swing / 2.0);
    let change_delta = symmetric(rng, step.change_swing);
    let volume_delta = symmetric(rng, step.volume_swing / 2.0);

    let mut price = token.price * (1.0 + price_delta);
    let mut price_change_24h = token.price_change_24h + change_delta;
    let mut volume_24h = token.volume_24h * (1.0 + volume_delta);

    if step.drift == DriftPolicy::Clamped {
        price = price.max(MIN_PRICE);
        price_change_24h = price_change_24h.max(MIN_PRICE_CHANGE_PCT);
        volume_24h = volume_24h.max(0.0);
    }

    Token {
        price,
        price_change_24h,
        volume_24h,
        last_update: now_ms,
        trend: if price_delta > 0.0 { Trend::Up } else { Trend::Down },
        ..token.clone()
    }
}

fn symmetric(rng: &mut StdRng, half_width: f64) -> f64 {
    if half_width <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half_width..half_width)
}
