use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Listing tab a token belongs to. Assigned at creation and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    New,
    FinalStretch,
    Migrated,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::New, Category::FinalStretch, Category::Migrated];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::New => "new",
            Category::FinalStretch => "finalStretch",
            Category::Migrated => "migrated",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::New => "New Pairs",
            Category::FinalStretch => "Final Stretch",
            Category::Migrated => "Migrated",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::New => 0,
            Category::FinalStretch => 1,
            Category::Migrated => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "new-pairs" | "new_pairs" => Ok(Category::New),
            "finalstretch" | "final-stretch" | "final_stretch" => Ok(Category::FinalStretch),
            "migrated" => Ok(Category::Migrated),
            other => Err(format!(
                "unknown category {other:?}; expected one of new, final-stretch, migrated"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

/// One row of mock listing data.
///
/// `is_hot`, `is_new`, `verified` and `trend` are independent cosmetic labels;
/// nothing ties them to the numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub category: Category,
    pub price: f64,
    pub price_change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub holders: u64,
    pub liquidity: f64,
    pub progress: f64,
    pub created_at: u64,
    pub tx_count: u64,
    pub color_gradient: String,
    pub is_hot: bool,
    pub is_new: bool,
    pub verified: bool,
    pub trend: Trend,
    pub last_update: u64,
}

/// Fields a derived view can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Symbol,
    Price,
    PriceChange24h,
    Volume24h,
    MarketCap,
    Holders,
    Liquidity,
    Progress,
    CreatedAt,
    TxCount,
    LastUpdate,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::Name,
        SortKey::Symbol,
        SortKey::Price,
        SortKey::PriceChange24h,
        SortKey::Volume24h,
        SortKey::MarketCap,
        SortKey::Holders,
        SortKey::Liquidity,
        SortKey::Progress,
        SortKey::CreatedAt,
        SortKey::TxCount,
        SortKey::LastUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Symbol => "symbol",
            SortKey::Price => "price",
            SortKey::PriceChange24h => "priceChange24h",
            SortKey::Volume24h => "volume24h",
            SortKey::MarketCap => "marketCap",
            SortKey::Holders => "holders",
            SortKey::Liquidity => "liquidity",
            SortKey::Progress => "progress",
            SortKey::CreatedAt => "createdAt",
            SortKey::TxCount => "txCount",
            SortKey::LastUpdate => "lastUpdate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sort key {wanted:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction {other:?}; expected asc or desc")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    pub fn descending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Descending)
    }

    /// Column-header click: the active key flips from descending to
    /// ascending, anything else starts descending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        Self { key, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::descending(SortKey::Volume24h)
    }
}
