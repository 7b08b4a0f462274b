use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{Category, SortDirection, SortKey, SortSpec, Token};

/// Tab, search text and ordering selected by the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub category: Category,
    pub search: Option<String>,
    pub sort: SortSpec,
}

impl ViewQuery {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            search: None,
            sort: SortSpec::default(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn derive(&self, tokens: &[Token]) -> Vec<Token> {
        derive_view(tokens, self.category, self.search.as_deref(), self.sort)
    }
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self::new(Category::New)
    }
}

/// Filter `tokens` to one category (and an optional case-insensitive name or
/// symbol match), then order them by `sort`.
///
/// Ties on the sort key fall back to ascending identifier order whatever the
/// direction, so repeated calls over the same input always agree.
pub fn derive_view(
    tokens: &[Token],
    category: Category,
    search: Option<&str>,
    sort: SortSpec,
) -> Vec<Token> {
    let needle = search
        .map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(str::to_lowercase);

    let mut rows: Vec<&Token> = tokens
        .iter()
        .filter(|token| token.category == category)
        .filter(|token| match &needle {
            Some(needle) => matches_search(token, needle),
            None => true,
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, sort.key);
        let ordering = match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });

    rows.into_iter().cloned().collect()
}

fn matches_search(token: &Token, needle: &str) -> bool {
    token.name.to_lowercase().contains(needle) || token.symbol.to_lowercase().contains(needle)
}

pub fn compare_by_key(a: &Token, b: &Token, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Symbol => a.symbol.cmp(&b.symbol),
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::PriceChange24h => a.price_change_24h.total_cmp(&b.price_change_24h),
        SortKey::Volume24h => a.volume_24h.total_cmp(&b.volume_24h),
        SortKey::MarketCap => a.market_cap.total_cmp(&b.market_cap),
        SortKey::Holders => a.holders.cmp(&b.holders),
        SortKey::Liquidity => a.liquidity.total_cmp(&b.liquidity),
        SortKey::Progress => a.progress.total_cmp(&b.progress),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::TxCount => a.tx_count.cmp(&b.tx_count),
        SortKey::LastUpdate => a.last_update.cmp(&b.last_update),
    }
}

/// Footer figures shown under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabCounts {
    pub total: usize,
    pub per_category: [usize; 3],
    pub visible: usize,
}

impl TabCounts {
    pub fn for_category(&self, category: Category) -> usize {
        self.per_category[category.index()]
    }
}

pub fn summarize(tokens: &[Token], query: &ViewQuery) -> TabCounts {
    let mut per_category = [0usize; 3];
    for token in tokens {
        per_category[token.category.index()] += 1;
    }

    TabCounts {
        total: tokens.len(),
        per_category,
        visible: query.derive(tokens).len(),
    }
}
