//! Policies that pick the single applicable record out of a candidate set.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::price::PriceRecord;

/// Chooses one record among candidates whose windows all contain the queried
/// instant. Returns `None` only for an empty slice.
///
/// Implementations must be deterministic: the same candidates in any order
/// yield the same record.
pub trait PriceSelectionStrategy: Send + Sync {
    fn select<'a>(&self, candidates: &'a [PriceRecord]) -> Option<&'a PriceRecord>;
}

/// Highest `priority` wins.
///
/// Equal priorities fall back to the smallest `price_list_id`, then the latest
/// `start_date`, then the smallest storage `id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighestPriority;

impl PriceSelectionStrategy for HighestPriority {
    fn select<'a>(&self, candidates: &'a [PriceRecord]) -> Option<&'a PriceRecord> {
        candidates.iter().max_by(|a, b| priority_precedence(a, b))
    }
}

/// Most recently started window wins; ties use [`HighestPriority`] ordering.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatestStart;

impl PriceSelectionStrategy for LatestStart {
    fn select<'a>(&self, candidates: &'a [PriceRecord]) -> Option<&'a PriceRecord> {
        candidates.iter().max_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| priority_precedence(a, b))
        })
    }
}

/// `Greater` means `a` takes precedence over `b`.
fn priority_precedence(a: &PriceRecord, b: &PriceRecord) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.price_list_id.cmp(&a.price_list_id))
        .then_with(|| a.start_date.cmp(&b.start_date))
        .then_with(|| b.id.cmp(&a.id))
}

/// Named selection policies that can be picked from configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    #[default]
    HighestPriority,
    LatestStart,
}

#[derive(Debug, Error)]
#[error("unknown price selection policy `{0}`")]
pub struct UnknownSelectionPolicy(pub String);

impl SelectionPolicy {
    pub fn strategy(self) -> Arc<dyn PriceSelectionStrategy> {
        match self {
            SelectionPolicy::HighestPriority => Arc::new(HighestPriority),
            SelectionPolicy::LatestStart => Arc::new(LatestStart),
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = UnknownSelectionPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest_priority" => Ok(SelectionPolicy::HighestPriority),
            "latest_start" => Ok(SelectionPolicy::LatestStart),
            other => Err(UnknownSelectionPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::HighestPriority => f.write_str("highest_priority"),
            SelectionPolicy::LatestStart => f.write_str("latest_start"),
        }
    }
}
