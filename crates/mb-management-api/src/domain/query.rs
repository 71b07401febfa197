//! Query filter engine shared by every list endpoint.
//!
//! Filtering always runs before pagination, so `offset`/`limit` index into
//! the filtered, order-stable set. Out-of-range windows produce an empty
//! result, never an error.

use crate::domain::error::{ManagementError, ManagementResult};
use crate::domain::types::Subscription;

/// Sentinel meaning "no filter".
pub const WILDCARD: &str = "*";

/// Case-sensitive substring filter on a display name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameFilter {
    #[default]
    Any,
    Contains(String),
}

impl NameFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            Self::Any
        } else {
            Self::Contains(raw.to_string())
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Contains(needle) => name.contains(needle.as_str()),
        }
    }
}

/// Exact-equality filter on a subscription's bound destination.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DestinationFilter {
    #[default]
    Any,
    Exact(String),
}

impl DestinationFilter {
    pub fn parse(raw: &str) -> Self {
        if raw == WILDCARD {
            Self::Any
        } else {
            Self::Exact(raw.to_string())
        }
    }

    pub fn matches(&self, destination: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => destination == expected,
        }
    }
}

/// Tri-state filter on the subscription active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    #[default]
    Any,
    Active,
    Inactive,
}

impl ActiveFilter {
    /// Accepts `*`, `true` or `false`; anything else is a caller error.
    pub fn parse(raw: &str) -> ManagementResult<Self> {
        match raw {
            WILDCARD => Ok(Self::Any),
            "true" => Ok(Self::Active),
            "false" => Ok(Self::Inactive),
            other => Err(ManagementError::invalid_identity(format!(
                "active filter must be '*', 'true' or 'false', got '{}'",
                other
            ))),
        }
    }

    pub fn matches(&self, active: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

/// Combined subscription filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubscriptionQuery {
    pub name: NameFilter,
    pub destination: DestinationFilter,
    pub active: ActiveFilter,
}

impl SubscriptionQuery {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.name.matches(&subscription.name)
            && self.destination.matches(&subscription.destination_name)
            && self.active.matches(subscription.active)
    }
}

/// Offset/limit window.
///
/// Values are kept signed as received so that negative input maps to an
/// empty window instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// First `limit` items.
    pub fn first(limit: i64) -> Self {
        Self::new(0, limit)
    }

    /// True if the window can never contain an item.
    pub fn is_empty(&self) -> bool {
        self.offset < 0 || self.limit < 1
    }

    pub fn start(&self) -> usize {
        usize::try_from(self.offset.max(0)).unwrap_or(usize::MAX)
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.limit.max(0)).unwrap_or(usize::MAX)
    }

    /// Slice an already filtered, order-stable sequence.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        if self.is_empty() {
            return Vec::new();
        }
        items.into_iter().skip(self.start()).take(self.len()).collect()
    }
}

/// Filter then paginate.
pub fn filter_page<T, F>(items: Vec<T>, predicate: F, page: Page) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    page.apply(items.into_iter().filter(|item| predicate(item)))
}

/// Starting point of a message browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAnchor {
    /// Messages with ID greater than or equal to this one.
    MessageId(u64),
    /// Zero-based position into the current ordering.
    Offset(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["orders", "orders-dlq", "payments", "audit", "Orders-eu"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_wildcard_returns_first_n() {
        let out = filter_page(names(), |n| NameFilter::parse("*").matches(n), Page::first(2));
        assert_eq!(out, vec!["orders", "orders-dlq"]);
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        let filter = NameFilter::parse("orders");
        let out = filter_page(names(), |n| filter.matches(n), Page::first(20));
        assert_eq!(out, vec!["orders", "orders-dlq"]);
    }

    #[test]
    fn test_filter_runs_before_pagination() {
        let filter = NameFilter::parse("s");
        // orders, orders-dlq, payments, Orders-eu -> skip 1, take 2
        let out = filter_page(names(), |n| filter.matches(n), Page::new(1, 2));
        assert_eq!(out, vec!["orders-dlq", "payments"]);
    }

    #[test]
    fn test_out_of_range_windows_are_empty() {
        assert!(Page::new(50, 10).apply(names()).is_empty());
        assert!(Page::new(-1, 10).apply(names()).is_empty());
        assert!(Page::new(0, 0).apply(names()).is_empty());
        assert!(Page::new(0, -5).apply(names()).is_empty());
    }

    #[test]
    fn test_every_window_is_a_contiguous_slice() {
        let all = names();
        for offset in 0..7 {
            for limit in 1..7 {
                let window = Page::new(offset, limit).apply(all.clone());
                let start = (offset as usize).min(all.len());
                let end = (start + limit as usize).min(all.len());
                assert_eq!(window, all[start..end].to_vec());
            }
        }
    }

    #[test]
    fn test_destination_filter_is_exact() {
        let filter = DestinationFilter::parse("orders");
        assert!(filter.matches("orders"));
        assert!(!filter.matches("orders-dlq"));
        assert!(DestinationFilter::parse("*").matches("anything"));
    }

    #[test]
    fn test_active_filter_tri_state() {
        assert_eq!(ActiveFilter::parse("*").unwrap(), ActiveFilter::Any);
        assert!(ActiveFilter::parse("true").unwrap().matches(true));
        assert!(!ActiveFilter::parse("false").unwrap().matches(true));
        let err = ActiveFilter::parse("yes").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
