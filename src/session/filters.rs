//! One-shot filter panel
//!
//! Filters apply to the next outgoing turn only: the turn builder takes a
//! snapshot and clears the live set when it contributed at least one
//! non-empty value. Keys are normalized on write — an empty value removes
//! the key, so a key is never present with an empty-string equivalent.

use crate::api::types::FilterSet;
use std::fmt;

/// The enumerated filter keys surfaced to the user as chips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    /// Exact brand match
    Brand,
    /// Category match
    Category,
    /// Lower price bound
    PriceMin,
    /// Upper price bound
    PriceMax,
    /// Tag substring match
    TagsContains,
}

impl FilterKey {
    /// Parse a filter key from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use shopchat::session::FilterKey;
    ///
    /// let key = FilterKey::parse_str("price_max").unwrap();
    /// assert_eq!(key, FilterKey::PriceMax);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "brand" => Ok(Self::Brand),
            "category" => Ok(Self::Category),
            "price_min" => Ok(Self::PriceMin),
            "price_max" => Ok(Self::PriceMax),
            "tags" | "tags_contains" => Ok(Self::TagsContains),
            other => Err(format!("Unknown filter key: {}", other)),
        }
    }

    /// Wire name of this key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Category => "category",
            Self::PriceMin => "price_min",
            Self::PriceMax => "price_max",
            Self::TagsContains => "tags_contains",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Live filter state for the session
///
/// Created once per session, mutated by user edits, consumed by the turn
/// builder. All writes normalize: whitespace is trimmed, empty values
/// remove the key, price values must parse as non-negative numbers.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    active: FilterSet,
}

impl FilterPanel {
    /// Creates an empty panel
    pub fn new() -> Self {
        Self::default()
    }

    /// The current live filter set
    pub fn current(&self) -> &FilterSet {
        &self.active
    }

    /// True when no filter is active
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Sets one key from raw user input
    ///
    /// An empty (or whitespace-only) value removes the key. Price keys
    /// must parse as non-negative numbers.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for direct display when a price value
    /// does not parse or is negative.
    pub fn set(&mut self, key: FilterKey, raw: &str) -> Result<(), String> {
        let value = raw.trim();
        if value.is_empty() {
            self.remove(key);
            return Ok(());
        }

        match key {
            FilterKey::Brand => self.active.brand = Some(value.to_string()),
            FilterKey::Category => self.active.category = Some(value.to_string()),
            FilterKey::TagsContains => self.active.tags_contains = Some(value.to_string()),
            FilterKey::PriceMin | FilterKey::PriceMax => {
                let price: f64 = value
                    .trim_start_matches('$')
                    .parse()
                    .map_err(|_| format!("{} must be a number, got '{}'", key, value))?;
                if price < 0.0 {
                    return Err(format!("{} must not be negative", key));
                }
                if key == FilterKey::PriceMin {
                    self.active.price_min = Some(price);
                } else {
                    self.active.price_max = Some(price);
                }
            }
        }
        Ok(())
    }

    /// Removes one key, leaving the others intact (chip removal)
    pub fn remove(&mut self, key: FilterKey) {
        match key {
            FilterKey::Brand => self.active.brand = None,
            FilterKey::Category => self.active.category = None,
            FilterKey::PriceMin => self.active.price_min = None,
            FilterKey::PriceMax => self.active.price_max = None,
            FilterKey::TagsContains => self.active.tags_contains = None,
        }
    }

    /// Removes every key
    pub fn clear(&mut self) {
        self.active = FilterSet::default();
    }

    /// Consumes the live set for an outgoing turn
    ///
    /// Returns a snapshot and clears the live set when at least one value
    /// is active; returns None and leaves the live set untouched when it
    /// is empty. Later edits never affect a returned snapshot.
    pub fn take_snapshot(&mut self) -> Option<FilterSet> {
        if self.active.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.active))
    }

    /// Active (key, value) pairs for display, in the fixed key order
    pub fn chips(&self) -> Vec<(FilterKey, String)> {
        let mut chips = Vec::new();
        if let Some(brand) = &self.active.brand {
            chips.push((FilterKey::Brand, brand.clone()));
        }
        if let Some(category) = &self.active.category {
            chips.push((FilterKey::Category, category.clone()));
        }
        if let Some(price_min) = self.active.price_min {
            chips.push((FilterKey::PriceMin, format!("{}", price_min)));
        }
        if let Some(price_max) = self.active.price_max {
            chips.push((FilterKey::PriceMax, format!("{}", price_max)));
        }
        if let Some(tags) = &self.active.tags_contains {
            chips.push((FilterKey::TagsContains, tags.clone()));
        }
        chips
    }
}
