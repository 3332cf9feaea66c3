//! Outgoing turn assembly helpers
//!
//! A prepared turn pairs the wire request with the generation token it was
//! built under, so a reply arriving after a session reset can be told apart
//! from a current one. This module also owns the deterministic query text
//! synthesized for filter-only sends.

use crate::api::types::{ChatRequest, FilterSet};

/// An outgoing request tied to the session generation it was built under
///
/// Produced by `ChatSession::begin_send` / `begin_regenerate`; the matching
/// `apply_reply` / `apply_failure` call must present the same generation.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    /// The wire request to dispatch
    pub request: ChatRequest,
    /// Generation token captured at build time
    pub generation: u64,
}

/// Synthesizes query text from a non-empty filter set
///
/// Used when the user sends with empty input but active filters, so a
/// filter-only interaction still produces a coherent user-visible turn.
/// Fixed order: brand, category, tags, then a price clause.
pub(crate) fn synthesized_query(filters: &FilterSet) -> String {
    let mut parts = vec!["recommend".to_string()];
    if let Some(brand) = &filters.brand {
        parts.push(brand.clone());
    }
    if let Some(category) = &filters.category {
        parts.push(category.clone());
    }
    if let Some(tags) = &filters.tags_contains {
        parts.push(tags.clone());
    }
    if let Some(price_max) = filters.price_max {
        parts.push(format!("under ${}", format_price(price_max)));
    }
    parts.join(" ")
}

/// Formats a price without a trailing `.0` for whole numbers
fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{}", price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_query_brand_and_price() {
        let filters = FilterSet {
            brand: Some("Nike".to_string()),
            price_max: Some(30.0),
            ..Default::default()
        };
        assert_eq!(synthesized_query(&filters), "recommend Nike under $30");
    }

    #[test]
    fn test_synthesized_query_fixed_order() {
        let filters = FilterSet {
            tags_contains: Some("breathable".to_string()),
            category: Some("t-shirt".to_string()),
            brand: Some("Nike".to_string()),
            price_max: Some(29.99),
            price_min: Some(10.0),
        };
        assert_eq!(
            synthesized_query(&filters),
            "recommend Nike t-shirt breathable under $29.99"
        );
    }

    #[test]
    fn test_synthesized_query_without_price() {
        let filters = FilterSet {
            category: Some("sneakers".to_string()),
            ..Default::default()
        };
        assert_eq!(synthesized_query(&filters), "recommend sneakers");
    }

    #[test]
    fn test_format_price_trims_whole_numbers() {
        assert_eq!(format_price(30.0), "30");
        assert_eq!(format_price(29.99), "29.99");
        assert_eq!(format_price(0.5), "0.5");
    }
}
