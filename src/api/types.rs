//! Wire types for the recommendation backend contract
//!
//! These structures mirror the backend's request and response shapes
//! exactly. The backend owns their meaning; this client only serializes
//! and displays them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One product from the catalog, as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Category label
    pub category: String,
    /// Brand name
    pub brand: String,
    /// Price in `currency` units
    pub price: f64,
    /// Currency code
    pub currency: String,
    /// Product image URL
    #[serde(default)]
    pub image_url: String,
    /// Optional product page URL
    #[serde(default)]
    pub product_url: Option<String>,
    /// Comma-separated tag list
    #[serde(default)]
    pub tags: String,
}

/// Search constraints attached to a chat turn
///
/// Absence of a key means "no constraint"; the serializer omits absent
/// keys so the backend sees exactly the active ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Exact brand match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Category match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lower price bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    /// Upper price bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    /// Tag substring match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_contains: Option<String>,
}

impl FilterSet {
    /// Returns true when no constraint is set
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.category.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.tags_contains.is_none()
    }
}

/// One message in the wire format the backend expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// "user" or "assistant"
    pub role: String,
    /// Message text
    pub content: String,
}

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Full conversation so far, oldest first
    pub messages: Vec<WireMessage>,
    /// Base64-encoded image payload, if one is attached to this turn
    pub image_base64: Option<String>,
    /// How many products to return
    pub top_k: u32,
    /// Filter snapshot for this turn, or None when unconstrained
    pub filters: Option<FilterSet>,
}

/// Response body for `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text
    pub reply: String,
    /// Recommended products, ranked
    #[serde(default)]
    pub products: Vec<Product>,
    /// Opaque diagnostic record
    #[serde(default)]
    pub trace: serde_json::Value,
}

/// Response body for `GET /meta`
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMeta {
    /// Known brands, sorted
    #[serde(default)]
    pub brands: Vec<String>,
    /// Known categories, sorted
    #[serde(default)]
    pub categories: Vec<String>,
    /// Lowest catalog price
    #[serde(default)]
    pub price_min: f64,
    /// Highest catalog price
    #[serde(default)]
    pub price_max: f64,
}

/// Response body for `GET /similar/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    /// Similar products, ranked
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Evaluation job mode
///
/// Matches the mode switch in the backend's evaluation runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// Retrieval + intent classification only
    Quick,
    /// Every evaluation suite
    All,
    /// Retrieval metrics
    Retrieval,
    /// Intent classification accuracy
    Intent,
    /// Filter extraction accuracy
    Filters,
    /// Result diversity
    Diversity,
    /// Latency and throughput benchmarks
    Performance,
}

impl EvalMode {
    /// Parse an evaluation mode from a string
    ///
    /// # Arguments
    ///
    /// * `s` - Mode name, case-insensitive
    ///
    /// # Examples
    ///
    /// ```
    /// use shopchat::api::EvalMode;
    ///
    /// let mode = EvalMode::parse_str("quick").unwrap();
    /// assert_eq!(mode, EvalMode::Quick);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "all" => Ok(Self::All),
            "retrieval" => Ok(Self::Retrieval),
            "intent" => Ok(Self::Intent),
            "filters" => Ok(Self::Filters),
            "diversity" => Ok(Self::Diversity),
            "performance" => Ok(Self::Performance),
            other => Err(format!("Unknown evaluation mode: {}", other)),
        }
    }

    /// Wire name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::All => "all",
            Self::Retrieval => "retrieval",
            Self::Intent => "intent",
            Self::Filters => "filters",
            Self::Diversity => "diversity",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response body for `POST /api/eval/run`
///
/// The backend returns the full job record; only the identifier matters
/// to the poller, extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalRunResponse {
    /// Job identifier used for status polling
    pub job_id: String,
}

/// Response body for `GET /api/eval/status/{job_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EvalStatusResponse {
    /// Job status: pending, running, completed, failed, or anything newer
    pub status: String,
    /// Server-reported error text for failed jobs
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_set_empty() {
        assert!(FilterSet::default().is_empty());

        let filters = FilterSet {
            brand: Some("Nike".to_string()),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_filter_set_serializes_only_active_keys() {
        let filters = FilterSet {
            brand: Some("Nike".to_string()),
            price_max: Some(30.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(json, serde_json::json!({"brand": "Nike", "price_max": 30.0}));
    }

    #[test]
    fn test_chat_request_serializes_nulls() {
        let request = ChatRequest {
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            image_base64: None,
            top_k: 8,
            filters: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["image_base64"].is_null());
        assert!(json["filters"].is_null());
        assert_eq!(json["top_k"], 8);
    }

    #[test]
    fn test_chat_response_defaults() {
        let response: ChatResponse = serde_json::from_str(r#"{"reply":"hi"}"#).unwrap();
        assert_eq!(response.reply, "hi");
        assert!(response.products.is_empty());
        assert!(response.trace.is_null());
    }

    #[test]
    fn test_product_optional_fields() {
        let json = r#"{
            "id": "p1", "title": "Shirt", "category": "t-shirt",
            "brand": "Nike", "price": 19.5, "currency": "USD"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "p1");
        assert!(product.product_url.is_none());
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_eval_mode_parse_roundtrip() {
        for name in [
            "quick",
            "all",
            "retrieval",
            "intent",
            "filters",
            "diversity",
            "performance",
        ] {
            let mode = EvalMode::parse_str(name).unwrap();
            assert_eq!(mode.as_str(), name);
        }
        assert!(EvalMode::parse_str("bogus").is_err());
    }

    #[test]
    fn test_eval_run_response_ignores_extra_fields() {
        let json = r#"{"job_id":"abc123","status":"pending","mode":"quick"}"#;
        let response: EvalRunResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.job_id, "abc123");
    }
}
