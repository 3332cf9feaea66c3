//! Backend API surface
//!
//! Wire types for the recommendation backend's REST contract and the
//! reqwest client that speaks it. The session and poller logic depend only
//! on the `ChatBackend` and `EvalBackend` traits so they can be exercised
//! against fakes.

pub mod client;
pub mod types;

pub use client::{BackendClient, ChatBackend, EvalBackend};
pub use types::{
    CatalogMeta, ChatRequest, ChatResponse, EvalMode, EvalRunResponse, EvalStatusResponse,
    FilterSet, Product, ProductsResponse, WireMessage,
};
