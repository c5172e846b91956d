//! HTTP middleware and request extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. CORS
//!
//! Authentication is an extractor rather than a layer; handlers opt in with
//! [`RequireAuth`].

pub mod auth;

pub use auth::{CurrentUser, RequireAuth};
