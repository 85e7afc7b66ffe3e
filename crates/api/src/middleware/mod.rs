//! HTTP middleware stack for the shop API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Trailing-slash normalisation (wraps the router, see `main.rs`)
//! 2. Sentry layers (capture errors, transactions)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Rate limiting on `POST /login` (governor)

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::login_rate_limiter;
pub use request_id::request_id_middleware;
