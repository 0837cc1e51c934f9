//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → /fetch, /res → proxy handlers
//!     → everything else → static landing page
//!     → response.rs (error → status + message)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{Endpoint, HandlerError};
pub use server::{AppState, HttpServer};
