//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (bound the wait for the response)
//!     → reqwest connect / read timeouts (bound socket stalls)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: a failed fetch is reported to the browser as-is

pub mod timeouts;
