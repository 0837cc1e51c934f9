//! Proxy endpoints.
//!
//! # Data Flow
//! ```text
//! /fetch?target=  → page.rs     → upstream (buffered) → rewrite engine → HTML
//! /res?url=       → resource.rs → upstream (unread)   → streamed bytes
//! ```
//!
//! # Design Decisions
//! - Two separate pipelines: pages are buffered for rewriting, resources are
//!   streamed so large media never sits in memory
//! - Target validation happens before any outbound I/O
//! - No state survives a request

pub mod page;
pub mod resource;

pub use page::page_handler;
pub use resource::resource_handler;
