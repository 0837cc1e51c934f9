//! URL rewrite engine.
//!
//! # Data Flow
//! ```text
//! fetched page HTML + target URL
//!     → page.rs (scan structure, strip blocking <meta>, pin <base>)
//!     → for every src / srcset / href found:
//!         links.rs  (absolutize, classify anchors, format proxy links)
//!         srcset.rs (relocate each candidate URL)
//!     → page.rs (inject banner, serialize)
//!     → rewritten HTML
//! ```
//!
//! # Design Decisions
//! - Everything here is pure and request-scoped; no I/O
//! - A reference that cannot be resolved is passed through, never an error
//! - Same-host anchors become navigate links; cross-host anchors are untouched
//! - All other references become resource links

pub mod links;
pub mod page;
pub mod srcset;

pub use links::{absolutize, classify_anchor, Absolutized, AnchorClass, LinkTargets};
pub use page::{PageRewriter, RewriteError};
pub use srcset::rewrite_descriptor_list;
