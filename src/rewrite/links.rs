//! URL resolution and proxy link formatting.
//!
//! # Responsibilities
//! - Resolve references found in a page against the page's base URL
//! - Format absolute URLs as proxy-relative resource or navigate links
//! - Decide whether an anchor stays inside the proxy or escapes it
//!
//! # Design Decisions
//! - Resolution never fails: an unresolvable reference is carried through as-is
//! - Encoding matches JavaScript `encodeURIComponent` and is applied exactly once
//! - Host comparison is exact (case-insensitive); subdomains are different hosts

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Outcome of resolving a reference against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Absolutized {
    /// The reference resolved to this absolute URL.
    Resolved(String),
    /// Resolution failed; the original reference is kept verbatim.
    Unresolved(String),
}

impl Absolutized {
    /// The resolved URL, or the original reference when resolution failed.
    pub fn into_string(self) -> String {
        match self {
            Absolutized::Resolved(s) | Absolutized::Unresolved(s) => s,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Absolutized::Resolved(s) | Absolutized::Unresolved(s) => s,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Absolutized::Resolved(_))
    }
}

/// Resolve `reference` against `base` using WHATWG URL rules.
pub fn absolutize(reference: &str, base: &str) -> Absolutized {
    match Url::parse(base).and_then(|base| base.join(reference)) {
        Ok(url) => Absolutized::Resolved(url.to_string()),
        Err(_) => Absolutized::Unresolved(reference.to_string()),
    }
}

/// Percent-encode a value for use as a single query component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Whether an anchor should be routed back through the page proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorClass {
    Navigate,
    Unmodified,
}

/// Classify an absolutized anchor target relative to the page it appears on.
///
/// Only same-host anchors are proxied. Cross-host anchors and anything that
/// does not parse are left exactly as authored.
pub fn classify_anchor(absolute: &str, base: &str) -> AnchorClass {
    let (Ok(link), Ok(page)) = (Url::parse(absolute), Url::parse(base)) else {
        return AnchorClass::Unmodified;
    };

    match (authority(&link), authority(&page)) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(&b) => AnchorClass::Navigate,
        _ => AnchorClass::Unmodified,
    }
}

/// `host[:port]`, omitting the scheme's default port.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Builds proxy-relative links for the two proxy endpoints.
#[derive(Debug, Clone)]
pub struct LinkTargets {
    fetch_path: String,
    resource_path: String,
}

impl LinkTargets {
    pub fn new(fetch_path: impl Into<String>, resource_path: impl Into<String>) -> Self {
        Self {
            fetch_path: fetch_path.into(),
            resource_path: resource_path.into(),
        }
    }

    fn resource_prefix(&self) -> String {
        format!("{}?url=", self.resource_path)
    }

    /// True when `value` already points at the resource endpoint.
    pub fn is_resource_link(&self, value: &str) -> bool {
        value.trim_start().starts_with(&self.resource_prefix())
    }

    /// `/res?url=<encoded absolute url>`.
    ///
    /// Values that are already resource links are returned unchanged so a
    /// second rewriting pass never double-encodes.
    pub fn resource_link(&self, reference: &str, base: &str) -> String {
        if self.is_resource_link(reference) {
            return reference.trim().to_string();
        }
        let absolute = absolutize(reference, base);
        format!("{}{}", self.resource_prefix(), encode_component(absolute.as_str()))
    }

    /// `/fetch?target=<encoded url>` for an already absolute same-host URL.
    pub fn navigate_link(&self, absolute: &str) -> String {
        format!("{}?target={}", self.fetch_path, encode_component(absolute))
    }
}

impl Default for LinkTargets {
    fn default() -> Self {
        Self::new("/fetch", "/res")
    }
}
