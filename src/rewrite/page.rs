//! Whole-document rewriting.
//!
//! Runs two passes with `lol_html`: a discard-output scan that records which
//! structural elements the document already has, then the mutating pass.
//! `lol_html` works on the raw token stream, so character references are
//! never decoded and re-encoded.

use std::cell::Cell;
use std::error::Error as StdError;

use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use lol_html::errors::RewritingError;
use lol_html::html_content::{ContentType, Element};
use lol_html::{element, rewrite_str, HtmlRewriter, RewriteStrSettings, Settings};
use thiserror::Error;

use super::links::{absolutize, classify_anchor, AnchorClass, LinkTargets};
use super::srcset::rewrite_descriptor_list;
use crate::config::RewriteConfig;

type HandlerResult = Result<(), Box<dyn StdError + Send + Sync>>;

/// `http-equiv` values that would stop the page rendering under the proxy origin.
const BLOCKING_META: &[&str] = &["x-frame-options", "content-security-policy"];

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("HTML rewriting failed: {0}")]
    Html(#[from] RewritingError),
}

/// Structural elements present in the source document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Landmarks {
    html: bool,
    head: bool,
    body: bool,
    base: bool,
}

fn scan(html: &str) -> Result<Landmarks, RewritingError> {
    let seen_html = Cell::new(false);
    let seen_head = Cell::new(false);
    let seen_body = Cell::new(false);
    let seen_base = Cell::new(false);

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("html", |_el| {
                    seen_html.set(true);
                    Ok(())
                }),
                element!("head", |_el| {
                    seen_head.set(true);
                    Ok(())
                }),
                element!("body", |_el| {
                    seen_body.set(true);
                    Ok(())
                }),
                element!("base", |_el| {
                    seen_base.set(true);
                    Ok(())
                }),
            ],
            strict: false,
            ..Settings::default()
        },
        |_: &[u8]| {},
    );
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(Landmarks {
        html: seen_html.get(),
        head: seen_head.get(),
        body: seen_body.get(),
        base: seen_base.get(),
    })
}

/// Rewrites fetched pages so every embedded reference goes back through the proxy.
#[derive(Debug, Clone)]
pub struct PageRewriter {
    links: LinkTargets,
    banner_html: String,
}

impl PageRewriter {
    pub fn new(links: LinkTargets, banner_html: impl Into<String>) -> Self {
        Self {
            links,
            banner_html: banner_html.into(),
        }
    }

    pub fn from_config(config: &RewriteConfig) -> Self {
        Self::new(
            LinkTargets::new(config.fetch_path.clone(), config.resource_path.clone()),
            config.banner_html.clone(),
        )
    }

    pub fn links(&self) -> &LinkTargets {
        &self.links
    }

    /// Rewrite `html`, fetched from `target`, for serving under the proxy origin.
    pub fn rewrite(&self, html: &str, target: &str) -> Result<String, RewriteError> {
        let landmarks = scan(html)?;
        let links = &self.links;
        let banner = self.banner_html.as_str();

        let base_tag = if landmarks.base {
            String::new()
        } else {
            format!(r#"<base href="{}">"#, encode_double_quoted_attribute(target))
        };
        // Markup that has to be created because the document lacks a <head>.
        let mut synthesized = String::new();
        if !landmarks.head {
            if !base_tag.is_empty() {
                synthesized.push_str("<head>");
                synthesized.push_str(&base_tag);
                synthesized.push_str("</head>");
            }
            if !landmarks.body {
                synthesized.push_str(banner);
            }
        }

        let base_seen = Cell::new(false);
        let mut handlers = vec![
            element!("meta[http-equiv]", |el| {
                strip_blocking_meta(el);
                Ok(())
            }),
            element!("base", |el| {
                if base_seen.replace(true) {
                    el.remove();
                } else {
                    el.set_attribute("href", target)?;
                }
                Ok(())
            }),
            element!("[src]", |el| rewrite_src(el, target, links)),
            element!("[srcset]", |el| rewrite_srcset(el, target, links)),
            element!("[href]", |el| rewrite_href(el, target, links)),
            element!("source", |el| {
                rewrite_src(el, target, links)?;
                rewrite_srcset(el, target, links)
            }),
        ];

        if landmarks.head {
            handlers.push(element!("head", |el| {
                if !base_tag.is_empty() {
                    el.prepend(&base_tag, ContentType::Html);
                }
                if !landmarks.body {
                    el.after(banner, ContentType::Html);
                }
                Ok(())
            }));
        } else if landmarks.html && !synthesized.is_empty() {
            handlers.push(element!("html", |el| {
                el.prepend(&synthesized, ContentType::Html);
                Ok(())
            }));
        }
        // Bare fragments: place the markup before the first element so a
        // leading doctype stays the first token.
        let synthesized_placed = Cell::new(false);
        if !landmarks.head && !landmarks.html && !synthesized.is_empty() {
            handlers.push(element!("*", |el| {
                if !synthesized_placed.replace(true) {
                    el.before(&synthesized, ContentType::Html);
                }
                Ok(())
            }));
        }
        if landmarks.body {
            handlers.push(element!("body", |el| {
                el.prepend(banner, ContentType::Html);
                Ok(())
            }));
        }

        let rewritten = rewrite_str(
            html,
            RewriteStrSettings {
                element_content_handlers: handlers,
                strict: false,
                ..RewriteStrSettings::default()
            },
        )?;

        if !landmarks.head && !landmarks.html && !synthesized.is_empty() && !synthesized_placed.get() {
            // No element to anchor on; only text, comments or a doctype.
            return Ok(rewritten + &synthesized);
        }
        Ok(rewritten)
    }
}

fn strip_blocking_meta(el: &mut Element<'_, '_>) {
    let blocking = el
        .get_attribute("http-equiv")
        .map(|v| BLOCKING_META.iter().any(|b| v.trim().eq_ignore_ascii_case(b)))
        .unwrap_or(false);
    if blocking {
        el.remove();
    }
}

/// Attribute value with character references decoded, as a browser would see it.
fn attribute(el: &Element<'_, '_>, name: &str) -> Option<String> {
    el.get_attribute(name)
        .map(|raw| decode_html_entities(&raw).into_owned())
}

fn rewrite_src(el: &mut Element<'_, '_>, target: &str, links: &LinkTargets) -> HandlerResult {
    if let Some(src) = attribute(el, "src") {
        if !src.trim().is_empty() {
            el.set_attribute("src", &links.resource_link(&src, target))?;
        }
    }
    Ok(())
}

fn rewrite_srcset(el: &mut Element<'_, '_>, target: &str, links: &LinkTargets) -> HandlerResult {
    if let Some(srcset) = attribute(el, "srcset") {
        if !srcset.is_empty() {
            el.set_attribute("srcset", &rewrite_descriptor_list(&srcset, target, links))?;
        }
    }
    Ok(())
}

fn rewrite_href(el: &mut Element<'_, '_>, target: &str, links: &LinkTargets) -> HandlerResult {
    let Some(href) = attribute(el, "href") else {
        return Ok(());
    };
    if href.trim().is_empty() {
        return Ok(());
    }

    let tag = el.tag_name();
    if tag.eq_ignore_ascii_case("base") {
        return Ok(());
    }
    if tag.eq_ignore_ascii_case("a") {
        let absolute = absolutize(&href, target).into_string();
        // Unmodified anchors keep their raw, still-encoded text.
        if classify_anchor(&absolute, target) == AnchorClass::Navigate {
            el.set_attribute("href", &links.navigate_link(&absolute))?;
        }
        return Ok(());
    }

    // Every other href (stylesheets, icons, canonical links) is fetched opaquely.
    el.set_attribute("href", &links.resource_link(&href, target))?;
    Ok(())
}
