//! Responsive image descriptor lists (`srcset`).

use super::links::LinkTargets;

/// Rewrite the URL of every candidate in a `srcset`-style value.
///
/// Candidates are split on `,` and each is split on whitespace into a URL
/// followed by descriptor tokens. Only the URL is replaced; descriptors are
/// kept verbatim and candidate order is preserved. Empty candidates stay
/// empty. Descriptor syntax is not validated.
pub fn rewrite_descriptor_list(srcset: &str, base: &str, links: &LinkTargets) -> String {
    srcset
        .split(',')
        .map(|candidate| {
            let mut tokens = candidate.split_whitespace();
            match tokens.next() {
                Some(url) => std::iter::once(links.resource_link(url, base))
                    .chain(tokens.map(str::to_string))
                    .collect::<Vec<_>>()
                    .join(" "),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
