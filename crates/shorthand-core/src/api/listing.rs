//! Parsing of the object store's `ListBucketResult` listing.
//!
//! Group ids come from `<Key>` elements. A page with `<IsTruncated>true`
//! carries a `<NextContinuationToken>` that the client sends back to fetch
//! the next page.

use crate::models::GroupId;

/// Object prefix under which group documents are published.
pub const WORDS_PREFIX: &str = "words/";

/// File suffix of a group document.
pub const WORDS_SUFFIX: &str = ".json";

const KEY_TAG: &str = "Key";
const TRUNCATED_TAG: &str = "IsTruncated";
const NEXT_TOKEN_TAG: &str = "NextContinuationToken";

/// Group ids found on one listing page, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub groups: Vec<GroupId>,
    /// Token for the next page; `None` on the last page.
    pub next_token: Option<String>,
}

/// Parse one listing page.
pub fn parse_listing_page(body: &str) -> ListingPage {
    let groups = elements(body, KEY_TAG)
        .filter_map(group_id_from_key)
        .collect();
    let truncated = elements(body, TRUNCATED_TAG)
        .next()
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let next_token = if truncated {
        elements(body, NEXT_TOKEN_TAG)
            .next()
            .filter(|token| !token.is_empty())
            .map(unescape)
    } else {
        None
    };
    ListingPage { groups, next_token }
}

/// Text content of every `<tag>...</tag>` element, trimmed.
fn elements<'a>(body: &'a str, tag: &str) -> impl Iterator<Item = &'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let mut rest = body;
    std::iter::from_fn(move || {
        let start = rest.find(&open)? + open.len();
        let len = rest[start..].find(&close)?;
        let text = &rest[start..start + len];
        rest = &rest[start + len + close.len()..];
        Some(text.trim())
    })
}

/// Undo the predefined XML entities. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn group_id_from_key(key: &str) -> Option<GroupId> {
    let name = key
        .strip_prefix(WORDS_PREFIX)?
        .strip_suffix(WORDS_SUFFIX)?;
    let id = GroupId::from(name);
    id.is_path_safe().then_some(id)
}
