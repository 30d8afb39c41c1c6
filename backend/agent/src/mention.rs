//! Removal of chat-platform mention markup from inbound text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `[CQ:at,qq=<digits>]` with optional trailing attributes.
static CQ_AT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[CQ:at,qq=\d+(?:,[^\]]*)?\]").unwrap());

/// Strip every mention token and trim surrounding whitespace.
pub fn strip_mentions(text: &str) -> String {
    CQ_AT.replace_all(text, "").trim().to_string()
}
