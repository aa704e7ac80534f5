/// Reply-reference convention embedded in comment text
///
/// A reply is plain text starting with `#<parent id>` followed by the message,
/// e.g. `#42 agreed`. The reference is informational: the parent may not
/// exist or may be on another page.
use once_cell::sync::Lazy;
use regex::Regex;

pub const REPLY_MARKER: char = '#';

static REPLY_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(\d+)$").unwrap());

/// Comment text split into its reply reference and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComment {
    pub reply_to: Option<u64>,
    pub message: String,
}

impl ParsedComment {
    fn verbatim(text: &str) -> Self {
        Self {
            reply_to: None,
            message: text.to_string(),
        }
    }
}

/// Parse the reply reference out of a comment
///
/// Text that does not start with a numeric `#<id>` token is returned
/// unchanged. When a reference is found, the remaining words are rejoined
/// with single spaces.
pub fn parse_reply(text: &str) -> ParsedComment {
    if !text.starts_with(REPLY_MARKER) {
        return ParsedComment::verbatim(text);
    }

    let mut words = text.split_whitespace();
    let first = match words.next() {
        Some(first) => first,
        None => return ParsedComment::verbatim(text),
    };

    let reply_to = REPLY_TOKEN
        .captures(first)
        .and_then(|caps| caps[1].parse::<u64>().ok());

    match reply_to {
        Some(id) => ParsedComment {
            reply_to: Some(id),
            message: words.collect::<Vec<_>>().join(" "),
        },
        None => ParsedComment::verbatim(text),
    }
}

/// Draft prefix used when replying to `comment_id`
pub fn reply_prefix(comment_id: u64) -> String {
    format!("{}{} ", REPLY_MARKER, comment_id)
}
