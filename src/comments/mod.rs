//! Comment thread for a token
//!
//! - [`reply`]: the `#<id> message` reply convention
//! - [`thread`]: view-state controller (list, compose, highlight)

pub mod reply;
pub mod thread;

pub use reply::{parse_reply, reply_prefix, ParsedComment, REPLY_MARKER};
pub use thread::{CommentThread, CommentView, ReplyComposer, EMPTY_STATE_TEXT};
