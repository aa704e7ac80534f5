/// Comment thread controller
///
/// Holds the view state of one token's comment list: the comments in server
/// order, the initial-loading flag, the hover highlight and the reply
/// compose surface. Every mutation of the list is a full refetch.
use super::reply::{parse_reply, reply_prefix, ParsedComment};
use crate::context::AuthSession;
use crate::errors::CommentError;
use crate::logger::{self, LogTag};
use crate::ports::{CommentBackend, Notifier};
use crate::types::Comment;
use chrono::{DateTime, Local, TimeZone, Utc};

pub const EMPTY_STATE_TEXT: &str = "No comments yet. Be the first to share your thoughts!";

const TIME_FORMAT: &str = "%I:%M:%S %p";
const FULL_TIME_FORMAT: &str = "%d %b %Y, %I:%M:%S %p";

/// Reply compose surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyComposer {
    pub is_open: bool,
    pub draft: String,
}

/// Render-ready projection of one comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView<'a> {
    pub comment: &'a Comment,
    pub parsed: ParsedComment,
    pub highlighted: bool,
    pub author: String,
    pub reply_label: String,
    pub time_label: String,
    pub full_time_label: String,
}

pub struct CommentThread {
    token_address: String,
    comments: Vec<Comment>,
    is_initial_loading: bool,
    highlighted: Option<u64>,
    composer: ReplyComposer,
}

impl CommentThread {
    pub fn new(token_address: impl Into<String>) -> Self {
        Self {
            token_address: token_address.into(),
            comments: Vec::new(),
            is_initial_loading: true,
            highlighted: None,
            composer: ReplyComposer::default(),
        }
    }

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_initial_loading(&self) -> bool {
        self.is_initial_loading
    }

    pub fn composer(&self) -> &ReplyComposer {
        &self.composer
    }

    pub fn highlighted(&self) -> Option<u64> {
        self.highlighted
    }

    /// First load when the thread is shown
    pub async fn initial_load(&mut self, backend: &dyn CommentBackend) {
        self.is_initial_loading = true;
        self.load(backend).await;
        self.is_initial_loading = false;
    }

    /// Refetch the full list
    ///
    /// A failed fetch is logged and the previous list stays on screen.
    pub async fn load(&mut self, backend: &dyn CommentBackend) {
        match backend.list_comments(&self.token_address).await {
            Ok(items) => {
                logger::debug(
                    LogTag::Comments,
                    &format!("Loaded {} comments for {}", items.len(), self.token_address),
                );
                self.comments = items;
            }
            Err(e) => {
                logger::warning(
                    LogTag::Comments,
                    &format!("Failed to load comments for {}: {}", self.token_address, e),
                );
            }
        }
    }

    /// Post the current draft
    ///
    /// Without an access token nothing is sent. On success the composer is
    /// reset and the list refetched; on failure the draft is kept.
    pub async fn submit_reply(
        &mut self,
        backend: &dyn CommentBackend,
        session: &AuthSession,
        notifier: &dyn Notifier,
    ) -> Result<u64, CommentError> {
        let access_token = match session.access_token() {
            Some(token) => token,
            None => {
                notifier.error("Connect your Wallet to post");
                return Err(CommentError::NotSignedIn);
            }
        };

        match backend
            .add_comment(&self.token_address, &self.composer.draft, access_token)
            .await
        {
            Ok(id) => {
                logger::info(
                    LogTag::Comments,
                    &format!("Reply {} posted on {}", id, self.token_address),
                );
                self.composer = ReplyComposer::default();
                self.load(backend).await;
                notifier.success("Reply sent");
                Ok(id)
            }
            Err(e) => {
                logger::error(LogTag::Comments, &format!("Failed to post reply: {}", e));
                notifier.error("Failed to post reply");
                Err(CommentError::Backend(e))
            }
        }
    }

    /// Open the composer seeded with `#<id> `
    pub fn request_reply_to(&mut self, comment_id: u64) {
        self.composer.draft = reply_prefix(comment_id);
        self.composer.is_open = true;
    }

    pub fn open_compose(&mut self) {
        self.composer.is_open = true;
    }

    /// Close the composer, keeping the draft
    pub fn close_compose(&mut self) {
        self.composer.is_open = false;
    }

    /// Close the composer and discard the draft
    pub fn cancel_compose(&mut self) {
        self.composer = ReplyComposer::default();
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.draft = text.into();
    }

    pub fn set_highlight(&mut self, comment_id: u64) {
        self.highlighted = Some(comment_id);
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn is_highlighted(&self, comment_id: u64) -> bool {
        self.highlighted == Some(comment_id)
    }

    pub fn shows_empty_state(&self) -> bool {
        !self.is_initial_loading && self.comments.is_empty()
    }

    /// Render-ready comments in server order, parsed fresh on every call
    pub fn views(&self) -> Vec<CommentView<'_>> {
        self.comments
            .iter()
            .map(|comment| {
                let (time_label, full_time_label) = format_comment_time(&comment.created_at, &Local);
                CommentView {
                    comment,
                    parsed: parse_reply(&comment.text),
                    highlighted: self.is_highlighted(comment.id),
                    author: comment.user.display_name(),
                    reply_label: format!("#{} [reply]", comment.id),
                    time_label,
                    full_time_label,
                }
            })
            .collect()
    }
}

/// Short and full time labels in the given zone
pub fn format_comment_time<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> (String, String)
where
    Tz::Offset: std::fmt::Display,
{
    let local = created_at.with_timezone(tz);
    (
        local.format(TIME_FORMAT).to_string(),
        local.format(FULL_TIME_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_comment, FakeCommentBackend, RecordingNotifier};

    #[tokio::test]
    async fn test_initial_load_keeps_server_order() {
        let backend = FakeCommentBackend::with_comments(vec![
            sample_comment(3, "third"),
            sample_comment(1, "first"),
        ]);
        let mut thread = CommentThread::new("0xtoken");
        assert!(thread.is_initial_loading());

        thread.initial_load(&backend).await;

        assert!(!thread.is_initial_loading());
        let ids: Vec<u64> = thread.comments().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(!thread.shows_empty_state());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_list() {
        let backend = FakeCommentBackend::with_comments(vec![sample_comment(1, "hi")]);
        let mut thread = CommentThread::new("0xtoken");
        thread.initial_load(&backend).await;

        backend.fail_list(true);
        thread.load(&backend).await;

        assert_eq!(thread.comments().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_state_after_failed_initial_load() {
        let backend = FakeCommentBackend::default();
        backend.fail_list(true);
        let mut thread = CommentThread::new("0xtoken");
        assert!(!thread.shows_empty_state());

        thread.initial_load(&backend).await;

        assert!(!thread.is_initial_loading());
        assert!(thread.shows_empty_state());
    }

    #[tokio::test]
    async fn test_reply_without_credential_never_calls_backend() {
        let backend = FakeCommentBackend::default();
        let notifier = RecordingNotifier::default();
        let mut thread = CommentThread::new("0xtoken");
        thread.request_reply_to(4);

        let result = thread
            .submit_reply(&backend, &AuthSession::anonymous(), &notifier)
            .await;

        assert!(matches!(result, Err(CommentError::NotSignedIn)));
        assert!(backend.posted().is_empty());
        assert_eq!(notifier.errors(), vec!["Connect your Wallet to post".to_string()]);
        assert_eq!(thread.composer().draft, "#4 ");
        assert!(thread.composer().is_open);
    }

    #[tokio::test]
    async fn test_successful_reply_resets_composer_and_reloads() {
        let backend = FakeCommentBackend::default();
        let notifier = RecordingNotifier::default();
        let mut thread = CommentThread::new("0xtoken");
        thread.initial_load(&backend).await;
        let lists_before = backend.list_calls();

        thread.request_reply_to(7);
        let draft = format!("{}nice", thread.composer().draft);
        thread.set_draft(draft);

        let id = thread
            .submit_reply(&backend, &AuthSession::signed_in("jwt"), &notifier)
            .await
            .unwrap();

        assert_eq!(backend.posted(), vec![("0xtoken".to_string(), "#7 nice".to_string(), "jwt".to_string())]);
        assert_eq!(thread.composer(), &ReplyComposer::default());
        assert_eq!(backend.list_calls(), lists_before + 1);
        assert!(thread.comments().iter().any(|c| c.id == id));
        assert_eq!(notifier.successes(), vec!["Reply sent".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_reply_keeps_draft() {
        let backend = FakeCommentBackend::default();
        backend.fail_add(true);
        let notifier = RecordingNotifier::default();
        let mut thread = CommentThread::new("0xtoken");
        thread.open_compose();
        thread.set_draft("first!");

        let result = thread
            .submit_reply(&backend, &AuthSession::signed_in("jwt"), &notifier)
            .await;

        assert!(matches!(result, Err(CommentError::Backend(_))));
        assert_eq!(thread.composer().draft, "first!");
        assert!(thread.composer().is_open);
        assert_eq!(notifier.errors(), vec!["Failed to post reply".to_string()]);
    }

    #[test]
    fn test_request_reply_seeds_exact_prefix() {
        let mut thread = CommentThread::new("0xtoken");
        thread.request_reply_to(7);
        assert_eq!(thread.composer().draft, "#7 ");
        assert!(thread.composer().is_open);
    }

    #[test]
    fn test_close_keeps_draft_cancel_clears() {
        let mut thread = CommentThread::new("0xtoken");
        thread.request_reply_to(2);
        thread.close_compose();
        assert_eq!(thread.composer().draft, "#2 ");
        assert!(!thread.composer().is_open);

        thread.open_compose();
        thread.cancel_compose();
        assert_eq!(thread.composer(), &ReplyComposer::default());
    }

    #[tokio::test]
    async fn test_views_parse_and_highlight() {
        let backend = FakeCommentBackend::with_comments(vec![
            sample_comment(1, "gm"),
            sample_comment(2, "#1 gm to you"),
            sample_comment(3, "#99 dangling"),
        ]);
        let mut thread = CommentThread::new("0xtoken");
        thread.initial_load(&backend).await;

        thread.set_highlight(1);
        let views = thread.views();
        assert!(views[0].highlighted);
        assert_eq!(views[1].parsed.reply_to, Some(1));
        assert_eq!(views[1].parsed.message, "gm to you");
        assert_eq!(views[1].reply_label, "#2 [reply]");

        // A reference to a comment that is not in the list highlights nothing
        thread.set_highlight(99);
        assert!(thread.views().iter().all(|v| !v.highlighted));

        thread.clear_highlight();
        assert_eq!(thread.highlighted(), None);
    }

    #[test]
    fn test_time_labels() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let (short, full) = format_comment_time(&created, &Utc);
        assert_eq!(short, "02:05:07 PM");
        assert_eq!(full, "09 Mar 2024, 02:05:07 PM");
    }
}
