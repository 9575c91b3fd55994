use crate::attachment::Attachment;
use crate::emitter::{EmittedResponse, Emitter};
use crate::session::Session;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Input,
    Thinking,
    Streaming,
}

pub struct App {
    pub title: String,
    pub state: AppState,
    pub input: String,
    pub session: Session,
    // Text revealed so far for the reply being streamed
    pub live: Option<String>,
    // Shown under the transcript until the next submission or reset
    pub attachment: Option<Attachment>,
    pub status: Option<String>,
    // Lines scrolled up from the bottom of the transcript; 0 follows new output
    pub scroll_offset: u16,
}

impl App {
    pub fn new(title: String, session: Session) -> Self {
        Self {
            title,
            state: AppState::Input,
            input: String::new(),
            session,
            live: None,
            attachment: None,
            status: None,
            scroll_offset: 0,
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.state == AppState::Input
    }

    /// Record the typed message and clear the input box. Returns false when
    /// there is nothing to send.
    pub fn submit(&mut self) -> bool {
        if !self.accepts_input() || self.input.trim().is_empty() {
            return false;
        }
        let text = std::mem::take(&mut self.input);
        self.session.record_user_message(text);
        self.attachment = None;
        self.status = None;
        self.scroll_offset = 0;
        true
    }

    pub fn set_thinking(&mut self) {
        self.state = AppState::Thinking;
    }

    pub fn begin_stream(&mut self) {
        self.state = AppState::Streaming;
        self.live = Some(String::new());
    }

    pub fn push_chunk(&mut self, chunk: &str) {
        self.live.get_or_insert_with(String::new).push_str(chunk);
    }

    /// Open the session. With `greeting`, the reply for the current step is
    /// recorded at once, without the typing effect.
    pub fn start_session(&mut self, emitter: &Emitter, greeting: bool) {
        if !greeting {
            return;
        }
        match emitter.emit(self.session.cursor()) {
            Ok(Some(reply)) => self.finish_response(reply),
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "greeting attachment unavailable");
                self.abort_response(format!("Attachment unavailable: {}", e));
            }
        }
    }

    /// Move the finished reply into the transcript and show its attachment.
    pub fn finish_response(&mut self, response: EmittedResponse) {
        self.live = None;
        self.session.record_assistant_message(response.full_text);
        self.attachment = response.attachment;
        self.state = AppState::Input;
    }

    pub fn abort_response(&mut self, status: String) {
        self.live = None;
        self.status = Some(status);
        self.state = AppState::Input;
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.live = None;
        self.attachment = None;
        self.input.clear();
        self.status = None;
        self.scroll_offset = 0;
        self.state = AppState::Input;
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::AttachmentConfig;
    use crate::emitter::EmitterConfig;
    use crate::script::ResponseTable;
    use crate::session::{Message, Role};
    use std::num::NonZeroUsize;
    use std::sync::Arc;
    use std::time::Duration;

    fn app() -> App {
        App::new("test".to_string(), Session::new(3))
    }

    fn emitter() -> Emitter {
        Emitter::new(
            Arc::new(ResponseTable::new(["welcome", "second", "third"])),
            EmitterConfig {
                chunk_size: NonZeroUsize::new(5).unwrap(),
                thinking_from: 2,
                thinking_delay: Duration::from_secs(3),
                attachment_step: None,
                attachment: AttachmentConfig::default(),
            },
        )
    }

    fn greeting() -> Message {
        Message {
            role: Role::Assistant,
            content: "welcome".to_string(),
        }
    }

    #[test]
    fn greeting_is_recorded_on_start() {
        let mut app = app();
        app.start_session(&emitter(), true);
        assert_eq!(app.session.transcript(), &[greeting()]);
        assert_eq!(app.session.cursor(), 0);
        assert!(app.accepts_input());
    }

    #[test]
    fn greeting_is_repeated_after_reset() {
        let emitter = emitter();
        let mut app = app();
        app.start_session(&emitter, true);
        app.input = "hello".to_string();
        app.submit();

        app.reset();
        app.start_session(&emitter, true);
        assert_eq!(app.session.transcript(), &[greeting()]);
        assert_eq!(app.session.cursor(), 0);
    }

    #[test]
    fn no_greeting_starts_empty() {
        let mut app = app();
        app.start_session(&emitter(), false);
        assert!(app.session.transcript().is_empty());
        assert_eq!(app.session.cursor(), 0);
    }

    #[test]
    fn blank_input_is_not_submitted() {
        let mut app = app();
        app.input = "   ".to_string();
        assert!(!app.submit());
        assert_eq!(app.session.cursor(), 0);
    }

    #[test]
    fn submit_records_and_clears_input() {
        let mut app = app();
        app.input = "hello".to_string();
        assert!(app.submit());
        assert!(app.input.is_empty());
        assert_eq!(app.session.cursor(), 1);
        assert_eq!(app.session.transcript()[0].role, Role::User);
    }

    #[test]
    fn input_is_refused_while_streaming() {
        let mut app = app();
        app.begin_stream();
        app.input = "again".to_string();
        assert!(!app.submit());
        assert_eq!(app.session.cursor(), 0);
    }

    #[test]
    fn chunks_accumulate_in_live_buffer() {
        let mut app = app();
        app.begin_stream();
        app.push_chunk("Hello");
        app.push_chunk("World");
        assert_eq!(app.live.as_deref(), Some("HelloWorld"));
    }

    #[test]
    fn abort_returns_to_input_with_status() {
        let mut app = app();
        app.set_thinking();
        app.abort_response("broken".to_string());
        assert!(app.accepts_input());
        assert_eq!(app.status.as_deref(), Some("broken"));
        assert!(app.live.is_none());
    }

    #[test]
    fn reset_returns_to_fresh_state() {
        let mut app = app();
        app.input = "one".to_string();
        app.submit();
        app.scroll_up();
        app.reset();
        assert_eq!(app.session.cursor(), 0);
        assert!(app.session.transcript().is_empty());
        assert_eq!(app.scroll_offset, 0);
        assert!(app.accepts_input());
    }
}
