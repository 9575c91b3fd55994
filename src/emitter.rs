use crate::attachment::{Attachment, AttachmentConfig, AttachmentError};
use crate::script::ResponseTable;
use crate::stream::TextStreamer;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EmitterConfig {
    pub chunk_size: NonZeroUsize,
    /// Replies at or past this step are preceded by a waiting period.
    pub thinking_from: usize,
    pub thinking_delay: Duration,
    pub attachment_step: Option<usize>,
    pub attachment: AttachmentConfig,
}

/// One assistant reply, ready to be revealed chunk by chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedResponse {
    pub full_text: String,
    /// Length of the scripted body inside `full_text`; the rest is the attachment announcement.
    body_len: usize,
    pub attachment: Option<Attachment>,
    pub waiting: Option<Duration>,
    chunk_size: NonZeroUsize,
}

impl EmittedResponse {
    /// Body chunks followed by announcement chunks. Joined, they equal `full_text`.
    pub fn chunks(&self) -> impl Iterator<Item = &str> + '_ {
        let (body, trailer) = self.full_text.split_at(self.body_len);
        TextStreamer::new(body, self.chunk_size)
            .chunks()
            .chain(TextStreamer::new(trailer, self.chunk_size).chunks())
    }
}

/// Picks the scripted reply for a cursor position.
///
/// Holds no per-session state; the same emitter serves every session.
pub struct Emitter {
    table: Arc<ResponseTable>,
    config: EmitterConfig,
}

impl Emitter {
    pub fn new(table: Arc<ResponseTable>, config: EmitterConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    /// Returns `Ok(None)` once the script is exhausted.
    pub fn emit(&self, cursor: usize) -> Result<Option<EmittedResponse>, AttachmentError> {
        let Some(body) = self.table.get(cursor) else {
            debug!(cursor, len = self.table.len(), "script exhausted");
            return Ok(None);
        };

        let waiting = (cursor >= self.config.thinking_from).then_some(self.config.thinking_delay);

        let mut full_text = body.to_string();
        let attachment = if self.config.attachment_step == Some(cursor) {
            let attachment = Attachment::load(&self.config.attachment)?;
            full_text.push_str(&self.config.attachment.announcement);
            Some(attachment)
        } else {
            None
        };

        debug!(
            cursor,
            chars = full_text.chars().count(),
            waiting = waiting.is_some(),
            attachment = attachment.is_some(),
            "emitting scripted reply"
        );

        Ok(Some(EmittedResponse {
            full_text,
            body_len: body.len(),
            attachment,
            waiting,
            chunk_size: self.config.chunk_size,
        }))
    }
}
