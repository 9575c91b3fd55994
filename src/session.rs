#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Per-session conversation state: the transcript and the cursor into the
/// response script.
///
/// The cursor never exceeds the script length; once it reaches the end the
/// script is exhausted and further user messages are recorded without moving it.
#[derive(Debug, Clone)]
pub struct Session {
    transcript: Vec<Message>,
    cursor: usize,
    script_len: usize,
}

impl Session {
    pub fn new(script_len: usize) -> Self {
        Self {
            transcript: Vec::new(),
            cursor: 0,
            script_len,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn script_len(&self) -> usize {
        self.script_len
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.script_len
    }

    pub fn record_user_message(&mut self, text: impl Into<String>) {
        self.transcript.push(Message {
            role: Role::User,
            content: text.into(),
        });
        if self.cursor < self.script_len {
            self.cursor += 1;
        }
    }

    pub fn record_assistant_message(&mut self, text: impl Into<String>) {
        self.transcript.push(Message {
            role: Role::Assistant,
            content: text.into(),
        });
    }

    pub fn reset(&mut self) {
        self.transcript.clear();
        self.cursor = 0;
    }
}
