use lingo_core::model::Activity;

/// Who said a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    Tutor,
    Learner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One AI-tutor conversation, scoped to the activity the learner came from.
///
/// The thread is a transcript plus a single in-flight guard: one reply may be
/// awaited at a time, and a failed turn leaves the transcript unchanged so
/// the learner can resend.
#[derive(Debug, Clone)]
pub struct ChatThread {
    lesson_title: String,
    context: Activity,
    messages: Vec<ChatMessage>,
    responding: bool,
}

impl ChatThread {
    /// Seed the thread with the tutor's greeting for this activity.
    #[must_use]
    pub fn new(lesson_title: impl Into<String>, context: Activity) -> Self {
        let lesson_title = lesson_title.into();
        let greeting = format!(
            "Okay, let's practice \"{}\". Ask me anything or try using the key words!",
            context.title()
        );
        Self {
            lesson_title,
            context,
            messages: vec![ChatMessage {
                role: ChatRole::Tutor,
                content: greeting,
            }],
            responding: false,
        }
    }

    #[must_use]
    pub fn lesson_title(&self) -> &str {
        &self.lesson_title
    }

    #[must_use]
    pub fn context(&self) -> &Activity {
        &self.context
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_responding(&self) -> bool {
        self.responding
    }

    /// Append the learner's message and claim the reply slot.
    ///
    /// Returns the trimmed text to send, or `None` when the input is blank
    /// or a reply is already in flight (the submission is dropped).
    pub fn submit(&mut self, text: &str) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.responding {
            return None;
        }
        self.messages.push(ChatMessage {
            role: ChatRole::Learner,
            content: trimmed.to_owned(),
        });
        self.responding = true;
        Some(trimmed.to_owned())
    }

    /// Append the tutor's reply and release the slot.
    pub fn accept_reply(&mut self, reply: String) {
        self.messages.push(ChatMessage {
            role: ChatRole::Tutor,
            content: reply,
        });
        self.responding = false;
    }

    /// Release the slot after a failed turn; the transcript stays as-is and
    /// the learner may retry.
    pub fn fail_reply(&mut self) {
        self.responding = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::WordPair;

    fn context() -> Activity {
        Activity::Matching {
            title: "Animals".into(),
            pairs: vec![WordPair::new("cat", "chat")],
        }
    }

    #[test]
    fn thread_opens_with_a_tutor_greeting() {
        let thread = ChatThread::new("Unit 1", context());
        assert_eq!(thread.messages().len(), 1);
        assert_eq!(thread.messages()[0].role, ChatRole::Tutor);
        assert!(thread.messages()[0].content.contains("Animals"));
    }

    #[test]
    fn submit_claims_the_reply_slot() {
        let mut thread = ChatThread::new("Unit 1", context());
        assert_eq!(thread.submit("  how do I say cat?  ").as_deref(), Some("how do I say cat?"));
        assert!(thread.is_responding());

        // No second turn while one is in flight.
        assert_eq!(thread.submit("hello?"), None);
        assert_eq!(thread.messages().len(), 2);
    }

    #[test]
    fn blank_input_is_dropped() {
        let mut thread = ChatThread::new("Unit 1", context());
        assert_eq!(thread.submit("   "), None);
        assert_eq!(thread.messages().len(), 1);
    }

    #[test]
    fn reply_and_failure_release_the_slot() {
        let mut thread = ChatThread::new("Unit 1", context());
        thread.submit("how do I say cat?");
        thread.accept_reply("cat is \"chat\" in French.".into());
        assert!(!thread.is_responding());
        assert_eq!(thread.messages().len(), 3);

        thread.submit("and dog?");
        let len_before = thread.messages().len();
        thread.fail_reply();
        assert!(!thread.is_responding());
        // Failed turn leaves the transcript unchanged.
        assert_eq!(thread.messages().len(), len_before);
        assert!(thread.submit("and dog?").is_some());
    }
}
