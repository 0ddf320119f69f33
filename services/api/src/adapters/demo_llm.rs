//! services/api/src/adapters/demo_llm.rs
//!
//! An offline stand-in for the language model, used when no API key is
//! configured. It answers with canned product-management advice and, when the
//! conversation asks for it, a reply full of whiteboard directives.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use thought_partner_core::domain::{ChatMessage, MessageRole};
use thought_partner_core::ports::{CompletionService, PortResult};
use tracing::debug;

const CANNED_REPLIES: [&str; 10] = [
    "I think we should focus on user research first to better understand our target audience.",
    "Let's break down this feature into smaller, manageable tasks and prioritize them by business impact.",
    "Have you considered approaching this from a different angle? Maybe we could simplify the user flow.",
    "I suggest adding a section to document the technical requirements and constraints for this project.",
    "That's a great start! Let's also consider how this will integrate with our existing systems.",
    "We should define clear success metrics for this initiative before proceeding further.",
    "Let's create a roadmap with key milestones to track progress on this project.",
    "I recommend conducting a competitive analysis to see how other products solve this problem.",
    "This looks good! Let's also think about potential edge cases and how to handle them.",
    "Let's organize these ideas into themes to better structure our approach to this problem.",
];

const TRIGGER_WORDS: [&str; 6] = ["whiteboard", "organize", "create", "plan", "structure", "table"];

const EXPLICIT_REQUESTS: [&str; 2] = ["create whiteboard items", "add to whiteboard"];

pub const SAMPLE_BOARD_REPLY: &str = r#"Let me help you organize those thoughts!

[create heading]Project Plan Overview[/create heading]

Here's how we might structure this project:

[create sticky]Key Project Goals
- Improve user engagement
- Increase conversion rate
- Reduce churn[/create sticky]

[create bulletpoints]• Phase 1: Research & Discovery
• Phase 2: Design & Prototyping
• Phase 3: Development
• Phase 4: Testing
• Phase 5: Launch & Monitoring[/create bulletpoints]

[create table]Project Timeline,Phase 1,Phase 2,Phase 3
Research,2 weeks,N/A,N/A
Design,1 week,3 weeks,N/A
Development,N/A,2 weeks,4 weeks
Testing,N/A,1 week,2 weeks[/create table]

[create text]This approach will help us maintain focus on our key objectives while ensuring we follow a structured methodology. Let me know if you'd like to adjust any of these phases or goals.[/create text]"#;

/// Swaps `text` for the sample board reply if it mentions any trigger word.
fn with_board_items(text: &str) -> String {
    let lowered = text.to_lowercase();
    if TRIGGER_WORDS.iter().any(|word| lowered.contains(word)) {
        SAMPLE_BOARD_REPLY.to_string()
    } else {
        text.to_string()
    }
}

/// A `CompletionService` that never leaves the process.
#[derive(Default)]
pub struct DemoCompletionAdapter {
    next_reply: AtomicUsize,
}

impl DemoCompletionAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletionService for DemoCompletionAdapter {
    async fn complete(
        &self,
        history: &[ChatMessage],
        _project_context: Option<&str>,
    ) -> PortResult<String> {
        let last_user = history
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::User);

        if let Some(message) = last_user {
            let lowered = message.content.to_lowercase();
            if EXPLICIT_REQUESTS.iter().any(|request| lowered.contains(request)) {
                debug!("Demo responder: explicit whiteboard request.");
                return Ok(with_board_items(&message.content));
            }
        }

        let index = self.next_reply.fetch_add(1, Ordering::Relaxed) % CANNED_REPLIES.len();
        debug!("Demo responder: canned reply {}.", index);
        Ok(with_board_items(CANNED_REPLIES[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use thought_partner_core::parser::parse;
    use uuid::Uuid;

    fn user(content: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            related_items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn explicit_request_returns_sample_board() {
        let adapter = DemoCompletionAdapter::new();
        let reply = adapter
            .complete(&[user("Please add to whiteboard")], None)
            .await
            .expect("demo never fails");
        assert_eq!(reply, SAMPLE_BOARD_REPLY);
    }

    #[tokio::test]
    async fn canned_replies_rotate() {
        let adapter = DemoCompletionAdapter::new();
        let history = [user("hello")];
        let first = adapter.complete(&history, None).await.expect("reply");
        let second = adapter.complete(&history, None).await.expect("reply");
        assert_eq!(first, CANNED_REPLIES[0]);
        assert_eq!(second, CANNED_REPLIES[1]);
    }

    #[tokio::test]
    async fn canned_reply_with_trigger_word_becomes_sample_board() {
        let adapter = DemoCompletionAdapter::new();
        adapter.next_reply.store(6, Ordering::Relaxed);
        let reply = adapter.complete(&[user("next?")], None).await.expect("reply");
        assert_eq!(reply, SAMPLE_BOARD_REPLY);
    }

    #[test]
    fn sample_board_has_one_item_of_each_directive_kind() {
        let parsed = parse(SAMPLE_BOARD_REPLY);
        assert_eq!(parsed.items.len(), 5);
        let table = parsed.items.last().expect("table is extracted last");
        assert_eq!(table.columns, Some(4));
        assert_eq!(table.rows, Some(5));
    }
}
