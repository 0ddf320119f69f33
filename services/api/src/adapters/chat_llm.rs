//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for the chat panel's language model.
//! It implements the `CompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use thought_partner_core::domain::{ChatMessage, MessageRole};
use thought_partner_core::ports::{CompletionService, PortError, PortResult};

const SYSTEM_INSTRUCTIONS: &str = r#"You are a Master Agent, a helpful thought partner for product managers.
You help with project planning, structuring thoughts, and ideation.
You can edit items on the whiteboard to help organize information.

You can create items on the whiteboard by using the following commands in your response:
- [create sticky]content for sticky note[/create sticky]
- [create heading]heading text[/create heading]
- [create bulletpoints]• point 1
• point 2
• point 3[/create bulletpoints]
- [create text]longer text content[/create text]
- [create table]Header 1,Header 2,Header 3
Row 1 Cell 1,Row 1 Cell 2,Row 1 Cell 3
Row 2 Cell 1,Row 2 Cell 2,Row 2 Cell 3[/create table]

Use these commands to help organize information visually on the whiteboard.
Always create multiple components to represent different aspects of the information.
For project planning, include at least one table with tasks, assignments, and timelines.
For technical discussions, include code snippets and architecture diagrams.
For user stories, include acceptance criteria and user flows."#;

/// Used when the model answers with no text at all.
pub const EMPTY_REPLY: &str = "I apologize, but I couldn't generate a response.";

/// Builds the system prompt, appending the project description when there is one.
pub fn system_prompt(project_context: Option<&str>) -> String {
    match project_context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "{}\n\nContext about the current project: {}",
            SYSTEM_INSTRUCTIONS, context
        ),
        None => SYSTEM_INSTRUCTIONS.to_string(),
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            model,
            temperature,
            max_tokens,
        }
    }

    fn to_request_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
        let content = message.content.clone();
        let request_message: ChatCompletionRequestMessage = match message.role {
            MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            MessageRole::Agent => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        };
        Ok(request_message)
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiChatAdapter {
    /// Sends the whole conversation, prefixed with the whiteboard instructions.
    async fn complete(
        &self,
        history: &[ChatMessage],
        project_context: Option<&str>,
    ) -> PortResult<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() + 1);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt(project_context))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );
        for message in history {
            messages.push(Self::to_request_message(message)?);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| EMPTY_REPLY.to_string());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_teaches_every_directive_kind() {
        let prompt = system_prompt(None);
        for kind in thought_partner_core::ItemKind::directive_kinds() {
            assert!(prompt.contains(&format!("[create {}]", kind.as_str())));
            assert!(prompt.contains(&format!("[/create {}]", kind.as_str())));
        }
        assert!(!prompt.contains("Context about the current project"));
    }

    #[test]
    fn prompt_carries_project_context_when_present() {
        let prompt = system_prompt(Some("Checkout redesign"));
        assert!(prompt.ends_with("Context about the current project: Checkout redesign"));
        assert_eq!(system_prompt(Some("   ")), system_prompt(None));
    }
}
