use serde_json::json;
use std::sync::Arc;

use super::client::{Content, GenerateRequest, GenerativeModel, Part, ToolCall};
use super::prompts::SystemPrompts;
use super::tools::ToolRegistry;
use crate::error::ChatError;
use crate::types::{ChatMessage, ImagePayload};

/// Turns a user utterance plus history into the next bot utterance.
///
/// At most one tool round-trip is serviced per call. When the model asks for
/// several tools at once only the first is executed and the rest are dropped.
pub struct AgroResponder {
    model: Arc<dyn GenerativeModel>,
    tool_registry: ToolRegistry,
    system_instruction: String,
}

impl AgroResponder {
    pub fn new(model: Arc<dyn GenerativeModel>, tool_registry: ToolRegistry) -> Self {
        Self {
            model,
            tool_registry,
            system_instruction: SystemPrompts::agrobot().to_string(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Produce the reply to `utterance`, given every earlier turn.
    pub async fn get_response(
        &self,
        utterance: &str,
        prior_turns: &[ChatMessage],
        image: Option<&ImagePayload>,
    ) -> Result<String, ChatError> {
        let mut contents = history_contents(prior_turns);
        contents.push(user_turn(utterance, image));

        let request = GenerateRequest {
            contents,
            system_instruction: Some(Content::instruction(&self.system_instruction)),
            tools: self.tool_registry.get_tool_definitions(),
        };

        let response = self.model.generate(&request).await?;

        let Some(tool_call) = response.tool_calls.first() else {
            log::debug!("Model answered directly ({} chars)", response.content.len());
            return Ok(response.content);
        };

        if response.tool_calls.len() > 1 {
            log::warn!(
                "Model requested {} tool calls; only '{}' will be executed",
                response.tool_calls.len(),
                tool_call.name
            );
        }

        self.process_tool_call(request, tool_call).await
    }

    /// Run the tool locally and let the model phrase its result
    async fn process_tool_call(
        &self,
        first_request: GenerateRequest,
        tool_call: &ToolCall,
    ) -> Result<String, ChatError> {
        log::info!(
            "🔧 Executing tool: {} {}",
            tool_call.name,
            serde_json::Value::Object(tool_call.arguments.clone())
        );

        let result = self
            .tool_registry
            .execute_tool(&tool_call.name, &tool_call.arguments)?;

        let mut contents = first_request.contents;
        contents.push(Content::model(vec![tool_call.record.clone()]));
        contents.push(Content::user(vec![Part::function_response(
            &tool_call.name,
            json!({ "result": result.to_string() }),
        )]));

        let follow_up = GenerateRequest {
            contents,
            system_instruction: first_request.system_instruction,
            tools: Vec::new(),
        };

        let response = self.model.generate(&follow_up).await?;
        Ok(response.content)
    }
}

/// Prior turns as model history. Images are not round-tripped.
fn history_contents(prior_turns: &[ChatMessage]) -> Vec<Content> {
    prior_turns
        .iter()
        .map(|message| Content {
            role: Some(message.sender.model_role().to_string()),
            parts: vec![Part::text(&message.text)],
        })
        .collect()
}

/// The current turn; an attached image goes before the text
fn user_turn(utterance: &str, image: Option<&ImagePayload>) -> Content {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = image {
        parts.push(Part::inline_data(&image.mime_type, &image.data));
    }
    parts.push(Part::text(utterance));
    Content::user(parts)
}
