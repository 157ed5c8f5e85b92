//! Test doubles for the model transport and tool data.
//!
//! Public so integration tests and downstream crates can drive the chat
//! without a network connection.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::llm::client::{
    FunctionCall, GenerateRequest, GenerativeModel, LLMError, LLMResponse, Part, ToolCall,
};
use crate::llm::tools::agri::{CropCalendar, MarketPrice, WeatherReport};
use crate::llm::tools::{AgriDataSource, MockAgriData, ToolError};

/// Plain-text model reply
pub fn text_response(text: &str) -> LLMResponse {
    LLMResponse {
        content: text.to_string(),
        usage: None,
        model: "scripted".to_string(),
        finish_reason: Some("STOP".to_string()),
        tool_calls: Vec::new(),
    }
}

/// Model reply that requests a single function call
pub fn tool_call_response(name: &str, args: Value) -> LLMResponse {
    multi_tool_call_response(&[(name, args)])
}

/// Model reply requesting several function calls at once
pub fn multi_tool_call_response(calls: &[(&str, Value)]) -> LLMResponse {
    let tool_calls = calls
        .iter()
        .map(|(name, args)| {
            let arguments: Map<String, Value> = args.as_object().cloned().unwrap_or_default();
            ToolCall {
                name: name.to_string(),
                arguments: arguments.clone(),
                record: Part {
                    function_call: Some(FunctionCall {
                        name: name.to_string(),
                        args: arguments,
                    }),
                    ..Default::default()
                },
            }
        })
        .collect();

    LLMResponse {
        content: String::new(),
        usage: None,
        model: "scripted".to_string(),
        finish_reason: Some("STOP".to_string()),
        tool_calls,
    }
}

/// Model that replays queued replies and records every request it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<LLMResponse, LLMError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for one `notify_one` on `gate` before answering
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push(&self, reply: Result<LLMResponse, LLMError>) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    pub fn push_text(&self, text: &str) -> &Self {
        self.push(Ok(text_response(text)))
    }

    pub fn push_tool_call(&self, name: &str, args: Value) -> &Self {
        self.push(Ok(tool_call_response(name, args)))
    }

    pub fn push_error(&self, error: LLMError) -> &Self {
        self.push(Err(error))
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<LLMResponse, LLMError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(LLMError::ParseError("no scripted reply left".to_string())))
    }
}

/// Placeholder data that counts how many lookups were made
#[derive(Debug, Default)]
pub struct CountingAgriData {
    calls: AtomicUsize,
}

impl CountingAgriData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl AgriDataSource for CountingAgriData {
    fn weather(&self, location: &str) -> Result<WeatherReport, ToolError> {
        self.record();
        MockAgriData.weather(location)
    }

    fn market_prices(&self, crop: &str, location: &str) -> Result<MarketPrice, ToolError> {
        self.record();
        MockAgriData.market_prices(crop, location)
    }

    fn crop_calendar(&self, crop: &str) -> Result<CropCalendar, ToolError> {
        self.record();
        MockAgriData.crop_calendar(crop)
    }
}
