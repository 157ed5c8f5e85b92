use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

use super::client::{FunctionDeclaration, ToolSet};

pub mod agri;

pub use agri::{AgriDataSource, MockAgriData};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Invalid tool parameters: {0}")]
    InvalidParameters(String),
}

/// The fixed set of tools the model may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum ToolName {
    GetWeather,
    GetMarketPrices,
    GetCropCalendar,
}

#[derive(Debug, Clone)]
pub struct Tool {
    pub name: ToolName,
    pub description: String,
    pub parameters: Value,
}

pub struct ToolRegistry {
    tools: Vec<Tool>,
    data: Arc<dyn AgriDataSource>,
}

impl ToolRegistry {
    pub fn new(data: Arc<dyn AgriDataSource>) -> Self {
        Self {
            tools: Vec::new(),
            data,
        }
    }

    /// Register a tool
    pub fn register_tool(&mut self, tool: Tool) {
        self.tools.push(tool);
    }

    /// Get available tools
    pub fn get_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Find a tool by its wire name
    pub fn find_tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name.as_ref() == name)
    }

    /// Execute a tool by name, returning its JSON result
    pub fn execute_tool(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let tool = ToolName::from_str(name)
            .ok()
            .filter(|_| self.find_tool(name).is_some())
            .ok_or_else(|| ToolError::NotFound(format!("Unknown function call: {}", name)))?;

        let result = match tool {
            ToolName::GetWeather => {
                let location = string_arg(arguments, "location")?;
                to_value(self.data.weather(&location)?)?
            }
            ToolName::GetMarketPrices => {
                let crop = string_arg(arguments, "crop")?;
                let location = string_arg(arguments, "location")?;
                to_value(self.data.market_prices(&crop, &location)?)?
            }
            ToolName::GetCropCalendar => {
                let crop = string_arg(arguments, "crop")?;
                to_value(self.data.crop_calendar(&crop)?)?
            }
        };

        Ok(result)
    }

    /// Tool declarations in the model's function-calling format
    pub fn get_tool_definitions(&self) -> Vec<ToolSet> {
        if self.tools.is_empty() {
            return Vec::new();
        }
        vec![ToolSet {
            function_declarations: self
                .tools
                .iter()
                .map(|tool| FunctionDeclaration {
                    name: tool.name.to_string(),
                    description: tool.description.clone(),
                    parameters: tool.parameters.clone(),
                })
                .collect(),
        }]
    }
}

/// Scalar argument as a string; numbers and booleans are stringified.
fn string_arg(arguments: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    match arguments.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(ToolError::InvalidParameters(format!(
            "'{}' must be a non-empty scalar, got {}",
            key, other
        ))),
        None => Err(ToolError::InvalidParameters(format!(
            "missing required argument '{}'",
            key
        ))),
    }
}

fn to_value<T: serde::Serialize>(result: T) -> Result<Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::ExecutionFailed(e.to_string()))
}

/// Registry with the three agro tools backed by `data`
pub fn create_registry(data: Arc<dyn AgriDataSource>) -> ToolRegistry {
    let mut registry = ToolRegistry::new(data);

    registry.register_tool(Tool {
        name: ToolName::GetWeather,
        description: "Get the current weather forecast for a specific location.".to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city or district in Karnataka, e.g., Bengaluru."
                }
            },
            "required": ["location"]
        }),
    });

    registry.register_tool(Tool {
        name: ToolName::GetMarketPrices,
        description: "Get the latest market prices for a specific crop in a given location."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "crop": {
                    "type": "string",
                    "description": "The agricultural crop, e.g., Ragi, Coffee."
                },
                "location": {
                    "type": "string",
                    "description": "The market location, e.g., Mysuru."
                }
            },
            "required": ["crop", "location"]
        }),
    });

    registry.register_tool(Tool {
        name: ToolName::GetCropCalendar,
        description: "Get the sowing, harvesting, and care calendar for a specific crop."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "crop": {
                    "type": "string",
                    "description": "The agricultural crop, e.g., Sugarcane."
                }
            },
            "required": ["crop"]
        }),
    });

    registry
}

/// Initialize the default tool registry with placeholder data
pub fn create_default_registry() -> ToolRegistry {
    create_registry(Arc::new(MockAgriData))
}
