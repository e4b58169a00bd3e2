//! Structural description of serialized responses

use serde::Serialize;

/// Field holding the prompt id in a serialized response
pub const JSON_KEY_PROMPT_ID: &str = "prompt_id";
/// Field holding the value in a serialized response
pub const JSON_KEY_RESPONSE: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub field_type: PrimitiveType,
}

/// A response is always an object: the prompt id, then the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub schema: Vec<SchemaField>,
}

impl ResponseSchema {
    pub fn for_value(value_type: PrimitiveType) -> Self {
        Self {
            schema_type: "object",
            schema: vec![
                SchemaField {
                    name: JSON_KEY_PROMPT_ID,
                    field_type: PrimitiveType::String,
                },
                SchemaField {
                    name: JSON_KEY_RESPONSE,
                    field_type: value_type,
                },
            ],
        }
    }
}
