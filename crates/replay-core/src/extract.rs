//! Message extraction from blob bytes.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

use replay_types::MessageBatch;

/// Parse blob bytes as a top-level JSON array and re-serialize each element
/// as a compact document ready for transmission.
///
/// Any failure (malformed JSON, non-array top level, element
/// re-serialization) abandons the whole blob: no partial batch is ever
/// returned, so a partially bad blob dispatches nothing.
pub fn extract_messages(content: &[u8]) -> Result<MessageBatch> {
    let root: Value = serde_json::from_slice(content).context("blob content is not valid JSON")?;

    let items = match root {
        Value::Array(items) => items,
        other => {
            return Err(anyhow!(
                "top-level JSON value is {}, expected an array",
                type_name(&other)
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, message)| {
            serde_json::to_string(message).with_context(|| format!("re-serializing message {i}"))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
