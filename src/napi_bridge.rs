/*!
 * N-API Bridge - Expose the omnibox to Node.js/Electron
 *
 * Provides Node.js bindings for:
 * - Tokenizing input
 * - Parsing input into a structured command
 * - Ranking suggestions for partial input
 *
 * Structured results cross the boundary as JSON strings so the TypeScript
 * side keeps its own type definitions.
 */

use napi::bindgen_prelude::*;
use napi_derive::napi;

use crate::entities::EntityContext;
use crate::parser::ParseOptions;
use crate::suggestions::SuggestionContext;

/// A single token, mirrored as a plain JS object
#[napi(object)]
pub struct OmniboxToken {
    pub kind: String,
    pub value: String,
    pub position: u32,
}

#[napi]
pub fn tokenize_js(input: String) -> Vec<OmniboxToken> {
    crate::tokenize(&input)
        .into_iter()
        .map(|t| OmniboxToken {
            kind: t.kind.as_str().to_string(),
            value: t.value,
            position: t.position as u32,
        })
        .collect()
}

/// Parse input and return the `ParsedCommand` as JSON
#[napi]
pub fn parse_command_js(
    input: String,
    devices: Option<Vec<String>>,
    folders: Option<Vec<String>>,
) -> Result<String> {
    let options = ParseOptions {
        context: Some(EntityContext {
            devices: devices.unwrap_or_default(),
            folders: folders.unwrap_or_default(),
        }),
        enable_ai: false,
    };
    let parsed = crate::parse_command(&input, &options);

    serde_json::to_string(&parsed)
        .map_err(|e| Error::from_reason(format!("Failed to serialize command: {}", e)))
}

/// Rank suggestions and return them as a JSON array
#[napi]
pub fn generate_suggestions_js(
    input: String,
    devices: Option<Vec<String>>,
    folders: Option<Vec<String>>,
    history: Option<Vec<String>>,
) -> Result<String> {
    let context = SuggestionContext {
        devices: devices.unwrap_or_default(),
        folders: folders.unwrap_or_default(),
        history: history.unwrap_or_default(),
    };
    let suggestions = crate::generate_suggestions(&input, &context);

    serde_json::to_string(&suggestions)
        .map_err(|e| Error::from_reason(format!("Failed to serialize suggestions: {}", e)))
}
