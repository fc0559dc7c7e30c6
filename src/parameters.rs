//! Positional parameter binding
//!
//! Binds the tokens after the command word to a command's declared
//! parameters, in order. Values stay raw strings whatever the declared type.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::commands::CommandDefinition;
use crate::tokenizer::Token;

/// Parameter name -> raw value, always a JSON string
pub type Parameters = BTreeMap<String, Value>;

pub fn extract_parameters(tokens: &[Token], command: Option<&CommandDefinition>) -> Parameters {
    let mut params = Parameters::new();

    let Some(command) = command else {
        return params;
    };
    if tokens.len() < 2 {
        return params;
    }

    let values = tokens[1..].iter().filter(|t| !t.is_flag());

    // zip stops at whichever side runs out first
    for (def, token) in command.parameters.iter().zip(values) {
        params.insert(def.name.clone(), Value::String(token.value.clone()));
    }

    params
}
