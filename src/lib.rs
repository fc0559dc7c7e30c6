//! omnibox_core - natural-language command parsing for the Eigen sync client
//!
//! Turns free-text omnibox input into a structured command (intent,
//! entities, target view, backend action) and ranks completions for partial
//! input.
//!
//! Modules:
//! - tokenizer: words, quoted spans, flags and connective operators
//! - classifier: staged intent detection (alias, question, verb, fuzzy)
//! - entities: devices, folders, files, time ranges, ignore patterns
//! - parameters: positional binding to declared command parameters
//! - parser: assembles a `ParsedCommand`
//! - suggestions: ranked completions for partial input
//! - enhance: optional async similarity refinement
//! - commands / tables: built-in or loaded lookup tables
//! - config: JSON settings
//!
//! Every parse and suggestion call is pure and synchronous; only the
//! enhancement step is async.

pub mod error;
pub mod intent;
pub mod tokenizer;
pub mod commands;
pub mod tables;
pub mod classifier;
pub mod entities;
pub mod parameters;
pub mod parser;
pub mod suggestions;
pub mod enhance;
pub mod config;

#[cfg(feature = "napi")]
pub mod napi_bridge;

// Re-export key types for convenience
pub use error::{OmniboxError, Result};

pub use intent::{CommandIntent, IntentMatch, Visualization};

pub use tokenizer::{tokenize, Token, TokenKind};

pub use commands::{CommandCategory, CommandDefinition, CommandTable, ParameterDefinition, ParameterType};

pub use tables::ParserTables;

pub use classifier::detect_intent;

pub use entities::{extract_entities, CommandEntities, EntityContext, TimeRange};

pub use parameters::{extract_parameters, Parameters};

pub use parser::{CommandParser, ParseOptions, ParsedCommand};

pub use suggestions::{CommandSuggestion, SuggestionContext, SuggestionEngine, SuggestionSource};

pub use enhance::{enhance_parsing_with_ai, SimilarCommand};

pub use config::OmniboxConfig;

/// Parse with the built-in tables
pub fn parse_command(input: &str, options: &ParseOptions) -> ParsedCommand {
    CommandParser::default().parse(input, options)
}

/// Suggest with the built-in tables and default limits
pub fn generate_suggestions(input: &str, context: &SuggestionContext) -> Vec<CommandSuggestion> {
    SuggestionEngine::new(ParserTables::shared()).suggest(input, context)
}
