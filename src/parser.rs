//! Command assembler
//!
//! Ties tokenizer, classifier and extractors together into one
//! `ParsedCommand`. Parsing is total: any input, including garbage, yields a
//! well-formed result.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::classifier::detect_intent;
use crate::commands::CommandDefinition;
use crate::entities::{extract_entities, CommandEntities, EntityContext};
use crate::intent::{CommandIntent, Visualization};
use crate::parameters::{extract_parameters, Parameters};
use crate::tables::ParserTables;
use crate::tokenizer::{tokenize, Token};

#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub context: Option<EntityContext>,
    /// Carried for callers that chain an enhancement; the synchronous parse ignores it
    pub enable_ai: bool,
}

/// Structured result of parsing omnibox input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParsedCommand {
    pub raw: String,
    pub intent: CommandIntent,
    pub entities: CommandEntities,
    pub confidence: f32,
    pub visualization: Visualization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub parameters: Parameters,
}

/// Parser bound to a set of lookup tables
#[derive(Clone)]
pub struct CommandParser {
    tables: Arc<ParserTables>,
}

impl CommandParser {
    pub fn new(tables: Arc<ParserTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ParserTables {
        &self.tables
    }

    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        tokenize(input)
    }

    pub fn parse(&self, input: &str, options: &ParseOptions) -> ParsedCommand {
        let empty = EntityContext::default();
        let context = options.context.as_ref().unwrap_or(&empty);

        let tokens = tokenize(input);
        let found = detect_intent(&self.tables, &tokens);
        let entities = extract_entities(&self.tables, &tokens, context);
        let command = self.match_command(&tokens);

        tracing::debug!(
            input = %input,
            intent = %found.intent,
            confidence = found.confidence,
            command = command.map(|c| c.id.as_str()).unwrap_or("-"),
            "parsed omnibox input"
        );

        ParsedCommand {
            raw: input.to_string(),
            intent: found.intent,
            entities,
            confidence: found.confidence,
            visualization: self.tables.visualization_for(found.intent),
            action: command.and_then(|c| c.action.clone()),
            parameters: extract_parameters(&tokens, command),
        }
    }

    /// Best command by the exact-alias rule
    pub fn match_command(&self, tokens: &[Token]) -> Option<&CommandDefinition> {
        self.tables.commands.find_by_alias(tokens)
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(ParserTables::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedCommand {
        CommandParser::default().parse(input, &ParseOptions::default())
    }

    #[test]
    fn test_parse_action_command() {
        let cmd = parse("pause laptop");
        assert_eq!(cmd.raw, "pause laptop");
        assert_eq!(cmd.intent, CommandIntent::ActionPause);
        assert_eq!(cmd.confidence, 1.0);
        assert_eq!(cmd.visualization, Visualization::DeviceConstellation);
        assert_eq!(cmd.action.as_deref(), Some("pause_device"));
        assert_eq!(cmd.parameters["device"], "laptop");
    }

    #[test]
    fn test_raw_keeps_original_text() {
        let cmd = parse("  Status  ");
        assert_eq!(cmd.raw, "  Status  ");
        assert_eq!(cmd.intent, CommandIntent::QueryStatus);
    }

    #[test]
    fn test_no_command_no_action() {
        let cmd = parse("show me my devices");
        assert_eq!(cmd.intent, CommandIntent::QueryDevice);
        assert!(cmd.action.is_none());
        assert!(cmd.parameters.is_empty());
        assert_eq!(cmd.visualization, Visualization::DeviceConstellation);
    }

    #[test]
    fn test_empty_input() {
        let cmd = parse("");
        assert_eq!(cmd.intent, CommandIntent::Unknown);
        assert_eq!(cmd.confidence, 0.0);
        assert_eq!(cmd.visualization, Visualization::Overview);
        assert!(cmd.entities.is_empty());
    }

    #[test]
    fn test_context_is_used() {
        let options = ParseOptions {
            context: Some(EntityContext {
                devices: vec!["Laptop".into()],
                folders: vec![],
            }),
            enable_ai: false,
        };
        let cmd = CommandParser::default().parse("pause laptop", &options);
        assert_eq!(cmd.entities.devices, Some(vec!["Laptop".to_string()]));
    }

    #[test]
    fn test_action_omitted_from_json_when_absent() {
        let json = serde_json::to_value(parse("status")).unwrap();
        assert!(json.get("action").is_none());
        assert_eq!(json["intent"], "query-status");
        assert_eq!(json["visualization"], "overview");
    }
}
