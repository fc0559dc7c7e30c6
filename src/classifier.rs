//! Intent classifier
//!
//! Routes tokens to a single intent through a chain of stages, cheapest and
//! most certain first:
//! 1. Exact alias match against the command table
//! 2. Question patterns ("what", "why", "how", ...)
//! 3. Leading action verbs ("show", "sync", "pause", ...)
//! 4. Keyword fuzzy match, which always produces a result

use crate::intent::{CommandIntent, IntentMatch};
use crate::tables::ParserTables;
use crate::tokenizer::{joined_text, Token};

pub const EXACT_CONFIDENCE: f32 = 1.0;
pub const ACTION_CONFIDENCE: f32 = 0.8;
pub const REFINED_CONFIDENCE: f32 = 0.9;
pub const FUZZY_CONFIDENCE: f32 = 0.6;
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// A classification stage: tables, tokens and their joined text in,
/// a match out if the stage applies
type Stage = fn(&ParserTables, &[Token], &str) -> Option<IntentMatch>;

const STAGES: [(&str, Stage); 3] = [
    ("exact", exact_match),
    ("question", question_match),
    ("action", action_match),
];

/// Classify tokens into one intent. Pure: same tokens and tables, same result.
pub fn detect_intent(tables: &ParserTables, tokens: &[Token]) -> IntentMatch {
    if tokens.is_empty() {
        return IntentMatch::new(CommandIntent::Unknown, 0.0);
    }

    let full_text = joined_text(tokens);

    for (name, stage) in STAGES {
        if let Some(found) = stage(tables, tokens, &full_text) {
            tracing::trace!(stage = name, intent = %found.intent, confidence = found.confidence, "intent matched");
            return found;
        }
    }

    let found = fuzzy_match(tables, &full_text);
    tracing::trace!(stage = "fuzzy", intent = %found.intent, confidence = found.confidence, "intent matched");
    found
}

fn exact_match(tables: &ParserTables, tokens: &[Token], _full_text: &str) -> Option<IntentMatch> {
    tables
        .commands
        .find_by_alias(tokens)
        .map(|cmd| IntentMatch::new(tables.commands.intent_for(&cmd.id), EXACT_CONFIDENCE))
}

fn question_match(tables: &ParserTables, tokens: &[Token], full_text: &str) -> Option<IntentMatch> {
    let first = tokens.first()?;
    if !tables.is_question_starter(&first.value) {
        return None;
    }

    Some(detect_question_intent(tables, full_text))
}

/// Question rules are checked in order; unmatched questions are status queries
fn detect_question_intent(tables: &ParserTables, text: &str) -> IntentMatch {
    tables
        .question_rules
        .iter()
        .find(|r| r.matches(text))
        .map(|r| IntentMatch::new(r.intent, r.confidence))
        .unwrap_or(tables.question_default)
}

fn action_match(tables: &ParserTables, tokens: &[Token], _full_text: &str) -> Option<IntentMatch> {
    let first = tokens.first()?;
    let verb = tables.action_verb(&first.value)?;
    let base = verb.intent.unwrap_or(CommandIntent::Unknown);

    // "show devices", "list folders with errors": refine generic views by target
    if base == CommandIntent::QueryStatus && tokens.len() > 1 {
        let rest = joined_text(&tokens[1..]);
        if let Some(refined) = tables.status_refinements.iter().find(|r| r.matches(&rest)) {
            return Some(IntentMatch::new(refined.intent, REFINED_CONFIDENCE));
        }
    }

    Some(IntentMatch::new(base, ACTION_CONFIDENCE))
}

fn fuzzy_match(tables: &ParserTables, full_text: &str) -> IntentMatch {
    tables
        .fuzzy_groups
        .iter()
        .find(|g| g.matches(full_text))
        .map(|g| IntentMatch::new(g.intent, FUZZY_CONFIDENCE))
        .unwrap_or(IntentMatch::new(CommandIntent::QueryStatus, FALLBACK_CONFIDENCE))
}
