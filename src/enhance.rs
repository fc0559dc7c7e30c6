//! Similarity-based parse enhancement
//!
//! Optional async step that runs after the deterministic parse. It embeds the
//! raw input, looks up similar known commands and may upgrade a
//! low-confidence intent. It only ever adds certainty: confidence never
//! drops, confident parses are left alone, and any failure returns the
//! input unchanged.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::intent::CommandIntent;
use crate::parser::{CommandParser, ParseOptions, ParsedCommand};
use crate::tables::ParserTables;

/// Parses at or above this confidence are never replaced
pub const HIGH_CONFIDENCE: f32 = 0.9;

/// A known command phrase returned by the similarity search
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SimilarCommand {
    pub text: String,
    pub intent: CommandIntent,
    pub similarity: f32,
}

/// Refine `command` with embedding similarity.
///
/// With no usable match this is the identity.
pub async fn enhance_parsing_with_ai<E, EFut, S, SFut>(
    tables: &ParserTables,
    command: ParsedCommand,
    min_similarity: f32,
    generate_embedding: E,
    search_similar: S,
) -> ParsedCommand
where
    E: FnOnce(String) -> EFut,
    EFut: Future<Output = anyhow::Result<Vec<f32>>>,
    S: FnOnce(Vec<f32>) -> SFut,
    SFut: Future<Output = anyhow::Result<Vec<SimilarCommand>>>,
{
    if command.confidence >= HIGH_CONFIDENCE {
        return command;
    }

    let embedding = match generate_embedding(command.raw.clone()).await {
        Ok(embedding) => embedding,
        Err(e) => {
            tracing::warn!(error = %e, "embedding failed, keeping deterministic parse");
            return command;
        }
    };

    let matches = match search_similar(embedding).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "similarity search failed, keeping deterministic parse");
            return command;
        }
    };

    let best = matches
        .into_iter()
        .filter(|m| m.similarity.is_finite())
        .max_by(|a, b| a.similarity.total_cmp(&b.similarity));

    match best {
        Some(best) if best.similarity >= min_similarity && best.similarity > command.confidence => {
            tracing::debug!(
                from = %command.intent,
                to = %best.intent,
                similarity = best.similarity,
                matched = %best.text,
                "enhanced intent"
            );
            ParsedCommand {
                intent: best.intent,
                confidence: best.similarity.min(1.0),
                visualization: tables.visualization_for(best.intent),
                ..command
            }
        }
        _ => command,
    }
}

impl CommandParser {
    /// Parse now, enhance in the background.
    ///
    /// The deterministic result is returned immediately. The handle is `None`
    /// when enhancement is disabled or no Tokio runtime is running; otherwise
    /// it resolves to the enhanced result, or to the deterministic one if
    /// enhancement fails or panics.
    pub fn parse_with_enhancement<E, EFut, S, SFut>(
        &self,
        input: &str,
        options: &ParseOptions,
        min_similarity: f32,
        generate_embedding: E,
        search_similar: S,
    ) -> (ParsedCommand, Option<JoinHandle<ParsedCommand>>)
    where
        E: FnOnce(String) -> EFut + Send + 'static,
        EFut: Future<Output = anyhow::Result<Vec<f32>>> + Send + 'static,
        S: FnOnce(Vec<f32>) -> SFut + Send + 'static,
        SFut: Future<Output = anyhow::Result<Vec<SimilarCommand>>> + Send + 'static,
    {
        let parsed = self.parse(input, options);

        if !options.enable_ai {
            return (parsed, None);
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(error = %e, "no async runtime, skipping enhancement");
                return (parsed, None);
            }
        };

        let parser = self.clone();
        let fallback = parsed.clone();
        let enhancement = runtime.spawn(async move {
            enhance_parsing_with_ai(
                parser.tables(),
                fallback,
                min_similarity,
                generate_embedding,
                search_similar,
            )
            .await
        });

        let deterministic = parsed.clone();
        let handle = runtime.spawn(async move {
            enhancement.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "enhancement task failed, keeping deterministic parse");
                deterministic
            })
        });

        (parsed, Some(handle))
    }
}
