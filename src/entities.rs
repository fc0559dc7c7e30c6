//! Entity extraction
//!
//! Pulls device, folder and file references, a relative time range and an
//! ignore-style glob pattern out of tokenized input. Each pass runs
//! independently; empty results are left out.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tables::ParserTables;
use crate::tokenizer::{joined_text, Token, TokenKind};

lazy_static! {
    static ref LAST_N_RE: Regex = Regex::new(r"last (\d+) (day|hour|week|month)s?").unwrap();
}

/// Names the parser can resolve references against
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityContext {
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
}

/// Entities mentioned in the input. `None` means "not mentioned".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folders: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl CommandEntities {
    pub fn is_empty(&self) -> bool {
        self.devices.is_none()
            && self.folders.is_none()
            && self.files.is_none()
            && self.time_range.is_none()
            && self.pattern.is_none()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Free-text bucket such as "last 7 days"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<String>,
}

impl TimeRange {
    pub fn relative(phrase: impl Into<String>) -> Self {
        Self {
            start: None,
            end: None,
            relative: Some(phrase.into()),
        }
    }

    /// Fill `start`/`end` from the relative phrase, anchored at `now`.
    /// Unrecognized phrases come back unchanged.
    pub fn resolve(&self, now: DateTime<Utc>) -> TimeRange {
        let Some(phrase) = self.relative.as_deref() else {
            return self.clone();
        };

        let start_of_day = |t: DateTime<Utc>| {
            Utc.with_ymd_and_hms(t.year(), t.month(), t.day(), 0, 0, 0)
                .single()
                .unwrap_or(t)
        };
        let start_of_month = |t: DateTime<Utc>| {
            Utc.with_ymd_and_hms(t.year(), t.month(), 1, 0, 0, 0)
                .single()
                .unwrap_or(t)
        };

        let (start, end) = match phrase {
            "today" => (start_of_day(now), now),
            "yesterday" => {
                let today = start_of_day(now);
                (today - Duration::days(1), today)
            }
            "this week" => {
                let days_in = now.weekday().num_days_from_monday() as i64;
                (start_of_day(now) - Duration::days(days_in), now)
            }
            "last week" => {
                let days_in = now.weekday().num_days_from_monday() as i64;
                let this_week = start_of_day(now) - Duration::days(days_in);
                (this_week - Duration::weeks(1), this_week)
            }
            "this month" => (start_of_month(now), now),
            "last month" => {
                let this_month = start_of_month(now);
                let prev = this_month - Duration::days(1);
                (start_of_month(prev), this_month)
            }
            "last hour" | "past hour" => (now - Duration::hours(1), now),
            "last 24 hours" | "recently" => (now - Duration::hours(24), now),
            other => match LAST_N_RE.captures(other) {
                Some(caps) => {
                    let n: i64 = match caps[1].parse() {
                        Ok(n) => n,
                        Err(_) => return self.clone(),
                    };
                    let span = match &caps[2] {
                        "hour" => Duration::try_hours(n),
                        "day" => Duration::try_days(n),
                        "week" => Duration::try_weeks(n),
                        _ => n.checked_mul(30).and_then(Duration::try_days),
                    };
                    match span.and_then(|s| now.checked_sub_signed(s)) {
                        Some(start) => (start, now),
                        None => return self.clone(),
                    }
                }
                None => return self.clone(),
            },
        };

        TimeRange {
            start: Some(start),
            end: Some(end),
            relative: self.relative.clone(),
        }
    }
}

/// Run every extraction pass and merge the results
pub fn extract_entities(tables: &ParserTables, tokens: &[Token], context: &EntityContext) -> CommandEntities {
    let full_text = joined_text(tokens);

    let entities = CommandEntities {
        devices: non_empty(match_known_names(tokens, &context.devices)),
        folders: non_empty(match_known_names(tokens, &context.folders)),
        files: non_empty(extract_files(tokens)),
        time_range: extract_time_range(tables, &full_text),
        pattern: extract_pattern(tokens),
    };

    tracing::trace!(?entities, "extracted entities");
    entities
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Loose two-way containment: a token inside the name, or the name inside a token.
/// Short names ("pc") will match generously.
fn match_known_names(tokens: &[Token], names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| {
            let lower = name.to_lowercase();
            tokens
                .iter()
                .filter(|t| !t.value.is_empty())
                .any(|t| lower.contains(t.value.as_str()) || t.value.contains(lower.as_str()))
        })
        .cloned()
        .collect()
}

/// Dotted words that aren't dotfiles, then every quoted span
fn extract_files(tokens: &[Token]) -> Vec<String> {
    let words = tokens.iter().filter(|t| {
        t.kind == TokenKind::Word && t.value.contains('.') && !t.value.starts_with('.') && t.value != "."
    });
    let quoted = tokens.iter().filter(|t| t.kind == TokenKind::Quoted);

    words.chain(quoted).map(|t| t.value.clone()).collect()
}

fn extract_time_range(tables: &ParserTables, full_text: &str) -> Option<TimeRange> {
    if let Some(phrase) = tables
        .time_expressions
        .iter()
        .find(|p| full_text.contains(p.as_str()))
    {
        return Some(TimeRange::relative(phrase.clone()));
    }

    LAST_N_RE
        .captures(full_text)
        .map(|caps| TimeRange::relative(format!("last {} {}s", &caps[1], &caps[2])))
}

fn extract_pattern(tokens: &[Token]) -> Option<String> {
    tokens
        .iter()
        .find(|t| t.value.contains('*') || t.value.starts_with('.'))
        .or_else(|| tokens.iter().find(|t| t.kind == TokenKind::Quoted))
        .map(|t| t.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn extract(input: &str, devices: &[&str], folders: &[&str]) -> CommandEntities {
        let context = EntityContext {
            devices: devices.iter().map(|s| s.to_string()).collect(),
            folders: folders.iter().map(|s| s.to_string()).collect(),
        };
        extract_entities(&ParserTables::builtin(), &tokenize(input), &context)
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_devices_and_folders() {
        let e = extract("sync Documents with Desktop PC", &["Desktop PC", "Phone"], &["Documents", "Music"]);
        assert_eq!(e.devices, Some(vec!["Desktop PC".to_string()]));
        assert_eq!(e.folders, Some(vec!["Documents".to_string()]));
    }

    #[test]
    fn test_name_inside_token() {
        let e = extract("pause mylaptop2", &["laptop"], &[]);
        assert_eq!(e.devices, Some(vec!["laptop".to_string()]));
    }

    #[test]
    fn test_no_context_no_devices() {
        let e = extract("pause laptop", &[], &[]);
        assert!(e.devices.is_none());
        assert!(e.folders.is_none());
    }

    #[test]
    fn test_empty_quoted_token_matches_nothing() {
        let e = extract(r#"find """#, &["Laptop"], &[]);
        assert!(e.devices.is_none());
    }

    #[test]
    fn test_files() {
        let e = extract(r#"resolve notes.md .bashrc "my report""#, &[], &[]);
        assert_eq!(
            e.files,
            Some(vec!["notes.md".to_string(), "my report".to_string()])
        );
    }

    #[test]
    fn test_relative_phrase() {
        let e = extract("changes since yesterday", &[], &[]);
        assert_eq!(e.time_range, Some(TimeRange::relative("yesterday")));
    }

    #[test]
    fn test_last_n_units() {
        let e = extract("show changes from last 3 days", &[], &[]);
        assert_eq!(e.time_range, Some(TimeRange::relative("last 3 days")));

        let e = extract("errors in the last 2 hour", &[], &[]);
        assert_eq!(e.time_range, Some(TimeRange::relative("last 2 hours")));
    }

    #[test]
    fn test_no_time_range() {
        let e = extract("show devices", &[], &[]);
        assert!(e.time_range.is_none());
    }

    #[test]
    fn test_pattern() {
        assert_eq!(extract("ignore *.tmp", &[], &[]).pattern, Some("*.tmp".to_string()));
        assert_eq!(extract("ignore .ds_store", &[], &[]).pattern, Some(".ds_store".to_string()));
        assert_eq!(
            extract(r#"ignore "build output""#, &[], &[]).pattern,
            Some("build output".to_string())
        );
        assert!(extract("ignore nothing", &[], &[]).pattern.is_none());
    }

    #[test]
    fn test_empty_entities_serialize_to_empty_object() {
        let e = extract("status", &[], &[]);
        assert!(e.is_empty());
        assert_eq!(serde_json::to_string(&e).unwrap(), "{}");
    }

    #[test]
    fn test_time_range_field_is_camel_case() {
        let e = extract("history today", &[], &[]);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["timeRange"]["relative"], "today");
    }

    #[test]
    fn test_resolve_last_n_days() {
        let now = at(2024, 5, 15, 12);
        let r = TimeRange::relative("last 3 days").resolve(now);
        assert_eq!(r.start, Some(at(2024, 5, 12, 12)));
        assert_eq!(r.end, Some(now));
        assert_eq!(r.relative.as_deref(), Some("last 3 days"));
    }

    #[test]
    fn test_resolve_yesterday() {
        let now = at(2024, 5, 15, 12);
        let r = TimeRange::relative("yesterday").resolve(now);
        assert_eq!(r.start, Some(at(2024, 5, 14, 0)));
        assert_eq!(r.end, Some(at(2024, 5, 15, 0)));
    }

    #[test]
    fn test_resolve_last_month() {
        // 2024-03-10 -> February 2024
        let now = at(2024, 3, 10, 8);
        let r = TimeRange::relative("last month").resolve(now);
        assert_eq!(r.start, Some(at(2024, 2, 1, 0)));
        assert_eq!(r.end, Some(at(2024, 3, 1, 0)));
    }

    #[test]
    fn test_resolve_this_week_starts_monday() {
        // 2024-05-15 is a Wednesday
        let now = at(2024, 5, 15, 12);
        let r = TimeRange::relative("this week").resolve(now);
        assert_eq!(r.start, Some(at(2024, 5, 13, 0)));
    }

    #[test]
    fn test_resolve_unknown_phrase_unchanged() {
        let r = TimeRange::relative("someday");
        assert_eq!(r.resolve(at(2024, 1, 1, 0)), r);
    }
}
