//! Maps a free-text voice transcript onto an [`EntryPatch`].
//!
//! Parsing is best-effort: fields that cannot be recognised stay `None` and
//! nothing here ever fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{EntryKind, EntryPatch};

pub const INCOME_KEYWORDS: [&str; 3] = ["income", "earn", "salary"];
pub const EXPENSE_KEYWORDS: [&str; 3] = ["expense", "spend", "cost"];

/// Categories recognised in transcripts, in match priority order.
pub const KNOWN_CATEGORIES: [&str; 13] = [
    "salary",
    "rent",
    "groceries",
    "utilities",
    "food",
    "transport",
    "medical",
    "entertainment",
    "shopping",
    "bills",
    "maintenance",
    "internet",
    "phone",
];

/// ASCII digits only; `f64::from_str` rejects digits from other scripts.
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("static amount pattern"));
static KIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"income|expense|earn|spend|cost").expect("static kind pattern"));
static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static spacing pattern"));

pub struct VoiceParser;

impl VoiceParser {
    pub fn parse(transcript: &str) -> EntryPatch {
        let text = transcript.to_lowercase();

        let amount = AMOUNT_RE
            .find(&text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|value| value.is_finite());

        let kind = if INCOME_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            Some(EntryKind::Income)
        } else if EXPENSE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            Some(EntryKind::Expense)
        } else {
            None
        };

        let category = KNOWN_CATEGORIES
            .iter()
            .find(|category| text.contains(*category))
            .map(|category| category.to_string());

        let mut residual = AMOUNT_RE.replace(&text, "").into_owned();
        residual = KIND_RE.replace(&residual, "").into_owned();
        if let Some(category) = &category {
            residual = residual.replacen(category.as_str(), "", 1);
        }
        let description = SPACES_RE.replace_all(residual.trim(), " ").into_owned();

        let patch = EntryPatch {
            kind,
            amount,
            category,
            description: (!description.is_empty()).then_some(description),
            date: None,
        };
        tracing::debug!(?patch, "voice transcript parsed");
        patch
    }
}
