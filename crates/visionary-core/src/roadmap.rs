//! Tolerant recovery of a month→task roadmap from free-form model output.
//!
//! Generative models are asked for a bare JSON object but routinely wrap it
//! in prose, markdown fences, or stray control bytes. [`extract_roadmap`]
//! cleans the text, takes the outermost `{ … }` span, and parses it. When
//! nothing usable comes back the caller gets [`Roadmap::fallback`] instead,
//! so persistence and email rendering never see a missing roadmap.
//!
//! Parsed objects are accepted as-is: keys are not checked against month
//! names and values are not required to be strings.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Canonical month names, in calendar order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const FALLBACK_TASKS: [&str; 12] = [
    "Initiate mission",
    "Build foundations",
    "Develop core skills",
    "Expand knowledge",
    "Practice consistently",
    "Mid-year review",
    "Refine approach",
    "Push boundaries",
    "Deepen expertise",
    "Apply learnings",
    "Final push",
    "Goal achievement",
];

// ---------------------------------------------------------------------------
// Roadmap
// ---------------------------------------------------------------------------

/// Month → task mapping, in the key order the model produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roadmap(Map<String, Value>);

impl Roadmap {
    /// The fixed twelve-month roadmap used whenever extraction fails.
    pub fn fallback() -> Self {
        let map = MONTHS
            .iter()
            .zip(FALLBACK_TASKS.iter())
            .map(|(month, task)| (month.to_string(), Value::String(task.to_string())))
            .collect();
        Self(map)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Task text for `key`, rendered the same way as in [`Roadmap::entries`].
    pub fn task(&self, key: &str) -> Option<String> {
        self.0.get(key).map(render_value)
    }

    /// Entries in display order: canonical months January→December first,
    /// then any other keys in their original order.
    pub fn entries(&self) -> Vec<(&str, String)> {
        let mut months: Vec<(usize, &str, String)> = Vec::new();
        let mut others: Vec<(&str, String)> = Vec::new();
        for (key, value) in &self.0 {
            match month_index(key) {
                Some(idx) => months.push((idx, key.as_str(), render_value(value))),
                None => others.push((key.as_str(), render_value(value))),
            }
        }
        months.sort_by_key(|(idx, _, _)| *idx);
        months
            .into_iter()
            .map(|(_, key, task)| (key, task))
            .chain(others)
            .collect()
    }

    /// JSON object with keys in display order.
    pub fn to_display_json(&self) -> Value {
        let ordered: Map<String, Value> = self
            .entries()
            .into_iter()
            .filter_map(|(key, _)| self.0.get(key).map(|v| (key.to_string(), v.clone())))
            .collect();
        Value::Object(ordered)
    }
}

fn month_index(key: &str) -> Option<usize> {
    let key = key.trim();
    MONTHS.iter().position(|m| m.eq_ignore_ascii_case(key))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Parsed,
    FallbackUsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub outcome: Outcome,
    pub value: Roadmap,
}

impl ExtractionResult {
    pub fn is_fallback(&self) -> bool {
        self.outcome == Outcome::FallbackUsed
    }

    fn fallback() -> Self {
        Self {
            outcome: Outcome::FallbackUsed,
            value: Roadmap::fallback(),
        }
    }
}

static CONTROL_RE: OnceLock<Regex> = OnceLock::new();

fn control_re() -> &'static Regex {
    CONTROL_RE.get_or_init(|| Regex::new(r"[\x00-\x1F\x7F-\x9F]").unwrap())
}

/// Remove C0 and C1 control characters (`U+0000..=U+001F`, `U+007F..=U+009F`).
pub fn strip_control_chars(raw: &str) -> String {
    control_re().replace_all(raw, "").into_owned()
}

/// Recover a roadmap from raw model output. Never fails.
pub fn extract_roadmap(raw_text: &str) -> ExtractionResult {
    let cleaned = strip_control_chars(raw_text);

    let Some(start) = cleaned.find('{') else {
        return ExtractionResult::fallback();
    };
    let Some(end) = cleaned.rfind('}') else {
        return ExtractionResult::fallback();
    };
    if end < start {
        return ExtractionResult::fallback();
    }

    match serde_json::from_str::<Map<String, Value>>(&cleaned[start..=end]) {
        Ok(map) => ExtractionResult {
            outcome: Outcome::Parsed,
            value: Roadmap(map),
        },
        Err(_) => ExtractionResult::fallback(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
