use crate::error::{Result, VisionaryError};
use crate::roadmap::{ExtractionResult, Roadmap};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

const MAX_EMAIL_LEN: usize = 254;
const MAX_GOAL_LEN: usize = 500;
const MAX_NOTE_LEN: usize = 5000;

// ---------------------------------------------------------------------------
// NewCapsule: validated request input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NewCapsule {
    pub email: String,
    pub goal: String,
    pub note: String,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(VisionaryError::invalid("email", "must not be empty"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(VisionaryError::invalid(
            "email",
            format!("must be at most {MAX_EMAIL_LEN} characters"),
        ));
    }
    if !email_re().is_match(email) {
        return Err(VisionaryError::invalid(
            "email",
            format!("'{email}' is not an email address"),
        ));
    }
    Ok(())
}

impl NewCapsule {
    /// Validate raw request fields. Email and goal are trimmed; the note is
    /// kept byte-for-byte.
    pub fn new(email: &str, goal: &str, note: &str) -> Result<Self> {
        let email = email.trim();
        validate_email(email)?;

        let goal = goal.trim();
        if goal.is_empty() {
            return Err(VisionaryError::invalid("goal", "must not be empty"));
        }
        if goal.chars().count() > MAX_GOAL_LEN {
            return Err(VisionaryError::invalid(
                "goal",
                format!("must be at most {MAX_GOAL_LEN} characters"),
            ));
        }

        if note.trim().is_empty() {
            return Err(VisionaryError::invalid("note", "must not be empty"));
        }
        if note.chars().count() > MAX_NOTE_LEN {
            return Err(VisionaryError::invalid(
                "note",
                format!("must be at most {MAX_NOTE_LEN} characters"),
            ));
        }

        Ok(Self {
            email: email.to_string(),
            goal: goal.to_string(),
            note: note.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Capsule: the persisted record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub id: Uuid,
    pub email: String,
    pub goal: String,
    pub encrypted_note: String,
    pub roadmap: Roadmap,
    #[serde(default)]
    pub roadmap_fallback: bool,
    pub unseal_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsealed_at: Option<DateTime<Utc>>,
}

impl Capsule {
    pub fn new(
        input: &NewCapsule,
        encrypted_note: String,
        extraction: ExtractionResult,
        unseal_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            goal: input.goal.clone(),
            encrypted_note,
            roadmap_fallback: extraction.is_fallback(),
            roadmap: extraction.value,
            unseal_at,
            created_at: Utc::now(),
            unsealed_at: None,
        }
    }

    pub fn is_unsealed(&self) -> bool {
        self.unsealed_at.is_some()
    }

    /// Due for the unseal email: not yet delivered and `now` is past the date.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_unsealed() && now >= self.unseal_at
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
