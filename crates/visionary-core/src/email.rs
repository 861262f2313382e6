//! Plain-text emails sent for a capsule.

use crate::capsule::Capsule;
use crate::roadmap::Roadmap;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

fn write_roadmap(out: &mut String, roadmap: &Roadmap) {
    if roadmap.is_empty() {
        out.push_str("  (the model returned no tasks)\n");
        return;
    }
    for (month, task) in roadmap.entries() {
        let _ = writeln!(out, "  {month}: {task}");
    }
}

/// Sent right after a capsule is created.
pub fn roadmap_email(capsule: &Capsule) -> Email {
    let mut body = String::new();
    let _ = writeln!(body, "Your goal: {}", capsule.goal);
    body.push('\n');
    body.push_str("Your 12-month roadmap:\n");
    write_roadmap(&mut body, &capsule.roadmap);
    body.push('\n');
    let _ = writeln!(
        body,
        "Your private note is sealed until {}.",
        capsule.unseal_at.format("%B %-d, %Y")
    );

    Email {
        to: capsule.email.clone(),
        subject: format!("Your Visionary 2026 roadmap: {}", capsule.goal),
        body,
    }
}

/// Sent by the unseal sweep once the capsule's date has passed.
pub fn unseal_email(capsule: &Capsule, note: &str) -> Email {
    let mut body = String::new();
    body.push_str("Your time capsule is open.\n\n");
    let _ = writeln!(body, "The goal you set: {}", capsule.goal);
    body.push('\n');
    body.push_str("The note you wrote to yourself:\n\n");
    body.push_str(note);
    body.push_str("\n\nThe roadmap you started with:\n");
    write_roadmap(&mut body, &capsule.roadmap);

    Email {
        to: capsule.email.clone(),
        subject: "Your Visionary 2026 capsule is unsealed".to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capsule::NewCapsule;
    use crate::roadmap::extract_roadmap;
    use chrono::{TimeZone, Utc};

    fn capsule() -> Capsule {
        let input = NewCapsule::new("ana@example.com", "Ship a game", "keep going").unwrap();
        Capsule::new(
            &input,
            "v1:sealed".into(),
            extract_roadmap(r#"{"February":"Prototype","January":"Pick an engine"}"#),
            Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap(),
        )
    }

    #[test]
    fn roadmap_email_lists_months_in_calendar_order() {
        let email = roadmap_email(&capsule());
        assert_eq!(email.to, "ana@example.com");
        assert!(email.subject.contains("Ship a game"));
        let jan = email.body.find("January: Pick an engine").unwrap();
        let feb = email.body.find("February: Prototype").unwrap();
        assert!(jan < feb);
        assert!(email.body.contains("sealed until December 31, 2026"));
        assert!(!email.body.contains("v1:sealed"));
    }

    #[test]
    fn unseal_email_reveals_note() {
        let email = unseal_email(&capsule(), "keep going");
        assert_eq!(email.to, "ana@example.com");
        assert!(email.subject.contains("unsealed"));
        assert!(email.body.contains("keep going"));
        assert!(email.body.contains("The goal you set: Ship a game"));
        assert!(email.body.contains("January: Pick an engine"));
    }

    #[test]
    fn empty_roadmap_is_called_out() {
        let mut c = capsule();
        c.roadmap = extract_roadmap("{}").value;
        let email = roadmap_email(&c);
        assert!(email.body.contains("(the model returned no tasks)"));
    }
}
