use anyhow::Context;
use uuid::Uuid;
use visionary_core::seal::NoteCipher;
use visionary_core::store::CapsuleDb;
use visionary_core::VisionaryError;

use super::load_config;
use crate::output::{print_json, print_table, truncate};

pub fn list(json: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let db = CapsuleDb::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let capsules = db.list_all()?;

    if json {
        return print_json(&capsules);
    }
    if capsules.is_empty() {
        println!("No capsules.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = capsules
        .iter()
        .map(|c| {
            let status = match c.unsealed_at {
                Some(at) => format!("unsealed {}", at.format("%Y-%m-%d")),
                None => "sealed".to_string(),
            };
            vec![
                c.id.to_string(),
                c.email.clone(),
                truncate(&c.goal, 40),
                c.created_at.format("%Y-%m-%d").to_string(),
                status,
            ]
        })
        .collect();
    print_table(&["ID", "EMAIL", "GOAL", "CREATED", "STATUS"], &rows);
    Ok(())
}

fn parse_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id.trim()).with_context(|| format!("'{id}' is not a capsule id"))
}

pub fn open(id: &str, json: bool) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let config = load_config()?;
    let db = CapsuleDb::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let capsule = db
        .get(id)?
        .ok_or_else(|| VisionaryError::CapsuleNotFound(id.to_string()))?;
    let note = NoteCipher::new(&config.secret_key)?.open(&capsule.encrypted_note)?;

    if json {
        return print_json(&serde_json::json!({
            "id": capsule.id,
            "email": capsule.email,
            "goal": capsule.goal,
            "note": note,
        }));
    }
    println!("{note}");
    Ok(())
}

pub fn delete(id: &str, json: bool) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let config = load_config()?;
    let db = CapsuleDb::open(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    if !db.remove(id)? {
        return Err(VisionaryError::CapsuleNotFound(id.to_string()).into());
    }

    if json {
        return print_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    println!("Deleted capsule {id}.");
    Ok(())
}
