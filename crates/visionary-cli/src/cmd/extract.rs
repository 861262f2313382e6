use anyhow::Context;
use std::io::Read;
use std::path::Path;
use visionary_core::extract_roadmap;

use crate::output::print_json;

pub fn run(file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let result = extract_roadmap(&raw);

    if json {
        return print_json(&result);
    }
    let label = if result.is_fallback() {
        "fallback (no usable JSON object found)"
    } else {
        "parsed"
    };
    println!("outcome: {label}");
    for (month, task) in result.value.entries() {
        println!("  {month}: {task}");
    }
    Ok(())
}
