use chrono::Utc;
use visionary_server::{run_unseal_sweep, AppState};

use super::load_config;
use crate::output::print_json;

pub fn run(json: bool) -> anyhow::Result<()> {
    let config = load_config()?;
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(async move {
        let state = AppState::from_config(config)?;
        run_unseal_sweep(&state, Utc::now()).await
    })?;

    if json {
        return print_json(&report);
    }
    println!(
        "due: {}  delivered: {}  failed: {}  unmarked: {}",
        report.due, report.delivered, report.failed, report.unmarked
    );
    Ok(())
}
