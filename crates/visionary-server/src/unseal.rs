//! Unseal sweep: deliver the unseal email for every capsule whose date has
//! passed, exactly once.
//!
//! A capsule is marked unsealed only after the mailer accepted its email.
//! Failed deliveries stay pending and are retried on the next tick, and
//! delivered capsules never show up in `pending_unseal` again, so running
//! the sweep any number of times sends at most one email per capsule.

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use visionary_core::capsule::Capsule;
use visionary_core::email;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepReport {
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Emails that went out but could not be recorded as delivered.
    pub unmarked: usize,
}

async fn deliver(app: &AppState, capsule: &Capsule) -> anyhow::Result<()> {
    let note = app.cipher.open(&capsule.encrypted_note)?;
    let message = email::unseal_email(capsule, &note);
    app.mailer
        .send_email(&message.to, &message.subject, &message.body)
        .await?;
    Ok(())
}

/// Run one sweep over capsules due by `now`, sequentially.
///
/// Returns `Err` only when listing due capsules fails. Per-capsule send
/// failures are counted in [`SweepReport::failed`]; a sent email whose
/// capsule could not be marked afterwards is counted in
/// [`SweepReport::unmarked`]. Either way the sweep moves on to the next
/// capsule.
pub async fn run_unseal_sweep(app: &AppState, now: DateTime<Utc>) -> anyhow::Result<SweepReport> {
    let store = app.store.clone();
    let due = tokio::task::spawn_blocking(move || store.pending_unseal(now)).await??;

    let mut report = SweepReport {
        due: due.len(),
        ..SweepReport::default()
    };

    for capsule in due {
        if let Err(e) = deliver(app, &capsule).await {
            tracing::warn!(capsule = %capsule.id, error = %e, "unseal delivery failed");
            report.failed += 1;
            continue;
        }

        let store = app.store.clone();
        let id = capsule.id;
        let marked = tokio::task::spawn_blocking(move || store.mark_unsealed(id, now))
            .await
            .map_err(anyhow::Error::from)
            .and_then(|r| r.map_err(anyhow::Error::from));
        if let Err(e) = marked {
            tracing::error!(capsule = %id, error = %e, "unseal email sent but capsule not marked");
            report.unmarked += 1;
            continue;
        }
        tracing::info!(capsule = %id, "capsule unsealed");
        report.delivered += 1;
    }

    Ok(report)
}

/// Spawn the periodic sweep. The first sweep runs immediately.
pub fn spawn_unseal_scheduler(app: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(app.config.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match run_unseal_sweep(&app, Utc::now()).await {
                Ok(report) if report.due > 0 => {
                    tracing::info!(
                        due = report.due,
                        delivered = report.delivered,
                        failed = report.failed,
                        unmarked = report.unmarked,
                        "unseal sweep finished"
                    );
                }
                Ok(_) => tracing::debug!("unseal sweep: nothing due"),
                Err(e) => tracing::error!(error = %e, "unseal sweep failed"),
            }
        }
    })
}
