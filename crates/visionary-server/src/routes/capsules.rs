use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Datelike;
use visionary_core::capsule::{Capsule, NewCapsule};
use visionary_core::{email, extract_roadmap, prompt, VisionaryError};

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct CreateCapsuleBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub note: String,
}

/// POST /api/create-capsule: generate a roadmap, seal the note, persist the
/// capsule and email the roadmap.
///
/// Generation and email failures are logged but do not fail the request:
/// the capsule is stored with the fallback roadmap and `emailed` reports
/// whether the roadmap email went out. A body that is not a JSON object of
/// strings is rejected with the same 400 envelope as a validation failure.
pub async fn create_capsule(
    State(app): State<AppState>,
    payload: Result<Json<CreateCapsuleBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload.map_err(|rejection| VisionaryError::InvalidInput {
        field: "body",
        reason: rejection.body_text(),
    })?;
    let input = NewCapsule::new(&body.email, &body.goal, &body.note)?;

    let request = prompt::roadmap_prompt(&input.goal, app.config.unseal_at.year());
    let raw = match app.generator.generate_text(&request).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "roadmap generation failed");
            String::new()
        }
    };

    let extraction = extract_roadmap(&raw);
    if extraction.is_fallback() {
        tracing::warn!(raw = %raw, "model output had no usable roadmap, using fallback");
    }

    let encrypted_note = app.cipher.seal(&input.note)?;
    let capsule = Capsule::new(&input, encrypted_note, extraction, app.config.unseal_at);

    let store = app.store.clone();
    let record = capsule.clone();
    tokio::task::spawn_blocking(move || store.insert(&record))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    tracing::info!(capsule = %capsule.id, fallback = capsule.roadmap_fallback, "capsule created");

    let message = email::roadmap_email(&capsule);
    let emailed = match app
        .mailer
        .send_email(&message.to, &message.subject, &message.body)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(capsule = %capsule.id, error = %e, "roadmap email not sent");
            false
        }
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "id": capsule.id,
        "roadmap": capsule.roadmap.to_display_json(),
        "fallback": capsule.roadmap_fallback,
        "emailed": emailed,
        "unseal_at": capsule.unseal_at,
    })))
}
