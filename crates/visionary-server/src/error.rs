use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use visionary_core::VisionaryError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<VisionaryError>() {
            Some(VisionaryError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            Some(VisionaryError::CapsuleNotFound(_)) => StatusCode::NOT_FOUND,
            Some(
                VisionaryError::Config(_)
                | VisionaryError::Crypto(_)
                | VisionaryError::Store(_)
                | VisionaryError::Io(_)
                | VisionaryError::Json(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let message = self.0.to_string();
        let body = serde_json::json!({
            "success": false,
            "message": message,
            "error": message,
        });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_400() {
        let err = AppError(
            VisionaryError::InvalidInput {
                field: "email",
                reason: "must not be empty".into(),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn capsule_not_found_maps_to_404() {
        let err = AppError(VisionaryError::CapsuleNotFound("abc".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn body_carries_message_and_error() {
        use http_body_util::BodyExt;

        let err = AppError(VisionaryError::CapsuleNotFound("abc".into()).into());
        let bytes = err.into_response().into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "capsule not found: abc");
        assert_eq!(json["error"], json["message"]);
    }

    #[test]
    fn store_error_maps_to_500() {
        let err = AppError(VisionaryError::Store("disk full".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something broke"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
