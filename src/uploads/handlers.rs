use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::services::AuthAdmin;
use crate::error::internal;
use crate::state::AppState;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    // product and review images share the same disk store
    Router::new()
        .route("/admin/upload-image", post(upload_image))
        .route("/admin/upload-review-image", post(upload_image))
        // room above the image cap for multipart framing; the handler
        // enforces the 5MB limit on the file itself
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
}

/// Maps an image content type to the file extension we store it under.
/// Anything outside the accepted set is rejected.
pub fn ext_from_mime(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[instrument(skip(state, _admin, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let ext = ext_from_mime(&content_type).ok_or((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "only jpeg, png and webp images are accepted".to_string(),
        ))?;

        let body = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        if body.len() > MAX_IMAGE_BYTES {
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                "image exceeds the 5MB limit".to_string(),
            ));
        }
        if body.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "empty image".to_string()));
        }

        let key = format!("{}.{ext}", Uuid::new_v4());
        let url = state.images.save(&key, body).await.map_err(internal)?;
        info!(%key, "image stored");
        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err((
        StatusCode::BAD_REQUEST,
        "multipart field 'image' is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRef;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::auth::services::JwtKeys;

    #[test]
    fn accepted_mime_types() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/gif"), None);
        assert_eq!(ext_from_mime("application/pdf"), None);
        assert_eq!(ext_from_mime(""), None);
    }

    fn multipart_png(payload_len: usize) -> (String, Vec<u8>) {
        let boundary = "acai-test-boundary";
        let mut body = Vec::with_capacity(payload_len + 256);
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"image\"; filename=\"photo.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&vec![0u8; payload_len]);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={boundary}"), body)
    }

    async fn post_image(payload_len: usize) -> StatusCode {
        let state = crate::state::AppState::fake();
        let token = JwtKeys::from_ref(&state)
            .sign(uuid::Uuid::new_v4())
            .expect("sign");
        let app = router().with_state(state);

        let (content_type, body) = multipart_png(payload_len);
        let request = Request::builder()
            .method("POST")
            .uri("/admin/upload-image")
            .header("content-type", content_type)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("request");

        app.oneshot(request).await.expect("response").status()
    }

    #[tokio::test]
    async fn upload_between_two_and_five_megabytes_is_accepted() {
        // images above axum's 2MB default body limit must still go through
        let status = post_image(3 * 1024 * 1024).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn upload_above_five_megabytes_is_rejected() {
        let status = post_image(MAX_IMAGE_BYTES + 1).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
