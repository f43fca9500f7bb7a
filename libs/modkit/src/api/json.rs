use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Plain-text body sent back for any unreadable or undecodable request body.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// JSON request body extractor.
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header and
/// collapses every failure (unreadable body, bad syntax, wrong shape) into a
/// single `400 text/plain` rejection.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Clone, Copy)]
pub struct InvalidBody;

impl IntoResponse for InvalidBody {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            INVALID_BODY_MESSAGE,
        )
            .into_response()
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InvalidBody;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "failed to read request body");
            InvalidBody
        })?;
        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "JSON decode error");
            InvalidBody
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_without_content_type() {
        let JsonBody(p) = JsonBody::<Payload>::from_request(request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(p.name, "x");
    }

    #[tokio::test]
    async fn malformed_body_is_plain_text_400() {
        let rejection = JsonBody::<Payload>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        let resp = rejection.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(ct.starts_with("text/plain"));

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], INVALID_BODY_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn wrong_shape_is_rejected() {
        assert!(JsonBody::<Payload>::from_request(request(r#"{"name": 5}"#), &())
            .await
            .is_err());
    }
}
