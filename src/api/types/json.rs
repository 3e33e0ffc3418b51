//! JSON extractor whose rejections use the API error envelope

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::Json`. Every body rejection becomes a 400 in the
/// `{"error": {...}}` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(ApiError::bad_request(format_rejection_message(&rejection))),
        }
    }
}

fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");

        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }

        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let Json(payload) =
            Json::<Payload>::from_request(request(Some("application/json"), r#"{"name":"x"}"#), &())
                .await
                .unwrap();

        assert_eq!(payload.name, "x");
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = Json::<Payload>::from_request(request(Some("application/json"), "{"), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Invalid JSON syntax"));
    }

    #[tokio::test]
    async fn test_data_error_is_bad_request() {
        // axum reports type mismatches as 422; they are normalized to 400
        let err =
            Json::<Payload>::from_request(request(Some("application/json"), r#"{"name":1}"#), &())
                .await
                .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.status_code, 400);
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let err = Json::<Payload>::from_request(request(None, r#"{"name":"x"}"#), &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message().contains("Content-Type"));
    }
}
