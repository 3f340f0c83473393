use crate::analyzer::{AnalyzeError, Analyzer};
use axum::{
    body::{Body, Bytes},
    http::{Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use errlens_protocol::{serialize_json, ErrorEnvelope, ErrorInput, SUPPORTED_LANGUAGES};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub(crate) fn router(analyzer: Arc<Analyzer>) -> Router {
    // Credentials stay off: a wildcard origin may not carry them.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/analyze_error",
            post({
                let analyzer = analyzer.clone();
                move |body| analyze_handler(body, analyzer.clone())
            }),
        )
        .route("/supported_languages", get(languages_handler))
        .route(
            "/health",
            get({
                let analyzer = analyzer.clone();
                move || health_handler(analyzer.clone())
            }),
        )
        .layer(cors)
}

async fn analyze_handler(body: Bytes, analyzer: Arc<Analyzer>) -> Result<Response, StatusCode> {
    let input: ErrorInput = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(err) => {
            let envelope =
                error_response("invalid_request", format!("Invalid ErrorInput JSON: {err}"));
            return build_response(StatusCode::BAD_REQUEST, &envelope);
        }
    };
    log::debug!(
        "analyze_error: language={} project={:?} context={}",
        input.language,
        input.project(),
        input.context().is_some()
    );

    match analyzer.analyze(&input).await {
        Ok(response) => build_response(StatusCode::OK, &response),
        Err(err @ AnalyzeError::NotRecognized(_)) => {
            let envelope = error_response("not_recognized", err.to_string());
            build_response(StatusCode::NOT_FOUND, &envelope)
        }
    }
}

async fn languages_handler() -> Result<Response, StatusCode> {
    build_response(StatusCode::OK, &SUPPORTED_LANGUAGES)
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    patterns: usize,
}

async fn health_handler(analyzer: Arc<Analyzer>) -> Result<Response, StatusCode> {
    let report = HealthReport {
        status: "ok",
        patterns: analyzer.catalog().len(),
    };
    build_response(StatusCode::OK, &report)
}

pub(crate) fn error_response(code: &str, message: String) -> ErrorEnvelope {
    let hint = match code {
        "invalid_request" => {
            "Send a JSON object with at least an \"error_message\" string field."
        }
        "not_recognized" => {
            "Include the full error line (e.g. \"NameError: name 'x' is not defined\") and the surrounding code_context."
        }
        _ => "Check the request against the published ErrorInput schema.",
    };
    ErrorEnvelope::new(code, message).with_hint(hint)
}

pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response, StatusCode> {
    let bytes = serialize_json(payload)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .into_bytes();

    HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::tests::ScriptedCompletion;
    use axum::http::{header, Method, Request};
    use errlens_insight::HistoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(stub: ScriptedCompletion) -> Router {
        router(Arc::new(Analyzer::new(
            Arc::new(stub),
            Arc::new(HistoryStore::new()),
        )))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/analyze_error")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn known_error_is_analyzed() {
        let body = json!({
            "error_message": "ZeroDivisionError: division by zero",
            "project_id": "demo"
        });
        let (status, value) = send(
            app(ScriptedCompletion::default()),
            post_json(&body.to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["error_type"], "ZeroDivisionError");
        assert_eq!(value["learning_resources"].as_array().unwrap().len(), 3);
        assert_eq!(value["statistics"]["frequency"], 1);
        assert_eq!(value["statistics"]["last_occurrence"], Value::Null);
        assert_eq!(value["statistics"]["common_contexts"], Value::Null);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (status, value) = send(
            app(ScriptedCompletion::default()),
            post_json(r#"{"code_context": "x = 1"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["code"], "invalid_request");
        assert!(value["hint"].is_string());
    }

    #[tokio::test]
    async fn unrecognized_error_is_404() {
        let (status, value) = send(
            app(ScriptedCompletion::default()),
            post_json(r#"{"error_message": "RecursionError: maximum recursion depth exceeded"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["code"], "not_recognized");
    }

    #[tokio::test]
    async fn supported_languages_are_listed() {
        let request = Request::builder()
            .uri("/supported_languages")
            .body(Body::empty())
            .unwrap();
        let (status, value) = send(app(ScriptedCompletion::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!(["python", "javascript", "java", "csharp"]));
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, value) = send(app(ScriptedCompletion::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({"status": "ok", "patterns": 10}));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/supported_languages")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app(ScriptedCompletion::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
