//! 请求处理器

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use resolution_shared::error::ResolutionError;
use rule_engine::{ClassificationResult, ErrorInput};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// 服务信息
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Payment Error Resolution Engine",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// 分类支付错误
///
/// 缺失的字段按空字符串处理；请求体无法解析时返回 422。
#[instrument(skip_all)]
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ErrorInput>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ResolutionError> {
    let Json(input) = payload.map_err(|e| ResolutionError::Validation(e.body_text()))?;

    Ok(Json(state.classifier.classify_input(&input)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{mock, predicate::eq};
    use rule_engine::Classifier;
    use std::sync::Arc;

    mock! {
        pub Engine {}

        impl Classifier for Engine {
            fn classify_input(&self, input: &ErrorInput) -> ClassificationResult;
        }
    }

    fn timeout_result() -> ClassificationResult {
        ClassificationResult {
            category: "GATEWAY_TIMEOUT".to_string(),
            user_message: "The provider did not respond in time.".to_string(),
            agent_steps: vec!["Check status".to_string(), "Retry".to_string()],
            confidence: 0.95,
            source: "rules".to_string(),
        }
    }

    #[tokio::test]
    async fn test_classify_delegates_to_classifier() {
        let mut engine = MockEngine::new();
        engine
            .expect_classify_input()
            .with(eq(ErrorInput::new("", "Gateway timed out")))
            .times(1)
            .returning(|_| timeout_result());

        let state = AppState::new(Arc::new(engine));
        let payload = Ok(Json(ErrorInput::new("", "Gateway timed out")));

        let Json(result) = classify(State(state), payload).await.unwrap();

        assert_eq!(result, timeout_result());
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_root_message() {
        let Json(body) = root().await;
        assert!(body.message.starts_with("AI Payment Error"));
    }
}
