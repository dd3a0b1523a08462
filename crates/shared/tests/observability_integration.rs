//! 共享库集成测试
//!
//! 测试 metrics、middleware 与错误响应的对外行为。

// ============================================================================
// 指标记录测试
// ============================================================================

mod metrics_tests {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use resolution_shared::observability::metrics::{record_http_request, set_rules_loaded};

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        record_http_request("POST", "/classify", 200, 0.004);
        record_http_request("POST", "/classify", 422, 0.001);
        record_http_request("GET", "/missing", 404, 0.0005);
    }

    #[test]
    fn test_metrics_with_edge_cases() {
        // 空字符串
        record_http_request("", "", 0, 0.0);

        // 超长路径
        let long_path = "/classify/".to_string() + &"x".repeat(1000);
        record_http_request("POST", &long_path, 200, 0.01);

        // 极端持续时间
        record_http_request("POST", "/classify", 504, 999.99);

        set_rules_loaded(0);
    }

    #[test]
    fn test_metrics_rendered_by_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_http_request("POST", "/classify", 200, 0.002);
            set_rules_loaded(15);
        });

        let rendered = handle.render();
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("path=\"/classify\""));
        assert!(rendered.contains("rules_loaded"));
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use resolution_shared::observability::middleware::{
        REQUEST_ID_HEADER, RequestId, UNMATCHED_PATH, http_tracing, request_id,
    };
    use tower::ServiceExt;

    #[test]
    fn test_request_id_creation() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.as_str(), "test-id-123");
    }

    #[tokio::test]
    async fn test_request_id_visible_to_handler() {
        let app = Router::new()
            .route(
                "/echo",
                get(|axum::Extension(id): axum::Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"abc");
    }

    #[tokio::test]
    async fn test_http_metrics_labelled_by_route_template() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        // 单线程运行时，所有请求都在当前线程记录
        let _guard = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/items/{id}", get(|| async { "item" }))
            .layer(middleware::from_fn(http_tracing));

        for i in 0..3 {
            let uri = format!("/items/{}", i);
            app.clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
        }
        for i in 0..20 {
            let uri = format!("/random-{}", i);
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let rendered = handle.render();
        let series: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .collect();

        assert_eq!(series.len(), 2, "unexpected series: {:?}", series);
        assert!(rendered.contains("path=\"/items/{id}\""));
        assert!(rendered.contains(&format!("path=\"{}\"", UNMATCHED_PATH)));
        assert!(!rendered.contains("/random-"));
    }
}

// ============================================================================
// 错误响应测试
// ============================================================================

mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use resolution_shared::error::ResolutionError;

    #[tokio::test]
    async fn test_validation_error_body() {
        let response = ResolutionError::Validation("expected value".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("expected value"));
    }

    #[test]
    fn test_rule_source_unavailable() {
        let response = ResolutionError::RuleSource("missing.csv".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

// ============================================================================
// Guard 测试
// ============================================================================

mod guard_tests {
    use resolution_shared::observability::ObservabilityGuard;

    #[test]
    fn test_empty_guard() {
        let guard = ObservabilityGuard::empty();
        assert!(!guard.metrics_enabled());
        // drop 时也不应 panic
        drop(guard);
    }
}
