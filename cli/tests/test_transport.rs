#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use modconsole_cli::transport::ReqwestTransport;
    use modconsole_shared::{ApiError, ClientConfig, ModerationApi, RemoteClient};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{body_json, header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn api_base(server: &MockServer) -> String {
        format!("{}/api", server.uri())
    }

    fn moderator_json() -> serde_json::Value {
        json!({ "id": 1, "email": "admin@example.com", "username": "admin", "is_moderator": true })
    }

    #[tokio::test]
    async fn slow_backend_times_out_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/dashboard-stats"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "stats": {} }))
                    .set_delay(Duration::from_secs(3)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let transport = ReqwestTransport::new(api_base(&server)).expect("transport");
        let client = RemoteClient::with_config(transport, ClientConfig {
            request_timeout: Duration::from_millis(200),
            ..ClientConfig::default()
        });

        let started = Instant::now();
        let err = client.dashboard_stats().await.expect_err("must time out");

        assert!(matches!(err, ApiError::Timeout { .. }));
        assert!(err.is_unreachable());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn status_filter_reaches_the_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/reports"))
            .and(query_param("status", "pending"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reports": [{
                "id": 1, "message_id": 120, "message_type": "public",
                "reason": "spam", "status": "pending", "created_at": "2024-03-09T08:00:00Z"
            }] })))
            .mount(&server)
            .await;
        let client = RemoteClient::new(ReqwestTransport::new(api_base(&server)).expect("transport"));

        let reports = client
            .list_reports(Some(modconsole_shared::models::ReportStatus::Pending))
            .await
            .expect("reports");

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].message_id, 120);
    }

    #[tokio::test]
    async fn json_body_is_sent_for_updates() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/admin/reports/7"))
            .and(body_json(json!({ "status": "reviewed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        let client = RemoteClient::new(ReqwestTransport::new(api_base(&server)).expect("transport"));

        client
            .update_report_status(7, modconsole_shared::models::ReportStatus::Reviewed)
            .await
            .expect("patched");
    }

    #[tokio::test]
    async fn error_payload_becomes_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
            )
            .mount(&server)
            .await;
        let client = RemoteClient::new(ReqwestTransport::new(api_base(&server)).expect("transport"));

        let err = client
            .login(&modconsole_shared::models::LoginRequest {
                email: "admin@example.com".to_string(),
                password: "wrong".to_string(),
                remember: false,
            })
            .await
            .expect_err("rejected");

        assert_eq!(err, ApiError::Http {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        });
        assert!(err.is_auth_rejected());
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let client = RemoteClient::new(ReqwestTransport::new("http://127.0.0.1:1/api").expect("transport"));

        let err = client.test_connection().await.expect_err("nothing listens there");

        assert!(matches!(err, ApiError::NetworkUnreachable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn session_cookie_survives_a_new_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                    .set_body_json(json!({ "authenticated": true, "user": moderator_json() })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("cookie", "session=abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "authenticated": true, "user": moderator_json() })),
            )
            .mount(&server)
            .await;
        let dir = TempDir::new().expect("temp dir");
        let cookie_path = dir.path().join("cookies.txt");

        let first = RemoteClient::new(
            ReqwestTransport::with_cookie_file(api_base(&server), &cookie_path).expect("transport"),
        );
        first
            .login(&modconsole_shared::models::LoginRequest {
                email: "admin@example.com".to_string(),
                password: "pw".to_string(),
                remember: true,
            })
            .await
            .expect("login");
        let stored = std::fs::read_to_string(&cookie_path).expect("cookie file written");
        assert!(stored.contains("session=abc123"));

        let second = RemoteClient::new(
            ReqwestTransport::with_cookie_file(api_base(&server), &cookie_path).expect("transport"),
        );
        assert_eq!(second.transport().cookie_header().as_deref(), Some("session=abc123"));
        let me = second.current_user().await.expect("me").expect("identity");
        assert!(me.is_moderator);
    }
}
