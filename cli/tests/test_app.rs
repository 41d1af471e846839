#[cfg(test)]
mod tests {
    use std::path::Path;

    use modconsole_cli::{
        cache::FileIdentityCache,
        cli::GlobalArgs,
        commands::{auth, reports, App},
        config::Config,
    };
    use modconsole_shared::{
        mock::MOCK_MODERATOR_EMAIL,
        models::{MessageKey, MessageType, UserIdentity},
        persist::IdentityCache,
        ApiError, Verification,
    };
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config(api_base: Option<String>, data_dir: &Path, mock: bool) -> Config {
        let args = GlobalArgs {
            api_base,
            data_dir: Some(data_dir.to_path_buf()),
            mock,
            ..GlobalArgs::default()
        };
        Config::resolve(&args, |_| None)
    }

    fn identity_json(is_moderator: bool) -> serde_json::Value {
        json!({ "id": 1, "email": "admin@example.com", "username": "admin", "is_moderator": is_moderator })
    }

    async fn mount_session(server: &MockServer, is_moderator: bool) {
        let body = json!({ "authenticated": true, "user": identity_json(is_moderator) });
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn report_row(id: i64, message_id: i64) -> serde_json::Value {
        json!({
            "id": id, "message_id": message_id, "message_type": "public",
            "reason": "spam", "status": "pending", "created_at": "2024-03-09T08:00:00Z",
            "message": { "content": "buy now", "user_id": 4 }
        })
    }

    #[tokio::test]
    async fn login_persists_session_for_the_next_invocation() {
        let server = MockServer::start().await;
        mount_session(&server, true).await;
        let dir = TempDir::new().expect("temp dir");
        let api_base = Some(format!("{}/api", server.uri()));

        let first = App::from_config(config(api_base.clone(), dir.path(), false)).expect("app");
        auth::login(&first, "admin@example.com", "pw", false)
            .await
            .expect("login");
        assert!(dir.path().join("session.json").exists());

        let second = App::from_config(config(api_base, dir.path(), false)).expect("app");
        let identity = second.require_session().await.expect("session");
        assert!(identity.is_moderator);
        assert_eq!(second.session.verification(), Some(Verification::Confirmed));
    }

    #[tokio::test]
    async fn member_login_is_refused_and_nothing_is_stored() {
        let server = MockServer::start().await;
        mount_session(&server, false).await;
        let dir = TempDir::new().expect("temp dir");
        let app = App::from_config(config(Some(format!("{}/api", server.uri())), dir.path(), false))
            .expect("app");

        let err = auth::login(&app, "admin@example.com", "pw", false)
            .await
            .expect_err("refused");

        assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::AccessDenied));
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn unreachable_backend_keeps_cached_session_degraded() {
        let dir = TempDir::new().expect("temp dir");
        let cache = FileIdentityCache::new(dir.path().join("session.json"));
        cache.save(&UserIdentity {
            id: 1,
            email: "admin@example.com".to_string(),
            username: "admin".to_string(),
            is_moderator: true,
            profile: None,
        });
        let app = App::from_config(config(
            Some("http://127.0.0.1:1/api".to_string()),
            dir.path(),
            false,
        ))
        .expect("app");

        let identity = app.require_session().await.expect("degraded session");

        assert_eq!(identity.id, 1);
        assert_eq!(app.session.verification(), Some(Verification::Degraded));
    }

    #[tokio::test]
    async fn commands_refuse_without_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
            .mount(&server)
            .await;
        let dir = TempDir::new().expect("temp dir");
        let app = App::from_config(config(Some(format!("{}/api", server.uri())), dir.path(), false))
            .expect("app");

        let err = app.require_session().await.expect_err("no session");
        assert!(err.to_string().contains("not logged in"));
    }

    #[tokio::test]
    async fn clear_tolerates_partial_failure() {
        let server = MockServer::start().await;
        mount_session(&server, true).await;
        Mock::given(method("GET"))
            .and(path("/api/admin/reports"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "reports": [report_row(1, 120), report_row(3, 120)] })),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/admin/reports/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/admin/reports/3"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "locked" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/admin/dashboard-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stats": {} })))
            .mount(&server)
            .await;
        let dir = TempDir::new().expect("temp dir");
        let app = App::from_config(config(Some(format!("{}/api", server.uri())), dir.path(), false))
            .expect("app");

        reports::clear(&app, MessageKey::new(MessageType::Public, 120))
            .await
            .expect("partial success is not an error");
    }

    #[tokio::test]
    async fn clear_fails_when_every_update_fails() {
        let server = MockServer::start().await;
        mount_session(&server, true).await;
        Mock::given(method("GET"))
            .and(path("/api/admin/reports"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "reports": [report_row(1, 120)] })),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/admin/reports/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/admin/dashboard-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "stats": {} })))
            .expect(0)
            .mount(&server)
            .await;
        let dir = TempDir::new().expect("temp dir");
        let app = App::from_config(config(Some(format!("{}/api", server.uri())), dir.path(), false))
            .expect("app");

        let err = reports::clear(&app, MessageKey::new(MessageType::Public, 120))
            .await
            .expect_err("total failure");
        assert!(err.to_string().starts_with("Failed to update reports"));
    }

    #[tokio::test]
    async fn mock_mode_runs_without_a_backend() {
        let dir = TempDir::new().expect("temp dir");
        let first = App::from_config(config(None, dir.path(), true)).expect("app");
        auth::login(&first, MOCK_MODERATOR_EMAIL, "anything", false)
            .await
            .expect("mock login");

        let second = App::from_config(config(None, dir.path(), true)).expect("app");
        second.require_session().await.expect("restored mock session");
        let dashboard = reports::load(&second, None).await.expect("reports");

        assert_eq!(dashboard.reports().len(), 6);
        assert_eq!(dashboard.representatives().len(), 4);
        reports::delete(&second, MessageKey::new(MessageType::Public, 120))
            .await
            .expect("delete");
        let dashboard = reports::load(&second, None).await.expect("reports");
        assert_eq!(dashboard.reports().len(), 4);
    }

    #[test]
    fn file_cache_discards_unreadable_records() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("session.json");
        let cache = FileIdentityCache::new(&path);
        assert_eq!(cache.load(), None);

        let identity = UserIdentity {
            id: 9,
            email: "mod@example.com".to_string(),
            username: "mod".to_string(),
            is_moderator: true,
            profile: None,
        };
        cache.save(&identity);
        assert_eq!(cache.load(), Some(identity));

        std::fs::write(&path, r#"{"version":42,"value":{}}"#).expect("write");
        assert_eq!(cache.load(), None);

        cache.clear();
        assert!(!path.exists());
        cache.clear();
    }
}
