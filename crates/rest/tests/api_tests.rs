//! HTTP API tests.
//!
//! Drives the full router (extractors, handlers, error mapping) against an
//! in-memory SQLite backend.

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, error_code};

// =============================================================================
// Health
// =============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_backend() {
        let app = TestApp::new().await;

        let response = app.server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["backend"], "sqlite");
    }

    #[tokio::test]
    async fn test_probes_need_no_user() {
        let app = TestApp::new().await;

        app.server.get("/_liveness").await.assert_status_ok();
        let response = app.server.get("/_readiness").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["checks"]["storage"], "ok");
    }
}

// =============================================================================
// Identity and approval
// =============================================================================

mod identity {
    use super::*;

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let app = TestApp::new().await;

        let response = app.server.get("/clients").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(&response.json()), "unauthorized");
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let app = TestApp::new().await;

        app.get("/dashboard", "ghost")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_first_signup_is_operator() {
        let app = TestApp::new().await;

        let response = app.get("/me", &app.operator).await;
        response.assert_status_ok();
        let me: Value = response.json();
        assert_eq!(me["role"], "operator");
        assert_eq!(me["is_approved"], true);
    }

    #[tokio::test]
    async fn test_unapproved_user_can_only_read_self() {
        let app = TestApp::new().await;
        let pending = app.signup("new@fixlog.kr", "신입").await;

        let me = app.get("/me", &pending).await;
        me.assert_status_ok();
        assert_eq!(me.json::<Value>()["role"], "field");
        assert_eq!(me.json::<Value>()["is_approved"], false);

        let response = app.get("/clients", &pending).await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(error_code(&response.json()), "forbidden");
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = TestApp::new().await;

        app.server
            .post("/auth/signup")
            .json(&json!({ "email": "ops@fixlog.kr" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_me() {
        let app = TestApp::new().await;

        let response = app
            .put("/me", &app.operator)
            .json(&json!({ "phone": "010-1234-5678", "team_name": "본사" }))
            .await;
        response.assert_status_ok();
        let me: Value = response.json();
        assert_eq!(me["phone"], "010-1234-5678");
        assert_eq!(me["team_name"], "본사");
    }
}

// =============================================================================
// Clients
// =============================================================================

mod clients {
    use super::*;

    #[tokio::test]
    async fn test_create_read_update_delete() {
        let app = TestApp::new().await;
        let client = app
            .create_client(json!({ "name": "에이스 마트", "phone": "02-555-0101" }))
            .await;
        let id = client["id"].as_str().unwrap();

        let read = app.get(&format!("/clients/{id}"), &app.operator).await;
        read.assert_status_ok();
        assert_eq!(read.json::<Value>()["name"], "에이스 마트");

        let updated = app
            .put(&format!("/clients/{id}"), &app.operator)
            .json(&json!({ "name": "에이스 마트 본점", "address": "서울 강남구" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["address"], "서울 강남구");

        app.delete(&format!("/clients/{id}"), &app.operator)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.get(&format!("/clients/{id}"), &app.operator)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_name_is_bad_request() {
        let app = TestApp::new().await;

        let response = app
            .post("/clients", &app.operator)
            .json(&json!({ "name": "   " }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&response.json()), "bad_request");
    }

    #[tokio::test]
    async fn test_wrong_body_shape_is_unprocessable() {
        let app = TestApp::new().await;

        app.post("/clients", &app.operator)
            .json(&json!({ "name": 42 }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_keyword_search() {
        let app = TestApp::new().await;
        app.create_client(json!({ "name": "에이스 마트", "phone": "010-1111-2222" }))
            .await;
        app.create_client(json!({ "name": "에이스 약국", "phone": "02-333-4444" }))
            .await;
        app.create_client(json!({ "name": "바다 식당", "address": "부산" }))
            .await;

        let response = app
            .get("/clients", &app.operator)
            .add_query_param("q", "상호:\"에이스 마트\"")
            .await;
        response.assert_status_ok();
        let page: Value = response.json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["name"], "에이스 마트");

        let response = app
            .get("/clients", &app.operator)
            .add_query_param("q", "에이스 전화:02")
            .await;
        let page: Value = response.json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["name"], "에이스 약국");
    }

    #[tokio::test]
    async fn test_pagination_windows() {
        let app = TestApp::new().await;
        for n in 0..3 {
            app.create_client(json!({ "name": format!("거래처 {n}") }))
                .await;
        }

        let response = app
            .get("/clients", &app.operator)
            .add_query_param("_count", "2")
            .await;
        let page: Value = response.json();
        assert_eq!(page["total"], 3);
        assert_eq!(page["count"], 2);

        let response = app
            .get("/clients", &app.operator)
            .add_query_param("_count", "2")
            .add_query_param("_offset", "2")
            .await;
        let page: Value = response.json();
        assert_eq!(page["count"], 1);
        assert_eq!(page["offset"], 2);
    }

    #[tokio::test]
    async fn test_bad_page_size_is_bad_request() {
        let app = TestApp::new().await;

        app.get("/clients", &app.operator)
            .add_query_param("_count", "many")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_with_records_conflicts() {
        let app = TestApp::new().await;
        let client = app.create_client(json!({ "name": "에이스 마트" })).await;
        let id = client["id"].as_str().unwrap();
        app.post("/records", &app.operator)
            .json(&json!({ "client_id": id, "type": "장애" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app.delete(&format!("/clients/{id}"), &app.operator).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(error_code(&response.json()), "conflict");
    }

    #[tokio::test]
    async fn test_group_scoped_user_sees_only_their_groups() {
        let app = TestApp::new().await;
        let north = app
            .post("/groups", &app.operator)
            .json(&json!({ "name": "북부" }))
            .await
            .json::<Value>();
        let south = app
            .post("/groups", &app.operator)
            .json(&json!({ "name": "남부" }))
            .await
            .json::<Value>();
        app.create_client(json!({ "name": "북부 상회", "group_id": north["id"] }))
            .await;
        app.create_client(json!({ "name": "남부 상회", "group_id": south["id"] }))
            .await;
        app.create_client(json!({ "name": "미지정 상회" })).await;

        let field = app.member("field@fixlog.kr", "현장", "field").await;
        app.put(&format!("/admin/profiles/{field}/groups"), &app.operator)
            .json(&json!({ "allowed_groups": [north["id"]] }))
            .await
            .assert_status_ok();

        let page: Value = app.get("/clients", &field).await.json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["name"], "북부 상회");

        let groups: Value = app.get("/groups", &field).await.json();
        assert_eq!(groups.as_array().unwrap().len(), 1);
    }
}

// =============================================================================
// Service records
// =============================================================================

mod records {
    use super::*;

    async fn seeded() -> (TestApp, String) {
        let app = TestApp::new().await;
        let client = app.create_client(json!({ "name": "에이스 마트" })).await;
        let id = client["id"].as_str().unwrap().to_string();
        (app, id)
    }

    #[tokio::test]
    async fn test_create_defaults_to_pending() {
        let (app, client_id) = seeded().await;

        let response = app
            .post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "장애", "details": "단말기 불량" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let record: Value = response.json();
        assert_eq!(record["status"], "pending");
        assert_eq!(record["client_name"], "에이스 마트");
        assert_eq!(record["receiver_id"], app.operator.as_str());
    }

    #[tokio::test]
    async fn test_unknown_client_is_bad_request() {
        let (app, _) = seeded().await;

        let response = app
            .post("/records", &app.operator)
            .json(&json!({ "client_id": "missing", "type": "장애" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&response.json()), "bad_request");
    }

    #[tokio::test]
    async fn test_status_change_and_filter() {
        let (app, client_id) = seeded().await;
        let first: Value = app
            .post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "장애" }))
            .await
            .json();
        app.post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "설치" }))
            .await
            .assert_status(StatusCode::CREATED);

        let id = first["id"].as_str().unwrap();
        let response = app
            .put(&format!("/records/{id}/status"), &app.operator)
            .json(&json!({ "status": "완료" }))
            .await;
        response.assert_status_ok();
        let record: Value = response.json();
        assert_eq!(record["status"], "completed");
        assert!(record["processed_at"].is_string());

        let page: Value = app
            .get("/records", &app.operator)
            .add_query_param("status", "completed")
            .await
            .json();
        assert_eq!(page["total"], 1);

        let page: Value = app
            .get("/records", &app.operator)
            .add_query_param("q", "상태:대기")
            .await
            .json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["type"], "설치");
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let (app, client_id) = seeded().await;
        let record: Value = app
            .post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "장애" }))
            .await
            .json();
        let id = record["id"].as_str().unwrap();

        app.put(&format!("/records/{id}/status"), &app.operator)
            .json(&json!({ "status": "archived" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        app.get("/records", &app.operator)
            .add_query_param("status", "archived")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (app, client_id) = seeded().await;
        let record: Value = app
            .post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "장애" }))
            .await
            .json();
        let id = record["id"].as_str().unwrap();

        let updated: Value = app
            .put(&format!("/records/{id}"), &app.operator)
            .json(&json!({ "details": "용지 걸림" }))
            .await
            .json();
        assert_eq!(updated["type"], "장애");
        assert_eq!(updated["details"], "용지 걸림");

        app.delete(&format!("/records/{id}"), &app.operator)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.get(&format!("/records/{id}"), &app.operator)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let (app, client_id) = seeded().await;
        app.post("/records", &app.operator)
            .json(&json!({ "client_id": client_id, "type": "장애" }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = app.get("/dashboard", &app.operator).await;
        response.assert_status_ok();
        let stats: Value = response.json();
        assert_eq!(stats["total_clients"], 1);
        assert_eq!(stats["pending_records"], 1);
        assert_eq!(stats["recent_records"].as_array().unwrap().len(), 1);
    }
}

// =============================================================================
// Notices
// =============================================================================

mod notices {
    use super::*;

    #[tokio::test]
    async fn test_audience_and_admin_only_writes() {
        let app = TestApp::new().await;
        let field = app.member("field@fixlog.kr", "현장", "field").await;

        app.post("/notices", &app.operator)
            .json(&json!({ "title": "전체 공지", "content": "모두 확인" }))
            .await
            .assert_status(StatusCode::CREATED);
        let admins_only: Value = app
            .post("/notices", &app.operator)
            .json(&json!({ "title": "관리자 공지", "content": "", "allowed_roles": ["admin"] }))
            .await
            .json();

        let page: Value = app.get("/notices", &field).await.json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["title"], "전체 공지");

        let hidden = admins_only["id"].as_str().unwrap();
        app.get(&format!("/notices/{hidden}"), &field)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        app.post("/notices", &field)
            .json(&json!({ "title": "x", "content": "y" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_pinned_first() {
        let app = TestApp::new().await;
        app.post("/notices", &app.operator)
            .json(&json!({ "title": "일반", "content": "" }))
            .await
            .assert_status(StatusCode::CREATED);
        app.post("/notices", &app.operator)
            .json(&json!({ "title": "고정", "content": "", "is_pinned": true }))
            .await
            .assert_status(StatusCode::CREATED);
        app.post("/notices", &app.operator)
            .json(&json!({ "title": "최신", "content": "" }))
            .await
            .assert_status(StatusCode::CREATED);

        let page: Value = app.get("/notices", &app.operator).await.json();
        let titles: Vec<&str> = page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["고정", "최신", "일반"]);
    }
}

// =============================================================================
// Catalogs
// =============================================================================

mod catalogs {
    use super::*;

    #[tokio::test]
    async fn test_catalog_lifecycle() {
        let app = TestApp::new().await;

        for name in ["장애", "설치", "회수"] {
            app.post("/service-types", &app.operator)
                .json(&json!({ "name": name }))
                .await
                .assert_status(StatusCode::CREATED);
        }
        app.post("/service-types", &app.operator)
            .json(&json!({ "name": "장애" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let entries: Value = app.get("/service-types", &app.operator).await.json();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["name"], "장애");
        assert_eq!(entries[2]["sort_order"], 2);

        let id = entries[1]["id"].as_str().unwrap();
        app.delete(&format!("/service-types/{id}"), &app.operator)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let entries: Value = app.get("/service-types", &app.operator).await.json();
        assert_eq!(entries.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_catalogs_are_separate() {
        let app = TestApp::new().await;

        app.post("/van-companies", &app.operator)
            .json(&json!({ "name": "KICC" }))
            .await
            .assert_status(StatusCode::CREATED);

        let vans: Value = app.get("/van-companies", &app.operator).await.json();
        let equipment: Value = app.get("/equipment-types", &app.operator).await.json();
        assert_eq!(vans.as_array().unwrap().len(), 1);
        assert!(equipment.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_catalog_writes_need_admin() {
        let app = TestApp::new().await;
        let callcenter = app.member("cc@fixlog.kr", "상담", "callcenter").await;

        app.get("/equipment-types", &callcenter)
            .await
            .assert_status_ok();
        app.post("/equipment-types", &callcenter)
            .json(&json!({ "name": "POS" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}

// =============================================================================
// Administration
// =============================================================================

mod admin {
    use super::*;

    #[tokio::test]
    async fn test_profile_list_orders_by_tier() {
        let app = TestApp::new().await;
        app.member("field@fixlog.kr", "현장", "field").await;
        app.member("admin@fixlog.kr", "관리", "admin").await;

        let response = app.get("/admin/profiles", &app.operator).await;
        response.assert_status_ok();
        let page: Value = response.json();
        let roles: Vec<&str> = page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["operator", "admin", "field"]);

        let page: Value = app
            .get("/admin/profiles", &app.operator)
            .add_query_param("search", "관리자")
            .await
            .json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["email"], "admin@fixlog.kr");
    }

    #[tokio::test]
    async fn test_role_guards() {
        let app = TestApp::new().await;
        let admin = app.member("admin@fixlog.kr", "관리", "admin").await;
        let field = app.member("field@fixlog.kr", "현장", "field").await;

        app.put(&format!("/admin/profiles/{admin}/role"), &admin)
            .json(&json!({ "role": "operator" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.put(&format!("/admin/profiles/{field}/role"), &admin)
            .json(&json!({ "role": "operator" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.put(&format!("/admin/profiles/{}/role", app.operator), &admin)
            .json(&json!({ "role": "field" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = app
            .put(&format!("/admin/profiles/{field}/role"), &admin)
            .json(&json!({ "role": "콜센터" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["role"], "callcenter");
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let app = TestApp::new().await;
        let admin = app.member("admin@fixlog.kr", "관리", "admin").await;
        let field = app.member("field@fixlog.kr", "현장", "field").await;

        app.delete(&format!("/admin/profiles/{admin}"), &admin)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.delete(&format!("/admin/profiles/{}", app.operator), &admin)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.delete(&format!("/admin/profiles/{field}"), &admin)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        app.get("/me", &field)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_field_user_cannot_administer() {
        let app = TestApp::new().await;
        let field = app.member("field@fixlog.kr", "현장", "field").await;

        app.get("/admin/profiles", &field)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        app.get("/admin/logs", &field)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_activity_log_by_category() {
        let app = TestApp::new().await;
        app.create_client(json!({ "name": "에이스 마트" })).await;
        app.post("/groups", &app.operator)
            .json(&json!({ "name": "북부" }))
            .await
            .assert_status(StatusCode::CREATED);

        let page: Value = app
            .get("/admin/logs", &app.operator)
            .add_query_param("category", "client")
            .await
            .json();
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["action"], "CREATE_CLIENT");

        let page: Value = app
            .get("/admin/logs", &app.operator)
            .add_query_param("category", "system")
            .await
            .json();
        assert_eq!(page["total"], 1);

        app.get("/admin/logs", &app.operator)
            .add_query_param("category", "billing")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// File database
// =============================================================================

mod file_database {
    use axum_test::TestServer;
    use fixlog_persistence::backends::sqlite::SqliteBackend;
    use fixlog_rest::{ServerConfig, create_app_with_config};

    use super::*;

    fn start(path: &std::path::Path) -> TestServer {
        let backend = SqliteBackend::open(path).expect("Failed to open SQLite file");
        backend.init_schema().expect("Failed to init schema");
        let app = create_app_with_config(backend, ServerConfig::for_testing());
        TestServer::new(app).expect("Failed to create test server")
    }

    #[tokio::test]
    async fn test_data_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixlog.db");

        let operator = {
            let server = start(&path);
            let response = server
                .post("/auth/signup")
                .json(&json!({ "email": "ops@fixlog.kr" }))
                .await;
            response.assert_status(StatusCode::CREATED);
            response.json::<Value>()["id"].as_str().unwrap().to_string()
        };

        let server = start(&path);
        let response = server
            .get("/me")
            .add_header(
                fixlog_rest::X_USER_ID,
                axum::http::HeaderValue::from_str(&operator).unwrap(),
            )
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["role"], "operator");

        // A second sign-up after restart is no longer the first profile.
        let response = server
            .post("/auth/signup")
            .json(&json!({ "email": "late@fixlog.kr" }))
            .await;
        assert_eq!(response.json::<Value>()["role"], "field");
    }
}
