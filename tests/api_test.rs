mod helpers;

use axum::http::{Method, StatusCode};
use helpers::{avatar_body, echo_app, test_app, DEFAULT_MODEL};
use serde_json::json;
use zeny::auth::TokenService;

#[tokio::test]
async fn root_reports_provider_and_models() {
    let app = echo_app();
    let (status, body) = app.get("/api/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gemini_available"], true);
    assert_eq!(body["default_model"], DEFAULT_MODEL);
    assert_eq!(body["available_models"], 2);

    let offline = test_app(None);
    let (_, body) = offline.get("/api").await;
    assert_eq!(body["gemini_available"], false);
}

#[tokio::test]
async fn models_lists_static_table() {
    let app = test_app(None);
    let (status, body) = app.get("/api/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_model"], DEFAULT_MODEL);

    let models = body["available_models"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[1]["id"], "gemini-2.5-flash");
    assert_eq!(models[1]["rate_limit"], "15 requests/minute (free tier)");
}

#[tokio::test]
async fn login_accepts_only_admin_admin() {
    let app = echo_app();

    let (status, body) = app
        .post("/api/admin/login", json!({"username": "admin", "password": "admin"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());

    for (user, pass) in [("admin", "wrong"), ("root", "admin"), ("", "")] {
        let (status, body) = app
            .post("/api/admin/login", json!({"username": user, "password": pass}))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid credentials");
    }
}

#[tokio::test]
async fn login_with_missing_field_is_unprocessable() {
    let app = echo_app();
    let (status, _) = app.post("/api/admin/login", json!({"username": "admin"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn admin_routes_reject_missing_or_foreign_tokens() {
    let app = echo_app();
    let foreign = TokenService::new("some-other-key").issue("admin");

    let admin_routes = [
        (Method::GET, "/api/admin/avatars"),
        (Method::POST, "/api/admin/avatars"),
        (Method::PUT, "/api/admin/avatars/abc"),
        (Method::DELETE, "/api/admin/avatars/abc"),
        (Method::GET, "/api/admin/chat-history"),
    ];

    for (method, uri) in admin_routes {
        let body = (method == Method::POST || method == Method::PUT).then(|| avatar_body("X"));

        let (status, _) = app.request(method.clone(), uri, None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} without token");

        let (status, body) = app.request(method.clone(), uri, Some(&foreign), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} with foreign token");
        assert_eq!(body["detail"], "Invalid token");
    }
}

#[tokio::test]
async fn create_then_fetch_returns_same_record() {
    let app = echo_app();
    let token = app.admin_token().await;

    let created = app.create_avatar(&token, "Luna").await;
    assert_eq!(created["created_at"], created["updated_at"]);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/avatars/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_with_missing_field_is_unprocessable() {
    let app = echo_app();
    let token = app.admin_token().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/admin/avatars",
            Some(&token),
            Some(json!({"name": "Half", "description": "no personality"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
    let app = echo_app();
    let token = app.admin_token().await;
    let created = app.create_avatar(&token, "Orion").await;
    let id = created["id"].as_str().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/api/admin/avatars/{id}"),
            Some(&token),
            Some(json!({"name": "Orion II"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Orion II");
    for field in ["id", "description", "personality", "instructions", "created_at"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert!(updated["updated_at"].as_str().unwrap() > created["updated_at"].as_str().unwrap());

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/admin/avatars/does-not-exist",
            Some(&token),
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_avatar_and_missing_is_not_found() {
    let app = echo_app();
    let token = app.admin_token().await;
    let keep = app.create_avatar(&token, "Keep").await;
    let gone = app.create_avatar(&token, "Gone").await;
    let gone_id = gone["id"].as_str().unwrap();

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/admin/avatars/{gone_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Avatar deleted successfully");

    let (status, body) = app.get(&format!("/api/avatars/{gone_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Avatar not found");

    let (_, listed) = app.get("/api/avatars").await;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![keep["id"].as_str().unwrap()]);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/admin/avatars/{gone_id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_and_public_lists_match() {
    let app = echo_app();
    let token = app.admin_token().await;
    app.create_avatar(&token, "A").await;
    app.create_avatar(&token, "B").await;

    let (_, public) = app.get("/api/avatars").await;
    let (status, admin) = app
        .request(Method::GET, "/api/admin/avatars", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public.as_array().unwrap().len(), 2);
    assert_eq!(public, admin);
}

#[tokio::test]
async fn avatar_list_is_capped() {
    let app = echo_app();
    {
        let conn = app.db.lock().unwrap();
        for i in 0..1005 {
            zeny::avatar::store::create_avatar(
                &conn,
                zeny::avatar::NewAvatar {
                    name: format!("bulk-{i}"),
                    description: "d".into(),
                    personality: "p".into(),
                    instructions: "i".into(),
                },
            )
            .unwrap();
        }
    }

    let (status, body) = app.get("/api/avatars").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1000);
}

#[tokio::test]
async fn legacy_status_roundtrip() {
    let app = test_app(None);
    let (status, created) = app.post("/api/status", json!({"client_name": "web"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["client_name"], "web");

    let (status, listed) = app.get("/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn bearer_scheme_matches_any_case() {
    let app = echo_app();
    let token = app.admin_token().await;
    app.create_avatar(&token, "Cased").await;

    for scheme in ["Bearer", "bearer", "BEARER", "BeArEr"] {
        let (status, body) = app
            .get_with_authorization("/api/admin/avatars", &format!("{scheme} {token}"))
            .await;
        assert_eq!(status, StatusCode::OK, "scheme {scheme}");
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    let (status, body) = app
        .get_with_authorization("/api/admin/avatars", &format!("Basic {token}"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Not authenticated");
}
