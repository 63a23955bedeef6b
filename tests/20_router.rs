use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use hoa_admin::auth::{issue_session_token, SESSION_COOKIE};
use hoa_admin::create_app;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_session(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn login_page_is_public() {
    let response = create_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Management Login"));
    assert!(!html.contains("/dashboard/recycle-bin"));
}

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    for uri in [
        "/dashboard/hoa-create",
        "/dashboard/hoa-user-create",
        "/dashboard/manage-hoa",
        "/dashboard/manage-hoa/1/users",
        "/dashboard/manage-hoa/1/edit",
        "/dashboard/recycle-bin",
        "/dashboard/security",
        "/toggle-hoa/1",
        "/delete-hoa/1",
        "/restore-hoa/1",
        "/toggle-user/1",
        "/delete-user/1",
        "/permanent-delete-hoa/1",
    ] {
        let response = create_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.headers()[header::LOCATION], "/", "{}", uri);
    }
}

#[tokio::test]
async fn forged_session_is_rejected_and_cleared() {
    let response = create_app()
        .oneshot(get_with_session("/dashboard/manage-hoa", "not-a-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cleared = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| v.to_str().unwrap_or("").starts_with(SESSION_COOKIE));
    assert!(cleared, "session cookie should be removed");
}

#[tokio::test]
async fn valid_session_reaches_dashboard() {
    let token = issue_session_token("admin").unwrap();
    let response = create_app()
        .oneshot(get_with_session("/dashboard/hoa-create", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Logout (admin)"));
    assert!(html.contains("name=\"start\""));
}

#[tokio::test]
async fn logout_clears_session() {
    let token = issue_session_token("admin").unwrap();
    let response = create_app().oneshot(get_with_session("/logout", &token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(response.headers().contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn user_form_without_tenant_renders_html() {
    let token = issue_session_token("admin").unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/dashboard/hoa-user-create")
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("email=board%40example.org&password=hunter22"))
        .unwrap();

    let response = create_app().oneshot(request).await.unwrap();

    // 400 with the inline message, or the HTML error page when no database is configured
    assert_ne!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{}", content_type);
    if response.status() == StatusCode::BAD_REQUEST {
        assert!(body_text(response).await.contains("Select an HOA"));
    }
}
