//! End to end checkout scenarios driven through the router.

use super::{json, send, TestState};
use crate::core::model::node::Permission;
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

/// A node administered by `owner`, holding one native file.
struct Fixture {
    state: TestState,
    owner: Uuid,
    owner_token: String,
    file_id: Uuid,
}

impl Fixture {
    async fn new() -> Self {
        let state = TestState::init();
        let owner = state.user("owner").await;
        let node = state.node(owner.user.id).await;
        let file = state.file(owner.user.id, node.id, "/test.png").await;

        Self {
            owner: owner.user.id,
            owner_token: owner.token,
            file_id: file.file.id,
            state,
        }
    }

    /// Register a user and, if `permission` is given, add them to the file's node.
    async fn member(&self, username: &str, permission: Option<Permission>) -> (Uuid, String) {
        let user = self.state.user(username).await;

        if let Some(permission) = permission {
            let node_id = self
                .state
                .services
                .file
                .get_file(Some(self.owner), self.file_id)
                .await
                .unwrap()
                .file
                .node_id;

            self.state
                .services
                .node
                .set_contributor(Some(self.owner), node_id, user.user.id, permission)
                .await
                .unwrap();
        }

        (user.user.id, user.token)
    }

    fn uri(&self) -> String {
        format!("/files/{}", self.file_id)
    }

    async fn put(&self, token: &str, body: Value) -> (StatusCode, Value) {
        let response = send(
            self.state.router(),
            "PUT",
            &self.uri(),
            Some(token),
            Some(body),
        )
        .await;
        let status = response.status();
        (status, json(response).await)
    }

    async fn holder(&self) -> Option<Uuid> {
        self.state.store.checkout(self.file_id).await
    }
}

#[tokio::test]
async fn get_requires_authentication() {
    let fx = Fixture::new().await;

    let response = send(fx.state.router(), "GET", &fx.uri(), None, None).await;

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn get_requires_read_permission() {
    let fx = Fixture::new().await;
    let (_, token) = fx.member("outsider", None).await;

    let response = send(fx.state.router(), "GET", &fx.uri(), Some(&token), None).await;

    assert_eq!(StatusCode::FORBIDDEN, response.status());
}

#[tokio::test]
async fn get_returns_file_resource() {
    let fx = Fixture::new().await;

    let response = send(
        fx.state.router(),
        "GET",
        &fx.uri(),
        Some(&fx.owner_token),
        None,
    )
    .await;

    assert_eq!(StatusCode::OK, response.status());

    let body = json(response).await;
    let data = &body["data"];

    assert_eq!(fx.file_id.to_string(), data["id"]);
    assert_eq!("files", data["type"]);

    let attributes = data["attributes"].as_object().unwrap();
    let mut keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
    keys.sort();

    assert_eq!(
        vec![
            "checkout",
            "kind",
            "last_touched",
            "name",
            "path",
            "provider",
            "size"
        ],
        keys
    );
    assert_eq!("/test.png", attributes["path"]);
    assert_eq!("test.png", attributes["name"]);
    assert_eq!("file", attributes["kind"]);
    assert_eq!("native", attributes["provider"]);
    assert_eq!(1337, attributes["size"]);
    assert!(attributes["last_touched"].is_null());
    assert!(attributes["checkout"].is_null());
}

#[tokio::test]
async fn get_unknown_file() {
    let fx = Fixture::new().await;

    let response = send(
        fx.state.router(),
        "GET",
        &format!("/files/{}", Uuid::new_v4()),
        Some(&fx.owner_token),
        None,
    )
    .await;

    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

#[tokio::test]
async fn checkout_and_checkin() {
    let fx = Fixture::new().await;

    let (status, body) = fx
        .put(&fx.owner_token, json!({ "checkout": fx.owner }))
        .await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(fx.owner.to_string(), body["data"]["attributes"]["checkout"]);
    assert_eq!(Some(fx.owner), fx.holder().await);

    let (status, body) = fx.put(&fx.owner_token, json!({ "checkout": null })).await;

    assert_eq!(StatusCode::OK, status);
    assert!(body["data"]["attributes"]["checkout"].is_null());
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn checkout_via_patch_and_cookie() {
    let fx = Fixture::new().await;

    let request = axum::http::Request::builder()
        .method("PATCH")
        .uri(fx.uri())
        .header(
            axum::http::header::COOKIE,
            cookie::Cookie::new(crate::config::ACCESS_TOKEN_COOKIE, fx.owner_token.clone())
                .to_string(),
        )
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            json!({ "checkout": fx.owner }).to_string(),
        ))
        .unwrap();

    let response = tower::ServiceExt::oneshot(fx.state.router(), request)
        .await
        .unwrap();

    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn checkout_must_name_self() {
    let fx = Fixture::new().await;
    let (other, _) = fx.member("other", Some(Permission::Write)).await;

    let (status, _) = fx.put(&fx.owner_token, json!({ "checkout": other })).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn checkout_requires_contributor() {
    let fx = Fixture::new().await;
    let (outsider, token) = fx.member("outsider", None).await;
    fx.state.store.set_checkout(fx.file_id, Some(fx.owner)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": outsider })).await;
    assert_eq!(StatusCode::FORBIDDEN, status);

    let (status, _) = fx.put(&token, json!({ "checkout": null })).await;
    assert_eq!(StatusCode::FORBIDDEN, status);

    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn admin_can_checkin() {
    let fx = Fixture::new().await;
    let (holder, _) = fx.member("holder", Some(Permission::Write)).await;
    fx.state.store.set_checkout(fx.file_id, Some(holder)).await;

    let (status, _) = fx.put(&fx.owner_token, json!({ "checkout": null })).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn admin_can_checkout_held_file() {
    let fx = Fixture::new().await;
    let (holder, _) = fx.member("holder", Some(Permission::Write)).await;
    fx.state.store.set_checkout(fx.file_id, Some(holder)).await;

    let (status, _) = fx
        .put(&fx.owner_token, json!({ "checkout": fx.owner }))
        .await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn writer_can_checkin_others_checkout() {
    let fx = Fixture::new().await;
    let (_, token) = fx.member("writer", Some(Permission::Write)).await;
    fx.state.store.set_checkout(fx.file_id, Some(fx.owner)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": null })).await;

    assert_eq!(StatusCode::OK, status);
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn writer_cannot_take_over_checkout() {
    let fx = Fixture::new().await;
    let (writer, token) = fx.member("writer", Some(Permission::Write)).await;
    fx.state.store.set_checkout(fx.file_id, Some(fx.owner)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": writer })).await;

    assert_eq!(StatusCode::FORBIDDEN, status);
    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn reader_can_checkout_free_file_but_not_checkin_others() {
    let fx = Fixture::new().await;
    let (reader, token) = fx.member("reader", Some(Permission::Read)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": reader })).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(Some(reader), fx.holder().await);

    let (status, _) = fx.put(&token, json!({ "checkout": null })).await;
    assert_eq!(StatusCode::OK, status);

    fx.state.store.set_checkout(fx.file_id, Some(fx.owner)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": null })).await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn checkout_requires_native_provider() {
    let fx = Fixture::new().await;
    fx.state.store.set_provider(fx.file_id, "github").await;

    let (status, _) = fx
        .put(&fx.owner_token, json!({ "checkout": fx.owner }))
        .await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    assert_eq!(None, fx.holder().await);

    fx.state.store.set_checkout(fx.file_id, Some(fx.owner)).await;

    let (status, _) = fx.put(&fx.owner_token, json!({ "checkout": null })).await;
    assert_eq!(StatusCode::FORBIDDEN, status);
    assert_eq!(Some(fx.owner), fx.holder().await);
}

#[tokio::test]
async fn checkout_field_is_required() {
    let fx = Fixture::new().await;

    let (status, body) = fx.put(&fx.owner_token, json!({})).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!("Api", body["error_type"]);
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn checkout_holder_must_be_uuid() {
    let fx = Fixture::new().await;

    let (status, _) = fx
        .put(&fx.owner_token, json!({ "checkout": "not-a-user" }))
        .await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
}

#[tokio::test]
async fn checkout_requires_authentication() {
    let fx = Fixture::new().await;

    let response = send(
        fx.state.router(),
        "PUT",
        &fx.uri(),
        None,
        Some(json!({ "checkout": fx.owner })),
    )
    .await;

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let fx = Fixture::new().await;

    let response = send(
        fx.state.router(),
        "GET",
        &fx.uri(),
        Some("definitely-not-a-token"),
        None,
    )
    .await;

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());

    let body = json(response).await;
    assert_eq!("Api", body["error_type"]);
    assert_eq!("Unauthorized", body["body"]);
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() {
    let fx = Fixture::new().await;

    let request = axum::http::Request::builder()
        .method("GET")
        .uri(fx.uri())
        .header(axum::http::header::AUTHORIZATION, "Basic b3duZXI6cGFzcw==")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(fx.state.router(), request)
        .await
        .unwrap();

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!("Api", json(response).await["error_type"]);
}

#[tokio::test]
async fn health_check_is_public() {
    let fx = Fixture::new().await;

    let response = send(fx.state.router(), "GET", "/_health", None, None).await;

    assert_eq!(StatusCode::OK, response.status());
}

#[tokio::test]
async fn writer_must_name_self() {
    let fx = Fixture::new().await;
    let (_, token) = fx.member("writer", Some(Permission::Write)).await;
    let (other, _) = fx.member("other", Some(Permission::Read)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": other })).await;

    assert_eq!(StatusCode::BAD_REQUEST, status);
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn holder_can_checkin() {
    let fx = Fixture::new().await;
    let (writer, token) = fx.member("writer", Some(Permission::Write)).await;

    let (status, _) = fx.put(&token, json!({ "checkout": writer })).await;
    assert_eq!(StatusCode::OK, status);
    assert_eq!(Some(writer), fx.holder().await);

    let (status, body) = fx.put(&token, json!({ "checkout": null })).await;
    assert_eq!(StatusCode::OK, status);
    assert!(body["data"]["attributes"]["checkout"].is_null());
    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn checkout_holder_of_wrong_type() {
    let fx = Fixture::new().await;

    for holder in [json!(5), json!([fx.owner]), json!({ "id": fx.owner })] {
        let (status, body) = fx.put(&fx.owner_token, json!({ "checkout": holder })).await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("Api", body["error_type"]);
    }

    assert_eq!(None, fx.holder().await);
}

#[tokio::test]
async fn malformed_body_from_anonymous_caller() {
    let fx = Fixture::new().await;

    let response = send(
        fx.state.router(),
        "PUT",
        &fx.uri(),
        None,
        Some(json!({ "checkout": 5 })),
    )
    .await;

    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
    assert_eq!("Api", json(response).await["error_type"]);
}
