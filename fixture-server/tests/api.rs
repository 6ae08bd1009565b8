use axum::http::{self, Request, StatusCode};
use fixture_server::{app, Bookmark, Echo, MAX_PADDED_LEN, PIXEL_PNG};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> axum::body::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- bookmarks ---

#[tokio::test]
async fn list_bookmarks_empty() {
    let resp = app().oneshot(empty_request("GET", "/bookmarks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bookmarks: Vec<Bookmark> = body_json(resp).await;
    assert!(bookmarks.is_empty());
}

#[tokio::test]
async fn create_bookmark_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/bookmarks",
            r#"{"url":"https://docs.rs","title":"Docs","tags":["rust"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let bookmark: Bookmark = body_json(resp).await;
    assert_eq!(bookmark.title, "Docs");
    assert_eq!(bookmark.tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn create_bookmark_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/bookmarks", r#"{"title":"no url"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_bookmark_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "GET",
            "/bookmarks/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_bookmark_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/bookmarks/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_bookmark_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "DELETE",
            "/bookmarks/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bookmark_lifecycle_with_tag_filter() {
    use tower::Service;

    let mut app = app().into_service();

    let mut created = Vec::new();
    for body in [
        r#"{"url":"https://a.example","title":"A","tags":["keep"]}"#,
        r#"{"url":"https://b.example","title":"B"}"#,
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/bookmarks", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let bookmark: Bookmark = body_json(resp).await;
        created.push(bookmark);
    }

    // filter by tag
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/bookmarks?tag=keep"))
        .await
        .unwrap();
    let tagged: Vec<Bookmark> = body_json(resp).await;
    assert_eq!(tagged, vec![created[0].clone()]);

    // patch title only
    let id = created[1].id;
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/bookmarks/{id}"),
            r#"{"title":"B2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Bookmark = body_json(resp).await;
    assert_eq!(updated.title, "B2");
    assert_eq!(updated.url, "https://b.example"); // unchanged

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/bookmarks/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete, sorted by title
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/bookmarks"))
        .await
        .unwrap();
    let remaining: Vec<Bookmark> = body_json(resp).await;
    assert_eq!(remaining, vec![created[0].clone()]);
}

// --- diagnostics ---

#[tokio::test]
async fn echo_reflects_request() {
    let request = Request::builder()
        .method("PATCH")
        .uri("/echo?b=2&a=1")
        .header("x-trace", "t-1")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(r#"{"hello":"world"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query.get("a").map(String::as_str), Some("1"));
    assert_eq!(echo.query.get("b").map(String::as_str), Some("2"));
    assert_eq!(echo.headers.get("x-trace").map(String::as_str), Some("t-1"));
    assert_eq!(echo.body, Some(serde_json::json!({"hello": "world"})));
}

#[tokio::test]
async fn echo_without_body() {
    let resp = app().oneshot(empty_request("GET", "/echo")).await.unwrap();
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert!(echo.query.is_empty());
    assert_eq!(echo.body, None);
}

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app()
        .oneshot(empty_request("POST", "/status/418"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn pixel_is_png() {
    let resp = app()
        .oneshot(empty_request("GET", "/pixel.png"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(resp).await.as_ref(), PIXEL_PNG);
}

#[tokio::test]
async fn padded_is_a_json_string_of_requested_length() {
    let resp = app()
        .oneshot(empty_request("GET", "/padded/5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(body_bytes(resp).await.as_ref(), br#""xxxxx""#);
}

#[tokio::test]
async fn padded_rejects_oversized_length() {
    let resp = app()
        .oneshot(empty_request("GET", &format!("/padded/{}", MAX_PADDED_LEN + 1)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
