//! HTTP fixture server for exercising clients over real sockets.
//!
//! # Design
//! A small in-memory bookmark API backed by a `Shelf`, plus diagnostic
//! routes:
//! - `/echo` reflects the request back as JSON.
//! - `/status/{code}` answers with an arbitrary status.
//! - `/pixel.png` serves a binary body.
//! - `/padded/{len}` answers with a JSON string of `len` characters.
//!
//! Each `app()` owns a fresh `Shelf`, so tests never share state.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// 1x1 transparent PNG served by `/pixel.png`.
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookmark {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookmark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub tag: Option<String>,
}

/// What `/echo` saw of the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<serde_json::Value>,
}

/// Bookmark collection shared by the handlers of one `app()`.
#[derive(Debug, Default)]
pub struct Shelf {
    bookmarks: RwLock<HashMap<Uuid, Bookmark>>,
}

impl Shelf {
    /// Bookmarks carrying `tag` (all of them when `None`), ordered by title.
    pub async fn list(&self, tag: Option<&str>) -> Vec<Bookmark> {
        let mut listed: Vec<Bookmark> = self
            .bookmarks
            .read()
            .await
            .values()
            .filter(|b| tag.map_or(true, |tag| b.tags.iter().any(|t| t == tag)))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        listed
    }

    pub async fn add(&self, input: CreateBookmark) -> Bookmark {
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            url: input.url,
            title: input.title,
            tags: input.tags,
        };
        debug!(id = %bookmark.id, "bookmark created");
        self.bookmarks.write().await.insert(bookmark.id, bookmark.clone());
        bookmark
    }

    pub async fn find(&self, id: Uuid) -> Option<Bookmark> {
        self.bookmarks.read().await.get(&id).cloned()
    }

    /// Apply the fields present in `update`; absent fields stay as they are.
    pub async fn edit(&self, id: Uuid, update: UpdateBookmark) -> Option<Bookmark> {
        let mut bookmarks = self.bookmarks.write().await;
        let bookmark = bookmarks.get_mut(&id)?;
        if let Some(title) = update.title {
            bookmark.title = title;
        }
        if let Some(tags) = update.tags {
            bookmark.tags = tags;
        }
        Some(bookmark.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Bookmark> {
        self.bookmarks.write().await.remove(&id)
    }
}

/// Largest body `/padded/{len}` will produce.
pub const MAX_PADDED_LEN: usize = 64 * 1024 * 1024;

pub fn app() -> Router {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/{id}",
            get(get_bookmark).patch(update_bookmark).delete(delete_bookmark),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/pixel.png", get(pixel))
        .route("/padded/{len}", get(padded))
        .with_state(Arc::new(Shelf::default()))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type SharedShelf = State<Arc<Shelf>>;

fn found<T>(item: Option<T>) -> Result<T, StatusCode> {
    item.ok_or(StatusCode::NOT_FOUND)
}

async fn list_bookmarks(State(shelf): SharedShelf, Query(params): Query<ListParams>) -> Json<Vec<Bookmark>> {
    Json(shelf.list(params.tag.as_deref()).await)
}

async fn create_bookmark(State(shelf): SharedShelf, Json(input): Json<CreateBookmark>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(shelf.add(input).await))
}

async fn get_bookmark(State(shelf): SharedShelf, Path(id): Path<Uuid>) -> Result<Json<Bookmark>, StatusCode> {
    found(shelf.find(id).await).map(Json)
}

async fn update_bookmark(
    State(shelf): SharedShelf,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateBookmark>,
) -> Result<Json<Bookmark>, StatusCode> {
    found(shelf.edit(id, update).await).map(Json)
}

async fn delete_bookmark(State(shelf): SharedShelf, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    found(shelf.remove(id).await).map(|_| StatusCode::NO_CONTENT)
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = if body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())),
        )
    };
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body,
    })
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn pixel() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], PIXEL_PNG)
}

/// A JSON string of `len` `x` characters, for large-body tests.
async fn padded(Path(len): Path<usize>) -> Result<impl IntoResponse, StatusCode> {
    if len > MAX_PADDED_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut body = Vec::with_capacity(len + 2);
    body.push(b'"');
    body.resize(len + 1, b'x');
    body.push(b'"');
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
