//! Import pipeline tests against a local oEmbed stand-in
//!
//! A small axum server on `127.0.0.1:0` plays the oEmbed provider so the
//! fetched path runs without network access.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use songmark_api::services::{import_from_url, FetchOutcome, MetadataSource, OEmbedClient};

const DESCRIPTION: &str = "Official karaoke track\nLyrics:\nsầu tím thiệp hồng, tôi gửi cho ai\nmột tấm thiệp hồng với nỗi sầu tím\n\nSubscribe for more";

async fn oembed_stub(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let url = params.get("url").cloned().unwrap_or_default();
    let format = params.get("format").cloned().unwrap_or_default();

    match url.as_str() {
        "https://www.youtube.com/watch?v=good123" if format == "json" => (
            StatusCode::OK,
            Json(json!({
                "title": "Sầu Tím Thiệp Hồng - Lệ Quyên (Official MV)",
                "author_name": "Lệ Quyên Official",
                "thumbnail_url": "https://i.ytimg.com/vi/good123/hqdefault.jpg",
                "description": DESCRIPTION
            })),
        ),
        "https://www.youtube.com/watch?v=bare123" => (StatusCode::OK, Json(json!({}))),
        "https://www.youtube.com/watch?v=junk123" => (StatusCode::OK, Json(json!(["not", "an", "object"]))),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "unknown video"}))),
    }
}

async fn spawn_stub() -> SocketAddr {
    let app = Router::new().route("/oembed", get(oembed_stub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn client() -> OEmbedClient {
    let addr = spawn_stub().await;
    OEmbedClient::new(format!("http://{}/oembed", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetched_metadata_becomes_a_draft() {
    let client = client().await;

    let draft = import_from_url(&client, "https://youtu.be/good123?t=42").await.unwrap();

    assert_eq!(draft.source, MetadataSource::Fetched);
    assert_eq!(draft.song.name, "Sầu Tím Thiệp Hồng - Lệ Quyên (Official MV)");
    assert_eq!(draft.song.author, "Lệ Quyên");
    assert_eq!(draft.song.performers, vec!["Lệ Quyên"]);
    assert_eq!(draft.song.image, "https://i.ytimg.com/vi/good123/hqdefault.jpg");
    assert_eq!(draft.song.ref_urls, vec!["https://youtu.be/good123?t=42"]);
    assert_eq!(
        draft.song.lyric,
        "sầu tím thiệp hồng, tôi gửi cho ai\nmột tấm thiệp hồng với nỗi sầu tím"
    );
}

#[tokio::test]
async fn missing_fields_take_defaults() {
    let client = client().await;

    let outcome = client
        .fetch_metadata("https://www.youtube.com/embed/bare123")
        .await
        .unwrap();

    let FetchOutcome::Fetched(metadata) = outcome else {
        panic!("expected fetched metadata");
    };
    assert_eq!(metadata.title, "Unknown Title");
    assert!(metadata.author.is_empty());
    assert_eq!(
        metadata.thumbnail,
        "https://img.youtube.com/vi/bare123/maxresdefault.jpg"
    );
    assert!(metadata.description.is_empty());
}

#[tokio::test]
async fn non_success_status_falls_back() {
    let client = client().await;

    let draft = import_from_url(&client, "https://www.youtube.com/watch?v=gone123")
        .await
        .unwrap();

    assert_eq!(draft.source, MetadataSource::Fallback);
    assert_eq!(draft.song.name, "YouTube Video (gone123)");
    assert_eq!(
        draft.song.image,
        "https://img.youtube.com/vi/gone123/maxresdefault.jpg"
    );
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let client = client().await;

    let outcome = client
        .fetch_metadata("https://www.youtube.com/watch?v=junk123")
        .await
        .unwrap();

    assert!(outcome.is_fallback());
    assert_eq!(outcome.metadata().title, "YouTube Video (junk123)");
}

#[tokio::test]
async fn invalid_url_never_reaches_the_endpoint() {
    let client = client().await;
    assert!(import_from_url(&client, "https://vimeo.com/12345").await.is_err());
}
