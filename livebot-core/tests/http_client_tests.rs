// tests/http_client_tests.rs
//
// The real HTTP clients against a local axum stand-in for Helix / IVR / 7TV.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use reqwest::Client as ReqwestClient;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use livebot_common::traits::api::{BanLookupApi, EmoteApi, EventSubApi, HelixApi};
use livebot_core::platforms::ivr::IvrClient;
use livebot_core::platforms::seventv::SevenTvClient;
use livebot_core::platforms::twitch::requests::token::fetch_app_access_token;
use livebot_core::platforms::twitch::TwitchHelixClient;
use livebot_core::platforms::twitch_eventsub::TwitchEventSubClient;
use livebot_core::Error;

#[derive(Default)]
struct Hits {
    users: AtomicUsize,
    deletes: AtomicUsize,
    posts: AtomicUsize,
}

type Shared = Arc<Hits>;

/// Serves `app` on an ephemeral port and returns its base url.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http() -> Arc<ReqwestClient> {
    Arc::new(ReqwestClient::new())
}

fn authorized(headers: &HeaderMap, bearer: &str) -> bool {
    headers.get("Client-Id").and_then(|v| v.to_str().ok()) == Some("cid")
        && headers.get("Authorization").and_then(|v| v.to_str().ok()) == Some(format!("Bearer {}", bearer).as_str())
}

async fn streams(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers, "usertoken") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid token" })));
    }
    match q.get("user_login").map(String::as_str) {
        Some("forsen") => (
            StatusCode::OK,
            Json(json!({ "data": [{
                "user_id": "22484632",
                "user_login": "forsen",
                "user_name": "forsen",
                "game_name": "Minecraft",
                "title": "speedrun",
                "viewer_count": 5757,
                "started_at": "2024-05-01T12:00:00Z",
                "thumbnail_url": "https://example/{width}x{height}.jpg",
                "tags": ["English"]
            }], "pagination": {} })),
        ),
        Some("broken") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" }))),
        Some("bad~name") => (StatusCode::BAD_REQUEST, Json(json!({ "message": "Malformed query" }))),
        _ => (StatusCode::OK, Json(json!({ "data": [] }))),
    }
}

async fn users(State(hits): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    hits.users.fetch_add(1, Ordering::SeqCst);
    match q.get("login").map(String::as_str) {
        Some("forsen") => Json(json!({ "data": [{
            "id": "22484632",
            "login": "forsen",
            "display_name": "Forsen",
            "type": ""
        }] })),
        _ => Json(json!({ "data": [] })),
    }
}

async fn followers(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let total = if q.get("broadcaster_id").map(String::as_str) == Some("22484632") { 1_750_000 } else { 0 };
    Json(json!({ "total": total, "data": [], "pagination": {} }))
}

async fn channels() -> Json<Value> {
    Json(json!({ "data": [{
        "broadcaster_id": "22484632",
        "broadcaster_login": "forsen",
        "broadcaster_name": "forsen",
        "game_name": "Minecraft",
        "title": "speedrun"
    }] }))
}

fn helix_app(hits: Shared) -> Router {
    Router::new()
        .route("/streams", get(streams))
        .route("/users", get(users))
        .route("/channels", get(channels))
        .route("/channels/followers", get(followers))
        .with_state(hits)
}

#[tokio::test]
async fn helix_stream_lookup() -> Result<(), Error> {
    let base = serve(helix_app(Shared::default())).await;
    let helix = TwitchHelixClient::new(http(), "oauth:usertoken", "cid").with_base_url(&base);

    let stream = helix.get_stream("forsen").await?.expect("forsen is live");
    assert_eq!(stream.user_id, "22484632");
    assert_eq!(stream.viewer_count, 5757);
    assert_eq!(stream.game_name, "Minecraft");

    assert!(helix.get_stream("offline_user").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn helix_errors_carry_the_status() {
    let base = serve(helix_app(Shared::default())).await;
    let helix = TwitchHelixClient::new(http(), "usertoken", "cid").with_base_url(&base);

    match helix.get_stream("broken").await {
        Err(Error::Api(api)) => {
            assert!(api.is_status(500));
            assert!(api.url.contains("/streams?user_login=broken"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    match helix.get_stream("bad~name").await {
        Err(Error::Api(api)) => assert!(api.is_status(400)),
        other => panic!("expected an API error, got {:?}", other),
    }

    let wrong_token = TwitchHelixClient::new(http(), "nope", "cid").with_base_url(&base);
    match wrong_token.get_stream("forsen").await {
        Err(Error::Api(api)) => assert!(api.is_status(401)),
        other => panic!("expected an API error, got {:?}", other),
    }
}

#[tokio::test]
async fn helix_transport_failure_is_an_api_error() {
    // nothing listens on port 9 of localhost
    let helix = TwitchHelixClient::new(http(), "usertoken", "cid").with_base_url("http://127.0.0.1:9");
    match helix.get_stream("forsen").await {
        Err(Error::Api(api)) => assert_eq!(api.status, None),
        other => panic!("expected a transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn login_to_id_is_cached() -> Result<(), Error> {
    let hits = Shared::default();
    let base = serve(helix_app(hits.clone())).await;
    let helix = TwitchHelixClient::new(http(), "usertoken", "cid").with_base_url(&base);

    assert_eq!(helix.login_to_id("Forsen").await?, Some(22484632));
    assert_eq!(helix.login_to_id("forsen").await?, Some(22484632));
    assert_eq!(hits.users.load(Ordering::SeqCst), 1);

    assert_eq!(helix.login_to_id("ghost").await?, None);
    assert_eq!(hits.users.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn helix_followers_and_channel() -> Result<(), Error> {
    let base = serve(helix_app(Shared::default())).await;
    let helix = TwitchHelixClient::new(http(), "usertoken", "cid").with_base_url(&base);

    assert_eq!(helix.get_follower_count(22484632).await?, 1_750_000);
    let channel = helix.get_channel(22484632).await?.expect("channel exists");
    assert_eq!(channel.title, "speedrun");
    Ok(())
}

async fn validate(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get("Authorization").and_then(|v| v.to_str().ok()) {
        Some("OAuth usertoken") => (
            StatusCode::OK,
            Json(json!({
                "client_id": "cid",
                "login": "livebot",
                "user_id": "123",
                "scopes": ["chat:read", "chat:edit"],
                "expires_in": 5000
            })),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "status": 401, "message": "invalid access token" }))),
    }
}

async fn token(Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if q.get("client_secret").map(String::as_str) != Some("s3cr3t")
        || q.get("grant_type").map(String::as_str) != Some("client_credentials")
    {
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "invalid client secret" })));
    }
    (
        StatusCode::OK,
        Json(json!({ "access_token": "apptoken", "expires_in": 5000000, "token_type": "bearer" })),
    )
}

#[tokio::test]
async fn token_validation_and_app_token() -> Result<(), Error> {
    let base = serve(
        Router::new()
            .route("/validate", get(validate))
            .route("/token", axum::routing::post(token)),
    )
    .await;

    let good = TwitchHelixClient::new(http(), "oauth:usertoken", "cid");
    let validation = good.validate_token(&base).await?;
    assert_eq!(validation.login.as_deref(), Some("livebot"));

    let other_client = TwitchHelixClient::new(http(), "usertoken", "someone-else");
    assert!(matches!(other_client.validate_token(&base).await, Err(Error::Config(_))));

    let revoked = TwitchHelixClient::new(http(), "revoked", "cid");
    assert!(matches!(revoked.validate_token(&base).await, Err(Error::Api(a)) if a.is_status(401)));

    let http = ReqwestClient::new();
    let app = fetch_app_access_token(&http, &base, "cid", "s3cr3t").await?;
    assert_eq!(app.access_token, "apptoken");

    match fetch_app_access_token(&http, &base, "cid", "wrong").await {
        Err(Error::Api(api)) => {
            assert!(api.is_status(403));
            assert!(!api.url.contains("wrong"), "secret leaked into {}", api.url);
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    Ok(())
}

async fn ivr_user(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    match q.get("login").map(String::as_str) {
        Some("baduser") => Json(json!([{
            "displayName": "BadUser",
            "banned": true,
            "banReason": "TOS_INDEFINITE",
            "id": "1"
        }])),
        Some("gooduser") => Json(json!([{ "displayName": "GoodUser", "banned": false, "banReason": null }])),
        _ => Json(json!([])),
    }
}

#[tokio::test]
async fn ivr_ban_lookup() -> Result<(), Error> {
    let base = serve(Router::new().route("/twitch/user", get(ivr_user))).await;
    let ivr = IvrClient::new(http()).with_base_url(&base);

    let bad = ivr.get_ban_status("BadUser").await?.expect("exists");
    assert!(bad.banned);
    assert_eq!(bad.ban_reason.as_deref(), Some("TOS_INDEFINITE"));

    let good = ivr.get_ban_status("gooduser").await?.expect("exists");
    assert!(!good.banned);

    assert!(ivr.get_ban_status("ghost").await?.is_none());
    Ok(())
}

async fn seventv_user(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "22484632" => (
            StatusCode::OK,
            Json(json!({
                "id": "01F6MZGCNG000255K4X1K7NTHR",
                "platform": "TWITCH",
                "username": "forsen",
                "emote_set": {
                    "id": "01F6MZ",
                    "name": "forsen's Emotes",
                    "emotes": [
                        { "id": "a", "name": "forsenE", "timestamp": 1714564800000i64, "flags": 0 },
                        { "id": "b", "name": "buh", "timestamp": 1714651200000i64, "flags": 0 }
                    ]
                }
            })),
        ),
        "1" => (StatusCode::OK, Json(json!({ "id": "x", "username": "empty", "emote_set": null }))),
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "status_code": 404, "error": "Unknown User" }))),
    }
}

#[tokio::test]
async fn seventv_emote_lookup() -> Result<(), Error> {
    let base = serve(Router::new().route("/users/twitch/{id}", get(seventv_user))).await;
    let seventv = SevenTvClient::new(http()).with_base_url(&base);

    let emotes = seventv.get_channel_emotes(22484632).await?.expect("has a profile");
    let names: Vec<&str> = emotes.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["forsenE", "buh"]);
    assert_eq!(emotes[1].timestamp, 1714651200000);

    assert_eq!(seventv.get_channel_emotes(1).await?, Some(vec![]));
    assert_eq!(seventv.get_channel_emotes(42).await?, None);

    match seventv.get_channel_emotes(500).await {
        Err(Error::Api(api)) => {
            assert!(api.is_status(500));
            assert!(api.url.ends_with("/users/twitch/500"));
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    Ok(())
}

fn subscription(id: &str, broadcaster: &str, status: &str) -> Value {
    json!({
        "id": id,
        "status": status,
        "type": "stream.online",
        "version": "1",
        "condition": { "broadcaster_user_id": broadcaster },
        "transport": { "method": "webhook", "callback": "https://bot.example/eventsub" },
        "created_at": "2024-05-01T12:00:00Z",
        "cost": 0
    })
}

async fn list_subscriptions(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers, "apptoken") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "app token required" })));
    }
    assert_eq!(q.get("type").map(String::as_str), Some("stream.online"));
    match q.get("after").map(String::as_str) {
        None => (
            StatusCode::OK,
            Json(json!({
                "data": [subscription("a", "100", "enabled"), subscription("b", "200", "webhook_callback_verification_failed")],
                "total": 3,
                "pagination": { "cursor": "page2" }
            })),
        ),
        Some("page2") => (
            StatusCode::OK,
            Json(json!({
                "data": [subscription("c", "300", "enabled")],
                "total": 3,
                "pagination": {}
            })),
        ),
        Some(_) => (StatusCode::BAD_REQUEST, Json(json!({ "message": "bad cursor" }))),
    }
}

async fn create_subscription(State(hits): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    hits.posts.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["type"], "stream.online");
    assert_eq!(body["transport"]["method"], "webhook");
    assert_eq!(body["transport"]["callback"], "https://bot.example/eventsub");
    match body["condition"]["broadcaster_user_id"].as_str() {
        Some("100") => StatusCode::CONFLICT,
        Some("666") => StatusCode::FORBIDDEN,
        _ => StatusCode::ACCEPTED,
    }
}

async fn delete_subscription(State(hits): State<Shared>, Query(q): Query<HashMap<String, String>>) -> StatusCode {
    hits.deletes.fetch_add(1, Ordering::SeqCst);
    match q.get("id").map(String::as_str) {
        Some("a") | Some("b") | Some("c") => StatusCode::NO_CONTENT,
        _ => StatusCode::NOT_FOUND,
    }
}

async fn eventsub_client(hits: Shared) -> TwitchEventSubClient {
    let app = Router::new()
        .route(
            "/eventsub/subscriptions",
            get(list_subscriptions)
                .post(create_subscription)
                .delete(delete_subscription),
        )
        .with_state(hits);
    let base = serve(app).await;
    TwitchEventSubClient::new(
        Arc::new(ReqwestClient::new()),
        "cid",
        "apptoken",
        "https://bot.example/eventsub",
        "0123456789abcdef",
    )
    .with_base_url(&base)
}

#[tokio::test]
async fn eventsub_list_follows_pagination_and_keeps_enabled() -> Result<(), Error> {
    let client = eventsub_client(Shared::default()).await;

    let subs = client.list_stream_online_subscriptions().await?;
    let ids: Vec<Option<i64>> = subs.iter().map(|s| s.broadcaster_id()).collect();
    assert_eq!(ids, vec![Some(100), Some(300)]);
    Ok(())
}

#[tokio::test]
async fn eventsub_subscribe_treats_conflict_as_success() -> Result<(), Error> {
    let hits = Shared::default();
    let client = eventsub_client(hits.clone()).await;

    client.subscribe_stream_online(42).await?;
    client.subscribe_stream_online(100).await?;
    assert_eq!(hits.posts.load(Ordering::SeqCst), 2);

    assert!(matches!(
        client.subscribe_stream_online(666).await,
        Err(Error::Api(api)) if api.is_status(403)
    ));
    Ok(())
}

#[tokio::test]
async fn eventsub_unsubscribe_removes_every_match() -> Result<(), Error> {
    let hits = Shared::default();
    let client = eventsub_client(hits.clone()).await;

    // "b" is not enabled but still belongs to 200 and gets deleted
    client.unsubscribe_stream_online(200).await?;
    assert_eq!(hits.deletes.load(Ordering::SeqCst), 1);

    // nothing for this broadcaster: no DELETE at all
    client.unsubscribe_stream_online(999).await?;
    assert_eq!(hits.deletes.load(Ordering::SeqCst), 1);
    Ok(())
}
