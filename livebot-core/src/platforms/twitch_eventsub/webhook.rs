// File: livebot-core/src/platforms/twitch_eventsub/webhook.rs
//
// Inbound EventSub webhook. Twitch posts three kinds of messages to the
// callback: the one-time verification challenge, notifications and
// revocations. Only `stream.online` notifications do anything.

use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    Router,
    routing::post,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_server::{Handle, Server};
use dashmap::DashMap;
use serde::Deserialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::platforms::twitch_eventsub::client::STREAM_ONLINE;
use crate::services::live_notifications::{LiveNotifier, StreamOnlineEvent};
use crate::Error;

pub const MESSAGE_TYPE_HEADER: &str = "Twitch-Eventsub-Message-Type";
pub const MESSAGE_ID_HEADER: &str = "Twitch-Eventsub-Message-Id";

/// Twitch retries deliveries for a while; ids older than this are forgotten.
const SEEN_MESSAGE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Deserialize)]
pub struct SubscriptionInfo {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: String,
}

/// Body shared by all three message types; which optional field is set
/// depends on the message type header.
#[derive(Debug, Deserialize)]
pub struct EventSubEnvelope {
    pub subscription: SubscriptionInfo,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct EventSubWebhookState {
    pub notifier: Arc<LiveNotifier>,
    seen: Arc<DashMap<String, Instant>>,
}

impl EventSubWebhookState {
    pub fn new(notifier: Arc<LiveNotifier>) -> Self {
        Self {
            notifier,
            seen: Arc::new(DashMap::new()),
        }
    }

    /// True the first time a message id is offered.
    fn first_delivery(&self, message_id: &str) -> bool {
        let now = Instant::now();
        self.seen
            .retain(|_, at| now.saturating_duration_since(*at) < SEEN_MESSAGE_TTL);
        self.seen.insert(message_id.to_string(), now).is_none()
    }
}

pub fn webhook_router(state: EventSubWebhookState) -> Router {
    Router::new()
        .route("/eventsub", post(handle_eventsub))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serves the webhook on `addr` until the returned sender fires (or is dropped).
pub async fn start_webhook_server(
    addr: SocketAddr,
    state: EventSubWebhookState,
) -> Result<(oneshot::Sender<()>, JoinHandle<()>), Error> {
    let app = webhook_router(state);

    let (shutdown_send, shutdown_recv) = oneshot::channel::<()>();
    let handle = Handle::new();
    let handle_clone = handle.clone();

    tokio::spawn(async move {
        let _ = shutdown_recv.await;
        handle_clone.graceful_shutdown(Some(std::time::Duration::from_secs(5)));
    });

    info!("EventSub webhook listening on http://{}/eventsub", addr);
    let server = Server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service());

    let join = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Webhook server error: {}", e);
        }
        info!("Webhook server shut down.");
    });

    Ok((shutdown_send, join))
}

async fn handle_eventsub(
    State(state): State<EventSubWebhookState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let Some(message_type) = headers.get(MESSAGE_TYPE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("EventSub request without {} header", MESSAGE_TYPE_HEADER);
        return StatusCode::BAD_REQUEST.into_response();
    };

    let envelope: EventSubEnvelope = match serde_json::from_str(&body) {
        Ok(env) => env,
        Err(e) => {
            warn!("Malformed EventSub body ({}): {}", message_type, e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match message_type {
        "webhook_callback_verification" => {
            let Some(challenge) = envelope.challenge else {
                warn!("Verification request for {} without a challenge", envelope.subscription.id);
                return StatusCode::BAD_REQUEST.into_response();
            };
            info!(
                "Verified {} subscription {}",
                envelope.subscription.kind, envelope.subscription.id
            );
            (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], challenge).into_response()
        }
        "notification" => {
            if envelope.subscription.kind != STREAM_ONLINE {
                debug!("Ignoring {} notification", envelope.subscription.kind);
                return StatusCode::NO_CONTENT.into_response();
            }

            let event: StreamOnlineEvent = match envelope.event.map(serde_json::from_value) {
                Some(Ok(ev)) => ev,
                Some(Err(e)) => {
                    warn!("Bad {} event payload: {}", STREAM_ONLINE, e);
                    return StatusCode::BAD_REQUEST.into_response();
                }
                None => {
                    warn!("{} notification without an event", STREAM_ONLINE);
                    return StatusCode::BAD_REQUEST.into_response();
                }
            };

            // only accepted events count as delivered, so a rejected one can be retried
            if let Some(id) = headers.get(MESSAGE_ID_HEADER).and_then(|v| v.to_str().ok()) {
                if !state.first_delivery(id) {
                    debug!("Ignoring redelivered EventSub message {}", id);
                    return StatusCode::NO_CONTENT.into_response();
                }
            }

            // Twitch wants an answer quickly; the fan-out runs detached.
            let notifier = state.notifier.clone();
            tokio::spawn(async move {
                match notifier.on_stream_online(&event).await {
                    Ok(report) => debug!(
                        "Live fan-out for {}: {} chats, {} sent, {} failed",
                        event.broadcaster_user_login,
                        report.chats,
                        report.messages_sent,
                        report.send_failures
                    ),
                    Err(e) => error!("Live fan-out for {} failed: {}", event.broadcaster_user_login, e),
                }
            });
            StatusCode::NO_CONTENT.into_response()
        }
        "revocation" => {
            warn!(
                "{} subscription {} was revoked ({})",
                envelope.subscription.kind, envelope.subscription.id, envelope.subscription.status
            );
            StatusCode::NO_CONTENT.into_response()
        }
        other => {
            debug!("Unknown EventSub message type {}", other);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
