// File: livebot-core/src/services/eventsub_sync.rs

use std::collections::BTreeSet;
use tracing::{info, warn};

use livebot_common::traits::api::EventSubApi;
use livebot_common::traits::repository_traits::SubscriptionRepository;

use crate::Error;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub subscribed: Vec<i64>,
    pub unsubscribed: Vec<i64>,
    pub failed: Vec<i64>,
}

/// Makes the set of active `stream.online` subscriptions match the streamers
/// the database knows about. Per-streamer failures are collected, not fatal;
/// failing to read either side is.
pub async fn sync_stream_online_subscriptions(
    eventsub: &(dyn EventSubApi + Send + Sync),
    subscriptions: &(dyn SubscriptionRepository + Send + Sync),
) -> Result<SyncReport, Error> {
    let wanted: BTreeSet<i64> = subscriptions
        .subscribed_streamer_ids()
        .await?
        .into_iter()
        .collect();
    let active: BTreeSet<i64> = eventsub
        .list_stream_online_subscriptions()
        .await?
        .iter()
        .filter_map(|s| s.broadcaster_id())
        .collect();

    let mut report = SyncReport::default();

    for id in wanted.difference(&active) {
        match eventsub.subscribe_stream_online(*id).await {
            Ok(()) => report.subscribed.push(*id),
            Err(e) => {
                warn!("Could not subscribe to stream.online for {}: {}", id, e);
                report.failed.push(*id);
            }
        }
    }

    for id in active.difference(&wanted) {
        match eventsub.unsubscribe_stream_online(*id).await {
            Ok(()) => report.unsubscribed.push(*id),
            Err(e) => {
                warn!("Could not unsubscribe stream.online for {}: {}", id, e);
                report.failed.push(*id);
            }
        }
    }

    info!(
        "EventSub sync: {} wanted, {} active, +{} -{} ({} failed)",
        wanted.len(),
        active.len(),
        report.subscribed.len(),
        report.unsubscribed.len(),
        report.failed.len()
    );
    Ok(report)
}
