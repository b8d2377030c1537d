use std::{fmt::Debug, time::Duration};

use chrono::{DateTime, Utc};
use log::*;
use serde_json::Value;

use crate::{
    db_types::{OrderRecord, StoredOrder, ORDERS_COLLECTION, ORDER_SOURCE},
    dedup::{DedupGate, DEFAULT_DEDUP_WINDOW},
    delivery::{DeliveryConfig, DeliveryOrchestrator},
    formatter::format_order_message,
    normalizer::normalize,
    relay_api::{errors::RelayError, relay_objects::IngestResult},
    traits::{DocumentStore, NotificationChannel, OrderStatusUpdater},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub delivery: DeliveryConfig,
    pub dedup_window: Duration,
    /// When set, the upstream order is moved to this status after a notification goes out.
    pub target_status: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { delivery: DeliveryConfig::default(), dedup_window: DEFAULT_DEDUP_WINDOW, target_status: None }
    }
}

/// `IngestApi` runs the notification pipeline for inbound order events.
///
/// Each event is normalized and formatted, checked against the dedup state stored with the order, delivered when
/// required, and persisted. Only a failure to persist is reported to the caller. Everything else (a store read
/// failure, a channel failure, a rejected status update) is logged and reflected in the [`IngestResult`].
pub struct IngestApi<S, C, U> {
    store: S,
    delivery: DeliveryOrchestrator<C>,
    status_updater: U,
    dedup: DedupGate,
    target_status: Option<String>,
}

impl<S, C, U> Debug for IngestApi<S, C, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IngestApi")
    }
}

impl<S, C, U> IngestApi<S, C, U> {
    pub fn new(store: S, channel: C, status_updater: U, config: IngestConfig) -> Self {
        Self {
            store,
            delivery: DeliveryOrchestrator::new(channel, config.delivery),
            status_updater,
            dedup: DedupGate::new(config.dedup_window),
            target_status: config.target_status.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, C, U> IngestApi<S, C, U>
where
    S: DocumentStore,
    C: NotificationChannel,
    U: OrderStatusUpdater,
{
    pub async fn ingest_order_event(&self, raw: Value) -> Result<IngestResult, RelayError> {
        self.ingest_order_event_at(raw, Utc::now()).await
    }

    /// As [`Self::ingest_order_event`], with an explicit clock.
    pub async fn ingest_order_event_at(&self, raw: Value, now: DateTime<Utc>) -> Result<IngestResult, RelayError> {
        let record = normalize(&raw, now.naive_utc());
        let text = format_order_message(&record);
        let doc_id = record.document_id();
        debug!("📦️ Ingesting order #{} as {ORDERS_COLLECTION}/{doc_id}", record.order_number);

        let previous = match self.store.get(ORDERS_COLLECTION, &doc_id).await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("📦️ Could not read the stored state for order {doc_id}. Treating it as new. {e}");
                None
            },
        };
        let stored_state = previous.as_ref().and_then(StoredOrder::dedup_state_of);
        let decision = self.dedup.should_send(&doc_id, &text, stored_state.as_ref(), now);

        let (delivery, status_updated) = if decision.send {
            let report = self.delivery.deliver(&record, &text).await;
            let updated = self.update_upstream_status(&record).await;
            (Some(report), updated)
        } else {
            (None, false)
        };

        let result = IngestResult {
            ok: true,
            saved_doc: doc_id.clone(),
            whatsapp_attempted: delivery.as_ref().map(|d| d.attempted).unwrap_or(false),
            whatsapp_sent: delivery.as_ref().map(|d| d.delivered()).unwrap_or(false),
            status_updated,
            dedup_skipped: !decision.send,
            delivery: delivery.clone(),
        };

        let carried_over = |doc: &Value| doc["status_updated"].as_bool().unwrap_or(false);
        let stored = StoredOrder {
            record,
            raw,
            message_text: text,
            source: ORDER_SOURCE.to_string(),
            ingested_at: now,
            dedup: Some(decision.state),
            delivery: delivery.or_else(|| previous.as_ref().and_then(StoredOrder::delivery_of)),
            status_updated: status_updated || (!decision.send && previous.as_ref().map(carried_over).unwrap_or(false)),
        };
        let document = serde_json::to_value(&stored).map_err(|e| RelayError::StoreUnavailable(e.into()))?;
        self.store.put(ORDERS_COLLECTION, &doc_id, document).await.map_err(|e| {
            error!("📦️ Could not persist order {doc_id}. {e}");
            RelayError::from(e)
        })?;
        info!(
            "📦️ Order #{} saved as {doc_id}. Sent: {}. Dedup skipped: {}. Status updated: {}.",
            stored.record.order_number, result.whatsapp_sent, result.dedup_skipped, result.status_updated
        );
        Ok(result)
    }

    async fn update_upstream_status(&self, record: &OrderRecord) -> bool {
        let Some(target) = self.target_status.as_deref() else {
            return false;
        };
        if record.order_id == 0 {
            debug!("🧾️ Order #{} has no upstream id. Skipping the status update.", record.order_number);
            return false;
        }
        if record.status == target {
            trace!("🧾️ Order #{} is already '{target}'", record.order_number);
            return false;
        }
        match self.status_updater.update_order_status(record.order_id, target).await {
            Ok(()) => {
                info!("🧾️ Order #{} moved from '{}' to '{target}'", record.order_number, record.status);
                true
            },
            Err(e) => {
                let e = RelayError::UpstreamStatusUpdateFailed(e);
                warn!("🧾️ Could not update the status of order #{}. {e}", record.order_number);
                false
            },
        }
    }
}
