//! In-process stand-ins for the pipeline's collaborators.
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
        Mutex,
    },
};

use serde_json::{json, Value};

use crate::{
    traits::{
        ChannelError,
        DocumentQuery,
        DocumentStore,
        DocumentStoreError,
        NotificationChannel,
        OrderStatusUpdater,
        StatusUpdateError,
        TemplateMessage,
    },
    MemoryDocumentStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text { to: String, body: String },
    Template { to: String, template: TemplateMessage },
}

/// Records every message and fails for the recipients it is told to.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    fail_templates: Arc<AtomicBool>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().expect("lock poisoned").insert(recipient.to_string());
    }

    pub fn fail_templates(&self) {
        self.fail_templates.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    pub fn texts(&self) -> Vec<(String, String)> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                SentMessage::Text { to, body } => Some((to, body)),
                SentMessage::Template { .. } => None,
            })
            .collect()
    }

    fn check(&self, recipient: &str) -> Result<(), ChannelError> {
        if self.failing.lock().expect("lock poisoned").contains(recipient) {
            return Err(ChannelError::Rejected { status: 400, message: format!("Recipient {recipient} is not valid") });
        }
        Ok(())
    }
}

impl NotificationChannel for RecordingChannel {
    async fn send_text(&self, recipient: &str, body: &str) -> Result<Value, ChannelError> {
        self.check(recipient)?;
        let message = SentMessage::Text { to: recipient.to_string(), body: body.to_string() };
        self.sent.lock().expect("lock poisoned").push(message);
        Ok(json!({"messages": [{"id": format!("wamid.text.{recipient}")}]}))
    }

    async fn send_template(&self, recipient: &str, template: &TemplateMessage) -> Result<Value, ChannelError> {
        if self.fail_templates.load(Ordering::SeqCst) {
            return Err(ChannelError::Rejected { status: 404, message: "Template does not exist".into() });
        }
        self.check(recipient)?;
        let message = SentMessage::Template { to: recipient.to_string(), template: template.clone() };
        self.sent.lock().expect("lock poisoned").push(message);
        Ok(json!({"messages": [{"id": format!("wamid.template.{recipient}")}]}))
    }
}

/// Records status updates, optionally rejecting all of them.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusUpdater {
    calls: Arc<Mutex<Vec<(i64, String)>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingStatusUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let updater = Self::default();
        updater.fail.store(true, Ordering::SeqCst);
        updater
    }

    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().expect("lock poisoned").clone()
    }
}

impl OrderStatusUpdater for RecordingStatusUpdater {
    async fn update_order_status(&self, order_id: i64, status: &str) -> Result<(), StatusUpdateError> {
        self.calls.lock().expect("lock poisoned").push((order_id, status.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(StatusUpdateError::Rejected { order_id, reason: "woocommerce_rest_cannot_edit".into() });
        }
        Ok(())
    }
}

/// A memory store whose reads and writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryDocumentStore,
    fail_get: Arc<AtomicBool>,
    fail_put: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }
}

impl DocumentStore for FlakyStore {
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DocumentStoreError> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::ConnectionError("disk I/O error".into()));
        }
        self.inner.put(collection, id, document).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::ConnectionError("database is locked".into()));
        }
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, query: DocumentQuery) -> Result<Vec<Value>, DocumentStoreError> {
        self.inner.query(collection, query).await
    }
}
