use mockall::mock;
use order_relay_engine::traits::{
    ChannelError,
    DocumentQuery,
    DocumentStore,
    DocumentStoreError,
    NotificationChannel,
    OrderStatusUpdater,
    StatusUpdateError,
    TemplateMessage,
};
use serde_json::Value;

mock! {
    pub Store {}
    impl Clone for Store {
        fn clone(&self) -> Self;
    }
    impl DocumentStore for Store {
        async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DocumentStoreError>;
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError>;
        async fn query(&self, collection: &str, query: DocumentQuery) -> Result<Vec<Value>, DocumentStoreError>;
    }
}

mock! {
    pub Channel {}
    impl NotificationChannel for Channel {
        async fn send_text(&self, recipient: &str, body: &str) -> Result<Value, ChannelError>;
        async fn send_template(&self, recipient: &str, template: &TemplateMessage) -> Result<Value, ChannelError>;
    }
}

mock! {
    pub StatusUpdater {}
    impl OrderStatusUpdater for StatusUpdater {
        async fn update_order_status(&self, order_id: i64, status: &str) -> Result<(), StatusUpdateError>;
    }
}
