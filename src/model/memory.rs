use std::collections::{btree_map::Entry, BTreeMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Error, FieldUpdate, Result, Subscriber, SubscriberStore};

/// `SubscriberStore` that keeps everything in process memory.
/// Rows are keyed by id so listing order matches the Postgres store.
#[derive(Debug, Default)]
pub struct MemorySubscriberStore {
    rows: RwLock<BTreeMap<i32, Subscriber>>,
}

impl MemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberStore for MemorySubscriberStore {
    async fn list(&self) -> Result<Vec<Subscriber>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber> {
        match self.rows.write().await.entry(subscriber.id) {
            Entry::Occupied(_) => Err(Error::DuplicateId(subscriber.id)),
            Entry::Vacant(e) => Ok(e.insert(subscriber).clone()),
        }
    }

    async fn get(&self, id: i32) -> Result<Option<Subscriber>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update_field(&self, id: i32, update: &FieldUpdate) -> Result<Option<Subscriber>> {
        let mut rows = self.rows.write().await;
        let Some(subscriber) = rows.get_mut(&id) else {
            return Ok(None);
        };

        let prior = subscriber.clone();
        update.apply_to(subscriber);

        Ok(Some(prior))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
