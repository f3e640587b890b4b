//! Subscriber records and everything that reads or writes them.
//!
//! Handlers only ever talk to a `SubscriberStore`. Production uses `PgSubscriberStore`,
//! tests and local runs can swap in `MemorySubscriberStore`.

mod leaderboard;
mod lottery;
mod memory;
mod pg;
mod subscriber;

use async_trait::async_trait;

// re-exports
pub use leaderboard::{rank, RankedSubscriber};
pub use lottery::{draw, PrizeDraw, PRIZES};
pub use memory::MemorySubscriberStore;
pub use pg::PgSubscriberStore;
pub use subscriber::{FieldUpdate, Score, Subscriber, NAME_MAX_LEN, PHONE_MAX_LEN};

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// All subscribers, ordered by id.
    async fn list(&self) -> Result<Vec<Subscriber>>;

    /// Stores a new subscriber. Fails with `Error::DuplicateId` if the id is taken.
    async fn insert(&self, subscriber: Subscriber) -> Result<Subscriber>;

    async fn get(&self, id: i32) -> Result<Option<Subscriber>>;

    /// Applies `update` and returns the subscriber as it was before the change,
    /// or `None` if there is no subscriber with this id.
    async fn update_field(&self, id: i32, update: &FieldUpdate) -> Result<Option<Subscriber>>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: i32) -> Result<bool>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<()>;
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a subscriber with id {0} already exists")]
    DuplicateId(i32),
    #[error("stored score of subscriber {id} is not an integer: {value:?}")]
    InvalidStoredScore { id: i32, value: String },

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
