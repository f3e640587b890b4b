use crate::database;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] database::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
