pub mod artifact;

pub use artifact::{load_articles, persist_articles, StorageError};
