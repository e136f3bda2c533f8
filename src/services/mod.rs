pub mod cache;
pub mod chart;
pub mod indicators;
pub mod memory_store;
pub mod sqlite_store;
pub mod storage;

pub use cache::{ChartCache, ChartKey};
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use storage::{StockRepository, StorageError};
