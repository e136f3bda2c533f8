//! Repository interface for stocks, favorites and stored daily prices.
//!
//! Two implementations exist: [`MemoryStore`](super::MemoryStore) for tests
//! and database-less runs, [`SqliteStore`](super::SqliteStore) for
//! production. Handlers only see `Arc<dyn StockRepository>`.

use crate::types::{Favorite, NewFavorite, NewStock, PricePoint, Stock};
use chrono::{DateTime, NaiveDate, NaiveTime};
use thiserror::Error;

/// Storage layer errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Persistence operations used by the HTTP layer.
pub trait StockRepository: Send + Sync {
    /// Look up the stored quote for a symbol.
    fn get_stock(&self, symbol: &str) -> Result<Option<Stock>, StorageError>;

    /// Insert a stock, or update name/price/timestamp if the symbol exists.
    fn upsert_stock(&self, stock: NewStock) -> Result<Stock, StorageError>;

    /// All favorites, oldest first.
    fn get_favorites(&self) -> Result<Vec<Favorite>, StorageError>;

    /// Add a favorite. Adding a symbol twice returns the existing row.
    fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StorageError>;

    /// Remove a favorite by symbol. Missing symbols are ignored.
    fn remove_favorite(&self, symbol: &str) -> Result<(), StorageError>;

    /// Upsert daily rows keyed by (symbol, date). Returns rows written.
    fn save_prices(&self, symbol: &str, prices: &[PricePoint]) -> Result<usize, StorageError>;

    /// Stored rows with `start <= date <= end`, ordered by date.
    fn get_prices(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>, StorageError>;

    /// Whether a row exists for the symbol on the given date.
    fn has_stored_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StorageError>;
}

/// UTC calendar date of an epoch-seconds timestamp.
pub fn price_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Epoch seconds of UTC midnight on `date`.
pub fn date_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp()
}
