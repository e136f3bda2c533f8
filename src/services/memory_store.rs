//! In-memory repository backed by concurrent maps.

use crate::services::storage::{date_timestamp, price_date, StockRepository, StorageError};
use crate::types::{Favorite, NewFavorite, NewStock, PricePoint, Stock};
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Repository that keeps everything in process memory.
pub struct MemoryStore {
    stocks: DashMap<String, Stock>,
    favorites: DashMap<String, Favorite>,
    prices: DashMap<String, BTreeMap<NaiveDate, PricePoint>>,
    next_stock_id: AtomicI64,
    next_favorite_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            stocks: DashMap::new(),
            favorites: DashMap::new(),
            prices: DashMap::new(),
            next_stock_id: AtomicI64::new(1),
            next_favorite_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StockRepository for MemoryStore {
    fn get_stock(&self, symbol: &str) -> Result<Option<Stock>, StorageError> {
        Ok(self.stocks.get(symbol).map(|s| s.clone()))
    }

    fn upsert_stock(&self, stock: NewStock) -> Result<Stock, StorageError> {
        match self.stocks.entry(stock.symbol.clone()) {
            Entry::Occupied(mut existing) => {
                let updated = stock.into_stock(existing.get().id);
                existing.insert(updated.clone());
                Ok(updated)
            }
            Entry::Vacant(vacant) => {
                let inserted = stock.into_stock(self.next_stock_id.fetch_add(1, Ordering::SeqCst));
                vacant.insert(inserted.clone());
                Ok(inserted)
            }
        }
    }

    fn get_favorites(&self) -> Result<Vec<Favorite>, StorageError> {
        let mut favorites: Vec<Favorite> = self.favorites.iter().map(|f| f.clone()).collect();
        favorites.sort_by_key(|f| f.id);
        Ok(favorites)
    }

    fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StorageError> {
        let entry = self
            .favorites
            .entry(favorite.symbol.clone())
            .or_insert_with(|| Favorite {
                id: self.next_favorite_id.fetch_add(1, Ordering::SeqCst),
                symbol: favorite.symbol,
            });
        Ok(entry.clone())
    }

    fn remove_favorite(&self, symbol: &str) -> Result<(), StorageError> {
        self.favorites.remove(symbol);
        Ok(())
    }

    fn save_prices(&self, symbol: &str, prices: &[PricePoint]) -> Result<usize, StorageError> {
        let mut rows = self.prices.entry(symbol.to_string()).or_default();
        let mut written = 0;
        for price in prices {
            if let Some(date) = price_date(price.timestamp) {
                rows.insert(
                    date,
                    PricePoint {
                        timestamp: date_timestamp(date),
                        ..*price
                    },
                );
                written += 1;
            }
        }
        debug!("Stored {} price rows for {} in memory", written, symbol);
        Ok(written)
    }

    fn get_prices(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>, StorageError> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .prices
            .get(symbol)
            .map(|rows| rows.range(start..=end).map(|(_, p)| *p).collect())
            .unwrap_or_default())
    }

    fn has_stored_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StorageError> {
        Ok(self
            .prices
            .get(symbol)
            .map(|rows| rows.contains_key(&date))
            .unwrap_or(false))
    }
}
