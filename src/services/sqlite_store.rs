//! SQLite persistence layer for stocks, favorites and daily prices.
//!
//! Bulk price writes run inside a single transaction so a partially failed
//! import leaves no rows behind.

use crate::services::storage::{date_timestamp, price_date, StockRepository, StorageError};
use crate::types::{Favorite, NewFavorite, NewStock, PricePoint, Stock};
use chrono::{DateTime, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed repository.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite store initialized");
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite store initialized");
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS stocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                last_updated INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT UNIQUE NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS stock_prices (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                UNIQUE(symbol, date)
            )",
            [],
        )?;

        info!("SQLite schema initialized");
        Ok(())
    }
}

fn stock_from_row(row: &Row<'_>) -> rusqlite::Result<Stock> {
    let millis: i64 = row.get(4)?;
    let last_updated = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(4, millis)
    })?;

    Ok(Stock {
        id: row.get(0)?,
        symbol: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        last_updated,
    })
}

fn price_from_row(row: &Row<'_>) -> rusqlite::Result<PricePoint> {
    let date: String = row.get(0)?;
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let volume: i64 = row.get(5)?;

    Ok(PricePoint {
        timestamp: date_timestamp(date),
        open: row.get(1)?,
        high: row.get(2)?,
        low: row.get(3)?,
        close: row.get(4)?,
        volume: volume.max(0) as u64,
    })
}

impl StockRepository for SqliteStore {
    fn get_stock(&self, symbol: &str) -> Result<Option<Stock>, StorageError> {
        let conn = self.conn()?;
        let stock = conn
            .query_row(
                "SELECT id, symbol, name, price, last_updated FROM stocks WHERE symbol = ?1",
                params![symbol],
                stock_from_row,
            )
            .optional()?;
        Ok(stock)
    }

    fn upsert_stock(&self, stock: NewStock) -> Result<Stock, StorageError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO stocks (symbol, name, price, last_updated)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                price = excluded.price,
                last_updated = excluded.last_updated",
            params![
                stock.symbol,
                stock.name,
                stock.price,
                stock.last_updated.timestamp_millis(),
            ],
        )?;

        let saved = conn.query_row(
            "SELECT id, symbol, name, price, last_updated FROM stocks WHERE symbol = ?1",
            params![stock.symbol],
            stock_from_row,
        )?;

        debug!("Saved stock {}", saved.symbol);
        Ok(saved)
    }

    fn get_favorites(&self) -> Result<Vec<Favorite>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, symbol FROM favorites ORDER BY id")?;
        let favorites = stmt
            .query_map([], |row| {
                Ok(Favorite {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    fn add_favorite(&self, favorite: NewFavorite) -> Result<Favorite, StorageError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO favorites (symbol) VALUES (?1) ON CONFLICT(symbol) DO NOTHING",
            params![favorite.symbol],
        )?;

        let saved = conn.query_row(
            "SELECT id, symbol FROM favorites WHERE symbol = ?1",
            params![favorite.symbol],
            |row| {
                Ok(Favorite {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                })
            },
        )?;
        Ok(saved)
    }

    fn remove_favorite(&self, symbol: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM favorites WHERE symbol = ?1", params![symbol])?;
        Ok(())
    }

    fn save_prices(&self, symbol: &str, prices: &[PricePoint]) -> Result<usize, StorageError> {
        let mut conn = self.conn()?;
        let now = chrono::Utc::now().timestamp_millis();
        let tx = conn.transaction()?;
        let mut written = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO stock_prices (symbol, date, open, high, low, close, volume, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(symbol, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume",
            )?;

            for price in prices {
                let Some(date) = price_date(price.timestamp) else {
                    continue;
                };
                let volume = i64::try_from(price.volume).map_err(|_| {
                    StorageError::Corrupt(format!("volume {} out of range", price.volume))
                })?;
                stmt.execute(params![
                    symbol,
                    date.format(DATE_FORMAT).to_string(),
                    price.open,
                    price.high,
                    price.low,
                    price.close,
                    volume,
                    now,
                ])?;
                written += 1;
            }
        }

        tx.commit()?;
        debug!("Stored {} price rows for {}", written, symbol);
        Ok(written)
    }

    fn get_prices(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>, StorageError> {
        let conn = self.conn()?;
        debug!("Querying stock prices for {} from {} to {}", symbol, start, end);

        let mut stmt = conn.prepare(
            "SELECT date, open, high, low, close, volume FROM stock_prices
             WHERE symbol = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date",
        )?;
        let prices = stmt
            .query_map(
                params![
                    symbol,
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string(),
                ],
                price_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Found {} records in database", prices.len());
        Ok(prices)
    }

    fn has_stored_data(&self, symbol: &str, date: NaiveDate) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stock_prices WHERE symbol = ?1 AND date = ?2",
            params![symbol, date.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_upsert_keeps_id() {
        let store = SqliteStore::new_in_memory().unwrap();
        let first = store
            .upsert_stock(NewStock {
                symbol: "AAPL".to_string(),
                name: "Apple".to_string(),
                price: 150.0,
                last_updated: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            })
            .unwrap();

        let second = store
            .upsert_stock(NewStock {
                symbol: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                price: 155.5,
                last_updated: DateTime::from_timestamp(1_700_086_400, 0).unwrap(),
            })
            .unwrap();

        assert_eq!(first.id, second.id);
        let loaded = store.get_stock("AAPL").unwrap().unwrap();
        assert_eq!(loaded.name, "Apple Inc.");
        assert_eq!(loaded.price, 155.5);
        assert_eq!(loaded.last_updated.timestamp(), 1_700_086_400);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::new_in_memory().unwrap();
        store.init_schema().unwrap();
        assert!(store.get_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_price_upsert_by_date() {
        let store = SqliteStore::new_in_memory().unwrap();
        let morning = PricePoint {
            timestamp: 1_700_000_000,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 100,
        };
        let evening = PricePoint {
            timestamp: 1_700_000_000 + 3_600,
            close: 1.8,
            ..morning
        };

        assert_eq!(store.save_prices("AAPL", &[morning]).unwrap(), 1);
        assert_eq!(store.save_prices("AAPL", &[evening]).unwrap(), 1);

        let day = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let rows = store.get_prices("AAPL", day, day).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 1.8);
        assert_eq!(rows[0].timestamp, date_timestamp(day));
    }
}
