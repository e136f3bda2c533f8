use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest known quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub last_updated: DateTime<Utc>,
}

/// Stock payload accepted from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStock {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub last_updated: DateTime<Utc>,
}

impl NewStock {
    /// Check the payload, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !self.price.is_finite() {
            return Err("price must be a finite number".to_string());
        }
        Ok(())
    }

    pub fn into_stock(self, id: i64) -> Stock {
        Stock {
            id,
            symbol: self.symbol,
            name: self.name,
            price: self.price,
            last_updated: self.last_updated,
        }
    }
}

/// A symbol on the user's watch list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub symbol: String,
}

impl NewFavorite {
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        Ok(())
    }
}

/// Symbol search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
}
