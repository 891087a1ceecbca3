//! SQLite instrument store implementation.
//!
//! Implements `InstrumentStore` from `stockbook-core` using sqlx with split
//! read/write pools. Monetary columns are TEXT holding a fixed 2-decimal
//! value, so reads return exactly what was written.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use stockbook_core::store::instrument::{InstrumentFilter, InstrumentStore};
use stockbook_types::annotation::Annotation;
use stockbook_types::error::StoreError;
use stockbook_types::instrument::{Instrument, InstrumentFields, InstrumentId};

use super::annotation::row_to_annotation;
use super::map_store_err;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `InstrumentStore`.
pub struct SqliteInstrumentStore {
    pool: DatabasePool,
}

impl SqliteInstrumentStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Fetch annotations for a set of instruments in one query, grouped by
    /// instrument id. No ORDER BY: callers get no ordering guarantee.
    async fn annotations_for(
        &self,
        ids: &[InstrumentId],
    ) -> Result<HashMap<i64, Vec<Annotation>>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM annotations WHERE instrument_id IN ({placeholders})");

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id.0);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_store_err)?;

        let mut grouped: HashMap<i64, Vec<Annotation>> = HashMap::new();
        for row in &rows {
            let annotation = row_to_annotation(row)?;
            if let Some(instrument_id) = annotation.instrument_id {
                grouped.entry(instrument_id.0).or_default().push(annotation);
            }
        }
        Ok(grouped)
    }
}

/// Internal row type for mapping SQLite rows to the domain Instrument.
struct InstrumentRow {
    id: i64,
    symbol: String,
    company_name: String,
    purchase_price: String,
    last_dividend: String,
    industry: String,
    market_cap: i64,
}

impl InstrumentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            symbol: row.try_get("symbol")?,
            company_name: row.try_get("company_name")?,
            purchase_price: row.try_get("purchase_price")?,
            last_dividend: row.try_get("last_dividend")?,
            industry: row.try_get("industry")?,
            market_cap: row.try_get("market_cap")?,
        })
    }

    fn into_instrument(self) -> Result<Instrument, StoreError> {
        Ok(Instrument {
            id: InstrumentId(self.id),
            symbol: self.symbol,
            company_name: self.company_name,
            purchase_price: parse_decimal(&self.purchase_price)?,
            last_dividend: parse_decimal(&self.last_dividend)?,
            industry: self.industry,
            market_cap: self.market_cap,
            annotations: Vec::new(),
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(s).map_err(|e| StoreError::Query(format!("invalid decimal: {e}")))
}

fn format_decimal(value: &Decimal) -> String {
    value.to_string()
}

impl InstrumentStore for SqliteInstrumentStore {
    async fn insert(&self, fields: &InstrumentFields) -> Result<Instrument, StoreError> {
        let result = sqlx::query(
            "INSERT INTO instruments (symbol, company_name, purchase_price, last_dividend, industry, market_cap)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&fields.symbol)
        .bind(&fields.company_name)
        .bind(format_decimal(&fields.purchase_price))
        .bind(format_decimal(&fields.last_dividend))
        .bind(&fields.industry)
        .bind(fields.market_cap)
        .execute(&self.pool.writer)
        .await
        .map_err(map_store_err)?;

        Ok(Instrument {
            id: InstrumentId(result.last_insert_rowid()),
            symbol: fields.symbol.clone(),
            company_name: fields.company_name.clone(),
            purchase_price: fields.purchase_price,
            last_dividend: fields.last_dividend,
            industry: fields.industry.clone(),
            market_cap: fields.market_cap,
            annotations: Vec::new(),
        })
    }

    async fn find_by_id(
        &self,
        id: InstrumentId,
        include_annotations: bool,
    ) -> Result<Option<Instrument>, StoreError> {
        let row = sqlx::query("SELECT * FROM instruments WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_store_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record = InstrumentRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
        let mut instrument = record.into_instrument()?;

        if include_annotations {
            instrument.annotations = self
                .annotations_for(&[id])
                .await?
                .remove(&id.0)
                .unwrap_or_default();
        }

        Ok(Some(instrument))
    }

    async fn find_all(
        &self,
        filter: &InstrumentFilter,
        include_annotations: bool,
    ) -> Result<Vec<Instrument>, StoreError> {
        // instr() is case-sensitive containment; LIKE would fold ASCII
        // case. Blank patterns (empty or whitespace-only) impose no
        // constraint, same as unset.
        let mut sql = String::from("SELECT * FROM instruments");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<&str> = Vec::new();

        if let Some(symbol) = filter.symbol.as_deref().filter(|s| !s.trim().is_empty()) {
            conditions.push("instr(symbol, ?) > 0");
            binds.push(symbol);
        }
        if let Some(company_name) = filter
            .company_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            conditions.push("instr(company_name, ?) > 0");
            binds.push(company_name);
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_store_err)?;

        let mut instruments = Vec::with_capacity(rows.len());
        for row in &rows {
            let record =
                InstrumentRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            instruments.push(record.into_instrument()?);
        }

        if include_annotations && !instruments.is_empty() {
            let ids: Vec<InstrumentId> = instruments.iter().map(|i| i.id).collect();
            let mut grouped = self.annotations_for(&ids).await?;
            for instrument in &mut instruments {
                if let Some(annotations) = grouped.remove(&instrument.id.0) {
                    instrument.annotations = annotations;
                }
            }
        }

        Ok(instruments)
    }

    async fn update(
        &self,
        id: InstrumentId,
        fields: &InstrumentFields,
    ) -> Result<Option<Instrument>, StoreError> {
        // Single conditional write: locate and replace in one statement so
        // a concurrent reader sees either the old or the new field set.
        let result = sqlx::query(
            "UPDATE instruments SET symbol = ?, company_name = ?, purchase_price = ?, last_dividend = ?, industry = ?, market_cap = ?
             WHERE id = ?",
        )
        .bind(&fields.symbol)
        .bind(&fields.company_name)
        .bind(format_decimal(&fields.purchase_price))
        .bind(format_decimal(&fields.last_dividend))
        .bind(&fields.industry)
        .bind(fields.market_cap)
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(Instrument {
            id,
            symbol: fields.symbol.clone(),
            company_name: fields.company_name.clone(),
            purchase_price: fields.purchase_price,
            last_dividend: fields.last_dividend,
            industry: fields.industry.clone(),
            market_cap: fields.market_cap,
            annotations: Vec::new(),
        }))
    }

    async fn delete(&self, id: InstrumentId) -> Result<Option<Instrument>, StoreError> {
        // Snapshot and delete both run on the single-connection writer
        // pool, which serializes them against concurrent mutations.
        // Annotations referencing the id are left untouched.
        let row = sqlx::query("SELECT * FROM instruments WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let snapshot =
            InstrumentRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;

        let result = sqlx::query("DELETE FROM instruments WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(map_store_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(snapshot.into_instrument()?))
    }

    async fn exists(&self, id: InstrumentId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM instruments WHERE id = ?)")
                .bind(id.0)
                .fetch_one(&self.pool.reader)
                .await
                .map_err(map_store_err)?;
        Ok(exists)
    }
}
