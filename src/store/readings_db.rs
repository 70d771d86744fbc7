//! SQLite persistence for processed readings.
//!
//! One flat `climate` table with no uniqueness constraint: repeated
//! fetch-and-store runs for the same station and day append duplicate rows.
//! Callers that want idempotent re-ingestion clear the day first with
//! [`ReadingStore::delete_day`].

use crate::store::error::StoreError;
use crate::types::period::{first_day_of_next_month, Month};
use chrono::{NaiveDate, NaiveTime};
use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

const CREATE_CLIMATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS climate (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT,
        time TEXT,
        temperature REAL,
        humidity REAL,
        gdd REAL,
        city TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
";

/// One persisted reading, matching the `climate` table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRow {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub gdd: Option<f64>,
    pub city: String,
}

/// Connection pool over the readings database.
pub struct ReadingStore {
    pool: SqlitePool,
}

impl ReadingStore {
    /// Opens (creating if needed) the database file at `path` and ensures
    /// the `climate` table exists.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let url = format!("sqlite://{}?mode=rwc", path.display());
        info!("opening readings database at {}", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|e| StoreError::Open(path.to_path_buf(), e))?;
        sqlx::query(CREATE_CLIMATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Opens a private in-memory database. Useful for tests and scratch
    /// imports; the single connection keeps the data alive.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        sqlx::query(CREATE_CLIMATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Appends rows into the `climate` table inside a single transaction,
    /// returning the number of rows written. Duplicates are not detected.
    pub async fn insert_readings(&self, rows: &[ClimateRow]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for row in rows {
            written += sqlx::query(
                "INSERT INTO climate (date, time, temperature, humidity, gdd, city)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(row.date.format("%Y-%m-%d").to_string())
            .bind(row.time.format("%H:%M").to_string())
            .bind(row.temperature)
            .bind(row.humidity)
            .bind(row.gdd)
            .bind(&row.city)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// All readings of `city` on `date`, ordered by time.
    pub async fn readings_for_day(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<ClimateRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT date, time, temperature, humidity, gdd, city
             FROM climate
             WHERE date = $1 AND city = $2
             ORDER BY time ASC",
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .bind(city)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_row).collect()
    }

    /// All readings of `city` within `month`, ordered by date then time.
    /// The window is half-open: from the first day of the month up to but
    /// excluding the first day of the next month.
    pub async fn readings_for_month(
        &self,
        city: &str,
        month: Month,
    ) -> Result<Vec<ClimateRow>, StoreError> {
        let start = format!("{:04}-{:02}-01", month.year(), month.month());
        let end = match first_day_of_next_month(month) {
            Some(next) => next.format("%Y-%m-%d").to_string(),
            None => return Ok(Vec::new()),
        };
        let rows = sqlx::query(
            "SELECT date, time, temperature, humidity, gdd, city
             FROM climate
             WHERE city = $1 AND date >= $2 AND date < $3
             ORDER BY date ASC, time ASC",
        )
        .bind(city)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_row).collect()
    }

    /// Deletes all readings of `city` on `date`, returning the number of
    /// rows removed. Lets callers re-ingest a day without piling up
    /// duplicates.
    pub async fn delete_day(&self, city: &str, date: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM climate WHERE date = $1 AND city = $2")
            .bind(date.format("%Y-%m-%d").to_string())
            .bind(city)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<ClimateRow, StoreError> {
    let date_str: String = row.try_get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        StoreError::MalformedRow {
            column: "date".to_string(),
            value: date_str.clone(),
        }
    })?;
    let time_str: String = row.try_get("time")?;
    let time =
        NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| StoreError::MalformedRow {
            column: "time".to_string(),
            value: time_str.clone(),
        })?;
    Ok(ClimateRow {
        date,
        time,
        temperature: row.try_get("temperature")?,
        humidity: row.try_get("humidity")?,
        gdd: row.try_get("gdd")?,
        city: row.try_get("city")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, hour: u32, city: &str) -> ClimateRow {
        ClimateRow {
            date: NaiveDate::from_ymd_opt(2023, 7, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            temperature: Some(20.5),
            humidity: Some(60.0),
            gdd: Some(5.25),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn inserts_and_reads_back_a_day() {
        let store = ReadingStore::open_in_memory().await.unwrap();
        let written = store
            .insert_readings(&[row(1, 12, "PARIS"), row(1, 6, "PARIS"), row(2, 6, "PARIS")])
            .await
            .unwrap();
        assert_eq!(written, 3);

        let day = store
            .readings_for_day("PARIS", NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(day.len(), 2);
        // Ordered by time, not insertion.
        assert_eq!(day[0].time, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(day[0].temperature, Some(20.5));
        assert_eq!(day[0].gdd, Some(5.25));
    }

    #[tokio::test]
    async fn duplicate_rows_are_kept() {
        let store = ReadingStore::open_in_memory().await.unwrap();
        store
            .insert_readings(&[row(1, 6, "PARIS"), row(1, 6, "PARIS")])
            .await
            .unwrap();

        let day = store
            .readings_for_day("PARIS", NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(day.len(), 2);
    }

    #[tokio::test]
    async fn month_window_is_half_open() {
        let store = ReadingStore::open_in_memory().await.unwrap();
        store
            .insert_readings(&[
                row(1, 6, "PARIS"),
                row(31, 23, "PARIS"),
                ClimateRow {
                    date: NaiveDate::from_ymd_opt(2023, 8, 1).unwrap(),
                    ..row(1, 0, "PARIS")
                },
                row(15, 12, "LYON"),
            ])
            .await
            .unwrap();

        let july = store
            .readings_for_month("PARIS", Month::new(7, 2023))
            .await
            .unwrap();
        assert_eq!(july.len(), 2);
        assert!(july.iter().all(|r| r.date.to_string().starts_with("2023-07")));
    }

    #[tokio::test]
    async fn delete_day_only_touches_that_city_and_date() {
        let store = ReadingStore::open_in_memory().await.unwrap();
        store
            .insert_readings(&[row(1, 6, "PARIS"), row(1, 6, "LYON"), row(2, 6, "PARIS")])
            .await
            .unwrap();

        let removed = store
            .delete_day("PARIS", NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let lyon = store
            .readings_for_day("LYON", NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(lyon.len(), 1);
    }

    #[tokio::test]
    async fn null_measurements_round_trip() {
        let store = ReadingStore::open_in_memory().await.unwrap();
        let mut sparse = row(1, 6, "PARIS");
        sparse.temperature = None;
        sparse.gdd = None;
        store.insert_readings(&[sparse.clone()]).await.unwrap();

        let day = store
            .readings_for_day("PARIS", NaiveDate::from_ymd_opt(2023, 7, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(day[0], sparse);
    }
}
