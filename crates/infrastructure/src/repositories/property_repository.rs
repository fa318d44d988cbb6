use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parcel_application::ports::{PropertyPage, PropertyRepository};
use parcel_domain::{Address, DomainError, ParsedAddress, Property, PropertyDetails};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{error, instrument, warn};

type PropertyRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

const SELECT_COLUMNS: &str = "SELECT id, property_id, street, city, state, zip, normalized_address,
        details, created_at, updated_at
     FROM properties";

pub struct SqlitePropertyRepository {
    pool: SqlitePool,
}

impl SqlitePropertyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_property(row: PropertyRow) -> Result<Property, DomainError> {
        let (id, property_id, street, city, state, zip, normalized, details, created_at, updated_at) =
            row;

        let details: PropertyDetails = serde_json::from_str(&details).map_err(|e| {
            error!(property_id = %property_id, error = %e, "Stored details are not valid JSON");
            DomainError::Serialization(format!("details of {property_id}: {e}"))
        })?;

        Ok(Property {
            id: Some(id),
            property_id,
            address: Address {
                street,
                city,
                state,
                zip,
                normalized,
            },
            details,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }

    async fn fetch_by_rowid(&self, id: i64) -> Result<Property, DomainError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("fetch_by_rowid", e))?
            .ok_or_else(|| DomainError::DatabaseError("Failed to fetch written property".into()))?;

        Self::row_to_property(row)
    }
}

/// Maps driver errors onto the domain taxonomy. Pool exhaustion, I/O and
/// lock contention are transient; everything else is not.
fn classify(operation: &str, e: sqlx::Error) -> DomainError {
    let transient = match &e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => {
            let message = db.message();
            message.contains("database is locked") || message.contains("database is busy")
        }
        _ => false,
    };

    if transient {
        warn!(operation, error = %e, "Transient record store failure");
        DomainError::StoreUnavailable(format!("{operation}: {e}"))
    } else {
        error!(operation, error = %e, "Record store failure");
        DomainError::DatabaseError(format!("{operation}: {e}"))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => {
            db.is_unique_violation() || db.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .ok()
}

fn encode_details(property: &Property) -> Result<String, DomainError> {
    serde_json::to_string(&property.details).map_err(DomainError::from)
}

#[async_trait]
impl PropertyRepository for SqlitePropertyRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, property_id: &str) -> Result<Option<Property>, DomainError> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "{SELECT_COLUMNS} WHERE property_id = ?"
        ))
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify("find_by_id", e))?;

        row.map(Self::row_to_property).transpose()
    }

    #[instrument(skip(self), fields(street = %address.street, city = %address.city))]
    async fn find_by_address(
        &self,
        address: &ParsedAddress,
    ) -> Result<Option<Property>, DomainError> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        query.push(" WHERE street = ").push_bind(address.street.clone());
        query.push(" AND city = ").push_bind(address.city.clone());
        if !address.state.is_empty() {
            query.push(" AND state = ").push_bind(address.state.clone());
        }
        if !address.zip.is_empty() {
            query.push(" AND zip = ").push_bind(address.zip.clone());
        }
        query.push(" ORDER BY updated_at DESC LIMIT 1");

        let row = query
            .build_query_as::<PropertyRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify("find_by_address", e))?;

        row.map(Self::row_to_property).transpose()
    }

    #[instrument(skip(self))]
    async fn find_with_pagination(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<PropertyPage, DomainError> {
        let rows = sqlx::query_as::<_, PropertyRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY street ASC, id ASC LIMIT ? OFFSET ?"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify("find_with_pagination", e))?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify("count", e))?;

        let items = rows
            .into_iter()
            .map(Self::row_to_property)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PropertyPage {
            items,
            total: total.max(0) as u64,
        })
    }

    #[instrument(skip(self, property), fields(property_id = %property.property_id))]
    async fn create(&self, property: &Property) -> Result<Property, DomainError> {
        let details = encode_details(property)?;
        let address = &property.address;

        let result = sqlx::query(
            "INSERT INTO properties (property_id, street, city, state, zip, normalized_address,
                                     details, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&property.property_id)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip)
        .bind(&address.normalized)
        .bind(&details)
        .bind(format_timestamp(property.created_at))
        .bind(format_timestamp(property.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::PropertyConflict(property.property_id.clone())
            } else {
                classify("create", e)
            }
        })?;

        self.fetch_by_rowid(result.last_insert_rowid()).await
    }

    #[instrument(skip(self, property), fields(property_id = %property.property_id))]
    async fn update(&self, property: &Property) -> Result<Property, DomainError> {
        let details = encode_details(property)?;
        let address = &property.address;

        let result = sqlx::query(
            "UPDATE properties
             SET street = ?, city = ?, state = ?, zip = ?, normalized_address = ?,
                 details = ?, updated_at = ?
             WHERE property_id = ?",
        )
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip)
        .bind(&address.normalized)
        .bind(&details)
        .bind(format_timestamp(property.updated_at))
        .bind(&property.property_id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify("update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PropertyNotFound(property.property_id.clone()));
        }

        self.find_by_id(&property.property_id)
            .await?
            .ok_or_else(|| DomainError::PropertyNotFound(property.property_id.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, property_id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM properties WHERE property_id = ?")
            .bind(property_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PropertyNotFound(property_id.to_string()));
        }

        Ok(())
    }
}
