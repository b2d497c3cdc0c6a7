use async_trait::async_trait;

use crate::filters::PropertyFilters;
use crate::models::Property;
use crate::service::ServiceError;

/// The three reads the widget needs from the property table.
///
/// Views receive an implementation at construction time, so the hosted
/// Supabase table and the in-memory table are interchangeable.
#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Rows matching every constraint in `filters`, newest first
    async fn list_properties(&self, filters: &PropertyFilters)
        -> Result<Vec<Property>, ServiceError>;

    /// Non-empty city names across the whole table, ascending, no repeats
    async fn list_distinct_cities(&self) -> Result<Vec<String>, ServiceError>;

    /// Single row by primary key; `Ok(None)` when it does not exist
    async fn get_property(&self, id: &str) -> Result<Option<Property>, ServiceError>;

    /// Get the name of the backing source
    fn source_name(&self) -> &'static str;
}
