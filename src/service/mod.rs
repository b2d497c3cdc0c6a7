pub mod error;
pub mod memory;
pub mod supabase;
pub mod traits;

pub use error::ServiceError;
pub use memory::MemoryService;
pub use supabase::{SupabaseConfig, SupabaseService};
pub use traits::PropertyService;

use serde_json::Value;
use tracing::warn;

use crate::models::Property;

/// Decode raw rows, skipping (and logging) any row that cannot be read
pub(crate) fn decode_rows(rows: Vec<Value>) -> Vec<Property> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Property>(row) {
            Ok(property) => Some(property),
            Err(e) => {
                warn!("Skipping unreadable property row: {}", e);
                None
            }
        })
        .collect()
}

/// Drop empty city names and repeats, keeping the incoming order
pub(crate) fn dedupe_cities<I>(cities: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut distinct: Vec<String> = Vec::new();
    for city in cities {
        let city = city.trim();
        if !city.is_empty() && !distinct.iter().any(|c| c == city) {
            distinct.push(city.to_string());
        }
    }
    distinct
}

#[cfg(test)]
pub(crate) mod testing {
    //! Test doubles for the data service

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::filters::PropertyFilters;

    /// Wraps a [`MemoryService`], records every listing query and can be
    /// switched into a failing mode
    #[derive(Default)]
    pub struct RecordingService {
        inner: MemoryService,
        pub queries: Mutex<Vec<PropertyFilters>>,
        pub lookups: Mutex<Vec<String>>,
        pub city_calls: AtomicUsize,
        failing: Mutex<Option<String>>,
    }

    impl RecordingService {
        pub fn new(rows: Vec<Property>) -> Self {
            Self {
                inner: MemoryService::new(rows),
                ..Default::default()
            }
        }

        pub fn fail_with(&self, message: &str) {
            *self.failing.lock().unwrap() = Some(message.to_string());
        }

        pub fn recover(&self) {
            *self.failing.lock().unwrap() = None;
        }

        pub fn recorded_queries(&self) -> Vec<PropertyFilters> {
            self.queries.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), ServiceError> {
            match self.failing.lock().unwrap().clone() {
                Some(body) => Err(ServiceError::Status { status: 503, body }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl PropertyService for RecordingService {
        async fn list_properties(
            &self,
            filters: &PropertyFilters,
        ) -> Result<Vec<Property>, ServiceError> {
            self.queries.lock().unwrap().push(filters.clone());
            self.check()?;
            self.inner.list_properties(filters).await
        }

        async fn list_distinct_cities(&self) -> Result<Vec<String>, ServiceError> {
            self.city_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.list_distinct_cities().await
        }

        async fn get_property(&self, id: &str) -> Result<Option<Property>, ServiceError> {
            self.lookups.lock().unwrap().push(id.to_string());
            self.check()?;
            self.inner.get_property(id).await
        }

        fn source_name(&self) -> &'static str {
            "Recording"
        }
    }
}
