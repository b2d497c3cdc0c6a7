use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::filters::PropertyFilters;
use crate::models::Property;
use crate::sanitize::display_text;
use crate::service::{decode_rows, dedupe_cities, PropertyService, ServiceError};

const PLACEHOLDER_URL: &str = "YOUR_SUPABASE_URL";
const PLACEHOLDER_KEY: &str = "YOUR_SUPABASE_ANON_KEY";

/// Connection settings for the hosted property table
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public anon key sent as `apikey` and bearer token
    pub anon_key: String,
    /// Table holding the listings
    pub table: String,
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
            && self.url != PLACEHOLDER_URL
            && !self.anon_key.trim().is_empty()
            && self.anon_key != PLACEHOLDER_KEY
    }
}

/// [`PropertyService`] backed by the Supabase REST (PostgREST) endpoint
pub struct SupabaseService {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseService {
    pub fn new(config: SupabaseConfig) -> Result<Self, ServiceError> {
        if !config.is_configured() {
            warn!("Supabase is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY.");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    /// Query string for a listing request: every row, newest first with
    /// undated rows last, plus one filter per active constraint
    pub fn listing_query(filters: &PropertyFilters) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc.nullslast".to_string()),
        ];
        query.extend(filters.predicates().iter().map(|p| p.to_query_pair()));
        query
    }

    pub fn cities_query() -> Vec<(&'static str, String)> {
        vec![
            ("select", "cidade".to_string()),
            ("order", "cidade.asc".to_string()),
        ]
    }

    pub fn lookup_query(id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("select", "*".to_string()),
            ("id", format!("eq.{id}")),
            ("limit", "1".to_string()),
        ]
    }

    async fn fetch_rows(&self, query: &[(&'static str, String)]) -> Result<Vec<Value>, ServiceError> {
        if !self.config.is_configured() {
            return Err(ServiceError::NotConfigured);
        }

        let url = self.endpoint();
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Supabase returned status: {}", status);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        debug!("Downloaded {} bytes", body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PropertyService for SupabaseService {
    async fn list_properties(
        &self,
        filters: &PropertyFilters,
    ) -> Result<Vec<Property>, ServiceError> {
        let rows = self.fetch_rows(&Self::listing_query(filters)).await?;
        let properties = decode_rows(rows);
        info!("Fetched {} properties from {}", properties.len(), self.config.table);
        Ok(properties)
    }

    async fn list_distinct_cities(&self) -> Result<Vec<String>, ServiceError> {
        let rows = self.fetch_rows(&Self::cities_query()).await?;
        Ok(dedupe_cities(rows.iter().filter_map(|row| {
            row.get("cidade").and_then(display_text)
        })))
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>, ServiceError> {
        let rows = self.fetch_rows(&Self::lookup_query(id)).await?;
        Ok(decode_rows(rows).into_iter().next())
    }

    fn source_name(&self) -> &'static str {
        "Supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PriceBucket;
    use crate::models::ListingKind;

    fn config(url: &str, key: &str) -> SupabaseConfig {
        SupabaseConfig {
            url: url.into(),
            anon_key: key.into(),
            table: "imoveis".into(),
        }
    }

    #[test]
    fn unconstrained_listing_has_only_select_and_order() {
        let query = SupabaseService::listing_query(&PropertyFilters::default());
        assert_eq!(
            query,
            vec![
                ("select", "*".to_string()),
                ("order", "created_at.desc.nullslast".to_string()),
            ]
        );
    }

    #[test]
    fn listing_query_carries_each_active_filter() {
        let filters = PropertyFilters::default()
            .with_kind(Some(ListingKind::Sale))
            .with_city("Rio de Janeiro")
            .with_price_bucket(PriceBucket::Above2m)
            .with_search("cobertura");
        let query = SupabaseService::listing_query(&filters);

        assert_eq!(&query[2..], &[
            ("tipo", "eq.venda".to_string()),
            ("cidade", "eq.Rio de Janeiro".to_string()),
            ("valor", "gte.2000000".to_string()),
            ("titulo", "ilike.*cobertura*".to_string()),
        ]);
    }

    #[test]
    fn lookup_is_a_single_row_by_key() {
        assert_eq!(
            SupabaseService::lookup_query("42"),
            vec![
                ("select", "*".to_string()),
                ("id", "eq.42".to_string()),
                ("limit", "1".to_string()),
            ]
        );
    }

    #[test]
    fn placeholder_credentials_are_not_configured() {
        assert!(!config(PLACEHOLDER_URL, PLACEHOLDER_KEY).is_configured());
        assert!(!config("https://x.supabase.co", "").is_configured());
        assert!(config("https://x.supabase.co", "anon").is_configured());
    }

    #[tokio::test]
    async fn unconfigured_service_fails_without_a_request() {
        let service = SupabaseService::new(config("", "")).unwrap();
        let result = service.list_properties(&PropertyFilters::default()).await;
        assert!(matches!(result, Err(ServiceError::NotConfigured)));
    }

    #[test]
    fn endpoint_joins_url_and_table() {
        let service = SupabaseService::new(config("https://x.supabase.co/", "k")).unwrap();
        assert_eq!(service.endpoint(), "https://x.supabase.co/rest/v1/imoveis");
    }
}
