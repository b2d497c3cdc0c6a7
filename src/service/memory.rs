use std::cmp::Reverse;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::filters::PropertyFilters;
use crate::models::Property;
use crate::service::{decode_rows, dedupe_cities, PropertyService, ServiceError};

/// In-process property table with the same query semantics as the hosted one.
/// Used for offline rendering from a JSON fixture and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryService {
    rows: Vec<Property>,
}

impl MemoryService {
    pub fn new(rows: Vec<Property>) -> Self {
        Self { rows }
    }

    /// Load from a JSON array of table rows; unreadable rows are skipped
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        let rows: Vec<Value> = serde_json::from_str(json)?;
        let properties = decode_rows(rows);
        info!("Loaded {} fixture properties", properties.len());
        Ok(Self::new(properties))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl PropertyService for MemoryService {
    async fn list_properties(
        &self,
        filters: &PropertyFilters,
    ) -> Result<Vec<Property>, ServiceError> {
        let predicates = filters.predicates();
        let mut matches: Vec<Property> = self
            .rows
            .iter()
            .filter(|property| predicates.iter().all(|p| p.matches(property)))
            .cloned()
            .collect();

        // Newest first; undated rows sort last
        matches.sort_by_key(|property| Reverse(property.created_at));
        Ok(matches)
    }

    async fn list_distinct_cities(&self) -> Result<Vec<String>, ServiceError> {
        let mut cities: Vec<String> = self.rows.iter().map(|p| p.city.clone()).collect();
        cities.sort();
        Ok(dedupe_cities(cities))
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>, ServiceError> {
        Ok(self.rows.iter().find(|p| p.id == id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::PriceBucket;
    use crate::models::ListingKind;

    const ROWS: &str = r#"[
        {"id": "1", "titulo": "Casa na Serra", "tipo": "venda", "cidade": "Petrópolis",
         "valor": 950000, "created_at": "2024-01-10T00:00:00Z"},
        {"id": "2", "titulo": "Apartamento Copacabana", "tipo": "aluguel", "cidade": "Rio de Janeiro",
         "valor": 4500, "created_at": "2024-03-01T00:00:00Z"},
        {"id": "3", "titulo": "Cobertura Icaraí", "tipo": "venda", "cidade": "Niterói",
         "valor": 2400000, "created_at": "2024-02-15T00:00:00Z"},
        {"id": "4", "titulo": "Sala comercial", "tipo": "venda", "cidade": "Rio de Janeiro",
         "valor": 180000},
        {"id": "5", "titulo": "Terreno", "tipo": "venda", "cidade": "", "valor": 90000}
    ]"#;

    fn service() -> MemoryService {
        MemoryService::from_json(ROWS).unwrap()
    }

    fn ids(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn unfiltered_listing_is_newest_first() {
        let all = service().list_properties(&PropertyFilters::default()).await.unwrap();
        assert_eq!(ids(&all), vec!["2", "3", "1", "4", "5"]);
    }

    #[tokio::test]
    async fn filters_are_anded() {
        let filters = PropertyFilters::default()
            .with_kind(Some(ListingKind::Sale))
            .with_city("Rio de Janeiro")
            .with_price_bucket(PriceBucket::UpTo200k);
        let found = service().list_properties(&filters).await.unwrap();
        assert_eq!(ids(&found), vec!["4"]);

        let filters = PropertyFilters::default().with_search("COBERTURA");
        let found = service().list_properties(&filters).await.unwrap();
        assert_eq!(ids(&found), vec!["3"]);
    }

    #[tokio::test]
    async fn cities_are_sorted_distinct_and_non_empty() {
        let cities = service().list_distinct_cities().await.unwrap();
        assert_eq!(cities, vec!["Niterói", "Petrópolis", "Rio de Janeiro"]);
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let service = service();
        assert_eq!(service.get_property("3").await.unwrap().unwrap().title, "Cobertura Icaraí");
        assert!(service.get_property("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn demo_fixture_decodes_completely() {
        let service = MemoryService::from_json(include_str!("../../demos/fixture.json")).unwrap();
        assert_eq!(service.len(), 3);
        assert!(!service.is_empty());
        assert!(MemoryService::from_json("[]").unwrap().is_empty());

        let listed = service
            .list_properties(&PropertyFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "42", "13"]);
    }
}
