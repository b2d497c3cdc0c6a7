//! Grid search criteria and the query predicates derived from them.

use serde::{Deserialize, Serialize};

use crate::models::{ListingKind, Property};
use crate::sanitize::format_number;

/// The user's current search criteria. Every field is optional and absence
/// means "no constraint". Edits produce a new value; nothing is merged in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilters {
    pub kind: Option<ListingKind>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
}

impl PropertyFilters {
    pub fn with_kind(&self, kind: Option<ListingKind>) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    /// Select a city; an empty selection means "all cities"
    pub fn with_city(&self, city: &str) -> Self {
        Self {
            city: non_empty(city),
            ..self.clone()
        }
    }

    /// Set the title search term; an empty term clears it
    pub fn with_search(&self, term: &str) -> Self {
        Self {
            search: non_empty(term),
            ..self.clone()
        }
    }

    pub fn without_search(&self) -> Self {
        Self {
            search: None,
            ..self.clone()
        }
    }

    /// Set both price bounds from one bucket
    pub fn with_price_bucket(&self, bucket: PriceBucket) -> Self {
        let (min_price, max_price) = bucket.bounds();
        Self {
            min_price,
            max_price,
            ..self.clone()
        }
    }

    /// The bucket matching the current bounds, if any
    pub fn price_bucket(&self) -> Option<PriceBucket> {
        PriceBucket::matching(self.min_price, self.max_price)
    }

    /// Whether the clear-all button applies. The search box has its own
    /// clear control and is not counted.
    pub fn has_active_filters(&self) -> bool {
        self.kind.is_some()
            || self.city.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Exactly one predicate per constraint that is set, ANDed by the service
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(kind) = self.kind {
            predicates.push(Predicate::KindEq(kind));
        }
        if let Some(city) = &self.city {
            predicates.push(Predicate::CityEq(city.clone()));
        }
        if let Some(min) = self.min_price {
            predicates.push(Predicate::PriceAtLeast(min));
        }
        if let Some(max) = self.max_price {
            predicates.push(Predicate::PriceAtMost(max));
        }
        if let Some(term) = &self.search {
            predicates.push(Predicate::TitleContains(term.clone()));
        }
        predicates
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// One constraint of a listing query
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    KindEq(ListingKind),
    CityEq(String),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    /// Case-insensitive substring match on the title
    TitleContains(String),
}

impl Predicate {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Predicate::KindEq(kind) => property.kind == *kind,
            Predicate::CityEq(city) => property.city == *city,
            Predicate::PriceAtLeast(min) => property.price >= *min,
            Predicate::PriceAtMost(max) => property.price <= *max,
            Predicate::TitleContains(term) => property
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
        }
    }

    /// PostgREST filter as a `(column, operator.value)` query pair
    pub fn to_query_pair(&self) -> (&'static str, String) {
        match self {
            Predicate::KindEq(kind) => ("tipo", format!("eq.{}", kind.as_str())),
            Predicate::CityEq(city) => ("cidade", format!("eq.{city}")),
            Predicate::PriceAtLeast(min) => ("valor", format!("gte.{}", format_number(*min))),
            Predicate::PriceAtMost(max) => ("valor", format!("lte.{}", format_number(*max))),
            Predicate::TitleContains(term) => ("titulo", format!("ilike.*{term}*")),
        }
    }
}

/// The closed set of price ranges offered by the price selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceBucket {
    Any,
    UpTo200k,
    From200kTo500k,
    From500kTo1m,
    From1mTo2m,
    Above2m,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 6] = [
        PriceBucket::Any,
        PriceBucket::UpTo200k,
        PriceBucket::From200kTo500k,
        PriceBucket::From500kTo1m,
        PriceBucket::From1mTo2m,
        PriceBucket::Above2m,
    ];

    /// `(min, max)`, both inclusive
    pub fn bounds(self) -> (Option<f64>, Option<f64>) {
        match self {
            PriceBucket::Any => (None, None),
            PriceBucket::UpTo200k => (None, Some(200_000.0)),
            PriceBucket::From200kTo500k => (Some(200_000.0), Some(500_000.0)),
            PriceBucket::From500kTo1m => (Some(500_000.0), Some(1_000_000.0)),
            PriceBucket::From1mTo2m => (Some(1_000_000.0), Some(2_000_000.0)),
            PriceBucket::Above2m => (Some(2_000_000.0), None),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Any => "Qualquer preço",
            PriceBucket::UpTo200k => "Até R$ 200.000",
            PriceBucket::From200kTo500k => "R$ 200.000 - R$ 500.000",
            PriceBucket::From500kTo1m => "R$ 500.000 - R$ 1.000.000",
            PriceBucket::From1mTo2m => "R$ 1.000.000 - R$ 2.000.000",
            PriceBucket::Above2m => "Acima de R$ 2.000.000",
        }
    }

    /// Position in [`PriceBucket::ALL`], used as the `<option>` value
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|bucket| *bucket == self)
            .unwrap_or_default()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn matching(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.bounds() == (min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use proptest::prelude::*;

    #[test]
    fn empty_filters_produce_no_predicates() {
        assert!(PropertyFilters::default().predicates().is_empty());
        assert!(PropertyFilters::default().is_empty());
    }

    #[test]
    fn predicates_mirror_exactly_the_set_fields() {
        let filters = PropertyFilters::default()
            .with_kind(Some(ListingKind::Rent))
            .with_search("Cobertura");
        assert_eq!(
            filters.predicates(),
            vec![
                Predicate::KindEq(ListingKind::Rent),
                Predicate::TitleContains("Cobertura".into()),
            ]
        );

        let filters = PropertyFilters::default()
            .with_city("Niterói")
            .with_price_bucket(PriceBucket::From200kTo500k);
        assert_eq!(
            filters.predicates(),
            vec![
                Predicate::CityEq("Niterói".into()),
                Predicate::PriceAtLeast(200_000.0),
                Predicate::PriceAtMost(500_000.0),
            ]
        );
    }

    #[test]
    fn empty_inputs_clear_constraints() {
        let filters = PropertyFilters::default().with_city("Rio").with_search("casa");
        let cleared = filters.with_city("").with_search("");
        assert_eq!(cleared, PropertyFilters::default());
    }

    #[test]
    fn clear_button_ignores_search() {
        let filters = PropertyFilters::default().with_search("casa");
        assert!(!filters.has_active_filters());
        assert!(filters
            .with_price_bucket(PriceBucket::Above2m)
            .has_active_filters());
    }

    #[test]
    fn query_pairs_use_postgrest_operators() {
        assert_eq!(
            Predicate::KindEq(ListingKind::Sale).to_query_pair(),
            ("tipo", "eq.venda".to_string())
        );
        assert_eq!(
            Predicate::PriceAtLeast(200_000.0).to_query_pair(),
            ("valor", "gte.200000".to_string())
        );
        assert_eq!(
            Predicate::TitleContains("vista mar".into()).to_query_pair(),
            ("titulo", "ilike.*vista mar*".to_string())
        );
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let property = fixtures::property("1", "Casa com Piscina");
        assert!(Predicate::TitleContains("piscina".into()).matches(&property));
        assert!(Predicate::TitleContains("COM".into()).matches(&property));
        assert!(!Predicate::TitleContains("cobertura".into()).matches(&property));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let property = fixtures::property("1", "Apto");
        assert!(Predicate::PriceAtLeast(450_000.0).matches(&property));
        assert!(Predicate::PriceAtMost(450_000.0).matches(&property));
        assert!(!Predicate::PriceAtMost(449_999.0).matches(&property));
    }

    proptest! {
        #[test]
        fn bucket_selection_always_lands_on_a_bucket(
            picks in proptest::collection::vec(0usize..PriceBucket::ALL.len(), 1..20)
        ) {
            let mut filters = PropertyFilters::default();
            for pick in picks {
                let bucket = PriceBucket::from_index(pick).unwrap();
                filters = filters.with_price_bucket(bucket);
                prop_assert_eq!(filters.price_bucket(), Some(bucket));
                prop_assert!(PriceBucket::ALL
                    .iter()
                    .any(|b| b.bounds() == (filters.min_price, filters.max_price)));
            }
        }
    }
}
