use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::filters::{PriceBucket, PropertyFilters};
use crate::models::{ListingKind, Property};
use crate::navigation::{Navigation, Navigator};
use crate::service::{PropertyService, ServiceError};
use crate::views::card::PropertyCard;
use crate::views::html::{error_panel, escape};

const SKELETON_CARDS: usize = 6;

/// What the grid currently shows below the filter bar
#[derive(Debug, Clone)]
pub enum GridPhase {
    Loading,
    Failed(String),
    Loaded(Vec<Property>),
}

/// A listing request that has been issued but not applied yet.
///
/// Tickets are numbered in issue order. Only the response to the most
/// recently issued ticket is applied; older responses are dropped no matter
/// when they arrive.
#[derive(Debug, Clone)]
pub struct ListingTicket {
    seq: u64,
    filters: PropertyFilters,
}

impl ListingTicket {
    /// Run the query. Does not touch the view, so it can be spawned.
    pub async fn fetch(self, service: &dyn PropertyService) -> ListingResponse {
        debug!("Listing request #{} with {:?}", self.seq, self.filters);
        let result = service.list_properties(&self.filters).await;
        ListingResponse {
            seq: self.seq,
            result,
        }
    }
}

/// Outcome of a [`ListingTicket`]
#[derive(Debug)]
pub struct ListingResponse {
    seq: u64,
    result: Result<Vec<Property>, ServiceError>,
}

/// Filterable property grid.
///
/// Holds one [`PropertyFilters`] value and the distinct city list. The city
/// list comes from the whole table and does not follow the active filters.
pub struct GridView {
    service: Arc<dyn PropertyService>,
    navigator: Navigator,
    filters: PropertyFilters,
    cities: Vec<String>,
    phase: GridPhase,
    issued: u64,
}

impl GridView {
    pub fn new(service: Arc<dyn PropertyService>, navigator: Navigator) -> Self {
        Self {
            service,
            navigator,
            filters: PropertyFilters::default(),
            cities: Vec::new(),
            phase: GridPhase::Loading,
            issued: 0,
        }
    }

    pub fn service(&self) -> Arc<dyn PropertyService> {
        Arc::clone(&self.service)
    }

    pub fn filters(&self) -> &PropertyFilters {
        &self.filters
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn phase(&self) -> &GridPhase {
        &self.phase
    }

    /// Initial load: the city list and the unfiltered listing, concurrently
    pub async fn mount(&mut self) {
        info!("Mounting property grid ({})", self.service.source_name());
        self.load_all().await;
    }

    async fn load_all(&mut self) {
        let ticket = self.begin_listing();
        let service = self.service();
        let (cities, response) = tokio::join!(
            service.list_distinct_cities(),
            ticket.fetch(service.as_ref())
        );
        self.apply_cities(cities);
        self.finish_listing(response);
    }

    fn apply_cities(&mut self, cities: Result<Vec<String>, ServiceError>) {
        match cities {
            Ok(cities) => self.cities = cities,
            Err(e) => error!("Error fetching cities: {}", e),
        }
    }

    /// Issue a listing request for the current filters and enter loading
    pub fn begin_listing(&mut self) -> ListingTicket {
        self.issued += 1;
        self.phase = GridPhase::Loading;
        ListingTicket {
            seq: self.issued,
            filters: self.filters.clone(),
        }
    }

    /// Apply a response. Returns `false` when it was stale and dropped.
    pub fn finish_listing(&mut self, response: ListingResponse) -> bool {
        if response.seq != self.issued {
            warn!(
                "Discarding stale listing response #{} (latest is #{})",
                response.seq, self.issued
            );
            return false;
        }

        self.phase = match response.result {
            Ok(properties) => {
                info!("Showing {} properties", properties.len());
                GridPhase::Loaded(properties)
            }
            Err(e) => {
                error!("Error fetching properties: {}", e);
                GridPhase::Failed(e.to_string())
            }
        };
        true
    }

    /// Fetch for the current filters and apply the result
    pub async fn refresh(&mut self) {
        let ticket = self.begin_listing();
        let service = self.service();
        let response = ticket.fetch(service.as_ref()).await;
        self.finish_listing(response);
    }

    /// Replace the filters wholesale; a change triggers a new fetch
    pub async fn apply_filters(&mut self, filters: PropertyFilters) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        self.refresh().await;
    }

    pub async fn set_kind(&mut self, kind: Option<ListingKind>) {
        let filters = self.filters.with_kind(kind);
        self.apply_filters(filters).await;
    }

    pub async fn set_city(&mut self, city: &str) {
        let filters = self.filters.with_city(city);
        self.apply_filters(filters).await;
    }

    pub async fn set_search(&mut self, term: &str) {
        let filters = self.filters.with_search(term);
        self.apply_filters(filters).await;
    }

    pub async fn clear_search(&mut self) {
        let filters = self.filters.without_search();
        self.apply_filters(filters).await;
    }

    pub async fn select_price_bucket(&mut self, bucket: PriceBucket) {
        let filters = self.filters.with_price_bucket(bucket);
        self.apply_filters(filters).await;
    }

    /// Reset to the empty filter set in one step
    pub async fn clear_filters(&mut self) {
        self.apply_filters(PropertyFilters::default()).await;
    }

    /// Manual retry from the error state. The city list is fetched again
    /// too when the earlier attempt left it empty.
    pub async fn retry(&mut self) {
        info!("Retrying property listing");
        if self.cities.is_empty() {
            self.load_all().await;
        } else {
            self.refresh().await;
        }
    }

    /// "Ver detalhes" on a card currently in the grid
    pub fn open_property(&self, id: &str) -> Option<Navigation> {
        match &self.phase {
            GridPhase::Loaded(properties) => properties
                .iter()
                .find(|p| p.id == id)
                .map(|p| PropertyCard::new(p).open(&self.navigator)),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        let body = match &self.phase {
            GridPhase::Failed(message) => {
                return format!(
                    r#"<div class="main-container">{}</div>"#,
                    error_panel(
                        "Erro ao carregar imóveis",
                        message,
                        r#"<button class="btn-primary" data-action="retry">Tentar novamente</button>"#,
                    )
                );
            }
            GridPhase::Loading => {
                let card = r#"<div class="skeleton-card"><div class="skeleton skeleton-image"></div><div class="skeleton skeleton-line"></div><div class="skeleton skeleton-line short"></div></div>"#;
                format!(
                    r#"<div class="property-grid loading" aria-busy="true">{}</div>"#,
                    card.repeat(SKELETON_CARDS)
                )
            }
            GridPhase::Loaded(properties) if properties.is_empty() => {
                r#"<div class="empty-state"><h3>Nenhum imóvel encontrado</h3><p>Não encontramos imóveis com os filtros selecionados. Tente ajustar os critérios de busca.</p><button data-action="clear-filters">Limpar filtros</button></div>"#
                    .to_string()
            }
            GridPhase::Loaded(properties) => {
                let noun = if properties.len() == 1 {
                    "imóvel encontrado"
                } else {
                    "imóveis encontrados"
                };
                let cards: String = properties
                    .iter()
                    .map(|p| PropertyCard::new(p).render(&self.navigator))
                    .collect();
                format!(
                    r#"<p class="result-count">{} {}</p><div class="property-grid">{}</div>"#,
                    properties.len(),
                    noun,
                    cards
                )
            }
        };

        format!(
            r#"<div class="main-container">{}{}</div>"#,
            self.render_filter_bar(),
            body
        )
    }

    fn render_filter_bar(&self) -> String {
        let filters = &self.filters;

        let search = filters.search.as_deref().unwrap_or("");
        let clear_search = if filters.search.is_some() {
            r#"<button type="button" data-action="clear-search">Limpar</button>"#
        } else {
            ""
        };

        let mut kinds = option("", "Todos os tipos", filters.kind.is_none());
        for kind in ListingKind::ALL {
            kinds.push_str(&option(kind.as_str(), kind.label(), filters.kind == Some(kind)));
        }

        let mut cities = option("", "Todas as cidades", filters.city.is_none());
        for city in &self.cities {
            cities.push_str(&option(city, city, filters.city.as_deref() == Some(city.as_str())));
        }

        let current_bucket = filters.price_bucket();
        let mut prices = String::new();
        for bucket in PriceBucket::ALL {
            prices.push_str(&option(
                &bucket.index().to_string(),
                bucket.label(),
                current_bucket == Some(bucket),
            ));
        }

        let clear_all = if filters.has_active_filters() {
            r#"<button type="button" data-action="clear-filters">Limpar</button>"#
        } else {
            ""
        };

        format!(
            r#"<div class="filter-bar"><div class="filter-search"><input type="text" name="busca" value="{search}" placeholder="Buscar imóveis..."/>{clear_search}</div><select name="tipo" class="filter-select">{kinds}</select><select name="cidade" class="filter-select">{cities}</select><select name="preco" class="filter-select">{prices}</select>{clear_all}</div>"#,
            search = escape(search),
        )
    }
}

fn option(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}
