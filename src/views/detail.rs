use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};
use url::Url;

use crate::models::{positive, Property};
use crate::navigation::{Navigation, Navigator, LISTING_PATH};
use crate::sanitize::{display_text, format_number, has_content};
use crate::service::PropertyService;
use crate::views::card::format_price;
use crate::views::gallery::{GalleryEvent, GalleryState};
use crate::views::html::{error_panel, escape, label_row};
use crate::views::icons::Icon;

/// Shown in the gallery when a listing has no image at all
pub const DETAIL_PLACEHOLDER: &str = "https://placehold.co/800x600/e2e8f0/64748b?text=Sem+Imagem";

pub const MISSING_ID: &str = "ID do imóvel não fornecido";
pub const NOT_FOUND: &str = "O imóvel que você está procurando não existe ou foi removido.";
const NO_DESCRIPTION: &str = "Descrição não disponível para este imóvel.";
const NO_LOCATION: &str = "Informações de localização não disponíveis.";

/// Load state of the detail page. Fetch failures, unknown ids and a missing
/// id all end in `Failed`.
#[derive(Debug, Clone)]
pub enum DetailPhase {
    Loading,
    Failed(String),
    Loaded(Box<Property>),
}

/// Info section below the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Description,
    Location,
    Summary,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Description, DetailTab::Location, DetailTab::Summary];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Description => "Descrição",
            DetailTab::Location => "Localização",
            DetailTab::Summary => "Resumo",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            DetailTab::Description => "descricao",
            DetailTab::Location => "localizacao",
            DetailTab::Summary => "resumo",
        }
    }
}

/// Images for the gallery, or the placeholder when there are none
pub fn displayed_images(property: &Property) -> Vec<String> {
    let images = property.image_sequence();
    if images.is_empty() {
        vec![DETAIL_PLACEHOLDER.to_string()]
    } else {
        images
    }
}

/// Description, then the "about" text, then a fixed message
pub fn description_text(property: &Property) -> String {
    display_text(&property.description)
        .or_else(|| display_text(&property.about))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

/// Rows of the location tab, or `None` when there is nothing to show
pub fn location_rows(property: &Property) -> Option<Vec<(String, String)>> {
    let mut rows = Vec::new();

    if let Some(street) = property.street_text() {
        rows.push(("Endereço".to_string(), street));
    }
    if let Some(neighborhood) = property.neighborhood_text() {
        rows.push(("Bairro".to_string(), neighborhood));
    }
    if let Some(city) = display_text(&Value::from(property.city.as_str())) {
        let line = match property.state_text() {
            Some(state) => format!("{city} - {state}"),
            None => city,
        };
        rows.push(("Cidade".to_string(), line));
    }

    if has_content(&property.location) {
        match &property.location {
            Value::Object(entries) => {
                for (key, value) in entries {
                    if let Some(text) = display_text(value) {
                        rows.push((capitalize_words(key), text));
                    }
                }
            }
            Value::String(_) => {
                if let Some(text) = display_text(&property.location) {
                    rows.push(("Localização".to_string(), text));
                }
            }
            _ => {}
        }
    }

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

fn capitalize_words(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Positive numeric attributes in display order
pub fn summary_items(property: &Property) -> Vec<(&'static str, String)> {
    let area = |v: f64| format!("{}m²", format_number(v));

    [
        ("Área Útil", positive(property.usable_area).map(area)),
        ("Área Total", positive(property.total_area).map(area)),
        ("Dormitórios", positive(property.bedrooms).map(format_number)),
        ("Suítes", positive(property.suites).map(format_number)),
        ("Banheiros", positive(property.bathrooms).map(format_number)),
        ("Vagas Garagem", property.parking().map(format_number)),
        ("Pavimentos", positive(property.floors).map(format_number)),
        ("Ano Construção", positive(property.construction_year).map(format_number)),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect()
}

/// WhatsApp link pre-filled with the listing title
pub fn contact_link(phone: &str, title: &str) -> String {
    let text = format!("Olá! Tenho interesse no imóvel: {title}");
    match Url::parse_with_params(&format!("https://wa.me/{phone}"), &[("text", text.as_str())]) {
        Ok(url) => url.to_string(),
        Err(e) => {
            error!("Invalid contact phone {:?}: {}", phone, e);
            "https://wa.me/".to_string()
        }
    }
}

/// Single-property page
pub struct DetailView {
    service: Arc<dyn PropertyService>,
    navigator: Navigator,
    contact_phone: String,
    id: Option<String>,
    phase: DetailPhase,
    tab: DetailTab,
    images: Vec<String>,
    gallery: GalleryState,
}

impl DetailView {
    pub fn new(
        service: Arc<dyn PropertyService>,
        navigator: Navigator,
        contact_phone: impl Into<String>,
        id: Option<String>,
    ) -> Self {
        Self {
            service,
            navigator,
            contact_phone: contact_phone.into(),
            id,
            phase: DetailPhase::Loading,
            tab: DetailTab::default(),
            images: Vec::new(),
            gallery: GalleryState::default(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn property(&self) -> Option<&Property> {
        match &self.phase {
            DetailPhase::Loaded(property) => Some(property.as_ref()),
            _ => None,
        }
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    /// Fetch the property for the current id. No id means no fetch.
    pub async fn load(&mut self) {
        self.tab = DetailTab::default();
        self.images.clear();
        self.gallery = GalleryState::default();

        let Some(id) = self.id.clone() else {
            error!("Property detail mounted without an id");
            self.phase = DetailPhase::Failed(MISSING_ID.to_string());
            return;
        };

        self.phase = DetailPhase::Loading;
        info!("Loading property {}", id);

        self.phase = match self.service.get_property(&id).await {
            Ok(Some(property)) => {
                self.images = displayed_images(&property);
                self.gallery = GalleryState::new(self.images.len());
                DetailPhase::Loaded(Box::new(property))
            }
            Ok(None) => {
                error!("Property {} not found", id);
                DetailPhase::Failed(NOT_FOUND.to_string())
            }
            Err(e) => {
                error!("Error fetching property {}: {}", id, e);
                DetailPhase::Failed(e.to_string())
            }
        };
    }

    /// Switch to another id; refetches only when it changed
    pub async fn set_id(&mut self, id: Option<String>) {
        if id == self.id && !matches!(self.phase, DetailPhase::Loading) {
            return;
        }
        self.id = id;
        self.load().await;
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn gallery_event(&mut self, event: GalleryEvent) {
        self.gallery.apply(event);
    }

    /// "Voltar" and "Ver todos os imóveis" both go to the listing route
    pub fn back(&self) -> Navigation {
        self.navigator.navigate_to(LISTING_PATH, &[])
    }

    pub fn contact_url(&self) -> Option<String> {
        self.property()
            .map(|property| contact_link(&self.contact_phone, &property.title))
    }

    pub fn render(&self) -> String {
        let listing_url = escape(&self.navigator.build_url(LISTING_PATH, &[]));

        let property = match &self.phase {
            DetailPhase::Loading => {
                return r#"<div class="main-container detail-loading" aria-busy="true"><div class="skeleton skeleton-back"></div><div class="skeleton skeleton-gallery"></div><div class="skeleton skeleton-thumbs"></div><div class="skeleton skeleton-tabs"></div><div class="skeleton skeleton-sidebar"></div></div>"#
                    .to_string();
            }
            DetailPhase::Failed(message) => {
                let action = format!(
                    r#"<a class="btn-primary" data-action="back" href="{listing_url}">Ver todos os imóveis</a>"#
                );
                return format!(
                    r#"<div class="main-container">{}</div>"#,
                    error_panel("Imóvel não encontrado", message, &action)
                );
            }
            DetailPhase::Loaded(property) => property,
        };

        let mut html = format!(
            r#"<div class="main-container"><a class="back-link" data-action="back" href="{listing_url}">Voltar</a><div class="property-details-layout"><div class="property-details-left">{gallery}"#,
            gallery = self.gallery.render(&self.images, &property.title),
        );

        html.push_str(r#"<section class="about"><h2 class="section-title">Sobre o Imóvel</h2><div class="tabs">"#);
        for tab in DetailTab::ALL {
            html.push_str(&format!(
                r#"<button class="{class}" data-action="tab" data-tab="{key}">{label}</button>"#,
                class = if tab == self.tab { "tab active" } else { "tab" },
                key = tab.key(),
                label = tab.label(),
            ));
        }
        html.push_str(&format!(
            r#"</div><div class="tab-content" data-tab="{}">{}</div></section>"#,
            self.tab.key(),
            self.render_tab(property)
        ));

        if !property.detailed_features.is_empty() {
            html.push_str(r#"<section class="features"><h2 class="section-title">Características do Imóvel</h2><div class="features-grid">"#);
            for feature in &property.detailed_features {
                html.push_str(&format!(
                    r#"<div class="feature">{}<span>{}</span></div>"#,
                    Icon::resolve(&feature.icon).render(),
                    escape(&feature.text)
                ));
            }
            html.push_str("</div></section>");
        }

        html.push_str("</div>");
        html.push_str(&self.render_info_card(property));
        html.push_str("</div></div>");
        html
    }

    fn render_tab(&self, property: &Property) -> String {
        match self.tab {
            DetailTab::Description => format!(
                r#"<div class="description">{}</div>"#,
                escape(&description_text(property))
            ),
            DetailTab::Location => match location_rows(property) {
                Some(rows) => rows
                    .iter()
                    .map(|(label, value)| label_row(label, value))
                    .collect(),
                None => format!(r#"<p class="not-available">{NO_LOCATION}</p>"#),
            },
            DetailTab::Summary => {
                let items = summary_items(property);
                if items.is_empty() {
                    return String::new();
                }
                let cells: String = items
                    .iter()
                    .map(|(label, value)| {
                        format!(
                            r#"<div class="summary-item"><div class="summary-value">{}</div><div class="summary-label">{}</div></div>"#,
                            escape(value),
                            escape(label)
                        )
                    })
                    .collect();
                format!(r#"<div class="summary-grid">{cells}</div>"#)
            }
        }
    }

    fn render_info_card(&self, property: &Property) -> String {
        let place = match property.state_text() {
            Some(state) => format!("{} - {}", property.city, state),
            None => property.city.clone(),
        };

        format!(
            r#"<aside class="property-details-right"><span class="badge-status">{badge}</span><h1 class="sidebar-title">{title}</h1><div class="detail-location">{place}</div><div class="price-block"><span class="price-label">Valor do imóvel</span><div class="price-display">{price}</div></div><a class="btn-whatsapp" href="{contact}" target="_blank" rel="noopener noreferrer">Falar no WhatsApp</a></aside>"#,
            badge = escape(&property.badge_label()),
            title = escape(&property.title),
            place = escape(&place),
            price = escape(&format_price(property.price, property.kind)),
            contact = escape(&contact_link(&self.contact_phone, &property.title)),
        )
    }
}
