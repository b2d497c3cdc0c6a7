use crate::models::{positive, ListingKind, Property};
use crate::navigation::{Navigation, Navigator, PROPERTY_PATH};
use crate::sanitize::format_number;
use crate::views::html::escape;

/// Shown when a listing has no image at all
pub const CARD_PLACEHOLDER: &str = "https://placehold.co/600x400/e2e8f0/64748b?text=Sem+Imagem";

/// Price in reais without cents; rentals get a per-month suffix
pub fn format_price(price: f64, kind: ListingKind) -> String {
    let formatted = format_brl(price);
    match kind {
        ListingKind::Rent => format!("{formatted}/mês"),
        ListingKind::Sale => formatted,
    }
}

/// `R$ 1.234.567`
fn format_brl(value: f64) -> String {
    let rounded = value.round().max(0.0) as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("R$ {grouped}")
}

/// A stat shown on a card, only when the value exists and is above zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardStat {
    Area(f64),
    Bedrooms(f64),
    Parking(f64),
}

impl CardStat {
    pub fn text(self) -> String {
        match self {
            CardStat::Area(area) => format!("{}m²", format_number(area)),
            CardStat::Bedrooms(n) => {
                format!("{} {}", format_number(n), if n == 1.0 { "quarto" } else { "quartos" })
            }
            CardStat::Parking(n) => {
                format!("{} {}", format_number(n), if n == 1.0 { "vaga" } else { "vagas" })
            }
        }
    }

    fn class(self) -> &'static str {
        match self {
            CardStat::Area(_) => "stat-area",
            CardStat::Bedrooms(_) => "stat-bedrooms",
            CardStat::Parking(_) => "stat-parking",
        }
    }
}

/// Summary of one property in the grid
pub struct PropertyCard<'a> {
    property: &'a Property,
}

impl<'a> PropertyCard<'a> {
    pub fn new(property: &'a Property) -> Self {
        Self { property }
    }

    pub fn image(&self) -> &str {
        self.property.cover_image().unwrap_or(CARD_PLACEHOLDER)
    }

    /// "neighborhood • city", or just the city
    pub fn location_line(&self) -> String {
        match self.property.neighborhood_text() {
            Some(neighborhood) => format!("{} • {}", neighborhood, self.property.city),
            None => self.property.city.clone(),
        }
    }

    pub fn stats(&self) -> Vec<CardStat> {
        let mut stats = Vec::new();
        if let Some(area) = positive(self.property.total_area) {
            stats.push(CardStat::Area(area));
        }
        if let Some(bedrooms) = positive(self.property.bedrooms) {
            stats.push(CardStat::Bedrooms(bedrooms));
        }
        if let Some(parking) = self.property.parking() {
            stats.push(CardStat::Parking(parking));
        }
        stats
    }

    pub fn price(&self) -> String {
        format_price(self.property.price, self.property.kind)
    }

    /// "Ver detalhes"
    pub fn open(&self, navigator: &Navigator) -> Navigation {
        navigator.navigate_to(PROPERTY_PATH, &[("id", self.property.id.as_str())])
    }

    pub fn render(&self, navigator: &Navigator) -> String {
        let property = self.property;
        let stats = self.stats();
        let stats_html = if stats.is_empty() {
            String::new()
        } else {
            let items: String = stats
                .iter()
                .map(|stat| format!(r#"<span class="{}">{}</span>"#, stat.class(), escape(&stat.text())))
                .collect();
            format!(r#"<div class="card-stats">{items}</div>"#)
        };

        format!(
            r#"<article class="property-card" data-id="{id}"><div class="card-image"><img src="{image}" alt="{title}" loading="lazy"/><span class="badge-type">{badge}</span></div><div class="card-body"><h3 class="property-card-title">{title}</h3><div class="card-location">{location}</div>{stats}<div class="card-footer"><span class="price-display">{price}</span><a class="btn-primary" data-action="open-property" href="{href}">Ver detalhes</a></div></div></article>"#,
            id = escape(&property.id),
            image = escape(self.image()),
            title = escape(&property.title),
            badge = escape(&property.badge_label()),
            location = escape(&self.location_line()),
            stats = stats_html,
            price = escape(&self.price()),
            href = escape(&navigator.build_url(PROPERTY_PATH, &[("id", property.id.as_str())])),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use scraper::{Html, Selector};
    use serde_json::json;

    #[test]
    fn rent_prices_get_a_monthly_suffix() {
        assert_eq!(format_price(2000.0, ListingKind::Rent), "R$ 2.000/mês");
        assert_eq!(format_price(2000.0, ListingKind::Sale), "R$ 2.000");
    }

    #[test]
    fn prices_are_grouped_and_rounded() {
        assert_eq!(format_price(0.0, ListingKind::Sale), "R$ 0");
        assert_eq!(format_price(999.6, ListingKind::Sale), "R$ 1.000");
        assert_eq!(format_price(1_250_000.0, ListingKind::Sale), "R$ 1.250.000");
        assert_eq!(format_price(12_345_678.0, ListingKind::Sale), "R$ 12.345.678");
    }

    #[test]
    fn location_joins_neighborhood_and_city() {
        let mut property = fixtures::property("1", "Apto");
        assert_eq!(PropertyCard::new(&property).location_line(), "Rio de Janeiro");

        property.neighborhood = json!("Botafogo");
        assert_eq!(
            PropertyCard::new(&property).location_line(),
            "Botafogo • Rio de Janeiro"
        );

        property.neighborhood = json!("0");
        assert_eq!(PropertyCard::new(&property).location_line(), "Rio de Janeiro");
    }

    #[test]
    fn stats_only_show_positive_values() {
        let mut property = fixtures::property("1", "Apto");
        property.total_area = Some(0.0);
        property.bedrooms = Some(1.0);
        property.parking_spots = Some(2.0);

        let stats = PropertyCard::new(&property).stats();
        assert_eq!(stats, vec![CardStat::Bedrooms(1.0), CardStat::Parking(2.0)]);
        assert_eq!(stats[0].text(), "1 quarto");
        assert_eq!(stats[1].text(), "2 vagas");
        assert_eq!(CardStat::Area(72.5).text(), "72.5m²");
    }

    #[test]
    fn card_falls_back_to_placeholder_image() {
        let property = fixtures::property("1", "Apto");
        assert_eq!(PropertyCard::new(&property).image(), CARD_PLACEHOLDER);
    }

    #[test]
    fn open_navigates_to_the_detail_route() {
        let property = fixtures::property("42", "Apto");
        let navigation = PropertyCard::new(&property).open(&Navigator::relative());
        assert_eq!(navigation.url, "/imovel?id=42");
    }

    #[test]
    fn rendered_card_has_link_badge_and_escaped_title() {
        let mut property = fixtures::property("7", "Casa <Alto Padrão>");
        property.kind = ListingKind::Rent;
        property.price = 3500.0;

        let markup = PropertyCard::new(&property).render(&Navigator::relative());
        let doc = Html::parse_fragment(&markup);

        let link = Selector::parse("a[data-action=open-property]").unwrap();
        let href = doc.select(&link).next().unwrap().value().attr("href");
        assert_eq!(href, Some("/imovel?id=7"));

        let badge = Selector::parse(".badge-type").unwrap();
        let badge_text: String = doc.select(&badge).next().unwrap().text().collect();
        assert_eq!(badge_text, "Aluguel");

        let title = Selector::parse("h3").unwrap();
        let title_text: String = doc.select(&title).next().unwrap().text().collect();
        assert_eq!(title_text, "Casa <Alto Padrão>");

        assert!(markup.contains("R$ 3.500/mês"));
        assert!(!markup.contains("card-stats"));
    }
}
