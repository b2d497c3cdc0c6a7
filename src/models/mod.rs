use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sanitize::display_text;

mod decode;

/// Whether a listing is for sale or for rent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ListingKind {
    #[serde(rename = "venda")]
    Sale,
    #[serde(rename = "aluguel")]
    Rent,
}

impl ListingKind {
    pub const ALL: [ListingKind; 2] = [ListingKind::Sale, ListingKind::Rent];

    /// Value stored in the `tipo` column
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Sale => "venda",
            ListingKind::Rent => "aluguel",
        }
    }

    /// Human label, also the badge fallback when no status is set
    pub fn label(self) -> &'static str {
        match self {
            ListingKind::Sale => "Venda",
            ListingKind::Rent => "Aluguel",
        }
    }

    /// Parse a column value; empty or unknown input means "any kind"
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// A labelled feature shown in the detail view (icon name + text)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureEntry {
    #[serde(rename = "icone", default, deserialize_with = "decode::lenient")]
    pub icon: String,
    #[serde(rename = "texto", default, deserialize_with = "decode::lenient")]
    pub text: String,
}

/// One row of the `imoveis` table.
///
/// Snapshots are read-only: the widget never builds or edits one outside of
/// fixtures and tests. Descriptive columns that the data source fills
/// inconsistently are kept as raw JSON and only displayed through
/// [`crate::sanitize::display_text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    #[serde(deserialize_with = "decode::id")]
    pub id: String,
    #[serde(rename = "titulo", default, deserialize_with = "decode::lenient")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Value,
    #[serde(rename = "tipo")]
    pub kind: ListingKind,
    #[serde(default, deserialize_with = "decode::lenient")]
    pub status: Option<String>,
    #[serde(rename = "finalidade", default, deserialize_with = "decode::lenient")]
    pub purpose: Option<String>,

    #[serde(rename = "cidade", default, deserialize_with = "decode::lenient")]
    pub city: String,
    #[serde(rename = "estado", default)]
    pub state: Value,
    #[serde(rename = "bairro", default)]
    pub neighborhood: Value,
    #[serde(rename = "logradouro", default)]
    pub street: Value,
    #[serde(rename = "endereco", default)]
    pub address: Value,
    #[serde(rename = "localizacao", default)]
    pub location: Value,

    #[serde(rename = "valor", default, deserialize_with = "decode::price")]
    pub price: f64,
    #[serde(rename = "area_util", default, deserialize_with = "decode::number")]
    pub usable_area: Option<f64>,
    #[serde(rename = "area_total", default, deserialize_with = "decode::number")]
    pub total_area: Option<f64>,
    #[serde(rename = "dormitorios", default, deserialize_with = "decode::number")]
    pub bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "decode::number")]
    pub suites: Option<f64>,
    #[serde(rename = "banheiros", default, deserialize_with = "decode::number")]
    pub bathrooms: Option<f64>,
    #[serde(rename = "vagas", default, deserialize_with = "decode::number")]
    pub parking_spots: Option<f64>,
    #[serde(rename = "vagas_garagem", default, deserialize_with = "decode::number")]
    pub garage_spots: Option<f64>,
    #[serde(rename = "pavimentos", default, deserialize_with = "decode::number")]
    pub floors: Option<f64>,
    #[serde(rename = "ano_construcao", default, deserialize_with = "decode::number")]
    pub construction_year: Option<f64>,

    #[serde(rename = "imagens", default, deserialize_with = "decode::lenient")]
    pub images: Option<Vec<String>>,
    #[serde(rename = "imagem_principal", default, deserialize_with = "decode::lenient")]
    pub main_image: Option<String>,
    #[serde(rename = "galeria_imagens", default, deserialize_with = "decode::lenient")]
    pub gallery_images: Option<Vec<String>>,

    #[serde(rename = "caracteristicas", default, deserialize_with = "decode::lenient")]
    pub features: Option<Vec<String>>,
    #[serde(
        rename = "caracteristicas_detalhadas",
        default,
        deserialize_with = "decode::lenient"
    )]
    pub detailed_features: Vec<FeatureEntry>,
    #[serde(rename = "sobre_o_imovel", default)]
    pub about: Value,

    #[serde(default, deserialize_with = "decode::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "decode::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Badge text: status, then purpose, then the kind's own label
    pub fn badge_label(&self) -> String {
        non_blank(self.status.as_deref())
            .or_else(|| non_blank(self.purpose.as_deref()))
            .unwrap_or_else(|| self.kind.label())
            .to_string()
    }

    /// Parking spots; `vagas_garagem` wins over `vagas` when it is set
    pub fn parking(&self) -> Option<f64> {
        positive(self.garage_spots).or_else(|| positive(self.parking_spots))
    }

    /// Neighborhood after sanitizing
    pub fn neighborhood_text(&self) -> Option<String> {
        display_text(&self.neighborhood)
    }

    /// State (UF) after sanitizing
    pub fn state_text(&self) -> Option<String> {
        display_text(&self.state)
    }

    /// Street line, falling back from `logradouro` to `endereco`
    pub fn street_text(&self) -> Option<String> {
        display_text(&self.street).or_else(|| display_text(&self.address))
    }

    /// Images in display order: `imagens` when non-empty, else the main
    /// image, then every gallery image that is not already in the list.
    /// No placeholder is added here.
    pub fn image_sequence(&self) -> Vec<String> {
        let mut sequence: Vec<String> = Vec::new();

        let listed: Vec<&String> = self
            .images
            .iter()
            .flatten()
            .filter(|url| !url.trim().is_empty())
            .collect();

        if !listed.is_empty() {
            sequence.extend(listed.into_iter().cloned());
        } else if let Some(main) = non_blank(self.main_image.as_deref()) {
            sequence.push(main.to_string());
        }

        for url in self.gallery_images.iter().flatten() {
            if !url.trim().is_empty() && !sequence.contains(url) {
                sequence.push(url.clone());
            }
        }

        sequence
    }

    /// The single image shown on a grid card, if any
    pub fn cover_image(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.first())
            .map(String::as_str)
            .and_then(|url| non_blank(Some(url)))
            .or_else(|| non_blank(self.main_image.as_deref()))
    }
}

pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_full_row() {
        let property: Property = serde_json::from_value(json!({
            "id": 42,
            "titulo": "Cobertura na Barra",
            "descricao": "Vista para o mar",
            "tipo": "aluguel",
            "status": "Lançamento",
            "cidade": "Rio de Janeiro",
            "estado": "RJ",
            "bairro": "Barra da Tijuca",
            "valor": "8500.00",
            "area_total": 180,
            "dormitorios": 3,
            "vagas": 2,
            "imagens": ["a.jpg", "b.jpg"],
            "caracteristicas_detalhadas": [{"icone": "Waves", "texto": "Piscina"}],
            "created_at": "2024-03-01T10:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(property.id, "42");
        assert_eq!(property.kind, ListingKind::Rent);
        assert_eq!(property.price, 8500.0);
        assert_eq!(property.total_area, Some(180.0));
        assert_eq!(property.detailed_features[0].text, "Piscina");
        assert_eq!(property.badge_label(), "Lançamento");
        assert!(property.created_at.is_some());
    }

    #[test]
    fn malformed_columns_decode_as_absent() {
        let property: Property = serde_json::from_value(json!({
            "id": "x1",
            "titulo": "Casa",
            "tipo": "venda",
            "cidade": "Niterói",
            "valor": null,
            "dormitorios": {"oops": true},
            "imagens": "not-a-list",
            "caracteristicas_detalhadas": {},
            "created_at": "yesterday"
        }))
        .unwrap();

        assert_eq!(property.price, 0.0);
        assert_eq!(property.bedrooms, None);
        assert_eq!(property.images, None);
        assert!(property.detailed_features.is_empty());
        assert_eq!(property.created_at, None);
    }

    #[test]
    fn badge_falls_back_through_status_purpose_kind() {
        let mut property = fixtures::property("1", "Apto");
        assert_eq!(property.badge_label(), "Venda");

        property.purpose = Some("Residencial".into());
        assert_eq!(property.badge_label(), "Residencial");

        property.status = Some("  ".into());
        assert_eq!(property.badge_label(), "Residencial");

        property.status = Some("Vendido".into());
        assert_eq!(property.badge_label(), "Vendido");
    }

    #[test]
    fn garage_spots_take_precedence_over_parking() {
        let mut property = fixtures::property("1", "Apto");
        property.parking_spots = Some(1.0);
        assert_eq!(property.parking(), Some(1.0));

        property.garage_spots = Some(0.0);
        assert_eq!(property.parking(), Some(1.0));

        property.garage_spots = Some(3.0);
        assert_eq!(property.parking(), Some(3.0));
    }

    #[test]
    fn image_sequence_drops_gallery_duplicates() {
        let mut property = fixtures::property("1", "Apto");
        property.main_image = Some("A".into());
        property.gallery_images = Some(vec!["A".into(), "B".into()]);
        assert_eq!(property.image_sequence(), vec!["A", "B"]);
    }

    #[test]
    fn image_sequence_prefers_image_list_over_main_image() {
        let mut property = fixtures::property("1", "Apto");
        property.images = Some(vec!["X".into(), "Y".into()]);
        property.main_image = Some("A".into());
        property.gallery_images = Some(vec!["Y".into(), "Z".into()]);
        assert_eq!(property.image_sequence(), vec!["X", "Y", "Z"]);
        assert_eq!(property.cover_image(), Some("X"));
    }

    #[test]
    fn image_sequence_is_empty_without_any_image() {
        let mut property = fixtures::property("1", "Apto");
        property.images = Some(vec![]);
        property.main_image = Some(String::new());
        property.gallery_images = Some(vec![]);
        assert!(property.image_sequence().is_empty());
        assert_eq!(property.cover_image(), None);
    }

    #[test]
    fn listing_kind_parse_accepts_column_values() {
        assert_eq!(ListingKind::parse("venda"), Some(ListingKind::Sale));
        assert_eq!(ListingKind::parse("ALUGUEL"), Some(ListingKind::Rent));
        assert_eq!(ListingKind::parse(""), None);
    }
}
