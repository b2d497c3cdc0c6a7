//! One-shot route selection from the page URL.

use tracing::debug;
use url::Url;

use crate::error::WidgetError;

const LOCAL_ORIGIN: &str = "http://localhost/";
const PROPERTY_SEGMENT: &str = "imovel";
const LISTING_SEGMENT: &str = "imoveis";

/// Path and query of the page the widget is mounted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Accepts absolute URLs and `/path?query` forms
    pub fn parse(raw: &str) -> Result<Self, WidgetError> {
        let invalid = |source| WidgetError::InvalidLocation {
            location: raw.to_string(),
            source,
        };

        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(LOCAL_ORIGIN)
                .and_then(|origin| origin.join(raw))
                .map_err(invalid)?,
            Err(e) => return Err(invalid(e)),
        };

        Ok(Self {
            path: url.path().to_string(),
            query: url.query_pairs().into_owned().collect(),
        })
    }

    /// First value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_segment(&self, segment: &str) -> bool {
        self.path.split('/').any(|s| s == segment)
    }
}

/// Which view the root renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Detail { id: String },
    Listing,
}

impl Route {
    /// A property path with a non-empty `id` opens the detail view. Every
    /// other location (listing path, root, a property path without an id,
    /// unknown paths) renders the grid.
    pub fn resolve(location: &Location) -> Route {
        let id = location.param("id").filter(|id| !id.is_empty());

        let route = match id {
            Some(id) if location.has_segment(PROPERTY_SEGMENT) => Route::Detail { id: id.to_string() },
            _ => Route::Listing,
        };

        debug!(
            "Resolved {} (listing segment: {}) to {:?}",
            location.path,
            location.has_segment(LISTING_SEGMENT),
            route
        );
        route
    }
}
