//! URL construction and full-page navigation.

use tracing::{info, warn};
use url::Url;

/// Origin used by the hosted (production) build
pub const PRODUCTION_BASE_URL: &str = "https://marioaragao.com";
/// Grid route
pub const LISTING_PATH: &str = "/imoveis";
/// Detail route, takes an `id` query parameter
pub const PROPERTY_PATH: &str = "/imovel";

// Only used to resolve relative paths; never appears in output
const LOCAL_ORIGIN: &str = "http://localhost/";

/// Deployment environment, decides whether URLs are absolute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// `development`/`dev` select development; anything else is production
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

/// A full navigation the host must perform. It replaces the current
/// document, so the view that produced it is finished.
#[must_use = "a navigation does nothing until the host follows it"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
}

/// Builds widget URLs against the configured base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    base: Option<Url>,
}

impl Navigator {
    /// Relative URLs (`/path?query`), as used in development
    pub fn relative() -> Self {
        Self { base: None }
    }

    /// Absolute URLs against `base`
    pub fn with_base(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Some(Url::parse(base)?),
        })
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::relative(),
            Environment::Production => Self::with_base(PRODUCTION_BASE_URL).unwrap_or_else(|e| {
                warn!("Invalid production base URL, using relative URLs: {}", e);
                Self::relative()
            }),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base.as_ref().map(Url::as_str)
    }

    /// Compose base + path + query. Parameters are applied in order with
    /// "set" semantics: a repeated key replaces the earlier value in place.
    pub fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let origin = match &self.base {
            Some(base) => base.clone(),
            None => match Url::parse(LOCAL_ORIGIN) {
                Ok(origin) => origin,
                Err(e) => {
                    warn!("Cannot resolve {}: {}", path, e);
                    return path.to_string();
                }
            },
        };

        let mut url = match origin.join(path) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot resolve {}: {}", path, e);
                return path.to_string();
            }
        };

        if !params.is_empty() {
            let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            for (key, value) in params {
                match pairs.iter().position(|(k, _)| k == key) {
                    Some(first) => {
                        pairs[first].1 = value.to_string();
                        let mut seen = 0;
                        pairs.retain(|(k, _)| {
                            if k == key {
                                seen += 1;
                                seen == 1
                            } else {
                                true
                            }
                        });
                    }
                    None => pairs.push((key.to_string(), value.to_string())),
                }
            }
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        if self.base.is_some() {
            url.to_string()
        } else {
            match url.query() {
                Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
                _ => url.path().to_string(),
            }
        }
    }

    /// Full browser navigation to `build_url(path, params)`
    pub fn navigate_to(&self, path: &str, params: &[(&str, &str)]) -> Navigation {
        let url = self.build_url(path, params);
        info!("Navigating to {}", url);
        Navigation { url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_urls_are_relative() {
        let nav = Navigator::for_environment(Environment::Development);
        assert_eq!(nav.build_url("/imoveis", &[]), "/imoveis");
        assert_eq!(nav.build_url("/imovel", &[("id", "42")]), "/imovel?id=42");
    }

    #[test]
    fn production_urls_use_the_client_origin() {
        let nav = Navigator::for_environment(Environment::Production);
        assert_eq!(
            nav.build_url("/imovel", &[("id", "42")]),
            "https://marioaragao.com/imovel?id=42"
        );
        assert_eq!(nav.base_url(), Some("https://marioaragao.com/"));
    }

    #[test]
    fn build_url_is_deterministic() {
        let nav = Navigator::with_base("https://example.com").unwrap();
        let params = [("id", "a b"), ("ref", "grid")];
        let first = nav.build_url("/imovel", &params);
        assert_eq!(first, nav.build_url("/imovel", &params));
        assert_eq!(first, "https://example.com/imovel?id=a+b&ref=grid");
    }

    #[test]
    fn repeated_keys_replace_in_place() {
        let nav = Navigator::relative();
        assert_eq!(
            nav.build_url("/imovel?id=1&x=2", &[("id", "7")]),
            "/imovel?id=7&x=2"
        );
    }

    #[test]
    fn navigate_to_targets_the_built_url() {
        let nav = Navigator::relative();
        let navigation = nav.navigate_to(LISTING_PATH, &[]);
        assert_eq!(navigation.url, "/imoveis");
    }

    #[test]
    fn environment_parsing_defaults_to_production() {
        assert_eq!(Environment::parse("dev"), Environment::Development);
        assert_eq!(Environment::parse("Development"), Environment::Development);
        assert_eq!(Environment::parse(""), Environment::Production);
    }
}
