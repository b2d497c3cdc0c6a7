use crate::navigation::{Environment, Navigator};
use crate::service::SupabaseConfig;

pub const DEFAULT_CONTAINER_ID: &str = "aracon-imoveis-widget";
pub const DEFAULT_TABLE: &str = "imoveis";
pub const DEFAULT_CONTACT_PHONE: &str = "5511999339979";

/// Everything the widget reads from its environment
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub supabase: SupabaseConfig,
    pub environment: Environment,
    /// Id of the host element the widget mounts into
    pub container_id: String,
    /// WhatsApp number used by the contact button
    pub contact_phone: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl WidgetConfig {
    /// Read from process environment variables (call `dotenvy::dotenv()`
    /// first to pick up a `.env` file)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            supabase: SupabaseConfig {
                url: var("SUPABASE_URL", ""),
                anon_key: var("SUPABASE_ANON_KEY", ""),
                table: var("IMOVEIS_TABLE", DEFAULT_TABLE),
            },
            environment: Environment::parse(&var("WIDGET_ENV", "production")),
            container_id: var("WIDGET_CONTAINER_ID", DEFAULT_CONTAINER_ID),
            contact_phone: var("WIDGET_CONTACT_PHONE", DEFAULT_CONTACT_PHONE),
        }
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::for_environment(self.environment)
    }
}
