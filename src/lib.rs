//! Embeddable property listing widget: a filterable grid of listings and a
//! detail page with gallery, info tabs and a contact button, backed by a
//! Supabase table.

pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod navigation;
pub mod router;
pub mod sanitize;
pub mod service;
pub mod views;
pub mod widget;

pub use config::WidgetConfig;
pub use error::WidgetError;
pub use filters::{PriceBucket, PropertyFilters};
pub use models::{ListingKind, Property};
pub use navigation::{Navigation, Navigator};
pub use router::{Location, Route};
pub use service::{MemoryService, PropertyService, ServiceError, SupabaseService};
pub use widget::{Widget, WidgetEvent};
