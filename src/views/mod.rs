pub mod card;
pub mod detail;
pub mod gallery;
pub mod grid;
pub mod html;
pub mod icons;

pub use card::{format_price, PropertyCard};
pub use detail::{DetailPhase, DetailTab, DetailView};
pub use gallery::{GalleryEvent, GalleryState};
pub use grid::{GridPhase, GridView, ListingResponse, ListingTicket};
pub use icons::Icon;
