//! Root of the widget: picks a view from the page URL, forwards user
//! events to it and embeds its markup into the host page.

use std::sync::Arc;

use scraper::{Html, Selector};
use tracing::{debug, error, info};

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::filters::PriceBucket;
use crate::models::ListingKind;
use crate::navigation::{Navigation, Navigator};
use crate::router::{Location, Route};
use crate::service::PropertyService;
use crate::views::{DetailTab, DetailView, GalleryEvent, GridView};

/// User interactions routed to the mounted view
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    SetKind(Option<ListingKind>),
    SetCity(String),
    SetSearch(String),
    ClearSearch,
    SelectPriceBucket(PriceBucket),
    ClearFilters,
    Retry,
    OpenProperty(String),
    SelectTab(DetailTab),
    Gallery(GalleryEvent),
    Back,
}

/// The mounted view
pub enum Screen {
    Grid(GridView),
    Detail(DetailView),
}

pub struct Widget {
    service: Arc<dyn PropertyService>,
    navigator: Navigator,
    contact_phone: String,
    route: Route,
    screen: Screen,
}

impl Widget {
    /// Resolve the route once and run the chosen view's initial fetches
    pub async fn mount(
        location: &str,
        service: Arc<dyn PropertyService>,
        config: &WidgetConfig,
    ) -> Result<Self, WidgetError> {
        let navigator = config.navigator();
        let route = Route::resolve(&Location::parse(location)?);
        info!("Mounting widget at {} as {:?}", location, route);

        let screen = Self::open(&route, &service, &navigator, &config.contact_phone).await;
        Ok(Self {
            service,
            navigator,
            contact_phone: config.contact_phone.clone(),
            route,
            screen,
        })
    }

    async fn open(
        route: &Route,
        service: &Arc<dyn PropertyService>,
        navigator: &Navigator,
        contact_phone: &str,
    ) -> Screen {
        match route {
            Route::Listing => {
                let mut grid = GridView::new(Arc::clone(service), navigator.clone());
                grid.mount().await;
                Screen::Grid(grid)
            }
            Route::Detail { id } => {
                let mut detail = DetailView::new(
                    Arc::clone(service),
                    navigator.clone(),
                    contact_phone,
                    Some(id.clone()),
                );
                detail.load().await;
                Screen::Detail(detail)
            }
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Apply one event. Events that do not belong to the mounted view are
    /// ignored. A returned navigation ends the current view.
    pub async fn dispatch(&mut self, event: WidgetEvent) -> Option<Navigation> {
        match (&mut self.screen, event) {
            (Screen::Grid(grid), WidgetEvent::SetKind(kind)) => grid.set_kind(kind).await,
            (Screen::Grid(grid), WidgetEvent::SetCity(city)) => grid.set_city(&city).await,
            (Screen::Grid(grid), WidgetEvent::SetSearch(term)) => grid.set_search(&term).await,
            (Screen::Grid(grid), WidgetEvent::ClearSearch) => grid.clear_search().await,
            (Screen::Grid(grid), WidgetEvent::SelectPriceBucket(bucket)) => {
                grid.select_price_bucket(bucket).await
            }
            (Screen::Grid(grid), WidgetEvent::ClearFilters) => grid.clear_filters().await,
            (Screen::Grid(grid), WidgetEvent::Retry) => grid.retry().await,
            (Screen::Grid(grid), WidgetEvent::OpenProperty(id)) => return grid.open_property(&id),
            (Screen::Detail(detail), WidgetEvent::SelectTab(tab)) => detail.select_tab(tab),
            (Screen::Detail(detail), WidgetEvent::Gallery(event)) => detail.gallery_event(event),
            (Screen::Detail(detail), WidgetEvent::Back) => return Some(detail.back()),
            (_, event) => debug!("Ignoring {:?} for the current view", event),
        }
        None
    }

    /// Perform a navigation: the page is replaced, so the widget mounts again
    /// from scratch at the new URL
    pub async fn follow(&mut self, navigation: Navigation) -> Result<(), WidgetError> {
        let route = Route::resolve(&Location::parse(&navigation.url)?);
        info!("Following navigation to {} as {:?}", navigation.url, route);

        self.screen = Self::open(&route, &self.service, &self.navigator, &self.contact_phone).await;
        self.route = route;
        Ok(())
    }

    pub fn render(&self) -> String {
        let (name, body) = match &self.screen {
            Screen::Grid(grid) => ("grid", grid.render()),
            Screen::Detail(detail) => ("detail", detail.render()),
        };
        format!(r#"<div class="imoveis-widget" data-view="{name}">{body}</div>"#)
    }
}

/// Whether the host page has an element with the given id
pub fn has_container(host_html: &str, container_id: &str) -> bool {
    let document = Html::parse_document(host_html);
    match Selector::parse("[id]") {
        Ok(selector) => document
            .select(&selector)
            .any(|element| element.value().id() == Some(container_id)),
        Err(_) => false,
    }
}

/// Insert `markup` as the content of the container element
pub fn embed(host_html: &str, container_id: &str, markup: &str) -> Result<String, WidgetError> {
    let insert_at = has_container(host_html, container_id)
        .then(|| opening_tag_end(host_html, container_id))
        .flatten();

    let Some(insert_at) = insert_at else {
        error!(
            "Widget container #{} not found. Please add <div id=\"{}\"></div> to your HTML.",
            container_id, container_id
        );
        return Err(WidgetError::ContainerNotFound(container_id.to_string()));
    };

    let mut page = String::with_capacity(host_html.len() + markup.len());
    page.push_str(&host_html[..insert_at]);
    page.push_str(markup);
    page.push_str(&host_html[insert_at..]);
    Ok(page)
}

/// Byte offset just past the start tag whose `id` attribute equals
/// `container_id`. Comments and raw-text elements are skipped.
fn opening_tag_end(html: &str, container_id: &str) -> Option<usize> {
    let mut pos = 0;
    while let Some(offset) = html[pos..].find('<') {
        let open = pos + offset;
        if html[open..].starts_with("<!--") {
            pos = open + html[open..].find("-->")? + 3;
            continue;
        }

        let Some(tag) = StartTag::parse(html, open + 1) else {
            pos = open + 1;
            continue;
        };
        if tag.id == Some(container_id) {
            return Some(tag.end);
        }

        pos = tag.end;
        if RAW_TEXT_ELEMENTS
            .iter()
            .any(|name| tag.name.eq_ignore_ascii_case(name))
        {
            // lowercasing keeps byte offsets, only ASCII changes
            let close = format!("</{}", tag.name.to_ascii_lowercase());
            pos += html[pos..].to_ascii_lowercase().find(&close)?;
        }
    }
    None
}

const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "template"];

struct StartTag<'a> {
    name: &'a str,
    id: Option<&'a str>,
    /// Offset just past the closing `>`
    end: usize,
}

impl<'a> StartTag<'a> {
    /// Parse a start tag whose name begins at `start` (just after `<`).
    /// Returns `None` for anything that is not a start tag.
    fn parse(html: &'a str, start: usize) -> Option<Self> {
        let bytes = html.as_bytes();
        if !bytes.get(start)?.is_ascii_alphabetic() {
            return None;
        }

        let mut i = start;
        while i < bytes.len() && !is_tag_delimiter(bytes[i]) {
            i += 1;
        }
        let name = &html[start..i];
        let mut id = None;

        loop {
            while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
                i += 1;
            }
            if *bytes.get(i)? == b'>' {
                return Some(Self { name, id, end: i + 1 });
            }

            let attr_start = i;
            while i < bytes.len() && !is_tag_delimiter(bytes[i]) && bytes[i] != b'=' {
                i += 1;
            }
            let attr = &html[attr_start..i];

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if bytes.get(i) != Some(&b'=') {
                continue;
            }
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }

            let value = match *bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let value_start = i + 1;
                    let len = html[value_start..].find(quote as char)?;
                    i = value_start + len + 1;
                    &html[value_start..value_start + len]
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    &html[value_start..i]
                }
            };

            if id.is_none() && attr.eq_ignore_ascii_case("id") {
                id = Some(value);
            }
        }
    }
}

fn is_tag_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'>' || byte == b'/'
}

/// Bare page used when no host page is supplied
pub fn default_host_page(container_id: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"utf-8\"><title>Imóveis</title></head>\n<body>\n<div id=\"{container_id}\"></div>\n</body>\n</html>\n"
    )
}
