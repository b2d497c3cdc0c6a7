//! Image gallery with a primary viewport, a thumbnail strip and a
//! fullscreen overlay, all driven by one shared index.

use crate::views::html::escape;

/// User interactions with the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryEvent {
    Previous,
    Next,
    /// Thumbnail click
    Select(usize),
    OpenFullscreen,
    CloseFullscreen,
    /// Tap on the dimmed area around the fullscreen image
    BackdropClick,
    /// Tap on the fullscreen image itself
    ImageClick,
}

/// Current image index plus the fullscreen toggle.
///
/// The index is always valid for a non-empty sequence: previous/next wrap,
/// direct selection is clamped. Both surfaces read the same index, so the
/// viewport and the highlighted thumbnail can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryState {
    len: usize,
    index: usize,
    fullscreen: bool,
}

impl GalleryState {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            fullscreen: false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Slide shown in the primary viewport
    pub fn viewport_index(&self) -> usize {
        self.index
    }

    /// Thumbnail highlighted and scrolled into view
    pub fn active_thumbnail(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn select(&mut self, index: usize) {
        if self.len > 0 {
            self.index = index.min(self.len - 1);
        }
    }

    pub fn apply(&mut self, event: GalleryEvent) {
        match event {
            GalleryEvent::Previous => self.previous(),
            GalleryEvent::Next => self.next(),
            GalleryEvent::Select(index) => self.select(index),
            GalleryEvent::OpenFullscreen => self.fullscreen = !self.is_empty(),
            GalleryEvent::CloseFullscreen | GalleryEvent::BackdropClick => self.fullscreen = false,
            GalleryEvent::ImageClick => {}
        }
    }

    pub fn render(&self, images: &[String], title: &str) -> String {
        if images.is_empty() {
            return r#"<div class="gallery gallery-empty"><span>Sem imagens disponíveis</span></div>"#
                .to_string();
        }

        let current = images.get(self.index).unwrap_or(&images[0]);
        let counter = format!("{} / {}", self.index + 1, images.len());
        let many = images.len() > 1;

        let arrows = if many {
            r#"<button class="gallery-prev" data-action="gallery-prev" aria-label="Anterior">‹</button><button class="gallery-next" data-action="gallery-next" aria-label="Próxima">›</button>"#
        } else {
            ""
        };

        let mut html = format!(
            r#"<div class="gallery" data-index="{index}"><div class="gallery-main"><img src="{src}" alt="{alt}"/>{arrows}<span class="gallery-counter">{counter}</span><button class="gallery-expand" data-action="gallery-fullscreen" aria-label="Expandir">⤢</button></div>"#,
            index = self.index,
            src = escape(current),
            alt = escape(&format!("{} - Imagem {}", title, self.index + 1)),
        );

        if many {
            html.push_str(r#"<div class="gallery-thumbs">"#);
            for (i, image) in images.iter().enumerate() {
                let class = if i == self.index {
                    "gallery-thumb active"
                } else {
                    "gallery-thumb"
                };
                html.push_str(&format!(
                    r#"<button class="{class}" data-action="gallery-select" data-index="{i}"><img src="{src}" alt="{alt}"/></button>"#,
                    src = escape(image),
                    alt = escape(&format!("{} - Miniatura {}", title, i + 1)),
                ));
            }
            html.push_str("</div>");
        }

        if self.fullscreen {
            html.push_str(&format!(
                r#"<div class="gallery-overlay" data-action="gallery-backdrop"><button class="gallery-close" data-action="gallery-close" aria-label="Fechar">×</button><img src="{src}" alt="{alt}" data-action="gallery-image"/>{arrows}<span class="gallery-counter">{counter}</span></div>"#,
                src = escape(current),
                alt = escape(title),
            ));
        }

        html.push_str("</div>");
        html
    }
}
