//! Preview overlay.

/// CSS `display` values the overlay toggles between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Grid,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Grid => "grid",
        }
    }
}

/// Where the overlay content and visibility actually live.
pub trait PreviewSurface {
    /// Replace the rendered preview content.
    fn set_content(&mut self, html: &str);

    fn set_display(&mut self, display: Display);
}

/// In-memory surface, for native previews and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
    pub content: String,
    pub display: Display,
}

impl PreviewSurface for MemorySurface {
    fn set_content(&mut self, html: &str) {
        self.content = html.to_string();
    }

    fn set_display(&mut self, display: Display) {
        self.display = display;
    }
}

/// What a click inside the overlay landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The overlay element itself, outside the content box.
    Backdrop,
    /// Anything inside the content box.
    Content,
    /// The close control.
    CloseControl,
}

/// Read-only preview overlay. Hiding keeps the last shown content.
#[derive(Debug, Clone, Default)]
pub struct Modal<S> {
    surface: S,
    last_shown: Option<String>,
    visible: bool,
}

impl<S: PreviewSurface> Modal<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            last_shown: None,
            visible: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Show `html`, replacing whatever was shown before.
    pub fn show(&mut self, html: &str) {
        self.surface.set_content(html);
        self.surface.set_display(Display::Grid);
        self.last_shown = Some(html.to_string());
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.surface.set_display(Display::None);
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }

    /// Show the most recent content again. False if nothing was ever shown.
    pub fn show_last(&mut self) -> bool {
        match self.last_shown.take() {
            Some(html) => {
                self.show(&html);
                true
            }
            None => false,
        }
    }

    /// Handle a click on the overlay. Returns true if it dismissed it.
    pub fn on_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop | ClickTarget::CloseControl => {
                self.hide();
                true
            }
            ClickTarget::Content => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal() -> Modal<MemorySurface> {
        Modal::new(MemorySurface::default())
    }

    #[test]
    fn hide_keeps_content() {
        let mut modal = modal();
        modal.show("<h1>x</h1>");
        assert!(modal.is_visible());
        assert_eq!(modal.surface().display, Display::Grid);

        modal.hide();
        assert!(!modal.is_visible());
        assert_eq!(modal.surface().display, Display::None);
        assert_eq!(modal.last_shown(), Some("<h1>x</h1>"));
        assert_eq!(modal.surface().content, "<h1>x</h1>");

        assert!(modal.show_last());
        assert!(modal.is_visible());
        assert_eq!(modal.surface().content, "<h1>x</h1>");
    }

    #[test]
    fn show_overwrites() {
        let mut modal = modal();
        modal.show("a");
        modal.show("b");
        assert_eq!(modal.last_shown(), Some("b"));
        assert_eq!(modal.surface().content, "b");
    }

    #[test]
    fn content_clicks_never_dismiss() {
        let mut modal = modal();
        modal.show("a");
        assert!(!modal.on_click(ClickTarget::Content));
        assert!(modal.is_visible());

        assert!(modal.on_click(ClickTarget::Backdrop));
        assert!(!modal.is_visible());

        modal.show("a");
        assert!(modal.on_click(ClickTarget::CloseControl));
        assert!(!modal.is_visible());
    }

    #[test]
    fn show_last_without_history() {
        let mut modal = modal();
        assert!(!modal.show_last());
        assert!(!modal.is_visible());
        assert_eq!(Display::Grid.as_css(), "grid");
    }
}
