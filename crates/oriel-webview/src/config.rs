//! Passthrough configuration for the embedding engine and host window.
//!
//! None of these knobs affect bridge semantics; they are forwarded to the
//! engine builder and the window attributes as-is.

use std::path::PathBuf;

/// Configuration for creating a WebView instance.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content to render (mutually exclusive with `url`).
    pub html: Option<String>,
    /// Browser-profile data directory. `None` resolves to
    /// `<platform data dir>/oriel`.
    pub data_dir: Option<PathBuf>,
    /// Whether devtools may be opened (always on in debug builds).
    pub devtools: bool,
    /// Size the view to fill its parent window and track resizes.
    pub fill_parent: bool,
    /// Re-focus the view whenever the host window gains focus.
    pub autofocus: bool,
    /// Whether the WebView background should be transparent.
    pub transparent: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
    /// Whether to enable clipboard access.
    pub clipboard: bool,
    /// Whether to enable autoplay for media.
    pub autoplay: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            data_dir: None,
            devtools: cfg!(debug_assertions),
            fill_parent: true,
            autofocus: true,
            transparent: false,
            user_agent: None,
            clipboard: true,
            autoplay: true,
        }
    }
}

impl WebViewConfig {
    /// Create a config that loads a URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a config that renders inline HTML.
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }

    /// Effective browser-profile directory.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("oriel")))
    }
}

/// Host-window sizing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeHint {
    /// Width and height are the initial size; the user may resize freely.
    #[default]
    None,
    /// The window size cannot be changed by the user.
    Fixed,
    /// Width and height are a minimum bound.
    Min,
    /// Width and height are a maximum bound.
    Max,
}

/// Host window options, applied by the embedder through its GUI toolkit.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub hint: SizeHint,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "oriel".to_string(),
            width: 1024,
            height: 768,
            hint: SizeHint::None,
        }
    }
}

impl WindowOptions {
    /// Whether the user may resize the window under this hint.
    pub fn resizable(&self) -> bool {
        self.hint != SizeHint::Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_content() {
        let cfg = WebViewConfig::default();
        assert!(cfg.url.is_none());
        assert!(cfg.html.is_none());
        assert!(cfg.fill_parent);
        assert!(cfg.autofocus);
        assert!(cfg.clipboard);
    }

    #[test]
    fn url_and_html_constructors() {
        let cfg = WebViewConfig::with_url("https://example.invalid/app");
        assert_eq!(cfg.url.as_deref(), Some("https://example.invalid/app"));
        assert!(cfg.html.is_none());

        let cfg = WebViewConfig::with_html("<html></html>");
        assert_eq!(cfg.html.as_deref(), Some("<html></html>"));
        assert!(cfg.url.is_none());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cfg = WebViewConfig {
            data_dir: Some(PathBuf::from("/tmp/profile")),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_data_dir(), Some(PathBuf::from("/tmp/profile")));
    }

    #[test]
    fn fixed_hint_disables_resizing() {
        let opts = WindowOptions {
            hint: SizeHint::Fixed,
            ..Default::default()
        };
        assert!(!opts.resizable());
        assert!(WindowOptions::default().resizable());
    }
}
