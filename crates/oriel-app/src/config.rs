//! TOML profile for window and engine passthrough knobs.
//!
//! The profile only carries collaborator configuration (sizing, data
//! directory, devtools and similar); bridge semantics have no knobs.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use oriel_common::{OrielError, Result};
use oriel_webview::{SizeHint, WebViewConfig, WindowOptions};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowProfile,
    pub webview: WebViewProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowProfile {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// One of `none`, `fixed`, `min`, `max`.
    pub size_hint: String,
}

impl Default for WindowProfile {
    fn default() -> Self {
        let defaults = WindowOptions::default();
        Self {
            title: defaults.title,
            width: defaults.width,
            height: defaults.height,
            size_hint: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebViewProfile {
    pub url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub devtools: Option<bool>,
    pub fill_parent: Option<bool>,
    pub autofocus: Option<bool>,
    pub user_agent: Option<String>,
}

impl AppConfig {
    /// Load a profile. An explicit `path` must exist and parse; with no
    /// path, `oriel.toml` is looked up in the working directory and the
    /// platform config dir, and absence means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw).map_err(|e| OrielError::Config(e.to_string()))
    }

    /// Window options, validating the size hint spelling.
    pub fn window_options(&self) -> Result<WindowOptions> {
        let hint = match self.window.size_hint.as_str() {
            "none" => SizeHint::None,
            "fixed" => SizeHint::Fixed,
            "min" => SizeHint::Min,
            "max" => SizeHint::Max,
            other => {
                return Err(OrielError::Config(format!(
                    "unknown size_hint '{other}' (expected none, fixed, min or max)"
                )))
            }
        };
        Ok(WindowOptions {
            title: self.window.title.clone(),
            width: self.window.width,
            height: self.window.height,
            hint,
        })
    }

    /// Engine passthrough config; unset knobs keep their defaults.
    pub fn webview_config(&self) -> WebViewConfig {
        let defaults = WebViewConfig::default();
        WebViewConfig {
            url: self.webview.url.clone(),
            data_dir: self.webview.data_dir.clone(),
            devtools: self.webview.devtools.unwrap_or(defaults.devtools),
            fill_parent: self.webview.fill_parent.unwrap_or(defaults.fill_parent),
            autofocus: self.webview.autofocus.unwrap_or(defaults.autofocus),
            user_agent: self.webview.user_agent.clone(),
            ..defaults
        }
    }
}

fn default_path() -> Option<PathBuf> {
    let local = PathBuf::from("oriel.toml");
    if local.exists() {
        return Some(local);
    }
    let global = dirs::config_dir()?.join("oriel").join("oriel.toml");
    if global.exists() {
        return Some(global);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_profile_parses() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [window]
            title = "demo"
            width = 640
            height = 480
            size_hint = "fixed"

            [webview]
            url = "https://example.invalid/app"
            devtools = true
            fill_parent = false
            "#,
        )
        .unwrap();

        let opts = cfg.window_options().unwrap();
        assert_eq!(opts.title, "demo");
        assert_eq!((opts.width, opts.height), (640, 480));
        assert_eq!(opts.hint, SizeHint::Fixed);

        let wv = cfg.webview_config();
        assert_eq!(wv.url.as_deref(), Some("https://example.invalid/app"));
        assert!(wv.devtools);
        assert!(!wv.fill_parent);
        // unset knobs keep defaults
        assert!(wv.autofocus);
    }

    #[test]
    fn empty_profile_is_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        let opts = cfg.window_options().unwrap();
        assert_eq!(opts.hint, SizeHint::None);
        assert_eq!(opts.width, WindowOptions::default().width);
        assert!(cfg.webview_config().url.is_none());
    }

    #[test]
    fn bad_size_hint_is_rejected() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [window]
            size_hint = "enormous"
            "#,
        )
        .unwrap();
        let err = cfg.window_options().unwrap_err();
        assert!(err.to_string().contains("size_hint"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/oriel.toml"))).unwrap_err();
        assert!(matches!(err, OrielError::Io(_)));
    }
}
