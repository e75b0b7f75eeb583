use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::lex::classifier::{self, UnknownPolicy};

/// User overlay location, `~`-expanded at load time.
pub const USER_CONFIG_PATH: &str = "~/.config/shsplit/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub classes: Classes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Recognise comment markers at the start of a token.
    pub comments: bool,
    /// How to treat characters no class claims.
    pub unknown: UnknownPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            comments: true,
            unknown: UnknownPolicy::Reject,
        }
    }
}

/// Character sets per class. Each string is a set of characters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Classes {
    pub ordinary: String,
    pub whitespace: String,
    pub escaping_quote: String,
    pub non_escaping_quote: String,
    pub escape: String,
    pub comment: String,
    pub pipe: String,
    pub redirect: String,
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            ordinary: classifier::ORDINARY.into(),
            whitespace: classifier::WHITESPACE.into(),
            escaping_quote: classifier::ESCAPING_QUOTE.into(),
            non_escaping_quote: classifier::NON_ESCAPING_QUOTE.into(),
            escape: classifier::ESCAPE.into(),
            comment: classifier::COMMENT.into(),
            pipe: classifier::PIPE.into(),
            redirect: classifier::REDIRECT.into(),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    classes: ClassesOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    comments: Option<bool>,
    unknown: Option<UnknownPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ClassesOverlay {
    replace: bool,
    ordinary: String,
    whitespace: String,
    escaping_quote: String,
    non_escaping_quote: String,
    escape: String,
    comment: String,
    pipe: String,
    redirect: String,
    remove_ordinary: String,
    remove_whitespace: String,
    remove_escaping_quote: String,
    remove_non_escaping_quote: String,
    remove_escape: String,
    remove_comment: String,
    remove_pipe: String,
    remove_redirect: String,
}

/// Failure loading an explicitly requested config file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// ── Merge logic ──

/// Merge a user character set into a default set.
/// In replace mode: user set replaces default entirely.
/// In merge mode: remove characters first, then append additions (deduped).
fn merge_set(base: &mut String, add: String, remove: &str, replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|ch| !remove.contains(ch));
        for ch in add.chars() {
            if !base.contains(ch) {
                base.push(ch);
            }
        }
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl Config {
    /// The built-in configuration; builds the canonical classifier.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Defaults merged with the user overlay at [`USER_CONFIG_PATH`], if present.
    ///
    /// A malformed overlay is logged and ignored.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_user_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Defaults merged with the overlay at `path` (`~` is expanded).
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let path = expand_path(path);
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let overlay = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        let mut config = Self::default_config();
        log::debug!("applying config overlay {}", path.display());
        config.apply_overlay(overlay);
        Ok(config)
    }

    fn load_user_overlay() -> Option<ConfigOverlay> {
        let path = expand_path(USER_CONFIG_PATH);
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => {
                log::debug!("applying config overlay {}", path.display());
                Some(overlay)
            }
            Err(e) => {
                log::warn!("config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    /// Render as TOML, e.g. for `--dump-config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        let s = overlay.settings;
        if let Some(v) = s.comments {
            self.settings.comments = v;
        }
        if let Some(v) = s.unknown {
            self.settings.unknown = v;
        }

        let c = overlay.classes;
        let classes = &mut self.classes;
        merge_set(&mut classes.ordinary, c.ordinary, &c.remove_ordinary, c.replace);
        merge_set(
            &mut classes.whitespace,
            c.whitespace,
            &c.remove_whitespace,
            c.replace,
        );
        merge_set(
            &mut classes.escaping_quote,
            c.escaping_quote,
            &c.remove_escaping_quote,
            c.replace,
        );
        merge_set(
            &mut classes.non_escaping_quote,
            c.non_escaping_quote,
            &c.remove_non_escaping_quote,
            c.replace,
        );
        merge_set(&mut classes.escape, c.escape, &c.remove_escape, c.replace);
        merge_set(&mut classes.comment, c.comment, &c.remove_comment, c.replace);
        merge_set(&mut classes.pipe, c.pipe, &c.remove_pipe, c.replace);
        merge_set(&mut classes.redirect, c.redirect, &c.remove_redirect, c.replace);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
