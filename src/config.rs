//! Run configuration.
//!
//! Two separate surfaces, loaded once at startup and passed explicitly to
//! the components that need them:
//!
//! - **Layout options** come from an optional `photoboard.toml` file. Every
//!   option has a default; an absent file means "all defaults". Unknown keys
//!   are rejected to catch typos early.
//! - **Credentials** come from environment variables only, never from the
//!   config file, so a config checked into a repo can't leak a token.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! columns = 6             # Tiles per row
//! cell_width = 440        # Tile cell width in board pixels
//! cell_height = 420       # Tile cell height (image + banner)
//! origin_x = 0            # Board x of the grid's top-left cell
//! origin_y = 0            # Board y of the grid's top-left cell
//! banner_height = 60      # Caption banner height
//! banner_margin = 8       # Gap between image and banner
//! banner_color = "#FFFFFF"  # Banner fill (light, so default text is readable)
//! text_size = 18          # Caption font size
//! text_padding_x = 8      # Horizontal text inset within the banner
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `FLICKR_API_KEY` | Flickr REST API key |
//! | `FLICKR_USER_ID` | Album owner NSID, e.g. `12345678@N00` |
//! | `FLICKR_PHOTOSET_ID` | Album (photoset) id |
//! | `MIRO_TOKEN` | Miro OAuth token (needs `boards:write`) |
//! | `MIRO_BOARD_ID` | Target board id |
//!
//! Missing variables are reported all at once, not one per run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Missing required env vars: {0}")]
    MissingEnv(String),
}

/// Grid layout options loaded from `photoboard.toml`.
///
/// All fields have defaults matching a 6-wide grid of 440×420 cells. User
/// config files need only specify the values they want to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Tiles per row.
    pub columns: u32,
    /// Cell width in board pixels (also the image width).
    pub cell_width: i64,
    /// Cell height in board pixels (image + banner + margin).
    pub cell_height: i64,
    /// Board x coordinate of the first cell's top-left corner.
    pub origin_x: i64,
    /// Board y coordinate of the first cell's top-left corner.
    pub origin_y: i64,
    /// Caption banner height.
    pub banner_height: i64,
    /// Vertical gap between the image and the banner.
    pub banner_margin: i64,
    /// Banner fill color. Keep it light: the board API ignores text color,
    /// so readability comes from the banner.
    pub banner_color: String,
    /// Caption font size.
    pub text_size: u32,
    /// Horizontal inset of the text within the banner, per side.
    pub text_padding_x: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            cell_width: 440,
            cell_height: 420,
            origin_x: 0,
            origin_y: 0,
            banner_height: 60,
            banner_margin: 8,
            banner_color: "#FFFFFF".to_string(),
            text_size: 18,
            text_padding_x: 8,
        }
    }
}

impl LayoutConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::Validation("columns must be at least 1".into()));
        }
        if self.cell_width <= 0 || self.cell_height <= 0 {
            return Err(ConfigError::Validation(
                "cell_width and cell_height must be positive".into(),
            ));
        }
        if self.banner_height <= 0 {
            return Err(ConfigError::Validation(
                "banner_height must be positive".into(),
            ));
        }
        if self.banner_margin < 0 || self.text_padding_x < 0 {
            return Err(ConfigError::Validation(
                "banner_margin and text_padding_x must not be negative".into(),
            ));
        }
        if self.banner_height + self.banner_margin >= self.cell_height {
            return Err(ConfigError::Validation(
                "banner_height + banner_margin must leave room for the image within cell_height"
                    .into(),
            ));
        }
        if self.text_padding_x * 2 >= self.cell_width {
            return Err(ConfigError::Validation(
                "text_padding_x * 2 must be smaller than cell_width".into(),
            ));
        }
        if self.text_size == 0 {
            return Err(ConfigError::Validation("text_size must be positive".into()));
        }
        Ok(())
    }
}

/// Load layout config from a TOML file, falling back to defaults when the
/// file doesn't exist. The result is always validated.
pub fn load_config(path: &Path) -> Result<LayoutConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        LayoutConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A documented stock config, printed by `photoboard gen-config`.
pub fn stock_config_toml() -> String {
    let defaults = LayoutConfig::default();
    format!(
        "\
# photoboard layout configuration
# All options are optional; values below are the defaults.

# Tiles per row.
columns = {columns}

# Cell size in board pixels. The image spans the full cell width; the cell
# height covers image + banner + margin.
cell_width = {cell_width}
cell_height = {cell_height}

# Board coordinates of the grid's top-left cell. To resume after an
# interrupted run, shift origin_y below the previous grid.
origin_x = {origin_x}
origin_y = {origin_y}

# Caption banner below each image. Keep the fill light: the board API has
# no text-color control, so dark text on a light banner is the readable
# combination.
banner_height = {banner_height}
banner_margin = {banner_margin}
banner_color = \"{banner_color}\"

# Caption text.
text_size = {text_size}
text_padding_x = {text_padding_x}
",
        columns = defaults.columns,
        cell_width = defaults.cell_width,
        cell_height = defaults.cell_height,
        origin_x = defaults.origin_x,
        origin_y = defaults.origin_y,
        banner_height = defaults.banner_height,
        banner_margin = defaults.banner_margin,
        banner_color = defaults.banner_color,
        text_size = defaults.text_size,
        text_padding_x = defaults.text_padding_x,
    )
}

/// Flickr-side credentials.
#[derive(Debug, Clone)]
pub struct SourceCredentials {
    pub api_key: String,
    pub user_id: String,
    pub photoset_id: String,
}

/// Miro-side credentials.
#[derive(Debug, Clone)]
pub struct BoardCredentials {
    pub token: String,
    pub board_id: String,
}

const SOURCE_ENV_VARS: [&str; 3] = ["FLICKR_API_KEY", "FLICKR_USER_ID", "FLICKR_PHOTOSET_ID"];
const BOARD_ENV_VARS: [&str; 2] = ["MIRO_TOKEN", "MIRO_BOARD_ID"];

impl SourceCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from an arbitrary variable lookup (injectable for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let values = require_all(&SOURCE_ENV_VARS, lookup)?;
        let [api_key, user_id, photoset_id] = values;
        Ok(Self {
            api_key,
            user_id,
            photoset_id,
        })
    }
}

impl BoardCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build from an arbitrary variable lookup (injectable for tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let values = require_all(&BOARD_ENV_VARS, lookup)?;
        let [token, board_id] = values;
        Ok(Self { token, board_id })
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve every variable in `names`, reporting all missing ones at once.
fn require_all<const N: usize>(
    names: &[&str; N],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<[String; N], ConfigError> {
    let mut values = Vec::with_capacity(N);
    let mut missing = Vec::new();
    for name in names {
        match lookup(name) {
            Some(value) => values.push(value),
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        return Err(ConfigError::MissingEnv(missing.join(", ")));
    }
    // Length is N whenever nothing was missing
    Ok(values
        .try_into()
        .unwrap_or_else(|_| unreachable!("one value per name")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_documented_values() {
        let config = LayoutConfig::default();
        assert_eq!(config.columns, 6);
        assert_eq!(config.cell_width, 440);
        assert_eq!(config.cell_height, 420);
        assert_eq!(config.origin_x, 0);
        assert_eq!(config.origin_y, 0);
        assert_eq!(config.banner_height, 60);
        assert_eq!(config.banner_margin, 8);
        assert_eq!(config.banner_color, "#FFFFFF");
        assert_eq!(config.text_size, 18);
        assert_eq!(config.text_padding_x, 8);
    }

    #[test]
    fn defaults_are_valid() {
        LayoutConfig::default().validate().unwrap();
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/photoboard.toml")).unwrap();
        assert_eq!(config.columns, 6);
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "columns = 4\norigin_y = 2000").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.columns, 4);
        assert_eq!(config.origin_y, 2000);
        assert_eq!(config.cell_width, 440);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "colums = 4").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_columns_is_invalid() {
        let config = LayoutConfig {
            columns: 0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn banner_must_fit_within_cell() {
        let config = LayoutConfig {
            cell_height: 60,
            banner_height: 60,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_round_trips_to_defaults() {
        let parsed: LayoutConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert_eq!(parsed.columns, LayoutConfig::default().columns);
        assert_eq!(parsed.banner_color, LayoutConfig::default().banner_color);
        assert_eq!(parsed.cell_height, LayoutConfig::default().cell_height);
    }

    fn lookup_from<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn source_credentials_from_complete_lookup() {
        let vars = HashMap::from([
            ("FLICKR_API_KEY", "key"),
            ("FLICKR_USER_ID", "12345678@N00"),
            ("FLICKR_PHOTOSET_ID", "7215772"),
        ]);
        let creds = SourceCredentials::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.user_id, "12345678@N00");
        assert_eq!(creds.photoset_id, "7215772");
    }

    #[test]
    fn missing_env_vars_reported_together() {
        let vars = HashMap::from([("FLICKR_API_KEY", "key")]);
        let err = SourceCredentials::from_lookup(lookup_from(&vars)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("FLICKR_USER_ID"));
        assert!(message.contains("FLICKR_PHOTOSET_ID"));
        assert!(!message.contains("FLICKR_API_KEY,"));
    }

    #[test]
    fn empty_env_var_counts_as_missing() {
        let vars = HashMap::from([("MIRO_TOKEN", ""), ("MIRO_BOARD_ID", "board-1")]);
        // from_lookup receives the raw lookup; emptiness filtering happens in
        // env_lookup, so mirror it here.
        let lookup = |name: &str| {
            vars.get(name)
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
        };
        let err = BoardCredentials::from_lookup(lookup).unwrap_err();
        assert!(err.to_string().contains("MIRO_TOKEN"));
    }
}
