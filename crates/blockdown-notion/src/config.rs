//! Configuration file loading and CLI/env resolution.

use std::fs;
use std::path::{Path, PathBuf};

use blockdown::{ExportOptions, NameCollision};
use serde::Deserialize;

use crate::{ConfigError, Result};

/// Contents of a `blockdown.toml` file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Page exported as `index.md`
    #[serde(default)]
    pub root_page_id: Option<String>,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_indent_unit")]
    pub indent_unit: String,

    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    #[serde(default = "default_file_dir")]
    pub file_dir: String,

    /// Replaces the built-in list when present
    #[serde(default)]
    pub skip_phrases: Option<Vec<String>>,

    /// "disambiguate" (default) or "overwrite"
    #[serde(default)]
    pub name_collision: CollisionSetting,

    /// Wrap link destinations containing spaces in `<...>`
    #[serde(default)]
    pub angle_bracket_links: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionSetting {
    #[default]
    Disambiguate,
    Overwrite,
}

impl From<CollisionSetting> for NameCollision {
    fn from(setting: CollisionSetting) -> Self {
        match setting {
            CollisionSetting::Disambiguate => NameCollision::Disambiguate,
            CollisionSetting::Overwrite => NameCollision::Overwrite,
        }
    }
}

/// Notion API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_notion_version")]
    pub notion_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Children requested per call, at most 100
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            indent_unit: default_indent_unit(),
            image_dir: default_image_dir(),
            file_dir: default_file_dir(),
            skip_phrases: None,
            name_collision: CollisionSetting::default(),
            angle_bracket_links: false,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            notion_version: default_notion_version(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    ExportOptions::default().output_dir
}

fn default_indent_unit() -> String {
    ExportOptions::default().indent_unit
}

fn default_image_dir() -> String {
    ExportOptions::default().image_dir
}

fn default_file_dir() -> String {
    ExportOptions::default().file_dir
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_notion_version() -> String {
    "2022-06-28".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_page_id: Option<String>,
    pub token: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub indent_unit: Option<String>,
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub root_page_id: String,
    pub token: String,
    pub options: ExportOptions,
    pub api: ApiSettings,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge command line values over the file and check required settings
    pub fn resolve(self, overrides: Overrides) -> Result<Settings> {
        let root_page_id = non_blank(overrides.root_page_id)
            .or_else(|| non_blank(self.root_page_id))
            .ok_or(ConfigError::MissingRootPage)?;
        let token = non_blank(overrides.token).ok_or(ConfigError::MissingToken)?;

        let export = self.export;
        let defaults = ExportOptions::default();
        let options = ExportOptions {
            output_dir: overrides.output_dir.unwrap_or(export.output_dir),
            indent_unit: overrides.indent_unit.unwrap_or(export.indent_unit),
            image_dir: export.image_dir,
            file_dir: export.file_dir,
            skip_phrases: export.skip_phrases.unwrap_or(defaults.skip_phrases),
            name_collision: export.name_collision.into(),
            angle_bracket_links: export.angle_bracket_links,
            ..defaults
        };

        Ok(Settings {
            root_page_id,
            token,
            options,
            api: self.api,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> Overrides {
        Overrides {
            root_page_id: Some("root".to_string()),
            token: Some("secret".to_string()),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("docs"));
        assert_eq!(config.export.indent_unit, "    ");
        assert_eq!(config.api.base_url, "https://api.notion.com/v1");
        assert_eq!(config.api.notion_version, "2022-06-28");
        assert_eq!(config.api.page_size, 100);
    }

    #[test]
    fn test_parse_tables() {
        let config = Config::from_toml(
            r#"
root_page_id = "abc"

[export]
output_dir = "site/docs"
indent_unit = "  "
skip_phrases = ["Back to top"]
name_collision = "overwrite"
angle_bracket_links = true

[api]
timeout_secs = 5
"#,
        )
        .unwrap();

        assert_eq!(config.root_page_id.as_deref(), Some("abc"));
        assert_eq!(config.export.output_dir, PathBuf::from("site/docs"));
        assert_eq!(config.export.image_dir, "images");
        assert_eq!(config.export.name_collision, CollisionSetting::Overwrite);
        assert!(config.export.angle_bracket_links);
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.page_size, 100);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            Config::from_toml("[export\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml("[export]\nname_collision = \"rename\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockdown.toml");
        fs::write(&path, "[export]\nindent_unit = \"\\t\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.export.indent_unit, "\t");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Config::default().resolve(with_credentials()).unwrap();
        assert_eq!(settings.root_page_id, "root");
        assert_eq!(settings.token, "secret");
        assert_eq!(settings.options.output_dir, PathBuf::from("docs"));
        assert_eq!(settings.options.skip_phrases.len(), 4);
        assert_eq!(settings.options.name_collision, NameCollision::Disambiguate);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = Config::from_toml(
            "root_page_id = \"from-file\"\n[export]\noutput_dir = \"file-dir\"\nindent_unit = \"\\t\"\n",
        )
        .unwrap();
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("cli-dir")),
            ..with_credentials()
        };

        let settings = config.resolve(overrides).unwrap();
        assert_eq!(settings.root_page_id, "root");
        assert_eq!(settings.options.output_dir, PathBuf::from("cli-dir"));
        assert_eq!(settings.options.indent_unit, "\t");
    }

    #[test]
    fn test_root_page_from_file() {
        let config = Config::from_toml("root_page_id = \"from-file\"\n").unwrap();
        let overrides = Overrides {
            root_page_id: None,
            ..with_credentials()
        };
        let settings = config.resolve(overrides).unwrap();
        assert_eq!(settings.root_page_id, "from-file");
    }

    #[test]
    fn test_missing_root_page() {
        let overrides = Overrides {
            root_page_id: Some("   ".to_string()),
            ..with_credentials()
        };
        assert!(matches!(
            Config::default().resolve(overrides),
            Err(ConfigError::MissingRootPage)
        ));
    }

    #[test]
    fn test_missing_token() {
        let overrides = Overrides {
            token: None,
            ..with_credentials()
        };
        assert!(matches!(
            Config::default().resolve(overrides),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_custom_skip_phrases_replace_defaults() {
        let config = Config::from_toml("[export]\nskip_phrases = []\n").unwrap();
        let settings = config.resolve(with_credentials()).unwrap();
        assert!(settings.options.skip_phrases.is_empty());
        assert!(!settings.options.is_boilerplate("TOPへ戻る"));
    }
}
