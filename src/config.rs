use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub loading: LoadingConfig,
    pub branding: BrandingConfig,
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub per_page: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { per_page: 10 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadingConfig {
    pub tick_ms: u64,
    pub step_percent: u8,
    pub cap_percent: u8,
    pub reset_delay_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            step_percent: 5,
            cap_percent: 95,
            reset_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Brand {
    pub logo: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrandingConfig {
    pub image_path: String,
    pub brands: BTreeMap<String, Brand>,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            image_path: "/img/".to_string(),
            brands: default_brands(),
        }
    }
}

impl BrandingConfig {
    pub fn brand(&self, id: &str) -> Option<&Brand> {
        self.brands.get(id)
    }

    /// Joins the configured image path with a logo asset filename.
    pub fn asset_path(&self, logo: &str) -> String {
        if self.image_path.ends_with('/') {
            format!("{}{logo}", self.image_path)
        } else {
            format!("{}/{logo}", self.image_path)
        }
    }
}

fn default_brands() -> BTreeMap<String, Brand> {
    let mut brands = BTreeMap::new();
    brands.insert(
        "google".to_string(),
        Brand {
            logo: "google.svg".to_string(),
            url: "https://cse.google.com".to_string(),
        },
    );
    brands.insert(
        "algolia".to_string(),
        Brand {
            logo: "algolia.svg".to_string(),
            url: "https://www.algolia.com".to_string(),
        },
    );
    brands.insert(
        "hexo".to_string(),
        Brand {
            logo: String::new(),
            url: String::new(),
        },
    );
    brands.insert(
        "azure".to_string(),
        Brand {
            logo: "azure.svg".to_string(),
            url: "https://azure.microsoft.com/en-us/services/search/".to_string(),
        },
    );
    brands.insert(
        "baidu".to_string(),
        Brand {
            logo: "baidu.svg".to_string(),
            url: "http://zn.baidu.com/cse/home/index".to_string(),
        },
    );
    brands
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.search.per_page = self.search.per_page.max(1);
        self.loading.tick_ms = self.loading.tick_ms.max(1);
        self.loading.step_percent = self.loading.step_percent.clamp(1, 100);
        // The bar must stay short of 100% while a query is in flight.
        self.loading.cap_percent = self.loading.cap_percent.clamp(1, 99);
        self.loading.reset_delay_ms = self.loading.reset_delay_ms.max(1);
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("USEARCH_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("usearch").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("usearch")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("usearch").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("usearch_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn defaults_match_the_stock_widget() {
        let config = Config::default();
        assert_eq!(config.search.per_page, 10);
        assert_eq!(config.branding.image_path, "/img/");
        assert_eq!(config.loading.tick_ms, 100);
        assert_eq!(config.loading.step_percent, 5);
        assert_eq!(config.loading.cap_percent, 95);
        assert_eq!(config.loading.reset_delay_ms, 300);

        let google = config
            .branding
            .brand("google")
            .expect("google brand should exist");
        assert_eq!(google.logo, "google.svg");
        assert_eq!(google.url, "https://cse.google.com");

        let hexo = config
            .branding
            .brand("hexo")
            .expect("hexo brand should exist");
        assert!(hexo.logo.is_empty());
        assert_eq!(config.branding.brands.len(), 5);
    }

    #[test]
    fn asset_path_joins_with_and_without_trailing_slash() {
        let mut config = Config::default();
        assert_eq!(config.branding.asset_path("google.svg"), "/img/google.svg");

        config.branding.image_path = "/assets".to_string();
        assert_eq!(config.branding.asset_path("baidu.svg"), "/assets/baidu.svg");
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [search]
            per_page = 0

            [loading]
            step_percent = 0
            cap_percent = 100

            [branding]
            image_path = "/static/"
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.search.per_page, 1);
        assert_eq!(config.loading.step_percent, 1);
        assert_eq!(config.loading.cap_percent, 99);
        assert_eq!(config.loading.tick_ms, 100);
        assert_eq!(config.branding.image_path, "/static/");
        // Overriding one branding field keeps the default brand table.
        assert!(config.branding.brand("algolia").is_some());

        fs::remove_file(&path).expect("config file should be removed");
    }
}
