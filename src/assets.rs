//! Asset loading with embedded fallbacks
//!
//! The paint catalog and the config file ship inside the binary. Either can
//! be overridden from the filesystem:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set and the path is empty/missing: seed it with the embedded assets
//! - If an env var IS set and the path has files: use filesystem with embedded fallback

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded paint catalog (one YAML file per brand and medium)
#[derive(RustEmbed)]
#[folder = "catalog/"]
#[include = "*.yaml"]
struct EmbeddedCatalog;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Catalog,
    Config,
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub catalog_seeded: Vec<String>,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.catalog_seeded.is_empty() && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with merge behavior and optional filesystem override
pub struct AssetLoader {
    /// External catalog directory (from CATALOG_DIR env var)
    catalog_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(catalog_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            catalog_dir,
            config_file,
        }
    }

    /// Create a loader from `CATALOG_DIR` and `CONFIG_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CATALOG_DIR").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    /// Read one catalog file, filesystem first if configured.
    pub fn read_catalog(&self, name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.catalog_dir {
            let full_path = dir.join(name);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading catalog file from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        EmbeddedCatalog::get(name)
            .map(|f| {
                tracing::trace!(file = %name, "Loading catalog file from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Catalog file not found: {name}"),
                )
            })
    }

    /// Read one catalog file as a UTF-8 string
    pub fn read_catalog_string(&self, name: &str) -> io::Result<String> {
        let bytes = self.read_catalog(name)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// All catalog files (merged view of embedded + external), sorted
    pub fn list_catalog(&self) -> Vec<String> {
        let mut files: BTreeSet<String> =
            EmbeddedCatalog::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.catalog_dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.ends_with(".yaml") || name.ends_with(".yml") {
                            files.insert(name.to_string());
                        }
                    }
                }
            }
        }

        files.into_iter().collect()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Check if a directory exists and is empty (ignoring .gitkeep)
    fn is_empty_dir(path: &Path) -> bool {
        if !path.is_dir() {
            return false;
        }
        path.read_dir()
            .map(|mut entries| {
                entries.all(|e| {
                    e.map(|entry| entry.file_name() == ".gitkeep")
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    fn write_catalog(dir: &Path, force: bool, report: &mut InitReport) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        for file in EmbeddedCatalog::iter() {
            let path = dir.join(file.as_ref());
            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if let Some(data) = EmbeddedCatalog::get(&file) {
                fs::write(&path, &*data.data)?;
                report.written.push(path.display().to_string());
            }
        }
        Ok(())
    }

    fn write_config(path: &Path, force: bool, report: &mut InitReport) -> io::Result<()> {
        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedConfig::get("config.yaml") {
            fs::write(path, &*data.data)?;
            report.written.push(path.display().to_string());
        }
        Ok(())
    }

    /// Seed empty/missing configured paths with embedded assets
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        if let Some(ref dir) = self.catalog_dir {
            if !dir.exists() || Self::is_empty_dir(dir) {
                let mut written = InitReport::default();
                Self::write_catalog(dir, false, &mut written)?;
                report.catalog_seeded = written.written;
                if !report.catalog_seeded.is_empty() {
                    tracing::info!(
                        dir = %dir.display(),
                        count = report.catalog_seeded.len(),
                        "Seeded catalog directory with embedded assets"
                    );
                }
            }
        }

        if let Some(ref path) = self.config_file {
            if !path.exists() {
                let mut written = InitReport::default();
                Self::write_config(path, false, &mut written)?;
                report.config_seeded = !written.written.is_empty();
                if report.config_seeded {
                    tracing::info!(path = %path.display(), "Seeded config file with embedded default");
                }
            }
        }

        Ok(report)
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Catalog => {
                    let dir = self
                        .catalog_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./catalog"));
                    Self::write_catalog(&dir, force, &mut report)?;
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));
                    Self::write_config(&path, force, &mut report)?;
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Catalog => EmbeddedCatalog::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_present() {
        let loader = AssetLoader::new(None, None);
        let files = loader.list_catalog();
        assert!(files.iter().any(|f| f == "studio_oil.yaml"));
        assert!(loader.read_catalog_string("studio_oil.yaml").is_ok());
        assert!(loader.read_catalog("missing.yaml").is_err());
    }

    #[test]
    fn test_embedded_config_present() {
        let loader = AssetLoader::new(None, None);
        let config = loader.read_config_string().unwrap();
        assert!(config.contains("default_background"));
    }

    #[test]
    fn test_filesystem_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("studio_oil.yaml"), "brand: override\n").unwrap();
        fs::write(dir.path().join("extra.yaml"), "brand: extra\n").unwrap();

        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        assert_eq!(
            loader.read_catalog_string("studio_oil.yaml").unwrap(),
            "brand: override\n"
        );
        assert!(loader.list_catalog().contains(&"extra.yaml".to_string()));
    }

    #[test]
    fn test_seed_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog");
        let config = dir.path().join("conf").join("config.yaml");

        let loader = AssetLoader::new(Some(catalog.clone()), Some(config.clone()));
        let report = loader.seed_if_configured().unwrap();
        assert!(!report.is_empty());
        assert!(report.config_seeded);
        assert!(catalog.join("studio_oil.yaml").exists());
        assert!(config.exists());

        // Second run leaves existing files alone
        let report = loader.seed_if_configured().unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_init_skips_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "custom").unwrap();

        let loader = AssetLoader::new(None, Some(config.clone()));
        let report = loader.init(&[AssetCategory::Config], false).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(fs::read_to_string(&config).unwrap(), "custom");

        let report = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(report.written.len(), 1);
        assert_ne!(fs::read_to_string(&config).unwrap(), "custom");
    }
}
