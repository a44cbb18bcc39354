//! Paint catalog lookup.
//!
//! Resolves `(medium, brand, id)` to a [`Paint`] and paint set definitions to
//! a [`PaintSet`].

use crate::assets::AssetLoader;
use crate::error::CatalogError;
use crate::models::{CatalogFile, PaintSetDefinition};
use pigment_mix::{Medium, Paint, PaintKey, PaintSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one brand, for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInfo {
    pub brand: String,
    pub full_name: Option<String>,
    pub medium: Medium,
    pub paint_count: usize,
    pub sets: Vec<String>,
}

#[derive(Debug, Clone)]
struct BrandEntry {
    full_name: Option<String>,
    paints: Vec<Paint>,
    sets: BTreeMap<String, Vec<u32>>,
}

/// All known paints, grouped by medium and brand
#[derive(Debug, Clone, Default)]
pub struct PaintCatalog {
    brands: BTreeMap<(Medium, String), BrandEntry>,
}

impl PaintCatalog {
    /// Parse one catalog file
    pub fn parse(file: &str, content: &str) -> Result<CatalogFile, CatalogError> {
        serde_yaml::from_str(content).map_err(|e| CatalogError::Parse {
            file: file.to_string(),
            message: e.to_string(),
        })
    }

    /// Build a catalog from parsed files, named for error messages
    pub fn from_files(
        files: impl IntoIterator<Item = (String, CatalogFile)>,
    ) -> Result<Self, CatalogError> {
        let mut brands = BTreeMap::new();

        for (name, file) in files {
            let key = (file.medium, file.brand.clone());
            if brands.contains_key(&key) {
                return Err(CatalogError::Parse {
                    file: name,
                    message: format!("brand {} ({}) is defined twice", file.brand, file.medium),
                });
            }

            let mut paints = Vec::with_capacity(file.paints.len());
            for entry in &file.paints {
                let rgb = entry.hex.parse().map_err(|e| CatalogError::Parse {
                    file: name.clone(),
                    message: format!("paint {}: invalid color {:?}: {e}", entry.id, entry.hex),
                })?;
                let mut paint = Paint::new(&file.brand, entry.id, &entry.name, file.medium, rgb);
                if let Some(ref samples) = entry.reflectance {
                    paint = paint
                        .with_reflectance(samples)
                        .map_err(|source| CatalogError::Paint {
                            file: name.clone(),
                            source,
                        })?;
                }
                if paints.iter().any(|p: &Paint| p.id == paint.id) {
                    return Err(CatalogError::Parse {
                        file: name,
                        message: format!("paint id {} is listed twice", paint.id),
                    });
                }
                paints.push(paint);
            }

            for (set_name, ids) in &file.sets {
                if let Some(missing) = ids.iter().find(|id| !paints.iter().any(|p| p.id == **id)) {
                    return Err(CatalogError::Parse {
                        file: name,
                        message: format!("set {set_name:?} lists unknown paint {missing}"),
                    });
                }
            }

            tracing::debug!(
                file = %name,
                brand = %file.brand,
                medium = %file.medium,
                paints = paints.len(),
                "Loaded catalog file"
            );
            brands.insert(
                key,
                BrandEntry {
                    full_name: file.full_name,
                    paints,
                    sets: file.sets,
                },
            );
        }

        Ok(Self { brands })
    }

    /// Load every catalog file from the asset loader
    pub fn load_from_assets(loader: &AssetLoader) -> Result<Self, CatalogError> {
        let mut files = Vec::new();
        for name in loader.list_catalog() {
            let content = loader.read_catalog_string(&name)?;
            let file = Self::parse(&name, &content)?;
            files.push((name, file));
        }
        let catalog = Self::from_files(files)?;
        tracing::info!(
            brands = catalog.brands.len(),
            paints = catalog.len(),
            "Loaded paint catalog"
        );
        Ok(catalog)
    }

    /// Total number of paints
    pub fn len(&self) -> usize {
        self.brands.values().map(|b| b.paints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Media with at least one brand
    pub fn media(&self) -> Vec<Medium> {
        let mut media: Vec<Medium> = self.brands.keys().map(|(m, _)| *m).collect();
        media.dedup();
        media
    }

    /// Brands of one medium, sorted by brand key
    pub fn brands(&self, medium: Medium) -> Vec<BrandInfo> {
        self.brands
            .iter()
            .filter(|((m, _), _)| *m == medium)
            .map(|((m, brand), entry)| BrandInfo {
                brand: brand.clone(),
                full_name: entry.full_name.clone(),
                medium: *m,
                paint_count: entry.paints.len(),
                sets: entry.sets.keys().cloned().collect(),
            })
            .collect()
    }

    fn entry(&self, medium: Medium, brand: &str) -> Option<&BrandEntry> {
        self.brands.get(&(medium, brand.to_string()))
    }

    /// Paints of one brand in catalog order
    pub fn paints(&self, medium: Medium, brand: &str) -> Option<&[Paint]> {
        self.entry(medium, brand).map(|e| e.paints.as_slice())
    }

    pub fn get(&self, medium: Medium, brand: &str, id: u32) -> Result<&Paint, CatalogError> {
        self.entry(medium, brand)
            .and_then(|e| e.paints.iter().find(|p| p.id == id))
            .ok_or_else(|| CatalogError::UnknownPaint {
                medium,
                brand: brand.to_string(),
                id,
            })
    }

    /// Look up several paints by key
    pub fn get_all(&self, medium: Medium, keys: &[PaintKey]) -> Result<Vec<Paint>, CatalogError> {
        keys.iter()
            .map(|key| self.get(medium, &key.brand, key.id).cloned())
            .collect()
    }

    /// Paint ids of a store-bought set
    pub fn store_bought_set(
        &self,
        medium: Medium,
        brand: &str,
        name: &str,
    ) -> Result<&[u32], CatalogError> {
        self.entry(medium, brand)
            .and_then(|e| e.sets.get(name))
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::UnknownPaintSet {
                brand: brand.to_string(),
                name: name.to_string(),
            })
    }

    /// Turn a definition into a validated paint set.
    ///
    /// Brands are taken in the order they were selected (or key order when
    /// none are listed), paints in the order given.
    pub fn resolve(&self, definition: &PaintSetDefinition) -> Result<PaintSet, CatalogError> {
        let medium = definition.medium;
        let brands: Vec<&String> = if definition.brands.is_empty() {
            let mut brands: Vec<&String> = definition.colors.keys().collect();
            if let Some(set) = &definition.store_bought_paint_set {
                if !brands.contains(&&set.brand) {
                    brands.push(&set.brand);
                }
            }
            brands
        } else {
            definition.brands.iter().collect()
        };

        let mut paints = Vec::new();
        for brand in brands {
            let listed = definition
                .colors
                .get(brand)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let ids = match &definition.store_bought_paint_set {
                Some(set) if listed.is_empty() && &set.brand == brand => {
                    self.store_bought_set(medium, brand, &set.name)?
                }
                _ => listed,
            };
            for &id in ids {
                paints.push(self.get(medium, brand, id)?.clone());
            }
        }

        Ok(PaintSet::new(medium, paints)?)
    }
}
