use pigment_mix::{CompositionError, Medium, PaintError, PaintSetError, ParseColorError};
use thiserror::Error;

/// Errors surfaced by the color mixer service and the RPC boundary.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("Invalid color {input:?}: {source}")]
    InvalidColor {
        input: String,
        #[source]
        source: ParseColorError,
    },

    #[error("Paint set error: {0}")]
    PaintSet(#[from] PaintSetError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Color mixer worker unavailable")]
    WorkerUnavailable,
}

impl ServiceError {
    pub fn invalid_color(input: &str, source: ParseColorError) -> Self {
        ServiceError::InvalidColor {
            input: input.to_string(),
            source,
        }
    }

    /// Stable machine-readable kind, used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidColor { .. } => "invalid_color",
            ServiceError::PaintSet(_) => "paint_set",
            ServiceError::Composition(_) => "composition",
            ServiceError::Catalog(_) => "catalog",
            ServiceError::WorkerUnavailable => "worker_unavailable",
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(e: CatalogError) -> Self {
        ServiceError::Catalog(e.to_string())
    }
}

/// Errors from loading or querying the paint catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown paint {brand}:{id} ({medium})")]
    UnknownPaint {
        medium: Medium,
        brand: String,
        id: u32,
    },

    #[error("Unknown paint set {name:?} of brand {brand}")]
    UnknownPaintSet { brand: String, name: String },

    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Invalid paint in {file}: {source}")]
    Paint {
        file: String,
        #[source]
        source: PaintError,
    },

    #[error("Paint set error: {0}")]
    PaintSet(#[from] PaintSetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_display() {
        let error = ServiceError::invalid_color("#12", ParseColorError::InvalidLength);
        assert_eq!(
            error.to_string(),
            "Invalid color \"#12\": invalid hex color length (expected 3 or 6 characters)"
        );
        assert_eq!(error.kind(), "invalid_color");
    }

    #[test]
    fn test_worker_unavailable_display() {
        let error = ServiceError::WorkerUnavailable;
        assert_eq!(error.to_string(), "Color mixer worker unavailable");
        assert_eq!(error.kind(), "worker_unavailable");
    }

    #[test]
    fn test_composition_from() {
        let error: ServiceError = CompositionError::ZeroTotalFraction.into();
        assert_eq!(error.kind(), "composition");
        assert_eq!(
            error.to_string(),
            "Composition error: total fraction of composition is zero"
        );
    }

    #[test]
    fn test_catalog_error_unknown_paint() {
        let error = CatalogError::UnknownPaint {
            medium: Medium::Oil,
            brand: "acme".to_string(),
            id: 42,
        };
        assert_eq!(error.to_string(), "Unknown paint acme:42 (oil)");
    }

    #[test]
    fn test_catalog_error_into_service_error() {
        let error: ServiceError = CatalogError::UnknownPaintSet {
            brand: "acme".to_string(),
            name: "Basics".to_string(),
        }
        .into();
        assert_eq!(error.kind(), "catalog");
        assert_eq!(
            error.to_string(),
            "Catalog error: Unknown paint set \"Basics\" of brand acme"
        );
    }
}
