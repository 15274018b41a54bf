//! Error types for enclosure generation

use enclosure_cad::{CadError, PathError};
use thiserror::Error;

/// Inconsistent box configuration, raised before any geometry is derived
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("edge height ({edge}) has to be at least the Z clearance ({clearance})")]
    EdgeBelowClearance { edge: f64, clearance: f64 },

    #[error("independent bottom fillet parts are not consistent with a fused wall and base")]
    IndependentFilletOnFusedBase,

    #[error("a fused wall and base needs edge_bottom = (0, 0, 0), got {0:?}")]
    FusedBaseBottomEdge([f64; 3]),

    #[error("top footprint {top:?} does not match bottom footprint {bottom:?}")]
    MismatchedFootprint { top: [f64; 2], bottom: [f64; 2] },

    #[error("invalid value {value} for {flag}")]
    InvalidFlag { flag: &'static str, value: u8 },
}

/// A face query on a generated solid found nothing to anchor to
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnchorError {
    #[error("no face with normal along {axis:?} matches {description}")]
    NoMatchingFace { axis: [f64; 3], description: String },
}

/// Any failure while deriving enclosure parts
#[derive(Debug, Clone, Error)]
pub enum BoxError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Anchor error: {0}")]
    Anchor(#[from] AnchorError),

    #[error("CAD error: {0}")]
    Cad(#[from] CadError),

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("wall body length {length} is not positive; the wall is too short for its bands")]
    DegenerateWall { length: f64 },
}

/// Result type for part derivation
pub type BoxResult<T> = Result<T, BoxError>;
