//! Parametric GM328A Enclosure Generator
//!
//! This crate derives the printable parts of a two-part enclosure:
//! - ParametricBox: lid, base, wall, flanges, snaps and fillets from one configuration
//! - Variants: the GM328A tester case and its battery box
//! - Components: footprints and cutters of the parts housed in the case
//! - Anchors: face queries placing components on generated solids
//! - Config: RON configuration files and presets

pub mod anchor;
pub mod component;
pub mod config;
pub mod error;
pub mod fillet;
pub mod parametric_box;
pub mod variant;

pub use anchor::{Extreme, FaceAnchor, extreme_edges, extreme_face, face_at};
pub use config::{
    BaseType, BoxConfig, ConfigFileError, CornersType, EnclosureFile, FilletKind, FilletType,
    Side, SnapType, VariantKind, presets,
};
pub use error::{AnchorError, BoxError, BoxResult, ConfigError};
pub use fillet::{FilletProfile, ParametricFillet, ProfilePlacement};
pub use parametric_box::{ParametricBox, SnapAxis, WallSketch};
pub use variant::{Enclosure, Gm328aBattery, Gm328aCase, PartKind, build};

/// Extra length given to cutters so they pierce the faces they open
pub(crate) const CUT_OVERLAP: f64 = 0.01;
