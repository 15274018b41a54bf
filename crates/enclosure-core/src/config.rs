//! Box configuration
//!
//! [`BoxConfig`] carries every construction parameter of a
//! [`ParametricBox`](crate::ParametricBox). Integer-coded options are
//! `#[repr(u8)]` enums whose discriminants are the documented codes, so
//! numeric settings convert with `TryFrom<u8>`. Configurations are stored as
//! RON files.

use std::path::Path;

use glam::DVec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How the base joins the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BaseType {
    /// Base and wall are one part
    Fused = 0,
    /// Base is a separate part held by a flange
    #[default]
    Detachable = 1,
}

impl TryFrom<u8> for BaseType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fused),
            1 => Ok(Self::Detachable),
            _ => Err(ConfigError::InvalidFlag {
                flag: "base_type",
                value,
            }),
        }
    }
}

/// Treatment of the vertical (Z) corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CornersType {
    Straight = 0,
    #[default]
    Fillet = 1,
    Chamfer = 2,
}

impl TryFrom<u8> for CornersType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Straight),
            1 => Ok(Self::Fillet),
            2 => Ok(Self::Chamfer),
            _ => Err(ConfigError::InvalidFlag {
                flag: "corners_type",
                value,
            }),
        }
    }
}

/// Edge treatment where a shell meets the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum FilletType {
    None = 0,
    /// Rounded edge on the shell itself
    IntegratedFillet = 1,
    /// Separate swept fillet part
    IndependentFillet = 2,
    /// Chamfered edge on the shell itself
    IntegratedChamfer = 3,
    /// Separate swept chamfer part
    #[default]
    IndependentChamfer = 4,
}

impl FilletType {
    /// True when the treatment is a separate part and the shell is inset for it
    pub fn is_independent(self) -> bool {
        matches!(self, Self::IndependentFillet | Self::IndependentChamfer)
    }
}

impl TryFrom<u8> for FilletType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::IntegratedFillet),
            2 => Ok(Self::IndependentFillet),
            3 => Ok(Self::IntegratedChamfer),
            4 => Ok(Self::IndependentChamfer),
            _ => Err(ConfigError::InvalidFlag {
                flag: "fillet_type",
                value,
            }),
        }
    }
}

/// Which sides of a detachable shell get snap latches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SnapType {
    None = 0,
    #[default]
    ShortSide = 1,
    LongSide = 2,
    Both = 3,
}

impl TryFrom<u8> for SnapType {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::ShortSide),
            2 => Ok(Self::LongSide),
            3 => Ok(Self::Both),
            _ => Err(ConfigError::InvalidFlag {
                flag: "snap",
                value,
            }),
        }
    }
}

/// Bottom or top end of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    Bottom = 0,
    Top = 1,
}

impl TryFrom<u8> for Side {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bottom),
            1 => Ok(Self::Top),
            _ => Err(ConfigError::InvalidFlag {
                flag: "side",
                value,
            }),
        }
    }
}

/// Cross-section family of a swept fillet part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FilletKind {
    /// Fillet held to the wall by a snap bead
    Snapped = 0,
    /// Fillet locked in place by the lid or base
    LidLock = 1,
}

impl TryFrom<u8> for FilletKind {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Snapped),
            1 => Ok(Self::LidLock),
            _ => Err(ConfigError::InvalidFlag {
                flag: "fillet_kind",
                value,
            }),
        }
    }
}

fn default_edge() -> DVec3 {
    DVec3::ONE
}

fn default_corners_size() -> f64 {
    3.5
}

fn default_fillet_dim() -> DVec3 {
    DVec3::splat(2.0)
}

fn default_fillet_size() -> f64 {
    1.5
}

fn default_flange_width() -> f64 {
    2.0
}

fn default_flange_height() -> f64 {
    4.0
}

/// Construction parameters of a parametric box.
///
/// Dimension triples are `(X, Y, Z)`. For `dim_top` and `dim_bottom` the Z
/// component is the shell thickness; `dim_wall` is `(wall thickness, unused,
/// wall height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    /// External lid dimensions, Z is the lid thickness
    pub dim_top: DVec3,
    /// External base dimensions, Z is the base thickness
    pub dim_bottom: DVec3,
    /// Wall thickness (X) and height (Z)
    pub dim_wall: DVec3,
    /// Gaps between mating parts
    pub clearance: DVec3,
    #[serde(default)]
    pub pos_top: DVec3,
    #[serde(default)]
    pub pos_bottom: DVec3,
    #[serde(default)]
    pub base_type: BaseType,
    /// Width (X) and height (Z) of the lid lip that overhangs the wall
    #[serde(default = "default_edge")]
    pub edge_top: DVec3,
    /// Same for the base; must be zero for a fused base
    #[serde(default = "default_edge")]
    pub edge_bottom: DVec3,
    #[serde(default)]
    pub corners_type: CornersType,
    /// Radius or chamfer size of the vertical corners
    #[serde(default = "default_corners_size")]
    pub corners_size: f64,
    #[serde(default)]
    pub fillet_type_top: FilletType,
    /// Width (X, Y) and height (Z) reserved for an independent top fillet
    #[serde(default = "default_fillet_dim")]
    pub fillet_dim_top: DVec3,
    /// Radius or chamfer size of an integrated top treatment
    #[serde(default = "default_fillet_size")]
    pub fillet_size_top: f64,
    /// Add a snap rib between the top fillet and the wall
    #[serde(default)]
    pub fillet_snap_top: bool,
    #[serde(default)]
    pub fillet_type_bottom: FilletType,
    #[serde(default = "default_fillet_dim")]
    pub fillet_dim_bottom: DVec3,
    #[serde(default = "default_fillet_size")]
    pub fillet_size_bottom: f64,
    #[serde(default)]
    pub fillet_snap_bottom: bool,
    #[serde(default = "default_flange_width")]
    pub flange_width_top: f64,
    #[serde(default = "default_flange_height")]
    pub flange_height_top: f64,
    #[serde(default = "default_flange_width")]
    pub flange_width_bottom: f64,
    #[serde(default = "default_flange_height")]
    pub flange_height_bottom: f64,
    #[serde(default)]
    pub snap_top: SnapType,
    #[serde(default)]
    pub snap_bottom: SnapType,
}

impl BoxConfig {
    /// Configuration with the given dimensions and every option at its default
    pub fn new(dim_top: DVec3, dim_bottom: DVec3, dim_wall: DVec3, clearance: DVec3) -> Self {
        Self {
            dim_top,
            dim_bottom,
            dim_wall,
            clearance,
            pos_top: DVec3::ZERO,
            pos_bottom: DVec3::ZERO,
            base_type: BaseType::default(),
            edge_top: default_edge(),
            edge_bottom: default_edge(),
            corners_type: CornersType::default(),
            corners_size: default_corners_size(),
            fillet_type_top: FilletType::default(),
            fillet_dim_top: default_fillet_dim(),
            fillet_size_top: default_fillet_size(),
            fillet_snap_top: false,
            fillet_type_bottom: FilletType::default(),
            fillet_dim_bottom: default_fillet_dim(),
            fillet_size_bottom: default_fillet_size(),
            fillet_snap_bottom: false,
            flange_width_top: default_flange_width(),
            flange_height_top: default_flange_height(),
            flange_width_bottom: default_flange_width(),
            flange_height_bottom: default_flange_height(),
            snap_top: SnapType::default(),
            snap_bottom: SnapType::default(),
        }
    }

    /// Check option consistency, in a fixed order
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.edge_top.z < self.clearance.z {
            return Err(ConfigError::EdgeBelowClearance {
                edge: self.edge_top.z,
                clearance: self.clearance.z,
            });
        }
        if self.base_type == BaseType::Fused && self.fillet_type_bottom.is_independent() {
            return Err(ConfigError::IndependentFilletOnFusedBase);
        }
        if self.base_type == BaseType::Fused && self.edge_bottom != DVec3::ZERO {
            return Err(ConfigError::FusedBaseBottomEdge(self.edge_bottom.to_array()));
        }
        if self.dim_top.x != self.dim_bottom.x || self.dim_top.y != self.dim_bottom.y {
            return Err(ConfigError::MismatchedFootprint {
                top: self.dim_top.truncate().to_array(),
                bottom: self.dim_bottom.truncate().to_array(),
            });
        }
        Ok(())
    }

    /// Overall height: base, wall and lid plus the two Z clearances
    pub fn height(&self) -> f64 {
        self.dim_bottom.z + self.dim_wall.z + self.dim_top.z + 2.0 * self.clearance.z
    }

    /// Save the configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigFileError> {
        write_ron(self, path.as_ref())
    }

    /// Load and validate a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let config: BoxConfig = read_ron(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigFileError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Parse and validate a configuration
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigFileError> {
        let config: BoxConfig =
            ron::from_str(content).map_err(|e| ConfigFileError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Which enclosure a file describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariantKind {
    /// A plain parametric box without component cutouts
    Plain,
    /// GM328A tester case
    #[default]
    Case,
    /// Battery compartment that docks onto the case
    Battery,
}

/// Enclosure document read by the command line tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnclosureFile {
    #[serde(default)]
    pub variant: VariantKind,
    pub config: BoxConfig,
}

impl EnclosureFile {
    pub fn new(variant: VariantKind, config: BoxConfig) -> Self {
        Self { variant, config }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigFileError> {
        write_ron(self, path.as_ref())
    }

    /// Load a document; its configuration is validated
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let file: EnclosureFile = read_ron(path.as_ref())?;
        file.config.validate()?;
        Ok(file)
    }
}

fn write_ron<T: Serialize>(value: &T, path: &Path) -> Result<(), ConfigFileError> {
    let content = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    Ok(())
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    ron::from_str(&content).map_err(|e| ConfigFileError::Deserialize(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Dimensions of the GM328A enclosures
pub mod presets {
    use glam::DVec3;

    use super::BoxConfig;
    use crate::component::{Battery, Board};

    /// Horizontal gap between mating parts
    pub const CLEARANCE_XY: f64 = 0.2;

    /// Vertical gap between mating parts
    pub const CLEARANCE_Z: f64 = 0.2;

    /// Shell and wall thickness
    pub const SHELL: f64 = 2.0;

    /// Inside height: board, tallest component, solder side and headroom
    pub const INTERIOR_HEIGHT: f64 = 1.52 + 15.1 + 4.0 + 2.0;

    fn clearance() -> DVec3 {
        DVec3::new(CLEARANCE_XY, CLEARANCE_XY, CLEARANCE_Z)
    }

    fn wall() -> DVec3 {
        DVec3::new(SHELL, SHELL, INTERIOR_HEIGHT - 2.0 * SHELL - 2.0 * CLEARANCE_Z)
    }

    fn footprint_y() -> f64 {
        Board::SIZE.y + 2.0 * (SHELL + CLEARANCE_XY) + SHELL
    }

    /// Case around the tester board
    pub fn gm328a_case() -> BoxConfig {
        let x = Board::SIZE.x + 2.0 * (SHELL + CLEARANCE_XY) + SHELL;
        let dim = DVec3::new(x, footprint_y(), SHELL);
        BoxConfig::new(dim, dim, wall(), clearance())
    }

    /// Battery compartment, as deep as the case
    pub fn gm328a_battery() -> BoxConfig {
        let x = Battery::SIZE.x + 4.0 * (SHELL + CLEARANCE_XY) + SHELL + 2.0 * CLEARANCE_XY;
        let dim = DVec3::new(x, footprint_y(), SHELL);
        BoxConfig::new(dim, dim, wall(), clearance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> BoxConfig {
        let dim = DVec3::new(99.9, 74.2, 2.0);
        BoxConfig::new(dim, dim, DVec3::new(2.0, 2.0, 8.86), DVec3::splat(0.2))
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.base_type, BaseType::Detachable);
        assert_eq!(config.corners_type, CornersType::Fillet);
        assert_eq!(config.fillet_type_top, FilletType::IndependentChamfer);
        assert_eq!(config.snap_top, SnapType::ShortSide);
        assert_eq!(config.edge_top, DVec3::ONE);
        assert_relative_eq!(config.corners_size, 3.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_height() {
        assert_relative_eq!(sample().height(), 2.0 + 8.86 + 2.0 + 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_flag_codes() {
        assert_eq!(BaseType::try_from(0), Ok(BaseType::Fused));
        assert_eq!(FilletType::try_from(4), Ok(FilletType::IndependentChamfer));
        assert_eq!(SnapType::try_from(3), Ok(SnapType::Both));
        assert_eq!(FilletType::IndependentFillet as u8, 2);
        assert_eq!(
            CornersType::try_from(3),
            Err(ConfigError::InvalidFlag {
                flag: "corners_type",
                value: 3
            })
        );
        assert!(Side::try_from(2).is_err());
        assert!(FilletKind::try_from(1).is_ok());
    }

    #[test]
    fn test_validation_order() {
        // every check fails here; the edge check comes first
        let config = BoxConfig {
            edge_top: DVec3::new(1.0, 1.0, 0.1),
            base_type: BaseType::Fused,
            dim_bottom: DVec3::new(50.0, 74.2, 2.0),
            ..sample()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EdgeBelowClearance { .. })
        ));

        let config = BoxConfig {
            edge_top: DVec3::ONE,
            ..config
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::IndependentFilletOnFusedBase)
        );

        let config = BoxConfig {
            fillet_type_bottom: FilletType::IntegratedFillet,
            ..config
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FusedBaseBottomEdge(_))
        ));

        let config = BoxConfig {
            edge_bottom: DVec3::ZERO,
            ..config
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MismatchedFootprint { .. })
        ));
    }

    #[test]
    fn test_ron_string_roundtrip() {
        let config = BoxConfig {
            snap_bottom: SnapType::Both,
            fillet_snap_top: true,
            ..sample()
        };
        let text = config.to_ron_string().unwrap();
        assert_eq!(BoxConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn test_ron_defaults_fill_missing_fields() {
        let text = "(
            dim_top: (60.0, 40.0, 2.0),
            dim_bottom: (60.0, 40.0, 2.0),
            dim_wall: (2.0, 2.0, 20.0),
            clearance: (0.2, 0.2, 0.2),
            base_type: Fused,
            edge_bottom: (0.0, 0.0, 0.0),
            fillet_type_bottom: IntegratedChamfer,
        )";
        let config = BoxConfig::from_ron_str(text).unwrap();
        assert_eq!(config.base_type, BaseType::Fused);
        assert_eq!(config.fillet_type_top, FilletType::IndependentChamfer);
        assert_relative_eq!(config.flange_height_top, 4.0);
    }

    #[test]
    fn test_invalid_ron_config_is_rejected() {
        let text = "(
            dim_top: (60.0, 40.0, 2.0),
            dim_bottom: (61.0, 40.0, 2.0),
            dim_wall: (2.0, 2.0, 20.0),
            clearance: (0.2, 0.2, 0.2),
        )";
        assert!(matches!(
            BoxConfig::from_ron_str(text),
            Err(ConfigFileError::Invalid(ConfigError::MismatchedFootprint { .. }))
        ));
        assert!(matches!(
            BoxConfig::from_ron_str("(dim_top: 3)"),
            Err(ConfigFileError::Deserialize(_))
        ));
    }

    #[test]
    fn test_presets() {
        let case = presets::gm328a_case();
        assert!(case.validate().is_ok());
        assert_relative_eq!(case.dim_top.x, 85.1, epsilon = 1e-9);
        assert_relative_eq!(case.dim_top.y, 70.2, epsilon = 1e-9);
        assert_relative_eq!(case.height(), presets::INTERIOR_HEIGHT, epsilon = 1e-9);

        let battery = presets::gm328a_battery();
        assert!(battery.validate().is_ok());
        assert_relative_eq!(battery.dim_top.x, 37.2, epsilon = 1e-9);
        assert_relative_eq!(battery.dim_top.y, case.dim_top.y);
        assert_relative_eq!(battery.height(), case.height());
    }
}
