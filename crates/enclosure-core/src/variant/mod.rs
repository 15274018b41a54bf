//! Enclosure variants
//!
//! A variant wraps a [`ParametricBox`] and applies its own additive and
//! subtractive passes on top of the plain parts. Passes that depend on
//! where the plain geometry ended up read anchors back from it first (see
//! [`crate::anchor`]).

mod battery;
mod case;

pub use battery::Gm328aBattery;
pub use case::Gm328aCase;

use std::fmt;

use enclosure_cad::{CadKernel, Solid};

use crate::config::{BaseType, BoxConfig, VariantKind};
use crate::error::{BoxResult, ConfigError};
use crate::parametric_box::ParametricBox;

/// Printable parts of an enclosure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Lid,
    Base,
    Wall,
    TopFillet,
    BottomFillet,
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lid => "lid",
            Self::Base => "base",
            Self::Wall => "wall",
            Self::TopFillet => "top fillet",
            Self::BottomFillet => "bottom fillet",
        };
        f.write_str(name)
    }
}

/// Operations shared by every enclosure variant
pub trait Enclosure {
    fn name(&self) -> &str;

    /// The box the variant is built on
    fn parametric_box(&self) -> &ParametricBox;

    fn top_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid>;

    fn bottom_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid>;

    fn wall_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid>;

    fn top_fillet_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        self.parametric_box().top_fillet_solid(kernel)
    }

    fn bottom_fillet_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        self.parametric_box().bottom_fillet_solid(kernel)
    }

    /// Every separate part the configuration calls for
    ///
    /// A fused base carries the wall, and fillets are only separate parts
    /// when they are independent.
    fn parts(&self, kernel: &dyn CadKernel) -> BoxResult<Vec<(PartKind, Solid)>> {
        let config = self.parametric_box().config();
        let mut parts = vec![
            (PartKind::Lid, self.top_solid(kernel)?),
            (PartKind::Base, self.bottom_solid(kernel)?),
        ];
        if config.base_type == BaseType::Detachable {
            parts.push((PartKind::Wall, self.wall_solid(kernel)?));
        }
        if config.fillet_type_top.is_independent() {
            parts.push((PartKind::TopFillet, self.top_fillet_solid(kernel)?));
        }
        if config.fillet_type_bottom.is_independent() {
            parts.push((PartKind::BottomFillet, self.bottom_fillet_solid(kernel)?));
        }
        tracing::info!("{}: built {} parts", self.name(), parts.len());
        Ok(parts)
    }
}

impl Enclosure for ParametricBox {
    fn name(&self) -> &str {
        "parametric box"
    }

    fn parametric_box(&self) -> &ParametricBox {
        self
    }

    fn top_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        ParametricBox::top_solid(self, kernel)
    }

    fn bottom_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        ParametricBox::bottom_solid(self, kernel)
    }

    fn wall_solid(&self, kernel: &dyn CadKernel) -> BoxResult<Solid> {
        ParametricBox::wall_solid(self, kernel)
    }
}

/// Construct the variant named by `kind`
pub fn build(kind: VariantKind, config: BoxConfig) -> Result<Box<dyn Enclosure>, ConfigError> {
    Ok(match kind {
        VariantKind::Plain => Box::new(ParametricBox::new(config)?),
        VariantKind::Case => Box::new(Gm328aCase::new(config)?),
        VariantKind::Battery => Box::new(Gm328aBattery::new(config)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::presets;

    #[test]
    fn test_part_names() {
        assert_eq!(PartKind::Lid.to_string(), "lid");
        assert_eq!(PartKind::BottomFillet.to_string(), "bottom fillet");
    }

    #[test]
    fn test_build_variants() {
        let case = build(VariantKind::Case, presets::gm328a_case()).unwrap();
        assert_eq!(case.name(), "gm328a case");
        let battery = build(VariantKind::Battery, presets::gm328a_battery()).unwrap();
        assert_eq!(battery.name(), "gm328a battery");
        let plain = build(VariantKind::Plain, presets::gm328a_case()).unwrap();
        assert_eq!(plain.parametric_box().height(), presets::gm328a_case().height());

        let mut bad = presets::gm328a_case();
        bad.dim_top.y += 1.0;
        assert!(build(VariantKind::Case, bad).is_err());
    }
}
