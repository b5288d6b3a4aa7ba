//! Construction Estimators
//!
//! Paint and roofing quantity estimates from a measured area. Product data
//! lives in small typed tables so the CLI and any future front end show the
//! same choices.
//!
//! ## Paint
//!
//! litres = area × coats ÷ coverage, rounded up to whole cans.
//!
//! ## Roofing
//!
//! A roofing "square" is 100 ft² of roof surface. The plan area is scaled by
//! the pitch multiplier (1.0 for flat, 1.118 for 6/12) and the material's
//! waste factor before converting to bundles.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Square feet in one roofing square
pub const SQUARE_FT2: f64 = 100.0;

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Must be a positive number",
        ));
    }
    Ok(())
}

// ============================================================================
// Paint
// ============================================================================

/// Paint product line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaintProduct {
    /// Interior emulsion, 12 m²/L, 5 L can
    #[default]
    InteriorEmulsion,
    /// Exterior masonry, 8 m²/L, 5 L can
    ExteriorMasonry,
    /// Gloss trim, 16 m²/L, 1 L can
    Gloss,
    /// Primer, 10 m²/L, 2.5 L can
    Primer,
}

impl PaintProduct {
    pub const ALL: [PaintProduct; 4] = [
        PaintProduct::InteriorEmulsion,
        PaintProduct::ExteriorMasonry,
        PaintProduct::Gloss,
        PaintProduct::Primer,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PaintProduct::InteriorEmulsion => "Interior emulsion",
            PaintProduct::ExteriorMasonry => "Exterior masonry",
            PaintProduct::Gloss => "Gloss",
            PaintProduct::Primer => "Primer",
        }
    }

    /// Coverage per coat in m² per litre
    pub fn coverage_m2_per_litre(&self) -> f64 {
        match self {
            PaintProduct::InteriorEmulsion => 12.0,
            PaintProduct::ExteriorMasonry => 8.0,
            PaintProduct::Gloss => 16.0,
            PaintProduct::Primer => 10.0,
        }
    }

    pub fn can_litres(&self) -> f64 {
        match self {
            PaintProduct::InteriorEmulsion | PaintProduct::ExteriorMasonry => 5.0,
            PaintProduct::Gloss => 1.0,
            PaintProduct::Primer => 2.5,
        }
    }
}

impl std::str::FromStr for PaintProduct {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interior" | "emulsion" | "interior-emulsion" => Ok(PaintProduct::InteriorEmulsion),
            "exterior" | "masonry" | "exterior-masonry" => Ok(PaintProduct::ExteriorMasonry),
            "gloss" => Ok(PaintProduct::Gloss),
            "primer" => Ok(PaintProduct::Primer),
            other => Err(CalcError::invalid_input("product", other, "Unknown paint product")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintEstimate {
    pub litres: f64,
    pub cans: u32,
    pub can_litres: f64,
}

pub fn estimate_paint(area_m2: f64, coats: u32, product: PaintProduct) -> CalcResult<PaintEstimate> {
    require_positive("area_m2", area_m2)?;
    if coats == 0 {
        return Err(CalcError::invalid_input("coats", "0", "At least one coat is required"));
    }

    let litres = area_m2 * coats as f64 / product.coverage_m2_per_litre();
    let cans = (litres / product.can_litres()).ceil() as u32;
    log::debug!("paint: {area_m2} m² x {coats} coats of {product:?} = {litres:.2} L");

    Ok(PaintEstimate {
        litres,
        cans,
        can_litres: product.can_litres(),
    })
}

// ============================================================================
// Roofing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoofingMaterial {
    /// 3-tab asphalt shingles, 3 bundles/square
    #[default]
    AsphaltThreeTab,
    /// Architectural shingles, 4 bundles/square
    Architectural,
    /// Cedar shakes, 5 bundles/square
    CedarShake,
}

impl RoofingMaterial {
    pub const ALL: [RoofingMaterial; 3] = [
        RoofingMaterial::AsphaltThreeTab,
        RoofingMaterial::Architectural,
        RoofingMaterial::CedarShake,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RoofingMaterial::AsphaltThreeTab => "3-tab asphalt",
            RoofingMaterial::Architectural => "Architectural",
            RoofingMaterial::CedarShake => "Cedar shake",
        }
    }

    pub fn bundles_per_square(&self) -> u32 {
        match self {
            RoofingMaterial::AsphaltThreeTab => 3,
            RoofingMaterial::Architectural => 4,
            RoofingMaterial::CedarShake => 5,
        }
    }

    /// Extra fraction ordered for cuts and starter rows
    pub fn waste_factor(&self) -> f64 {
        match self {
            RoofingMaterial::AsphaltThreeTab => 0.10,
            RoofingMaterial::Architectural => 0.12,
            RoofingMaterial::CedarShake => 0.15,
        }
    }
}

impl std::str::FromStr for RoofingMaterial {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asphalt" | "3-tab" | "three-tab" => Ok(RoofingMaterial::AsphaltThreeTab),
            "architectural" => Ok(RoofingMaterial::Architectural),
            "cedar" | "shake" | "cedar-shake" => Ok(RoofingMaterial::CedarShake),
            other => Err(CalcError::invalid_input("material", other, "Unknown roofing material")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoofingEstimate {
    /// Roof surface in ft² after pitch adjustment
    pub surface_ft2: f64,
    /// Squares to order, waste included
    pub squares: f64,
    pub bundles: u32,
}

pub fn estimate_roofing(
    area_ft2: f64,
    pitch_multiplier: f64,
    material: RoofingMaterial,
) -> CalcResult<RoofingEstimate> {
    require_positive("area_ft2", area_ft2)?;
    require_positive("pitch_multiplier", pitch_multiplier)?;
    if pitch_multiplier < 1.0 {
        return Err(CalcError::invalid_input(
            "pitch_multiplier",
            pitch_multiplier.to_string(),
            "Pitch multiplier is 1.0 or more",
        ));
    }

    let surface_ft2 = area_ft2 * pitch_multiplier;
    let squares = surface_ft2 * (1.0 + material.waste_factor()) / SQUARE_FT2;
    let bundles = (squares * material.bundles_per_square() as f64).ceil() as u32;

    Ok(RoofingEstimate {
        surface_ft2,
        squares,
        bundles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_rounds_up_to_cans() {
        // 100 m², 2 coats at 12 m²/L = 16.67 L -> 4 x 5 L cans
        let estimate = estimate_paint(100.0, 2, PaintProduct::InteriorEmulsion).unwrap();
        assert!((estimate.litres - 16.6667).abs() < 1e-3);
        assert_eq!(estimate.cans, 4);
    }

    #[test]
    fn test_paint_exact_fit() {
        // 40 m² of gloss at 16 m²/L = 2.5 L -> 3 x 1 L cans
        let estimate = estimate_paint(40.0, 1, PaintProduct::Gloss).unwrap();
        assert!((estimate.litres - 2.5).abs() < 1e-12);
        assert_eq!(estimate.cans, 3);
    }

    #[test]
    fn test_paint_rejects_bad_input() {
        assert!(estimate_paint(0.0, 1, PaintProduct::Primer).is_err());
        assert!(estimate_paint(-5.0, 1, PaintProduct::Primer).is_err());
        assert!(estimate_paint(f64::INFINITY, 1, PaintProduct::Primer).is_err());
        assert!(estimate_paint(10.0, 0, PaintProduct::Primer).is_err());
    }

    #[test]
    fn test_roofing_flat() {
        // 1000 ft² flat, 10% waste = 11 squares -> 33 bundles
        let estimate = estimate_roofing(1000.0, 1.0, RoofingMaterial::AsphaltThreeTab).unwrap();
        assert!((estimate.squares - 11.0).abs() < 1e-9);
        assert_eq!(estimate.bundles, 33);
    }

    #[test]
    fn test_roofing_pitched() {
        let estimate = estimate_roofing(1500.0, 1.118, RoofingMaterial::Architectural).unwrap();
        assert!((estimate.surface_ft2 - 1677.0).abs() < 1e-9);
        // 1677 * 1.12 / 100 = 18.7824 squares * 4 = 75.13 -> 76
        assert_eq!(estimate.bundles, 76);
    }

    #[test]
    fn test_roofing_rejects_bad_pitch() {
        assert!(estimate_roofing(1000.0, 0.5, RoofingMaterial::CedarShake).is_err());
        assert!(estimate_roofing(1000.0, f64::NAN, RoofingMaterial::CedarShake).is_err());
    }

    #[test]
    fn test_product_parsing() {
        assert_eq!("Gloss".parse::<PaintProduct>().unwrap(), PaintProduct::Gloss);
        assert_eq!("cedar".parse::<RoofingMaterial>().unwrap(), RoofingMaterial::CedarShake);
        assert!("tar".parse::<RoofingMaterial>().is_err());
        for product in PaintProduct::ALL {
            assert!(product.coverage_m2_per_litre() > 0.0);
        }
    }
}
