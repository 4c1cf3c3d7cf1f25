use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit of a crop rectangle's coordinates and dimensions.
///
/// Serialized as `"px"` / `"%"`, the literal values the client-side crop
/// widget understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropUnit {
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
}

impl fmt::Display for CropUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropUnit::Px => f.write_str("px"),
            CropUnit::Percent => f.write_str("%"),
        }
    }
}

/// A crop selection rectangle.
///
/// Origin and dimensions are interpreted in `unit`. Plain value type:
/// equality is structural and no field is checked against the bounds of
/// any actual image — out-of-range geometry is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub unit: CropUnit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Crop {
    pub fn new(unit: CropUnit, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit,
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ unit: {}, x: {}, y: {}, width: {}, height: {} }}",
            self.unit, self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = Crop::new(CropUnit::Percent, 25.0, 25.0, 50.0, 50.0);
        let b = Crop::new(CropUnit::Percent, 25.0, 25.0, 50.0, 50.0);
        assert_eq!(a, b);
    }

    #[test]
    fn any_single_field_breaks_equality() {
        let base = Crop::new(CropUnit::Px, 10.0, 20.0, 30.0, 40.0);
        let variants = [
            Crop {
                unit: CropUnit::Percent,
                ..base
            },
            Crop { x: 11.0, ..base },
            Crop { y: 21.0, ..base },
            Crop {
                width: 31.0,
                ..base
            },
            Crop {
                height: 41.0,
                ..base
            },
        ];
        for v in variants {
            assert_ne!(base, v);
        }
    }

    #[test]
    fn unit_wire_values() {
        assert_eq!(
            serde_json::to_string(&CropUnit::Px).unwrap_or_default(),
            "\"px\""
        );
        assert_eq!(
            serde_json::to_string(&CropUnit::Percent).unwrap_or_default(),
            "\"%\""
        );
    }

    #[test]
    fn crop_serde_roundtrip() {
        let crop = Crop::new(CropUnit::Percent, 25.0, 25.0, 50.0, 50.0);
        let json = serde_json::to_string(&crop).unwrap_or_default();
        assert!(json.contains("\"unit\":\"%\""), "got: {json}");
        let back: Crop = serde_json::from_str(&json).unwrap_or(Crop::new(
            CropUnit::Px,
            0.0,
            0.0,
            0.0,
            0.0,
        ));
        assert_eq!(back, crop);
    }

    #[test]
    fn display_matches_wire_shape() {
        let crop = Crop::new(CropUnit::Percent, 25.0, 25.0, 50.0, 50.0);
        assert_eq!(
            crop.to_string(),
            "{ unit: %, x: 25, y: 25, width: 50, height: 50 }"
        );
    }
}
