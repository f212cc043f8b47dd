//! # Units
//!
//! Lengths are stored internally in meters. Dimension values arrive from and
//! leave for the user in a display unit chosen by the [`UnitSystem`]:
//! millimeters for SI, inches for US customary.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::units::{Inches, LengthUnit, Meters, UnitConversion};
//!
//! let depth: Meters = Inches(39.5).into();
//! assert!((depth.value() - 1.0033).abs() < 1e-9);
//! assert!((LengthUnit::Inch.from_canonical(depth.value()) - 39.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Meters per inch (exact)
pub const METERS_PER_INCH: f64 = 0.0254;

// ============================================================================
// Length Newtypes
// ============================================================================

/// Length in meters (canonical internal unit)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Inches> for Meters {
    fn from(inches: Inches) -> Self {
        Meters(inches.0 * METERS_PER_INCH)
    }
}

impl From<Meters> for Inches {
    fn from(m: Meters) -> Self {
        Inches(m.0 / METERS_PER_INCH)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Inches);

/// Convert a length given in inches to canonical meters.
pub fn inches(value: f64) -> f64 {
    Meters::from(Inches(value)).value()
}

/// Convert a length given in feet to canonical meters.
pub fn feet(value: f64) -> f64 {
    inches(12.0 * value)
}

// ============================================================================
// Unit Tags and Conversion
// ============================================================================

/// Converts between a tagged display unit and canonical internal units.
pub trait UnitConversion {
    fn to_canonical(&self, value: f64) -> f64;
    fn from_canonical(&self, value: f64) -> f64;
}

/// Length units a dimension may be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    Meter,
    Millimeter,
    Inch,
    Foot,
}

impl LengthUnit {
    pub const ALL: [LengthUnit; 4] = [
        LengthUnit::Meter,
        LengthUnit::Millimeter,
        LengthUnit::Inch,
        LengthUnit::Foot,
    ];

    /// Short tag used in messages, e.g. "in"
    pub fn tag(&self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
        }
    }

    /// Meters in one of this unit
    fn meters_per_unit(&self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Millimeter => 0.001,
            LengthUnit::Inch => METERS_PER_INCH,
            LengthUnit::Foot => 12.0 * METERS_PER_INCH,
        }
    }

    pub fn from_tag(tag: &str) -> Option<LengthUnit> {
        LengthUnit::ALL.iter().copied().find(|u| u.tag() == tag)
    }

    /// Format a canonical length in this unit, e.g. "6 ft".
    pub fn format(&self, meters: f64) -> String {
        format!("{} {}", round_display(self.from_canonical(meters)), self.tag())
    }
}

impl UnitConversion for LengthUnit {
    fn to_canonical(&self, value: f64) -> f64 {
        value * self.meters_per_unit()
    }

    fn from_canonical(&self, value: f64) -> f64 {
        value / self.meters_per_unit()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Unit Systems and Kinds
// ============================================================================

/// Display unit system used when reading input and phrasing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    Si,
    #[default]
    Us,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Si, UnitSystem::Us];

    /// Display unit for component lengths (section dimensions)
    pub fn component_length(&self) -> LengthUnit {
        match self {
            UnitSystem::Si => LengthUnit::Millimeter,
            UnitSystem::Us => LengthUnit::Inch,
        }
    }

    /// Display unit for span-scale lengths such as girder spacing
    pub fn span_length(&self) -> LengthUnit {
        match self {
            UnitSystem::Si => LengthUnit::Meter,
            UnitSystem::Us => LengthUnit::Foot,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::Si => "SI",
            UnitSystem::Us => "US Customary",
        }
    }

    /// Format a canonical length in this system's display unit, e.g. "12 in".
    pub fn format_length(&self, meters: f64) -> String {
        self.component_length().format(meters)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rounds to three decimals so display values print without float noise.
fn round_display(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// What kind of quantity a dimension holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// A component length
    Length,
    /// A length shown in span units (ft or m), e.g. a spacing limit
    SpanLength,
    /// A whole number of items, stored as a float
    Count,
    /// A 0/1 option stored alongside the lengths
    Flag,
}

impl UnitKind {
    /// Display unit for this kind, or None for unitless counts and flags.
    pub fn display_unit(&self, system: UnitSystem) -> Option<LengthUnit> {
        match self {
            UnitKind::Length => Some(system.component_length()),
            UnitKind::SpanLength => Some(system.span_length()),
            UnitKind::Count | UnitKind::Flag => None,
        }
    }

    pub fn to_canonical(&self, system: UnitSystem, value: f64) -> f64 {
        match self.display_unit(system) {
            Some(unit) => unit.to_canonical(value),
            None => value,
        }
    }

    pub fn from_canonical(&self, system: UnitSystem, value: f64) -> f64 {
        match self.display_unit(system) {
            Some(unit) => unit.from_canonical(value),
            None => value,
        }
    }
}
