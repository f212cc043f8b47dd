//! # Dimension Validation
//!
//! Each family declares an ordered table of [`Constraint`]s over its typed
//! dimensions. [`check_constraints`] walks the table and stops at the first
//! predicate that fails, returning that predicate's message. Failures are
//! never aggregated.
//!
//! Predicates are pure. A few families include a constraint whose test
//! builds a derived quantity (a web thickness, for instance) and checks
//! that it stays positive; those are ordinary entries in the table.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::families::BeamFamily;
//! use girder_core::units::UnitSystem;
//! use girder_core::validation::validate_dimensions;
//!
//! let family = BeamFamily::BoxBeam;
//! let mut dims = family.schema().default_set();
//! assert!(validate_dimensions(family, &dims, UnitSystem::Us).is_ok());
//!
//! dims.set("BoxBeam", "H1", 0.0).unwrap();
//! let err = validate_dimensions(family, &dims, UnitSystem::Us).unwrap_err();
//! assert!(err.to_string().contains("H1 must be a positive value"));
//! ```

use crate::dimensions::DimensionSet;
use crate::errors::{SectionError, SectionResult};
use crate::families::BeamFamily;
use crate::units::UnitSystem;

/// Numeric slack for geometric comparisons between dimensions (m)
pub const TOLERANCE: f64 = 1.0e-6;

/// Failure message of a constraint
pub enum Message<D> {
    Fixed(&'static str),
    /// Built on failure. Used when the text carries a unit tag or a value.
    Formatted(fn(&D, UnitSystem) -> String),
}

/// A named feasibility predicate over typed dimensions `D`.
pub struct Constraint<D> {
    pub holds: fn(&D) -> bool,
    pub message: Message<D>,
}

impl<D> Constraint<D> {
    pub const fn fixed(holds: fn(&D) -> bool, message: &'static str) -> Self {
        Constraint {
            holds,
            message: Message::Fixed(message),
        }
    }

    pub const fn formatted(holds: fn(&D) -> bool, message: fn(&D, UnitSystem) -> String) -> Self {
        Constraint {
            holds,
            message: Message::Formatted(message),
        }
    }

    fn message(&self, dims: &D, units: UnitSystem) -> String {
        match &self.message {
            Message::Fixed(text) => (*text).to_string(),
            Message::Formatted(build) => build(dims, units),
        }
    }
}

/// Runs `rules` in order and reports the first violation.
pub fn check_constraints<D>(
    family: &str,
    dims: &D,
    rules: &[Constraint<D>],
    units: UnitSystem,
) -> SectionResult<()> {
    match rules.iter().find(|rule| !(rule.holds)(dims)) {
        Some(rule) => Err(SectionError::validation(family, rule.message(dims, units))),
        None => Ok(()),
    }
}

/// Checks that `dims` belongs to `family` and is geometrically admissible.
///
/// The dimension set must carry every schema name; an unknown or missing
/// name is reported before any feasibility rule runs.
pub fn validate_dimensions(family: BeamFamily, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
    let schema = family.schema();
    let ordered = schema.normalize(dims)?;
    family.section().validate(&ordered, units)
}
