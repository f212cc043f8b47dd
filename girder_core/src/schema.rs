//! # Dimension Schemas
//!
//! Each beam family publishes an immutable, ordered description of its
//! dimensions: name, default value (canonical units) and unit kind. Schemas
//! are built once on first use and never mutated, so they can be read from
//! any thread.

use serde::Serialize;

use crate::dimensions::DimensionSet;
use crate::errors::{SectionError, SectionResult};
use crate::units::{inches, LengthUnit, UnitKind, UnitSystem};

/// One entry of a family's dimension schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionSpec {
    pub name: &'static str,
    /// Default value in canonical units
    pub default: f64,
    pub kind: UnitKind,
}

/// Ordered dimension description for a family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSchema {
    family: &'static str,
    specs: Vec<DimensionSpec>,
}

impl DimensionSchema {
    /// Schema of length dimensions whose defaults are given in inches.
    pub fn from_inches(family: &'static str, defaults: &[(&'static str, f64)]) -> Self {
        DimensionSchema {
            family,
            specs: defaults
                .iter()
                .map(|&(name, default)| DimensionSpec {
                    name,
                    default: inches(default),
                    kind: UnitKind::Length,
                })
                .collect(),
        }
    }

    /// Append a dimension of any kind; `default` is in canonical units.
    pub fn with_spec(mut self, name: &'static str, default: f64, kind: UnitKind) -> Self {
        self.specs.push(DimensionSpec { name, default, kind });
        self
    }

    /// Append a unitless 0/1 option.
    pub fn with_flag(self, name: &'static str, default: bool) -> Self {
        self.with_spec(name, if default { 1.0 } else { 0.0 }, UnitKind::Flag)
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn specs(&self) -> &[DimensionSpec] {
        &self.specs
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|s| s.name)
    }

    pub fn spec(&self, name: &str) -> Option<&DimensionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Display unit of every dimension, in schema order
    pub fn display_units(&self, system: UnitSystem) -> Vec<Option<LengthUnit>> {
        self.specs.iter().map(|s| s.kind.display_unit(system)).collect()
    }

    pub fn default_set(&self) -> DimensionSet {
        DimensionSet::from_pairs(self.specs.iter().map(|s| (s.name, s.default)))
    }

    /// Checks that `set` holds exactly this schema's names in schema order.
    pub fn check_conforms(&self, set: &DimensionSet) -> SectionResult<()> {
        for spec in &self.specs {
            if !set.contains(spec.name) {
                return Err(SectionError::dimension_not_found(self.family, spec.name));
            }
        }
        if let Some(extra) = set.names().find(|n| self.spec(n).is_none()) {
            return Err(SectionError::invalid_argument(
                extra,
                format!("not a {} dimension", self.family),
            ));
        }
        if !set.names().eq(self.names()) {
            return Err(SectionError::invalid_argument(
                self.family,
                "dimensions are not in schema order",
            ));
        }
        Ok(())
    }

    /// Returns a copy of `set` reordered into schema order. Names missing
    /// from the schema are rejected.
    pub fn normalize(&self, set: &DimensionSet) -> SectionResult<DimensionSet> {
        if let Some(extra) = set.names().find(|n| self.spec(n).is_none()) {
            return Err(SectionError::invalid_argument(
                extra,
                format!("not a {} dimension", self.family),
            ));
        }
        let mut ordered = DimensionSet::new();
        for spec in &self.specs {
            ordered.insert(spec.name, set.require(self.family, spec.name)?);
        }
        Ok(ordered)
    }

    /// Start from the defaults and override with display-unit values.
    pub fn set_from_display<'a>(
        &self,
        system: UnitSystem,
        overrides: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> SectionResult<DimensionSet> {
        let mut set = self.default_set();
        for (name, value) in overrides {
            let spec = self
                .spec(name)
                .ok_or_else(|| SectionError::dimension_not_found(self.family, name))?;
            set.set(self.family, spec.name, spec.kind.to_canonical(system, value))?;
        }
        Ok(set)
    }

    /// Values of `set` converted to display units, in schema order.
    pub fn to_display(&self, system: UnitSystem, set: &DimensionSet) -> SectionResult<Vec<(&'static str, f64)>> {
        self.specs
            .iter()
            .map(|spec| {
                let value = set.require(self.family, spec.name)?;
                Ok((spec.name, spec.kind.from_canonical(system, value)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> DimensionSchema {
        DimensionSchema::from_inches("Sample", &[("H1", 10.0), ("W1", 4.0)]).with_flag("Opt", false)
    }

    #[test]
    fn test_default_set_in_schema_order() {
        let schema = sample();
        let set = schema.default_set();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["H1", "W1", "Opt"]);
        assert_relative_eq!(set.get("H1").unwrap(), 0.254, epsilon = 1e-12);
        assert_eq!(set.get("Opt"), Some(0.0));
        assert!(schema.check_conforms(&set).is_ok());
    }

    #[test]
    fn test_conformance_failures() {
        let schema = sample();
        let missing = DimensionSet::from_pairs([("H1", 1.0), ("W1", 1.0)]);
        assert_eq!(
            schema.check_conforms(&missing).unwrap_err(),
            SectionError::dimension_not_found("Sample", "Opt")
        );

        let reordered = DimensionSet::from_pairs([("W1", 1.0), ("H1", 1.0), ("Opt", 0.0)]);
        assert!(schema.check_conforms(&reordered).is_err());
        let fixed = schema.normalize(&reordered).unwrap();
        assert!(schema.check_conforms(&fixed).is_ok());

        let extra = schema.default_set().with("Z9", 1.0);
        assert_eq!(schema.check_conforms(&extra).unwrap_err().error_code(), "INVALID_ARGUMENT");
        assert!(schema.normalize(&extra).is_err());
    }

    #[test]
    fn test_display_units() {
        let schema = sample();
        assert_eq!(
            schema.display_units(UnitSystem::Si),
            vec![Some(LengthUnit::Millimeter), Some(LengthUnit::Millimeter), None]
        );
    }

    #[test]
    fn test_set_from_display() {
        let schema = sample();
        let set = schema
            .set_from_display(UnitSystem::Si, [("W1", 100.0), ("Opt", 1.0)])
            .unwrap();
        assert_relative_eq!(set.get("W1").unwrap(), 0.1, epsilon = 1e-12);
        assert_eq!(set.get("Opt"), Some(1.0));
        assert!(schema.set_from_display(UnitSystem::Us, [("Q", 1.0)]).is_err());

        let shown = schema.to_display(UnitSystem::Us, &set).unwrap();
        assert_relative_eq!(shown[0].1, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_span_and_count_specs() {
        let schema = DimensionSchema::from_inches("Sample", &[("H", 10.0)])
            .with_spec("Wmax", crate::units::feet(6.0), UnitKind::SpanLength)
            .with_spec("N", 3.0, UnitKind::Count);
        assert_eq!(
            schema.display_units(UnitSystem::Us),
            vec![Some(LengthUnit::Inch), Some(LengthUnit::Foot), None]
        );
        let set = schema
            .set_from_display(UnitSystem::Si, [("Wmax", 2.0), ("N", 4.0)])
            .unwrap();
        assert_relative_eq!(set.get("Wmax").unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(set.get("N"), Some(4.0));
    }
}
