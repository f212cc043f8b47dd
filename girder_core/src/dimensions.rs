//! # Dimension Sets
//!
//! An ordered list of named scalar dimensions. Insertion order is the
//! schema order of the owning family and names are unique.
//!
//! Looking up a name that is not present is an explicit
//! [`SectionError::DimensionNotFound`], never a magic value.

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// One named dimension value in canonical units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: f64,
}

/// Ordered name → value mapping for one beam family.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet {
    entries: Vec<Dimension>,
}

impl DimensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (name, value) pairs. A repeated name overwrites the earlier
    /// value in place.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        let mut set = DimensionSet::new();
        for (name, value) in pairs {
            set.insert(name, value);
        }
        set
    }

    /// Set a value, appending the name if it is new.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Dimension { name, value }),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|d| d.name == name).map(|d| d.value)
    }

    /// Value of `name`, or `DimensionNotFound` naming `family`.
    pub fn require(&self, family: &str, name: &str) -> SectionResult<f64> {
        self.get(name)
            .ok_or_else(|| SectionError::dimension_not_found(family, name))
    }

    /// Replace the value of an existing dimension.
    pub fn set(&mut self, family: &str, name: &str, value: f64) -> SectionResult<()> {
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => {
                existing.value = value;
                Ok(())
            }
            None => Err(SectionError::dimension_not_found(family, name)),
        }
    }

    /// Exchange the values of two existing dimensions.
    pub fn swap_values(&mut self, family: &str, a: &str, b: &str) -> SectionResult<()> {
        let va = self.require(family, a)?;
        let vb = self.require(family, b)?;
        self.set(family, a, vb)?;
        self.set(family, b, va)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|d| d.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|d| (d.name.as_str(), d.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declares a plain struct of named dimension fields for one family, plus a
/// `from_set` constructor that pulls each field out of a [`DimensionSet`].
macro_rules! typed_dimensions {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident for $family:literal {
            $($field:ident => $dim:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        $vis struct $name {
            $(pub $field: f64),+
        }

        impl $name {
            pub fn from_set(set: &$crate::dimensions::DimensionSet) -> $crate::errors::SectionResult<Self> {
                Ok($name {
                    $($field: set.require($family, $dim)?),+
                })
            }
        }
    };
}

pub(crate) use typed_dimensions;

#[cfg(test)]
mod tests {
    use super::*;

    typed_dimensions! {
        struct Pair for "Test" {
            a => "A",
            b => "B",
        }
    }

    #[test]
    fn test_typed_dimensions() {
        let set = DimensionSet::from_pairs([("A", 1.0), ("B", 2.0)]);
        let pair = Pair::from_set(&set).unwrap();
        assert_eq!(pair, Pair { a: 1.0, b: 2.0 });

        let partial = DimensionSet::from_pairs([("A", 1.0)]);
        assert_eq!(
            Pair::from_set(&partial).unwrap_err(),
            SectionError::dimension_not_found("Test", "B")
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let set = DimensionSet::from_pairs([("W1", 1.0), ("A", 2.0), ("C1", 3.0)]);
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["W1", "A", "C1"]);
    }

    #[test]
    fn test_repeated_name_overwrites() {
        let set = DimensionSet::new().with("H1", 1.0).with("H2", 2.0).with("H1", 5.0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("H1"), Some(5.0));
    }

    #[test]
    fn test_missing_dimension_is_error() {
        let set = DimensionSet::new().with("H1", 1.0);
        let err = set.require("BoxBeam", "H9").unwrap_err();
        assert_eq!(err, SectionError::dimension_not_found("BoxBeam", "H9"));
        assert!(set.clone().set("BoxBeam", "H9", 0.0).is_err());
    }

    #[test]
    fn test_swap_values() {
        let mut set = DimensionSet::from_pairs([("F1", 1.0), ("F2", 2.0)]);
        set.swap_values("BoxBeam", "F1", "F2").unwrap();
        assert_eq!(set.get("F1"), Some(2.0));
        assert_eq!(set.get("F2"), Some(1.0));
    }

    #[test]
    fn test_json_shape() {
        let set = DimensionSet::from_pairs([("D1", 1.5)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"name":"D1","value":1.5}]"#);
        let back: DimensionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
