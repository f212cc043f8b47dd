//! # Dimension Persistence and Migration
//!
//! Saves a family's dimension set as a named, versioned block and loads it
//! back from any historical layout still in the field.
//!
//! Every family describes its history as data in [`PersistenceRules`]:
//!
//! - the nested block name and its current version
//! - an optional flat, position-indexed legacy layout with its
//!   index → name remap table
//! - (version, field, default) tolerances for fields older writers lacked
//! - version-gated corrections for historical bugs
//!
//! [`load_dimensions`] is the single driver that interprets those tables.
//! It either returns a complete set in current schema order or fails with
//! `InvalidFileFormat`; a partial set is never returned.

pub mod archive;

use crate::dimensions::DimensionSet;
use crate::errors::{SectionError, SectionResult};
use crate::families::BeamFamily;
use crate::schema::DimensionSchema;

pub use archive::{Archive, ArchiveReader, ArchiveWriter, StructuredLoad, StructuredSave, Unit};

/// Parent container version at which dimensions moved into their own
/// versioned block.
pub const NESTED_BLOCK_PARENT_VERSION: f64 = 14.0;

/// Block version assumed for data written before blocks existed
pub const IMPLICIT_BLOCK_VERSION: f64 = 1.0;

const VERSION_EPSILON: f64 = 1.0e-9;

// ============================================================================
// Rule Tables
// ============================================================================

/// Versions in effect while a block is being read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionContext {
    /// Version of the container that owns the dimension data
    pub parent: f64,
    /// Version of the dimension block itself
    pub block: f64,
}

/// A field older writers may have omitted, and the value to use instead.
pub struct MissingFieldDefault {
    pub field: &'static str,
    pub default: f64,
    pub applies: fn(VersionContext) -> bool,
}

/// One entry of a legacy remap table. Without a transform the value is
/// copied from `source`; with one, the transform sees every legacy value.
pub struct Remap {
    pub target: &'static str,
    pub source: usize,
    pub transform: Option<fn(&[f64]) -> f64>,
}

impl Remap {
    pub const fn copy(target: &'static str, source: usize) -> Self {
        Remap {
            target,
            source,
            transform: None,
        }
    }

    pub const fn derive(target: &'static str, transform: fn(&[f64]) -> f64) -> Self {
        Remap {
            target,
            source: 0,
            transform: Some(transform),
        }
    }

    fn value(&self, legacy: &[f64]) -> Option<f64> {
        match self.transform {
            Some(transform) => Some(transform(legacy)),
            None => legacy.get(self.source).copied(),
        }
    }
}

/// Flat, position-indexed layout used before the family was redimensioned.
pub struct LegacyLayout {
    /// Parent versions below this use the layout
    pub before_parent_version: f64,
    /// Historical names, in stream order
    pub fields: &'static [&'static str],
    pub missing: &'static [MissingFieldDefault],
    pub remap: &'static [Remap],
}

/// Fix-up for a historical bug, applied once after all fields are read.
pub struct Correction {
    pub description: &'static str,
    pub applies: fn(VersionContext) -> bool,
    pub apply: fn(&mut DimensionSet) -> SectionResult<()>,
}

/// Everything the load/save drivers need to know about a family's history.
pub struct PersistenceRules {
    pub block_name: &'static str,
    pub block_version: f64,
    pub legacy: Option<&'static LegacyLayout>,
    pub missing: &'static [MissingFieldDefault],
    pub corrections: &'static [Correction],
}

impl PersistenceRules {
    fn missing_default(&self, field: &str, ctx: VersionContext) -> Option<f64> {
        find_default(self.missing, field, ctx)
    }
}

fn find_default(table: &[MissingFieldDefault], field: &str, ctx: VersionContext) -> Option<f64> {
    table
        .iter()
        .find(|m| m.field == field && (m.applies)(ctx))
        .map(|m| m.default)
}

/// Correction shared by the box families: F1 and F2 were written in each
/// other's place before the fix.
pub fn swap_fillets(dims: &mut DimensionSet, family: &str) -> SectionResult<()> {
    dims.swap_values(family, "F1", "F2")
}

// ============================================================================
// Save
// ============================================================================

/// Write `dims` as the family's nested block, in schema order.
pub fn save_dimensions(sink: &mut dyn StructuredSave, family: BeamFamily, dims: &DimensionSet) -> SectionResult<()> {
    let rules = family.section().persistence();
    let ordered = family.schema().normalize(dims)?;

    sink.begin_unit(rules.block_name, rules.block_version)?;
    for (name, value) in ordered.iter() {
        sink.property(name, value)?;
    }
    sink.end_unit()
}

// ============================================================================
// Load
// ============================================================================

/// Read a dimension set for `family` from `source`.
///
/// The version of the unit currently open in `source` is taken as the
/// parent container version.
pub fn load_dimensions(source: &mut dyn StructuredLoad, family: BeamFamily) -> SectionResult<DimensionSet> {
    let rules = family.section().persistence();
    let schema = family.schema();
    let parent = source.version();

    if let Some(legacy) = rules.legacy {
        if parent < legacy.before_parent_version {
            log::debug!(
                "{}: reading legacy flat layout (parent version {})",
                schema.family(),
                parent
            );
            let ctx = VersionContext {
                parent,
                block: IMPLICIT_BLOCK_VERSION,
            };
            let mut dims = read_legacy(source, schema, rules, legacy, ctx)?;
            apply_corrections(&mut dims, rules, ctx)?;
            return Ok(dims);
        }
    }

    let nested = parent >= NESTED_BLOCK_PARENT_VERSION;
    let block = if nested {
        if !source.begin_unit(rules.block_name) {
            return Err(SectionError::invalid_file_format(
                rules.block_name,
                format!("expected a {} block in a version {} container", rules.block_name, parent),
            ));
        }
        let block = source.version();
        log::debug!("{}: reading block version {}", rules.block_name, block);
        block
    } else {
        log::debug!(
            "{}: reading flat named layout (parent version {})",
            schema.family(),
            parent
        );
        IMPLICIT_BLOCK_VERSION
    };

    if block > rules.block_version + VERSION_EPSILON {
        return Err(SectionError::invalid_file_format(
            rules.block_name,
            format!("block version {} is newer than supported version {}", block, rules.block_version),
        ));
    }

    let ctx = VersionContext { parent, block };
    let mut dims = DimensionSet::new();
    for name in schema.names() {
        let value = match source.property(name) {
            Some(value) => value,
            None => tolerated(rules.block_name, name, rules.missing_default(name, ctx))?,
        };
        dims.insert(name, value);
    }

    if nested && !source.end_unit() {
        return Err(SectionError::invalid_file_format(
            rules.block_name,
            "unexpected data before the end of the block",
        ));
    }

    apply_corrections(&mut dims, rules, ctx)?;
    Ok(dims)
}

fn tolerated(unit: &str, field: &str, default: Option<f64>) -> SectionResult<f64> {
    match default {
        Some(value) => {
            log::warn!("{}: '{}' missing, using default {}", unit, field, value);
            Ok(value)
        }
        None => Err(SectionError::invalid_file_format(
            unit,
            format!("required field '{}' is missing", field),
        )),
    }
}

fn read_legacy(
    source: &mut dyn StructuredLoad,
    schema: &DimensionSchema,
    rules: &PersistenceRules,
    legacy: &LegacyLayout,
    ctx: VersionContext,
) -> SectionResult<DimensionSet> {
    let mut raw = Vec::with_capacity(legacy.fields.len());
    for &field in legacy.fields {
        let value = match source.property(field) {
            Some(value) => value,
            None => tolerated(rules.block_name, field, find_default(legacy.missing, field, ctx))?,
        };
        raw.push(value);
    }

    let mut dims = DimensionSet::new();
    for name in schema.names() {
        let value = match legacy.remap.iter().find(|r| r.target == name) {
            Some(entry) => entry.value(&raw).ok_or_else(|| {
                SectionError::invalid_file_format(
                    rules.block_name,
                    format!("legacy index {} for '{}' is out of range", entry.source, name),
                )
            })?,
            None => tolerated(rules.block_name, name, rules.missing_default(name, ctx))?,
        };
        dims.insert(name, value);
    }
    Ok(dims)
}

fn apply_corrections(dims: &mut DimensionSet, rules: &PersistenceRules, ctx: VersionContext) -> SectionResult<()> {
    for correction in rules.corrections.iter().filter(|c| (c.applies)(ctx)) {
        log::warn!(
            "{}: applying correction '{}' (parent {}, block {})",
            rules.block_name,
            correction.description,
            ctx.parent,
            ctx.block
        );
        (correction.apply)(dims)?;
    }
    Ok(())
}
