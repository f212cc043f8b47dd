//! # Girder Library and Bridge Access
//!
//! A girder library is an ordered set of named entries, each pairing a beam
//! family with one dimension set. A bridge description arranges library
//! entries into girder groups; the section builder reaches girders only
//! through [`BridgeDescriptionAccess`], so any bridge model can supply them.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::families::BeamFamily;
//! use girder_core::library::{build_segment_outline, BridgeDescription, GirderEntry, GirderLibrary, SegmentKey};
//! use girder_core::settings::EngineSettings;
//!
//! let mut library = GirderLibrary::new();
//! library.insert("DS-20", GirderEntry::new(BeamFamily::DeckedSlabBeam));
//!
//! let bridge = BridgeDescription::new(library).with_group(vec!["DS-20"; 4]);
//! let settings = EngineSettings::default();
//!
//! let exterior = build_segment_outline(&bridge, SegmentKey::new(0, 0), &settings).unwrap();
//! let interior = build_segment_outline(&bridge, SegmentKey::new(0, 1), &settings).unwrap();
//! assert!(exterior.area() > interior.area());
//! ```

use serde::{Deserialize, Serialize};

use crate::dimensions::DimensionSet;
use crate::envelope::StrandEnvelope;
use crate::errors::{SectionError, SectionResult};
use crate::families::{BeamFamily, BeamSpacing};
use crate::persistence::{load_dimensions, save_dimensions, StructuredLoad, StructuredSave};
use crate::section::{build_outline, build_strand_envelope, OutlineOptions, SectionOutline};
use crate::settings::EngineSettings;
use crate::units::UnitSystem;
use crate::validation::validate_dimensions;

/// Unit written for each library entry
pub const LIBRARY_ENTRY_UNIT: &str = "GirderLibraryEntry";

/// Version of [`LIBRARY_ENTRY_UNIT`] written by this crate
pub const LIBRARY_ENTRY_VERSION: f64 = 15.0;

// ============================================================================
// Library
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderEntry {
    pub family: BeamFamily,
    pub dimensions: DimensionSet,
}

impl GirderEntry {
    /// Entry with the family's default dimensions
    pub fn new(family: BeamFamily) -> Self {
        GirderEntry {
            family,
            dimensions: family.schema().default_set(),
        }
    }

    pub fn with_dimensions(family: BeamFamily, dimensions: DimensionSet) -> Self {
        GirderEntry { family, dimensions }
    }

    pub fn validate(&self, units: UnitSystem) -> SectionResult<()> {
        validate_dimensions(self.family, &self.dimensions, units)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
    pub entry: GirderEntry,
}

/// Library entries in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GirderLibrary {
    entries: Vec<NamedEntry>,
}

impl GirderLibrary {
    pub fn new() -> Self {
        GirderLibrary::default()
    }

    /// Add an entry, replacing one of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, entry: GirderEntry) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.entry = entry,
            None => self.entries.push(NamedEntry { name, entry }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&GirderEntry> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.entry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GirderEntry)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write every entry of `library` as a [`LIBRARY_ENTRY_UNIT`].
pub fn save_library(sink: &mut dyn StructuredSave, library: &GirderLibrary) -> SectionResult<()> {
    for (name, entry) in library.iter() {
        sink.begin_unit(LIBRARY_ENTRY_UNIT, LIBRARY_ENTRY_VERSION)?;
        sink.text_property("Name", name)?;
        sink.text_property("Family", entry.family.name())?;
        save_dimensions(sink, entry.family, &entry.dimensions)?;
        sink.end_unit()?;
    }
    Ok(())
}

/// Read library entries until the open unit is exhausted.
pub fn load_library(source: &mut dyn StructuredLoad) -> SectionResult<GirderLibrary> {
    let mut library = GirderLibrary::new();
    while !source.at_end() {
        if !source.begin_unit(LIBRARY_ENTRY_UNIT) {
            return Err(SectionError::invalid_file_format(
                LIBRARY_ENTRY_UNIT,
                format!("expected a {} unit", LIBRARY_ENTRY_UNIT),
            ));
        }
        let name = source
            .text_property("Name")
            .ok_or_else(|| SectionError::invalid_file_format(LIBRARY_ENTRY_UNIT, "entry has no Name"))?;
        let family = source
            .text_property("Family")
            .ok_or_else(|| SectionError::invalid_file_format(LIBRARY_ENTRY_UNIT, "entry has no Family"))?;
        let family = BeamFamily::from_name(&family)?;

        log::debug!("loading library entry '{}' ({})", name, family);
        let dimensions = load_dimensions(source, family)?;

        if !source.end_unit() {
            return Err(SectionError::invalid_file_format(
                LIBRARY_ENTRY_UNIT,
                format!("unexpected data after the dimensions of '{}'", name),
            ));
        }
        library.insert(name, GirderEntry::with_dimensions(family, dimensions));
    }
    Ok(library)
}

// ============================================================================
// Bridge Access
// ============================================================================

/// Identifies one girder segment: the girder index within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentKey {
    pub group: usize,
    pub girder: usize,
}

impl SegmentKey {
    pub const fn new(group: usize, girder: usize) -> Self {
        SegmentKey { group, girder }
    }
}

/// Read access to the girders of a bridge
pub trait BridgeDescriptionAccess {
    fn girder_count(&self, group: usize) -> SectionResult<usize>;

    fn girder(&self, key: SegmentKey) -> SectionResult<&GirderEntry>;

    /// True for the first and last girder of a group
    fn is_exterior(&self, key: SegmentKey) -> SectionResult<bool> {
        let count = self.girder_count(key.group)?;
        Ok(key.girder == 0 || key.girder + 1 == count)
    }

    /// Spacing layout of the bridge; None leaves each family's default.
    fn spacing(&self) -> Option<BeamSpacing> {
        None
    }

    /// Center-to-center spacing at a girder, when the bridge defines one
    fn girder_spacing(&self, _key: SegmentKey) -> SectionResult<Option<f64>> {
        Ok(None)
    }
}

/// Girder groups referring to entries of one library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeDescription {
    pub library: GirderLibrary,
    /// Library entry names, one per girder, for each group
    pub groups: Vec<Vec<String>>,
    #[serde(default)]
    pub spacing: Option<BeamSpacing>,
    /// Uniform center-to-center girder spacing
    #[serde(default)]
    pub girder_spacing: Option<f64>,
}

impl BridgeDescription {
    pub fn new(library: GirderLibrary) -> Self {
        BridgeDescription {
            library,
            groups: Vec::new(),
            spacing: None,
            girder_spacing: None,
        }
    }

    pub fn with_group<S: Into<String>>(mut self, girders: impl IntoIterator<Item = S>) -> Self {
        self.groups.push(girders.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_spacing(mut self, spacing: BeamSpacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_girder_spacing(mut self, spacing: f64) -> Self {
        self.girder_spacing = Some(spacing);
        self
    }

    fn group(&self, group: usize) -> SectionResult<&[String]> {
        self.groups
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| SectionError::invalid_argument("group", format!("no girder group {}", group)))
    }
}

impl BridgeDescriptionAccess for BridgeDescription {
    fn girder_count(&self, group: usize) -> SectionResult<usize> {
        Ok(self.group(group)?.len())
    }

    fn girder(&self, key: SegmentKey) -> SectionResult<&GirderEntry> {
        let name = self.group(key.group)?.get(key.girder).ok_or_else(|| {
            SectionError::invalid_argument("girder", format!("no girder {} in group {}", key.girder, key.group))
        })?;
        self.library
            .get(name)
            .ok_or_else(|| SectionError::invalid_argument("girder", format!("'{}' is not in the library", name)))
    }

    fn spacing(&self) -> Option<BeamSpacing> {
        self.spacing
    }

    fn girder_spacing(&self, key: SegmentKey) -> SectionResult<Option<f64>> {
        self.girder(key)?;
        Ok(self.girder_spacing)
    }
}

/// Outline of one girder segment, laid out with the bridge's spacing.
/// Exterior girders lose their outside block-out when the settings exclude
/// exterior shear keys.
pub fn build_segment_outline(
    bridge: &dyn BridgeDescriptionAccess,
    key: SegmentKey,
    settings: &EngineSettings,
) -> SectionResult<SectionOutline> {
    let entry = bridge.girder(key)?;
    entry.validate(settings.unit_system)?;

    let mut options = OutlineOptions::default();
    if let Some(spacing) = bridge.spacing() {
        options = options.with_spacing(spacing);
    }
    if let Some(spacing) = bridge.girder_spacing(key)? {
        log::debug!("girder {:?}: spacing {} m", key, spacing);
        options = options.with_girder_spacing(spacing);
    }
    if settings.exclude_exterior_shear_keys {
        let count = bridge.girder_count(key.group)?;
        options = options.with_block_outs(key.girder != 0, key.girder + 1 != count);
    }
    build_outline(entry.family, &entry.dimensions, &options)
}

/// Strand envelope of one girder segment using the default strand limits.
pub fn build_segment_envelope(
    bridge: &dyn BridgeDescriptionAccess,
    key: SegmentKey,
    overall_height: Option<f64>,
    settings: &EngineSettings,
) -> SectionResult<StrandEnvelope> {
    let entry = bridge.girder(key)?;
    entry.validate(settings.unit_system)?;
    build_strand_envelope(entry.family, &entry.dimensions, overall_height, &settings.strand_limits)
}
