//! # Structured Archive
//!
//! A nested, versioned record stream. A unit has a name, a version and an
//! ordered list of items, where each item is a scalar property, a text
//! property or a child unit.
//!
//! Reading is sequential. Asking for a property that is not the next item
//! returns `None` and leaves the cursor where it was, so callers can
//! tolerate fields that older writers never produced.

use serde::{Deserialize, Serialize};

use crate::errors::{SectionError, SectionResult};

/// Name of the implicit unit wrapping everything in an archive
pub const ROOT_UNIT: &str = "Archive";

/// Version stamped on the root unit
pub const ARCHIVE_VERSION: f64 = 1.0;

// ============================================================================
// Stream Traits
// ============================================================================

/// Sink side of the structured stream
pub trait StructuredSave {
    fn begin_unit(&mut self, name: &str, version: f64) -> SectionResult<()>;
    fn property(&mut self, name: &str, value: f64) -> SectionResult<()>;
    fn text_property(&mut self, name: &str, value: &str) -> SectionResult<()>;
    fn end_unit(&mut self) -> SectionResult<()>;
}

/// Source side of the structured stream
pub trait StructuredLoad {
    /// Enter the next item if it is a unit called `name`.
    fn begin_unit(&mut self, name: &str) -> bool;
    /// Version of the unit currently open
    fn version(&self) -> f64;
    /// Version of the unit enclosing the one currently open
    fn parent_version(&self) -> Option<f64>;
    /// Read the next item if it is a scalar property called `name`.
    fn property(&mut self, name: &str) -> Option<f64>;
    /// Read the next item if it is a text property called `name`.
    fn text_property(&mut self, name: &str) -> Option<String>;
    /// Leave the current unit. Fails when items remain unread.
    fn end_unit(&mut self) -> bool;
    /// True when the current unit has no more items.
    fn at_end(&self) -> bool;
}

// ============================================================================
// Data Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Item {
    Property { name: String, value: f64 },
    Text { name: String, value: String },
    Unit(Unit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub version: f64,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Unit {
    pub fn new(name: impl Into<String>, version: f64) -> Self {
        Unit {
            name: name.into(),
            version,
            items: Vec::new(),
        }
    }

    /// Builder-style scalar property
    pub fn with_property(mut self, name: impl Into<String>, value: f64) -> Self {
        self.items.push(Item::Property {
            name: name.into(),
            value,
        });
        self
    }

    /// Builder-style text property
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.items.push(Item::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Builder-style child unit
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.items.push(Item::Unit(unit));
        self
    }
}

/// A complete archive: the root unit and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    pub root: Unit,
}

impl Default for Archive {
    fn default() -> Self {
        Archive {
            root: Unit::new(ROOT_UNIT, ARCHIVE_VERSION),
        }
    }
}

impl Archive {
    pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut archive = Archive::default();
        archive.root.items.extend(units.into_iter().map(Item::Unit));
        archive
    }

    pub fn reader(&self) -> ArchiveReader<'_> {
        ArchiveReader::new(self)
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Builds an [`Archive`] through [`StructuredSave`].
#[derive(Debug)]
pub struct ArchiveWriter {
    stack: Vec<Unit>,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter {
    pub fn new() -> Self {
        ArchiveWriter {
            stack: vec![Unit::new(ROOT_UNIT, ARCHIVE_VERSION)],
        }
    }

    fn current(&mut self) -> SectionResult<&mut Unit> {
        self.stack
            .last_mut()
            .ok_or_else(|| SectionError::invalid_file_format(ROOT_UNIT, "writer has no open unit"))
    }

    /// Close the archive. Every unit begun must have been ended.
    pub fn finish(mut self) -> SectionResult<Archive> {
        if self.stack.len() != 1 {
            let open = self.stack.last().map(|u| u.name.clone()).unwrap_or_default();
            return Err(SectionError::invalid_file_format(open, "unit was never ended"));
        }
        match self.stack.pop() {
            Some(root) => Ok(Archive { root }),
            None => Err(SectionError::invalid_file_format(ROOT_UNIT, "writer has no root unit")),
        }
    }
}

impl StructuredSave for ArchiveWriter {
    fn begin_unit(&mut self, name: &str, version: f64) -> SectionResult<()> {
        self.stack.push(Unit::new(name, version));
        Ok(())
    }

    fn property(&mut self, name: &str, value: f64) -> SectionResult<()> {
        self.current()?.items.push(Item::Property {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn text_property(&mut self, name: &str, value: &str) -> SectionResult<()> {
        self.current()?.items.push(Item::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn end_unit(&mut self) -> SectionResult<()> {
        if self.stack.len() < 2 {
            return Err(SectionError::invalid_file_format(ROOT_UNIT, "end_unit without a matching begin_unit"));
        }
        let finished = self
            .stack
            .pop()
            .ok_or_else(|| SectionError::invalid_file_format(ROOT_UNIT, "writer has no open unit"))?;
        self.current()?.items.push(Item::Unit(finished));
        Ok(())
    }
}

// ============================================================================
// Reader
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    unit: &'a Unit,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn next_item(&self) -> Option<&'a Item> {
        self.unit.items.get(self.position)
    }
}

/// Sequential reader over an [`Archive`].
#[derive(Debug, Clone)]
pub struct ArchiveReader<'a> {
    stack: Vec<Cursor<'a>>,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(archive: &'a Archive) -> Self {
        ArchiveReader {
            stack: vec![Cursor {
                unit: &archive.root,
                position: 0,
            }],
        }
    }

    /// Name of the unit currently open
    pub fn unit_name(&self) -> &str {
        self.stack.last().map(|c| c.unit.name.as_str()).unwrap_or(ROOT_UNIT)
    }

    fn top(&mut self) -> Option<&mut Cursor<'a>> {
        self.stack.last_mut()
    }
}

impl<'a> StructuredLoad for ArchiveReader<'a> {
    fn begin_unit(&mut self, name: &str) -> bool {
        let child = match self.stack.last().and_then(|c| c.next_item()) {
            Some(Item::Unit(unit)) if unit.name == name => unit,
            _ => return false,
        };
        if let Some(cursor) = self.top() {
            cursor.position += 1;
        }
        self.stack.push(Cursor {
            unit: child,
            position: 0,
        });
        true
    }

    fn version(&self) -> f64 {
        self.stack.last().map(|c| c.unit.version).unwrap_or(ARCHIVE_VERSION)
    }

    fn parent_version(&self) -> Option<f64> {
        let n = self.stack.len();
        if n < 2 {
            None
        } else {
            Some(self.stack[n - 2].unit.version)
        }
    }

    fn property(&mut self, name: &str) -> Option<f64> {
        let cursor = self.top()?;
        match cursor.next_item() {
            Some(Item::Property { name: n, value }) if n == name => {
                let value = *value;
                cursor.position += 1;
                Some(value)
            }
            _ => None,
        }
    }

    fn text_property(&mut self, name: &str) -> Option<String> {
        let cursor = self.top()?;
        match cursor.next_item() {
            Some(Item::Text { name: n, value }) if n == name => {
                let value = value.clone();
                cursor.position += 1;
                Some(value)
            }
            _ => None,
        }
    }

    fn end_unit(&mut self) -> bool {
        if self.stack.len() < 2 || !self.at_end() {
            return false;
        }
        self.stack.pop();
        true
    }

    fn at_end(&self) -> bool {
        self.stack
            .last()
            .map_or(true, |c| c.position >= c.unit.items.len())
    }
}
