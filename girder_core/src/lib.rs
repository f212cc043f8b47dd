//! # girder_core - Precast Girder Section Engine
//!
//! `girder_core` models the cross-sections of parametric precast concrete
//! beams: WSDOT and AASHTO box beams, WSDOT and TxDOT U-beams, decked slab
//! beams, NU I-beams, bulb tees and voided slabs. It validates dimension
//! sets, reads them back from every historical file layout, builds section
//! outlines with their properties, and bounds where prestressing strands may
//! be moved inside the webs.
//!
//! ## Design Philosophy
//!
//! - **Table-driven families**: schemas, constraints and migration history
//!   are data, interpreted by generic drivers
//! - **Canonical units**: every length is stored in meters; display units
//!   apply only at the edges
//! - **Rich Errors**: structured error values, never sentinels
//! - **JSON-First**: settings, archives and results are serde types
//!
//! ## Quick Start
//!
//! ```rust
//! use girder_core::families::BeamFamily;
//! use girder_core::section::{build_outline, OutlineOptions};
//! use girder_core::units::UnitSystem;
//! use girder_core::validation::validate_dimensions;
//!
//! let family = BeamFamily::UBeam;
//! let dims = family.schema().default_set();
//! validate_dimensions(family, &dims, UnitSystem::Us).unwrap();
//!
//! let outline = build_outline(family, &dims, &OutlineOptions::default()).unwrap();
//! println!("area = {:.4} m²", outline.area());
//! ```
//!
//! ## Modules
//!
//! - [`families`] - Beam families, spacing layouts, deck types and per-family formulas
//! - [`schema`] - Ordered dimension schemas with defaults and unit kinds
//! - [`validation`] - First-failure feasibility checks
//! - [`persistence`] - Versioned save/load with legacy migration
//! - [`envelope`] - Strand envelope (harp regions and elevation bounds)
//! - [`section`] - Outline and envelope builders
//! - [`library`] - Girder library and bridge accessor
//! - [`geometry`] - Points and polygons
//! - [`units`] - Length units and unit systems
//! - [`settings`] - Engine settings
//! - [`errors`] - Structured error types
//! - [`file_io`] - Archive and library files with atomic saves

pub mod dimensions;
pub mod envelope;
pub mod errors;
pub mod families;
pub mod file_io;
pub mod geometry;
pub mod library;
pub mod persistence;
pub mod schema;
pub mod section;
pub mod settings;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use dimensions::DimensionSet;
pub use errors::{SectionError, SectionResult};
pub use families::{BeamFamily, BeamSpacing, DeckType};
pub use file_io::{load_archive, load_library_file, save_archive, save_library_file};
pub use library::{GirderEntry, GirderLibrary};
pub use section::{build_outline, build_strand_envelope, surface_area, OutlineOptions, SectionOutline, StrandLimits};
pub use settings::EngineSettings;
pub use units::UnitSystem;
