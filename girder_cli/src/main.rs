//! # girder_cli
//!
//! Command-line front end over `girder_core`. Every command prints JSON on
//! stdout; failures print the structured error as JSON on stderr and exit
//! with status 1.
//!
//! ```text
//! girder_cli families
//! girder_cli schema <family> [--si]
//! girder_cli validate <family> [--si] [NAME=VALUE ...]
//! girder_cli outline <family> [--si] [NAME=VALUE ...]
//! girder_cli envelope <family> <x> <y> <offset> [--si] [NAME=VALUE ...]
//! girder_cli surface <family> <length> [--poorly-ventilated] [--si] [NAME=VALUE ...]
//! ```
//!
//! Values are in the display unit of the chosen system (inches by default,
//! millimeters with `--si`); span lengths are in feet or meters. `--settings <path>` loads engine settings from
//! a JSON file. Set `RUST_LOG=debug` to see which load paths are taken.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use serde_json::json;

use girder_core::envelope::{EndType, PointKind};
use girder_core::families::BeamFamily;
use girder_core::section::{build_outline, build_strand_envelope, surface_area, OutlineOptions};
use girder_core::settings::{load_settings, EngineSettings};
use girder_core::units::{UnitKind, UnitSystem};
use girder_core::validation::validate_dimensions;
use girder_core::{DimensionSet, SectionError, SectionResult};

const USAGE: &str =
    "usage: girder_cli <families|schema|validate|outline|envelope|surface> [args] [--si] [--settings PATH]";

/// Parsed command line: the command words plus the shared options.
struct Invocation {
    words: Vec<String>,
    overrides: Vec<(String, f64)>,
    settings: EngineSettings,
    poorly_ventilated: bool,
}

impl Invocation {
    fn parse(args: Vec<String>) -> SectionResult<Self> {
        let mut words = Vec::new();
        let mut overrides = Vec::new();
        let mut settings = EngineSettings::default();
        let mut si = false;
        let mut poorly_ventilated = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "--si" {
                si = true;
            } else if arg == "--poorly-ventilated" {
                poorly_ventilated = true;
            } else if arg == "--settings" {
                let path = iter
                    .next()
                    .ok_or_else(|| SectionError::invalid_argument("--settings", "expected a path"))?;
                settings = load_settings(Path::new(&path))?;
            } else if let Some((name, value)) = arg.split_once('=') {
                overrides.push((name.to_string(), parse_number(name, value)?));
            } else {
                words.push(arg);
            }
        }

        if si {
            settings = settings.with_unit_system(UnitSystem::Si);
        }
        Ok(Invocation {
            words,
            overrides,
            settings,
            poorly_ventilated,
        })
    }

    fn units(&self) -> UnitSystem {
        self.settings.unit_system
    }

    fn word(&self, index: usize, what: &str) -> SectionResult<&str> {
        self.words
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| SectionError::invalid_argument(what, "missing"))
    }

    fn family(&self) -> SectionResult<BeamFamily> {
        BeamFamily::from_name(self.word(1, "family")?)
    }

    fn number(&self, index: usize, what: &str) -> SectionResult<f64> {
        parse_number(what, self.word(index, what)?)
    }

    fn dimensions(&self, family: BeamFamily) -> SectionResult<DimensionSet> {
        family
            .schema()
            .set_from_display(self.units(), self.overrides.iter().map(|(n, v)| (n.as_str(), *v)))
    }
}

fn parse_number(what: &str, text: &str) -> SectionResult<f64> {
    text.trim()
        .parse()
        .map_err(|_| SectionError::invalid_argument(what, format!("'{}' is not a number", text)))
}

fn print_json<T: Serialize>(value: &T) -> SectionResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SectionError::invalid_argument("output", e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn families() -> SectionResult<()> {
    let list: Vec<_> = BeamFamily::ALL
        .iter()
        .map(|family| {
            let section = family.section();
            let spacings = section
                .supported_spacings()
                .iter()
                .map(|&spacing| {
                    Ok(json!({
                        "spacing": spacing,
                        "deck_types": section.supported_deck_types(spacing)?,
                    }))
                })
                .collect::<SectionResult<Vec<_>>>()?;
            Ok(json!({
                "name": family.name(),
                "display_name": family.display_name(),
                "spacings": spacings,
            }))
        })
        .collect::<SectionResult<Vec<_>>>()?;
    print_json(&list)
}

fn schema(inv: &Invocation) -> SectionResult<()> {
    let family = inv.family()?;
    let schema = family.schema();
    let units = inv.units();
    let specs: Vec<_> = schema
        .specs()
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "default": spec.kind.from_canonical(units, spec.default),
                "unit": spec.kind.display_unit(units).map(|u| u.tag()),
            })
        })
        .collect();
    print_json(&json!({ "family": family.name(), "units": units, "dimensions": specs }))
}

fn validate(inv: &Invocation) -> SectionResult<()> {
    let family = inv.family()?;
    let dims = inv.dimensions(family)?;
    validate_dimensions(family, &dims, inv.units())?;
    print_json(&json!({ "family": family.name(), "valid": true }))
}

fn outline(inv: &Invocation) -> SectionResult<()> {
    let family = inv.family()?;
    let dims = inv.dimensions(family)?;
    validate_dimensions(family, &dims, inv.units())?;

    let outline = build_outline(family, &dims, &OutlineOptions::default())?;
    print_json(&json!({
        "family": family.name(),
        "height": outline.height,
        "width": outline.width,
        "web_count": outline.web_count,
        "area": outline.area(),
        "perimeter": outline.perimeter(),
        "centroid_depth": outline.centroid_depth(),
        "moment_of_inertia": outline.moment_of_inertia(),
        "void_perimeter": outline.void_perimeter(),
        "spacing": outline.spacing,
        "spacing_range": outline.spacing_range,
        "shear_key_areas": outline.shear_key_areas,
        "shape": outline.shape,
    }))
}

fn envelope(inv: &Invocation) -> SectionResult<()> {
    let family = inv.family()?;
    let dims = inv.dimensions(family)?;
    let units = inv.units();
    validate_dimensions(family, &dims, units)?;

    let length = UnitKind::Length;
    let x = length.to_canonical(units, inv.number(2, "x")?);
    let y = length.to_canonical(units, inv.number(3, "y")?);
    let offset = length.to_canonical(units, inv.number(4, "offset")?);

    let envelope = build_strand_envelope(family, &dims, None, &inv.settings.strand_limits)?;
    let moved = envelope.translate_strand(PointKind::HarpPoint, EndType::Start, x, y, offset)?;
    let legal = envelope.test_strand_location(
        PointKind::HarpPoint,
        EndType::Start,
        envelope.section_height(),
        x,
        y,
        offset,
    );

    print_json(&json!({
        "family": family.name(),
        "unit": units.component_length().tag(),
        "x": length.from_canonical(units, moved.x),
        "y": length.from_canonical(units, moved.y),
        "within_bounds": legal,
    }))
}

fn surface(inv: &Invocation) -> SectionResult<()> {
    let family = inv.family()?;
    let dims = inv.dimensions(family)?;
    let units = inv.units();
    validate_dimensions(family, &dims, units)?;

    let length = UnitKind::SpanLength.to_canonical(units, inv.number(2, "length")?);
    if length <= 0.0 {
        return Err(SectionError::invalid_argument("length", "must be greater than zero"));
    }
    let area = surface_area(family, &dims, length, inv.poorly_ventilated)?;
    print_json(&json!({
        "family": family.name(),
        "length": length,
        "poorly_ventilated": inv.poorly_ventilated,
        "surface_area": area,
    }))
}

fn run(inv: &Invocation) -> SectionResult<()> {
    match inv.word(0, "command")? {
        "families" => families(),
        "schema" => schema(inv),
        "validate" => validate(inv),
        "outline" => outline(inv),
        "envelope" => envelope(inv),
        "surface" => surface(inv),
        other => Err(SectionError::invalid_argument("command", format!("unknown command '{}'", other))),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    let result = Invocation::parse(args).and_then(|inv| run(&inv));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("command failed: {}", e);
            match serde_json::to_string_pretty(&e) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}
