//! # Bulb Tee
//!
//! Deep single-web girder with a bulb at the bottom and a wide top flange
//! that serves as the deck. Bulb tees are placed side by side, so the top
//! flange width W5 is not a dimension: it is the girder spacing, limited to
//! the `Wmin..=Wmax` range the entry allows. Without a spacing the flange is
//! built at `Wmax`.
//!
//! D8 thickens the top flange at the girder ends (parabolically along the
//! length); the section itself is the midspan section and never includes it.
//!
//! ```text
//!  |<--------------------- W5 --------------------->|
//!  +------------------------------------------------+   -+- D1
//!   \_________________            _________________/    -+- D2
//!                 W1  \__________/  W2                  -+- D3
//!                        |<T1>|                          |
//!                        |    |                          D7
//!                        |<T2>|                          |
//!                  ______/    \______                   -+- D6
//!                 /       W4         \                  -+- D5
//!                |   W3               |                  D4
//!                +--------------------+                 -+-
//! ```

use once_cell::sync::Lazy;

use crate::dimensions::{typed_dimensions, DimensionSet};
use crate::envelope::HarpRegion;
use crate::errors::SectionResult;
use crate::families::{polygon_from_sides, web_rectangle, BeamFamily, BeamSpacing, SectionFamily};
use crate::geometry::Point2;
use crate::persistence::{MissingFieldDefault, PersistenceRules, VersionContext};
use crate::schema::DimensionSchema;
use crate::section::{OutlineOptions, SectionShape};
use crate::units::{feet, UnitKind, UnitSystem};
use crate::validation::{check_constraints, Constraint, TOLERANCE};

const FAMILY: &str = "BulbTee";

/// Slack allowed when comparing Wmin with the flange widths it must cover
const FLANGE_WIDTH_TOLERANCE: f64 = 0.002;

const UNIFORM_ADJACENT: &[BeamSpacing] = &[BeamSpacing::UniformAdjacent];

pub static SCHEMA: Lazy<DimensionSchema> = Lazy::new(|| {
    DimensionSchema::from_inches(
        FAMILY,
        &[
            ("D1", 2.875),
            ("D2", 2.625),
            ("D3", 2.0),
            ("D4", 6.0),
            ("D5", 3.0),
            ("D6", 0.0),
            ("D7", 57.0),
            ("D8", 0.0),
            ("T1", 6.0),
            ("T2", 6.0),
            ("W1", 16.5),
            ("W2", 2.0),
            ("W3", 9.5),
            ("W4", 0.0),
        ],
    )
    .with_spec("Wmax", feet(6.0), UnitKind::SpanLength)
    .with_spec("Wmin", feet(4.0), UnitKind::SpanLength)
});

typed_dimensions! {
    pub struct BulbTeeDims for "BulbTee" {
        d1 => "D1",
        d2 => "D2",
        d3 => "D3",
        d4 => "D4",
        d5 => "D5",
        d6 => "D6",
        d7 => "D7",
        d8 => "D8",
        t1 => "T1",
        t2 => "T2",
        w1 => "W1",
        w2 => "W2",
        w3 => "W3",
        w4 => "W4",
        wmax => "Wmax",
        wmin => "Wmin",
    }
}

impl BulbTeeDims {
    pub fn height(&self) -> f64 {
        self.d1 + self.d2 + self.d3 + self.d4 + self.d5 + self.d6 + self.d7
    }

    pub fn bottom_flange_width(&self) -> f64 {
        self.t2 + 2.0 * (self.w3 + self.w4)
    }

    /// Narrowest top flange that still covers both tapers
    pub fn minimum_top_flange_width(&self) -> f64 {
        self.t1 + 2.0 * (self.w1 + self.w2)
    }

    /// Top flange width for a girder `spacing`, or `Wmax` without one.
    pub fn top_flange_width(&self, spacing: Option<f64>) -> f64 {
        match spacing {
            Some(_) if (self.wmax - self.wmin).abs() <= TOLERANCE => self.wmax,
            Some(s) => s.max(self.wmin).min(self.wmax),
            None => self.wmax,
        }
    }
}

type Rule = Constraint<BulbTeeDims>;

fn greater_than_zero(name: &str, units: UnitSystem) -> String {
    format!("{} must be greater than 0.0 {}", name, units.component_length().tag())
}

static RULES: &[Rule] = &[
    Rule::formatted(|d| d.d1 > 0.0, |_, u| greater_than_zero("D1", u)),
    Rule::fixed(|d| d.d2 >= 0.0, "D2 must be a positive value"),
    Rule::fixed(|d| d.d3 >= 0.0, "D3 must be a positive value"),
    Rule::formatted(|d| d.d4 > 0.0, |_, u| greater_than_zero("D4", u)),
    Rule::fixed(|d| d.d5 >= 0.0, "D5 must be a positive value"),
    Rule::fixed(|d| d.d6 >= 0.0, "D6 must be a positive value"),
    Rule::formatted(|d| d.d7 > 0.0, |_, u| greater_than_zero("D7", u)),
    Rule::formatted(|d| d.d8 >= 0.0, |_, u| greater_than_zero("D8", u)),
    Rule::formatted(|d| d.w1 > 0.0, |_, u| greater_than_zero("W1", u)),
    Rule::fixed(|d| d.w2 >= 0.0, "W2 must be a positive value"),
    Rule::formatted(|d| d.w3 > 0.0, |_, u| greater_than_zero("W3", u)),
    Rule::fixed(|d| d.w4 >= 0.0, "W4 must be a positive value"),
    Rule::formatted(|d| d.t1 > 0.0, |_, u| greater_than_zero("T1", u)),
    Rule::formatted(|d| d.t2 > 0.0, |_, u| greater_than_zero("T2", u)),
    Rule::fixed(|d| d.wmin <= d.wmax, "Wmin must be greater than or equal to Wmax"),
    Rule::formatted(
        |d| d.wmin + FLANGE_WIDTH_TOLERANCE >= d.bottom_flange_width(),
        |d, u| {
            format!(
                "Wmin must be greater than or equal to bottom flange width = {} = T2 + 2.0*(W3+W4)",
                u.span_length().format(d.bottom_flange_width())
            )
        },
    ),
    Rule::formatted(
        |d| d.wmin + FLANGE_WIDTH_TOLERANCE >= d.minimum_top_flange_width(),
        |d, u| {
            format!(
                "Wmin must be greater than or equal to T1 + 2.0*(W1 + W2) = {}",
                u.span_length().format(d.minimum_top_flange_width())
            )
        },
    ),
];

static PERSISTENCE: PersistenceRules = PersistenceRules {
    block_name: "BulbTeeDimensions",
    block_version: 2.0,
    legacy: None,
    missing: &[MissingFieldDefault {
        field: "D8",
        default: 0.0,
        applies: |ctx: VersionContext| ctx.parent < 14.0 || ctx.block < 2.0,
    }],
    corrections: &[],
};

pub struct BulbTee;

impl BulbTee {
    fn side_profile(d: &BulbTeeDims, flange_width: f64) -> Vec<Point2> {
        let h = d.height();
        let bulb = d.bottom_flange_width() / 2.0;
        let bottom_web = d.t2 / 2.0;
        let top_web = d.t1 / 2.0;
        let bulb_top = d.d4 + d.d5 + d.d6;
        let web_top = bulb_top + d.d7;

        vec![
            Point2::new(bulb, 0.0),
            Point2::new(bulb, d.d4),
            Point2::new(bottom_web + d.w4, d.d4 + d.d5),
            Point2::new(bottom_web, bulb_top),
            Point2::new(top_web, web_top),
            Point2::new(top_web + d.w2, web_top + d.d3),
            Point2::new(top_web + d.w2 + d.w1, h - d.d1),
            Point2::new(flange_width / 2.0, h - d.d1),
            Point2::new(flange_width / 2.0, h),
        ]
    }
}

impl SectionFamily for BulbTee {
    fn family(&self) -> BeamFamily {
        BeamFamily::BulbTee
    }

    fn schema(&self) -> &'static DimensionSchema {
        &SCHEMA
    }

    fn persistence(&self) -> &'static PersistenceRules {
        &PERSISTENCE
    }

    fn validate(&self, dims: &DimensionSet, units: UnitSystem) -> SectionResult<()> {
        check_constraints(FAMILY, &BulbTeeDims::from_set(dims)?, RULES, units)
    }

    fn height(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(BulbTeeDims::from_set(dims)?.height())
    }

    fn width(&self, dims: &DimensionSet) -> SectionResult<f64> {
        Ok(BulbTeeDims::from_set(dims)?.wmax)
    }

    fn outline_width(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<f64> {
        Ok(BulbTeeDims::from_set(dims)?.top_flange_width(options.girder_spacing))
    }

    fn web_count(&self, _dims: &DimensionSet) -> SectionResult<usize> {
        Ok(1)
    }

    fn supported_spacings(&self) -> &'static [BeamSpacing] {
        UNIFORM_ADJACENT
    }

    fn spacing_range(&self, dims: &DimensionSet, spacing: BeamSpacing) -> SectionResult<(f64, f64)> {
        self.ensure_spacing_supported(spacing)?;
        let d = BulbTeeDims::from_set(dims)?;
        Ok((d.wmin, d.wmax))
    }

    fn build_shape(&self, dims: &DimensionSet, options: &OutlineOptions) -> SectionResult<SectionShape> {
        let d = BulbTeeDims::from_set(dims)?;
        let side = Self::side_profile(&d, d.top_flange_width(options.girder_spacing));
        Ok(SectionShape::solid(polygon_from_sides(&side, &side)))
    }

    fn harp_regions(&self, dims: &DimensionSet, depth: f64) -> SectionResult<Vec<HarpRegion>> {
        let d = BulbTeeDims::from_set(dims)?;
        Ok(vec![HarpRegion::new(web_rectangle(0.0, d.t1.min(d.t2), depth), 0.0)])
    }

    fn is_prismatic(&self, dims: &DimensionSet) -> SectionResult<bool> {
        Ok(BulbTeeDims::from_set(dims)?.d8.abs() <= TOLERANCE)
    }
}
