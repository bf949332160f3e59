//! Domain renderers: structured records to human-readable text reports.
//!
//! Rendering is a pure projection of the records returned by
//! [`crate::parsing::upstream`]; the only side effect lives in
//! [`render_to_file`]. Every report shares the same layout conventions so the
//! consolidation parser can read them back:
//!
//! - a `=== Title ===` line
//! - one block per record, opened by a line carrying [`SENTINEL`]
//! - indented `- Label: value` attribute lines
//! - degrees and percentages with exactly two decimals

pub mod dasha;
pub mod houses;
pub mod planets;
pub mod yogas;


use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{KpError, KpResult};
use crate::models::{
    DashaPeriod, Domain, HouseRecord, KpPlanets, MahadashaSummary, PlanetPositions, YogaList,
};
use crate::parsing::{upstream, ChartDocument, InputSource};

/// Glyph opening a new record block.
pub const SENTINEL: char = '✦';

/// Records projected from one domain's document.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainRecords {
    PlanetPositions(PlanetPositions),
    PlanetAnalysis(KpPlanets),
    Houses(Vec<HouseRecord>),
    Mahadasha(MahadashaSummary),
    Antardasha(Vec<DashaPeriod>),
    Paryantardasha(Vec<DashaPeriod>),
    Yogas(YogaList),
}

impl DomainRecords {
    /// Project a validated document into records.
    pub fn from_document(doc: &ChartDocument, context: &RenderContext) -> KpResult<Self> {
        Ok(match doc.domain {
            Domain::PlanetPosition => Self::PlanetPositions(upstream::planet_positions_from(doc)?),
            Domain::PlanetAnalysis => {
                let mut kp = upstream::kp_planets_from(doc)?;
                if let Some(positions) = &context.positions {
                    planets::supplement_combustion(&mut kp, positions);
                }
                Self::PlanetAnalysis(kp)
            }
            Domain::House => Self::Houses(upstream::houses_from(doc)?),
            Domain::Mahadasha => Self::Mahadasha(upstream::mahadasha_from(doc)?),
            Domain::Antardasha => Self::Antardasha(upstream::antardashas_from(doc)?),
            Domain::Paryantardasha => Self::Paryantardasha(upstream::paryantardashas_from(doc)?),
            Domain::Yoga => Self::Yogas(upstream::yogas_from(doc)?),
        })
    }

    pub fn domain(&self) -> Domain {
        match self {
            Self::PlanetPositions(_) => Domain::PlanetPosition,
            Self::PlanetAnalysis(_) => Domain::PlanetAnalysis,
            Self::Houses(_) => Domain::House,
            Self::Mahadasha(_) => Domain::Mahadasha,
            Self::Antardasha(_) => Domain::Antardasha,
            Self::Paryantardasha(_) => Domain::Paryantardasha,
            Self::Yogas(_) => Domain::Yoga,
        }
    }

    /// Render the text report for these records.
    pub fn render(&self) -> String {
        match self {
            Self::PlanetPositions(p) => planets::render_planet_positions(p),
            Self::PlanetAnalysis(kp) => planets::render_kp_planets(kp),
            Self::Houses(h) => houses::render_houses(h),
            Self::Mahadasha(m) => dasha::render_mahadasha(m),
            Self::Antardasha(a) => dasha::render_antardashas(a),
            Self::Paryantardasha(p) => dasha::render_paryantardashas(p),
            Self::Yogas(y) => yogas::render_yogas(y),
        }
    }
}

/// Data from earlier domains that later renderers may cross-reference.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Planet-position records, used to fill combustion flags the KP planets
    /// endpoint does not report
    pub positions: Option<PlanetPositions>,
}

/// A rendered report together with the records it was projected from.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub domain: Domain,
    pub text: String,
    pub records: DomainRecords,
    /// Set once the text has been written
    pub output_path: Option<PathBuf>,
}

/// Render a validated document without touching the filesystem.
pub fn render(doc: &ChartDocument, context: &RenderContext) -> KpResult<RenderedReport> {
    let records = DomainRecords::from_document(doc, context)?;
    Ok(RenderedReport {
        domain: doc.domain,
        text: records.render(),
        records,
        output_path: None,
    })
}

/// Resolve `source`, render it and write the report to `output`.
///
/// Nothing is written when validation or projection fails.
pub fn render_to_file(
    domain: Domain,
    source: InputSource,
    output: &Path,
    context: &RenderContext,
) -> KpResult<RenderedReport> {
    let doc = source.resolve(domain)?;
    let mut report = render(&doc, context)?;
    write_text(output, &report.text)?;
    info!("Rendered {} report to {}", domain, output.display());
    report.output_path = Some(output.to_path_buf());
    Ok(report)
}

/// Write a text file, creating parent directories as needed.
pub fn write_text(path: &Path, text: &str) -> KpResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| KpError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| KpError::io(path, e))
}

/// "Yes"/"No" as printed in reports.
pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
