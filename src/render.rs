//! Choropleth rendering and the annotated result table.
//!
//! The map is plain SVG: region outlines projected with an equirectangular
//! fit to the data's bounding box, filled along a sequential blue ramp by
//! the Choice A share of expressed ballots. Regions with no matching result
//! (or nothing expressed) are drawn in neutral grey.

use std::path::Path;

use ahash::AHashMap;
use tracing::{info, warn};

use crate::error::AtlasError;
use crate::geo::RegionShape;
use crate::records::RegionResult;

const CANVAS_WIDTH: f64 = 840.0;
const CANVAS_HEIGHT: f64 = 760.0;
const MARGIN: f64 = 28.0;
const LEGEND_WIDTH: f64 = 240.0;
const LEGEND_HEIGHT: f64 = 14.0;

const NEUTRAL_FILL: &str = "#cccccc";
const RAMP_LOW: (u8, u8, u8) = (0xf7, 0xfb, 0xff);
const RAMP_HIGH: (u8, u8, u8) = (0x08, 0x30, 0x6b);

/// Equirectangular fit of lon/lat onto the canvas, uniform scale, north up.
#[derive(Debug, Clone, Copy)]
struct Projection {
    min_lon: f64,
    max_lat: f64,
    scale: f64,
}

impl Projection {
    fn fit(shapes: &[RegionShape]) -> Option<Projection> {
        let mut points = shapes.iter().flat_map(|s| s.rings.iter().flatten());
        let &(first_lon, first_lat) = points.next()?;

        let (mut min_lon, mut max_lon) = (first_lon, first_lon);
        let (mut min_lat, mut max_lat) = (first_lat, first_lat);
        for &(lon, lat) in points {
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
        }

        let span_lon = (max_lon - min_lon).max(f64::EPSILON);
        let span_lat = (max_lat - min_lat).max(f64::EPSILON);
        let scale = ((CANVAS_WIDTH - 2.0 * MARGIN) / span_lon)
            .min((CANVAS_HEIGHT - 2.0 * MARGIN) / span_lat);

        Some(Projection {
            min_lon,
            max_lat,
            scale,
        })
    }

    #[inline]
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.min_lon) * self.scale + MARGIN,
            (self.max_lat - lat) * self.scale + MARGIN,
        )
    }
}

/// Linear interpolation along the blue ramp, `t` in [0, 1].
///
/// Example: ramp(0.0) → "#f7fbff", ramp(1.0) → "#08306b"
#[inline]
fn ramp(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let channel = |low: u8, high: u8| (low as f64 + (high as f64 - low as f64) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(RAMP_LOW.0, RAMP_HIGH.0),
        channel(RAMP_LOW.1, RAMP_HIGH.1),
        channel(RAMP_LOW.2, RAMP_HIGH.2),
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn path_data(projection: &Projection, rings: &[Vec<(f64, f64)>]) -> String {
    let mut d = String::new();
    for ring in rings {
        for (i, &(lon, lat)) in ring.iter().enumerate() {
            let (x, y) = projection.project(lon, lat);
            if i == 0 {
                d.push_str(&format!("M{x:.2},{y:.2}"));
            } else {
                d.push_str(&format!(" L{x:.2},{y:.2}"));
            }
        }
        d.push_str(" Z ");
    }
    d.trim_end().to_string()
}

/// Renders the choropleth as an SVG document.
///
/// Fill intensity is stretched over the observed ratio range so the spread
/// between regions stays visible even when all ratios cluster.
pub fn render_choropleth(shapes: &[RegionShape], results: &[RegionResult]) -> String {
    let by_code: AHashMap<&str, &RegionResult> = results
        .iter()
        .map(|result| (result.region_code.as_str(), result))
        .collect();

    let ratios: Vec<f64> = shapes
        .iter()
        .filter_map(|shape| by_code.get(shape.code.as_str()))
        .filter_map(|result| result.counts.ratio())
        .collect();
    let lo = ratios.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let stretch = |ratio: f64| {
        if hi > lo {
            (ratio - lo) / (hi - lo)
        } else {
            0.5
        }
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" \
         viewBox=\"0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}\">\n"
    ));
    svg.push_str(&format!(
        "  <defs>\n    <linearGradient id=\"ramp\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"0\">\n      \
         <stop offset=\"0\" stop-color=\"{}\"/>\n      <stop offset=\"1\" stop-color=\"{}\"/>\n    \
         </linearGradient>\n  </defs>\n",
        ramp(0.0),
        ramp(1.0),
    ));
    svg.push_str(&format!(
        "  <rect width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" fill=\"#ffffff\"/>\n"
    ));

    let Some(projection) = Projection::fit(shapes) else {
        warn!("no geometry to render");
        svg.push_str("</svg>\n");
        return svg;
    };

    for shape in shapes {
        let result = by_code.get(shape.code.as_str());
        let ratio = result.and_then(|r| r.counts.ratio());
        let fill = match ratio {
            Some(ratio) => ramp(stretch(ratio)),
            None => {
                warn!(region = %shape.code, name = %shape.name,
                    "region has no result, drawing neutral");
                NEUTRAL_FILL.to_string()
            }
        };
        let title = match ratio {
            Some(ratio) => format!("{} — Choice A {:.1}%", shape.name, ratio * 100.0),
            None => format!("{} — no expressed ballots", shape.name),
        };

        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"{}\" fill-rule=\"evenodd\" stroke=\"#ffffff\" \
             stroke-width=\"0.8\" data-code=\"{}\"><title>{}</title></path>\n",
            path_data(&projection, &shape.rings),
            fill,
            escape_xml(&shape.code),
            escape_xml(&title),
        ));
    }

    // Legend: the ramp bar with the observed extremes underneath.
    if hi >= lo {
        let x = CANVAS_WIDTH - LEGEND_WIDTH - MARGIN;
        let y = CANVAS_HEIGHT - MARGIN - LEGEND_HEIGHT;
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{LEGEND_WIDTH}\" height=\"{LEGEND_HEIGHT}\" \
             fill=\"url(#ramp)\" stroke=\"#666666\" stroke-width=\"0.5\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"11\" font-family=\"sans-serif\">{:.1}%</text>\n",
            y + LEGEND_HEIGHT + 13.0,
            lo * 100.0,
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" font-family=\"sans-serif\" \
             text-anchor=\"end\">{:.1}%</text>\n",
            x + LEGEND_WIDTH,
            y + LEGEND_HEIGHT + 13.0,
            hi * 100.0,
        ));
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"12\" font-family=\"sans-serif\">\
             Choice A share of expressed ballots</text>\n",
            y - 6.0,
        ));
    }

    svg.push_str("</svg>\n");
    info!(shapes = shapes.len(), "rendered choropleth");
    svg
}

/// Writes the annotated per-region table next to the map.
pub fn write_results_csv(path: &Path, results: &[RegionResult]) -> Result<(), AtlasError> {
    let as_csv_err = |source: csv::Error| AtlasError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(as_csv_err)?;
    writer
        .write_record([
            "code_reg",
            "name_reg",
            "Registered",
            "Abstentions",
            "Null",
            "Choice A",
            "Choice B",
            "ratio",
        ])
        .map_err(as_csv_err)?;

    for result in results {
        let ratio = result
            .counts
            .ratio()
            .map(|r| format!("{r:.6}"))
            .unwrap_or_default();
        writer
            .write_record([
                result.region_code.as_str(),
                result.region_name.as_str(),
                &result.counts.registered.to_string(),
                &result.counts.abstentions.to_string(),
                &result.counts.null_votes.to_string(),
                &result.counts.choice_a.to_string(),
                &result.counts.choice_b.to_string(),
                &ratio,
            ])
            .map_err(as_csv_err)?;
    }
    writer.flush().map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(rows = results.len(), path = %path.display(), "wrote result table");
    Ok(())
}
