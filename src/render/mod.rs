//! SVG choropleth output.
//!
//! Countries are drawn as a tile grid rather than true geometry: one
//! labeled square per plot code, shaded by its log10 GDP value, with
//! flat grey fills for the two no-data groups.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{CodeInfo, GdpInfo};
use crate::error::{Error, Result};
use crate::resolve::{self, YearValues};

const TILE: u32 = 46;
const GAP: u32 = 4;
const COLUMNS: u32 = 16;
const HEADER: u32 = 70;
const LEGEND: u32 = 40;

/// Fill for codes absent from the GDP data entirely.
const FILL_NO_SOURCE: &str = "#d9d9d9";
/// Fill for codes with no figure for the requested year.
const FILL_NO_YEAR: &str = "#8c8c8c";

/// Light and dark ends of the value ramp.
const RAMP_LOW: (u8, u8, u8) = (0xc6, 0xdb, 0xef);
const RAMP_HIGH: (u8, u8, u8) = (0x08, 0x30, 0x6b);

fn ramp_color(t: f64) -> String {
    let lerp = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(RAMP_LOW.0, RAMP_HIGH.0),
        lerp(RAMP_LOW.1, RAMP_HIGH.1),
        lerp(RAMP_LOW.2, RAMP_HIGH.2)
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Build the SVG document for one year's resolved values. Tiles are
/// laid out in sorted plot-code order so output is deterministic.
pub fn world_map_svg(
    plot_countries: &HashMap<String, String>,
    year_values: &YearValues,
    year: &str,
) -> String {
    let mut codes: Vec<&String> = plot_countries.keys().collect();
    codes.sort();

    let (min, max) = year_values
        .values
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;

    let rows = (codes.len() as u32).div_ceil(COLUMNS);
    let width = COLUMNS * (TILE + GAP) + GAP;
    let height = HEADER + rows * (TILE + GAP) + LEGEND + GAP;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         font-family=\"sans-serif\">\n",
        width, height
    ));
    svg.push_str(&format!(
        "  <title>World GDP {year} (log10)</title>\n\
         \x20 <text x=\"{}\" y=\"40\" font-size=\"24\" text-anchor=\"middle\">\
         World GDP {year} (log10 scale)</text>\n",
        width / 2,
    ));

    for (idx, code) in codes.iter().enumerate() {
        let idx = idx as u32;
        let x = GAP + (idx % COLUMNS) * (TILE + GAP);
        let y = HEADER + (idx / COLUMNS) * (TILE + GAP);

        let (fill, label_fill) = if let Some(value) = year_values.values.get(*code) {
            let t = if span > 0.0 { (value - min) / span } else { 1.0 };
            let label = if t > 0.5 { "#ffffff" } else { "#000000" };
            (ramp_color(t), label)
        } else if year_values.missing_year.contains(*code) {
            (FILL_NO_YEAR.to_string(), "#ffffff")
        } else {
            (FILL_NO_SOURCE.to_string(), "#000000")
        };

        let name = plot_countries.get(*code).map(String::as_str).unwrap_or("");
        svg.push_str(&format!(
            "  <g>\n\
             \x20   <title>{}</title>\n\
             \x20   <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n\
             \x20   <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"{}\" \
             text-anchor=\"middle\">{}</text>\n\
             \x20 </g>\n",
            xml_escape(name),
            x,
            y,
            TILE,
            TILE,
            fill,
            x + TILE / 2,
            y + TILE / 2 + 4,
            label_fill,
            xml_escape(code),
        ));
    }

    let legend_y = HEADER + rows * (TILE + GAP) + GAP;
    let entries = [
        (ramp_color(0.8), "GDP data".to_string()),
        (FILL_NO_SOURCE.to_string(), "Not in GDP data".to_string()),
        (FILL_NO_YEAR.to_string(), format!("No {} info", year)),
    ];
    for (idx, (fill, label)) in entries.iter().enumerate() {
        let x = GAP + idx as u32 * 180;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"14\" height=\"14\" fill=\"{}\"/>\n\
             \x20 <text x=\"{}\" y=\"{}\" font-size=\"13\">{}</text>\n",
            x,
            legend_y,
            fill,
            x + 20,
            legend_y + 12,
            xml_escape(label),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Run the full pipeline for one year and write the choropleth to
/// `out_path`.
#[tracing::instrument(level = "info", skip(gdp_info, code_info, plot_countries))]
pub fn render_world_map(
    gdp_info: &GdpInfo,
    code_info: &CodeInfo,
    plot_countries: &HashMap<String, String>,
    year: &str,
    out_path: &Path,
) -> Result<()> {
    let year_values = resolve::resolve_year_values(gdp_info, code_info, plot_countries, year)?;
    let svg = world_map_svg(plot_countries, &year_values, year);

    fs::write(out_path, svg).map_err(|source| Error::Io {
        path: out_path.to_path_buf(),
        source,
    })?;

    info!(
        year,
        countries = plot_countries.len(),
        valued = year_values.values.len(),
        path = %out_path.display(),
        "wrote world map"
    );
    Ok(())
}
