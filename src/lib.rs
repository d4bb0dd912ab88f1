//! Reconcile the country-code vocabularies of a map-plotting library
//! and a GDP dataset, resolve per-country log10 GDP for a year, and
//! render the result as an SVG choropleth.

pub mod config;
pub mod countries;
pub mod error;
pub mod reconcile;
pub mod render;
pub mod resolve;
pub mod table;

pub use config::{CodeInfo, Config, GdpInfo};
pub use error::{Error, Result};
pub use render::render_world_map;
pub use resolve::{resolve_year_values, YearValues};
