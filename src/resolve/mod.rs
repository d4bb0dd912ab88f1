//! Joining reconciled country codes against the GDP table for one year.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::config::{CodeInfo, GdpInfo};
use crate::error::{Error, Result};
use crate::{reconcile, table};

/// Per-year result: log-scaled values plus the two no-data groups. The
/// three groups are disjoint and together cover every plot code that
/// was fed in.
#[derive(Debug, Default, PartialEq)]
pub struct YearValues {
    /// Plot code -> log10 of the GDP figure for the target year.
    pub values: HashMap<String, f64>,
    /// Plot codes with no corresponding entry in the GDP table.
    pub missing_code: HashSet<String>,
    /// Plot codes present in the GDP table but with an empty figure for
    /// the target year.
    pub missing_year: HashSet<String>,
}

/// Load the GDP table, reconcile `plot_countries` against it, and
/// resolve the figure for `year` into log10 values.
#[tracing::instrument(level = "debug", skip(gdp_info, code_info, plot_countries))]
pub fn resolve_year_values(
    gdp_info: &GdpInfo,
    code_info: &CodeInfo,
    plot_countries: &HashMap<String, String>,
    year: &str,
) -> Result<YearValues> {
    let gdp_table = table::read_keyed_rows(
        &gdp_info.gdpfile,
        &gdp_info.country_code,
        gdp_info.separator,
        gdp_info.quote,
    )?;

    let (matched, missing_code) =
        reconcile::reconcile_countries(code_info, plot_countries, &gdp_table)?;

    let result = partition_by_year(&gdp_table, matched, missing_code, year, &gdp_info.gdpfile)?;

    debug!(
        year,
        valued = result.values.len(),
        missing_code = result.missing_code.len(),
        missing_year = result.missing_year.len(),
        "resolved year values"
    );
    Ok(result)
}

/// Split the matched codes into the value map and the no-year group.
/// Every plot code ends up in exactly one of the three groups.
fn partition_by_year(
    gdp_table: &HashMap<String, table::Row>,
    matched: HashMap<String, String>,
    mut missing_code: HashSet<String>,
    year: &str,
    gdpfile: &Path,
) -> Result<YearValues> {
    let mut values = HashMap::new();
    let mut missing_year = HashSet::new();
    for (plot_code, data_code) in matched {
        // reconcile returns data codes taken verbatim from the GDP
        // table's keys; a code that is somehow gone counts as having
        // no data source rather than dropping out of the partition
        let Some(record) = gdp_table.get(&data_code) else {
            missing_code.insert(plot_code);
            continue;
        };
        let raw = table::column(record, year, gdpfile)?;
        if raw.is_empty() {
            missing_year.insert(plot_code);
            continue;
        }

        let gdp: f64 = raw.parse().map_err(|_| Error::InvalidNumber {
            code: data_code.clone(),
            year: year.to_string(),
            value: raw.to_string(),
        })?;
        // NaN and infinity parse as f64 but make no GDP figure; NaN in
        // particular would slip past the non-positive check below
        if !gdp.is_finite() {
            return Err(Error::InvalidNumber {
                code: data_code,
                year: year.to_string(),
                value: raw.to_string(),
            });
        }
        if gdp <= 0.0 {
            return Err(Error::NonPositiveValue {
                code: data_code,
                year: year.to_string(),
                value: gdp,
            });
        }
        values.insert(plot_code, gdp.log10());
    }

    Ok(YearValues {
        values,
        missing_code,
        missing_year,
    })
}
