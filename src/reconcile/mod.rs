//! Country-code reconciliation across the plot-library, bridging-table,
//! and dataset vocabularies.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::CodeInfo;
use crate::error::Result;
use crate::table;

/// Uppercase-keyed map for case-insensitive code lookups. Folding is
/// applied to keys only; values keep whatever casing the caller stored.
/// When two keys collide after folding, the last one inserted wins.
#[derive(Debug, Default)]
pub struct CaseFoldMap<V> {
    entries: HashMap<String, V>,
}

impl<V> CaseFoldMap<V> {
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries = HashMap::new();
        for (key, value) in pairs {
            entries.insert(key.as_ref().to_uppercase(), value);
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&key.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the one-hop mapping from plot-library code to dataset code out
/// of the bridging code table. Codes keep the casing they have in the
/// file; duplicate plot codes resolve to the last row.
pub fn build_code_converter(info: &CodeInfo) -> Result<HashMap<String, String>> {
    let code_table = table::read_keyed_rows(
        &info.codefile,
        &info.plot_codes,
        info.separator,
        info.quote,
    )?;

    let mut converter = HashMap::with_capacity(code_table.len());
    for (plot_code, row) in &code_table {
        let data_code = table::column(row, &info.data_codes, &info.codefile)?;
        converter.insert(plot_code.clone(), data_code.to_string());
    }

    debug!(codes = converter.len(), "built country code converter");
    Ok(converter)
}

/// Resolve every plot code in `plot_countries` through the bridging
/// table and into `dataset`, case-insensitively.
///
/// Returns the mapping from plot code to dataset code for codes that
/// survive both hops, and the set of plot codes that fail either hop.
/// Keys in the mapping keep their casing from `plot_countries`; values
/// keep their casing from `dataset`.
pub fn reconcile_countries<V>(
    info: &CodeInfo,
    plot_countries: &HashMap<String, String>,
    dataset: &HashMap<String, V>,
) -> Result<(HashMap<String, String>, HashSet<String>)> {
    let converter = build_code_converter(info)?;

    let dataset_codes =
        CaseFoldMap::from_pairs(dataset.keys().map(|code| (code.as_str(), code.clone())));
    let converted = CaseFoldMap::from_pairs(
        converter
            .iter()
            .map(|(plot, data)| (plot.as_str(), data.to_uppercase())),
    );

    let mut matched = HashMap::new();
    let mut unmatched = HashSet::new();
    for plot_code in plot_countries.keys() {
        let resolved = converted
            .get(plot_code)
            .and_then(|data_code| dataset_codes.get(data_code));
        match resolved {
            Some(original) => {
                matched.insert(plot_code.clone(), original.clone());
            }
            None => {
                unmatched.insert(plot_code.clone());
            }
        }
    }

    debug!(
        matched = matched.len(),
        unmatched = unmatched.len(),
        codefile = %info.codefile.display(),
        "reconciled country codes"
    );
    Ok((matched, unmatched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn code_info(dir: &TempDir, contents: &str) -> CodeInfo {
        let codefile: PathBuf = dir.path().join("codes.csv");
        let mut file = File::create(&codefile).unwrap();
        write!(file, "{}", contents).unwrap();
        CodeInfo {
            codefile,
            separator: ',',
            quote: '"',
            plot_codes: "Code1".to_string(),
            data_codes: "Code2".to_string(),
        }
    }

    fn countries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_case_fold_map_preserves_values() {
        let map = CaseFoldMap::from_pairs([("usa", "usa"), ("Fra", "Fra")]);
        assert_eq!(map.get("USA"), Some(&"usa"));
        assert_eq!(map.get("fra"), Some(&"Fra"));
        assert_eq!(map.get("DEU"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_case_fold_map_last_insert_wins() {
        let map = CaseFoldMap::from_pairs([("aa", 1), ("AA", 2)]);
        assert_eq!(map.get("Aa"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_build_code_converter() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\nAA,XA\nBB,XB\n");

        let converter = build_code_converter(&info)?;
        assert_eq!(converter.len(), 2);
        assert_eq!(converter["AA"], "XA");
        assert_eq!(converter["BB"], "XB");
        Ok(())
    }

    #[test]
    fn test_build_code_converter_duplicate_plot_code() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\nAA,XA\nAA,XB\n");

        let converter = build_code_converter(&info)?;
        assert_eq!(converter.len(), 1);
        assert_eq!(converter["AA"], "XB");
        Ok(())
    }

    #[test]
    fn test_build_code_converter_missing_column() {
        let dir = tempdir().unwrap();
        let mut info = code_info(&dir, "Code1,Code2\nAA,XA\n");
        info.data_codes = "Code3".to_string();

        let err = build_code_converter(&info).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::MissingColumn { column, .. } if column == "Code3"
        ));
    }

    #[test]
    fn test_reconcile_both_hops() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\nAA,XA\nBB,XB\n");
        let plot = countries(&[("AA", "Landia"), ("BB", "Otherland"), ("CC", "Nowhere")]);
        let dataset: HashMap<String, String> = countries(&[("XA", ""), ("XB", "")]);

        let (matched, unmatched) = reconcile_countries(&info, &plot, &dataset)?;
        assert_eq!(matched.len(), 2);
        assert_eq!(matched["AA"], "XA");
        assert_eq!(matched["BB"], "XB");
        assert_eq!(unmatched, HashSet::from(["CC".to_string()]));
        Ok(())
    }

    #[test]
    fn test_reconcile_case_insensitive_case_preserving() -> Result<()> {
        let dir = tempdir().unwrap();
        // bridging table: "US" -> "USA"; dataset key is lowercase "usa"
        let info = code_info(&dir, "Code1,Code2\nUS,USA\n");
        let plot = countries(&[("us", "United States")]);
        let dataset: HashMap<String, u32> = [("usa".to_string(), 0)].into();

        let (matched, unmatched) = reconcile_countries(&info, &plot, &dataset)?;
        assert!(unmatched.is_empty());
        assert_eq!(matched, countries(&[("us", "usa")]));
        Ok(())
    }

    #[test]
    fn test_reconcile_lowercase_bridging_entry() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\naa,XA\n");
        let plot = countries(&[("AA", "Landia")]);
        let dataset: HashMap<String, u32> = [("XA".to_string(), 0)].into();

        let (matched, unmatched) = reconcile_countries(&info, &plot, &dataset)?;
        assert!(unmatched.is_empty());
        assert_eq!(matched["AA"], "XA");
        Ok(())
    }

    #[test]
    fn test_reconcile_bridged_but_absent_from_dataset() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\nAA,XA\n");
        let plot = countries(&[("AA", "Landia")]);
        let dataset: HashMap<String, u32> = HashMap::new();

        let (matched, unmatched) = reconcile_countries(&info, &plot, &dataset)?;
        assert!(matched.is_empty());
        assert_eq!(unmatched, HashSet::from(["AA".to_string()]));
        Ok(())
    }

    #[test]
    fn test_reconcile_idempotent() -> Result<()> {
        let dir = tempdir().unwrap();
        let info = code_info(&dir, "Code1,Code2\nAA,XA\nBB,XB\n");
        let plot = countries(&[("AA", "Landia"), ("CC", "Nowhere")]);
        let dataset: HashMap<String, u32> = [("xa".to_string(), 0)].into();

        let first = reconcile_countries(&info, &plot, &dataset)?;
        let second = reconcile_countries(&info, &plot, &dataset)?;
        assert_eq!(first, second);
        Ok(())
    }
}
