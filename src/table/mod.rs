//! Loading delimited tabular files into keyed row maps.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};

/// One record of a loaded table, field name to field value.
pub type Row = HashMap<String, String>;

fn ascii_byte(c: char) -> Result<u8> {
    u8::try_from(c).map_err(|_| Error::BadDelimiter(c))
}

/// Read a delimited file with a header row into a map from the value of
/// `key_column` to the full row. Later rows overwrite earlier ones when
/// they share a key.
pub fn read_keyed_rows(
    path: &Path,
    key_column: &str,
    separator: char,
    quote: char,
) -> Result<HashMap<String, Row>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(ascii_byte(separator)?)
        .quote(ascii_byte(quote)?)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    if !headers.iter().any(|h| h == key_column) {
        return Err(Error::MissingColumn {
            column: key_column.to_string(),
            path: path.to_path_buf(),
        });
    }

    let mut keyed = HashMap::new();
    for record in reader.records() {
        let record = record.map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let mut row = Row::with_capacity(headers.len());
        for (name, value) in headers.iter().zip(record.iter()) {
            row.insert(name.to_string(), value.to_string());
        }

        // Presence in the header was checked above; a short record would
        // already have failed as a CSV parse error.
        if let Some(key) = row.get(key_column) {
            let key = key.clone();
            keyed.insert(key, row);
        }
    }

    debug!(rows = keyed.len(), path = %path.display(), "loaded table");
    Ok(keyed)
}

/// Fetch a named column from a row, failing with the missing-column
/// error if the table does not carry it.
pub fn column<'a>(row: &'a Row, column: &str, path: &Path) -> Result<&'a str> {
    row.get(column).map(String::as_str).ok_or_else(|| Error::MissingColumn {
        column: column.to_string(),
        path: path.to_path_buf(),
    })
}
