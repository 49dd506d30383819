use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::error::CatalogError;
use crate::models::BookRecord;

/// Indentation used for every write so the file stays easy to read and diff.
const INDENT: &[u8] = b"    ";

/// Read the catalog file at `path`. A missing file is not an error and yields
/// `Ok(None)`; anything that is not a JSON array of objects is a parse error.
pub fn read_records(path: &Path) -> Result<Option<Vec<BookRecord>>, CatalogError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no catalog file at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parse_err = |source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // Entries go through `Map` first so positional arrays are not mistaken for
    // records.
    let entries: Vec<Map<String, Value>> = serde_json::from_slice(&raw).map_err(parse_err)?;
    let records = entries
        .into_iter()
        .map(|entry| BookRecord::deserialize(Value::Object(entry)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(parse_err)?;

    debug!("read {} books from {}", records.len(), path.display());
    Ok(Some(records))
}

/// Overwrite `path` with the full list of records.
pub fn write_records(path: &Path, records: &[BookRecord]) -> Result<(), CatalogError> {
    let persist_err = |source| CatalogError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let payload = encode(records).map_err(persist_err)?;
    fs::write(path, payload).map_err(persist_err)?;

    debug!("wrote {} books to {}", records.len(), path.display());
    Ok(())
}

fn encode(records: &[BookRecord]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}
