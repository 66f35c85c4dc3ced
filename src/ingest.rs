use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::aggregate;
use crate::error::Result;
use crate::model::Assembly;
use crate::parser;

/// Read a SharpCover trace file, parse it, and aggregate it into the
/// assembly tree. The trace is read streaming but fully materialized as
/// records before aggregation begins.
pub fn ingest(path: &Path) -> Result<Vec<Assembly>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let records = parser::parse_reader(&mut reader)?;
    Ok(aggregate::aggregate(&records))
}
