//! Aggregation of parsed trace records into the coverage tree.
//!
//! Three nested grouping passes (assembly → type → source file), each
//! preserving the records' original relative order within a group. That
//! order is load-bearing: when two records' line ranges overlap, the one
//! that appeared later in the trace wins for the overlapping lines.
//! Per-test-method attribution reuses the same array-fill algorithm,
//! scoped to one method's records.

use std::collections::HashMap;

use crate::model::{
    Assembly, Class, CodeFile, CoverageRecord, LineVisit, MethodCoverage, TestMethod,
};
use crate::names::short_display_name;

/// Prefix the compiler uses for synthesized anonymous types.
const ANON_TYPE_PREFIX: &str = "<>__AnonType";

/// Whether a type name denotes a compiler-synthesized type. Such types
/// carry no actionable coverage information and are filtered from the
/// model.
#[must_use]
pub fn is_compiler_generated(type_name: &str) -> bool {
    type_name.starts_with(ANON_TYPE_PREFIX)
}

/// Build the full assembly tree from the ordered record list.
pub fn aggregate(records: &[CoverageRecord]) -> Vec<Assembly> {
    let refs: Vec<&CoverageRecord> = records.iter().collect();
    group_by(&refs, |r| r.assembly.as_str())
        .into_iter()
        .map(|(name, group)| Assembly {
            name: name.to_string(),
            classes: aggregate_classes(&group),
        })
        .collect()
}

fn aggregate_classes(records: &[&CoverageRecord]) -> Vec<Class> {
    let mut classes = Vec::new();
    for (type_name, group) in group_by(records, |r| r.type_name.as_str()) {
        if is_compiler_generated(type_name) {
            continue;
        }

        // Grouping never yields an empty group, so the ratio is well-defined.
        let hits = group.iter().filter(|r| !r.missed).count();
        let coverage_quota = hits as f64 / group.len() as f64;

        classes.push(Class {
            name: type_name.to_string(),
            coverage_quota,
            files: aggregate_files(&group),
        });
    }
    classes
}

fn aggregate_files(records: &[&CoverageRecord]) -> Vec<CodeFile> {
    let with_source: Vec<&CoverageRecord> = records
        .iter()
        .filter(|r| !r.source_file.is_empty())
        .copied()
        .collect();

    let mut files = Vec::new();
    for (path, group) in group_by(&with_source, |r| r.source_file.as_str()) {
        // A group whose records are all unmapped carries no line info.
        let Some(line_coverage) = fill_coverage(&group) else {
            continue;
        };
        files.push(CodeFile {
            path: path.to_string(),
            line_coverage,
            methods: attribute_methods(&group),
        });
    }
    files
}

fn attribute_methods(records: &[&CoverageRecord]) -> Vec<MethodCoverage> {
    let mut methods = Vec::new();
    for (signature, group) in group_by(records, |r| r.method_signature.as_str()) {
        let Some(line_coverage) = fill_coverage(&group) else {
            continue;
        };
        methods.push(MethodCoverage {
            method: TestMethod {
                name: signature.to_string(),
                short_name: short_display_name(signature).to_string(),
            },
            line_coverage,
        });
    }
    methods
}

/// Synthesize a per-line coverage array from a group of records.
///
/// The array spans `0..=max(line_start)` with index 0 as unused padding.
/// Records are replayed in their original trace order and each fills its
/// inclusive `[line_start, line_end]` range, so a later record overwrites
/// an earlier one wherever their ranges overlap (last write wins, not a
/// hit-wins merge). Unmapped records (`line_start == -1`) are skipped;
/// returns `None` when the whole group is unmapped. A `line_end` past the
/// array or before `line_start` fills nothing beyond the valid span.
fn fill_coverage(records: &[&CoverageRecord]) -> Option<Vec<LineVisit>> {
    let max_line = records.iter().map(|r| r.line_start).max()?;
    if max_line < 0 {
        return None;
    }

    let mut coverage = vec![LineVisit::NotInstrumented; max_line as usize + 1];
    for record in records {
        if record.line_start < 0 || record.line_end < record.line_start {
            continue;
        }
        let visit = if record.missed {
            LineVisit::Missed
        } else {
            LineVisit::Hit
        };
        let start = record.line_start as usize;
        let end = (record.line_end as usize).min(max_line as usize);
        for slot in &mut coverage[start..=end] {
            *slot = visit;
        }
    }

    Some(coverage)
}

/// Group records by a string key, preserving both the first-seen order of
/// keys and the records' relative order within each group.
fn group_by<'a>(
    records: &[&'a CoverageRecord],
    key: impl Fn(&'a CoverageRecord) -> &'a str,
) -> Vec<(&'a str, Vec<&'a CoverageRecord>)> {
    let mut order: Vec<&'a str> = Vec::new();
    let mut groups: HashMap<&'a str, Vec<&'a CoverageRecord>> = HashMap::new();

    for &record in records {
        let k = key(record);
        if !groups.contains_key(k) {
            order.push(k);
        }
        groups.entry(k).or_default().push(record);
    }

    order
        .into_iter()
        .filter_map(|k| groups.remove(k).map(|group| (k, group)))
        .collect()
}
