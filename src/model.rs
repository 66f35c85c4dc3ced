//! In-memory representation of SharpCover trace data. The parser produces a
//! flat list of `CoverageRecord`s which the aggregator turns into the
//! assembly → class → file → method tree handed to report renderers.

use serde::ser::Serializer;
use serde::Serialize;

/// One parsed trace line.
///
/// The identity fields are opaque strings taken verbatim from the trace;
/// they are never validated beyond presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRecord {
    pub assembly: String,
    pub type_name: String,
    pub method_signature: String,
    /// Inclusive start of the covered line range. `-1` means the record
    /// carries no source mapping.
    pub line_start: i32,
    /// Inclusive end of the covered line range.
    pub line_end: i32,
    /// Raw instruction token. Retained for renderers, not interpreted here.
    pub instruction: String,
    /// Empty string means the record has no associated source file.
    pub source_file: String,
    /// True if this range was NOT executed.
    pub missed: bool,
}

/// Execution state of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVisit {
    NotInstrumented,
    Missed,
    Hit,
}

impl LineVisit {
    /// The integer encoding used by the report model: -1/0/1.
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            LineVisit::NotInstrumented => -1,
            LineVisit::Missed => 0,
            LineVisit::Hit => 1,
        }
    }
}

// Renderers consume coverage arrays as plain -1/0/1 integers.
impl Serialize for LineVisit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// A test method, identified by its full signature from the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMethod {
    /// Full method signature, e.g. `MyNamespace.MyClass.MyTest/0`.
    pub name: String,
    /// Derived human-readable name, e.g. `MyTest/0`.
    pub short_name: String,
}

/// Per-test-method line coverage within one source file.
#[derive(Debug, Clone, Serialize)]
pub struct MethodCoverage {
    pub method: TestMethod,
    /// Same shape as [`CodeFile::line_coverage`], scoped to this method's
    /// records.
    pub line_coverage: Vec<LineVisit>,
}

/// One source file of a class, with its per-line coverage.
#[derive(Debug, Clone, Serialize)]
pub struct CodeFile {
    pub path: String,
    /// Indexed by source line number; index 0 is unused padding.
    pub line_coverage: Vec<LineVisit>,
    pub methods: Vec<MethodCoverage>,
}

impl CodeFile {
    /// Number of instrumented lines (hit or missed).
    #[must_use]
    pub fn instrumented_lines(&self) -> usize {
        self.line_coverage
            .iter()
            .filter(|v| **v != LineVisit::NotInstrumented)
            .count()
    }

    /// Number of instrumented lines that were executed.
    #[must_use]
    pub fn hit_lines(&self) -> usize {
        self.line_coverage
            .iter()
            .filter(|v| **v == LineVisit::Hit)
            .count()
    }
}

/// A type within an assembly.
#[derive(Debug, Clone, Serialize)]
pub struct Class {
    pub name: String,
    /// Fraction of this class's records that were executed, 0.0–1.0.
    pub coverage_quota: f64,
    pub files: Vec<CodeFile>,
}

/// Top level of the coverage tree.
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub name: String,
    pub classes: Vec<Class>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_visit_encoding() {
        assert_eq!(LineVisit::NotInstrumented.as_i8(), -1);
        assert_eq!(LineVisit::Missed.as_i8(), 0);
        assert_eq!(LineVisit::Hit.as_i8(), 1);
    }

    #[test]
    fn test_line_visit_serializes_as_integer() {
        let visits = vec![LineVisit::NotInstrumented, LineVisit::Missed, LineVisit::Hit];
        let json = serde_json::to_string(&visits).unwrap();
        assert_eq!(json, "[-1,0,1]");
    }

    #[test]
    fn test_code_file_line_counts() {
        let file = CodeFile {
            path: "a.cs".to_string(),
            line_coverage: vec![
                LineVisit::NotInstrumented,
                LineVisit::Hit,
                LineVisit::Missed,
                LineVisit::Hit,
            ],
            methods: vec![],
        };
        assert_eq!(file.instrumented_lines(), 3);
        assert_eq!(file.hit_lines(), 2);
    }
}
