//! Parser for SharpCover instrumentation traces.
//!
//! One record per line:
//!
//! ```text
//! ["!"]<assembly>\t<typeName>\t<methodSignature>\t<lineStart>\t<lineEnd>\t<ignored>\t<instruction>[\t<sourceFile>]
//! ```
//!
//! A leading `!` marks the range as missed and is stripped before the
//! tab split. Seven fields mean no source file; an eighth field carries
//! it. `lineStart`/`lineEnd` are base-10 integers where `-1` means "not
//! mapped to a line".
//!
//! Parsing is fail-fast: the first malformed line aborts the whole parse
//! and no records are returned. The input is a static artifact from a
//! prior collector run, so partial results would only hide corruption.

use std::io::BufRead;

use crate::error::{Result, SharpcovError};
use crate::model::CoverageRecord;

/// Parse a full trace from raw bytes into the ordered record list.
pub fn parse(input: &[u8]) -> Result<Vec<CoverageRecord>> {
    parse_reader(&mut &*input)
}

/// Streaming driver: reads line-by-line from a buffered reader so the
/// full input need not be in memory at once. The record list itself is
/// fully materialized; aggregation never starts on a partial trace.
pub fn parse_reader(reader: &mut dyn BufRead) -> Result<Vec<CoverageRecord>> {
    let mut records = Vec::new();
    let mut position = 0usize;

    let mut raw_line = String::new();
    loop {
        raw_line.clear();
        let n = reader.read_line(&mut raw_line)?;
        if n == 0 {
            break; // EOF
        }
        position += 1;

        // Strip only the line terminator; tabs and spaces are field data.
        let line = raw_line.trim_end_matches(['\n', '\r']);
        records.push(parse_record(line, position)?);
    }

    Ok(records)
}

/// Tokenize one trace line (no trailing newline) into a record.
///
/// `position` is the line's 1-based position in the trace, reported in
/// errors for diagnostics.
pub fn parse_record(line: &str, position: usize) -> Result<CoverageRecord> {
    let missed = line.starts_with('!');
    let body = line.trim_start_matches('!');

    let fields: Vec<&str> = body.split('\t').collect();
    if fields.len() < 7 {
        return Err(SharpcovError::MalformedLine {
            line: line.to_string(),
            position,
        });
    }

    let line_start = parse_line_number(fields[3], line, position)?;
    let line_end = parse_line_number(fields[4], line, position)?;

    // Field 5 is ignored by the collector's own tooling as well.
    let source_file = if fields.len() == 8 { fields[7] } else { "" };

    Ok(CoverageRecord {
        assembly: fields[0].to_string(),
        type_name: fields[1].to_string(),
        method_signature: fields[2].to_string(),
        line_start,
        line_end,
        instruction: fields[6].to_string(),
        source_file: source_file.to_string(),
        missed,
    })
}

fn parse_line_number(field: &str, line: &str, position: usize) -> Result<i32> {
    field
        .parse::<i32>()
        .map_err(|_| SharpcovError::InvalidLineNumber {
            line: line.to_string(),
            position,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hit_record_with_source_file() {
        let record =
            parse_record("AsmA\tNs.TypeA\tNs.TypeA.Test1/0\t5\t7\t0\tnop\tfile.cs", 1).unwrap();
        assert_eq!(record.assembly, "AsmA");
        assert_eq!(record.type_name, "Ns.TypeA");
        assert_eq!(record.method_signature, "Ns.TypeA.Test1/0");
        assert_eq!(record.line_start, 5);
        assert_eq!(record.line_end, 7);
        assert_eq!(record.instruction, "nop");
        assert_eq!(record.source_file, "file.cs");
        assert!(!record.missed);
    }

    #[test]
    fn test_parse_miss_marker() {
        let record =
            parse_record("!AsmA\tNs.TypeA\tNs.TypeA.Test1/0\t5\t7\t0\tnop\tfile.cs", 1).unwrap();
        assert!(record.missed);
        assert_eq!(record.assembly, "AsmA");
    }

    #[test]
    fn test_parse_strips_all_leading_bangs() {
        let record =
            parse_record("!!!AsmA\tT\tT.M/0\t1\t1\t0\tnop\tf.cs", 1).unwrap();
        assert!(record.missed);
        assert_eq!(record.assembly, "AsmA");
    }

    #[test]
    fn test_parse_seven_fields_means_no_source_file() {
        let record = parse_record("AsmA\tT\tT.M/0\t1\t2\t0\tnop", 1).unwrap();
        assert_eq!(record.source_file, "");
    }

    #[test]
    fn test_parse_sentinel_line_numbers() {
        let record = parse_record("AsmA\tT\tT.M/0\t-1\t-1\t0\tret", 1).unwrap();
        assert_eq!(record.line_start, -1);
        assert_eq!(record.line_end, -1);
    }

    #[test]
    fn test_parse_too_few_fields() {
        let err = parse_record("AsmA\tT\tT.M/0\t1\t2", 4).unwrap_err();
        match err {
            SharpcovError::MalformedLine { line, position } => {
                assert_eq!(line, "AsmA\tT\tT.M/0\t1\t2");
                assert_eq!(position, 4);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_integer_line_number() {
        let err = parse_record("AsmA\tT\tT.M/0\tfive\t7\t0\tnop", 2).unwrap_err();
        match err {
            SharpcovError::InvalidLineNumber { position, .. } => assert_eq!(position, 2),
            other => panic!("expected InvalidLineNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_preserves_record_order() {
        let input = b"AsmA\tT\tT.M/0\t1\t1\t0\tnop\ta.cs\n\
            AsmB\tU\tU.M/0\t2\t2\t0\tnop\tb.cs\n";
        let records = parse(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].assembly, "AsmA");
        assert_eq!(records[1].assembly, "AsmB");
    }

    #[test]
    fn test_parse_aborts_on_first_bad_line() {
        let input = b"AsmA\tT\tT.M/0\t1\t1\t0\tnop\ta.cs\n\
            garbage\n\
            AsmB\tU\tU.M/0\t2\t2\t0\tnop\tb.cs\n";
        let err = parse(input).unwrap_err();
        match err {
            SharpcovError::MalformedLine { line, position } => {
                assert_eq!(line, "garbage");
                assert_eq!(position, 2);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_handles_crlf() {
        let input = b"AsmA\tT\tT.M/0\t1\t1\t0\tnop\ta.cs\r\n";
        let records = parse(input).unwrap();
        assert_eq!(records[0].source_file, "a.cs");
    }

    #[test]
    fn test_parse_empty_input() {
        let records = parse(b"").unwrap();
        assert!(records.is_empty());
    }
}
