//! Command handler functions for the sharpcov CLI.
//!
//! Each `cmd_*` function takes the aggregated assembly tree and returns
//! its output as a `String`, making them easy to test without capturing
//! stdout.

use std::fmt::Write;

use anyhow::{bail, Result};

use crate::model::{Assembly, CodeFile};

pub fn cmd_summary(assemblies: &[Assembly]) -> Result<String> {
    let classes: usize = assemblies.iter().map(|a| a.classes.len()).sum();
    let mut files = 0usize;
    let mut instrumented = 0usize;
    let mut hit = 0usize;
    for file in all_files(assemblies) {
        files += 1;
        instrumented += file.instrumented_lines();
        hit += file.hit_lines();
    }

    let mut out = String::new();
    writeln!(out, "Assemblies: {}", assemblies.len()).unwrap();
    writeln!(out, "Classes:    {}", classes).unwrap();
    writeln!(out, "Files:      {}", files).unwrap();
    if instrumented > 0 {
        writeln!(
            out,
            "Lines:      {}/{} ({:.1}%)",
            hit,
            instrumented,
            hit as f64 / instrumented as f64 * 100.0
        )
        .unwrap();
    } else {
        writeln!(out, "Lines:      0/0").unwrap();
    }
    Ok(out)
}

pub fn cmd_classes(assemblies: &[Assembly]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:<45} {:<20} {:>8}", "CLASS", "ASSEMBLY", "QUOTA").unwrap();
    writeln!(out, "{}", "-".repeat(75)).unwrap();
    for assembly in assemblies {
        for class in &assembly.classes {
            writeln!(
                out,
                "{:<45} {:<20} {:>7.1}%",
                class.name,
                assembly.name,
                class.coverage_quota * 100.0
            )
            .unwrap();
        }
    }
    Ok(out)
}

pub fn cmd_files(assemblies: &[Assembly]) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<60} {:>8} {:>8} {:>8}",
        "FILE", "LINES", "COVERED", "RATE"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(88)).unwrap();
    for file in all_files(assemblies) {
        let instrumented = file.instrumented_lines();
        let hit = file.hit_lines();
        let rate = if instrumented > 0 {
            hit as f64 / instrumented as f64 * 100.0
        } else {
            0.0
        };
        writeln!(
            out,
            "{:<60} {:>8} {:>8} {:>7.1}%",
            file.path, instrumented, hit, rate
        )
        .unwrap();
    }
    Ok(out)
}

pub fn cmd_methods(assemblies: &[Assembly], source_file: &str) -> Result<String> {
    let matches: Vec<&CodeFile> = all_files(assemblies)
        .filter(|f| f.path == source_file)
        .collect();
    if matches.is_empty() {
        bail!("No coverage data for '{}'", source_file);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{:<50} {:>8} {:>8} {:>8}",
        "METHOD", "LINES", "COVERED", "RATE"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(78)).unwrap();
    for file in matches {
        for method in &file.methods {
            let instrumented = method
                .line_coverage
                .iter()
                .filter(|v| v.as_i8() >= 0)
                .count();
            let hit = method
                .line_coverage
                .iter()
                .filter(|v| v.as_i8() == 1)
                .count();
            let rate = if instrumented > 0 {
                hit as f64 / instrumented as f64 * 100.0
            } else {
                0.0
            };
            writeln!(
                out,
                "{:<50} {:>8} {:>8} {:>7.1}%",
                method.method.short_name, instrumented, hit, rate
            )
            .unwrap();
        }
    }
    Ok(out)
}

pub fn cmd_json(assemblies: &[Assembly]) -> Result<String> {
    let mut out = serde_json::to_string_pretty(assemblies)?;
    out.push('\n');
    Ok(out)
}

fn all_files(assemblies: &[Assembly]) -> impl Iterator<Item = &CodeFile> {
    assemblies
        .iter()
        .flat_map(|a| &a.classes)
        .flat_map(|c| &c.files)
}
