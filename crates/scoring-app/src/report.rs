//! Plain-text reports for the command line

use data_validator::ValidationConfig;
use feature_engine::{Attribute, CategoryMapping, SchemaAudit};
use std::fmt::Write;

fn range(name: &str, (min, max): (f64, f64), unit: &str) -> String {
    format!("{name}: {min} to {max} {unit}\n")
}

/// Selectable labels per attribute and the accepted numeric ranges
pub fn options_report(bounds: &ValidationConfig) -> String {
    let mut out = String::new();
    out.push_str(&range("Age", bounds.age_range, "years"));
    out.push_str(&range("Loan Duration", bounds.duration_range, "months"));
    out.push_str(&range("Loan Amount", bounds.amount_range, "(₹)"));

    for attribute in Attribute::EXPOSED {
        let Some(mapping) = CategoryMapping::for_attribute(attribute) else {
            continue;
        };
        let _ = writeln!(out, "\n{}:", attribute.display_name());
        for (label, code) in mapping.entries() {
            let _ = writeln!(out, "  {label}  [{code}]");
        }
    }
    out
}

/// Human-readable schema audit
pub fn audit_report(audit: &SchemaAudit) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "present: {}  baseline: {}  missing: {}  unrecognized: {}",
        audit.present.len(),
        audit.baseline.len(),
        audit.missing.len(),
        audit.unrecognized.len()
    );
    let sections = [
        ("Baseline (dropped reference level)", &audit.baseline),
        ("Missing (signal dropped)", &audit.missing),
        ("Unrecognized schema columns", &audit.unrecognized),
    ];
    for (title, columns) in sections {
        if columns.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{title}:");
        for column in columns {
            let _ = writeln!(out, "  {column}");
        }
    }
    out
}
