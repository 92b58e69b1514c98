//! Plain-text export of an `AnalysisReport`, plus the inverse score parser.

use std::fmt::Write;

use crate::analysis::scorer::{AnalysisReport, CheckValue};

/// Keywords listed per found/missing block.
pub const EXPORT_KEYWORD_LIMIT: usize = 15;

const TITLE: &str = "⭐ Resume Analysis Report ⭐";
const SCORE_PREFIX: &str = "📊 Overall ATS Score: ";
const FOOTER: &str = "Generated by Resume Analyzer Pro";

/// Renders the downloadable text report.
pub fn render_export(report: &AnalysisReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{SCORE_PREFIX}{:.1}%", report.overall_score);
    let _ = writeln!(out);
    let _ = write!(out, "🔍 Key Metrics:");

    for result in &report.checks {
        let (status, value) = match result.value {
            CheckValue::Flag(true) => ("✅", "Yes".to_string()),
            CheckValue::Flag(false) => ("❌", "No".to_string()),
            CheckValue::Percent(pct) => ("❌", format!("{pct:.1}%")),
        };
        let _ = write!(out, "\n{status} {}: {value}", result.label);
    }

    out.push_str("\n\n🔑 Keywords Analysis:");
    out.push_str("\n\n✅ Found Keywords:");
    push_list(&mut out, report.found_keywords.iter().take(EXPORT_KEYWORD_LIMIT));

    if !report.missing_keywords.is_empty() {
        out.push_str("\n\n❌ Missing Keywords:");
        push_list(&mut out, report.missing_keywords.iter().take(EXPORT_KEYWORD_LIMIT));
    }

    if !report.missing_sections.is_empty() {
        out.push_str("\n\n⚠️ Recommended Sections to Add:");
        let names: Vec<String> = report
            .missing_sections
            .iter()
            .map(|s| s.display_name())
            .collect();
        push_list(&mut out, names.iter());
    }

    let _ = write!(out, "\n\n{FOOTER}\n");
    out
}

fn push_list<'a>(out: &mut String, items: impl Iterator<Item = &'a String>) {
    for item in items {
        out.push_str("\n- ");
        out.push_str(item);
    }
}

/// Recovers the overall score printed by `render_export`.
/// Returns `None` when no score line is present or it does not parse.
#[cfg(test)]
pub fn parse_export_score(text: &str) -> Option<f64> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix(SCORE_PREFIX))
        .and_then(|rest| rest.trim().strip_suffix('%'))
        .and_then(|number| number.trim().parse::<f64>().ok())
}
