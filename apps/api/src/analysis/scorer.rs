//! ATS scorer. Weighs keyword overlap, section presence, length, formatting and
//! contact details into a single 0–100 compatibility score.
//!
//! `AtsAnalyzer` is stateless apart from the shared `Lexicon`; identical inputs always
//! produce an identical `AnalysisReport`.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::keywords::{extract_keywords, KeywordEntry};
use crate::analysis::lexicon::Lexicon;
use crate::analysis::sections::{detect_sections, Section, SectionSet, CORE_SECTIONS};

/// Word counts inside this range pass the length check.
const IDEAL_WORD_RANGE: RangeInclusive<usize> = 500..=1000;

/// Literal markers treated as evidence of tables or embedded images.
const FORMATTING_MARKERS: &[&str] = &["table", "image"];

const CONTACT_MARKERS: &[&str] = &["@", "phone", "email", "linkedin", "github"];

// ────────────────────────────────────────────────────────────────────────────
// Checks
// ────────────────────────────────────────────────────────────────────────────

/// One scored ATS check. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    KeywordsMatch,
    HasExperienceSection,
    HasEducationSection,
    HasSkillsSection,
    IdealLength,
    NoComplexFormatting,
    ContactInfoPresent,
}

impl Check {
    pub const ALL: &'static [Check] = &[
        Check::KeywordsMatch,
        Check::HasExperienceSection,
        Check::HasEducationSection,
        Check::HasSkillsSection,
        Check::IdealLength,
        Check::NoComplexFormatting,
        Check::ContactInfoPresent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Check::KeywordsMatch => "Keywords Match",
            Check::HasExperienceSection => "Has Experience Section",
            Check::HasEducationSection => "Has Education Section",
            Check::HasSkillsSection => "Has Skills Section",
            Check::IdealLength => "Ideal Length (500-1000 words)",
            Check::NoComplexFormatting => "No Complex Formatting",
            Check::ContactInfoPresent => "Contact Information Present",
        }
    }

    /// Contribution to the overall score. Weights over `Check::ALL` sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            Check::KeywordsMatch => 0.40,
            Check::HasExperienceSection => 0.15,
            Check::HasEducationSection => 0.10,
            Check::HasSkillsSection => 0.10,
            Check::IdealLength => 0.10,
            Check::NoComplexFormatting => 0.10,
            Check::ContactInfoPresent => 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Flag(bool),
    /// 0 – 100
    Percent(f64),
}

impl CheckValue {
    /// The value on the 0–100 scale: flags count as 100 or 0.
    pub fn points(&self) -> f64 {
        match *self {
            CheckValue::Flag(true) => 100.0,
            CheckValue::Flag(false) => 0.0,
            CheckValue::Percent(pct) => pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: Check,
    pub label: String,
    pub value: CheckValue,
    pub weight: f64,
}

/// Coarse verdict shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            ScoreBand::Good
        } else if score >= 50.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Your resume has good ATS compatibility!",
            ScoreBand::Fair => {
                "Your resume needs some improvements for better ATS compatibility."
            }
            ScoreBand::Poor => "Your resume needs significant improvements for ATS optimization.",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// 0.0 – 100.0
    pub overall_score: f64,
    pub band: ScoreBand,
    pub checks: Vec<CheckResult>,
    /// Ranked keywords of the job description.
    pub job_keywords: Vec<KeywordEntry>,
    pub found_sections: SectionSet,
    /// Job keywords present in the resume, in rank order.
    pub found_keywords: Vec<String>,
    /// Job keywords absent from the resume, in rank order.
    pub missing_keywords: Vec<String>,
    /// Core sections (experience, education, skills) not found.
    pub missing_sections: Vec<Section>,
    pub word_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AtsAnalyzer {
    lexicon: Arc<Lexicon>,
    top_n: usize,
}

impl AtsAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>, top_n: usize) -> Self {
        Self { lexicon, top_n }
    }

    /// Scores `resume_text` against `job_description`.
    ///
    /// An empty job keyword list yields a 0% keyword match rather than an error.
    /// Blank resume text fails every check, including the formatting check.
    pub fn score(&self, resume_text: &str, job_description: &str) -> AnalysisReport {
        let resume_lower = resume_text.to_lowercase();
        let has_content = !resume_lower.trim().is_empty();

        let job_keywords = extract_keywords(job_description, &self.lexicon, self.top_n);
        let (found_keywords, missing_keywords): (Vec<String>, Vec<String>) = job_keywords
            .iter()
            .map(|entry| entry.keyword.clone())
            .partition(|keyword| resume_lower.contains(keyword.as_str()));

        let keywords_match = if job_keywords.is_empty() {
            0.0
        } else {
            found_keywords.len() as f64 / job_keywords.len() as f64 * 100.0
        };

        let found_sections = detect_sections(resume_text);
        let word_count = resume_text.split_whitespace().count();

        let checks: Vec<CheckResult> = Check::ALL
            .iter()
            .map(|&check| {
                let value = match check {
                    Check::KeywordsMatch => CheckValue::Percent(keywords_match),
                    Check::HasExperienceSection => CheckValue::Flag(
                        found_sections.contains(&Section::Experience)
                            || found_sections.contains(&Section::WorkExperience),
                    ),
                    Check::HasEducationSection => {
                        CheckValue::Flag(found_sections.contains(&Section::Education))
                    }
                    Check::HasSkillsSection => {
                        CheckValue::Flag(found_sections.contains(&Section::Skills))
                    }
                    Check::IdealLength => CheckValue::Flag(IDEAL_WORD_RANGE.contains(&word_count)),
                    Check::NoComplexFormatting => CheckValue::Flag(
                        has_content
                            && !FORMATTING_MARKERS
                                .iter()
                                .any(|marker| resume_lower.contains(marker)),
                    ),
                    Check::ContactInfoPresent => CheckValue::Flag(
                        CONTACT_MARKERS
                            .iter()
                            .any(|marker| resume_lower.contains(marker)),
                    ),
                };
                CheckResult {
                    check,
                    label: check.label().to_string(),
                    value,
                    weight: check.weight(),
                }
            })
            .collect();

        let overall_score = weighted_score(&checks);

        let missing_sections = CORE_SECTIONS
            .iter()
            .copied()
            .filter(|section| !found_sections.contains(section))
            .collect();

        debug!(
            overall_score,
            word_count,
            job_keywords = job_keywords.len(),
            matched = found_keywords.len(),
            "Resume scored"
        );

        AnalysisReport {
            overall_score,
            band: ScoreBand::from_score(overall_score),
            checks,
            job_keywords,
            found_sections,
            found_keywords,
            missing_keywords,
            missing_sections,
            word_count,
        }
    }
}

/// Σ(points × weight), clamped to 0–100.
fn weighted_score(checks: &[CheckResult]) -> f64 {
    checks
        .iter()
        .map(|result| result.value.points() * result.weight)
        .sum::<f64>()
        .clamp(0.0, 100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::DEFAULT_TOP_N;

    const SHORT_RESUME: &str =
        "Experience: 5 years. Education: BSc. Skills: Python, SQL. Contact: a@b.com";

    fn analyzer() -> AtsAnalyzer {
        AtsAnalyzer::new(Arc::new(Lexicon::english()), DEFAULT_TOP_N)
    }

    fn value_of(report: &AnalysisReport, check: Check) -> Option<CheckValue> {
        report
            .checks
            .iter()
            .find(|result| result.check == check)
            .map(|result| result.value)
    }

    fn flag(report: &AnalysisReport, check: Check) -> bool {
        match value_of(report, check) {
            Some(CheckValue::Flag(passed)) => passed,
            other => panic!("{check:?} is not a flag: {other:?}"),
        }
    }

    fn filler_words(n: usize) -> String {
        vec!["delivered"; n].join(" ")
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Check::ALL.iter().map(Check::weight).sum();
        assert!((total - 1.0).abs() < 1e-9, "weights sum to {total}");
    }

    #[test]
    fn test_short_resume_with_all_sections_scores_90() {
        let report = analyzer().score(SHORT_RESUME, "Python SQL experience");

        assert!(flag(&report, Check::HasExperienceSection));
        assert!(flag(&report, Check::HasEducationSection));
        assert!(flag(&report, Check::HasSkillsSection));
        assert!(flag(&report, Check::ContactInfoPresent));
        assert!(flag(&report, Check::NoComplexFormatting));
        assert!(!flag(&report, Check::IdealLength));
        assert_eq!(
            value_of(&report, Check::KeywordsMatch),
            Some(CheckValue::Percent(100.0))
        );
        assert!(
            (report.overall_score - 90.0).abs() < 1e-9,
            "score was {}",
            report.overall_score
        );
        assert_eq!(report.band, ScoreBand::Good);
        assert!(report.missing_keywords.is_empty());
        assert!(report.missing_sections.is_empty());
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let report = analyzer().score("", "Senior Python developer with SQL");

        assert_eq!(report.word_count, 0);
        for check in Check::ALL {
            assert_eq!(value_of(&report, *check).unwrap().points(), 0.0, "{check:?}");
        }
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.band, ScoreBand::Poor);
        assert_eq!(
            report.missing_sections,
            vec![Section::Experience, Section::Education, Section::Skills]
        );
    }

    #[test]
    fn test_empty_job_keywords_gives_zero_match() {
        let report = analyzer().score(SHORT_RESUME, "the and of to an");
        assert!(report.job_keywords.is_empty());
        assert_eq!(
            value_of(&report, Check::KeywordsMatch),
            Some(CheckValue::Percent(0.0))
        );
        // 0.15 + 0.10 + 0.10 + 0.10 + 0.05 of the flags still pass
        assert!((report.overall_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_keyword_match() {
        let report = analyzer().score("Skills: Rust and Python", "rust python kafka kubernetes");
        assert_eq!(
            value_of(&report, Check::KeywordsMatch),
            Some(CheckValue::Percent(50.0))
        );
        assert_eq!(report.found_keywords, vec!["rust", "python"]);
        assert_eq!(report.missing_keywords, vec!["kafka", "kubernetes"]);
    }

    #[test]
    fn test_keyword_match_is_substring_based() {
        // "java" is found inside "javascript"
        let report = analyzer().score("JavaScript developer", "java");
        assert_eq!(report.found_keywords, vec!["java"]);
    }

    #[test]
    fn test_ideal_length_bounds_inclusive() {
        let a = analyzer();
        assert!(!flag(&a.score(&filler_words(499), "rust"), Check::IdealLength));
        assert!(flag(&a.score(&filler_words(500), "rust"), Check::IdealLength));
        assert!(flag(&a.score(&filler_words(1000), "rust"), Check::IdealLength));
        assert!(!flag(&a.score(&filler_words(1001), "rust"), Check::IdealLength));
    }

    #[test]
    fn test_table_or_image_mention_fails_formatting() {
        let a = analyzer();
        let report = a.score("Maintained a data TABLE of results", "rust");
        assert!(!flag(&report, Check::NoComplexFormatting));
        let report = a.score("Built image pipelines", "rust");
        assert!(!flag(&report, Check::NoComplexFormatting));
        let report = a.score("Built data pipelines", "rust");
        assert!(flag(&report, Check::NoComplexFormatting));
    }

    #[test]
    fn test_contact_markers() {
        let a = analyzer();
        for text in ["me@example.com", "Phone: 555", "EMAIL me", "linkedin.com/in/x", "GitHub"] {
            assert!(flag(&a.score(text, "rust"), Check::ContactInfoPresent), "{text}");
        }
        assert!(!flag(&a.score("no way to reach me", "rust"), Check::ContactInfoPresent));
    }

    #[test]
    fn test_work_experience_satisfies_experience_check() {
        let report = analyzer().score("WORK EXPERIENCE\nAcme", "rust");
        assert!(flag(&report, Check::HasExperienceSection));
    }

    #[test]
    fn test_score_always_within_bounds() {
        let a = analyzer();
        let long_resume = format!("{SHORT_RESUME} {}", filler_words(600));
        let cases = [
            ("", ""),
            ("", "rust"),
            (SHORT_RESUME, ""),
            (SHORT_RESUME, "Python SQL experience"),
            (long_resume.as_str(), "Python SQL experience"),
            ("table image", "golang haskell"),
        ];
        for (resume, jd) in cases {
            let score = a.score(resume, jd).overall_score;
            assert!((0.0..=100.0).contains(&score), "{score} for {resume:?}/{jd:?}");
        }
    }

    #[test]
    fn test_perfect_resume_scores_100() {
        let resume = format!("{SHORT_RESUME} {}", filler_words(600));
        let report = analyzer().score(&resume, "Python SQL experience");
        assert!((report.overall_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = analyzer();
        let jd = "Rust engineer: tokio, async, distributed systems, observability, rust";
        let first = a.score(SHORT_RESUME, jd);
        let second = a.score(SHORT_RESUME, jd);
        assert_eq!(first, second);
        assert_eq!(first.overall_score.to_bits(), second.overall_score.to_bits());
    }

    #[test]
    fn test_checks_reported_in_fixed_order_with_labels() {
        let report = analyzer().score(SHORT_RESUME, "python");
        let labels: Vec<&str> = report.checks.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Keywords Match",
                "Has Experience Section",
                "Has Education Section",
                "Has Skills Section",
                "Ideal Length (500-1000 words)",
                "No Complex Formatting",
                "Contact Information Present",
            ]
        );
    }

    #[test]
    fn test_job_keywords_capped_at_top_n() {
        let jd: String = (0..40).map(|i| format!("skill{i:02} ")).collect();
        let report = AtsAnalyzer::new(Arc::new(Lexicon::english()), 20).score("", &jd);
        assert_eq!(report.job_keywords.len(), 20);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(75.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(74.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49.9), ScoreBand::Poor);
    }

    #[test]
    fn test_check_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&CheckValue::Flag(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&CheckValue::Percent(62.5)).unwrap(), "62.5");
    }
}
