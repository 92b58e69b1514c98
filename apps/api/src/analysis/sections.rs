use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical resume section names. Declaration order is the vocabulary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "experience")]
    Experience,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "skills")]
    Skills,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "work experience")]
    WorkExperience,
    #[serde(rename = "projects")]
    Projects,
    #[serde(rename = "certifications")]
    Certifications,
    #[serde(rename = "languages")]
    Languages,
    #[serde(rename = "interests")]
    Interests,
    #[serde(rename = "awards")]
    Awards,
    #[serde(rename = "publications")]
    Publications,
}

/// Sections an ATS expects every resume to carry.
pub const CORE_SECTIONS: &[Section] = &[Section::Experience, Section::Education, Section::Skills];

pub type SectionSet = BTreeSet<Section>;

impl Section {
    pub const ALL: &'static [Section] = &[
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Summary,
        Section::WorkExperience,
        Section::Projects,
        Section::Certifications,
        Section::Languages,
        Section::Interests,
        Section::Awards,
        Section::Publications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Summary => "summary",
            Section::WorkExperience => "work experience",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Languages => "languages",
            Section::Interests => "interests",
            Section::Awards => "awards",
            Section::Publications => "publications",
        }
    }

    /// "work experience" -> "Work experience"
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finds every vocabulary section that appears anywhere in `text`, case-insensitively.
///
/// Plain substring matching: "experience" also matches inside "work experience" or
/// "inexperienced". Both names land in the set independently.
pub fn detect_sections(text: &str) -> SectionSet {
    let lowered = text.to_lowercase();
    Section::ALL
        .iter()
        .copied()
        .filter(|section| lowered.contains(section.as_str()))
        .collect()
}
