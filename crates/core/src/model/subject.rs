use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Error returned when a string names no known subject.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubjectParseError {
    #[error("unknown subject: {0}")]
    Unknown(String),
}

//
// ─── SUBJECT ──────────────────────────────────────────────────────────────────
//

/// The four exam subjects.
///
/// Each subject owns an independent question bank; a test session always runs
/// against exactly one of them. The short lowercase code (`bio`, `phy`, …) is
/// the on-disk and wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Bio,
    Phy,
    Chem,
    Mat,
}

impl Subject {
    /// All subjects, in display order.
    pub const ALL: [Subject; 4] = [Subject::Bio, Subject::Phy, Subject::Chem, Subject::Mat];

    /// Short code used in data paths and stored reports.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Subject::Bio => "bio",
            Subject::Phy => "phy",
            Subject::Chem => "chem",
            Subject::Mat => "mat",
        }
    }

    /// Human-readable subject name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Subject::Bio => "Biology",
            Subject::Phy => "Physics",
            Subject::Chem => "Chemistry",
            Subject::Mat => "Mathematics",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Subject {
    type Err = SubjectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bio" => Ok(Subject::Bio),
            "phy" => Ok(Subject::Phy),
            "chem" => Ok(Subject::Chem),
            "mat" => Ok(Subject::Mat),
            other => Err(SubjectParseError::Unknown(other.to_string())),
        }
    }
}

//
// ─── YEAR FILTER ──────────────────────────────────────────────────────────────
//

/// Restricts sampling to questions that appeared in one exam year.
///
/// `Random` draws from the whole bank. Parsing is infallible: anything that is
/// not a number (including the literal `"random"`) falls back to `Random`, so a
/// garbled query parameter can never fail a session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YearFilter {
    #[default]
    Random,
    Year(u16),
}

impl YearFilter {
    /// Parses a filter from its query-string form. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u16>() {
            Ok(year) => YearFilter::Year(year),
            Err(_) => YearFilter::Random,
        }
    }

    /// Returns the year when this filter names one.
    #[must_use]
    pub fn year(self) -> Option<u16> {
        match self {
            YearFilter::Random => None,
            YearFilter::Year(year) => Some(year),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::Random => write!(f, "random"),
            YearFilter::Year(year) => write!(f, "{year}"),
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
