use serde::{Deserialize, Serialize};

use super::SeriesKind;

/// The arrangement the user currently holds; the other one is the proposal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Perspective {
    /// Currently CLT, weighing a PJ proposal.
    #[default]
    Employment,
    /// Currently PJ, weighing a CLT proposal.
    Contractor,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "clt",
            Self::Contractor => "pj",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clt" | "employment" => Some(Self::Employment),
            "pj" | "contractor" => Some(Self::Contractor),
            _ => None,
        }
    }

    /// Historical series that matches this work mode.
    pub fn series_kind(&self) -> SeriesKind {
        match self {
            Self::Employment => SeriesKind::Employment,
            Self::Contractor => SeriesKind::Contractor,
        }
    }
}
