//! The categorical outcome a verifier assigns to a claim.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "true")]
    True,
    #[serde(rename = "mostly-true")]
    MostlyTrue,
    #[serde(rename = "mixed/misleading")]
    MixedMisleading,
    #[serde(rename = "mostly-false")]
    MostlyFalse,
    #[serde(rename = "false")]
    False,
    #[serde(rename = "unverifiable")]
    Unverifiable,
    #[serde(rename = "needs-more-specificity")]
    NeedsMoreSpecificity,
}

impl Verdict {
    pub const ALL: [Verdict; 7] = [
        Verdict::True,
        Verdict::MostlyTrue,
        Verdict::MixedMisleading,
        Verdict::MostlyFalse,
        Verdict::False,
        Verdict::Unverifiable,
        Verdict::NeedsMoreSpecificity,
    ];

    /// Canonical wire string. Also the basis of the total order used to
    /// break consensus ties.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::MostlyTrue => "mostly-true",
            Verdict::MixedMisleading => "mixed/misleading",
            Verdict::MostlyFalse => "mostly-false",
            Verdict::False => "false",
            Verdict::Unverifiable => "unverifiable",
            Verdict::NeedsMoreSpecificity => "needs-more-specificity",
        }
    }
}

impl Ord for Verdict {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| TypesError::UnknownVerdict(s.to_string()))
    }
}
