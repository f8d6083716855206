use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-level severity band shared by metrics, fault codes and answers.
///
/// Variants are declared in ascending order so the derived `Ord` gives
/// `Normal < Warning < Critical`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Highest severity in the iterator, or `Normal` when it is empty.
    pub fn max_of(iter: impl IntoIterator<Item = Severity>) -> Severity {
        iter.into_iter().max().unwrap_or(Severity::Normal)
    }

    /// Owner-facing next step for this band.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Critical => {
                "IMMEDIATE ACTION REQUIRED: Stop driving as soon as it is safe and have the vehicle inspected by a professional mechanic."
            }
            Self::Warning => {
                "ATTENTION NEEDED: Schedule a service appointment soon to diagnose and address this issue."
            }
            Self::Normal => {
                "ALL GOOD: Your vehicle appears to be in good condition. Keep up with regular maintenance."
            }
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
