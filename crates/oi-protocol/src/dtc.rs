use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// An OBD-II diagnostic trouble code resolved against the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultCode {
    /// Standard DTC string (e.g., "P0300", "C0035").
    pub code: String,
    /// Human-readable description.
    pub description: String,
    pub severity: Severity,
    /// DTC category derived from the first character.
    pub category: DtcCategory,
    /// True for SAE-defined codes, false for manufacturer-specific ones.
    pub is_generic: bool,
    /// Likely root causes, most probable first. Empty for unknown codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_causes: Vec<String>,
}

/// Description attached to codes the knowledge base does not know.
pub const UNKNOWN_CODE_DESCRIPTION: &str = "Unknown diagnostic code";

/// DTC category based on first character of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtcCategory {
    /// P: engine and transmission.
    Powertrain,
    /// C: ABS, steering, suspension.
    Chassis,
    /// B: airbags, climate, lighting.
    Body,
    /// U: inter-module communication.
    Network,
}

impl DtcCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Powertrain => "powertrain",
            Self::Chassis => "chassis",
            Self::Body => "body",
            Self::Network => "network",
        }
    }
}

impl FaultCode {
    /// Parse DTC category from the code string.
    pub fn parse_category(code: &str) -> DtcCategory {
        match code.chars().next() {
            Some('P' | 'p') => DtcCategory::Powertrain,
            Some('C' | 'c') => DtcCategory::Chassis,
            Some('B' | 'b') => DtcCategory::Body,
            Some('U' | 'u') => DtcCategory::Network,
            _ => DtcCategory::Powertrain, // Default per SAE J2012
        }
    }

    /// Whether the code uses an SAE-generic prefix (P0, P2, P3, C0, B0, U0).
    pub fn is_generic_code(code: &str) -> bool {
        let prefix: String = code.chars().take(2).collect::<String>().to_uppercase();
        matches!(prefix.as_str(), "P0" | "P2" | "P3" | "C0" | "B0" | "U0")
    }

    /// Build the entry reported for a code absent from the knowledge base.
    pub fn unknown(code: &str) -> Self {
        let code = code.to_uppercase();
        Self {
            category: Self::parse_category(&code),
            is_generic: Self::is_generic_code(&code),
            code,
            description: UNKNOWN_CODE_DESCRIPTION.into(),
            severity: Severity::Warning,
            possible_causes: Vec::new(),
        }
    }

    pub fn is_known(&self) -> bool {
        self.description != UNKNOWN_CODE_DESCRIPTION
    }

    /// What the owner should do about this code.
    pub fn recommended_action(&self) -> &'static str {
        match self.severity {
            Severity::Critical => {
                "Stop driving immediately and have the vehicle inspected by a professional mechanic."
            }
            Severity::Warning => {
                "Schedule a service appointment soon to diagnose and address this issue."
            }
            Severity::Normal => {
                "Monitor the situation. This is not urgent but should be checked at your next service."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtc_category_parsing() {
        assert_eq!(FaultCode::parse_category("P0300"), DtcCategory::Powertrain);
        assert_eq!(FaultCode::parse_category("C0035"), DtcCategory::Chassis);
        assert_eq!(FaultCode::parse_category("B0100"), DtcCategory::Body);
        assert_eq!(FaultCode::parse_category("U0100"), DtcCategory::Network);
    }

    #[test]
    fn generic_prefixes() {
        for code in ["P0300", "P2135", "P3400", "C0035", "B0001", "U0100"] {
            assert!(FaultCode::is_generic_code(code), "{code} should be generic");
        }
        for code in ["P1234", "C1201", "B1000", "U1000"] {
            assert!(!FaultCode::is_generic_code(code), "{code} should be specific");
        }
    }

    #[test]
    fn unknown_code_policy() {
        let fc = FaultCode::unknown("p1999");
        assert_eq!(fc.code, "P1999");
        assert_eq!(fc.severity, Severity::Warning);
        assert_eq!(fc.description, UNKNOWN_CODE_DESCRIPTION);
        assert!(!fc.is_generic);
        assert!(!fc.is_known());
    }

    #[test]
    fn category_serialization() {
        assert_eq!(
            serde_json::to_string(&DtcCategory::Network).unwrap(),
            r#""network""#
        );
    }
}
