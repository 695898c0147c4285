use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors that can occur when decoding a proficiency level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown proficiency level: {0}")]
    Unknown(String),
}

//
// ─── PROFICIENCY LEVEL ─────────────────────────────────────────────────────────
//

/// Six-band CEFR proficiency scale, ordered beginner to native.
///
/// The level paces the session sizing calculator and is passed opaquely to
/// the question generation service to influence content difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl ProficiencyLevel {
    /// All levels in ascending order.
    pub const ALL: [ProficiencyLevel; 6] = [
        ProficiencyLevel::A1,
        ProficiencyLevel::A2,
        ProficiencyLevel::B1,
        ProficiencyLevel::B2,
        ProficiencyLevel::C1,
        ProficiencyLevel::C2,
    ];

    /// Human-readable label shown in the session setup UI.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1 (Principiante)",
            ProficiencyLevel::A2 => "A2 (Elementare)",
            ProficiencyLevel::B1 => "B1 (Intermedio)",
            ProficiencyLevel::B2 => "B2 (Intermedio Alto)",
            ProficiencyLevel::C1 => "C1 (Avanzato)",
            ProficiencyLevel::C2 => "C2 (Madrelingua)",
        }
    }

    /// Short band code, e.g. `"B1"`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1",
            ProficiencyLevel::A2 => "A2",
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
            ProficiencyLevel::C1 => "C1",
            ProficiencyLevel::C2 => "C2",
        }
    }

    /// Parses a band code such as `"A1"` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Unknown` if the code is not one of the six bands.
    pub fn from_code(code: &str) -> Result<Self, LevelError> {
        match code.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(ProficiencyLevel::A1),
            "A2" => Ok(ProficiencyLevel::A2),
            "B1" => Ok(ProficiencyLevel::B1),
            "B2" => Ok(ProficiencyLevel::B2),
            "C1" => Ok(ProficiencyLevel::C1),
            "C2" => Ok(ProficiencyLevel::C2),
            other => Err(LevelError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered_beginner_to_native() {
        for pair in ProficiencyLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn from_code_round_trips() {
        for level in ProficiencyLevel::ALL {
            assert_eq!(ProficiencyLevel::from_code(level.code()).unwrap(), level);
        }
        assert_eq!(ProficiencyLevel::from_code("b2").unwrap(), ProficiencyLevel::B2);
    }

    #[test]
    fn from_code_rejects_unknown_band() {
        let err = ProficiencyLevel::from_code("D1").unwrap_err();
        assert!(matches!(err, LevelError::Unknown(code) if code == "D1"));
    }
}
