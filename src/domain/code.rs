use std::fmt;

/// Total length of a merchant code, hyphens included.
pub const CODE_LEN: usize = 36;

/// Hex-group lengths of the `8-4-4-4-12` merchant identifier pattern.
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// A structurally valid QRIS merchant identifier: 36 lowercase-hex
/// characters in `8-4-4-4-12` groups.
///
/// The only way to obtain one is through [`validate`] (or its `TryFrom`
/// shorthand), so holding a `QrisCode` proves the structural contract holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QrisCode(String);

impl QrisCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QrisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for QrisCode {
    type Error = InvalidCodeReason;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        match validate(raw) {
            ValidationOutcome::Valid(code) => Ok(code),
            ValidationOutcome::Invalid { reason } => Err(reason),
        }
    }
}

/// Result of validating a decoded string against the merchant-code contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid(QrisCode),
    Invalid { reason: InvalidCodeReason },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Why a decoded string failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCodeReason {
    Empty,
    WrongLength(usize),
    MalformedPattern,
}

impl fmt::Display for InvalidCodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::WrongLength(len) => {
                write!(f, "expected {CODE_LEN} characters, got {len}")
            }
            Self::MalformedPattern => {
                write!(f, "does not match the 8-4-4-4-12 hex pattern")
            }
        }
    }
}

/// Checks whether a decoded string satisfies the merchant-code structural
/// contract, after trimming surrounding whitespace.
///
/// Total: any input yields an outcome, never an error.
pub fn validate(raw: &str) -> ValidationOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValidationOutcome::Invalid {
            reason: InvalidCodeReason::Empty,
        };
    }
    if trimmed.len() != CODE_LEN {
        return ValidationOutcome::Invalid {
            reason: InvalidCodeReason::WrongLength(trimmed.len()),
        };
    }
    if !matches_pattern(trimmed) {
        return ValidationOutcome::Invalid {
            reason: InvalidCodeReason::MalformedPattern,
        };
    }
    ValidationOutcome::Valid(QrisCode(trimmed.to_string()))
}

fn matches_pattern(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != GROUPS.len() {
        return false;
    }
    parts
        .iter()
        .zip(GROUPS)
        .all(|(part, len)| part.len() == len && part.bytes().all(is_lower_hex))
}

fn is_lower_hex(b: u8) -> bool {
    b.is_ascii_digit() || (b'a'..=b'f').contains(&b)
}
