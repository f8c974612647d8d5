use std::fmt;

use serde::{Deserialize, Serialize};

/// The two personal income tax regimes a taxpayer can be assessed under.
///
/// The choice is per fiscal year and is supplied by the caller; nothing in
/// this crate picks a regime on its own (comparison reports both and a
/// recommendation, the caller decides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    Old,
    New,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }

    /// Human-facing name, e.g. for report headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Old => "Old Regime",
            Self::New => "New Regime",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn as_str_and_parse_round_trip() {
        for regime in [TaxRegime::Old, TaxRegime::New] {
            assert_eq!(TaxRegime::parse(regime.as_str()), Some(regime));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(TaxRegime::parse("hybrid"), None);
        assert_eq!(TaxRegime::parse(""), None);
        assert_eq!(TaxRegime::parse("OLD"), None);
    }

    #[test]
    fn display_uses_lowercase_code() {
        assert_eq!(TaxRegime::Old.to_string(), "old");
        assert_eq!(TaxRegime::New.to_string(), "new");
    }

    #[test]
    fn display_name_is_title_cased() {
        assert_eq!(TaxRegime::Old.display_name(), "Old Regime");
        assert_eq!(TaxRegime::New.display_name(), "New Regime");
    }
}
