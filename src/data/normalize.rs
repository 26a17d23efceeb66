//! Canonical organization names.
//!
//! Each source file spells historical names its own way, so each carries
//! its own alias table. Tables map a historical name to the current
//! canonical one; names not listed pass through unchanged.

use std::collections::BTreeMap;

use super::error::DataError;

/// Aliases applied to the `team` column of the attendance file.
pub const ATTENDANCE_ALIASES: &[(&str, &str)] = &[
    ("Anaheim Angels", "Los Angeles Angels"),
    ("Los Angeles Angels of Anaheim", "Los Angeles Angels"),
    ("Florida Marlins", "Miami Marlins"),
    ("Tampa Bay Devil Rays", "Tampa Bay Rays"),
    ("Montreal Expos", "Washington Nationals"),
    ("Cleveland Indians", "Cleveland Guardians"),
];

/// Aliases applied to `winner` / `loser` of the championship file.
pub const CHAMPIONSHIP_ALIASES: &[(&str, &str)] = &[
    ("Anaheim Angels", "Los Angeles Angels"),
    ("Florida Marlins", "Miami Marlins"),
    ("Cleveland Indians", "Cleveland Guardians"),
];

/// A validated historical → canonical name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameAliases {
    table: BTreeMap<String, String>,
}

impl NameAliases {
    /// Validate a table. A canonical name may not itself be an alias for a
    /// different name, which keeps `canonical` idempotent.
    pub fn new(table: BTreeMap<String, String>) -> Result<Self, DataError> {
        for (from, to) in &table {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(DataError::InvalidAliases(format!(
                    "empty name in '{from}' -> '{to}'"
                )));
            }
            if let Some(next) = table.get(to) {
                if next != to {
                    return Err(DataError::InvalidAliases(format!(
                        "'{from}' -> '{to}' chains into '{to}' -> '{next}'"
                    )));
                }
            }
        }
        Ok(NameAliases { table })
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, DataError> {
        Self::new(default_table(pairs))
    }

    /// Map a (trimmed) name to its canonical form.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        let name = name.trim();
        self.table.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Default tables as owned maps, for configuration defaults.
pub fn default_table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendance() -> NameAliases {
        NameAliases::from_pairs(ATTENDANCE_ALIASES).unwrap()
    }

    #[test]
    fn historical_names_collapse() {
        let a = attendance();
        assert_eq!(a.canonical("Anaheim Angels"), "Los Angeles Angels");
        assert_eq!(a.canonical("Los Angeles Angels of Anaheim"), "Los Angeles Angels");
        assert_eq!(a.canonical("Montreal Expos"), "Washington Nationals");
    }

    #[test]
    fn unknown_names_pass_through_trimmed() {
        let a = attendance();
        assert_eq!(a.canonical("Boston Red Sox"), "Boston Red Sox");
        assert_eq!(a.canonical("  Florida Marlins "), "Miami Marlins");
    }

    #[test]
    fn canonical_is_idempotent() {
        for table in [ATTENDANCE_ALIASES, CHAMPIONSHIP_ALIASES] {
            let a = NameAliases::from_pairs(table).unwrap();
            for (from, _) in table {
                let once = a.canonical(from);
                assert_eq!(a.canonical(once), once, "{from}");
            }
        }
    }

    #[test]
    fn both_sources_agree_on_shared_renames() {
        let att = attendance();
        let ws = NameAliases::from_pairs(CHAMPIONSHIP_ALIASES).unwrap();
        for (from, _) in CHAMPIONSHIP_ALIASES {
            assert_eq!(att.canonical(from), ws.canonical(from));
        }
    }

    #[test]
    fn chained_aliases_are_rejected() {
        let err = NameAliases::from_pairs(&[("A", "B"), ("B", "C")]).unwrap_err();
        assert!(matches!(err, DataError::InvalidAliases(_)));
    }

    #[test]
    fn self_mapping_is_allowed() {
        let a = NameAliases::from_pairs(&[("A", "B"), ("B", "B")]).unwrap();
        assert_eq!(a.canonical("A"), "B");
        assert_eq!(a.canonical("B"), "B");
    }
}
