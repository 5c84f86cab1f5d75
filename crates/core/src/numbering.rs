//! Dossier business-key generation.
//!
//! Every dossier carries a human-readable `numero_unique` of the form
//! `{prefix}{year}{seq}` where the prefix is derived from the case type,
//! the year is 4 digits, and the sequence is a 4-digit zero-padded counter
//! that restarts at 1 for each (type, year) pair.

use serde::{Deserialize, Serialize};

/// Width of the zero-padded sequence suffix.
pub const SEQUENCE_WIDTH: usize = 4;

/// Case category, stored as TEXT in the `dossiers.dossier_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DossierType {
    #[serde(rename = "SINISTRE_CORPOREL")]
    SinistreCorporel,
    #[serde(rename = "SINISTRE_MATERIEL")]
    SinistreMateriel,
    #[serde(rename = "SINISTRE_MORTEL")]
    SinistreMortel,
    #[serde(rename = "IMMOBILIER")]
    Immobilier,
    #[serde(rename = "SPORT")]
    Sport,
    #[serde(rename = "CONTRAT")]
    Contrat,
    #[serde(rename = "CONTENTIEUX")]
    Contentieux,
    #[serde(rename = "AUTRE")]
    Autre,
}

impl DossierType {
    /// Database representation of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            DossierType::SinistreCorporel => "SINISTRE_CORPOREL",
            DossierType::SinistreMateriel => "SINISTRE_MATERIEL",
            DossierType::SinistreMortel => "SINISTRE_MORTEL",
            DossierType::Immobilier => "IMMOBILIER",
            DossierType::Sport => "SPORT",
            DossierType::Contrat => "CONTRAT",
            DossierType::Contentieux => "CONTENTIEUX",
            DossierType::Autre => "AUTRE",
        }
    }

    /// Parse a database value back into a type.
    pub fn parse(value: &str) -> Option<DossierType> {
        match value {
            "SINISTRE_CORPOREL" => Some(DossierType::SinistreCorporel),
            "SINISTRE_MATERIEL" => Some(DossierType::SinistreMateriel),
            "SINISTRE_MORTEL" => Some(DossierType::SinistreMortel),
            "IMMOBILIER" => Some(DossierType::Immobilier),
            "SPORT" => Some(DossierType::Sport),
            "CONTRAT" => Some(DossierType::Contrat),
            "CONTENTIEUX" => Some(DossierType::Contentieux),
            "AUTRE" => Some(DossierType::Autre),
            _ => None,
        }
    }

    /// The 2-3 letter prefix used in `numero_unique`.
    pub fn prefix(self) -> &'static str {
        match self {
            DossierType::SinistreCorporel => "SC",
            DossierType::SinistreMateriel => "SM",
            DossierType::SinistreMortel => "SMO",
            DossierType::Immobilier => "IM",
            DossierType::Sport => "SP",
            DossierType::Contrat => "CT",
            DossierType::Contentieux => "CO",
            DossierType::Autre => "AU",
        }
    }
}

impl std::fmt::Display for DossierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{prefix}{year}` stem shared by all dossiers of one (type, year) scope.
///
/// Used as the `LIKE 'stem%'` pattern when looking up the highest existing
/// sequence.
pub fn numero_stem(dossier_type: DossierType, year: i32) -> String {
    format!("{}{year}", dossier_type.prefix())
}

/// Format a full business key.
///
/// ```
/// use lexcase_core::numbering::{format_numero, DossierType};
///
/// assert_eq!(format_numero(DossierType::Contentieux, 2025, 1), "CO20250001");
/// assert_eq!(format_numero(DossierType::SinistreMortel, 2025, 42), "SMO20250042");
/// ```
pub fn format_numero(dossier_type: DossierType, year: i32, sequence: u32) -> String {
    format!(
        "{}{year}{sequence:0width$}",
        dossier_type.prefix(),
        width = SEQUENCE_WIDTH
    )
}

/// Extract the sequence counter from an existing `numero_unique`.
///
/// The counter is always the last [`SEQUENCE_WIDTH`] characters; the prefix
/// length varies per type, so parsing from the end is the only stable rule.
/// Returns `None` for malformed keys.
pub fn parse_sequence(numero: &str) -> Option<u32> {
    if numero.len() <= SEQUENCE_WIDTH {
        return None;
    }
    let suffix = &numero[numero.len() - SEQUENCE_WIDTH..];
    suffix.parse().ok()
}

/// Compute the next sequence number given the highest existing key, if any.
///
/// Starts at 1 when the (type, year) scope is empty. A malformed stored key
/// also restarts at 1 rather than failing the creation.
pub fn next_sequence(last_numero: Option<&str>) -> u32 {
    last_numero
        .and_then(parse_sequence)
        .map(|seq| seq + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        assert_eq!(DossierType::SinistreCorporel.prefix(), "SC");
        assert_eq!(DossierType::SinistreMateriel.prefix(), "SM");
        assert_eq!(DossierType::SinistreMortel.prefix(), "SMO");
        assert_eq!(DossierType::Immobilier.prefix(), "IM");
        assert_eq!(DossierType::Sport.prefix(), "SP");
        assert_eq!(DossierType::Contrat.prefix(), "CT");
        assert_eq!(DossierType::Contentieux.prefix(), "CO");
        assert_eq!(DossierType::Autre.prefix(), "AU");
    }

    #[test]
    fn test_format_pads_to_four_digits() {
        assert_eq!(format_numero(DossierType::Contentieux, 2025, 1), "CO20250001");
        assert_eq!(format_numero(DossierType::Contentieux, 2025, 2), "CO20250002");
        assert_eq!(format_numero(DossierType::Contrat, 2025, 9999), "CT20259999");
    }

    #[test]
    fn test_parse_sequence_from_the_end() {
        assert_eq!(parse_sequence("SC20250007"), Some(7));
        // Three-letter prefix still parses because we count from the end.
        assert_eq!(parse_sequence("SMO20250113"), Some(113));
        assert_eq!(parse_sequence("XX"), None);
        assert_eq!(parse_sequence("SC2025ABCD"), None);
    }

    #[test]
    fn test_next_sequence_starts_at_one() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some("CO20250001")), 2);
        assert_eq!(next_sequence(Some("SMO20250099")), 100);
        // Garbage in the store restarts the counter instead of erroring.
        assert_eq!(next_sequence(Some("garbage")), 1);
    }

    #[test]
    fn test_stem_matches_format() {
        let stem = numero_stem(DossierType::Sport, 2025);
        assert_eq!(stem, "SP2025");
        assert!(format_numero(DossierType::Sport, 2025, 12).starts_with(&stem));
    }

    #[test]
    fn test_type_round_trip() {
        for t in [
            DossierType::SinistreCorporel,
            DossierType::SinistreMateriel,
            DossierType::SinistreMortel,
            DossierType::Immobilier,
            DossierType::Sport,
            DossierType::Contrat,
            DossierType::Contentieux,
            DossierType::Autre,
        ] {
            assert_eq!(DossierType::parse(t.as_str()), Some(t));
        }
        assert_eq!(DossierType::parse("PENAL"), None);
    }
}
