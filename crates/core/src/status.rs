//! Per-entity status enums.
//!
//! The source schema reuses the same TEXT values (ACTIF/SUPPRIME/...) across
//! several tables, but each entity has its own valid state set, so each gets
//! its own type. Soft deletion is a terminal status value, never a row
//! removal.

use serde::{Deserialize, Serialize};

/// Staff account status. Soft delete flips ACTIF to INACTIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "ACTIF")]
    Actif,
    #[serde(rename = "INACTIF")]
    Inactif,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Actif => "ACTIF",
            AccountStatus::Inactif => "INACTIF",
        }
    }

    pub fn parse(value: &str) -> Option<AccountStatus> {
        match value {
            "ACTIF" => Some(AccountStatus::Actif),
            "INACTIF" => Some(AccountStatus::Inactif),
            _ => None,
        }
    }
}

/// Dossier lifecycle status.
///
/// Transitions are deliberately permissive (any live status to any other,
/// including reopening a closed dossier); the only hard rule is that
/// SUPPRIME dossiers are invisible to every operation, which makes SUPPRIME
/// terminal in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DossierStatus {
    #[serde(rename = "OUVERT")]
    Ouvert,
    #[serde(rename = "EN_COURS")]
    EnCours,
    #[serde(rename = "CLOS")]
    Clos,
    #[serde(rename = "SUPPRIME")]
    Supprime,
}

impl DossierStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DossierStatus::Ouvert => "OUVERT",
            DossierStatus::EnCours => "EN_COURS",
            DossierStatus::Clos => "CLOS",
            DossierStatus::Supprime => "SUPPRIME",
        }
    }

    pub fn parse(value: &str) -> Option<DossierStatus> {
        match value {
            "OUVERT" => Some(DossierStatus::Ouvert),
            "EN_COURS" => Some(DossierStatus::EnCours),
            "CLOS" => Some(DossierStatus::Clos),
            "SUPPRIME" => Some(DossierStatus::Supprime),
            _ => None,
        }
    }
}

/// Status for plain sub-records (notes, chat messages, clients use their own
/// ACTIF/INACTIF pair via [`AccountStatus`] semantics but share the values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "ACTIF")]
    Actif,
    #[serde(rename = "SUPPRIME")]
    Supprime,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Actif => "ACTIF",
            RecordStatus::Supprime => "SUPPRIME",
        }
    }

    pub fn parse(value: &str) -> Option<RecordStatus> {
        match value {
            "ACTIF" => Some(RecordStatus::Actif),
            "SUPPRIME" => Some(RecordStatus::Supprime),
            _ => None,
        }
    }
}

/// Document status. ARCHIVE keeps the file visible in history but read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "ACTIF")]
    Actif,
    #[serde(rename = "ARCHIVE")]
    Archive,
    #[serde(rename = "SUPPRIME")]
    Supprime,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Actif => "ACTIF",
            DocumentStatus::Archive => "ARCHIVE",
            DocumentStatus::Supprime => "SUPPRIME",
        }
    }

    pub fn parse(value: &str) -> Option<DocumentStatus> {
        match value {
            "ACTIF" => Some(DocumentStatus::Actif),
            "ARCHIVE" => Some(DocumentStatus::Archive),
            "SUPPRIME" => Some(DocumentStatus::Supprime),
            _ => None,
        }
    }
}

/// Calendar event status. New events start as PREVU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    #[serde(rename = "PREVU")]
    Prevu,
    #[serde(rename = "TERMINE")]
    Termine,
    #[serde(rename = "ANNULE")]
    Annule,
    #[serde(rename = "SUPPRIME")]
    Supprime,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Prevu => "PREVU",
            EventStatus::Termine => "TERMINE",
            EventStatus::Annule => "ANNULE",
            EventStatus::Supprime => "SUPPRIME",
        }
    }

    pub fn parse(value: &str) -> Option<EventStatus> {
        match value {
            "PREVU" => Some(EventStatus::Prevu),
            "TERMINE" => Some(EventStatus::Termine),
            "ANNULE" => Some(EventStatus::Annule),
            "SUPPRIME" => Some(EventStatus::Supprime),
            _ => None,
        }
    }
}

/// Task status. New tasks start as A_FAIRE; SUPPRIME hides the task from
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "A_FAIRE")]
    AFaire,
    #[serde(rename = "EN_COURS")]
    EnCours,
    #[serde(rename = "TERMINEE")]
    Terminee,
    #[serde(rename = "SUPPRIME")]
    Supprime,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::AFaire => "A_FAIRE",
            TaskStatus::EnCours => "EN_COURS",
            TaskStatus::Terminee => "TERMINEE",
            TaskStatus::Supprime => "SUPPRIME",
        }
    }

    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value {
            "A_FAIRE" => Some(TaskStatus::AFaire),
            "EN_COURS" => Some(TaskStatus::EnCours),
            "TERMINEE" => Some(TaskStatus::Terminee),
            "SUPPRIME" => Some(TaskStatus::Supprime),
            _ => None,
        }
    }
}
