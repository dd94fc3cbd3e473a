use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical ordered pipeline statuses. Declaration order is the kanban
/// column order; `Hired` and `Rejected` are the terminal outcomes.
///
/// A candidate with no status at all is treated as being in the initial
/// `Screening` state everywhere, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CandidateStatus {
    Screening,
    VideoInterview,
    TheoreticalTest,
    InPersonInterview,
    PracticalTest,
    Hired,
    Rejected,
}

/// All statuses in pipeline order; drives kanban columns and status menus.
pub const ALL_STATUSES: [CandidateStatus; 7] = [
    CandidateStatus::Screening,
    CandidateStatus::VideoInterview,
    CandidateStatus::TheoreticalTest,
    CandidateStatus::InPersonInterview,
    CandidateStatus::PracticalTest,
    CandidateStatus::Hired,
    CandidateStatus::Rejected,
];

#[derive(Debug, thiserror::Error)]
#[error("Unknown candidate status: {0}")]
pub struct UnknownStatus(pub String);

impl CandidateStatus {
    pub const INITIAL: CandidateStatus = CandidateStatus::Screening;

    /// The label stored in the row store and shown in the UI.
    pub fn as_wire(&self) -> &'static str {
        match self {
            CandidateStatus::Screening => "Triagem",
            CandidateStatus::VideoInterview => "Entrevista por Vídeo",
            CandidateStatus::TheoreticalTest => "Teste Teórico",
            CandidateStatus::InPersonInterview => "Entrevista Presencial",
            CandidateStatus::PracticalTest => "Teste Prático",
            CandidateStatus::Hired => "Contratado",
            CandidateStatus::Rejected => "Reprovado",
        }
    }

    /// Parses a wire label. Legacy values written by older clients are
    /// accepted as aliases and migrate to the canonical variant on the next
    /// write; unknown strings are an error at the boundary, never a guess.
    pub fn from_wire(raw: &str) -> Result<Self, UnknownStatus> {
        let folded = fold(raw);
        let status = match folded.as_str() {
            "triagem" => CandidateStatus::Screening,
            "entrevista por video" => CandidateStatus::VideoInterview,
            "teste teorico" => CandidateStatus::TheoreticalTest,
            "entrevista presencial" => CandidateStatus::InPersonInterview,
            "teste pratico" => CandidateStatus::PracticalTest,
            "contratado" => CandidateStatus::Hired,
            "reprovado" => CandidateStatus::Rejected,
            // Legacy aliases.
            "entrevista" => CandidateStatus::InPersonInterview,
            "aprovado" => CandidateStatus::Hired,
            _ => return Err(UnknownStatus(raw.to_string())),
        };
        Ok(status)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CandidateStatus::Hired | CandidateStatus::Rejected)
    }
}

/// Lowercases and strips the accents that appear in status labels, so
/// accent-variant spellings ("Teste Teorico") compare equal.
fn fold(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for CandidateStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for CandidateStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CandidateStatus::from_wire(&raw).map_err(serde::de::Error::custom)
    }
}
