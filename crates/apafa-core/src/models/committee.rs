use serde::{Deserialize, Serialize};

use super::lenient;

/// The association's committee (`comite_apafa`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Committee {
    #[serde(rename = "miembros", deserialize_with = "lenient::list")]
    pub members: Vec<CommitteeMember>,
    /// President, vice president, secretary, treasurer
    #[serde(rename = "directivos", deserialize_with = "lenient::list")]
    pub officers: Vec<CommitteeMember>,
    #[serde(rename = "vocales", deserialize_with = "lenient::list")]
    pub board_members: Vec<CommitteeMember>,
    #[serde(rename = "colaboradores", deserialize_with = "lenient::list")]
    pub collaborators: Vec<CommitteeMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitteeMember {
    #[serde(
        rename = "cargo",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub position: Option<String>,
    #[serde(rename = "nombre_completo", deserialize_with = "lenient::text")]
    pub full_name: String,
}

impl CommitteeMember {
    pub fn position_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.position.as_deref().filter(|p| !p.is_empty()).unwrap_or(default)
    }
}
