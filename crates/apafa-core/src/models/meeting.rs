use serde::{Deserialize, Serialize};

use super::lenient;

/// Parent meetings (`reuniones`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meetings {
    #[serde(rename = "reuniones", deserialize_with = "lenient::list")]
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meeting {
    #[serde(deserialize_with = "lenient::count")]
    pub id: u32,
    #[serde(rename = "titulo", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(rename = "fecha", deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(rename = "hora", deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(rename = "motivo", deserialize_with = "lenient::text")]
    pub reason: String,
    #[serde(rename = "asistentes", deserialize_with = "lenient::count")]
    pub attendees: u32,
    #[serde(rename = "total_padres", deserialize_with = "lenient::count")]
    pub total_parents: u32,
}

impl Meetings {
    /// The meeting list published before meetings had their own fixture
    pub fn fallback() -> Self {
        Self {
            meetings: vec![Meeting {
                id: 1,
                title: "Reunión General de Padres de Familia".to_string(),
                date: "2026-01-15".to_string(),
                time: "19:00".to_string(),
                reason: "Reunión general programada para tratar temas importantes relacionados \
                         con el próximo año escolar, proyectos de mejora y actividades programadas."
                    .to_string(),
                attendees: 25,
                total_parents: 6,
            }],
        }
    }

    /// Mean attendance rounded to the nearest whole person, 0 without meetings
    pub fn average_attendance(&self) -> u32 {
        if self.meetings.is_empty() {
            return 0;
        }
        let total: u64 = self.meetings.iter().map(|m| u64::from(m.attendees)).sum();
        (total as f64 / self.meetings.len() as f64).round() as u32
    }
}
