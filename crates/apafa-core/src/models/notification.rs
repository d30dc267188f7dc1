use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::utils::parse_date;

/// Committee announcements (`notificaciones`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    #[serde(rename = "notificaciones", deserialize_with = "lenient::list")]
    pub notifications: Vec<Notification>,
    #[serde(
        rename = "total_notificaciones",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_count"
    )]
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    #[serde(rename = "titulo", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(rename = "contenido", deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(rename = "tipo", deserialize_with = "lenient::or_default")]
    pub kind: NotificationKind,
    #[serde(rename = "fecha_publicacion", deserialize_with = "lenient::text")]
    pub published_on: String,
    #[serde(
        rename = "fecha_evento",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub event_date: Option<String>,
    #[serde(
        rename = "hora_evento",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub event_time: Option<String>,
    #[serde(
        rename = "lugar_evento",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub event_place: Option<String>,
    #[serde(
        rename = "organizador",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub organizer: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[serde(rename = "financiero")]
    Financial,
    #[serde(rename = "reunion")]
    Meeting,
    #[serde(rename = "urgente")]
    Urgent,
    #[serde(rename = "evento")]
    Event,
    #[default]
    #[serde(other)]
    General,
}

impl NotificationKind {
    /// Badge class and label
    pub fn badge(&self) -> (&'static str, &'static str) {
        match self {
            NotificationKind::Financial => ("bg-success", "Financiero"),
            NotificationKind::Meeting => ("bg-primary", "Reunión"),
            NotificationKind::Urgent => ("bg-danger", "Urgente"),
            NotificationKind::Event => ("bg-info", "Evento"),
            NotificationKind::General => ("bg-secondary", "General"),
        }
    }
}

/// Organizer shown when a notification does not name one
pub const DEFAULT_ORGANIZER: &str = "Comité APAFA";

impl Notifications {
    /// Stated total, or the number of notifications when absent or zero
    pub fn total(&self) -> u32 {
        match self.total {
            Some(total) if total > 0 => total,
            _ => self.notifications.len() as u32,
        }
    }

    pub fn event_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_event()).count()
    }

    pub fn general_count(&self) -> usize {
        self.notifications.len() - self.event_count()
    }

    /// Newest first; undated notifications go last
    pub fn newest_first(&self) -> Vec<&Notification> {
        let mut sorted: Vec<&Notification> = self.notifications.iter().collect();
        sorted.sort_by_key(|n| std::cmp::Reverse(n.published_at()));
        sorted
    }
}

impl Notification {
    /// An announcement of an event: it has an event date and a non-blank place
    pub fn is_event(&self) -> bool {
        let has_date = self.event_date.as_deref().is_some_and(|d| !d.is_empty());
        let has_place = self.event_place.as_deref().is_some_and(|p| !p.trim().is_empty());
        has_date && has_place
    }

    pub fn published_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.published_on)
    }

    pub fn organizer(&self) -> &str {
        self.organizer
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(DEFAULT_ORGANIZER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifications() -> Notifications {
        serde_json::from_str(
            r#"{"notificaciones": [
                {"titulo": "Cuotas", "tipo": "financiero", "fecha_publicacion": "2026-02-01"},
                {"titulo": "Kermés", "tipo": "evento", "fecha_publicacion": "2026-03-10",
                 "fecha_evento": "2026-04-05", "lugar_evento": "Patio central"},
                {"titulo": "Aviso", "tipo": "otro", "fecha_publicacion": "sin fecha",
                 "fecha_evento": "2026-04-05", "lugar_evento": "  "}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let n = notifications();
        assert_eq!(n.total(), 3);
        assert_eq!(n.event_count(), 1);
        assert_eq!(n.general_count(), 2);
        assert_eq!(n.notifications[2].kind, NotificationKind::General);
    }

    #[test]
    fn test_newest_first() {
        let n = notifications();
        let titles: Vec<&str> = n.newest_first().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Kermés", "Cuotas", "Aviso"]);
    }

    #[test]
    fn test_default_organizer() {
        let n = Notification::default();
        assert_eq!(n.organizer(), "Comité APAFA");
    }
}
