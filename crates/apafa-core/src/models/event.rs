use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::lenient;
use crate::utils::parse_date;

/// School calendar (`eventos`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Events {
    #[serde(rename = "eventos", deserialize_with = "lenient::list")]
    pub events: Vec<Event>,
    #[serde(
        rename = "total_eventos",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_count"
    )]
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "titulo", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(
        rename = "descripcion",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub description: Option<String>,
    #[serde(rename = "fecha", deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(
        rename = "hora",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub time: Option<String>,
    #[serde(
        rename = "lugar",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub place: Option<String>,
    #[serde(rename = "tipo", deserialize_with = "lenient::or_default")]
    pub kind: EventKind,
    #[serde(rename = "importante", deserialize_with = "lenient::flag")]
    pub important: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "reunion")]
    Meeting,
    #[serde(rename = "deportivo")]
    Sports,
    #[serde(rename = "cultural")]
    Cultural,
    #[serde(rename = "academico")]
    Academic,
    #[default]
    #[serde(rename = "general")]
    #[serde(other)]
    General,
}

impl EventKind {
    /// Badge class and label
    pub fn badge(&self) -> (&'static str, &'static str) {
        match self {
            EventKind::Meeting => ("bg-primary", "Reunión"),
            EventKind::Sports => ("bg-success", "Deportivo"),
            EventKind::Cultural => ("bg-info", "Cultural"),
            EventKind::Academic => ("bg-warning text-dark", "Académico"),
            EventKind::General => ("bg-secondary", "General"),
        }
    }
}

impl Event {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    /// `"18:00 - Auditorio"`, `"18:00"`, `"Auditorio"` or empty
    pub fn detail_line(&self) -> String {
        let time = self.time.as_deref().unwrap_or("").trim();
        let place = self.place.as_deref().unwrap_or("").trim();
        match (time.is_empty(), place.is_empty()) {
            (false, false) => format!("{} - {}", time, place),
            (false, true) => time.to_string(),
            (true, false) => format!("- {}", place),
            (true, true) => String::new(),
        }
    }
}

impl Events {
    /// Events on or after `today`, soonest first, at most `limit`.
    /// Events with unreadable dates are skipped.
    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> Vec<&Event> {
        let mut upcoming: Vec<(NaiveDateTime, &Event)> = self
            .events
            .iter()
            .filter_map(|e| e.starts_at().map(|at| (at, e)))
            .filter(|(at, _)| at.date() >= today)
            .collect();
        upcoming.sort_by_key(|(at, _)| *at);
        upcoming.into_iter().take(limit).map(|(_, e)| e).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, date: &str) -> Event {
        Event {
            title: title.to_string(),
            date: date.to_string(),
            ..Event::default()
        }
    }

    #[test]
    fn test_upcoming_filters_sorts_and_limits() {
        let events = Events {
            events: vec![
                event("pasado", "2026-10-01"),
                event("lejano", "2026-12-20"),
                event("hoy", "2026-10-18"),
                event("roto", "pronto"),
                event("cercano", "2026-10-25"),
                event("medio", "2026-11-10"),
            ],
            total: None,
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let titles: Vec<&str> = events.upcoming(today, 3).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["hoy", "cercano", "medio"]);
    }

    #[test]
    fn test_kind_decoding() {
        let e: Event = serde_json::from_str(r#"{"titulo": "Olimpiada", "tipo": "deportivo"}"#).unwrap();
        assert_eq!(e.kind, EventKind::Sports);
        let e: Event = serde_json::from_str(r#"{"titulo": "Feria", "tipo": "feria"}"#).unwrap();
        assert_eq!(e.kind.badge().1, "General");
    }

    #[test]
    fn test_detail_line() {
        let mut e = event("x", "2026-10-18");
        assert_eq!(e.detail_line(), "");
        e.time = Some("18:00".to_string());
        assert_eq!(e.detail_line(), "18:00");
        e.place = Some("Auditorio".to_string());
        assert_eq!(e.detail_line(), "18:00 - Auditorio");
    }
}
