//! Meetings page: attendance figures and one card per meeting.

use tracing::error;

use super::{page_error_alert, LoadPolicy, MAIN_CONTENT};
use crate::document::{show_loading, update_element, update_text, Document, DEFAULT_FALLBACK};
use crate::loader::{DataLoader, Fetcher};
use crate::models::{resources, Meetings};
use crate::utils::{escape_html, format_weekday_date};

const NO_MEETINGS_HTML: &str = r#"
      <div class="col-12">
        <div class="card card-modern border-0 shadow-sm">
          <div class="card-body text-center py-5">
            <i class="bi bi-calendar-x text-muted" style="font-size: 3rem;"></i>
            <h5 class="text-muted mt-3">No hay reuniones programadas</h5>
            <p class="text-muted">Las reuniones aparecerán aquí cuando sean programadas por el comité.</p>
          </div>
        </div>
      </div>
    "#;

pub fn render_stats<D: Document + ?Sized>(doc: &mut D, meetings: &Meetings) {
    update_text(doc, "#total-reuniones", &meetings.meetings.len().to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#promedio-asistencia", &meetings.average_attendance().to_string(), DEFAULT_FALLBACK);
}

pub fn render_list<D: Document + ?Sized>(doc: &mut D, meetings: &Meetings) {
    if meetings.meetings.is_empty() {
        update_element(doc, "#lista-reuniones", NO_MEETINGS_HTML, DEFAULT_FALLBACK);
        return;
    }

    let html: String = meetings
        .meetings
        .iter()
        .map(|meeting| {
            format!(
                r#"
      <div class="col-md-6 mb-4">
        <div class="card card-modern border-0 shadow-sm h-100">
          <div class="card-header bg-primary-institution text-white">
            <div class="d-flex align-items-center">
              <div class="bg-white bg-opacity-20 rounded-circle p-2 me-3">
                <i class="bi bi-calendar-event-fill fs-5"></i>
              </div>
              <div>
                <h6 class="mb-0 fw-bold">{}</h6>
                <small class="opacity-75">
                  <i class="bi bi-clock me-1"></i>{} - {}
                </small>
              </div>
            </div>
          </div>
          <div class="card-body">
            <p class="card-text text-muted mb-3">{}</p>

            <div class="row text-center">
              <div class="col-6">
                <div class="bg-success bg-opacity-10 p-2 rounded">
                  <div class="h5 text-success mb-0">{}</div>
                  <small class="text-muted">Asistieron</small>
                </div>
              </div>
              <div class="col-6">
                <div class="bg-info bg-opacity-10 p-2 rounded">
                  <div class="h5 text-info mb-0">{}</div>
                  <small class="text-muted">Total Padres</small>
                </div>
              </div>
            </div>
          </div>
        </div>
      </div>
    "#,
                escape_html(&meeting.title),
                escape_html(&format_weekday_date(&meeting.date)),
                escape_html(&meeting.time),
                escape_html(&meeting.reason),
                meeting.attendees,
                meeting.total_parents
            )
        })
        .collect();

    update_element(doc, "#lista-reuniones", &html, DEFAULT_FALLBACK);
}

pub fn render<D: Document + ?Sized>(doc: &mut D, meetings: &Meetings) {
    render_stats(doc, meetings);
    render_list(doc, meetings);
}

/// Render the meetings page; a failed load replaces the main content with an alert.
pub async fn render_page<F, D>(loader: &DataLoader<F>, doc: &mut D, policy: LoadPolicy) -> bool
where
    F: Fetcher,
    D: Document + ?Sized,
{
    let has_container = doc.contains(MAIN_CONTENT);
    if has_container {
        show_loading(doc, MAIN_CONTENT, "Cargando reuniones...");
    }

    match policy.load(loader, resources::MEETINGS, Meetings::fallback()).await {
        Ok(meetings) => {
            if has_container {
                doc.reset(MAIN_CONTENT);
            }
            render(doc, &meetings);
            true
        }
        Err(e) => {
            error!(error = %e, "Could not load meetings");
            update_element(
                doc,
                MAIN_CONTENT,
                &page_error_alert("Error al cargar la información de reuniones"),
                DEFAULT_FALLBACK,
            );
            false
        }
    }
}
