//! Notifications page: counts and the announcement list, newest first.
//!
//! Unlike the other pages this one never replaces the main content: its
//! failures switch the notifications section to its own error block.

use tracing::{error, info};

use super::{require, LoadPolicy, RenderError};
use crate::document::{toggle_element, update_text, Document, DEFAULT_FALLBACK};
use crate::loader::{DataLoader, Fetcher};
use crate::models::{resources, Notification, Notifications};
use crate::utils::{escape_html, format_long_date};

const LIST: &str = "#lista-notificaciones";

const EMPTY_LIST_HTML: &str = r#"
            <div class="text-center py-5">
                <i class="bi bi-bell-slash text-muted fs-1 mb-3"></i>
                <h5 class="text-muted">No hay notificaciones disponibles</h5>
                <p class="text-muted">Las notificaciones aparecerán aquí cuando sean publicadas por el comité APAFA.</p>
            </div>
        "#;

fn event_block(notification: &Notification) -> String {
    let Some(date) = notification.event_date.as_deref().filter(|d| !d.is_empty()) else {
        return String::new();
    };

    let time = match notification.event_time.as_deref().filter(|t| !t.is_empty()) {
        Some(time) => format!(
            r#"
                                        <p class="mb-1">
                                            <i class="bi bi-clock me-2"></i>
                                            <strong>Hora:</strong> {}
                                        </p>"#,
            escape_html(time)
        ),
        None => String::new(),
    };
    let place = match notification.event_place.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(place) => format!(
            r#"
                                        <p class="mb-0">
                                            <i class="bi bi-geo-alt me-2"></i>
                                            <strong>Lugar:</strong> {}
                                        </p>"#,
            escape_html(place)
        ),
        None => String::new(),
    };

    format!(
        r#"
                        <div class="evento-info p-3 bg-white rounded border-start border-primary">
                            <h6 class="text-primary mb-2">
                                <i class="bi bi-calendar-check me-2"></i>Información del Evento
                            </h6>
                            <div class="row">
                                <div class="col-md-6">
                                    <p class="mb-1">
                                        <i class="bi bi-calendar-date me-2"></i>
                                        <strong>Fecha:</strong> {}
                                    </p>{}
                                </div>
                                <div class="col-md-6">{}
                                </div>
                            </div>
                        </div>"#,
        escape_html(&format_long_date(date)),
        time,
        place
    )
}

fn notification_item(notification: &Notification) -> String {
    let (badge_class, badge_text) = notification.kind.badge();
    format!(
        r#"
            <div class="notificacion-item mb-4 p-4 border rounded bg-light">
                <div class="d-flex justify-content-between align-items-start mb-3">
                    <div class="flex-grow-1">
                        <h5 class="fw-bold text-primary-institution mb-2">
                            <i class="bi bi-bell me-2"></i>{}
                        </h5>
                        <div class="mb-2">
                            <span class="badge {} me-2">{}</span>
                            <small class="text-muted">
                                <i class="bi bi-calendar-event me-1"></i>Publicado: {}
                            </small>
                            <small class="text-muted ms-3">
                                <i class="bi bi-person me-1"></i>{}
                            </small>
                        </div>
                    </div>
                </div>

                <div class="notificacion-contenido mb-3">
                    <p class="mb-3">{}</p>
{}
                </div>
            </div>
        "#,
        escape_html(&notification.title),
        badge_class,
        badge_text,
        escape_html(&format_long_date(&notification.published_on)),
        escape_html(notification.organizer()),
        escape_html(&notification.content),
        event_block(notification)
    )
}

pub fn render_list<D: Document + ?Sized>(doc: &mut D, notifications: &Notifications) -> Result<(), RenderError> {
    require(doc, LIST)?;

    if notifications.notifications.is_empty() {
        doc.set_html(LIST, EMPTY_LIST_HTML);
        return Ok(());
    }

    let html: String = notifications
        .newest_first()
        .into_iter()
        .map(notification_item)
        .collect();
    doc.set_html(LIST, &html);
    Ok(())
}

pub fn render<D: Document + ?Sized>(doc: &mut D, notifications: &Notifications) -> Result<(), RenderError> {
    toggle_element(doc, "#loading-notificaciones", false);
    toggle_element(doc, "#error-notificaciones", false);
    toggle_element(doc, "#contenido-notificaciones", true);

    update_text(doc, "#total-notificaciones", &notifications.total().to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#notificaciones-eventos", &notifications.event_count().to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#notificaciones-generales", &notifications.general_count().to_string(), DEFAULT_FALLBACK);

    render_list(doc, notifications)
}

pub fn show_error<D: Document + ?Sized>(doc: &mut D, message: &str) {
    toggle_element(doc, "#loading-notificaciones", false);
    toggle_element(doc, "#contenido-notificaciones", false);
    toggle_element(doc, "#error-notificaciones", true);
    update_text(doc, "#error-message-notificaciones", message, DEFAULT_FALLBACK);
}

pub async fn render_page<F, D>(loader: &DataLoader<F>, doc: &mut D, policy: LoadPolicy) -> bool
where
    F: Fetcher,
    D: Document + ?Sized,
{
    let notifications = match policy.load(loader, resources::NOTIFICATIONS, Notifications::default()).await {
        Ok(notifications) => notifications,
        Err(e) => {
            error!(error = %e, "Could not load notifications");
            show_error(doc, &format!("Error al cargar las notificaciones: {}", e));
            return false;
        }
    };

    match render(doc, &notifications) {
        Ok(()) => {
            info!(count = notifications.notifications.len(), "Notifications rendered");
            true
        }
        Err(e) => {
            error!(error = %e, "Could not render notifications");
            show_error(doc, &format!("Error al mostrar las notificaciones: {}", e));
            false
        }
    }
}
