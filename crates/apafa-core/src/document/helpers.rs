use std::future::Future;

use tracing::{debug, error, warn};

use super::Document;
use crate::utils::escape_html;

/// Shown when content handed to `update_element`/`update_text` is empty
pub const DEFAULT_FALLBACK: &str = "N/A";

/// Message of the error panel that replaces a page that failed to render
pub const PAGE_ERROR_MESSAGE: &str = "Error al cargar la página. Intente recargar.";

/// Retry action wired to the error panel's button
pub const RELOAD_ACTION: &str = "location.reload()";

/// Set an element's inner HTML, using `fallback` when `content` is empty.
/// A missing element is logged and ignored.
pub fn update_element<D: Document + ?Sized>(doc: &mut D, selector: &str, content: &str, fallback: &str) {
    let content = if content.is_empty() { fallback } else { content };
    if !doc.set_html(selector, content) {
        warn!(selector = selector, "Element not found");
    }
}

/// Set an element's text, using `fallback` when `text` is empty.
/// A missing element is logged and ignored.
pub fn update_text<D: Document + ?Sized>(doc: &mut D, selector: &str, text: &str, fallback: &str) {
    let text = if text.is_empty() { fallback } else { text };
    if doc.set_text(selector, text) {
        debug!(selector = selector, text = text, "Element updated");
    } else {
        warn!(selector = selector, "Element not found");
    }
}

pub fn toggle_element<D: Document + ?Sized>(doc: &mut D, selector: &str, show: bool) {
    if !doc.set_visible(selector, show) {
        debug!(selector = selector, show = show, "No element to toggle");
    }
}

pub fn show_loading<D: Document + ?Sized>(doc: &mut D, selector: &str, message: &str) {
    let html = format!(
        r#"
    <div class="text-center py-4">
      <div class="spinner-border text-primary-institution" role="status">
        <span class="visually-hidden">Cargando...</span>
      </div>
      <p class="mt-2 text-muted">{}</p>
    </div>
  "#,
        escape_html(message)
    );
    update_element(doc, selector, &html, DEFAULT_FALLBACK);
}

/// Replace an element with an error alert, optionally with a retry button
/// running `retry_action`.
pub fn show_error<D: Document + ?Sized>(doc: &mut D, selector: &str, message: &str, retry_action: Option<&str>) {
    let mut html = format!(
        r#"
    <div class="alert alert-danger text-center" role="alert">
      <i class="bi bi-exclamation-triangle-fill me-2"></i>
      {}
  "#,
        escape_html(message)
    );

    if let Some(action) = retry_action {
        html.push_str(&format!(
            r#"<br><button class="btn btn-sm btn-outline-danger mt-2" onclick="{}">Reintentar</button>"#,
            escape_html(action)
        ));
    }

    html.push_str("</div>");
    update_element(doc, selector, &html, DEFAULT_FALLBACK);
}

/// Load a page's data and render it, with `container` as the page's main
/// element.
///
/// The container shows a loading message while `load` runs and gets its
/// template content back before `render` is called. If loading or rendering
/// fails, the container is replaced by an error panel with a reload button.
/// Returns whether the page rendered.
pub async fn initialize_page<D, T, L, R>(doc: &mut D, container: &str, load: L, render: R) -> bool
where
    D: Document + ?Sized,
    L: Future<Output = anyhow::Result<T>>,
    R: FnOnce(&mut D, T) -> anyhow::Result<()>,
{
    if !doc.contains(container) {
        error!(container = container, "Main container not found");
        return false;
    }

    show_loading(doc, container, "Cargando datos...");

    let result = match load.await {
        Ok(data) => {
            doc.reset(container);
            render(doc, data)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            error!(container = container, error = %e, "Page initialization failed");
            show_error(doc, container, PAGE_ERROR_MESSAGE, Some(RELOAD_ACTION));
            false
        }
    }
}
