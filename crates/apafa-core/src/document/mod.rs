//! Page document model and the helpers pages use to update it.
//!
//! Pages never touch markup directly: they address elements by selector
//! (`#id` or `.class`) through the `Document` trait. `SlotDocument` is the
//! implementation backed by a page template with placeholders.

pub mod helpers;
pub mod template;

pub use helpers::{
    initialize_page, show_error, show_loading, toggle_element, update_element, update_text,
    DEFAULT_FALLBACK, PAGE_ERROR_MESSAGE, RELOAD_ACTION,
};
pub use template::{SlotDocument, TemplateError};

use crate::utils::escape_html;

/// Selector-addressed page content.
///
/// Every mutator returns `false` when the document has no element for the
/// selector, leaving the document unchanged.
pub trait Document {
    fn contains(&self, selector: &str) -> bool;

    /// Replace the inner HTML of an element
    fn set_html(&mut self, selector: &str, html: &str) -> bool;

    /// Replace the content of an element with plain text
    fn set_text(&mut self, selector: &str, text: &str) -> bool {
        self.set_html(selector, &escape_html(text))
    }

    fn set_visible(&mut self, selector: &str, visible: bool) -> bool;

    /// Restore an element's original template content
    fn reset(&mut self, selector: &str) -> bool;
}
