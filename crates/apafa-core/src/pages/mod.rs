//! Render pipelines, one per site page.
//!
//! Each page loads its resources concurrently through a shared `DataLoader`,
//! then fills its template through the `Document` helpers. How a missing
//! resource is handled is decided by `LoadPolicy`.

pub mod dashboard;
pub mod meetings;
pub mod notifications;
pub mod parents;

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::document::Document;
use crate::loader::{DataLoader, Fetcher, LoadError};

/// Selector of the element holding each page's main content
pub const MAIN_CONTENT: &str = "#main-content";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// How page resources that fail to load are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Substitute each resource's placeholder data and always render
    #[default]
    Fallback,
    /// Abandon the page and show the error panel if any resource fails
    Strict,
}

impl LoadPolicy {
    pub(crate) async fn load<F: Fetcher, T: DeserializeOwned>(
        self,
        loader: &DataLoader<F>,
        name: &str,
        fallback: T,
    ) -> Result<T, LoadError> {
        match self {
            LoadPolicy::Fallback => Ok(loader.load_with_fallback(name, fallback).await),
            LoadPolicy::Strict => loader.load_as(name).await,
        }
    }
}

/// Clock readings used by date-dependent rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

impl RenderContext {
    pub fn current() -> Self {
        let now = Local::now().naive_local();
        Self {
            today: now.date(),
            now,
        }
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            today: now.date(),
            now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Parents,
    Notifications,
    Meetings,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Index, Page::Parents, Page::Notifications, Page::Meetings];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Parents => "padres",
            Page::Notifications => "notificaciones",
            Page::Meetings => "reuniones",
        }
    }

    /// File name of the page's template and of the rendered output
    pub fn file_name(&self) -> String {
        format!("{}.html", self.name())
    }

    /// Load the page's resources and render them into `doc`.
    /// Returns false when the page fell back to its error state.
    pub async fn render<F, D>(
        &self,
        loader: &DataLoader<F>,
        doc: &mut D,
        ctx: &RenderContext,
        policy: LoadPolicy,
    ) -> bool
    where
        F: Fetcher,
        D: Document + ?Sized,
    {
        match self {
            Page::Index => dashboard::render_page(loader, doc, ctx, policy).await,
            Page::Parents => parents::render_page(loader, doc, ctx, policy).await,
            Page::Notifications => notifications::render_page(loader, doc, policy).await,
            Page::Meetings => meetings::render_page(loader, doc, policy).await,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown page: {}", s))
    }
}

/// Fail with `MissingElement` unless the document has `selector`
pub(crate) fn require<D: Document + ?Sized>(doc: &D, selector: &str) -> Result<(), RenderError> {
    if doc.contains(selector) {
        Ok(())
    } else {
        Err(RenderError::MissingElement(selector.to_string()))
    }
}

/// Alert that replaces a page's main content when it cannot be shown
pub(crate) fn page_error_alert(title: &str) -> String {
    format!(
        r#"
        <div class="alert alert-danger text-center mt-4" role="alert">
          <i class="bi bi-exclamation-triangle-fill me-2"></i>
          <strong>{}</strong><br>
          <small>Por favor, recarga la página o contacta al administrador</small>
        </div>
      "#,
        crate::utils::escape_html(title)
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_names_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.name().parse::<Page>().unwrap(), page);
        }
        assert_eq!(Page::Parents.file_name(), "padres.html");
        assert!("inicio".parse::<Page>().is_err());
    }
}
