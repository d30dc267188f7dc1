//! Render pages from their templates into the output directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use apafa_core::{DataLoader, Fetcher, LoadPolicy, Page, RenderContext, SlotDocument};
use tracing::{info, warn};

/// Outcome of rendering one page
#[derive(Debug)]
pub struct Rendered {
    pub page: Page,
    pub path: PathBuf,
    /// False when the page was written in its error state
    pub ok: bool,
}

/// Render `pages` concurrently over one shared loader.
/// Fails if any page could not be written or ended in its error state.
pub async fn run<F: Fetcher>(
    loader: &DataLoader<F>,
    pages: &[Page],
    templates: &Path,
    out: &Path,
    ctx: &RenderContext,
    policy: LoadPolicy,
) -> Result<Vec<Rendered>> {
    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    let futures = pages
        .iter()
        .map(|page| render_one(loader, *page, templates, out, ctx, policy));
    let results = futures::future::join_all(futures).await;

    let rendered = results.into_iter().collect::<Result<Vec<_>>>()?;
    let failed: Vec<String> = rendered
        .iter()
        .filter(|r| !r.ok)
        .map(|r| r.page.to_string())
        .collect();
    if !failed.is_empty() {
        bail!("Pages rendered with errors: {}", failed.join(", "));
    }
    Ok(rendered)
}

async fn render_one<F: Fetcher>(
    loader: &DataLoader<F>,
    page: Page,
    templates: &Path,
    out: &Path,
    ctx: &RenderContext,
    policy: LoadPolicy,
) -> Result<Rendered> {
    let template_path = templates.join(page.file_name());
    let template = tokio::fs::read_to_string(&template_path)
        .await
        .with_context(|| format!("Failed to read template: {}", template_path.display()))?;
    let mut doc = SlotDocument::parse(&template)
        .with_context(|| format!("Invalid template: {}", template_path.display()))?;

    let ok = page.render(loader, &mut doc, ctx, policy).await;

    let path = out.join(page.file_name());
    tokio::fs::write(&path, doc.render())
        .await
        .with_context(|| format!("Failed to write page: {}", path.display()))?;

    if ok {
        info!(page = %page, path = %path.display(), "Rendered page");
    } else {
        warn!(page = %page, path = %path.display(), "Rendered page in its error state");
    }
    Ok(Rendered { page, path, ok })
}
