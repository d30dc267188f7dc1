//! Members page: contribution goal, progress and per-family tables.

use super::{LoadPolicy, RenderContext, MAIN_CONTENT};
use crate::document::{initialize_page, toggle_element, update_element, update_text, Document, DEFAULT_FALLBACK};
use crate::loader::{DataLoader, Fetcher, LoadError};
use crate::models::{resources, FinancialSummary, Parent, Stats};
use crate::utils::{escape_html, format_currency, format_percentage, format_timestamp, round_half_up};

/// Rows shown per table
pub const TABLE_LIMIT: usize = 10;

const NO_COMPLETE_ROWS: &str = r#"
      <tr>
        <td colspan="4" class="text-center text-muted py-4">
          <i class="bi bi-info-circle me-2"></i>
          No hay contribuciones completas registradas
        </td>
      </tr>
    "#;

const NO_PENDING_ROWS: &str = r#"
      <tr>
        <td colspan="5" class="text-center text-muted py-4">
          <i class="bi bi-info-circle me-2"></i>
          No hay contribuciones pendientes registradas
        </td>
      </tr>
    "#;

#[derive(Debug, Clone, PartialEq)]
pub struct ParentsData {
    pub parents: Vec<Parent>,
    pub finance: FinancialSummary,
    pub stats: Stats,
}

pub async fn load<F: Fetcher>(loader: &DataLoader<F>, policy: LoadPolicy) -> Result<ParentsData, LoadError> {
    let (parents, finance, stats) = tokio::try_join!(
        policy.load(loader, resources::PARENTS, Vec::<Parent>::new()),
        policy.load(loader, resources::FINANCIAL_SUMMARY, FinancialSummary::parents_fallback()),
        policy.load(loader, resources::STATS, Stats::default()),
    )?;
    Ok(ParentsData {
        parents,
        finance,
        stats,
    })
}

/// Goal, completion percentages and last update time
pub fn render_general_info<D: Document + ?Sized>(doc: &mut D, finance: &FinancialSummary, ctx: &RenderContext) {
    let completed = finance.compliance_percentage;
    update_text(doc, "#meta-anual", &format_currency(finance.annual_goal_or_default()), DEFAULT_FALLBACK);
    update_text(doc, "#porcentaje-completado", &format_percentage(completed), DEFAULT_FALLBACK);
    update_text(doc, "#porcentaje-pendiente", &format_percentage(100.0 - completed), DEFAULT_FALLBACK);
    update_text(doc, "#ultima-actualizacion", &format_timestamp(ctx.now), DEFAULT_FALLBACK);
}

pub fn render_tab_counts<D: Document + ?Sized>(doc: &mut D, stats: &Stats) {
    update_text(doc, "#conteo-completos", &stats.green.to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#conteo-proceso", &stats.in_progress().to_string(), DEFAULT_FALLBACK);
}

fn name_cell(parent: &Parent, color: &str) -> String {
    format!(
        r#"<td>
          <div class="d-flex align-items-center">
            <div class="bg-{color} bg-opacity-20 text-{color} rounded-circle p-2 me-3">
              <i class="bi bi-person-fill"></i>
            </div>
            <div>
              <strong>{}</strong><br>
              <small class="text-muted">ID: {}</small>
            </div>
          </div>
        </td>"#,
        escape_html(&parent.full_name),
        escape_html(&parent.partial_id),
    )
}

pub fn render_complete_table<D: Document + ?Sized>(doc: &mut D, complete: &[&Parent]) {
    if complete.is_empty() {
        update_element(doc, "#tabla-completos", NO_COMPLETE_ROWS, DEFAULT_FALLBACK);
        return;
    }

    let html: String = complete
        .iter()
        .take(TABLE_LIMIT)
        .map(|parent| {
            format!(
                r#"
      <tr>
        {}
        <td class="text-center">
          <div class="progress" style="height: 8px; width: 80px; margin: 0 auto;">
            <div class="progress-bar bg-success" style="width: 100%"></div>
          </div>
        </td>
        <td class="text-center fw-bold text-success">{}</td>
        <td class="text-center">
          <span class="badge bg-success">
            <i class="bi bi-check-circle me-1"></i>Completo
          </span>
        </td>
      </tr>
    "#,
                name_cell(parent, "success"),
                format_currency(parent.total_paid)
            )
        })
        .collect();

    update_element(doc, "#tabla-completos", &html, DEFAULT_FALLBACK);
}

/// Families still paying, largest payment first, with progress toward `expected`
pub fn render_in_progress_table<D: Document + ?Sized>(doc: &mut D, pending: &[&Parent], expected: f64) {
    if pending.is_empty() {
        update_element(doc, "#tabla-proceso", NO_PENDING_ROWS, DEFAULT_FALLBACK);
        return;
    }

    let mut sorted = pending.to_vec();
    sorted.sort_by(|a, b| b.total_paid.total_cmp(&a.total_paid));

    let html: String = sorted
        .iter()
        .take(TABLE_LIMIT)
        .map(|parent| {
            let progress = parent.progress(expected);
            let (badge_class, icon) = parent.payment_status.badge();
            format!(
                r#"
      <tr>
        {}
        <td class="text-center">
          <div class="progress" style="height: 8px; width: 80px; margin: 0 auto;">
            <div class="progress-bar bg-warning" style="width: {}%"></div>
          </div>
          <small class="text-muted">{:.0}%</small>
        </td>
        <td class="text-center fw-bold text-warning">{}</td>
        <td class="text-center fw-bold text-alert-institution">{}</td>
        <td class="text-center">
          <span class="badge {}">
            <i class="bi {} me-1"></i>{}
          </span>
        </td>
      </tr>
    "#,
                name_cell(parent, "warning"),
                progress.min(100.0),
                round_half_up(progress, 0),
                format_currency(parent.total_paid),
                format_currency(parent.outstanding),
                badge_class,
                icon,
                parent.payment_status.label()
            )
        })
        .collect();

    update_element(doc, "#tabla-proceso", &html, DEFAULT_FALLBACK);
}

pub fn render<D: Document + ?Sized>(doc: &mut D, data: &ParentsData, ctx: &RenderContext) {
    render_general_info(doc, &data.finance, ctx);
    render_tab_counts(doc, &data.stats);

    let (complete, pending): (Vec<&Parent>, Vec<&Parent>) =
        data.parents.iter().partition(|p| p.is_complete());
    render_complete_table(doc, &complete);
    render_in_progress_table(doc, &pending, data.finance.expected_collection);

    toggle_element(doc, ".loading-spinner", false);
}

pub async fn render_page<F, D>(loader: &DataLoader<F>, doc: &mut D, ctx: &RenderContext, policy: LoadPolicy) -> bool
where
    F: Fetcher,
    D: Document + ?Sized,
{
    initialize_page(
        doc,
        MAIN_CONTENT,
        async { Ok(load(loader, policy).await?) },
        |doc, data| {
            render(doc, &data, ctx);
            Ok(())
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SlotDocument;
    use crate::models::PaymentStatus;
    use crate::pages::test_support::{ctx, loader, FixtureFetcher};
    use serde_json::json;

    const TEMPLATE: &str = r#"{{region #main-content}}
<div class="loading-spinner"{{hidden .loading-spinner}}></div>
<b>{{#meta-anual}}</b><b>{{#porcentaje-completado}}</b><b>{{#porcentaje-pendiente}}</b>
<i>{{#ultima-actualizacion}}</i>
<span>{{#conteo-completos}}</span><span>{{#conteo-proceso}}</span>
<table><tbody>{{#tabla-completos}}</tbody></table>
<table><tbody>{{#tabla-proceso}}</tbody></table>
{{end}}"#;

    fn parent(name: &str, paid: f64, status: PaymentStatus) -> Parent {
        Parent {
            full_name: name.to_string(),
            partial_id: "****123".to_string(),
            total_paid: paid,
            outstanding: 110.0 - paid,
            payment_status: status,
        }
    }

    #[tokio::test]
    async fn test_renders_tables_and_figures() {
        let fetcher = FixtureFetcher::default()
            .with(
                "padres",
                json!([
                    {"nombre_completo": "Familia Quispe", "dni_parcial": "****001", "total_pagado": 110, "faltante": 0, "estado_pago": "completo"},
                    {"nombre_completo": "Familia Huamán", "dni_parcial": "****002", "total_pagado": 20, "faltante": 90, "estado_pago": "pendiente"},
                    {"nombre_completo": "Familia Flores", "dni_parcial": "****003", "total_pagado": 55, "faltante": 55, "estado_pago": "parcial"}
                ]),
            )
            .with("resumen_financiero", json!({"recaudacion_esperada": 110, "porcentaje_cumplimiento": 62.5, "meta_anual": 1500}))
            .with("stats", json!({"verde": 1, "amarillo": 1, "rojo": 1}));
        let loader = loader(fetcher);
        let mut doc = SlotDocument::parse(TEMPLATE).unwrap();

        assert!(render_page(&loader, &mut doc, &ctx(), LoadPolicy::Fallback).await);

        assert_eq!(doc.content("#meta-anual"), Some("S/ 1,500.00"));
        assert_eq!(doc.content("#porcentaje-completado"), Some("62.5%"));
        assert_eq!(doc.content("#porcentaje-pendiente"), Some("37.5%"));
        assert_eq!(doc.content("#ultima-actualizacion"), Some("18/10/2026, 09:30:00"));
        assert_eq!(doc.content("#conteo-completos"), Some("1"));
        assert_eq!(doc.content("#conteo-proceso"), Some("2"));
        assert!(!doc.is_visible(".loading-spinner"));

        let complete = doc.content("#tabla-completos").unwrap();
        assert!(complete.contains("Familia Quispe"));
        assert!(complete.contains("S/ 110.00"));

        let in_progress = doc.content("#tabla-proceso").unwrap();
        let flores = in_progress.find("Familia Flores").unwrap();
        let huaman = in_progress.find("Familia Huamán").unwrap();
        assert!(flores < huaman, "largest payment first");
        assert!(in_progress.contains("50%"));
        assert!(in_progress.contains("En Progreso"));
        assert!(in_progress.contains("Pendiente"));
    }

    #[tokio::test]
    async fn test_missing_fixtures_use_defaults() {
        let loader = loader(FixtureFetcher::default());
        let mut doc = SlotDocument::parse(TEMPLATE).unwrap();

        assert!(render_page(&loader, &mut doc, &ctx(), LoadPolicy::Fallback).await);

        assert_eq!(doc.content("#meta-anual"), Some("S/ 1,200.00"));
        assert_eq!(doc.content("#porcentaje-pendiente"), Some("100.0%"));
        assert!(doc.content("#tabla-completos").unwrap().contains("No hay contribuciones completas"));
        assert!(doc.content("#tabla-proceso").unwrap().contains("No hay contribuciones pendientes"));
    }

    #[test]
    fn test_tables_are_capped() {
        let parents: Vec<Parent> = (0..15)
            .map(|i| parent(&format!("Familia {}", i), f64::from(i), PaymentStatus::Partial))
            .collect();
        let refs: Vec<&Parent> = parents.iter().collect();
        let mut doc = SlotDocument::parse(TEMPLATE).unwrap();

        render_in_progress_table(&mut doc, &refs, 110.0);

        let html = doc.content("#tabla-proceso").unwrap();
        assert_eq!(html.matches("<tr>").count(), TABLE_LIMIT);
        assert!(html.contains("Familia 14"));
        assert!(!html.contains("Familia 4<"));
    }

    #[test]
    fn test_progress_bar_capped_at_full() {
        let overpaid = parent("Familia Ríos", 220.0, PaymentStatus::Partial);
        let mut doc = SlotDocument::parse(TEMPLATE).unwrap();

        render_in_progress_table(&mut doc, &[&overpaid], 110.0);

        let html = doc.content("#tabla-proceso").unwrap();
        assert!(html.contains("width: 100%"));
        assert!(html.contains("200%"));
    }

    #[test]
    fn test_progress_ties_round_up() {
        let parent = parent("Familia Soto", 125.0, PaymentStatus::Partial);
        let mut doc = SlotDocument::parse(TEMPLATE).unwrap();

        render_in_progress_table(&mut doc, &[&parent], 200.0);

        let html = doc.content("#tabla-proceso").unwrap();
        assert!(html.contains("width: 62.5%"));
        assert!(html.contains(">63%</small>"));
    }
}
