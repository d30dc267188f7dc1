//! Home page: quick figures, fees, committee and upcoming events.

use tracing::{debug, error};

use super::{require, LoadPolicy, RenderContext, RenderError, MAIN_CONTENT};
use crate::document::{initialize_page, toggle_element, update_element, update_text, Document, DEFAULT_FALLBACK};
use crate::loader::{DataLoader, Fetcher, LoadError};
use crate::models::{resources, Committee, CommitteeMember, Events, FinancialSummary, Notifications, PaymentConcepts, Stats};
use crate::utils::{escape_html, format_currency, format_long_date};

/// At most this many events are shown under "Próximos eventos"
pub const UPCOMING_EVENTS_LIMIT: usize = 3;

const DEFAULT_FEE_HTML: &str = r#"
      <strong>Cuota APAFA 2026-2027:</strong><br>
      <span class="h4 text-accent-institution">S/ 150.00</span>
    "#;

const DEFAULT_CONTRIBUTIONS_HTML: &str = r#"
      <div class="row">
        <div class="col-md-6">
          <strong>Proyecto Biblioteca:</strong> S/ 25.00 (Opcional)<br>
          <small class="text-muted">Para renovación de material educativo</small>
        </div>
        <div class="col-md-6">
          <strong>Actividad Cultural:</strong> S/ 15.00 (Opcional)<br>
          <small class="text-muted">Viaje de estudios y actividades culturales</small>
        </div>
      </div>
    "#;

const NO_CONTRIBUTIONS_HTML: &str = r#"
      <div class="text-center text-muted py-3">
        <i class="bi bi-info-circle me-2"></i>
        No hay contribuciones adicionales disponibles en este momento.
      </div>
    "#;

const DEFAULT_OFFICERS_HTML: &str = r#"
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-primary-institution"></i><strong>Presidente:</strong> [Nombre del Presidente]</li>
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-primary-institution"></i><strong>Vicepresidente:</strong> [Nombre del Vicepresidente]</li>
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-primary-institution"></i><strong>Secretario:</strong> [Nombre del Secretario]</li>
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-primary-institution"></i><strong>Tesorero:</strong> [Nombre del Tesorero]</li>
    "#;

const DEFAULT_BOARD_HTML: &str = r#"
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-accent-institution"></i><strong>Vocal:</strong> [Nombre del Vocal]</li>
      <li class="mb-2"><i class="bi bi-person-circle me-2 text-accent-institution"></i><strong>Vocal:</strong> [Nombre del Vocal]</li>
    "#;

const NO_UPCOMING_EVENTS_HTML: &str = r#"
      <div class="col-12">
        <div class="text-center py-5">
          <i class="bi bi-calendar-x text-muted fs-1 mb-3"></i>
          <h5 class="text-muted">No hay eventos próximos</h5>
          <p class="text-muted">Los próximos eventos aparecerán aquí cuando sean programados.</p>
        </div>
      </div>
    "#;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub stats: Stats,
    pub finance: FinancialSummary,
    pub concepts: PaymentConcepts,
    pub committee: Committee,
    pub notifications: Notifications,
}

/// Load the home page resources concurrently.
///
/// The notification count is a secondary figure and always falls back to
/// zero, whatever the policy.
pub async fn load<F: Fetcher>(loader: &DataLoader<F>, policy: LoadPolicy) -> Result<DashboardData, LoadError> {
    let (core, notifications) = tokio::join!(
        async {
            tokio::try_join!(
                policy.load(loader, resources::STATS, Stats::dashboard_fallback()),
                policy.load(loader, resources::FINANCIAL_SUMMARY, FinancialSummary::dashboard_fallback()),
                policy.load(loader, resources::PAYMENT_CONCEPTS, PaymentConcepts::default()),
                policy.load(loader, resources::COMMITTEE, Committee::default()),
            )
        },
        loader.load_with_fallback(resources::NOTIFICATIONS, Notifications::default()),
    );
    let (stats, finance, concepts, committee) = core?;

    Ok(DashboardData {
        stats,
        finance,
        concepts,
        committee,
        notifications,
    })
}

pub fn render_quick_stats<D: Document + ?Sized>(doc: &mut D, data: &DashboardData) {
    update_text(doc, "#socios-apafa-count", &data.stats.members.to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#total-recaudado", &format_currency(data.finance.total_collected), DEFAULT_FALLBACK);
    update_text(doc, "#comunicados-activos", &data.notifications.total().to_string(), DEFAULT_FALLBACK);
    update_text(doc, "#monto-pendiente", &format_currency(data.finance.pending()), DEFAULT_FALLBACK);
}

pub fn render_fees<D: Document + ?Sized>(doc: &mut D, concepts: &PaymentConcepts) {
    let html = match concepts.mandatory_fee() {
        Some(fee) => format!(
            r#"
      <strong>{}:</strong><br>
      <span class="h4 text-accent-institution">{}</span>
    "#,
            escape_html(&fee.name),
            format_currency(fee.amount_limit)
        ),
        None => DEFAULT_FEE_HTML.to_string(),
    };
    update_element(doc, "#cuota-obligatoria", &html, DEFAULT_FALLBACK);
}

/// Optional concepts, two per row
pub fn render_additional_contributions<D: Document + ?Sized>(doc: &mut D, concepts: &PaymentConcepts) {
    if concepts.concepts.is_empty() {
        update_element(doc, "#contribuciones-adicionales", DEFAULT_CONTRIBUTIONS_HTML, DEFAULT_FALLBACK);
        return;
    }

    let optional = concepts.optional();
    if optional.is_empty() {
        update_element(doc, "#contribuciones-adicionales", NO_CONTRIBUTIONS_HTML, DEFAULT_FALLBACK);
        return;
    }

    let mut html = String::from(r#"<div class="row">"#);
    for (index, concept) in optional.iter().enumerate() {
        if index > 0 && index % 2 == 0 {
            html.push_str(r#"</div><div class="row mt-3">"#);
        }
        let description = concept
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("Contribución adicional voluntaria");
        html.push_str(&format!(
            r#"
      <div class="col-md-6 mb-3">
        <strong>{}:</strong> {} (Opcional)<br>
        <small class="text-muted">{}</small>
      </div>
    "#,
            escape_html(&concept.name),
            format_currency(concept.amount_limit),
            escape_html(description)
        ));
    }
    html.push_str("</div>");

    update_element(doc, "#contribuciones-adicionales", &html, DEFAULT_FALLBACK);
}

fn member_item(member: &CommitteeMember, default_position: &str, color: &str) -> String {
    format!(
        r#"<li class="mb-2"><i class="bi bi-person-circle me-2 {}"></i><strong>{}:</strong> {}</li>"#,
        color,
        escape_html(member.position_or(default_position)),
        escape_html(&member.full_name)
    )
}

pub fn render_committee<D: Document + ?Sized>(doc: &mut D, committee: &Committee) {
    if committee.officers.is_empty() {
        update_element(doc, "#comite-directivos", DEFAULT_OFFICERS_HTML, DEFAULT_FALLBACK);
        update_element(doc, "#comite-vocales", DEFAULT_BOARD_HTML, DEFAULT_FALLBACK);
        return;
    }

    let officers: String = committee
        .officers
        .iter()
        .map(|m| member_item(m, "Directivo", "text-primary-institution"))
        .collect();
    update_element(doc, "#comite-directivos", &officers, DEFAULT_FALLBACK);

    let mut board: String = committee
        .board_members
        .iter()
        .map(|m| member_item(m, "Vocal", "text-accent-institution"))
        .collect();

    if !committee.collaborators.is_empty() {
        board.push_str(r#"<h6 class="text-accent-institution mb-3 mt-4">Colaboradores</h6><ul class="list-unstyled">"#);
        for collaborator in &committee.collaborators {
            board.push_str(&format!(
                r#"<li class="mb-2"><i class="bi bi-person-circle me-2 text-secondary-institution"></i>{}</li>"#,
                escape_html(&collaborator.full_name)
            ));
        }
        board.push_str("</ul>");
    }

    update_element(doc, "#comite-vocales", &board, DEFAULT_FALLBACK);
}

pub fn render<D: Document + ?Sized>(doc: &mut D, data: &DashboardData) {
    render_quick_stats(doc, data);
    render_fees(doc, &data.concepts);
    render_additional_contributions(doc, &data.concepts);
    render_committee(doc, &data.committee);
    debug!("Dashboard sections rendered");
}

/// Cards for the upcoming events section
pub fn render_upcoming_events<D: Document + ?Sized>(
    doc: &mut D,
    events: &Events,
    ctx: &RenderContext,
) -> Result<(), RenderError> {
    require(doc, "#proximos-eventos-list")?;

    toggle_element(doc, "#proximos-eventos-loading", false);
    toggle_element(doc, "#proximos-eventos-error", false);
    toggle_element(doc, "#proximos-eventos-content", true);

    let upcoming = events.upcoming(ctx.today, UPCOMING_EVENTS_LIMIT);
    if upcoming.is_empty() {
        doc.set_html("#proximos-eventos-list", NO_UPCOMING_EVENTS_HTML);
        return Ok(());
    }

    let html: String = upcoming
        .iter()
        .map(|event| {
            let header_class = if event.important {
                "bg-accent-institution text-secondary-institution"
            } else {
                "bg-primary-institution text-white"
            };
            let (badge_class, badge_text) = event.kind.badge();

            let description = match event.description.as_deref().filter(|d| !d.is_empty()) {
                Some(d) => format!(r#"<p class="card-text small text-muted">{}</p>"#, escape_html(d)),
                None => String::new(),
            };
            let detail = event.detail_line();
            let detail = if detail.is_empty() {
                String::new()
            } else {
                format!(r#"<p class="card-text small text-muted">{}</p>"#, escape_html(&detail))
            };

            format!(
                r#"
      <div class="col-md-4">
        <div class="card card-modern border-0 shadow-sm h-100">
          <div class="card-header {}">
            <h6 class="mb-0">
              <i class="bi bi-calendar-check me-2"></i>{}
            </h6>
          </div>
          <div class="card-body">
            <h6 class="card-title">{}</h6>
            {}
            {}
            <span class="badge {}">{}</span>
          </div>
        </div>
      </div>
    "#,
                header_class,
                escape_html(&format_long_date(&event.date)),
                escape_html(&event.title),
                description,
                detail,
                badge_class,
                badge_text
            )
        })
        .collect();

    doc.set_html("#proximos-eventos-list", &html);
    Ok(())
}

/// Switch the upcoming events section to its error state
pub fn show_upcoming_events_error<D: Document + ?Sized>(doc: &mut D, message: &str) {
    toggle_element(doc, "#proximos-eventos-loading", false);
    toggle_element(doc, "#proximos-eventos-content", false);
    toggle_element(doc, "#proximos-eventos-error", true);
    update_text(doc, "#proximos-eventos-error-message", message, DEFAULT_FALLBACK);
}

/// Render the home page. The upcoming events section is independent: its
/// failure does not affect the rest of the page.
pub async fn render_page<F, D>(loader: &DataLoader<F>, doc: &mut D, ctx: &RenderContext, policy: LoadPolicy) -> bool
where
    F: Fetcher,
    D: Document + ?Sized,
{
    let (dashboard, events) = tokio::join!(
        load(loader, policy),
        policy.load(loader, resources::EVENTS, Events::default()),
    );

    let rendered = initialize_page(doc, MAIN_CONTENT, async move { Ok(dashboard?) }, |doc, data| {
        render(doc, &data);
        Ok(())
    })
    .await;

    let section = match events {
        Ok(events) => render_upcoming_events(doc, &events, ctx),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = section {
        error!(error = %e, "Upcoming events section failed");
        show_upcoming_events_error(doc, &format!("Error al cargar los próximos eventos: {}", e));
    }

    rendered
}
