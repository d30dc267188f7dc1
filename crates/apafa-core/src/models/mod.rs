//! Data models for the APAFA fixtures.
//!
//! Field names follow the fixtures' Spanish JSON keys through serde renames.
//! Every field has a default so that partially filled fixtures still decode,
//! the same way the pages treat missing values as zero or empty.
//!
//! - `Stats`, `FinancialSummary`, `PaymentConcept`: contribution figures
//! - `Committee`, `CommitteeMember`: the association's board
//! - `Parent`, `PaymentStatus`: per-family contribution status
//! - `Notification`, `Event`, `Meeting`: announcements and calendar

pub mod committee;
pub mod event;
pub mod finance;
pub mod lenient;
pub mod meeting;
pub mod notification;
pub mod parent;

pub use committee::{Committee, CommitteeMember};
pub use event::{Event, EventKind, Events};
pub use finance::{FinancialSummary, PaymentConcept, PaymentConcepts, Stats};
pub use meeting::{Meeting, Meetings};
pub use notification::{Notification, NotificationKind, Notifications};
pub use parent::{Parent, PaymentStatus};

/// Resource names of the fixtures, as passed to `DataLoader`
pub mod resources {
    pub const STATS: &str = "stats";
    pub const FINANCIAL_SUMMARY: &str = "resumen_financiero";
    pub const PAYMENT_CONCEPTS: &str = "conceptos_pago";
    pub const COMMITTEE: &str = "comite_apafa";
    pub const PARENTS: &str = "padres";
    pub const NOTIFICATIONS: &str = "notificaciones";
    pub const EVENTS: &str = "eventos";
    pub const MEETINGS: &str = "reuniones";
}
