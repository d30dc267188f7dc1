use serde::{Deserialize, Serialize};

use super::lenient;

/// Contribution status of one family (`padres` is a list of these).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parent {
    #[serde(rename = "nombre_completo", deserialize_with = "lenient::text")]
    pub full_name: String,
    /// Partially masked national id, safe to publish
    #[serde(rename = "dni_parcial", deserialize_with = "lenient::text")]
    pub partial_id: String,
    #[serde(rename = "total_pagado", deserialize_with = "lenient::number")]
    pub total_paid: f64,
    #[serde(rename = "faltante", deserialize_with = "lenient::number")]
    pub outstanding: f64,
    #[serde(rename = "estado_pago", deserialize_with = "lenient::or_default")]
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "completo")]
    Complete,
    #[serde(rename = "pendiente")]
    Pending,
    /// Anything else, including a missing status, counts as partially paid
    #[default]
    #[serde(rename = "parcial")]
    #[serde(other)]
    Partial,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Complete => "Completo",
            PaymentStatus::Pending => "Pendiente",
            PaymentStatus::Partial => "En Progreso",
        }
    }

    /// Badge classes and icon for the in-progress table
    pub fn badge(&self) -> (&'static str, &'static str) {
        match self {
            PaymentStatus::Complete => ("bg-success", "bi-check-circle"),
            PaymentStatus::Pending => ("bg-danger text-white", "bi-x-circle"),
            PaymentStatus::Partial => ("bg-warning text-dark", "bi-clock"),
        }
    }
}

impl Parent {
    pub fn is_complete(&self) -> bool {
        self.payment_status == PaymentStatus::Complete
    }

    /// Share of `expected` already paid, in percent; 0 when nothing is expected
    pub fn progress(&self, expected: f64) -> f64 {
        if expected > 0.0 {
            self.total_paid / expected * 100.0
        } else {
            0.0
        }
    }
}
