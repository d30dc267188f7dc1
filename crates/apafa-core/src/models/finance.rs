use serde::{Deserialize, Serialize};

use super::lenient;

/// Membership and payment-status counts (`stats`).
/// Colours are the payment traffic light: green complete, yellow partial, red pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    #[serde(rename = "socios_apafa", deserialize_with = "lenient::count")]
    pub members: u32,
    #[serde(rename = "total_padres", deserialize_with = "lenient::count")]
    pub total_parents: u32,
    #[serde(rename = "verde", deserialize_with = "lenient::count")]
    pub green: u32,
    #[serde(rename = "amarillo", deserialize_with = "lenient::count")]
    pub yellow: u32,
    #[serde(rename = "rojo", deserialize_with = "lenient::count")]
    pub red: u32,
}

impl Stats {
    /// Placeholder shown on the home page when `stats` cannot be loaded
    pub fn dashboard_fallback() -> Self {
        Self {
            members: 0,
            total_parents: 6,
            green: 0,
            yellow: 3,
            red: 3,
        }
    }

    /// Families whose contribution is not complete yet
    pub fn in_progress(&self) -> u32 {
        self.yellow + self.red
    }
}

/// Collection totals (`resumen_financiero`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSummary {
    #[serde(rename = "total_recaudado", deserialize_with = "lenient::number")]
    pub total_collected: f64,
    #[serde(rename = "recaudacion_esperada", deserialize_with = "lenient::number")]
    pub expected_collection: f64,
    #[serde(rename = "diferencia", deserialize_with = "lenient::number")]
    pub difference: f64,
    #[serde(rename = "porcentaje_cumplimiento", deserialize_with = "lenient::number")]
    pub compliance_percentage: f64,
    #[serde(
        rename = "meta_anual",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_number"
    )]
    pub annual_goal: Option<f64>,
}

/// Annual goal assumed when the summary does not state one
pub const DEFAULT_ANNUAL_GOAL: f64 = 1200.0;

impl FinancialSummary {
    pub fn dashboard_fallback() -> Self {
        Self {
            total_collected: 0.0,
            expected_collection: 660.0,
            difference: 660.0,
            compliance_percentage: 0.0,
            annual_goal: None,
        }
    }

    pub fn parents_fallback() -> Self {
        Self {
            total_collected: 0.0,
            expected_collection: 660.0,
            difference: 0.0,
            compliance_percentage: 0.0,
            annual_goal: Some(DEFAULT_ANNUAL_GOAL),
        }
    }

    /// Amount still to collect, never negative
    pub fn pending(&self) -> f64 {
        (self.expected_collection - self.total_collected).max(0.0)
    }

    pub fn annual_goal_or_default(&self) -> f64 {
        match self.annual_goal {
            Some(goal) if goal > 0.0 => goal,
            _ => DEFAULT_ANNUAL_GOAL,
        }
    }
}

/// List of payment concepts (`conceptos_pago`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConcepts {
    #[serde(rename = "conceptos", deserialize_with = "lenient::list")]
    pub concepts: Vec<PaymentConcept>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConcept {
    #[serde(rename = "nombre", deserialize_with = "lenient::text")]
    pub name: String,
    /// Not numeric when the fixture holds something other than a number
    #[serde(rename = "monto_limite", deserialize_with = "lenient::opt_number")]
    pub amount_limit: Option<f64>,
    #[serde(rename = "obligatorio", deserialize_with = "lenient::flag")]
    pub mandatory: bool,
    #[serde(
        rename = "descripcion",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_text"
    )]
    pub description: Option<String>,
}

impl PaymentConcepts {
    /// The mandatory association fee: first mandatory concept mentioning "apafa"
    pub fn mandatory_fee(&self) -> Option<&PaymentConcept> {
        self.concepts
            .iter()
            .find(|c| c.mandatory && crate::utils::contains_ignore_case(&c.name, "apafa"))
    }

    pub fn optional(&self) -> Vec<&PaymentConcept> {
        self.concepts.iter().filter(|c| !c.mandatory).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_partial_fixture() {
        let stats: Stats = serde_json::from_str(r#"{"socios_apafa": 12, "rojo": 2}"#).unwrap();
        assert_eq!(stats.members, 12);
        assert_eq!(stats.red, 2);
        assert_eq!(stats.green, 0);
        assert_eq!(stats.in_progress(), 2);
    }

    #[test]
    fn test_bad_fields_only_blank_themselves() {
        let stats: Stats =
            serde_json::from_str(r#"{"socios_apafa": null, "total_padres": 60, "verde": "30"}"#).unwrap();
        assert_eq!(stats.members, 0);
        assert_eq!(stats.total_parents, 60);
        assert_eq!(stats.green, 0);

        let concepts: PaymentConcepts = serde_json::from_str(
            r#"{"conceptos": [
                {"nombre": "Cuota APAFA", "monto_limite": 150, "obligatorio": true},
                {"nombre": "Biblioteca", "monto_limite": "25", "obligatorio": false},
                null
            ]}"#,
        )
        .unwrap();
        assert_eq!(concepts.concepts.len(), 2);
        assert_eq!(concepts.mandatory_fee().and_then(|c| c.amount_limit), Some(150.0));
        assert_eq!(concepts.optional()[0].amount_limit, None);
    }

    #[test]
    fn test_pending_never_negative() {
        let mut summary = FinancialSummary::dashboard_fallback();
        summary.total_collected = 200.0;
        assert_eq!(summary.pending(), 460.0);
        summary.total_collected = 900.0;
        assert_eq!(summary.pending(), 0.0);
    }

    #[test]
    fn test_annual_goal_default() {
        assert_eq!(FinancialSummary::default().annual_goal_or_default(), 1200.0);
        let summary = FinancialSummary {
            annual_goal: Some(1500.0),
            ..FinancialSummary::default()
        };
        assert_eq!(summary.annual_goal_or_default(), 1500.0);
    }

    #[test]
    fn test_mandatory_fee_lookup() {
        let concepts: PaymentConcepts = serde_json::from_str(
            r#"{"conceptos": [
                {"nombre": "Biblioteca", "monto_limite": 25, "obligatorio": false},
                {"nombre": "Uniforme", "monto_limite": 80, "obligatorio": true},
                {"nombre": "Cuota Apafa 2026", "monto_limite": 150, "obligatorio": true}
            ]}"#,
        )
        .unwrap();

        assert_eq!(concepts.mandatory_fee().and_then(|c| c.amount_limit), Some(150.0));
        assert_eq!(concepts.optional().len(), 1);
    }
}
