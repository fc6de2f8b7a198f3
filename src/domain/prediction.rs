//! Prediction result types.
//!
//! Represents the output of the risk-prediction endpoint and the static
//! advice shown for each risk category.

use serde::{Deserialize, Serialize};

/// Advisory message returned with a low-risk prediction.
pub const LOW_RISK_MESSAGE: &str =
    "Keep up your healthy habits! Continue your current lifestyle with regular check-ups.";

/// Advisory message returned with a high-risk prediction.
pub const HIGH_RISK_MESSAGE: &str =
    "Please consult a doctor for a comprehensive evaluation and discuss preventive measures.";

const LOW_RISK_ADVICE: [&str; 4] = [
    "Maintain a healthy diet rich in fruit, vegetables and whole grains",
    "Exercise regularly (at least 150 minutes of moderate activity per week)",
    "Schedule regular check-ups with your doctor",
    "Keep track of your blood pressure and cholesterol levels",
];

const HIGH_RISK_ADVICE: [&str; 5] = [
    "Consult a cardiologist for a comprehensive evaluation",
    "Adopt a heart-healthy diet low in saturated fat and sodium",
    "Stay physically active as recommended by your doctor",
    "Take medication as prescribed and monitor your vital signs regularly",
    "Consider lifestyle changes such as quitting smoking and reducing alcohol",
];

/// Binary risk classification returned by the prediction endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    High,
}

impl RiskCategory {
    /// Classify a confidence score; `>= 0.5` is high risk.
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.5 {
            Self::High
        } else {
            Self::Low
        }
    }

    /// Fixed advisory message template for this category.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Low => LOW_RISK_MESSAGE,
            Self::High => HIGH_RISK_MESSAGE,
        }
    }

    /// Short call to action shown above the message.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Low => "Keep up your healthy habits!",
            Self::High => "Please consult a doctor",
        }
    }

    /// Static recommendation list (4 items for low risk, 5 for high).
    #[must_use]
    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            Self::Low => &LOW_RISK_ADVICE,
            Self::High => &HIGH_RISK_ADVICE,
        }
    }

    /// Heading for the advice list.
    #[must_use]
    pub fn advice_title(&self) -> &'static str {
        match self {
            Self::Low => "Recommendations",
            Self::High => "Important Steps",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW RISK"),
            Self::High => write!(f, "HIGH RISK"),
        }
    }
}

/// Outcome of one successful prediction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub risk: RiskCategory,

    /// Model confidence score (0.0 to 1.0)
    pub confidence: f64,

    /// Advisory text from the endpoint
    pub message: String,

    /// Explicit percentage, when the endpoint supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_percentage: Option<u8>,

    /// When the result arrived (local only)
    #[serde(skip, default = "chrono::Utc::now")]
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl PredictionResult {
    /// Build a result the way the endpoint does for a bare confidence score.
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        let risk = RiskCategory::from_confidence(confidence);
        Self {
            risk,
            confidence,
            message: risk.message().to_string(),
            risk_percentage: Some(percentage_of(confidence)),
            received_at: chrono::Utc::now(),
        }
    }

    /// Risk percentage, derived from confidence when not supplied.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.risk_percentage
            .unwrap_or_else(|| percentage_of(self.confidence))
    }
}

/// `round(confidence * 100)`, clamped to `0..=100`.
#[must_use]
pub fn percentage_of(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}
