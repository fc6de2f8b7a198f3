//! Field encoder: maps form answers to the integer codes of the prediction
//! endpoint.
//!
//! Every mapping is total. Unknown or empty keys encode as `0`, i.e. the
//! first category of the table.

use serde::{Deserialize, Serialize};

use super::form::{Choice, HealthFormData, Sex};

/// Lookup table from wire key to endpoint code.
pub type CodeTable = &'static [(&'static str, u8)];

pub const CHEST_PAIN_CODES: CodeTable = &[
    ("typical_angina", 0),
    ("atypical_angina", 1),
    ("non_anginal_pain", 2),
    ("asymptomatic", 3),
];

pub const RESTING_ECG_CODES: CodeTable = &[
    ("normal", 0),
    ("st_t_abnormal", 1),
    ("lv_hypertrophy", 2),
];

pub const SLOPE_CODES: CodeTable = &[("upsloping", 0), ("flat", 1), ("downsloping", 2)];

pub const THALASSEMIA_CODES: CodeTable = &[
    ("normal", 0),
    ("fixed_defect", 1),
    ("reversible_defect", 2),
];

/// Look a key up in a code table, defaulting to `0`.
#[must_use]
pub fn encode_key(table: CodeTable, key: &str) -> u8 {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(0, |(_, code)| *code)
}

#[must_use]
pub fn encode_sex(key: &str) -> u8 {
    u8::from(key == Sex::Male.key())
}

#[must_use]
pub fn encode_flag(value: bool) -> u8 {
    u8::from(value)
}

fn encode_choice<C: Choice>(table: CodeTable, value: Option<C>) -> u8 {
    encode_key(table, value.map_or("", C::key))
}

/// Request body expected by the prediction endpoint.
///
/// Field names follow the UCI Heart Disease column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub age: u32,
    pub sex: u8,
    pub cp: u8,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: u8,
    pub restecg: u8,
    pub thalach: u32,
    pub exang: u8,
    pub oldpeak: f64,
    pub slope: u8,
    pub ca: u8,
    pub thal: u8,
}

impl PredictionPayload {
    /// Encode a form into the endpoint payload. Never fails.
    #[must_use]
    pub fn from_form(form: &HealthFormData) -> Self {
        Self {
            age: form.age,
            sex: encode_sex(form.sex.map_or("", Sex::key)),
            cp: encode_choice(CHEST_PAIN_CODES, form.chest_pain_type),
            trestbps: form.resting_bp,
            chol: form.cholesterol,
            fbs: encode_flag(form.fasting_bs),
            restecg: encode_choice(RESTING_ECG_CODES, form.resting_ecg),
            thalach: form.max_heart_rate,
            exang: encode_flag(form.exercise_angina),
            oldpeak: form.st_depression,
            slope: encode_choice(SLOPE_CODES, form.slope),
            ca: form.major_vessels.unwrap_or(0),
            thal: encode_choice(THALASSEMIA_CODES, form.thalassemia),
        }
    }
}

impl From<&HealthFormData> for PredictionPayload {
    fn from(form: &HealthFormData) -> Self {
        Self::from_form(form)
    }
}
