//! Health form data for cardiovascular risk prediction.
//!
//! Thirteen clinical parameters following the UCI Heart Disease (Cleveland)
//! feature set.

use serde::{Deserialize, Serialize};

/// A closed set of categorical answers with a stable wire key.
pub trait Choice: Copy + PartialEq + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    /// Key sent over the wire and used by the encoder tables.
    fn key(self) -> &'static str;

    /// Human-readable label for the form.
    fn label(self) -> &'static str;

    /// Look a variant up by its wire key.
    #[must_use]
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Choice for Sex {
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn key(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Chest pain type (`cp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl Choice for ChestPainType {
    const ALL: &'static [Self] = &[
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginalPain,
        Self::Asymptomatic,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::TypicalAngina => "typical_angina",
            Self::AtypicalAngina => "atypical_angina",
            Self::NonAnginalPain => "non_anginal_pain",
            Self::Asymptomatic => "asymptomatic",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical angina",
            Self::AtypicalAngina => "Atypical angina",
            Self::NonAnginalPain => "Non-anginal pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }
}

/// Resting electrocardiographic result (`restecg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestingEcg {
    Normal,
    StTAbnormal,
    LvHypertrophy,
}

impl Choice for RestingEcg {
    const ALL: &'static [Self] = &[Self::Normal, Self::StTAbnormal, Self::LvHypertrophy];

    fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::StTAbnormal => "st_t_abnormal",
            Self::LvHypertrophy => "lv_hypertrophy",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::StTAbnormal => "ST-T wave abnormality",
            Self::LvHypertrophy => "LV hypertrophy",
        }
    }
}

/// Slope of the peak exercise ST segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slope {
    Upsloping,
    Flat,
    Downsloping,
}

impl Choice for Slope {
    const ALL: &'static [Self] = &[Self::Upsloping, Self::Flat, Self::Downsloping];

    fn key(self) -> &'static str {
        match self {
            Self::Upsloping => "upsloping",
            Self::Flat => "flat",
            Self::Downsloping => "downsloping",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Upsloping => "Upsloping",
            Self::Flat => "Flat",
            Self::Downsloping => "Downsloping",
        }
    }
}

/// Thalassemia test result (`thal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thalassemia {
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl Choice for Thalassemia {
    const ALL: &'static [Self] = &[Self::Normal, Self::FixedDefect, Self::ReversibleDefect];

    fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::FixedDefect => "fixed_defect",
            Self::ReversibleDefect => "reversible_defect",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::FixedDefect => "Fixed defect",
            Self::ReversibleDefect => "Reversible defect",
        }
    }
}

/// Raw form input as entered by the user.
///
/// Numeric fields use `0` for "not entered"; categorical fields use `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthFormData {
    /// Age in years (1-120)
    pub age: u32,

    pub sex: Option<Sex>,

    pub chest_pain_type: Option<ChestPainType>,

    /// Resting blood pressure in mmHg (50-300)
    #[serde(rename = "restingBP")]
    pub resting_bp: u32,

    /// Serum cholesterol in mg/dL (100-600)
    pub cholesterol: u32,

    /// Fasting blood sugar > 120 mg/dL
    #[serde(rename = "fastingBS")]
    pub fasting_bs: bool,

    #[serde(rename = "restingECG")]
    pub resting_ecg: Option<RestingEcg>,

    /// Maximum heart rate achieved during exercise (60-220)
    pub max_heart_rate: u32,

    /// Exercise-induced angina
    pub exercise_angina: bool,

    /// ST depression induced by exercise relative to rest (0-10)
    pub st_depression: f64,

    pub slope: Option<Slope>,

    /// Major vessels colored by fluoroscopy (0-3)
    pub major_vessels: Option<u8>,

    pub thalassemia: Option<Thalassemia>,
}

impl Default for HealthFormData {
    fn default() -> Self {
        Self {
            age: 0,
            sex: None,
            chest_pain_type: None,
            resting_bp: 0,
            cholesterol: 0,
            fasting_bs: false,
            resting_ecg: None,
            max_heart_rate: 0,
            exercise_angina: false,
            st_depression: 0.0,
            slope: None,
            major_vessels: None,
            thalassemia: None,
        }
    }
}

impl HealthFormData {
    /// Whether every field is set and within range.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        super::validation::validate(self).is_empty()
    }

    /// Sample patient used for demos and tests.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: 45,
            sex: Some(Sex::Male),
            chest_pain_type: Some(ChestPainType::TypicalAngina),
            resting_bp: 120,
            cholesterol: 200,
            fasting_bs: false,
            resting_ecg: Some(RestingEcg::Normal),
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 1.0,
            slope: Some(Slope::Flat),
            major_vessels: Some(0),
            thalassemia: Some(Thalassemia::Normal),
        }
    }
}
