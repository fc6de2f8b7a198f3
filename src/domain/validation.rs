//! Form validation rules.
//!
//! Produces the set of invalid fields; an empty set means the form may be
//! submitted.

use std::collections::BTreeSet;
use std::fmt;

use super::form::HealthFormData;

/// Identifier for each of the thirteen form fields, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Age,
    Sex,
    ChestPainType,
    RestingBp,
    Cholesterol,
    FastingBs,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    Slope,
    MajorVessels,
    Thalassemia,
}

impl FormField {
    pub const ALL: [FormField; 13] = [
        Self::Age,
        Self::Sex,
        Self::ChestPainType,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBs,
        Self::RestingEcg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::Slope,
        Self::MajorVessels,
        Self::Thalassemia,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPainType => "Chest Pain Type",
            Self::RestingBp => "Resting BP",
            Self::Cholesterol => "Cholesterol",
            Self::FastingBs => "Fasting Blood Sugar > 120",
            Self::RestingEcg => "Resting ECG",
            Self::MaxHeartRate => "Max Heart Rate",
            Self::ExerciseAngina => "Exercise Angina",
            Self::StDepression => "ST Depression",
            Self::Slope => "ST Slope",
            Self::MajorVessels => "Major Vessels",
            Self::Thalassemia => "Thalassemia",
        }
    }

    /// Input hint shown when the field is empty.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Age => "years (1-120)",
            Self::RestingBp => "mmHg (50-300)",
            Self::Cholesterol => "mg/dL (100-600)",
            Self::MaxHeartRate => "bpm (60-220)",
            Self::StDepression => "mm (0-10)",
            Self::MajorVessels => "fluoroscopy count (0-3)",
            Self::FastingBs | Self::ExerciseAngina => "yes / no",
            Self::Sex | Self::ChestPainType | Self::RestingEcg | Self::Slope | Self::Thalassemia => {
                "select"
            }
        }
    }

    /// Inline error text for an invalid value.
    #[must_use]
    pub fn error_text(self) -> &'static str {
        match self {
            Self::Age => "Enter an age between 1 and 120",
            Self::RestingBp => "Enter a blood pressure between 50 and 300",
            Self::Cholesterol => "Enter a cholesterol between 100 and 600",
            Self::MaxHeartRate => "Enter a heart rate between 60 and 220",
            Self::StDepression => "Enter an ST depression between 0 and 10",
            Self::MajorVessels => "Select 0 to 3 vessels",
            _ => "Select a value",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered set of invalid fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeSet<FormField>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }

    pub fn insert(&mut self, field: FormField) {
        self.fields.insert(field);
    }

    /// Drop the error mark for a field (the user started editing it).
    pub fn clear_field(&mut self, field: FormField) {
        self.fields.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = FormField> + '_ {
        self.fields.iter().copied()
    }
}

fn in_range(value: u32, min: u32, max: u32) -> bool {
    value > 0 && (min..=max).contains(&value)
}

/// Check every field of the form against its rule.
#[must_use]
pub fn validate(data: &HealthFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if !in_range(data.age, 1, 120) {
        errors.insert(FormField::Age);
    }
    if data.sex.is_none() {
        errors.insert(FormField::Sex);
    }
    if data.chest_pain_type.is_none() {
        errors.insert(FormField::ChestPainType);
    }
    if !in_range(data.resting_bp, 50, 300) {
        errors.insert(FormField::RestingBp);
    }
    if !in_range(data.cholesterol, 100, 600) {
        errors.insert(FormField::Cholesterol);
    }
    if data.resting_ecg.is_none() {
        errors.insert(FormField::RestingEcg);
    }
    if !in_range(data.max_heart_rate, 60, 220) {
        errors.insert(FormField::MaxHeartRate);
    }
    // NaN fails the range check.
    if !(0.0..=10.0).contains(&data.st_depression) {
        errors.insert(FormField::StDepression);
    }
    if data.slope.is_none() {
        errors.insert(FormField::Slope);
    }
    if !matches!(data.major_vessels, Some(0..=3)) {
        errors.insert(FormField::MajorVessels);
    }
    if data.thalassemia.is_none() {
        errors.insert(FormField::Thalassemia);
    }

    errors
}
