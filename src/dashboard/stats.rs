//! Body statistics derived from the household profile. Nothing here is stored.

use serde::Serialize;

use crate::profile::UserProfile;

const DEFAULT_HEIGHT_CM: f64 = 170.0;
const DEFAULT_WEIGHT_KG: f64 = 60.0;
const DEFAULT_AGE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    Moderate,
    Heavy,
}

impl ActivityLevel {
    /// Matched on the free-text activity: "berat" is heavy, "ringan" light,
    /// anything else moderate.
    pub fn from_description(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("berat") {
            Self::Heavy
        } else if text.contains("ringan") {
            Self::Light
        } else {
            Self::Moderate
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Heavy => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyStats {
    /// One decimal.
    pub bmi: f64,
    /// kcal per day.
    pub calories: u32,
    pub activity: ActivityLevel,
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let m = height_cm / 100.0;
    round1(weight_kg / (m * m))
}

pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    66.0 + 13.7 * weight_kg + 5.0 * height_cm - 6.8 * age
}

pub fn daily_calories(weight_kg: f64, height_cm: f64, age: f64, activity: ActivityLevel) -> u32 {
    (basal_metabolic_rate(weight_kg, height_cm, age) * activity.factor())
        .round()
        .max(0.0) as u32
}

impl BodyStats {
    /// Zero or missing measurements fall back to 170 cm, 60 kg, 20 years.
    pub fn from_profile(profile: &UserProfile) -> Self {
        let f = &profile.fields;
        let or = |v: f64, fallback: f64| if v > 0.0 { v } else { fallback };
        let height = or(f.height, DEFAULT_HEIGHT_CM);
        let weight = or(f.weight, DEFAULT_WEIGHT_KG);
        let age = or(f64::from(f.ages), DEFAULT_AGE);
        let activity = ActivityLevel::from_description(&f.dailyactivities);
        Self {
            bmi: bmi(weight, height),
            calories: daily_calories(weight, height, age, activity),
            activity,
        }
    }

    /// Stats shown before any profile exists.
    pub fn empty() -> Self {
        Self {
            bmi: 0.0,
            calories: 0,
            activity: ActivityLevel::Moderate,
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
