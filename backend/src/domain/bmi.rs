//! BMI calculation and age-bracketed classification.

use shared::BmiCategory;

use crate::error::{AppError, AppResult};

/// Children at or below this age use the younger threshold table
pub const YOUNG_CHILD_MAX_AGE: u32 = 5;

/// Lower bounds of the underweight, normal and overweight bands
struct Thresholds {
    underweight: f64,
    normal: f64,
    overweight: f64,
}

const UNDER_SIX: Thresholds = Thresholds {
    underweight: 13.0,
    normal: 14.5,
    overweight: 18.0,
};

const SIX_AND_OVER: Thresholds = Thresholds {
    underweight: 13.5,
    normal: 15.0,
    overweight: 22.0,
};

/// Body-mass index rounded half-up to one decimal place.
///
/// Inputs are assumed positive; use [`Measurement::new`] to validate form input first.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_one_decimal(weight_kg / (height_m * height_m))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify a BMI value. Bands are half-open `[lo, hi)` with the top band open-ended.
pub fn get_bmi_category(bmi: f64, age: u32) -> BmiCategory {
    let t = if age <= YOUNG_CHILD_MAX_AGE {
        &UNDER_SIX
    } else {
        &SIX_AND_OVER
    };

    if bmi < t.underweight {
        BmiCategory::SeverelyUnderweight
    } else if bmi < t.normal {
        BmiCategory::Underweight
    } else if bmi < t.overweight {
        BmiCategory::Normal
    } else {
        BmiCategory::Overweight
    }
}

/// A validated height/weight/age triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age: u32,
}

impl Measurement {
    pub fn new(height_cm: f64, weight_kg: f64, age: u32) -> AppResult<Self> {
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(AppError::InvalidMeasurement(format!(
                "height must be a positive number of centimetres, got {}",
                height_cm
            )));
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(AppError::InvalidMeasurement(format!(
                "weight must be a positive number of kilograms, got {}",
                weight_kg
            )));
        }

        Ok(Self {
            height_cm,
            weight_kg,
            age,
        })
    }

    pub fn bmi(&self) -> f64 {
        calculate_bmi(self.height_cm, self.weight_kg)
    }

    /// BMI and its category for this measurement
    pub fn classify(&self) -> (f64, BmiCategory) {
        let bmi = self.bmi();
        (bmi, get_bmi_category(bmi, self.age))
    }
}
