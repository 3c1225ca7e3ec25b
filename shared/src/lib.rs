use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender recorded on a child's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// BMI band for a child. Thresholds depend on the child's age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    SeverelyUnderweight,
    Underweight,
    Normal,
    Overweight,
}

impl BmiCategory {
    /// All categories, most severe first
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::SeverelyUnderweight,
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
    ];

    /// Stable wire name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::SeverelyUnderweight => "severely_underweight",
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Human-readable label with a traffic-light marker
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::SeverelyUnderweight => "🔴 Severely Underweight",
            BmiCategory::Underweight => "🟡 Underweight",
            BmiCategory::Normal => "🟢 Normal",
            BmiCategory::Overweight => "🟠 Overweight",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child registered at a center, with their latest anthropometric snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    /// Age in whole years
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Derived from height and weight, one decimal place
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// Point-in-time measurement. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRecord {
    pub id: String,
    /// Child this measurement was taken for (not enforced)
    pub child_id: String,
    pub date: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

/// How much of a served meal the child ate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceStatus {
    FullyEaten,
    PartiallyEaten,
    MostlyWasted,
}

impl AcceptanceStatus {
    pub const ALL: [AcceptanceStatus; 3] = [
        AcceptanceStatus::FullyEaten,
        AcceptanceStatus::PartiallyEaten,
        AcceptanceStatus::MostlyWasted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AcceptanceStatus::FullyEaten => "✅ Fully Eaten",
            AcceptanceStatus::PartiallyEaten => "⚠️ Partial",
            AcceptanceStatus::MostlyWasted => "❌ Wasted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Snack];

    /// Capitalized display name ("Breakfast", "Lunch", "Snack")
    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Snack => "Snack",
        }
    }
}

/// A single meal-consumption observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceLog {
    pub id: String,
    pub child_id: String,
    pub recipe_id: String,
    /// Copy of the recipe name at logging time
    pub recipe_name: String,
    pub date: String,
    pub status: AcceptanceStatus,
    pub meal_type: MealType,
}

/// Canonical recipe shape used by the recommendation filter and the recipe API adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub iron: f64,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cuisine: String,
    pub category: String,
    pub nutrition_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_serving: Option<f64>,
    pub is_iron_rich: bool,
    pub is_seasonal: bool,
}

/// UI language preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            _ => None,
        }
    }

    /// The other supported language
    pub fn toggled(&self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }
}

/// Request for registering a new child
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Request for updating an existing child. Every save is recorded in the BMI history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChildRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Response after creating or updating a child
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
}

/// Response containing a list of children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChildListResponse {
    pub children: Vec<Child>,
}

/// BMI measurements for one child, oldest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BmiHistoryResponse {
    pub child_id: String,
    pub records: Vec<BmiRecord>,
}

/// Request for logging a meal observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogMealRequest {
    pub child_id: String,
    pub recipe_id: String,
    /// Required when the recipe is not part of the built-in catalog
    pub recipe_name: Option<String>,
    pub status: AcceptanceStatus,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceLogListResponse {
    pub logs: Vec<AcceptanceLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
}

/// Number of children in one BMI category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: BmiCategory,
    pub label: String,
    pub count: usize,
}

/// Number of observations with one acceptance status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: AcceptanceStatus,
    pub label: String,
    pub count: usize,
}

/// Acceptance outcome counts for one meal type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeBreakdown {
    pub meal_type: MealType,
    pub name: String,
    pub accepted: usize,
    pub partial: usize,
    pub wasted: usize,
}

/// A recipe ranked by how often it was fully eaten
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopMeal {
    pub recipe_id: String,
    pub name: String,
    /// Whole-number percentage of observations that were fully eaten
    pub rate: u32,
    pub total: usize,
}

/// Observations on a single calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyAcceptance {
    pub date: String, // YYYY-MM-DD
    pub day: String,  // short weekday name
    pub total: usize,
    pub accepted: usize,
}

/// Aggregated figures for the reports page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_children: usize,
    pub category_distribution: Vec<CategoryCount>,
    pub status_breakdown: Vec<StatusCount>,
    pub meal_type_breakdown: Vec<MealTypeBreakdown>,
    pub top_meals: Vec<TopMeal>,
    pub weekly_trend: Vec<DailyAcceptance>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetLanguageRequest {
    pub language: Language,
}

/// Request for writing a collection export into the server's export directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportToPathRequest {
    /// Base file name without extension; defaults to the collection's report name
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub record_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_category_wire_names_round_trip() {
        for category in BmiCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(BmiCategory::from_name(category.as_str()), Some(category));
        }
        assert_eq!(BmiCategory::from_name("obese"), None);
    }

    #[test]
    fn test_child_serializes_with_camel_case_fields() {
        let child = Child {
            id: "c1".to_string(),
            name: "Asha".to_string(),
            age: 4,
            gender: Gender::Female,
            height_cm: 100.0,
            weight_kg: 16.0,
            bmi: 16.0,
            bmi_category: BmiCategory::Normal,
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
            updated_at: "2025-01-01T00:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&child).unwrap();
        assert_eq!(value["heightCm"], 100.0);
        assert_eq!(value["bmiCategory"], "normal");
        assert_eq!(value["gender"], "female");
    }

    #[test]
    fn test_acceptance_log_enums_use_snake_case() {
        let json = r#"{"id":"l1","childId":"c1","recipeId":"1","recipeName":"Poha",
            "date":"2025-01-01T08:00:00Z","status":"partially_eaten","mealType":"breakfast"}"#;
        let log: AcceptanceLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.status, AcceptanceStatus::PartiallyEaten);
        assert_eq!(log.meal_type, MealType::Breakfast);
    }

    #[test]
    fn test_api_payloads_share_the_record_field_names() {
        let request: CreateChildRequest = serde_json::from_str(
            r#"{"name":"Asha","age":4,"gender":"female","heightCm":100.0,"weightKg":16.0}"#,
        )
        .unwrap();
        assert_eq!(request.height_cm, 100.0);

        let export = ExportToPathResponse {
            success: true,
            message: "ok".to_string(),
            file_path: "exports/a.csv".to_string(),
            record_count: 1,
        };
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["filePath"], "exports/a.csv");
        assert_eq!(value["recordCount"], 1);
    }

    #[test]
    fn test_language_toggle() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::En.toggled(), Language::Hi);
        assert_eq!(Language::Hi.toggled(), Language::En);
        assert_eq!(Language::from_code("hi"), Some(Language::Hi));
        assert_eq!(Language::from_code("fr"), None);
    }
}
