//! # Domain Module
//!
//! Business rules for tracking child nutrition, independent of HTTP and of
//! the storage backend.
//!
//! ## Module Organization
//!
//! - **bmi**: BMI calculation and age-bracketed classification
//! - **recipe_catalog**: built-in recipes and the per-category recommendation filter
//! - **child_service**: child registration, updates and BMI history
//! - **acceptance_service**: append-only meal acceptance logging
//! - **report_service**: aggregations for the reports page
//! - **language_service**: UI language preference
//! - **export_service**: CSV rendering and export sinks
//! - **meal_planner**: merges live recipe data with catalog recommendations
//!
//! ## Business Rules
//!
//! - BMI is rounded to one decimal place before it is classified
//! - Children aged five and under use a separate threshold table
//! - BMI records and acceptance logs are never edited once written
//! - Deleting a child leaves their history in place

pub mod acceptance_service;
pub mod bmi;
pub mod child_service;
pub mod export_service;
pub mod language_service;
pub mod meal_planner;
pub mod recipe_catalog;
pub mod report_service;

pub use acceptance_service::AcceptanceService;
pub use child_service::ChildService;
pub use export_service::{CsvExport, ExportService, ExportSink};
pub use language_service::LanguageService;
pub use meal_planner::{MealPlanner, RecipeSource};
pub use recipe_catalog::RecipeFilter;
pub use report_service::ReportService;
