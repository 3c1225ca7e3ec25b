//! Aggregations behind the reports page.

use chrono::{Duration, NaiveDate, Utc};
use shared::{
    AcceptanceLog, AcceptanceStatus, BmiCategory, CategoryCount, Child, DailyAcceptance, MealType,
    MealTypeBreakdown, ReportSummary, StatusCount, TopMeal,
};
use std::collections::HashMap;
use tracing::info;

use crate::storage::{Collection, RecordStore};

/// Meals need at least this many observations to be ranked
pub const MIN_OBSERVATIONS_FOR_RANKING: usize = 2;
pub const TOP_MEALS_LIMIT: usize = 3;
pub const TREND_DAYS: i64 = 7;

#[derive(Clone)]
pub struct ReportService {
    store: RecordStore,
}

impl ReportService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Summary with the trend ending on the current UTC date
    pub async fn summary_now(&self) -> ReportSummary {
        self.summary(Utc::now().date_naive()).await
    }

    pub async fn summary(&self, today: NaiveDate) -> ReportSummary {
        let children: Vec<Child> = self.store.get_all(Collection::Children).await;
        let logs: Vec<AcceptanceLog> = self.store.get_all(Collection::AcceptanceLogs).await;
        info!(
            "Building report from {} children and {} acceptance logs",
            children.len(),
            logs.len()
        );

        ReportSummary {
            total_children: children.len(),
            category_distribution: category_distribution(&children),
            status_breakdown: status_breakdown(&logs),
            meal_type_breakdown: meal_type_breakdown(&logs),
            top_meals: top_meals(&logs),
            weekly_trend: weekly_trend(&logs, today),
        }
    }
}

pub fn category_distribution(children: &[Child]) -> Vec<CategoryCount> {
    BmiCategory::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            label: category.label().to_string(),
            count: children.iter().filter(|c| c.bmi_category == category).count(),
        })
        .collect()
}

pub fn status_breakdown(logs: &[AcceptanceLog]) -> Vec<StatusCount> {
    AcceptanceStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            label: status.label().to_string(),
            count: logs.iter().filter(|l| l.status == status).count(),
        })
        .collect()
}

pub fn meal_type_breakdown(logs: &[AcceptanceLog]) -> Vec<MealTypeBreakdown> {
    MealType::ALL
        .iter()
        .map(|&meal_type| {
            let count = |status: AcceptanceStatus| {
                logs.iter()
                    .filter(|l| l.meal_type == meal_type && l.status == status)
                    .count()
            };
            MealTypeBreakdown {
                meal_type,
                name: meal_type.display_name().to_string(),
                accepted: count(AcceptanceStatus::FullyEaten),
                partial: count(AcceptanceStatus::PartiallyEaten),
                wasted: count(AcceptanceStatus::MostlyWasted),
            }
        })
        .collect()
}

/// Recipes with the highest share of fully-eaten observations.
///
/// Ties keep the order in which recipes were first logged. The name shown is
/// the one recorded on the first log for that recipe.
pub fn top_meals(logs: &[AcceptanceLog]) -> Vec<TopMeal> {
    struct Tally<'a> {
        recipe_id: &'a str,
        name: &'a str,
        total: usize,
        accepted: usize,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<Tally> = Vec::new();

    for log in logs {
        let slot = *index.entry(log.recipe_id.as_str()).or_insert_with(|| {
            tallies.push(Tally {
                recipe_id: &log.recipe_id,
                name: &log.recipe_name,
                total: 0,
                accepted: 0,
            });
            tallies.len() - 1
        });
        let tally = &mut tallies[slot];
        tally.total += 1;
        if log.status == AcceptanceStatus::FullyEaten {
            tally.accepted += 1;
        }
    }

    let mut ranked: Vec<TopMeal> = tallies
        .into_iter()
        .filter(|t| t.total >= MIN_OBSERVATIONS_FOR_RANKING)
        .map(|t| TopMeal {
            recipe_id: t.recipe_id.to_string(),
            name: t.name.to_string(),
            rate: (t.accepted as f64 / t.total as f64 * 100.0).round() as u32,
            total: t.total,
        })
        .collect();

    ranked.sort_by(|a, b| b.rate.cmp(&a.rate));
    ranked.truncate(TOP_MEALS_LIMIT);
    ranked
}

/// One entry per day for the week ending on `today`, oldest first
pub fn weekly_trend(logs: &[AcceptanceLog], today: NaiveDate) -> Vec<DailyAcceptance> {
    (0..TREND_DAYS)
        .rev()
        .map(|days_ago| {
            let day = today - Duration::days(days_ago);
            let prefix = day.format("%Y-%m-%d").to_string();
            let day_logs: Vec<&AcceptanceLog> =
                logs.iter().filter(|l| l.date.starts_with(&prefix)).collect();

            DailyAcceptance {
                day: day.format("%a").to_string(),
                total: day_logs.len(),
                accepted: day_logs
                    .iter()
                    .filter(|l| l.status == AcceptanceStatus::FullyEaten)
                    .count(),
                date: prefix,
            }
        })
        .collect()
}
