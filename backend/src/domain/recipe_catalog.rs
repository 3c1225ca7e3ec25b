//! Built-in recipe catalog and BMI-driven recommendation filter.
//!
//! Each category selects recipes with its own predicate and sort key.
//! Sorting is stable, so ties keep catalog order.

use shared::{BmiCategory, Recipe};
use std::cmp::Ordering;
use std::sync::OnceLock;

#[allow(clippy::too_many_arguments)]
fn recipe(
    id: &str,
    name: &str,
    (calories, protein, fat, carbs, fiber, iron): (f64, f64, f64, f64, f64, f64),
    ingredients: &[&str],
    instructions: &[&str],
    category: &str,
    nutrition_score: f64,
    cost_per_serving: f64,
    is_iron_rich: bool,
) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        calories,
        protein,
        fat,
        carbs,
        fiber,
        iron,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        cuisine: "Indian".to_string(),
        category: category.to_string(),
        nutrition_score,
        cost_per_serving: Some(cost_per_serving),
        is_iron_rich,
        is_seasonal: true,
    }
}

/// The fixed in-memory catalog, in display order
pub fn catalog() -> &'static [Recipe] {
    static CATALOG: OnceLock<Vec<Recipe>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            recipe(
                "1",
                "Dal Tadka with Rice",
                (450.0, 18.0, 12.0, 65.0, 8.0, 4.5),
                &["Toor dal", "Rice", "Ghee", "Cumin", "Turmeric", "Tomato", "Onion"],
                &[
                    "Wash and pressure cook dal for 3 whistles",
                    "Cook rice separately",
                    "Prepare tadka with ghee, cumin, garlic",
                    "Pour tadka over dal and serve with rice",
                ],
                "Main Course",
                82.0,
                25.0,
                true,
            ),
            recipe(
                "2",
                "Paneer Paratha",
                (380.0, 15.0, 18.0, 42.0, 4.0, 2.1),
                &["Whole wheat flour", "Paneer", "Green chili", "Coriander", "Salt"],
                &[
                    "Knead soft dough",
                    "Prepare paneer filling with spices",
                    "Stuff and roll parathas",
                    "Cook on tawa with ghee",
                ],
                "Breakfast",
                75.0,
                30.0,
                false,
            ),
            recipe(
                "3",
                "Egg Bhurji with Roti",
                (420.0, 22.0, 20.0, 38.0, 5.0, 3.8),
                &["Eggs", "Whole wheat roti", "Onion", "Tomato", "Green chili", "Turmeric"],
                &[
                    "Heat oil and sauté onions",
                    "Add tomatoes and spices",
                    "Scramble eggs until cooked",
                    "Serve hot with roti",
                ],
                "Main Course",
                85.0,
                20.0,
                true,
            ),
            recipe(
                "4",
                "Rajma Chawal",
                (480.0, 20.0, 8.0, 78.0, 12.0, 5.2),
                &["Kidney beans", "Rice", "Onion", "Tomato", "Ginger", "Garlic", "Spices"],
                &[
                    "Soak rajma overnight",
                    "Pressure cook until soft",
                    "Prepare masala gravy",
                    "Simmer rajma in gravy and serve with rice",
                ],
                "Main Course",
                88.0,
                22.0,
                true,
            ),
            recipe(
                "5",
                "Poha",
                (280.0, 6.0, 8.0, 48.0, 3.0, 3.0),
                &["Flattened rice", "Peanuts", "Onion", "Curry leaves", "Turmeric", "Lemon"],
                &[
                    "Wash and drain poha",
                    "Roast peanuts",
                    "Sauté onion and curry leaves",
                    "Add poha and mix well",
                    "Squeeze lemon and serve",
                ],
                "Breakfast",
                68.0,
                12.0,
                true,
            ),
            recipe(
                "6",
                "Khichdi",
                (320.0, 14.0, 6.0, 55.0, 7.0, 3.5),
                &["Moong dal", "Rice", "Ghee", "Cumin", "Turmeric", "Vegetables"],
                &[
                    "Wash rice and dal together",
                    "Add vegetables and spices",
                    "Pressure cook for 4 whistles",
                    "Add ghee and serve hot",
                ],
                "Main Course",
                80.0,
                15.0,
                true,
            ),
            recipe(
                "7",
                "Vegetable Upma",
                (260.0, 8.0, 10.0, 38.0, 5.0, 2.0),
                &["Semolina", "Mixed vegetables", "Mustard seeds", "Curry leaves", "Cashews"],
                &[
                    "Roast semolina until golden",
                    "Sauté vegetables with mustard seeds",
                    "Add water and semolina",
                    "Cook until fluffy",
                ],
                "Breakfast",
                72.0,
                14.0,
                false,
            ),
            recipe(
                "8",
                "Chole with Puri",
                (520.0, 16.0, 22.0, 68.0, 10.0, 4.8),
                &["Chickpeas", "Whole wheat flour", "Onion", "Tomato", "Chole masala", "Oil"],
                &[
                    "Soak chickpeas overnight and cook",
                    "Prepare spicy gravy",
                    "Simmer chickpeas in gravy",
                    "Make puris and deep fry",
                    "Serve hot together",
                ],
                "Main Course",
                78.0,
                28.0,
                true,
            ),
            recipe(
                "9",
                "Banana Sheera",
                (300.0, 5.0, 10.0, 50.0, 2.0, 1.0),
                &["Semolina", "Banana", "Milk", "Sugar", "Ghee", "Cardamom"],
                &[
                    "Roast semolina in ghee",
                    "Mash banana and add",
                    "Pour milk and sugar",
                    "Cook until thick",
                    "Garnish with cardamom",
                ],
                "Snack",
                55.0,
                18.0,
                false,
            ),
            recipe(
                "10",
                "Palak Dal",
                (350.0, 16.0, 8.0, 52.0, 9.0, 6.0),
                &["Spinach", "Moong dal", "Garlic", "Cumin", "Turmeric", "Ghee"],
                &[
                    "Cook dal until soft",
                    "Blanch and puree spinach",
                    "Mix spinach into dal",
                    "Prepare tadka with garlic and cumin",
                    "Serve with rice or roti",
                ],
                "Main Course",
                90.0,
                20.0,
                true,
            ),
        ]
    })
}

/// Look up a catalog recipe by id
pub fn find_recipe(id: &str) -> Option<&'static Recipe> {
    catalog().iter().find(|r| r.id == id)
}

/// Whether `recipe` is suitable for a child in `category`
pub fn matches_category(recipe: &Recipe, category: BmiCategory) -> bool {
    match category {
        BmiCategory::SeverelyUnderweight => recipe.protein >= 15.0 && recipe.calories >= 400.0,
        BmiCategory::Underweight => recipe.protein >= 14.0,
        BmiCategory::Normal => recipe.nutrition_score >= 70.0,
        BmiCategory::Overweight => recipe.calories <= 350.0,
    }
}

fn compare_for_category(a: &Recipe, b: &Recipe, category: BmiCategory) -> Ordering {
    match category {
        BmiCategory::SeverelyUnderweight => b.calories.total_cmp(&a.calories),
        BmiCategory::Underweight => b.protein.total_cmp(&a.protein),
        BmiCategory::Normal => b.nutrition_score.total_cmp(&a.nutrition_score),
        BmiCategory::Overweight => a.calories.total_cmp(&b.calories),
    }
}

/// Apply a category's predicate and ordering to any list of recipes
pub fn rank_for_category(recipes: &[Recipe], category: BmiCategory) -> Vec<Recipe> {
    let mut selected: Vec<Recipe> = recipes
        .iter()
        .filter(|r| matches_category(r, category))
        .cloned()
        .collect();
    // sort_by is stable: equal keys keep their input order
    selected.sort_by(|a, b| compare_for_category(a, b, category));
    selected
}

/// Catalog recipes recommended for a BMI category
pub fn get_recipes_for_category(category: BmiCategory) -> Vec<Recipe> {
    rank_for_category(catalog(), category)
}

/// Same as [`get_recipes_for_category`], keyed by wire name.
/// An unrecognised name returns the whole catalog in catalog order.
pub fn get_recipes_for_category_name(name: &str) -> Vec<Recipe> {
    match BmiCategory::from_name(name) {
        Some(category) => get_recipes_for_category(category),
        None => catalog().to_vec(),
    }
}

/// Extra conjunctive filters applied on top of a ranked list. Never reorders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub cuisine: Option<String>,
    pub category: Option<String>,
    /// Recipes without a known cost are excluded when a budget is set
    pub max_budget: Option<f64>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let cuisine_ok = self
            .cuisine
            .as_deref()
            .map_or(true, |c| recipe.cuisine.eq_ignore_ascii_case(c));
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| recipe.category.eq_ignore_ascii_case(c));
        let budget_ok = self.max_budget.map_or(true, |budget| {
            recipe.cost_per_serving.map_or(false, |cost| cost <= budget)
        });

        cuisine_ok && category_ok && budget_ok
    }

    pub fn apply(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_catalog_has_ten_recipes() {
        assert_eq!(catalog().len(), 10);
        assert_eq!(find_recipe("5").map(|r| r.name.as_str()), Some("Poha"));
        assert!(find_recipe("99").is_none());
    }

    #[test]
    fn test_severely_underweight_selection() {
        let recipes = get_recipes_for_category(BmiCategory::SeverelyUnderweight);
        // protein >= 15 and calories >= 400, calories descending
        assert_eq!(ids(&recipes), vec!["8", "4", "1", "3"]);
    }

    #[test]
    fn test_underweight_selection_keeps_ties_in_catalog_order() {
        let recipes = get_recipes_for_category(BmiCategory::Underweight);
        // Paneer Paratha has 15g; Chole and Palak Dal tie at 16g
        assert_eq!(ids(&recipes), vec!["3", "4", "1", "8", "10", "2", "6"]);
    }

    #[test]
    fn test_normal_selection() {
        let recipes = get_recipes_for_category(BmiCategory::Normal);
        assert_eq!(ids(&recipes), vec!["10", "4", "3", "1", "6", "8", "2", "7"]);
    }

    #[test]
    fn test_overweight_selection() {
        let recipes = get_recipes_for_category(BmiCategory::Overweight);
        assert_eq!(ids(&recipes), vec!["7", "5", "9", "6", "10"]);
    }

    #[test]
    fn test_every_category_respects_its_predicate_and_order() {
        for category in BmiCategory::ALL {
            let recipes = get_recipes_for_category(category);
            assert!(recipes.iter().all(|r| matches_category(r, category)));
            for pair in recipes.windows(2) {
                assert_ne!(
                    compare_for_category(&pair[0], &pair[1], category),
                    Ordering::Greater
                );
            }
        }
    }

    #[test]
    fn test_unknown_category_name_returns_full_catalog() {
        let recipes = get_recipes_for_category_name("obese");
        assert_eq!(recipes.len(), 10);
        assert_eq!(&ids(&recipes)[..3], &["1", "2", "3"]);

        let known = get_recipes_for_category_name("overweight");
        assert_eq!(known, get_recipes_for_category(BmiCategory::Overweight));
    }

    #[test]
    fn test_filter_preserves_order_and_truncates() {
        let ranked = get_recipes_for_category(BmiCategory::Normal);
        let filter = RecipeFilter {
            category: Some("main course".to_string()),
            max_budget: Some(22.0),
            ..Default::default()
        };

        let filtered = filter.apply(ranked);
        assert_eq!(ids(&filtered), vec!["10", "4", "3", "6"]);
    }

    #[test]
    fn test_budget_excludes_recipes_without_cost() {
        let mut uncosted = catalog()[4].clone();
        uncosted.cost_per_serving = None;
        let filter = RecipeFilter {
            max_budget: Some(1000.0),
            ..Default::default()
        };
        assert!(!filter.matches(&uncosted));
        assert!(RecipeFilter::default().matches(&uncosted));
    }

    #[test]
    fn test_cuisine_filter() {
        let filter = RecipeFilter {
            cuisine: Some("Italian".to_string()),
            ..Default::default()
        };
        assert!(filter.apply(catalog().to_vec()).is_empty());
    }
}
