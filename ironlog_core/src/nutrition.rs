//! Food items, daily nutrition logs and target progress.

use crate::store::Store;
use crate::{Error, FoodItem, MealType, NutritionEntry, NutritionLog, NutritionValues, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

impl FoodItem {
    /// A food with per-serving values in grams
    pub fn new(
        name: impl Into<String>,
        serving_size_g: f64,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            brand: String::new(),
            serving_size_g,
            serving_unit: "g".to_string(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
            fiber_g: 0.0,
            sugar_g: 0.0,
            sodium_mg: 0.0,
            barcode: None,
            is_custom: false,
            created_at: Utc::now(),
        }
    }

    /// Values for `multiplier` servings
    pub fn scaled(&self, multiplier: f64) -> NutritionValues {
        NutritionValues {
            calories: self.calories * multiplier,
            protein_g: self.protein_g * multiplier,
            carbs_g: self.carbs_g * multiplier,
            fat_g: self.fat_g * multiplier,
            fiber_g: self.fiber_g * multiplier,
        }
    }
}

impl NutritionValues {
    fn add(self, other: NutritionValues) -> NutritionValues {
        NutritionValues {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
            fiber_g: self.fiber_g + other.fiber_g,
        }
    }
}

impl NutritionEntry {
    /// Snapshot `food` into an entry
    pub fn from_food(
        food: &FoodItem,
        meal_type: MealType,
        serving_multiplier: f64,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            food_item_id: food.id,
            food_name: food.name.clone(),
            brand: food.brand.clone(),
            meal_type,
            serving_multiplier,
            serving_size_g: food.serving_size_g,
            calories: food.calories,
            protein_g: food.protein_g,
            carbs_g: food.carbs_g,
            fat_g: food.fat_g,
            fiber_g: food.fiber_g,
            logged_at,
        }
    }

    /// Snapshot values × serving multiplier
    pub fn totals(&self) -> NutritionValues {
        let m = self.serving_multiplier;
        NutritionValues {
            calories: self.calories * m,
            protein_g: self.protein_g * m,
            carbs_g: self.carbs_g * m,
            fat_g: self.fat_g * m,
            fiber_g: self.fiber_g * m,
        }
    }

    pub fn total_grams(&self) -> f64 {
        self.serving_size_g * self.serving_multiplier
    }
}

impl NutritionLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            entries: Vec::new(),
            water_ml: 0,
            notes: String::new(),
        }
    }

    pub fn totals(&self) -> NutritionValues {
        self.entries
            .iter()
            .map(NutritionEntry::totals)
            .fold(NutritionValues::default(), NutritionValues::add)
    }

    pub fn total_calories(&self) -> f64 {
        self.totals().calories
    }

    pub fn total_protein_g(&self) -> f64 {
        self.totals().protein_g
    }

    pub fn total_carbs_g(&self) -> f64 {
        self.totals().carbs_g
    }

    pub fn total_fat_g(&self) -> f64 {
        self.totals().fat_g
    }

    pub fn total_fiber_g(&self) -> f64 {
        self.totals().fiber_g
    }

    /// Entries grouped by meal, meals in their natural order
    pub fn entries_by_meal(&self) -> BTreeMap<MealType, Vec<&NutritionEntry>> {
        let mut grouped: BTreeMap<MealType, Vec<&NutritionEntry>> = BTreeMap::new();
        for entry in &self.entries {
            grouped.entry(entry.meal_type).or_default().push(entry);
        }
        grouped
    }

    pub fn add_entry(&mut self, entry: NutritionEntry) {
        self.entries.push(entry);
    }

    /// Remove an entry by id; false if it was not there
    pub fn remove_entry(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn add_water(&mut self, ml: u32) {
        self.water_ml = self.water_ml.saturating_add(ml);
    }
}

/// Share of the calorie target eaten, clamped to 1.0
pub fn calorie_progress(log: &NutritionLog, target: i32) -> f64 {
    macro_progress(log.total_calories(), target)
}

/// Share of a macro target reached, clamped to 1.0; 0 for a non-positive target
pub fn macro_progress(current: f64, target: i32) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    (current / target as f64).min(1.0)
}

/// Calories left for the day; negative once over target
pub fn remaining_calories(log: &NutritionLog, target: i32) -> f64 {
    target as f64 - log.total_calories()
}

/// The stored log for `date`, or a fresh unsaved one
pub fn log_for_date(store: &dyn Store, date: NaiveDate) -> Result<NutritionLog> {
    Ok(store
        .nutrition_log(date)?
        .unwrap_or_else(|| NutritionLog::new(date)))
}

/// Today's log, created and saved if it does not exist yet
pub fn today_log(store: &mut dyn Store, today: NaiveDate) -> Result<NutritionLog> {
    if let Some(existing) = store.nutrition_log(today)? {
        return Ok(existing);
    }
    let log = NutritionLog::new(today);
    store.save_nutrition_log(&log)?;
    tracing::debug!("Created nutrition log for {}", today);
    Ok(log)
}

/// Add `servings` of `food` to the log for `date` and save it
pub fn log_food(
    store: &mut dyn Store,
    date: NaiveDate,
    food: &FoodItem,
    meal_type: MealType,
    servings: f64,
    now: DateTime<Utc>,
) -> Result<NutritionEntry> {
    if !servings.is_finite() || servings <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "servings must be positive, got {}",
            servings
        )));
    }

    let mut log = log_for_date(store, date)?;
    let entry = NutritionEntry::from_food(food, meal_type, servings, now);
    log.add_entry(entry.clone());
    store.save_nutrition_log(&log)?;

    tracing::info!(
        "Logged {} x{} for {} ({:.0} kcal)",
        food.name,
        servings,
        meal_type,
        entry.totals().calories
    );
    Ok(entry)
}

/// Create and save a user-defined food
pub fn create_custom_food(
    store: &mut dyn Store,
    name: &str,
    serving_size_g: f64,
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
) -> Result<FoodItem> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("food name must not be empty".into()));
    }
    let values = [serving_size_g, calories, protein_g, carbs_g, fat_g];
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(Error::InvalidInput(format!(
            "nutrition values for '{}' must be non-negative numbers",
            name
        )));
    }

    let mut food = FoodItem::new(name, serving_size_g, calories, protein_g, carbs_g, fat_g);
    food.is_custom = true;
    store.save_food_item(&food)?;
    Ok(food)
}

/// Most recently created foods first
pub fn recent_foods(foods: &[FoodItem], limit: usize) -> Vec<&FoodItem> {
    let mut sorted: Vec<&FoodItem> = foods.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Case-insensitive name search, sorted by name
pub fn search_foods<'a>(foods: &'a [FoodItem], query: &str) -> Vec<&'a FoodItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let mut hits: Vec<&FoodItem> = foods
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&query))
        .collect();
    hits.sort_by(|a, b| a.name.cmp(&b.name));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn oats() -> FoodItem {
        let mut food = FoodItem::new("Oats", 40.0, 150.0, 5.0, 27.0, 3.0);
        food.fiber_g = 4.0;
        food
    }

    #[test]
    fn test_scaled_values() {
        let values = oats().scaled(1.5);
        assert_eq!(values.calories, 225.0);
        assert_eq!(values.protein_g, 7.5);
        assert_eq!(values.fiber_g, 6.0);
    }

    #[test]
    fn test_log_totals_use_multiplier() {
        let today = Utc::now().date_naive();
        let mut log = NutritionLog::new(today);
        log.add_entry(NutritionEntry::from_food(&oats(), MealType::Breakfast, 2.0, Utc::now()));
        log.add_entry(NutritionEntry::from_food(&oats(), MealType::Snack, 0.5, Utc::now()));

        assert_eq!(log.total_calories(), 375.0);
        assert_eq!(log.total_carbs_g(), 67.5);
        assert_eq!(log.entries[0].total_grams(), 80.0);
    }

    #[test]
    fn test_entries_by_meal_and_remove() {
        let mut log = NutritionLog::new(Utc::now().date_naive());
        let breakfast = NutritionEntry::from_food(&oats(), MealType::Breakfast, 1.0, Utc::now());
        let breakfast_id = breakfast.id;
        log.add_entry(NutritionEntry::from_food(&oats(), MealType::Dinner, 1.0, Utc::now()));
        log.add_entry(breakfast);

        let grouped = log.entries_by_meal();
        let meals: Vec<MealType> = grouped.keys().copied().collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Dinner]);

        assert!(log.remove_entry(breakfast_id));
        assert!(!log.remove_entry(breakfast_id));
        assert_eq!(log.entries.len(), 1);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut log = NutritionLog::new(Utc::now().date_naive());
        log.add_entry(NutritionEntry::from_food(&oats(), MealType::Lunch, 10.0, Utc::now()));

        assert_eq!(calorie_progress(&log, 3000), 0.5);
        assert_eq!(calorie_progress(&log, 1000), 1.0);
        assert_eq!(calorie_progress(&log, 0), 0.0);
        assert_eq!(macro_progress(50.0, -10), 0.0);
        assert_eq!(remaining_calories(&log, 1000), -500.0);
    }

    #[test]
    fn test_water() {
        let mut log = NutritionLog::new(Utc::now().date_naive());
        log.add_water(250);
        log.add_water(500);
        assert_eq!(log.water_ml, 750);
    }

    #[test]
    fn test_today_log_get_or_create() {
        let mut store = MemoryStore::new();
        let today = Utc::now().date_naive();

        let created = today_log(&mut store, today).unwrap();
        let again = today_log(&mut store, today).unwrap();
        assert_eq!(created.id, again.id);
        assert_eq!(store.nutrition_logs().unwrap().len(), 1);

        let yesterday = today - Duration::days(1);
        let fresh = log_for_date(&store, yesterday).unwrap();
        assert!(fresh.entries.is_empty());
        assert!(store.nutrition_log(yesterday).unwrap().is_none());
    }

    #[test]
    fn test_log_food_persists_entry() {
        let mut store = MemoryStore::new();
        let today = Utc::now().date_naive();

        log_food(&mut store, today, &oats(), MealType::Breakfast, 1.0, Utc::now()).unwrap();
        log_food(&mut store, today, &oats(), MealType::Lunch, 2.0, Utc::now()).unwrap();
        assert!(log_food(&mut store, today, &oats(), MealType::Lunch, 0.0, Utc::now()).is_err());

        let log = store.nutrition_log(today).unwrap().unwrap();
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.total_calories(), 450.0);
    }

    #[test]
    fn test_custom_food_and_recent() {
        let mut store = MemoryStore::new();
        let first = create_custom_food(&mut store, "Protein Shake", 30.0, 120.0, 24.0, 3.0, 1.0)
            .unwrap();
        assert!(first.is_custom);
        assert!(create_custom_food(&mut store, "  ", 1.0, 1.0, 1.0, 1.0, 1.0).is_err());
        assert!(create_custom_food(&mut store, "Bad", 1.0, -5.0, 1.0, 1.0, 1.0).is_err());

        let mut older = oats();
        older.created_at = Utc::now() - Duration::days(3);
        store.save_food_item(&older).unwrap();

        let foods = store.food_items().unwrap();
        let recent = recent_foods(&foods, 1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "Protein Shake");

        let hits = search_foods(&foods, "shake");
        assert_eq!(hits.len(), 1);
        assert!(search_foods(&foods, "").is_empty());
    }
}
