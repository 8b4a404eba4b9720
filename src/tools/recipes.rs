//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredients, and for scaling them to
//! a target serving count.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    Recipe, RecipeCreate, RecipeIngredient, RecipeIngredientCreate, RecipeIngredientUpdate,
    RecipeUpdate,
};
use crate::scaling::{
    scale_ingredient as scale_one, scale_ingredients, servings_multiplier, total_cost, Ingredient,
    ScaledIngredient,
};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub created_at: String,
}

/// Full recipe detail with unscaled ingredients
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub ingredients: Vec<RecipeIngredient>,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub ingredient_count: i64,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for successful update
#[derive(Debug, Serialize)]
pub struct RecipeUpdateSuccessResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for add_recipe_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: String,
    pub cost: f64,
    pub position: i64,
}

/// One ingredient in an add_recipe_ingredients_batch call
#[derive(Debug, Clone, Deserialize)]
pub struct BatchIngredient {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub cost: f64,
}

/// Response for add_recipe_ingredients_batch
#[derive(Debug, Serialize)]
pub struct AddIngredientsBatchResponse {
    pub recipe_id: i64,
    pub added: Vec<AddIngredientResponse>,
    pub count: usize,
}

/// A recipe rewritten for a target serving count
#[derive(Debug, Serialize)]
pub struct ScaledRecipeResponse {
    pub recipe_id: i64,
    pub name: String,
    pub base_servings: f64,
    pub target_servings: f64,
    pub multiplier: f64,
    pub ingredients: Vec<ScaledIngredient>,
    pub total_cost: f64,
}

impl From<RecipeIngredient> for AddIngredientResponse {
    fn from(ingredient: RecipeIngredient) -> Self {
        Self {
            id: ingredient.id,
            recipe_id: ingredient.recipe_id,
            name: ingredient.name,
            amount: ingredient.amount,
            cost: ingredient.cost,
            position: ingredient.position,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_name(name: &str, what: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        tracing::warn!("Rejected empty {} name", what);
        return Err(format!("{} name cannot be empty", what));
    }
    Ok(trimmed.to_string())
}

fn validate_servings(servings: f64, field: &str) -> Result<(), String> {
    if !servings.is_finite() || servings <= 0.0 {
        tracing::warn!("Rejected {} = {}", field, servings);
        return Err(format!("{} must be greater than 0", field));
    }
    Ok(())
}

fn validate_cost(cost: f64) -> Result<(), String> {
    if !cost.is_finite() || cost < 0.0 {
        tracing::warn!("Rejected ingredient cost {}", cost);
        return Err("cost must be 0 or greater".to_string());
    }
    Ok(())
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, data: RecipeCreate) -> Result<CreateRecipeResponse, String> {
    let name = validate_name(&data.name, "Recipe")?;
    validate_servings(data.base_servings, "base_servings")?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::create(&conn, &RecipeCreate { name, ..data })
        .map_err(|e| format!("Failed to create recipe: {}", e))?;
    tracing::info!("Created recipe {} '{}'", recipe.id, recipe.name);

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        base_servings: recipe.base_servings,
        created_at: recipe.created_at,
    })
}

/// Get a recipe with its unscaled ingredients
pub fn get_recipe(db: &Database, id: i64) -> Result<Option<RecipeDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    match recipe {
        Some(recipe) => {
            let ingredients = RecipeIngredient::get_for_recipe(&conn, id)
                .map_err(|e| format!("Failed to get ingredients: {}", e))?;
            let base: Vec<ScaledIngredient> = ingredients
                .iter()
                .map(|i| scale_one(&i.to_ingredient(), 1.0))
                .collect();

            Ok(Some(RecipeDetail {
                id: recipe.id,
                name: recipe.name,
                base_servings: recipe.base_servings,
                total_cost: total_cost(&base),
                ingredients,
                notes: recipe.notes,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// List recipes with filtering
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, sort_by, sort_order, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn, query)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    let mut summaries = Vec::new();
    for recipe in recipes {
        let ingredient_count = RecipeIngredient::count_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to count ingredients: {}", e))?;

        summaries.push(RecipeSummary {
            id: recipe.id,
            name: recipe.name,
            base_servings: recipe.base_servings,
            ingredient_count,
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update recipe metadata
pub fn update_recipe(
    db: &Database,
    id: i64,
    data: RecipeUpdate,
) -> Result<Option<RecipeUpdateSuccessResponse>, String> {
    let name = data
        .name
        .as_deref()
        .map(|n| validate_name(n, "Recipe"))
        .transpose()?;
    if let Some(servings) = data.base_servings {
        validate_servings(servings, "base_servings")?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Recipe::update(&conn, id, &RecipeUpdate { name, ..data })
        .map_err(|e| format!("Failed to update recipe: {}", e))?;

    Ok(updated.map(|recipe| RecipeUpdateSuccessResponse {
        success: true,
        updated_at: recipe.updated_at,
    }))
}

/// Delete a recipe and its ingredients
pub fn delete_recipe(db: &Database, id: i64) -> Result<RecipeDeleteSuccessResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }
    tracing::info!("Deleted recipe {}", id);

    Ok(RecipeDeleteSuccessResponse {
        success: true,
        deleted_id: id,
    })
}

// ============================================================================
// Recipe Ingredient Tools
// ============================================================================

/// Add an ingredient to the end of a recipe
pub fn add_recipe_ingredient(
    db: &Database,
    data: RecipeIngredientCreate,
) -> Result<AddIngredientResponse, String> {
    let name = validate_name(&data.name, "Ingredient")?;
    validate_cost(data.cost)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error checking recipe: {}", e))?;
    if recipe.is_none() {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }

    let ingredient = RecipeIngredient::create(&conn, &RecipeIngredientCreate { name, ..data })
        .map_err(|e| format!("Failed to add ingredient: {}", e))?;
    tracing::info!("Added ingredient {} to recipe {}", ingredient.id, ingredient.recipe_id);

    Ok(ingredient.into())
}

/// Add several ingredients to a recipe in one transaction
pub fn add_recipe_ingredients_batch(
    db: &Database,
    recipe_id: i64,
    ingredients: Vec<BatchIngredient>,
) -> Result<AddIngredientsBatchResponse, String> {
    if ingredients.is_empty() {
        return Err("ingredients cannot be empty".to_string());
    }

    let mut rows = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        validate_cost(ingredient.cost)?;
        rows.push(RecipeIngredientCreate {
            recipe_id,
            name: validate_name(&ingredient.name, "Ingredient")?,
            amount: ingredient.amount,
            cost: ingredient.cost,
        });
    }

    let added = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut added = Vec::with_capacity(rows.len());
            for row in &rows {
                added.push(AddIngredientResponse::from(RecipeIngredient::create(&tx, row)?));
            }
            tx.commit()?;
            Ok(added)
        })
        .map_err(|e| format!("Failed to add ingredients: {}", e))?;
    tracing::info!("Added {} ingredients to recipe {}", added.len(), recipe_id);

    let count = added.len();
    Ok(AddIngredientsBatchResponse {
        recipe_id,
        added,
        count,
    })
}

/// Update a recipe ingredient's name, amount, or cost
pub fn update_recipe_ingredient(
    db: &Database,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<Option<RecipeIngredient>, String> {
    let name = data
        .name
        .as_deref()
        .map(|n| validate_name(n, "Ingredient"))
        .transpose()?;
    if let Some(cost) = data.cost {
        validate_cost(cost)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::update(&conn, id, &RecipeIngredientUpdate { name, ..data })
        .map_err(|e| format!("Failed to update ingredient: {}", e))
}

/// Remove an ingredient from a recipe
pub fn remove_recipe_ingredient(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    RecipeIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to remove ingredient: {}", e))
}

// ============================================================================
// Scaling Tools
// ============================================================================

/// Scale a stored recipe to a target serving count
///
/// Computed on every call; nothing scaled is written back.
pub fn scale_recipe(
    db: &Database,
    recipe_id: i64,
    target_servings: f64,
) -> Result<ScaledRecipeResponse, String> {
    validate_servings(target_servings, "target_servings")?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, recipe_id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?
        .ok_or_else(|| format!("Recipe not found with id: {}", recipe_id))?;

    let multiplier = servings_multiplier(target_servings, recipe.base_servings)
        .ok_or_else(|| format!("Recipe {} has invalid base_servings", recipe_id))?;

    let ingredients: Vec<Ingredient> = RecipeIngredient::get_for_recipe(&conn, recipe_id)
        .map_err(|e| format!("Failed to get ingredients: {}", e))?
        .iter()
        .map(RecipeIngredient::to_ingredient)
        .collect();

    let scaled = scale_ingredients(&ingredients, multiplier);
    tracing::debug!(
        "Scaled recipe {} by {} ({} ingredients)",
        recipe_id,
        multiplier,
        scaled.len()
    );

    Ok(ScaledRecipeResponse {
        recipe_id,
        name: recipe.name,
        base_servings: recipe.base_servings,
        target_servings,
        multiplier,
        total_cost: total_cost(&scaled),
        ingredients: scaled,
    })
}

/// Scale a single ad-hoc ingredient without touching the store
pub fn scale_ingredient(ingredient: Ingredient, multiplier: f64) -> Result<ScaledIngredient, String> {
    validate_servings(multiplier, "multiplier")?;
    validate_cost(ingredient.cost)?;
    Ok(scale_one(&ingredient, multiplier))
}
