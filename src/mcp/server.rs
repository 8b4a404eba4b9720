//! Recipe Scaler MCP Server Implementation
//!
//! Implements the MCP server with the recipe and scaling tools.

use std::path::PathBuf;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::{RecipeCreate, RecipeIngredientCreate, RecipeIngredientUpdate, RecipeUpdate};
use crate::scaling::Ingredient;
use crate::tools::recipes;

/// Recipe Scaler MCP Service
#[derive(Clone)]
pub struct RecipeScalerService {
    database_path: PathBuf,
    database: Database,
    tool_router: ToolRouter<RecipeScalerService>,
}

impl RecipeScalerService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            database_path,
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool response as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Response for scaler_status
#[derive(Debug, Serialize)]
struct StatusResponse {
    build: BuildInfo,
    database_path: String,
    schema_version: i32,
    schema_current: bool,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Name of the recipe
    pub name: String,
    /// Number of servings the ingredient amounts are written for (default 1.0)
    #[serde(default = "default_servings")]
    pub base_servings: f64,
    /// Optional notes
    pub notes: Option<String>,
}

fn default_servings() -> f64 { 1.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search query for recipe name (optional)
    pub query: Option<String>,
    /// Sort by: name, created_at, updated_at (default name)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// Sort order: asc or desc (default asc)
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    /// Max results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "name".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New base serving count (optional)
    pub base_servings: Option<f64>,
    /// New notes (optional)
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID to delete (its ingredients are removed too)
    pub id: i64,
}

// ============================================================================
// Recipe Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    /// Recipe ID to add the ingredient to
    pub recipe_id: i64,
    /// Ingredient name (e.g., "עגבניות")
    pub name: String,
    /// Free-text amount for the base servings (e.g., "2 עגבניות", "½ כוס", "3-4 ביצים")
    pub amount: String,
    /// Cost for the base servings (default 0)
    #[serde(default)]
    pub cost: f64,
}

/// Single ingredient for batch add
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BatchIngredientParam {
    /// Ingredient name
    pub name: String,
    /// Free-text amount for the base servings
    pub amount: String,
    /// Cost for the base servings (default 0)
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientsBatchParams {
    /// Recipe ID to add ingredients to
    pub recipe_id: i64,
    /// Array of ingredients to add, in display order
    pub ingredients: Vec<BatchIngredientParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    /// Recipe ingredient ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New amount text (optional)
    pub amount: Option<String>,
    /// New cost (optional)
    pub cost: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveRecipeIngredientParams {
    /// Recipe ingredient ID to remove
    pub id: i64,
}

// ============================================================================
// Scaling Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleRecipeParams {
    /// Recipe ID to scale
    pub recipe_id: i64,
    /// Number of servings wanted
    pub target_servings: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleIngredientParams {
    /// Ingredient name (returned unchanged)
    pub name: String,
    /// Free-text amount as authored
    pub amount: String,
    /// Cost as authored (default 0)
    #[serde(default)]
    pub cost: f64,
    /// Scaling factor: target servings divided by base servings
    pub multiplier: f64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RecipeScalerService {
    // --- Status ---

    #[tool(description = "Get the current status of the recipe scaler including build info and database schema version")]
    fn scaler_status(&self) -> Result<CallToolResult, McpError> {
        let schema_version = self
            .database
            .with_conn(|conn| migrations::get_schema_version(conn))
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let status = StatusResponse {
            build: BuildInfo::current(),
            database_path: self.database_path.display().to_string(),
            schema_version,
            schema_current: schema_version == migrations::SCHEMA_VERSION,
        };
        json_result(&status)
    }

    // --- Recipes ---

    #[tool(description = "Create a new recipe (ingredients added separately). Amounts are written for base_servings.")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate { name: p.name, base_servings: p.base_servings, notes: p.notes };
        let result = recipes::create_recipe(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full recipe details with unscaled ingredients and total base cost")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => json_result(&recipe),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Recipe not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List recipes with optional name search, sorting, and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update recipe name, base servings, or notes")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate { name: p.name, base_servings: p.base_servings, notes: p.notes };
        let result = recipes::update_recipe(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(success) => json_result(&success),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Recipe not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Delete a recipe and all of its ingredients")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Recipe Ingredients ---

    #[tool(description = "Add an ingredient line (name, free-text amount, cost) to the end of a recipe")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate { recipe_id: p.recipe_id, name: p.name, amount: p.amount, cost: p.cost };
        let result = recipes::add_recipe_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add multiple ingredients to a recipe in one call. All rows are added or none are.")]
    fn add_recipe_ingredients_batch(&self, Parameters(p): Parameters<AddRecipeIngredientsBatchParams>) -> Result<CallToolResult, McpError> {
        use crate::tools::recipes::BatchIngredient;
        let ingredients: Vec<BatchIngredient> = p.ingredients.into_iter().map(|i| BatchIngredient {
            name: i.name,
            amount: i.amount,
            cost: i.cost,
        }).collect();
        let result = recipes::add_recipe_ingredients_batch(&self.database, p.recipe_id, ingredients)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a recipe ingredient's name, amount text, or cost")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpdate { name: p.name, amount: p.amount, cost: p.cost };
        let result = recipes::update_recipe_ingredient(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(ingredient) => json_result(&ingredient),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Recipe ingredient not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Remove an ingredient from a recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<RemoveRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let deleted = recipes::remove_recipe_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            r#"{{"success": {}, "id": {}}}"#,
            deleted, p.id
        ))]))
    }

    // --- Scaling ---

    #[tool(description = "Scale every ingredient of a recipe to a target serving count. Amount text is rewritten (fraction words, ½-style glyphs, a/b fractions and ranges understood); countable items round up to whole numbers, weights and volumes keep one decimal. Nothing is saved.")]
    fn scale_recipe(&self, Parameters(p): Parameters<ScaleRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::scale_recipe(&self.database, p.recipe_id, p.target_servings)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Scale a single ingredient (name, amount text, cost) by a multiplier without storing anything")]
    fn scale_ingredient(&self, Parameters(p): Parameters<ScaleIngredientParams>) -> Result<CallToolResult, McpError> {
        let ingredient = Ingredient { name: p.name, amount: p.amount, cost: p.cost };
        let result = recipes::scale_ingredient(ingredient, p.multiplier)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RecipeScalerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "recipe-scaler".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Recipe Scaler".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Recipe Scaler - store recipes with free-text ingredient amounts and scale them to any serving count. \
                 Recipes: create/get/list/update/delete_recipe. \
                 Ingredients: add_recipe_ingredient, add_recipe_ingredients_batch, update/remove_recipe_ingredient. \
                 Scaling: scale_recipe (stored recipe, target servings), scale_ingredient (ad-hoc line, multiplier). \
                 Status: scaler_status."
                    .into(),
            ),
        }
    }
}
