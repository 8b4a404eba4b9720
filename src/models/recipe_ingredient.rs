//! Recipe Ingredient model
//!
//! An ingredient line with a free-text amount and a base-serving cost.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::scaling::Ingredient;

/// A stored ingredient line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: String,
    pub cost: f64,
    pub position: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: i64,
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub cost: f64,
}

/// Data for updating a recipe ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub cost: Option<f64>,
}

impl RecipeIngredient {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            cost: row.get("cost")?,
            position: row.get("position")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The unscaled ingredient handed to the scaling pipeline
    pub fn to_ingredient(&self) -> Ingredient {
        Ingredient {
            name: self.name.clone(),
            amount: self.amount.clone(),
            cost: self.cost,
        }
    }

    /// Add an ingredient to the end of a recipe
    pub fn create(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, name, amount, cost, position)
            VALUES (?1, ?2, ?3, ?4,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM recipe_ingredients WHERE recipe_id = ?1))
            "#,
            params![data.recipe_id, data.name, data.amount, data.cost],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all ingredients for a recipe in authored order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position, id"
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Count ingredients in a recipe
    pub fn count_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref amount) = data.amount {
            updates.push(format!("amount = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(amount.clone()));
        }
        if let Some(cost) = data.cost {
            updates.push(format!("cost = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(cost));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipe_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete an ingredient
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Recipe, RecipeCreate};

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let recipe = Recipe::create(
            &conn,
            &RecipeCreate { name: "חביתה".to_string(), base_servings: 1.0, notes: None },
        )
        .unwrap();
        (conn, recipe.id)
    }

    fn add(conn: &Connection, recipe_id: i64, name: &str, amount: &str, cost: f64) -> RecipeIngredient {
        let data = RecipeIngredientCreate {
            recipe_id,
            name: name.to_string(),
            amount: amount.to_string(),
            cost,
        };
        RecipeIngredient::create(conn, &data).unwrap()
    }

    #[test]
    fn test_positions_follow_insertion_order() {
        let (conn, recipe_id) = setup();
        add(&conn, recipe_id, "ביצים", "3 ביצים", 3.0);
        add(&conn, recipe_id, "חלב", "רבע כוס", 0.5);
        add(&conn, recipe_id, "מלח", "קורט מלח", 0.0);

        let ingredients = RecipeIngredient::get_for_recipe(&conn, recipe_id).unwrap();
        let positions: Vec<i64> = ingredients.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(ingredients[1].amount, "רבע כוס");
        assert_eq!(RecipeIngredient::count_for_recipe(&conn, recipe_id).unwrap(), 3);
    }

    #[test]
    fn test_update_amount() {
        let (conn, recipe_id) = setup();
        let egg = add(&conn, recipe_id, "ביצים", "3 ביצים", 3.0);
        let update = RecipeIngredientUpdate {
            amount: Some("2-3 ביצים".to_string()),
            ..Default::default()
        };
        let updated = RecipeIngredient::update(&conn, egg.id, &update).unwrap().unwrap();
        assert_eq!(updated.amount, "2-3 ביצים");
        assert_eq!(updated.cost, 3.0);
    }

    #[test]
    fn test_negative_cost_rejected() {
        let (conn, recipe_id) = setup();
        let data = RecipeIngredientCreate {
            recipe_id,
            name: "ביצים".to_string(),
            amount: "3 ביצים".to_string(),
            cost: -1.0,
        };
        assert!(RecipeIngredient::create(&conn, &data).is_err());
    }

    #[test]
    fn test_ingredients_cascade_with_recipe() {
        let (conn, recipe_id) = setup();
        let egg = add(&conn, recipe_id, "ביצים", "3 ביצים", 3.0);
        Recipe::delete(&conn, recipe_id).unwrap();
        assert!(RecipeIngredient::get_by_id(&conn, egg.id).unwrap().is_none());
    }

    #[test]
    fn test_to_ingredient() {
        let (conn, recipe_id) = setup();
        let egg = add(&conn, recipe_id, "ביצים", "3 ביצים", 3.0);
        let ingredient = egg.to_ingredient();
        assert_eq!(ingredient.name, "ביצים");
        assert_eq!(ingredient.amount, "3 ביצים");
        assert_eq!(ingredient.cost, 3.0);
    }
}
