//! Recipe model
//!
//! A recipe whose ingredient amounts are authored for `base_servings`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A stored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub base_servings: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    #[serde(default = "default_servings")]
    pub base_servings: f64,
    pub notes: Option<String>,
}

fn default_servings() -> f64 {
    1.0
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub base_servings: Option<f64>,
    pub notes: Option<String>,
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            base_servings: row.get("base_servings")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (name, base_servings, notes)
            VALUES (?1, ?2, ?3)
            "#,
            params![data.name, data.base_servings, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes, optionally filtered by a name substring
    pub fn list(
        conn: &Connection,
        query: Option<&str>,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.to_lowercase() == "desc" { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "updated_at" => "updated_at",
            _ => "name",
        };

        let recipes = match query {
            Some(q) => {
                let sql = format!(
                    "SELECT * FROM recipes WHERE name LIKE ?1 ORDER BY {} {} LIMIT ?2 OFFSET ?3",
                    sort_col, order
                );
                let mut stmt = conn.prepare(&sql)?;
                let pattern = format!("%{}%", q);
                let rows = stmt.query_map(params![pattern, limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "SELECT * FROM recipes ORDER BY {} {} LIMIT ?1 OFFSET ?2",
                    sort_col, order
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(recipes)
    }

    /// Update a recipe
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(servings) = data.base_servings {
            updates.push(format!("base_servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Count recipes, optionally filtered by a name substring
    pub fn count(conn: &Connection, query: Option<&str>) -> DbResult<i64> {
        let count: i64 = match query {
            Some(q) => conn.query_row(
                "SELECT COUNT(*) FROM recipes WHERE name LIKE ?1",
                [format!("%{}%", q)],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Delete a recipe; ingredients cascade
    /// Returns Ok(false) if the recipe did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create(conn: &Connection, name: &str) -> Recipe {
        let data = RecipeCreate {
            name: name.to_string(),
            base_servings: 1.0,
            notes: None,
        };
        Recipe::create(conn, &data).unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let recipe = create(&conn, "שקשוקה");
        let loaded = Recipe::get_by_id(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(loaded.name, "שקשוקה");
        assert_eq!(loaded.base_servings, 1.0);
        assert!(Recipe::get_by_id(&conn, recipe.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_list_and_count() {
        let conn = setup();
        create(&conn, "שקשוקה");
        create(&conn, "סלט ירקות");
        create(&conn, "סלט טונה");

        let all = Recipe::list(&conn, None, "name", "asc", 50, 0).unwrap();
        assert_eq!(all.len(), 3);
        let salads = Recipe::list(&conn, Some("סלט"), "name", "asc", 50, 0).unwrap();
        assert_eq!(salads.len(), 2);
        assert_eq!(Recipe::count(&conn, Some("סלט")).unwrap(), 2);
        assert_eq!(Recipe::count(&conn, None).unwrap(), 3);
    }

    #[test]
    fn test_update_and_delete() {
        let conn = setup();
        let recipe = create(&conn, "פשטידה");
        let update = RecipeUpdate {
            base_servings: Some(4.0),
            ..Default::default()
        };
        let updated = Recipe::update(&conn, recipe.id, &update).unwrap().unwrap();
        assert_eq!(updated.base_servings, 4.0);
        assert_eq!(updated.name, "פשטידה");

        assert!(Recipe::delete(&conn, recipe.id).unwrap());
        assert!(!Recipe::delete(&conn, recipe.id).unwrap());
    }
}
