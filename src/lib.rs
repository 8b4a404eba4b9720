//! Recipe Scaler Library
//!
//! Serving-size scaling of free-text ingredient amounts, plus the recipe
//! store and MCP tools built around it.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod scaling;
pub mod tools;
