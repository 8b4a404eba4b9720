//! MCP server module
//!
//! Exposes the recipe and scaling tools over the Model Context Protocol.

pub mod server;

pub use server::RecipeScalerService;
