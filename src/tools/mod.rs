//! Recipe Scaler Tools module
//!
//! Tool implementations behind the MCP server.

pub mod recipes;
