//! Card Forge — procedural item and skill card generation for games.
//!
//! Builds short card descriptions from weighted picks over RON content
//! tables, fills template placeholders, highlights game keywords with
//! semantic markup, and derives thematic names for the result.

pub mod core;
pub mod schema;
