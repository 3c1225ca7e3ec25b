//! Client for the external recipe API.

pub mod client;
pub mod normalizer;

pub use client::{CuisineQuery, RecipeDbClient};
pub use normalizer::{normalize_recipe, normalize_response, unwrap_envelope};
