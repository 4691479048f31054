// Recipe catalogue: identity rows plus the append-only version store.

pub mod commands;
pub mod models;

pub use commands::version_store::{create_version, get_as_of, get_current};
pub use models::recipe::RecipeRecord;
pub use models::recipe_version::{NewIngredientLine, NewVersionContent, RecipeVersionRecord};
