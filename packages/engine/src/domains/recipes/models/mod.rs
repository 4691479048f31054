pub mod diet;
pub mod ingredient;
pub mod recipe;
pub mod recipe_version;

pub use diet::*;
pub use ingredient::*;
pub use recipe::*;
pub use recipe_version::*;
