pub mod public_share;

pub use public_share::*;
