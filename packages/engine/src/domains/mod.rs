// Business domains
pub mod audit;
pub mod draws;
pub mod imports;
pub mod member;
pub mod moderation;
pub mod recipes;
pub mod shares;
