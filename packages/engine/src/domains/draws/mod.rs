// Draw engine and daily pick scheduler.

pub mod commands;
pub mod models;
pub mod selection;

pub use commands::daily_pick::get_or_create_daily_pick;
pub use commands::draw::{draw, DrawFilters, DrawOptions, DrawResult};
pub use models::daily_pick::DailyPickRecord;
pub use models::draw_history::DrawHistoryRecord;
pub use selection::PrepTimeBucket;
