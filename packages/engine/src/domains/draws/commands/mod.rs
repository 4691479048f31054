pub mod daily_pick;
pub mod draw;
