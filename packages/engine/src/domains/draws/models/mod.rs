pub mod candidate;
pub mod daily_pick;
pub mod draw_history;

pub use candidate::*;
pub use daily_pick::*;
pub use draw_history::*;
