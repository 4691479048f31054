// Background infrastructure

pub mod scheduled_tasks;
