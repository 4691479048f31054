pub mod import_batch;
pub mod source_record;

pub use import_batch::*;
pub use source_record::*;
