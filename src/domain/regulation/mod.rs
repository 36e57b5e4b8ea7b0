pub mod regulation_record;
pub mod result_formatter;
pub mod summary;
