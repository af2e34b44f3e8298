pub mod ordering;
pub mod rollover;
pub mod status;
pub mod todo_ops;
