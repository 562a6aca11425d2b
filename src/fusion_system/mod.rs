pub mod catalog;
pub mod contracts;
pub mod fallback;
pub mod fusion;
pub mod offline;
pub mod sources;
