pub mod atmosphere;
pub mod entry;
pub mod impactor;
