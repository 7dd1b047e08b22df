pub mod database;
pub mod ml;
pub mod repositories;
pub mod security;
