pub mod config;
pub mod format;
pub mod tg;
pub mod tmdb;
