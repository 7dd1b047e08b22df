pub mod errors;
pub mod time_window;
