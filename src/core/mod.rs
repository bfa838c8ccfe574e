pub mod config;
pub mod io;
pub mod podcast;
pub mod presets;
