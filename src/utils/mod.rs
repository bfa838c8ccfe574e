pub mod audio;
pub mod retry;
pub mod text;
