pub mod auth;
pub mod error;
pub mod export;
pub mod fallback;
pub mod generator;
pub mod llm;
pub mod script;
pub mod setup;
pub mod synthesis;
pub mod tts;
pub mod voice;
pub mod workflow;
