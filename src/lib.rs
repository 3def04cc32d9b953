pub mod assistant;
pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod loader;
pub mod prompts;
pub mod selection;
pub mod session;
pub mod shell;
pub mod table;
