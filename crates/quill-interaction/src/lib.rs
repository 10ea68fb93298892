pub mod ollama_api_agent;
pub mod turn;

pub use ollama_api_agent::{FragmentSink, OllamaApiAgent};
pub use turn::run_turn;
