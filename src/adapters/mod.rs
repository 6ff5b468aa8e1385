// Adapters layer: concrete implementations of the domain ports for Ollama.

pub mod http;
pub mod process;

pub use http::OllamaClient;
pub use process::OllamaCli;
