mod ollama;
mod openai;

pub use ollama::OllamaTransport;
pub use openai::OpenAiTransport;
