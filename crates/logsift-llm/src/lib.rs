pub mod error;
pub mod prompt;
pub mod synthesize;
pub mod transport;
mod traits;

pub use error::{Error, Result};
pub use prompt::PromptBuilder;
pub use synthesize::{RetryPolicy, Synthesizer, parse_candidates};
pub use traits::{ChatOptions, ChatPrompt, ChatTransport, create_transport};
