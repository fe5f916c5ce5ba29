use crate::transport::{OllamaTransport, OpenAiTransport};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// One system+user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Per-call options forwarded to the provider.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

/// Request/response boundary to the model provider.
///
/// Responsibilities:
/// - Send a system+user prompt and return the assistant's raw text
/// - Surface transport failures; never interpret the content
///
/// Callers treat the returned text as untrusted input to be validated.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Unique provider ID (e.g., "openai", "ollama")
    fn id(&self) -> &'static str;

    async fn chat(&self, prompt: &ChatPrompt, options: &ChatOptions) -> Result<String>;
}

/// Create a transport by provider name.
pub fn create_transport(
    provider: &str,
    base_url: Option<&str>,
    api_key: Option<&str>,
) -> Result<Box<dyn ChatTransport>> {
    match provider {
        "openai" => {
            let key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| Error::MissingApiKey("openai".to_string()))?;
            Ok(Box::new(OpenAiTransport::new(base_url, key)))
        }
        "ollama" => Ok(Box::new(OllamaTransport::new(base_url))),
        other => Err(Error::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transport_by_name() {
        assert_eq!(create_transport("ollama", None, None).unwrap().id(), "ollama");
        assert_eq!(
            create_transport("openai", None, Some("sk-test")).unwrap().id(),
            "openai"
        );
    }

    #[test]
    fn test_openai_requires_api_key() {
        assert!(matches!(
            create_transport("openai", None, None),
            Err(Error::MissingApiKey(_))
        ));
        assert!(matches!(
            create_transport("openai", None, Some("  ")),
            Err(Error::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        assert!(matches!(
            create_transport("bedrock", None, None),
            Err(Error::UnknownProvider(_))
        ));
    }
}
