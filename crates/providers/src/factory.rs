//! Provider factory for subagent dispatch.

use crate::openai_compat::OpenAiCompatProvider;
use anvil_core::error::ProviderError;
use anvil_core::provider::{Provider, ProviderFactory};
use std::sync::Arc;

/// Builds a fresh [`OpenAiCompatProvider`] per subagent, falling back to
/// the session's default model when no override is given.
pub struct OpenAiCompatFactory {
    name: String,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl OpenAiCompatFactory {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            default_model: default_model.into(),
        }
    }
}

impl ProviderFactory for OpenAiCompatFactory {
    fn create(
        &self,
        model_override: Option<&str>,
    ) -> Result<(Arc<dyn Provider>, String), ProviderError> {
        let provider = OpenAiCompatProvider::new(&self.name, &self.base_url, &self.api_key)?;
        let model = model_override.unwrap_or(&self.default_model).to_string();
        Ok((Arc::new(provider), model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> OpenAiCompatFactory {
        OpenAiCompatFactory::new("openai", "https://api.openai.com/v1", "key", "gpt-4o-mini")
    }

    #[test]
    fn default_model_without_override() {
        let (provider, model) = factory().create(None).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(model, "gpt-4o-mini");
    }

    #[test]
    fn override_takes_precedence() {
        let (_, model) = factory().create(Some("gpt-4o")).unwrap();
        assert_eq!(model, "gpt-4o");
    }
}
