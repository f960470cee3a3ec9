//! Environment-driven configuration, read once at startup.

use crate::error::{ErrorCode, Result, ScriptportError};
use crate::llm::{ClientOptions, Provider};

const DEFAULT_PROVIDER: &str = "gemini";

/// Logging profile selected by `ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogProfile {
    #[default]
    Dev,
    Prod,
}

impl LogProfile {
    /// Filter used when neither `-v` nor `RUST_LOG` says otherwise
    pub fn default_filter(&self) -> &'static str {
        match self {
            LogProfile::Dev => "debug",
            LogProfile::Prod => "info",
        }
    }
}

/// Settings taken from the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub model: Option<String>,
    pub env: Option<String>,
}

/// A provider choice that passed validation, with its credential
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub api_key: String,
    pub model: Option<String>,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ResolvedProvider {
    pub fn client_options(&self) -> ClientOptions {
        let options = ClientOptions::default();
        match &self.model {
            Some(model) => options.with_model(model.clone()),
            None => options,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            provider: get("LLM_PROVIDER"),
            gemini_api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            openai_api_key: get("OPENAI_API_KEY"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            model: get("LLM_MODEL"),
            env: get("ENV"),
        }
    }

    /// Unset or unrecognised `ENV` means dev
    pub fn log_profile(&self) -> LogProfile {
        match self.env.as_deref().map(str::trim) {
            Some(env) if env.eq_ignore_ascii_case("prod") => LogProfile::Prod,
            _ => LogProfile::Dev,
        }
    }

    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Gemini => self.gemini_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Claude => self.anthropic_api_key.as_deref(),
        }
    }

    /// Pick the provider (`cli_override` beats `LLM_PROVIDER`) and check that
    /// a credential exists for it.
    pub fn resolve(&self, cli_override: Option<&str>) -> Result<ResolvedProvider> {
        let name = cli_override
            .filter(|name| !name.trim().is_empty())
            .or(self.provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER);
        let provider: Provider = name.parse()?;

        let api_key = self.api_key(provider).ok_or_else(|| {
            ScriptportError::config_with_code(
                ErrorCode::CONFIG_MISSING_CREDENTIAL,
                format!(
                    "{} environment variable is not set for provider '{}'",
                    credential_variable(provider),
                    provider
                ),
            )
        })?;

        Ok(ResolvedProvider {
            provider,
            api_key: api_key.to_string(),
            model: self.model.clone(),
        })
    }
}

/// Name of the variable a user should set for `provider`
pub fn credential_variable(provider: Provider) -> &'static str {
    match provider {
        Provider::Gemini => "GEMINI_API_KEY (or API_KEY)",
        Provider::OpenAi => "OPENAI_API_KEY",
        Provider::Claude => "ANTHROPIC_API_KEY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_to_gemini() {
        let resolved = config(&[("GEMINI_API_KEY", "g-key")]).resolve(None).unwrap();
        assert_eq!(resolved.provider, Provider::Gemini);
        assert_eq!(resolved.api_key, "g-key");
        assert_eq!(resolved.model, None);
    }

    #[test]
    fn test_legacy_api_key_fallback() {
        let cfg = config(&[("API_KEY", "legacy")]);
        assert_eq!(cfg.api_key(Provider::Gemini), Some("legacy"));

        let cfg = config(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "new")]);
        assert_eq!(cfg.api_key(Provider::Gemini), Some("new"));

        let cfg = config(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "")]);
        assert_eq!(cfg.api_key(Provider::Gemini), Some("legacy"));
    }

    #[test]
    fn test_cli_override_wins() {
        let cfg = config(&[
            ("LLM_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "o-key"),
            ("ANTHROPIC_API_KEY", "a-key"),
        ]);
        assert_eq!(cfg.resolve(None).unwrap().provider, Provider::OpenAi);

        let resolved = cfg.resolve(Some("claude")).unwrap();
        assert_eq!(resolved.provider, Provider::Claude);
        assert_eq!(resolved.api_key, "a-key");
    }

    #[test]
    fn test_unknown_provider() {
        let err = config(&[("LLM_PROVIDER", "mistral")]).resolve(None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_UNKNOWN_PROVIDER);
        assert!(err
            .to_string()
            .contains("invalid provider 'mistral'. Valid providers: gemini, openai, claude"));
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = config(&[("GEMINI_API_KEY", "g-key")])
            .resolve(Some("openai"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_MISSING_CREDENTIAL);
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(err.to_string().contains("'openai'"));

        let err = config(&[]).resolve(None).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY (or API_KEY)"));
    }

    #[test]
    fn test_model_override_and_redaction() {
        let resolved = config(&[("ANTHROPIC_API_KEY", "secret"), ("LLM_MODEL", "claude-x")])
            .resolve(Some("claude"))
            .unwrap();
        assert_eq!(resolved.client_options().model.as_deref(), Some("claude-x"));
        assert!(!format!("{:?}", resolved).contains("secret"));
    }

    #[test]
    fn test_log_profile() {
        assert_eq!(config(&[]).log_profile(), LogProfile::Dev);
        assert_eq!(config(&[("ENV", "prod")]).log_profile(), LogProfile::Prod);
        assert_eq!(config(&[("ENV", "staging")]).log_profile(), LogProfile::Dev);
        assert_eq!(LogProfile::Prod.default_filter(), "info");
    }
}
