//! Configuration for the generation-API gateway.
//!
//! All gateway behaviour is controlled through [`GatewayConfig`], built via
//! its [`GatewayConfigBuilder`]. The API key and endpoint are explicit
//! fields injected at construction — never read from process environment at
//! module load — so tests can substitute fixtures without process-wide
//! environment mutation. [`GatewayConfig::from_env`] exists purely as a
//! convenience for binaries.

use crate::error::CoachError;

/// Default public base URL of the generation API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier for both the feedback and extraction passes.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-exp-0827";

/// Configuration for a [`crate::pipeline::gateway::GeminiGateway`].
///
/// Built via [`GatewayConfig::builder()`].
///
/// # Example
/// ```rust
/// use cv_coach::GatewayConfig;
///
/// let config = GatewayConfig::builder("my-api-key")
///     .model("gemini-1.5-pro")
///     .temperature(0.7)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// API key appended as the `key` query parameter on every request.
    pub api_key: String,

    /// Base URL of the API, without trailing slash. Default: [`DEFAULT_API_BASE`].
    ///
    /// Overridable so tests can point the gateway at a local fixture server.
    pub api_base: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature. Default: 1.0.
    ///
    /// Feedback is meant to read like a human reviewer, so the default sits
    /// at the model's natural setting rather than a low transcription-style
    /// value.
    pub temperature: f32,

    /// Top-k sampling bound. Default: 64.
    pub top_k: u32,

    /// Nucleus sampling bound. Default: 0.95.
    pub top_p: f32,

    /// Maximum tokens the model may generate per call. Default: 8192.
    ///
    /// A full CV review plus markdown formatting regularly exceeds 2000
    /// tokens; 8192 leaves headroom without risking runaway output.
    pub max_output_tokens: u32,

    /// System instruction sent with every generation call.
    ///
    /// Defaults to the fixed reviewer persona in [`crate::prompts`]. Set to
    /// `None` to omit the `systemInstruction` block entirely.
    pub system_instruction: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Redact the key: configs get logged at debug level.
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_k", &self.top_k)
            .field("top_p", &self.top_p)
            .field("max_output_tokens", &self.max_output_tokens)
            .field(
                "system_instruction",
                &self.system_instruction.as_deref().map(|s| s.len()),
            )
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new builder seeded with the given API key and defaults.
    pub fn builder(api_key: impl Into<String>) -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: GatewayConfig {
                api_key: api_key.into(),
                api_base: DEFAULT_API_BASE.to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 1.0,
                top_k: 64,
                top_p: 0.95,
                max_output_tokens: 8192,
                system_instruction: Some(crate::prompts::REVIEWER_PERSONA.to_string()),
            },
        }
    }

    /// Build a default config from the `GEMINI_API_KEY` environment variable.
    ///
    /// Convenience for binaries; library users should prefer
    /// [`GatewayConfig::builder`] with an explicit key.
    pub fn from_env() -> Result<Self, CoachError> {
        let key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            CoachError::InvalidConfig(
                "GEMINI_API_KEY is not set.\nExport it or pass the key explicitly.".into(),
            )
        })?;
        Self::builder(key).build()
    }

    /// Full URL of the generation endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        )
    }

    /// Full URL of the raw-file upload endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}/upload/v1beta/files?key={}", self.api_base, self.api_key)
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.config.top_k = k.max(1);
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.top_p = p.clamp(0.0, 1.0);
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn system_instruction(mut self, text: impl Into<String>) -> Self {
        self.config.system_instruction = Some(text.into());
        self
    }

    pub fn no_system_instruction(mut self) -> Self {
        self.config.system_instruction = None;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, CoachError> {
        let c = &self.config;
        if c.api_key.is_empty() {
            return Err(CoachError::InvalidConfig("API key must not be empty".into()));
        }
        if c.api_base.is_empty() {
            return Err(CoachError::InvalidConfig("API base URL must not be empty".into()));
        }
        if c.max_output_tokens == 0 {
            return Err(CoachError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
