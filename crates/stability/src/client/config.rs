use super::consts::{DEFAULT_BASE_URL, DEFAULT_ENGINE};
use secrecy::SecretString;

pub struct Config {
    base_url: String,
    engine: String,
    api_key: SecretString,
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_engine(mut self, engine: &str) -> Self {
        self.config.engine = engine.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // An empty key is only useful for tests; requests will be rejected.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            api_key: SecretString::from(String::new()),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn text_to_image_url(&self) -> String {
        format!(
            "{}/v1/generation/{}/text-to-image",
            self.base_url, self.engine
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.base_url(), "https://api.stability.ai");
        assert_eq!(config.engine(), "stable-diffusion-xl-1024-v1-0");
        assert_eq!(config.api_key().expose_secret(), "");
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .with_base_url("http://localhost:8080/")
            .with_engine("sd-test")
            .with_api_key("sk-123")
            .build();
        assert_eq!(
            config.text_to_image_url(),
            "http://localhost:8080/v1/generation/sd-test/text-to-image"
        );
        assert_eq!(config.api_key().expose_secret(), "sk-123");
    }
}
