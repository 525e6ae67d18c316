use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub apify: ApifySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_upload_bytes: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_form_bytes: usize,
}

#[derive(Deserialize, Clone)]
pub struct ApifySettings {
    pub base_url: String,
    pub token: String,
    pub actor_id: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_results: u32,
    pub extract_detailed_information: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: usize,
}

// Hand-written so the token never ends up in a log line.
impl std::fmt::Debug for ApifySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifySettings")
            .field("base_url", &self.base_url)
            .field("token", &"[redacted]")
            .field("actor_id", &self.actor_id)
            .field("max_results", &self.max_results)
            .field(
                "extract_detailed_information",
                &self.extract_detailed_information,
            )
            .field("wait_secs", &self.wait_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .finish()
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Reads `configuration/base.yaml`, the file for the current `APP_ENVIRONMENT`
/// and finally `APP_`-prefixed environment variables (`APP_APIFY__TOKEN=...`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.apify.token.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "apify.token must be set (APP_APIFY__TOKEN)".to_string(),
            ));
        }
        if self.apify.page_size == 0 {
            return Err(config::ConfigError::Message(
                "apify.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
