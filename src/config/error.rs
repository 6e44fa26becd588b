pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to build the 'Environment' from the provided string: {0}")]
    StringToEnvironmentFail(String),
    #[error("the admin api key is empty")]
    EmptyApiKey,
    #[error("invalid cors origin: {0}")]
    InvalidOrigin(String),
    #[error("invalid database url: {0}")]
    InvalidDbUrl(String),
    #[error("config file not found: {0}")]
    MissingFile(String),

    #[error("figment error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        ConfigError::Figment(Box::new(value))
    }
}
