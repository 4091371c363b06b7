use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("未登录或会话已过期，请重新登录")]
    SessionExpired,

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("token store error: {0}")]
    TokenStore(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Network and HTTP failures may be answered from mock data. Decode
    /// failures and expired sessions always surface.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory found")]
    NoConfigDir,

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config is not a JSON object")]
    NotAnObject,

    #[error(
        "config_version {found} is newer than this build supports ({supported}). Please update TalentLens."
    )]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}
