pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid outline: {message}")]
    InvalidOutline { message: String },

    #[error("Invalid config section `{section}`: {message}")]
    InvalidConfig { section: String, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
