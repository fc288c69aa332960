pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid config value at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Unknown section: {id}")]
    UnknownSection { id: String },

    #[error("Unknown control `{control}` on widget `{widget}`")]
    UnknownControl { widget: String, control: String },

    #[error("Control `{control}` on widget `{widget}` does not accept {expected}")]
    ControlInput {
        widget: String,
        control: String,
        expected: &'static str,
    },
}
