use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("animation has no atlas texture")]
    MissingTexture,

    #[error("no sprite name matches a static pattern")]
    NoStaticSprite,

    #[error("video encoder failed: {detail}")]
    EncoderFailure { detail: String },

    #[error("unknown animation type '{value}'")]
    UnknownAnimationType { value: String },

    #[error("image error: {0}")]
    Image(String),

    #[error(transparent)]
    Anm(#[from] anm2d::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Static-sprite discovery exhausting every pattern is an expected
    /// not-found, unlike the other variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::NoStaticSprite)
    }
}
