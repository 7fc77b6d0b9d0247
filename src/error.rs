use crate::gl::ShaderStage;

pub type RenderResult<T> = Result<T, RenderError>;

/// Failures of the background pipeline. None of these are fatal to the page:
/// callers log them and leave the drawable blank.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link: {0}")]
    Link(String),

    #[error("could not allocate {0}")]
    Allocation(&'static str),

    #[error("vertex attribute `{0}` not found in program")]
    MissingAttribute(&'static str),

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("invalid options: {0}")]
    Options(String),

    #[error("frame host error: {0}")]
    Host(String),

    #[error("driver has been disposed")]
    Disposed,

    #[error("{width}x{height} poster does not fit in memory")]
    PosterTooLarge { width: u32, height: u32 },
}

impl RenderError {
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    pub fn options(msg: impl Into<String>) -> Self {
        Self::Options(msg.into())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    #[error("unknown locale `{0}`")]
    UnknownLocale(String),
}
