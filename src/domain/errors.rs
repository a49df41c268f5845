use derive_more::Display;

/// Failure of a single price lookup. Contained at the symbol level and
/// retried implicitly on the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum FetchError {
    /// Connection failure or request timeout
    #[display(fmt = "HTTP request failed: {}", _0)]
    Transport(String),
    /// Non-2xx status; the body is kept verbatim for diagnostics
    #[display(fmt = "API error: {} - {}", status, body)]
    Protocol { status: u16, body: String },
    #[display(fmt = "JSON parse error: {}", _0)]
    Decode(String),
    #[display(fmt = "invalid price format: {}", _0)]
    Value(String),
}

impl FetchError {
    pub fn timeout(after_ms: u128) -> Self {
        FetchError::Transport(format!("request timed out after {after_ms}ms"))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Protocol { .. } => "protocol",
            FetchError::Decode(_) => "decode",
            FetchError::Value(_) => "value",
        }
    }
}

impl std::error::Error for FetchError {}

/// Snapshot load/save failures. Never fatal: a bad load falls back to fresh
/// state and a bad save is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PersistenceError {
    #[display(fmt = "failed to load state: {}", _0)]
    Load(String),
    #[display(fmt = "failed to save state: {}", _0)]
    Save(String),
    #[display(fmt = "failed to decode state data: {}", _0)]
    Codec(String),
}

impl std::error::Error for PersistenceError {}

/// Fatal problems detected while bringing the dashboard up
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StartupError {
    #[display(fmt = "canvas element unavailable: {}", _0)]
    CanvasUnavailable(String),
    #[display(fmt = "2D rendering context unavailable: {}", _0)]
    ContextUnavailable(String),
    #[display(fmt = "invalid configuration: {}", _0)]
    InvalidConfig(String),
}

impl std::error::Error for StartupError {}

/// Root error type for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AppError {
    #[display(fmt = "Fetch Error: {}", _0)]
    Fetch(FetchError),
    #[display(fmt = "Persistence Error: {}", _0)]
    Persistence(PersistenceError),
    #[display(fmt = "Startup Error: {}", _0)]
    Startup(StartupError),
}

impl std::error::Error for AppError {}

impl From<FetchError> for AppError {
    fn from(error: FetchError) -> Self {
        AppError::Fetch(error)
    }
}

impl From<PersistenceError> for AppError {
    fn from(error: PersistenceError) -> Self {
        AppError::Persistence(error)
    }
}

impl From<StartupError> for AppError {
    fn from(error: StartupError) -> Self {
        AppError::Startup(error)
    }
}

impl AppError {
    /// Only startup problems abort the dashboard
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Startup(_))
    }
}
