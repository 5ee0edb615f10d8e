use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    /// Missing or malformed request field. The message is a fixed string so
    /// cached idempotent failures replay byte-identically.
    InvalidInput(&'static str),
    RoomNotFound(Ulid),
    BookingNotFound(Ulid),
    /// Another confirmed booking occupies the window.
    Conflict(Ulid),
    /// The idempotency key is locked by an in-flight request.
    RequestInProgress,
    TooLateToCancel(Ulid),
    DuplicateName(String),
    Internal(String),
}

impl EngineError {
    /// Transport-facing status code, mirroring what the shell sends and what
    /// the idempotency coordinator caches alongside the body.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::InvalidInput(_) => 400,
            EngineError::RoomNotFound(_) => 404,
            EngineError::BookingNotFound(_) => 404,
            EngineError::Conflict(_) => 409,
            EngineError::RequestInProgress => 409,
            EngineError::TooLateToCancel(_) => 400,
            EngineError::DuplicateName(_) => 400,
            EngineError::Internal(_) => 500,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "{msg}"),
            EngineError::RoomNotFound(id) => write!(f, "room not found: {id}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::Conflict(id) => {
                write!(f, "room is already booked for this time slot: {id}")
            }
            EngineError::RequestInProgress => write!(f, "request in progress"),
            EngineError::TooLateToCancel(id) => {
                write!(f, "cannot cancel booking {id} this close to its start time")
            }
            EngineError::DuplicateName(name) => {
                write!(f, "room with this name already exists: {name}")
            }
            EngineError::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
