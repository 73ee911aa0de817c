use serde::Serialize;

/// Liveness payload returned by `GET /health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    /// `connected` or `disconnected`, from a live store ping.
    pub database: &'static str,
}
