use poem_openapi::Object;

/// Liveness report for the stock ledger service
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// "ok" while the process is accepting requests
    pub status: String,

    /// Version of the running backend
    pub version: String,

    /// Time the report was produced (RFC 3339)
    pub timestamp: String,
}

/// Error body shared by every failing endpoint
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "conflict", "invalid_movement")
    pub error: String,

    /// What went wrong, phrased for the client
    pub message: String,

    /// HTTP status the error maps to
    pub status_code: u16,
}
