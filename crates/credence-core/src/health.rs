use axum::http::StatusCode;

/// Handler for `GET /healthz` — process liveness only. Readiness usually
/// means "my backing store answers", so each service wires its own `/readyz`
/// handler next to its router.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
