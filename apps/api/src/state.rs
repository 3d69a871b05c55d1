use crate::service::ApodService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Long-lived pipeline; its collaborators are shared across concurrent requests.
    pub apod: ApodService,
}
