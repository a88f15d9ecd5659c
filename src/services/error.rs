#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Generation service unavailable: {0}")]
    Generation(String),

    #[error("Generation service is not configured")]
    GenerationDisabled,

    #[error("Invalid payment payload: {0}")]
    InvalidPaymentPayload(String),
}
