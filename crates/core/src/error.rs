use crate::types::JobId;

/// Error taxonomy shared across the workspace.
///
/// Remote failures carry their own variants so callers classify by tag,
/// never by matching on message text. The `Remote*` variants mirror the
/// failure classes of the hosted generation service.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: JobId },

    #[error("Remote authentication failed: {0}")]
    RemoteAuth(String),

    #[error("Remote service rejected the input: {0}")]
    RemoteUnprocessable(String),

    #[error("Remote service rejected the request: {0}")]
    RemoteBadRequest(String),

    #[error("Remote service rate limited the request: {0}")]
    RemoteRateLimited(String),

    #[error("Remote call timed out: {0}")]
    RemoteTimeout(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::RemoteRateLimited(_) | CoreError::RemoteTimeout(_)
        )
    }

    /// Human-readable message written into the job status row.
    ///
    /// Validation and encoding messages are already user-facing; remote
    /// failures map to fixed texts so the raw provider response never
    /// reaches the user.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Validation(msg) | CoreError::Encoding(msg) => msg.clone(),
            CoreError::NotFound { entity, id } => format!("{entity} {id} not found"),
            CoreError::RemoteAuth(_) => {
                "API key authentication failed. Please check your credentials.".to_string()
            }
            CoreError::RemoteUnprocessable(_) => {
                "Failed to process the image. Please try a different photo and make sure \
                 it is clear and shows a face."
                    .to_string()
            }
            CoreError::RemoteBadRequest(_) => {
                "The generation service rejected the request.".to_string()
            }
            CoreError::RemoteRateLimited(_) => {
                "The generation service is busy right now. Please try again in a few minutes."
                    .to_string()
            }
            CoreError::RemoteTimeout(_) => {
                "Generation timed out. Please try again.".to_string()
            }
            CoreError::Storage(_) => "Failed to store the uploaded images.".to_string(),
            CoreError::Internal(_) => "Failed to generate image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_timeout_are_transient() {
        assert!(CoreError::RemoteRateLimited("429".into()).is_transient());
        assert!(CoreError::RemoteTimeout("deadline".into()).is_transient());
    }

    #[test]
    fn permanent_failures_are_not_transient() {
        assert!(!CoreError::RemoteAuth("401".into()).is_transient());
        assert!(!CoreError::RemoteUnprocessable("no face".into()).is_transient());
        assert!(!CoreError::Validation("too large".into()).is_transient());
    }

    #[test]
    fn unprocessable_message_is_distinct_from_generic() {
        let unprocessable = CoreError::RemoteUnprocessable("no face detected".into());
        let generic = CoreError::Internal("boom".into());
        assert_ne!(unprocessable.user_message(), generic.user_message());
        assert!(unprocessable.user_message().contains("face"));
    }

    #[test]
    fn rate_limit_message_is_distinct_from_permanent_failures() {
        let transient = CoreError::RemoteRateLimited("429".into());
        assert_ne!(
            transient.user_message(),
            CoreError::RemoteAuth("401".into()).user_message()
        );
        assert!(transient.user_message().contains("try again"));
    }

    #[test]
    fn validation_message_passes_through() {
        let err = CoreError::Validation("image exceeds the 5 MB limit".into());
        assert_eq!(err.user_message(), "image exceeds the 5 MB limit");
    }
}
