use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForkerError {
    #[error("Process creation failed: {0}")]
    ProcessCreationFailed(#[source] nix::Error),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Event serialization error: {0}")]
    Event(#[from] serde_json::Error),
}

impl ForkerError {
    /// True when the split itself failed and no branch ran.
    pub fn is_creation_failure(&self) -> bool {
        matches!(self, ForkerError::ProcessCreationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, ForkerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn test_creation_failure_message_names_errno() {
        let err = ForkerError::ProcessCreationFailed(Errno::EAGAIN);
        assert!(err.is_creation_failure());
        assert!(err.to_string().starts_with("Process creation failed:"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ForkerError = io.into();
        assert!(!err.is_creation_failure());
        assert!(err.to_string().contains("closed"));
    }
}
