use thiserror::Error;

/// Failures talking to the task
/// backend. None of them are fatal;
/// callers log and keep prior state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
  #[error("request to {endpoint} failed: {message}")]
  Transport {
    endpoint: String,
    message:  String
  },
  #[error("{endpoint} responded with status {status}")]
  Status {
    endpoint: String,
    status:   u16
  },
  #[error("failed to decode {endpoint} response: {message}")]
  Decode {
    endpoint: String,
    message:  String
  },
  #[error("backend rejected the request: {message}")]
  Rejected { message: String }
}

impl BackendError {
  pub fn transport(
    endpoint: &str,
    message: impl ToString
  ) -> Self {
    Self::Transport {
      endpoint: endpoint.to_string(),
      message:  message.to_string()
    }
  }

  pub fn decode(
    endpoint: &str,
    message: impl ToString
  ) -> Self {
    Self::Decode {
      endpoint: endpoint.to_string(),
      message:  message.to_string()
    }
  }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreferenceError {
  #[error("preference storage unavailable: {0}")]
  Unavailable(String),
  #[error("failed to persist preference {key}: {message}")]
  Write {
    key:     String,
    message: String
  }
}
