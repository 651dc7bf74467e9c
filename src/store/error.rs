use std::fmt;

/// The store operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Fetch,
  Create,
  Update,
  Delete,
}

impl Operation {
  /// Message shown when the backend failed without saying why.
  pub fn fallback_message(self) -> &'static str {
    match self {
      Self::Fetch => "An error occurred",
      Self::Create => "Create failed",
      Self::Update => "Update failed",
      Self::Delete => "Delete failed",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Fetch => "fetch",
      Self::Create => "create",
      Self::Update => "update",
      Self::Delete => "delete",
    })
  }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The backend rejected the call or could not be reached.
  #[error("{message}")]
  Backend { operation: Operation, message: String },

  #[error("{collection}: malformed row: {source}")]
  Decode {
    collection: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid payload: {0}")]
  Encode(String),

  #[error("{}: backend returned no row", .0.fallback_message())]
  Empty(Operation),
}

impl StoreError {
  pub(crate) fn backend(operation: Operation, err: &anyhow::Error) -> Self {
    let message = err.to_string();
    let message = if message.trim().is_empty() {
      operation.fallback_message().to_string()
    } else {
      message
    };
    Self::Backend { operation, message }
  }
}
