use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that can end a relay run is classified by one of these
/// kinds. Each kind maps to a stable error code used in the one-line
/// diagnostic printed by the CLI and in structured log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    /// A required setting (token, repository, PR number) is absent
    MissingConfig,
    /// A setting is present but cannot be used (bad number, bad URL, ...)
    InvalidConfig,

    // Input
    /// A changelog document is not valid YAML
    InvalidDocument,

    // Code host
    /// The code-hosting API answered with a non-success status other than 404
    HostRequestFailed,
    /// The code-hosting API answered with a body we could not decode
    HostResponseInvalid,

    // Webhook delivery
    /// The webhook rejected a chunk with a non-retryable status
    DeliveryRejected,
    /// Transient server errors persisted past the retry budget
    DeliveryExhausted,
    /// The request never produced an HTTP response (DNS, TLS, timeout)
    Transport,

    // Integration/IO
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MissingConfig => "ERR_MISSING_CONFIG",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::HostRequestFailed => "ERR_HOST_REQUEST_FAILED",
            ExErrorKind::HostResponseInvalid => "ERR_HOST_RESPONSE_INVALID",
            ExErrorKind::DeliveryRejected => "ERR_DELIVERY_REJECTED",
            ExErrorKind::DeliveryExhausted => "ERR_DELIVERY_EXHAUSTED",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Io => "ERR_IO",
        }
    }

    /// True for the configuration family, which aborts before any network call
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExErrorKind::MissingConfig | ExErrorKind::InvalidConfig)
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context a
/// reader of a CI log needs: which operation, which file, which HTTP status.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    status: Option<u16>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            status: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the changelog file path the error relates to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add the HTTP status that caused the error
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for relay operations
///
/// Call sites construct these variants and convert them into [`ExError`]
/// with `.into()`, which assigns the kind and stable code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    // ===== Configuration =====
    #[error("{name} is required")]
    MissingConfig { name: String },

    #[error("{name} is invalid: {reason}")]
    InvalidConfig { name: String, reason: String },

    // ===== Documents =====
    #[error("changelog document is not valid YAML: {reason}")]
    InvalidYaml { reason: String },

    // ===== Code host =====
    #[error("request to {endpoint} failed with status {status}")]
    HostStatus { endpoint: String, status: u16 },

    #[error("request to {endpoint} failed: {reason}")]
    HostUnreachable { endpoint: String, reason: String },

    #[error("unexpected response from {endpoint}: {reason}")]
    HostDecode { endpoint: String, reason: String },

    // ===== Webhook =====
    #[error("webhook rejected message with status {status}: {body}")]
    WebhookRejected { status: u16, body: String },

    #[error("webhook kept failing with status {status} after {attempts} attempts")]
    WebhookExhausted { status: u16, attempts: u32 },

    #[error("webhook request failed: {reason}")]
    WebhookTransport { reason: String },
}

impl From<RelayError> for ExError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MissingConfig { ref name } => ExError::new(ExErrorKind::MissingConfig)
                .with_op("load_config")
                .with_message(format!("{} is required", name)),

            RelayError::InvalidConfig {
                ref name,
                ref reason,
            } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(format!("{} is invalid: {}", name, reason)),

            RelayError::InvalidYaml { reason } => ExError::new(ExErrorKind::InvalidDocument)
                .with_op("parse_document")
                .with_message(reason),

            RelayError::HostStatus { endpoint, status } => {
                ExError::new(ExErrorKind::HostRequestFailed)
                    .with_op(endpoint)
                    .with_status(status)
                    .with_message("code host returned a non-success status")
            }

            RelayError::HostUnreachable { endpoint, reason } => {
                ExError::new(ExErrorKind::HostRequestFailed)
                    .with_op(endpoint)
                    .with_message(reason)
            }

            RelayError::HostDecode { endpoint, reason } => {
                ExError::new(ExErrorKind::HostResponseInvalid)
                    .with_op(endpoint)
                    .with_message(reason)
            }

            RelayError::WebhookRejected { status, body } => {
                ExError::new(ExErrorKind::DeliveryRejected)
                    .with_op("send_chunk")
                    .with_status(status)
                    .with_message(if body.is_empty() {
                        "webhook rejected the message".to_string()
                    } else {
                        format!("webhook rejected the message: {}", body)
                    })
            }

            RelayError::WebhookExhausted { status, attempts } => {
                ExError::new(ExErrorKind::DeliveryExhausted)
                    .with_op("send_chunk")
                    .with_status(status)
                    .with_message(format!("gave up after {} attempts", attempts))
            }

            RelayError::WebhookTransport { reason } => ExError::new(ExErrorKind::Transport)
                .with_op("send_chunk")
                .with_message(reason),
        }
    }
}

impl From<serde_yaml::Error> for RelayError {
    fn from(err: serde_yaml::Error) -> Self {
        RelayError::InvalidYaml {
            reason: err.to_string(),
        }
    }
}
