//! Client-wide error taxonomy shared by the token provider, request executor, and response
//! classifier.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Callers are expected to branch on the variant: retry on rate limits, server errors, timeouts,
/// and connection failures ([`Error::is_retryable`]); surface validation messages to end users;
/// treat [`Error::Auth`] and [`Error::Config`] as terminal.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential acquisition failed (transport failure or unusable token endpoint response).
	#[error("Authentication failed: {message}.")]
	Auth {
		/// Diagnostic message, including the underlying transport message when present.
		message: String,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// An overall, connect, or read deadline expired.
	#[error("Request timed out: {message}.")]
	Timeout {
		/// Underlying transport message.
		message: String,
	},
	/// The connection could not be established or was dropped.
	#[error("Connection failed: {message}.")]
	Connection {
		/// Underlying transport message.
		message: String,
	},
	/// Remote API rejected the call, or the request could not be built.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Token store backend failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}
impl Error {
	/// Builds an [`Error::Auth`] from any displayable message.
	pub fn auth(message: impl Display) -> Self {
		Self::Auth { message: message.to_string() }
	}

	/// Returns the API error kind when this is an [`Error::Api`].
	pub fn api_kind(&self) -> Option<ApiErrorKind> {
		match self {
			Self::Api(e) => Some(e.kind),
			_ => None,
		}
	}

	/// Returns `true` when a manual retry may succeed.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Timeout { .. } | Self::Connection { .. } => true,
			Self::Api(e) => e.kind.is_retryable(),
			Self::Auth { .. } | Self::Config(_) | Self::Storage(_) => false,
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required setting was not supplied.
	#[error("Missing required setting `{field}`.")]
	MissingField {
		/// Setting name.
		field: &'static str,
	},
	/// Environment selector is not one of the supported values.
	#[error("Unknown environment `{value}`; expected `prelive` or `production`.")]
	InvalidEnvironment {
		/// Rejected value.
		value: String,
	},
	/// Endpoint override cannot be parsed as a URL.
	#[error("Endpoint `{role}` is not a valid URL.")]
	InvalidEndpoint {
		/// Endpoint role label.
		role: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Timeout setting cannot be parsed or is zero.
	#[error("Timeout `{field}` must be a positive number of seconds, got `{value}`.")]
	InvalidTimeout {
		/// Setting name.
		field: &'static str,
		/// Rejected value.
		value: String,
	},
	/// Operation is only available in another environment.
	#[error("`{operation}` is only available in the {required} environment (current: {current}).")]
	EnvironmentMismatch {
		/// Operation label supplied by the caller.
		operation: String,
		/// Environment the operation requires.
		required: crate::config::Environment,
		/// Environment the client is configured for.
		current: crate::config::Environment,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// API failure kinds derived from the HTTP status of a completed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
	/// HTTP 400.
	BadRequest,
	/// HTTP 401.
	Unauthorized,
	/// HTTP 403.
	Forbidden,
	/// HTTP 404.
	NotFound,
	/// HTTP 422.
	Validation,
	/// HTTP 429.
	RateLimit,
	/// Any HTTP 5xx.
	Server,
	/// Any other failure, including malformed requests that never reached the API.
	Other,
}
impl ApiErrorKind {
	/// Maps a non-success HTTP status onto its error kind.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::BadRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			422 => Self::Validation,
			429 => Self::RateLimit,
			500..=599 => Self::Server,
			_ => Self::Other,
		}
	}

	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BadRequest => "bad_request",
			Self::Unauthorized => "unauthorized",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::Validation => "validation",
			Self::RateLimit => "rate_limit",
			Self::Server => "server",
			Self::Other => "other",
		}
	}

	/// Returns `true` for kinds worth retrying manually.
	pub const fn is_retryable(self) -> bool {
		matches!(self, Self::RateLimit | Self::Server)
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure reported by the remote API (or raised while preparing a request for it).
#[derive(Debug, ThisError)]
#[error("API request failed ({kind}): {message}.")]
pub struct ApiError {
	/// Failure kind.
	pub kind: ApiErrorKind,
	/// HTTP status, when the call completed.
	pub status: Option<u16>,
	/// Message extracted from the response body or the transport.
	pub message: String,
	/// Decoded response body, when the call completed.
	pub body: Option<serde_json::Value>,
	/// Retry-After hint from the response headers.
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Builds an error from a completed response.
	pub fn from_response(status: u16, message: impl Into<String>, body: serde_json::Value) -> Self {
		Self {
			kind: ApiErrorKind::from_status(status),
			status: Some(status),
			message: message.into(),
			body: Some(body),
			retry_after: None,
		}
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}

	/// Builds a generic error for a request that could not be prepared or decoded.
	pub fn request(message: impl Into<String>) -> Self {
		Self {
			kind: ApiErrorKind::Other,
			status: None,
			message: message.into(),
			body: None,
			retry_after: None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_table_covers_known_codes() {
		let cases = [
			(400, ApiErrorKind::BadRequest),
			(401, ApiErrorKind::Unauthorized),
			(403, ApiErrorKind::Forbidden),
			(404, ApiErrorKind::NotFound),
			(422, ApiErrorKind::Validation),
			(429, ApiErrorKind::RateLimit),
			(500, ApiErrorKind::Server),
			(503, ApiErrorKind::Server),
			(599, ApiErrorKind::Server),
			(409, ApiErrorKind::Other),
			(302, ApiErrorKind::Other),
		];

		for (status, kind) in cases {
			assert_eq!(ApiErrorKind::from_status(status), kind, "status {status}");
		}
	}

	#[test]
	fn retryable_errors_match_caller_guidance() {
		assert!(Error::Timeout { message: "deadline".into() }.is_retryable());
		assert!(Error::Connection { message: "refused".into() }.is_retryable());
		assert!(Error::from(ApiError::from_response(429, "slow down", serde_json::Value::Null))
			.is_retryable());
		assert!(Error::from(ApiError::from_response(502, "bad gateway", serde_json::Value::Null))
			.is_retryable());
		assert!(!Error::from(ApiError::from_response(422, "invalid", serde_json::Value::Null))
			.is_retryable());
		assert!(!Error::auth("no token").is_retryable());
		assert!(!Error::from(ConfigError::MissingField { field: "client_id" }).is_retryable());
	}

	#[test]
	fn api_error_renders_kind_and_message() {
		let err: Error = ApiError::from_response(404, "User not found", serde_json::Value::Null).into();

		assert_eq!(err.api_kind(), Some(ApiErrorKind::NotFound));
		assert_eq!(err.to_string(), "API request failed (not_found): User not found.");
	}

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = crate::store::StoreError::Backend { message: "cache unreachable".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.to_string().contains("cache unreachable"));

		let source = std::error::Error::source(&err)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
