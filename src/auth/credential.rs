//! Immutable bearer credential and its validity window.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Margin subtracted from the declared lifetime so a credential is treated as expired before the
/// issuer invalidates it.
pub const EXPIRY_BUFFER: Duration = Duration::seconds(60);
/// Lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_LIFETIME: Duration = Duration::seconds(3600);
/// Scheme label assumed when the token endpoint omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Bearer credential issued by a successful client-credentials exchange.
///
/// Values are never mutated; a refresh produces a new credential that supersedes the cached one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Opaque bearer value; callers must avoid logging it.
	pub value: TokenSecret,
	/// Scheme label placed before the value in the `Authorization` header.
	pub token_type: String,
	/// Instant the credential was received.
	pub issued_at: OffsetDateTime,
	/// Instant after which the credential must not be presented.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential whose expiry is `issued_at + lifetime - EXPIRY_BUFFER`.
	///
	/// Lifetimes no longer than twice the buffer keep half of their length instead, so a freshly
	/// issued credential is always valid at `issued_at`.
	pub fn new(
		value: impl Into<TokenSecret>,
		token_type: impl Into<String>,
		issued_at: OffsetDateTime,
		lifetime: Duration,
	) -> Self {
		let buffer = EXPIRY_BUFFER.min(lifetime / 2);

		Self::with_expiry(value, token_type, issued_at, issued_at + lifetime - buffer)
	}

	/// Creates a credential with an explicit expiry instant (rehydrating from a shared store).
	pub fn with_expiry(
		value: impl Into<TokenSecret>,
		token_type: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_at: OffsetDateTime,
	) -> Self {
		Self { value: value.into(), token_type: token_type.into(), issued_at, expires_at }
	}

	/// Returns `true` if the credential may be presented at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Returns `true` if the credential may be presented now.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("value", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
