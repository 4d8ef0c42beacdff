//! Client-credentials exchange against the token endpoint.

// crates.io
use reqwest::{Method, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::{Credential, DEFAULT_LIFETIME, DEFAULT_TOKEN_TYPE},
	http::{self, RawResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
	provider::TokenProvider,
};

/// `grant_type` sent with every acquisition.
pub const GRANT_TYPE: &str = "client_credentials";

/// Longest lifetime honored; larger `expires_in` values are clamped to one year.
const MAX_LIFETIME_SECS: i64 = 31_536_000;

/// Token endpoint payload. Issuers have used both `access_token` and `token` for the value.
#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	token: Option<String>,
	#[serde(default)]
	expires_in: Option<Lifetime>,
	#[serde(default)]
	token_type: Option<String>,
}
impl TokenResponse {
	fn into_credential(self, issued_at: OffsetDateTime) -> Result<Credential> {
		let value = self
			.access_token
			.filter(|value| !value.is_empty())
			.or(self.token.filter(|value| !value.is_empty()))
			.ok_or_else(|| Error::auth("token endpoint response did not include an access token"))?;
		let lifetime = match self.expires_in {
			Some(lifetime) => lifetime.to_duration()?,
			None => DEFAULT_LIFETIME,
		};
		let token_type = self
			.token_type
			.filter(|value| !value.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.into());

		Ok(Credential::new(value, token_type, issued_at, lifetime))
	}
}

/// `expires_in` as either a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lifetime {
	Seconds(i64),
	Text(String),
}
impl Lifetime {
	fn to_duration(&self) -> Result<Duration> {
		let secs = match self {
			Self::Seconds(secs) => *secs,
			Self::Text(raw) => raw.trim().parse::<i64>().map_err(|_| {
				Error::auth(format!("token endpoint returned a non-numeric expires_in `{raw}`"))
			})?,
		};

		if secs <= 0 {
			return Err(Error::auth("token endpoint returned a non-positive expires_in"));
		}

		Ok(Duration::seconds(secs.min(MAX_LIFETIME_SECS)))
	}
}

impl TokenProvider {
	/// Performs exactly one client-credentials exchange. Callers must hold the acquisition guard.
	pub(super) async fn acquire(&self) -> Result<Credential> {
		const KIND: OpKind = OpKind::TokenAcquire;

		let span = OpSpan::new(KIND, "acquire");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result: Result<Credential> = span
			.instrument(async move {
				let form = [
					("grant_type", GRANT_TYPE),
					("client_id", self.client_id.as_str()),
					("client_secret", self.client_secret.expose()),
					("scope", self.scope.as_str()),
				];
				let builder = self
					.http
					.request(Method::POST, self.token_url.clone())?
					.header(ACCEPT, "application/json")
					.form(&form);
				let raw = self
					.http
					.dispatch(builder)
					.await
					.map_err(|e| Error::auth(http::describe(&e)))?;
				let credential = parse_token_response(&raw, OffsetDateTime::now_utc())?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					token_type = %credential.token_type,
					expires_at = %credential.expires_at,
					"credential acquired"
				);

				Ok(credential)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}

fn parse_token_response(raw: &RawResponse, issued_at: OffsetDateTime) -> Result<Credential> {
	if !(200..=299).contains(&raw.status) {
		return Err(Error::auth(format!(
			"token endpoint rejected the request: {}",
			rejection_message(raw)
		)));
	}

	let de = &mut serde_json::Deserializer::from_slice(&raw.body);
	let response: TokenResponse = serde_path_to_error::deserialize(de).map_err(|e| {
		Error::auth(format!(
			"token endpoint returned malformed JSON at `{}`: {}",
			e.path(),
			e.inner()
		))
	})?;

	response.into_credential(issued_at)
}

fn rejection_message(raw: &RawResponse) -> String {
	let body = raw.decoded_body();

	["error_description", "error", "message"]
		.iter()
		.find_map(|key| body.get(key).and_then(|value| value.as_str()))
		.map(str::to_owned)
		.unwrap_or_else(|| format!("HTTP {}", raw.status))
}
