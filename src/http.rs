//! Transport primitives shared by token acquisition and API calls.
//!
//! [`HttpClient`] lazily builds one [`ReqwestClient`] per instance with the configured connect
//! and read deadlines, then reuses it for every call; the overall deadline is applied to each
//! request individually. [`map_transport_error`] is the single place where `reqwest` failures
//! are translated into the crate's error taxonomy so raw transport errors never reach callers.

// crates.io
use reqwest::{
	Method, RequestBuilder,
	header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	config::Timeouts,
	error::{ApiError, ConfigError},
};

/// Status, headers, and raw body of a completed HTTP exchange.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Undecoded body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Decodes the body as JSON when the content type says so.
	///
	/// Empty bodies become `null`; non-JSON or undecodable bodies are kept as a JSON string.
	pub fn decoded_body(&self) -> serde_json::Value {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return serde_json::Value::Null;
		}
		if is_json(&self.headers) {
			if let Ok(value) = serde_json::from_slice(&self.body) {
				return value;
			}
		}

		serde_json::Value::String(String::from_utf8_lossy(&self.body).into_owned())
	}
}

/// Lazily-built, reusable HTTP transport bound to one set of [`Timeouts`].
///
/// Clones share the underlying connection pool. Build a new instance when a different
/// configuration must be isolated.
#[derive(Clone, Debug)]
pub struct HttpClient {
	timeouts: Timeouts,
	client: Arc<Mutex<Option<ReqwestClient>>>,
}
impl HttpClient {
	/// Creates a transport that builds its [`ReqwestClient`] on first use.
	pub fn new(timeouts: Timeouts) -> Self {
		Self { timeouts, client: Default::default() }
	}

	/// Wraps an existing [`ReqwestClient`]; connect/read deadlines configured on it are kept.
	pub fn with_client(client: ReqwestClient, timeouts: Timeouts) -> Self {
		Self { timeouts, client: Arc::new(Mutex::new(Some(client))) }
	}

	/// Returns the configured deadlines.
	pub fn timeouts(&self) -> Timeouts {
		self.timeouts
	}

	/// Starts a request with the overall deadline applied.
	pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
		Ok(self.client()?.request(method, url).timeout(self.timeouts.request))
	}

	/// Sends `builder` and buffers the response.
	///
	/// Errors are returned untranslated so each caller can classify them for its own context.
	pub async fn dispatch(&self, builder: RequestBuilder) -> Result<RawResponse, ReqwestError> {
		let response = builder.send().await?;
		let status = response.status().as_u16();
		let headers = response.headers().to_owned();
		let body = response.bytes().await?.to_vec();

		Ok(RawResponse { status, headers, body })
	}

	fn client(&self) -> Result<ReqwestClient> {
		let mut slot = self.client.lock();

		if let Some(client) = slot.as_ref() {
			return Ok(client.clone());
		}

		let client = ReqwestClient::builder()
			.connect_timeout(self.timeouts.connect)
			.read_timeout(self.timeouts.read)
			.build()
			.map_err(ConfigError::http_client_build)?;

		*slot = Some(client.clone());

		Ok(client)
	}
}

/// Translates a transport failure into the client error taxonomy.
///
/// Timeouts win over connection failures because a connect deadline reports both.
pub fn map_transport_error(err: ReqwestError) -> Error {
	let message = describe(&err);

	if err.is_timeout() {
		return Error::Timeout { message };
	}
	if err.is_connect() {
		return Error::Connection { message };
	}
	if err.is_builder() || err.is_decode() {
		return ApiError::request(message).into();
	}

	Error::Connection { message }
}

/// Renders a transport error together with its source chain.
pub(crate) fn describe(err: &(dyn StdError + 'static)) -> String {
	let mut message = err.to_string();
	let mut source = err.source();

	while let Some(inner) = source {
		let text = inner.to_string();

		if !message.contains(&text) {
			message.push_str(": ");
			message.push_str(&text);
		}

		source = inner.source();
	}

	message
}

pub(crate) fn is_json(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.map(|value| value.to_ascii_lowercase().contains("json"))
		.unwrap_or(false)
}

pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
