//! Response classification: status predicates, payload extraction, and status → error mapping.
//!
//! A [`Response`] only exists for successful calls. [`Response::new`] raises the mapped
//! [`ApiError`] for any non-2xx status, so callers never hold a wrapper with failure semantics
//! hidden inside it.

// crates.io
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::ApiError,
	http::{self, RawResponse},
};

/// Top-level keys, in priority order, under which resource families nest their payload.
///
/// A resource family missing from this list still works, but [`Response::data`] falls back to the
/// whole body for it.
pub const DATA_KEYS: &[&str] = &[
	"webhooks",
	"users",
	"items",
	"fees",
	"transactions",
	"batch_transactions",
	"bpay_accounts",
	"bank_accounts",
	"card_accounts",
	"wallet_accounts",
	"virtual_accounts",
	"routing_number",
	"disbursements",
	"companies",
];

/// Successful response of a single call.
#[derive(Clone, Debug)]
pub struct Response {
	status: u16,
	headers: HeaderMap,
	body: Value,
}
impl Response {
	/// Classifies a completed call, returning the mapped [`Error::Api`] unless the status is 2xx.
	pub fn new(status: u16, headers: HeaderMap, body: Value) -> Result<Self> {
		let response = Self { status, headers, body };

		if response.success() {
			return Ok(response);
		}

		let message = error_message(response.status, &response.body);
		let retry_after = http::parse_retry_after(&response.headers);

		Err(ApiError::from_response(response.status, message, response.body)
			.with_retry_after(retry_after)
			.into())
	}

	/// Classifies a buffered transport response.
	pub fn from_raw(raw: RawResponse) -> Result<Self> {
		let body = raw.decoded_body();

		Self::new(raw.status, raw.headers, body)
	}

	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Full decoded body.
	pub fn body(&self) -> &Value {
		&self.body
	}

	/// Consumes the wrapper, returning the full decoded body.
	pub fn into_body(self) -> Value {
		self.body
	}

	/// `true` iff the status is in 200..=299.
	pub fn success(&self) -> bool {
		(200..=299).contains(&self.status)
	}

	/// `true` iff the status is in 400..=499.
	pub fn client_error(&self) -> bool {
		(400..=499).contains(&self.status)
	}

	/// `true` iff the status is in 500..=599.
	pub fn server_error(&self) -> bool {
		(500..=599).contains(&self.status)
	}

	/// Returns the value under the first [`DATA_KEYS`] entry present, else the full body.
	pub fn data(&self) -> &Value {
		self.body
			.as_object()
			.and_then(|object| DATA_KEYS.iter().find_map(|key| object.get(*key)))
			.unwrap_or(&self.body)
	}

	/// Returns the `meta` member when the body is an object.
	pub fn meta(&self) -> Option<&Value> {
		self.body.as_object().and_then(|object| object.get("meta"))
	}

	/// Retry-After hint, when the server sent one.
	pub fn retry_after(&self) -> Option<Duration> {
		http::parse_retry_after(&self.headers)
	}

	/// Deserializes [`data`](Self::data) into `T`.
	pub fn data_as<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.data()).map_err(|e| {
			ApiError::request(format!(
				"response payload could not be decoded at `{}`: {}",
				e.path(),
				e.inner()
			))
			.into()
		})
	}
}

/// Picks the most specific failure message available in `body`.
fn error_message(status: u16, body: &Value) -> String {
	let Some(object) = body.as_object() else {
		return format!("HTTP {status}");
	};

	["error", "message"]
		.iter()
		.find_map(|key| object.get(*key).and_then(render_scalar))
		.or_else(|| object.get("errors").and_then(render_errors))
		.unwrap_or_else(|| format!("HTTP {status}"))
}

fn render_scalar(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) if text.is_empty() => None,
		Value::String(text) => Some(text.clone()),
		other => Some(other.to_string()),
	}
}

fn render_errors(errors: &Value) -> Option<String> {
	let rendered = match errors {
		Value::Array(items) => join(items),
		Value::Object(fields) => fields
			.iter()
			.map(|(key, value)| match value {
				Value::Array(items) => format!("{key}: {}", join(items)),
				other => format!("{key}: {}", render_scalar(other).unwrap_or_default()),
			})
			.collect::<Vec<_>>()
			.join(", "),
		other => render_scalar(other)?,
	};

	(!rendered.is_empty()).then_some(rendered)
}

fn join(items: &[Value]) -> String {
	items.iter().filter_map(render_scalar).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	use serde_json::json;
	// self
	use super::*;
	use crate::error::ApiErrorKind;

	fn respond(status: u16, body: Value) -> Result<Response> {
		Response::new(status, HeaderMap::new(), body)
	}

	fn api_error(result: Result<Response>) -> ApiError {
		match result {
			Err(Error::Api(e)) => e,
			other => panic!("Expected an API error, got {other:?}."),
		}
	}

	#[test]
	fn success_statuses_produce_wrappers() {
		for status in [200, 201, 204, 299] {
			let response = respond(status, Value::Null).expect("2xx should succeed.");

			assert!(response.success());
			assert!(!response.client_error());
			assert!(!response.server_error());
		}
	}

	#[test]
	fn failing_statuses_map_to_kinds_and_messages() {
		let cases = [
			(400, ApiErrorKind::BadRequest),
			(401, ApiErrorKind::Unauthorized),
			(403, ApiErrorKind::Forbidden),
			(404, ApiErrorKind::NotFound),
			(422, ApiErrorKind::Validation),
			(429, ApiErrorKind::RateLimit),
			(500, ApiErrorKind::Server),
			(502, ApiErrorKind::Server),
			(409, ApiErrorKind::Other),
			(302, ApiErrorKind::Other),
		];

		for (status, kind) in cases {
			let message = format!("failure {status}");
			let err = api_error(respond(status, json!({ "error": message })));

			assert_eq!(err.kind, kind, "status {status}");
			assert_eq!(err.status, Some(status));
			assert_eq!(err.message, message);
			assert_eq!(err.body, Some(json!({ "error": message })));
		}
	}

	#[test]
	fn message_prefers_error_then_message_then_errors() {
		assert_eq!(
			api_error(respond(400, json!({ "error": "first", "message": "second" }))).message,
			"first"
		);
		assert_eq!(api_error(respond(400, json!({ "message": "second" }))).message, "second");
		assert_eq!(
			api_error(respond(422, json!({ "errors": ["too short", "too long"] }))).message,
			"too short, too long"
		);
		assert_eq!(
			api_error(respond(
				422,
				json!({ "errors": { "email": ["is invalid", "is taken"], "name": "is blank" } })
			))
			.message,
			"email: is invalid, is taken, name: is blank"
		);
		assert_eq!(api_error(respond(500, json!({ "errors": [] }))).message, "HTTP 500");
		assert_eq!(api_error(respond(503, json!("Service Unavailable"))).message, "HTTP 503");
		assert_eq!(api_error(respond(404, Value::Null)).message, "HTTP 404");
	}

	#[test]
	fn rate_limit_carries_retry_after() {
		let mut headers = HeaderMap::new();

		headers.insert("retry-after", HeaderValue::from_static("30"));

		let err = api_error(Response::new(429, headers, json!({ "message": "slow down" })));

		assert_eq!(err.kind, ApiErrorKind::RateLimit);
		assert_eq!(err.retry_after, Some(Duration::seconds(30)));
	}

	#[test]
	fn data_extracts_known_key() {
		let response =
			respond(200, json!({ "users": { "id": "u1" } })).expect("Response should succeed.");

		assert_eq!(response.data(), &json!({ "id": "u1" }));
	}

	#[test]
	fn data_follows_key_priority() {
		let response = respond(200, json!({ "items": [{ "id": "i1" }], "users": { "id": "u1" } }))
			.expect("Response should succeed.");

		assert_eq!(response.data(), &json!({ "id": "u1" }));
	}

	#[test]
	fn data_falls_back_to_full_body_for_unknown_keys() {
		let body = json!({ "payment_requests": [{ "id": "p1" }], "meta": { "total": 1 } });
		let response = respond(200, body.clone()).expect("Response should succeed.");

		assert_eq!(response.data(), &body);
		assert_eq!(response.meta(), Some(&json!({ "total": 1 })));

		let scalar = respond(204, Value::Null).expect("Response should succeed.");

		assert_eq!(scalar.data(), &Value::Null);
		assert_eq!(scalar.meta(), None);
	}

	#[test]
	fn data_as_decodes_typed_payload() {
		#[derive(Debug, Deserialize, PartialEq)]
		struct User {
			id: String,
		}

		let response =
			respond(200, json!({ "users": { "id": "u1" } })).expect("Response should succeed.");

		assert_eq!(response.data_as::<User>().expect("Typed decode should succeed."), User {
			id: "u1".into()
		});

		let bad = respond(200, json!({ "users": { "id": 7 } })).expect("Response should succeed.");
		let err = bad.data_as::<User>().expect_err("Mistyped payloads should fail.");

		assert!(matches!(&err, Error::Api(e) if e.kind == ApiErrorKind::Other));
		assert!(err.to_string().contains("id"));
	}
}
