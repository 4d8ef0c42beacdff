//! Authenticated request executor for the resource API.
//!
//! Each call asks the shared [`TokenProvider`] for a bearer value (which may trigger an
//! acquisition), targets the base URL of the selected [`EndpointRole`], and hands the buffered
//! outcome to [`Response`] for classification. Exactly one HTTP call is made per invocation.

// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	config::{Config, EndpointRole, Endpoints, endpoints},
	error::ApiError,
	http::{self, HttpClient},
	obs::{self, OpKind, OpOutcome, OpSpan},
	provider::TokenProvider,
	response::Response,
};

/// Outbound call description consumed by [`Client::execute`].
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the role's base URL.
	pub path: String,
	/// Query pairs appended to the URL.
	pub query: Vec<(String, String)>,
	/// JSON body.
	pub body: Option<Value>,
}
impl Request {
	/// Creates a request without query or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: None }
	}

	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		let value = serde_json::to_value(body)
			.map_err(|e| ApiError::request(format!("request body could not be encoded: {e}")))?;

		self.body = Some(value);

		Ok(self)
	}
}

/// Request executor bound to one endpoint role.
#[derive(Clone, Debug)]
pub struct Client {
	provider: Arc<TokenProvider>,
	endpoints: Endpoints,
	role: EndpointRole,
	http: HttpClient,
}
impl Client {
	/// Creates a client targeting [`EndpointRole::Core`].
	pub fn new(provider: Arc<TokenProvider>, config: &Config) -> Self {
		Self {
			provider,
			endpoints: config.endpoints.clone(),
			role: EndpointRole::default(),
			http: HttpClient::new(config.timeouts),
		}
	}

	/// Targets another endpoint role.
	pub fn with_role(mut self, role: EndpointRole) -> Self {
		self.role = role;

		self
	}

	/// Replaces the transport (for example to share a connection pool).
	pub fn with_http_client(mut self, http: HttpClient) -> Self {
		self.http = http;

		self
	}

	/// Selected endpoint role.
	pub fn role(&self) -> EndpointRole {
		self.role
	}

	/// Base URL of the selected role.
	pub fn base_url(&self) -> &Url {
		self.endpoints.get(self.role)
	}

	/// Token provider shared by this client.
	pub fn provider(&self) -> &Arc<TokenProvider> {
		&self.provider
	}

	/// Issues `GET path?query`.
	pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
		let request = query
			.iter()
			.fold(Request::new(Method::GET, path), |request, (key, value)| request.query(*key, *value));

		self.execute(request).await
	}

	/// Issues `POST path` with a JSON body.
	pub async fn post<T>(&self, path: &str, body: &T) -> Result<Response>
	where
		T: ?Sized + Serialize,
	{
		self.execute(Request::new(Method::POST, path).json(body)?).await
	}

	/// Issues `PATCH path` with a JSON body.
	pub async fn patch<T>(&self, path: &str, body: &T) -> Result<Response>
	where
		T: ?Sized + Serialize,
	{
		self.execute(Request::new(Method::PATCH, path).json(body)?).await
	}

	/// Issues `DELETE path`.
	pub async fn delete(&self, path: &str) -> Result<Response> {
		self.execute(Request::new(Method::DELETE, path)).await
	}

	/// Executes `request` once and classifies the outcome.
	pub async fn execute(&self, request: Request) -> Result<Response> {
		const KIND: OpKind = OpKind::Request;

		let span = OpSpan::new(KIND, stage(&request.method));

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result: Result<Response> = span
			.instrument(async move {
				let url = endpoints::join_path(self.base_url(), &request.path).map_err(|e| {
					ApiError::request(format!("invalid request path `{}`: {e}", request.path))
				})?;
				let authorization = self.provider.bearer_token().await?;

				#[cfg(feature = "tracing")]
				tracing::debug!(
					method = %request.method,
					%url,
					role = self.role.as_str(),
					"dispatching request"
				);

				let mut builder = self
					.http
					.request(request.method, url)?
					.header(AUTHORIZATION, authorization)
					.header(CONTENT_TYPE, "application/json")
					.header(ACCEPT, "application/json");

				if !request.query.is_empty() {
					builder = builder.query(&request.query);
				}
				if let Some(body) = &request.body {
					builder = builder.json(body);
				}

				let raw = self.http.dispatch(builder).await.map_err(http::map_transport_error)?;

				Response::from_raw(raw)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}
}

fn stage(method: &Method) -> &'static str {
	match *method {
		Method::GET => "get",
		Method::POST => "post",
		Method::PATCH => "patch",
		Method::PUT => "put",
		Method::DELETE => "delete",
		_ => "other",
	}
}
