//! Builder API for assembling validated [`Config`] values.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{Config, EndpointRole, Endpoints, Environment, Timeouts, endpoints},
	error::ConfigError,
};

/// Builder for [`Config`] values.
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
	/// Selected environment (defaults to prelive).
	pub environment: Environment,
	/// OAuth client identifier.
	pub client_id: Option<String>,
	/// OAuth client secret.
	pub client_secret: Option<TokenSecret>,
	/// Requested scope.
	pub scope: Option<String>,
	/// Token endpoint path override.
	pub token_path: Option<String>,
	/// Transport deadlines.
	pub timeouts: Timeouts,
	/// Raw endpoint overrides, validated at build time.
	pub endpoint_overrides: Vec<(EndpointRole, String)>,
}
impl ConfigBuilder {
	/// Seeds a builder from `<PREFIX>_*` keys resolved through `lookup`.
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |suffix: &str| {
			lookup(&format!("{prefix}_{suffix}")).filter(|value| !value.trim().is_empty())
		};
		let mut builder = Self::default();

		if let Some(raw) = var("ENVIRONMENT") {
			builder = builder.environment(raw.parse()?);
		}
		if let Some(value) = var("CLIENT_ID") {
			builder = builder.client_id(value);
		}
		if let Some(value) = var("CLIENT_SECRET") {
			builder = builder.client_secret(value);
		}
		if let Some(value) = var("SCOPE") {
			builder = builder.scope(value);
		}
		if let Some(raw) = var("TIMEOUT") {
			builder = builder.timeout(parse_seconds("timeout", &raw)?);
		}
		if let Some(raw) = var("OPEN_TIMEOUT") {
			builder = builder.open_timeout(parse_seconds("open_timeout", &raw)?);
		}
		if let Some(raw) = var("READ_TIMEOUT") {
			builder = builder.read_timeout(parse_seconds("read_timeout", &raw)?);
		}

		Ok(builder)
	}

	/// Selects the environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Sets the OAuth client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(client_secret));

		self
	}

	/// Sets the scope requested with each acquisition.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the token endpoint path (defaults to [`Config::DEFAULT_TOKEN_PATH`]).
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.token_path = Some(path.into());

		self
	}

	/// Sets the overall per-request deadline.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeouts.request = timeout;

		self
	}

	/// Sets the connection deadline.
	pub fn open_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeouts.connect = timeout;

		self
	}

	/// Sets the read deadline.
	pub fn read_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeouts.read = timeout;

		self
	}

	/// Points `role` at a custom base URL instead of the environment default.
	pub fn endpoint(mut self, role: EndpointRole, url: impl Into<String>) -> Self {
		self.endpoint_overrides.push((role, url.into()));

		self
	}

	/// Validates the settings and produces a [`Config`].
	pub fn build(self) -> Result<Config, ConfigError> {
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingField { field: "client_id" })?;
		let client_secret = self
			.client_secret
			.filter(|value| !value.is_blank())
			.ok_or(ConfigError::MissingField { field: "client_secret" })?;
		let scope = self
			.scope
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingField { field: "scope" })?;

		validate_timeout("timeout", self.timeouts.request)?;
		validate_timeout("open_timeout", self.timeouts.connect)?;
		validate_timeout("read_timeout", self.timeouts.read)?;

		let mut endpoints = Endpoints::for_environment(self.environment)?;

		for (role, raw) in &self.endpoint_overrides {
			endpoints = endpoints.with(*role, endpoints::parse_base(*role, raw)?);
		}

		Ok(Config {
			environment: self.environment,
			client_id,
			client_secret,
			scope,
			endpoints,
			token_path: self.token_path.unwrap_or_else(|| Config::DEFAULT_TOKEN_PATH.into()),
			timeouts: self.timeouts,
		})
	}
}

fn parse_seconds(field: &'static str, raw: &str) -> Result<StdDuration, ConfigError> {
	raw.trim()
		.parse::<u64>()
		.ok()
		.filter(|secs| *secs > 0)
		.map(StdDuration::from_secs)
		.ok_or_else(|| ConfigError::InvalidTimeout { field, value: raw.to_owned() })
}

fn validate_timeout(field: &'static str, value: StdDuration) -> Result<(), ConfigError> {
	if value.is_zero() {
		Err(ConfigError::InvalidTimeout { field, value: "0".into() })
	} else {
		Ok(())
	}
}
