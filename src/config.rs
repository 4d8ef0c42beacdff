//! Client configuration: environment selection, endpoint tables, credentials, and timeouts.
//!
//! [`Config`] is immutable once built. Construct it with [`Config::builder`] or
//! [`Config::from_env`] at startup and hand it to
//! [`TokenProvider::new`](crate::provider::TokenProvider::new) and
//! [`Client::new`](crate::client::Client::new); nothing in the crate keeps a process-wide default
//! instance.

pub mod builder;
pub mod endpoints;

pub use builder::*;
pub use endpoints::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Deployment environment selecting the endpoint table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	/// Sandbox environment used for integration work.
	#[default]
	Prelive,
	/// Live environment.
	Production,
}
impl Environment {
	/// Returns the canonical lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Prelive => "prelive",
			Self::Production => "production",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"prelive" => Ok(Self::Prelive),
			"production" => Ok(Self::Production),
			_ => Err(ConfigError::InvalidEnvironment { value: s.to_owned() }),
		}
	}
}

/// Transport deadlines applied by the HTTP layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
	/// Overall deadline for a single request, applied per call.
	pub request: StdDuration,
	/// Deadline for establishing the connection.
	pub connect: StdDuration,
	/// Deadline for each read from an established connection.
	pub read: StdDuration,
}
impl Timeouts {
	/// Default overall request deadline.
	pub const DEFAULT_REQUEST: StdDuration = StdDuration::from_secs(30);
	/// Default connection deadline.
	pub const DEFAULT_CONNECT: StdDuration = StdDuration::from_secs(10);
	/// Default read deadline.
	pub const DEFAULT_READ: StdDuration = StdDuration::from_secs(30);
}
impl Default for Timeouts {
	fn default() -> Self {
		Self {
			request: Self::DEFAULT_REQUEST,
			connect: Self::DEFAULT_CONNECT,
			read: Self::DEFAULT_READ,
		}
	}
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct Config {
	/// Selected environment.
	pub environment: Environment,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Scope requested with every token acquisition.
	pub scope: String,
	/// Resolved endpoint table.
	pub endpoints: Endpoints,
	/// Path of the token endpoint relative to the auth base URL.
	pub token_path: String,
	/// Transport deadlines.
	pub timeouts: Timeouts,
}
impl Config {
	/// Default token endpoint path on the auth host.
	pub const DEFAULT_TOKEN_PATH: &'static str = "/tokens";

	/// Creates an empty builder.
	pub fn builder() -> ConfigBuilder {
		ConfigBuilder::default()
	}

	/// Loads settings from `<PREFIX>_*` environment variables.
	///
	/// Recognized suffixes: `ENVIRONMENT`, `CLIENT_ID`, `CLIENT_SECRET`, `SCOPE`, `TIMEOUT`,
	/// `OPEN_TIMEOUT`, and `READ_TIMEOUT` (timeouts in whole seconds).
	pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
		ConfigBuilder::from_lookup(prefix, |key| std::env::var(key).ok())?.build()
	}

	/// Fails unless the client targets `required`; used to gate environment-restricted operations.
	pub fn ensure_environment(
		&self,
		required: Environment,
		operation: impl Into<String>,
	) -> Result<(), ConfigError> {
		if self.environment == required {
			Ok(())
		} else {
			Err(ConfigError::EnvironmentMismatch {
				operation: operation.into(),
				required,
				current: self.environment,
			})
		}
	}

	/// Returns the base URL for `role`.
	pub fn base_url(&self, role: EndpointRole) -> &Url {
		self.endpoints.get(role)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(environment: Environment) -> Config {
		Config::builder()
			.environment(environment)
			.client_id("client")
			.client_secret("secret")
			.scope("im-au-10/scope:*:*")
			.build()
			.expect("Config fixture should build.")
	}

	#[test]
	fn environment_parses_case_insensitively() {
		assert_eq!("prelive".parse::<Environment>().ok(), Some(Environment::Prelive));
		assert_eq!(" Production ".parse::<Environment>().ok(), Some(Environment::Production));
		assert!(matches!(
			"staging".parse::<Environment>(),
			Err(ConfigError::InvalidEnvironment { value }) if value == "staging"
		));
	}

	#[test]
	fn ensure_environment_gates_operations() {
		let prelive = config(Environment::Prelive);
		let production = config(Environment::Production);

		assert!(prelive.ensure_environment(Environment::Prelive, "simulate_deposit").is_ok());

		let err = production
			.ensure_environment(Environment::Prelive, "simulate_deposit")
			.expect_err("Prelive-only operations should be rejected in production.");

		assert_eq!(
			err.to_string(),
			"`simulate_deposit` is only available in the prelive environment (current: production)."
		);
	}

	#[test]
	fn base_url_follows_environment() {
		assert_eq!(
			config(Environment::Production).base_url(EndpointRole::Core).as_str(),
			"https://secure.api.promisepay.com/"
		);
		assert_eq!(
			config(Environment::Prelive).base_url(EndpointRole::Auth).as_str(),
			"https://au-0000.sandbox.auth.assemblypay.com/"
		);
	}
}
