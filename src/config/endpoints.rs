//! Endpoint roles and the per-environment base URL tables.

// self
use crate::{_prelude::*, config::Environment, error::ConfigError};

/// Logical API surface a request targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
	/// Core resource API (users, items, accounts, ...).
	#[default]
	Core,
	/// Virtual account API.
	VirtualAccount,
	/// OAuth token issuer.
	Auth,
}
impl EndpointRole {
	/// Every role, in table order.
	pub const ALL: [Self; 3] = [Self::Core, Self::VirtualAccount, Self::Auth];

	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Core => "core",
			Self::VirtualAccount => "virtual_account",
			Self::Auth => "auth",
		}
	}

	const fn default_base(self, environment: Environment) -> &'static str {
		match (environment, self) {
			(Environment::Prelive, Self::Core) => "https://test.api.promisepay.com",
			(Environment::Prelive, Self::VirtualAccount) =>
				"https://sandbox.au-0000.api.assemblypay.com",
			(Environment::Prelive, Self::Auth) => "https://au-0000.sandbox.auth.assemblypay.com",
			(Environment::Production, Self::Core | Self::VirtualAccount) =>
				"https://secure.api.promisepay.com",
			(Environment::Production, Self::Auth) => "https://au-0000.auth.assemblypay.com",
		}
	}
}
impl Display for EndpointRole {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable role → base URL mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
	/// Core resource API base.
	pub core: Url,
	/// Virtual account API base.
	pub virtual_account: Url,
	/// Token issuer base.
	pub auth: Url,
}
impl Endpoints {
	/// Resolves the built-in table for `environment`.
	pub fn for_environment(environment: Environment) -> Result<Self, ConfigError> {
		Ok(Self {
			core: parse_base(EndpointRole::Core, EndpointRole::Core.default_base(environment))?,
			virtual_account: parse_base(
				EndpointRole::VirtualAccount,
				EndpointRole::VirtualAccount.default_base(environment),
			)?,
			auth: parse_base(EndpointRole::Auth, EndpointRole::Auth.default_base(environment))?,
		})
	}

	/// Returns the base URL for `role`.
	pub fn get(&self, role: EndpointRole) -> &Url {
		match role {
			EndpointRole::Core => &self.core,
			EndpointRole::VirtualAccount => &self.virtual_account,
			EndpointRole::Auth => &self.auth,
		}
	}

	/// Returns a copy of the table with `role` pointing at `url`.
	pub fn with(mut self, role: EndpointRole, url: Url) -> Self {
		match role {
			EndpointRole::Core => self.core = url,
			EndpointRole::VirtualAccount => self.virtual_account = url,
			EndpointRole::Auth => self.auth = url,
		}

		self
	}
}

/// Parses a base URL for `role`, reporting the role on failure.
pub(crate) fn parse_base(role: EndpointRole, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { role: role.as_str(), source })
}

/// Appends `path` to `base`, keeping any path prefix the base already carries.
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
	let joined =
		format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'));

	Url::parse(&joined)
}
