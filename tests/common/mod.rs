//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::{net::TcpListener, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
// self
use oauth2_api_client::config::{Config, ConfigBuilder, EndpointRole};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const SCOPE: &str = "im-au-00/it-scope";

/// Builder with every endpoint role pointed at `server`.
///
/// The core and virtual-account roles get distinct path prefixes so routing can be asserted.
pub fn builder(server: &MockServer) -> ConfigBuilder {
	Config::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.scope(SCOPE)
		.endpoint(EndpointRole::Auth, server.base_url())
		.endpoint(EndpointRole::Core, server.url("/core"))
		.endpoint(EndpointRole::VirtualAccount, server.url("/va"))
}

pub fn config(server: &MockServer) -> Config {
	builder(server).build().expect("Integration config should build.")
}

pub fn config_with_timeout(server: &MockServer, timeout: StdDuration) -> Config {
	builder(server).timeout(timeout).build().expect("Integration config should build.")
}

pub fn token_body(token: &str, expires_in: u64) -> String {
	format!("{{\"access_token\":\"{token}\",\"token_type\":\"Bearer\",\"expires_in\":{expires_in}}}")
}

/// Registers a token endpoint that always issues `token`.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = token_body(token, 3600);

	server
		.mock_async(|when, then| {
			when.method(POST).path("/tokens");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Returns a base URL on which nothing is listening.
pub fn unused_base_url() -> String {
	let listener =
		TcpListener::bind("127.0.0.1:0").expect("Binding an ephemeral port should succeed.");
	let port = listener.local_addr().expect("Ephemeral listener should have an address.").port();

	drop(listener);

	format!("http://127.0.0.1:{port}")
}
