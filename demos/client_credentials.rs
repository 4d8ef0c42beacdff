//! Demonstrates the client-credentials provider and request executor against a local mock of the
//! token endpoint and the core API, showing one token exchange reused across calls.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_api_client::{
	client::Client,
	config::{Config, EndpointRole},
	provider::TokenProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/tokens");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let users_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"users\":[{\"id\":\"buyer-1\"},{\"id\":\"seller-1\"}],\"meta\":{\"total\":2}}",
			);
		})
		.await;
	let config = Config::builder()
		.client_id("demo-client")
		.client_secret("super-secret")
		.scope("im-au-00/demo")
		.endpoint(EndpointRole::Auth, server.base_url())
		.endpoint(EndpointRole::Core, server.base_url())
		.build()?;
	let provider = Arc::new(TokenProvider::new(&config)?);
	let client = Client::new(provider.clone(), &config);

	for _ in 0..2 {
		let users = client.get("/users", &[("limit", "10")]).await?;

		println!("Users: {}; meta: {:?}.", users.data(), users.meta());
	}

	println!("Cached token expires at {:?}.", provider.token_expiry().await?);

	token_mock.assert_async().await;
	users_mock.assert_calls_async(2).await;

	Ok(())
}
