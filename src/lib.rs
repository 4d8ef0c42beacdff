//! OAuth 2.0 client-credentials API client with single-flight token caching, role-based endpoint
//! routing, and a typed response classifier for multi-region payment REST APIs.
//!
//! ```no_run
//! # async fn demo() -> oauth2_api_client::error::Result<()> {
//! use std::sync::Arc;
//!
//! use oauth2_api_client::{client::Client, config::Config, provider::TokenProvider};
//!
//! let config = Config::builder()
//! 	.client_id("client")
//! 	.client_secret("secret")
//! 	.scope("im-au-00/scope")
//! 	.build()?;
//! let provider = Arc::new(TokenProvider::new(&config)?);
//! let client = Client::new(provider, &config);
//! let users = client.get("/users", &[("limit", "10")]).await?;
//!
//! println!("{}", users.data());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;
pub mod response;
pub mod store;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
