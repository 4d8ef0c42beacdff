//! Optional observability helpers for token acquisition and API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_api_client.op` with the `op` and
//!   `stage` fields, plus debug/warn events at cache hits, acquisitions, and failures.
//! - Enable `metrics` to increment the `oauth2_api_client_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Client-credentials exchange against the token endpoint.
	TokenAcquire,
	/// Authenticated call against the resource API.
	Request,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenAcquire => "token_acquire",
			OpKind::Request => "request",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `result` for `kind`.
pub(crate) fn record_result<T>(kind: OpKind, result: &Result<T>) {
	match result {
		Ok(_) => record_op_outcome(kind, OpOutcome::Success),
		Err(_e) => {
			#[cfg(feature = "tracing")]
			::tracing::warn!(op = kind.as_str(), error = %_e, "operation failed");

			record_op_outcome(kind, OpOutcome::Failure)
		},
	}
}
