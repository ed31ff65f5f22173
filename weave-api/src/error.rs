// Copyright 2020 The Grin Developers
// Copyright 2024 The Weave Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error kinds a handler can fail with internally (§7). None of these ever
//! escape a handler: [`ErrorKind::response`] is the single place that turns
//! one into the fixed `(status, body)` pair every handler terminates with.

use failure::{Backtrace, Context, Fail};
use hyper::StatusCode;
use std::fmt::{self, Display};

#[derive(Debug)]
pub struct Error {
	inner: Context<ErrorKind>,
}

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	#[fail(display = "{}", _0)]
	Validation(String),
	#[fail(display = "body exceeds the maximum accepted size")]
	OversizedBody,
	#[fail(display = "not found")]
	NotFound,
	#[fail(display = "Pending")]
	Pending,
	#[fail(display = "{}", _0)]
	AlreadyProcessed(String),
	#[fail(display = "banned")]
	Banned,
	#[fail(
		display = "Internal API disabled or invalid internal API secret in request."
	)]
	PrivilegeDenied,
	#[fail(display = "incompatible version")]
	IncompatibleVersion,
	#[fail(display = "{}", _0)]
	Unavailable(String),
	#[fail(display = "Handler timeout")]
	HandlerTimeout,
	#[fail(display = "internal error: {}", _0)]
	Internal(String),
}

impl ErrorKind {
	/// The single translation from an internal error kind to the wire
	/// response the distilled spec's §7 table names.
	pub fn response(&self) -> (StatusCode, String) {
		match self {
			ErrorKind::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
			ErrorKind::OversizedBody => (
				StatusCode::PAYLOAD_TOO_LARGE,
				"Payload too large.".to_string(),
			),
			ErrorKind::NotFound => (StatusCode::NOT_FOUND, String::new()),
			ErrorKind::Pending => (StatusCode::ACCEPTED, "Pending".to_string()),
			ErrorKind::AlreadyProcessed(msg) => (already_reported(), msg.clone()),
			ErrorKind::Banned => (StatusCode::FORBIDDEN, String::new()),
			ErrorKind::PrivilegeDenied => (
				StatusCode::from_u16(421).unwrap(),
				"Internal API disabled or invalid internal API secret in request.".to_string(),
			),
			ErrorKind::IncompatibleVersion => {
				(StatusCode::from_u16(426).unwrap(), String::new())
			}
			ErrorKind::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
			ErrorKind::HandlerTimeout => (
				StatusCode::INTERNAL_SERVER_ERROR,
				"Handler timeout".to_string(),
			),
			ErrorKind::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
		}
	}
}

/// 208 has no `http::StatusCode` associated constant, but its canonical
/// reason phrase ("Already Reported") is already known to `hyper`/`http`, so
/// constructing it from the raw code is all that's needed (§4.1).
fn already_reported() -> StatusCode {
	StatusCode::from_u16(208).expect("208 is a valid status code")
}

impl Fail for Error {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Error {
	pub fn kind(&self) -> &ErrorKind {
		self.inner.get_context()
	}
}

impl From<ErrorKind> for Error {
	fn from(kind: ErrorKind) -> Error {
		Error {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for Error {
	fn from(inner: Context<ErrorKind>) -> Error {
		Error { inner }
	}
}

impl From<weave_core::CollaboratorError> for Error {
	fn from(e: weave_core::CollaboratorError) -> Error {
		use weave_core::ErrorKind as CK;
		match e.kind() {
			CK::NotJoined => ErrorKind::Unavailable("Not joined.".to_string()).into(),
			CK::Unavailable => ErrorKind::Unavailable("node state unavailable".to_string()).into(),
			CK::NotFound => ErrorKind::NotFound.into(),
			CK::Internal(msg) => ErrorKind::Internal(msg.clone()).into(),
		}
	}
}
