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

//! Errors a collaborator implementation can return. These never reach an
//! HTTP client directly; handlers translate them into the fixed response
//! tuple (see `weave_api::error`).

use failure::{Backtrace, Context, Fail};
use std::fmt::{self, Display};

#[derive(Debug)]
pub struct CollaboratorError {
	inner: Context<ErrorKind>,
}

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
	#[fail(display = "node is not yet joined to the network")]
	NotJoined,
	#[fail(display = "node state read timed out")]
	Unavailable,
	#[fail(display = "not found")]
	NotFound,
	#[fail(display = "internal error: {}", _0)]
	Internal(String),
}

impl Fail for CollaboratorError {
	fn cause(&self) -> Option<&dyn Fail> {
		self.inner.cause()
	}

	fn backtrace(&self) -> Option<&Backtrace> {
		self.inner.backtrace()
	}
}

impl Display for CollaboratorError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl CollaboratorError {
	pub fn kind(&self) -> &ErrorKind {
		self.inner.get_context()
	}
}

impl From<ErrorKind> for CollaboratorError {
	fn from(kind: ErrorKind) -> CollaboratorError {
		CollaboratorError {
			inner: Context::new(kind),
		}
	}
}

impl From<Context<ErrorKind>> for CollaboratorError {
	fn from(inner: Context<ErrorKind>) -> CollaboratorError {
		CollaboratorError { inner }
	}
}
