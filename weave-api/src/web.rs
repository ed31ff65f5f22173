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

//! Utilities to produce a [`Reply`] — the unified 4-tuple the Design Notes
//! call for (`status, headers, body`, with the envelope itself threaded by
//! the caller rather than carried in the reply) — out of a handler result.

use crate::error::{Error, ErrorKind};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json;

/// The terminal value every handler produces. `status` renders on the wire
/// with its canonical reason phrase, including "208 Already Reported" (§4.1)
/// — `hyper`/`http` already know that reason, so no special-casing is needed
/// here.
#[derive(Debug, Clone)]
pub struct Reply {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}

impl Reply {
	pub fn new<B: Into<Vec<u8>>>(status: StatusCode, body: B) -> Reply {
		Reply {
			status,
			headers: HeaderMap::new(),
			body: body.into(),
		}
	}

	pub fn with_header(mut self, name: &'static str, value: &str) -> Reply {
		if let Ok(v) = hyper::header::HeaderValue::from_str(value) {
			self.headers.insert(name, v);
		}
		self
	}
}

pub fn json_reply<T: Serialize>(status: StatusCode, value: &T) -> Reply {
	match serde_json::to_vec(value) {
		Ok(body) => Reply::new(status, body).with_header("content-type", "application/json"),
		Err(e) => Reply::new(
			StatusCode::INTERNAL_SERVER_ERROR,
			format!("failed to serialize response: {}", e),
		),
	}
}

pub fn ok_json<T: Serialize>(value: &T) -> Reply {
	json_reply(StatusCode::OK, value)
}

pub fn text_reply(status: StatusCode, text: impl Into<String>) -> Reply {
	Reply::new(status, text.into().into_bytes())
}

/// Translates an internal [`Error`] into the fixed reply tuple (§7). No
/// handler constructs an error response any other way.
pub fn error_reply(err: Error) -> Reply {
	let (status, body) = err.kind().response();
	Reply::new(status, body)
}

pub fn result_reply<T: Serialize>(result: Result<T, Error>) -> Reply {
	match result {
		Ok(v) => ok_json(&v),
		Err(e) => error_reply(e),
	}
}

pub fn already_processed(msg: &str) -> Reply {
	error_reply(ErrorKind::AlreadyProcessed(msg.to_string()).into())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn already_processed_carries_the_208_status() {
		let reply = already_processed("Block already processed.");
		assert_eq!(reply.status.as_u16(), 208);
		assert_eq!(reply.status.canonical_reason(), Some("Already Reported"));
	}
}
