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

//! The parsed request envelope (§3). Unlike the teacher's `iron`/`hyper
//! 0.12`-era handlers, which could only read the body from the task that
//! owned the `hyper::Request` (forcing the deadline supervisor to act as a
//! body-read proxy), this core's handlers own the envelope outright and read
//! the body directly — the Design Notes' "fresh design" resolution of that
//! historical asymmetry. The deadline supervisor in [`crate::deadline`] is a
//! plain timeout wrapper as a result.

use hyper::{Body, HeaderMap, Method};
use std::net::Ipv4Addr;
use weave_core::types::Peer;

const DEFAULT_P2P_PORT: u16 = crate::config::DEFAULT_P2P_PORT;

/// A parsed, not-yet-handled request. `body` may be taken at most once; a
/// second [`Envelope::take_body`] call returns `None`.
pub struct Envelope {
	pub method: Method,
	pub path: Vec<String>,
	pub query: Option<String>,
	pub headers: HeaderMap,
	pub peer: Peer,
	body: Option<Body>,
}

impl Envelope {
	pub fn new(method: Method, path: Vec<String>, query: Option<String>, headers: HeaderMap, remote_ip: Ipv4Addr, body: Body) -> Self {
		let port = headers
			.get("x-p2p-port")
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.parse().ok())
			.unwrap_or(DEFAULT_P2P_PORT);
		Envelope {
			method,
			path,
			query,
			headers,
			peer: Peer::new(remote_ip, port),
			body: Some(body),
		}
	}

	/// Takes ownership of the body, if it hasn't already been read.
	pub fn take_body(&mut self) -> Option<Body> {
		self.body.take()
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn path_segment(&self, index: usize) -> Option<&str> {
		self.path.get(index).map(|s| s.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn headers_with(name: &str, value: &str) -> HeaderMap {
		let mut h = HeaderMap::new();
		h.insert(
			hyper::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
			value.parse().unwrap(),
		);
		h
	}

	#[test]
	fn peer_port_defaults_without_header() {
		let env = Envelope::new(
			Method::GET,
			vec![],
			None,
			HeaderMap::new(),
			"1.2.3.4".parse().unwrap(),
			Body::empty(),
		);
		assert_eq!(env.peer.port, DEFAULT_P2P_PORT);
	}

	#[test]
	fn peer_port_honors_header() {
		let env = Envelope::new(
			Method::GET,
			vec![],
			None,
			headers_with("x-p2p-port", "4000"),
			"1.2.3.4".parse().unwrap(),
			Body::empty(),
		);
		assert_eq!(env.peer.port, 4000);
	}

	#[test]
	fn body_can_only_be_taken_once() {
		let mut env = Envelope::new(
			Method::GET,
			vec![],
			None,
			HeaderMap::new(),
			"1.2.3.4".parse().unwrap(),
			Body::empty(),
		);
		assert!(env.take_body().is_some());
		assert!(env.take_body().is_none());
	}
}
