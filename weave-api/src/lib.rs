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

//! The weave node's HTTP request-processing core: parses a hyper request
//! into an [`Envelope`], runs the matched handler under the deadline
//! supervisor, and renders the handler's [`Reply`] back onto the wire.

pub mod auth;
pub mod body;
pub mod config;
pub mod deadline;
pub mod envelope;
pub mod error;
pub mod fee;
pub mod handlers;
pub mod mempool;
pub mod peer_accounting;
pub mod router;
pub mod state;
pub mod wallet_address;
pub mod web;

use crate::envelope::Envelope;
use crate::state::AppState;
use crate::web::Reply;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Parses `req` into an [`Envelope`], routes it under the deadline
/// supervisor, records peer accounting, and converts the resulting
/// [`Reply`] into a `hyper::Response`.
pub async fn handle(state: Arc<AppState>, req: Request<Body>, remote: SocketAddr) -> Response<Body> {
	let method = req.method().clone();
	let path_segments: Vec<String> = req
		.uri()
		.path()
		.split('/')
		.filter(|s| !s.is_empty())
		.map(|s| s.to_string())
		.collect();
	let query = req.uri().query().map(|q| q.to_string());
	let headers = req.headers().clone();
	let remote_ip = match remote.ip() {
		std::net::IpAddr::V4(v4) => v4,
		std::net::IpAddr::V6(_) => std::net::Ipv4Addr::UNSPECIFIED,
	};
	let mut env = Envelope::new(method.clone(), path_segments, query, headers, remote_ip, req.into_body());
	let path = format!("/{}", env.path.join("/"));

	state
		.peer_accounting
		.record(&state.bridge, env.peer, state.config.http_logging, &method, &path)
		.await;

	let timeout = state.config.handler_timeout;
	let reply = crate::deadline::supervise(method, path, timeout, {
		let state = state.clone();
		async move { router::route(&state, &mut env).await }
	})
	.await;

	to_response(reply)
}

fn to_response(reply: Reply) -> Response<Body> {
	let mut builder = Response::builder().status(reply.status);
	if let Some(headers) = builder.headers_mut() {
		*headers = reply.headers;
	}
	builder.body(Body::from(reply.body)).unwrap_or_else(|_| {
		Response::builder()
			.status(hyper::StatusCode::INTERNAL_SERVER_ERROR)
			.body(Body::empty())
			.expect("fallback response is well-formed")
	})
}

/// Binds and serves the request-processing core on `addr` until the process
/// is terminated.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<(), hyper::Error> {
	let make_svc = make_service_fn(move |conn: &hyper::server::conn::AddrStream| {
		let state = state.clone();
		let remote = conn.remote_addr();
		async move {
			Ok::<_, Infallible>(service_fn(move |req| {
				let state = state.clone();
				async move { Ok::<_, Infallible>(handle(state, req, remote).await) }
			}))
		}
	});

	log::info!("listening addr={}", addr);
	Server::bind(&addr).serve(make_svc).await
}
