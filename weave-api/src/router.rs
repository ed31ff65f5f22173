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

//! Dispatches on (method, path segments) (§4.3). Anything unmatched falls
//! through to the 400 catch-all.

use crate::auth;
use crate::body::read_envelope_body;
use crate::envelope::Envelope;
use crate::error::{Error, ErrorKind};
use crate::handlers::{self, arql, block, internal, peers, read, services, tx};
use crate::state::AppState;
use crate::web::{error_reply, Reply};
use hyper::Method;
use weave_core::interfaces::BlockKey;

const CORS_GET_POST: &[&str] = &["/block", "/tx", "/peer", "/arql"];

pub async fn route(state: &AppState, env: &mut Envelope) -> Reply {
	let method = env.method.clone();
	let path: Vec<String> = env.path.clone();
	let segments: Vec<&str> = path.iter().map(|s| s.as_str()).collect();

	if method == Method::OPTIONS {
		return options_reply(&segments);
	}

	match (&method, segments.as_slice()) {
		(&Method::GET, []) | (&Method::GET, ["info"]) => read::info(state).await,
		(&Method::HEAD, []) | (&Method::HEAD, ["info"]) => read::info(state).await,

		(&Method::GET, ["time"]) => read::time(),
		(&Method::GET, ["tx", "pending"]) => read::tx_pending(state).await,
		(&Method::GET, ["tx", hash, "status"]) => match handlers::parse_id(hash) {
			Ok(id) => read::tx_status(state, id).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["tx", hash, seg]) if seg.starts_with("data.") => match handlers::parse_id(hash) {
			Ok(id) => read::tx_data(state, id).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["tx", hash, field]) => match handlers::parse_id(hash) {
			Ok(id) => read::tx_field(state, id, field).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["tx", hash]) => match handlers::parse_id(hash) {
			Ok(id) => read::tx_stream(state, id).await,
			Err(e) => error_reply(e),
		},

		(&Method::POST, ["arql"]) => match read_envelope_body(env, state.config.max_body_size).await {
			Ok(body) => arql::query(state, &body).await,
			Err(e) => error_reply(e),
		},
		(&Method::POST, ["block"]) => {
			let peer = env.peer;
			match read_envelope_body(env, state.config.max_body_size).await {
				Ok(body) => block::ingest(state, peer, &body).await,
				Err(e) => error_reply(e),
			}
		}
		(&Method::POST, ["tx"]) => match read_envelope_body(env, state.config.max_body_size).await {
			Ok(body) => tx::admit(state, &body).await,
			Err(e) => error_reply(e),
		},
		(&Method::POST, ["wallet"]) => {
			let secret = env.header("x-internal-api-secret").map(|s| s.to_string());
			if let Err(reply) = auth::guard(&state.config, secret.as_deref()).await {
				return reply;
			}
			match read_envelope_body(env, state.config.max_body_size).await {
				Ok(body) => internal::new_wallet(state, &body).await,
				Err(e) => error_reply(e),
			}
		}
		(&Method::POST, ["unsigned_tx"]) => {
			let secret = env.header("x-internal-api-secret").map(|s| s.to_string());
			if let Err(reply) = auth::guard(&state.config, secret.as_deref()).await {
				return reply;
			}
			match read_envelope_body(env, state.config.max_body_size).await {
				Ok(body) => internal::unsigned_tx(state, &body).await,
				Err(e) => error_reply(e),
			}
		}

		(&Method::GET, ["peers"]) => read::peers(state, env.peer).await,
		(&Method::POST, ["peers"]) => match read_envelope_body(env, state.config.max_body_size).await {
			Ok(body) => peers::announce(state, &body),
			Err(e) => error_reply(e),
		},

		(&Method::GET, ["price", bytes]) => match bytes.parse::<u64>() {
			Ok(size) => read::price(state, size, None).await,
			Err(_) => error_reply(ErrorKind::Validation("Invalid size.".to_string()).into()),
		},
		(&Method::GET, ["price", bytes, addr]) => match (bytes.parse::<u64>(), handlers::parse_address(addr)) {
			(Ok(size), Ok(addr)) => read::price(state, size, Some(addr.to_string())).await,
			(Err(_), _) => error_reply(ErrorKind::Validation("Invalid size.".to_string()).into()),
			(_, Err(e)) => error_reply(e),
		},

		(&Method::GET, ["hash_list"]) => read::hash_list(state).await,
		(&Method::GET, ["wallet_list"]) => read::wallet_list(state).await,
		(&Method::GET, ["height"]) => read::height(state).await,
		(&Method::GET, ["tx_anchor"]) => read::tx_anchor(state).await,

		(&Method::GET, ["wallet", addr, "balance"]) => match handlers::parse_address(addr) {
			Ok(addr) => read::wallet_balance(state, addr).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["wallet", addr, "last_tx"]) => match handlers::parse_address(addr) {
			Ok(addr) => read::wallet_last_tx(state, addr).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["wallet", addr, "txs"]) => match handlers::parse_address(addr) {
			Ok(addr) => read::wallet_txs(state, addr, None).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["wallet", addr, "txs", earliest]) => match (handlers::parse_address(addr), handlers::parse_id(earliest)) {
			(Ok(addr), Ok(id)) => read::wallet_txs(state, addr, Some(id)).await,
			(Err(e), _) => error_reply(e),
			(_, Err(e)) => error_reply(e),
		},
		(&Method::GET, ["wallet", addr, "deposits"]) => match handlers::parse_address(addr) {
			Ok(addr) => read::wallet_deposits(state, addr, None).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["wallet", addr, "deposits", earliest]) => match (handlers::parse_address(addr), handlers::parse_id(earliest)) {
			(Ok(addr), Ok(id)) => read::wallet_deposits(state, addr, Some(id)).await,
			(Err(e), _) => error_reply(e),
			(_, Err(e)) => error_reply(e),
		},

		(&Method::GET, ["block", "current"]) => read::current_block(state).await,
		(&Method::GET, ["block", "hash", hash]) => match handlers::parse_id(hash) {
			Ok(id) => block_by_format(state, env, BlockKey::Hash(id)).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["block", "height", height]) => match handlers::parse_height(height) {
			Ok(h) => block_by_format(state, env, BlockKey::Height(h)).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["block", "hash", hash, field]) => match handlers::parse_id(hash) {
			Ok(id) => read::block_subfield(state, BlockKey::Hash(id), field).await,
			Err(e) => error_reply(e),
		},
		(&Method::GET, ["block", "height", height, field]) => match handlers::parse_height(height) {
			Ok(h) => read::block_subfield(state, BlockKey::Height(h), field).await,
			Err(e) => error_reply(e),
		},

		(&Method::GET, ["services"]) => services::list(state),
		(&Method::POST, ["services"]) => match read_envelope_body(env, state.config.max_body_size).await {
			Ok(body) => services::register(state, &body),
			Err(e) => error_reply(e),
		},

		(&Method::GET, rest) if rest.first() == Some(&"api") && rest.get(1) == Some(&"ipfs") => {
			error_reply(ErrorKind::NotFound.into())
		}

		(&Method::GET, [single]) => match split_ext(single) {
			Some((hash, ext)) => match handlers::parse_id(hash) {
				Ok(id) => {
					let _ = ext;
					read::tx_data(state, id).await
				}
				Err(e) => error_reply(e),
			},
			None => error_reply(catch_all()),
		},

		_ => error_reply(catch_all()),
	}
}

async fn block_by_format(state: &AppState, env: &Envelope, key: BlockKey) -> Reply {
	let legacy_requested = env.header("x-block-format") == Some("1");
	read::block(state, key, legacy_requested).await
}

fn split_ext(segment: &str) -> Option<(&str, &str)> {
	segment.rsplit_once('.')
}

fn catch_all() -> Error {
	ErrorKind::Validation("Request type not found.".to_string()).into()
}

fn options_reply(segments: &[&str]) -> Reply {
	let path = format!("/{}", segments.join("/"));
	let methods = if CORS_GET_POST.iter().any(|p| path.starts_with(p)) {
		"GET, POST, OPTIONS"
	} else {
		"GET, OPTIONS"
	};
	Reply::new(hyper::StatusCode::OK, Vec::new())
		.with_header("access-control-allow-origin", "*")
		.with_header("access-control-allow-methods", methods)
		.with_header("access-control-allow-headers", "Content-Type, Accept, X-P2P-Port, X-Internal-Api-Secret")
}
