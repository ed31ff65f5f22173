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

//! Handlers that only read node state (§4.4). None of these mutate
//! consensus state; peer accounting is recorded by the router before any of
//! these run.

use crate::error::{Error, ErrorKind};
use crate::fee;
use crate::state::AppState;
use crate::web::{error_reply, ok_json, result_reply, text_reply, Reply};
use hyper::StatusCode;
use serde::Serialize;
use serde_json::json;
use weave_core::interfaces::BlockKey;
use weave_core::types::{Peer, Tag, Tx};
use weave_core::Id;

#[derive(Serialize)]
struct NodeInfo {
	network: String,
	version: u32,
	release: u32,
	height: i64,
	current: String,
	blocks: u64,
	peers: usize,
	queue_length: usize,
	node_state_latency: u64,
}

/// `/info`. `node_state_latency` is the average of two sampled node-state
/// reads, matching the distilled spec's "average in microseconds of two
/// sampled node-state reads" wording exactly.
pub async fn info(state: &AppState) -> Reply {
	let t0 = std::time::Instant::now();
	let height = state.node.height().await;
	let sample_0 = t0.elapsed();

	let t1 = std::time::Instant::now();
	let current = state.node.current_block_hash().await;
	let sample_1 = t1.elapsed();

	let latency_us = ((sample_0.as_micros() + sample_1.as_micros()) / 2) as u64;
	let peer_count = state.bridge.known_peers(None).await.len();
	let blocks = state.storage.blocks_on_disk().await.unwrap_or(0);

	ok_json(&NodeInfo {
		network: state.config.network.clone(),
		version: state.config.version,
		release: state.config.release,
		height: height.map(|h| h as i64).unwrap_or(-1),
		current: current.map(|id| id.to_base64url()).unwrap_or_else(|| "not_joined".to_string()),
		blocks,
		peers: peer_count,
		queue_length: state.mempool.len(),
		node_state_latency: latency_us,
	})
}

pub fn time() -> Reply {
	let now = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs();
	text_reply(StatusCode::OK, now.to_string())
}

pub async fn peers(state: &AppState, caller: Peer) -> Reply {
	let list = state.bridge.known_peers(Some(caller)).await;
	ok_json(&list)
}

pub async fn hash_list(state: &AppState) -> Reply {
	ok_json(&state.node.hash_list().await)
}

pub async fn wallet_list(state: &AppState) -> Reply {
	ok_json(&state.node.wallet_list().await)
}

pub async fn height(state: &AppState) -> Reply {
	match state.node.height().await {
		Some(h) => text_reply(StatusCode::OK, h.to_string()),
		None => error_reply(ErrorKind::Unavailable("Not joined.".to_string()).into()),
	}
}

pub async fn price(state: &AppState, size_bytes: u64, addr: Option<String>) -> Reply {
	let h = match state.node.height().await {
		Some(h) => h,
		None => return error_reply(ErrorKind::Unavailable("Not joined.".to_string()).into()),
	};
	let diff_h = match state.node.diff(h).await {
		Ok(d) => d,
		Err(e) => return error_reply(Error::from(e)),
	};
	let diff_h1 = match state.node.diff(h + 1).await {
		Ok(d) => d,
		Err(_) => diff_h,
	};
	let new_wallet = match &addr {
		Some(a) => state.node.balance(a).await.is_err(),
		None => false,
	};
	let quote = fee::estimate_tx_price(size_bytes, diff_h, diff_h1, new_wallet);
	text_reply(StatusCode::OK, quote.to_string())
}

pub async fn tx_pending(state: &AppState) -> Reply {
	let ids: Vec<String> = state.mempool.ids().iter().map(|id| id.to_base64url()).collect();
	ok_json(&ids)
}

#[derive(Serialize)]
struct TxStatus {
	block_height: u64,
	block_indep_hash: String,
	number_of_confirmations: u64,
}

pub async fn tx_status(state: &AppState, id: Id) -> Reply {
	if state.mempool.contains(id) {
		return error_reply(ErrorKind::Pending.into());
	}
	let pairs = state.node.block_txs_pairs().await;
	let hash_list = state.node.hash_list().await;
	for (block_hash, tx_ids) in &pairs {
		if tx_ids.contains(&id) {
			let block_height = match hash_list.iter().position(|h| h == block_hash) {
				Some(pos) => (hash_list.len() - 1 - pos) as u64,
				None => continue,
			};
			let current_height = hash_list.len().saturating_sub(1) as u64;
			return ok_json(&TxStatus {
				block_height,
				block_indep_hash: block_hash.to_base64url(),
				number_of_confirmations: current_height - block_height + 1,
			});
		}
	}
	error_reply(ErrorKind::NotFound.into())
}

async fn load_tx(state: &AppState, id: Id) -> Result<Tx, Error> {
	let path = state.storage.lookup_tx_filename(id).await?;
	let bytes = state.storage.read_tx_file(&path).await?;
	serde_json::from_slice(&bytes)
		.map_err(|e| ErrorKind::Internal(format!("corrupt tx file: {}", e)).into())
}

pub async fn tx_stream(state: &AppState, id: Id) -> Reply {
	let path = match state.storage.lookup_tx_filename(id).await {
		Ok(p) => p,
		Err(e) => return error_reply(Error::from(e)),
	};
	match state.storage.read_tx_file(&path).await {
		Ok(bytes) => Reply::new(StatusCode::OK, bytes).with_header("content-type", "application/json"),
		Err(e) => error_reply(Error::from(e)),
	}
}

pub async fn tx_field(state: &AppState, id: Id, field: &str) -> Reply {
	let tx = match load_tx(state, id).await {
		Ok(tx) => tx,
		Err(e) => return error_reply(e),
	};
	match field {
		"id" => text_reply(StatusCode::OK, tx.id.to_base64url()),
		"last_tx" => text_reply(StatusCode::OK, tx.last_tx.to_base64url()),
		"owner" => text_reply(StatusCode::OK, base64::encode_config(&tx.owner, base64::URL_SAFE_NO_PAD)),
		"target" => text_reply(StatusCode::OK, tx.target),
		"quantity" => text_reply(StatusCode::OK, tx.quantity.to_string()),
		"data" => text_reply(StatusCode::OK, base64::encode_config(&tx.data, base64::URL_SAFE_NO_PAD)),
		"reward" => text_reply(StatusCode::OK, tx.reward.to_string()),
		"signature" => text_reply(
			StatusCode::OK,
			base64::encode_config(&tx.signature, base64::URL_SAFE_NO_PAD),
		),
		"tags" => ok_json(&tx.tags),
		_ => error_reply(ErrorKind::NotFound.into()),
	}
}

fn content_type_from_tags(tags: &[Tag]) -> Option<String> {
	tags.iter()
		.find(|t| t.name.eq_ignore_ascii_case(b"content-type"))
		.map(|t| String::from_utf8_lossy(&t.value).to_string())
}

pub async fn tx_data(state: &AppState, id: Id) -> Reply {
	let tx = match load_tx(state, id).await {
		Ok(tx) => tx,
		Err(e) => return error_reply(e),
	};
	let content_type = content_type_from_tags(&tx.tags).unwrap_or_else(|| "application/octet-stream".to_string());
	Reply::new(StatusCode::OK, tx.data).with_header("content-type", &content_type)
}

pub async fn wallet_balance(state: &AppState, addr: &str) -> Reply {
	match state.node.balance(addr).await {
		Ok(balance) => text_reply(StatusCode::OK, balance.to_string()),
		Err(e) => error_reply(Error::from(e)),
	}
}

pub async fn wallet_last_tx(state: &AppState, addr: &str) -> Reply {
	result_reply(
		state
			.node
			.last_tx(addr)
			.await
			.map(|id| id.to_base64url())
			.map_err(Error::from),
	)
}

async fn address_index(state: &AppState, tag_name: &[u8], addr: &str, earliest: Option<Id>) -> Vec<Id> {
	let mut ids = state.tx_search.entries(tag_name, addr.as_bytes()).await;
	state.tx_search.sort_ids(&mut ids);
	match earliest {
		Some(cutoff) => match ids.iter().position(|id| *id == cutoff) {
			Some(pos) => ids.into_iter().take(pos + 1).collect(),
			None => ids,
		},
		None => ids,
	}
}

pub async fn wallet_txs(state: &AppState, addr: &str, earliest: Option<Id>) -> Reply {
	let ids = address_index(state, b"from", addr, earliest).await;
	ok_json(&ids)
}

pub async fn wallet_deposits(state: &AppState, addr: &str, earliest: Option<Id>) -> Reply {
	let ids = address_index(state, b"to", addr, earliest).await;
	ok_json(&ids)
}

/// `/tx_anchor`. `min(N, MAX_TX_ANCHOR_DEPTH) div 2 + 1`, 1-indexed into the
/// hash list; an empty list has no anchor to offer.
pub async fn tx_anchor(state: &AppState) -> Reply {
	let hash_list = state.node.hash_list().await;
	if hash_list.is_empty() {
		return error_reply(ErrorKind::Validation("Invalid hash list.".to_string()).into());
	}
	let n = hash_list.len();
	let index = (n.min(state.config.max_tx_anchor_depth) / 2).min(n - 1);
	text_reply(StatusCode::OK, hash_list[index].to_base64url())
}

async fn load_block(state: &AppState, key: BlockKey) -> Result<serde_json::Value, Error> {
	let hash_list = state.node.hash_list().await;
	let path = state.storage.lookup_block_filename(key).await?;
	let bytes = state.storage.read_block_file(&path, &hash_list).await?;
	serde_json::from_slice(&bytes).map_err(|e| ErrorKind::Internal(format!("corrupt block file: {}", e)).into())
}

pub async fn block(state: &AppState, key: BlockKey, legacy_format_requested: bool) -> Reply {
	if legacy_format_requested && !state.config.api_compat {
		return error_reply(ErrorKind::IncompatibleVersion.into());
	}
	match load_block(state, key).await {
		Ok(body) => ok_json(&body),
		Err(e) => error_reply(e),
	}
}

pub async fn current_block(state: &AppState) -> Reply {
	match state.node.current_block_hash().await {
		Some(hash) => block(state, BlockKey::Hash(hash), false).await,
		None => error_reply(ErrorKind::Unavailable("Not joined.".to_string()).into()),
	}
}

pub async fn block_subfield(state: &AppState, key: BlockKey, field: &str) -> Reply {
	if !state.config.subfield_queries {
		return error_reply(ErrorKind::PrivilegeDenied.into());
	}
	let body = match load_block(state, key).await {
		Ok(body) => body,
		Err(e) => return error_reply(e),
	};
	let raw = match field {
		"nonce" | "hash" | "indep_hash" => body.get(field).and_then(|v| v.as_str()).map(|s| s.to_string()),
		"timestamp" | "last_retarget" | "diff" | "height" => {
			body.get(field).map(|v| v.to_string())
		}
		"txs" | "hash_list" | "wallet_list" => return ok_json(&body.get(field).cloned().unwrap_or(json!([]))),
		_ => None,
	};
	match raw {
		Some(value) => text_reply(StatusCode::OK, value),
		None => error_reply(ErrorKind::NotFound.into()),
	}
}
