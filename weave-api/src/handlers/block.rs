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

//! Block ingestion (§4.7, POST /block). A strict pipeline of short-circuit
//! stages: cheap anti-DoS checks run before the first cryptographic cost
//! (proof-of-work validation), which in turn runs before any block
//! reconstruction. A BDS is only considered "seen" after its PoW checks out,
//! so an attacker can't inoculate the node against the real block by
//! front-running with a bogus one that shares a BDS.

use crate::error::ErrorKind;
use crate::state::AppState;
use crate::web::{error_reply, text_reply, Reply};
use hyper::StatusCode;
use serde_json::Value;
use weave_core::types::{BlockShadow, PowOutcome, Peer};

pub async fn ingest(state: &AppState, peer: Peer, body: &[u8]) -> Reply {
	if state.blacklist.is_banned(peer).await {
		return error_reply(ErrorKind::Banned.into());
	}

	let value: Value = match serde_json::from_slice(body) {
		Ok(v) => v,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid block.".to_string()).into()),
	};
	let shadow: BlockShadow = match serde_json::from_value(value.clone()) {
		Ok(s) => s,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid block.".to_string()).into()),
	};
	let recall_size = value.get("recall_size").and_then(Value::as_u64).unwrap_or(0);

	let bds = match shadow.block_data_segment {
		Some(bds) => bds,
		None => {
			log::warn!("block_rejected reason=block_data_segment_missing peer={}", peer);
			return error_reply(ErrorKind::Validation("block_data_segment missing.".to_string()).into());
		}
	};
	if state.ignore_set.contains(bds) {
		return error_reply(
			ErrorKind::AlreadyProcessed("Block Data Segment already processed.".to_string()).into(),
		);
	}

	if state.ignore_set.contains(shadow.indep_hash) {
		return error_reply(ErrorKind::AlreadyProcessed("Block already processed.".to_string()).into());
	}
	if !state.ignore_set.insert(shadow.indep_hash) {
		return error_reply(ErrorKind::AlreadyProcessed("Block already processed.".to_string()).into());
	}

	let current_height = match state.node.height().await {
		Some(h) => h,
		None => return error_reply(ErrorKind::Unavailable("Not joined.".to_string()).into()),
	};

	let window = state.config.store_blocks_behind_current;
	if shadow.height + window < current_height {
		return error_reply(ErrorKind::Validation("Height is too far behind".to_string()).into());
	}
	if shadow.height > current_height + window {
		return error_reply(ErrorKind::Validation("Height is too far ahead".to_string()).into());
	}

	if shadow.diff < state.config.min_difficulty {
		return error_reply(ErrorKind::Validation("Difficulty too low".to_string()).into());
	}

	match state
		.miner
		.validate(bds, &shadow.nonce, shadow.diff, shadow.height)
		.await
	{
		PowOutcome::Invalid => {
			log::warn!("block_rejected reason=invalid_pow peer={}", peer);
			state.blacklist.ban(peer, state.config.bad_pow_ban_time).await;
			return error_reply(ErrorKind::Validation("Invalid Block Proof of Work".to_string()).into());
		}
		PowOutcome::Valid => {
			state.ignore_set.insert(bds);
		}
	}

	let now = chrono::Utc::now().timestamp();
	if !state.block_builder.verify_timestamp(&shadow, now) {
		log::warn!(
			"block_rejected reason=invalid_timestamp peer={} block_ts={} now={}",
			peer,
			shadow.timestamp,
			now
		);
		return error_reply(ErrorKind::Validation("Invalid timestamp.".to_string()).into());
	}

	let block_builder = state.block_builder.clone();
	let bridge = state.bridge.clone();
	let shadow_for_task = shadow.clone();
	tokio::spawn(async move {
		match block_builder.generate_block_from_shadow(&shadow_for_task, recall_size).await {
			Ok(recall) => bridge.add_block(peer, shadow_for_task, bds, recall).await,
			Err(e) => log::warn!("block_reconstruction_failed indep_hash={} err={}", shadow_for_task.indep_hash, e),
		}
	});

	text_reply(StatusCode::OK, "OK")
}
