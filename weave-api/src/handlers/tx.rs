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

//! Mempool admission (§4.6, POST /tx). Cheap local checks precede the
//! expensive replay-pool lookup; the ignore-set insertion happens before
//! that call so two concurrent posts of the same id never both reach the
//! verifier.

use crate::error::ErrorKind;
use crate::mempool::AdmitOutcome;
use crate::state::AppState;
use crate::web::{error_reply, text_reply, Reply};
use hyper::StatusCode;
use weave_core::types::{ReplayOutcome, Tx};

pub async fn admit(state: &AppState, body: &[u8]) -> Reply {
	let tx: Tx = match serde_json::from_slice(body) {
		Ok(tx) => tx,
		Err(e) => return error_reply(ErrorKind::Validation(format!("Invalid tx: {}", e)).into()),
	};
	admit_tx(state, tx).await
}

/// The body of `admit`, factored out so the internal `/unsigned_tx` handler
/// can hand a freshly-signed [`Tx`] straight in without a JSON round trip.
pub async fn admit_tx(state: &AppState, tx: Tx) -> Reply {
	let height = state.node.height().await;
	let size_limit = match height {
		Some(h) if h >= state.config.fork_height_1_8 => Some(state.config.total_waiting_txs_data_size_limit),
		_ => None,
	};

	if let AdmitOutcome::WouldExceedLimit = peek_admit(state, tx.data_size(), size_limit) {
		return error_reply(ErrorKind::Validation("Mempool is full.".to_string()).into());
	}

	if state.ignore_set.contains(tx.id) {
		return error_reply(ErrorKind::AlreadyProcessed("Transaction already processed.".to_string()).into());
	}
	if !state.ignore_set.insert(tx.id) {
		return error_reply(ErrorKind::AlreadyProcessed("Transaction already processed.".to_string()).into());
	}

	let owner_address = crate::wallet_address::derive(&tx.owner);
	let balance = match state.node.balance(&owner_address).await {
		Ok(b) => b,
		Err(_) => 0,
	};
	if balance < tx.reward.saturating_add(tx.quantity) {
		return error_reply(ErrorKind::Validation("Waiting TXs exceed balance for wallet.".to_string()).into());
	}

	let diff = match state.node.current_diff().await {
		Ok(d) => d,
		Err(_) => 0,
	};
	let pairs = state.node.block_txs_pairs().await;
	let mempool_ids = state.mempool.ids();
	let wallet_list = state.node.wallet_list().await;

	let outcome = state
		.replay_pool
		.verify_tx(&tx, diff, height.unwrap_or(0), &pairs, &mempool_ids, &wallet_list)
		.await;

	match outcome {
		ReplayOutcome::Valid => {
			match state.mempool.try_admit(tx.clone(), size_limit) {
				AdmitOutcome::Admitted => {
					log::info!("tx_admitted id={}", tx.id);
					state.bridge.add_tx(tx).await;
					text_reply(StatusCode::OK, "OK")
				}
				AdmitOutcome::WouldExceedLimit => {
					error_reply(ErrorKind::Validation("Mempool is full.".to_string()).into())
				}
			}
		}
		ReplayOutcome::TxVerificationFailed | ReplayOutcome::InvalidLastTx => {
			log::warn!("tx_rejected id={} reason=verification_failed", tx.id);
			error_reply(ErrorKind::Validation("Transaction verification failed.".to_string()).into())
		}
		ReplayOutcome::LastTxInMempool => {
			error_reply(ErrorKind::Validation("Invalid anchor (last_tx from mempool).".to_string()).into())
		}
		ReplayOutcome::TxBadAnchor => {
			error_reply(ErrorKind::Validation("Invalid anchor (last_tx).".to_string()).into())
		}
		ReplayOutcome::TxAlreadyInWeave => {
			error_reply(ErrorKind::Validation("Transaction is already on the weave.".to_string()).into())
		}
		ReplayOutcome::TxAlreadyInMempool => {
			error_reply(ErrorKind::Validation("Transaction is already in the mempool.".to_string()).into())
		}
	}
}

/// A non-mutating preview of the size check, so an over-budget tx can be
/// rejected before the ignore set is touched (step 2 precedes step 3 in the
/// admission ordering).
fn peek_admit(state: &AppState, data_size: usize, limit: Option<usize>) -> AdmitOutcome {
	match limit {
		Some(limit) if state.mempool.total_data_bytes() + data_size > limit => AdmitOutcome::WouldExceedLimit,
		_ => AdmitOutcome::Admitted,
	}
}
