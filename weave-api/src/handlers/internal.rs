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

//! The privileged endpoints (§4.9): `/wallet` issues a new keyfile,
//! `/unsigned_tx` signs a caller-supplied transaction and runs it through
//! the same admission path as a public `POST /tx`. Both are wrapped by
//! [`crate::auth::guard`] before the handler in this module ever runs.

use super::tx::admit_tx;
use crate::error::ErrorKind;
use crate::state::AppState;
use crate::web::{error_reply, ok_json, Reply};
use serde::Deserialize;
use weave_core::types::Tx;

#[derive(Deserialize)]
struct NewKeyfileRequest {
	code: String,
}

pub async fn new_wallet(state: &AppState, body: &[u8]) -> Reply {
	let req: NewKeyfileRequest = match serde_json::from_slice(body) {
		Ok(r) => r,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid request.".to_string()).into()),
	};
	match state.wallet.new_keyfile(&req.code).await {
		Ok(keyfile) => ok_json(&serde_json::json!({ "keyfile": keyfile })),
		Err(e) => error_reply(e.into()),
	}
}

pub async fn unsigned_tx(state: &AppState, body: &[u8]) -> Reply {
	let mut tx: Tx = match serde_json::from_slice(body) {
		Ok(tx) => tx,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid tx.".to_string()).into()),
	};
	if let Err(e) = state.wallet.sign(&mut tx).await {
		return error_reply(e.into());
	}
	admit_tx(state, tx).await
}
