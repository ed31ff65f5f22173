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

//! The service registry (§4.11): a non-consensus metadata layer with
//! essentially no validation beyond structural parse. Preserve that
//! behavior; see Open Question (d) for a note on hardening it later.

use crate::error::ErrorKind;
use crate::state::AppState;
use crate::web::{error_reply, ok_json, text_reply, Reply};
use hyper::StatusCode;
use weave_core::types::ServiceEntry;

pub fn list(state: &AppState) -> Reply {
	ok_json(&state.services.read().clone())
}

pub fn register(state: &AppState, body: &[u8]) -> Reply {
	let entry: ServiceEntry = match serde_json::from_slice(body) {
		Ok(e) => e,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid service entry.".to_string()).into()),
	};
	state.services.write().push(entry);
	text_reply(StatusCode::OK, "OK")
}
