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

//! POST /peers: a remote node announcing itself, gated on a matching
//! network name (§4.3). The peer itself is already recorded by the router's
//! peer-accounting pass; this handler only validates the announce body.

use crate::error::ErrorKind;
use crate::state::AppState;
use crate::web::{error_reply, text_reply, Reply};
use hyper::StatusCode;
use serde::Deserialize;

#[derive(Deserialize)]
struct Announce {
	network: String,
}

pub fn announce(state: &AppState, body: &[u8]) -> Reply {
	let announce: Announce = match serde_json::from_slice(body) {
		Ok(a) => a,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid peer announce.".to_string()).into()),
	};
	if announce.network != state.config.network {
		return error_reply(ErrorKind::Validation("Wrong network.".to_string()).into());
	}
	text_reply(StatusCode::OK, "OK")
}
