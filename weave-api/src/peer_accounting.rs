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

//! Records the peer a request came from and logs the request, if enabled
//! (§4.10). Runs on every handled request, independent of outcome.

use hyper::Method;
use std::collections::HashSet;
use std::sync::Arc;
use weave_core::interfaces::Bridge;
use weave_core::types::Peer;

/// Tracks which peers have already been announced to the bridge this
/// process's lifetime, so `add_remote_peer` is only called once per peer.
#[derive(Default)]
pub struct PeerAccounting {
	known: parking_lot::RwLock<HashSet<Peer>>,
}

impl PeerAccounting {
	pub fn new() -> Self {
		PeerAccounting::default()
	}

	pub async fn record(&self, bridge: &Arc<dyn Bridge>, peer: Peer, http_logging: bool, method: &Method, path: &str) {
		let is_new = {
			let mut known = self.known.write();
			known.insert(peer)
		};
		if is_new {
			bridge.add_remote_peer(peer).await;
		}
		if http_logging {
			log::info!("http_request method={} path={} peer={}", method, path, peer);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use weave_core::testing::MockBridge;

	#[tokio::test]
	async fn announces_each_unknown_peer_once() {
		let accounting = PeerAccounting::new();
		let mock = Arc::new(MockBridge::default());
		let bridge: Arc<dyn Bridge> = mock.clone();
		let peer = Peer::new("1.2.3.4".parse().unwrap(), 1984);

		accounting.record(&bridge, peer, false, &Method::GET, "/info").await;
		accounting.record(&bridge, peer, false, &Method::GET, "/info").await;

		assert_eq!(mock.peers.read().len(), 1);
	}
}
