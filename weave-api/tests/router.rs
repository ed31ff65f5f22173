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

//! End-to-end exercises of the router against in-memory collaborators,
//! covering the literal scenarios and several of the numbered properties.

use async_trait::async_trait;
use hyper::{Body, HeaderMap, Method, StatusCode};
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use weave_api::config::Config;
use weave_api::envelope::Envelope;
use weave_api::router::route;
use weave_api::state::AppState;
use weave_core::interfaces::{NodeState, Result as CResult};
use weave_core::testing::{
	AlwaysInvalidMiner, AlwaysValidMiner, MockBlacklist, MockBridge, MockIgnoreSet, MockNode,
	MockStorage, MockTxSearch, MockWallet, PermissiveBlockBuilder, PermissiveReplayPool,
};
use weave_core::types::WalletEntry;
use weave_core::{CollaboratorError, ErrorKind as CErrorKind, Id};

fn new_state(config: Config) -> Arc<AppState> {
	Arc::new(AppState::new(
		config,
		Arc::new(MockNode::default()),
		Arc::new(MockStorage::default()),
		Arc::new(MockTxSearch::default()),
		Arc::new(MockBridge::default()),
		Arc::new(MockIgnoreSet::default()),
		Arc::new(MockBlacklist::default()),
		Arc::new(AlwaysValidMiner),
		Arc::new(PermissiveBlockBuilder),
		Arc::new(PermissiveReplayPool),
		Arc::new(MockWallet),
	))
}

fn envelope(method: Method, path: &str, body: Body) -> Envelope {
	let segments: Vec<String> = path.split('/').filter(|s| !s.is_empty()).map(String::from).collect();
	Envelope::new(method, segments, None, HeaderMap::new(), Ipv4Addr::new(1, 2, 3, 4), body)
}

#[tokio::test]
async fn time_returns_unix_seconds() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::GET, "/time", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_tx_body_is_rejected() {
	let mut config = Config::default();
	config.max_body_size = 10;
	let state = new_state(config);
	let mut env = envelope(Method::POST, "/tx", Body::from(vec![0u8; 100]));
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn unknown_route_returns_the_catch_all() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::GET, "/definitely/not/a/route", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"Request type not found.".to_vec());
}

#[tokio::test]
async fn block_data_segment_missing_is_rejected() {
	let state = new_state(Config::default());
	let body = serde_json::json!({
		"indep_hash": Id([1u8; 32]).to_base64url(),
		"previous_block": Id([0u8; 32]).to_base64url(),
		"height": 1,
		"diff": 5,
		"nonce": [],
		"timestamp": 0,
		"last_retarget": 0,
		"reward_addr": "addr",
		"txs": [],
		"wallet_list_root": Id([0u8; 32]).to_base64url(),
		"hash_list_root": Id([0u8; 32]).to_base64url(),
	});
	let mut env = envelope(Method::POST, "/block", Body::from(body.to_string()));
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"block_data_segment missing.".to_vec());
}

fn block_body(indep_hash: Id, bds: Id, height: u64, diff: u64) -> String {
	serde_json::json!({
		"indep_hash": indep_hash.to_base64url(),
		"previous_block": Id([0u8; 32]).to_base64url(),
		"height": height,
		"diff": diff,
		"nonce": [1, 2, 3],
		"timestamp": 0,
		"last_retarget": 0,
		"reward_addr": "addr",
		"txs": [],
		"wallet_list_root": Id([0u8; 32]).to_base64url(),
		"hash_list_root": Id([0u8; 32]).to_base64url(),
		"block_data_segment": bds.to_base64url(),
		"recall_size": 0,
	})
	.to_string()
}

#[tokio::test]
async fn posting_the_same_block_twice_is_idempotent() {
	let state = new_state(Config::default());
	let indep_hash = Id([9u8; 32]);
	let bds = Id([10u8; 32]);
	let body = block_body(indep_hash, bds, 0, 5);

	let mut first = envelope(Method::POST, "/block", Body::from(body.clone()));
	let reply = route(&state, &mut first).await;
	assert_eq!(reply.status, StatusCode::OK);

	let mut second = envelope(Method::POST, "/block", Body::from(body));
	let reply = route(&state, &mut second).await;
	assert_eq!(reply.status.as_u16(), 208);
}

#[tokio::test]
async fn bad_pow_bans_the_peer() {
	let mut config = Config::default();
	config.bad_pow_ban_time = Duration::from_secs(60);
	let state = Arc::new(AppState::new(
		config,
		Arc::new(MockNode::default()),
		Arc::new(MockStorage::default()),
		Arc::new(MockTxSearch::default()),
		Arc::new(MockBridge::default()),
		Arc::new(MockIgnoreSet::default()),
		Arc::new(MockBlacklist::default()),
		Arc::new(AlwaysInvalidMiner),
		Arc::new(PermissiveBlockBuilder),
		Arc::new(PermissiveReplayPool),
		Arc::new(MockWallet),
	));

	let body = block_body(Id([1u8; 32]), Id([2u8; 32]), 0, 5);
	let mut first = envelope(Method::POST, "/block", Body::from(body));
	let reply = route(&state, &mut first).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"Invalid Block Proof of Work".to_vec());

	let body = block_body(Id([3u8; 32]), Id([4u8; 32]), 0, 5);
	let mut second = envelope(Method::POST, "/block", Body::from(body));
	let reply = route(&state, &mut second).await;
	assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn arql_equals_returns_newest_first_canonical_order() {
	let t1 = Id([1u8; 32]);
	let t2 = Id([2u8; 32]);
	let search = Arc::new(MockTxSearch::default());
	search
		.entries
		.write()
		.insert((b"name".to_vec(), b"v".to_vec()), vec![t2, t1]);
	let state = Arc::new(AppState::new(
		Config::default(),
		Arc::new(MockNode::default()),
		Arc::new(MockStorage::default()),
		search,
		Arc::new(MockBridge::default()),
		Arc::new(MockIgnoreSet::default()),
		Arc::new(MockBlacklist::default()),
		Arc::new(AlwaysValidMiner),
		Arc::new(PermissiveBlockBuilder),
		Arc::new(PermissiveReplayPool),
		Arc::new(MockWallet),
	));

	let mut env = envelope(
		Method::POST,
		"/arql",
		Body::from(r#"{"op":"equals","expr1":"name","expr2":"v"}"#),
	);
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::OK);
	let ids: Vec<String> = serde_json::from_slice(&reply.body).unwrap();
	assert_eq!(ids, vec![t2.to_base64url(), t1.to_base64url()]);
}

#[tokio::test]
async fn balance_exceeded_rejects_the_tx() {
	let state = new_state(Config::default());
	let mut env = envelope(
		Method::POST,
		"/tx",
		Body::from(
			serde_json::json!({
				"id": Id([1u8; 32]).to_base64url(),
				"owner": [],
				"target": "",
				"quantity": 0,
				"data": [],
				"reward": 1,
				"signature": [],
				"last_tx": Id([0u8; 32]).to_base64url(),
				"tags": [],
			})
			.to_string(),
		),
	);
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"Waiting TXs exceed balance for wallet.".to_vec());
}

#[tokio::test]
async fn height_abc_is_an_invalid_height() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::GET, "/block/height/abc", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"Invalid height.".to_vec());
}

#[tokio::test]
async fn invalid_wallet_address_is_rejected() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::GET, "/wallet/not-base64!!/balance", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
	assert_eq!(reply.body, b"Invalid address.".to_vec());
}

struct UnavailableBalanceNode(Arc<MockNode>);

#[async_trait]
impl NodeState for UnavailableBalanceNode {
	async fn height(&self) -> Option<u64> {
		self.0.height().await
	}
	async fn current_block_hash(&self) -> Option<Id> {
		self.0.current_block_hash().await
	}
	async fn hash_list(&self) -> Vec<Id> {
		self.0.hash_list().await
	}
	async fn is_joined(&self) -> bool {
		self.0.is_joined().await
	}
	async fn diff(&self, height: u64) -> CResult<u64> {
		self.0.diff(height).await
	}
	async fn current_diff(&self) -> CResult<u64> {
		self.0.current_diff().await
	}
	async fn wallet_list(&self) -> Vec<WalletEntry> {
		self.0.wallet_list().await
	}
	async fn balance(&self, _address: &str) -> CResult<u64> {
		Err(CollaboratorError::from(CErrorKind::Unavailable))
	}
	async fn last_tx(&self, address: &str) -> CResult<Id> {
		self.0.last_tx(address).await
	}
	async fn block_txs_pairs(&self) -> Vec<(Id, Vec<Id>)> {
		self.0.block_txs_pairs().await
	}
}

#[tokio::test]
async fn wallet_balance_times_out_as_503() {
	let state = Arc::new(AppState::new(
		Config::default(),
		Arc::new(UnavailableBalanceNode(Arc::new(MockNode::default()))),
		Arc::new(MockStorage::default()),
		Arc::new(MockTxSearch::default()),
		Arc::new(MockBridge::default()),
		Arc::new(MockIgnoreSet::default()),
		Arc::new(MockBlacklist::default()),
		Arc::new(AlwaysValidMiner),
		Arc::new(PermissiveBlockBuilder),
		Arc::new(PermissiveReplayPool),
		Arc::new(MockWallet),
	));
	let addr = Id([9u8; 32]).to_base64url();
	let mut env = envelope(Method::GET, &format!("/wallet/{}/balance", addr), Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn tx_anchor_on_empty_hash_list_is_rejected() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::GET, "/tx_anchor", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tx_anchor_picks_the_configured_depth() {
	let state = new_state(Config::default());
	let node = MockNode::default();
	let mut hashes = Vec::new();
	for i in 0..10u8 {
		hashes.push(Id([i; 32]));
	}
	*node.hash_list.write() = hashes.clone();
	node.height.store(9, Ordering::SeqCst);
	let state = Arc::new(AppState::new(
		Config::default(),
		Arc::new(node),
		Arc::new(MockStorage::default()),
		Arc::new(MockTxSearch::default()),
		Arc::new(MockBridge::default()),
		Arc::new(MockIgnoreSet::default()),
		Arc::new(MockBlacklist::default()),
		Arc::new(AlwaysValidMiner),
		Arc::new(PermissiveBlockBuilder),
		Arc::new(PermissiveReplayPool),
		Arc::new(MockWallet),
	));
	let mut env = envelope(Method::GET, "/tx_anchor", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::OK);
	let expected = hashes[10usize.min(50) / 2].to_base64url();
	assert_eq!(String::from_utf8(reply.body).unwrap(), expected);
}

#[tokio::test]
async fn options_preflight_is_permissive() {
	let state = new_state(Config::default());
	let mut env = envelope(Method::OPTIONS, "/block", Body::empty());
	let reply = route(&state, &mut env).await;
	assert_eq!(reply.status, StatusCode::OK);
	assert!(reply.headers.get("access-control-allow-methods").is_some());
}
