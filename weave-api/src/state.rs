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

//! Process-wide state shared across requests: the collaborator handles, the
//! mempool, the peer-accounting table, and the ARQL concurrency gate. This
//! plays the role the teacher's `Weak<Chain>` / `Weak<Peers>` /
//! `Weak<RwLock<TransactionPool>>` handler fields play, generalized to this
//! domain's collaborator set and collected in one place instead of being
//! threaded through each handler struct individually.

use crate::config::Config;
use crate::mempool::Mempool;
use crate::peer_accounting::PeerAccounting;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Semaphore;
use weave_core::interfaces::{
	Blacklist, BlockBuilder, Bridge, IgnoreSet, Miner, NodeState, ReplayPool, Storage, TxSearch,
	Wallet,
};
use weave_core::types::ServiceEntry;

pub struct AppState {
	pub config: Config,
	pub node: Arc<dyn NodeState>,
	pub storage: Arc<dyn Storage>,
	pub tx_search: Arc<dyn TxSearch>,
	pub bridge: Arc<dyn Bridge>,
	pub ignore_set: Arc<dyn IgnoreSet>,
	pub blacklist: Arc<dyn Blacklist>,
	pub miner: Arc<dyn Miner>,
	pub block_builder: Arc<dyn BlockBuilder>,
	pub replay_pool: Arc<dyn ReplayPool>,
	pub wallet: Arc<dyn Wallet>,
	pub mempool: Mempool,
	pub peer_accounting: PeerAccounting,
	pub arql_gate: Semaphore,
	/// Registered external services (§4.11). Plain process state: this
	/// registry is a non-consensus metadata layer, not a collaborator.
	pub services: RwLock<Vec<ServiceEntry>>,
}

impl AppState {
	pub fn new(
		config: Config,
		node: Arc<dyn NodeState>,
		storage: Arc<dyn Storage>,
		tx_search: Arc<dyn TxSearch>,
		bridge: Arc<dyn Bridge>,
		ignore_set: Arc<dyn IgnoreSet>,
		blacklist: Arc<dyn Blacklist>,
		miner: Arc<dyn Miner>,
		block_builder: Arc<dyn BlockBuilder>,
		replay_pool: Arc<dyn ReplayPool>,
		wallet: Arc<dyn Wallet>,
	) -> Self {
		let arql_gate = Semaphore::new(config.arql_concurrency);
		AppState {
			config,
			node,
			storage,
			tx_search,
			bridge,
			ignore_set,
			blacklist,
			miner,
			block_builder,
			replay_pool,
			wallet,
			mempool: Mempool::default(),
			peer_accounting: PeerAccounting::new(),
			arql_gate,
			services: RwLock::new(Vec::new()),
		}
	}
}
