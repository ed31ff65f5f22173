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

//! Small, testable traits standing in for every external collaborator named
//! in the request-processing core's interface contract: the node's
//! in-memory consensus cursors, on-disk storage, the tag-search index, the
//! gossip bridge, the peer blacklist, the miner, the block builder, the
//! replay-pool verifier, the wallet keystore, and node configuration.
//!
//! Production wiring is out of this core's scope; only the shapes below are.
//! Handlers hold `Arc<dyn Trait>` the same way the teacher's handlers hold
//! `Weak<Chain>` / `Weak<Peers>` / `Weak<RwLock<TransactionPool>>`.

use crate::error::CollaboratorError;
use crate::hash::Id;
use crate::types::{BlockShadow, Peer, PowOutcome, RecallHint, ReplayOutcome, Tx, WalletEntry};
use async_trait::async_trait;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, CollaboratorError>;

/// In-memory consensus cursors: height, current head, hash list, joined state.
#[async_trait]
pub trait NodeState: Send + Sync {
	async fn height(&self) -> Option<u64>;
	async fn current_block_hash(&self) -> Option<Id>;
	/// Newest-first; index 0 is the current head.
	async fn hash_list(&self) -> Vec<Id>;
	async fn is_joined(&self) -> bool;
	async fn diff(&self, height: u64) -> Result<u64>;
	async fn current_diff(&self) -> Result<u64>;
	async fn wallet_list(&self) -> Vec<WalletEntry>;
	async fn balance(&self, address: &str) -> Result<u64>;
	async fn last_tx(&self, address: &str) -> Result<Id>;
	async fn block_txs_pairs(&self) -> Vec<(Id, Vec<Id>)>;
}

/// On-disk storage of blocks and transactions.
#[async_trait]
pub trait Storage: Send + Sync {
	async fn lookup_tx_filename(&self, id: Id) -> Result<String>;
	async fn lookup_block_filename(&self, key: BlockKey) -> Result<String>;
	async fn read_tx_file(&self, path: &str) -> Result<Vec<u8>>;
	async fn read_block_file(&self, path: &str, hash_list: &[Id]) -> Result<Vec<u8>>;
	/// Count of blocks actually held on disk, distinct from chain height for
	/// a node that doesn't store the full weave.
	async fn blocks_on_disk(&self) -> Result<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey {
	Hash(Id),
	Height(u64),
}

/// Tag-indexed transaction search, used by the read handlers and the ARQL
/// gateway.
#[async_trait]
pub trait TxSearch: Send + Sync {
	async fn entries(&self, tag_name: &[u8], value: &[u8]) -> Vec<Id>;
	async fn tags_by_id(&self, id: Id) -> Option<Vec<crate::types::Tag>>;
	/// Returns ids in the index's canonical (newest-first) order.
	fn sort_ids(&self, ids: &mut Vec<Id>);
}

/// The gossip/bridge subsystem: hand-off point for accepted artifacts.
#[async_trait]
pub trait Bridge: Send + Sync {
	async fn add_remote_peer(&self, peer: Peer);
	async fn add_tx(&self, tx: Tx);
	async fn add_block(&self, peer: Peer, block: BlockShadow, bds: Id, recall: RecallHint);
	/// Peers known to the gossip subsystem, excluding `exclude` (the caller).
	async fn known_peers(&self, exclude: Option<Peer>) -> Vec<Peer>;
}

/// Process-wide dedup cache over recently observed identifiers. `insert`
/// must be an atomic compare-and-insert: it returns `true` only for the
/// caller that wins the race.
pub trait IgnoreSet: Send + Sync {
	fn contains(&self, id: Id) -> bool;
	/// Inserts `id`; returns `true` if this call was the first to insert it.
	fn insert(&self, id: Id) -> bool;
}

/// Peer ban bookkeeping.
#[async_trait]
pub trait Blacklist: Send + Sync {
	async fn is_banned(&self, peer: Peer) -> bool;
	async fn ban(&self, peer: Peer, duration: Duration);
}

/// Proof-of-work validator.
#[async_trait]
pub trait Miner: Send + Sync {
	async fn validate(&self, bds: Id, nonce: &[u8], diff: u64, height: u64) -> PowOutcome;
}

/// Reconstructs a full block from a shadow plus a recall-size hint, and
/// verifies a shadow's timestamp against the acceptable skew window.
#[async_trait]
pub trait BlockBuilder: Send + Sync {
	fn verify_timestamp(&self, shadow: &BlockShadow, now: i64) -> bool;
	async fn generate_block_from_shadow(
		&self,
		shadow: &BlockShadow,
		recall_size: u64,
	) -> Result<RecallHint>;
}

/// The external replay-pool verifier consulted by mempool admission.
#[async_trait]
pub trait ReplayPool: Send + Sync {
	async fn verify_tx(
		&self,
		tx: &Tx,
		diff: u64,
		height: u64,
		block_txs_pairs: &[(Id, Vec<Id>)],
		mempool_ids: &[Id],
		wallet_list: &[WalletEntry],
	) -> ReplayOutcome;
}

/// The wallet keystore and signer, used only by the internal API.
#[async_trait]
pub trait Wallet: Send + Sync {
	async fn new_keyfile(&self, code: &str) -> Result<Vec<u8>>;
	async fn sign(&self, tx: &mut Tx) -> Result<()>;
}
