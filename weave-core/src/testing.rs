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

//! In-memory mock collaborators, used by `weave-api`'s unit and integration
//! tests. Not part of the public contract of this crate's production use.

use crate::error::{CollaboratorError, ErrorKind};
use crate::hash::Id;
use crate::interfaces::*;
use crate::types::*;
use async_trait::async_trait;
use dashmap::DashSet;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// A fixed-state node, for read-handler tests.
pub struct MockNode {
	pub height: AtomicU64,
	pub joined: AtomicBool,
	pub hash_list: RwLock<Vec<Id>>,
	pub wallets: RwLock<HashMap<String, WalletEntry>>,
	pub diff: AtomicU64,
}

impl Default for MockNode {
	fn default() -> Self {
		MockNode {
			height: AtomicU64::new(0),
			joined: AtomicBool::new(true),
			hash_list: RwLock::new(Vec::new()),
			wallets: RwLock::new(HashMap::new()),
			diff: AtomicU64::new(1),
		}
	}
}

#[async_trait]
impl NodeState for MockNode {
	async fn height(&self) -> Option<u64> {
		if self.joined.load(Ordering::SeqCst) {
			Some(self.height.load(Ordering::SeqCst))
		} else {
			None
		}
	}

	async fn current_block_hash(&self) -> Option<Id> {
		self.hash_list.read().first().copied()
	}

	async fn hash_list(&self) -> Vec<Id> {
		self.hash_list.read().clone()
	}

	async fn is_joined(&self) -> bool {
		self.joined.load(Ordering::SeqCst)
	}

	async fn diff(&self, _height: u64) -> Result<u64> {
		Ok(self.diff.load(Ordering::SeqCst))
	}

	async fn current_diff(&self) -> Result<u64> {
		Ok(self.diff.load(Ordering::SeqCst))
	}

	async fn wallet_list(&self) -> Vec<WalletEntry> {
		self.wallets.read().values().cloned().collect()
	}

	async fn balance(&self, address: &str) -> Result<u64> {
		self.wallets
			.read()
			.get(address)
			.map(|w| w.balance)
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn last_tx(&self, address: &str) -> Result<Id> {
		self.wallets
			.read()
			.get(address)
			.map(|w| w.last_tx)
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn block_txs_pairs(&self) -> Vec<(Id, Vec<Id>)> {
		Vec::new()
	}
}

/// A process-wide dedup set, backed by `DashSet` for atomic
/// compare-and-insert semantics.
#[derive(Default)]
pub struct MockIgnoreSet(DashSet<Id>);

impl IgnoreSet for MockIgnoreSet {
	fn contains(&self, id: Id) -> bool {
		self.0.contains(&id)
	}

	fn insert(&self, id: Id) -> bool {
		self.0.insert(id)
	}
}

#[derive(Default)]
pub struct MockBlacklist(RwLock<HashMap<Peer, std::time::Instant>>);

#[async_trait]
impl Blacklist for MockBlacklist {
	async fn is_banned(&self, peer: Peer) -> bool {
		match self.0.read().get(&peer) {
			Some(expiry) => *expiry > std::time::Instant::now(),
			None => false,
		}
	}

	async fn ban(&self, peer: Peer, duration: Duration) {
		self.0
			.write()
			.insert(peer, std::time::Instant::now() + duration);
	}
}

#[derive(Default)]
pub struct MockBridge {
	pub peers: RwLock<Vec<Peer>>,
	pub txs: RwLock<Vec<Tx>>,
	pub blocks: RwLock<Vec<(Peer, BlockShadow, Id)>>,
}

#[async_trait]
impl Bridge for MockBridge {
	async fn add_remote_peer(&self, peer: Peer) {
		self.peers.write().push(peer);
	}

	async fn add_tx(&self, tx: Tx) {
		self.txs.write().push(tx);
	}

	async fn add_block(&self, peer: Peer, block: BlockShadow, bds: Id, _recall: RecallHint) {
		self.blocks.write().push((peer, block, bds));
	}

	async fn known_peers(&self, exclude: Option<Peer>) -> Vec<Peer> {
		self.peers
			.read()
			.iter()
			.copied()
			.filter(|p| Some(*p) != exclude)
			.collect()
	}
}

pub struct AlwaysValidMiner;

#[async_trait]
impl Miner for AlwaysValidMiner {
	async fn validate(&self, _bds: Id, _nonce: &[u8], _diff: u64, _height: u64) -> PowOutcome {
		PowOutcome::Valid
	}
}

pub struct AlwaysInvalidMiner;

#[async_trait]
impl Miner for AlwaysInvalidMiner {
	async fn validate(&self, _bds: Id, _nonce: &[u8], _diff: u64, _height: u64) -> PowOutcome {
		PowOutcome::Invalid
	}
}

pub struct PermissiveReplayPool;

#[async_trait]
impl ReplayPool for PermissiveReplayPool {
	async fn verify_tx(
		&self,
		_tx: &Tx,
		_diff: u64,
		_height: u64,
		_pairs: &[(Id, Vec<Id>)],
		_mempool_ids: &[Id],
		_wallet_list: &[WalletEntry],
	) -> ReplayOutcome {
		ReplayOutcome::Valid
	}
}

/// An in-memory store keyed by caller-assigned filenames, standing in for
/// on-disk block/tx storage.
#[derive(Default)]
pub struct MockStorage {
	pub tx_files: RwLock<HashMap<Id, (String, Vec<u8>)>>,
	pub block_files: RwLock<HashMap<BlockKey, (String, Vec<u8>)>>,
}

impl MockStorage {
	pub fn put_tx(&self, id: Id, bytes: Vec<u8>) {
		self.tx_files.write().insert(id, (id.to_base64url(), bytes));
	}

	pub fn put_block(&self, key: BlockKey, bytes: Vec<u8>) {
		self.block_files.write().insert(key, (format!("{:?}", key), bytes));
	}
}

#[async_trait]
impl Storage for MockStorage {
	async fn lookup_tx_filename(&self, id: Id) -> Result<String> {
		self.tx_files
			.read()
			.get(&id)
			.map(|(path, _)| path.clone())
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn lookup_block_filename(&self, key: BlockKey) -> Result<String> {
		self.block_files
			.read()
			.get(&key)
			.map(|(path, _)| path.clone())
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn read_tx_file(&self, path: &str) -> Result<Vec<u8>> {
		self.tx_files
			.read()
			.values()
			.find(|(p, _)| p == path)
			.map(|(_, bytes)| bytes.clone())
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn read_block_file(&self, path: &str, _hash_list: &[Id]) -> Result<Vec<u8>> {
		self.block_files
			.read()
			.values()
			.find(|(p, _)| p == path)
			.map(|(_, bytes)| bytes.clone())
			.ok_or_else(|| ErrorKind::NotFound.into())
	}

	async fn blocks_on_disk(&self) -> Result<u64> {
		Ok(self.block_files.read().len() as u64)
	}
}

/// A tag index over a fixed set of (tag_name, tag_value) -> ids mappings,
/// with insertion order treated as canonical (newest-first) order.
#[derive(Default)]
pub struct MockTxSearch {
	pub entries: RwLock<HashMap<(Vec<u8>, Vec<u8>), Vec<Id>>>,
	pub tags: RwLock<HashMap<Id, Vec<Tag>>>,
}

#[async_trait]
impl TxSearch for MockTxSearch {
	async fn entries(&self, tag_name: &[u8], value: &[u8]) -> Vec<Id> {
		self.entries
			.read()
			.get(&(tag_name.to_vec(), value.to_vec()))
			.cloned()
			.unwrap_or_default()
	}

	async fn tags_by_id(&self, id: Id) -> Option<Vec<Tag>> {
		self.tags.read().get(&id).cloned()
	}

	fn sort_ids(&self, _ids: &mut Vec<Id>) {}
}

#[derive(Default)]
pub struct PermissiveBlockBuilder;

#[async_trait]
impl BlockBuilder for PermissiveBlockBuilder {
	fn verify_timestamp(&self, _shadow: &BlockShadow, _now: i64) -> bool {
		true
	}

	async fn generate_block_from_shadow(&self, shadow: &BlockShadow, recall_size: u64) -> Result<RecallHint> {
		Ok(RecallHint {
			recall_indep_hash: shadow.previous_block,
			recall_size,
			key: Vec::new(),
			nonce: Vec::new(),
		})
	}
}

#[derive(Default)]
pub struct MockWallet;

#[async_trait]
impl Wallet for MockWallet {
	async fn new_keyfile(&self, _code: &str) -> Result<Vec<u8>> {
		Ok(b"keyfile-bytes".to_vec())
	}

	async fn sign(&self, tx: &mut Tx) -> Result<()> {
		tx.signature = b"signed".to_vec();
		Ok(())
	}
}

pub fn err(kind: ErrorKind) -> CollaboratorError {
	kind.into()
}
