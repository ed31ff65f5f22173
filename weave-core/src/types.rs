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

//! Domain types shared between the request-processing core and its external
//! collaborators. None of these types know how to validate themselves against
//! consensus rules; that lives behind the traits in [`crate::interfaces`].

use crate::hash::Id;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A p2p peer address. The unit of identity for the blacklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
	pub ip: Ipv4Addr,
	pub port: u16,
}

impl Peer {
	pub fn new(ip: Ipv4Addr, port: u16) -> Self {
		Peer { ip, port }
	}
}

impl std::fmt::Display for Peer {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}:{}", self.ip, self.port)
	}
}

/// An ordered name/value tag attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub name: Vec<u8>,
	pub value: Vec<u8>,
}

/// A posted or mined transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
	pub id: Id,
	pub owner: Vec<u8>,
	pub target: String,
	pub quantity: u64,
	pub data: Vec<u8>,
	pub reward: u64,
	pub signature: Vec<u8>,
	pub last_tx: Id,
	#[serde(default)]
	pub tags: Vec<Tag>,
}

impl Tx {
	pub fn data_size(&self) -> usize {
		self.data.len()
	}
}

/// The subset of a block a peer transmits for gossip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockShadow {
	pub indep_hash: Id,
	pub previous_block: Id,
	pub height: u64,
	pub diff: u64,
	pub nonce: Vec<u8>,
	pub timestamp: i64,
	pub last_retarget: i64,
	pub reward_addr: String,
	pub txs: Vec<Id>,
	pub wallet_list_root: Id,
	pub hash_list_root: Id,
	/// Hash of the portion of the block covered by the proof of work. Absent
	/// means the posting peer sent a malformed envelope.
	pub block_data_segment: Option<Id>,
}

/// (address, balance, last_tx) as held in the wallet list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
	pub address: String,
	pub balance: u64,
	pub last_tx: Id,
}

/// A recall hint used to reconstruct a full block from its shadow.
#[derive(Debug, Clone)]
pub struct RecallHint {
	pub recall_indep_hash: Id,
	pub recall_size: u64,
	pub key: Vec<u8>,
	pub nonce: Vec<u8>,
}

/// Outcome of a replay-pool admission check (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
	Valid,
	TxVerificationFailed,
	InvalidLastTx,
	LastTxInMempool,
	TxBadAnchor,
	TxAlreadyInWeave,
	TxAlreadyInMempool,
}

/// Outcome of a proof-of-work validation (§4.7 stage 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowOutcome {
	Valid,
	Invalid,
}

/// A registered external service ({name, host, expires}), per §4.11.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntry {
	pub name: String,
	pub host: String,
	pub expires: i64,
}
