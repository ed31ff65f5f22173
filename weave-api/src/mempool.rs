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

//! The pending-transaction set (§3, §5). The size check and the insertion
//! that follows it are guarded by the same lock so two concurrent
//! admissions near the limit cannot both observe room and both insert.

use parking_lot::RwLock;
use std::collections::HashMap;
use weave_core::hash::Id;
use weave_core::types::Tx;

#[derive(Default)]
pub struct Mempool {
	inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
	txs: HashMap<Id, Tx>,
	total_data_bytes: usize,
}

pub enum AdmitOutcome {
	Admitted,
	WouldExceedLimit,
}

impl Mempool {
	/// Atomically checks the size cap against `tx` and, if there's room,
	/// inserts it. `limit` of `None` means the cap is not enforced (pre-fork,
	/// per the distilled spec's Open Question (b)).
	pub fn try_admit(&self, tx: Tx, limit: Option<usize>) -> AdmitOutcome {
		let mut inner = self.inner.write();
		if let Some(limit) = limit {
			if inner.total_data_bytes + tx.data_size() > limit {
				return AdmitOutcome::WouldExceedLimit;
			}
		}
		inner.total_data_bytes += tx.data_size();
		inner.txs.insert(tx.id, tx);
		AdmitOutcome::Admitted
	}

	pub fn contains(&self, id: Id) -> bool {
		self.inner.read().txs.contains_key(&id)
	}

	pub fn ids(&self) -> Vec<Id> {
		self.inner.read().txs.keys().copied().collect()
	}

	pub fn total_data_bytes(&self) -> usize {
		self.inner.read().total_data_bytes
	}

	pub fn len(&self) -> usize {
		self.inner.read().txs.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tx_with_data(id: u8, data_len: usize) -> Tx {
		Tx {
			id: Id([id; 32]),
			owner: vec![],
			target: String::new(),
			quantity: 0,
			data: vec![0u8; data_len],
			reward: 0,
			signature: vec![],
			last_tx: Id::default(),
			tags: vec![],
		}
	}

	#[test]
	fn admits_while_under_the_limit() {
		let pool = Mempool::default();
		assert!(matches!(
			pool.try_admit(tx_with_data(1, 10), Some(20)),
			AdmitOutcome::Admitted
		));
		assert_eq!(pool.total_data_bytes(), 10);
	}

	#[test]
	fn rejects_the_admission_that_would_exceed_the_limit() {
		let pool = Mempool::default();
		assert!(matches!(
			pool.try_admit(tx_with_data(1, 15), Some(20)),
			AdmitOutcome::Admitted
		));
		assert!(matches!(
			pool.try_admit(tx_with_data(2, 10), Some(20)),
			AdmitOutcome::WouldExceedLimit
		));
		assert_eq!(pool.len(), 1);
	}

	#[test]
	fn no_limit_always_admits() {
		let pool = Mempool::default();
		assert!(matches!(
			pool.try_admit(tx_with_data(1, 1_000_000), None),
			AdmitOutcome::Admitted
		));
	}
}
