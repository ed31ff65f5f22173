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

//! Fee estimation (§4.5). Pessimistic by design: a quote is the larger of
//! the price computed at the current difficulty and at the next one, so a
//! client that submits right before a retarget never underpays.

const PRICE_PER_BYTE_PER_DIFF: u64 = 1;
const NEW_WALLET_SURCHARGE: u64 = 10_000;

fn price_at(diff: u64, size_bytes: u64, new_wallet: bool) -> u64 {
	let base = diff.saturating_mul(PRICE_PER_BYTE_PER_DIFF).saturating_mul(size_bytes);
	if new_wallet {
		base.saturating_add(NEW_WALLET_SURCHARGE)
	} else {
		base
	}
}

/// `diff_h` is the difficulty at the current height; `diff_h1` is the
/// difficulty the node projects for the next height.
pub fn estimate_tx_price(size_bytes: u64, diff_h: u64, diff_h1: u64, new_wallet: bool) -> u64 {
	price_at(diff_h, size_bytes, new_wallet).max(price_at(diff_h1, size_bytes, new_wallet))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn takes_the_larger_of_the_two_diffs() {
		let quote = estimate_tx_price(100, 1, 5, false);
		assert_eq!(quote, price_at(5, 100, false));
	}

	#[test]
	fn new_wallets_are_surcharged() {
		assert!(estimate_tx_price(100, 2, 2, true) > estimate_tx_price(100, 2, 2, false));
	}
}
