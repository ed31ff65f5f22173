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

//! Derives a wallet address from an owner public key. An address is the
//! base64url digest of the owner field, the same derivation the rest of the
//! node's wallet list is keyed by.

use ring::digest;

pub fn derive(owner: &[u8]) -> String {
	let digest = digest::digest(&digest::SHA256, owner);
	base64::encode_config(digest.as_ref(), base64::URL_SAFE_NO_PAD)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn is_deterministic() {
		assert_eq!(derive(b"owner-key"), derive(b"owner-key"));
	}

	#[test]
	fn differs_for_different_owners() {
		assert_ne!(derive(b"owner-a"), derive(b"owner-b"));
	}
}
