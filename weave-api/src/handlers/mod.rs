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

//! One module per group of endpoints, grouped the way the teacher splits
//! `peers_api`, `pool_api`, and `server_api` under `handlers/`.

pub mod arql;
pub mod block;
pub mod internal;
pub mod peers;
pub mod read;
pub mod services;
pub mod tx;

pub(crate) fn parse_height(segment: &str) -> Result<u64, crate::error::Error> {
	segment
		.parse::<u64>()
		.map_err(|_| crate::error::ErrorKind::Validation("Invalid height.".to_string()).into())
}

pub(crate) fn parse_id(segment: &str) -> Result<weave_core::Id, crate::error::Error> {
	weave_core::Id::from_base64url(segment)
		.map_err(|_| crate::error::ErrorKind::Validation("Invalid hash.".to_string()).into())
}

/// Validates a wallet address's base64url encoding (§4.3); the address is
/// otherwise kept as the caller's string rather than a parsed `Id`, since
/// `WalletEntry::address` is a plain string key.
pub(crate) fn parse_address(segment: &str) -> Result<&str, crate::error::Error> {
	weave_core::Id::from_base64url(segment)
		.map(|_| segment)
		.map_err(|_| crate::error::ErrorKind::Validation("Invalid address.".to_string()).into())
}
