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

//! Typed server configuration. Everything the distilled spec calls a fixed
//! constant lives here as a `Default`-constructed value, overridable per
//! deployment the way the teacher's node config layers a TOML file over
//! built-in defaults.

use std::time::Duration;

pub const DEFAULT_P2P_PORT: u16 = 1984;

#[derive(Debug, Clone)]
pub struct Config {
	/// Network name reported by `/info` (§4.4).
	pub network: String,
	/// Node version and release reported by `/info`.
	pub version: u32,
	pub release: u32,
	/// Hard wall-clock deadline for any single request (§4.1).
	pub handler_timeout: Duration,
	/// Maximum accepted request body size, in bytes (§4.2).
	pub max_body_size: usize,
	/// Height window tolerated around the current tip for posted blocks (§4.7 stage 6).
	pub store_blocks_behind_current: u64,
	/// Protocol difficulty floor consulted at §4.7 stage 7.
	pub min_difficulty: u64,
	/// Ban duration applied to peers whose posted PoW fails validation (§4.7 stage 8).
	pub bad_pow_ban_time: Duration,
	/// Total payload-byte budget across all mempool transactions, enforced from
	/// `fork_height_1_8` onward (§4.6 stage 2).
	pub total_waiting_txs_data_size_limit: usize,
	/// Height at which the mempool size cap starts being enforced.
	pub fork_height_1_8: u64,
	/// Index into the hash list used by `/tx_anchor` (§4.4, §8 property 8).
	pub max_tx_anchor_depth: usize,
	/// Wait budget for acquiring an ARQL concurrency permit (§4.8 stage 1).
	pub arql_wait_budget: Duration,
	/// Number of concurrent ARQL evaluations allowed.
	pub arql_concurrency: usize,
	/// Shared secret gating `/wallet` and `/unsigned_tx`. `None` disables the
	/// internal API entirely (§4.9).
	pub internal_api_secret: Option<String>,
	/// Jitter sleep bounds applied to every rejected internal-API request.
	pub internal_api_jitter: (Duration, Duration),
	/// Whether to emit a structured `http_request` log line per request (§4.10).
	pub http_logging: bool,
	/// Whether legacy (`x-block-format: 1`) block responses are served.
	pub api_compat: bool,
	/// Whether `/block/{hash|height}/{id}/{field}` is enabled.
	pub subfield_queries: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			network: "weave.N.1".to_string(),
			version: 5,
			release: 43,
			handler_timeout: Duration::from_secs(55),
			max_body_size: 15 * 1024 * 1024,
			store_blocks_behind_current: 50,
			min_difficulty: 1,
			bad_pow_ban_time: Duration::from_secs(60 * 60 * 24),
			total_waiting_txs_data_size_limit: 500 * 1024 * 1024,
			fork_height_1_8: 235_200,
			max_tx_anchor_depth: 50,
			arql_wait_budget: Duration::from_secs(5),
			arql_concurrency: 10,
			internal_api_secret: None,
			internal_api_jitter: (Duration::from_millis(1000), Duration::from_millis(2000)),
			http_logging: true,
			api_compat: true,
			subfield_queries: true,
		}
	}
}
