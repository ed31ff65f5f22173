// Copyright 2018 The Grin Developers
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

//! Guards the privileged endpoints (`/wallet`, `/unsigned_tx`) behind a
//! shared secret (§4.9). Every rejection sleeps a random jitter before
//! replying, to flatten the timing signal a naive equality check would leak.

use crate::config::Config;
use crate::error::ErrorKind;
use crate::web::{error_reply, Reply};
use rand::Rng;
use ring::constant_time::verify_slices_are_equal;

/// Checks `provided_secret` (the `x-internal-api-secret` header value, if
/// any) against the configured secret. On any failure — unset secret,
/// missing header, mismatch — sleeps a random jitter in
/// `config.internal_api_jitter` and returns the 421 reply; `Ok(())` lets the
/// caller proceed to the guarded handler.
pub async fn guard(config: &Config, provided_secret: Option<&str>) -> Result<(), Reply> {
	let authorized = match (&config.internal_api_secret, provided_secret) {
		(Some(expected), Some(provided)) => {
			verify_slices_are_equal(expected.as_bytes(), provided.as_bytes()).is_ok()
		}
		_ => false,
	};

	if authorized {
		return Ok(());
	}

	let (lo, hi) = config.internal_api_jitter;
	let jitter_ms = rand::thread_rng().gen_range(lo.as_millis() as u64..hi.as_millis() as u64);
	tokio::time::sleep(std::time::Duration::from_millis(jitter_ms)).await;
	Err(error_reply(ErrorKind::PrivilegeDenied.into()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::{Duration, Instant};

	fn config_with_secret(secret: &str) -> Config {
		Config {
			internal_api_secret: Some(secret.to_string()),
			internal_api_jitter: (Duration::from_millis(20), Duration::from_millis(30)),
			..Config::default()
		}
	}

	#[tokio::test]
	async fn matching_secret_passes() {
		let cfg = config_with_secret("s3cr3t");
		assert!(guard(&cfg, Some("s3cr3t")).await.is_ok());
	}

	#[tokio::test]
	async fn missing_secret_is_rejected_after_jitter() {
		let cfg = config_with_secret("s3cr3t");
		let start = Instant::now();
		let result = guard(&cfg, None).await;
		assert!(result.is_err());
		assert!(start.elapsed() >= Duration::from_millis(20));
	}

	#[tokio::test]
	async fn unset_secret_always_rejects() {
		let cfg = Config {
			internal_api_jitter: (Duration::from_millis(5), Duration::from_millis(10)),
			..Config::default()
		};
		assert!(guard(&cfg, Some("anything")).await.is_err());
	}

	#[tokio::test]
	async fn wrong_secret_is_rejected() {
		let cfg = config_with_secret("s3cr3t");
		assert!(guard(&cfg, Some("wrong")).await.is_err());
	}
}
