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

//! Runs a handler under a hard wall-clock deadline (§4.1). The worker is
//! spawned onto its own task so the supervisor can forcibly abort it on
//! expiry; whichever of the timer or the worker completes first wins the
//! race, matching `tokio::time::timeout`'s semantics exactly.

use crate::web::Reply;
use hyper::{Method, StatusCode};
use std::future::Future;
use std::time::Duration;

/// Runs `handler` to completion, or returns a 500 "Handler timeout" response
/// and aborts the handler task if it doesn't finish within `timeout`.
pub async fn supervise<F>(method: Method, path: String, timeout: Duration, handler: F) -> Reply
where
	F: Future<Output = Reply> + Send + 'static,
{
	let worker = tokio::spawn(handler);
	let abort_handle = worker.abort_handle();
	tokio::select! {
		res = worker => {
			match res {
				Ok(reply) => reply,
				Err(join_err) if join_err.is_cancelled() => {
					Reply::new(StatusCode::INTERNAL_SERVER_ERROR, "Handler timeout")
				}
				Err(join_err) => {
					log::warn!("handler panicked method={} path={}: {}", method, path, join_err);
					Reply::new(StatusCode::INTERNAL_SERVER_ERROR, "Handler timeout")
				}
			}
		}
		_ = tokio::time::sleep(timeout) => {
			log::warn!("handler_timeout method={} path={}", method, path);
			abort_handle.abort();
			Reply::new(StatusCode::INTERNAL_SERVER_ERROR, "Handler timeout")
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn fast_handler_wins() {
		let reply = supervise(Method::GET, "/time".to_string(), Duration::from_secs(1), async {
			Reply::new(StatusCode::OK, "1700000000")
		})
		.await;
		assert_eq!(reply.status, StatusCode::OK);
	}

	#[tokio::test]
	async fn slow_handler_times_out() {
		let reply = supervise(
			Method::GET,
			"/slow".to_string(),
			Duration::from_millis(20),
			async {
				tokio::time::sleep(Duration::from_secs(5)).await;
				Reply::new(StatusCode::OK, "too late")
			},
		)
		.await;
		assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(reply.body, b"Handler timeout".to_vec());
	}
}
