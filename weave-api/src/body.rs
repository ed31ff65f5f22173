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

//! Chunked body reading with an enforced size cap (§4.2). Chunks are
//! accumulated as they arrive and the read aborts as soon as the running
//! total exceeds the cap, rather than buffering an oversized body in full
//! before rejecting it (which is what `hyper::body::to_bytes` would do).

use crate::envelope::Envelope;
use crate::error::{Error, ErrorKind};
use bytes::Buf;
use hyper::body::HttpBody;
use hyper::Body;

/// Reads `body` to completion, or returns [`ErrorKind::OversizedBody`] as
/// soon as the accumulated size would exceed `max_body_size`.
pub async fn read_complete_body(mut body: Body, max_body_size: usize) -> Result<Vec<u8>, Error> {
	let mut buf = Vec::new();
	while let Some(chunk) = body.data().await {
		let chunk = chunk.map_err(|e| ErrorKind::Internal(format!("body read failed: {}", e)))?;
		buf.extend_from_slice(chunk.chunk());
		if buf.len() > max_body_size {
			return Err(ErrorKind::OversizedBody.into());
		}
	}
	Ok(buf)
}

/// Convenience wrapper that takes the envelope's body (failing closed if it
/// was already read) and enforces the configured cap.
pub async fn read_envelope_body(
	env: &mut Envelope,
	max_body_size: usize,
) -> Result<Vec<u8>, Error> {
	let body = env
		.take_body()
		.ok_or_else(|| ErrorKind::Internal("body already read".to_string()))?;
	read_complete_body(body, max_body_size).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::stream;

	fn body_from_chunks(chunks: Vec<&'static [u8]>) -> Body {
		Body::wrap_stream(stream::iter(
			chunks.into_iter().map(|c| Ok::<_, std::io::Error>(c)),
		))
	}

	#[tokio::test]
	async fn accepts_body_under_the_cap() {
		let body = body_from_chunks(vec![b"hello", b" world"]);
		let bytes = read_complete_body(body, 100).await.unwrap();
		assert_eq!(bytes, b"hello world");
	}

	#[tokio::test]
	async fn rejects_body_over_the_cap() {
		let body = body_from_chunks(vec![b"0123456789", b"0123456789"]);
		let err = read_complete_body(body, 15).await.unwrap_err();
		assert_eq!(*err.kind(), ErrorKind::OversizedBody);
	}
}
