// Copyright 2016 The Grin Developers
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

//! 32-byte identifiers (transaction ids, block independent hashes, block data
//! segment hashes). The wire/JSON representation is base64url, not hex: every
//! id that crosses the HTTP boundary is base64url-encoded without padding.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt;

pub const HASH_SIZE: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(pub [u8; HASH_SIZE]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdParseError {
	InvalidBase64,
	WrongLength(usize),
}

impl fmt::Display for IdParseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			IdParseError::InvalidBase64 => write!(f, "invalid base64url encoding"),
			IdParseError::WrongLength(n) => write!(f, "expected {} bytes, got {}", HASH_SIZE, n),
		}
	}
}

impl Id {
	pub fn from_base64url(s: &str) -> Result<Id, IdParseError> {
		let bytes = base64::decode_config(s, base64::URL_SAFE_NO_PAD)
			.map_err(|_| IdParseError::InvalidBase64)?;
		Id::try_from(bytes.as_slice())
	}

	pub fn to_base64url(&self) -> String {
		base64::encode_config(&self.0, base64::URL_SAFE_NO_PAD)
	}
}

impl TryFrom<&[u8]> for Id {
	type Error = IdParseError;

	fn try_from(bytes: &[u8]) -> Result<Id, IdParseError> {
		if bytes.len() != HASH_SIZE {
			return Err(IdParseError::WrongLength(bytes.len()));
		}
		let mut out = [0u8; HASH_SIZE];
		out.copy_from_slice(bytes);
		Ok(Id(out))
	}
}

impl fmt::Debug for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Id({})", self.to_base64url())
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.to_base64url())
	}
}

impl Serialize for Id {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		s.serialize_str(&self.to_base64url())
	}
}

impl<'de> Deserialize<'de> for Id {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Id, D::Error> {
		struct IdVisitor;
		impl<'de> Visitor<'de> for IdVisitor {
			type Value = Id;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				write!(f, "a base64url-encoded 32-byte identifier")
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
				Id::from_base64url(v).map_err(de::Error::custom)
			}
		}
		d.deserialize_str(IdVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_through_base64url() {
		let id = Id([7u8; HASH_SIZE]);
		let encoded = id.to_base64url();
		assert!(!encoded.contains('+') && !encoded.contains('/'));
		assert_eq!(Id::from_base64url(&encoded).unwrap(), id);
	}

	#[test]
	fn rejects_wrong_length() {
		let short = base64::encode_config(&[1u8; 10], base64::URL_SAFE_NO_PAD);
		assert_eq!(
			Id::from_base64url(&short),
			Err(IdParseError::WrongLength(10))
		);
	}
}
