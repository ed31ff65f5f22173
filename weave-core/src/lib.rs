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

//! Domain types and external-collaborator interfaces shared by the weave
//! node's HTTP request-processing core. This crate owns no I/O: it is the
//! vocabulary `weave-api` is written against.

pub mod error;
pub mod hash;
pub mod interfaces;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{CollaboratorError, ErrorKind};
pub use hash::Id;
