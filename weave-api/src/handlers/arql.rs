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

//! ARQL query evaluation (§4.8, POST /arql). The concurrency gate bounds how
//! much search load the external tag index absorbs at once; a query that
//! can't acquire a permit within the wait budget is dropped rather than
//! queued indefinitely.

use crate::error::ErrorKind;
use crate::state::AppState;
use crate::web::{error_reply, ok_json, Reply};
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::collections::BTreeSet;
use weave_core::Id;

#[derive(Debug, Deserialize)]
#[serde(tag = "op")]
enum Query {
	#[serde(rename = "and")]
	And { expr1: Box<Query>, expr2: Box<Query> },
	#[serde(rename = "or")]
	Or { expr1: Box<Query>, expr2: Box<Query> },
	#[serde(rename = "equals")]
	Equals { expr1: String, expr2: String },
}

fn evaluate<'a>(state: &'a AppState, query: &'a Query) -> BoxFuture<'a, BTreeSet<Id>> {
	async move {
		match query {
			Query::Equals { expr1, expr2 } => state
				.tx_search
				.entries(expr1.as_bytes(), expr2.as_bytes())
				.await
				.into_iter()
				.collect(),
			Query::And { expr1, expr2 } => {
				let (a, b) = (evaluate(state, expr1).await, evaluate(state, expr2).await);
				a.intersection(&b).copied().collect()
			}
			Query::Or { expr1, expr2 } => {
				let (a, b) = (evaluate(state, expr1).await, evaluate(state, expr2).await);
				a.union(&b).copied().collect()
			}
		}
	}
	.boxed()
}

pub async fn query(state: &AppState, body: &[u8]) -> Reply {
	let permit = match tokio::time::timeout(state.config.arql_wait_budget, state.arql_gate.acquire()).await {
		Ok(Ok(permit)) => permit,
		_ => return error_reply(ErrorKind::Unavailable("ARQL gate exhausted.".to_string()).into()),
	};

	let query: Query = match serde_json::from_slice(body) {
		Ok(q) => q,
		Err(_) => return error_reply(ErrorKind::Validation("Invalid ARQL query.".to_string()).into()),
	};

	let ids = evaluate(state, &query).await;
	drop(permit);

	let mut ids: Vec<Id> = ids.into_iter().collect();
	state.tx_search.sort_ids(&mut ids);
	ok_json(&ids)
}
