// Copyright 2021 Parity Technologies (UK) Ltd.
// This file is part of subevents.
//
// subevents is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// subevents is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with subevents.  If not, see <http://www.gnu.org/licenses/>.

//! Out of band queries against live chain state.

use futures::future::LocalBoxFuture;
use scale_value::Value;

#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
	#[error("chain query failed: {0}")]
	Failed(String),
	#[error("cannot decode call: {0}")]
	Decode(String),
}

/// Access to the live chain, needed only by a few human formatters.
///
/// Both methods are asynchronous so that parsers can await them at the point of use.
pub trait ChainQuery {
	/// Display identity registered for an account, if any.
	fn identity<'a>(&'a self, account: &'a str) -> LocalBoxFuture<'a, Result<Option<String>, QueryError>>;

	/// Decode an opaque, SCALE encoded call into a `Pallet(Call { .. })` shaped value.
	fn decode_call<'a>(&'a self, bytes: &'a [u8]) -> LocalBoxFuture<'a, Result<Value, QueryError>>;
}
