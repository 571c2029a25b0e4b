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

use serde::{Deserialize, Serialize};

/// Snapshot of the node and chain a catalog is built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct About {
	pub node: NodeInfo,
	pub block: BlockInfo,
	pub chain: ChainInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
	pub name: String,
	pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
	pub number: u64,
	pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
	pub name: String,
	pub version: u32,
	#[serde(default)]
	pub address_format: AddressFormat,
	#[serde(default)]
	pub ss58_prefix: Option<u16>,
	/// Token symbols; the first one is the native token.
	#[serde(default)]
	pub tokens: Vec<String>,
	/// Decimals of the token at the same position in `tokens`.
	#[serde(default)]
	pub decimals: Vec<u32>,
}

impl ChainInfo {
	/// SS58 prefix of the chain, falling back to the generic substrate prefix.
	pub fn ss58_prefix(&self) -> u16 {
		self.ss58_prefix.unwrap_or(42)
	}

	pub fn native_token(&self) -> Option<&str> {
		self.tokens.first().map(String::as_str)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFormat {
	#[default]
	Substrate,
	Evm,
}
