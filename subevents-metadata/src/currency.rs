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

//! Token symbols and their decimals, as advertised by the chain.

use serde::Serialize;
use serde_json::Value as Json;
use subevents_common::ChainInfo;

/// Known fields of a currency identifier that carry the token symbol, tried in order.
/// Compared case-insensitively and ignoring underscores, so `Token`, `native_token`
/// and `NativeToken` all match.
const CURRENCY_FIELDS: &[&str] = &["token", "nativetoken", "native"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
	pub symbol: String,
	pub decimals: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyRegistry {
	tokens: Vec<String>,
	decimals: Vec<u32>,
}

impl CurrencyRegistry {
	pub fn new(chain: &ChainInfo) -> Self {
		Self { tokens: chain.tokens.clone(), decimals: chain.decimals.clone() }
	}

	/// Look a symbol up by its position in the token list.
	pub fn get(&self, symbol: &str) -> Option<CurrencyInfo> {
		let index = self.tokens.iter().position(|t| t == symbol)?;
		let decimals = *self.decimals.get(index)?;
		Some(CurrencyInfo { symbol: symbol.to_string(), decimals })
	}

	/// The chain's native token, the first in its token list.
	pub fn native(&self) -> Option<&str> {
		self.tokens.first().map(String::as_str)
	}
}

fn normalize(key: &str) -> String {
	key.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}

/// The token symbol held by a decoded currency identifier.
///
/// Objects are searched for the known symbol fields; a bare string is taken as the symbol.
pub fn extract_symbol(value: &Json) -> Option<String> {
	match value {
		Json::String(symbol) => Some(symbol.clone()),
		Json::Object(map) => CURRENCY_FIELDS.iter().find_map(|wanted| {
			map.iter().find(|(key, _)| normalize(key) == *wanted).and_then(|(_, inner)| extract_symbol(inner))
		}),
		_ => None,
	}
}
