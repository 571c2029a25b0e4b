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

//! The semantic shape of a decoded value, independent of how it is encoded on the wire.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Spec {
	Unknown,
	/// Decoded but left out of human output.
	Skip,
	Null,
	Bool,
	Int,
	Bigint,
	Balance {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		currency: Option<BalanceCurrency>,
	},
	Currency,
	String,
	Hash,
	Address {
		format: AddressSpec,
	},
	Map {
		keys: Box<Spec>,
		values: Box<Spec>,
	},
	Object {
		props: Vec<NamedSpec>,
	},
	Array {
		items: Box<Spec>,
	},
	Tuple {
		items: Vec<Spec>,
	},
	Lookup {
		id: u32,
	},
}

impl Spec {
	pub fn balance() -> Self {
		Spec::Balance { currency: None }
	}

	pub fn is_balance(&self) -> bool {
		matches!(self, Spec::Balance { .. })
	}

	pub fn is_currency(&self) -> bool {
		matches!(self, Spec::Currency)
	}

	pub fn is_array_of_balances(&self) -> bool {
		matches!(self, Spec::Array { items } if items.is_balance())
	}

	pub fn is_array_of_currencies(&self) -> bool {
		matches!(self, Spec::Array { items } if items.is_currency())
	}

	pub fn is_tuple_of_two_currencies(&self) -> bool {
		matches!(self, Spec::Tuple { items } if items.len() == 2 && items.iter().all(Spec::is_currency))
	}

	/// A `(currency, balance)` pair.
	pub fn is_currency_balance_pair(&self) -> bool {
		matches!(self, Spec::Tuple { items } if items.len() == 2 && items[0].is_currency() && items[1].is_balance())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSpec {
	pub name: String,
	pub spec: Spec,
}

impl NamedSpec {
	pub fn new(name: impl Into<String>, spec: Spec) -> Self {
		Self { name: name.into(), spec }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AddressSpec {
	Substrate { ss58_prefix: u16 },
	Evm,
}

/// Where a balance finds its currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BalanceCurrency {
	/// A fixed token symbol.
	Plain { symbol: String },
	/// Position of a currency argument. Never resolved; such balances stay unscaled.
	Index { index: usize },
	/// Rewrite the balance's own path into the path of the argument holding its currency.
	/// A `lookup2` rule must agree with `lookup` on the symbol for the currency to apply.
	Lookup {
		lookup: PathRule,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		lookup2: Option<PathRule>,
	},
}

const LAST_SEGMENT: &str = r"^(?P<prefix>(?:[A-Za-z0-9_-]+\.)*)[A-Za-z0-9_-]+$";
const ITEM_OF_LAST_SEGMENT: &str = r"^(?P<prefix>(?:[A-Za-z0-9_-]+\.)*?)[A-Za-z0-9_-]+\.(?P<index>[0-9]+)$";
const TUPLE_SLOT: &str = r"^(?P<prefix>.+)\.[0-9]+$";

lazy_static! {
	static ref BUILTIN_PATTERNS: Vec<(&'static str, Regex)> = [LAST_SEGMENT, ITEM_OF_LAST_SEGMENT, TUPLE_SLOT]
		.into_iter()
		.map(|pattern| (pattern, Regex::new(pattern).expect("valid regex")))
		.collect();
}

/// A match pattern and a replacement template applied to a dotted argument path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
	pub pattern: String,
	pub replace: String,
}

impl PathRule {
	pub fn new(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
		Self { pattern: pattern.into(), replace: replace.into() }
	}

	/// Rule pointing at a sibling of the last path segment: `info.amount` becomes `info.<name>`.
	pub fn sibling(name: &str) -> Self {
		Self::new(LAST_SEGMENT, format!("${{prefix}}{}", name))
	}

	/// Rule pointing at the same index of a sibling array: `amounts.3` becomes `<name>.3`.
	pub fn sibling_item(name: &str) -> Self {
		Self::new(ITEM_OF_LAST_SEGMENT, format!("${{prefix}}{}.${{index}}", name))
	}

	/// Rule pointing at a slot of a tuple sibling: `amount` becomes `<name>.<slot>`.
	pub fn sibling_slot(name: &str, slot: usize) -> Self {
		Self::new(LAST_SEGMENT, format!("${{prefix}}{}.{}", name, slot))
	}

	/// Rule pointing at the first slot of the tuple the balance lives in: `pair.1` becomes `pair.0`.
	pub fn own_tuple_head() -> Self {
		Self::new(TUPLE_SLOT, "${prefix}.0")
	}

	/// Rewrite `path`, or `None` when the pattern does not match or is invalid.
	pub fn apply(&self, path: &str) -> Option<String> {
		let re = match self.regex() {
			Ok(re) => re,
			Err(e) => {
				log::warn!("invalid currency path pattern {}: {}", self.pattern, e);
				return None;
			}
		};
		if !re.is_match(path) {
			return None;
		}
		Some(re.replace(path, self.replace.as_str()).into_owned())
	}

	/// The compiled pattern; the patterns of the built-in rules are compiled once.
	fn regex(&self) -> Result<Cow<'static, Regex>, regex::Error> {
		match BUILTIN_PATTERNS.iter().find(|(pattern, _)| *pattern == self.pattern) {
			Some((_, re)) => Ok(Cow::Borrowed(re)),
			None => Regex::new(&self.pattern).map(Cow::Owned),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_point_at_siblings() {
		assert_eq!(PathRule::sibling("currency_id").apply("amount"), Some("currency_id".to_string()));
		assert_eq!(PathRule::sibling("currency_id").apply("info.amount"), Some("info.currency_id".to_string()));
	}

	#[test]
	fn should_compile_builtin_rules_once() {
		for rule in [PathRule::sibling("a"), PathRule::sibling_item("a"), PathRule::sibling_slot("a", 1), PathRule::own_tuple_head()] {
			assert!(matches!(rule.regex(), Ok(Cow::Borrowed(_))));
		}
		let custom = PathRule::new(r"^amount$", "currency");
		assert!(matches!(custom.regex(), Ok(Cow::Owned(_))));
		assert_eq!(custom.apply("amount"), Some("currency".to_string()));
		assert_eq!(PathRule::new("(", "x").apply("amount"), None);
	}

	#[test]
	fn should_point_at_sibling_items() {
		let rule = PathRule::sibling_item("currencies");
		assert_eq!(rule.apply("amounts.3"), Some("currencies.3".to_string()));
		assert_eq!(rule.apply("info.amounts.0"), Some("info.currencies.0".to_string()));
		assert_eq!(rule.apply("amounts"), None);
	}

	#[test]
	fn should_point_at_tuple_slots() {
		assert_eq!(PathRule::sibling_slot("pair", 1).apply("amount"), Some("pair.1".to_string()));
		assert_eq!(PathRule::own_tuple_head().apply("fees.2.1"), Some("fees.2.0".to_string()));
	}

	#[test]
	fn should_classify_specs() {
		let pair = Spec::Tuple { items: vec![Spec::Currency, Spec::balance()] };
		assert!(pair.is_currency_balance_pair());
		assert!(!pair.is_tuple_of_two_currencies());
		let currencies = Spec::Tuple { items: vec![Spec::Currency, Spec::Currency] };
		assert!(currencies.is_tuple_of_two_currencies());
		assert!(Spec::Array { items: Box::new(Spec::balance()) }.is_array_of_balances());
	}
}
