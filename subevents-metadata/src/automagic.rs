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

//! Guessing which sibling argument holds the currency of a balance.
//!
//! Runs once per catalog entry over its argument list, and once per referenced type
//! in the lookup table. The first strategy whose
//! sibling counts match wins:
//!
//! 1. one balance array and one currency array: pair them item by item;
//! 2. as many balances as currencies: pair them in order;
//! 3. as many balances as currency pairs: each balance takes both slots of its pair,
//!    which must agree;
//! 4. several balances and one currency: all balances use it;
//! 5. balances but no currency: all balances use the native token.
//!
//! `(currency, balance)` tuples, alone or in arrays, always point at their own
//! currency slot. Struct arguments are searched the same way, as their own sibling list.

use crate::spec::{BalanceCurrency, NamedSpec, PathRule, Spec};

fn positions(siblings: &[(&str, &mut Spec)], predicate: fn(&Spec) -> bool) -> Vec<usize> {
	siblings.iter().enumerate().filter(|(_, (_, spec))| predicate(spec)).map(|(i, _)| i).collect()
}

fn set_currency(spec: &mut Spec, rule: BalanceCurrency) {
	if let Spec::Balance { currency } = spec {
		*currency = Some(rule);
	}
}

fn lookup(rule: PathRule) -> BalanceCurrency {
	BalanceCurrency::Lookup { lookup: rule, lookup2: None }
}

/// Attach currency rules to the balances among `siblings`, recursing into struct siblings.
pub fn detect_balance_currency(mut siblings: Vec<(&str, &mut Spec)>, native_token: Option<&str>) {
	let balances = positions(&siblings, Spec::is_balance);
	let currencies = positions(&siblings, Spec::is_currency);
	let balance_arrays = positions(&siblings, Spec::is_array_of_balances);
	let currency_arrays = positions(&siblings, Spec::is_array_of_currencies);
	let currency_pairs = positions(&siblings, Spec::is_tuple_of_two_currencies);

	if balance_arrays.len() == 1 && currency_arrays.len() == 1 {
		let currency = siblings[currency_arrays[0]].0;
		if let Spec::Array { items } = &mut *siblings[balance_arrays[0]].1 {
			set_currency(items, lookup(PathRule::sibling_item(currency)));
		}
	} else if !balances.is_empty() && balances.len() == currencies.len() {
		for (&balance, &currency) in balances.iter().zip(&currencies) {
			let currency = siblings[currency].0;
			set_currency(siblings[balance].1, lookup(PathRule::sibling(currency)));
		}
	} else if !balances.is_empty() && balances.len() == currency_pairs.len() {
		for (&balance, &pair) in balances.iter().zip(&currency_pairs) {
			let pair = siblings[pair].0;
			let rule = BalanceCurrency::Lookup {
				lookup: PathRule::sibling_slot(pair, 0),
				lookup2: Some(PathRule::sibling_slot(pair, 1)),
			};
			set_currency(siblings[balance].1, rule);
		}
	} else if balances.len() > 1 && currencies.len() == 1 {
		let currency = siblings[currencies[0]].0;
		for &balance in &balances {
			set_currency(siblings[balance].1, lookup(PathRule::sibling(currency)));
		}
	} else if !balances.is_empty() && currencies.is_empty() {
		if let Some(symbol) = native_token {
			for &balance in &balances {
				set_currency(siblings[balance].1, BalanceCurrency::Plain { symbol: symbol.to_string() });
			}
		}
	}

	for (_, spec) in siblings.iter_mut() {
		match &mut **spec {
			Spec::Tuple { items } if items.len() == 2 && items[0].is_currency() => {
				set_currency(&mut items[1], lookup(PathRule::own_tuple_head()));
			}
			Spec::Array { items } => {
				if let Spec::Tuple { items } = &mut **items {
					if items.len() == 2 && items[0].is_currency() {
						set_currency(&mut items[1], lookup(PathRule::own_tuple_head()));
					}
				}
			}
			Spec::Object { props } => {
				let nested = props.iter_mut().map(|NamedSpec { name, spec }| (name.as_str(), spec)).collect();
				detect_balance_currency(nested, native_token);
			}
			_ => {}
		}
	}
}

/// Attach currency rules inside a resolved type reference. References are parsed with
/// their own spec, so their fields are siblings of each other only.
pub fn detect_nested_currency(spec: &mut Spec, native_token: Option<&str>) {
	if !spec.is_balance() {
		detect_balance_currency(vec![("", spec)], native_token);
	}
}
