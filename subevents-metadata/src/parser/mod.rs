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

//! Parsers turn a decoded value into its raw or human JSON form.
//!
//! A [`Parser`] is walked alongside the [`Spec`] it was built with. Every parser is
//! asynchronous, because formatting an account or an embedded call may have to ask
//! the chain; the rest complete on first poll.

mod format;

pub use format::{format_address, format_balance, format_moment, scale_balance, short_hash};

use crate::{
	currency::{extract_symbol, CurrencyInfo, CurrencyRegistry},
	query::ChainQuery,
	registry::LookupTable,
	spec::{AddressSpec, BalanceCurrency, PathRule, Spec},
	value::{self, number_f64, number_u128},
};
use futures::future::{FutureExt, LocalBoxFuture};
use heck::ToKebabCase;
use scale_value::{Composite, Value, ValueDef};
use serde_json::{Map, Value as Json};
use std::fmt;

/// Human arrays show at most this many items, followed by a marker with the real length.
pub const HUMAN_ARRAY_LIMIT: usize = 10;

static UNKNOWN: Spec = Spec::Unknown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	Raw,
	Human,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parser {
	/// Structural JSON view.
	Raw,
	/// Generic display view.
	Human,
	Bool,
	Int,
	Bigint,
	FixedPoint { decimals: u32 },
	Balance,
	HumanBalance,
	Currency,
	Text,
	Hex,
	ShortHash,
	Bytes,
	Moment,
	Address(AddressSpec),
	HumanAddress(AddressSpec),
	Call,
	Null,
	Array { item: Box<Parser>, limit: Option<usize> },
	Option(Box<Parser>),
	Tuple(Vec<Parser>),
	Object(Vec<(String, Parser)>),
	/// Tags the active variant's payload with its name; with `bare_unit` a variant
	/// without payload renders as its name alone.
	Enum { variants: Vec<(String, Parser)>, bare_unit: bool },
	Map { keys: Box<Parser>, values: Box<Parser> },
	Lookup { id: u32, side: Side },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	Arg(String),
	Index(usize),
	Field(String),
	Slot(usize),
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PathSegment::Arg(name) | PathSegment::Field(name) => f.write_str(name),
			PathSegment::Index(i) | PathSegment::Slot(i) => write!(f, "{}", i),
		}
	}
}

/// State threaded through one argument's parse.
#[derive(Clone)]
pub struct ParserContext<'a> {
	pub currencies: &'a CurrencyRegistry,
	pub lookups: &'a LookupTable,
	/// Raw views of every argument of the event being parsed.
	pub raw_args: &'a Map<String, Json>,
	pub query: Option<&'a dyn ChainQuery>,
	path: Vec<PathSegment>,
}

impl<'a> ParserContext<'a> {
	pub fn new(
		currencies: &'a CurrencyRegistry,
		lookups: &'a LookupTable,
		raw_args: &'a Map<String, Json>,
		query: Option<&'a dyn ChainQuery>,
		arg: &str,
	) -> Self {
		Self { currencies, lookups, raw_args, query, path: vec![PathSegment::Arg(arg.to_string())] }
	}

	pub fn child(&self, segment: PathSegment) -> Self {
		let mut child = self.clone();
		child.path.push(segment);
		child
	}

	pub fn path(&self) -> &[PathSegment] {
		&self.path
	}

	pub fn dotted_path(&self) -> String {
		self.path.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
	}

	/// Raw argument value at a dotted path.
	fn raw_at(&self, path: &str) -> Option<&'a Json> {
		let mut segments = path.split('.');
		let mut current = self.raw_args.get(segments.next()?)?;
		for segment in segments {
			current = match current {
				Json::Object(map) => map.get(segment)?,
				Json::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
				_ => return None,
			};
		}
		Some(current)
	}

	fn symbol_at(&self, rule: &PathRule) -> Option<String> {
		let target = rule.apply(&self.dotted_path())?;
		extract_symbol(self.raw_at(&target)?)
	}

	/// Currency of the balance being parsed, if its rule resolves.
	fn currency(&self, spec: &Spec) -> Option<CurrencyInfo> {
		let Spec::Balance { currency: Some(rule) } = spec else {
			return None;
		};
		match rule {
			BalanceCurrency::Plain { symbol } => self.currencies.get(symbol),
			BalanceCurrency::Index { .. } => None,
			BalanceCurrency::Lookup { lookup, lookup2 } => {
				let symbol = self.symbol_at(lookup)?;
				if let Some(second) = lookup2 {
					if self.symbol_at(second)? != symbol {
						return None;
					}
				}
				self.currencies.get(&symbol)
			}
		}
	}
}

/// Parse `value` with `parser`, reading shape details from `spec`.
pub fn parse<'f, 'x: 'f>(
	parser: &'f Parser,
	spec: &'f Spec,
	value: &'f Value,
	cx: &'f ParserContext<'x>,
) -> LocalBoxFuture<'f, Json> {
	async move {
		match parser {
			Parser::Raw => value::to_json(value),
			Parser::Human => value::to_human(value),
			Parser::Null => Json::Null,
			Parser::Bool => value::as_bool(value).map(Json::Bool).unwrap_or_else(|| value::to_json(value)),
			Parser::Int | Parser::Bigint => integer(value),
			Parser::FixedPoint { decimals } => fixed_point(value, *decimals),
			Parser::Balance => match value::as_u128(value) {
				Some(amount) => match cx.currency(spec) {
					Some(currency) => number_f64(scale_balance(amount, currency.decimals)),
					None => number_u128(amount),
				},
				None => value::to_json(value),
			},
			Parser::HumanBalance => match value::as_u128(value) {
				Some(amount) => match cx.currency(spec) {
					Some(currency) => Json::String(format_balance(amount, currency.decimals, &currency.symbol)),
					None => number_u128(amount),
				},
				None => value::to_human(value),
			},
			Parser::Currency => {
				let raw = value::to_json(value);
				extract_symbol(&raw).map(Json::String).unwrap_or(raw)
			}
			Parser::Text => text(value),
			Parser::Hex => hex_string(value),
			Parser::ShortHash => match hex_string(value) {
				Json::String(s) => Json::String(short_hash(&s)),
				other => other,
			},
			Parser::Bytes => human_bytes(value),
			Parser::Moment => match value::as_u128(value) {
				Some(ms) => Json::String(format_moment(ms)),
				None => value::to_human(value),
			},
			Parser::Address(format) => {
				format_address(value, *format).map(Json::String).unwrap_or_else(|| value::to_json(value))
			}
			Parser::HumanAddress(format) => match format_address(value, *format) {
				Some(address) => Json::String(with_identity(address, cx).await),
				None => value::to_human(value),
			},
			Parser::Call => human_call(value, cx).await,
			Parser::Array { item, limit } => {
				let Some(items) = value::as_sequence(value) else {
					return value::to_json(value);
				};
				let item_spec = match spec {
					Spec::Array { items } => items.as_ref(),
					_ => &UNKNOWN,
				};
				let shown = limit.map_or(items.len(), |limit| limit.min(items.len()));
				let mut out = Vec::with_capacity(shown + 1);
				for (i, v) in items.iter().take(shown).enumerate() {
					let child = cx.child(PathSegment::Index(i));
					out.push(parse(item, item_spec, v, &child).await);
				}
				if shown < items.len() {
					out.push(Json::String(format!("too many elements. length = {}", items.len())));
				}
				Json::Array(out)
			}
			Parser::Option(inner) => match value::as_option(value) {
				Some(None) => Json::Null,
				Some(Some(v)) => parse(inner, spec, v, cx).await,
				None => parse(inner, spec, value, cx).await,
			},
			Parser::Tuple(parsers) => {
				let items = value::as_sequence(value).unwrap_or_default();
				if items.len() != parsers.len() {
					return value::to_json(value);
				}
				let mut out = Vec::with_capacity(items.len());
				for (i, (p, v)) in parsers.iter().zip(items).enumerate() {
					let slot_spec = match spec {
						Spec::Tuple { items } => items.get(i).unwrap_or(&UNKNOWN),
						_ => &UNKNOWN,
					};
					let child = cx.child(PathSegment::Slot(i));
					out.push(parse(p, slot_spec, v, &child).await);
				}
				Json::Array(out)
			}
			Parser::Object(fields) => {
				let mut out = Map::new();
				for (i, (name, p)) in fields.iter().enumerate() {
					let field_spec = match spec {
						Spec::Object { props } => props.get(i).map(|prop| &prop.spec).unwrap_or(&UNKNOWN),
						_ => &UNKNOWN,
					};
					if *p == Parser::Human && *field_spec == Spec::Skip {
						continue;
					}
					let parsed = match value::field(value, name, i) {
						Some(v) => {
							let child = cx.child(PathSegment::Field(name.clone()));
							parse(p, field_spec, v, &child).await
						}
						None => Json::Null,
					};
					out.insert(name.clone(), parsed);
				}
				Json::Object(out)
			}
			Parser::Enum { variants, bare_unit } => {
				let ValueDef::Variant(variant) = &value.value else {
					return value::to_json(value);
				};
				let position = variants.iter().position(|(name, _)| *name == variant.name);
				let parsed = match (position, value::variant_payload(&variant.values)) {
					(_, None) => Json::Null,
					(Some(i), Some(payload)) => {
						let variant_spec = match spec {
							Spec::Object { props } => props.get(i).map(|prop| &prop.spec).unwrap_or(&UNKNOWN),
							_ => &UNKNOWN,
						};
						let child = cx.child(PathSegment::Field(variant.name.clone()));
						parse(&variants[i].1, variant_spec, &payload, &child).await
					}
					(None, Some(payload)) => value::to_json(&payload),
				};
				if *bare_unit && parsed.is_null() {
					return Json::String(variant.name.clone());
				}
				let mut out = Map::new();
				out.insert(variant.name.clone(), parsed);
				Json::Object(out)
			}
			Parser::Map { keys, values } => {
				let (key_spec, value_spec) = match spec {
					Spec::Map { keys: k, values: v } => (k.as_ref(), v.as_ref()),
					_ => (&UNKNOWN, &UNKNOWN),
				};
				let Some(entries) = map_entries(value) else {
					return value::to_json(value);
				};
				let mut out = Map::new();
				for (k, v) in entries {
					let key = match parse(keys, key_spec, k, cx).await {
						Json::String(s) => s,
						other => other.to_string(),
					};
					let child = cx.child(PathSegment::Field(key.clone()));
					let parsed = parse(values, value_spec, v, &child).await;
					out.insert(key, parsed);
				}
				Json::Object(out)
			}
			Parser::Lookup { id, side } => match cx.lookups.get(*id) {
				Some(handler) => parse(handler.parser(*side), &handler.spec, value, cx).await,
				None => {
					log::debug!("no handler for lookup {} at {}", id, cx.dotted_path());
					value::to_json(value)
				}
			},
		}
	}
	.boxed_local()
}

fn integer(value: &Value) -> Json {
	if let Some(n) = value::as_u128(value) {
		return number_u128(n);
	}
	match value::as_i128(value) {
		Some(n) => value::number_i128(n),
		None => value::to_json(value),
	}
}

fn fixed_point(value: &Value, decimals: u32) -> Json {
	let unit = 10f64.powi(decimals as i32);
	if let Some(n) = value::as_u128(value) {
		return number_f64(n as f64 / unit);
	}
	match value::as_i128(value) {
		Some(n) => number_f64(n as f64 / unit),
		None => value::to_json(value),
	}
}

fn text(value: &Value) -> Json {
	if let Some(s) = value::as_str(value) {
		return Json::String(s.to_string());
	}
	match value::as_bytes(value) {
		Some(bytes) => match String::from_utf8(bytes) {
			Ok(s) => Json::String(s),
			Err(e) => Json::String(format!("0x{}", hex::encode(e.as_bytes()))),
		},
		None => value::to_json(value),
	}
}

fn hex_string(value: &Value) -> Json {
	match value::as_bytes(value) {
		Some(bytes) => Json::String(format!("0x{}", hex::encode(bytes))),
		None => value::to_json(value),
	}
}

/// Printable UTF-8 text, otherwise hex that is shortened once it gets long.
fn human_bytes(value: &Value) -> Json {
	let Some(bytes) = value::as_bytes(value) else {
		return value::to_human(value);
	};
	if let Ok(s) = std::str::from_utf8(&bytes) {
		if !s.chars().any(|c| c.is_control() && !c.is_whitespace()) {
			return Json::String(s.to_string());
		}
	}
	let hex = format!("0x{}", hex::encode(&bytes));
	if hex.len() > 40 {
		Json::String(short_hash(&hex))
	} else {
		Json::String(hex)
	}
}

async fn with_identity(address: String, cx: &ParserContext<'_>) -> String {
	let Some(query) = cx.query else {
		return address;
	};
	match query.identity(&address).await {
		Ok(Some(display)) => format!("{} ({})", display, address),
		Ok(None) => address,
		Err(e) => {
			log::warn!("identity lookup for {} failed: {}", address, e);
			address
		}
	}
}

async fn human_call(value: &Value, cx: &ParserContext<'_>) -> Json {
	if let Some(rendered) = render_call(value) {
		return rendered;
	}
	if let (Some(bytes), Some(query)) = (value::as_bytes(value), cx.query) {
		match query.decode_call(&bytes).await {
			Ok(call) => {
				if let Some(rendered) = render_call(&call) {
					return rendered;
				}
			}
			Err(e) => log::warn!("cannot decode embedded call at {}: {}", cx.dotted_path(), e),
		}
	}
	value::to_human(value)
}

/// `Pallet(call { .. })` rendered as `{ module, call, args }`.
fn render_call(value: &Value) -> Option<Json> {
	let ValueDef::Variant(pallet) = &value.value else {
		return None;
	};
	let Composite::Unnamed(inner) = &pallet.values else {
		return None;
	};
	let [call] = inner.as_slice() else {
		return None;
	};
	let ValueDef::Variant(call) = &call.value else {
		return None;
	};
	let args = match &call.values {
		Composite::Named(fields) => {
			Json::Object(fields.iter().map(|(name, v)| (name.clone(), value::to_human(v))).collect())
		}
		Composite::Unnamed(values) => Json::Array(values.iter().map(value::to_human).collect()),
	};
	let mut out = Map::new();
	out.insert("module".into(), Json::String(pallet.name.to_kebab_case()));
	out.insert("call".into(), Json::String(call.name.to_kebab_case()));
	out.insert("args".into(), args);
	Some(Json::Object(out))
}

/// Key/value pairs of a `BTreeMap`, which decodes as a newtype around a sequence of pairs.
fn map_entries(value: &Value) -> Option<Vec<(&Value, &Value)>> {
	let sequence = match &value.value {
		ValueDef::Composite(Composite::Unnamed(values))
			if values.len() == 1 && matches!(values[0].value, ValueDef::Composite(_)) =>
		{
			&values[0]
		}
		_ => value,
	};
	value::as_sequence(sequence)?
		.iter()
		.map(|pair| match value::as_sequence(pair)? {
			[k, v] => Some((k, v)),
			_ => None,
		})
		.collect()
}
