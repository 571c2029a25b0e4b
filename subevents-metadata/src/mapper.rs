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

//! Mapping descriptors to [`Handler`]s.
//!
//! Dispatch goes through two tables: primitive mappers keyed by type name, tried
//! with the declaring field's name hint first and the base type name second, and
//! wrapper mappers keyed by [`WrapperKind`]. Both tables are plain `fn` pointers so
//! a deployment can swap entries without touching the dispatch itself.

use crate::{
	descriptor::{split_tuple_hint, strip_wrapper, DescriptorSource, TypeDescriptor, WrapperKind},
	parser::{Parser, Side, HUMAN_ARRAY_LIMIT},
	registry::TypeRegistry,
	spec::{AddressSpec, NamedSpec, Spec},
	unknowns::Unknowns,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A spec and the two parsers that render values of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
	pub spec: Spec,
	pub raw: Parser,
	pub human: Parser,
}

impl Handler {
	pub fn new(spec: Spec, raw: Parser, human: Parser) -> Self {
		Self { spec, raw, human }
	}

	pub fn unknown() -> Self {
		Self::new(Spec::Unknown, Parser::Raw, Parser::Human)
	}

	pub fn lookup(id: u32) -> Self {
		Self::new(
			Spec::Lookup { id },
			Parser::Lookup { id, side: Side::Raw },
			Parser::Lookup { id, side: Side::Human },
		)
	}

	pub fn parser(&self, side: Side) -> &Parser {
		match side {
			Side::Raw => &self.raw,
			Side::Human => &self.human,
		}
	}
}

pub type Mapper = fn(&mut MapperContext<'_>, &TypeDescriptor, &str) -> Handler;

/// What a mapper can see and touch while it resolves one descriptor.
pub struct MapperContext<'a> {
	pub(crate) registry: &'a mut TypeRegistry,
	pub(crate) source: &'a dyn DescriptorSource,
	pub(crate) unknowns: &'a mut Unknowns,
}

impl MapperContext<'_> {
	/// Entry point: a bound name hint wins, otherwise the structural kind decides.
	pub fn wrapper(&mut self, d: &TypeDescriptor, path: &str) -> Handler {
		if let Some(mapper) = d.name_hint.as_deref().and_then(|hint| self.registry.primitives.get(hint)).copied() {
			return mapper(self, d, path);
		}
		match self.registry.wrappers.get(&d.kind).copied() {
			Some(mapper) => mapper(self, d, path),
			None => {
				self.unknowns.wrappers.add(d.kind, path);
				Handler::unknown()
			}
		}
	}

	pub fn primitive(&mut self, d: &TypeDescriptor, path: &str) -> Handler {
		let hint = d.name_hint.as_deref();
		let mapper = hint
			.and_then(|hint| self.registry.primitives.get(hint))
			.or_else(|| self.registry.primitives.get(&d.type_name))
			.copied();
		if let Some(mapper) = mapper {
			return mapper(self, d, path);
		}
		if let Some(hint) = hint {
			self.unknowns.names.add(hint.to_string(), path);
		}
		self.unknowns.types.add(d.type_name.clone(), path);
		Handler::unknown()
	}

	/// Resolve a type reference at most once per build; every use refers to it by id.
	pub fn lookup(&mut self, d: &TypeDescriptor, path: &str) -> Handler {
		let Some(id) = d.lookup else {
			self.unknowns.types.add(d.type_name.clone(), path);
			return Handler::unknown();
		};
		if self.registry.seen.insert(id) {
			let handler = match self.source.descriptor(id) {
				Some(resolved) if self.registry.expands(&resolved) => self.wrapper(&resolved, path),
				Some(_) => Handler::unknown(),
				None => {
					self.unknowns.types.add(d.type_name.clone(), path);
					Handler::unknown()
				}
			};
			log::trace!("resolved lookup {} ({}) at {}", id, d.type_name, path);
			self.registry.refs.insert(id, handler);
		}
		Handler::lookup(id)
	}

	fn substrate_address(&self) -> AddressSpec {
		AddressSpec::Substrate { ss58_prefix: self.registry.chain.ss58_prefix() }
	}

	fn fixed_point_decimals(&self, d: &TypeDescriptor) -> u32 {
		d.name_hint
			.as_deref()
			.and_then(|hint| self.registry.fixed_points.get(hint))
			.or_else(|| self.registry.fixed_points.get(&d.type_name))
			.copied()
			.unwrap_or(0)
	}
}

fn sub_with_hint(d: &TypeDescriptor, hint: Option<&str>) -> TypeDescriptor {
	let mut sub = d.sub().cloned().unwrap_or_else(TypeDescriptor::null);
	if let Some(hint) = hint {
		sub.name_hint = Some(hint.to_string());
	}
	sub
}

fn vec_item_hint(hint: &str) -> Option<String> {
	if let Some(item) = strip_wrapper(hint, "Vec") {
		return Some(item.to_string());
	}
	["BoundedVec", "WeakBoundedVec"].iter().find_map(|wrapper| {
		let params = strip_wrapper(hint, wrapper)?;
		split_tuple_hint(&format!("({})", params))?.into_iter().next()
	})
}

fn map_plain(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	cx.primitive(d, path)
}

fn map_compact(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let hint = d.name_hint.as_deref().map(|hint| strip_wrapper(hint, "Compact").unwrap_or(hint));
	let sub = sub_with_hint(d, hint);
	cx.wrapper(&sub, path)
}

fn map_vector(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let hint = d.name_hint.as_deref().and_then(vec_item_hint);
	let sub = sub_with_hint(d, hint.as_deref());
	let item = cx.wrapper(&sub, &format!("{}[$]", path));
	Handler::new(
		Spec::Array { items: Box::new(item.spec) },
		Parser::Array { item: Box::new(item.raw), limit: None },
		Parser::Array { item: Box::new(item.human), limit: Some(HUMAN_ARRAY_LIMIT) },
	)
}

fn map_option(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let hint = d.name_hint.as_deref().and_then(|hint| strip_wrapper(hint, "Option"));
	let sub = sub_with_hint(d, hint);
	let inner = cx.wrapper(&sub, path);
	Handler::new(inner.spec, Parser::Option(Box::new(inner.raw)), Parser::Option(Box::new(inner.human)))
}

fn map_tuple(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let names = d.name_hint.as_deref().and_then(split_tuple_hint).filter(|names| names.len() == d.subs.len());
	let (mut specs, mut raw, mut human) = (Vec::new(), Vec::new(), Vec::new());
	for (i, sub) in d.subs.iter().enumerate() {
		let mut slot = sub.descriptor.clone();
		if let Some(names) = &names {
			slot.name_hint = Some(names[i].clone());
		}
		let handler = cx.wrapper(&slot, &format!("{}.{}", path, i));
		specs.push(handler.spec);
		raw.push(handler.raw);
		human.push(handler.human);
	}
	Handler::new(Spec::Tuple { items: specs }, Parser::Tuple(raw), Parser::Tuple(human))
}

type Fields = (Vec<NamedSpec>, Vec<(String, Parser)>, Vec<(String, Parser)>);

fn named_fields(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Fields {
	let (mut props, mut raw, mut human) = (Vec::new(), Vec::new(), Vec::new());
	for (i, sub) in d.subs.iter().enumerate() {
		let name = sub.name.clone().unwrap_or_else(|| i.to_string());
		let handler = cx.wrapper(&sub.descriptor, &format!("{}.{}", path, name));
		props.push(NamedSpec::new(name.clone(), handler.spec));
		raw.push((name.clone(), handler.raw));
		human.push((name, handler.human));
	}
	(props, raw, human)
}

fn map_struct(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let (props, raw, human) = named_fields(cx, d, path);
	Handler::new(Spec::Object { props }, Parser::Object(raw), Parser::Object(human))
}

fn map_enum(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let (props, raw, human) = named_fields(cx, d, path);
	Handler::new(
		Spec::Object { props },
		Parser::Enum { variants: raw, bare_unit: false },
		Parser::Enum { variants: human, bare_unit: true },
	)
}

fn map_map(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	let (Some(keys), Some(values)) = (d.subs.first(), d.subs.get(1)) else {
		cx.unknowns.types.add(d.type_name.clone(), path);
		return Handler::unknown();
	};
	let keys = cx.wrapper(&keys.descriptor, &format!("{}{{}}", path));
	let values = cx.wrapper(&values.descriptor, &format!("{}{{$}}", path));
	Handler::new(
		Spec::Map { keys: Box::new(keys.spec), values: Box::new(values.spec) },
		Parser::Map { keys: Box::new(keys.raw), values: Box::new(values.raw) },
		Parser::Map { keys: Box::new(keys.human), values: Box::new(values.human) },
	)
}

fn map_lookup(cx: &mut MapperContext<'_>, d: &TypeDescriptor, path: &str) -> Handler {
	cx.lookup(d, path)
}

fn map_null(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Null, Parser::Null, Parser::Null)
}

fn skip(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Skip, Parser::Raw, Parser::Human)
}

fn boolean(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Bool, Parser::Bool, Parser::Bool)
}

fn int(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Int, Parser::Int, Parser::Int)
}

fn bigint(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Bigint, Parser::Bigint, Parser::Bigint)
}

fn fixed_point(cx: &mut MapperContext<'_>, d: &TypeDescriptor, _: &str) -> Handler {
	let decimals = cx.fixed_point_decimals(d);
	Handler::new(Spec::Int, Parser::FixedPoint { decimals }, Parser::FixedPoint { decimals })
}

fn balance(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::balance(), Parser::Balance, Parser::HumanBalance)
}

fn currency(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Currency, Parser::Currency, Parser::Currency)
}

fn bytes(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::String, Parser::Hex, Parser::Bytes)
}

fn text(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::String, Parser::Text, Parser::Text)
}

fn hash(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Hash, Parser::Hex, Parser::ShortHash)
}

fn moment(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Bigint, Parser::Bigint, Parser::Moment)
}

fn address_substrate(cx: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	let format = cx.substrate_address();
	Handler::new(Spec::Address { format }, Parser::Address(format), Parser::HumanAddress(format))
}

fn address_evm(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	let format = AddressSpec::Evm;
	Handler::new(Spec::Address { format }, Parser::Address(format), Parser::HumanAddress(format))
}

fn call(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::new(Spec::Unknown, Parser::Raw, Parser::Call)
}

/// Named primitive mappers, usable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
	Unknown,
	Skip,
	Bool,
	Int,
	Bigint,
	FixedPoint,
	Balance,
	Currency,
	Bytes,
	Text,
	Hash,
	Moment,
	AddressSubstrate,
	AddressEvm,
	Call,
}

fn unknown(_: &mut MapperContext<'_>, _: &TypeDescriptor, _: &str) -> Handler {
	Handler::unknown()
}

impl Binding {
	pub fn mapper(self) -> Mapper {
		match self {
			Binding::Unknown => unknown,
			Binding::Skip => skip,
			Binding::Bool => boolean,
			Binding::Int => int,
			Binding::Bigint => bigint,
			Binding::FixedPoint => fixed_point,
			Binding::Balance => balance,
			Binding::Currency => currency,
			Binding::Bytes => bytes,
			Binding::Text => text,
			Binding::Hash => hash,
			Binding::Moment => moment,
			Binding::AddressSubstrate => address_substrate,
			Binding::AddressEvm => address_evm,
			Binding::Call => call,
		}
	}
}

pub fn default_wrappers() -> HashMap<WrapperKind, Mapper> {
	let mappers: [(WrapperKind, Mapper); 10] = [
		(WrapperKind::Plain, map_plain),
		(WrapperKind::Compact, map_compact),
		(WrapperKind::Vector, map_vector),
		(WrapperKind::Option, map_option),
		(WrapperKind::Tuple, map_tuple),
		(WrapperKind::Struct, map_struct),
		(WrapperKind::Enum, map_enum),
		(WrapperKind::Map, map_map),
		(WrapperKind::Lookup, map_lookup),
		(WrapperKind::Null, map_null),
	];
	mappers.into_iter().collect()
}

/// Default primitive bindings. `AccountId` is deliberately absent: it is a substrate
/// account on some chains and an EVM one on others, so deployments bind it themselves.
pub fn default_bindings() -> Vec<(&'static str, Binding)> {
	let groups: &[(&[&'static str], Binding)] = &[
		(&["ParaId", "ValidationCode", "HeadData", "ValidationCodeHash", "CandidateHash"], Binding::Skip),
		(&["bool"], Binding::Bool),
		(&["u8", "u16", "u32", "i8", "i16", "i32"], Binding::Int),
		(&["u64", "u128", "u256", "i64", "i128", "i256", "BlockNumber"], Binding::Bigint),
		(&["Perbill", "Permill", "Percent", "Perquintill", "FixedU128", "FixedI128"], Binding::FixedPoint),
		(&["Balance", "BalanceOf"], Binding::Balance),
		(&["CurrencyId", "CurrencyIdOf"], Binding::Currency),
		(&["Bytes", "Vec<u8>"], Binding::Bytes),
		(&["Text", "String", "char"], Binding::Text),
		(&["H256", "Hash", "[u8; 32]"], Binding::Hash),
		(&["Moment"], Binding::Moment),
		(&["AccountId32", "MultiAddress"], Binding::AddressSubstrate),
		(&["AccountId20", "H160"], Binding::AddressEvm),
		(&["Call", "RuntimeCall", "OpaqueCall", "WrapperKeepOpaque", "WrapperOpaque"], Binding::Call),
	];
	groups.iter().flat_map(|(names, binding)| names.iter().map(move |name| (*name, *binding))).collect()
}

pub fn default_primitives() -> HashMap<String, Mapper> {
	default_bindings().into_iter().map(|(name, binding)| (name.to_string(), binding.mapper())).collect()
}

pub fn default_fixed_points() -> HashMap<String, u32> {
	[("Perbill", 9), ("Permill", 6), ("Percent", 2), ("Perquintill", 18), ("FixedU128", 18), ("FixedI128", 18)]
		.into_iter()
		.map(|(name, decimals)| (name.to_string(), decimals))
		.collect()
}

#[cfg(test)]
mod tests;
