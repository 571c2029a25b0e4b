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

use super::*;
use subevents_common::ChainInfo;

#[derive(Default)]
struct Types(HashMap<u32, TypeDescriptor>);

impl DescriptorSource for Types {
	fn descriptor(&self, id: u32) -> Option<TypeDescriptor> {
		self.0.get(&id).cloned()
	}
}

fn chain() -> ChainInfo {
	ChainInfo {
		name: "Test".into(),
		version: 1,
		address_format: Default::default(),
		ss58_prefix: Some(7),
		tokens: vec!["UNIT".into()],
		decimals: vec![12],
	}
}

fn resolve(source: &Types, d: &TypeDescriptor) -> (Handler, TypeRegistry, Unknowns) {
	let mut registry = TypeRegistry::new(&chain());
	let mut unknowns = Unknowns::default();
	let handler = registry.get(source, d, "event.test.thing.arg", &mut unknowns);
	(handler, registry, unknowns)
}

#[test]
fn should_terminate_on_recursive_types() {
	let mut types = Types::default();
	// struct Node { value: u32, next: Option<Box<Node>> }
	types.0.insert(
		0,
		TypeDescriptor::structure(
			"Node",
			vec![
				("value", TypeDescriptor::plain("u32")),
				("next", TypeDescriptor::option(TypeDescriptor::lookup(0, "Node"))),
			],
		),
	);
	let (handler, registry, unknowns) = resolve(&types, &TypeDescriptor::lookup(0, "Node"));

	assert_eq!(handler.spec, Spec::Lookup { id: 0 });
	let node = registry.lookups().get(0).expect("node is resolved");
	assert_eq!(
		node.spec,
		Spec::Object {
			props: vec![NamedSpec::new("value", Spec::Int), NamedSpec::new("next", Spec::Lookup { id: 0 })]
		}
	);
	assert_eq!(registry.lookups().len(), 1);
	assert!(unknowns.is_empty());
}

#[test]
fn should_prefer_name_hints() {
	let types = Types::default();
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("u128").with_hint("Balance"));
	assert_eq!(handler.spec, Spec::Balance { currency: None });
	assert_eq!(handler.human, Parser::HumanBalance);

	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("u128"));
	assert_eq!(handler.spec, Spec::Bigint);
}

#[test]
fn should_propagate_hints_through_wrappers() {
	let types = Types::default();
	let compact = TypeDescriptor::compact(TypeDescriptor::plain("u128")).with_hint("Compact<Balance>");
	let (handler, _, _) = resolve(&types, &compact);
	assert_eq!(handler.spec, Spec::balance());

	let vector = TypeDescriptor::vector(TypeDescriptor::plain("u128")).with_hint("Vec<BalanceOf>");
	let (handler, _, _) = resolve(&types, &vector);
	assert_eq!(handler.spec, Spec::Array { items: Box::new(Spec::balance()) });
	assert_eq!(handler.raw, Parser::Array { item: Box::new(Parser::Balance), limit: None });
	assert_eq!(handler.human, Parser::Array { item: Box::new(Parser::HumanBalance), limit: Some(HUMAN_ARRAY_LIMIT) });

	let option = TypeDescriptor::option(TypeDescriptor::plain("u128")).with_hint("Option<Balance>");
	let (handler, _, _) = resolve(&types, &option);
	assert_eq!(handler.spec, Spec::balance());
	assert_eq!(handler.raw, Parser::Option(Box::new(Parser::Balance)));
}

#[test]
fn should_split_tuple_hints_per_slot() {
	let types = Types::default();
	let tuple = TypeDescriptor::tuple(vec![
		TypeDescriptor::enumeration("TokenSymbol", vec![("KAR", TypeDescriptor::null())]),
		TypeDescriptor::plain("u128"),
	])
	.with_hint("(CurrencyId, Balance)");
	let (handler, _, _) = resolve(&types, &tuple);
	assert_eq!(handler.spec, Spec::Tuple { items: vec![Spec::Currency, Spec::balance()] });
	assert!(handler.spec.is_currency_balance_pair());
}

#[test]
fn should_map_enums_to_objects() {
	let types = Types::default();
	let d = TypeDescriptor::enumeration(
		"Status",
		vec![("Free", TypeDescriptor::null()), ("Reserved", TypeDescriptor::plain("u128").with_hint("Balance"))],
	);
	let (handler, _, _) = resolve(&types, &d);
	assert_eq!(
		handler.spec,
		Spec::Object { props: vec![NamedSpec::new("Free", Spec::Null), NamedSpec::new("Reserved", Spec::balance())] }
	);
	assert!(matches!(handler.raw, Parser::Enum { bare_unit: false, .. }));
	assert!(matches!(handler.human, Parser::Enum { bare_unit: true, .. }));
}

#[test]
fn should_record_unmapped_types() {
	let types = Types::default();
	let (handler, _, unknowns) = resolve(&types, &TypeDescriptor::plain("Weight").with_hint("Weight"));
	assert_eq!(handler, Handler::unknown());
	assert!(unknowns.names.get("Weight").is_some());
	assert!(unknowns.types.get("Weight").is_some());

	let (_, _, unknowns) = resolve(&types, &TypeDescriptor::lookup(9, "Missing"));
	assert!(unknowns.types.get("Missing").is_some());
}

#[test]
fn should_record_unmapped_wrappers() {
	let mut registry = TypeRegistry::with_options(
		&chain(),
		crate::registry::TypeRegistryOptions { wrappers: Some(HashMap::new()), ..Default::default() },
	);
	let mut unknowns = Unknowns::default();
	let handler = registry.get(&Types::default(), &TypeDescriptor::plain("u8"), "call.a.b.c", &mut unknowns);
	assert_eq!(handler, Handler::unknown());
	assert!(unknowns.wrappers.get(&WrapperKind::Plain).is_some());
}

#[test]
fn should_skip_noisy_types() {
	let types = Types::default();
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("u32").with_hint("ParaId"));
	assert_eq!(handler.spec, Spec::Skip);
}

#[test]
fn should_bind_addresses_with_chain_prefix() {
	let types = Types::default();
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("AccountId32"));
	assert_eq!(handler.spec, Spec::Address { format: AddressSpec::Substrate { ss58_prefix: 7 } });
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("AccountId20"));
	assert_eq!(handler.spec, Spec::Address { format: AddressSpec::Evm });
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("[u8; 32]").with_hint("AccountId"));
	assert_eq!(handler.spec, Spec::Hash);
}

#[test]
fn should_scale_fixed_points() {
	let types = Types::default();
	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("Perbill"));
	assert_eq!(handler.raw, Parser::FixedPoint { decimals: 9 });
	assert_eq!(handler.spec, Spec::Int);

	let (handler, _, _) = resolve(&types, &TypeDescriptor::plain("u32").with_hint("Permill"));
	assert_eq!(handler.human, Parser::FixedPoint { decimals: 6 });
}
