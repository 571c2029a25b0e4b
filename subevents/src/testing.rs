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

//! A small runtime to test the handlers against.

use scale_value::Value;
use std::collections::HashMap;
use subevents_common::{About, AddressFormat, BlockInfo, ChainInfo, NodeInfo};
use subevents_metadata::{
	descriptor::{DescriptorSource, TypeDescriptor},
	parser::format_address,
	source::{FieldInfo, PalletInfo, RuntimeSource, VariantInfo},
	spec::AddressSpec,
	MatchAll, Metadata, MetadataError, TypeRegistryOptions,
};

struct Runtime {
	types: HashMap<u32, TypeDescriptor>,
	pallets: Vec<PalletInfo>,
}

impl DescriptorSource for Runtime {
	fn descriptor(&self, id: u32) -> Option<TypeDescriptor> {
		self.types.get(&id).cloned()
	}
}

impl RuntimeSource for Runtime {
	fn pallets(&self) -> Result<Vec<PalletInfo>, MetadataError> {
		Ok(self.pallets.clone())
	}

	fn as_descriptor_source(&self) -> &dyn DescriptorSource {
		self
	}
}

fn variant(name: &str, fields: &[(&str, u32, &str)]) -> VariantInfo {
	VariantInfo {
		name: name.into(),
		fields: fields
			.iter()
			.map(|(name, ty, type_name)| FieldInfo {
				name: Some(name.to_string()),
				ty: *ty,
				type_name: Some(type_name.to_string()),
			})
			.collect(),
		docs: Vec::new(),
	}
}

fn pallet(name: &str, events: Vec<VariantInfo>, calls: Vec<VariantInfo>) -> PalletInfo {
	PalletInfo { name: name.into(), events, calls }
}

fn runtime() -> Runtime {
	let types = HashMap::from([
		(0, TypeDescriptor::plain("AccountId32")),
		(1, TypeDescriptor::plain("u128")),
		(2, TypeDescriptor::plain("Bytes")),
		(3, TypeDescriptor::vector(TypeDescriptor::plain("RuntimeCall"))),
		(4, TypeDescriptor::plain("RuntimeCall")),
		(5, TypeDescriptor::option(TypeDescriptor::plain("u32"))),
		(6, TypeDescriptor::plain("u16")),
		(7, TypeDescriptor::plain("u32")),
		(8, TypeDescriptor::plain("MultiAddress")),
	]);
	let pallets = vec![
		pallet(
			"System",
			vec![variant("ExtrinsicSuccess", &[]), variant("ExtrinsicFailed", &[])],
			vec![variant("remark", &[("remark", 2, "Vec<u8>")]), variant("note", &[("signer", 0, "T::AccountId")])],
		),
		pallet(
			"Balances",
			vec![variant(
				"Transfer",
				&[("from", 0, "T::AccountId"), ("to", 0, "T::AccountId"), ("amount", 1, "T::Balance")],
			)],
			vec![variant("transfer", &[("dest", 8, "AccountIdLookupOf<T>"), ("value", 1, "T::Balance")])],
		),
		pallet(
			"Utility",
			vec![variant("BatchInterrupted", &[("index", 7, "u32")])],
			vec![variant("batch", &[("calls", 3, "Vec<<T as Config>::RuntimeCall>")])],
		),
		pallet(
			"Proxy",
			Vec::new(),
			vec![variant(
				"proxy",
				&[
					("real", 8, "AccountIdLookupOf<T>"),
					("force_proxy_type", 5, "Option<T::ProxyType>"),
					("call", 4, "Box<<T as Config>::RuntimeCall>"),
				],
			)],
		),
		pallet("Multisig", Vec::new(), vec![variant("as_multi", &[("threshold", 6, "u16"), ("call", 2, "OpaqueCall<T>")])]),
	];
	Runtime { types, pallets }
}

pub fn about() -> About {
	About {
		node: NodeInfo { name: "test-node".into(), version: "1.0.0".into() },
		block: BlockInfo { number: 1, hash: "0x00".into() },
		chain: ChainInfo {
			name: "Test".into(),
			version: 100,
			address_format: AddressFormat::Substrate,
			ss58_prefix: Some(42),
			tokens: vec!["UNIT".into()],
			decimals: vec![12],
		},
	}
}

pub fn metadata() -> Metadata {
	let _ = pretty_env_logger::try_init();
	Metadata::build(about(), &runtime(), &MatchAll, TypeRegistryOptions::default()).expect("test runtime builds")
}

/// An `AccountId32` filled with `n`.
pub fn account(n: u8) -> Value {
	Value::unnamed_composite(vec![Value::from_bytes([n; 32])])
}

pub fn address(n: u8) -> String {
	format_address(&account(n), AddressSpec::Substrate { ss58_prefix: 42 }).expect("32 byte account")
}

/// A `RuntimeCall` value.
pub fn call(module: &str, name: &str, fields: Vec<(&str, Value)>) -> Value {
	Value::unnamed_variant(module, vec![Value::named_variant(name, fields)])
}

pub fn transfer(to: u8, amount: u128) -> Value {
	call("Balances", "transfer", vec![("dest", account(to)), ("value", Value::u128(amount))])
}

pub fn remark(text: &str) -> Value {
	call("System", "remark", vec![("remark", Value::from_bytes(text))])
}
