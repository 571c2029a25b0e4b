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

//! Descriptors and pallet variants read from V14 metadata.

use super::MetadataError;
use crate::{
	descriptor::{sanitize_type_name, DescriptorSource, TypeDescriptor},
	source::{FieldInfo, PalletInfo, RuntimeSource, VariantInfo},
};
use frame_metadata::v14::RuntimeMetadataV14;
use scale_info::{form::PortableForm, Field, PortableRegistry, TypeDef, TypeDefPrimitive};

/// Named types that are bound as a whole instead of being taken apart.
const PLAIN_IDENTS: &[&str] = &[
	"AccountId32",
	"AccountId20",
	"MultiAddress",
	"H160",
	"H256",
	"Perbill",
	"Permill",
	"Percent",
	"Perquintill",
	"FixedU128",
	"FixedI128",
	"WrapperKeepOpaque",
	"WrapperOpaque",
	"RuntimeCall",
	"Call",
];

impl DescriptorSource for PortableRegistry {
	fn descriptor(&self, id: u32) -> Option<TypeDescriptor> {
		describe(self, id, true)
	}

	fn type_name(&self, id: u32) -> String {
		match self.resolve(id) {
			Some(ty) => match (&ty.type_def, ty.path.ident()) {
				(_, Some(ident)) => ident,
				(TypeDef::Primitive(p), None) => primitive_name(p).to_string(),
				(TypeDef::Sequence(_), None) => "Vec".to_string(),
				(TypeDef::Tuple(_), None) => "Tuple".to_string(),
				_ => format!("Lookup{}", id),
			},
			None => format!("Lookup{}", id),
		}
	}
}

impl DescriptorSource for RuntimeMetadataV14 {
	fn descriptor(&self, id: u32) -> Option<TypeDescriptor> {
		self.types.descriptor(id)
	}

	fn type_name(&self, id: u32) -> String {
		self.types.type_name(id)
	}
}

impl RuntimeSource for RuntimeMetadataV14 {
	fn pallets(&self) -> Result<Vec<PalletInfo>, MetadataError> {
		self.pallets
			.iter()
			.map(|pallet| {
				log::trace!("reading variants of pallet {}", pallet.name);
				let events = pallet.event.as_ref().map(|e| variants(&self.types, e.ty.id)).transpose()?;
				let calls = pallet.calls.as_ref().map(|c| variants(&self.types, c.ty.id)).transpose()?;
				Ok(PalletInfo {
					name: pallet.name.clone(),
					events: events.unwrap_or_default(),
					calls: calls.unwrap_or_default(),
				})
			})
			.collect()
	}

	fn as_descriptor_source(&self) -> &dyn DescriptorSource {
		self
	}
}

fn variants(types: &PortableRegistry, id: u32) -> Result<Vec<VariantInfo>, MetadataError> {
	let ty = types.resolve(id).ok_or(MetadataError::TypeNotFound(id))?;
	let variant = match &ty.type_def {
		TypeDef::Variant(variant) => variant,
		other => return Err(MetadataError::ExpectedVariantType { got: format!("{:?}", other) }),
	};
	Ok(variant
		.variants
		.iter()
		.map(|v| VariantInfo {
			name: v.name.clone(),
			fields: v
				.fields
				.iter()
				.map(|f| FieldInfo { name: f.name.clone(), ty: f.ty.id, type_name: f.type_name.clone() })
				.collect(),
			docs: v.docs.clone(),
		})
		.collect())
}

fn primitive_name(p: &TypeDefPrimitive) -> &'static str {
	match p {
		TypeDefPrimitive::Bool => "bool",
		TypeDefPrimitive::Char => "char",
		TypeDefPrimitive::Str => "Text",
		TypeDefPrimitive::U8 => "u8",
		TypeDefPrimitive::U16 => "u16",
		TypeDefPrimitive::U32 => "u32",
		TypeDefPrimitive::U64 => "u64",
		TypeDefPrimitive::U128 => "u128",
		TypeDefPrimitive::U256 => "u256",
		TypeDefPrimitive::I8 => "i8",
		TypeDefPrimitive::I16 => "i16",
		TypeDefPrimitive::I32 => "i32",
		TypeDefPrimitive::I64 => "i64",
		TypeDefPrimitive::I128 => "i128",
		TypeDefPrimitive::I256 => "i256",
	}
}

fn is_u8(types: &PortableRegistry, id: u32) -> bool {
	matches!(types.resolve(id).map(|ty| &ty.type_def), Some(TypeDef::Primitive(TypeDefPrimitive::U8)))
}

/// Describe type `id`. Composites and variants are only taken apart when `expand` is set;
/// below that they become references, which keeps recursive types finite.
fn describe(types: &PortableRegistry, id: u32, expand: bool) -> Option<TypeDescriptor> {
	let ty = types.resolve(id)?;
	let ident = ty.path.ident();
	let path = (!ty.path.segments.is_empty()).then(|| ty.path.segments.join("::"));

	if let Some(ident) = ident.as_deref() {
		if PLAIN_IDENTS.contains(&ident) {
			return Some(with_path(TypeDescriptor::plain(ident), path));
		}
	}

	let descriptor = match &ty.type_def {
		TypeDef::Primitive(p) => TypeDescriptor::plain(primitive_name(p)),
		TypeDef::Compact(c) => TypeDescriptor::compact(describe(types, c.type_param.id, false)?),
		TypeDef::Sequence(s) if is_u8(types, s.type_param.id) => TypeDescriptor::plain("Bytes"),
		TypeDef::Sequence(s) => TypeDescriptor::vector(describe(types, s.type_param.id, false)?),
		TypeDef::Array(a) if is_u8(types, a.type_param.id) => TypeDescriptor::plain(format!("[u8; {}]", a.len)),
		TypeDef::Array(a) => TypeDescriptor::vector(describe(types, a.type_param.id, false)?),
		TypeDef::Tuple(t) if t.fields.is_empty() => TypeDescriptor::null(),
		TypeDef::Tuple(t) => {
			TypeDescriptor::tuple(t.fields.iter().map(|f| describe(types, f.id, false)).collect::<Option<_>>()?)
		}
		TypeDef::BitSequence(_) => TypeDescriptor::plain("BitVec"),
		TypeDef::Variant(v) if ident.as_deref() == Some("Option") => {
			let inner = v.variants.iter().find(|v| v.name == "Some").and_then(|v| v.fields.first())?;
			TypeDescriptor::option(field_descriptor(types, inner)?)
		}
		TypeDef::Composite(_) if ident.as_deref() == Some("BTreeMap") => {
			let mut params = ty.type_params.iter().filter_map(|p| p.ty.as_ref());
			let keys = describe(types, params.next()?.id, false)?;
			let values = describe(types, params.next()?.id, false)?;
			TypeDescriptor::map(keys, values)
		}
		TypeDef::Composite(_) | TypeDef::Variant(_) if !expand => {
			let name = ident.clone().unwrap_or_else(|| format!("Lookup{}", id));
			return Some(with_path(TypeDescriptor::lookup(id, name), path));
		}
		TypeDef::Composite(c) => match c.fields.as_slice() {
			[] => TypeDescriptor::null(),
			[single] if single.name.is_none() => field_descriptor(types, single)?,
			fields => fields_descriptor(types, ident.as_deref().unwrap_or("Struct"), fields)?,
		},
		TypeDef::Variant(v) => {
			let variants = v
				.variants
				.iter()
				.map(|variant| {
					let payload = match variant.fields.as_slice() {
						[] => TypeDescriptor::null(),
						[single] if single.name.is_none() => field_descriptor(types, single)?,
						fields => fields_descriptor(types, &variant.name, fields)?,
					};
					Some((variant.name.clone(), payload))
				})
				.collect::<Option<Vec<_>>>()?;
			TypeDescriptor::enumeration(ident.as_deref().unwrap_or("Enum"), variants)
		}
	};
	Some(with_path(descriptor, path))
}

fn with_path(descriptor: TypeDescriptor, path: Option<String>) -> TypeDescriptor {
	match path {
		Some(path) => descriptor.with_path(path),
		None => descriptor,
	}
}

/// Descriptor of a field, carrying its declared type name as the hint.
fn field_descriptor(types: &PortableRegistry, field: &Field<PortableForm>) -> Option<TypeDescriptor> {
	let descriptor = describe(types, field.ty.id, false)?;
	Some(match &field.type_name {
		Some(name) => descriptor.with_hint(sanitize_type_name(name)),
		None => descriptor,
	})
}

/// A struct when every field is named, a tuple otherwise.
fn fields_descriptor(types: &PortableRegistry, name: &str, fields: &[Field<PortableForm>]) -> Option<TypeDescriptor> {
	if fields.iter().all(|f| f.name.is_some()) {
		let named = fields
			.iter()
			.map(|f| Some((f.name.clone().unwrap_or_default(), field_descriptor(types, f)?)))
			.collect::<Option<Vec<_>>>()?;
		Some(TypeDescriptor::structure(name, named))
	} else {
		let positional = fields.iter().map(|f| field_descriptor(types, f)).collect::<Option<Vec<_>>>()?;
		Some(TypeDescriptor::tuple(positional))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::WrapperKind;
	use frame_metadata::v14::{ExtrinsicMetadata, PalletEventMetadata, PalletMetadata};
	use scale_info::{meta_type, MetaType, Registry, TypeInfo};

	#[allow(dead_code)]
	#[derive(TypeInfo)]
	struct AccountId32([u8; 32]);

	#[allow(dead_code)]
	#[derive(TypeInfo)]
	struct Node {
		value: u32,
		children: Vec<Node>,
	}

	#[allow(dead_code)]
	#[derive(TypeInfo)]
	enum Status {
		Idle,
		Busy(u64),
		Moved { from: AccountId32, to: AccountId32 },
	}

	#[allow(dead_code)]
	#[derive(TypeInfo)]
	struct Transfer {
		who: AccountId32,
		amount: u128,
		memo: Vec<u8>,
		status: Status,
		maybe: Option<u32>,
		unit: (),
	}

	fn registry_for<T: TypeInfo + 'static>() -> (PortableRegistry, u32) {
		let mut registry = Registry::new();
		let id = registry.register_type(&meta_type::<T>()).id;
		(registry.into(), id)
	}

	#[test]
	fn should_expand_top_level_struct() {
		let (types, id) = registry_for::<Transfer>();
		let d = types.descriptor(id).unwrap();
		assert_eq!(d.kind, WrapperKind::Struct);
		assert_eq!(d.type_name, "Transfer");
		let kinds: Vec<_> =
			d.subs.iter().map(|s| (s.name.clone().unwrap(), s.descriptor.kind, s.descriptor.type_name.clone())).collect();
		assert_eq!(
			kinds,
			vec![
				("who".to_string(), WrapperKind::Plain, "AccountId32".to_string()),
				("amount".to_string(), WrapperKind::Plain, "u128".to_string()),
				("memo".to_string(), WrapperKind::Plain, "Bytes".to_string()),
				("status".to_string(), WrapperKind::Lookup, "Status".to_string()),
				("maybe".to_string(), WrapperKind::Option, "Option<u32>".to_string()),
				("unit".to_string(), WrapperKind::Null, "Null".to_string()),
			]
		);
		assert_eq!(d.subs[2].descriptor.name_hint.as_deref(), Some("Vec<u8>"));
	}

	#[test]
	fn should_describe_variants() {
		let (types, id) = registry_for::<Status>();
		let d = types.descriptor(id).unwrap();
		assert_eq!(d.kind, WrapperKind::Enum);
		assert_eq!(d.subs[0].descriptor.kind, WrapperKind::Null);
		assert_eq!(d.subs[1].descriptor.type_name, "u64");
		assert_eq!(d.subs[2].descriptor.kind, WrapperKind::Struct);
		assert_eq!(d.subs[2].descriptor.subs.len(), 2);
	}

	#[test]
	fn should_reference_recursive_types() {
		let (types, id) = registry_for::<Node>();
		let d = types.descriptor(id).unwrap();
		let children = &d.subs[1].descriptor;
		assert_eq!(children.kind, WrapperKind::Vector);
		let item = children.sub().unwrap();
		assert_eq!(item.kind, WrapperKind::Lookup);
		assert_eq!(item.lookup, Some(id));
	}

	#[test]
	fn should_name_types_for_provenance() {
		let (types, id) = registry_for::<Transfer>();
		assert_eq!(DescriptorSource::type_name(&types, id), "Transfer");
		assert_eq!(DescriptorSource::type_name(&types, 9_999), "Lookup9999");
	}

	fn runtime_with_event(event: MetaType) -> RuntimeMetadataV14 {
		let pallet = PalletMetadata {
			name: "Status",
			storage: None,
			calls: None,
			event: Some(PalletEventMetadata { ty: event }),
			constants: vec![],
			error: None,
			index: 0,
		};
		let extrinsic = ExtrinsicMetadata { ty: meta_type::<()>(), version: 4, signed_extensions: vec![] };
		RuntimeMetadataV14::new(vec![pallet], extrinsic, meta_type::<()>())
	}

	#[test]
	fn should_read_pallet_events_from_runtime_metadata() {
		let metadata = runtime_with_event(meta_type::<Status>());
		let pallets = metadata.pallets().unwrap();
		assert_eq!(pallets.len(), 1);
		assert_eq!(pallets[0].name, "Status");
		assert!(pallets[0].calls.is_empty());
		let names: Vec<_> = pallets[0].events.iter().map(|v| v.name.as_str()).collect();
		assert_eq!(names, ["Idle", "Busy", "Moved"]);
		assert_eq!(pallets[0].events[2].fields[0].name.as_deref(), Some("from"));
	}

	#[test]
	fn should_reject_non_variant_events() {
		let metadata = runtime_with_event(meta_type::<Transfer>());
		assert!(matches!(metadata.pallets(), Err(MetadataError::ExpectedVariantType { .. })));
	}
}
