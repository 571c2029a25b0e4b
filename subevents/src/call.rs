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

use crate::{error::HandleError, event::EventInstance};
use scale_value::{Composite, Value, ValueDef};
use subevents_common::EventName;
use subevents_metadata::{descriptor::sanitize_type_name, Metadata};

/// A call decoded into its pallet, its name and its argument values.
#[derive(Debug, Clone, PartialEq)]
pub struct CallInstance {
	pub name: EventName,
	pub args: Vec<Value>,
}

impl CallInstance {
	pub fn new(module: &str, call: &str, args: Vec<Value>) -> Self {
		Self { name: EventName::call(module, call), args }
	}

	/// Read a `RuntimeCall` shaped value: `Pallet(call { ..fields })`.
	pub fn from_value(value: &Value) -> Option<Self> {
		let (module, call, args) = split_pallet_variant(value)?;
		Some(Self::new(module, call, args))
	}

	/// Argument `name`, provided its declared type is one of `expected`.
	pub fn arg(&self, metadata: &Metadata, name: &str, expected: &[&str]) -> Result<&Value, HandleError> {
		let spec =
			metadata.get(&self.name.full).ok_or_else(|| HandleError::UnknownEvent { event: self.name.full.clone() })?;
		let not_found = || HandleError::ArgNotFound { call: self.name.short.clone(), arg: name.to_string() };
		let index = spec.args.iter().position(|arg| arg.name == name).ok_or_else(not_found)?;
		let declared = spec.args[index].type_name.as_deref().map(sanitize_type_name).unwrap_or_default();
		if !expected.contains(&declared.as_str()) {
			return Err(HandleError::ArgTypeMismatch {
				call: self.name.short.clone(),
				arg: name.to_string(),
				expected: expected.join(" | "),
				received: declared,
			});
		}
		self.args.get(index).ok_or_else(not_found)
	}

	pub fn instance(&self) -> EventInstance<'_> {
		EventInstance { name: self.name.clone(), args: &self.args, arg_types: None }
	}
}

/// Split an outer enum value such as `RuntimeCall` or `RuntimeEvent` into the pallet
/// variant name, the inner variant name and the inner variant's field values.
pub(crate) fn split_pallet_variant(value: &Value) -> Option<(&str, &str, Vec<Value>)> {
	let ValueDef::Variant(pallet) = &value.value else {
		return None;
	};
	let inner = match &pallet.values {
		Composite::Unnamed(values) if values.len() == 1 => &values[0],
		_ => return None,
	};
	let ValueDef::Variant(inner_variant) = &inner.value else {
		return None;
	};
	let args = match &inner_variant.values {
		Composite::Named(fields) => fields.iter().map(|(_, value)| value.clone()).collect(),
		Composite::Unnamed(values) => values.clone(),
	};
	Some((pallet.name.as_str(), inner_variant.name.as_str(), args))
}
