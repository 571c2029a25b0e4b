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

/*!
Views over decoded [`Value`]s.

[`to_json`] is the structural view that ends up in the `raw` output and in the
sibling argument snapshot that currency lookups read from. [`to_human`] is the
display view used for values no primitive mapper claimed. The remaining helpers
pull numbers, bytes and fields out of a value without caring whether it was
wrapped in a newtype on the way.
*/

use scale_value::{Composite, Primitive, Value, ValueDef};
use serde_json::{Map, Number, Value as Json};

/// Structural JSON view of a decoded value.
pub fn to_json(value: &Value) -> Json {
	render(value, false)
}

/// Display view of a decoded value; single field tuple structs are collapsed into their field.
pub fn to_human(value: &Value) -> Json {
	render(value, true)
}

fn render(value: &Value, human: bool) -> Json {
	match &value.value {
		ValueDef::Primitive(p) => primitive(p),
		ValueDef::Composite(Composite::Unnamed(values)) if human && values.len() == 1 => render(&values[0], human),
		ValueDef::Composite(composite) => render_composite(composite, human),
		ValueDef::Variant(variant) => {
			let values = &variant.values;
			match (variant.name.as_str(), values.len()) {
				("None", 0) => Json::Null,
				("Some", 1) => render_payload(values, human),
				(name, 0) => Json::String(name.to_string()),
				(name, _) => {
					let mut map = Map::new();
					map.insert(name.to_string(), render_payload(values, human));
					Json::Object(map)
				}
			}
		}
		ValueDef::BitSequence(_) => Json::Null,
	}
}

fn render_composite(composite: &Composite<()>, human: bool) -> Json {
	match composite {
		Composite::Named(fields) => {
			Json::Object(fields.iter().map(|(name, value)| (name.clone(), render(value, human))).collect())
		}
		Composite::Unnamed(values) => Json::Array(values.iter().map(|value| render(value, human)).collect()),
	}
}

/// A variant payload with a single unnamed field is rendered as that field.
fn render_payload(values: &Composite<()>, human: bool) -> Json {
	match values {
		Composite::Unnamed(values) if values.len() == 1 => render(&values[0], human),
		other => render_composite(other, human),
	}
}

fn primitive(p: &Primitive) -> Json {
	match p {
		Primitive::Bool(b) => Json::Bool(*b),
		Primitive::Char(c) => Json::String(c.to_string()),
		Primitive::String(s) => Json::String(s.clone()),
		Primitive::U128(n) => number_u128(*n),
		Primitive::I128(n) => number_i128(*n),
		Primitive::U256(bytes) | Primitive::I256(bytes) => Json::String(hex_le(bytes)),
	}
}

/// JSON number when the value fits 64 bits, decimal string otherwise.
pub fn number_u128(n: u128) -> Json {
	match u64::try_from(n) {
		Ok(n) => Json::Number(n.into()),
		Err(_) => Json::String(n.to_string()),
	}
}

pub fn number_i128(n: i128) -> Json {
	match i64::try_from(n) {
		Ok(n) => Json::Number(n.into()),
		Err(_) => Json::String(n.to_string()),
	}
}

/// JSON number from a float; non finite values become `null`.
pub fn number_f64(n: f64) -> Json {
	Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}

// 256 bit integers are little endian; show them most significant byte first.
fn hex_le(bytes: &[u8; 32]) -> String {
	let be: Vec<u8> = bytes.iter().rev().copied().collect();
	format!("0x{}", hex::encode(be))
}

/// Peel off single field tuple structs (`Perbill(u32)`, `Compact` newtypes and the like).
pub fn unwrap_newtype(mut value: &Value) -> &Value {
	while let ValueDef::Composite(Composite::Unnamed(values)) = &value.value {
		if values.len() != 1 {
			break;
		}
		value = &values[0];
	}
	value
}

pub fn as_u128(value: &Value) -> Option<u128> {
	match &unwrap_newtype(value).value {
		ValueDef::Primitive(Primitive::U128(n)) => Some(*n),
		ValueDef::Primitive(Primitive::I128(n)) => u128::try_from(*n).ok(),
		ValueDef::Primitive(Primitive::String(s)) => s.parse().ok(),
		_ => None,
	}
}

pub fn as_i128(value: &Value) -> Option<i128> {
	match &unwrap_newtype(value).value {
		ValueDef::Primitive(Primitive::I128(n)) => Some(*n),
		ValueDef::Primitive(Primitive::U128(n)) => i128::try_from(*n).ok(),
		ValueDef::Primitive(Primitive::String(s)) => s.parse().ok(),
		_ => None,
	}
}

pub fn as_bool(value: &Value) -> Option<bool> {
	match &unwrap_newtype(value).value {
		ValueDef::Primitive(Primitive::Bool(b)) => Some(*b),
		_ => None,
	}
}

pub fn as_str(value: &Value) -> Option<&str> {
	match &unwrap_newtype(value).value {
		ValueDef::Primitive(Primitive::String(s)) => Some(s.as_str()),
		_ => None,
	}
}

/// Bytes of a `u8` sequence, looking through newtype wrappers such as `AccountId32([u8; 32])`.
pub fn as_bytes(value: &Value) -> Option<Vec<u8>> {
	match &value.value {
		ValueDef::Composite(Composite::Unnamed(values)) => {
			if let [inner] = values.as_slice() {
				if matches!(inner.value, ValueDef::Composite(_)) {
					return as_bytes(inner);
				}
			}
			values
				.iter()
				.map(|v| match &v.value {
					ValueDef::Primitive(Primitive::U128(n)) => u8::try_from(*n).ok(),
					_ => None,
				})
				.collect()
		}
		ValueDef::Primitive(Primitive::String(s)) => match s.strip_prefix("0x") {
			Some(hex_str) => hex::decode(hex_str).ok(),
			None => Some(s.as_bytes().to_vec()),
		},
		_ => None,
	}
}

/// Items of a sequence.
pub fn as_sequence(value: &Value) -> Option<&[Value]> {
	match &value.value {
		ValueDef::Composite(Composite::Unnamed(values)) => Some(values.as_slice()),
		ValueDef::Composite(Composite::Named(fields)) if fields.is_empty() => Some(&[]),
		_ => None,
	}
}

/// Field of a composite by name, falling back to its position for tuple structs.
pub fn field<'a>(value: &'a Value, name: &str, position: usize) -> Option<&'a Value> {
	match &value.value {
		ValueDef::Composite(Composite::Named(fields)) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
		ValueDef::Composite(Composite::Unnamed(values)) => values.get(position),
		_ => None,
	}
}

/// `Some(None)` for an empty option, `Some(Some(inner))` for a filled one and `None`
/// when the value is not option shaped at all.
pub fn as_option(value: &Value) -> Option<Option<&Value>> {
	match &value.value {
		ValueDef::Variant(variant) => match (variant.name.as_str(), &variant.values) {
			("None", values) if values.len() == 0 => Some(None),
			("Some", Composite::Unnamed(values)) if values.len() == 1 => Some(Some(&values[0])),
			_ => None,
		},
		_ => None,
	}
}

/// Payload of a variant as a standalone value: nothing for unit variants, the field itself
/// for single unnamed fields, the whole composite otherwise.
pub fn variant_payload(values: &Composite<()>) -> Option<Value> {
	match values {
		c if c.len() == 0 => None,
		Composite::Unnamed(values) if values.len() == 1 => Some(values[0].clone()),
		other => Some(Value { value: ValueDef::Composite(other.clone()), context: () }),
	}
}
