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

//! Runtime type descriptors.
//!
//! A [`TypeDescriptor`] is the shape of one field's type as far as the mappers
//! are concerned: a wrapper kind, ordered sub-descriptors for composites, and an
//! optional name hint taken from the field that declared it. Descriptors only
//! live while a catalog is being built.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural kind of a descriptor; key of the wrapper dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapperKind {
	Plain,
	Compact,
	Vector,
	Option,
	Tuple,
	Struct,
	Enum,
	Map,
	Lookup,
	Null,
}

impl fmt::Display for WrapperKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			WrapperKind::Plain => "plain",
			WrapperKind::Compact => "compact",
			WrapperKind::Vector => "vector",
			WrapperKind::Option => "option",
			WrapperKind::Tuple => "tuple",
			WrapperKind::Struct => "struct",
			WrapperKind::Enum => "enum",
			WrapperKind::Map => "map",
			WrapperKind::Lookup => "lookup",
			WrapperKind::Null => "null",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
	pub kind: WrapperKind,
	/// Base type name: a primitive (`u128`, `Bytes`) or the ident of a named type.
	pub type_name: String,
	/// Semantic name carried over from the declaring field (`Balance`, `Vec<AccountId>`).
	pub name_hint: Option<String>,
	/// Ordered sub-descriptors; named for structs and enums, positional otherwise.
	pub subs: Vec<SubDescriptor>,
	/// Type index this descriptor refers to, for [`WrapperKind::Lookup`].
	pub lookup: Option<u32>,
	/// `::` joined path of the named type, if any.
	pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubDescriptor {
	pub name: Option<String>,
	pub descriptor: TypeDescriptor,
}

impl TypeDescriptor {
	fn new(kind: WrapperKind, type_name: impl Into<String>, subs: Vec<SubDescriptor>) -> Self {
		Self { kind, type_name: type_name.into(), name_hint: None, subs, lookup: None, path: None }
	}

	pub fn plain(type_name: impl Into<String>) -> Self {
		Self::new(WrapperKind::Plain, type_name, Vec::new())
	}

	pub fn compact(sub: TypeDescriptor) -> Self {
		let name = format!("Compact<{}>", sub.type_name);
		Self::new(WrapperKind::Compact, name, vec![SubDescriptor::positional(sub)])
	}

	pub fn vector(sub: TypeDescriptor) -> Self {
		let name = format!("Vec<{}>", sub.type_name);
		Self::new(WrapperKind::Vector, name, vec![SubDescriptor::positional(sub)])
	}

	pub fn option(sub: TypeDescriptor) -> Self {
		let name = format!("Option<{}>", sub.type_name);
		Self::new(WrapperKind::Option, name, vec![SubDescriptor::positional(sub)])
	}

	pub fn tuple(subs: Vec<TypeDescriptor>) -> Self {
		let name = format!("({})", subs.iter().map(|s| s.type_name.as_str()).collect::<Vec<_>>().join(", "));
		Self::new(WrapperKind::Tuple, name, subs.into_iter().map(SubDescriptor::positional).collect())
	}

	pub fn map(keys: TypeDescriptor, values: TypeDescriptor) -> Self {
		let name = format!("BTreeMap<{}, {}>", keys.type_name, values.type_name);
		Self::new(WrapperKind::Map, name, vec![SubDescriptor::positional(keys), SubDescriptor::positional(values)])
	}

	pub fn structure<S: Into<String>>(type_name: impl Into<String>, fields: Vec<(S, TypeDescriptor)>) -> Self {
		let subs = fields.into_iter().map(|(name, d)| SubDescriptor::named(name, d)).collect();
		Self::new(WrapperKind::Struct, type_name, subs)
	}

	pub fn enumeration<S: Into<String>>(type_name: impl Into<String>, variants: Vec<(S, TypeDescriptor)>) -> Self {
		let subs = variants.into_iter().map(|(name, d)| SubDescriptor::named(name, d)).collect();
		Self::new(WrapperKind::Enum, type_name, subs)
	}

	pub fn lookup(id: u32, type_name: impl Into<String>) -> Self {
		let mut d = Self::new(WrapperKind::Lookup, type_name, Vec::new());
		d.lookup = Some(id);
		d
	}

	pub fn null() -> Self {
		Self::new(WrapperKind::Null, "Null", Vec::new())
	}

	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.name_hint = Some(hint.into());
		self
	}

	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// The single inner descriptor of a compact, vector or option.
	pub fn sub(&self) -> Option<&TypeDescriptor> {
		self.subs.first().map(|s| &s.descriptor)
	}
}

impl SubDescriptor {
	pub fn named(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
		Self { name: Some(name.into()), descriptor }
	}

	pub fn positional(descriptor: TypeDescriptor) -> Self {
		Self { name: None, descriptor }
	}
}

/// Something that can hand out descriptors by type index.
pub trait DescriptorSource {
	fn descriptor(&self, id: u32) -> Option<TypeDescriptor>;

	/// Display name of a type, used for provenance comments.
	fn type_name(&self, id: u32) -> String {
		format!("Lookup{}", id)
	}
}

lazy_static! {
	static ref QUALIFIED_SELF: Regex =
		Regex::new(r"<[A-Za-z_][A-Za-z0-9_]*\s+as\s+[A-Za-z_][A-Za-z0-9_:]*(?:<[A-Za-z0-9_,\s]*>)?>::")
			.expect("valid regex");
	static ref PATH_PREFIX: Regex = Regex::new(r"\b(?:[A-Za-z_][A-Za-z0-9_]*::)+").expect("valid regex");
	static ref GENERIC_PARAMS: Regex = Regex::new(r"<(?:T|I)(?:\s*,\s*(?:T|I))*>").expect("valid regex");
}

/// Strip trait qualifiers, module paths and bare generic parameters from a
/// declared type name: `<T as Config>::Balance` becomes `Balance`, `BalanceOf<T, I>`
/// becomes `BalanceOf` and `Vec<<T as Config>::RuntimeCall>` becomes `Vec<RuntimeCall>`.
pub fn sanitize_type_name(name: &str) -> String {
	let name = QUALIFIED_SELF.replace_all(name, "");
	let name = PATH_PREFIX.replace_all(&name, "");
	let name = GENERIC_PARAMS.replace_all(&name, "");
	name.trim().to_string()
}

/// Remove one `Wrapper<...>` layer from a name hint, if it has one.
pub fn strip_wrapper<'a>(hint: &'a str, wrapper: &str) -> Option<&'a str> {
	hint.strip_prefix(wrapper)?.strip_prefix('<')?.strip_suffix('>').map(str::trim)
}

/// Split a `(A, B<C, D>)` name hint into its top level slots.
pub fn split_tuple_hint(hint: &str) -> Option<Vec<String>> {
	let inner = hint.trim().strip_prefix('(')?.strip_suffix(')')?;
	let mut slots = Vec::new();
	let mut depth = 0usize;
	let mut current = String::new();
	for c in inner.chars() {
		match c {
			'<' | '(' | '[' => {
				depth += 1;
				current.push(c);
			}
			'>' | ')' | ']' => {
				depth = depth.saturating_sub(1);
				current.push(c);
			}
			',' if depth == 0 => {
				slots.push(current.trim().to_string());
				current.clear();
			}
			_ => current.push(c),
		}
	}
	if !current.trim().is_empty() {
		slots.push(current.trim().to_string());
	}
	Some(slots)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_sanitize_type_names() {
		assert_eq!(sanitize_type_name("<T as Config>::Balance"), "Balance");
		assert_eq!(sanitize_type_name("<T as pallet::Config<I>>::Balance"), "Balance");
		assert_eq!(sanitize_type_name("BalanceOf<T>"), "BalanceOf");
		assert_eq!(sanitize_type_name("BalanceOf<T, I>"), "BalanceOf");
		assert_eq!(sanitize_type_name("T::AccountId"), "AccountId");
		assert_eq!(sanitize_type_name("Vec<<T as Config>::RuntimeCall>"), "Vec<RuntimeCall>");
		assert_eq!(sanitize_type_name("Box<<T as Config>::Call>"), "Box<Call>");
		assert_eq!(sanitize_type_name("Vec<(T::AccountId, BalanceOf<T>)>"), "Vec<(AccountId, BalanceOf)>");
		assert_eq!(sanitize_type_name("u128"), "u128");
	}

	#[test]
	fn should_strip_wrappers() {
		assert_eq!(strip_wrapper("Vec<Balance>", "Vec"), Some("Balance"));
		assert_eq!(strip_wrapper("Compact<Balance>", "Compact"), Some("Balance"));
		assert_eq!(strip_wrapper("Balance", "Vec"), None);
		assert_eq!(strip_wrapper("Vector<u8>", "Vec"), None);
	}

	#[test]
	fn should_split_tuple_hints() {
		assert_eq!(
			split_tuple_hint("(CurrencyId, BTreeMap<u32, Balance>)"),
			Some(vec!["CurrencyId".to_string(), "BTreeMap<u32, Balance>".to_string()])
		);
		assert_eq!(split_tuple_hint("CurrencyId"), None);
	}
}
