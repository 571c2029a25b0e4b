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

use crate::{
	descriptor::{DescriptorSource, TypeDescriptor, WrapperKind},
	mapper::{self, Handler, Mapper, MapperContext},
	unknowns::Unknowns,
};
use std::{
	collections::{HashMap, HashSet},
	fmt,
};
use subevents_common::ChainInfo;

/// Handlers of resolved type references, by type index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable(HashMap<u32, Handler>);

impl LookupTable {
	pub fn get(&self, id: u32) -> Option<&Handler> {
		self.0.get(&id)
	}

	pub(crate) fn insert(&mut self, id: u32, handler: Handler) {
		self.0.insert(id, handler);
	}

	pub(crate) fn handlers_mut(&mut self) -> impl Iterator<Item = &mut Handler> {
		self.0.values_mut()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// How a [`TypeRegistry`] maps types, beyond the defaults.
#[derive(Clone, Default)]
pub struct TypeRegistryOptions {
	/// Replaces the default wrapper table.
	pub wrappers: Option<HashMap<WrapperKind, Mapper>>,
	/// Replaces the default primitive table.
	pub primitives: Option<HashMap<String, Mapper>>,
	/// Primitive bindings layered on top of the table in use.
	pub overrides: HashMap<String, Mapper>,
	/// Fixed point exponents layered on top of the defaults.
	pub fixed_points: HashMap<String, u32>,
	/// Path prefixes of referenced types that get expanded. Empty expands everything;
	/// other references are rendered opaquely.
	pub lookup_whitelist: Vec<String>,
}

impl fmt::Debug for TypeRegistryOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut overrides: Vec<_> = self.overrides.keys().collect();
		overrides.sort();
		f.debug_struct("TypeRegistryOptions")
			.field("wrappers", &self.wrappers.as_ref().map(HashMap::len))
			.field("primitives", &self.primitives.as_ref().map(HashMap::len))
			.field("overrides", &overrides)
			.field("fixed_points", &self.fixed_points)
			.field("lookup_whitelist", &self.lookup_whitelist)
			.finish()
	}
}

/// Binding tables plus the cycle guard for one catalog build.
pub struct TypeRegistry {
	pub(crate) chain: ChainInfo,
	pub(crate) wrappers: HashMap<WrapperKind, Mapper>,
	pub(crate) primitives: HashMap<String, Mapper>,
	pub(crate) fixed_points: HashMap<String, u32>,
	pub(crate) lookup_whitelist: Vec<String>,
	pub(crate) seen: HashSet<u32>,
	pub(crate) refs: LookupTable,
}

impl TypeRegistry {
	pub fn new(chain: &ChainInfo) -> Self {
		Self::with_options(chain, TypeRegistryOptions::default())
	}

	pub fn with_options(chain: &ChainInfo, options: TypeRegistryOptions) -> Self {
		let wrappers = options.wrappers.unwrap_or_else(mapper::default_wrappers);
		let mut primitives = options.primitives.unwrap_or_else(mapper::default_primitives);
		primitives.extend(options.overrides);
		let mut fixed_points = mapper::default_fixed_points();
		fixed_points.extend(options.fixed_points);
		Self {
			chain: chain.clone(),
			wrappers,
			primitives,
			fixed_points,
			lookup_whitelist: options.lookup_whitelist,
			seen: HashSet::new(),
			refs: LookupTable::default(),
		}
	}

	/// Map a descriptor found at `path`, recording misses in `unknowns`.
	pub fn get(
		&mut self,
		source: &dyn DescriptorSource,
		descriptor: &TypeDescriptor,
		path: &str,
		unknowns: &mut Unknowns,
	) -> Handler {
		let mut cx = MapperContext { registry: self, source, unknowns };
		cx.wrapper(descriptor, path)
	}

	pub fn lookups(&self) -> &LookupTable {
		&self.refs
	}

	pub fn into_lookups(self) -> LookupTable {
		self.refs
	}

	/// Whether a referenced type gets expanded or stays opaque.
	pub(crate) fn expands(&self, resolved: &TypeDescriptor) -> bool {
		if self.lookup_whitelist.is_empty() || self.primitives.contains_key(&resolved.type_name) {
			return true;
		}
		let Some(path) = resolved.path.as_deref() else {
			return true;
		};
		self.lookup_whitelist.iter().any(|prefix| path.starts_with(prefix.as_str()))
	}
}
