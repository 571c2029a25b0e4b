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

//! Coverage diagnostics collected while building a catalog.

use crate::descriptor::WrapperKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Each key with the distinct argument paths it was seen at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Multiset<K: Ord>(BTreeMap<K, BTreeSet<String>>);

impl<K: Ord> Default for Multiset<K> {
	fn default() -> Self {
		Self(BTreeMap::new())
	}
}

impl<K: Ord> Multiset<K> {
	pub fn add(&mut self, key: K, path: &str) {
		self.0.entry(key).or_default().insert(path.to_string());
	}

	pub fn merge(&mut self, other: Multiset<K>) {
		for (key, paths) in other.0 {
			self.0.entry(key).or_default().extend(paths);
		}
	}

	pub fn get<Q>(&self, key: &Q) -> Option<&BTreeSet<String>>
	where
		K: std::borrow::Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.0.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, &BTreeSet<String>)> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Descriptors no mapper claimed, bucketed by what was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Unknowns {
	/// Wrapper kinds without a wrapper mapper.
	pub wrappers: Multiset<WrapperKind>,
	/// Declared names (field type names) without a primitive mapper.
	pub names: Multiset<String>,
	/// Base type names without a primitive mapper.
	pub types: Multiset<String>,
}

impl Unknowns {
	pub fn merge(&mut self, other: Unknowns) {
		self.wrappers.merge(other.wrappers);
		self.names.merge(other.names);
		self.types.merge(other.types);
	}

	pub fn is_empty(&self) -> bool {
		self.wrappers.is_empty() && self.names.is_empty() && self.types.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_deduplicate_paths() {
		let mut unknowns = Unknowns::default();
		unknowns.types.add("Weight".to_string(), "event.system.extrinsic-success.info");
		unknowns.types.add("Weight".to_string(), "event.system.extrinsic-success.info");
		unknowns.types.add("Weight".to_string(), "event.system.extrinsic-failed.info");

		let mut other = Unknowns::default();
		other.names.add("DispatchInfo".to_string(), "event.system.extrinsic-success.info");
		unknowns.merge(other);

		assert_eq!(unknowns.types.get("Weight").map(|paths| paths.len()), Some(2));
		assert_eq!(unknowns.names.len(), 1);
		assert!(unknowns.wrappers.is_empty());
	}
}
