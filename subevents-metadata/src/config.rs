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

//! Per deployment type mapping overrides, read from JSON.

use crate::{
	mapper::{Binding, Mapper},
	registry::TypeRegistryOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid type mapping config: {0}")]
	Json(#[from] serde_json::Error),
	#[error("{0} is both bound and skipped")]
	Conflict(String),
}

/// Overrides layered on top of the default bindings, e.g.
///
/// ```json
/// { "bindings": { "AccountId": "address_evm" }, "skip": ["DispatchInfo"], "fixed_points": { "Rate": 18 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeMappingConfig {
	/// Type name to binding.
	pub bindings: HashMap<String, Binding>,
	/// Extra type names that are decoded but left out of human output.
	pub skip: Vec<String>,
	/// Type name to decimal exponent, for fixed point bindings.
	pub fixed_points: HashMap<String, u32>,
	/// Path prefixes of referenced types that are expanded; empty expands everything.
	pub lookup_whitelist: Vec<String>,
}

impl TypeMappingConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		if let Some(name) = config.skip.iter().find(|name| config.bindings.contains_key(*name)) {
			return Err(ConfigError::Conflict(name.clone()));
		}
		Ok(config)
	}

	pub fn into_options(self) -> TypeRegistryOptions {
		let mut overrides: HashMap<String, Mapper> =
			self.bindings.into_iter().map(|(name, binding)| (name, binding.mapper())).collect();
		overrides.extend(self.skip.into_iter().map(|name| (name, Binding::Skip.mapper())));
		TypeRegistryOptions {
			overrides,
			fixed_points: self.fixed_points,
			lookup_whitelist: self.lookup_whitelist,
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_read_overrides() {
		let config = TypeMappingConfig::from_json(
			r#"{
				"bindings": { "AccountId": "address_evm", "Amount": "balance" },
				"skip": ["DispatchInfo"],
				"fixed_points": { "Rate": 18 },
				"lookup_whitelist": ["pallet_balances"]
			}"#,
		)
		.unwrap();
		assert_eq!(config.bindings["AccountId"], Binding::AddressEvm);

		let options = config.into_options();
		let mut names: Vec<_> = options.overrides.keys().cloned().collect();
		names.sort();
		assert_eq!(names, vec!["AccountId", "Amount", "DispatchInfo"]);
		assert_eq!(options.fixed_points["Rate"], 18);
		assert_eq!(options.lookup_whitelist, vec!["pallet_balances".to_string()]);
		assert!(options.wrappers.is_none());
	}

	#[test]
	fn should_reject_conflicts_and_typos() {
		let conflict = TypeMappingConfig::from_json(r#"{ "bindings": { "X": "skip" }, "skip": ["X"] }"#);
		assert!(matches!(conflict, Err(ConfigError::Conflict(name)) if name == "X"));
		assert!(TypeMappingConfig::from_json(r#"{ "binding": {} }"#).is_err());
		assert!(TypeMappingConfig::from_json(r#"{ "bindings": { "X": "nope" } }"#).is_err());
	}

	#[test]
	fn empty_config_changes_nothing() {
		let options = TypeMappingConfig::from_json("{}").unwrap().into_options();
		assert!(options.overrides.is_empty());
		assert!(options.lookup_whitelist.is_empty());
	}
}
