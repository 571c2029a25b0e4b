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

//! Facade crate: decode the events and calls of Substrate blocks against a catalog built
//! from the runtime metadata of each spec version.

#![forbid(unsafe_code)]

mod call;
mod calls;
mod error;
mod event;
mod events;
#[cfg(test)]
mod testing;

use codec::Decode;
use frame_metadata::RuntimeMetadataPrefixed;
use std::{collections::HashMap, sync::Arc};
use subevents_metadata::{Metadata, PatternFilter, TypeRegistryOptions};

pub use self::error::{Error, HandleError};
pub use call::CallInstance;
pub use calls::{handle_calls, Block, Extrinsic};
pub use event::{handle_event, handle_event_with, EventInstance};
pub use events::{handle_events, EventRecord};
pub use subevents_common::{About, Event, EventName, Outcome, SpecVersion};
pub use subevents_metadata::ChainQuery;

/// Catalogs by spec version, plus what they are built with.
pub struct Decoder {
	filter: PatternFilter,
	options: TypeRegistryOptions,
	metadata: HashMap<SpecVersion, Arc<Metadata>>,
}

impl Default for Decoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Decoder {
	/// A decoder for every event and call, with the default type bindings.
	pub fn new() -> Self {
		Self::with_config(PatternFilter::default(), TypeRegistryOptions::default())
	}

	pub fn with_config(filter: PatternFilter, options: TypeRegistryOptions) -> Self {
		Self { filter, options, metadata: HashMap::new() }
	}

	/// Register a runtime version with the decoder.
	///
	/// The catalog is built in full before it replaces the one registered for `version`,
	/// so readers holding the previous [`Arc<Metadata>`] keep a complete catalog.
	pub fn register_version(&mut self, version: SpecVersion, about: About, mut metadata: &[u8]) -> Result<(), Error> {
		let metadata: RuntimeMetadataPrefixed = Decode::decode(&mut metadata)?;
		let meta = Metadata::from_runtime_metadata(about, metadata.1, &self.filter, self.options.clone())?;
		log::debug!("registered spec version {} with {} catalog entries", version, meta.events().len());
		self.metadata.insert(version, Arc::new(meta));
		Ok(())
	}

	pub fn has_version(&self, version: &SpecVersion) -> bool {
		self.metadata.contains_key(version)
	}

	pub fn metadata(&self, version: SpecVersion) -> Result<Arc<Metadata>, Error> {
		self.metadata.get(&version).cloned().ok_or(Error::SpecVersionNotFound(version))
	}

	pub fn decode_events(
		&self,
		version: SpecVersion,
		block: u64,
		records: &[EventRecord],
	) -> Result<Outcome<Event>, Error> {
		let metadata = self.metadata(version)?;
		Ok(handle_events(&metadata, &self.filter, block, records))
	}

	pub async fn decode_calls(
		&self,
		version: SpecVersion,
		block: &Block,
		records: &[EventRecord],
		query: Option<&dyn ChainQuery>,
	) -> Result<Outcome<Event>, Error> {
		let metadata = self.metadata(version)?;
		Ok(handle_calls(&metadata, &self.filter, query, block, records).await)
	}
}
