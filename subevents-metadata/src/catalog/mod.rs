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

//! The catalog of every event and call a runtime version can produce.
//!
//! A [`Metadata`] is built once per runtime version: each pallet event and call variant
//! becomes an [`EventSpec`] whose arguments carry the [`Handler`] that renders them.
//! Entries are sorted and indexed by full name, then [`detect_balance_currency`] links
//! balances to the currencies next to them, both in argument lists and inside referenced
//! types. Nothing changes after that.

mod docs;
mod version_14;

use crate::{
	automagic::{detect_balance_currency, detect_nested_currency},
	currency::CurrencyRegistry,
	descriptor::sanitize_type_name,
	filter::{is_structural, NameFilter},
	mapper::Handler,
	registry::{LookupTable, TypeRegistry, TypeRegistryOptions},
	source::{RuntimeSource, VariantInfo},
	unknowns::Unknowns,
};
use codec::Decode;
use frame_metadata::{RuntimeMetadata, RuntimeMetadataPrefixed};
use std::collections::HashMap;
use subevents_common::{About, ErrorDetails, EventKind, EventName};

/// An enum of the possible errors that can be returned from attempting to construct
/// a [`Metadata`] struct.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetadataError {
	#[error("metadata version {0} is not supported")]
	UnsupportedVersion(u32),
	#[error("{0}")]
	CodecError(#[from] codec::Error),
	#[error("unexpected type; expecting a Variant type, but got {got}")]
	ExpectedVariantType { got: String },
	#[error("could not find type with ID {0}")]
	TypeNotFound(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventArgument {
	pub name: String,
	/// Type index of the argument.
	pub ty: u32,
	/// Type name as declared by the pallet, if any.
	pub type_name: Option<String>,
	/// Where the argument's type came from, for coverage reports.
	pub comment: String,
	pub handler: Handler,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
	pub name: EventName,
	pub docs: String,
	pub args: Vec<EventArgument>,
}

impl EventSpec {
	pub fn arg(&self, name: &str) -> Option<&EventArgument> {
		self.args.iter().find(|arg| arg.name == name)
	}
}

#[derive(Debug)]
pub struct Metadata {
	about: About,
	events: Vec<EventSpec>,
	index: HashMap<String, usize>,
	lookups: LookupTable,
	currencies: CurrencyRegistry,
	unknowns: Unknowns,
	/// Non-fatal findings of the build, such as fallback argument names.
	diagnostics: Vec<ErrorDetails>,
}

impl Metadata {
	/// Decode SCALE encoded `RuntimeMetadataPrefixed` and build the catalog from it.
	pub fn from_bytes(
		about: About,
		bytes: &[u8],
		filter: &dyn NameFilter,
		options: TypeRegistryOptions,
	) -> Result<Self, MetadataError> {
		log::trace!("Decoding metadata");
		let meta = RuntimeMetadataPrefixed::decode(&mut &*bytes)?;
		Self::from_runtime_metadata(about, meta.1, filter, options)
	}

	pub fn from_runtime_metadata(
		about: About,
		metadata: RuntimeMetadata,
		filter: &dyn NameFilter,
		options: TypeRegistryOptions,
	) -> Result<Self, MetadataError> {
		match metadata {
			RuntimeMetadata::V14(meta_v14) => {
				log::trace!("V14 metadata found.");
				Self::build(about, &meta_v14, filter, options)
			}
			unsupported_meta => Err(MetadataError::UnsupportedVersion(unsupported_meta.version())),
		}
	}

	/// Build the catalog for every entry of `source` that passes `filter`, plus the batch,
	/// wrapper and outcome entries that flattening calls relies on.
	pub fn build(
		about: About,
		source: &dyn RuntimeSource,
		filter: &dyn NameFilter,
		options: TypeRegistryOptions,
	) -> Result<Self, MetadataError> {
		let mut builder = Builder {
			source,
			types: TypeRegistry::with_options(&about.chain, options),
			unknowns: Unknowns::default(),
			diagnostics: Vec::new(),
		};

		let pallets = source.pallets()?;
		let mut events = Vec::new();
		for kind in [EventKind::Event, EventKind::Call] {
			for pallet in &pallets {
				let variants = match kind {
					EventKind::Event => &pallet.events,
					EventKind::Call => &pallet.calls,
				};
				for variant in variants {
					let name = EventName::new(kind, &pallet.name, &variant.name);
					if !filter.matches(&name.full) && !is_structural(&name.full) {
						continue;
					}
					events.push(builder.entry(name, variant));
				}
			}
		}
		events.sort_by(|a, b| a.name.full.cmp(&b.name.full));

		for event in events.iter_mut() {
			let siblings =
				event.args.iter_mut().map(|EventArgument { name, handler, .. }| (name.as_str(), &mut handler.spec)).collect();
			detect_balance_currency(siblings, about.chain.native_token());
		}

		let index = events.iter().enumerate().map(|(i, event)| (event.name.full.clone(), i)).collect();
		log::debug!("catalog built with {} entries", events.len());

		let Builder { types, unknowns, diagnostics, .. } = builder;
		let mut lookups = types.into_lookups();
		for handler in lookups.handlers_mut() {
			detect_nested_currency(&mut handler.spec, about.chain.native_token());
		}
		Ok(Self {
			currencies: CurrencyRegistry::new(&about.chain),
			about,
			events,
			index,
			lookups,
			unknowns,
			diagnostics,
		})
	}

	pub fn get(&self, full: &str) -> Option<&EventSpec> {
		self.index.get(full).map(|&i| &self.events[i])
	}

	/// Every entry, sorted by full name.
	pub fn events(&self) -> &[EventSpec] {
		&self.events
	}

	pub fn about(&self) -> &About {
		&self.about
	}

	pub fn lookups(&self) -> &LookupTable {
		&self.lookups
	}

	pub fn currencies(&self) -> &CurrencyRegistry {
		&self.currencies
	}

	/// Types no binding was found for.
	pub fn unknowns(&self) -> &Unknowns {
		&self.unknowns
	}

	pub fn diagnostics(&self) -> &[ErrorDetails] {
		&self.diagnostics
	}
}

struct Builder<'a> {
	source: &'a dyn RuntimeSource,
	types: TypeRegistry,
	unknowns: Unknowns,
	diagnostics: Vec<ErrorDetails>,
}

impl Builder<'_> {
	fn entry(&mut self, name: EventName, variant: &VariantInfo) -> EventSpec {
		let raw_docs = variant.docs.join("\n");
		// Unnamed event fields may be named in the docs; calls only get numbered names.
		let doc_names = match name.kind {
			EventKind::Event => docs::arg_names(&raw_docs),
			EventKind::Call => Vec::new(),
		};
		let use_doc_names = name.kind == EventKind::Event && doc_names.len() == variant.fields.len();

		let mut fallback_used = false;
		let mut args = Vec::with_capacity(variant.fields.len());
		for (i, field) in variant.fields.iter().enumerate() {
			let arg_name = match &field.name {
				Some(field_name) => field_name.clone(),
				None if use_doc_names => doc_names[i].clone(),
				None => {
					fallback_used = true;
					format!("arg{}", i)
				}
			};
			let comment = match &field.type_name {
				Some(type_name) => format!("from field: {}", type_name),
				None => format!("from si lookup: {}", self.source.type_name(field.ty)),
			};
			let path = format!("{}.{}", name.full, arg_name);
			let handler = self.handler(field.ty, field.type_name.as_deref(), &path);
			args.push(EventArgument { name: arg_name, ty: field.ty, type_name: field.type_name.clone(), comment, handler });
		}

		if fallback_used {
			log::debug!("fallback argument names used for {}", name.full);
			let diagnostic = match name.kind {
				EventKind::Event => ErrorDetails::new(
					"parsed from docs event argument names count does not match real argument count, \
					 fallback names were used instead",
				)
				.with("module", name.module.as_str())
				.with("event", name.event.as_str())
				.with("docs", raw_docs.as_str())
				.with("realArgsCount", variant.fields.len()),
				EventKind::Call => {
					ErrorDetails::new("some call argument names are undefined, fallback names were used instead")
						.with("module", name.module.as_str())
						.with("call", name.event.as_str())
						.with("argNames", args.iter().map(|arg| arg.name.clone()).collect::<Vec<_>>())
				}
			};
			self.diagnostics.push(diagnostic);
		}

		EventSpec { name, docs: docs::summary(&raw_docs), args }
	}

	fn handler(&mut self, ty: u32, type_name: Option<&str>, path: &str) -> Handler {
		let Some(descriptor) = self.source.descriptor(ty) else {
			self.unknowns.types.add(self.source.type_name(ty), path);
			return Handler::unknown();
		};
		let descriptor = match type_name {
			Some(type_name) => descriptor.with_hint(sanitize_type_name(type_name)),
			None => descriptor,
		};
		self.types.get(self.source.as_descriptor_source(), &descriptor, path, &mut self.unknowns)
	}
}
