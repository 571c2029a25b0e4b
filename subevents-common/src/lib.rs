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

//! Common types shared between the catalog builder and the event/call handlers.

#![forbid(unsafe_code)]

mod about;
mod event;

use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::fmt;

pub use about::{About, AddressFormat, BlockInfo, ChainInfo, NodeInfo};
pub use event::{Event, Params, Payload};

/// Spec Version type defined in the runtime of a chain.
pub type SpecVersion = u32;

/// Whether a catalog entry describes a pallet event or a pallet call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Event,
	Call,
}

impl EventKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventKind::Event => "event",
			EventKind::Call => "call",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Normalized name of an event or a call.
///
/// Module and event are kebab-cased (`Balances`/`Transfer` becomes `balances`/`transfer`,
/// `batch_all` becomes `batch-all`). `short` is `module.event` and `full` is `kind.short`,
/// which keeps an event and a call of the same module and method apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventName {
	pub kind: EventKind,
	pub module: String,
	pub event: String,
	pub short: String,
	pub full: String,
}

impl EventName {
	pub fn new(kind: EventKind, module: &str, event: &str) -> Self {
		let module = module.to_kebab_case();
		let event = event.to_kebab_case();
		let short = format!("{}.{}", module, event);
		let full = format!("{}.{}", kind, short);
		Self { kind, module, event, short, full }
	}

	pub fn event(module: &str, event: &str) -> Self {
		Self::new(EventKind::Event, module, event)
	}

	pub fn call(module: &str, call: &str) -> Self {
		Self::new(EventKind::Call, module, call)
	}
}

impl fmt::Display for EventName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full)
	}
}

/// A non-fatal error recorded while processing one unit (an event, a call, an extrinsic).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
	pub message: String,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub details: Map<String, Json>,
}

impl ErrorDetails {
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), details: Map::new() }
	}

	/// Attach a structured detail to the record.
	pub fn with(mut self, key: &str, value: impl Into<Json>) -> Self {
		self.details.insert(key.to_string(), value.into());
		self
	}
}

impl fmt::Display for ErrorDetails {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)?;
		if !self.details.is_empty() {
			write!(f, " {}", Json::Object(self.details.clone()))?;
		}
		Ok(())
	}
}

/// Items produced so far plus every error that did not stop production.
///
/// Outcomes of sibling units are merged upward, so one failing call inside a batch
/// never drops what its siblings produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
	pub items: Vec<T>,
	pub errors: Vec<ErrorDetails>,
}

impl<T> Default for Outcome<T> {
	fn default() -> Self {
		Self { items: Vec::new(), errors: Vec::new() }
	}
}

impl<T> Outcome<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, item: T) {
		self.items.push(item);
	}

	pub fn error(&mut self, error: ErrorDetails) {
		self.errors.push(error);
	}

	pub fn merge(&mut self, other: Outcome<T>) {
		self.items.extend(other.items);
		self.errors.extend(other.errors);
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.errors.is_empty()
	}
}

impl<T> FromIterator<Outcome<T>> for Outcome<T> {
	fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
		iter.into_iter().fold(Outcome::new(), |mut acc, next| {
			acc.merge(next);
			acc
		})
	}
}
