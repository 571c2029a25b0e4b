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
	call::split_pallet_variant,
	event::{handle_event, EventInstance},
};
use scale_value::Value;
use subevents_common::{Event, EventName, Outcome};
use subevents_metadata::{Metadata, NameFilter};

/// An event emitted in a block, with the extrinsic it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
	pub module: String,
	pub event: String,
	pub args: Vec<Value>,
	pub arg_types: Option<Vec<u32>>,
	/// Position of the extrinsic that emitted the event; `None` for block level events.
	pub index: Option<u32>,
}

impl EventRecord {
	pub fn new(module: &str, event: &str, args: Vec<Value>, index: Option<u32>) -> Self {
		Self { module: module.to_string(), event: event.to_string(), args, arg_types: None, index }
	}

	/// Read a `RuntimeEvent` shaped value: `Pallet(Event { ..fields })`.
	pub fn from_value(value: &Value, index: Option<u32>) -> Option<Self> {
		let (module, event, args) = split_pallet_variant(value)?;
		Some(Self::new(module, event, args, index))
	}

	pub fn name(&self) -> EventName {
		EventName::event(&self.module, &self.event)
	}
}

/// Render every record that passes `filter`; a failing record does not affect the others.
pub fn handle_events(metadata: &Metadata, filter: &dyn NameFilter, block: u64, records: &[EventRecord]) -> Outcome<Event> {
	let mut outcome = Outcome::new();
	for record in records {
		let name = record.name();
		if !filter.matches(&name.full) {
			continue;
		}
		let instance = EventInstance { name, args: &record.args, arg_types: record.arg_types.as_deref() };
		match handle_event(metadata, block, record.index, instance) {
			Ok(event) => outcome.push(event),
			Err(e) => outcome.error(e.details()),
		}
	}
	outcome
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{account, metadata};
	use subevents_metadata::PatternFilter;

	#[test]
	fn should_read_event_values() {
		let value = Value::unnamed_variant(
			"Balances",
			vec![Value::named_variant(
				"Transfer",
				vec![("from", account(1)), ("to", account(2)), ("amount", Value::u128(10))],
			)],
		);
		let record = EventRecord::from_value(&value, Some(3)).unwrap();
		assert_eq!(record.name().full, "event.balances.transfer");
		assert_eq!(record.args.len(), 3);
		assert_eq!(record.index, Some(3));
	}

	#[test]
	fn should_collect_events_and_errors() {
		let metadata = metadata();
		let records = vec![
			EventRecord::new("Balances", "Transfer", vec![account(1), account(2), Value::u128(10)], Some(0)),
			EventRecord::new("Balances", "Transfer", vec![account(1)], Some(1)),
			EventRecord::new("System", "ExtrinsicSuccess", vec![], Some(0)),
			EventRecord::new("Balances", "Burned", vec![], None),
		];

		let outcome = handle_events(&metadata, &PatternFilter::default(), 5, &records);
		let names: Vec<_> = outcome.items.iter().map(|e| e.name.as_str()).collect();
		assert_eq!(names, vec!["event.balances.transfer", "event.system.extrinsic-success"]);
		let messages: Vec<_> = outcome.errors.iter().map(|e| e.message.as_str()).collect();
		assert_eq!(messages, vec!["event args count does not match its metadata", "unknown event"]);

		let only_balances = PatternFilter::new(&["event.balances.*"]).unwrap();
		let outcome = handle_events(&metadata, &only_balances, 5, &records);
		assert_eq!(outcome.items.len(), 1);
		assert_eq!(outcome.errors.len(), 2);
	}
}
