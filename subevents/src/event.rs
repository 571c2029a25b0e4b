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

use crate::error::HandleError;
use futures::FutureExt;
use scale_value::Value;
use serde_json::{Map, Value as Json};
use subevents_common::{Event, EventName, Params, Payload};
use subevents_metadata::{
	parser::{parse, ParserContext},
	value::to_json,
	ChainQuery, Metadata, Spec,
};

/// One decoded event or call, ready to be rendered against the catalog.
#[derive(Debug, Clone)]
pub struct EventInstance<'a> {
	pub name: EventName,
	pub args: &'a [Value],
	/// Type indexes the decoder saw for each argument. When present they must agree
	/// with the catalog.
	pub arg_types: Option<&'a [u32]>,
}

/// Render `event` in raw and human form, asking `query` for identities and embedded calls.
pub async fn handle_event_with(
	metadata: &Metadata,
	block: u64,
	index: Option<u32>,
	event: EventInstance<'_>,
	query: Option<&dyn ChainQuery>,
) -> Result<Event, HandleError> {
	let full = event.name.full;
	let Some(spec) = metadata.get(&full) else {
		return Err(HandleError::UnknownEvent { event: full });
	};
	if event.args.len() != spec.args.len() {
		return Err(HandleError::ArgCountMismatch { event: full, expected: spec.args.len(), received: event.args.len() });
	}
	if let Some(types) = event.arg_types {
		if let Some((arg, ty)) = spec.args.iter().zip(types).find(|(arg, ty)| arg.ty != **ty) {
			return Err(HandleError::ArgTypeMismatch {
				call: full.clone(),
				arg: arg.name.clone(),
				expected: arg.ty.to_string(),
				received: ty.to_string(),
			});
		}
	}

	let raw_args: Map<String, Json> =
		spec.args.iter().zip(event.args).map(|(arg, value)| (arg.name.clone(), to_json(value))).collect();

	let mut params = Params::default();
	for (arg, value) in spec.args.iter().zip(event.args) {
		let cx = ParserContext::new(metadata.currencies(), metadata.lookups(), &raw_args, query, &arg.name);
		let handler = &arg.handler;
		params.raw.insert(arg.name.clone(), parse(&handler.raw, &handler.spec, value, &cx).await);
		if handler.spec != Spec::Skip {
			params.human.insert(arg.name.clone(), parse(&handler.human, &handler.spec, value, &cx).await);
		}
	}

	Ok(Event { name: full, params, payload: Payload { block, index } })
}

/// [`handle_event_with`] without live chain access; nothing in it ever waits.
pub fn handle_event(
	metadata: &Metadata,
	block: u64,
	index: Option<u32>,
	event: EventInstance<'_>,
) -> Result<Event, HandleError> {
	handle_event_with(metadata, block, index, event, None)
		.now_or_never()
		.unwrap_or_else(|| Err(HandleError::Unexpected("event rendering did not complete".into())))
}
