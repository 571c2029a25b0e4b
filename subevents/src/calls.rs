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

//! Flattening of extrinsics into the calls they actually perform.
//!
//! Batches are unrolled, proxy, derivative and multisig wrappers are peeled off, and
//! each remaining call is rendered with the account that effectively signed it. Every
//! extrinsic is checked against the outcome events of the block first: only extrinsics
//! that succeeded without interruption are flattened.

use crate::{
	call::CallInstance,
	error::HandleError,
	event::handle_event_with,
	events::EventRecord,
};
use futures::future::{FutureExt, LocalBoxFuture};
use scale_value::Value;
use serde_json::Value as Json;
use subevents_common::{AddressFormat, Event, Outcome};
use subevents_metadata::{
	filter::{BATCH_CALLS, INTERRUPT_EVENTS, OUTCOME_EVENTS, WRAPPER_CALLS},
	parser::format_address,
	spec::AddressSpec,
	value::{as_bytes, as_sequence},
	ChainQuery, Metadata, NameFilter,
};

const PROXY_CALLS: &[&str] = &["call.proxy.proxy", "call.proxy.proxy-announced"];
const MULTISIG_AS_MULTI_CALL: &str = "call.multisig.as-multi";

/// Declared types accepted for the argument each wrapper is unwrapped through.
const CALLS_TYPES: &[&str] = &["Vec<Call>", "Vec<RuntimeCall>"];
const CALL_TYPES: &[&str] = &["Call", "RuntimeCall", "Box<Call>", "Box<RuntimeCall>"];
const OPAQUE_CALL_TYPES: &[&str] = &[
	"OpaqueCall",
	"WrapperKeepOpaque<Call>",
	"WrapperKeepOpaque<RuntimeCall>",
	"Call",
	"RuntimeCall",
	"Box<Call>",
	"Box<RuntimeCall>",
];
const REAL_TYPES: &[&str] =
	&["AccountId20", "AccountId32", "AccountId", "MultiAddress", "AccountIdLookupOf", "LookupSource"];

#[derive(Debug, Clone, PartialEq)]
pub struct Extrinsic {
	/// Address of the signer, for signed extrinsics.
	pub signer: Option<String>,
	/// The decoded `RuntimeCall`.
	pub call: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	pub number: u64,
	pub extrinsics: Vec<Extrinsic>,
}

struct CallContext<'a> {
	metadata: &'a Metadata,
	filter: &'a dyn NameFilter,
	query: Option<&'a dyn ChainQuery>,
	block: u64,
	index: u32,
}

/// Render the calls of every fully applied extrinsic of `block`.
pub async fn handle_calls(
	metadata: &Metadata,
	filter: &dyn NameFilter,
	query: Option<&dyn ChainQuery>,
	block: &Block,
	records: &[EventRecord],
) -> Outcome<Event> {
	let mut outcome = Outcome::new();
	for (i, extrinsic) in block.extrinsics.iter().enumerate() {
		match extrinsic_applied(records, i) {
			Ok(true) => {}
			Ok(false) => continue,
			Err(e) => {
				outcome.error(e.details());
				continue;
			}
		}
		let Some(call) = CallInstance::from_value(&extrinsic.call) else {
			outcome.error(HandleError::Unexpected(format!("extrinsic {} does not hold a call", i)).details());
			continue;
		};
		let cx = CallContext { metadata, filter, query, block: block.number, index: i as u32 };
		outcome.merge(handle_call(&cx, call, extrinsic.signer.clone()).await);
	}
	outcome
}

/// Whether extrinsic `index` succeeded and was not interrupted.
fn extrinsic_applied(records: &[EventRecord], index: usize) -> Result<bool, HandleError> {
	let (mut success, mut failed, mut interrupted) = (0, 0, false);
	for record in records.iter().filter(|r| r.index.map(|i| i as usize) == Some(index)) {
		let name = record.name();
		if name.full == OUTCOME_EVENTS[0] {
			success += 1;
		} else if name.full == OUTCOME_EVENTS[1] {
			failed += 1;
		} else if INTERRUPT_EVENTS.contains(&name.full.as_str()) {
			interrupted = true;
		}
	}
	if success + failed != 1 {
		return Err(HandleError::IntegrityViolation {
			extrinsic_index: index,
			success_event_found: success,
			failed_event_found: failed,
		});
	}
	if failed == 1 {
		log::debug!("extrinsic {} failed, skipping", index);
		return Ok(false);
	}
	if interrupted {
		log::debug!("extrinsic {} was interrupted, skipping", index);
		return Ok(false);
	}
	Ok(true)
}

fn handle_call<'a>(
	cx: &'a CallContext<'a>,
	call: CallInstance,
	signer: Option<String>,
) -> LocalBoxFuture<'a, Outcome<Event>> {
	async move {
		match process_call(cx, call, signer).await {
			Ok(outcome) => outcome,
			Err(e) => {
				let mut outcome = Outcome::new();
				outcome.error(e.details());
				outcome
			}
		}
	}
	.boxed_local()
}

async fn process_call<'a>(
	cx: &'a CallContext<'a>,
	call: CallInstance,
	signer: Option<String>,
) -> Result<Outcome<Event>, HandleError> {
	let full = call.name.full.as_str();

	if BATCH_CALLS.contains(&full) {
		let calls = call.arg(cx.metadata, "calls", CALLS_TYPES)?;
		let items = as_sequence(calls).ok_or_else(|| not_a_call(&call, "calls"))?;
		let mut outcome = Outcome::new();
		for item in items {
			match CallInstance::from_value(item) {
				Some(inner) => outcome.merge(handle_call(cx, inner, signer.clone()).await),
				None => outcome.error(not_a_call(&call, "calls").details()),
			}
		}
		return Ok(outcome);
	}

	if WRAPPER_CALLS.contains(&full) {
		let wrapped = if full == MULTISIG_AS_MULTI_CALL {
			let value = call.arg(cx.metadata, "call", OPAQUE_CALL_TYPES)?;
			match CallInstance::from_value(value) {
				Some(inner) => inner,
				None => decode_opaque(cx, &call, value).await?,
			}
		} else {
			let value = call.arg(cx.metadata, "call", CALL_TYPES)?;
			CallInstance::from_value(value).ok_or_else(|| not_a_call(&call, "call"))?
		};
		let signer = if PROXY_CALLS.contains(&full) { Some(real_signer(cx, &call)?) } else { signer };
		return Ok(handle_call(cx, wrapped, signer).await);
	}

	if !cx.filter.matches(full) {
		return Ok(Outcome::new());
	}

	let mut event = handle_event_with(cx.metadata, cx.block, Some(cx.index), call.instance(), cx.query).await?;
	if let Some(signer) = signer {
		if let Some(existing) = event.params.raw.get("signer") {
			return Err(HandleError::SignerCollision {
				event: event.name.clone(),
				from_args: existing.clone(),
				from_handling: signer,
			});
		}
		event.params.raw.insert("signer".to_string(), Json::String(signer.clone()));
		event.params.human.insert("signer".to_string(), Json::String(signer));
	}
	let mut outcome = Outcome::new();
	outcome.push(event);
	Ok(outcome)
}

fn not_a_call(call: &CallInstance, arg: &str) -> HandleError {
	HandleError::Unexpected(format!("argument {} of {} does not hold a call", arg, call.name.short))
}

/// Re-decode the call a multisig carries as encoded bytes.
async fn decode_opaque(cx: &CallContext<'_>, call: &CallInstance, value: &Value) -> Result<CallInstance, HandleError> {
	let bytes = as_bytes(value).ok_or_else(|| not_a_call(call, "call"))?;
	let query = cx.query.ok_or_else(|| HandleError::Unexpected("no chain access to decode an opaque call".into()))?;
	let decoded = query
		.decode_call(&bytes)
		.await
		.map_err(|e| HandleError::Unexpected(format!("{} of {}", e, call.name.short)))?;
	CallInstance::from_value(&decoded).ok_or_else(|| not_a_call(call, "call"))
}

/// The account a proxy call acts for.
fn real_signer(cx: &CallContext<'_>, call: &CallInstance) -> Result<String, HandleError> {
	let real = call.arg(cx.metadata, "real", REAL_TYPES)?;
	let chain = &cx.metadata.about().chain;
	let format = match chain.address_format {
		AddressFormat::Substrate => AddressSpec::Substrate { ss58_prefix: chain.ss58_prefix() },
		AddressFormat::Evm => AddressSpec::Evm,
	};
	format_address(real, format)
		.ok_or_else(|| HandleError::Unexpected(format!("argument real of {} is not an account", call.name.short)))
}
