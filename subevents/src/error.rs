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

use serde_json::Value as Json;
use subevents_common::ErrorDetails;
use subevents_metadata::MetadataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Codec(#[from] codec::Error),
	#[error(transparent)]
	MetadataError(#[from] MetadataError),
	#[error("Spec Version {0} not registered with decoder")]
	SpecVersionNotFound(u32),
}

/// Failure to handle one event, one call or one extrinsic. These never stop a block;
/// they are recorded in the outcome through [`HandleError::details`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandleError {
	#[error("unknown event")]
	UnknownEvent { event: String },
	#[error("event args count does not match its metadata")]
	ArgCountMismatch { event: String, expected: usize, received: usize },
	#[error("argument not found in call")]
	ArgNotFound { call: String, arg: String },
	#[error("argument type is not as expected")]
	ArgTypeMismatch { call: String, arg: String, expected: String, received: String },
	#[error("call already has signer arg")]
	SignerCollision { event: String, from_args: Json, from_handling: String },
	#[error("integrity violation when checking extrinsic against success-failed events")]
	IntegrityViolation { extrinsic_index: usize, success_event_found: usize, failed_event_found: usize },
	#[error("unexpected error")]
	Unexpected(String),
}

impl HandleError {
	pub fn details(&self) -> ErrorDetails {
		let details = ErrorDetails::new(self.to_string());
		match self {
			HandleError::UnknownEvent { event } => details.with("event", event.as_str()),
			HandleError::ArgCountMismatch { event, expected, received } => {
				details.with("event", event.as_str()).with("expected", *expected).with("received", *received)
			}
			HandleError::ArgNotFound { call, arg } => details.with("call", call.as_str()).with("arg", arg.as_str()),
			HandleError::ArgTypeMismatch { call, arg, expected, received } => details
				.with("call", call.as_str())
				.with("arg", arg.as_str())
				.with("expected", expected.as_str())
				.with("received", received.as_str()),
			HandleError::SignerCollision { event, from_args, from_handling } => details
				.with("event", event.as_str())
				.with("fromArgs", from_args.clone())
				.with("fromHandling", from_handling.as_str()),
			HandleError::IntegrityViolation { extrinsic_index, success_event_found, failed_event_found } => details
				.with("extrinsicIndex", *extrinsic_index)
				.with("successEventFound", *success_event_found)
				.with("failedEventFound", *failed_event_found),
			HandleError::Unexpected(err) => details.with("err", err.as_str()),
		}
	}
}
