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

//! Which events and calls are decoded.

use regex::Regex;

/// Calls that only carry other calls.
pub const BATCH_CALLS: &[&str] = &["call.utility.batch", "call.utility.batch-all", "call.utility.force-batch"];

/// Calls that wrap exactly one other call.
pub const WRAPPER_CALLS: &[&str] = &[
	"call.proxy.proxy",
	"call.proxy.proxy-announced",
	"call.utility.as-derivative",
	"call.multisig.as-multi-threshold-1",
	"call.multisig.as-multi",
];

/// Events closing an extrinsic; exactly one of them is expected per extrinsic.
pub const OUTCOME_EVENTS: &[&str] = &["event.system.extrinsic-success", "event.system.extrinsic-failed"];

/// Events signalling that an extrinsic was only partially applied.
pub const INTERRUPT_EVENTS: &[&str] =
	&["event.utility.batch-interrupted", "event.utility.batch-completed-with-errors", "event.utility.item-failed"];

/// Whether the flattening of calls depends on the entry with this full name.
pub fn is_structural(full: &str) -> bool {
	[BATCH_CALLS, WRAPPER_CALLS, OUTCOME_EVENTS, INTERRUPT_EVENTS].iter().any(|names| names.contains(&full))
}

pub trait NameFilter {
	fn matches(&self, full: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl NameFilter for MatchAll {
	fn matches(&self, _full: &str) -> bool {
		true
	}
}

/// Glob patterns over full names, e.g. `event.balances.*` or `call.utility.batch?all`.
///
/// `*` matches any run of characters and `?` a single one. No patterns match everything.
#[derive(Debug, Clone, Default)]
pub struct PatternFilter {
	patterns: Vec<Regex>,
}

impl PatternFilter {
	pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, regex::Error> {
		let patterns = globs.iter().map(|glob| Regex::new(&glob_to_regex(glob.as_ref()))).collect::<Result<_, _>>()?;
		Ok(Self { patterns })
	}
}

impl NameFilter for PatternFilter {
	fn matches(&self, full: &str) -> bool {
		self.patterns.is_empty() || self.patterns.iter().any(|re| re.is_match(full))
	}
}

fn glob_to_regex(glob: &str) -> String {
	let mut re = String::from("^");
	for c in glob.chars() {
		match c {
			'*' => re.push_str(".*"),
			'?' => re.push('.'),
			c => re.push_str(&regex::escape(&c.to_string())),
		}
	}
	re.push('$');
	re
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_filter_matches_everything() {
		let filter = PatternFilter::new::<&str>(&[]).unwrap();
		assert!(filter.matches("event.balances.transfer"));
		assert!(MatchAll.matches("call.system.remark"));
	}

	#[test]
	fn should_match_globs() {
		let filter = PatternFilter::new(&["event.balances.*", "call.system.remark?with?event"]).unwrap();
		assert!(filter.matches("event.balances.transfer"));
		assert!(filter.matches("call.system.remark-with-event"));
		assert!(!filter.matches("call.balances.transfer"));
		assert!(!filter.matches("event.balances"));
		assert!(!filter.matches("xevent.balances.transfer"));
	}

	#[test]
	fn should_know_structural_names() {
		assert!(is_structural("call.utility.batch-all"));
		assert!(is_structural("event.system.extrinsic-failed"));
		assert!(!is_structural("call.balances.transfer"));
	}
}
