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

//! Argument names and summaries taken from variant documentation.

use heck::ToSnakeCase;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
	/// Tried in order; the first one that matches anything wins.
	static ref DOCS_ARGS: [Regex; 3] = [
		Regex::new(r"\\\[(.+?)\\\]").expect("valid regex"),
		Regex::new(r"`\[(.+?)\]`").expect("valid regex"),
		Regex::new(r"`(.+?)`").expect("valid regex"),
	];
}

/// Argument names listed in docs such as ``Transfer succeeded. \[from, to, value\]``.
pub fn arg_names(docs: &str) -> Vec<String> {
	let docs = docs.trim();
	for re in DOCS_ARGS.iter() {
		let names: Vec<String> = re
			.captures_iter(docs)
			.flat_map(|caps| caps[1].split(',').map(|name| name.trim().to_snake_case()).collect::<Vec<_>>())
			.collect();
		if !names.is_empty() {
			return names;
		}
	}
	Vec::new()
}

/// First paragraph of the docs, up to and including the `.` that closes it.
pub fn summary(docs: &str) -> String {
	let docs = docs.trim();
	match docs.find(".\n") {
		Some(end) => docs[..=end].to_string(),
		None => docs.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn should_read_escaped_brackets_first() {
		let docs = "Some amount was deposited (e.g. for transaction fees). \\[who, deposit\\]";
		assert_eq!(arg_names(docs), vec!["who", "deposit"]);
	}

	#[test]
	fn should_fall_back_to_backticks() {
		assert_eq!(arg_names("An account was created `[AccountId, Balance]`."), vec!["account_id", "balance"]);
		assert_eq!(arg_names("Killed `who` and `reaped`."), vec!["who", "reaped"]);
		assert!(arg_names("Nothing to see here.").is_empty());
	}

	#[test]
	fn should_keep_first_paragraph() {
		assert_eq!(summary("  Transfer succeeded.\nMore details.\n"), "Transfer succeeded.");
		assert_eq!(summary("No paragraph break."), "No paragraph break.");
	}
}
