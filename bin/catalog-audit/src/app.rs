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

use anyhow::{anyhow, Context, Error};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use subevents_common::{About, AddressFormat, BlockInfo, ChainInfo, ErrorDetails, NodeInfo};
use subevents_metadata::{CurrencyInfo, EventSpec, Metadata, PatternFilter, Spec, TypeMappingConfig, TypeRegistryOptions};

/// Build the event and call catalog of a runtime and report what it could not type.
#[derive(Parser, Debug)]
#[command(version, about)]
struct App {
	/// SCALE encoded runtime metadata, either binary or `0x` prefixed hex.
	metadata: PathBuf,
	/// JSON snapshot of the node and chain; overrides the chain options below.
	#[arg(short, long)]
	about: Option<PathBuf>,
	/// Chain name.
	#[arg(long, default_value = "Unknown")]
	chain: String,
	/// Token symbols, native token first.
	#[arg(long, value_delimiter = ',')]
	tokens: Vec<String>,
	/// Decimals of each token, in the order of `--tokens`.
	#[arg(long, value_delimiter = ',')]
	decimals: Vec<u32>,
	#[arg(long)]
	ss58_prefix: Option<u16>,
	#[arg(long)]
	evm: bool,
	/// JSON type mapping overrides.
	#[arg(short, long)]
	config: Option<PathBuf>,
	/// Keep only entries matching these globs, e.g. `event.balances.*`.
	#[arg(short, long)]
	filter: Vec<String>,
	/// Print the unknown types instead of the catalog.
	#[arg(short, long)]
	unknowns: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArgumentReport<'a> {
	name: &'a str,
	type_name: Option<&'a str>,
	comment: &'a str,
	spec: &'a Spec,
}

#[derive(Serialize)]
struct EntryReport<'a> {
	name: &'a str,
	docs: &'a str,
	args: Vec<ArgumentReport<'a>>,
}

impl<'a> From<&'a EventSpec> for EntryReport<'a> {
	fn from(entry: &'a EventSpec) -> Self {
		let args = entry
			.args
			.iter()
			.map(|arg| ArgumentReport {
				name: &arg.name,
				type_name: arg.type_name.as_deref(),
				comment: &arg.comment,
				spec: &arg.handler.spec,
			})
			.collect();
		EntryReport { name: &entry.name.full, docs: &entry.docs, args }
	}
}

#[derive(Serialize)]
struct CatalogReport<'a> {
	chain: &'a str,
	entries: Vec<EntryReport<'a>>,
	currencies: Vec<CurrencyInfo>,
	diagnostics: &'a [ErrorDetails],
}

pub fn app() -> Result<(), Error> {
	let app = App::parse();
	let about = match &app.about {
		Some(path) => serde_json::from_str(&read_text(path)?)?,
		None => about_from_args(&app),
	};
	let options = match &app.config {
		Some(path) => TypeMappingConfig::from_json(&read_text(path)?)?.into_options(),
		None => TypeRegistryOptions::default(),
	};
	let filter = PatternFilter::new(&app.filter[..])?;
	let bytes = read_metadata(&app.metadata)?;

	let now = std::time::Instant::now();
	let metadata = Metadata::from_bytes(about, &bytes, &filter, options)?;
	log::info!("Took {:?} to build {} catalog entries", now.elapsed(), metadata.events().len());

	let out = if app.unknowns {
		serde_json::to_string_pretty(metadata.unknowns())?
	} else {
		let chain = &metadata.about().chain;
		let currencies = chain
			.tokens
			.iter()
			.filter_map(|symbol| metadata.currencies().get(symbol))
			.collect();
		let report = CatalogReport {
			chain: &chain.name,
			entries: metadata.events().iter().map(EntryReport::from).collect(),
			currencies,
			diagnostics: metadata.diagnostics(),
		};
		serde_json::to_string_pretty(&report)?
	};
	println!("{}", out);
	Ok(())
}

fn about_from_args(app: &App) -> About {
	About {
		node: NodeInfo { name: "unknown".into(), version: "unknown".into() },
		block: BlockInfo { number: 0, hash: String::new() },
		chain: ChainInfo {
			name: app.chain.clone(),
			version: 0,
			address_format: if app.evm { AddressFormat::Evm } else { AddressFormat::Substrate },
			ss58_prefix: app.ss58_prefix,
			tokens: app.tokens.clone(),
			decimals: app.decimals.clone(),
		},
	}
}

fn read_text(path: &Path) -> Result<String, Error> {
	std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_metadata(path: &Path) -> Result<Vec<u8>, Error> {
	let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
	match bytes.strip_prefix(b"0x") {
		Some(hex) => {
			let text = std::str::from_utf8(hex)?.trim();
			hex::decode(text).map_err(|e| anyhow!("{} is not valid hex: {}", path.display(), e))
		}
		None => Ok(bytes),
	}
}
