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

//! Build a catalog of Substrate events and calls from runtime metadata, and render
//! decoded values of them in raw and human form.
//!
//! See [`Metadata`] for building the catalog and [`parser::parse`] for rendering.

#![forbid(unsafe_code)]

pub mod automagic;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod descriptor;
pub mod filter;
pub mod mapper;
pub mod parser;
pub mod query;
pub mod registry;
pub mod source;
pub mod spec;
pub mod unknowns;
pub mod value;

pub use catalog::{EventArgument, EventSpec, Metadata, MetadataError};
pub use config::{ConfigError, TypeMappingConfig};
pub use currency::{CurrencyInfo, CurrencyRegistry};
pub use filter::{MatchAll, NameFilter, PatternFilter};
pub use mapper::{Binding, Handler};
pub use parser::{Parser, ParserContext};
pub use query::{ChainQuery, QueryError};
pub use registry::{LookupTable, TypeRegistry, TypeRegistryOptions};
pub use spec::Spec;
pub use unknowns::Unknowns;

/// A re-export of the [`scale_value`] crate, whose values every parser consumes.
pub use scale_value;
