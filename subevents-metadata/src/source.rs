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

//! What the catalog needs to know about a runtime: its pallets and their variants.

use crate::{catalog::MetadataError, descriptor::DescriptorSource};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
	pub name: Option<String>,
	pub ty: u32,
	/// Type as written in the pallet, e.g. `T::Balance`.
	pub type_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantInfo {
	pub name: String,
	pub fields: Vec<FieldInfo>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalletInfo {
	pub name: String,
	pub events: Vec<VariantInfo>,
	pub calls: Vec<VariantInfo>,
}

pub trait RuntimeSource: DescriptorSource {
	fn pallets(&self) -> Result<Vec<PalletInfo>, MetadataError>;

	/// Upcast, for handing the source to the type registry.
	fn as_descriptor_source(&self) -> &dyn DescriptorSource;
}
