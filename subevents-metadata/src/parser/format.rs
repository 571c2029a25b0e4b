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

use crate::{spec::AddressSpec, value};
use scale_value::{Composite, Value, ValueDef};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};

/// Significant fractional digits kept by [`format_balance`].
const BALANCE_PRECISION: u32 = 4;

/// `amount / 10^decimals` as a float.
pub fn scale_balance(amount: u128, decimals: u32) -> f64 {
	amount as f64 / 10f64.powi(decimals as i32)
}

/// Exact decimal form of `amount / 10^decimals`, without trailing zeros.
fn decimal_string(amount: u128, decimals: u32) -> Option<String> {
	let unit = 10u128.checked_pow(decimals)?;
	let (int, frac) = (amount / unit, amount % unit);
	if frac == 0 {
		return Some(int.to_string());
	}
	let frac = format!("{:0width$}", frac, width = decimals as usize);
	Some(format!("{}.{}", int, frac.trim_end_matches('0')))
}

/// `amount / 10^decimals` rounded half up to `precision` fractional digits.
fn to_fixed(amount: u128, decimals: u32, precision: u32) -> Option<String> {
	let rounded = if precision >= decimals {
		amount.checked_mul(10u128.checked_pow(precision - decimals)?)?
	} else {
		let divisor = 10u128.checked_pow(decimals - precision)?;
		let (q, r) = (amount / divisor, amount % divisor);
		if r >= divisor - r {
			q + 1
		} else {
			q
		}
	};
	if precision == 0 {
		return Some(rounded.to_string());
	}
	let unit = 10u128.checked_pow(precision)?;
	Some(format!("{}.{:0width$}", rounded / unit, rounded % unit, width = precision as usize))
}

/// Human form of a balance: `1.5 KAR`, `1.2346 KAR`, `0.00000042 KAR`.
///
/// The fraction keeps at most four significant digits, never more than the currency's
/// decimals, rounded half up and without trailing zeros.
pub fn format_balance(amount: u128, decimals: u32, symbol: &str) -> String {
	let Some(exact) = decimal_string(amount, decimals) else {
		return format!("{} {}", amount, symbol);
	};
	let formatted = match exact.split_once('.') {
		Some((_, fraction)) => {
			let first_significant = fraction.find(|c| c != '0').unwrap_or(fraction.len()) as u32;
			let precision = (first_significant + BALANCE_PRECISION).min(decimals);
			match to_fixed(amount, decimals, precision) {
				Some(fixed) if fixed.contains('.') => fixed.trim_end_matches('0').trim_end_matches('.').to_string(),
				Some(fixed) => fixed,
				None => exact,
			}
		}
		None => exact,
	};
	format!("{} {}", formatted, symbol)
}

/// `0x12345...abcde`: first seven and last five characters.
pub fn short_hash(hex: &str) -> String {
	if hex.len() <= 12 || !hex.is_ascii() {
		return hex.to_string();
	}
	format!("{}...{}", &hex[..7], &hex[hex.len() - 5..])
}

/// A millisecond timestamp as `YYYY-MM-DD HH:MM:SS (UTC+0)`.
pub fn format_moment(ms: u128) -> String {
	let secs = (ms / 1000) as i64;
	let (days, rem) = (secs.div_euclid(86_400), secs.rem_euclid(86_400));
	let (year, month, day) = civil_from_days(days);
	format!(
		"{:04}-{:02}-{:02} {:02}:{:02}:{:02} (UTC+0)",
		year,
		month,
		day,
		rem / 3600,
		rem % 3600 / 60,
		rem % 60
	)
}

// Days since the unix epoch to a proleptic gregorian date.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
	let z = days + 719_468;
	let era = z.div_euclid(146_097);
	let doe = z - era * 146_097;
	let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let day = doy - (153 * mp + 2) / 5 + 1;
	let month = if mp < 10 { mp + 3 } else { mp - 9 };
	let year = yoe + era * 400 + i64::from(month <= 2);
	(year, month, day)
}

fn ss58(bytes: [u8; 32], prefix: u16) -> String {
	AccountId32::new(bytes).to_ss58check_with_version(Ss58AddressFormat::custom(prefix))
}

fn evm(bytes: &[u8]) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Address string of an account identifier.
///
/// Understands bare 32 and 20 byte accounts, `MultiAddress` variants and accounts that are
/// already strings. `None` when the value does not look like an account of `format`.
pub fn format_address(value: &Value, format: AddressSpec) -> Option<String> {
	if let ValueDef::Variant(variant) = &value.value {
		let inner = match &variant.values {
			Composite::Unnamed(values) if values.len() == 1 => &values[0],
			_ => return None,
		};
		return match variant.name.as_str() {
			"Id" => format_address(inner, format),
			"Address32" => {
				let bytes: [u8; 32] = value::as_bytes(inner)?.try_into().ok()?;
				Some(ss58(bytes, substrate_prefix(format)))
			}
			"Address20" => Some(evm(&value::as_bytes(inner)?)),
			"Index" => value::as_u128(inner).map(|i| i.to_string()),
			"Raw" => Some(evm(&value::as_bytes(inner)?)),
			_ => None,
		};
	}
	if let Some(s) = value::as_str(value) {
		return Some(s.to_string());
	}
	let bytes = value::as_bytes(value)?;
	match (format, bytes.len()) {
		(AddressSpec::Substrate { ss58_prefix }, 32) => {
			let bytes: [u8; 32] = bytes.try_into().ok()?;
			Some(ss58(bytes, ss58_prefix))
		}
		(_, 20) => Some(evm(&bytes)),
		_ => None,
	}
}

fn substrate_prefix(format: AddressSpec) -> u16 {
	match format {
		AddressSpec::Substrate { ss58_prefix } => ss58_prefix,
		AddressSpec::Evm => 42,
	}
}
