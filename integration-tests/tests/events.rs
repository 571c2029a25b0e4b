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

use crate::runtime::{self, account, address, event, tokens, CurrencyId, RuntimeEvent, TokenSymbol, SPEC_VERSION};
use serde_json::json;
use subevents::EventRecord;

fn kusd_transfer(amount: u128) -> RuntimeEvent {
	RuntimeEvent::Tokens(tokens::Event::Transfer {
		currency_id: CurrencyId::Token(TokenSymbol::KUSD),
		from: account(1),
		to: account(2),
		amount,
	})
}

#[test]
fn should_scale_balance_by_sibling_currency() {
	let decoder = runtime::decoder(&[]);
	let records = [event(kusd_transfer(1_500_000), Some(1))];
	let outcome = decoder.decode_events(SPEC_VERSION, 42, &records).unwrap();
	assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
	assert_eq!(outcome.items.len(), 1);

	let decoded = &outcome.items[0];
	assert_eq!(decoded.name, "event.tokens.transfer");
	assert_eq!(decoded.payload.block, 42);
	assert_eq!(decoded.payload.index, Some(1));
	assert_eq!(decoded.params.raw["amount"], json!(1.5));
	assert_eq!(decoded.params.human["amount"], json!("1.5 KUSD"));
	assert_eq!(decoded.params.human["currency_id"], json!("KUSD"));
	assert_eq!(decoded.params.raw["from"], json!(address(1)));
}

#[test]
fn should_only_decode_filtered_events() {
	let decoder = runtime::decoder(&["event.balances.*"]);
	let records = [event(kusd_transfer(10), Some(0)), runtime::success(0)];
	let outcome = decoder.decode_events(SPEC_VERSION, 1, &records).unwrap();
	assert!(outcome.items.is_empty());
	assert!(outcome.errors.is_empty());
}

#[test]
fn should_report_unknown_events_without_stopping() {
	let decoder = runtime::decoder(&[]);
	let records = [
		EventRecord::new("Treasury", "Deposit", vec![], Some(0)),
		event(kusd_transfer(2_000_000), Some(0)),
	];
	let outcome = decoder.decode_events(SPEC_VERSION, 1, &records).unwrap();
	assert_eq!(outcome.items.len(), 1);
	assert_eq!(outcome.errors.len(), 1);
	assert_eq!(outcome.errors[0].message, "unknown event");
	assert_eq!(outcome.errors[0].details["event"], json!("event.treasury.deposit"));
}
