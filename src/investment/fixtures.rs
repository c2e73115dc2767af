/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
//! Transaction builders shared by the accounting tests.

use crate::store::transaction::{
	AssetType, Transaction, TransactionInput, TransactionType,
};
use crate::util::date::Date;

pub fn date(s: &str) -> Date {
	Date::from_str(s).unwrap()
}

pub fn buy(id: &str, on: &str, asset: &str, quantity: f64, price: f64) -> Transaction {
	trade(id, on, TransactionType::Buy, asset, AssetType::Stock, quantity, price)
}

pub fn sell(id: &str, on: &str, asset: &str, quantity: f64, price: f64) -> Transaction {
	trade(id, on, TransactionType::Sell, asset, AssetType::Stock, quantity, price)
}

pub fn trade(
	id: &str,
	on: &str,
	kind: TransactionType,
	asset: &str,
	asset_type: AssetType,
	quantity: f64,
	price: f64,
) -> Transaction {
	Transaction::new(
		id.to_string(),
		TransactionInput::trade(date(on), kind, asset, asset_type, quantity, price),
	)
}

pub fn deposit(id: &str, on: &str, amount: f64) -> Transaction {
	Transaction::new(
		id.to_string(),
		TransactionInput::cash(date(on), TransactionType::Deposit, amount),
	)
}

pub fn withdrawal(id: &str, on: &str, amount: f64) -> Transaction {
	Transaction::new(
		id.to_string(),
		TransactionInput::cash(date(on), TransactionType::Withdrawal, amount),
	)
}

pub fn assert_close(actual: f64, expected: f64) {
	assert!(
		(actual - expected).abs() < 1e-6,
		"expected {}, got {}",
		expected,
		actual
	);
}
