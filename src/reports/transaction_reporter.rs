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
use crate::reports::table::Table;
use crate::store::transaction::Transaction;
use crate::util::amount::{format_money, format_quantity};

/// Lists transactions in the order given; callers pass them newest first.
pub struct TransactionReporter {
	transactions: Vec<Transaction>,
	precision: usize,
}

impl TransactionReporter {
	pub fn new(transactions: Vec<Transaction>, precision: usize) -> Self {
		Self {
			transactions,
			precision,
		}
	}

	pub fn render(&self) -> String {
		if self.transactions.is_empty() {
			return "No transactions\n".to_string();
		}

		let mut table = Table::new(8);
		table.right_align(vec![0, 5, 6, 7]);
		table.add_header(vec![
			"ID", "Date", "Type", "Asset", "Class", "Qty", "Price", "Amount",
		]);
		table.add_separator();

		for t in &self.transactions {
			let (asset, class, qty, price) = if t.kind().is_trade() {
				(
					t.asset_name().unwrap_or_default().to_string(),
					t.asset_type().map(|a| a.to_string()).unwrap_or_default(),
					format_quantity(t.quantity()),
					format_money(t.price(), self.precision),
				)
			} else {
				Default::default()
			};

			table.add_row(vec![
				t.id.clone(),
				t.date().to_string(),
				t.kind().to_string(),
				asset,
				class,
				qty,
				price,
				format_money(t.total_amount(), self.precision),
			]);
		}

		table.render()
	}

	pub fn print(&self) {
		println!();
		print!("{}", self.render());
	}
}
