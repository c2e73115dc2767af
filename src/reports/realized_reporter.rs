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
use crate::investment::sale::Sale;
use crate::reports::table::Table;
use crate::util::amount::{format_money, format_quantity};

pub struct RealizedReporter {
	sales: Vec<Sale>,
	precision: usize,
}

impl RealizedReporter {
	pub fn new(sales: Vec<Sale>, precision: usize) -> Self {
		Self { sales, precision }
	}

	pub fn render(&self) -> String {
		if self.sales.is_empty() {
			return "No sales\n".to_string();
		}

		let mut table = Table::new(9);
		table.right_align(vec![0, 4, 5, 6, 7, 8]);
		table.add_header(vec![
			"ID", "Date", "Asset", "Class", "Qty", "Price", "Cost", "Proceeds",
			"G/L",
		]);
		table.add_separator();

		let mut total = 0.0;
		for s in &self.sales {
			table.add_row(vec![
				s.id.clone(),
				s.sale_date.to_string(),
				s.asset_name.clone(),
				s.asset_type.to_string(),
				format_quantity(s.quantity_sold),
				format_money(s.sale_price, self.precision),
				format_money(s.cost_basis, self.precision),
				format_money(s.sale_value, self.precision),
				format_money(s.profit_or_loss, self.precision),
			]);
			total += s.profit_or_loss;
		}

		table.add_partial_separator(vec![8]);
		let mut totals = vec![String::new(); 8];
		totals.push(format_money(total, self.precision));
		table.add_row(totals);

		table.render()
	}

	pub fn print(&self) {
		println!();
		print!("{}", self.render());
	}
}
