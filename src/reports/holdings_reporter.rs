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
use crate::investment::valuation::Valuation;
use crate::reports::table::Table;
use crate::util::amount::{format_money, format_percent, format_quantity, safe_div};

/// Reports on current holdings marked to market: positions with their
/// prices, or unrealized gains against the remaining cost basis.
pub struct HoldingsReporter {
	valuations: Vec<Valuation>,
	precision: usize,
}

impl HoldingsReporter {
	pub fn new(valuations: Vec<Valuation>, precision: usize) -> Self {
		Self {
			valuations,
			precision,
		}
	}

	/// The quantity column is labelled with the class unit when every row
	/// shares a class.
	fn quantity_label(&self) -> &'static str {
		let mut types = self.valuations.iter().map(|v| v.asset_type);
		match types.next() {
			Some(first) if types.all(|t| t == first) => first.unit_label(),
			_ => "Qty",
		}
	}

	pub fn render_positions(&self) -> String {
		if self.valuations.is_empty() {
			return "No current holdings\n".to_string();
		}

		let mut table = Table::new(7);
		table.right_align(vec![2, 3, 4, 5, 6]);
		table.add_header(vec![
			"Asset",
			"Class",
			self.quantity_label(),
			"Avg Cost",
			"Price",
			"Value",
			"Day Chg",
		]);
		table.add_separator();

		let mut total_value = 0.0;
		let mut total_day = 0.0;
		let mut any_unquoted = false;

		for v in &self.valuations {
			let mut price = format_money(v.price, self.precision);
			if !v.is_quoted {
				price.push('*');
				any_unquoted = true;
			}

			table.add_row(vec![
				v.asset_name.clone(),
				v.asset_type.to_string(),
				format_quantity(v.quantity),
				format_money(v.average_cost, self.precision),
				price,
				format_money(v.current_value(), self.precision),
				format_money(v.day_pl(), self.precision),
			]);

			total_value += v.current_value();
			total_day += v.day_pl();
		}

		table.add_partial_separator(vec![5, 6]);
		let mut totals = vec![String::new(); 5];
		totals.push(format_money(total_value, self.precision));
		totals.push(format_money(total_day, self.precision));
		table.add_row(totals);

		let mut out = table.render();
		if any_unquoted {
			out.push_str("* no quote available, valued at average cost\n");
		}
		out
	}

	pub fn print_positions(&self) {
		println!();
		print!("{}", self.render_positions());
	}

	pub fn print_unrealized(&self) {
		println!();
		print!("{}", self.render_unrealized());
	}

	pub fn render_unrealized(&self) -> String {
		if self.valuations.is_empty() {
			return "No current holdings\n".to_string();
		}

		let mut table = Table::new(6);
		table.right_align(vec![2, 3, 4, 5]);
		table.add_header(vec![
			"Asset", "Class", "Invested", "Current", "UG/L", "UG/L %",
		]);
		table.add_separator();

		let mut invested = 0.0;
		let mut current = 0.0;

		for v in &self.valuations {
			table.add_row(vec![
				v.asset_name.clone(),
				v.asset_type.to_string(),
				format_money(v.invested, self.precision),
				format_money(v.current_value(), self.precision),
				format_money(v.unrealized_pl(), self.precision),
				format_percent(v.unrealized_percent()),
			]);
			invested += v.invested;
			current += v.current_value();
		}

		table.add_partial_separator(vec![2, 3, 4, 5]);
		table.add_row(vec![
			String::new(),
			String::new(),
			format_money(invested, self.precision),
			format_money(current, self.precision),
			format_money(current - invested, self.precision),
			format_percent(safe_div(current - invested, invested) * 100.0),
		]);

		table.render()
	}
}
