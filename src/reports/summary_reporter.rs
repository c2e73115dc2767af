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
use crate::investment::allocation::Allocation;
use crate::investment::summary::PortfolioSummary;
use crate::reports::table::Table;
use crate::util::amount::{format_money, format_percent};

pub struct SummaryReporter {
	precision: usize,
}

impl SummaryReporter {
	pub fn new(precision: usize) -> Self {
		Self { precision }
	}

	pub fn render_summary(&self, summary: &PortfolioSummary) -> String {
		let money = |v: f64| format_money(v, self.precision);

		let mut table = Table::new(3);
		table.right_align(vec![1, 2]);

		table.add_row(vec![
			"Total value".to_string(),
			money(summary.total_value),
			String::new(),
		]);
		table.add_row(vec![
			"Day P/L".to_string(),
			money(summary.day_pl),
			format_percent(summary.day_pl_percent()),
		]);
		table.add_row(vec![
			"Total P/L".to_string(),
			money(summary.total_pl),
			format_percent(summary.total_pl_percent()),
		]);
		table.add_row(vec![
			"  Unrealized".to_string(),
			money(summary.unrealized_pl),
			String::new(),
		]);
		table.add_row(vec![
			"  Realized".to_string(),
			money(summary.realized_pl),
			String::new(),
		]);
		table.add_row(vec![String::new(); 3]);

		let flows = [
			("Deposits", summary.total_deposits),
			("Withdrawals", summary.total_withdrawals),
			("Invested", summary.total_invested),
			("Sale proceeds", summary.total_sell_proceeds),
			("Available cash", summary.available_cash),
		];
		for (label, value) in flows {
			table.add_row(vec![label.to_string(), money(value), String::new()]);
		}

		table.render()
	}

	pub fn print_summary(&self, summary: &PortfolioSummary) {
		println!();
		print!("{}", self.render_summary(summary));
	}

	pub fn print_allocation(&self, allocation: &Allocation) {
		println!();
		print!("{}", self.render_allocation(allocation));
	}

	pub fn render_allocation(&self, allocation: &Allocation) -> String {
		if allocation.is_empty() {
			return "No current holdings\n".to_string();
		}

		let mut table = Table::new(3);
		table.right_align(vec![1, 2]);
		table.add_header(vec!["Class", "Value", "Share"]);
		table.add_separator();

		for (asset_type, value) in allocation.iter() {
			table.add_row(vec![
				asset_type.to_string(),
				format_money(value, self.precision),
				format_percent(allocation.share_of(asset_type)),
			]);
		}

		table.add_partial_separator(vec![1]);
		table.add_row(vec![
			String::new(),
			format_money(allocation.total(), self.precision),
			String::new(),
		]);

		table.render()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::investment::valuation::Valuation;
	use crate::store::transaction::AssetType;

	#[test]
	fn test_summary() {
		let summary = PortfolioSummary {
			total_value: 1100.0,
			day_pl: 100.0,
			total_pl: 100.0,
			unrealized_pl: 60.0,
			realized_pl: 40.0,
			total_deposits: 2000.0,
			total_withdrawals: 0.0,
			total_invested: 1200.0,
			total_sell_proceeds: 240.0,
			available_cash: 1040.0,
		};
		let expected = concat!(
			"Total value      1,100.00\n",
			"Day P/L            100.00   10.00%\n",
			"Total P/L          100.00   10.00%\n",
			"  Unrealized        60.00\n",
			"  Realized          40.00\n",
			"\n",
			"Deposits         2,000.00\n",
			"Withdrawals          0.00\n",
			"Invested         1,200.00\n",
			"Sale proceeds      240.00\n",
			"Available cash   1,040.00\n",
		);
		assert_eq!(SummaryReporter::new(2).render_summary(&summary), expected);
	}

	#[test]
	fn test_allocation() {
		let valuation = |name: &str, asset_type, value| Valuation {
			asset_name: name.to_string(),
			asset_type,
			quantity: 1.0,
			average_cost: value,
			invested: value,
			price: value,
			day_change: 0.0,
			is_quoted: true,
		};
		let allocation = Allocation::from_valuations(&[
			valuation("Digital Gold", AssetType::Gold, 250.0),
			valuation("Apple Inc.", AssetType::Stock, 750.0),
		]);
		let expected = concat!(
			"Class |  Value   | Share\n",
			"-------------------------\n",
			"Stock     750.00   75.00%\n",
			"Gold      250.00   25.00%\n",
			"        --------\n",
			"        1,000.00\n",
		);
		assert_eq!(SummaryReporter::new(2).render_allocation(&allocation), expected);
	}

	#[test]
	fn test_empty_allocation() {
		let allocation = Allocation::from_valuations(&[]);
		assert_eq!(
			SummaryReporter::new(2).render_allocation(&allocation),
			"No current holdings\n"
		);
	}
}
