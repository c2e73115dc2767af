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
use crate::investment::holding::Holding;
use crate::investment::sale::Sale;
use crate::investment::valuation::value_holdings;
use crate::pricing::PriceSource;
use crate::store::transaction::{Transaction, TransactionType};
use crate::util::amount::safe_div;

/// Portfolio-level figures for the dashboard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortfolioSummary {
	/// Market value of current holdings
	pub total_value: f64,
	pub day_pl: f64,

	/// Unrealized plus realized
	pub total_pl: f64,
	pub unrealized_pl: f64,
	pub realized_pl: f64,

	pub total_deposits: f64,
	pub total_withdrawals: f64,

	/// Every buy ever made; sales do not reduce it
	pub total_invested: f64,
	pub total_sell_proceeds: f64,

	/// Deposits plus sale proceeds, less buys and withdrawals
	pub available_cash: f64,
}

impl PortfolioSummary {
	/// Day P/L relative to yesterday's value, in percent.
	pub fn day_pl_percent(&self) -> f64 {
		safe_div(self.day_pl, self.total_value - self.day_pl) * 100.0
	}

	/// Total P/L relative to the value net of that P/L, in percent.
	pub fn total_pl_percent(&self) -> f64 {
		safe_div(self.total_pl, self.total_value - self.total_pl) * 100.0
	}
}

/// Combines valuations of the current holdings, the realized history and
/// the raw cash flows of the log. `holdings` must already be limited to
/// current positions; `realized` covers every sale ever made.
pub fn summarize(
	transactions: &[Transaction],
	holdings: &[&Holding],
	realized: &[Sale],
	prices: &dyn PriceSource,
) -> PortfolioSummary {
	let mut summary = PortfolioSummary::default();

	let mut remaining_cost_basis = 0.0;
	for v in value_holdings(holdings, prices) {
		summary.total_value += v.current_value();
		summary.day_pl += v.day_pl();
		remaining_cost_basis += v.invested;
	}

	summary.unrealized_pl = summary.total_value - remaining_cost_basis;
	summary.realized_pl = realized.iter().map(|s| s.profit_or_loss).sum();
	summary.total_pl = summary.unrealized_pl + summary.realized_pl;

	for t in transactions {
		let amount = t.total_amount();
		match t.kind() {
			TransactionType::Deposit => summary.total_deposits += amount,
			TransactionType::Withdrawal => summary.total_withdrawals += amount,
			TransactionType::Buy => summary.total_invested += amount,
			TransactionType::Sell => summary.total_sell_proceeds += amount,
		}
	}

	summary.available_cash = summary.total_deposits + summary.total_sell_proceeds
		- summary.total_invested
		- summary.total_withdrawals;

	summary
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::investment::fixtures::*;
	use crate::investment::holding::{HoldingFilter, Holdings};
	use crate::investment::sale::realized_pl;
	use crate::pricing::{AssetKey, Quote, QuoteResult};

	struct Fixed(f64, f64);

	impl PriceSource for Fixed {
		fn quote(&self, _key: &AssetKey) -> QuoteResult {
			Ok(Quote {
				price: self.0,
				day_change: Some(self.1),
			})
		}
	}

	fn summarize_log(transactions: &[Transaction], prices: &dyn PriceSource) -> PortfolioSummary {
		let holdings = Holdings::aggregate(transactions);
		let current = holdings.select(vec![HoldingFilter::Current]);
		let realized = realized_pl(transactions);
		summarize(transactions, &current, &realized, prices)
	}

	#[test]
	fn test_available_cash() {
		let transactions = vec![
			deposit("1", "2024-01-01", 100_000.0),
			buy("2", "2024-01-02", "A", 10.0, 300.5),
		];
		let summary = summarize_log(&transactions, &Fixed(300.5, 0.0));
		assert_close(summary.available_cash, 96_995.0);
		assert_close(summary.total_invested, 3_005.0);
		assert_close(summary.total_deposits, 100_000.0);
	}

	#[test]
	fn test_total_pl_is_unrealized_plus_realized() {
		let transactions = vec![
			deposit("1", "2024-01-01", 1_000.0),
			buy("2", "2024-01-02", "X", 10.0, 10.0),
			buy("3", "2024-01-03", "X", 10.0, 20.0),
			sell("4", "2024-02-01", "X", 15.0, 20.0),
			// fully closed position must not count twice
			buy("5", "2024-01-02", "Y", 5.0, 10.0),
			sell("6", "2024-01-05", "Y", 5.0, 14.0),
			withdrawal("7", "2024-03-01", 100.0),
		];
		let summary = summarize_log(&transactions, &Fixed(30.0, 2.0));

		// X: 5 left worth 150 against a prorated basis of 75
		assert_close(summary.total_value, 150.0);
		assert_close(summary.day_pl, 10.0);
		assert_close(summary.unrealized_pl, 75.0);

		// X: 300 - 200 FIFO; Y: 70 - 50
		assert_close(summary.realized_pl, 120.0);
		assert_close(summary.total_pl, summary.unrealized_pl + summary.realized_pl);

		assert_close(summary.total_invested, 350.0);
		assert_close(summary.total_sell_proceeds, 370.0);
		assert_close(summary.total_withdrawals, 100.0);
		assert_close(summary.available_cash, 1_000.0 + 370.0 - 350.0 - 100.0);
	}

	#[test]
	fn test_dust_does_not_contribute_value() {
		let transactions = vec![
			buy("1", "2024-01-01", "X", 1.0 + 1e-10, 10.0),
			sell("2", "2024-01-02", "X", 1.0, 10.0),
		];
		let summary = summarize_log(&transactions, &Fixed(1_000_000.0, 5.0));
		assert_eq!(summary.total_value, 0.0);
		assert_eq!(summary.day_pl, 0.0);
	}

	#[test]
	fn test_repeatable() {
		let transactions = vec![
			deposit("1", "2024-01-01", 500.0),
			buy("2", "2024-01-02", "X", 3.0, 100.0),
		];
		let prices = Fixed(110.0, -1.0);
		assert_eq!(
			summarize_log(&transactions, &prices),
			summarize_log(&transactions, &prices)
		);
	}

	#[test]
	fn test_percentages() {
		let summary = PortfolioSummary {
			total_value: 110.0,
			day_pl: 10.0,
			total_pl: 10.0,
			..Default::default()
		};
		assert_close(summary.day_pl_percent(), 10.0);
		assert_close(summary.total_pl_percent(), 10.0);

		let empty = PortfolioSummary::default();
		assert_eq!(empty.day_pl_percent(), 0.0);
		assert_eq!(empty.total_pl_percent(), 0.0);
	}
}
