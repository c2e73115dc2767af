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
use crate::investment::by_date;
use crate::store::transaction::{AssetType, Transaction, TransactionType};
use crate::util::amount::{safe_div, EPSILON};
use std::collections::BTreeMap;

/// The running position in one asset, folded from every buy and sell of it.
///
/// The cost basis here is tracked as an aggregate that shrinks in
/// proportion to each sale (average cost). Realized gains use FIFO lots
/// instead; see `sale::realized_pl`. The two can diverge slightly after
/// partial sales of lots bought at different prices.
#[derive(Clone, Debug, PartialEq)]
pub struct Holding {
	pub asset_name: String,
	pub asset_type: AssetType,

	/// Net units held; may drift to tiny or negative values, which are not
	/// a current position.
	pub quantity: f64,

	/// Total cost attributable to the units still held
	pub remaining_cost_basis: f64,

	/// Contributing buys and sells, oldest first
	pub transactions: Vec<Transaction>,
}

impl Holding {
	fn new(asset_name: &str, asset_type: AssetType) -> Self {
		Self {
			asset_name: asset_name.to_string(),
			asset_type,
			quantity: 0.0,
			remaining_cost_basis: 0.0,
			transactions: vec![],
		}
	}

	fn buy(&mut self, t: &Transaction) {
		self.quantity += t.quantity();
		self.remaining_cost_basis += t.total_amount();
		self.transactions.push(t.clone());
	}

	fn sell(&mut self, t: &Transaction) {
		let proportion = if self.quantity > 0.0 {
			t.quantity() / self.quantity
		} else {
			1.0
		};

		self.remaining_cost_basis -= self.remaining_cost_basis * proportion;
		self.quantity -= t.quantity();
		self.transactions.push(t.clone());
	}

	/// Whether this is a position worth showing: anything at or below
	/// EPSILON is treated as sold out.
	pub fn is_current(&self) -> bool {
		self.quantity > EPSILON
	}

	pub fn average_cost(&self) -> f64 {
		if self.is_current() {
			safe_div(self.remaining_cost_basis, self.quantity)
		} else {
			0.0
		}
	}
}

/// Every asset that has ever been traded, keyed by asset name.
#[derive(Debug, Default)]
pub struct Holdings {
	state: BTreeMap<String, Holding>,
}

impl Holdings {
	/// Folds the log in date order into one holding per asset. Cash
	/// transactions are ignored.
	pub fn aggregate(transactions: &[Transaction]) -> Self {
		let mut state: BTreeMap<String, Holding> = BTreeMap::new();

		for t in by_date(transactions) {
			let (Some(name), Some(asset_type)) = (t.asset_name(), t.asset_type())
			else {
				continue;
			};

			let holding = state
				.entry(name.to_string())
				.or_insert_with(|| Holding::new(name, asset_type));

			match t.kind() {
				TransactionType::Buy => holding.buy(t),
				TransactionType::Sell => holding.sell(t),
				TransactionType::Deposit | TransactionType::Withdrawal => {},
			}
		}

		Self { state }
	}

	/// Applies filters and returns matching holdings by asset name.
	pub fn select(
		&self,
		filters: impl IntoIterator<Item = HoldingFilter>,
	) -> Vec<&Holding> {
		let mut holdings_iter: Box<dyn Iterator<Item = &Holding>> =
			Box::new(self.state.values());

		for filter in filters {
			holdings_iter = match filter {
				HoldingFilter::Current => {
					Box::new(holdings_iter.filter(|h| h.is_current()))
				},
				HoldingFilter::AssetType(asset_type) => Box::new(
					holdings_iter.filter(move |h| h.asset_type == asset_type),
				),
			};
		}

		holdings_iter.collect()
	}
}

/// Pass these into the select() method to filter the output.
#[derive(Clone, Copy, Debug)]
pub enum HoldingFilter {
	Current,
	AssetType(AssetType),
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::investment::fixtures::*;
	use rand::Rng;

	#[test]
	fn test_buys_only_conserve_quantity_and_cost() {
		let mut rng = rand::rng();
		let mut transactions = vec![];
		let (mut total_qty, mut total_cost) = (0.0, 0.0);

		for i in 0..50 {
			let qty = rng.random_range(0.5..100.0);
			let price = rng.random_range(1.0..500.0);
			let t = buy(&i.to_string(), "2024-01-01", "X", qty, price);
			total_qty += qty;
			total_cost += t.total_amount();
			transactions.push(t);
		}

		let holdings = Holdings::aggregate(&transactions);
		let x = holdings.state.get("X").unwrap();
		assert_close(x.quantity, total_qty);
		assert_close(x.remaining_cost_basis, total_cost);
		assert_eq!(x.transactions.len(), 50);
	}

	#[test]
	fn test_sell_prorates_cost_basis() {
		let transactions = vec![
			buy("1", "2024-01-01", "X", 10.0, 10.0),
			buy("2", "2024-01-02", "X", 10.0, 20.0),
			sell("3", "2024-01-03", "X", 5.0, 25.0),
		];

		let holdings = Holdings::aggregate(&transactions);
		let x = holdings.state.get("X").unwrap();

		// 5 of 20 units sold: a quarter of the 300 basis goes
		assert_close(x.quantity, 15.0);
		assert_close(x.remaining_cost_basis, 225.0);
		assert_close(x.average_cost(), 15.0);
	}

	#[test]
	fn test_fold_is_by_date_not_log_order() {
		let transactions = vec![
			sell("1", "2024-03-01", "X", 5.0, 30.0),
			buy("2", "2024-01-01", "X", 10.0, 10.0),
		];

		let holdings = Holdings::aggregate(&transactions);
		let x = holdings.state.get("X").unwrap();
		assert_close(x.quantity, 5.0);
		assert_close(x.remaining_cost_basis, 50.0);
		assert_eq!(x.transactions[0].id, "2");
	}

	#[test]
	fn test_sell_without_history_is_not_current() {
		let transactions = vec![sell("1", "2024-01-01", "Ghost", 3.0, 10.0)];

		let holdings = Holdings::aggregate(&transactions);
		let ghost = holdings.state.get("Ghost").unwrap();
		assert_close(ghost.quantity, -3.0);
		assert_close(ghost.remaining_cost_basis, 0.0);
		assert!(!ghost.is_current());
		assert_eq!(ghost.average_cost(), 0.0);
		assert!(holdings.select(vec![HoldingFilter::Current]).is_empty());
	}

	#[test]
	fn test_dust_is_filtered() {
		let transactions = vec![
			buy("1", "2024-01-01", "X", 1.0 + 1e-10, 10.0),
			sell("2", "2024-01-02", "X", 1.0, 12.0),
		];

		let holdings = Holdings::aggregate(&transactions);
		assert!(holdings.state.get("X").unwrap().quantity > 0.0);
		assert!(holdings.select(vec![HoldingFilter::Current]).is_empty());
	}

	#[test]
	fn test_cash_ignored_and_filters() {
		let transactions = vec![
			deposit("1", "2024-01-01", 1000.0),
			buy("2", "2024-01-02", "Apple Inc.", 2.0, 100.0),
			trade(
				"3",
				"2024-01-02",
				TransactionType::Buy,
				"Digital Gold",
				AssetType::Gold,
				10.0,
				60.0,
			),
			withdrawal("4", "2024-01-03", 50.0),
		];

		let holdings = Holdings::aggregate(&transactions);
		assert_eq!(holdings.state.len(), 2);

		let gold = holdings.select(vec![
			HoldingFilter::Current,
			HoldingFilter::AssetType(AssetType::Gold),
		]);
		assert_eq!(gold.len(), 1);
		assert_eq!(gold[0].asset_name, "Digital Gold");
	}
}
