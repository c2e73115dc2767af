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
use crate::investment::holding::{Holding, HoldingFilter, Holdings};
use crate::investment::sale::{realized_pl, Sale};
use crate::investment::summary::{summarize, PortfolioSummary};
use crate::investment::valuation::{value_holdings, Valuation};
use crate::pricing::PriceSource;
use crate::store::transaction::{AssetType, Transaction};
use crate::store::TransactionStore;
use anyhow::Error;

/// A snapshot of the transaction log and the holdings folded from it.
/// Every view is derived on request; nothing here outlives the snapshot.
pub struct Portfolio {
	transactions: Vec<Transaction>,
	holdings: Holdings,
}

impl Portfolio {
	pub fn new(transactions: Vec<Transaction>) -> Self {
		let holdings = Holdings::aggregate(&transactions);
		Self {
			transactions,
			holdings,
		}
	}

	/// Takes a consistent snapshot of the store.
	pub fn from_store(store: &dyn TransactionStore) -> Result<Self, Error> {
		Ok(Self::new(store.snapshot()?))
	}

	/// Current holdings by asset name, optionally of one class only.
	pub fn holdings(&self, asset_type: Option<AssetType>) -> Vec<&Holding> {
		let mut filters = vec![HoldingFilter::Current];
		if let Some(asset_type) = asset_type {
			filters.push(HoldingFilter::AssetType(asset_type));
		}
		self.holdings.select(filters)
	}

	/// Realized P/L of every sale, newest first.
	pub fn realized(&self) -> Vec<Sale> {
		realized_pl(&self.transactions)
	}

	/// Current holdings marked to market.
	pub fn valuations(
		&self,
		prices: &dyn PriceSource,
		asset_type: Option<AssetType>,
	) -> Vec<Valuation> {
		value_holdings(&self.holdings(asset_type), prices)
	}

	pub fn summary(&self, prices: &dyn PriceSource) -> PortfolioSummary {
		summarize(
			&self.transactions,
			&self.holdings(None),
			&self.realized(),
			prices,
		)
	}

	pub fn allocation(&self, prices: &dyn PriceSource) -> Allocation {
		Allocation::from_valuations(&self.valuations(prices, None))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::investment::fixtures::*;
	use crate::pricing::mock::MockPriceSource;
	use crate::store::memory::MemoryStore;
	use crate::store::transaction::{TransactionInput, TransactionType};

	fn store() -> MemoryStore {
		let store = MemoryStore::default();
		let inputs = vec![
			TransactionInput::cash(date("2023-05-01"), TransactionType::Deposit, 10_000.0),
			TransactionInput::trade(
				date("2023-05-20"),
				TransactionType::Buy,
				"Apple Inc.",
				AssetType::Stock,
				10.0,
				172.5,
			),
			TransactionInput::trade(
				date("2023-05-22"),
				TransactionType::Buy,
				"Fidelity 500 Index Fund",
				AssetType::MutualFund,
				20.0,
				148.2,
			),
			TransactionInput::trade(
				date("2023-06-15"),
				TransactionType::Buy,
				"Digital Gold",
				AssetType::Gold,
				10.0,
				68.0,
			),
			TransactionInput::trade(
				date("2023-07-01"),
				TransactionType::Sell,
				"Apple Inc.",
				AssetType::Stock,
				4.0,
				190.0,
			),
		];
		for input in inputs {
			store.append(input).unwrap();
		}
		store
	}

	#[test]
	fn test_views_from_store() {
		let portfolio = Portfolio::from_store(&store()).unwrap();
		let prices = MockPriceSource::new(date("2024-06-15"));

		assert_eq!(portfolio.transactions.len(), 5);
		assert_eq!(portfolio.holdings(None).len(), 3);
		assert_eq!(portfolio.holdings(Some(AssetType::Gold)).len(), 1);
		assert!(portfolio.holdings(Some(AssetType::Bond)).is_empty());

		let realized = portfolio.realized();
		assert_eq!(realized.len(), 1);
		assert_close(realized[0].cost_basis, 690.0);
		assert_close(realized[0].profit_or_loss, 760.0 - 690.0);

		let summary = portfolio.summary(&prices);
		let allocation = portfolio.allocation(&prices);
		assert_close(allocation.total(), summary.total_value);
		assert_close(
			summary.available_cash,
			10_000.0 - 1725.0 - 2964.0 - 680.0 + 760.0,
		);
		assert_eq!(portfolio.summary(&prices), summary);
	}

	#[test]
	fn test_snapshot_is_isolated_from_later_appends() {
		let store = store();
		let portfolio = Portfolio::from_store(&store).unwrap();
		store
			.append(TransactionInput::cash(
				date("2023-08-01"),
				TransactionType::Deposit,
				1.0,
			))
			.unwrap();
		assert_eq!(portfolio.transactions.len(), 5);
	}
}
