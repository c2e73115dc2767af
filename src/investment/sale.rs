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
use crate::investment::lot::LotQueue;
use crate::store::transaction::{AssetType, Transaction, TransactionType};
use crate::util::date::Date;
use tracing::debug;

/// The realized outcome of one sell transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct Sale {
	/// ID of the sell transaction
	pub id: String,
	pub sale_date: Date,
	pub asset_name: String,
	pub asset_type: AssetType,
	pub quantity_sold: f64,
	pub sale_price: f64,

	/// Cost of the lots matched to this sale, FIFO
	pub cost_basis: f64,

	/// The sale's recorded total amount
	pub sale_value: f64,
	pub profit_or_loss: f64,
}

/// Realized profit and loss for every sell in the log, newest first.
/// Sales on the same date keep their log order.
pub fn realized_pl(transactions: &[Transaction]) -> Vec<Sale> {
	let mut sales: Vec<Sale> = transactions
		.iter()
		.filter(|t| t.kind() == TransactionType::Sell)
		.filter_map(|s| {
			let (name, asset_type) = (s.asset_name()?, s.asset_type()?);
			let cost_basis = cost_basis(s, transactions);
			let sale_value = s.total_amount();

			Some(Sale {
				id: s.id.clone(),
				sale_date: s.date(),
				asset_name: name.to_string(),
				asset_type,
				quantity_sold: s.quantity(),
				sale_price: s.price(),
				cost_basis,
				sale_value,
				profit_or_loss: sale_value - cost_basis,
			})
		})
		.collect();

	sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
	sales
}

/// Cost of the units consumed by `sale`, rebuilt from scratch: the
/// asset's buys up to the sale date form FIFO lots, every strictly
/// earlier sell of the asset is replayed against them, and then the sale
/// itself draws from what is left.
///
/// Units the buy history cannot cover are valued at the average price of
/// those buys, or at the sale's own price if there were none. This never
/// fails; incomplete history only makes the figure less exact.
pub fn cost_basis(sale: &Transaction, transactions: &[Transaction]) -> f64 {
	let Some(asset_name) = sale.asset_name() else {
		return 0.0;
	};

	let history: Vec<&Transaction> = by_date(
		transactions
			.iter()
			.filter(|t| t.is_trade_of(asset_name) && t.id != sale.id),
	);

	let mut lots = LotQueue::from_buys(
		history
			.iter()
			.copied()
			.filter(|t| t.kind() == TransactionType::Buy && t.date() <= sale.date()),
	);

	for earlier in history
		.iter()
		.filter(|t| t.kind() == TransactionType::Sell && t.date() < sale.date())
	{
		lots.consume(earlier.quantity());
	}

	let consumed = lots.consume(sale.quantity());
	if consumed.unmatched == 0.0 {
		return consumed.cost;
	}

	let fallback_price = lots.average_price().unwrap_or(sale.price());
	debug!(
		sale = %sale.id,
		asset = asset_name,
		unmatched = consumed.unmatched,
		fallback_price,
		"sale exceeds recorded buys; valuing shortfall at fallback price"
	);

	consumed.cost + consumed.unmatched * fallback_price
}
