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
use crate::pricing::{AssetKey, PriceSource, Quote};
use crate::store::transaction::AssetType;
use crate::util::amount::safe_div;
use tracing::warn;

/// A current holding marked to its latest price.
#[derive(Clone, Debug, PartialEq)]
pub struct Valuation {
	pub asset_name: String,
	pub asset_type: AssetType,
	pub quantity: f64,
	pub average_cost: f64,

	/// Remaining cost basis of the units held
	pub invested: f64,

	pub price: f64,

	/// Price change per unit since the previous close
	pub day_change: f64,

	/// False when no quote could be had and the holding is valued at cost
	pub is_quoted: bool,
}

impl Valuation {
	pub fn current_value(&self) -> f64 {
		self.quantity * self.price
	}

	pub fn day_pl(&self) -> f64 {
		self.quantity * self.day_change
	}

	pub fn unrealized_pl(&self) -> f64 {
		self.current_value() - self.invested
	}

	pub fn unrealized_percent(&self) -> f64 {
		safe_div(self.unrealized_pl(), self.invested) * 100.0
	}
}

/// Values holdings with a single batch lookup. A holding the source cannot
/// price is carried at its average cost with no day change; this never
/// fails.
pub fn value_holdings(
	holdings: &[&Holding],
	prices: &dyn PriceSource,
) -> Vec<Valuation> {
	if holdings.is_empty() {
		return vec![];
	}

	let keys: Vec<AssetKey> = holdings
		.iter()
		.map(|h| AssetKey::new(&h.asset_name, h.asset_type))
		.collect();
	let quotes = prices.quotes(&keys);

	holdings
		.iter()
		.zip(keys.iter())
		.map(|(h, key)| {
			let quote = match quotes.get(key) {
				Some(Ok(quote)) => Some(*quote),
				Some(Err(e)) => {
					warn!("Valuing {} at cost: {}", key, e);
					None
				},
				None => {
					warn!("Valuing {} at cost: no quote returned", key);
					None
				},
			};
			valuation(h, quote)
		})
		.collect()
}

fn valuation(holding: &Holding, quote: Option<Quote>) -> Valuation {
	let average_cost = holding.average_cost();
	let (price, day_change, is_quoted) = match quote {
		Some(q) => (q.price, q.day_change.unwrap_or(0.0), true),
		None => (average_cost, 0.0, false),
	};

	Valuation {
		asset_name: holding.asset_name.clone(),
		asset_type: holding.asset_type,
		quantity: holding.quantity,
		average_cost,
		invested: holding.remaining_cost_basis,
		price,
		day_change,
		is_quoted,
	}
}
