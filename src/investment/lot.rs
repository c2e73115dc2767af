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
use crate::store::transaction::Transaction;
use crate::util::amount::EPSILON;
use crate::util::date::Date;
use tracing::trace;

/// A discrete quantity of an asset bought in a single transaction, with
/// what is left of it after earlier sales.
#[derive(Clone, Debug, PartialEq)]
pub struct Lot {
	pub id: String,
	pub acquisition_date: Date,
	pub unit_price: f64,

	/// Units originally bought
	pub quantity: f64,

	/// Units not yet matched to a sale; always in positive terms
	pub remaining: f64,
}

impl Lot {
	pub fn from_buy(t: &Transaction) -> Self {
		Self {
			id: t.id.clone(),
			acquisition_date: t.date(),
			unit_price: t.price(),
			quantity: t.quantity(),
			remaining: t.quantity(),
		}
	}

	pub fn is_open(&self) -> bool {
		self.remaining > EPSILON
	}
}

/// What a single sale drew from a lot queue.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Consumption {
	/// Sum over lots of units taken times that lot's unit price
	pub cost: f64,

	/// Units the lots could not cover; zero when fully matched
	pub unmatched: f64,
}

/// Lots of one asset in acquisition order, consumed first-in-first-out.
#[derive(Clone, Debug, Default)]
pub struct LotQueue {
	lots: Vec<Lot>,
}

impl LotQueue {
	/// Builds a queue from buys that are already in date order.
	pub fn from_buys<'a>(buys: impl IntoIterator<Item = &'a Transaction>) -> Self {
		Self {
			lots: buys.into_iter().map(Lot::from_buy).collect(),
		}
	}

	/// Takes `quantity` units from the earliest open lots. Differences
	/// below EPSILON count as fully matched.
	pub fn consume(&mut self, quantity: f64) -> Consumption {
		let mut to_match = quantity;
		let mut cost = 0.0;

		for lot in self.lots.iter_mut() {
			if to_match <= EPSILON {
				break;
			}
			if !lot.is_open() {
				continue;
			}

			let taken = to_match.min(lot.remaining);
			lot.remaining -= taken;
			to_match -= taken;
			cost += taken * lot.unit_price;

			trace!(
				lot = %lot.id,
				acquired = %lot.acquisition_date,
				taken,
				"matched lot"
			);
		}

		Consumption {
			cost,
			unmatched: if to_match > EPSILON { to_match } else { 0.0 },
		}
	}

	/// Quantity-weighted mean unit price of every lot in the queue, whether
	/// or not it is still open. None when there are no lots.
	pub fn average_price(&self) -> Option<f64> {
		let quantity: f64 = self.lots.iter().map(|l| l.quantity).sum();
		if quantity <= EPSILON {
			return None;
		}
		let cost: f64 = self.lots.iter().map(|l| l.quantity * l.unit_price).sum();
		Some(cost / quantity)
	}
}
