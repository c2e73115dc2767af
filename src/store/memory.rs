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
use crate::store::transaction::{Transaction, TransactionInput};
use crate::store::TransactionStore;
use anyhow::{anyhow, Error};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Keeps the log in process memory. Appends and reads share one mutex;
/// reads clone the log so callers work on a snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
	log: Mutex<Log>,
}

/// Transactions plus the ID counter, kept under one lock so that no two
/// appends can be assigned the same ID.
#[derive(Debug, Default)]
struct Log {
	transactions: Vec<Transaction>,
	/// The ID number that was most recently assigned
	last_id: u64,
}

impl MemoryStore {
	/// Seeds a store with already-identified transactions. Numbering
	/// continues after the largest numeric ID present.
	pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
		let last_id = transactions
			.iter()
			.filter_map(|t| t.id.parse::<u64>().ok())
			.max()
			.unwrap_or(0);

		Self {
			log: Mutex::new(Log {
				transactions,
				last_id,
			}),
		}
	}

	fn lock(&self) -> Result<MutexGuard<'_, Log>, Error> {
		self.log
			.lock()
			.map_err(|_| anyhow!("transaction log lock poisoned"))
	}

	/// Validates and identifies `input`, then hands the transaction to
	/// `persist` while still holding the lock. The transaction joins the
	/// log, and its ID is used up, only if `persist` succeeds.
	pub fn append_with(
		&self,
		input: TransactionInput,
		persist: impl FnOnce(&Transaction) -> Result<(), Error>,
	) -> Result<Transaction, Error> {
		input.validate()?;

		let mut log = self.lock()?;
		let transaction = Transaction::new((log.last_id + 1).to_string(), input);
		persist(&transaction)?;

		log.last_id += 1;
		log.transactions.push(transaction.clone());

		debug!(id = %transaction.id, kind = %transaction.kind(), "appended transaction");
		Ok(transaction)
	}
}

impl TransactionStore for MemoryStore {
	fn append(&self, input: TransactionInput) -> Result<Transaction, Error> {
		self.append_with(input, |_| Ok(()))
	}

	fn snapshot(&self) -> Result<Vec<Transaction>, Error> {
		Ok(self.lock()?.transactions.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::transaction::{AssetType, TransactionType};
	use crate::util::date::Date;
	use std::sync::Arc;
	use std::thread;

	fn deposit(amount: f64) -> TransactionInput {
		TransactionInput::cash(
			Date::from_str("2024-01-02").unwrap(),
			TransactionType::Deposit,
			amount,
		)
	}

	#[test]
	fn test_append_assigns_sequential_ids() {
		let store = MemoryStore::default();
		let a = store.append(deposit(100.0)).unwrap();
		let b = store.append(deposit(200.0)).unwrap();
		assert_eq!(a.id, "1");
		assert_eq!(b.id, "2");

		let listed = store.list().unwrap();
		assert_eq!(listed[0].id, "2");
		assert_eq!(listed[1].id, "1");
		assert_eq!(store.snapshot().unwrap()[0].id, "1");
	}

	#[test]
	fn test_invalid_append_leaves_log_unchanged() {
		let store = MemoryStore::default();
		store.append(deposit(100.0)).unwrap();

		let mut bad = TransactionInput::trade(
			Date::from_str("2024-01-03").unwrap(),
			TransactionType::Buy,
			"Apple Inc.",
			AssetType::Stock,
			1.0,
			10.0,
		);
		bad.quantity = Some(-1.0);
		assert!(store.append(bad).is_err());
		assert_eq!(store.snapshot().unwrap().len(), 1);

		// the failed append must not burn an ID
		assert_eq!(store.append(deposit(1.0)).unwrap().id, "2");
	}

	#[test]
	fn test_failed_persist_leaves_log_unchanged() {
		let store = MemoryStore::default();
		let result = store.append_with(deposit(1.0), |_| Err(anyhow!("disk full")));
		assert!(result.is_err());
		assert!(store.snapshot().unwrap().is_empty());
		assert_eq!(store.append(deposit(1.0)).unwrap().id, "1");
	}

	#[test]
	fn test_ids_continue_after_seeded_log() {
		let seeded = vec![
			Transaction::new("4".to_string(), deposit(1.0)),
			Transaction::new("legacy".to_string(), deposit(2.0)),
		];
		let store = MemoryStore::from_transactions(seeded);
		assert_eq!(store.append(deposit(3.0)).unwrap().id, "5");
	}

	#[test]
	fn test_concurrent_appends_get_unique_ids() {
		let store = Arc::new(MemoryStore::default());

		thread::scope(|s| {
			for _ in 0..8 {
				let store = Arc::clone(&store);
				s.spawn(move || {
					for _ in 0..25 {
						store.append(deposit(1.0)).unwrap();
					}
				});
			}
		});

		let mut ids: Vec<u64> = store
			.snapshot()
			.unwrap()
			.iter()
			.map(|t| t.id.parse().unwrap())
			.collect();
		ids.sort();
		assert_eq!(ids, (1..=200).collect::<Vec<u64>>());
	}
}
