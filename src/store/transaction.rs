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
use crate::util::amount::EPSILON;
use crate::util::date::Date;
use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Mismatches smaller than this between `total_amount` and
/// `quantity * price` are rounding noise.
const AMOUNT_MISMATCH_TOLERANCE: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
	Buy,
	Sell,
	Deposit,
	Withdrawal,
}

impl TransactionType {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match s.trim().to_lowercase().as_str() {
			"buy" => Ok(TransactionType::Buy),
			"sell" => Ok(TransactionType::Sell),
			"deposit" => Ok(TransactionType::Deposit),
			"withdrawal" | "withdraw" => Ok(TransactionType::Withdrawal),
			_ => bail!("unknown transaction type: {}", s),
		}
	}

	/// Buys and sells move an asset; deposits and withdrawals only cash.
	pub fn is_trade(&self) -> bool {
		matches!(self, TransactionType::Buy | TransactionType::Sell)
	}
}

impl fmt::Display for TransactionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			TransactionType::Buy => "Buy",
			TransactionType::Sell => "Sell",
			TransactionType::Deposit => "Deposit",
			TransactionType::Withdrawal => "Withdrawal",
		};
		write!(f, "{}", s)
	}
}

/// Asset classes. Declaration order is the canonical display order.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AssetType {
	Stock,
	#[serde(rename = "Mutual Fund")]
	MutualFund,
	Bond,
	Gold,
}

impl AssetType {
	pub fn from_str(s: &str) -> Result<Self, Error> {
		match s.trim().to_lowercase().as_str() {
			"stock" | "stocks" => Ok(AssetType::Stock),
			"mutual fund" | "mutual-fund" | "mutual-funds" | "mf" => {
				Ok(AssetType::MutualFund)
			},
			"bond" | "bonds" => Ok(AssetType::Bond),
			"gold" => Ok(AssetType::Gold),
			_ => bail!("unknown asset type: {}", s),
		}
	}

	/// What one unit of this asset is called on holdings reports.
	pub fn unit_label(&self) -> &'static str {
		match self {
			AssetType::Stock => "Shares",
			AssetType::MutualFund => "Units",
			AssetType::Bond => "Qty",
			AssetType::Gold => "Grams",
		}
	}
}

impl fmt::Display for AssetType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			AssetType::Stock => "Stock",
			AssetType::MutualFund => "Mutual Fund",
			AssetType::Bond => "Bond",
			AssetType::Gold => "Gold",
		};
		write!(f, "{}", s)
	}
}

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ValidationError {
	#[error("{0} requires an asset name")]
	MissingAssetName(TransactionType),
	#[error("{0} requires an asset type")]
	MissingAssetType(TransactionType),
	#[error("{0} requires a quantity")]
	MissingQuantity(TransactionType),
	#[error("{0} requires a price")]
	MissingPrice(TransactionType),
	#[error("{field} must be positive, got {value}")]
	NotPositive { field: &'static str, value: f64 },
	#[error("{field} must be a finite number")]
	NotFinite { field: &'static str },
	#[error("{kind} must not carry {field}")]
	UnexpectedField {
		kind: TransactionType,
		field: &'static str,
	},
}

/// Everything about a transaction except its identifier; what callers
/// submit for appending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
	pub date: Date,
	#[serde(rename = "type")]
	pub kind: TransactionType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub asset_type: Option<AssetType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub quantity: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	pub total_amount: f64,
}

impl TransactionInput {
	pub fn trade(
		date: Date,
		kind: TransactionType,
		asset_name: &str,
		asset_type: AssetType,
		quantity: f64,
		price: f64,
	) -> Self {
		Self {
			date,
			kind,
			asset_name: Some(asset_name.to_string()),
			asset_type: Some(asset_type),
			quantity: Some(quantity),
			price: Some(price),
			total_amount: quantity * price,
		}
	}

	pub fn cash(date: Date, kind: TransactionType, amount: f64) -> Self {
		Self {
			date,
			kind,
			asset_name: None,
			asset_type: None,
			quantity: None,
			price: None,
			total_amount: amount,
		}
	}

	/// Checks the field rules for this transaction's type. Nothing invalid
	/// may ever reach the log.
	pub fn validate(&self) -> Result<(), ValidationError> {
		check_finite("totalAmount", Some(self.total_amount))?;
		check_finite("quantity", self.quantity)?;
		check_finite("price", self.price)?;

		if self.kind.is_trade() {
			match &self.asset_name {
				Some(name) if !name.trim().is_empty() => {},
				_ => return Err(ValidationError::MissingAssetName(self.kind)),
			}
			if self.asset_type.is_none() {
				return Err(ValidationError::MissingAssetType(self.kind));
			}
			let quantity = self
				.quantity
				.ok_or(ValidationError::MissingQuantity(self.kind))?;
			let price =
				self.price.ok_or(ValidationError::MissingPrice(self.kind))?;

			check_positive("quantity", quantity)?;
			check_positive("price", price)?;
		} else {
			let unexpected = [
				("assetName", self.asset_name.is_some()),
				("assetType", self.asset_type.is_some()),
				("quantity", self.quantity.is_some()),
				("price", self.price.is_some()),
			];
			if let Some((field, _)) =
				unexpected.iter().find(|(_, present)| *present)
			{
				return Err(ValidationError::UnexpectedField {
					kind: self.kind,
					field: *field,
				});
			}
		}

		check_positive("totalAmount", self.total_amount)
	}
}

fn check_finite(
	field: &'static str,
	value: Option<f64>,
) -> Result<(), ValidationError> {
	match value {
		Some(v) if !v.is_finite() => Err(ValidationError::NotFinite { field }),
		_ => Ok(()),
	}
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
	if value > 0.0 {
		Ok(())
	} else {
		Err(ValidationError::NotPositive { field, value })
	}
}

/// A recorded event in the portfolio's history. Never mutated once stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	pub id: String,
	#[serde(flatten)]
	pub input: TransactionInput,
}

impl Transaction {
	pub fn new(id: String, input: TransactionInput) -> Self {
		Self { id, input }
	}

	pub fn date(&self) -> Date {
		self.input.date
	}

	pub fn kind(&self) -> TransactionType {
		self.input.kind
	}

	pub fn asset_name(&self) -> Option<&str> {
		self.input.asset_name.as_deref()
	}

	pub fn asset_type(&self) -> Option<AssetType> {
		self.input.asset_type
	}

	/// Zero for cash transactions.
	pub fn quantity(&self) -> f64 {
		self.input.quantity.unwrap_or(0.0)
	}

	/// Zero for cash transactions.
	pub fn price(&self) -> f64 {
		self.input.price.unwrap_or(0.0)
	}

	pub fn total_amount(&self) -> f64 {
		self.input.total_amount
	}

	pub fn is_trade_of(&self, asset_name: &str) -> bool {
		self.kind().is_trade() && self.asset_name() == Some(asset_name)
	}

	/// For trades whose recorded total disagrees with quantity times price,
	/// returns `total_amount - quantity * price`.
	pub fn amount_mismatch(&self) -> Option<f64> {
		if !self.kind().is_trade() {
			return None;
		}
		let diff = self.total_amount() - self.quantity() * self.price();
		if diff.abs() > AMOUNT_MISMATCH_TOLERANCE + EPSILON {
			Some(diff)
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date() -> Date {
		Date::from_str("2023-05-20").unwrap()
	}

	#[test]
	fn test_valid_trade_and_cash() {
		let buy = TransactionInput::trade(
			date(),
			TransactionType::Buy,
			"Apple Inc.",
			AssetType::Stock,
			10.0,
			172.5,
		);
		assert!(buy.validate().is_ok());
		assert_eq!(buy.total_amount, 1725.0);

		let deposit =
			TransactionInput::cash(date(), TransactionType::Deposit, 1000.0);
		assert!(deposit.validate().is_ok());
	}

	#[test]
	fn test_trade_requires_fields() {
		let mut sell = TransactionInput::trade(
			date(),
			TransactionType::Sell,
			"Apple Inc.",
			AssetType::Stock,
			5.0,
			180.0,
		);
		sell.asset_name = Some("  ".to_string());
		assert_eq!(
			sell.validate(),
			Err(ValidationError::MissingAssetName(TransactionType::Sell))
		);

		sell.asset_name = Some("Apple Inc.".to_string());
		sell.price = None;
		assert_eq!(
			sell.validate(),
			Err(ValidationError::MissingPrice(TransactionType::Sell))
		);

		sell.price = Some(180.0);
		sell.quantity = Some(0.0);
		assert!(matches!(
			sell.validate(),
			Err(ValidationError::NotPositive {
				field: "quantity",
				..
			})
		));
	}

	#[test]
	fn test_cash_rejects_asset_fields() {
		let mut withdrawal =
			TransactionInput::cash(date(), TransactionType::Withdrawal, 50.0);
		withdrawal.quantity = Some(1.0);
		assert_eq!(
			withdrawal.validate(),
			Err(ValidationError::UnexpectedField {
				kind: TransactionType::Withdrawal,
				field: "quantity"
			})
		);

		let negative =
			TransactionInput::cash(date(), TransactionType::Deposit, -5.0);
		assert!(negative.validate().is_err());
	}

	#[test]
	fn test_non_finite_rejected() {
		let deposit =
			TransactionInput::cash(date(), TransactionType::Deposit, f64::NAN);
		assert_eq!(
			deposit.validate(),
			Err(ValidationError::NotFinite {
				field: "totalAmount"
			})
		);
	}

	#[test]
	fn test_serde_shape() {
		let tx = Transaction::new(
			"1".to_string(),
			TransactionInput::trade(
				date(),
				TransactionType::Buy,
				"Fidelity 500 Index Fund",
				AssetType::MutualFund,
				20.0,
				148.2,
			),
		);
		let json = serde_json::to_value(&tx).unwrap();
		assert_eq!(json["id"], "1");
		assert_eq!(json["type"], "Buy");
		assert_eq!(json["assetType"], "Mutual Fund");
		assert_eq!(json["assetName"], "Fidelity 500 Index Fund");

		let cash = Transaction::new(
			"2".to_string(),
			TransactionInput::cash(date(), TransactionType::Deposit, 10.0),
		);
		let json = serde_json::to_string(&cash).unwrap();
		assert!(!json.contains("assetName"));
		let back: Transaction = serde_json::from_str(&json).unwrap();
		assert_eq!(back, cash);
	}

	#[test]
	fn test_amount_mismatch() {
		let mut input = TransactionInput::trade(
			date(),
			TransactionType::Buy,
			"Digital Gold",
			AssetType::Gold,
			10.0,
			68.0,
		);
		let tx = Transaction::new("1".to_string(), input.clone());
		assert_eq!(tx.amount_mismatch(), None);

		input.total_amount = 700.0;
		let tx = Transaction::new("1".to_string(), input);
		assert_eq!(tx.amount_mismatch(), Some(20.0));
	}

	#[test]
	fn test_parse_types() {
		assert_eq!(
			AssetType::from_str("mutual-fund").unwrap(),
			AssetType::MutualFund
		);
		assert_eq!(AssetType::from_str("GOLD").unwrap(), AssetType::Gold);
		assert!(AssetType::from_str("crypto").is_err());
		assert_eq!(
			TransactionType::from_str("Withdrawal").unwrap(),
			TransactionType::Withdrawal
		);
	}
}
