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
use anyhow::{bail, Error};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date of an economic event. Serialized as "YYYY-MM-DD".
#[derive(
	Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
	/// Constructor to parse a string in the "YYYY-mm-dd" format
	pub fn from_str(date_str: &str) -> Result<Date, Error> {
		let parts: Vec<&str> = date_str.trim().split('-').collect();
		if parts.len() != 3 {
			bail!("Date format must be YYYY-MM-DD");
		}

		let year = parts[0].parse::<i32>()?;
		let month = parts[1].parse::<u32>()?;
		let day = parts[2].parse::<u32>()?;

		match NaiveDate::from_ymd_opt(year, month, day) {
			Some(date) => Ok(Date(date)),
			None => bail!("Invalid date: {}", date_str),
		}
	}

	pub fn today() -> Date {
		Date(Local::now().date_naive())
	}

	pub fn day(&self) -> u32 {
		self.0.day()
	}
}

impl fmt::Display for Date {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.format("%Y-%m-%d"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_and_display() {
		let date = Date::from_str("2024-02-29").unwrap();
		assert_eq!(date.to_string(), "2024-02-29");
		assert_eq!(date.day(), 29);
	}

	#[test]
	fn test_invalid_dates() {
		assert!(Date::from_str("2023-02-29").is_err());
		assert!(Date::from_str("2024-13-01").is_err());
		assert!(Date::from_str("2024/01/01").is_err());
		assert!(Date::from_str("yesterday").is_err());
	}

	#[test]
	fn test_ordering() {
		let a = Date::from_str("2023-12-31").unwrap();
		let b = Date::from_str("2024-01-01").unwrap();
		assert!(a < b);
		assert_eq!(b, Date::from_str(" 2024-01-01 ").unwrap());
	}

	#[test]
	fn test_serde_as_plain_string() {
		let date = Date::from_str("2023-05-20").unwrap();
		let json = serde_json::to_string(&date).unwrap();
		assert_eq!(json, "\"2023-05-20\"");
		let back: Date = serde_json::from_str(&json).unwrap();
		assert_eq!(back, date);
	}
}
