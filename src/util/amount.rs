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
/// Tolerance below which a quantity or amount is treated as exactly zero.
pub const EPSILON: f64 = 1e-9;

/// Quantities are never shown with more decimals than this.
const QUANTITY_DECIMALS: usize = 6;

pub fn is_zero(value: f64) -> bool {
	value.abs() <= EPSILON
}

/// Divides, reporting zero instead of infinity or NaN when the denominator
/// is (nearly) zero.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
	if is_zero(denominator) {
		0.0
	} else {
		numerator / denominator
	}
}

/// Renders a monetary value rounded to `precision` decimals, with thousands
/// separators. Values that round to zero never carry a sign.
pub fn format_money(value: f64, precision: usize) -> String {
	let rounded = round_to(value, precision);
	let text = format!("{:.*}", precision, rounded.abs());

	let (int_part, frac_part) = match text.split_once('.') {
		Some((i, f)) => (i, Some(f)),
		None => (text.as_str(), None),
	};

	let mut out = String::new();
	if rounded < 0.0 {
		out.push('-');
	}
	out.push_str(&group_thousands(int_part));
	if let Some(frac) = frac_part {
		out.push('.');
		out.push_str(frac);
	}
	out
}

/// Renders a quantity with trailing zeros trimmed.
pub fn format_quantity(value: f64) -> String {
	let rounded = round_to(value, QUANTITY_DECIMALS);
	let text = format!("{:.*}", QUANTITY_DECIMALS, rounded);
	let trimmed = text.trim_end_matches('0').trim_end_matches('.');
	trimmed.to_string()
}

pub fn format_percent(value: f64) -> String {
	format!("{}%", format_money(value, 2))
}

fn round_to(value: f64, precision: usize) -> f64 {
	let factor = 10f64.powi(precision as i32);
	let rounded = (value * factor).round() / factor;
	// collapse -0.0
	if rounded == 0.0 {
		0.0
	} else {
		rounded
	}
}

fn group_thousands(digits: &str) -> String {
	let len = digits.len();
	let mut out = String::with_capacity(len + len / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (len - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}
