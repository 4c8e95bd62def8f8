//! Integer pence amounts and their pounds-string conversions.

// self
use crate::_prelude::*;

/// Monetary amount in pence, the unit every API amount uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pence(i64);
impl Pence {
	/// Zero pence.
	pub const ZERO: Self = Self(0);

	/// Wraps a raw pence value.
	pub const fn new(pence: i64) -> Self {
		Self(pence)
	}

	/// Returns the raw pence value.
	pub const fn get(self) -> i64 {
		self.0
	}

	/// Parses user input in pounds (e.g. `"12.5"`) into a strictly positive amount.
	///
	/// Blank, non-numeric, non-finite, zero, and negative inputs are rejected, as is anything
	/// that rounds down to zero pence.
	pub fn parse_pounds(input: &str) -> Option<Self> {
		let trimmed = input.trim();

		if trimmed.is_empty() {
			return None;
		}

		let pounds = trimmed.parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.)?;
		let pence = (pounds * 100.).round();

		if pence < 1. || pence >= i64::MAX as f64 {
			return None;
		}

		Some(Self(pence as i64))
	}

	/// Formats the amount as pounds with two decimals (`12345` becomes `"123.45"`).
	pub fn to_pounds_string(self) -> String {
		let sign = if self.0 < 0 { "-" } else { "" };
		let abs = self.0.unsigned_abs();

		format!("{sign}{}.{:02}", abs / 100, abs % 100)
	}
}
impl Display for Pence {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_pounds_string())
	}
}
impl From<i64> for Pence {
	fn from(value: i64) -> Self {
		Self(value)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_pounds_rounds_to_nearest_penny() {
		assert_eq!(Pence::parse_pounds("12.5"), Some(Pence::new(1250)));
		assert_eq!(Pence::parse_pounds(" 0.016 "), Some(Pence::new(2)));
		assert_eq!(Pence::parse_pounds("1e2"), Some(Pence::new(10_000)));
	}

	#[test]
	fn parse_pounds_rejects_unusable_input() {
		for input in ["", "   ", "abc", "0", "-4", "0.004", "inf", "NaN"] {
			assert_eq!(Pence::parse_pounds(input), None, "Input {input:?} should be rejected.");
		}
	}

	#[test]
	fn formats_two_decimals_with_sign() {
		assert_eq!(Pence::new(12_345).to_pounds_string(), "123.45");
		assert_eq!(Pence::new(5).to_string(), "0.05");
		assert_eq!(Pence::new(-250).to_pounds_string(), "-2.50");
		assert_eq!(Pence::ZERO.to_pounds_string(), "0.00");
	}
}
