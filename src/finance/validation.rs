//! UK bank-detail and form-field checks applied before a request leaves the client.

/// Whether `value` is a sort code in `NN-NN-NN` form (surrounding whitespace ignored).
pub fn is_valid_sort_code(value: &str) -> bool {
	let bytes = value.trim().as_bytes();

	bytes.len() == 8
		&& bytes.iter().enumerate().all(|(idx, byte)| match idx {
			2 | 5 => *byte == b'-',
			_ => byte.is_ascii_digit(),
		})
}

/// Whether `value` is an eight-digit account number (surrounding whitespace ignored).
pub fn is_valid_account_number(value: &str) -> bool {
	let trimmed = value.trim();

	trimmed.len() == 8 && trimmed.bytes().all(|byte| byte.is_ascii_digit())
}

/// Whether `value` holds at least `min` characters once trimmed.
pub fn required(value: &str, min: usize) -> bool {
	value.trim().chars().count() >= min
}
