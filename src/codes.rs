//! Department and region code handling.
//!
//! The referendum export writes metropolitan department codes without a
//! leading zero ("1".."9") while the reference tables zero-pad them
//! ("01".."09"). Every join on department code goes through
//! [`normalize_department_code`] first, on both sides, so the mismatch can
//! never silently drop rows.

/// Canonical form of a department code.
///
/// Purely numeric codes are zero-padded to two digits, anything with a
/// letter is uppercased and kept as-is.
///
/// Example: "1" → "01", "09" → "09", "974" → "974", "2a" → "2A", "ZZ" → "ZZ"
#[inline]
pub fn normalize_department_code(raw: &str) -> String {
    let code = raw.trim();
    if code.len() == 1 && code.as_bytes()[0].is_ascii_digit() {
        format!("0{code}")
    } else if code.bytes().all(|b| b.is_ascii_digit()) {
        code.to_string()
    } else {
        code.to_ascii_uppercase()
    }
}

/// DOM-TOM-COM departments and French citizens abroad are coded with a
/// leading 'Z' in the referendum export ("ZA".."ZZ").
#[inline]
pub fn is_overseas_department(code: &str) -> bool {
    code.trim()
        .as_bytes()
        .first()
        .map(|b| b.eq_ignore_ascii_case(&b'Z'))
        .unwrap_or(false)
}

/// Metropolitan regions carry numeric codes; the COM pseudo-regions in the
/// reference table start with a letter.
#[inline]
pub fn is_overseas_region(code: &str) -> bool {
    code.trim()
        .as_bytes()
        .first()
        .map(|b| !b.is_ascii_digit())
        .unwrap_or(true)
}
