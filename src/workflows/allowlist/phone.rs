/// Ghana's international calling code, substituted for a leading zero.
const COUNTRY_CALLING_CODE: &str = "233";

/// Normalize a phone number to canonical international form.
///
/// Strip all whitespace; replace a leading `0` with the country calling
/// code; ensure the result carries a leading `+`.
///
/// `"0557083554"` becomes `"+233557083554"`.
pub fn normalize_phone(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let with_code = match stripped.strip_prefix('0') {
        Some(rest) => format!("{COUNTRY_CALLING_CODE}{rest}"),
        None => stripped,
    };

    if with_code.starts_with('+') {
        with_code
    } else {
        format!("+{with_code}")
    }
}
