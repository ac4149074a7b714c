/// Display currencies the balance and table formatting recognize, in the
/// order the table view cycles through them.
pub const CURRENCY_CYCLE: [&str; 4] = ["USD", "EUR", "INR", "GBP"];

/// Symbol prefix for a currency code. Unrecognized codes get no prefix
/// rather than an error.
pub fn symbol(code: &str) -> &'static str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "INR" => "₹",
        "GBP" => "£",
        _ => "",
    }
}

/// The code following `code` in the cycle order. Unrecognized codes restart
/// the cycle at the first entry.
pub fn next_in_cycle(code: &str) -> &'static str {
    match CURRENCY_CYCLE.iter().position(|&c| c == code) {
        Some(index) => CURRENCY_CYCLE[(index + 1) % CURRENCY_CYCLE.len()],
        None => CURRENCY_CYCLE[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_recognized_codes() {
        assert_eq!(symbol("USD"), "$");
        assert_eq!(symbol("EUR"), "€");
        assert_eq!(symbol("INR"), "₹");
        assert_eq!(symbol("GBP"), "£");
    }

    #[test]
    fn test_symbol_unrecognized_code_is_empty() {
        assert_eq!(symbol("XYZ"), "");
        assert_eq!(symbol(""), "");
    }

    #[test]
    fn test_next_in_cycle_wraps_around() {
        assert_eq!(next_in_cycle("USD"), "EUR");
        assert_eq!(next_in_cycle("GBP"), "USD");
    }

    #[test]
    fn test_next_in_cycle_unknown_code_restarts() {
        assert_eq!(next_in_cycle("XYZ"), "USD");
    }
}
