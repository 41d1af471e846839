pub mod en;

pub use en as current;

pub fn fill_one(template: &str, value: impl std::fmt::Display) -> String {
    template.replacen("{}", &value.to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_fills_first_slot_only() {
        assert_eq!(fill_one("{} report(s)", 3), "3 report(s)");
        assert_eq!(fill_one("{} of {}", 1), "1 of {}");
        assert_eq!(fill_one("no slot", 9), "no slot");
    }
}
