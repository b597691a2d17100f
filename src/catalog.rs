/// A named text division with a fixed verse count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub name: &'static str,
    pub total_items: u32,
}

/// Catalog order is also render order.
pub static UNITS: [Unit; 6] = [
    Unit { name: "Al-Hujurat", total_items: 18 },
    Unit { name: "Yaseen", total_items: 83 },
    Unit { name: "Al-Waqiah", total_items: 96 },
    Unit { name: "An-Nisa", total_items: 176 },
    Unit { name: "An-Noor", total_items: 64 },
    Unit { name: "Yusuf", total_items: 111 },
];

pub fn find(name: &str) -> Option<&'static Unit> {
    UNITS.iter().find(|unit| unit.name == name)
}

pub fn total_items() -> u32 {
    UNITS.iter().map(|unit| unit.total_items).sum()
}

/// The unit the render pass visits last.
pub fn last() -> &'static Unit {
    &UNITS[UNITS.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_totals_sum_to_548() {
        assert_eq!(total_items(), 548);
    }

    #[test]
    fn find_matches_exact_names_only() {
        assert_eq!(find("Yaseen").map(|u| u.total_items), Some(83));
        assert!(find("yaseen").is_none());
        assert_eq!(last().name, "Yusuf");
    }
}
