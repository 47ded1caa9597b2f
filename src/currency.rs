// src/currency.rs

use std::fmt;

/// Описание валюты из статического каталога
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDescriptor {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

impl fmt::Display for CurrencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.flag, self.code, self.name)
    }
}

pub const DEFAULT_SOURCE: &str = "USD";
pub const DEFAULT_TARGET: &str = "EUR";

pub static CURRENCIES: &[CurrencyDescriptor] = &[
    CurrencyDescriptor { code: "USD", name: "US Dollar",         flag: "🇺🇸" },
    CurrencyDescriptor { code: "EUR", name: "Euro",              flag: "🇪🇺" },
    CurrencyDescriptor { code: "GBP", name: "British Pound",     flag: "🇬🇧" },
    CurrencyDescriptor { code: "JPY", name: "Japanese Yen",      flag: "🇯🇵" },
    CurrencyDescriptor { code: "CNY", name: "Chinese Yuan",      flag: "🇨🇳" },
    CurrencyDescriptor { code: "INR", name: "Indian Rupee",      flag: "🇮🇳" },
    CurrencyDescriptor { code: "AUD", name: "Australian Dollar", flag: "🇦🇺" },
    CurrencyDescriptor { code: "CAD", name: "Canadian Dollar",   flag: "🇨🇦" },
    CurrencyDescriptor { code: "CHF", name: "Swiss Franc",       flag: "🇨🇭" },
    CurrencyDescriptor { code: "RUB", name: "Russian Ruble",     flag: "🇷🇺" },
    CurrencyDescriptor { code: "KRW", name: "South Korean Won",  flag: "🇰🇷" },
    CurrencyDescriptor { code: "BRL", name: "Brazilian Real",    flag: "🇧🇷" },
];

/// Поиск по коду без учёта регистра
pub fn find(code: &str) -> Option<&'static CurrencyDescriptor> {
    let code = code.trim();
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Валюта по коду; для неизвестного кода откатываемся на первую в каталоге
pub fn find_or_default(code: &str) -> &'static CurrencyDescriptor {
    find(code).unwrap_or(&CURRENCIES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find("eur").map(|c| c.code), Some("EUR"));
        assert_eq!(find(" Gbp ").map(|c| c.code), Some("GBP"));
        assert!(find("XYZ").is_none());
    }

    #[test]
    fn defaults_are_in_catalog() {
        assert!(find(DEFAULT_SOURCE).is_some());
        assert!(find(DEFAULT_TARGET).is_some());
    }

    #[test]
    fn codes_are_unique_three_letter() {
        for (i, c) in CURRENCIES.iter().enumerate() {
            assert_eq!(c.code.len(), 3);
            assert!(CURRENCIES[i + 1..].iter().all(|o| o.code != c.code));
        }
    }
}
