use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::core::{AppError, Result};

/// Currency codes that share one exchange rate.
///
/// The first entry of each group is its canonical code; overriding any
/// member of a group re-prices the whole group.
const ALIAS_GROUPS: &[&[&str]] = &[&["RMB", "CNY", "人民币"], &["USD", "美元", "美金"]];

/// Normalizes a raw currency code the same way the return summary groups it:
/// surrounding whitespace removed, upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Exchange rates to renminbi, keyed by normalized currency code.
///
/// Built once at start-up and shared read-only for the lifetime of the
/// process. All conversions go through [`CurrencyRates::rate_for`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRates {
    rates: HashMap<String, Decimal>,
}

impl Default for CurrencyRates {
    /// RMB family at 1.0, USD family at 8.0
    fn default() -> Self {
        let mut rates = HashMap::new();
        for (group, rate) in ALIAS_GROUPS.iter().zip([Decimal::ONE, Decimal::new(8, 0)]) {
            for code in group.iter() {
                rates.insert(code.to_string(), rate);
            }
        }
        Self { rates }
    }
}

impl CurrencyRates {
    /// Default table with `overrides` applied on top.
    ///
    /// A code belonging to an alias group sets the rate for every member of
    /// that group; any other code is added as-is.
    pub fn with_overrides<I, S>(overrides: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (code, rate) in overrides {
            let code = normalize_code(code.as_ref());
            if code.is_empty() {
                return Err("currency code cannot be empty".to_string());
            }
            if rate < Decimal::ZERO {
                return Err(format!("exchange rate for {} cannot be negative", code));
            }

            match ALIAS_GROUPS.iter().find(|group| group.contains(&code.as_str())) {
                Some(group) => {
                    for alias in group.iter() {
                        table.rates.insert(alias.to_string(), rate);
                    }
                }
                None => {
                    table.rates.insert(code, rate);
                }
            }
        }
        Ok(table)
    }

    /// Parse a `CODE=RATE,CODE=RATE` list (as found in `EXCHANGE_RATES`) and
    /// apply it over the default table. Blank input yields the defaults.
    pub fn parse_overrides(list: &str) -> std::result::Result<Self, String> {
        let mut overrides = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, rate) = entry
                .split_once('=')
                .ok_or_else(|| format!("invalid exchange rate entry '{}', expected CODE=RATE", entry))?;
            let rate: Decimal = rate
                .trim()
                .parse()
                .map_err(|_| format!("invalid exchange rate '{}' for {}", rate.trim(), code.trim()))?;
            overrides.push((code.to_string(), rate));
        }
        Self::with_overrides(overrides)
    }

    /// Rate to RMB for a currency code, if the code is recognized
    pub fn rate_for(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&normalize_code(code)).copied()
    }

    /// Convert a single amount to RMB. Unknown currencies contribute zero.
    ///
    /// Fails only when the converted amount no longer fits in a `Decimal`.
    pub fn to_rmb(&self, amount: Decimal, code: &str) -> Result<Decimal> {
        let Some(rate) = self.rate_for(code) else {
            tracing::debug!(currency = %code, %amount, "No exchange rate for currency, ignoring amount");
            return Ok(Decimal::ZERO);
        };

        amount.checked_mul(rate).ok_or_else(|| {
            tracing::warn!(currency = %code, %amount, %rate, "RMB conversion overflowed");
            AppError::internal(format!("refund amount in {} is too large to convert", normalize_code(code)))
        })
    }

    /// Sum per-currency amounts into a single RMB total
    pub fn total_rmb<'a, I>(&self, amounts: I) -> Result<Decimal>
    where
        I: IntoIterator<Item = (&'a str, Decimal)>,
    {
        amounts.into_iter().try_fold(Decimal::ZERO, |total, (code, amount)| {
            total
                .checked_add(self.to_rmb(amount, code)?)
                .ok_or_else(|| AppError::internal("refund total in RMB is too large"))
        })
    }
}
