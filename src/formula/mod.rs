//! Spreadsheet-native formula templates.
//!
//! Every builder takes operands that are already resolved to reference text
//! (`B5`, `Income!B17`) or literal numbers and returns the formula body
//! without a leading `=`. Operands are expected to be atomic: a reference or
//! a plain number, never a compound expression.

mod expr;

pub use expr::{Formula, Resolver};

use std::fmt::Display;

/// `SUM(range)`.
pub fn sum(range: impl Display) -> String {
    format!("SUM({range})")
}

/// `minuend-s1-s2-...`.
pub fn subtract<I>(minuend: impl Display, subtrahends: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut formula = minuend.to_string();
    for term in subtrahends {
        formula.push('-');
        formula.push_str(&term.to_string());
    }
    formula
}

/// Division guarded so an empty template shows 0 instead of `#DIV/0!`.
pub fn ratio(numerator: impl Display, denominator: impl Display) -> String {
    format!("IFERROR({numerator}/{denominator},0)")
}

/// `COUNTA(range)`, the number of non-empty cells.
pub fn counta(range: impl Display) -> String {
    format!("COUNTA({range})")
}

/// Monthly contribution needed to grow `present` into `future`.
///
/// `rate` is the expected annual return and `years` the horizon; both are
/// converted to monthly terms inside the formula. The present value is
/// negated so the payment comes out positive whenever the target exceeds
/// what the current savings grow into on their own.
pub fn pmt(
    rate: impl Display,
    years: impl Display,
    present: impl Display,
    future: impl Display,
) -> String {
    format!("PMT({rate}/12,{years}*12,-{present},{future})")
}

/// Today's cost inflated over `years` at `rate`.
pub fn future_value(present: impl Display, rate: impl Display, years: impl Display) -> String {
    format!("{present}*(1+{rate})^{years}")
}

/// Compound annual growth rate, `(end/begin)^(1/years)-1`.
pub fn cagr(begin: impl Display, end: impl Display, years: impl Display) -> String {
    format!("({end}/{begin})^(1/{years})-1")
}

pub fn today() -> String {
    "TODAY()".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pmt_negates_present_value_with_literals() {
        assert_eq!(pmt(0.12, 10, 0, 1_000_000), "PMT(0.12/12,10*12,-0,1000000)");
    }

    #[test]
    fn pmt_keeps_operand_order_with_references() {
        assert_eq!(pmt("E5", "C5", "D5", "G5"), "PMT(E5/12,C5*12,-D5,G5)");
    }

    #[test]
    fn subtract_chains_every_term() {
        assert_eq!(subtract("B5", ["B6", "B7"]), "B5-B6-B7");
        assert_eq!(
            subtract("Assets!B23", ["Liabilities!B17"]),
            "Assets!B23-Liabilities!B17"
        );
    }

    #[test]
    fn subtract_without_terms_is_plain_reference() {
        assert_eq!(subtract("B5", Vec::<String>::new()), "B5");
    }

    #[test]
    fn ratio_is_guarded() {
        assert_eq!(ratio("B7", "B5"), "IFERROR(B7/B5,0)");
    }

    #[test]
    fn growth_formulas() {
        assert_eq!(future_value("B5", "F5", "C5"), "B5*(1+F5)^C5");
        assert_eq!(cagr("B16", "B17", "B18"), "(B17/B16)^(1/B18)-1");
        assert_eq!(sum("B5:B16"), "SUM(B5:B16)");
        assert_eq!(counta("Goals!A5:A14"), "COUNTA(Goals!A5:A14)");
        assert_eq!(today(), "TODAY()");
    }
}
