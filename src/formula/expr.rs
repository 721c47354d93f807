use crate::{
    errors::TemplateResult,
    layout::{Anchor, Position, Span},
};

/// Turns symbolic references into reference text for a given formula position.
pub trait Resolver {
    fn cell(&self, anchor: &Anchor, at: Position) -> TemplateResult<String>;
    fn range(&self, span: &Span, at: Position) -> TemplateResult<String>;
}

/// Symbolic formula. Coordinates are only known once a [`Resolver`] places it.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Reference(Anchor),
    Sum(Span),
    Difference {
        minuend: Anchor,
        subtrahends: Vec<Anchor>,
    },
    Ratio {
        numerator: Anchor,
        denominator: Anchor,
    },
    CountA(Span),
    Pmt {
        rate: Anchor,
        years: Anchor,
        present: Anchor,
        future: Anchor,
    },
    FutureValue {
        present: Anchor,
        rate: Anchor,
        years: Anchor,
    },
    Cagr {
        begin: Anchor,
        end: Anchor,
        years: Anchor,
    },
    Today,
}

impl Formula {
    pub fn difference(minuend: Anchor, subtrahends: impl IntoIterator<Item = Anchor>) -> Self {
        Formula::Difference {
            minuend,
            subtrahends: subtrahends.into_iter().collect(),
        }
    }

    pub fn ratio(numerator: Anchor, denominator: Anchor) -> Self {
        Formula::Ratio {
            numerator,
            denominator,
        }
    }

    pub fn render(&self, resolver: &impl Resolver, at: Position) -> TemplateResult<String> {
        let cell = |anchor: &Anchor| resolver.cell(anchor, at);
        let formula = match self {
            Formula::Reference(anchor) => cell(anchor)?,
            Formula::Sum(span) => super::sum(resolver.range(span, at)?),
            Formula::Difference {
                minuend,
                subtrahends,
            } => {
                let terms = subtrahends
                    .iter()
                    .map(cell)
                    .collect::<TemplateResult<Vec<_>>>()?;
                super::subtract(cell(minuend)?, terms)
            }
            Formula::Ratio {
                numerator,
                denominator,
            } => super::ratio(cell(numerator)?, cell(denominator)?),
            Formula::CountA(span) => super::counta(resolver.range(span, at)?),
            Formula::Pmt {
                rate,
                years,
                present,
                future,
            } => super::pmt(cell(rate)?, cell(years)?, cell(present)?, cell(future)?),
            Formula::FutureValue {
                present,
                rate,
                years,
            } => super::future_value(cell(present)?, cell(rate)?, cell(years)?),
            Formula::Cagr { begin, end, years } => {
                super::cagr(cell(begin)?, cell(end)?, cell(years)?)
            }
            Formula::Today => super::today(),
        };
        Ok(formula)
    }
}
