use std::str::FromStr;

use p3_field::{Field, PrimeField64};
use pest::iterators::Pair;
use pest::Parser;

use super::{check_arity, Oracle, MAX_DEGREE};
use crate::Error;

/// `coeff * prod_i x_i^exponents[i]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term<F> {
    pub coeff: F,
    pub exponents: Vec<usize>,
}

/// Polynomial given as a list of monomials. The per-variable degree is read
/// off the exponents, so the sampling width can be derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparsePolynomial<F> {
    arity: usize,
    terms: Vec<Term<F>>,
}

fn check_exponent(exp: usize) -> Result<usize, Error> {
    if exp > MAX_DEGREE {
        return Err(Error::DegreeLimit {
            max: MAX_DEGREE,
            got: exp,
        });
    }
    Ok(exp)
}

impl<F: Field> SparsePolynomial<F> {
    /// Every exponent vector must have exactly `arity` entries.
    pub fn new(
        arity: usize,
        terms: impl IntoIterator<Item = (F, Vec<usize>)>,
    ) -> Result<Self, Error> {
        check_arity(arity)?;
        let terms = terms
            .into_iter()
            .map(|(coeff, exponents)| {
                if exponents.len() != arity {
                    return Err(Error::Arity {
                        expected: arity,
                        got: exponents.len(),
                    });
                }
                exponents.iter().try_for_each(|&e| check_exponent(e).map(drop))?;
                Ok(Term { coeff, exponents })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { arity, terms })
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.terms
    }

    /// Parses text such as `2*x1 + 3*x2*x3 - x4^2 + 7`. Variables are
    /// 1-indexed. When `arity` is given it must cover every variable used;
    /// otherwise the highest index decides.
    pub fn parse(text: &str, arity: Option<usize>) -> Result<Self, Error> {
        let monomials = monomials::<F>(text)?;

        let used = monomials
            .iter()
            .flat_map(|(_, powers)| powers.iter().map(|&(var, _)| var + 1))
            .max()
            .unwrap_or(0);
        let arity = match arity {
            Some(arity) => {
                check_arity(arity)?;
                if arity < used {
                    return Err(Error::Arity {
                        expected: arity,
                        got: used,
                    });
                }
                arity
            }
            None => used,
        };

        let terms = monomials
            .into_iter()
            .map(|(coeff, powers)| {
                let mut exponents = vec![0; arity];
                for (var, exp) in powers {
                    exponents[var] = check_exponent(exponents[var].saturating_add(exp))?;
                }
                Ok(Term { coeff, exponents })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self { arity, terms })
    }
}

impl<F: Field> FromStr for SparsePolynomial<F> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl<F: Field> Oracle<F> for SparsePolynomial<F> {
    fn arity(&self) -> usize {
        self.arity
    }

    fn degree(&self) -> usize {
        self.terms
            .iter()
            .flat_map(|term| term.exponents.iter().copied())
            .max()
            .unwrap_or(0)
    }

    fn eval(&self, point: &[F]) -> F {
        self.terms
            .iter()
            .map(|term| {
                term.exponents
                    .iter()
                    .zip(point.iter())
                    .filter(|(&e, _)| e != 0)
                    .fold(term.coeff, |acc, (&e, &x)| acc * x.exp_u64(e as u64))
            })
            .sum()
    }
}

impl<F: PrimeField64> std::fmt::Display for SparsePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            let coeff = crate::field::to_i128(term.coeff);
            match (i, coeff < 0) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }
            let vars = term
                .exponents
                .iter()
                .enumerate()
                .filter(|(_, &e)| e != 0)
                .map(|(var, &e)| match e {
                    1 => format!("x{}", var + 1),
                    _ => format!("x{}^{}", var + 1, e),
                })
                .collect::<Vec<_>>();
            let magnitude = coeff.unsigned_abs();
            match (magnitude, vars.is_empty()) {
                (_, true) => write!(f, "{magnitude}")?,
                (1, false) => write!(f, "{}", vars.join("*"))?,
                (_, false) => write!(f, "{magnitude}*{}", vars.join("*"))?,
            }
        }
        Ok(())
    }
}

#[derive(pest_derive::Parser)]
#[grammar = "oracle/polynomial.pest"]
struct PolynomialParser;

/// Coefficient and `(variable, exponent)` factors, variables 0-indexed.
type Monomial<F> = (F, Vec<(usize, usize)>);

fn number<T: FromStr>(pair: &Pair<Rule>) -> Result<T, Error> {
    pair.as_str().parse().map_err(|_| {
        Error::Parse(format!(
            "number {} out of range at offset {}",
            pair.as_str(),
            pair.as_span().start()
        ))
    })
}

fn monomials<F: Field>(text: &str) -> Result<Vec<Monomial<F>>, Error> {
    let poly = PolynomialParser::parse(Rule::poly, text)
        .map_err(|e| Error::Parse(e.variant.message().to_string() + &at(e.location)))?
        .next()
        .ok_or_else(|| Error::Parse("empty input".to_string()))?;

    let mut negative = false;
    let mut monomials = vec![];
    for pair in poly.into_inner() {
        match pair.as_rule() {
            Rule::sign => negative = pair.as_str() == "-",
            Rule::term => {
                let (coeff, powers) = term::<F>(pair)?;
                monomials.push((if negative { -coeff } else { coeff }, powers));
            }
            Rule::EOI => {}
            rule => return Err(Error::Parse(format!("unexpected {rule:?}"))),
        }
    }
    Ok(monomials)
}

fn at(location: pest::error::InputLocation) -> String {
    match location {
        pest::error::InputLocation::Pos(pos) => format!(" at offset {pos}"),
        pest::error::InputLocation::Span((start, _)) => format!(" at offset {start}"),
    }
}

fn term<F: Field>(pair: Pair<Rule>) -> Result<Monomial<F>, Error> {
    let mut coeff = F::ONE;
    let mut powers = vec![];
    for factor in pair.into_inner() {
        let mut inner = factor.into_inner();
        let Some(base) = inner.next() else {
            return Err(Error::Parse("empty factor".to_string()));
        };
        match base.as_rule() {
            Rule::number => coeff *= F::from_u64(number(&base)?),
            Rule::var => {
                let offset = base.as_span().start();
                let index: usize = base.as_str()[1..].parse().map_err(|_| {
                    Error::Parse(format!("variable index out of range at offset {offset}"))
                })?;
                if index == 0 {
                    return Err(Error::Parse(format!(
                        "variables are numbered from x1, at offset {offset}"
                    )));
                }
                check_arity(index)?;
                let exp = match inner.next() {
                    Some(exp) => check_exponent(number(&exp)?)?,
                    None => 1,
                };
                powers.push((index - 1, exp));
            }
            rule => return Err(Error::Parse(format!("unexpected {rule:?}"))),
        }
    }
    Ok((coeff, powers))
}

#[cfg(test)]
mod test {
    use super::SparsePolynomial;
    use crate::field::from_i64;
    use crate::oracle::{Oracle, MAX_ARITY, MAX_DEGREE};
    use crate::Error;
    use p3_field::PrimeCharacteristicRing;
    use p3_goldilocks::Goldilocks;

    type F = Goldilocks;

    fn ints(values: &[i64]) -> Vec<F> {
        values.iter().map(|&v| from_i64(v)).collect()
    }

    #[test]
    fn test_parse_reference_polynomial() {
        let parsed: SparsePolynomial<F> = "2*x1 + 3*x2*x3 + x4".parse().unwrap();
        let built = SparsePolynomial::new(
            4,
            [
                (F::TWO, vec![1, 0, 0, 0]),
                (F::from_u64(3), vec![0, 1, 1, 0]),
                (F::ONE, vec![0, 0, 0, 1]),
            ],
        )
        .unwrap();
        assert_eq!(parsed, built);
        assert_eq!(parsed.arity(), 4);
        assert_eq!(parsed.degree(), 1);
        assert_eq!(parsed.to_string(), "2*x1 + 3*x2*x3 + x4");

        // 2*5 + 3*7*11 + 13
        let v = parsed.evaluate(&ints(&[5, 7, 11, 13])).unwrap();
        assert_eq!(v, F::from_u64(10 + 231 + 13));
    }

    #[test]
    fn test_parse_signs_powers_and_constants() {
        let p = SparsePolynomial::<F>::parse("-x1^3*x2 + 4 - 2*x3*x3", Some(5)).unwrap();
        assert_eq!(p.arity(), 5);
        assert_eq!(p.degree(), 3);
        assert_eq!(p.to_string(), "-x1^3*x2 + 4 - 2*x3^2");
        // -(8 * 3) + 4 - 2 * 25
        let v = p.evaluate(&ints(&[2, 3, 5, 0, 0])).unwrap();
        assert_eq!(v, from_i64(-24 + 4 - 50));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "2*", "x0", "x1 +", "x1 ** x2", "3 x1", "y1", "x1^"] {
            assert!(
                matches!(SparsePolynomial::<F>::parse(bad, None), Err(Error::Parse(_))),
                "{bad:?} must not parse"
            );
        }
        assert_eq!(
            SparsePolynomial::<F>::parse("x1 + x3", Some(2)),
            Err(Error::Arity {
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn test_new_rejects_wrong_exponent_length() {
        assert!(matches!(
            SparsePolynomial::new(3, [(F::ONE, vec![1, 0])]),
            Err(Error::Arity { expected: 3, .. })
        ));
    }

    #[test]
    fn test_oversized_input_fails_fast() {
        let parse = |text: &str| SparsePolynomial::<F>::parse(text, None);

        for text in ["x18446744073709551615", "x4000000000", "x1 + x64"] {
            assert!(
                matches!(parse(text), Err(Error::ArityLimit { max: MAX_ARITY, .. })),
                "{text:?}"
            );
        }
        assert!(matches!(
            SparsePolynomial::<F>::parse("x1", Some(1 << 40)),
            Err(Error::ArityLimit { .. })
        ));
        assert!(parse("x63").is_ok());

        assert_eq!(
            parse("x1^18446744073709551615"),
            Err(Error::DegreeLimit {
                max: MAX_DEGREE,
                got: usize::MAX
            })
        );
        for text in [
            "x99999999999999999999999",
            "x1^99999999999999999999999",
            "99999999999999999999*x1",
        ] {
            assert!(matches!(parse(text), Err(Error::Parse(_))), "{text:?}");
        }

        assert!(matches!(
            SparsePolynomial::new(1, [(F::ONE, vec![usize::MAX])]),
            Err(Error::DegreeLimit { .. })
        ));
        assert!(matches!(
            SparsePolynomial::<F>::new(MAX_ARITY + 1, []),
            Err(Error::ArityLimit { .. })
        ));
    }

    #[test]
    fn test_parse_error_reports_offset() {
        let Err(Error::Parse(msg)) = SparsePolynomial::<F>::parse("x1 + * x2", None) else {
            panic!("malformed input must not parse");
        };
        assert!(msg.contains("at offset"), "{msg}");
    }
}
