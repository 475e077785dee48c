use std::iter;

use super::galois::G;

// Polynomial
//------------------------------------------------------------------------------

// Coefficients are stored as exponents of the generator, highest degree first.
// None marks an absent term, which is distinct from a present term α^0 = 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly(Vec<Option<u8>>);

impl Poly {
    // Product of (x - α^i) for i in 0..ec_len
    pub fn generator(ec_len: usize) -> Self {
        if ec_len == 0 {
            return Self(Vec::new());
        }
        (1..ec_len).fold(Self(vec![Some(0), Some(0)]), |poly, i| {
            poly.mul(&Self(vec![Some(0), Some((i % 255) as u8)]))
        })
    }

    // Message polynomial shifted up by `shift` degrees
    pub fn from_codewords(codewords: &[u8], shift: usize) -> Self {
        let terms = codewords.iter().map(|&c| G(c).log()).chain(iter::repeat(None).take(shift));
        Self(terms.collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn terms(&self) -> &[Option<u8>] {
        &self.0
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        if self.is_empty() || rhs.is_empty() {
            return Self(Vec::new());
        }
        let mut res = vec![None; self.len() + rhs.len() - 1];
        for (i, a) in self.0.iter().enumerate() {
            let Some(a) = a else { continue };
            for (j, b) in rhs.0.iter().enumerate() {
                let Some(b) = b else { continue };
                res[i + j] = add_terms(res[i + j], Some(mul_exps(*a, *b)));
            }
        }
        Self(res)
    }

    // Long division by a monic divisor. Returns the remainder as codewords, with
    // absent terms emitted as zero.
    pub fn rem(mut self, divisor: &Self) -> Vec<u8> {
        if divisor.is_empty() {
            return Vec::new();
        }
        let rem_len = divisor.len() - 1;
        debug_assert!(
            self.len() >= divisor.len(),
            "Dividend shorter than divisor: Dividend {}, Divisor {}",
            self.len(),
            divisor.len()
        );
        debug_assert!(
            self.0[self.len() - rem_len..].iter().all(Option::is_none),
            "Dividend has no placeholder terms for the remainder"
        );
        debug_assert_eq!(divisor.0[0], Some(0), "Divisor must be monic");

        let steps = self.len() - rem_len;
        for i in 0..steps {
            let Some(lead) = self.0[i] else { continue };
            for (j, d) in divisor.0.iter().enumerate() {
                let Some(d) = d else { continue };
                self.0[i + j] = add_terms(self.0[i + j], Some(mul_exps(lead, *d)));
            }
            debug_assert!(self.0[i].is_none(), "Lead term not cancelled at step {i}");
        }

        self.0[steps..].iter().map(|&t| term_value(t).into()).collect()
    }
}

fn mul_exps(a: u8, b: u8) -> u8 {
    ((a as usize + b as usize) % 255) as u8
}

fn term_value(term: Option<u8>) -> G {
    term.map_or(G(0), |e| G::gen_pow(e as usize))
}

fn add_terms(a: Option<u8>, b: Option<u8>) -> Option<u8> {
    (term_value(a) + term_value(b)).log()
}
