//! Integer polynomials with overflow-checked arithmetic
//!
//! Variables are dense indices handed out by the solver. A monomial is the
//! sorted list of its variable indices, repeated for powers; the constant
//! monomial is empty. Zero coefficients are never stored.

use std::collections::{BTreeMap, BTreeSet};

pub type VarIdx = usize;
pub type Monomial = Vec<VarIdx>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, i128>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(value: i128) -> Self {
        let mut p = Self::zero();
        p.accumulate(Vec::new(), value);
        p
    }

    pub fn var(v: VarIdx) -> Self {
        let mut p = Self::zero();
        p.accumulate(vec![v], 1);
        p
    }

    fn accumulate(&mut self, monomial: Monomial, coeff: i128) -> Option<()> {
        if coeff == 0 {
            return Some(());
        }
        let slot = self.terms.entry(monomial).or_insert(0);
        *slot = slot.checked_add(coeff)?;
        if *slot == 0 {
            self.terms.retain(|_, c| *c != 0);
        }
        Some(())
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, i128)> {
        self.terms.iter().map(|(m, c)| (m, *c))
    }

    pub fn coefficient(&self, monomial: &[VarIdx]) -> i128 {
        self.terms.get(monomial).copied().unwrap_or(0)
    }

    pub fn constant_term(&self) -> i128 {
        self.coefficient(&[])
    }

    /// Value when no variable occurs
    pub fn as_constant(&self) -> Option<i128> {
        if self.terms.keys().all(|m| m.is_empty()) {
            Some(self.constant_term())
        } else {
            None
        }
    }

    pub fn vars(&self) -> BTreeSet<VarIdx> {
        self.terms.keys().flatten().copied().collect()
    }

    pub fn is_linear(&self) -> bool {
        self.terms.keys().all(|m| m.len() <= 1)
    }

    /// Coefficient of `v` when `v` occurs only in the monomial `v` itself
    pub fn linear_coefficient(&self, v: VarIdx) -> Option<i128> {
        let mut coeff = None;
        for (m, c) in &self.terms {
            if !m.contains(&v) {
                continue;
            }
            if m.len() != 1 {
                return None;
            }
            coeff = Some(*c);
        }
        coeff
    }

    /// Gcd of the non-constant coefficients; 0 when there are none
    pub fn var_content(&self) -> i128 {
        self.terms
            .iter()
            .filter(|(m, _)| !m.is_empty())
            .fold(0, |g, (_, c)| gcd(g, *c))
    }

    pub fn checked_add(&self, other: &Poly) -> Option<Poly> {
        let mut out = self.clone();
        for (m, c) in &other.terms {
            out.accumulate(m.clone(), *c)?;
        }
        Some(out)
    }

    pub fn checked_sub(&self, other: &Poly) -> Option<Poly> {
        self.checked_add(&other.checked_scale(-1)?)
    }

    pub fn checked_scale(&self, k: i128) -> Option<Poly> {
        let mut out = Poly::zero();
        for (m, c) in &self.terms {
            out.accumulate(m.clone(), c.checked_mul(k)?)?;
        }
        Some(out)
    }

    pub fn checked_mul(&self, other: &Poly) -> Option<Poly> {
        let mut out = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                out.accumulate(merge(ma, mb), ca.checked_mul(*cb)?)?;
            }
        }
        Some(out)
    }

    /// Divides the variable coefficients by `g` and floors the constant.
    /// Exact for equalities whose constant is divisible by `g`, and a
    /// tightening for `p >= 0`.
    pub fn divide_floor(&self, g: i128) -> Poly {
        if g <= 1 {
            return self.clone();
        }
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let q = if m.is_empty() { c.div_euclid(g) } else { c / g };
                (m.clone(), q)
            })
            .filter(|(_, c)| *c != 0)
            .collect();
        Poly { terms }
    }

    /// Replaces every occurrence of `v` by `by`
    pub fn substitute(&self, v: VarIdx, by: &Poly) -> Option<Poly> {
        if !self.terms.keys().any(|m| m.contains(&v)) {
            return Some(self.clone());
        }
        let mut out = Poly::zero();
        for (m, c) in &self.terms {
            let power = m.iter().filter(|&&x| x == v).count();
            let rest: Monomial = m.iter().copied().filter(|&x| x != v).collect();
            let mut term = Poly::zero();
            term.accumulate(rest, *c)?;
            for _ in 0..power {
                term = term.checked_mul(by)?;
            }
            out = out.checked_add(&term)?;
        }
        Some(out)
    }

    /// Value under `values`; `None` when a variable is unassigned or on overflow
    pub fn eval(&self, values: &[Option<i128>]) -> Option<i128> {
        let mut sum: i128 = 0;
        for (m, c) in &self.terms {
            let mut prod = *c;
            for v in m {
                prod = prod.checked_mul(values.get(*v).copied().flatten()?)?;
            }
            sum = sum.checked_add(prod)?;
        }
        Some(sum)
    }
}

fn merge(a: &[VarIdx], b: &[VarIdx]) -> Monomial {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out.sort_unstable();
    out
}

pub fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `(g, s, t)` with `a*s + b*t = g = gcd(a, b)`
pub fn ext_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    let (mut old_r, mut r) = (a, b);
    let (mut old_s, mut s) = (1i128, 0i128);
    let (mut old_t, mut t) = (0i128, 1i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
        (old_t, t) = (t, old_t - q * t);
    }
    if old_r < 0 {
        (-old_r, -old_s, -old_t)
    } else {
        (old_r, old_s, old_t)
    }
}
