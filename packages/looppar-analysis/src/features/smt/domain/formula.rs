//! Quantifier-free integer formulas

use std::collections::BTreeSet;
use std::fmt;

/// Integer term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Const(i64),
    Var(String),
    Add(Box<Term>, Box<Term>),
    Sub(Box<Term>, Box<Term>),
    Mul(Box<Term>, Box<Term>),
}

impl Term {
    pub fn int(value: i64) -> Self {
        Term::Const(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(lhs: Term, rhs: Term) -> Self {
        Term::Add(Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(lhs: Term, rhs: Term) -> Self {
        Term::Sub(Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(lhs: Term, rhs: Term) -> Self {
        Term::Mul(Box::new(lhs), Box::new(rhs))
    }

    fn collect_vars<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Term::Const(_) => {}
            Term::Var(name) => {
                out.insert(name);
            }
            Term::Add(a, b) | Term::Sub(a, b) | Term::Mul(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Const(v) => write!(f, "{}", v),
            Term::Var(name) => write!(f, "{}", name),
            Term::Add(a, b) => write!(f, "(+ {} {})", a, b),
            Term::Sub(a, b) => write!(f, "(- {} {})", a, b),
            Term::Mul(a, b) => write!(f, "(* {} {})", a, b),
        }
    }
}

/// Boolean combination of integer comparisons
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    Eq(Term, Term),
    Ne(Term, Term),
    Le(Term, Term),
    Ge(Term, Term),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Not(Box<Formula>),
}

impl Formula {
    /// Conjunction; the empty conjunction is `True`
    pub fn and(parts: Vec<Formula>) -> Self {
        let mut parts: Vec<Formula> = parts.into_iter().filter(|p| *p != Formula::True).collect();
        if parts.iter().any(|p| *p == Formula::False) {
            return Formula::False;
        }
        match parts.len() {
            0 => Formula::True,
            1 => parts.remove(0),
            _ => Formula::And(parts),
        }
    }

    /// Disjunction; the empty disjunction is `False`
    pub fn or(parts: Vec<Formula>) -> Self {
        let mut parts: Vec<Formula> = parts.into_iter().filter(|p| *p != Formula::False).collect();
        if parts.iter().any(|p| *p == Formula::True) {
            return Formula::True;
        }
        match parts.len() {
            0 => Formula::False,
            1 => parts.remove(0),
            _ => Formula::Or(parts),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    /// Free variable names, sorted
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Eq(a, b) | Formula::Ne(a, b) | Formula::Le(a, b) | Formula::Ge(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Formula::And(parts) | Formula::Or(parts) => {
                for p in parts {
                    p.collect_vars(out);
                }
            }
            Formula::Not(inner) => inner.collect_vars(out),
        }
    }

    /// Number of nodes, for logging
    pub fn size(&self) -> usize {
        match self {
            Formula::And(parts) | Formula::Or(parts) => {
                1 + parts.iter().map(Formula::size).sum::<usize>()
            }
            Formula::Not(inner) => 1 + inner.size(),
            _ => 1,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |f: &mut fmt::Formatter<'_>, op: &str, parts: &[Formula]| {
            write!(f, "({}", op)?;
            for p in parts {
                write!(f, " {}", p)?;
            }
            write!(f, ")")
        };
        match self {
            Formula::True => write!(f, "true"),
            Formula::False => write!(f, "false"),
            Formula::Eq(a, b) => write!(f, "(= {} {})", a, b),
            Formula::Ne(a, b) => write!(f, "(distinct {} {})", a, b),
            Formula::Le(a, b) => write!(f, "(<= {} {})", a, b),
            Formula::Ge(a, b) => write!(f, "(>= {} {})", a, b),
            Formula::And(parts) => list(f, "and", parts),
            Formula::Or(parts) => list(f, "or", parts),
            Formula::Not(inner) => write!(f, "(not {})", inner),
        }
    }
}
