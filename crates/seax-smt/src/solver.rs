//! Term simplification and satisfiability checking.
//!
//! `simplify` is a bottom-up rewriting pass: constants fold, boolean
//! connectives flatten and drop units, duplicates and complementary pairs
//! collapse, double negation cancels and reflexive comparisons resolve.
//!
//! `check_sat` decides satisfiability of the propositional abstraction of
//! a boolean term: theory atoms (comparisons and non-boolean symbols) are
//! treated as opaque propositions and assignments are searched with
//! three-valued early pruning. Simplification runs first so ground atoms
//! fold away. The abstraction over-approximates satisfiability, which
//! keeps path pruning conservative: an infeasible path may survive, a
//! feasible one is never dropped.

use crate::term::Term;

/// Atom budget for the assignment search; beyond it the term is assumed
/// satisfiable.
const MAX_ATOMS: usize = 20;

/// Simplifies a term by rewriting.
pub fn simplify(term: &Term) -> Term {
    match term {
        Term::BoolConst(_) | Term::IntConst(_) | Term::RealConst(_) | Term::Const { .. } => {
            term.clone()
        }
        Term::Not(t) => match simplify(t) {
            Term::BoolConst(b) => Term::BoolConst(!b),
            Term::Not(inner) => *inner,
            other => Term::Not(Box::new(other)),
        },
        Term::And(ts) => simplify_connective(ts, true),
        Term::Or(ts) => simplify_connective(ts, false),
        Term::Add(ts) => simplify_nary_arith(ts, true),
        Term::Mul(ts) => simplify_nary_arith(ts, false),
        Term::Sub(a, b) => {
            let a = simplify(a);
            let b = simplify(b);
            match (&a, &b) {
                (Term::IntConst(x), Term::IntConst(y)) => Term::IntConst(x - y),
                (Term::RealConst(x), Term::RealConst(y)) => Term::RealConst(x - y),
                _ => Term::Sub(Box::new(a), Box::new(b)),
            }
        }
        Term::Div(a, b) => {
            let a = simplify(a);
            let b = simplify(b);
            match (&a, &b) {
                // Division by zero stays symbolic.
                (Term::IntConst(x), Term::IntConst(y)) if *y != 0 => Term::IntConst(x / y),
                (Term::RealConst(x), Term::RealConst(y)) if *y != 0.0 => Term::RealConst(x / y),
                _ => Term::Div(Box::new(a), Box::new(b)),
            }
        }
        Term::Eq(a, b) => simplify_comparison(a, b, CmpKind::Eq),
        Term::Ne(a, b) => simplify_comparison(a, b, CmpKind::Ne),
        Term::Gt(a, b) => simplify_comparison(a, b, CmpKind::Gt),
        Term::Ge(a, b) => simplify_comparison(a, b, CmpKind::Ge),
        Term::Lt(a, b) => simplify_comparison(a, b, CmpKind::Lt),
        Term::Le(a, b) => simplify_comparison(a, b, CmpKind::Le),
    }
}

/// Whether a simplified boolean term is satisfiable.
pub fn check_sat(term: &Term) -> bool {
    let simplified = simplify(term);
    let mut atoms = Vec::new();
    collect_atoms(&simplified, &mut atoms);
    if atoms.len() > MAX_ATOMS {
        return true;
    }
    let mut env = vec![None; atoms.len()];
    search(&simplified, &atoms, &mut env)
}

fn simplify_connective(args: &[Term], is_and: bool) -> Term {
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        match simplify(arg) {
            Term::And(inner) if is_and => flat.extend(inner),
            Term::Or(inner) if !is_and => flat.extend(inner),
            // The unit of the connective drops out.
            Term::BoolConst(b) if b == is_and => {}
            // The annihilator decides the whole connective.
            Term::BoolConst(_) => return Term::BoolConst(!is_and),
            other => flat.push(other),
        }
    }

    let mut kept: Vec<Term> = Vec::with_capacity(flat.len());
    for arg in flat {
        if kept.contains(&arg) {
            continue;
        }
        let complement = match &arg {
            Term::Not(inner) => (**inner).clone(),
            other => Term::Not(Box::new(other.clone())),
        };
        if kept.contains(&complement) {
            return Term::BoolConst(!is_and);
        }
        kept.push(arg);
    }

    match kept.len() {
        0 => Term::BoolConst(is_and),
        1 => kept.swap_remove(0),
        _ if is_and => Term::And(kept),
        _ => Term::Or(kept),
    }
}

fn simplify_nary_arith(args: &[Term], is_add: bool) -> Term {
    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        match simplify(arg) {
            Term::Add(inner) if is_add => flat.extend(inner),
            Term::Mul(inner) if !is_add => flat.extend(inner),
            other => flat.push(other),
        }
    }

    if flat.iter().all(|t| matches!(t, Term::IntConst(_))) {
        let fold = |acc: i64, t: &Term| match t {
            Term::IntConst(v) => {
                if is_add {
                    acc + v
                } else {
                    acc * v
                }
            }
            _ => unreachable!(),
        };
        let init = if is_add { 0 } else { 1 };
        return Term::IntConst(flat.iter().fold(init, fold));
    }

    if flat.iter().all(|t| matches!(t, Term::RealConst(_))) {
        let fold = |acc: f64, t: &Term| match t {
            Term::RealConst(v) => {
                if is_add {
                    acc + v
                } else {
                    acc * v
                }
            }
            _ => unreachable!(),
        };
        let init = if is_add { 0.0 } else { 1.0 };
        return Term::RealConst(flat.iter().fold(init, fold));
    }

    match flat.len() {
        1 => flat.swap_remove(0),
        _ if is_add => Term::Add(flat),
        _ => Term::Mul(flat),
    }
}

#[derive(Clone, Copy)]
enum CmpKind {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

fn simplify_comparison(lhs: &Term, rhs: &Term, kind: CmpKind) -> Term {
    use std::cmp::Ordering;

    let lhs = simplify(lhs);
    let rhs = simplify(rhs);

    let ordering = match (&lhs, &rhs) {
        (Term::IntConst(a), Term::IntConst(b)) => Some(a.cmp(b)),
        (Term::RealConst(a), Term::RealConst(b)) => a.partial_cmp(b),
        (Term::BoolConst(a), Term::BoolConst(b)) => Some(a.cmp(b)),
        _ => None,
    };
    if let Some(ordering) = ordering {
        let holds = match kind {
            CmpKind::Eq => ordering == Ordering::Equal,
            CmpKind::Ne => ordering != Ordering::Equal,
            CmpKind::Gt => ordering == Ordering::Greater,
            CmpKind::Ge => ordering != Ordering::Less,
            CmpKind::Lt => ordering == Ordering::Less,
            CmpKind::Le => ordering != Ordering::Greater,
        };
        return Term::BoolConst(holds);
    }
    if lhs == rhs {
        return Term::BoolConst(matches!(kind, CmpKind::Eq | CmpKind::Ge | CmpKind::Le));
    }

    let l = Box::new(lhs);
    let r = Box::new(rhs);
    match kind {
        CmpKind::Eq => Term::Eq(l, r),
        CmpKind::Ne => Term::Ne(l, r),
        CmpKind::Gt => Term::Gt(l, r),
        CmpKind::Ge => Term::Ge(l, r),
        CmpKind::Lt => Term::Lt(l, r),
        CmpKind::Le => Term::Le(l, r),
    }
}

/// Collects the distinct theory atoms of a boolean term.
fn collect_atoms(term: &Term, out: &mut Vec<Term>) {
    match term {
        Term::BoolConst(_) => {}
        Term::Not(t) => collect_atoms(t, out),
        Term::And(ts) | Term::Or(ts) => {
            for t in ts {
                collect_atoms(t, out);
            }
        }
        atom => {
            if !out.contains(atom) {
                out.push(atom.clone());
            }
        }
    }
}

/// Three-valued evaluation under a partial atom assignment.
fn eval(term: &Term, atoms: &[Term], env: &[Option<bool>]) -> Option<bool> {
    match term {
        Term::BoolConst(b) => Some(*b),
        Term::Not(t) => eval(t, atoms, env).map(|b| !b),
        Term::And(ts) => {
            let mut all_true = true;
            for t in ts {
                match eval(t, atoms, env) {
                    Some(false) => return Some(false),
                    Some(true) => {}
                    None => all_true = false,
                }
            }
            if all_true {
                Some(true)
            } else {
                None
            }
        }
        Term::Or(ts) => {
            let mut all_false = true;
            for t in ts {
                match eval(t, atoms, env) {
                    Some(true) => return Some(true),
                    Some(false) => {}
                    None => all_false = false,
                }
            }
            if all_false {
                Some(false)
            } else {
                None
            }
        }
        atom => {
            let index = atoms.iter().position(|a| a == atom)?;
            env[index]
        }
    }
}

/// Backtracking search over atom assignments.
fn search(term: &Term, atoms: &[Term], env: &mut Vec<Option<bool>>) -> bool {
    match eval(term, atoms, env) {
        Some(result) => result,
        None => {
            let index = match env.iter().position(|slot| slot.is_none()) {
                Some(index) => index,
                None => return false,
            };
            for guess in [true, false] {
                env[index] = Some(guess);
                if search(term, atoms, env) {
                    env[index] = None;
                    return true;
                }
            }
            env[index] = None;
            false
        }
    }
}
