//! Comparison semantics: three-way compares and branch conditions.

use std::cmp::Ordering;

use opsem_common::Reference;

/// What a three-way float compare yields when either operand is NaN.
///
/// `Greater` is the `fcmpg`/`dcmpg` variant: a following "less than" test
/// sees NaN as false. `Less` is the `fcmpl`/`dcmpl` variant: a following
/// "greater than" test sees NaN as false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanPolicy {
    Greater,
    Less,
}

impl NanPolicy {
    fn ordering(self) -> Ordering {
        match self {
            NanPolicy::Greater => Ordering::Greater,
            NanPolicy::Less => Ordering::Less,
        }
    }
}

/// Relation tested by a conditional branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl Condition {
    /// Whether an ordering satisfies this relation.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Condition::Eq => ordering == Ordering::Equal,
            Condition::Ne => ordering != Ordering::Equal,
            Condition::Lt => ordering == Ordering::Less,
            Condition::Ge => ordering != Ordering::Less,
            Condition::Gt => ordering == Ordering::Greater,
            Condition::Le => ordering != Ordering::Greater,
        }
    }
}

/// Signed 64-bit three-way compare (`lcmp`).
pub fn long_cmp(a: i64, b: i64) -> Ordering {
    a.cmp(&b)
}

/// IEEE three-way compare with an explicit NaN policy. `-0.0` and `0.0`
/// compare equal.
pub fn float_cmp<F: PartialOrd>(a: F, b: F, nan: NanPolicy) -> Ordering {
    a.partial_cmp(&b).unwrap_or(nan.ordering())
}

/// The int a three-way compare pushes: -1, 0 or 1.
pub fn ordering_value(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// `if_icmp<cond>`: signed compare of two ints.
pub fn int_compare(cond: Condition, a: i32, b: i32) -> bool {
    cond.holds(a.cmp(&b))
}

/// `if<cond>`: signed compare of an int against zero.
pub fn int_test(cond: Condition, a: i32) -> bool {
    int_compare(cond, a, 0)
}

/// `if_acmpeq`: identity, never contents.
pub fn same_reference(a: &Reference, b: &Reference) -> bool {
    a.same_as(b)
}

/// `ifnull`.
pub fn is_null(r: &Reference) -> bool {
    r.is_null()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_compare() {
        assert_eq!(long_cmp(1, 2), Ordering::Less);
        assert_eq!(long_cmp(i64::MIN, i64::MAX), Ordering::Less);
        assert_eq!(long_cmp(5, 5), Ordering::Equal);
        assert_eq!(ordering_value(long_cmp(2, -2)), 1);
    }

    #[test]
    fn nan_policies_are_distinct() {
        let nan = 0.0f32 / 0.0;
        assert_eq!(float_cmp(nan, 1.0, NanPolicy::Greater), Ordering::Greater);
        assert_eq!(float_cmp(nan, 1.0, NanPolicy::Less), Ordering::Less);
        assert_eq!(float_cmp(1.0, f64::NAN, NanPolicy::Greater), Ordering::Greater);
        assert_eq!(float_cmp(f64::NAN, f64::NAN, NanPolicy::Less), Ordering::Less);
    }

    #[test]
    fn signed_zeros_compare_equal() {
        assert_eq!(float_cmp(-0.0f64, 0.0, NanPolicy::Less), Ordering::Equal);
    }

    #[test]
    fn infinities_order_normally() {
        assert_eq!(
            float_cmp(f32::NEG_INFINITY, f32::MIN, NanPolicy::Greater),
            Ordering::Less
        );
        assert_eq!(
            float_cmp(f64::INFINITY, f64::INFINITY, NanPolicy::Less),
            Ordering::Equal
        );
    }

    #[test]
    fn conditions() {
        assert!(int_compare(Condition::Eq, 3, 3));
        assert!(int_compare(Condition::Ne, 3, 4));
        assert!(int_compare(Condition::Lt, -10, -5));
        assert!(int_compare(Condition::Ge, 5, 5));
        assert!(int_compare(Condition::Gt, 1, -1));
        assert!(!int_compare(Condition::Le, 1, -1));
        assert!(int_test(Condition::Le, 0));
        assert!(int_test(Condition::Lt, i32::MIN));
        assert!(!int_test(Condition::Gt, 0));
    }

    #[test]
    fn nan_falsifies_the_intended_branch() {
        // `a < b` compiles to fcmpg + ifge (skip when not less).
        let ord = float_cmp(f32::NAN, 1.0, NanPolicy::Greater);
        assert!(int_test(Condition::Ge, ordering_value(ord)));
        // `a > b` compiles to fcmpl + ifle.
        let ord = float_cmp(f32::NAN, 1.0, NanPolicy::Less);
        assert!(int_test(Condition::Le, ordering_value(ord)));
    }

    #[test]
    fn references_by_identity() {
        let a = Reference::string("hello");
        let b = Reference::string("hello");
        assert!(same_reference(&a, &a.clone()));
        assert!(!same_reference(&a, &b));
        assert!(same_reference(&Reference::null(), &Reference::null()));
        assert!(is_null(&Reference::null()));
        assert!(!is_null(&a));
    }
}
