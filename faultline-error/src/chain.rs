//! Helpers for walking cause chains
//!
//! Everything here works on `&(dyn std::error::Error + 'static)` and only
//! relies on `source()`, so chains mixing faultline errors with foreign
//! errors are handled the same way.
//!
//! Chains built by this crate cannot be cyclic because every error owns its
//! cause. A foreign error whose `source()` eventually returns itself would
//! make these walks loop forever.

use crate::stacktrace::Stacktrace;
use crate::{Error, ErrorCode};
use std::error::Error as StdError;

/// Iterator over an error and all of its causes, outermost first
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Iterate over `err` and every error reachable through `source()`.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Return the immediate cause of `err`, if any.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Follow causes to the end of the chain.
///
/// Returns `err` itself when it has no cause.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    chain(err).last().unwrap_or(err)
}

/// Check whether any faultline error in the chain carries `code`.
pub fn has_code(err: &(dyn StdError + 'static), code: impl AsRef<str>) -> bool {
    let code = code.as_ref();
    chain(err)
        .filter_map(|link| link.downcast_ref::<Error>())
        .any(|link| link.code().as_str() == code)
}

/// Check whether any link of the chain matches `target` by code.
pub fn chain_matches(err: &(dyn StdError + 'static), target: &Error) -> bool {
    chain(err).any(|link| target.matches(Some(link)))
}

/// Find the first error of type `T` in the chain, `err` itself included.
pub fn find<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    chain(err).find_map(|link| link.downcast_ref::<T>())
}

/// Wrap `cause` with a new code and message, capturing the caller's stack.
///
/// Same as [`Error::wrap`].
#[inline(never)]
pub fn wrap(
    cause: impl Into<anyhow::Error>,
    code: impl Into<ErrorCode>,
    message: impl Into<String>,
) -> Error {
    Error::wrapped(cause.into(), code, message, Stacktrace::capture(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Native(&'static str);

    impl fmt::Display for Native {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Native {}

    /// Foreign error that wraps another error
    #[derive(Debug)]
    struct Foreign(Error);

    impl fmt::Display for Foreign {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "foreign: {}", self.0)
        }
    }

    impl StdError for Foreign {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    fn three_deep() -> Error {
        let inner = wrap(Native("disk full"), "A", "m1");
        let middle = wrap(inner, "B", "m2");
        wrap(middle, "C", "m3")
    }

    #[test]
    fn test_root_cause() {
        let err = wrap(wrap(Native("native"), "A", "m1"), "B", "m2");
        let root = root_cause(&err);
        assert_eq!(root.to_string(), "native");
        assert!(root.downcast_ref::<Native>().is_some());
    }

    #[test]
    fn test_root_cause_without_cause_is_self() {
        let err = Error::new("X", "alone");
        let root = root_cause(&err);
        assert_eq!(root.to_string(), "[X]: alone");

        let native = Native("plain");
        assert_eq!(root_cause(&native).to_string(), "plain");
    }

    #[test]
    fn test_root_cause_through_foreign_link() {
        let err = Foreign(Error::wrap(Native("bottom"), "A", "m"));
        assert_eq!(root_cause(&err).to_string(), "bottom");
    }

    fn deepest(err: &Error) -> &(dyn StdError + 'static) {
        root_cause(err)
    }

    #[test]
    fn test_results_borrow_from_input() {
        let err = three_deep();
        let root = deepest(&err);
        let native = find::<Native>(&err);
        let first = unwrap(&err);
        let links = chain(&err).count();

        assert_eq!(root.to_string(), "disk full");
        assert_eq!(native.map(|e| e.0), Some("disk full"));
        assert_eq!(first.map(|e| e.to_string()), Some("[B]: m2".to_string()));
        assert_eq!(links, 4);
    }

    #[test]
    fn test_has_code() {
        let err = three_deep();
        assert!(has_code(&err, "A"));
        assert!(has_code(&err, "B"));
        assert!(has_code(&err, "C"));
        assert!(!has_code(&err, "NON_EXISTENT"));
        assert!(!has_code(&Native("x"), "A"));
    }

    #[test]
    fn test_has_code_across_foreign_link() {
        let err = wrap(Foreign(Error::new("INNER", "m")), "OUTER", "m");
        assert!(has_code(&err, "INNER"));
        assert!(has_code(&err, ErrorCode::from("OUTER")));
    }

    #[test]
    fn test_unwrap() {
        let err = wrap(Native("orig"), "A", "m");
        assert_eq!(unwrap(&err).map(|e| e.to_string()), Some("orig".to_string()));
        assert!(unwrap(&Error::new("A", "m")).is_none());
    }

    #[test]
    fn test_chain_order() {
        let err = three_deep();
        let links: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
        assert_eq!(links, vec!["[C]: m3", "[B]: m2", "[A]: m1", "disk full"]);
    }

    #[test]
    fn test_chain_matches() {
        let err = three_deep();
        assert!(chain_matches(&err, &Error::new("B", "other message")));
        assert!(!chain_matches(&err, &Error::new("Z", "m")));
    }

    #[test]
    fn test_find_includes_receiver() {
        let err = Error::new("X", "a");
        assert_eq!(find::<Error>(&err).map(|e| e.code().as_str()), Some("X"));

        let err = three_deep();
        assert_eq!(find::<Native>(&err).map(|e| e.0), Some("disk full"));
        assert!(find::<std::io::Error>(&err).is_none());
    }
}
