//! Specificity ranking of competing route matches.
//!
//! The length of the matched span is the proxy for specificity. A literal
//! `/persons/delete/1` outranks a broader pattern such as `/persons/[a-z]+`
//! on the path `/persons/delete/1` without any priority metadata.

use smallvec::SmallVec;

/// Inline capacity for per-request candidate lists.
pub const MAX_INLINE_CANDIDATES: usize = 8;

/// A registration paired with the span of the path it matched.
///
/// Lives only for the duration of one resolution.
#[derive(Debug)]
pub struct Matched<'a, T> {
    /// The matching registration
    pub item: &'a T,
    /// The longest span of the request path matched by the registration's pattern
    pub matched: &'a str,
}

impl<T> Clone for Matched<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Matched<'_, T> {}

impl<'a, T> Matched<'a, T> {
    /// Pair a registration with its matched span.
    #[must_use]
    pub fn new(item: &'a T, matched: &'a str) -> Self {
        Self { item, matched }
    }

    /// Specificity of this match (matched span length in bytes).
    #[inline]
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.matched.len()
    }
}

/// Stack-allocated candidate list for the dispatch path.
pub type CandidateVec<'a, T> = SmallVec<[Matched<'a, T>; MAX_INLINE_CANDIDATES]>;

/// Order candidates most specific first.
///
/// The sort is stable: candidates with equal specificity keep their
/// registration order.
pub fn rank_by_specificity<T>(candidates: &mut [Matched<'_, T>]) {
    candidates.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOW_ALL: &str = "/*";
    const ALLOW_PERS: &str = "/per";
    const PERSON: &str = "/persons/";
    const ADD_PERSON: &str = "/persons/add";
    const DELETE_PERSON: &str = "/persons/delete";
    const DELETE_PERSON_1: &str = "/persons/delete/1";

    fn ranked(spans: &[&'static str]) -> Vec<&'static str> {
        let ids: Vec<usize> = (0..spans.len()).collect();
        let mut candidates: Vec<Matched<'_, usize>> = ids
            .iter()
            .zip(spans)
            .map(|(id, span)| Matched::new(id, span))
            .collect();
        rank_by_specificity(&mut candidates);
        candidates.iter().map(|c| spans[*c.item]).collect()
    }

    #[test]
    fn test_longer_match_first() {
        assert_eq!(ranked(&[PERSON, ADD_PERSON]), vec![ADD_PERSON, PERSON]);
    }

    #[test]
    fn test_three_candidates() {
        assert_eq!(
            ranked(&[PERSON, ADD_PERSON, DELETE_PERSON]),
            vec![DELETE_PERSON, ADD_PERSON, PERSON]
        );
    }

    #[test]
    fn test_wildcards_rank_last() {
        assert_eq!(
            ranked(&[
                ALLOW_ALL,
                ALLOW_PERS,
                PERSON,
                ADD_PERSON,
                DELETE_PERSON,
                DELETE_PERSON_1
            ]),
            vec![
                DELETE_PERSON_1,
                DELETE_PERSON,
                ADD_PERSON,
                PERSON,
                ALLOW_PERS,
                ALLOW_ALL
            ]
        );
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let ids = [0usize, 1, 2];
        let mut candidates = vec![
            Matched::new(&ids[0], "/abc"),
            Matched::new(&ids[1], "/abcd"),
            Matched::new(&ids[2], "/xyz"),
        ];
        rank_by_specificity(&mut candidates);
        let order: Vec<usize> = candidates.iter().map(|c| *c.item).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_empty_is_noop() {
        let mut candidates: Vec<Matched<'_, ()>> = Vec::new();
        rank_by_specificity(&mut candidates);
        assert!(candidates.is_empty());
    }
}
