//! Property tests for output normalisation and exclusion monotonicity.

use std::collections::BTreeSet;

use proptest::prelude::*;
use pugjs_conformance::harness::strip_newlines;
use pugjs_conformance::prelude::*;

fn echo_runner(backends: &BTreeSet<String>) -> CaseRunner {
    let mut registry = BackendRegistry::new();
    for name in backends {
        registry.register(FnBackend::new(name.clone(), |source: &str, _: &str| {
            Ok(source.to_string())
        }));
    }
    CaseRunner::new(FixtureStore::new("unused"), registry)
}

fn pairs(generator: &CaseGenerator<'_>) -> BTreeSet<(String, String)> {
    generator
        .invocations()
        .map(|inv| (inv.backend().to_string(), inv.case().to_string()))
        .collect()
}

fn name() -> impl Strategy<Value = String> {
    "[a-c][a-c.-]{0,3}"
}

proptest! {
    #[test]
    fn surrounding_newlines_never_matter(
        body in "[^\n]([ -~\n]{0,40}[^\n])?",
        lead in 0usize..4,
        trail in 0usize..4,
    ) {
        let padded = format!("{}{}{}", "\n".repeat(lead), body, "\n".repeat(trail));
        let comparator = OutputComparator::new();
        prop_assert!(comparator.compare(&body, &padded).is_pass());
        prop_assert_eq!(strip_newlines(&padded), body.as_str());
    }

    #[test]
    fn one_interior_space_always_matters(
        left in "[a-z<>/]{1,10}",
        right in "[a-z<>/]{1,10}",
    ) {
        let expected = format!("{left}{right}");
        let actual = format!("{left} {right}");
        let result = OutputComparator::new().compare(&expected, &actual);
        let mismatch = result.mismatch().cloned();
        prop_assert!(mismatch.is_some());
        let mismatch = mismatch.unwrap();
        prop_assert_eq!(mismatch.first_diff_pos, Some(left.chars().count()));
        prop_assert_eq!(mismatch.actual_len(), mismatch.expected_len() + 1);
    }

    #[test]
    fn excluding_a_pair_removes_exactly_that_pair(
        backends in prop::collection::btree_set(name(), 1..4),
        cases in prop::collection::btree_set(name(), 1..6),
        existing in prop::collection::vec((name(), name()), 0..6),
        pick in (any::<prop::sample::Index>(), any::<prop::sample::Index>()),
    ) {
        let runner = echo_runner(&backends);
        let cases: Vec<String> = cases.into_iter().collect();
        let before_table = ExclusionTable::from_map(
            existing.iter().map(|(backend, case)| (backend.clone(), vec![case.clone()])),
        );

        let backend = pick.0.get(&backends.iter().collect::<Vec<_>>()).to_string();
        let case = pick.1.get(&cases).clone();
        let after_table = before_table.clone().exclude(backend.clone(), case.clone());

        let before = pairs(&CaseGenerator::with_cases(&runner, &before_table, cases.clone()));
        let after = pairs(&CaseGenerator::with_cases(&runner, &after_table, cases.clone()));

        let mut expected = before.clone();
        expected.remove(&(backend, case));
        prop_assert!(after.is_subset(&before));
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn every_invocation_names_a_listed_case_and_registered_backend(
        backends in prop::collection::btree_set(name(), 0..4),
        cases in prop::collection::btree_set(name(), 0..6),
    ) {
        let runner = echo_runner(&backends);
        let exclusions = ExclusionTable::builtin();
        let cases: Vec<String> = cases.into_iter().collect();
        let generator = CaseGenerator::with_cases(&runner, &exclusions, cases.clone());

        let generated = pairs(&generator);
        prop_assert_eq!(generated.len(), backends.len() * cases.len() - excluded_count(&backends, &cases, &exclusions));
        for (backend, case) in &generated {
            prop_assert!(backends.contains(backend));
            prop_assert!(cases.contains(case));
            prop_assert!(!exclusions.is_excluded(backend, case));
        }
    }
}

fn excluded_count(backends: &BTreeSet<String>, cases: &[String], table: &ExclusionTable) -> usize {
    backends
        .iter()
        .map(|backend| cases.iter().filter(|case| table.is_excluded(backend, case)).count())
        .sum()
}
