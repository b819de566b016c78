/**
 * Expression Tree Fuzz Tests
 *
 * Arbitrary and truncated input must build, serialize and compare without panicking
 */

#[allow(dead_code)]
#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{build, with_large_stack};
    use bsl_analyzer::error::ComparisonError;
    use bsl_analyzer::expression_tree::{
        serialize, walk, DefaultNodeEqualityComparer, ExpressionNode, NodeEqualityComparer,
        StrictNodeEqualityComparer, TransitiveOperationsIgnoringComparer,
    };
    use proptest::prelude::*;

    const SAMPLES: &[&str] = &[
        "Doc.Items[i + 1].Get(, 2).Name = -Total * 3",
        "?(НЕ Флаг И A <> B, New Structure(\"a, b\", 1, New Array), Неопределено)",
        "Новый(\"Массив\", Count) + Ждать LoadAsync(Url)",
        "(A ИЛИ B) AND NOT C <= '20240101' % 60",
    ];

    fn comparers() -> Vec<Box<dyn NodeEqualityComparer>> {
        vec![
            Box::new(DefaultNodeEqualityComparer),
            Box::new(StrictNodeEqualityComparer),
            Box::new(TransitiveOperationsIgnoringComparer::new(false)),
            Box::new(TransitiveOperationsIgnoringComparer::new(true)),
        ]
    }

    fn exercise(first: &ExpressionNode, second: &ExpressionNode) {
        let _ = serialize(first);
        let mut count = 0usize;
        walk(first, &mut |_| count += 1);
        assert!(count >= 1);

        for comparer in comparers() {
            for (a, b) in [(first, first), (first, second), (second, first)] {
                match comparer.try_equal(a, b) {
                    Ok(_) | Err(ComparisonError::MalformedNode) => {}
                    Err(ComparisonError::Unsupported { comparer: name, .. }) => {
                        assert_eq!(name, comparer.name());
                    }
                }
            }
            let _ = comparer.are_equal(second, first);
        }

        // Identity wins for every comparer, even on malformed trees
        assert_eq!(DefaultNodeEqualityComparer.try_equal(first, first), Ok(true));
        assert_eq!(StrictNodeEqualityComparer.try_equal(first, first), Ok(true));
        assert_eq!(
            TransitiveOperationsIgnoringComparer::new(true).try_equal(second, second),
            Ok(true)
        );
    }

    #[test]
    fn should_survive_every_prefix_of_samples() {
        for sample in SAMPLES {
            let full = build(sample);
            for (end, _) in sample.char_indices() {
                let prefix = build(&sample[..end]);
                exercise(&prefix, &full);
            }
        }
    }

    #[test]
    fn should_survive_unbalanced_deep_nesting() {
        with_large_stack(|| {
            let openers = "(".repeat(300) + "A + F(";
            let first = build(&openers);
            let second = build(&format!("{}1{}", "[".repeat(50), "]".repeat(50)));
            exercise(&first, &second);
            assert!(first.contains_error());
        });
    }

    #[test]
    fn should_handle_long_flat_chains_on_default_stack() {
        let source = vec!["A"; 50_000].join(" + ");
        let first = build(&source);
        let second = build(&source);
        let shorter = build(&source[4..]);

        assert!(TransitiveOperationsIgnoringComparer::new(false).are_equal(&first, &second));
        assert!(DefaultNodeEqualityComparer.are_equal(&first, &second));
        assert!(!DefaultNodeEqualityComparer.are_equal(&first, &shorter));
        assert!(!first.contains_error());

        let text = serialize(&first);
        assert!(text.starts_with("(A + (A + "));
        let mut count = 0usize;
        walk(&first, &mut |_| count += 1);
        assert_eq!(count, 99_999);

        drop(first);
        drop(second);
        drop(shorter);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Building never panics on arbitrary expression-like text
        #[test]
        fn fuzz_build_no_panic(
            first in "[-+*/%=<>()\\[\\],.?;\"' A-Za-zА-я0-9]{0,40}",
            second in "[-+*/%=<>()\\[\\],.?;\"' A-Za-zА-я0-9]{0,40}",
        ) {
            let first = build(&first);
            let second = build(&second);
            exercise(&first, &second);
        }

        /// Keyword-heavy input reaches constructor and ternary paths
        #[test]
        fn fuzz_keywords_no_panic(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "New", "Новый", "NOT", "И", "OR", "Ждать", "?", "(", ")", ",", ".",
                    "[", "]", "A", "1", "\"s\"", "+", "=", "Истина", "Structure",
                ]),
                0..24,
            ),
        ) {
            let source = words.join(" ");
            let node = build(&source);
            exercise(&node, &build("A"));
        }
    }
}
