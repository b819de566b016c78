/**
 * Equality Comparer Tests
 *
 * Default, strict and transitive comparers over built trees
 */

#[allow(dead_code)]
#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{build, build_ok};
    use bsl_analyzer::error::ComparisonError;
    use bsl_analyzer::expression_tree::{
        DefaultNodeEqualityComparer, ExpressionNode, NodeEqualityComparer, NodeKind,
        StrictNodeEqualityComparer, TransitiveOperationsIgnoringComparer,
    };

    fn equal(comparer: &dyn NodeEqualityComparer, first: &str, second: &str) -> bool {
        comparer.are_equal(&build_ok(first), &build_ok(second))
    }

    mod default_comparer {
        use super::*;

        #[test]
        fn should_short_circuit_on_identity() {
            let comparer = DefaultNodeEqualityComparer;
            // Access nodes never compare equal structurally; identity still wins
            let node = build_ok("Doc.Items[0]");

            assert_eq!(comparer.try_equal(&node, &node), Ok(true));
        }

        #[test]
        fn should_ignore_case_of_names_and_literals() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(equal(&comparer, "Foo", "FOO"));
            assert!(equal(&comparer, "Сумма + 1", "СУММА + 1"));
            assert!(equal(&comparer, "Истина", "ИСТИНА"));
            assert!(!equal(&comparer, "Foo", "Bar"));
        }

        #[test]
        fn should_never_equate_distinct_access_trees() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(!equal(&comparer, "A.X", "A.X"));
            assert!(!equal(&comparer, "Items[0]", "Items[0]"));
            assert!(!equal(&comparer, "Obj.Method()", "Obj.Method()"));
        }

        #[test]
        fn should_compare_operands_in_order() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(equal(&comparer, "(A + B) * 2", "(a + b) * 2"));
            assert!(!equal(&comparer, "A + B", "B + A"));
            assert!(!equal(&comparer, "A + B", "A - B"));
        }

        #[test]
        fn should_compare_unary_and_ternary() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(equal(&comparer, "-A", "-a"));
            assert!(!equal(&comparer, "-A", "+A"));
            assert!(equal(&comparer, "?(C, 1, 2)", "?(c, 1, 2)"));
            assert!(!equal(&comparer, "?(C, 1, 2)", "?(C, 2, 1)"));
        }

        #[test]
        fn should_compare_skipped_arguments() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(equal(&comparer, "F(, 2)", "F(, 2)"));
            assert!(!equal(&comparer, "F(1, 2)", "F(, 2)"));
            assert!(!equal(&comparer, "F(1, 2)", "F(1)"));
            assert!(equal(&comparer, "Max(A, B)", "MAX(a, b)"));
        }

        #[test]
        fn should_compare_constructors() {
            let comparer = DefaultNodeEqualityComparer;

            assert!(equal(&comparer, "New Array", "Новый Array()"));
            assert!(equal(&comparer, "New Structure(\"a\", 1)", "New STRUCTURE(\"A\", 1)"));
            assert!(equal(&comparer, "New(\"Array\", 1)", "New(\"Array\", 1)"));
            assert!(!equal(&comparer, "New Array", "New Map"));
            assert!(!equal(&comparer, "New Array", "New(\"Array\")"));
        }

        #[test]
        fn should_not_equate_different_kinds() {
            let comparer = DefaultNodeEqualityComparer;

            assert_eq!(
                comparer.try_equal(&build_ok("F()"), &build_ok("New F()")),
                Ok(false)
            );
            assert_eq!(comparer.try_equal(&build_ok("1"), &build_ok("A")), Ok(false));
        }

        #[test]
        fn should_report_malformed_nodes() {
            let comparer = DefaultNodeEqualityComparer;
            let first = build("(A +)");
            let second = build("(A +)");

            assert_eq!(
                comparer.try_equal(&first, &second),
                Err(ComparisonError::MalformedNode)
            );
            assert!(!comparer.are_equal(&first, &second));
        }
    }

    mod strict_comparer {
        use super::*;

        #[test]
        fn should_compare_identifiers_ignoring_case() {
            let comparer = StrictNodeEqualityComparer;

            assert!(equal(&comparer, "Структура", "структура"));
            assert!(!equal(&comparer, "Structure", "Map"));
        }

        #[test]
        fn should_reject_literals_as_unsupported() {
            let comparer = StrictNodeEqualityComparer;
            let first = build_ok("1");
            let second = build_ok("1");

            assert_eq!(
                comparer.try_equal(&first, &second),
                Err(ComparisonError::Unsupported {
                    kind: NodeKind::Literal,
                    comparer: "strict",
                })
            );
        }

        #[test]
        fn should_reject_composite_nodes_as_unsupported() {
            let comparer = StrictNodeEqualityComparer;
            let first = build_ok("A + B");
            let second = build_ok("A + B");

            let error = comparer.try_equal(&first, &second).unwrap_err();
            assert_eq!(
                error,
                ComparisonError::Unsupported {
                    kind: NodeKind::Binary,
                    comparer: "strict",
                }
            );
            assert!(error.to_string().contains("binary operation"));
        }

        #[test]
        fn should_accept_the_same_node_of_any_kind() {
            let comparer = StrictNodeEqualityComparer;
            let literal = build_ok("1");
            let binary = build_ok("A + B");

            assert_eq!(comparer.try_equal(&literal, &literal), Ok(true));
            assert_eq!(comparer.try_equal(&binary, &binary), Ok(true));
        }

        #[test]
        fn should_treat_different_kinds_as_not_equal() {
            let comparer = StrictNodeEqualityComparer;
            let identifier = build_ok("A");
            let binary = build_ok("A + B");
            let call = build_ok("F()");

            assert_eq!(comparer.try_equal(&identifier, &binary), Ok(false));
            assert_eq!(comparer.try_equal(&binary, &call), Ok(false));
            assert_eq!(comparer.try_equal(&build_ok("1"), &identifier), Ok(false));
        }
    }

    mod transitive_comparer {
        use super::*;

        #[test]
        fn should_swap_commutative_operands() {
            let comparer = TransitiveOperationsIgnoringComparer::new(false);

            assert!(equal(&comparer, "A + B", "B + A"));
            assert!(equal(&comparer, "A = B", "B = A"));
            assert!(equal(&comparer, "A * B", "B * A"));
        }

        #[test]
        fn should_not_swap_non_commutative_operands() {
            let comparer = TransitiveOperationsIgnoringComparer::new(true);

            assert!(!equal(&comparer, "A - B", "B - A"));
            assert!(!equal(&comparer, "A / B", "B / A"));
            assert!(!equal(&comparer, "A % B", "B % A"));
            assert!(!equal(&comparer, "A < B", "B < A"));
            assert!(!equal(&comparer, "A <> B", "B <> A"));
        }

        #[test]
        fn should_swap_logical_operands_only_when_enabled() {
            let strict_logic = TransitiveOperationsIgnoringComparer::new(false);
            let loose_logic = TransitiveOperationsIgnoringComparer::new(true);

            assert!(!equal(&strict_logic, "A AND B", "B AND A"));
            assert!(!equal(&strict_logic, "A OR B", "B OR A"));
            assert!(equal(&loose_logic, "A AND B", "B AND A"));
            assert!(equal(&loose_logic, "A ИЛИ B", "B OR A"));
            assert!(loose_logic.logical_operations_as_transitive());
        }

        #[test]
        fn should_swap_at_every_level() {
            let comparer = TransitiveOperationsIgnoringComparer::new(false);

            assert!(equal(&comparer, "(A + B) * (C + D)", "(D + C) * (B + A)"));
            assert!(equal(&comparer, "F(A + B)", "F(B + A)"));
            assert!(!equal(&comparer, "F(A, B)", "F(B, A)"));
        }

        #[test]
        fn should_keep_access_operators_unequal() {
            let comparer = TransitiveOperationsIgnoringComparer::new(true);

            assert!(!equal(&comparer, "A.B", "A.B"));
            assert!(!equal(&comparer, "A.B + 1", "1 + A.B"));
        }
    }

    #[test]
    fn comparers_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}

        assert_send_sync(&DefaultNodeEqualityComparer);
        assert_send_sync(&StrictNodeEqualityComparer);
        assert_send_sync(&TransitiveOperationsIgnoringComparer::new(true));

        let comparers: Vec<Box<dyn NodeEqualityComparer>> = vec![
            Box::new(DefaultNodeEqualityComparer),
            Box::new(TransitiveOperationsIgnoringComparer::new(false)),
        ];
        let node: ExpressionNode = build_ok("A + 1");
        for comparer in &comparers {
            assert!(comparer.are_equal(&node, &node));
        }
    }
}
