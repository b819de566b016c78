/**
 * Expression Tree Builder Tests
 *
 * Precedence, access chains, calls and error degradation, checked through
 * the fully parenthesized serialization of the built tree.
 */

#[allow(dead_code)]
#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{build, build_ok, tree, with_large_stack};
    use bsl_analyzer::expression_parser::{Parser, MAX_NESTING_DEPTH};
    use bsl_analyzer::expression_tree::{
        build_expression_tree, serialize, BslOperator, CallTarget, ConstructorType,
        DefaultNodeEqualityComparer, ExpressionNode, LiteralKind, NodeEqualityComparer, NodeKind,
    };
    use bsl_analyzer::parse_util::SourceSpan;
    use pretty_assertions::assert_eq;

    fn check_tree(source: &str, expected: &str) {
        assert_eq!(serialize(&build_ok(source)), expected, "tree of `{}`", source);
    }

    mod precedence {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_bind_multiplication_tighter_than_addition() {
            let root = build_ok("2 + 3 * 4");
            let add = root.as_binary().expect("binary root");

            assert_eq!(add.operator, BslOperator::Add);
            assert_eq!(add.left.as_literal().map(|l| l.text.as_str()), Some("2"));
            let multiply = add.right.as_binary().expect("binary right operand");
            assert_eq!(multiply.operator, BslOperator::Multiply);
            assert_eq!(serialize(&root), "(2 + (3 * 4))");
        }

        #[test]
        fn should_collapse_higher_tier_before_lower() {
            check_tree("2 * 3 + 4", "((2 * 3) + 4)");
            check_tree("A / B - C % D", "((A / B) - (C % D))");
        }

        #[test]
        fn should_group_same_tier_to_the_right() {
            check_tree("2 - 3 - 4", "(2 - (3 - 4))");
            check_tree("A * B / C", "(A * (B / C))");
        }

        #[test]
        fn should_follow_priority_table_for_logical_operators() {
            check_tree("A OR B AND C", "((A OR B) AND C)");
            check_tree("A = 1 AND B = 2", "(A = ((1 AND B) = 2))");
        }

        #[test]
        fn should_respect_parentheses() {
            check_tree("(2 + 3) * 4", "((2 + 3) * 4)");
            check_tree("(A = 1) AND (B = 2)", "((A = 1) AND (B = 2))");
        }
    }

    mod unary {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_bind_unary_minus_to_next_member() {
            let root = build_ok("-2 + 3");
            let add = root.as_binary().expect("binary root");

            assert_eq!(add.operator, BslOperator::Add);
            match add.left.as_ref() {
                ExpressionNode::Unary(unary) => {
                    assert_eq!(unary.operator, BslOperator::UnaryMinus);
                    assert_eq!(unary.span, SourceSpan::new(0, 2));
                }
                other => panic!("Expected unary, got {:?}", other),
            }
            assert_eq!(serialize(&root), "((-2) + 3)");
        }

        #[test]
        fn should_apply_not_to_single_member() {
            check_tree("NOT A AND B", "((NOT A) AND B)");
            check_tree("НЕ (A ИЛИ B)", "(NOT (A OR B))");
        }

        #[test]
        fn should_apply_unary_after_binary_operator() {
            check_tree("A * -B", "(A * (-B))");
            check_tree("1 + +2", "(1 + (+2))");
        }
    }

    mod access {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_chain_dereference_left_to_right() {
            let root = build_ok("A.B.C");
            let outer = root.as_binary().expect("binary root");

            assert_eq!(outer.operator, BslOperator::Dereference);
            assert_eq!(outer.right.as_identifier().map(|i| i.name.as_str()), Some("C"));
            let inner = outer.left.as_binary().expect("binary left operand");
            assert_eq!(inner.operator, BslOperator::Dereference);
            assert_eq!(inner.left.as_identifier().map(|i| i.name.as_str()), Some("A"));
            assert_eq!(inner.right.as_identifier().map(|i| i.name.as_str()), Some("B"));
            assert_eq!(root.span(), SourceSpan::new(0, 5));
        }

        #[test]
        fn should_build_index_access() {
            let root = build_ok("Items[i + 1].Name");
            let outer = root.as_binary().expect("binary root");

            assert_eq!(outer.operator, BslOperator::Dereference);
            let index = outer.left.as_binary().expect("index access");
            assert_eq!(index.operator, BslOperator::IndexAccess);
            assert_eq!(index.span, SourceSpan::new(0, 12));
            assert_eq!(serialize(&root), "Items[(i + 1)].Name");
        }

        #[test]
        fn should_build_method_call_access() {
            let root = build_ok("Obj.Find(Key, 1).Value");
            let outer = root.as_binary().expect("binary root");
            let call_access = outer.left.as_binary().expect("call access");

            assert_eq!(call_access.operator, BslOperator::Dereference);
            assert_eq!(call_access.right.kind(), NodeKind::MethodCall);
            assert_eq!(serialize(&root), "Obj.Find(Key, 1).Value");
        }

        #[test]
        fn should_chain_after_parentheses_and_calls() {
            check_tree("(A + B).Count()", "(A + B).Count()");
            check_tree("GetItems()[0]", "GetItems()[0]");
        }

        #[test]
        fn should_bind_access_tighter_than_operators() {
            check_tree("-A.B * C[1]", "((-A.B) * C[1])");
        }
    }

    mod calls {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_build_global_call_with_skipped_arguments() {
            let root = build_ok("F(, 2)");
            let call = root.as_call().expect("call");

            assert_eq!(call.name(), Some("F"));
            assert_eq!(call.arguments.len(), 2);
            assert_eq!(call.arguments[0].kind(), NodeKind::SkippedArgument);
            assert_eq!(call.arguments[0].span(), SourceSpan::empty(2));
            assert_eq!(serialize(&root), "F(, 2)");
        }

        #[test]
        fn should_build_call_without_arguments() {
            let root = build_ok("CurrentDate()");
            assert_eq!(root.as_call().map(|c| c.arguments.len()), Some(0));
        }

        #[test]
        fn should_build_static_constructor() {
            let root = build_ok("New Structure(\"Key\", 1)");
            let call = root.as_call().expect("call");

            match &call.target {
                CallTarget::Constructor(ConstructorType::Static(type_name)) => {
                    assert_eq!(type_name.name, "Structure");
                }
                other => panic!("Expected static constructor, got {:?}", other),
            }
            assert_eq!(serialize(&root), "New Structure(\"Key\", 1)");
        }

        #[test]
        fn should_build_constructor_without_parentheses() {
            check_tree("Новый Массив", "New Массив()");
        }

        #[test]
        fn should_take_dynamic_type_from_first_argument() {
            let root = build_ok("New(\"Array\", 3)");
            let call = root.as_call().expect("call");

            match &call.target {
                CallTarget::Constructor(ConstructorType::Dynamic(type_expression)) => {
                    assert_eq!(type_expression.kind(), NodeKind::Literal);
                }
                other => panic!("Expected dynamic constructor, got {:?}", other),
            }
            assert_eq!(call.arguments.len(), 1);
            assert_eq!(serialize(&root), "New(\"Array\", 3)");
        }

        #[test]
        fn should_degrade_dynamic_constructor_without_type() {
            assert!(build("New()").is_error());
            assert!(build("New(, 1)").is_error());
        }

        #[test]
        fn should_build_ternary_parts_independently() {
            let root = build_ok("?(A > 0, A, -A) + 1");

            assert_eq!(serialize(&root), "(?((A > 0), A, (-A)) + 1)");
            let add = root.as_binary().expect("binary root");
            assert_eq!(add.left.kind(), NodeKind::Ternary);
        }

        #[test]
        fn should_pass_through_await() {
            check_tree("Await LoadAsync(Url)", "LoadAsync(Url)");
            check_tree("Ждать Promise", "Promise");
        }
    }

    mod literals {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_keep_literal_kind_and_text() {
            let root = build_ok("'20240101' + \"a\"\"b\"");
            let add = root.as_binary().expect("binary root");

            let date = add.left.as_literal().expect("date literal");
            assert_eq!(date.kind, LiteralKind::Date);
            assert_eq!(date.text, "'20240101'");
            let string = add.right.as_literal().expect("string literal");
            assert_eq!(string.kind, LiteralKind::String);
            assert_eq!(string.text, "\"a\"\"b\"");
        }
    }

    mod errors {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_degrade_empty_parentheses() {
            assert!(build("()").is_error());
            check_tree_lenient("1 + ()", "(1 + <error>)");
        }

        #[test]
        fn should_degrade_missing_operand() {
            check_tree_lenient("A +", "(A + <error>)");
            check_tree_lenient("A + * B", "(A + (<error> * B))");
        }

        #[test]
        fn should_degrade_unclosed_group_to_single_error() {
            check_tree_lenient("1 + (2 * 3", "(1 + <error>)");
        }

        #[test]
        fn should_degrade_nested_errors_locally() {
            check_tree_lenient("F(1 +, 2)", "F((1 + <error>), 2)");
        }

        #[test]
        fn should_degrade_broken_access_chain() {
            check_tree_lenient("A.B. + 1", "(<error> + 1)");
        }

        #[test]
        fn should_degrade_empty_input() {
            assert!(build("").is_error());
        }

        #[test]
        fn should_degrade_beyond_nesting_limit() {
            let depth = MAX_NESTING_DEPTH + 5;
            let root = with_large_stack(move || {
                let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
                build(&source)
            });
            assert!(root.contains_error());

            let within = with_large_stack(|| {
                let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
                build(&source)
            });
            assert!(!within.contains_error());
            assert_eq!(serialize(&within), "1");
        }

        fn check_tree_lenient(source: &str, expected: &str) {
            assert_eq!(tree(source), expected, "tree of `{}`", source);
        }
    }

    mod determinism {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_build_equal_trees_from_same_syntax() {
            let comparer = DefaultNodeEqualityComparer;
            let sources = [
                "2 + 3 * 4",
                "-(A - B) / F(, C)",
                "?(Flag, New Structure(\"a\", 1), Undefined)",
                "NOT A OR B AND C <> D",
            ];
            for source in sources {
                let syntax = Parser::new().parse_expression(source).expression;
                let first = build_expression_tree(&syntax);
                let second = build_expression_tree(&syntax);

                assert_eq!(comparer.try_equal(&first, &second), Ok(true), "`{}`", source);
                assert_eq!(serialize(&first), serialize(&second));
            }
        }
    }
}
