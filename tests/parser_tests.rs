// tests/parser_tests.rs

use spleen::ast::{Comparison, Conjunction, Node, Operator, Predicate, Range, Term};
use spleen::lexer::LexError;
use spleen::parser::{MAX_NESTING, ParseError};
use spleen::target::PathSegment;
use spleen::{Filter, Value, parse};

fn only_clause(filter: &Filter) -> &spleen::Clause {
    assert_eq!(filter.len(), 1, "expected a single statement");
    match &filter.statements()[0].value {
        Node::Clause(clause) => clause,
        Node::Group(_) => panic!("Expected a clause"),
    }
}

// ============================================================================
// Clauses
// ============================================================================

#[test]
fn test_comparison() {
    let filter = parse("/price gt 100").unwrap();
    let clause = only_clause(&filter);

    assert_eq!(clause.operator(), Operator::Gt);
    match clause.subject_term() {
        Term::Target(target) => assert_eq!(target.field(), "/price"),
        Term::Literal(_) => panic!("Expected a target subject"),
    }
    assert!(matches!(
        clause.predicate(),
        Predicate::Compare {
            comparison: Comparison::Gt,
            object: Term::Literal(Value::Integer(100)),
        }
    ));
}

#[test]
fn test_literal_objects() {
    let test_cases = vec![
        (r#"/a eq "x""#, Value::from("x")),
        ("/a eq -3", Value::Integer(-3)),
        ("/a eq 2.5", Value::Float(2.5)),
        ("/a eq true", Value::Boolean(true)),
        ("/a eq nil", Value::Null),
        ("/a eq [1,2]", Value::Array(vec![1.into(), 2.into()])),
    ];

    for (input, expected) in test_cases {
        let filter = parse(input).unwrap();
        assert_eq!(
            only_clause(&filter).object_term(),
            Some(&Term::Literal(expected)),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_target_object() {
    let filter = parse("/start lte /end").unwrap();
    let clause = only_clause(&filter);
    assert!(matches!(clause.object_term(), Some(Term::Target(_))));
    assert_eq!(filter.fields(), ["/start", "/end"]);
}

#[test]
fn test_literal_subject() {
    let filter = parse("42 eq /answer").unwrap();
    let clause = only_clause(&filter);
    assert_eq!(clause.subject_term(), &Term::Literal(Value::Integer(42)));
    assert_eq!(filter.fields(), ["/answer"]);
}

#[test]
fn test_indexed_target() {
    let filter = parse("/orders/0/total gte 10").unwrap();
    let clause = only_clause(&filter);
    let target = clause.targets().next().unwrap();
    assert_eq!(target.path()[1], PathSegment::Index(0));
    assert_eq!(target.field(), "/orders");
}

#[test]
fn test_membership() {
    let filter = parse(r#"/tag nin ["a", 2, nil]"#).unwrap();
    match only_clause(&filter).predicate() {
        Predicate::In { negated, values } => {
            assert!(*negated);
            assert_eq!(values, &vec![Value::from("a"), Value::Integer(2), Value::Null]);
        }
        other => panic!("Expected membership, got {:?}", other),
    }

    let filter = parse("/tag in []").unwrap();
    assert!(matches!(
        only_clause(&filter).predicate(),
        Predicate::In { values, .. } if values.is_empty()
    ));
}

#[test]
fn test_ranges() {
    let test_cases = vec![
        ("/n between 1,10", Range::new(Some(1.into()), Some(10.into()))),
        ("/n between 1 , 10", Range::new(Some(1.into()), Some(10.into()))),
        (
            r#"/s nbetween "a","m""#,
            Range::new(Some("a".into()), Some("m".into())),
        ),
        ("/n between nil,0.5", Range::new(None, Some(0.5.into()))),
    ];

    for (input, expected) in test_cases {
        let filter = parse(input).unwrap();
        match only_clause(&filter).predicate() {
            Predicate::Between { range, .. } => {
                assert_eq!(range, &expected, "Failed for input: {}", input)
            }
            other => panic!("Expected range for {}, got {:?}", input, other),
        }
    }
}

#[test]
fn test_patterns() {
    let filter = parse(r#"/name nlike "J*n_""#).unwrap();
    match only_clause(&filter).predicate() {
        Predicate::Like { negated, pattern } => {
            assert!(*negated);
            assert_eq!(pattern.pattern(), "J*n_");
        }
        other => panic!("Expected pattern, got {:?}", other),
    }
}

// ============================================================================
// Statements and Groups
// ============================================================================

#[test]
fn test_conjunctives() {
    let filter = parse("/a eq 1 and /b eq 2 or /c eq 3").unwrap();
    let conjunctives: Vec<_> = filter.statements().iter().map(|s| s.conjunctive).collect();
    assert_eq!(
        conjunctives,
        vec![None, Some(Conjunction::And), Some(Conjunction::Or)]
    );
    assert_eq!(filter.fields(), ["/a", "/b", "/c"]);
}

#[test]
fn test_groups() {
    let filter = parse("(/a eq 1 or /b eq 2) and ((/c eq 3))").unwrap();
    assert_eq!(filter.len(), 2);

    let Node::Group(first) = &filter.statements()[0].value else {
        panic!("Expected a group");
    };
    assert_eq!(first.len(), 2);
    assert_eq!(first.statements()[0].conjunctive, None);

    let Node::Group(outer) = &filter.statements()[1].value else {
        panic!("Expected a group");
    };
    assert!(matches!(outer.statements()[0].value, Node::Group(_)));
    assert_eq!(filter.statements()[1].conjunctive, Some(Conjunction::And));
    assert_eq!(filter.fields(), ["/a", "/b", "/c"]);
}

#[test]
fn test_repeated_fields_listed_once() {
    let filter = parse("/a gt 1 and /a lt 5 or (/b eq /a)").unwrap();
    assert_eq!(filter.fields(), ["/a", "/b"]);
}

#[test]
fn test_from_str() {
    let filter: Filter = "/a eq 1".parse().unwrap();
    assert_eq!(filter, parse("/a   eq\t1").unwrap());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_lex_errors_surface() {
    assert_eq!(parse("").unwrap_err(), ParseError::Lex(LexError::EmptyInput));
    assert!(matches!(
        parse(r#"/a eq "x"#).unwrap_err(),
        ParseError::Lex(LexError::UnterminatedString { .. })
    ));
}

#[test]
fn test_unexpected_end() {
    let test_cases = vec!["/a", "/a eq", "/a eq 1 and", "/a in [1,", "/a between 1,", "(", "   "];

    for input in test_cases {
        assert!(
            matches!(parse(input).unwrap_err(), ParseError::UnexpectedEnd { .. } | ParseError::UnclosedGroup { .. }),
            "Failed for input: {:?}",
            input
        );
    }
}

#[test]
fn test_unknown_operator() {
    assert_eq!(
        parse("/a equals 1").unwrap_err(),
        ParseError::UnknownOperator {
            value: "equals".into(),
            offset: 3
        }
    );
}

#[test]
fn test_whitespace_separates_targets() {
    assert_eq!(
        parse("/foo /bar eq 1").unwrap_err(),
        ParseError::UnknownOperator {
            value: "/bar".into(),
            offset: 5
        }
    );

    let filter = parse("/foo/bar eq 1").unwrap();
    let target = only_clause(&filter).targets().next().unwrap();
    assert_eq!(
        target.path(),
        &[PathSegment::Key("foo".into()), PathSegment::Key("bar".into())]
    );
}

#[test]
fn test_unexpected_tokens() {
    let test_cases = vec![
        ("/a eq 1 /b", 8),
        ("/a eq 1 and and /b eq 2", 12),
        ("/a in 1", 6),
        ("/a between [1],2", 11),
        ("/a like 5", 8),
        ("/a eq foo", 6),
        ("/a eq 1 (", 8),
    ];

    for (input, offset) in test_cases {
        let err = parse(input).unwrap_err();
        assert_eq!(err.offset(), offset, "Failed for input: {} ({})", input, err);
    }
}

#[test]
fn test_group_errors() {
    assert_eq!(
        parse("/a eq 1)").unwrap_err(),
        ParseError::UnmatchedCloseGroup { offset: 7 }
    );
    assert_eq!(
        parse("/a eq 1 and (/b eq 2").unwrap_err(),
        ParseError::UnclosedGroup { offset: 12 }
    );
    assert!(parse("()").is_err());
}

fn nested(depth: usize) -> String {
    format!("{}/a eq 1{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_nesting_limit() {
    let filter = parse(&nested(MAX_NESTING)).unwrap();
    assert_eq!(filter.fields(), ["/a"]);

    assert_eq!(
        parse(&nested(MAX_NESTING + 1)).unwrap_err(),
        ParseError::NestingTooDeep { offset: MAX_NESTING }
    );
}

#[test]
fn test_deep_nesting_is_an_error() {
    let err = parse(&nested(2000)).unwrap_err();
    assert_eq!(err, ParseError::NestingTooDeep { offset: MAX_NESTING });
    assert_eq!(err.value(), "(");
}

#[test]
fn test_error_values() {
    let err = parse("/a eq 1 xor /b eq 2").unwrap_err();
    assert_eq!(err.value(), "xor");
    assert_eq!(err.offset(), 8);
    assert!(err.to_string().contains("xor"));
}
