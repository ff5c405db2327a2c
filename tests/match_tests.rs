// tests/match_tests.rs

use std::collections::HashMap;

use spleen::{Clause, Filter, Like, Target, Value, parse};

fn record() -> Value {
    let json = serde_json::json!({
        "name": "Ada Lovelace",
        "age": 36,
        "score": 9.5,
        "active": true,
        "nickname": null,
        "tags": ["math", "poetry"],
        "address": {"city": "London", "zip": "W1"},
        "orders": [{"total": 12}, {"total": 30.5}],
        "min": 10,
        "max": 40
    });
    to_value(json)
}

fn to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(to_value).collect()),
        serde_json::Value::Object(obj) => Value::Object(
            obj.into_iter()
                .map(|(k, v)| (k, to_value(v)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

fn check(cases: Vec<(&str, bool)>) {
    let record = record();
    for (input, expected) in cases {
        let filter = parse(input).unwrap_or_else(|e| panic!("Failed to parse {}: {}", input, e));
        assert_eq!(filter.matches(&record), expected, "Failed for filter: {}", input);
    }
}

// ============================================================================
// Comparison Operators
// ============================================================================

#[test]
fn test_equality() {
    check(vec![
        (r#"/name eq "Ada Lovelace""#, true),
        (r#"/name neq "Ada Lovelace""#, false),
        ("/age eq 36", true),
        ("/age eq 36.0", true),
        ("/score eq 9.5", true),
        ("/active eq true", true),
        ("/nickname eq nil", true),
        (r#"/tags eq ["math","poetry"]"#, true),
        (r#"/tags eq ["poetry","math"]"#, false),
        (r#"/address/city eq "London""#, true),
        ("/orders/1/total eq 30.5", true),
        ("/age eq /age", true),
        ("/min neq /max", true),
    ]);
}

#[test]
fn test_ordering() {
    check(vec![
        ("/age gt 35", true),
        ("/age gt 36", false),
        ("/age gte 36", true),
        ("/age lt 36.5", true),
        ("/age lte 35.99", false),
        ("/score gt 9", true),
        (r#"/name gt "Ad""#, true),
        (r#"/name lt "B""#, true),
        ("/min lt /max", true),
        ("/orders/0/total lte /min", false),
    ]);
}

#[test]
fn test_ordering_across_kinds_is_false() {
    check(vec![
        (r#"/age gt "1""#, false),
        (r#"/age lt "1""#, false),
        ("/active gt false", false),
        ("/nickname lt 1", false),
        ("/tags gt 0", false),
    ]);
}

// ============================================================================
// Missing Values
// ============================================================================

#[test]
fn test_missing_targets() {
    check(vec![
        ("/missing eq 1", false),
        ("/missing neq 1", true),
        ("/missing eq nil", false),
        ("/missing gt 0", false),
        ("/missing lte 0", false),
        ("/missing in [1, nil]", false),
        ("/missing nin [1]", true),
        ("/missing between nil,nil", false),
        ("/missing nbetween 1,2", true),
        (r#"/missing like "*""#, false),
        (r#"/missing nlike "*""#, true),
        ("/missing eq /also_missing", true),
        ("/tags/5 eq nil", false),
        ("/name/first eq 1", false),
    ]);
}

// ============================================================================
// Membership, Ranges, Patterns
// ============================================================================

#[test]
fn test_membership() {
    check(vec![
        ("/age in [1, 36, 40]", true),
        ("/age in [36.0]", true),
        (r#"/age in ["36"]"#, false),
        ("/age nin [1, 2]", true),
        ("/age in []", false),
        ("/age nin []", true),
        ("/nickname in [nil]", true),
    ]);
}

#[test]
fn test_ranges() {
    check(vec![
        ("/age between 30,40", true),
        ("/age between 36,36", true),
        ("/age between 37,40", false),
        ("/age nbetween 37,40", true),
        ("/score between 9,9.5", true),
        ("/age between nil,36", true),
        ("/age between 37,nil", false),
        (r#"/name between "A","B""#, true),
        (r#"/name between "B","Z""#, false),
        (r#"/age between "A","Z""#, false),
        (r#"/name between 1,100"#, false),
        ("/active between 0,1", false),
        ("/active nbetween 0,1", true),
    ]);
}

#[test]
fn test_patterns() {
    check(vec![
        (r#"/name like "Ada*""#, true),
        (r#"/name like "*lace""#, true),
        (r#"/name like "Ad_ Lovelace""#, true),
        (r#"/name like "Ada""#, false),
        (r#"/name like "ada*""#, false),
        (r#"/name nlike "Bob*""#, true),
        (r#"/age like "3*""#, false),
        (r#"/age nlike "3*""#, true),
        (r#"/address/zip like "W_""#, true),
    ]);
}

#[test]
fn test_escaped_pattern_markers() {
    let like = Like::new(r"100\%\*").unwrap();
    assert!(like.is_match("100%*"));
    assert!(!like.is_match("100%x"));

    let like = Like::new(r"a\_b").unwrap();
    assert!(like.is_match("a_b"));
    assert!(!like.is_match("axb"));

    let like = Like::new("(a.b)*").unwrap();
    assert!(like.is_match("(a.b) and more"));
    assert!(!like.is_match("(axb)"));
}

// ============================================================================
// Connectives and Groups
// ============================================================================

#[test]
fn test_connectives() {
    check(vec![
        ("/age eq 36 and /active eq true", true),
        ("/age eq 36 and /active eq false", false),
        ("/age eq 1 or /active eq true", true),
        ("/age eq 1 or /active eq false", false),
        // `and` binds tighter than `or`
        ("/age eq 36 or /age eq 1 and /active eq false", true),
        ("/age eq 1 or /age eq 36 and /active eq true", true),
        ("/age eq 1 or /age eq 36 and /active eq false", false),
        ("/age eq 1 and /active eq true or /min eq 10", true),
    ]);
}

fn operand(value: bool) -> &'static str {
    if value { "/active eq true" } else { "/active eq false" }
}

/// Expected result with `and` binding tighter: the filter holds when any
/// run of `and`-joined operands is entirely true.
fn and_runs(operands: &[bool], connectives: &[&str]) -> bool {
    let mut runs = vec![operands[0]];
    for (connective, value) in connectives.iter().zip(&operands[1..]) {
        match *connective {
            "and" => {
                let last = runs.len() - 1;
                runs[last] = runs[last] && *value;
            }
            _ => runs.push(*value),
        }
    }
    runs.into_iter().any(|run| run)
}

#[test]
fn test_connective_truth_table() {
    let record = record();
    let mut count = 0;

    for connective_count in 2..=3 {
        let operand_count = connective_count + 1;
        for connective_bits in 0..(1 << connective_count) {
            let connectives: Vec<&str> = (0..connective_count)
                .map(|i| if connective_bits & (1 << i) != 0 { "and" } else { "or" })
                .collect();
            for operand_bits in 0..(1 << operand_count) {
                let operands: Vec<bool> = (0..operand_count)
                    .map(|i| operand_bits & (1 << i) != 0)
                    .collect();

                let mut input = operand(operands[0]).to_string();
                for (connective, value) in connectives.iter().zip(&operands[1..]) {
                    input.push_str(&format!(" {} {}", connective, operand(*value)));
                }

                let filter = parse(&input).unwrap_or_else(|e| panic!("Failed to parse {}: {}", input, e));
                assert_eq!(
                    filter.matches(&record),
                    and_runs(&operands, &connectives),
                    "Failed for filter: {}",
                    input
                );
                count += 1;
            }
        }
    }

    assert_eq!(count, 4 * 8 + 8 * 16);
}

#[test]
fn test_mixed_connectives() {
    let t = operand(true);
    let f = operand(false);
    let test_cases = vec![
        (format!("{f} or {t} and {f} or {t}"), true),
        (format!("{t} and {f} or {f}"), false),
        (format!("{f} or {f} or {f} or {t}"), true),
        (format!("{f} or {f} or {f} or {f}"), false),
        (format!("{f} and {t} or {f} and {t} or {t} and {f} or {t} and {t}"), true),
        (format!("{f} and {t} or {f} and {t} or {t} and {f} or {f} and {t}"), false),
        (format!("{t} and {t} and {f} or {f}"), false),
        (format!("{f} or {t} and {t} and {t}"), true),
    ];

    let record = record();
    for (input, expected) in test_cases {
        let filter = parse(&input).unwrap();
        assert_eq!(filter.matches(&record), expected, "Failed for filter: {}", input);
    }
}

#[test]
fn test_groups() {
    check(vec![
        ("(/age eq 1 or /age eq 36) and /active eq true", true),
        ("(/age eq 1 or /age eq 2) and /active eq true", false),
        ("/active eq false or (/age gt 30 and (/min eq 10))", true),
        ("((/age eq 36))", true),
    ]);
}

// ============================================================================
// Builder Filters
// ============================================================================

#[test]
fn test_builder_filter_matches() {
    let age = Target::from_json_pointer("/age").unwrap();
    let tags = Target::from_json_pointer("/tags/0").unwrap();

    let filter = Filter::clause(Clause::subject(age.clone()).between().range(Some(30.into()), None))
        .and_group(
            Filter::clause(Clause::subject(tags).eq().literal("math"))
                .or(Clause::subject(age).lt().literal(0)),
        );

    assert!(filter.matches(&record()));
    assert_eq!(
        filter.to_string(),
        r#"/age between 30,nil and (/tags/0 eq "math" or /age lt 0)"#
    );
}

#[test]
fn test_non_object_record() {
    let filter = parse("/a eq 1").unwrap();
    assert!(!filter.matches(&Value::Integer(1)));
    assert!(!filter.matches(&Value::Null));

    let list = Value::Array(vec![Value::Integer(7)]);
    assert!(parse("/0 eq 7").unwrap().matches(&list));
}
