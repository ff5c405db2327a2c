//! Documentation content for the spleen CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Targets,
    Operators,
    Connectives,
    Prioritize,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "targets" | "target" | "paths" => Some(Self::Targets),
            "operators" | "ops" => Some(Self::Operators),
            "connectives" | "and_or" | "groups" => Some(Self::Connectives),
            "prioritize" | "priority" | "priorities" => Some(Self::Prioritize),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"SPLEEN DOCUMENTATION

Spleen is a filter language for JSON records. A filter is a list of clauses
joined by `and` / `or`, each comparing a field of the record against a value,
a list, a range or a pattern.

DOCUMENTATION CATEGORIES

  syntax            Clauses, literals, strings and escaping
  targets           Slash paths into the record
  operators         The twelve clause operators
  connectives       and / or evaluation and parenthesized groups
  prioritize        Reordering clauses by field priority

QUICK REFERENCE

  /field            Target (field of the record)
  /list/0           Array element
  eq neq gt gte lt lte
  in nin            [1, 2, "three"]
  between nbetween  lower,upper
  like nlike        "pre*", "a_c"
  ( ... )           Group

Run 'spleen doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Targets) => Ok(TARGETS_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Connectives) => Ok(CONNECTIVES_DOC),
        Some(DocCategory::Prioritize) => Ok(PRIORITIZE_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Clauses and Literals

CLAUSE
  subject operator object
    The subject is usually a target. The object's shape depends on the
    operator family.

    Example:
      /age gte 18

LITERALS
  "text"            String. Escape `"` and `\` with a backslash.
  42  -7  0x1F      Integers (decimal, 0x, 0o, 0b)
  3.14  1e-3        Floats
  Infinity          Float infinity, also -Infinity
  true  false       Booleans
  nil               Null
  [1, "a", nil]     Array (membership objects and eq/neq)

WHITESPACE
  Any Unicode whitespace separates tokens. Structural characters
  ( ) [ ] , end a token without whitespace:

    (/a eq 1)or(/b in[1,2])

ESCAPING
  Outside strings, a backslash makes the next character part of the
  current token, so reserved characters can appear in field names:

    /first\ name eq "Ada"
"#;

const TARGETS_DOC: &str = r#"TARGETS - Paths into the Record

FIELD ACCESS
  /field
    Reads a field of the record.

    Example:
      Input:  {"name": "Alice"}
      Filter: /name eq "Alice"
      Result: true

NESTED ACCESS
  /user/address/city
    Each segment descends one level.

ARRAY INDEX
  /items/0
    Non-negative integer segments index arrays. On an object, the index
    is looked up as a string key.

MISSING VALUES
  A path that does not resolve yields no value. Positive operators are
  false for it, negated operators are true:

    Input:  {}
    /age gt 1       false
    /age neq 1      true
    /age eq /other  true   (both missing)

TARGETS AS OBJECTS
  Comparisons may compare two fields:

    /start lte /end
"#;

const OPERATORS_DOC: &str = r#"OPERATORS - Clause Operators

COMPARISON
  eq neq            Deep equality; 1 eq 1.0 holds
  gt gte lt lte     Numbers by value, strings lexicographically.
                    Any other pairing is false.

MEMBERSHIP
  in [a, b, ...]    Subject equals one of the values
  nin [a, b, ...]   Negation of in

RANGE
  between lo,hi     Inclusive. nil leaves a side open.
  nbetween lo,hi    Negation of between

    Example:
      /age between 18,65
      /name between "a","m"
      /score between nil,100

PATTERN
  like "pat"        String subjects only
  nlike "pat"       Negation of like

    *   any run of characters
    _   exactly one character
    \*  a literal star (write "\\*" inside the string)
"#;

const CONNECTIVES_DOC: &str = r#"CONNECTIVES - and, or, Groups

EVALUATION
  Statements are read left to right. `and` narrows the running result.
  An `or` reached while the running result holds ends evaluation with a
  match; otherwise the next statement starts over.

    /a eq 1 or /b eq 2 and /c eq 3
      reads as: /a eq 1 or (/b eq 2 and /c eq 3)

GROUPS
  ( filter )
    A parenthesized filter is evaluated as one statement.

    Example:
      (/a eq 1 or /b eq 2) and /c eq 3
"#;

const PRIORITIZE_DOC: &str = r#"PRIORITIZE - Reordering by Field Priority

  spleen prioritize <filter> --priority /a --priority /b
  spleen prioritize <filter> --strategy strategy.json

PRIORITY GROUPS
  The precedence connective (default `or`) splits the filter into
  groups. Inside each group, statements are sorted by the best rank of
  the fields they reference. Statements without a ranked field go last.
  Equal ranks keep their order. Groups are prioritized recursively and
  pass their best rank to the enclosing filter.

    priorities: /foo /bar
    /bar eq 1 and /foo eq 0   ->   /foo eq 0 and /bar eq 1

LABELS
  label:/target attaches a label. The command reports every label whose
  targets the filter references (any of them, or all with
  --match-all-labels).

STRATEGY FILE
  Either a priority array, or an object:

    {
      "priorities": ["/id", {"target": "/email", "label": "contact"}],
      "precedence": "or",
      "matchAllLabels": false
    }

  A strategy object cannot be combined with --precedence or
  --match-all-labels. SPLEEN_PRECEDENCE does not apply to it.

ENVIRONMENT
  SPLEEN_PRECEDENCE   default for --precedence, unless the strategy
                      file is an object
  SPLEEN_LOG          log filter, e.g. "spleen=debug"
"#;
