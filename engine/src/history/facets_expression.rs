//! Facet filter expressions, eg. `brand:(a OR "b c") AND nutriscore:c`.
//!
//! A clause is `facet:term` for one selected term and `facet:(t1 OR t2)` for
//! several. Terms holding whitespace, colons, parentheses, quotes or
//! backslashes are double-quoted, with `"` and `\` escaped by a backslash.
//! Parsing never fails: anything that can't be understood is skipped.

use common::{
    search_const::{AND_OPERATOR, OR_OPERATOR},
    search_query::SelectedTermsByFacet,
};

fn needs_quotes(term: &str) -> bool {
    term.is_empty()
        || term
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | '(' | ')' | '"' | '\\'))
}

pub fn quote_term(term: &str) -> String {
    if !needs_quotes(term) {
        return term.to_string();
    }
    format!("\"{}\"", term.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn unquote_term(term: &str) -> String {
    let term = term.trim();
    let Some(inner) = term
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return term.to_string();
    };
    let mut unescaped = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                unescaped.push(next);
                continue;
            }
        }
        unescaped.push(c);
    }
    unescaped
}

/// Filter clause for one facet, `None` when nothing is selected.
pub fn facet_clause<'a>(facet: &str, terms: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let terms = terms.into_iter().map(quote_term).collect::<Vec<_>>();
    match terms.len() {
        0 => None,
        1 => Some(format!("{facet}:{}", terms[0])),
        _ => Some(format!("{facet}:({})", terms.join(OR_OPERATOR))),
    }
}

pub fn build_facets_filters(selected: &SelectedTermsByFacet) -> String {
    selected
        .iter()
        .filter_map(|(facet, terms)| facet_clause(facet, terms.iter().map(String::as_str)))
        .collect::<Vec<_>>()
        .join(AND_OPERATOR)
}

/// Split on `operator` where it is neither quoted nor inside parentheses.
fn split_top_level<'a>(text: &'a str, operator: &str) -> Vec<&'a str> {
    let bytes = text.as_bytes();
    let operator = operator.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_quotes = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' => in_quotes = true,
            b'(' => depth += 1,
            // stray closers are tolerated
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && bytes[i..].starts_with(operator) {
            parts.push(&text[start..i]);
            i += operator.len();
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

/// Strip one enclosing pair of parentheses; an unclosed one is dropped too.
fn strip_parenthesis(value: &str) -> &str {
    match value.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')').unwrap_or(inner),
        None => value,
    }
}

pub fn parse_facets_filters(expression: &str) -> SelectedTermsByFacet {
    let mut selected = SelectedTermsByFacet::new();
    for clause in split_top_level(expression, AND_OPERATOR) {
        let clause = clause.trim();
        if clause.is_empty() {
            tracing::debug!(expression, "skipping empty facet clause");
            continue;
        }
        // values may hold colons themselves, only the first one separates the facet
        let Some((facet, value)) = clause.split_once(':') else {
            tracing::debug!(clause, "skipping facet clause without facet name");
            continue;
        };
        let facet = facet.trim();
        if facet.is_empty() {
            tracing::debug!(clause, "skipping facet clause with empty facet name");
            continue;
        }
        let terms = split_top_level(strip_parenthesis(value.trim()), OR_OPERATOR)
            .into_iter()
            .filter(|term| !term.trim().is_empty())
            .map(unquote_term)
            .collect::<Vec<_>>();
        if terms.is_empty() {
            continue;
        }
        selected.entry(facet.to_string()).or_default().extend(terms);
    }
    selected
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn set(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_clause_forms() {
        assert_eq!(facet_clause("brand", ["a"]), Some("brand:a".to_string()));
        assert_eq!(facet_clause("brand", ["a", "b"]), Some("brand:(a OR b)".to_string()));
        assert_eq!(facet_clause("brand", Vec::<&str>::new()), None);
        assert_eq!(facet_clause("labels", ["en:organic"]), Some("labels:\"en:organic\"".to_string()));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_term("plain"), "plain");
        assert_eq!(quote_term("a OR b"), "\"a OR b\"");
        assert_eq!(quote_term("x(1)"), "\"x(1)\"");
        assert_eq!(quote_term("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_term(""), "\"\"");
        assert_eq!(unquote_term("\"say \\\"hi\\\"\""), "say \"hi\"");
        assert_eq!(unquote_term(" plain "), "plain");
    }

    #[test]
    fn test_build_expression() {
        let selected = SelectedTermsByFacet::from([
            ("brand".to_string(), set(&["a", "b"])),
            ("nutriscore".to_string(), set(&["c"])),
            ("empty".to_string(), set(&[])),
        ]);
        assert_eq!(build_facets_filters(&selected), "brand:(a OR b) AND nutriscore:c");
        assert_eq!(build_facets_filters(&SelectedTermsByFacet::new()), "");
    }

    #[test]
    fn test_parse_expression() {
        let parsed = parse_facets_filters("brand:(a OR b) AND nutriscore:c");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["brand"], set(&["a", "b"]));
        assert_eq!(parsed["nutriscore"], set(&["c"]));
    }

    #[test]
    fn test_parse_quoted_terms_with_operators() {
        let parsed = parse_facets_filters("labels:(\"en:organic\" OR \"a AND b\") AND origin:\"(x)\"");
        assert_eq!(parsed["labels"], set(&["en:organic", "a AND b"]));
        assert_eq!(parsed["origin"], set(&["(x)"]));
    }

    #[test]
    fn test_parse_merges_repeated_facets() {
        let parsed = parse_facets_filters("brand:a AND brand:(b OR a)");
        assert_eq!(parsed["brand"], set(&["a", "b"]));
    }

    #[test]
    fn test_parse_malformed_is_permissive() {
        // unclosed parenthesis
        assert_eq!(parse_facets_filters("brand:(a OR b")["brand"], set(&["a", "b"]));
        // empty clauses and clauses without facet
        let parsed = parse_facets_filters(" AND brand:a AND  AND nonsense AND :x AND nutriscore:");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["brand"], set(&["a"]));
        // stray closer
        assert_eq!(parse_facets_filters("brand:a) AND x:b")["x"], set(&["b"]));
        // unterminated quote swallows the rest
        assert_eq!(parse_facets_filters("brand:\"a AND x:b")["brand"], set(&["\"a AND x:b"]));
        assert!(parse_facets_filters("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_expression_round_trip(
            selected in prop::collection::btree_map(
                "[a-z_]{1,10}",
                prop::collection::btree_set("\\PC{0,12}", 1..4),
                0..4,
            )
        ) {
            let expression = build_facets_filters(&selected);
            prop_assert_eq!(parse_facets_filters(&expression), selected);
        }
    }
}
