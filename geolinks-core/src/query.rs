//! Minimal SPARQL algebra for the bounding-box DESCRIBE query.
//!
//! Only the constructs the viewport loader emits are modelled. The caller's
//! base SELECT query is not parsed: it is embedded verbatim as a sub-query,
//! with its PREFIX/BASE declarations hoisted into the outer prologue.

use crate::bounds::LatLngBounds;
use geolinks_fetch::rdfxml::GEO_NS;
use std::fmt::{self, Write};

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(String),
    Iri(String),
    TypedLiteral { lexical: String, datatype: String },
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::TypedLiteral {
            lexical: lexical.into(),
            datatype: datatype.into(),
        }
    }

    pub fn decimal(value: f64) -> Self {
        Term::typed_literal(value.to_string(), format!("{}decimal", XSD_NS))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "?{}", name),
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::TypedLiteral { lexical, datatype } => {
                f.write_char('"')?;
                for c in lexical.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                write!(f, "\"^^<{}>", datatype)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Term(Term),
    Operation {
        operator: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn operation(operator: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Operation {
            operator: operator.into(),
            args,
        }
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::Term(term)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Term(term) => term.fmt(f),
            Expression::Operation { operator, args } if args.len() == 2 => {
                write!(f, "({} {} {})", args[0], operator, args[1])
            }
            Expression::Operation { operator, args } => {
                write!(f, "{}(", operator)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    arg.fmt(f)?;
                }
                f.write_char(')')
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Bgp(Vec<Triple>),
    Filter(Expression),
    Group(Vec<Pattern>),
    Union(Vec<Pattern>),
    Graph(Term, Vec<Pattern>),
    /// A complete SELECT query used as a sub-query, kept as text.
    SubQuery(String),
}

impl Pattern {
    fn write<W: Write>(&self, out: &mut W, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Pattern::Bgp(triples) => {
                for triple in triples {
                    writeln!(out, "{}{}", indent, triple)?;
                }
            }
            Pattern::Filter(expression) => {
                writeln!(out, "{}FILTER {}", indent, expression)?;
            }
            Pattern::Group(patterns) => {
                writeln!(out, "{}{{", indent)?;
                for pattern in patterns {
                    pattern.write(out, depth + 1)?;
                }
                writeln!(out, "{}}}", indent)?;
            }
            Pattern::Union(patterns) => {
                for (i, pattern) in patterns.iter().enumerate() {
                    if i > 0 {
                        writeln!(out, "{}UNION", indent)?;
                    }
                    pattern.write(out, depth)?;
                }
            }
            Pattern::Graph(name, patterns) => {
                writeln!(out, "{}GRAPH {}", indent, name)?;
                Pattern::Group(patterns.clone()).write(out, depth)?;
            }
            Pattern::SubQuery(query) => {
                writeln!(out, "{}{{", indent)?;
                for line in query.trim().lines() {
                    writeln!(out, "{}  {}", indent, line)?;
                }
                writeln!(out, "{}}}", indent)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, 0)
    }
}

/// `DESCRIBE` query with a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeQuery {
    pub prologue: String,
    pub variables: Vec<Term>,
    pub patterns: Vec<Pattern>,
}

impl fmt::Display for DescribeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prologue.is_empty() {
            writeln!(f, "{}", self.prologue)?;
        }
        f.write_str("DESCRIBE")?;
        for variable in &self.variables {
            write!(f, " {}", variable)?;
        }
        f.write_str("\nWHERE\n")?;

        let mut body = String::new();
        Pattern::Group(self.patterns.clone()).write(&mut body, 0)?;
        f.write_str(body.trim_end())
    }
}

/// Split leading PREFIX and BASE declarations (and comment lines) off a query.
pub fn split_prologue(query: &str) -> (String, &str) {
    let mut prologue = Vec::new();
    let mut rest = query.trim_start();

    loop {
        if rest.starts_with('#') {
            let end = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
            rest = rest[end..].trim_start();
            continue;
        }

        let keyword = rest
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        if keyword != "PREFIX" && keyword != "BASE" {
            break;
        }
        let Some(end) = rest.find('>') else {
            break;
        };
        prologue.push(rest[..=end].trim().to_string());
        rest = rest[end + 1..].trim_start();
    }

    (prologue.join("\n"), rest)
}

/// Triple and filter patterns selecting `?focus` resources whose
/// `geo:lat`/`geo:long` fall strictly inside `bounds`. A box crossing the
/// antimeridian gets a single disjunctive longitude filter.
pub fn bounds_pattern(focus_var: &str, bounds: &LatLngBounds) -> Vec<Pattern> {
    let focus = Term::var(focus_var);
    let lat = Term::var("lat");
    let long = Term::var("long");

    let comparison = |operator: &str, variable: &Term, value: f64| {
        Expression::operation(
            operator,
            vec![variable.clone().into(), Term::decimal(value).into()],
        )
    };
    let filter = |operator: &str, variable: &Term, value: f64| {
        Pattern::Filter(comparison(operator, variable, value))
    };

    // A box whose west edge lies east of its east edge wraps across 180°.
    let mut patterns = vec![
        Pattern::Bgp(vec![
            Triple::new(focus.clone(), Term::iri(format!("{}lat", GEO_NS)), lat.clone()),
            Triple::new(focus, Term::iri(format!("{}long", GEO_NS)), long.clone()),
        ]),
        filter("<", &lat, bounds.north()),
        filter(">", &lat, bounds.south()),
    ];

    // A box whose west edge lies east of its east edge wraps across 180°.
    if bounds.crosses_antimeridian() {
        patterns.push(Pattern::Filter(Expression::operation(
            "||",
            vec![
                comparison(">", &long, bounds.west()),
                comparison("<", &long, bounds.east()),
            ],
        )));
    } else {
        patterns.push(filter("<", &long, bounds.east()));
        patterns.push(filter(">", &long, bounds.west()));
    }
    patterns
}

/// DESCRIBE the focus resources of `select` that carry coordinates inside
/// `bounds`. With a graph variable, coordinates are matched in the default
/// graph or in any named graph.
pub fn geo_bounded_query(
    select: &str,
    focus_var: &str,
    graph_var: Option<&str>,
    bounds: &LatLngBounds,
) -> DescribeQuery {
    let (prologue, select_body) = split_prologue(select);
    let pattern = bounds_pattern(focus_var, bounds);

    let bounded = match graph_var {
        Some(graph_var) => Pattern::Union(vec![
            Pattern::Group(pattern.clone()),
            Pattern::Graph(Term::var(graph_var), pattern),
        ]),
        None => Pattern::Group(pattern),
    };

    DescribeQuery {
        prologue,
        variables: vec![Term::var(focus_var)],
        patterns: vec![Pattern::SubQuery(select_body.to_string()), bounded],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECT: &str = "PREFIX dct: <http://purl.org/dc/terms/>\n\
                          PREFIX ex: <http://example.org/ns#>\n\
                          SELECT DISTINCT ?this WHERE { ?this a ex:Place }";

    #[test]
    fn test_term_serialisation() {
        assert_eq!(Term::var("lat").to_string(), "?lat");
        assert_eq!(Term::iri("urn:x").to_string(), "<urn:x>");
        assert_eq!(
            Term::decimal(-10.0).to_string(),
            "\"-10\"^^<http://www.w3.org/2001/XMLSchema#decimal>"
        );
        assert_eq!(
            Term::typed_literal("a\"b", "urn:dt").to_string(),
            "\"a\\\"b\"^^<urn:dt>"
        );
    }

    #[test]
    fn test_split_prologue() {
        let (prologue, body) = split_prologue(SELECT);
        assert_eq!(
            prologue,
            "PREFIX dct: <http://purl.org/dc/terms/>\nPREFIX ex: <http://example.org/ns#>"
        );
        assert_eq!(body, "SELECT DISTINCT ?this WHERE { ?this a ex:Place }");
    }

    #[test]
    fn test_split_prologue_without_declarations() {
        let (prologue, body) = split_prologue("  SELECT * { ?s ?p ?o }");
        assert!(prologue.is_empty());
        assert_eq!(body, "SELECT * { ?s ?p ?o }");
    }

    #[test]
    fn test_split_prologue_skips_comments_and_base() {
        let (prologue, body) =
            split_prologue("# places\nbase <http://example.org/>\nSELECT ?this { ?this a <Place> }");
        assert_eq!(prologue, "base <http://example.org/>");
        assert_eq!(body, "SELECT ?this { ?this a <Place> }");
    }

    #[test]
    fn test_bounds_filters() {
        let bounds = LatLngBounds::from_edges(-10.0, 0.0, 10.0, 20.0);
        let query = geo_bounded_query(SELECT, "this", None, &bounds).to_string();
        let decimal = "^^<http://www.w3.org/2001/XMLSchema#decimal>";

        assert!(query.contains(&format!("FILTER (?long < \"10\"{})", decimal)));
        assert!(query.contains(&format!("FILTER (?lat < \"20\"{})", decimal)));
        assert!(query.contains(&format!("FILTER (?lat > \"0\"{})", decimal)));
        assert!(query.contains(&format!("FILTER (?long > \"-10\"{})", decimal)));
        assert!(query.contains("?this <http://www.w3.org/2003/01/geo/wgs84_pos#lat> ?lat ."));
        assert!(query.contains("?this <http://www.w3.org/2003/01/geo/wgs84_pos#long> ?long ."));
        assert!(!query.contains("UNION"));
    }

    #[test]
    fn test_antimeridian_bounds_use_disjunctive_longitude_filter() {
        let pacific = LatLngBounds::from_edges(170.0, -10.0, -170.0, 10.0);
        let query = geo_bounded_query(SELECT, "this", None, &pacific).to_string();
        let decimal = "^^<http://www.w3.org/2001/XMLSchema#decimal>";

        assert!(query.contains(&format!(
            "FILTER ((?long > \"170\"{d}) || (?long < \"-170\"{d}))",
            d = decimal
        )));
        assert!(!query.contains(&format!("FILTER (?long < \"-170\"{})", decimal)));
        assert!(!query.contains(&format!("FILTER (?long > \"170\"{})", decimal)));
        assert_eq!(query.matches("FILTER").count(), 3);
        assert!(pacific.contains(crate::bounds::LatLng::new(0.0, 179.0)));
    }

    #[test]
    fn test_pattern_display_indents_nested_groups() {
        let pattern = Pattern::Group(vec![Pattern::Filter(Expression::operation(
            "BOUND",
            vec![Term::var("x").into()],
        ))]);
        assert_eq!(pattern.to_string(), "{\n  FILTER BOUND(?x)\n}\n");
    }

    #[test]
    fn test_query_shape_with_graph_variable() {
        let bounds = LatLngBounds::from_edges(-10.0, 0.0, 10.0, 20.0);
        let query = geo_bounded_query(SELECT, "this", Some("graph"), &bounds).to_string();

        assert!(query.starts_with("PREFIX dct: <http://purl.org/dc/terms/>\nPREFIX ex:"));
        assert!(query.contains("DESCRIBE ?this\nWHERE\n{"));
        assert!(query.contains("SELECT DISTINCT ?this WHERE { ?this a ex:Place }"));
        assert!(query.contains("UNION"));
        assert!(query.contains("GRAPH ?graph"));
        assert_eq!(query.matches("FILTER").count(), 8);
        assert_eq!(query.matches('{').count(), query.matches('}').count());
        // the embedded SELECT keeps no prologue
        assert_eq!(query.matches("PREFIX ex:").count(), 1);
    }

    #[test]
    fn test_non_binary_operation() {
        let expr = Expression::operation("BOUND", vec![Term::var("x").into()]);
        assert_eq!(expr.to_string(), "BOUND(?x)");
    }
}
