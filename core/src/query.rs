use crate::tokenizer::tokenize;
use serde::Serialize;

const AND_SEPARATOR: &str = " AND ";
const OR_SEPARATOR: &str = " OR ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    And,
    Or,
}

/// A query split into its boolean operator and the terms it combines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedQuery {
    pub operator: Operator,
    pub terms: Vec<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Detect the operator and extract terms.
///
/// Operator keywords match case-insensitively and `AND` wins over `OR`. With an
/// explicit operator every segment between separators becomes one lowercased
/// term as-is (a segment like `"quick brown"` stays a single term). Without one
/// the whole query is tokenized and combined with AND.
pub fn parse_query(query: &str) -> ParsedQuery {
    let upper = query.trim().to_uppercase();

    if upper.contains(AND_SEPARATOR) {
        ParsedQuery { operator: Operator::And, terms: split_segments(&upper, AND_SEPARATOR) }
    } else if upper.contains(OR_SEPARATOR) {
        ParsedQuery { operator: Operator::Or, terms: split_segments(&upper, OR_SEPARATOR) }
    } else {
        ParsedQuery { operator: Operator::And, terms: tokenize(&upper) }
    }
}

fn split_segments(upper: &str, separator: &str) -> Vec<String> {
    upper.split(separator).map(|segment| segment.trim().to_lowercase()).collect()
}
