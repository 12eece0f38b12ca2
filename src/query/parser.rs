//! Query lexing shared by the boolean retrieval strategies.

/// One token of a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    /// A combining operator between term result sets
    Op(Operator),
    /// A literal term matched against stored content
    Term(String),
}

/// Set-combining operator recognized in extended boolean queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Intersect with the running result (the default between terms)
    #[default]
    And,
    /// Union with the running result
    Or,
    /// Subtract from the running result
    Not,
}

/// Lex a query into operator and term tokens.
///
/// The query is lowercased before splitting, so `AND` and `and` are the
/// same operator and every term comes out lowercased for the downstream
/// case-insensitive substring match.
pub fn parse_query(query: &str) -> Vec<QueryToken> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| match word {
            "and" => QueryToken::Op(Operator::And),
            "or" => QueryToken::Op(Operator::Or),
            "not" => QueryToken::Op(Operator::Not),
            term => QueryToken::Term(term.to_owned()),
        })
        .collect()
}

/// Lex a query into plain lowercased terms. Operator words are not special
/// here: plain boolean search treats every token as a term.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}
