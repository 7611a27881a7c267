use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NON_LETTER: Regex = Regex::new(r"[^a-z\s]").expect("valid regex");
}

/// Tokenize text into normalized terms: lowercase, drop everything that is not
/// `a-z` or whitespace, then split on whitespace runs.
///
/// Stripped characters are removed rather than replaced, so `"IPSO-3"` yields
/// `"ipso"` and `"don't"` yields `"dont"`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = NON_LETTER.replace_all(&lowered, "");
    stripped.split_whitespace().map(str::to_string).collect()
}

/// The set of distinct terms in `text`. Term frequency is not tracked.
pub fn unique_terms(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
