//! Free-text search query parsing.
//!
//! A search box accepts plain words mixed with `keyword:value` tokens:
//!
//! ```text
//! 상호:"에이스 마트" 전화:02-1234 강남
//! ```
//!
//! [`QueryParser`] pulls every whitelisted token out of the input and leaves
//! the rest as a general search term. Values are either double-quoted (may
//! contain whitespace, quotes are stripped) or an unquoted run of characters
//! that are neither whitespace nor commas.
//!
//! # Examples
//!
//! ```
//! use fixlog_persistence::search::QueryParser;
//!
//! let parser = QueryParser::new(["상호", "전화"]).unwrap();
//! let parsed = parser.parse(r#"상호:"acme corp" 전화:02-1234 extra text"#);
//!
//! assert_eq!(parsed.get("상호"), Some("acme corp"));
//! assert_eq!(parsed.get("전화"), Some("02-1234"));
//! assert_eq!(parsed.general_search, "extra text");
//! ```

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// The result of parsing one search input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Keyword to value. A repeated keyword keeps its last value.
    pub filters: HashMap<String, String>,
    /// Input left over once every token is removed, with commas turned into
    /// spaces and outer whitespace trimmed.
    pub general_search: String,
}

impl ParsedQuery {
    /// Returns the value given for `keyword`, if any.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.filters.get(keyword).map(String::as_str)
    }

    /// Returns `true` when neither filters nor a general term were found.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.general_search.is_empty()
    }
}

/// A search parser compiled for one keyword whitelist.
///
/// Compile once and reuse; [`QueryParser::parse`] takes `&self` and never
/// fails.
#[derive(Debug, Clone)]
pub struct QueryParser {
    keywords: Vec<String>,
    pattern: Regex,
}

impl QueryParser {
    /// Compiles a parser for the given keywords.
    ///
    /// Keywords are matched literally. Longer keywords are tried first so
    /// that `상호명` is never read as `상호` followed by `명`.
    pub fn new<I, S>(keywords: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if !keyword.is_empty() && !unique.iter().any(|k| k == keyword) {
                unique.push(keyword.to_string());
            }
        }
        let keywords = unique;
        if keywords.is_empty() {
            return Err(SearchError::EmptyKeywordList);
        }

        let mut alternatives: Vec<&str> = keywords.iter().map(String::as_str).collect();
        alternatives.sort_by_key(|k| std::cmp::Reverse(k.chars().count()));
        let alternation = alternatives
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&format!(
            r#"\s*({alternation})\s*:(?:"([^"]+)"|([^\s,]+))"#
        ))?;

        Ok(Self { keywords, pattern })
    }

    /// The whitelist in the order it was given.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Splits `input` into keyword filters and a general search term.
    pub fn parse(&self, input: &str) -> ParsedQuery {
        let mut filters = HashMap::new();
        let mut spans: Vec<Range<usize>> = Vec::new();

        for caps in self.pattern.captures_iter(input) {
            let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = caps.get(2).or_else(|| caps.get(3));
            if let Some(value) = value {
                filters.insert(keyword.as_str().to_string(), value.as_str().to_string());
                spans.push(whole.range());
            }
        }

        let mut residual = input.to_string();
        for span in spans.into_iter().rev() {
            residual.replace_range(span, "");
        }
        let general_search = residual.replace(',', " ").trim().to_string();

        ParsedQuery {
            filters,
            general_search,
        }
    }
}
