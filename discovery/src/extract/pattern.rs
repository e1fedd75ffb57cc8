//! Grammar-driven reference matching over raw file text.
//!
//! ```text
//! reference      := name [ ":" tag ] [ "@" digest ]
//! name           := [hostname '/'] component ['/' component]*
//! hostname       := hostcomponent ['.' hostcomponent]* [':' port-number]
//! hostcomponent  := /([a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])/
//! port-number    := /[0-9]+/
//! component      := alpha-numeric [separator alpha-numeric]*
//! alpha-numeric  := /[a-z0-9]+/
//! separator      := /[_.]|__|[-]*/
//! tag            := /[\w][\w.-]{0,127}/
//! digest         := algorithm ":" /[0-9a-fA-F]{32,}/
//! algorithm      := /[A-Za-z][A-Za-z0-9]*/ [ /[+.-_]/ /[A-Za-z][A-Za-z0-9]*/ ]
//! ```
//!
//! Text search requires the leading `segment/` and the `:tag`, otherwise
//! every bare word in a file would be a match. The search is not YAML
//! aware, so comments, block strings and templated values are covered too.
//! Matches such as `example.com/path:8080` are expected and fall out
//! during validation.

use conscanner_core::error::{Result, ScanError};
use regex::{Regex, RegexBuilder};

use crate::set::ReferenceSet;

const HOST_COMPONENT: &str = r"(?:[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]|[a-zA-Z0-9])";
const PATH_COMPONENT: &str = r"[a-z0-9]+(?:(?:_|\.|__|-*)[a-z0-9]+)*";
const TAG: &str = r"[0-9A-Za-z_][0-9A-Za-z_.-]{0,127}";
const DIGEST: &str = r"[A-Za-z][A-Za-z0-9]*(?:[+.-_][A-Za-z][A-Za-z0-9]*)?:[0-9a-fA-F]{32,}";

/// Unanchored reference expression.
pub fn reference_expression() -> String {
    format!(
        "{host}(?:\\.{host})*(?::[0-9]+)?/{comp}(?:/{comp})*:{tag}(?:@{digest})?",
        host = HOST_COMPONENT,
        comp = PATH_COMPONENT,
        tag = TAG,
        digest = DIGEST,
    )
}

fn compile(expression: &str) -> Result<Regex> {
    RegexBuilder::new(expression)
        .size_limit(10 * (1 << 21))
        .build()
        .map_err(|e| ScanError::Other(format!("Invalid reference expression: {}", e)))
}

/// Finds image references in arbitrary text.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    search: Regex,
    whole: Regex,
}

impl PatternExtractor {
    pub fn new() -> Result<Self> {
        let expression = reference_expression();
        Ok(Self {
            search: compile(&expression)?,
            whole: compile(&format!("^(?:{})$", expression))?,
        })
    }

    /// Every non-overlapping match, left to right.
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.search.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// Whether `candidate` is a reference in its entirety.
    pub fn is_reference(&self, candidate: &str) -> bool {
        self.whole.is_match(candidate)
    }

    /// Add every match in `text` to `set` verbatim. Returns the number of
    /// matches found.
    pub fn extract(&self, text: &str, set: &ReferenceSet) -> usize {
        let mut found = 0;
        for reference in self.find_all(text) {
            tracing::debug!(reference = %reference, "Pattern match");
            set.insert(reference);
            found += 1;
        }
        found
    }
}
