//! Structural extraction of Helm-style image blocks.
//!
//! Recognizes this shape anywhere in a document:
//!
//! ```yaml
//! image:
//!   registry: docker.io
//!   repository: bitnami/redis
//!   tag: 7.2.4
//! ```
//!
//! and synthesizes `registry/repository:tag` from it.

use std::fmt;
use std::path::Path;

use conscanner_core::error::{Result, ScanError};
use serde::Deserialize;
use serde_yaml::Value;

use crate::set::ReferenceSet;

/// Field whose mapping value describes an image.
const IMAGE_KEY: &str = "image";

/// A parsed YAML document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(String),
    Sequence(Vec<Node>),
    /// Entries in document order. Non-scalar keys are kept with an empty name.
    Mapping(Vec<(String, Node)>),
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(String::new()),
            Value::Bool(b) => Node::Scalar(b.to_string()),
            Value::Number(n) => Node::Scalar(n.to_string()),
            Value::String(s) => Node::Scalar(s),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(entries) => Node::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key_name(key), Node::from(value)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

fn key_name(key: Value) -> String {
    match Node::from(key) {
        Node::Scalar(name) => name,
        _ => String::new(),
    }
}

impl Node {
    /// Value of the first entry named `key` in a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Visit this node and all of its descendants once, depth first.
    pub fn walk<V: NodeVisitor>(&self, visitor: &mut V) {
        match self {
            Node::Scalar(_) => {}
            Node::Sequence(items) => {
                for item in items {
                    item.walk(visitor);
                }
            }
            Node::Mapping(entries) => {
                for (key, value) in entries {
                    visitor.visit_entry(key, value);
                    value.walk(visitor);
                }
            }
        }
    }
}

/// Flow-style text: scalars as-is, `[a, b]` for sequences and `{k: v}`
/// for mappings.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(s) => f.write_str(s),
            Node::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Mapping(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Callback for mapping entries encountered during a walk.
pub trait NodeVisitor {
    fn visit_entry(&mut self, key: &str, value: &Node);
}

/// Collects references synthesized from `image` mappings.
#[derive(Debug, Default)]
pub struct ImageBlockCollector {
    pub references: Vec<String>,
}

impl NodeVisitor for ImageBlockCollector {
    fn visit_entry(&mut self, key: &str, value: &Node) {
        if key != IMAGE_KEY {
            return;
        }
        // `image: nginx:1.25` and other shapes are left to the pattern search
        if !matches!(value, Node::Mapping(_)) {
            return;
        }
        let field = |name: &str| value.get(name).map(Node::to_string).unwrap_or_default();
        self.references.push(format!(
            "{}/{}:{}",
            field("registry"),
            field("repository"),
            field("tag")
        ));
    }
}

/// Parse YAML text into one tree per document.
pub fn parse_documents(text: &str) -> std::result::Result<Vec<Node>, serde_yaml::Error> {
    serde_yaml::Deserializer::from_str(text)
        .map(|document| Value::deserialize(document).map(Node::from))
        .collect()
}

/// Finds image blocks in YAML manifests.
#[derive(Debug, Clone, Default)]
pub struct StructuralExtractor;

impl StructuralExtractor {
    pub fn new() -> Self {
        Self
    }

    /// References synthesized from every document in `text`.
    pub fn references(&self, path: &Path, text: &str) -> Result<Vec<String>> {
        let documents = parse_documents(text).map_err(|e| ScanError::ManifestParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut collector = ImageBlockCollector::default();
        for document in &documents {
            document.walk(&mut collector);
        }
        Ok(collector.references)
    }

    /// Add every synthesized reference to `set`. A parse failure adds
    /// nothing from the file.
    pub fn extract(&self, path: &Path, text: &str, set: &ReferenceSet) -> Result<usize> {
        let references = self.references(path, text)?;
        let found = references.len();
        for reference in references {
            tracing::debug!(reference = %reference, path = %path.display(), "Image block");
            set.insert(reference);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn references(text: &str) -> Vec<String> {
        StructuralExtractor::new()
            .references(Path::new("values.yaml"), text)
            .unwrap()
    }

    #[test]
    fn test_top_level_image_block() {
        let text = "image:\n  registry: r\n  repository: repo\n  tag: t\n";
        assert_eq!(references(text), vec!["r/repo:t"]);
    }

    #[test]
    fn test_nested_inside_sequences() {
        let text = r#"
services:
  - name: api
    deploy:
      image:
        registry: quay.io
        repository: org/api
        tag: v2
  - name: workers
    pools:
      - - image:
            registry: ghcr.io
            repository: org/worker
            tag: "1.0"
"#;
        assert_eq!(
            references(text),
            vec!["quay.io/org/api:v2", "ghcr.io/org/worker:1.0"]
        );
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let text = "image:\n  repository: bitnami/nginx\n";
        assert_eq!(references(text), vec!["/bitnami/nginx:"]);
    }

    #[test]
    fn test_non_string_fields_are_coerced() {
        let text = "image:\n  registry: registry.local\n  repository: app\n  tag: 42\n";
        assert_eq!(references(text), vec!["registry.local/app:42"]);
    }

    #[test]
    fn test_collection_fields_are_rendered() {
        let text = "image:\n  registry: [a, b]\n  repository: {x: 1}\n  tag: v1\n";
        assert_eq!(references(text), vec!["[a, b]/{x: 1}:v1"]);
    }

    #[test]
    fn test_node_display() {
        let documents = parse_documents("a: [1, {b: ~}]\n").unwrap();
        assert_eq!(documents[0].to_string(), "{a: [1, {b: }]}");
    }

    #[test]
    fn test_scalar_image_is_skipped() {
        let text = "containers:\n  - image: nginx:1.25\n  - image: ~\n";
        assert!(references(text).is_empty());
    }

    #[test]
    fn test_image_block_inside_image_block() {
        let text = r#"
image:
  registry: a.io
  repository: outer
  tag: "1"
  sidecar:
    image:
      registry: b.io
      repository: inner
      tag: "2"
"#;
        assert_eq!(references(text), vec!["a.io/outer:1", "b.io/inner:2"]);
    }

    #[test]
    fn test_multiple_documents() {
        let text = concat!(
            "image:\n  registry: a.io\n  repository: one\n  tag: \"1\"\n",
            "---\n",
            "image:\n  registry: b.io\n  repository: two\n  tag: \"2\"\n",
        );
        assert_eq!(references(text), vec!["a.io/one:1", "b.io/two:2"]);
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let text = "image: !custom\n  registry: a.io\n  repository: app\n  tag: !str v1\n";
        assert_eq!(references(text), vec!["a.io/app:v1"]);
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let err = StructuralExtractor::new()
            .references(Path::new("broken.yaml"), "image: [unclosed\n")
            .unwrap_err();
        assert!(matches!(err, ScanError::ManifestParse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_empty_file() {
        assert!(references("").is_empty());
    }

    #[test]
    fn test_walk_visits_every_entry_once() {
        struct Counter(usize);
        impl NodeVisitor for Counter {
            fn visit_entry(&mut self, _key: &str, _value: &Node) {
                self.0 += 1;
            }
        }

        let documents = parse_documents("a:\n  b: [ {c: 1}, {d: {e: 2}} ]\nf: 3\n").unwrap();
        let mut counter = Counter(0);
        for document in &documents {
            document.walk(&mut counter);
        }
        // a, b, c, d, e, f
        assert_eq!(counter.0, 6);
    }

    #[test]
    fn test_extract_inserts_into_set() {
        let set = ReferenceSet::new();
        set.insert("r/repo:t");
        let found = StructuralExtractor::new()
            .extract(
                Path::new("values.yaml"),
                "a:\n  image: {registry: r, repository: repo, tag: t}\n",
                &set,
            )
            .unwrap();
        assert_eq!(found, 1);
        assert_eq!(set.len(), 1);
    }
}
