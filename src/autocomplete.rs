use std::{collections::HashMap, io, sync::Arc};

use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("empty word")]
    EmptyWord,
}

/// Normalize a word or query: trim surrounding whitespace and lowercase.
pub fn normalize_word(s: &str) -> String {
    s.trim().to_lowercase()
}

/// A single ranked completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub word: String,
    pub score: i64,
}

/// One character position in the trie.
#[derive(Debug)]
pub struct Node {
    children: HashMap<char, Node>,
    is_terminal: bool,
    score: i64,

    // The text from the root to this node is `word[..path_len]`. Every node
    // created by one insert shares that insert's word, which keeps memory
    // linear in the word length.
    word: Arc<str>,
    path_len: usize,
}

impl Node {
    pub fn new() -> Self {
        Self::with_path(Arc::from(""), 0)
    }

    fn with_path(word: Arc<str>, path_len: usize) -> Self {
        Self {
            children: HashMap::new(),
            is_terminal: false,
            score: 0,
            word,
            path_len,
        }
    }

    /// Full text from the root to this node.
    pub fn path_text(&self) -> &str {
        &self.word[..self.path_len]
    }

    /// Children sorted by their path text.
    fn sorted_children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = self.children.values().collect();
        out.sort_by(|a, b| a.path_text().cmp(b.path_text()));
        out
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

// Subtrees are dropped from an explicit stack, so drop depth does not grow
// with word length.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Node> = self.children.drain().map(|(_, n)| n).collect();
        while let Some(mut n) = stack.pop() {
            stack.extend(n.children.drain().map(|(_, c)| c));
        }
    }
}

/// In-memory prefix tree of words and their scores.
///
/// The index is filled once at startup and then only read. Handlers get it
/// behind an `Arc`, so lookups never contend with writes.
#[derive(Debug, Default)]
pub struct Index {
    root: Node,
    num_words: usize,
    num_nodes: usize,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a word with its score. Inserting an existing word overwrites its score.
    pub fn insert(&mut self, word: &str, score: i64) -> Result<(), IndexError> {
        if word.is_empty() {
            return Err(IndexError::EmptyWord);
        }

        let shared: Arc<str> = Arc::from(word);
        let num_nodes = &mut self.num_nodes;
        let mut node = &mut self.root;

        for (i, ch) in word.char_indices() {
            let end = i + ch.len_utf8();
            node = node.children.entry(ch).or_insert_with(|| {
                *num_nodes += 1;
                Node::with_path(shared.clone(), end)
            });
        }

        if !node.is_terminal {
            node.is_terminal = true;
            self.num_words += 1;
        }
        node.score = score;

        Ok(())
    }

    /// All words starting with `prefix`, highest score first. Equal scores are
    /// ordered by word. An empty prefix matches every word.
    pub fn search_prefix(&self, prefix: &str) -> Vec<Suggestion> {
        let anchor = match self.find(prefix) {
            Some(n) => n,
            None => return Vec::new(),
        };

        let mut nodes = collect(anchor);
        nodes.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.path_text().cmp(b.path_text()))
        });

        nodes
            .into_iter()
            .map(|n| Suggestion {
                word: n.path_text().to_string(),
                score: n.score,
            })
            .collect()
    }

    /// Same as `search_prefix`, but returns at most `limit` results (0 = no limit).
    pub fn search_prefix_limit(&self, prefix: &str, limit: usize) -> Vec<Suggestion> {
        let mut out = self.search_prefix(prefix);
        if limit > 0 {
            out.truncate(limit);
        }
        out
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.num_words
    }

    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    /// Number of nodes, excluding the root.
    pub fn node_count(&self) -> usize {
        self.num_nodes
    }

    /// Write a human readable dump of the subtree under `prefix`, one node per
    /// line, indented with a tab per level. Siblings are sorted by path text.
    /// Writes nothing if no node exists for `prefix`.
    pub fn dump<W: io::Write>(&self, prefix: &str, w: &mut W) -> io::Result<()> {
        let anchor = match self.find(prefix) {
            Some(n) => n,
            None => return Ok(()),
        };

        // Pre-order walk. Children are pushed in reverse so the smallest pops first.
        let mut stack = vec![(anchor, 0usize)];
        while let Some((node, level)) = stack.pop() {
            writeln!(w, "{}{}", "\t".repeat(level), node.path_text())?;
            for child in node.sorted_children().into_iter().rev() {
                stack.push((child, level + 1));
            }
        }
        Ok(())
    }

    /// Walk the trie along `prefix` and return the node it ends on.
    fn find(&self, prefix: &str) -> Option<&Node> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

/// Every terminal node under (and including) `node`, in no particular order.
fn collect(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut stack = vec![node];

    while let Some(n) = stack.pop() {
        if n.is_terminal {
            out.push(n);
        }
        stack.extend(n.children.values());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn words(res: &[Suggestion]) -> Vec<&str> {
        res.iter().map(|s| s.word.as_str()).collect()
    }

    #[test]
    fn test_new_node() {
        let n = Node::new();
        assert!(n.children.is_empty());
        assert!(!n.is_terminal);
        assert_eq!(n.score, 0);
        assert_eq!(n.path_text(), "");
    }

    #[test]
    fn test_insert_and_search_exact() {
        let mut idx = Index::new();
        idx.insert("cat", 5).unwrap();

        let res = idx.search_prefix("cat");
        assert_eq!(
            res,
            vec![Suggestion {
                word: "cat".to_string(),
                score: 5
            }]
        );
    }

    #[test]
    fn test_insert_overwrites_score() {
        let mut idx = Index::new();
        idx.insert("cat", 5).unwrap();
        idx.insert("cat", 9).unwrap();

        let res = idx.search_prefix("cat");
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].score, 9);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.node_count(), 3);
    }

    #[test]
    fn test_ranking() {
        let mut idx = Index::new();
        idx.insert("cap", 1).unwrap();
        idx.insert("car", 10).unwrap();
        idx.insert("cat", 5).unwrap();

        assert_eq!(words(&idx.search_prefix("ca")), vec!["car", "cat", "cap"]);
    }

    #[test]
    fn test_ties_ordered_by_word() {
        let mut idx = Index::new();
        idx.insert("dog", 3).unwrap();
        idx.insert("do", 3).unwrap();
        idx.insert("dot", 3).unwrap();
        idx.insert("door", 7).unwrap();

        assert_eq!(
            words(&idx.search_prefix("do")),
            vec!["door", "do", "dog", "dot"]
        );
    }

    #[test]
    fn test_anchor_is_included() {
        let mut idx = Index::new();
        idx.insert("car", 2).unwrap();
        idx.insert("cart", 4).unwrap();

        assert_eq!(words(&idx.search_prefix("car")), vec!["cart", "car"]);
        assert_eq!(words(&idx.search_prefix("cart")), vec!["cart"]);
    }

    #[test]
    fn test_no_match() {
        let mut idx = Index::new();
        idx.insert("cat", 5).unwrap();

        assert!(idx.search_prefix("xyz").is_empty());
        assert!(idx.search_prefix("cats").is_empty());
        assert!(Index::new().search_prefix("a").is_empty());
    }

    #[test]
    fn test_intermediate_node_is_not_a_word() {
        let mut idx = Index::new();
        idx.insert("cart", 1).unwrap();

        assert!(idx.search_prefix("car").iter().all(|s| s.word == "cart"));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn test_empty_word_rejected() {
        let mut idx = Index::new();
        assert_eq!(idx.insert("", 3), Err(IndexError::EmptyWord));
        assert!(idx.is_empty());
        assert!(idx.search_prefix("").is_empty());
        assert!(!idx.root.is_terminal);
    }

    #[test]
    fn test_empty_prefix_matches_all() {
        let mut idx = Index::new();
        idx.insert("a", 1).unwrap();
        idx.insert("b", 2).unwrap();
        idx.insert("ab", 3).unwrap();

        assert_eq!(words(&idx.search_prefix("")), vec!["ab", "b", "a"]);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut idx = Index::new();
        idx.insert("café", 2).unwrap();
        idx.insert("cafè", 1).unwrap();

        assert_eq!(words(&idx.search_prefix("caf")), vec!["café", "cafè"]);
        assert_eq!(words(&idx.search_prefix("café")), vec!["café"]);
        assert_eq!(idx.node_count(), 5);
    }

    #[test]
    fn test_negative_scores() {
        let mut idx = Index::new();
        idx.insert("low", -5).unwrap();
        idx.insert("lot", 0).unwrap();

        assert_eq!(words(&idx.search_prefix("lo")), vec!["lot", "low"]);
    }

    #[test]
    fn test_search_limit() {
        let mut idx = Index::new();
        for (i, w) in ["aa", "ab", "ac", "ad"].iter().enumerate() {
            idx.insert(w, i as i64).unwrap();
        }

        assert_eq!(words(&idx.search_prefix_limit("a", 2)), vec!["ad", "ac"]);
        assert_eq!(idx.search_prefix_limit("a", 0).len(), 4);
        assert_eq!(idx.search_prefix_limit("a", 10).len(), 4);
    }

    #[test]
    fn test_path_text_matches_path() {
        let mut idx = Index::new();
        idx.insert("tea", 1).unwrap();

        let t = &idx.root.children[&'t'];
        let e = &t.children[&'e'];
        let a = &e.children[&'a'];
        assert_eq!(t.path_text(), "t");
        assert_eq!(e.path_text(), "te");
        assert_eq!(a.path_text(), "tea");
        assert!(a.is_terminal);
        assert!(!e.is_terminal);
    }

    #[test]
    fn test_dump() {
        let mut idx = Index::new();
        idx.insert("to", 1).unwrap();
        idx.insert("tea", 1).unwrap();
        idx.insert("ten", 1).unwrap();
        idx.insert("a", 1).unwrap();

        let mut buf = Vec::new();
        idx.dump("", &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "\n\ta\n\tt\n\t\tte\n\t\t\ttea\n\t\t\tten\n\t\tto\n");

        let mut buf = Vec::new();
        idx.dump("te", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "te\n\ttea\n\tten\n");

        let mut buf = Vec::new();
        idx.dump("zz", &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Hello "), "hello");
        assert_eq!(normalize_word("ÉCOLE"), "école");
        assert_eq!(normalize_word(""), "");
    }

    #[test]
    fn test_long_word() {
        let long = "a".repeat(20_000);
        let mut idx = Index::new();
        idx.insert(&long, 7).unwrap();
        idx.insert(&long[..10_000], 3).unwrap();
        assert_eq!(idx.node_count(), 20_000);

        let res = idx.search_prefix("");
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].word, long);
        assert_eq!(res[0].score, 7);
        assert_eq!(res[1].word.len(), 10_000);

        assert_eq!(idx.search_prefix(&long).len(), 1);

        idx.dump("", &mut io::sink()).unwrap();

        let mut buf = Vec::new();
        idx.dump(&long[..19_998], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], format!("\t\t{}", long));

        drop(idx);
    }

    #[test]
    fn test_drop_deep_subtree() {
        let mut idx = Index::new();
        for ch in ['x', 'y', 'z'] {
            idx.insert(&ch.to_string().repeat(50_000), 1).unwrap();
        }
        assert_eq!(idx.len(), 3);
        drop(idx);
    }

    fn word_set() -> impl Strategy<Value = HashMap<String, i64>> {
        prop::collection::hash_map("[a-d]{1,6}", -100i64..100, 0..40)
    }

    proptest! {
        #[test]
        fn prop_every_prefix_finds_word(words in word_set()) {
            let mut idx = Index::new();
            for (w, s) in &words {
                idx.insert(w, *s).unwrap();
            }

            for (w, s) in &words {
                let chars: Vec<char> = w.chars().collect();
                for i in 0..=chars.len() {
                    let p: String = chars[..i].iter().collect();
                    let res = idx.search_prefix(&p);
                    prop_assert!(res.iter().any(|r| &r.word == w && r.score == *s));
                }
            }
        }

        #[test]
        fn prop_results_start_with_prefix(words in word_set(), prefix in "[a-d]{0,3}") {
            let mut idx = Index::new();
            for (w, s) in &words {
                idx.insert(w, *s).unwrap();
            }

            let res = idx.search_prefix(&prefix);
            prop_assert!(res.iter().all(|r| r.word.starts_with(&prefix)));

            let expected = words.keys().filter(|w| w.starts_with(&prefix)).count();
            prop_assert_eq!(res.len(), expected);

            for pair in res.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }

        #[test]
        fn prop_empty_prefix_returns_all(words in word_set(), repeats in 1usize..3) {
            let mut idx = Index::new();
            for _ in 0..repeats {
                for (w, s) in &words {
                    idx.insert(w, *s).unwrap();
                }
            }

            prop_assert_eq!(idx.search_prefix("").len(), words.len());
            prop_assert_eq!(idx.len(), words.len());
        }
    }
}
