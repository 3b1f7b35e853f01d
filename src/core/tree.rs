//! Radix tree of browscap patterns.
//!
//! Every edge carries a pattern segment; the concatenation of segments from
//! the root spells a pattern prefix. Nodes whose prefix is a complete pattern
//! point at the matching property row (`entry`), the others are partial
//! nodes that only share a prefix. Nodes live in a flat arena so the tree
//! serializes without nesting.

use crate::core::matcher::{matches_chars, STAR};
use crate::core::pattern::literal_length;
use crate::utils::error::{BrowscapError, Result};
use serde::{Deserialize, Serialize};

const ROOT: usize = 0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternNode {
    pub segment: String,
    pub entry: Option<usize>,
    /// Longest literal length of any full pattern in this subtree.
    pub max_length: usize,
    pub children: Vec<usize>,
}

impl PatternNode {
    fn new(segment: String, entry: Option<usize>) -> Self {
        Self {
            segment,
            entry,
            max_length: 0,
            children: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.entry.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTree {
    nodes: Vec<PatternNode>,
    patterns: usize,
    optimized: bool,
}

impl Default for PatternTree {
    fn default() -> Self {
        Self {
            nodes: vec![PatternNode::default()],
            patterns: 0,
            optimized: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMatch {
    pub entry: usize,
    pub pattern: String,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub full: usize,
    pub partial: usize,
    pub max_depth: usize,
}

impl PatternTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full patterns stored.
    pub fn len(&self) -> usize {
        self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns == 0
    }

    pub fn root(&self) -> &PatternNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, index: usize) -> &PatternNode {
        &self.nodes[index]
    }

    pub fn is_optimized(&self) -> bool {
        self.optimized
    }

    /// Adds `pattern`, pointing at property row `entry`.
    ///
    /// Existing segments are split at the first differing character. A
    /// partial node whose prefix equals `pattern` becomes full.
    pub fn insert(&mut self, pattern: &str, entry: usize) -> Result<()> {
        let mut current = ROOT;
        let mut rest = pattern;

        loop {
            if rest.is_empty() {
                let node = &mut self.nodes[current];
                if node.entry.is_some() {
                    return Err(BrowscapError::DuplicatePattern {
                        pattern: pattern.to_string(),
                    });
                }
                node.entry = Some(entry);
                break;
            }

            let first = rest.chars().next();
            let found = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].segment.chars().next() == first);

            let Some(child) = found else {
                let leaf = self.push(PatternNode::new(rest.to_string(), Some(entry)));
                self.nodes[current].children.push(leaf);
                break;
            };

            let common = common_prefix_len(&self.nodes[child].segment, rest);
            if common < self.nodes[child].segment.len() {
                self.split(child, common);
            }
            current = child;
            rest = &rest[common..];
        }

        self.patterns += 1;
        self.optimized = false;
        Ok(())
    }

    /// Computes `max_length` for every node and sorts siblings by it,
    /// longest first. The sort is stable, so equal siblings keep insertion
    /// order.
    pub fn optimize(&mut self) {
        self.optimize_node(ROOT, 0);
        self.optimized = true;
    }

    /// Best pattern matching `user_agent`: the one with the most literal
    /// characters. On a tie the first one reached in depth-first order wins,
    /// which after [`optimize`](Self::optimize) means the sibling with the
    /// longest subtree. Patterns without literals never match.
    pub fn find_best(&self, user_agent: &str, ignore_case: bool) -> Option<TreeMatch> {
        let mut search = Search {
            tree: self,
            text: user_agent.chars().collect(),
            ignore_case,
            path: Vec::new(),
            best: None,
        };
        search.consider(self.root(), 0);
        search.visit_children(self.root(), 0);
        search.best
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            let node = &self.nodes[index];
            stats.nodes += 1;
            if node.is_full() {
                stats.full += 1;
            } else {
                stats.partial += 1;
            }
            stats.max_depth = stats.max_depth.max(depth);
            stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
        }
        stats
    }

    fn push(&mut self, node: PatternNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    // Keeps `segment[..at]` at `index` and moves the remainder, with the
    // entry and children, into a new child.
    fn split(&mut self, index: usize, at: usize) {
        let node = &mut self.nodes[index];
        let tail = node.segment.split_off(at);
        let moved = PatternNode {
            segment: tail,
            entry: node.entry.take(),
            max_length: 0,
            children: std::mem::take(&mut node.children),
        };
        let moved = self.push(moved);
        self.nodes[index].children.push(moved);
    }

    fn optimize_node(&mut self, index: usize, base_length: usize) -> usize {
        let length = base_length + literal_length(&self.nodes[index].segment);
        let mut max_length = if self.nodes[index].is_full() { length } else { 0 };

        let mut children = std::mem::take(&mut self.nodes[index].children);
        for &child in &children {
            max_length = max_length.max(self.optimize_node(child, length));
        }
        children.sort_by(|&a, &b| self.nodes[b].max_length.cmp(&self.nodes[a].max_length));

        let node = &mut self.nodes[index];
        node.children = children;
        node.max_length = max_length;
        max_length
    }
}

struct Search<'t> {
    tree: &'t PatternTree,
    text: Vec<char>,
    ignore_case: bool,
    path: Vec<char>,
    best: Option<TreeMatch>,
}

impl Search<'_> {
    fn visit_children(&mut self, node: &PatternNode, length: usize) {
        let tree = self.tree;
        for &index in &node.children {
            let child = tree.node(index);
            // Siblings are sorted by max_length, nothing further can win.
            if tree.optimized && child.max_length <= self.best_length() {
                break;
            }

            let mark = self.path.len();
            self.path.extend(child.segment.chars());
            if self.prefix_matches() {
                let child_length = length + literal_length(&child.segment);
                self.consider(child, child_length);
                self.visit_children(child, child_length);
            }
            self.path.truncate(mark);
        }
    }

    fn consider(&mut self, node: &PatternNode, length: usize) {
        let Some(entry) = node.entry else {
            return;
        };
        // A trailing star was already checked by prefix_matches.
        let ends_with_star = self.path.last() == Some(&STAR);
        if !ends_with_star && !matches_chars(&self.path, &self.text, self.ignore_case) {
            return;
        }

        // Only strictly longer literal matches replace the current best, so a
        // pattern without literals (`*`) never counts as a match.
        if length > self.best_length() {
            self.best = Some(TreeMatch {
                entry,
                pattern: self.path.iter().collect(),
                length,
            });
        }
    }

    fn best_length(&self) -> usize {
        self.best.as_ref().map_or(0, |best| best.length)
    }

    /// Whether some pattern starting with the current path could match.
    fn prefix_matches(&mut self) -> bool {
        if self.path.last() == Some(&STAR) {
            return matches_chars(&self.path, &self.text, self.ignore_case);
        }
        self.path.push(STAR);
        let result = matches_chars(&self.path, &self.text, self.ignore_case);
        self.path.pop();
        result
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(patterns: &[&str]) -> PatternTree {
        let mut tree = PatternTree::new();
        for (entry, pattern) in patterns.iter().enumerate() {
            tree.insert(pattern, entry).unwrap();
        }
        tree
    }

    fn segments<'a>(tree: &'a PatternTree, node: &PatternNode) -> Vec<&'a str> {
        node.children
            .iter()
            .map(|&child| tree.node(child).segment.as_str())
            .collect()
    }

    fn only_child<'a>(tree: &'a PatternTree, node: &PatternNode) -> &'a PatternNode {
        assert_eq!(node.children.len(), 1);
        tree.node(node.children[0])
    }

    #[test]
    fn test_common_prefix_becomes_parent() {
        let tree = build(&["Mozilla/4.0 Test", "Mozilla/5.0 Test"]);
        let parent = only_child(&tree, tree.root());
        assert_eq!(parent.segment, "Mozilla/");
        assert!(!parent.is_full());
        assert_eq!(segments(&tree, parent), vec!["4.0 Test", "5.0 Test"]);
    }

    #[test]
    fn test_no_common_prefix_hangs_from_root() {
        let tree = build(&["Mozilla/4.0 Test", "curl/7.52.1"]);
        assert_eq!(segments(&tree, tree.root()), vec!["Mozilla/4.0 Test", "curl/7.52.1"]);
    }

    #[test]
    fn test_duplicate_pattern_is_rejected() {
        let mut tree = build(&["Mozilla/4.0 Test"]);
        let err = tree.insert("Mozilla/4.0 Test", 1).unwrap_err();
        assert!(matches!(err, BrowscapError::DuplicatePattern { pattern } if pattern == "Mozilla/4.0 Test"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_suffixed_pattern_becomes_child() {
        let tree = build(&["One", "One Two"]);
        let parent = only_child(&tree, tree.root());
        assert_eq!(parent.segment, "One");
        assert!(parent.is_full());
        assert_eq!(segments(&tree, parent), vec![" Two"]);
    }

    #[test]
    fn test_grandchild() {
        let tree = build(&["One", "One Two", "One Two Three"]);
        let one = only_child(&tree, tree.root());
        let two = only_child(&tree, one);
        let three = only_child(&tree, two);
        assert_eq!(
            (one.segment.as_str(), two.segment.as_str(), three.segment.as_str()),
            ("One", " Two", " Three")
        );
    }

    #[test]
    fn test_second_child_keeps_insertion_order() {
        let tree = build(&["One", "OneTwo", "OneFour"]);
        let one = only_child(&tree, tree.root());
        assert_eq!(segments(&tree, one), vec!["Two", "Four"]);
    }

    #[test]
    fn test_empty_pattern_and_split_below_root() {
        let tree = build(&["", "ab", "ac"]);
        assert!(tree.root().is_full());
        let a = only_child(&tree, tree.root());
        assert_eq!(a.segment, "a");
        assert_eq!(segments(&tree, a), vec!["b", "c"]);
    }

    #[test]
    fn test_partial_becomes_full() {
        let tree = build(&["ab", "ac", "a"]);
        let a = only_child(&tree, tree.root());
        assert_eq!(a.entry, Some(2));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_optimize_sorts_by_max_length() {
        let mut tree = build(&["a*", "abcdef", "b"]);
        tree.optimize();
        // "a" prefix holds "abcdef" (6 literals), "b" holds 1.
        assert_eq!(segments(&tree, tree.root()), vec!["a", "b"]);
        assert_eq!(tree.root().max_length, 6);
        let a = tree.node(tree.root().children[0]);
        assert_eq!(segments(&tree, a), vec!["bcdef", "*"]);
    }

    #[test]
    fn test_last_node_is_star() {
        let mut tree = build(&["abcd", "abc*"]);
        tree.optimize();
        let found = tree.find_best("abce", false).unwrap();
        assert_eq!(found.pattern, "abc*");
        assert_eq!(found.entry, 1);
    }

    #[test]
    fn test_longest_literal_wins() {
        let mut tree = build(&[
            "*",
            "Mozilla/5.0 (*",
            "Mozilla/5.0 (*Windows NT 10.0*WOW64*Trident/7.0*rv:11.0*",
            "Mozilla/5.0 (*Windows NT 10.0*",
        ]);
        tree.optimize();
        let user_agent = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko";
        let found = tree.find_best(user_agent, false).unwrap();
        assert_eq!(found.entry, 2);
        assert_eq!(found.length, 51);
    }

    #[test]
    fn test_ties_go_to_first_found() {
        let mut tree = build(&["ab?", "a?c"]);
        tree.optimize();
        assert_eq!(tree.find_best("abc", false).unwrap().pattern, "ab?");
    }

    #[test]
    fn test_ties_follow_search_order_not_entry_order() {
        let mut tree = build(&["ab?", "a?c", "a?cdef*"]);
        tree.optimize();
        // `?c` leads to a longer pattern, so it is visited before `b?`.
        let found = tree.find_best("abc", false).unwrap();
        assert_eq!(found.pattern, "a?c");
        assert_eq!(found.entry, 1);
    }

    #[test]
    fn test_catch_all_star_is_not_a_match() {
        let mut tree = build(&["*", "curl/*"]);
        tree.optimize();
        assert!(tree.find_best("Wget/1.0", false).is_none());
        assert!(tree.find_best("", false).is_none());
        assert_eq!(tree.find_best("curl/7.0", false).unwrap().pattern, "curl/*");
    }

    #[test]
    fn test_literal_free_patterns_never_match() {
        let mut tree = build(&["???", "*?*"]);
        tree.optimize();
        assert!(tree.find_best("abc", false).is_none());
    }

    #[test]
    fn test_exact_pattern_must_match_whole_user_agent() {
        let mut tree = build(&["curl/7.0"]);
        tree.optimize();
        assert!(tree.find_best("curl/7.0 extra", false).is_none());
        assert!(tree.find_best("curl/7.0", false).is_some());
    }

    #[test]
    fn test_search_without_optimize() {
        let tree = build(&["a*", "abc*"]);
        assert_eq!(tree.find_best("abcd", false).unwrap().pattern, "abc*");
    }

    #[test]
    fn test_stats() {
        let tree = build(&["ab", "ac", "abd"]);
        let stats = tree.stats();
        // root, "a", "b", "c", "d"
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.full, 3);
        assert_eq!(stats.partial, 2);
        assert_eq!(stats.max_depth, 3);
    }
}
