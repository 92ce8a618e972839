//! A case-folded prefix tree for O(m) longest-match keyword lookup.

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
struct TrieNode<T> {
    children: HashMap<char, TrieNode<T>>,
    terminal: Option<T>,
}

impl<T> TrieNode<T> {
    fn new() -> Self {
        TrieNode {
            children: HashMap::new(),
            terminal: None,
        }
    }
}

/// Built once per dialect from its keyword table; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Trie<T> {
    root: TrieNode<T>,
}

impl<T: Clone> Trie<T> {
    /// Case-folded insertion of every `(keyword, value)` pair.
    pub fn build(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        let mut root = TrieNode::new();
        for (word, value) in entries {
            let mut node = &mut root;
            for ch in word.to_ascii_uppercase().chars() {
                node = node.children.entry(ch).or_insert_with(TrieNode::new);
            }
            node.terminal = Some(value);
        }
        Trie { root }
    }

    /// `Some(value)` iff `word` (case-insensitively) is a complete keyword.
    pub fn lookup(&self, word: &str) -> Option<T> {
        let mut node = &self.root;
        for ch in word.to_ascii_uppercase().chars() {
            node = node.children.get(&ch)?;
        }
        node.terminal.clone()
    }

    /// The longest keyword terminal reachable by advancing through
    /// `chars[offset..offset+max_len]`, returned with its matched length.
    ///
    /// This tracks the best terminal seen *while advancing*, not only the
    /// node reached at the end of the scanned run — a naive walk that only
    /// checks the final node misses e.g. `"AND"` inside `"ANDROID"` when a
    /// longer non-keyword run continues past it. Tracking the best-so-far
    /// terminal is what makes this genuinely longest-match.
    pub fn lookup_stream(&self, chars: &[char], offset: usize, max_len: usize) -> Option<(T, usize)> {
        let mut node = &self.root;
        let mut best: Option<(T, usize)> = None;
        let limit = chars.len().min(offset.saturating_add(max_len));
        let mut i = offset;
        while i < limit {
            let ch = chars[i].to_ascii_uppercase();
            match node.children.get(&ch) {
                Some(next) => {
                    node = next;
                    i += 1;
                    if let Some(value) = &node.terminal {
                        best = Some((value.clone(), i - offset));
                    }
                }
                None => break,
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let trie = Trie::build([("SELECT".to_string(), 1u8), ("FROM".to_string(), 2u8)]);
        assert_eq!(trie.lookup("select"), Some(1));
        assert_eq!(trie.lookup("SeLeCt"), Some(1));
        assert_eq!(trie.lookup("from"), Some(2));
        assert_eq!(trie.lookup("wibble"), None);
    }

    #[test]
    fn longest_match_prefers_deeper_terminal() {
        // "IN" is a prefix of "INNER" and "INTO" — an input lexeme of
        // exactly "INNER" must resolve to INNER's type, not IN's.
        let trie = Trie::build([
            ("IN".to_string(), "IN"),
            ("INNER".to_string(), "INNER"),
            ("INTO".to_string(), "INTO"),
        ]);
        let chars: Vec<char> = "INNER JOIN".chars().collect();
        let (value, len) = trie.lookup_stream(&chars, 0, chars.len()).unwrap();
        assert_eq!(value, "INNER");
        assert_eq!(len, 5);
    }

    #[test]
    fn longest_match_falls_back_to_shorter_terminal_when_run_continues_past_it() {
        // "AND" is a real keyword; "ANDROID" is not. The scan keeps
        // advancing past the "AND" terminal into non-keyword territory, but
        // must still report "AND" as the best match reached so far.
        let trie = Trie::build([("AND".to_string(), "AND")]);
        let chars: Vec<char> = "ANDROID".chars().collect();
        let (value, len) = trie.lookup_stream(&chars, 0, chars.len()).unwrap();
        assert_eq!(value, "AND");
        assert_eq!(len, 3);
    }
}
