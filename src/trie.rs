//! Byte-keyed prefix tree over the element vocabulary.

use crate::element::ElementType;
use std::sync::OnceLock;

#[derive(Default)]
struct Node {
    value: Option<ElementType>,
    children: Vec<(u8, usize)>,
}

/// A compact trie mapping upper-cased element strings to element types.
///
/// Keys are stored upper-case only; the tokenizer looks up an upper-cased
/// copy of the format string and reads casing from the original bytes.
pub(crate) struct ElementTrie {
    nodes: Vec<Node>,
}

impl ElementTrie {
    fn new() -> ElementTrie {
        ElementTrie {
            nodes: vec![Node::default()],
        }
    }

    fn insert(&mut self, key: &str, value: ElementType) {
        let mut node = 0;
        for &b in key.as_bytes() {
            node = match self.nodes[node].children.iter().find(|&&(c, _)| c == b) {
                Some(&(_, child)) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.push((b, child));
                    child
                }
            };
        }
        self.nodes[node].value = Some(value);
    }

    /// Maximal-munch lookup: the longest prefix of `input` that is a
    /// recognized element string, with its byte length.
    pub(crate) fn longest_match(&self, input: &[u8]) -> Option<(ElementType, usize)> {
        let mut node = 0;
        let mut best = None;
        for (depth, &b) in input.iter().enumerate() {
            match self.nodes[node].children.iter().find(|&&(c, _)| c == b) {
                Some(&(_, child)) => {
                    node = child;
                    if let Some(value) = self.nodes[node].value {
                        best = Some((value, depth + 1));
                    }
                }
                None => break,
            }
        }
        best
    }

    fn with_full_vocabulary() -> ElementTrie {
        use ElementType::*;

        let mut trie = ElementTrie::new();

        // Simple literals.
        for key in ["-", ".", "/", ",", "'", ";", ":"] {
            trie.insert(key, SimpleLiteral);
        }

        // The opening quote of a quoted literal; the tokenizer scans for the
        // closing quote itself.
        trie.insert("\"", DoubleQuotedLiteral);

        // The first space of a whitespace run; the tokenizer extends it.
        trie.insert(" ", Whitespace);

        // Year.
        trie.insert("YYYY", YYYY);
        trie.insert("YYY", YYY);
        trie.insert("YY", YY);
        trie.insert("Y", Y);
        trie.insert("RRRR", RRRR);
        trie.insert("RR", RR);
        trie.insert("Y,YYY", YCommaYYY);
        trie.insert("IYYY", IYYY);
        trie.insert("IYY", IYY);
        trie.insert("IY", IY);
        trie.insert("I", I);
        trie.insert("SYYYY", SYYYY);
        trie.insert("YEAR", YEAR);
        trie.insert("SYEAR", SYEAR);

        // Month.
        trie.insert("MM", MM);
        trie.insert("MON", MON);
        trie.insert("MONTH", MONTH);
        trie.insert("RM", RM);

        // Day.
        trie.insert("DDD", DDD);
        trie.insert("DD", DD);
        trie.insert("D", D);
        trie.insert("DAY", DAY);
        trie.insert("DY", DY);
        trie.insert("J", J);

        // Hour.
        trie.insert("HH", HH);
        trie.insert("HH12", HH12);
        trie.insert("HH24", HH24);

        // Minute.
        trie.insert("MI", MI);

        // Second.
        trie.insert("SS", SS);
        trie.insert("SSSSS", SSSSS);
        for key in [
            "FF1", "FF2", "FF3", "FF4", "FF5", "FF6", "FF7", "FF8", "FF9",
        ] {
            trie.insert(key, FFN);
        }

        // Meridian indicator.
        trie.insert("AM", AM);
        trie.insert("PM", PM);
        trie.insert("A.M.", AMWithDots);
        trie.insert("P.M.", PMWithDots);

        // Time zone.
        trie.insert("TZH", TZH);
        trie.insert("TZM", TZM);

        // Century.
        trie.insert("CC", CC);
        trie.insert("SCC", SCC);

        // Quarter.
        trie.insert("Q", Q);

        // Week.
        trie.insert("IW", IW);
        trie.insert("WW", WW);
        trie.insert("W", W);

        // Era indicator.
        trie.insert("AD", AD);
        trie.insert("BC", BC);
        trie.insert("A.D.", ADWithDots);
        trie.insert("B.C.", BCWithDots);

        // Misc.
        trie.insert("SP", SP);
        trie.insert("TH", TH);
        trie.insert("SPTH", SPTH);
        trie.insert("THSP", THSP);
        trie.insert("FM", FM);

        trie
    }
}

/// The process-wide element trie, built once on first use and read-only
/// afterwards.
pub(crate) fn element_trie() -> &'static ElementTrie {
    static TRIE: OnceLock<ElementTrie> = OnceLock::new();
    TRIE.get_or_init(ElementTrie::with_full_vocabulary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_prefers_longer_key() {
        let trie = element_trie();
        assert_eq!(trie.longest_match(b"Y"), Some((ElementType::Y, 1)));
        assert_eq!(trie.longest_match(b"YY"), Some((ElementType::YY, 2)));
        assert_eq!(trie.longest_match(b"YYY"), Some((ElementType::YYY, 3)));
        assert_eq!(trie.longest_match(b"YYYY"), Some((ElementType::YYYY, 4)));
        // Five Ys still match the four-character element.
        assert_eq!(trie.longest_match(b"YYYYY"), Some((ElementType::YYYY, 4)));
        assert_eq!(trie.longest_match(b"RRRR"), Some((ElementType::RRRR, 4)));
        assert_eq!(trie.longest_match(b"Y,YYY"), Some((ElementType::YCommaYYY, 5)));
        assert_eq!(trie.longest_match(b"A.M."), Some((ElementType::AMWithDots, 4)));
        // "A.M" backs off to the shorter "AM"? No: "A" alone is not an
        // element, so the dotted prefix without the trailing dot fails.
        assert_eq!(trie.longest_match(b"A.M"), None);
        assert_eq!(trie.longest_match(b"AM."), Some((ElementType::AM, 2)));
        assert_eq!(trie.longest_match(b"HH245"), Some((ElementType::HH24, 4)));
        assert_eq!(trie.longest_match(b"HH2"), Some((ElementType::HH, 2)));
    }

    #[test]
    fn test_no_match() {
        let trie = element_trie();
        assert_eq!(trie.longest_match(b"G"), None);
        assert_eq!(trie.longest_match(b""), None);
        assert_eq!(trie.longest_match(b"\t"), None);
        // Only upper-case keys are stored.
        assert_eq!(trie.longest_match(b"yyyy"), None);
    }

    #[test]
    fn test_subsecond_keys_share_a_type() {
        let trie = element_trie();
        for input in [&b"FF1"[..], &b"FF5"[..], &b"FF9"[..]] {
            assert_eq!(trie.longest_match(input), Some((ElementType::FFN, 3)));
        }
        // A bare "FF" or an out-of-range digit is not an element.
        assert_eq!(trie.longest_match(b"FF"), None);
        assert_eq!(trie.longest_match(b"FF0"), None);
    }
}
