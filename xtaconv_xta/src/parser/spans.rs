use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    // A block ends at the first closing brace at the start of a line.
    static ref PROCESS_BLOCK: Regex = Regex::new(r"(?s)\bprocess\b[^{;]*\{.*?\n\}").expect("process block regex");
}

/// The byte spans `[start, end)` of the process blocks of a source text,
/// in increasing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProcessSpans(Vec<Range<usize>>);

impl ProcessSpans {
    pub(crate) fn new(text: &str) -> Self {
        Self(PROCESS_BLOCK.find_iter(text).map(|m| m.range()).collect())
    }

    /// Whether the offset falls inside some process block.
    pub(crate) fn contains(&self, offset: usize) -> bool {
        let idx = self.0.partition_point(|span| span.end <= offset);
        self.0.get(idx).is_some_and(|span| span.contains(&offset))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.0.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SOURCE: &str = "clock g;\nprocess A() {\nclock x;\n}\nint v;\nprocess B(int i) {\n state s;\n}\nsystem A, B;";

    #[test]
    fn blocks() {
        let spans = ProcessSpans::new(SOURCE);
        let blocks: Vec<&str> = spans.iter().map(|span| &SOURCE[span.clone()]).collect();
        assert_eq!(
            blocks,
            vec![
                "process A() {\nclock x;\n}",
                "process B(int i) {\n state s;\n}"
            ]
        );
    }

    #[test]
    fn membership() {
        let spans = ProcessSpans::new(SOURCE);
        let inside = SOURCE.find("clock x").expect("local clock");
        let global = SOURCE.find("clock g").expect("global clock");
        let between = SOURCE.find("int v").expect("global var");
        let first = spans.iter().next().expect("first block").clone();
        assert!(spans.contains(inside));
        assert!(!spans.contains(global));
        assert!(!spans.contains(between));
        assert!(spans.contains(first.start));
        assert!(!spans.contains(first.end));
        assert!(!spans.contains(SOURCE.len()));
    }

    #[test]
    fn no_processes() {
        let spans = ProcessSpans::new("clock x;\nsystem;");
        assert!(!spans.contains(0));
        assert_eq!(spans.iter().count(), 0);
    }
}
