//! Key-value state dumps for diagnostics

use std::fmt;

/// A debug entry (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    pub key: String,
    pub value: String,
}

/// A titled group of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSection {
    pub title: String,
    pub entries: Vec<DebugEntry>,
}

impl DebugSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.entries.push(DebugEntry {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

impl fmt::Display for DebugSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.title)?;
        let width = self.entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
        for entry in &self.entries {
            writeln!(f, "  {:width$}  {}", entry.key, entry.value, width = width)?;
        }
        Ok(())
    }
}

/// Types that can describe themselves as debug sections
pub trait DebugState {
    fn debug_sections(&self) -> Vec<DebugSection>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_display_aligns_keys() {
        let section = DebugSection::new("Selection")
            .entry("id", "new")
            .entry("counter", 3);
        assert_eq!(section.get("counter"), Some("3"));
        assert_eq!(section.to_string(), "[Selection]\n  id       new\n  counter  3\n");
    }
}
