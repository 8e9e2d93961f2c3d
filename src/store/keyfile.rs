//! Key-file text codec
//!
//! The placement store is a small INI-shaped text file: `[section]`
//! headers, `KEY=VALUE` entries, `#` comments and blank lines. The format
//! matches what generations of desktop tooling read and write, so stores
//! edited by hand or by other programs keep loading.
//!
//! Parsing never fails as a whole; lines that make no sense are skipped
//! with a warning and everything else is kept.

use std::fmt;

use indexmap::IndexMap;
use tracing::warn;

/// Keys and values of one `[section]`, in file order
pub type Section = IndexMap<String, String>;

/// An in-memory key-file: named sections holding string entries
///
/// Sections keep their file order, which callers rely on for z-ordering.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyFile {
    sections: IndexMap<String, Section>,
}

impl KeyFile {
    /// Create an empty key-file
    pub fn new() -> KeyFile {
        KeyFile::default()
    }

    /// Parse the textual form
    ///
    /// A section appearing twice keeps only its last occurrence. Entries
    /// before the first section header and lines that are neither header,
    /// entry, comment nor blank are dropped with a warning.
    pub fn parse(input: &str) -> KeyFile {
        let mut file = KeyFile::new();
        let mut current: Option<String> = None;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                if file.sections.contains_key(name) {
                    warn!(section = name, "Duplicate section, keeping the later one");
                }
                file.sections.insert(name.to_owned(), Section::new());
                current = Some(name.to_owned());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let Some(section) = current.as_deref() else {
                    warn!(key = key.trim(), "Entry before any section header, ignoring");
                    continue;
                };
                if let Some(entries) = file.sections.get_mut(section) {
                    entries.insert(key.trim().to_owned(), value.trim().to_owned());
                }
                continue;
            }

            warn!(line, "Unparsable line in key-file, ignoring");
        }

        file
    }

    /// Whether the file holds no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// The entries of a section, if present
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Set one entry, creating the section as needed
    pub fn set(&mut self, section: &str, key: &str, value: impl fmt::Display) {
        self.sections
            .entry(section.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_string());
    }

    /// Read an entry as an integer
    ///
    /// Returns `None` both for absent entries and for values that do not
    /// parse; callers decide how loud to be about the difference.
    pub fn get_i32(&self, section: &str, key: &str) -> Option<i32> {
        self.section(section)?.get(key)?.parse().ok()
    }

    /// Whether the entry exists at all, parsable or not
    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.section(section).map_or(false, |s| s.contains_key(key))
    }
}

impl fmt::Display for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sections.is_empty() {
            // An empty file would look like a failed write to outside
            // tooling, so an empty store keeps one comment line.
            return writeln!(f, "# No applets");
        }

        for (index, (name, entries)) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", name)?;
            for (key, value) in entries {
                writeln!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::KeyFile;

    #[test]
    fn parse_sections_and_entries() {
        let file = KeyFile::parse(
            "# applet layout\n\
             \n\
             [/usr/share/applets/clock.desktop]\n\
             X=10\n\
             Y=20\n\
             \n\
             [/usr/share/applets/radio.desktop]\n\
             X=200\n\
             Y=20\n",
        );

        assert_eq!(file.len(), 2);
        assert_eq!(file.get_i32("/usr/share/applets/clock.desktop", "X"), Some(10));
        assert_eq!(file.get_i32("/usr/share/applets/radio.desktop", "Y"), Some(20));
        let names: Vec<_> = file.section_names().collect();
        assert_eq!(
            names,
            vec![
                "/usr/share/applets/clock.desktop",
                "/usr/share/applets/radio.desktop"
            ]
        );
    }

    #[test]
    fn duplicate_section_keeps_the_later_one() {
        let file = KeyFile::parse("[a]\nX=1\n[a]\nX=2\n");
        assert_eq!(file.len(), 1);
        assert_eq!(file.get_i32("a", "X"), Some(2));
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let file = KeyFile::parse("X=5\nnot a header\n[a]\nY=7\nstill garbage\n");
        assert_eq!(file.len(), 1);
        assert_eq!(file.get_i32("a", "X"), None);
        assert_eq!(file.get_i32("a", "Y"), Some(7));
    }

    #[test]
    fn unparsable_value_reads_as_none_but_exists() {
        let file = KeyFile::parse("[a]\nX=wide\n");
        assert_eq!(file.get_i32("a", "X"), None);
        assert!(file.contains("a", "X"));
    }

    #[test]
    fn empty_file_serializes_to_a_comment() {
        assert_eq!(KeyFile::new().to_string(), "# No applets\n");
    }

    #[test]
    fn serialized_form_parses_back() {
        let mut file = KeyFile::new();
        file.set("applet.desktop", "X", 30);
        file.set("applet.desktop", "Y", 40);
        file.set("other.desktop", "X", -1);

        let text = file.to_string();
        assert!(text.starts_with("[applet.desktop]\n"));
        assert_eq!(KeyFile::parse(&text), file);
    }

    #[test]
    fn values_are_trimmed() {
        let file = KeyFile::parse("[a]\nX = 12 \n");
        assert_eq!(file.get_i32("a", "X"), Some(12));
    }
}
