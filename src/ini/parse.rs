//! Line-oriented INI parsing.

use std::io::BufRead;

use tracing::warn;

use super::{IniError, Sections};

/// A single classified line of INI text.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
}

// Only space and tab count as blanks; other whitespace is content.
const BLANKS: [char; 2] = [' ', '\t'];

fn trim_blanks(s: &str) -> &str {
    s.trim_matches(BLANKS)
}

fn trim_blanks_end(s: &str) -> &str {
    s.trim_end_matches(BLANKS)
}

fn trim_blanks_start(s: &str) -> &str {
    s.trim_start_matches(BLANKS)
}

fn classify(raw: &str) -> Result<Line<'_>, &'static str> {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = trim_blanks(line);

    if line.is_empty() {
        return Ok(Line::Blank);
    }

    if let Some(header) = line.strip_prefix('[') {
        let end = header.find(']').ok_or("unterminated section header")?;
        return Ok(Line::Section(trim_blanks(&header[..end])));
    }

    let (key, value) = line.split_once('=').ok_or("expected 'key = value'")?;
    Ok(Line::Entry {
        key: trim_blanks_end(key),
        value: trim_blanks_start(value),
    })
}

/// Parses INI text from `reader` and merges it into `sections`.
///
/// Keys before the first header land in the default (empty-named) section.
/// With `ignore_errors`, malformed lines are skipped instead of aborting.
pub(crate) fn parse_into<R: BufRead>(
    sections: &mut Sections,
    reader: R,
    ignore_errors: bool,
) -> Result<(), IniError> {
    let mut current = String::new();

    for (index, raw) in reader.lines().enumerate() {
        let raw = raw?;
        let line_no = index + 1;

        match classify(&raw) {
            Ok(Line::Blank) => {}
            Ok(Line::Section(name)) => {
                current = name.to_string();
                sections.entry(current.clone()).or_default();
            }
            Ok(Line::Entry { key, value }) => {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.to_string(), value.to_string());
            }
            Err(reason) if ignore_errors => {
                warn!(line = line_no, reason, "skipping malformed ini line");
            }
            Err(reason) => {
                return Err(IniError::format(
                    line_no,
                    format!("wrong ini file format: {reason}"),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, ignore_errors: bool) -> Result<Sections, IniError> {
        let mut sections = Sections::new();
        parse_into(&mut sections, text.as_bytes(), ignore_errors)?;
        Ok(sections)
    }

    #[test]
    fn test_classify_trims_only_spaces_and_tabs() {
        assert_eq!(
            classify(" \t key \t=\t value  "),
            Ok(Line::Entry {
                key: "key",
                value: "value"
            })
        );
        assert_eq!(
            classify("k=\u{a0}v"),
            Ok(Line::Entry {
                key: "k",
                value: "\u{a0}v"
            })
        );
    }

    #[test]
    fn test_classify_strips_comment_and_surrounding_space() {
        assert_eq!(
            classify("k = v # comment"),
            Ok(Line::Entry { key: "k", value: "v" })
        );
        assert_eq!(classify("   # only a comment"), Ok(Line::Blank));
        assert_eq!(classify("[sect] # trailing"), Ok(Line::Section("sect")));
    }

    #[test]
    fn test_classify_splits_at_first_equals() {
        assert_eq!(
            classify("url = a=b"),
            Ok(Line::Entry {
                key: "url",
                value: "a=b"
            })
        );
        assert_eq!(
            classify("empty ="),
            Ok(Line::Entry {
                key: "empty",
                value: ""
            })
        );
    }

    #[test]
    fn test_classify_section_header() {
        assert_eq!(classify("[ Server ]"), Ok(Line::Section("Server")));
        assert_eq!(classify("[a]ignored"), Ok(Line::Section("a")));
        assert_eq!(classify("[]"), Ok(Line::Section("")));
        assert!(classify("[broken").is_err());
    }

    #[test]
    fn test_classify_strips_carriage_return() {
        assert_eq!(
            classify("k = v\r"),
            Ok(Line::Entry { key: "k", value: "v" })
        );
        assert_eq!(classify("[name]\r"), Ok(Line::Section("name")));
    }

    #[test]
    fn test_parse_sections() {
        let sections = parse("[A]\nx=1\n[B]\ny=2\n", false).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections["A"]["x"], "1");
        assert_eq!(sections["B"]["y"], "2");
    }

    #[test]
    fn test_parse_default_section_before_header() {
        let sections = parse("top = 1\n[s]\ninner = 2\n", false).unwrap();
        assert_eq!(sections[""]["top"], "1");
        assert_eq!(sections["s"]["inner"], "2");
        assert_eq!(sections.get_index(0).unwrap().0, "");
    }

    #[test]
    fn test_parse_empty_section_is_created() {
        let sections = parse("[empty]\n", false).unwrap();
        assert!(sections["empty"].is_empty());
    }

    #[test]
    fn test_parse_later_value_overwrites() {
        let sections = parse("[s]\nk = 1\nk = 2\n", false).unwrap();
        assert_eq!(sections["s"]["k"], "2");
        assert_eq!(sections["s"].len(), 1);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse("a = 1\n\nbad line without equals\n", false).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, IniError::Format { line: 3, .. }));
    }

    #[test]
    fn test_parse_ignore_errors_skips_line() {
        let sections = parse("bad line without equals\n", true).unwrap();
        assert!(sections.values().all(|keys| keys.is_empty()));

        let sections = parse("[s]\nbad\nk = v\n[oops\nz = 1\n", true).unwrap();
        assert_eq!(sections["s"]["k"], "v");
        assert_eq!(sections["s"]["z"], "1");
    }

    #[test]
    fn test_parse_crlf_input() {
        let sections = parse("[win]\r\nkey = value\r\n", false).unwrap();
        assert_eq!(sections["win"]["key"], "value");
    }
}
