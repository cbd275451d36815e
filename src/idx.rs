//! Best-effort parser for VobSub `*.idx` files.
//!
//! Only the keys needed to rebuild a timing script are understood: `timestamp`,
//! `size`, `palette` and `id`. Lines that don't parse are skipped, a broken line
//! never makes the whole file fail.

use crate::time::Timestamp;
use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static TIMESTAMP_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^timestamp: (\d+):(\d+):(\d+):(\d+), filepos: ([0-9a-fA-F]+)$").unwrap()
});

/// A single subtitle event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Paragraph {
    pub start: Timestamp,
    /// Byte offset of the subtitle packet in the `*.sub` file.
    pub file_offset: u64,
}

/// 24-bit RGB palette entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Converts a palette token. Tokens that are neither `RRGGBB` nor `AARRGGBB`
    /// become black.
    pub fn from_hex(token: &str) -> Self {
        let hex = token.strip_prefix('#').unwrap_or(token).trim();
        let rgb = match hex.chars().count() {
            6 => hex,
            8 => hex
                .char_indices()
                .nth(2)
                .map_or("", |(start, _)| &hex[start..]),
            _ => return Self(0),
        };
        if !rgb.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self(0);
        }
        Self(u32::from_str_radix(rgb, 16).unwrap_or(0))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06x}", self.0 & 0xFF_FFFF)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Language {
    pub id: String,
    pub index: i64,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{200E}(0x{})", self.id, i128::from(self.index) + 32)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Index {
    pub paragraphs: Vec<Paragraph>,
    pub palette: Vec<Color>,
    pub languages: Vec<Language>,
    /// The raw `size:` value, normally `WIDTHxHEIGHT`.
    pub size: Option<String>,
}

impl Index {
    pub fn parse<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = Self::default();
        let mut language_index: i64 = 0;

        for line in lines {
            if let Some(paragraph) = parse_timestamp_line(line) {
                index.paragraphs.push(paragraph);
            } else if line.starts_with("size:") && line.chars().count() > 7 {
                index.size = Some(line["size:".len()..].trim().to_string());
            } else if line.starts_with("palette:") && line.chars().count() > 10 {
                index.palette.extend(
                    line["palette:".len()..]
                        .split([',', ' '])
                        .filter(|token| !token.is_empty())
                        .map(Color::from_hex),
                );
            } else if line.starts_with("id:") && line.chars().count() > 4 {
                let parts: Vec<&str> = line
                    .split([':', ',', ' '])
                    .filter(|part| !part.is_empty())
                    .collect();
                if parts.len() < 2 {
                    trace!("skipping language line without an id: {:?}", line);
                    continue;
                }
                if parts.len() > 3 && parts[2] == "index" {
                    if let Ok(value) = parts[3].parse() {
                        language_index = value;
                    }
                }
                index.languages.push(Language {
                    id: parts[1].to_string(),
                    index: language_index,
                });
                language_index = language_index.saturating_add(1);
            } else if line.starts_with("timestamp:") {
                trace!("skipping malformed timestamp line: {:?}", line);
            }
        }
        index
    }
}

fn parse_timestamp_line(line: &str) -> Option<Paragraph> {
    let caps = TIMESTAMP_LINE.captures(line)?;
    let part = |i: usize| caps[i].parse::<u64>().ok();

    Some(Paragraph {
        start: Timestamp::from_parts(part(1)?, part(2)?, part(3)?, part(4)?)?,
        file_offset: u64::from_str_radix(&caps[5], 16).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
# VobSub index file, v7 (do not modify this line!)
#
size: 720x480
org: 0, 0
scale: 100%, 100%
alpha: 100%
smooth: OFF
fadein/out: 50, 50
align: OFF at LEFT TOP
time offset: 0
forced subs: OFF
palette: 000000, f0f0f0, cccccc, 999999, 3333fa, 1111bb, fa3333, bb1111, 33fa33, 11bb11, fafa33, bbbb11, fa33fa, bb11bb, 33fafa, 11bbbb
custom colors: OFF, tridx: 0000, colors: 000000, 000000, 000000, 000000

# English
id: en, index: 0
timestamp: 00:00:01:401, filepos: 000000000
timestamp: 00:00:05:005, filepos: 000000800
timestamp: 00:01:02:345, filepos: 000001a00
";

    #[test]
    fn parse_example() {
        let index = Index::parse(EXAMPLE.lines());

        assert_eq!(index.size.as_deref(), Some("720x480"));
        assert_eq!(index.palette.len(), 16);
        assert_eq!(index.palette[1], Color(0xf0f0f0));
        assert_eq!(index.palette[15], Color(0x11bbbb));
        assert_eq!(
            index.languages,
            vec![Language {
                id: "en".to_string(),
                index: 0
            }]
        );
        assert_eq!(
            index.paragraphs,
            vec![
                Paragraph {
                    start: Timestamp::from_ms(1401),
                    file_offset: 0
                },
                Paragraph {
                    start: Timestamp::from_ms(5005),
                    file_offset: 0x800
                },
                Paragraph {
                    start: Timestamp::from_ms(62345),
                    file_offset: 0x1a00
                },
            ]
        );
    }

    #[test]
    fn timestamp_line() {
        let index = Index::parse(["timestamp: 00:01:02:345, filepos: 00000010"]);
        assert_eq!(
            index.paragraphs,
            vec![Paragraph {
                start: Timestamp::from_ms(62345),
                file_offset: 16
            }]
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let index = Index::parse([
            "timestamp: 00:00:01:000, filepos: 000000000",
            "timestamp: 00:00:xx:000, filepos: 000000010",
            "timestamp: 00:00:02:000, filepos: ",
            "timestamp: 00:00:03:000, filepos: zz",
            "timestamp: 99999999999999999999:00:00:000, filepos: 0",
            "timestamp: 00:00:04:000, filepos: 000000020",
            "size:",
            "palette:",
            "id:",
            "garbage",
        ]);
        assert_eq!(
            index
                .paragraphs
                .iter()
                .map(|p| (p.start.as_millis(), p.file_offset))
                .collect::<Vec<_>>(),
            vec![(1000, 0), (4000, 0x20)]
        );
        assert_eq!(index.size, None);
        assert!(index.palette.is_empty());
        assert!(index.languages.is_empty());
    }

    #[test]
    fn crlf_lines() {
        let text = "size: 720x576\r\ntimestamp: 00:00:01:000, filepos: 0000000ff\r\n";
        let index = Index::parse(text.lines());
        assert_eq!(index.size.as_deref(), Some("720x576"));
        assert_eq!(index.paragraphs.len(), 1);
        assert_eq!(index.paragraphs[0].file_offset, 0xff);
    }

    #[test]
    fn palette_tokens() {
        assert_eq!(Color::from_hex("FF0080"), Color(0xFF0080));
        assert_eq!(Color::from_hex("80FF0080"), Color(0xFF0080));
        assert_eq!(Color::from_hex("#ff0080"), Color(0xFF0080));
        assert_eq!(Color::from_hex("ZZ"), Color(0));
        assert_eq!(Color::from_hex("ZZZZZZ"), Color(0));
        assert_eq!(Color::from_hex("12345"), Color(0));
    }

    #[test]
    fn palette_display_is_six_digits() {
        assert_eq!(Color(0x80).to_string(), "000080");
        assert_eq!(Color(0xFF0080).to_string(), "ff0080");
    }

    #[test]
    fn palette_separators() {
        let index = Index::parse(["palette: #000000,ffffff  80ff0080, zz"]);
        assert_eq!(
            index.palette,
            vec![Color(0), Color(0xffffff), Color(0xff0080), Color(0)]
        );
    }

    #[test]
    fn language_index() {
        let index = Index::parse(["id: en, index: 5", "id: fr", "id: de, index: x"]);
        assert_eq!(
            index
                .languages
                .iter()
                .map(|lang| (lang.id.as_str(), lang.index))
                .collect::<Vec<_>>(),
            vec![("en", 5), ("fr", 6), ("de", 7)]
        );
        assert_eq!(index.languages[0].to_string(), "en \u{200E}(0x37)");
    }

    #[test]
    fn language_index_at_limit() {
        let index = Index::parse([
            "id: en, index: 9223372036854775807",
            "id: fr",
            "id: de, index: 99999999999999999999",
            "timestamp: 00:00:01:000, filepos: 0",
        ]);
        assert_eq!(
            index
                .languages
                .iter()
                .map(|lang| lang.index)
                .collect::<Vec<_>>(),
            vec![i64::MAX, i64::MAX, i64::MAX]
        );
        assert_eq!(
            index.languages[0].to_string(),
            "en \u{200E}(0x9223372036854775839)"
        );
        assert_eq!(index.paragraphs.len(), 1);
    }

    #[test]
    fn palette_tokens_count_characters() {
        assert_eq!(Color::from_hex("\u{e9}12345"), Color(0));
        assert_eq!(Color::from_hex("\u{e9}1234567"), Color(0x234567));
        assert_eq!(Color::from_hex("\u{e9}\u{e9}ff0080"), Color(0xff0080));
    }

    #[test]
    fn line_lengths_count_characters() {
        let index = Index::parse(["size:\u{e9}\u{e9}", "id:\u{e9}"]);
        assert_eq!(index.size, None);
        assert!(index.languages.is_empty());
    }
}
