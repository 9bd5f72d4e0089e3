/// Parser for hunspell-format `.dic` files: one entry per line,
/// `surface[/flags][\tmorph-fields...]`, with an optional leading
/// decimal-count line and `#`-comment lines tolerated throughout.
use anyhow::Result;

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::dict::{LexicalIndex, MorphField};
use crate::hunspell::flags::FlagSet;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A morph token is a short alphabetic key followed by `:`, e.g. `st:`,
/// `ph:`. Anything else in a trailing position is surface text, which lets
/// multi-word phrase entries (`surface_tokens` joined with spaces) work.
fn looks_like_morph_token(tok: &str) -> bool {
    match tok.split_once(':') {
        Some((key, _)) => !key.is_empty() && key.len() <= 2 && key.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

pub fn parse_dictionary(text: &str, ad: &AffixData, index: &mut LexicalIndex) -> Result<()> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut first_content_line = true;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if first_content_line {
            first_content_line = false;
            if line.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let mut surface_tokens: Vec<&str> = Vec::new();
        let mut morph_tokens: Vec<&str> = Vec::new();
        for tok in tokens {
            if morph_tokens.is_empty() && !looks_like_morph_token(tok) {
                surface_tokens.push(tok);
            } else {
                morph_tokens.push(tok);
            }
        }
        if surface_tokens.is_empty() {
            continue;
        }

        let last = surface_tokens.pop().expect("just checked non-empty");
        let (last_surface, flag_str) = match last.split_once('/') {
            Some((s, f)) => (s, Some(f)),
            None => (last, None),
        };
        surface_tokens.push(last_surface);
        let surface = surface_tokens.join(" ");

        // A malformed flag token invalidates this entry, not the rest of
        // the dictionary: skip the line and keep going.
        let flags = match flag_str.map(|f| ad.parse_flags(f)) {
            Some(Ok(fs)) => fs,
            Some(Err(_)) => continue,
            None => FlagSet::new(),
        };
        let morph = morph_tokens.iter().filter_map(|t| MorphField::parse(t)).collect();
        index.insert(&surface, flags, morph, ad);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_plain_entries() {
        let ad = AffixData::new();
        let mut index = LexicalIndex::new();
        parse_dictionary("2\nhund\nhund/A\n", &ad, &mut index).unwrap();
        assert_eq!(index.lookup("hund").len(), 2);
    }

    #[test]
    fn parses_morph_fields() {
        let ad = AffixData::new();
        let mut index = LexicalIndex::new();
        parse_dictionary("1\nschwenk ph:svenk\n", &ad, &mut index).unwrap();
        assert_eq!(index.phonetic_pairs().len(), 1);
        assert_eq!(index.phonetic_pairs()[0].from, "svenk");
    }

    #[test]
    fn tolerates_missing_count_line() {
        let ad = AffixData::new();
        let mut index = LexicalIndex::new();
        parse_dictionary("foo\nbar\n", &ad, &mut index).unwrap();
        assert!(index.contains("foo"));
        assert!(index.contains("bar"));
    }

    #[test]
    fn skips_comment_lines() {
        let ad = AffixData::new();
        let mut index = LexicalIndex::new();
        parse_dictionary("# comment\nfoo\n", &ad, &mut index).unwrap();
        assert!(index.contains("foo"));
    }
}
