/// `COMPOUNDRULE` patterns are a small regular language over per-part
/// tokens: a flag that a part's dictionary entry must carry, or (for the
/// digits `1`..`7`) a synthetic class tested against the part's literal
/// text rather than any flag. `*` means "zero or more", `?` means "zero or
/// one", and plain concatenation means "exactly one".

use anyhow::{anyhow, bail, Result};

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::flags::AffixFlag;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundToken {
    Flag(AffixFlag),
    /// Digit tokens 1..7, see [`digit_class_matches`].
    DigitClass(u8),
}

#[derive(Clone, Debug)]
pub struct CompoundRule {
    v: Vec<CompoundElement>,
}

#[derive(Clone, Debug)]
pub enum CompoundElement {
    Multi(CompoundToken),
    Optional(CompoundToken),
    Once(CompoundToken),
}
use CompoundElement::*;

fn token_of(c: char, ad: &AffixData) -> Result<CompoundToken> {
    if ('1'..='7').contains(&c) {
        return Ok(CompoundToken::DigitClass(c as u8 - b'0'));
    }
    let mut buf = [0u8; 4];
    let flag = ad.parse_single_flag(c.encode_utf8(&mut buf))?;
    Ok(CompoundToken::Flag(flag))
}

impl CompoundRule {
    pub fn from_str(s: &str, ad: &AffixData) -> Result<Self> {
        let mut rule = CompoundRule { v: Vec::default() };
        let mut paren_start = None;
        for (i, c) in s.char_indices() {
            if let Some(ppos) = paren_start {
                if c == ')' {
                    let inner = &s[ppos..i];
                    let mut chars = inner.chars();
                    let first = chars
                        .next()
                        .ok_or_else(|| anyhow!("COMPOUNDRULE: empty group"))?;
                    if chars.next().is_some() {
                        bail!("COMPOUNDRULE: expected 1 flag in group");
                    }
                    rule.v.push(Once(token_of(first, ad)?));
                    paren_start = None;
                }
            } else if c == '(' {
                paren_start = Some(i + 1);
            } else if c == '*' {
                let node = match rule.v.last() {
                    None | Some(Multi(_)) | Some(Optional(_)) => {
                        bail!("COMPOUNDRULE: * must follow flag");
                    }
                    Some(Once(f)) => Multi(*f),
                };
                *rule.v.last_mut().unwrap() = node;
            } else if c == '?' {
                let node = match rule.v.last() {
                    None | Some(Multi(_)) | Some(Optional(_)) => {
                        bail!("COMPOUNDRULE: ? must follow flag");
                    }
                    Some(Once(f)) => Optional(*f),
                };
                *rule.v.last_mut().unwrap() = node;
            } else {
                rule.v.push(Once(token_of(c, ad)?));
            }
        }
        if paren_start.is_some() {
            bail!("COMPOUNDRULE: unterminated group");
        }
        Ok(rule)
    }

    fn _matches(
        &self,
        words: &[&str],
        pos: usize,
        check: &impl Fn(&str, CompoundToken) -> bool,
        partial_ok: bool,
    ) -> bool {
        if let Some(word) = words.first() {
            match self.v.get(pos) {
                None => false,
                Some(Once(f)) => {
                    if check(word, *f) {
                        self._matches(&words[1..], pos + 1, check, partial_ok)
                    } else {
                        false
                    }
                }
                Some(Optional(f)) => {
                    if check(word, *f) {
                        self._matches(&words[1..], pos + 1, check, partial_ok)
                            || self._matches(words, pos + 1, check, partial_ok)
                    } else {
                        self._matches(words, pos + 1, check, partial_ok)
                    }
                }
                Some(Multi(f)) => {
                    if check(word, *f) {
                        self._matches(&words[1..], pos, check, partial_ok)
                            || self._matches(words, pos + 1, check, partial_ok)
                    } else {
                        self._matches(words, pos + 1, check, partial_ok)
                    }
                }
            }
        } else if partial_ok {
            true
        } else {
            for elem in self.v.iter().skip(pos) {
                match elem {
                    Once(_) => return false,
                    Optional(_) => (),
                    Multi(_) => (),
                }
            }
            true
        }
    }

    /// `check` answers "does this dictionary part carry this flag?" for
    /// `Flag` tokens. `DigitClass` tokens bypass `check` entirely and test
    /// the part's literal text via [`digit_class_matches`].
    pub fn matches(&self, words: &[&str], check: impl Fn(&str, AffixFlag) -> bool) -> bool {
        self._matches(words, 0, &wrap_check(&check), false)
    }

    pub fn partial_match(&self, words: &[&str], check: impl Fn(&str, AffixFlag) -> bool) -> bool {
        self._matches(words, 0, &wrap_check(&check), true)
    }
}

fn wrap_check<'a>(
    check: &'a impl Fn(&str, AffixFlag) -> bool,
) -> impl Fn(&str, CompoundToken) -> bool + 'a {
    move |word, token| match token {
        CompoundToken::Flag(f) => check(word, f),
        CompoundToken::DigitClass(n) => digit_class_matches(n, word),
    }
}

/// The fixed predicate table for COMPOUNDRULE digit tokens. These are
/// locale-adjacent heuristics, not tuned to any one language:
///
/// 1: digits only ("123")
/// 2: a spelled-out number word (heuristic: all-lowercase alphabetic)
/// 3: a "scaled" number word such as "million" (heuristic: alphabetic,
///    longer than 3 chars)
/// 4: an ordinal suffix word (st/nd/rd/th, or a short alphabetic tail);
///    the numeric-agreement check against a preceding numeric part lives
///    in the flag-mode compound splitter, not here
/// 5: a numeric suffix word: starts with a digit, ends with a letter
/// 6: mixed digit/letter with separators (at least one digit and one of
///    `.`/`,`)
/// 7: catch-all alphanumeric class
pub fn digit_class_matches(class: u8, part: &str) -> bool {
    if part.is_empty() {
        return false;
    }
    match class {
        1 => part.chars().all(|c| c.is_ascii_digit()),
        2 => part.chars().all(|c| c.is_alphabetic() && c.is_lowercase()),
        3 => part.len() > 3 && part.chars().all(char::is_alphabetic),
        4 => {
            let lower = part.to_lowercase();
            matches!(lower.as_str(), "st" | "nd" | "rd" | "th")
                || (part.chars().all(char::is_alphabetic) && part.len() <= 2)
        }
        5 => {
            part.chars().next().is_some_and(|c| c.is_ascii_digit())
                && part.chars().last().is_some_and(char::is_alphabetic)
        }
        6 => {
            part.chars().any(|c| c.is_ascii_digit())
                && part.chars().any(|c| c == '.' || c == ',')
        }
        7 => part.chars().all(|c| c.is_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ad() -> AffixData {
        AffixData::new()
    }

    #[test]
    fn simple_flags() {
        let ad = ad();
        let rule = CompoundRule::from_str("AB", &ad).unwrap();
        let check = |w: &str, f: AffixFlag| {
            (f == b'A' as AffixFlag && w == "a") || (f == b'B' as AffixFlag && w == "b")
        };
        assert!(rule.matches(&["a", "b"], check));
        assert!(!rule.matches(&["b", "a"], check));
    }

    #[test]
    fn star_and_optional() {
        let ad = ad();
        let rule = CompoundRule::from_str("A*B?", &ad).unwrap();
        let check = |w: &str, f: AffixFlag| {
            (f == b'A' as AffixFlag && w == "a") || (f == b'B' as AffixFlag && w == "b")
        };
        assert!(rule.matches(&["a"], check));
        assert!(rule.matches(&["a", "a", "a"], check));
        assert!(rule.matches(&["a", "b"], check));
        assert!(!rule.matches(&["b"], check));
    }

    #[test]
    fn digit_class() {
        let ad = ad();
        let rule = CompoundRule::from_str("1B", &ad).unwrap();
        let check = |w: &str, f: AffixFlag| f == b'B' as AffixFlag && w == "b";
        assert!(rule.matches(&["123", "b"], check));
        assert!(!rule.matches(&["abc", "b"], check));
    }
}
