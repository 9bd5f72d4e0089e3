/// Parser for hunspell-format `.aff` files.
///
/// The teacher's original parser built one big `nom` alternative over
/// whole-file directives plus an ad-hoc "the count line parses to Empty,
/// the data line parses to the real variant" trick for ICONV/OCONV. That
/// trick doesn't generalize to PFX/SFX: a rule group's header carries a
/// cross-product flag that every one of its N data lines needs, so the N
/// data lines aren't independent, stateless alternatives the way a single
/// ICONV pair is. This version keeps `nom`-flavored per-token parsing (the
/// `append[/flags]` split, the `strip == "0"` convention, the condition
/// matcher already in `condition.rs`) and drives the file-level, N-lines-
/// at-a-time structure with an explicit line cursor instead.
use anyhow::{anyhow, bail, Result};

use crate::hunspell::affixdata::{AffixData, CompoundPattern};
use crate::hunspell::affixrule::{AffixKind, AffixRule};
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::flags::FlagMode;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

struct Lines<'a> {
    rest: std::str::Lines<'a>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines { rest: text.lines() }
    }

    /// Next non-blank, non-comment-only line, trimmed.
    fn next_content(&mut self) -> Option<&'a str> {
        for raw in self.rest.by_ref() {
            let s = strip_comment(raw).trim();
            if !s.is_empty() {
                return Some(s);
            }
        }
        None
    }
}

/// `0` is the Hunspell convention for "empty string" in a strip/append slot.
fn zero_as_empty(tok: &str) -> &str {
    if tok == "0" {
        ""
    } else {
        tok
    }
}

/// Split an `append[/flags]` token into its parts.
fn split_append_flags(tok: &str) -> (&str, Option<&str>) {
    match tok.split_once('/') {
        Some((text, flags)) => (zero_as_empty(text), Some(flags)),
        None => (zero_as_empty(tok), None),
    }
}

/// Split an `endchars[/flag]` or `beginchars[/flag]` CHECKCOMPOUNDPATTERN
/// token into text and an optional single flag.
fn split_pattern_flag(ad: &AffixData, tok: &str) -> Result<(String, Option<u16>)> {
    match tok.split_once('/') {
        Some((text, flag)) => Ok((text.to_string(), Some(ad.parse_single_flag(flag)?))),
        None => Ok((tok.to_string(), None)),
    }
}

fn parse_flag_mode(tok: &str) -> Result<FlagMode> {
    match tok {
        "long" => Ok(FlagMode::DoubleCharFlags),
        "num" => Ok(FlagMode::NumericFlags),
        "UTF-8" => Ok(FlagMode::Utf8Flags),
        other => bail!("unrecognized FLAG mode {other:?}"),
    }
}

fn parse_affix_entry(ad: &AffixData, kind: AffixKind, flag: u16, cross_product: bool, line: &str) -> Result<AffixRule> {
    let mut fields = line.split_whitespace();
    let _keyword = fields.next();
    let _flag_tok = fields.next();
    let strip_tok = fields.next().ok_or_else(|| anyhow!("PFX/SFX entry missing strip field"))?;
    let append_tok = fields.next().ok_or_else(|| anyhow!("PFX/SFX entry missing append field"))?;
    let condition_tok = fields.next().unwrap_or(".");

    let (append, flag_tok) = split_append_flags(append_tok);
    let appended_flags = match flag_tok {
        Some(f) => ad.parse_flags(f)?,
        None => Default::default(),
    };
    Ok(AffixRule {
        flag,
        kind,
        strip: zero_as_empty(strip_tok).to_string(),
        append: append.to_string(),
        condition: AffixCondition::new(condition_tok),
        cross_product,
        appended_flags,
    })
}

pub fn parse_affix_data(text: &str) -> Result<AffixData> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut d = AffixData::new();
    let mut lines = Lines::new(text);
    let mut break_seqs_touched = false;

    while let Some(line) = lines.next_content() {
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else { continue };
        // A malformed or argument-less directive is dropped, not fatal: real
        // dictionaries are heterogeneous enough that the parser has to stay
        // permissive (one bad line shouldn't lose the rest of the file).
        let result: Result<()> = (|| -> Result<()> {
        match keyword {
            "SET" => {
                if let Some(enc) = fields.next() {
                    d.encoding = enc.to_string();
                }
            }
            "FLAG" => {
                if let Some(mode) = fields.next() {
                    d.flag_mode = parse_flag_mode(mode)?;
                }
            }
            "KEY" => d.keyboard_string = fields.next().map(String::from),
            "TRY" => d.try_string = fields.next().map(String::from),
            "WORDCHARS" => d.extra_word_chars = fields.next().map(String::from),
            "IGNORE" => d.ignore_chars = fields.next().map(String::from),
            "COMPOUNDMIN" => {
                if let Some(n) = fields.next() {
                    d.compound_min = n.parse().unwrap_or(3);
                }
            }
            "COMPOUNDWORDMAX" => {
                d.compound_wordmax = fields.next().and_then(|n| n.parse().ok());
            }
            "COMPOUNDSYLLABLE" => {
                d.compound_syllable_max = fields.next().and_then(|n| n.parse().ok());
                d.compound_syllable_vowels = fields.next().unwrap_or("").to_string();
            }
            "MAXCPDSUGS" => {
                if let Some(n) = fields.next().and_then(|n| n.parse().ok()) {
                    d.max_cpd_suggs = n;
                }
            }
            "MAXDIFF" => d.max_diff = fields.next().and_then(|n| n.parse().ok()),
            "ONLYMAXDIFF" => d.only_max_diff = true,
            "NOSPLITSUGS" => d.no_split_suggs = true,
            "FULLSTRIP" => d.full_strip = true,
            "CHECKCOMPOUNDDUP" => d.check_compound_dup = true,
            "CHECKCOMPOUNDCASE" => d.check_compound_case = true,
            "CHECKCOMPOUNDTRIPLE" => d.check_compound_triple = true,
            "SIMPLIFIEDTRIPLE" => d.simplified_triple = true,
            "CHECKCOMPOUNDREP" => d.check_compound_rep = true,
            "CHECKSHARPS" => d.check_sharps = true,
            "COMPOUNDMORESUFFIXES" => (),
            "COMPOUNDFLAG" => d.compound_flag = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "COMPOUNDBEGIN" => d.compound_begin = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "COMPOUNDMIDDLE" => d.compound_middle = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "COMPOUNDEND" | "COMPOUNDLAST" => {
                d.compound_end = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?)
            }
            "COMPOUNDROOT" => d.compound_root = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "COMPOUNDPERMITFLAG" => d.compound_permit = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "COMPOUNDFORBIDFLAG" => d.compound_forbid = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "ONLYINCOMPOUND" => d.only_in_compound = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "NOSUGGEST" => d.no_suggest = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "FORBIDDENWORD" => d.forbidden = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "NEEDAFFIX" => d.need_affix = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "FORCEUCASE" => d.force_ucase = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "KEEPCASE" => d.keep_case = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "CIRCUMFIX" => d.circumfix = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "WARN" => d.warn = Some(d.parse_single_flag(require_field(&mut fields, keyword)?)?),
            "REP" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let (Some(from), Some(to)) = (f.next(), f.next()) {
                        d.rep.push(from, to);
                    }
                }
            }
            "MAP" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let Some(group) = f.next() {
                        d.map_groups.push(group.to_string());
                    }
                }
            }
            "BREAK" => {
                let n: usize = parse_count(fields.next())?;
                if !break_seqs_touched {
                    d.break_sequences.clear();
                    break_seqs_touched = true;
                }
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let Some(seq) = f.next() {
                        d.break_sequences.push(seq.to_string());
                    }
                }
            }
            "ICONV" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let (Some(from), Some(to)) = (f.next(), f.next()) {
                        d.iconv.push(from, to);
                    }
                }
            }
            "OCONV" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let (Some(from), Some(to)) = (f.next(), f.next()) {
                        d.oconv.push(from, to);
                    }
                }
            }
            "COMPOUNDRULE" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    if let Some(pattern) = f.next() {
                        if let Ok(rule) = CompoundRule::from_str(pattern, &d) {
                            d.compound_rules.push(rule);
                        }
                    }
                }
            }
            "CHECKCOMPOUNDPATTERN" => {
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    let mut f = entry.split_whitespace();
                    let _ = f.next();
                    let (Some(end_tok), Some(begin_tok)) = (f.next(), f.next()) else { continue };
                    let Ok((end_chars, end_flag)) = split_pattern_flag(&d, end_tok) else { continue };
                    let Ok((begin_chars, begin_flag)) = split_pattern_flag(&d, begin_tok) else { continue };
                    d.compound_patterns.push(CompoundPattern {
                        end_chars,
                        end_flag,
                        begin_chars,
                        begin_flag,
                        replacement: f.next().map(String::from),
                    });
                }
            }
            "PFX" | "SFX" => {
                let kind = if keyword == "PFX" { AffixKind::Prefix } else { AffixKind::Suffix };
                let flag_tok = fields.next().ok_or_else(|| anyhow!("{keyword} header missing flag"))?;
                let flag = d.parse_single_flag(flag_tok)?;
                let cross_tok = fields.next().ok_or_else(|| anyhow!("{keyword} header missing Y/N"))?;
                let cross_product = cross_tok == "Y";
                let n: usize = parse_count(fields.next())?;
                for _ in 0..n {
                    let Some(entry) = lines.next_content() else { break };
                    match parse_affix_entry(&d, kind, flag, cross_product, entry) {
                        Ok(rule) => match kind {
                            AffixKind::Prefix => d.affix_tables.add_prefix(rule),
                            AffixKind::Suffix => d.affix_tables.add_suffix(rule),
                        },
                        Err(_) => continue,
                    }
                }
            }
            _ => (),
        }
        Ok(())
        })();
        let _ = result;
    }
    Ok(d)
}

fn require_field<'a>(fields: &mut impl Iterator<Item = &'a str>, keyword: &str) -> Result<&'a str> {
    fields.next().ok_or_else(|| anyhow!("{keyword} missing its argument"))
}

fn parse_count(tok: Option<&str>) -> Result<usize> {
    tok.ok_or_else(|| anyhow!("expected a count"))?
        .parse()
        .map_err(|_| anyhow!("expected a numeric count"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_simple_suffix() {
        let text = "SFX A Y 1\nSFX A 0 s .\n";
        let d = parse_affix_data(text).unwrap();
        assert_eq!(d.affix_tables.suffixes.len(), 1);
        assert_eq!(d.affix_tables.suffixes[0].append, "s");
        assert!(d.affix_tables.suffixes[0].cross_product);
    }

    #[test]
    fn parses_compound_directives() {
        let text = "COMPOUNDFLAG A\nCOMPOUNDMIN 3\n";
        let d = parse_affix_data(text).unwrap();
        assert_eq!(d.compound_flag, Some(b'A' as u16));
        assert_eq!(d.compound_min, 3);
    }

    #[test]
    fn parses_compound_rule_table() {
        let text = "COMPOUNDRULE 1\nCOMPOUNDRULE ABC\n";
        let d = parse_affix_data(text).unwrap();
        assert_eq!(d.compound_rules.len(), 1);
    }

    #[test]
    fn tolerates_unknown_directive() {
        let text = "SOMETHINGWEIRD 1 2 3\nCOMPOUNDMIN 4\n";
        let d = parse_affix_data(text).unwrap();
        assert_eq!(d.compound_min, 4);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let text = "# a comment\n\nCOMPOUNDMIN 5\n";
        let d = parse_affix_data(text).unwrap();
        assert_eq!(d.compound_min, 5);
    }
}
