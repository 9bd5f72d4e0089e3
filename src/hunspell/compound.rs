/// CheckCompound: bounded recursive enumeration of partitions of a surface
/// into dictionary (or affix-derived) parts, subject to position flags,
/// count/syllable caps, the boundary rules (dup/case/triple/pattern/rep),
/// and the two parallel acceptance mechanisms (COMPOUNDRULE patterns and
/// COMPOUNDFLAG/BEGIN/MIDDLE/END position flags) which may both be active
/// at once.
use fnv::FnvHashMap;

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::compoundrule::digit_class_matches;
use crate::hunspell::derive::find_affix_base;
use crate::hunspell::dict::LexicalIndex;
use crate::hunspell::flags::AffixFlag;
use crate::hunspell::wordflags::WordFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PosClass {
    Begin,
    Middle,
    End,
}

pub struct CompoundChecker<'a> {
    ad: &'a AffixData,
    index: &'a LexicalIndex,
}

impl<'a> CompoundChecker<'a> {
    pub fn new(ad: &'a AffixData, index: &'a LexicalIndex) -> Self {
        CompoundChecker { ad, index }
    }

    pub fn check(&self, word: &str) -> bool {
        self.decompose(word).is_some()
    }

    pub fn decompose(&self, word: &str) -> Option<Vec<String>> {
        let mut found = None;
        self.visit_partitions(word, |parts| {
            found = Some(parts.to_vec());
            true
        });
        found
    }

    /// Every accepted decomposition, for the internal diagnostic surface.
    pub fn decompose_all(&self, word: &str) -> Vec<Vec<String>> {
        let mut all = Vec::new();
        self.visit_partitions(word, |parts| {
            all.push(parts.to_vec());
            false
        });
        all
    }

    fn visit_partitions(&self, word: &str, mut visit: impl FnMut(&[String]) -> bool) -> bool {
        if !self.ad.compounding_enabled() {
            return false;
        }
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return false;
        }
        // COMPOUNDMIN (§4.5) bounds flag-mode splits only; a COMPOUNDRULE
        // pattern just needs >=2 dictionary parts, whatever their length
        // (e.g. `COMPOUNDRULE ABC` over single-letter entries `a/A b/B c/BC`
        // must be able to split `abc` into three one-char parts).
        let min = if self.ad.has_compound_flags() {
            (self.ad.compound_min as usize).max(1)
        } else {
            1
        };
        let max_parts = effective_word_max(self.ad, &chars, min);
        let depth_cap = (chars.len() / min).max(2) + 1;
        let mut parts = Vec::new();
        let mut plausible_cache: FnvHashMap<String, bool> = FnvHashMap::default();
        self.recurse(word, &chars, 0, &mut parts, min, max_parts, depth_cap, &mut plausible_cache, &mut visit)
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        &self,
        whole_word: &str,
        chars: &[char],
        start: usize,
        parts: &mut Vec<String>,
        min: usize,
        max_parts: usize,
        depth_cap: usize,
        cache: &mut FnvHashMap<String, bool>,
        visit: &mut impl FnMut(&[String]) -> bool,
    ) -> bool {
        if start == chars.len() {
            if parts.len() >= 2 && self.validate_complete(whole_word, parts) {
                return visit(parts);
            }
            return false;
        }
        if parts.len() + 1 > depth_cap {
            return false;
        }
        let remaining = chars.len() - start;
        if remaining < min {
            return false;
        }
        if parts.len() >= max_parts {
            return false;
        }
        for end in (start + min)..=chars.len() {
            if end != chars.len() && chars.len() - end < min {
                continue;
            }
            let part: String = chars[start..end].iter().collect();
            let plausible = *cache.entry(part.clone()).or_insert_with(|| self.plausible_part(&part));
            if !plausible {
                continue;
            }
            if let Some(prev) = parts.last() {
                if !self.boundary_ok(prev, &part) {
                    continue;
                }
            }
            parts.push(part);
            if self.recurse(whole_word, chars, end, parts, min, max_parts, depth_cap, cache, visit) {
                return true;
            }
            parts.pop();
        }
        false
    }

    /// Cheap pre-filter used only to prune the recursive search: could this
    /// substring conceivably serve as a compound part under either active
    /// mode? The real, position-aware admissibility check runs once per
    /// complete partition in [`Self::validate_complete`].
    fn plausible_part(&self, part: &str) -> bool {
        if self
            .index
            .lookup(part)
            .iter()
            .any(|e| !e.has_flag(WordFlags::Forbidden) && !e.has_flag(WordFlags::CompoundForbid))
        {
            return true;
        }
        if !find_affix_base(self.ad, self.index, part, true).is_empty() {
            return true;
        }
        if self.ad.has_compound_rules() {
            for class in 1u8..=7 {
                if digit_class_matches(class, part) {
                    return true;
                }
            }
        }
        false
    }

    fn validate_complete(&self, whole_word: &str, parts: &[String]) -> bool {
        let rule_ok = if self.ad.has_compound_rules() {
            let word_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
            let matched = self
                .ad
                .compound_rules
                .iter()
                .any(|r| r.matches(&word_refs, |w, f| self.check_flag(w, f)));
            matched && self.ordinal_ok(parts)
        } else {
            true
        };
        let flag_ok = if self.ad.has_compound_flags() {
            self.flag_mode_admissible(parts)
        } else {
            true
        };
        // Both mechanisms are consulted if active; either one accepting is
        // sufficient (a pattern-mode language can still admit a flag-mode
        // compound root that happens to carry no rule-relevant flags).
        let accepted = if self.ad.has_compound_rules() && self.ad.has_compound_flags() {
            rule_ok || flag_ok
        } else {
            rule_ok && flag_ok
        };
        if !accepted {
            return false;
        }
        if !self.syllable_ok(parts) {
            return false;
        }
        if !self.check_compound_rep(parts) {
            return false;
        }
        self.final_form_ok(whole_word, parts)
    }

    fn flag_mode_admissible(&self, parts: &[String]) -> bool {
        let last = parts.len() - 1;
        parts.iter().enumerate().all(|(i, part)| {
            let pos = if i == 0 {
                PosClass::Begin
            } else if i == last {
                PosClass::End
            } else {
                PosClass::Middle
            };
            self.part_admissible_at(part, pos)
        })
    }

    fn part_admissible_at(&self, part: &str, pos: PosClass) -> bool {
        for entry in self.index.lookup(part) {
            if entry.has_flag(WordFlags::Forbidden) || entry.has_flag(WordFlags::CompoundForbid) {
                continue;
            }
            if self.entry_admissible_at_flags(entry.word_flags, pos) {
                return true;
            }
        }
        for d in find_affix_base(self.ad, self.index, part, true) {
            if d.root.has_flag(WordFlags::Forbidden) || d.root.has_flag(WordFlags::CompoundForbid) {
                continue;
            }
            if !self.entry_admissible_at_flags(d.root.word_flags, pos) {
                continue;
            }
            let permit = self.ad.compound_permit.is_some_and(|p| {
                d.appended_flags.contains(p) || d.root.flags.contains(p)
            });
            if pos != PosClass::End && d.kind.has_outer_suffix() && !permit {
                continue;
            }
            if pos != PosClass::Begin && d.kind.has_outer_prefix() && !permit {
                continue;
            }
            return true;
        }
        false
    }

    fn entry_admissible_at_flags(&self, wf: WordFlags, pos: PosClass) -> bool {
        if wf.contains(WordFlags::CompoundFlag) {
            return true;
        }
        match pos {
            PosClass::Begin => wf.contains(WordFlags::CompoundBegin),
            PosClass::Middle => wf.contains(WordFlags::CompoundMiddle),
            PosClass::End => wf.contains(WordFlags::CompoundEnd),
        }
    }

    fn check_flag(&self, word: &str, flag: AffixFlag) -> bool {
        if self.index.lookup(word).iter().any(|e| e.flags.contains(flag)) {
            return true;
        }
        find_affix_base(self.ad, self.index, word, true)
            .iter()
            .any(|d| d.root.flags.contains(flag) || d.appended_flags.contains(flag))
    }

    fn boundary_ok(&self, prev: &str, current: &str) -> bool {
        if self.ad.check_compound_dup
            && crate::hunspell::capstyle::case_fold(prev) == crate::hunspell::capstyle::case_fold(current)
        {
            return false;
        }
        if self.ad.check_compound_case {
            if let (Some(a), Some(b)) = (prev.chars().last(), current.chars().first()) {
                if a.is_alphabetic() && b.is_alphabetic() && (b.is_uppercase() || a.is_uppercase()) {
                    return false;
                }
            }
        }
        if self.ad.check_compound_triple && !self.ad.simplified_triple && triple_straddles(prev, current) {
            return false;
        }
        for pat in &self.ad.compound_patterns {
            if prev.ends_with(pat.end_chars.as_str()) && current.starts_with(pat.begin_chars.as_str()) {
                let end_ok = pat.end_flag.map_or(true, |f| self.check_flag(prev, f));
                let begin_ok = pat.begin_flag.map_or(true, |f| self.check_flag(current, f));
                if end_ok && begin_ok {
                    return false;
                }
            }
        }
        true
    }

    /// CHECKCOMPOUNDREP: reject if any single REP substitution over the
    /// whole compound, or over any contiguous run spanning a boundary,
    /// produces a surface that exists (unforbidden) in the dictionary.
    fn check_compound_rep(&self, parts: &[String]) -> bool {
        if !self.ad.check_compound_rep || self.ad.rep.is_empty() {
            return true;
        }
        for start in 0..parts.len() {
            for end in (start + 2)..=parts.len() {
                let run = parts[start..end].concat();
                let mut collides = false;
                self.ad.rep.suggest(&run, |candidate| {
                    let bad = self
                        .index
                        .lookup(&candidate)
                        .iter()
                        .any(|e| !e.has_flag(WordFlags::Forbidden));
                    if bad {
                        collides = true;
                        false
                    } else {
                        true
                    }
                });
                if collides {
                    return false;
                }
            }
        }
        true
    }

    fn ordinal_ok(&self, parts: &[String]) -> bool {
        let Some(last) = parts.last() else { return true };
        let suf = last.to_lowercase();
        if !matches!(suf.as_str(), "st" | "nd" | "rd" | "th") {
            return true;
        }
        let digits: String = parts[..parts.len() - 1]
            .iter()
            .flat_map(|p| p.chars())
            .filter(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return true;
        }
        let Ok(n) = digits.parse::<u64>() else { return true };
        let last_two = n % 100;
        let expected = if (11..=13).contains(&last_two) {
            "th"
        } else {
            match n % 10 {
                1 => "st",
                2 => "nd",
                3 => "rd",
                _ => "th",
            }
        };
        expected == suf
    }

    fn syllable_ok(&self, parts: &[String]) -> bool {
        let Some(max) = self.ad.compound_syllable_max else { return true };
        let vowels = &self.ad.compound_syllable_vowels;
        let total: u32 = parts
            .iter()
            .map(|p| p.chars().filter(|c| vowels.contains(*c)).count() as u32)
            .sum();
        total <= max
    }

    fn final_form_ok(&self, whole_word: &str, parts: &[String]) -> bool {
        let last = parts.len() - 1;
        let forces = self.part_force_ucase(&parts[0]) || self.part_force_ucase(&parts[last]);
        if !forces {
            return true;
        }
        whole_word.chars().next().is_some_and(char::is_uppercase)
    }

    fn part_force_ucase(&self, part: &str) -> bool {
        if self.index.lookup(part).iter().any(|e| e.has_flag(WordFlags::ForceUcase)) {
            return true;
        }
        if let Some(fu) = self.ad.force_ucase {
            return find_affix_base(self.ad, self.index, part, true)
                .iter()
                .any(|d| d.appended_flags.contains(fu) || d.root.flags.contains(fu));
        }
        false
    }
}

/// Whether a syllable cap widens the effective part-count cap: when
/// COMPOUNDSYLLABLE is configured the vowel-count check does the real
/// limiting work, so the recursion uses a generous structural bound instead
/// of COMPOUNDWORDMAX.
fn effective_word_max(ad: &AffixData, chars: &[char], min: usize) -> usize {
    if ad.compound_syllable_max.is_some() {
        (chars.len() / min).max(2)
    } else {
        ad.compound_wordmax
            .map(|n| n as usize)
            .unwrap_or_else(|| chars.len() / min)
            .max(2)
    }
}

fn triple_straddles(prev: &str, current: &str) -> bool {
    let tail: Vec<char> = {
        let mut v: Vec<char> = prev.chars().rev().take(2).collect();
        v.reverse();
        v
    };
    let head: Vec<char> = current.chars().take(2).collect();
    let mut window = tail;
    window.extend(head);
    window.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

pub fn check_compound(ad: &AffixData, index: &LexicalIndex, word: &str) -> bool {
    CompoundChecker::new(ad, index).check(word)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::flags::FlagSet;

    fn configured_flag_mode() -> AffixData {
        let mut ad = AffixData::new();
        ad.compound_flag = Some(b'A' as u16);
        ad.compound_min = 3;
        ad
    }

    #[test]
    fn simple_flag_compound() {
        let ad = configured_flag_mode();
        let mut idx = LexicalIndex::new();
        idx.insert("foo", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        idx.insert("bar", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        idx.insert("test", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        assert!(check_compound(&ad, &idx, "foobar"));
        assert!(check_compound(&ad, &idx, "footest"));
        assert!(check_compound(&ad, &idx, "foobartest"));
        assert!(!check_compound(&ad, &idx, "foobaz"));
    }

    #[test]
    fn check_compound_dup_rejects_adjacent_repeat() {
        let mut ad = configured_flag_mode();
        ad.check_compound_dup = true;
        let mut idx = LexicalIndex::new();
        idx.insert("foo", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        idx.insert("bar", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        assert!(!check_compound(&ad, &idx, "foofoo"));
        assert!(check_compound(&ad, &idx, "foobar"));
        assert!(check_compound(&ad, &idx, "foobarfoo"));
    }
}
