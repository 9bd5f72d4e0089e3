/// The word list: one [`DictionaryEntry`] per line, grouped under their
/// surface form so that homonyms (two entries sharing a surface but
/// carrying independent flag sets) stay distinct instead of collapsing
/// into a single merged flag bag. Acceptance decisions that care about
/// "does every variant carry flag F" vs "does some variant lack it" need
/// that distinction preserved all the way through.
use fnv::{FnvHashMap, FnvHashSet};
use smallvec::SmallVec;

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::flags::FlagSet;
use crate::hunspell::wordflags::WordFlags;

/// One `key:value` morphological annotation trailing a dictionary line.
/// Only [`MorphField::Phonetic`] feeds checker/suggester behavior (it
/// builds the `ph:` replacement index); the rest are retained as inert
/// structured data for callers that want to inspect them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MorphField {
    Stem(String),
    PartOfSpeech(String),
    Allomorph(String),
    TerminationSuffix(String),
    InflectionalSuffix(String),
    DerivationalSuffix(String),
    DerivationalPrefix(String),
    SurfacePrefix(String),
    Phonetic(String),
    /// A `key:value` token whose key isn't one of the recognized ones.
    Other(String, String),
}

impl MorphField {
    pub fn parse(token: &str) -> Option<MorphField> {
        let (key, value) = token.split_once(':')?;
        let value = value.to_string();
        Some(match key {
            "st" => MorphField::Stem(value),
            "po" => MorphField::PartOfSpeech(value),
            "al" => MorphField::Allomorph(value),
            "ts" => MorphField::TerminationSuffix(value),
            "is" => MorphField::InflectionalSuffix(value),
            "ds" => MorphField::DerivationalSuffix(value),
            "dp" => MorphField::DerivationalPrefix(value),
            "sp" => MorphField::SurfacePrefix(value),
            "ph" => MorphField::Phonetic(value),
            other => MorphField::Other(other.to_string(), value),
        })
    }
}

#[derive(Clone, Debug)]
pub struct DictionaryEntry {
    pub surface: String,
    pub flags: FlagSet,
    pub word_flags: WordFlags,
    pub morph: Vec<MorphField>,
}

impl DictionaryEntry {
    pub fn has_flag(&self, wf: WordFlags) -> bool {
        self.word_flags.contains(wf)
    }
}

pub fn compute_word_flags(flags: &FlagSet, ad: &AffixData) -> WordFlags {
    let mut wf = WordFlags::empty();
    let mut set = |flag: Option<u16>, bit: WordFlags| {
        if flags.contains_opt(flag) {
            wf |= bit;
        }
    };
    set(ad.forbidden, WordFlags::Forbidden);
    set(ad.compound_begin, WordFlags::CompoundBegin);
    set(ad.compound_middle, WordFlags::CompoundMiddle);
    set(ad.compound_end, WordFlags::CompoundEnd);
    set(ad.compound_permit, WordFlags::CompoundPermit);
    set(ad.only_in_compound, WordFlags::OnlyInCompound);
    set(ad.no_suggest, WordFlags::NoSuggest);
    set(ad.circumfix, WordFlags::Circumfix);
    set(ad.need_affix, WordFlags::NeedAffix);
    set(ad.keep_case, WordFlags::KeepCase);
    set(ad.compound_flag, WordFlags::CompoundFlag);
    set(ad.warn, WordFlags::Warn);
    set(ad.force_ucase, WordFlags::ForceUcase);
    set(ad.compound_forbid, WordFlags::CompoundForbid);
    wf
}

/// A single `ph:` phonetic hint, normalized to a `from -> to` pair per the
/// three forms the format allows (plain, arrow, trailing-star).
#[derive(Clone, Debug)]
pub struct PhoneticPair {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, Default)]
pub struct LexicalIndex {
    by_surface: FnvHashMap<String, SmallVec<[DictionaryEntry; 1]>>,
    by_casefold: FnvHashMap<String, SmallVec<[String; 1]>>,
    phonetic: Vec<PhoneticPair>,
    runtime_words: FnvHashSet<String>,
}

impl LexicalIndex {
    pub fn new() -> Self {
        LexicalIndex::default()
    }

    pub fn insert(&mut self, surface: &str, flags: FlagSet, morph: Vec<MorphField>, ad: &AffixData) {
        for m in &morph {
            if let MorphField::Phonetic(hint) = m {
                self.phonetic.push(make_phonetic_pair(surface, hint));
            }
        }
        let word_flags = compute_word_flags(&flags, ad);
        let entry = DictionaryEntry {
            surface: surface.to_string(),
            flags,
            word_flags,
            morph,
        };
        let folded = crate::hunspell::capstyle::case_fold(surface);
        if folded != surface {
            let bucket = self.by_casefold.entry(folded).or_default();
            if !bucket.iter().any(|s| s == surface) {
                bucket.push(surface.to_string());
            }
        }
        self.by_surface.entry(surface.to_string()).or_default().push(entry);
    }

    /// All dictionary homonyms for an exact surface (does not include
    /// runtime-added words, which carry no flags at all).
    pub fn lookup(&self, surface: &str) -> &[DictionaryEntry] {
        self.by_surface.get(surface).map(SmallVec::as_slice).unwrap_or(&[])
    }

    /// Other surfaces that share this one's case-fold, for case-insensitive
    /// fallback lookup; exact-case matches should always be tried first.
    pub fn casefold_variants(&self, surface: &str) -> &[String] {
        let folded = crate::hunspell::capstyle::case_fold(surface);
        self.by_casefold.get(&folded).map(SmallVec::as_slice).unwrap_or(&[])
    }

    pub fn phonetic_pairs(&self) -> &[PhoneticPair] {
        &self.phonetic
    }

    /// True if `surface` is known either from the static dictionary or the
    /// runtime-added set.
    pub fn contains(&self, surface: &str) -> bool {
        self.by_surface.contains_key(surface) || self.runtime_words.contains(surface)
    }

    pub fn is_runtime_word(&self, surface: &str) -> bool {
        self.runtime_words.contains(surface)
    }

    /// `Add(word)`: returns false if already present (dictionary or
    /// runtime), true otherwise.
    pub fn add_runtime_word(&mut self, word: &str) -> bool {
        if self.contains(word) {
            return false;
        }
        self.runtime_words.insert(word.to_string())
    }

    /// `Remove(word)`: only affects the runtime set; returns false if
    /// absent from it (static dictionary entries are immutable).
    pub fn remove_runtime_word(&mut self, word: &str) -> bool {
        self.runtime_words.remove(word)
    }

    /// Every dictionary entry, for suggestion generation's ngram/delins root
    /// scan. Runtime-added words carry no flags and are not roots of
    /// anything affix-derived, so they're excluded here.
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.by_surface.values().flat_map(|homonyms| homonyms.iter())
    }
}

fn make_phonetic_pair(surface: &str, hint: &str) -> PhoneticPair {
    if let Some((from, to)) = hint.split_once("->") {
        return PhoneticPair { from: from.to_string(), to: to.to_string() };
    }
    if let Some(stripped) = hint.strip_suffix('*') {
        let from = drop_last_char(stripped);
        let to = drop_last_char(surface);
        return PhoneticPair { from, to };
    }
    PhoneticPair { from: hint.to_string(), to: surface.to_string() }
}

fn drop_last_char(s: &str) -> String {
    let mut chars = s.chars();
    chars.next_back();
    chars.as_str().to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    fn ad() -> AffixData {
        AffixData::new()
    }

    #[test]
    fn homonyms_kept_separate() {
        let ad = ad();
        let mut idx = LexicalIndex::new();
        idx.insert("lead", FlagSet::from_slice(&[1]), vec![], &ad);
        idx.insert("lead", FlagSet::from_slice(&[2]), vec![], &ad);
        assert_eq!(idx.lookup("lead").len(), 2);
    }

    #[test]
    fn casefold_lookup() {
        let ad = ad();
        let mut idx = LexicalIndex::new();
        idx.insert("Berlin", FlagSet::new(), vec![], &ad);
        assert_eq!(idx.casefold_variants("berlin"), &["Berlin".to_string()]);
    }

    #[test]
    fn add_remove_idempotence() {
        let mut idx = LexicalIndex::new();
        assert!(idx.add_runtime_word("foo"));
        assert!(!idx.add_runtime_word("foo"));
        assert!(idx.remove_runtime_word("foo"));
        assert!(!idx.remove_runtime_word("foo"));
    }

    #[test]
    fn phonetic_plain_form() {
        let pair = make_phonetic_pair("schwenk", "svenk");
        assert_eq!(pair.from, "svenk");
        assert_eq!(pair.to, "schwenk");
    }

    #[test]
    fn phonetic_arrow_form() {
        let pair = make_phonetic_pair("whatever", "wh->w");
        assert_eq!(pair.from, "wh");
        assert_eq!(pair.to, "w");
    }

    #[test]
    fn phonetic_star_form() {
        let pair = make_phonetic_pair("csapszek", "saj*");
        assert_eq!(pair.from, "sa");
        assert_eq!(pair.to, "csapsze");
    }
}
