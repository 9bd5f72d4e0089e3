/// Top-level Hunspell-format speller: ties the affix parser, dictionary
/// store, affix derivation, compound splitter and suggestion generator
/// together into the four public operations (`spec.md` §6): Spell,
/// Suggest, Add, Remove.
use std::path::{Path, PathBuf};

use encoding::{DecoderTrap, Encoding};

mod affixdata;
mod affixrule;
mod breakseq;
mod capstyle;
mod compound;
mod compoundrule;
mod condition;
mod derive;
mod dict;
mod flags;
mod parse_aff;
mod parse_dic;
mod replacements;
mod suggcollector;
mod suggestions;
mod wordflags;

use crate::error::SpellerError;
use crate::Speller;
use capstyle::CapStyle;
use dict::{DictionaryEntry, LexicalIndex};
use wordflags::WordFlags;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A speller that loads Hunspell-format `.dic`/`.aff` dictionaries.
///
/// Construction is the only fallible operation (`spec.md` §7): a missing
/// file or a declared encoding the bytes don't actually decode as. Once
/// built, [`AffixData`](affixdata::AffixData) and [`LexicalIndex`] never
/// change; only the runtime word set inside the index does, through
/// [`Speller::add_word`]/[`Speller::remove_word`].
#[derive(Debug)]
pub struct HunspellDict {
    affix_data: affixdata::AffixData,
    index: LexicalIndex,
}

impl HunspellDict {
    /// Returns a speller built from a Hunspell-format dictionary and affix
    /// file pair. Reads both files fully and closes them before returning;
    /// nothing is kept open.
    pub fn new(dictionary: &Path, affixes: &Path) -> Result<Self, SpellerError> {
        let aff_bytes = read_file(affixes)?;
        let declared_encoding = scan_declared_encoding(&aff_bytes);
        let aff_text = decode_bytes(&aff_bytes, declared_encoding.as_deref(), affixes)?;
        let aff_text = aff_text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&aff_text);
        let affix_data = parse_aff::parse_affix_data(aff_text).unwrap_or_default();

        let dict_bytes = read_file(dictionary)?;
        let dict_text = decode_bytes(&dict_bytes, Some(&affix_data.encoding), dictionary)?;
        let dict_text = dict_text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&dict_text);
        let mut index = LexicalIndex::new();
        let _ = parse_dic::parse_dictionary(dict_text, &affix_data, &mut index);

        Ok(HunspellDict { affix_data, index })
    }

    /// Look for Hunspell-format dictionaries for the given `locale` in the
    /// provided directory search path. Returns a tuple of paths to the
    /// dictionary file and the affix file for the first directory that has
    /// both.
    pub fn find_dictionary(search_path: Vec<&str>, locale: &str) -> Option<(PathBuf, PathBuf)> {
        for dir in search_path {
            let dictpath = Path::new(dir).join(format!("{locale}.dic"));
            let affpath = Path::new(dir).join(format!("{locale}.aff"));
            if dictpath.is_file() && affpath.is_file() {
                return Some((dictpath, affpath));
            }
        }
        None
    }

    pub(crate) fn affix_data(&self) -> &affixdata::AffixData {
        &self.affix_data
    }

    pub(crate) fn index(&self) -> &LexicalIndex {
        &self.index
    }

    /// Enumerate every accepted compound decomposition of `word`, for
    /// tests and other internal callers that want to inspect the engine's
    /// reasoning instead of reaching into private fields (`spec.md` §9).
    #[doc(hidden)]
    pub fn debug_compound_partitions(&self, word: &str) -> Vec<Vec<String>> {
        compound::CompoundChecker::new(&self.affix_data, &self.index).decompose_all(word)
    }

    /// Enumerate every accepted affix derivation's root surface, for the
    /// same diagnostic purpose.
    #[doc(hidden)]
    pub fn debug_affix_derivations(&self, word: &str) -> Vec<String> {
        derive::find_affix_base(&self.affix_data, &self.index, word, false)
            .into_iter()
            .map(|d| d.root.surface.clone())
            .collect()
    }

    /// §4.7 orchestrator entry point, classifying case once and trying the
    /// case-adjusted candidates a real Hunspell install tries (§3/§9): an
    /// ALLCAPS token also tries its titlecase and lowercase forms, an
    /// initial-cap token also tries its lowercase form, and anything else
    /// is only ever tried as written.
    fn spellcheck_with_caps(&self, word: &str, caps: CapStyle) -> bool {
        match caps {
            CapStyle::AllCap => {
                if self.check_core(word) {
                    return true;
                }
                let title = capstyle::to_title_case(word);
                if title != word && self.check_core(&title) {
                    return true;
                }
                let lower = word.to_lowercase();
                lower != word && self.check_core(&lower)
            }
            CapStyle::InitCap => {
                if self.check_core(word) {
                    return true;
                }
                let lower = word.to_lowercase();
                lower != word && self.check_core(&lower)
            }
            CapStyle::HuhInitCap | CapStyle::NoCap => self.check_core(word),
        }
    }

    /// The candidate admitted by [`crate::hunspell::suggcollector::SuggCollector`]
    /// for an ordinary (single-token) suggestion candidate: the full
    /// orchestrator, since a generated candidate can need affixing,
    /// compounding, or any of the other acceptance paths just as much as a
    /// user-typed token would. NOSUGGEST words are spellcheckable (so
    /// `spellcheck` never looks at the flag) but must never be offered as a
    /// correction (`spec.md` §8 property 3), so that exclusion lives here
    /// rather than in `check_core`.
    pub(crate) fn check_suggestion(&self, sugg: &str, caps: CapStyle) -> bool {
        self.spellcheck_with_caps(sugg, caps) && !self.nosuggest_blocks(sugg)
    }

    /// True if every variant that would admit `word` (a direct dictionary
    /// entry or an affix-derived root) carries NOSUGGEST -- i.e. the only
    /// reason `word` spellchecks is a word that shouldn't be suggested.
    /// Compound and break admission aren't consulted here: NOSUGGEST marks
    /// individual dictionary entries as bad standalone suggestions, not
    /// a property that should propagate to every compound containing them.
    fn nosuggest_blocks(&self, word: &str) -> bool {
        let direct: Vec<&DictionaryEntry> = self
            .index
            .lookup(word)
            .iter()
            .filter(|e| self.entry_admissible_standalone(e, word))
            .collect();
        if !direct.is_empty() {
            return direct.iter().all(|e| e.has_flag(WordFlags::NoSuggest));
        }
        let derivations = derive::find_affix_base(&self.affix_data, &self.index, word, false);
        if !derivations.is_empty() {
            return derivations.iter().all(|d| d.root.has_flag(WordFlags::NoSuggest));
        }
        false
    }

    /// The candidate admitted by a `suggest_priority` call: a split
    /// suggestion (`"word1 word2"`) is only worth overriding everything
    /// else for if the whole phrase is itself a single dictionary entry,
    /// with no break or compound reasoning involved.
    pub(crate) fn check_suggestion_priority(&self, sugg: &str, _caps: CapStyle) -> bool {
        self.direct_entry_admissible(sugg)
    }

    /// §4.7 steps 1-8, minus the outermost case-variant loop (already
    /// handled by [`Self::spellcheck_with_caps`]).
    fn check_core(&self, word: &str) -> bool {
        self.check_core_inner(word, true, true, true)
    }

    fn check_core_inner(&self, word: &str, try_ignore: bool, try_iconv: bool, try_dots: bool) -> bool {
        if word.is_empty() {
            return false;
        }
        if self.direct_entry_admissible(word) {
            return true;
        }
        if !derive::find_affix_base(&self.affix_data, &self.index, word, false).is_empty() {
            return true;
        }
        if breakseq::try_break(word, &self.affix_data.break_sequences, |part| self.check_core(part)) {
            return true;
        }
        if compound::check_compound(&self.affix_data, &self.index, word) {
            return true;
        }
        if self.wordchars_admissible(word) {
            return true;
        }
        if try_ignore {
            if let Some(ignore) = &self.affix_data.ignore_chars {
                if !ignore.is_empty() {
                    let stripped: String = word.chars().filter(|c| !ignore.contains(*c)).collect();
                    if stripped != word && self.check_core_inner(&stripped, false, try_iconv, try_dots) {
                        return true;
                    }
                }
            }
        }
        if try_iconv && !self.affix_data.iconv.is_empty() {
            let converted = self.affix_data.iconv.conv(word);
            if converted != word && self.check_core_inner(&converted, try_ignore, false, try_dots) {
                return true;
            }
        }
        if try_dots && word.ends_with('.') {
            let trimmed = word.trim_end_matches('.');
            if !trimmed.is_empty() && self.check_core_inner(trimmed, try_ignore, try_iconv, false) {
                return true;
            }
        }
        false
    }

    /// §4.7 step 1: a direct lexical lookup (dictionary homonyms, or a
    /// runtime-added word). The homonym invariant (`spec.md` §3/§4.3)
    /// means any one admissible variant is enough.
    fn direct_entry_admissible(&self, word: &str) -> bool {
        if self.index.is_runtime_word(word) {
            return true;
        }
        if self.index.lookup(word).iter().any(|e| self.entry_admissible_standalone(e, word)) {
            return true;
        }
        // Case-insensitive fallback (§4.3): consult the store's case-fold
        // index for a surface that only differs from `word` in casing a
        // naive upper/lower pass wouldn't normalize (German sharp s,
        // Turkish dotted/dotless I). `entry_admissible_standalone` still
        // enforces KEEPCASE's exact-case requirement on whatever it finds.
        self.index
            .casefold_variants(word)
            .iter()
            .flat_map(|variant| self.index.lookup(variant))
            .any(|e| self.entry_admissible_standalone(e, word))
    }

    fn entry_admissible_standalone(&self, entry: &DictionaryEntry, word: &str) -> bool {
        if entry.has_flag(WordFlags::Forbidden) {
            return false;
        }
        if entry.has_flag(WordFlags::OnlyInCompound) {
            return false;
        }
        if entry.has_flag(WordFlags::NeedAffix) {
            return false;
        }
        if entry.has_flag(WordFlags::KeepCase) && word != entry.surface {
            if self.affix_data.check_sharps
                && entry.surface.contains('ß')
                && capstyle::case_fold(word) == capstyle::case_fold(&entry.surface)
            {
                return true;
            }
            return false;
        }
        true
    }

    /// §4.7 step 5: WORDCHARS admission, with the punctuation-boundary
    /// sanity rules. A WORDCHARS member that isn't itself alphanumeric is
    /// treated as the "punctuation-class" character the rule is guarding
    /// against (e.g. an apostrophe or a dash added to the word-chars set).
    fn wordchars_admissible(&self, word: &str) -> bool {
        let Some(wordchars) = &self.affix_data.extra_word_chars else { return false };
        if wordchars.is_empty() {
            return false;
        }
        let chars: Vec<char> = word.chars().collect();
        if chars.is_empty() {
            return false;
        }
        let is_word_char = |c: char| c.is_alphanumeric() || wordchars.contains(c);
        if !chars.iter().all(|c| is_word_char(*c)) {
            return false;
        }
        let is_punct = |c: char| wordchars.contains(c) && !c.is_alphanumeric();
        if is_punct(chars[0]) || is_punct(*chars.last().unwrap()) {
            return false;
        }
        chars.windows(2).all(|w| !(is_punct(w[0]) && is_punct(w[1])))
    }
}

impl Speller for HunspellDict {
    fn spellcheck(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let caps = CapStyle::from_str(word);
        self.spellcheck_with_caps(word, caps)
    }

    fn suggestions(&self, word: &str, max: usize) -> Vec<String> {
        if word.is_empty() || max == 0 {
            return Vec::new();
        }
        suggestions::suggest(self, word, max)
    }

    fn add_word(&mut self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.index.add_runtime_word(word)
    }

    fn remove_word(&mut self, word: &str) -> bool {
        self.index.remove_runtime_word(word)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, SpellerError> {
    std::fs::read(path).map_err(|_| SpellerError::FileMissing { path: path.to_path_buf() })
}

/// Look for an ASCII `SET <label>` line before committing to any decoder:
/// the keyword itself is always plain ASCII regardless of the file's real
/// encoding, so a lossy UTF-8 pre-scan is enough to find it (`spec.md` §6,
/// supplemented in `SPEC_FULL.md` §4).
fn scan_declared_encoding(bytes: &[u8]) -> Option<String> {
    let prefix = String::from_utf8_lossy(bytes);
    for line in prefix.lines().take(200) {
        let line = line.trim_start_matches(BYTE_ORDER_MARK).trim();
        if line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("SET") {
            let label = rest.trim();
            if !label.is_empty() {
                return Some(label.to_string());
            }
        }
    }
    None
}

/// Decode `bytes` under `label` if it names a recognized encoding,
/// otherwise fall back to (lossy) UTF-8. A *recognized* label that fails to
/// decode is the one genuinely fatal case (`SpellerError::EncodingMismatch`):
/// the affix file promised an encoding its own bytes don't honor.
fn decode_bytes(bytes: &[u8], label: Option<&str>, path: &Path) -> Result<String, SpellerError> {
    match label.and_then(encoding::label::encoding_from_whatwg_label) {
        Some(enc) => enc.decode(bytes, DecoderTrap::Strict).map_err(|_| SpellerError::EncodingMismatch {
            path: path.to_path_buf(),
            encoding: label.unwrap().to_string(),
        }),
        None => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(dic: &str, aff: &str) -> HunspellDict {
        let affix_data = parse_aff::parse_affix_data(aff).unwrap();
        let mut index = LexicalIndex::new();
        parse_dic::parse_dictionary(dic, &affix_data, &mut index).unwrap();
        HunspellDict { affix_data, index }
    }

    #[test]
    fn simple_suffix_derivation_end_to_end() {
        let dict = build("2\nhund\nhund/A\n", "SFX A Y 1\nSFX A 0 s .\n");
        assert!(dict.spellcheck("hund"));
        assert!(dict.spellcheck("hunds"));
        assert!(!dict.spellcheck("hundx"));
    }

    #[test]
    fn forbidden_word_rejected() {
        let dict = build("1\nbadword/F\n", "FORBIDDENWORD F\n");
        assert!(!dict.spellcheck("badword"));
    }

    #[test]
    fn only_in_compound_rejected_standalone_but_allowed_in_compound() {
        let dict = build(
            "2\nfoo/AB\nbar/A\n",
            "COMPOUNDFLAG A\nCOMPOUNDMIN 3\nONLYINCOMPOUND B\n",
        );
        assert!(!dict.spellcheck("foo"));
        assert!(dict.spellcheck("foobar"));
    }

    #[test]
    fn needaffix_rejected_bare() {
        let dict = build("1\nhund/NA\n", "NEEDAFFIX N\nSFX A Y 1\nSFX A 0 s .\n");
        assert!(!dict.spellcheck("hund"));
        assert!(dict.spellcheck("hunds"));
    }

    #[test]
    fn keepcase_requires_exact_case() {
        let dict = build("1\nMcDonald/K\n", "KEEPCASE K\n");
        assert!(dict.spellcheck("McDonald"));
        assert!(!dict.spellcheck("mcdonald"));
        assert!(!dict.spellcheck("MCDONALD"));
    }

    #[test]
    fn allcap_falls_back_to_lowercase() {
        let dict = build("1\nhello\n", "");
        assert!(dict.spellcheck("HELLO"));
        assert!(dict.spellcheck("Hello"));
    }

    #[test]
    fn trailing_dot_stripped() {
        let dict = build("1\netc\n", "");
        assert!(dict.spellcheck("etc."));
        assert!(!dict.spellcheck("etc.."));
    }

    #[test]
    fn break_hyphen_compound() {
        let dict = build("3\nfoo\nbar\nbaz\n", "");
        assert!(dict.spellcheck("foo-bar-baz"));
        assert!(!dict.spellcheck("foo-xyz"));
        assert!(!dict.spellcheck("-foo"));
    }

    #[test]
    fn add_remove_runtime_word() {
        let mut dict = build("1\nhund\n", "");
        assert!(!dict.spellcheck("neologism"));
        assert!(dict.add_word("neologism"));
        assert!(dict.spellcheck("neologism"));
        assert!(!dict.add_word("neologism"));
        assert!(dict.remove_word("neologism"));
        assert!(!dict.spellcheck("neologism"));
        assert!(!dict.remove_word("neologism"));
    }

    #[test]
    fn suggestions_never_contain_input_and_are_all_valid() {
        let dict = build("2\nhund\nhund/A\n", "SFX A Y 1\nSFX A 0 s .\n");
        let suggs = dict.suggestions("hundx", 10);
        assert!(!suggs.contains(&"hundx".to_string()));
        assert!(suggs.contains(&"hund".to_string()) || suggs.contains(&"hunds".to_string()));
        for s in &suggs {
            assert!(dict.spellcheck(s));
        }
    }

    #[test]
    fn empty_token_is_never_a_word() {
        let dict = build("1\nhund\n", "");
        assert!(!dict.spellcheck(""));
        assert!(dict.suggestions("", 10).is_empty());
    }
}
