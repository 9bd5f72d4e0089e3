/// The parsed, immutable outcome of an affix file: flag codec, try-order,
/// word/ignore chars, conversion and replacement tables, compound
/// directives, the handful of attribute flags, and the PFX/SFX rule tables.
/// Everything the checker and suggester need to know about "how this
/// language's affixes and compounds work" lives here. `FlagMode` used to
/// live here alone as a placeholder; it now moves to [`crate::hunspell::flags`]
/// next to the rest of the flag machinery it belongs with.
use anyhow::Result;

use crate::hunspell::affixrule::AffixTables;
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::dict::DictionaryEntry;
pub use crate::hunspell::flags::FlagMode;
use crate::hunspell::flags::{parse_flags, parse_single_flag, AffixFlag, FlagSet};
use crate::hunspell::replacements::Replacements;

/// A `CHECKCOMPOUNDPATTERN` entry: forbid a compound junction where the
/// previous part ends with `end_chars` and the next part begins with
/// `begin_chars`, optionally gated on either part carrying a specific flag.
#[derive(Clone, Debug)]
pub struct CompoundPattern {
    pub end_chars: String,
    pub end_flag: Option<AffixFlag>,
    pub begin_chars: String,
    pub begin_flag: Option<AffixFlag>,
    pub replacement: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AffixData {
    pub flag_mode: FlagMode,
    pub encoding: String,

    pub try_string: Option<String>,
    pub keyboard_string: Option<String>,
    pub extra_word_chars: Option<String>,
    pub ignore_chars: Option<String>,
    pub map_groups: Vec<String>,
    pub break_sequences: Vec<String>,

    pub rep: Replacements,
    pub iconv: Replacements,
    pub oconv: Replacements,

    pub compound_min: u8,
    pub compound_wordmax: Option<u8>,
    pub compound_syllable_max: Option<u32>,
    pub compound_syllable_vowels: String,
    pub check_compound_dup: bool,
    pub check_compound_case: bool,
    pub check_compound_triple: bool,
    pub simplified_triple: bool,
    pub check_compound_rep: bool,
    pub compound_rules: Vec<CompoundRule>,
    pub compound_patterns: Vec<CompoundPattern>,

    pub compound_flag: Option<AffixFlag>,
    pub compound_begin: Option<AffixFlag>,
    pub compound_middle: Option<AffixFlag>,
    pub compound_end: Option<AffixFlag>,
    pub compound_root: Option<AffixFlag>,
    pub compound_permit: Option<AffixFlag>,
    pub compound_forbid: Option<AffixFlag>,
    pub only_in_compound: Option<AffixFlag>,

    pub no_suggest: Option<AffixFlag>,
    pub forbidden: Option<AffixFlag>,
    pub need_affix: Option<AffixFlag>,
    pub force_ucase: Option<AffixFlag>,
    pub keep_case: Option<AffixFlag>,
    pub circumfix: Option<AffixFlag>,
    pub warn: Option<AffixFlag>,
    pub check_sharps: bool,

    pub max_cpd_suggs: usize,
    pub max_diff: Option<u8>,
    pub only_max_diff: bool,
    pub no_split_suggs: bool,
    pub full_strip: bool,

    pub affix_tables: AffixTables,
}

impl Default for AffixData {
    fn default() -> Self {
        AffixData {
            flag_mode: FlagMode::CharFlags,
            encoding: "UTF-8".to_string(),
            try_string: None,
            keyboard_string: None,
            extra_word_chars: None,
            ignore_chars: None,
            map_groups: Vec::new(),
            break_sequences: vec!["-".to_string()],
            rep: Replacements::default(),
            iconv: Replacements::default(),
            oconv: Replacements::default(),
            compound_min: 3,
            compound_wordmax: None,
            compound_syllable_max: None,
            compound_syllable_vowels: String::new(),
            check_compound_dup: false,
            check_compound_case: false,
            check_compound_triple: false,
            simplified_triple: false,
            check_compound_rep: false,
            compound_rules: Vec::new(),
            compound_patterns: Vec::new(),
            compound_flag: None,
            compound_begin: None,
            compound_middle: None,
            compound_end: None,
            compound_root: None,
            compound_permit: None,
            compound_forbid: None,
            only_in_compound: None,
            no_suggest: None,
            forbidden: None,
            need_affix: None,
            force_ucase: None,
            keep_case: None,
            circumfix: None,
            warn: None,
            check_sharps: false,
            max_cpd_suggs: 3,
            max_diff: None,
            only_max_diff: false,
            no_split_suggs: false,
            full_strip: false,
            affix_tables: AffixTables::default(),
        }
    }
}

impl AffixData {
    pub fn new() -> Self {
        AffixData::default()
    }

    pub fn parse_flags(&self, text: &str) -> Result<FlagSet> {
        parse_flags(text, self.flag_mode)
    }

    pub fn parse_single_flag(&self, text: &str) -> Result<AffixFlag> {
        parse_single_flag(text, self.flag_mode)
    }

    /// Whether COMPOUNDRULE mode is active (one or more patterns defined).
    pub fn has_compound_rules(&self) -> bool {
        !self.compound_rules.is_empty()
    }

    /// Whether flag-mode compounding is active.
    pub fn has_compound_flags(&self) -> bool {
        self.compound_flag.is_some() || self.compound_begin.is_some()
    }

    pub fn compounding_enabled(&self) -> bool {
        self.has_compound_rules() || self.has_compound_flags()
    }

    /// Enumerate the surface forms that the root's own affix flags let it
    /// take: every prefix/suffix rule the root permits, plus cross-product
    /// combinations of a permitted suffix with a permitted cross-product
    /// prefix (and vice versa). Best-effort, for suggestion-candidate
    /// generation (§4.8) rather than acceptance, so CIRCUMFIX pairing isn't
    /// enforced here the way [`crate::hunspell::derive::find_affix_base`]
    /// enforces it on the reverse path.
    pub fn generate_words_from_root(&self, entry: &DictionaryEntry, mut found: impl FnMut(&str)) {
        for rule in &self.affix_tables.suffixes {
            if !entry.flags.contains(rule.flag) {
                continue;
            }
            let Some(sfx_form) = rule.generate(&entry.surface) else { continue };
            found(&sfx_form);
            if !rule.cross_product {
                continue;
            }
            for prule in &self.affix_tables.prefixes {
                if !prule.cross_product || !entry.flags.contains(prule.flag) {
                    continue;
                }
                if let Some(form) = prule.generate(&sfx_form) {
                    found(&form);
                }
            }
        }
        for rule in &self.affix_tables.prefixes {
            if !entry.flags.contains(rule.flag) {
                continue;
            }
            if let Some(form) = rule.generate(&entry.surface) {
                found(&form);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::affixrule::{AffixKind, AffixRule};
    use crate::hunspell::condition::AffixCondition;
    use crate::hunspell::dict::compute_word_flags;

    #[test]
    fn generates_suffix_form_from_root() {
        let mut ad = AffixData::new();
        ad.affix_tables.add_suffix(AffixRule {
            flag: b'A' as u16,
            kind: AffixKind::Suffix,
            strip: String::new(),
            append: "s".to_string(),
            condition: AffixCondition::new(""),
            cross_product: false,
            appended_flags: FlagSet::new(),
        });
        let flags = FlagSet::from_slice(&[b'A' as u16]);
        let entry = DictionaryEntry {
            surface: "hund".to_string(),
            word_flags: compute_word_flags(&flags, &ad),
            flags,
            morph: vec![],
        };
        let mut generated = Vec::new();
        ad.generate_words_from_root(&entry, |w| generated.push(w.to_string()));
        assert_eq!(generated, vec!["hunds".to_string()]);
    }
}
