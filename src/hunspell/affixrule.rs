/// A single `PFX`/`SFX` entry: strip this much off the edge of the root,
/// append this text instead, provided the root's edge (after the strip)
/// matches `condition`. `appended_flags` lists flags the derived surface
/// inherits on top of the root's own flags.
use fnv::FnvHashMap;

use crate::affix_trie::{PrefixTrie, SuffixTrie};
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::flags::{AffixFlag, FlagSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Clone, Debug)]
pub struct AffixRule {
    pub flag: AffixFlag,
    pub kind: AffixKind,
    /// Text stripped from the root's edge. Empty when nothing is stripped.
    pub strip: String,
    /// Text appended at the root's edge. Empty for a flag-only rule: the
    /// derived surface then equals the root, and only the appended flags
    /// (and the rule's mere applicability) matter.
    pub append: String,
    pub condition: AffixCondition,
    /// `Y`/`N` on the PFX/SFX header: whether this rule may combine with a
    /// rule of the other kind on the same word (cross-product).
    pub cross_product: bool,
    pub appended_flags: FlagSet,
}

impl AffixRule {
    /// Given a surface form, if this (suffix) rule could have produced it,
    /// return the intermediate root candidate (after undoing the append and
    /// redoing the strip), provided the rule's condition is satisfied
    /// against that intermediate form's trailing edge.
    pub fn derive_suffix_root(&self, surface: &str) -> Option<String> {
        debug_assert_eq!(self.kind, AffixKind::Suffix);
        let stem = surface.strip_suffix(self.append.as_str())?;
        let mut root = String::with_capacity(stem.len() + self.strip.len());
        root.push_str(stem);
        root.push_str(&self.strip);
        if self.condition.suffix_match(&root) {
            Some(root)
        } else {
            None
        }
    }

    pub fn derive_prefix_root(&self, surface: &str) -> Option<String> {
        debug_assert_eq!(self.kind, AffixKind::Prefix);
        let stem = surface.strip_prefix(self.append.as_str())?;
        let mut root = String::with_capacity(stem.len() + self.strip.len());
        root.push_str(&self.strip);
        root.push_str(stem);
        if self.condition.prefix_match(&root) {
            Some(root)
        } else {
            None
        }
    }

    /// Produce a surface form from a root, for suggestion generation
    /// (ngram/delins candidate expansion). Returns `None` if the root does
    /// not satisfy the rule's condition.
    pub fn generate(&self, root: &str) -> Option<String> {
        match self.kind {
            AffixKind::Suffix => {
                if !self.condition.suffix_match(root) {
                    return None;
                }
                let stem = root.strip_suffix(&self.strip)?;
                Some(format!("{stem}{}", self.append))
            }
            AffixKind::Prefix => {
                if !self.condition.prefix_match(root) {
                    return None;
                }
                let stem = root.strip_prefix(&self.strip)?;
                Some(format!("{}{stem}", self.append))
            }
        }
    }
}

/// All PFX/SFX rules parsed from an affix file, indexed for fast lookup both
/// by flag (used when validating whether a root permits a given rule) and by
/// the rule's appended text (used during affix derivation to quickly narrow
/// down which rules could possibly apply to a candidate surface).
#[derive(Clone, Debug, Default)]
pub struct AffixTables {
    pub prefixes: Vec<AffixRule>,
    pub suffixes: Vec<AffixRule>,
    by_prefix_flag: FnvHashMap<AffixFlag, Vec<u32>>,
    by_suffix_flag: FnvHashMap<AffixFlag, Vec<u32>>,
    prefix_trie: PrefixTrie<u32>,
    suffix_trie: SuffixTrie<u32>,
}

impl AffixTables {
    pub fn add_prefix(&mut self, rule: AffixRule) {
        let idx = self.prefixes.len() as u32;
        self.prefix_trie.insert(&rule.append, idx);
        self.by_prefix_flag.entry(rule.flag).or_default().push(idx);
        self.prefixes.push(rule);
    }

    pub fn add_suffix(&mut self, rule: AffixRule) {
        let idx = self.suffixes.len() as u32;
        self.suffix_trie.insert(&rule.append, idx);
        self.by_suffix_flag.entry(rule.flag).or_default().push(idx);
        self.suffixes.push(rule);
    }

    pub fn rules_for_flag(&self, kind: AffixKind, flag: AffixFlag) -> &[u32] {
        let map = match kind {
            AffixKind::Prefix => &self.by_prefix_flag,
            AffixKind::Suffix => &self.by_suffix_flag,
        };
        map.get(&flag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Visit every suffix rule whose `append` text is a suffix of `word`,
    /// most specific (longest append) first is not guaranteed; callers that
    /// care about ordering should sort by `rule.append.len()`.
    pub fn matching_suffixes(&self, word: &str, mut found: impl FnMut(&AffixRule) -> bool) {
        self.suffix_trie.lookup(word, |idx| found(&self.suffixes[idx as usize]));
    }

    pub fn matching_prefixes(&self, word: &str, mut found: impl FnMut(&AffixRule) -> bool) {
        self.prefix_trie.lookup(word, |idx| found(&self.prefixes[idx as usize]));
    }
}
