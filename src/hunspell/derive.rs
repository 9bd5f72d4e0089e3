/// TryFindAffixBase: given a surface form, enumerate the dictionary roots
/// that could have produced it through one prefix, one suffix, or a
/// nested prefix+suffix (either order), tracking which affixes were
/// applied so compound-position and CIRCUMFIX constraints can be checked
/// by the caller.
use smallvec::SmallVec;

use crate::hunspell::affixdata::AffixData;
use crate::hunspell::affixrule::{AffixKind, AffixRule};
use crate::hunspell::dict::{DictionaryEntry, LexicalIndex};
use crate::hunspell::flags::FlagSet;
use crate::hunspell::wordflags::WordFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivationKind {
    PrefixOnly,
    SuffixOnly,
    PrefixThenSuffix,
    SuffixThenPrefix,
}

impl DerivationKind {
    /// Whether this kind of derivation carries an *outer* suffix, which
    /// bars the derived form from non-final compound positions unless
    /// COMPOUNDPERMIT is set (§4.4).
    pub fn has_outer_suffix(self) -> bool {
        matches!(self, DerivationKind::SuffixOnly | DerivationKind::PrefixThenSuffix)
    }

    /// Whether this kind carries an *outer* prefix, barring non-initial
    /// compound positions under the same exception.
    pub fn has_outer_prefix(self) -> bool {
        matches!(self, DerivationKind::PrefixOnly | DerivationKind::SuffixThenPrefix)
    }
}

#[derive(Clone, Debug)]
pub struct Derivation<'a> {
    pub root: &'a DictionaryEntry,
    pub appended_flags: FlagSet,
    pub kind: DerivationKind,
    pub affix_count: u8,
}

/// Looks up candidate roots in the dictionary, honoring the homonym
/// invariant (per-variant flags, not a merged bag) and the caller's
/// policy on whether ONLYINCOMPOUND roots are admissible here.
fn dictionary_roots<'a>(
    index: &'a LexicalIndex,
    root: &str,
    allow_only_in_compound: bool,
) -> impl Iterator<Item = &'a DictionaryEntry> {
    index.lookup(root).iter().filter(move |e| {
        if e.has_flag(WordFlags::Forbidden) {
            return false;
        }
        if !allow_only_in_compound && e.has_flag(WordFlags::OnlyInCompound) {
            return false;
        }
        true
    })
}

/// Does `entry` permit this specific rule (the rule's flag is among the
/// root's flags)? CIRCUMFIX pairing is checked separately by the caller,
/// once both applied rules (if any) are known.
fn root_permits_rule(entry: &DictionaryEntry, rule: &AffixRule, _ad: &AffixData) -> bool {
    entry.flags.contains(rule.flag)
}

/// Enumerate every `(rule, intermediate_root)` pair among `rules` whose
/// append matches `surface`'s edge and whose condition is satisfied.
fn candidate_strips<'a>(
    ad: &'a AffixData,
    surface: &'a str,
    kind: AffixKind,
) -> SmallVec<[(&'a AffixRule, String); 4]> {
    let mut out = SmallVec::new();
    match kind {
        AffixKind::Suffix => {
            ad.affix_tables.matching_suffixes(surface, |rule| {
                if let Some(root) = rule.derive_suffix_root(surface) {
                    out.push((rule, root));
                }
                false
            });
        }
        AffixKind::Prefix => {
            ad.affix_tables.matching_prefixes(surface, |rule| {
                if let Some(root) = rule.derive_prefix_root(surface) {
                    out.push((rule, root));
                }
                false
            });
        }
    }
    out
}

/// Full TryFindAffixBase: enumerate every accepted derivation of
/// `surface`, up to one prefix and one suffix stacked in either order.
pub fn find_affix_base<'a>(
    ad: &'a AffixData,
    index: &'a LexicalIndex,
    surface: &str,
    allow_only_in_compound: bool,
) -> Vec<Derivation<'a>> {
    let mut out = Vec::new();

    // suffix-only, and suffix-then-prefix (prefix applied to the
    // suffix-stripped intermediate).
    for (srule, inner) in candidate_strips(ad, surface, AffixKind::Suffix) {
        for entry in dictionary_roots(index, &inner, allow_only_in_compound) {
            if root_permits_rule(entry, srule, ad) {
                out.push(Derivation {
                    root: entry,
                    appended_flags: srule.appended_flags.clone(),
                    kind: DerivationKind::SuffixOnly,
                    affix_count: 1,
                });
            }
        }
        if !srule.cross_product {
            continue;
        }
        for (prule, root) in candidate_strips(ad, &inner, AffixKind::Prefix) {
            if !prule.cross_product {
                continue;
            }
            for entry in dictionary_roots(index, &root, allow_only_in_compound) {
                if !root_permits_rule(entry, prule, ad) {
                    continue;
                }
                if !circumfix_paired(ad, entry, &[srule, prule]) {
                    continue;
                }
                out.push(Derivation {
                    root: entry,
                    appended_flags: srule.appended_flags.union(&prule.appended_flags),
                    kind: DerivationKind::SuffixThenPrefix,
                    affix_count: 2,
                });
            }
        }
    }

    // prefix-only, and prefix-then-suffix.
    for (prule, inner) in candidate_strips(ad, surface, AffixKind::Prefix) {
        for entry in dictionary_roots(index, &inner, allow_only_in_compound) {
            if root_permits_rule(entry, prule, ad) {
                out.push(Derivation {
                    root: entry,
                    appended_flags: prule.appended_flags.clone(),
                    kind: DerivationKind::PrefixOnly,
                    affix_count: 1,
                });
            }
        }
        if !prule.cross_product {
            continue;
        }
        for (srule, root) in candidate_strips(ad, &inner, AffixKind::Suffix) {
            if !srule.cross_product {
                continue;
            }
            for entry in dictionary_roots(index, &root, allow_only_in_compound) {
                if !root_permits_rule(entry, srule, ad) {
                    continue;
                }
                if !circumfix_paired(ad, entry, &[prule, srule]) {
                    continue;
                }
                out.push(Derivation {
                    root: entry,
                    appended_flags: prule.appended_flags.union(&srule.appended_flags),
                    kind: DerivationKind::PrefixThenSuffix,
                    affix_count: 2,
                });
            }
        }
    }

    out.retain(|d| !d.root.has_flag(WordFlags::Forbidden));
    out
}

/// If either applied rule carries the configured CIRCUMFIX marker, both
/// must (the prefix and the suffix must be paired); if neither does,
/// there's nothing to check.
fn circumfix_paired(ad: &AffixData, _entry: &DictionaryEntry, rules: &[&AffixRule; 2]) -> bool {
    let Some(circumfix) = ad.circumfix else { return true };
    let a = rules[0].appended_flags.contains(circumfix);
    let b = rules[1].appended_flags.contains(circumfix);
    a == b
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::condition::AffixCondition;

    fn make_ad_with_suffix() -> AffixData {
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
        ad
    }

    #[test]
    fn simple_suffix_derivation() {
        let ad = make_ad_with_suffix();
        let mut index = LexicalIndex::new();
        index.insert("hund", FlagSet::from_slice(&[b'A' as u16]), vec![], &ad);
        let derivations = find_affix_base(&ad, &index, "hunds", false);
        assert_eq!(derivations.len(), 1);
        assert_eq!(derivations[0].root.surface, "hund");
        assert_eq!(derivations[0].kind, DerivationKind::SuffixOnly);
    }

    #[test]
    fn no_derivation_without_flag() {
        let ad = make_ad_with_suffix();
        let mut index = LexicalIndex::new();
        index.insert("katze", FlagSet::new(), vec![], &ad);
        let derivations = find_affix_base(&ad, &index, "katzes", false);
        assert!(derivations.is_empty());
    }
}
