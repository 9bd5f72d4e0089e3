/// Case is classified once per input token, at the orchestrator's entry
/// point, and threaded through every deeper check rather than being
/// re-derived inside affix derivation or the compound splitter.
use unicode_casing::CharExt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapStyle {
    /// No cased letters at all, or all lower-case.
    NoCap,
    /// Every cased letter is upper-case.
    AllCap,
    /// The first cased letter is upper-case, the rest lower (or there are
    /// no more cased letters after it).
    InitCap,
    /// Starts upper-case but has further upper-case letters elsewhere too
    /// (e.g. `McDonald`, `DVDRom`) -- mixed case that isn't AllCap.
    HuhInitCap,
}

impl CapStyle {
    pub fn from_str(word: &str) -> Self {
        let mut saw_upper_after_first = false;
        let mut saw_lower = false;
        let mut first_cased: Option<bool> = None; // Some(true) = upper
        for c in word.chars() {
            // Unicode titlecase code points (e.g. the 'ǅ' in "ǅrna") are
            // neither uppercase nor lowercase by `char`'s simpler notion,
            // but they're cased, and they behave like an upper for our
            // purposes (they only ever open a word).
            let is_titlecase = c.is_titlecase();
            if !c.is_uppercase() && !c.is_lowercase() && !is_titlecase {
                continue;
            }
            let is_upper = c.is_uppercase() || is_titlecase;
            if first_cased.is_none() {
                first_cased = Some(is_upper);
            } else if is_upper {
                saw_upper_after_first = true;
            } else {
                saw_lower = true;
            }
        }
        match first_cased {
            None => CapStyle::NoCap,
            Some(false) => CapStyle::NoCap,
            Some(true) => {
                if saw_upper_after_first && saw_lower {
                    CapStyle::HuhInitCap
                } else if saw_upper_after_first {
                    CapStyle::AllCap
                } else {
                    CapStyle::InitCap
                }
            }
        }
    }

    pub fn is_upper_at_all(self) -> bool {
        !matches!(self, CapStyle::NoCap)
    }
}

/// Fold a word for case-insensitive dictionary lookup, using full Unicode
/// default case folding (handles e.g. German ß, Turkish dotted/dotless I
/// better than a naive `to_lowercase`).
pub fn case_fold(word: &str) -> String {
    caseless::default_case_fold_str(word)
}

/// Produce the title-case form of a word (first cased char upper, rest
/// unchanged), used when trying a capitalized dictionary lookup for an
/// InitCap token.
pub fn to_title_case(word: &str) -> String {
    unicode_titlecase::StrTitleCase::to_titlecase(word)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_plain() {
        assert_eq!(CapStyle::from_str("hello"), CapStyle::NoCap);
    }

    #[test]
    fn classifies_allcap() {
        assert_eq!(CapStyle::from_str("HELLO"), CapStyle::AllCap);
    }

    #[test]
    fn classifies_initcap() {
        assert_eq!(CapStyle::from_str("Hello"), CapStyle::InitCap);
    }

    #[test]
    fn classifies_huhinitcap() {
        assert_eq!(CapStyle::from_str("McDonald"), CapStyle::HuhInitCap);
    }

    #[test]
    fn digits_dont_count() {
        assert_eq!(CapStyle::from_str("123"), CapStyle::NoCap);
    }
}
