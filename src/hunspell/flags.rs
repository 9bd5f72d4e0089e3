/// Flags are how Hunspell ties dictionary entries to the affix and compound
/// rules that apply to them. A flag is just a small integer; the affix file
/// picks one of four ways to write those integers down in text.
use anyhow::{anyhow, Result};
use smallvec::SmallVec;

/// A single flag identifier, in `[1, 65535]` per the Hunspell convention
/// (0 is never assigned, so it doubles as a safe "no flag" sentinel in a
/// few places).
pub type AffixFlag = u16;

/// How flags are spelled out in the dictionary and affix files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlagMode {
    /// Single-character flags (the default when `FLAG` is not set).
    #[default]
    CharFlags,
    /// Two-character flags, selected by `FLAG long`.
    DoubleCharFlags,
    /// Comma-separated decimal flags, selected by `FLAG num`.
    NumericFlags,
    /// One flag per Unicode scalar, selected by `FLAG UTF-8`.
    Utf8Flags,
}

/// An ordered set of flags attached to a dictionary entry or produced by an
/// affix rule. Two `FlagSet`s compare equal regardless of the order their
/// members were inserted in, because the backing storage is always kept
/// sorted and deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet(SmallVec<[AffixFlag; 4]>);

impl FlagSet {
    pub fn new() -> Self {
        FlagSet(SmallVec::new())
    }

    pub fn from_slice(flags: &[AffixFlag]) -> Self {
        let mut v: SmallVec<[AffixFlag; 4]> = flags.into();
        v.sort_unstable();
        v.dedup();
        FlagSet(v)
    }

    pub fn contains(&self, flag: AffixFlag) -> bool {
        self.0.binary_search(&flag).is_ok()
    }

    pub fn contains_opt(&self, flag: Option<AffixFlag>) -> bool {
        match flag {
            Some(f) => self.contains(f),
            None => false,
        }
    }

    pub fn insert(&mut self, flag: AffixFlag) {
        if let Err(pos) = self.0.binary_search(&flag) {
            self.0.insert(pos, flag);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = AffixFlag> + '_ {
        self.0.iter().copied()
    }

    /// Union this set with another, returning a new set. Used to compute the
    /// "effective" flag set of an affix-derived surface: the root's flags
    /// union every appended-flags set contributed by the rules applied.
    pub fn union(&self, other: &FlagSet) -> FlagSet {
        let mut v = self.0.clone();
        v.extend(other.0.iter().copied());
        v.sort_unstable();
        v.dedup();
        FlagSet(v)
    }
}

impl FromIterator<AffixFlag> for FlagSet {
    fn from_iter<T: IntoIterator<Item = AffixFlag>>(iter: T) -> Self {
        let mut v: SmallVec<[AffixFlag; 4]> = iter.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        FlagSet(v)
    }
}

/// Decode a flag token (the text that follows `/` on a dictionary line, or
/// an affix rule's `append/FLAGS` field) under the given codec mode.
pub fn parse_flags(text: &str, mode: FlagMode) -> Result<FlagSet> {
    if text.is_empty() {
        return Ok(FlagSet::new());
    }
    let flags: Vec<AffixFlag> = match mode {
        FlagMode::CharFlags => text
            .chars()
            .map(|c| {
                if c as u32 > 0xff {
                    return Err(anyhow!("single-char flag out of range: {c:?}"));
                }
                Ok(c as AffixFlag)
            })
            .collect::<Result<_>>()?,
        FlagMode::DoubleCharFlags => {
            let bytes: Vec<char> = text.chars().collect();
            if bytes.len() % 2 != 0 {
                return Err(anyhow!("long flag string has odd length: {text:?}"));
            }
            bytes
                .chunks(2)
                .map(|pair| {
                    let hi = pair[0] as u32;
                    let lo = pair[1] as u32;
                    if hi > 0xff || lo > 0xff {
                        return Err(anyhow!("long flag chars out of range"));
                    }
                    Ok(((hi << 8) | lo) as AffixFlag)
                })
                .collect::<Result<_>>()?
        }
        FlagMode::NumericFlags => text
            .split(',')
            .map(|tok| {
                let n: u32 = tok
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("bad numeric flag: {tok:?}"))?;
                if n == 0 || n > 0xffff {
                    return Err(anyhow!("numeric flag out of range: {n}"));
                }
                Ok(n as AffixFlag)
            })
            .collect::<Result<_>>()?,
        FlagMode::Utf8Flags => text
            .chars()
            .map(|c| {
                let n = c as u32;
                if n == 0 || n > 0xffff {
                    return Err(anyhow!("utf8 flag out of range: {c:?}"));
                }
                Ok(n as AffixFlag)
            })
            .collect::<Result<_>>()?,
    };
    Ok(FlagSet::from_slice(&flags))
}

/// Like [`parse_flags`] but only accepts a single flag (used for the
/// `COMPOUND*`/`NEEDAFFIX`/etc directives, which each name exactly one flag).
pub fn parse_single_flag(text: &str, mode: FlagMode) -> Result<AffixFlag> {
    let set = parse_flags(text, mode)?;
    let mut it = set.iter();
    match (it.next(), it.next()) {
        (Some(f), None) => Ok(f),
        _ => Err(anyhow!("expected exactly one flag in {text:?}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn char_flags() {
        let fs = parse_flags("AB", FlagMode::CharFlags).unwrap();
        assert!(fs.contains(b'A' as AffixFlag));
        assert!(fs.contains(b'B' as AffixFlag));
        assert!(!fs.contains(b'C' as AffixFlag));
    }

    #[test]
    fn long_flags() {
        let fs = parse_flags("aabb", FlagMode::DoubleCharFlags).unwrap();
        assert_eq!(fs.iter().count(), 2);
        assert!(parse_flags("aab", FlagMode::DoubleCharFlags).is_err());
    }

    #[test]
    fn numeric_flags() {
        let fs = parse_flags("1,2,65535", FlagMode::NumericFlags).unwrap();
        assert_eq!(fs.iter().count(), 3);
        assert!(parse_flags("0", FlagMode::NumericFlags).is_err());
        assert!(parse_flags("65536", FlagMode::NumericFlags).is_err());
    }

    #[test]
    fn utf8_flags() {
        let fs = parse_flags("ÁÉ", FlagMode::Utf8Flags).unwrap();
        assert_eq!(fs.iter().count(), 2);
    }

    #[test]
    fn order_independent_equality() {
        let a = FlagSet::from_slice(&[3, 1, 2]);
        let b = FlagSet::from_slice(&[1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_dedups() {
        let a = FlagSet::from_slice(&[1, 2]);
        let b = FlagSet::from_slice(&[2, 3]);
        assert_eq!(a.union(&b), FlagSet::from_slice(&[1, 2, 3]));
    }
}
