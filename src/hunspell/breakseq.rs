/// BREAK decomposition (§4.6): if any configured break sequence occurs in
/// the interior of a surface (not at either edge), try splitting there
/// into two non-empty halves and accept the whole if both halves are
/// independently accepted, recursing to allow multiple break points.
pub fn try_break(word: &str, sequences: &[String], mut accept: impl FnMut(&str) -> bool) -> bool {
    try_break_inner(word, sequences, &mut accept, 0)
}

const MAX_BREAK_DEPTH: usize = 16;

fn try_break_inner(
    word: &str,
    sequences: &[String],
    accept: &mut impl FnMut(&str) -> bool,
    depth: usize,
) -> bool {
    if depth >= MAX_BREAK_DEPTH {
        return false;
    }
    for seq in sequences {
        if seq.is_empty() {
            continue;
        }
        let mut search_from = 0;
        while let Some(rel) = word[search_from..].find(seq.as_str()) {
            let at = search_from + rel;
            search_from = at + seq.len();
            if at == 0 || at + seq.len() >= word.len() {
                continue;
            }
            let left = &word[..at];
            let right = &word[at + seq.len()..];
            if left.is_empty() || right.is_empty() {
                continue;
            }
            let left_ok = accept(left) || try_break_inner(left, sequences, accept, depth + 1);
            if !left_ok {
                continue;
            }
            let right_ok = accept(right) || try_break_inner(right, sequences, accept, depth + 1);
            if right_ok {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    fn dict() -> Vec<&'static str> {
        vec!["foo", "bar", "baz"]
    }

    fn check(word: &str) -> bool {
        dict().contains(&word)
    }

    #[test]
    fn splits_on_hyphen() {
        let seqs = vec!["-".to_string()];
        assert!(try_break("foo-bar", &seqs, check));
        assert!(try_break("foo-bar-baz", &seqs, check));
    }

    #[test]
    fn rejects_unknown_part() {
        let seqs = vec!["-".to_string()];
        assert!(!try_break("foo-xyz", &seqs, check));
    }

    #[test]
    fn rejects_edge_break() {
        let seqs = vec!["-".to_string()];
        assert!(!try_break("-foo", &seqs, check));
    }
}
