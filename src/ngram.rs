/// Calculate a score for the similarity between `str1` and `str2`, used to
/// rank dictionary roots and generated word forms as suggestion candidates.
/// `nmax` is a bound on how large chunks should be considered for similarity.
pub fn ngram(nmax: usize, str1: &[char], str2: &[char]) -> usize {
    let len1 = str1.len();
    let len2 = str2.len();
    let mut score = 0;

    // handle n = 1 as a special case because it is so much simpler
    for c1 in str1 {
        for c2 in str2 {
            score += (c1 == c2) as usize
        }
    }
    if nmax == 1 || score <= 1 {
        return score;
    }

    for n in 2..=nmax {
        let mut nscore = 0;
        if n > len1 || n > len2 {
            break;
        }
        for w1 in str1.windows(n) {
            for w2 in str2.windows(n) {
                if w1 == w2 {
                    nscore += 1;
                }
            }
        }
        score += nscore * n;
        if nscore <= 1 {
            // If there's only 1 hit of this size, there are no longer hits
            break;
        }
    }

    score
}

#[cfg(test)]
mod test {
    use super::*;

    fn v(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_ngram_scores() {
        assert_eq!(0, ngram(1, &v("foo"), &v("bar")));
        assert_eq!(6, ngram(1, &v("awooo"), &v("foo")));
        assert_eq!(6, ngram(1, &v("awooo"), &v("foo")));
        assert_eq!(10, ngram(2, &v("awooo"), &v("foo")));
        assert_eq!(10, ngram(3, &v("awooo"), &v("foo")));
        assert_eq!(9, ngram(1, &v("awooo"), &v("awooga")));
        assert_eq!(17, ngram(2, &v("awooo"), &v("awooga")));
        assert_eq!(23, ngram(3, &v("awooo"), &v("awooga")));
        assert_eq!(27, ngram(4, &v("awooo"), &v("awooga")));
        assert_eq!(27, ngram(5, &v("awooo"), &v("awooga")));
    }
}
