//! Wildcard matching for browscap patterns.
//!
//! Patterns use two special characters: `*` matches any run of characters
//! (including none) and `?` matches exactly one character. Everything else
//! matches itself. The whole text must be consumed.

pub const STAR: char = '*';
pub const ANY: char = '?';

pub fn matches(pattern: &str, text: &str, ignore_case: bool) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    matches_chars(&pattern, &text, ignore_case)
}

/// Same as [`matches`] on pre-split characters, so callers walking a tree can
/// reuse their buffers.
pub fn matches_chars(pattern: &[char], text: &[char], ignore_case: bool) -> bool {
    let (mut p, mut t) = (0, 0);
    // Position right after the last star, and the text index it resumes from.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() {
            let pat_char = pattern[p];
            if pat_char == STAR {
                backtrack = Some((p + 1, t));
                p += 1;
                continue;
            }
            if pat_char == ANY || chars_equal(pat_char, text[t], ignore_case) {
                p += 1;
                t += 1;
                continue;
            }
        }

        // Mismatch: let the last star swallow one more character.
        match backtrack {
            Some((star_p, star_t)) => {
                p = star_p;
                t = star_t + 1;
                backtrack = Some((star_p, star_t + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == STAR)
}

fn chars_equal(a: char, b: char, ignore_case: bool) -> bool {
    if ignore_case {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    } else {
        a == b
    }
}
