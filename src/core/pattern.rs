use crate::core::matcher::{ANY, STAR};
use regex::Regex;

/// Number of characters in a browscap pattern that are not wildcards.
/// Longer literal matches win when several patterns match a user agent.
pub fn literal_length(pattern: &str) -> usize {
    pattern.chars().filter(|&c| c != STAR && c != ANY).count()
}

/// Anchored regular expression source equivalent to a browscap pattern.
pub fn to_regex_source(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            STAR | ANY => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if c == STAR { ".*?" } else { "." });
            }
            other => literal.push(other),
        }
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');
    source
}

pub fn to_regex(pattern: &str, ignore_case: bool) -> Result<Regex, regex::Error> {
    let source = to_regex_source(pattern);
    if ignore_case {
        Regex::new(&format!("(?i){}", source))
    } else {
        Regex::new(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matcher::matches;

    #[test]
    fn test_literal_length_skips_wildcards_only() {
        assert_eq!(literal_length("(.?*+)"), 4);
        assert_eq!(literal_length("*"), 0);
        assert_eq!(literal_length("Mozilla/5.0*"), 11);
    }

    #[test]
    fn test_regex_source_escapes_literals() {
        assert_eq!(to_regex_source("(.?*+)"), r"^\(\...*?\+\)$");
    }

    #[test]
    fn test_regex_agrees_with_matcher() {
        let cases = [
            ("Mozilla/5.0 (*Windows NT 10.0*WOW64*Trident/7.0*rv:11.0*",
             "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko"),
            ("curl/7.*", "curl/7.52.1"),
            ("curl/7.*", "curl/8.0"),
            ("a?c", "abc"),
            ("a?c", "abbc"),
        ];
        for (pattern, user_agent) in cases {
            let regex = to_regex(pattern, false).unwrap();
            assert_eq!(
                regex.is_match(user_agent),
                matches(pattern, user_agent, false),
                "{} vs {}",
                pattern,
                user_agent
            );
        }
    }
}
