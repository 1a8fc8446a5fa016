// src/env/resolver.rs

use std::collections::BTreeMap;
use std::collections::btree_map;

use tracing::debug;

/// Final flat environment table for a child process.
///
/// Keys are unique. Built by [`resolve`]; the launcher clears the child's
/// inherited environment and applies exactly this table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    vars: BTreeMap<String, String>,
}

impl ResolvedEnvironment {
    /// Resolve against the environment of the current process.
    ///
    /// Ambient variables whose name or value is not valid UTF-8 are dropped.
    pub fn from_process(base_vars: &[(String, String)], override_text: &str) -> Self {
        resolve(ambient_vars(), base_vars, override_text)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.vars.iter()
    }

    fn set(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }
}

impl<'a> IntoIterator for &'a ResolvedEnvironment {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Merge ambient, base and override layers into one table.
///
/// Precedence is `ambient < base_vars < override_text`; within a layer the
/// later entry wins. Resolution never fails:
///
/// - a base variable is applied only when its trimmed value is non-empty
///   (the trimmed value is stored), so a blank form field leaves the
///   inherited value untouched;
/// - override lines that are blank, have no `=`, or have an empty key are
///   skipped (see [`parse_overrides`]).
pub fn resolve(
    ambient: impl IntoIterator<Item = (String, String)>,
    base_vars: &[(String, String)],
    override_text: &str,
) -> ResolvedEnvironment {
    let mut env = ResolvedEnvironment::default();

    for (key, value) in ambient {
        env.set(key, value);
    }

    for (key, value) in base_vars {
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if !is_valid_key(key) || value.contains(['\n', '\r']) {
            debug!(key, "skipping malformed base environment variable");
            continue;
        }
        env.set(key.to_string(), value.to_string());
    }

    for (key, value) in parse_overrides(override_text) {
        env.set(key, value);
    }

    env
}

/// Parse free-form `KEY=VALUE` text, one assignment per line.
///
/// Each line is split on its first `=`; key and value are trimmed. Blank
/// lines, lines without `=` and lines with an empty key are dropped
/// silently. Duplicates are kept in input order, so applying the result
/// in sequence gives last-write-wins.
pub fn parse_overrides(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            if line.trim().is_empty() {
                return None;
            }
            let Some((key, value)) = line.split_once('=') else {
                debug!(line, "skipping environment override without '='");
                return None;
            };
            let key = key.trim();
            if !is_valid_key(key) {
                debug!(line, "skipping environment override with empty key");
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\n', '\r', '\0'])
}

fn ambient_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
        (Ok(k), Ok(v)) => Some((k, v)),
        (Ok(k), Err(_)) => {
            debug!(key = %k, "dropping ambient variable with non UTF-8 value");
            None
        }
        _ => {
            debug!("dropping ambient variable with non UTF-8 name");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn lines_without_equals_are_ignored() {
        let env = resolve(Vec::new(), &[], "FOO\nBAR=baz");
        assert_eq!(env.get("BAR"), Some("baz"));
        assert!(!env.contains_key("FOO"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn overrides_beat_base_which_beats_ambient() {
        let env = resolve(pairs(&[("A", "1")]), &pairs(&[("A", "2")]), "A=3");
        assert_eq!(env.get("A"), Some("3"));

        let env = resolve(pairs(&[("A", "1")]), &pairs(&[("A", "2")]), "");
        assert_eq!(env.get("A"), Some("2"));
    }

    #[test]
    fn blank_base_value_does_not_clear_ambient() {
        let env = resolve(pairs(&[("A", "1")]), &pairs(&[("A", "   ")]), "");
        assert_eq!(env.get("A"), Some("1"));
    }

    #[test]
    fn base_values_are_trimmed() {
        let env = resolve(Vec::new(), &pairs(&[("CUDA_VISIBLE_DEVICES", "  0 ")]), "");
        assert_eq!(env.get("CUDA_VISIBLE_DEVICES"), Some("0"));
    }

    #[test]
    fn base_value_with_newline_is_skipped() {
        let env = resolve(pairs(&[("A", "1")]), &pairs(&[("A", "x\ny")]), "");
        assert_eq!(env.get("A"), Some("1"));
    }

    #[test]
    fn override_splits_on_first_equals_and_trims() {
        let parsed = parse_overrides("  OPTS = --a=1 --b=2  \n");
        assert_eq!(parsed, pairs(&[("OPTS", "--a=1 --b=2")]));
    }

    #[test]
    fn later_override_wins_on_duplicate_key() {
        let env = resolve(Vec::new(), &[], "K=first\nK=second\n");
        assert_eq!(env.get("K"), Some("second"));
    }

    #[test]
    fn blank_and_keyless_lines_are_skipped() {
        let parsed = parse_overrides("\n   \n=value\nOK=1\r\n");
        assert_eq!(parsed, pairs(&[("OK", "1")]));
    }

    #[test]
    fn empty_value_override_is_kept() {
        let env = resolve(pairs(&[("A", "1")]), &[], "A=");
        assert_eq!(env.get("A"), Some(""));
    }
}
