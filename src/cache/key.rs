//! Cache Key Module
//!
//! Derives cache fingerprints from the incoming request.

use std::fmt::{self, Write};
use std::str::FromStr;

/// Separator between path and credential. `#` never occurs in a request-target.
const CREDENTIAL_SEPARATOR: char = '#';

// == Key Policy ==
/// How requests are fingerprinted for the cache.
///
/// `PathOnly` shares one entry across all callers of a path and is only safe
/// when upstream responses do not depend on the caller's credential.
/// `PathWithCredential` keeps a separate entry per credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    PathOnly,
    PathWithCredential,
}

impl KeyPolicy {
    /// Builds the cache key for a request path (with query) and the raw
    /// credential bytes.
    ///
    /// The credential is written byte-exact: printable ASCII other than `%`
    /// is kept, every other byte becomes `%XX`. Distinct credentials always
    /// give distinct keys, including header values that are not UTF-8.
    pub fn derive_key(&self, path_and_query: &str, credential: Option<&[u8]>) -> String {
        match self {
            KeyPolicy::PathOnly => path_and_query.to_string(),
            KeyPolicy::PathWithCredential => {
                let credential = credential.unwrap_or_default();
                let mut key =
                    String::with_capacity(path_and_query.len() + credential.len() + 1);
                key.push_str(path_and_query);
                key.push(CREDENTIAL_SEPARATOR);
                push_escaped(&mut key, credential);
                key
            }
        }
    }
}

fn push_escaped(key: &mut String, bytes: &[u8]) {
    for &byte in bytes {
        if (byte.is_ascii_graphic() && byte != b'%') || byte == b' ' {
            key.push(byte as char);
        } else {
            // Writing to a String never fails
            let _ = write!(key, "%{:02X}", byte);
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" | "path-only" => Ok(KeyPolicy::PathOnly),
            "path+credential" | "path-credential" => Ok(KeyPolicy::PathWithCredential),
            other => Err(format!("unknown cache key policy: {}", other)),
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::PathOnly => f.write_str("path"),
            KeyPolicy::PathWithCredential => f.write_str("path+credential"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_only_ignores_credential() {
        let policy = KeyPolicy::PathOnly;
        let a = policy.derive_key("/3/movie/550?language=en", Some(b"Bearer a".as_slice()));
        let b = policy.derive_key("/3/movie/550?language=en", Some(b"Bearer b".as_slice()));
        let none = policy.derive_key("/3/movie/550?language=en", None);

        assert_eq!(a, "/3/movie/550?language=en");
        assert_eq!(a, b);
        assert_eq!(a, none);
    }

    #[test]
    fn test_path_with_credential_separates_callers() {
        let policy = KeyPolicy::PathWithCredential;
        let a = policy.derive_key("/3/movie/550", Some(b"Bearer a".as_slice()));
        let b = policy.derive_key("/3/movie/550", Some(b"Bearer b".as_slice()));

        assert_ne!(a, b);
        assert_eq!(a, "/3/movie/550#Bearer a");
    }

    #[test]
    fn test_path_with_credential_absent_is_empty() {
        let policy = KeyPolicy::PathWithCredential;
        assert_eq!(policy.derive_key("/3/genre/movie/list", None), "/3/genre/movie/list#");
    }

    #[test]
    fn test_path_with_credential_does_not_collide_on_concatenation() {
        let policy = KeyPolicy::PathWithCredential;
        let a = policy.derive_key("/3/movie/5", Some(b"50".as_slice()));
        let b = policy.derive_key("/3/movie/550", Some(b"".as_slice()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_non_utf8_credentials_stay_distinct() {
        let policy = KeyPolicy::PathWithCredential;
        let a = policy.derive_key("/3/account", Some(b"Bearer \xff".as_slice()));
        let b = policy.derive_key("/3/account", Some(b"Bearer \xfe".as_slice()));

        assert_ne!(a, b);
        assert_eq!(a, "/3/account#Bearer %FF");
    }

    #[test]
    fn test_escaped_byte_does_not_collide_with_literal_text() {
        let policy = KeyPolicy::PathWithCredential;
        let raw = policy.derive_key("/3/account", Some(b"\xff".as_slice()));
        let literal = policy.derive_key("/3/account", Some(b"%FF".as_slice()));

        assert_ne!(raw, literal);
        assert_eq!(literal, "/3/account#%25FF");
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("path".parse::<KeyPolicy>(), Ok(KeyPolicy::PathOnly));
        assert_eq!("Path-Only".parse::<KeyPolicy>(), Ok(KeyPolicy::PathOnly));
        assert_eq!(
            "path+credential".parse::<KeyPolicy>(),
            Ok(KeyPolicy::PathWithCredential)
        );
        assert_eq!(
            " path-credential ".parse::<KeyPolicy>(),
            Ok(KeyPolicy::PathWithCredential)
        );
        assert!("query".parse::<KeyPolicy>().is_err());
        assert!("".parse::<KeyPolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [KeyPolicy::PathOnly, KeyPolicy::PathWithCredential] {
            assert_eq!(policy.to_string().parse::<KeyPolicy>(), Ok(policy));
        }
    }
}
