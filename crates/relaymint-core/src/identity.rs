//! Short-id and credential minting.
//!
//! A client identity pairs a short, human-shareable id (directory name and
//! URI display label, not a secret) with a UUID credential (the value that
//! actually authorizes a connection). Uniqueness of the short id is not
//! checked anywhere: a collision overwrites the artifact directory and panel
//! entry label, which is an accepted risk at this fleet's scale.

use rand::RngExt;
use tracing::debug;
use uuid::Uuid;

/// URL-safe alphabet for short ids (nanoid-style, 64 characters).
const SHORT_ID_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Short id length for panel transports (VLESS, Shadowsocks).
pub const PANEL_SHORT_ID_LEN: usize = 6;

/// Short id length for WireGuard clients.
pub const WG_SHORT_ID_LEN: usize = 5;

/// A freshly minted client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Short public identifier; directory name and URI label.
    pub short_id: String,
    /// UUID v4 secret in hyphenated canonical form.
    pub credential: String,
}

impl ClientIdentity {
    /// Mint an identity with a short id of `len` characters.
    ///
    /// A supplied `preferred` id is truncated to `len` (shorter input is kept
    /// verbatim); otherwise `len` characters are drawn from the URL-safe
    /// alphabet. The credential is always a fresh random UUID, independent of
    /// `preferred`.
    ///
    /// A preferred id must itself stay within URL-safe characters: nothing is
    /// sanitized here, and a reserved character would end up verbatim in the
    /// URI fragment and directory name.
    pub fn generate(preferred: Option<&str>, len: usize) -> Self {
        let short_id = match preferred {
            Some(p) => truncate_to(p, len),
            None => random_short_id(len),
        };
        debug!(%short_id, seeded = preferred.is_some(), "minted identity");
        Self {
            short_id,
            credential: Uuid::new_v4().to_string(),
        }
    }
}

/// Generate a random short id of the given length.
fn random_short_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..SHORT_ID_CHARSET.len());
            SHORT_ID_CHARSET[idx] as char
        })
        .collect()
}

/// Truncate on a character boundary; input within the bound is untouched.
fn truncate_to(input: &str, len: usize) -> String {
    input.chars().take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_short_id_has_requested_length() {
        for len in [PANEL_SHORT_ID_LEN, WG_SHORT_ID_LEN] {
            let identity = ClientIdentity::generate(None, len);
            assert_eq!(identity.short_id.len(), len);
        }
    }

    #[test]
    fn random_short_id_stays_in_charset() {
        let identity = ClientIdentity::generate(None, 64);
        assert!(identity
            .short_id
            .bytes()
            .all(|b| SHORT_ID_CHARSET.contains(&b)));
    }

    #[test]
    fn preferred_id_within_bound_kept_verbatim() {
        let identity = ClientIdentity::generate(Some("ab3"), PANEL_SHORT_ID_LEN);
        assert_eq!(identity.short_id, "ab3");
    }

    #[test]
    fn preferred_id_beyond_bound_is_truncated() {
        let identity = ClientIdentity::generate(Some("alice-laptop"), PANEL_SHORT_ID_LEN);
        assert_eq!(identity.short_id, "alice-");
    }

    #[test]
    fn credential_is_a_hyphenated_uuid() {
        let identity = ClientIdentity::generate(Some("x"), PANEL_SHORT_ID_LEN);
        assert!(Uuid::parse_str(&identity.credential).is_ok());
        assert_eq!(identity.credential.len(), 36);
    }

    #[test]
    fn credential_is_independent_of_preferred_id() {
        let a = ClientIdentity::generate(Some("same"), PANEL_SHORT_ID_LEN);
        let b = ClientIdentity::generate(Some("same"), PANEL_SHORT_ID_LEN);
        assert_eq!(a.short_id, b.short_id);
        assert_ne!(a.credential, b.credential);
    }
}
