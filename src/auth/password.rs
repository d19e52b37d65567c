use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2:sha256";
const ITERATIONS: u32 = 260_000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("malformed password hash")]
    Malformed,
    #[error("pbkdf2 failed: {0}")]
    Derive(String),
}

/// Outcome of checking a password against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verified {
    /// Wrong password.
    No,
    /// Right password, stored hash is current.
    Yes,
    /// Right password, but the stored value was plaintext and should be replaced.
    NeedsRehash,
}

impl Verified {
    pub fn is_ok(self) -> bool {
        self != Self::No
    }
}

/// Hash a password as `pbkdf2:sha256:<iterations>$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let key = derive(password, &salt, ITERATIONS, KEY_LENGTH)?;

    Ok(format!(
        "{SCHEME}:{ITERATIONS}${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Check `password` against a stored value.
///
/// Accounts created before hashing was introduced still hold the plaintext;
/// those match by equality and report [`Verified::NeedsRehash`].
pub fn verify_password(password: &str, stored: &str) -> Result<Verified, PasswordError> {
    if !stored.starts_with(SCHEME) {
        return Ok(if constant_time_eq(password.as_bytes(), stored.as_bytes()) {
            Verified::NeedsRehash
        } else {
            Verified::No
        });
    }

    let mut parts = stored.split('$');
    let (Some(header), Some(salt), Some(hash), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordError::Malformed);
    };

    let iterations: u32 = header
        .rsplit(':')
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or(PasswordError::Malformed)?;
    let salt = URL_SAFE_NO_PAD
        .decode(salt)
        .map_err(|_| PasswordError::Malformed)?;
    let expected = URL_SAFE_NO_PAD
        .decode(hash)
        .map_err(|_| PasswordError::Malformed)?;

    let computed = derive(password, &salt, iterations, expected.len())?;

    Ok(if constant_time_eq(&computed, &expected) {
        Verified::Yes
    } else {
        Verified::No
    })
}

fn derive(
    password: &str,
    salt: &[u8],
    iterations: u32,
    len: usize,
) -> Result<Vec<u8>, PasswordError> {
    let mut key = vec![0u8; len];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt, iterations, &mut key)
        .map_err(|e| PasswordError::Derive(e.to_string()))?;
    Ok(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("vendanges2024").unwrap();

        assert!(hash.starts_with("pbkdf2:sha256:260000$"));
        assert_eq!(verify_password("vendanges2024", &hash).unwrap(), Verified::Yes);
        assert_eq!(verify_password("vendanges2023", &hash).unwrap(), Verified::No);
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn plaintext_rows_match_and_ask_for_rehash() {
        assert_eq!(verify_password("admin123", "admin123").unwrap(), Verified::NeedsRehash);
        assert_eq!(verify_password("admin124", "admin123").unwrap(), Verified::No);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "pbkdf2:sha256:1000$only-salt").is_err());
        assert!(verify_password("x", "pbkdf2:sha256:abc$c2FsdA$aGFzaA").is_err());
    }
}
