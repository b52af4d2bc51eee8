// Login digest helpers
//
// The firmware never receives the admin password: the login request
// carries `md5(password + ":" + nonce)` as lowercase hex, where the nonce
// comes from a preceding authenticator `Load` call.

use md5::{Digest, Md5};

/// Lowercase hex encoding of a byte slice.
pub fn hexdigest(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Hex digest of the MD5 hash of `text`.
pub fn get_md5_hash(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hexdigest(&hasher.finalize())
}

/// Digest sent in the `digest` field of an authenticator `Login` request.
pub fn login_digest(password: &str, nonce: &str) -> String {
    get_md5_hash(&format!("{password}:{nonce}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_known_answers() {
        assert_eq!(get_md5_hash(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(get_md5_hash("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn hexdigest_is_lowercase_and_padded() {
        assert_eq!(hexdigest(&[0x00, 0x0a, 0xff]), "000aff");
    }

    #[test]
    fn login_digest_joins_with_colon() {
        assert_eq!(login_digest("admin", "abc"), get_md5_hash("admin:abc"));
        assert_eq!(login_digest("admin", "abc").len(), 32);
    }
}
