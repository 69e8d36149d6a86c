pub use bcrypt::BcryptError;

/// Hashes a password with bcrypt at the given cost (4 to 31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Checks a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_right_password_only() {
        let stored = hash_password("contraseña-segura", 4).unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert!(verify_password("contraseña-segura", &stored));
        assert!(!verify_password("contrasena-segura", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same", 4).unwrap(), hash_password("same", 4).unwrap());
    }

    #[test]
    fn cost_out_of_range_is_an_error() {
        assert!(hash_password("x", 3).is_err());
    }

    #[test]
    fn malformed_hashes_do_not_verify() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "$2b$04$short"));
        assert!(!verify_password("x", "not-a-bcrypt-hash"));
    }
}
