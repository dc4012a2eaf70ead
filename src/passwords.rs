use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Argon2id cost parameters used for stored account passwords.
const MEMORY_KIB: u32 = 65536;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to parse password hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, PasswordError>;

#[derive(Clone)]
pub struct Passwords<'a> {
    a2: Argon2<'a>,
    min_len: usize,
    max_len: usize,
}

impl Default for Passwords<'_> {
    fn default() -> Self {
        Self::new(MEMORY_KIB, ITERATIONS, LANES)
            .expect("built-in argon2 parameters are valid")
    }
}

impl<'a> Passwords<'a> {
    pub fn new(mem_kib: u32, iters: u32, lanes: u32) -> Result<Self> {
        let params = Params::new(mem_kib, iters, lanes, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(Self {
            a2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_len: 8,
            max_len: 512,
        })
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        self.guard_length(password)?;
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .a2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(phc.to_string())
    }

    /// Returns whether the password matches. Parameters come from the PHC
    /// string, so hashes made with older costs still verify.
    pub fn verify(&self, password: &str, pw_hash: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(pw_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        Ok(self
            .a2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn guard_length(&self, s: &str) -> Result<()> {
        let len = s.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(PasswordError::HashingFailed(
                "password length out of bounds".into(),
            ));
        }
        Ok(())
    }
}
