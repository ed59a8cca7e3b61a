//! Password hashing: argon2id with a fresh salt per hash.
//!
//! Hashing is CPU-bound, so the async entry points run it on tokio's
//! blocking pool instead of a worker thread.

use crate::config::HashingConfig;
use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    /// Digest checked when the account does not exist, so a miss costs one
    /// argon2 run like a wrong password does.
    dummy_hash: Arc<str>,
}

fn argon2(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

fn hash_blocking(params: Params, password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2(params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
        .to_string();
    Ok(hash)
}

/// Uses the parameters stored in the digest, not the configured ones.
fn verify_blocking(params: Params, password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
    Ok(argon2(params)
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task: {}", e)))?
}

impl PasswordService {
    pub fn new(cfg: HashingConfig) -> AppResult<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| AppError::Config(format!("argon2 params: {}", e)))?;
        let dummy_hash = hash_blocking(params.clone(), "no-such-account")?;
        Ok(Self {
            params,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hash into a PHC string that embeds salt and parameters.
    pub async fn hash(&self, password: &str) -> AppResult<String> {
        let params = self.params.clone();
        let password = password.to_owned();
        run_blocking(move || hash_blocking(params, &password)).await
    }

    /// `Ok(false)` on mismatch; only an unparseable digest is an error.
    pub async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let params = self.params.clone();
        let (password, hash) = (password.to_owned(), hash.to_owned());
        run_blocking(move || verify_blocking(params, &password, &hash)).await
    }

    /// Spend the same work as [`verify`](Self::verify) for an unknown account.
    /// Always `false`.
    pub async fn verify_missing(&self, password: &str) -> AppResult<bool> {
        let params = self.params.clone();
        let (password, hash) = (password.to_owned(), self.dummy_hash.clone());
        run_blocking(move || verify_blocking(params, &password, &hash)).await?;
        Ok(false)
    }
}
