use crate::error::Result;

/// Work factor bounds bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt hashing with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Spends the same work as `verify` when there is no stored hash, so a
    /// missing account is not faster to reject than a wrong password.
    pub fn verify_missing(&self, password: &str) -> bool {
        if let Err(e) = bcrypt::hash(password, self.cost) {
            tracing::debug!(error = %e, "dummy hash failed");
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
