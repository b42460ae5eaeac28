//! Scripted failures for the in-memory store.
//!
//! Each operation carries a `(successes, failures)` budget: the first
//! `successes` calls go through, the next `failures` calls fail with
//! `StoreError::Unavailable`, and every call after that goes through again.

use super::{StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreOperation {
    Create,
    ListOrdered,
    QueryByField,
    Get,
    Update,
    Delete,
}

impl StoreOperation {
    pub const ALL: [StoreOperation; 6] = [
        Self::Create,
        Self::ListOrdered,
        Self::QueryByField,
        Self::Get,
        Self::Update,
        Self::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::ListOrdered => "list_ordered",
            Self::QueryByField => "query_by_field",
            Self::Get => "get",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Create => 0,
            Self::ListOrdered => 1,
            Self::QueryByField => 2,
            Self::Get => 3,
            Self::Update => 4,
            Self::Delete => 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureBehaviour {
    budgets: [(u32, u32); 6],
    suspended: bool,
}

impl FailureBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails for its next `n_fails` calls.
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            budgets: [(0, n_fails); 6],
            suspended: false,
        }
    }

    /// `operation` succeeds `successes` times, then fails `failures` times.
    pub fn with(mut self, operation: StoreOperation, successes: u32, failures: u32) -> Self {
        self.budgets[operation.index()] = (successes, failures);
        self
    }

    /// Lets every call through until [`resume`](Self::resume).
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Consumes one unit of `operation`'s budget.
    pub fn check(&mut self, operation: StoreOperation) -> StoreResult<()> {
        if self.suspended {
            return Ok(());
        }

        let budget = &mut self.budgets[operation.index()];
        if budget.0 > 0 {
            budget.0 -= 1;
            return Ok(());
        }
        if budget.1 > 0 {
            budget.1 -= 1;
            log::debug!(
                "event=store_fault module=store op={} remaining_failures={}",
                operation.as_str(),
                budget.1
            );
            return Err(StoreError::Unavailable(format!(
                "scripted failure for {}",
                operation.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureBehaviour, StoreOperation};

    #[test]
    fn default_behaviour_always_allows() {
        let mut behaviour = FailureBehaviour::new();
        for _ in 0..5 {
            for op in StoreOperation::ALL {
                assert!(behaviour.check(op).is_ok());
            }
        }
    }

    #[test]
    fn fail_now_fails_every_operation_n_times() {
        let mut behaviour = FailureBehaviour::fail_now(2);
        assert!(behaviour.check(StoreOperation::Create).is_err());
        assert!(behaviour.check(StoreOperation::Delete).is_err());
        assert!(behaviour.check(StoreOperation::Create).is_err());
        assert!(behaviour.check(StoreOperation::Create).is_ok());
        assert!(behaviour.check(StoreOperation::Delete).is_err());
        assert!(behaviour.check(StoreOperation::Delete).is_ok());
    }

    #[test]
    fn successes_come_before_failures() {
        let mut behaviour = FailureBehaviour::new().with(StoreOperation::Update, 1, 2);
        assert!(behaviour.check(StoreOperation::Update).is_ok());
        assert!(behaviour.check(StoreOperation::Update).is_err());
        assert!(behaviour.check(StoreOperation::Update).is_err());
        assert!(behaviour.check(StoreOperation::Update).is_ok());
        assert!(behaviour.check(StoreOperation::Get).is_ok());
    }

    #[test]
    fn suspended_behaviour_lets_everything_through() {
        let mut behaviour = FailureBehaviour::fail_now(1);
        behaviour.suspend();
        assert!(behaviour.check(StoreOperation::ListOrdered).is_ok());
        behaviour.resume();
        assert!(behaviour.check(StoreOperation::ListOrdered).is_err());
    }
}
