//! Affected-rows strictness.

use crate::driver::Statement;
use crate::error::{CommandKind, SqlError, SqlResult};

/// Strict-mode component held by every command.
///
/// When strict, an executed statement that affected (or returned) zero rows
/// is an error instead of an empty result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strictness {
    strict: bool,
}

impl Strictness {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Fail with the generic [`SqlError::NoRecordsAffected`] if strict and nothing was affected.
    pub fn check_affected<S: Statement + ?Sized>(&self, statement: &S) -> SqlResult<()> {
        self.check_affected_or(statement, || SqlError::NoRecordsAffected { command: None })
    }

    /// Like [`check_affected`](Self::check_affected) with a caller-chosen error.
    pub fn check_affected_or<S, F>(&self, statement: &S, err: F) -> SqlResult<()>
    where
        S: Statement + ?Sized,
        F: FnOnce() -> SqlError,
    {
        if self.strict && statement.affected_rows() == 0 {
            tracing::debug!(target: "sqlcmd.strict", "strict mode: no records affected");
            return Err(err());
        }
        Ok(())
    }

    /// Check on behalf of a command, raising its specific error.
    pub(crate) fn check_command<S: Statement + ?Sized>(
        &self,
        statement: &S,
        command: CommandKind,
    ) -> SqlResult<()> {
        self.check_affected_or(statement, || SqlError::no_records_affected(command))
    }
}
