use crate::{Account, AuthzError, AuthzResult, Role};

/// Validate that `supervisor` may become the supervisor of `pg`.
///
/// Rejects non-PG subordinates, non-supervisor targets, self-assignment, and
/// inactive supervisors. Callers run this under the same lock as the write so
/// a rejected assignment never touches the stored edge.
pub fn validate_assignment(pg: &Account, supervisor: &Account) -> AuthzResult<()> {
    if pg.id == supervisor.id {
        return Err(AuthzError::InvalidAssignment(format!(
            "{} cannot supervise itself",
            pg.id
        )));
    }
    if pg.role() != Role::Pg {
        return Err(AuthzError::InvalidAssignment(format!(
            "{} has role {}, expected pg",
            pg.id,
            pg.role()
        )));
    }
    if supervisor.role() != Role::Supervisor {
        return Err(AuthzError::InvalidAssignment(format!(
            "{} has role {}, expected supervisor",
            supervisor.id,
            supervisor.role()
        )));
    }
    if !supervisor.active {
        return Err(AuthzError::InvalidAssignment(format!(
            "supervisor {} is inactive",
            supervisor.id
        )));
    }
    Ok(())
}
