use worktrace_types::{Error, Result, SessionId, SessionStatus};

/// Lifecycle moves a caller can request on an existing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Pause,
    Resume,
    Finish,
    Cancel,
}

impl LifecycleAction {
    /// Operation name used in error messages
    pub fn operation(&self) -> &'static str {
        match self {
            LifecycleAction::Pause => "pause",
            LifecycleAction::Resume => "resume",
            LifecycleAction::Finish => "finish",
            LifecycleAction::Cancel => "cancel",
        }
    }
}

/// The session state machine as a transition table.
///
/// Returns the next status, or `InvalidTransition` when the move is not
/// allowed from the current state. Terminal states accept nothing.
pub fn apply(status: SessionStatus, action: LifecycleAction) -> Result<SessionStatus> {
    let next = match (status, action) {
        (SessionStatus::Running, LifecycleAction::Pause) => SessionStatus::Paused,
        (SessionStatus::Paused, LifecycleAction::Resume) => SessionStatus::Running,
        (SessionStatus::Running | SessionStatus::Paused, LifecycleAction::Finish) => {
            SessionStatus::Finished
        }
        (SessionStatus::Running | SessionStatus::Paused, LifecycleAction::Cancel) => {
            SessionStatus::Cancelled
        }
        _ => {
            return Err(Error::InvalidTransition {
                status,
                operation: action.operation(),
            });
        }
    };
    Ok(next)
}

/// Guard for activity events (task activation, project assignment, step
/// notes): allowed while the session is running or paused, rejected once
/// terminal.
pub fn ensure_open(status: SessionStatus, operation: &'static str) -> Result<()> {
    if status.is_terminal() {
        return Err(Error::InvalidTransition { status, operation });
    }
    Ok(())
}

/// Guard for `start`: an actor may hold at most one open session per
/// tenant. `open_session` is whatever open session the caller found for
/// the actor, if any.
pub fn ensure_startable(open_session: Option<SessionId>) -> Result<()> {
    match open_session {
        Some(session_id) => Err(Error::ActiveSessionExists { session_id }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_requires_running() {
        assert_eq!(
            apply(SessionStatus::Running, LifecycleAction::Pause).unwrap(),
            SessionStatus::Paused
        );
        assert!(apply(SessionStatus::Paused, LifecycleAction::Pause).is_err());
        assert!(apply(SessionStatus::Finished, LifecycleAction::Pause).is_err());
        assert!(apply(SessionStatus::Cancelled, LifecycleAction::Pause).is_err());
    }

    #[test]
    fn test_resume_requires_paused() {
        assert_eq!(
            apply(SessionStatus::Paused, LifecycleAction::Resume).unwrap(),
            SessionStatus::Running
        );
        assert!(apply(SessionStatus::Running, LifecycleAction::Resume).is_err());
        assert!(apply(SessionStatus::Finished, LifecycleAction::Resume).is_err());
    }

    #[test]
    fn test_finish_and_cancel_from_either_open_state() {
        for open in [SessionStatus::Running, SessionStatus::Paused] {
            assert_eq!(
                apply(open, LifecycleAction::Finish).unwrap(),
                SessionStatus::Finished
            );
            assert_eq!(
                apply(open, LifecycleAction::Cancel).unwrap(),
                SessionStatus::Cancelled
            );
        }
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for terminal in [SessionStatus::Finished, SessionStatus::Cancelled] {
            for action in [
                LifecycleAction::Pause,
                LifecycleAction::Resume,
                LifecycleAction::Finish,
                LifecycleAction::Cancel,
            ] {
                let err = apply(terminal, action).unwrap_err();
                match err {
                    Error::InvalidTransition { status, operation } => {
                        assert_eq!(status, terminal);
                        assert_eq!(operation, action.operation());
                    }
                    other => panic!("unexpected error: {other}"),
                }
            }
        }
    }

    #[test]
    fn test_ensure_open_rejects_terminal() {
        assert!(ensure_open(SessionStatus::Running, "activate task").is_ok());
        assert!(ensure_open(SessionStatus::Paused, "activate task").is_ok());
        assert!(ensure_open(SessionStatus::Finished, "activate task").is_err());
        assert!(ensure_open(SessionStatus::Cancelled, "activate task").is_err());
    }

    #[test]
    fn test_ensure_startable() {
        assert!(ensure_startable(None).is_ok());

        let existing = SessionId::generate();
        match ensure_startable(Some(existing)).unwrap_err() {
            Error::ActiveSessionExists { session_id } => assert_eq!(session_id, existing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
