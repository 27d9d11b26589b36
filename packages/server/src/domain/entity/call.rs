//! Call session state machine.
//!
//! The relay on the server never holds call state. This module is the contract
//! each client upholds for one call attempt:
//!
//! ```text
//!  (none)   --invite (caller)-->            Invited
//!  (none) | Invited --offer (caller)-->     Offered
//!  Offered  --answer (callee)-->            Answered
//!  Offered | Answered | Active --ice-->     (unchanged)
//!  Answered --transport connected-->        Active
//!  non-terminal --reject (callee)-->        Rejected
//!  non-terminal --end (either)-->           Ended
//!  (none) | non-terminal --failure-->       Failed
//! ```

use std::collections::HashMap;

use crate::domain::{
    error::CallTransitionError,
    value_object::{CallId, CallType, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    Invited,
    Offered,
    Answered,
    Active,
    Rejected,
    Ended,
    Failed,
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Ended | Self::Failed)
    }
}

/// Step observed by a client for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEvent {
    Invite,
    Offer,
    Answer,
    IceCandidate,
    TransportConnected,
    Reject,
    End,
    Fail,
}

impl CallEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
            Self::TransportConnected => "transport-connected",
            Self::Reject => "reject",
            Self::End => "end",
            Self::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSession {
    pub call_id: CallId,
    pub call_type: CallType,
    pub caller: UserId,
    pub callee: UserId,
    state: Option<CallState>,
}

impl CallSession {
    pub fn new(call_id: CallId, call_type: CallType, caller: UserId, callee: UserId) -> Self {
        Self {
            call_id,
            call_type,
            caller,
            callee,
            state: None,
        }
    }

    /// `None` until the first signaling step is applied.
    pub fn state(&self) -> Option<CallState> {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_some_and(|s| s.is_terminal())
    }

    /// The other participant, seen from `user`.
    pub fn peer_of(&self, user: &UserId) -> Option<&UserId> {
        if user == &self.caller {
            Some(&self.callee)
        } else if user == &self.callee {
            Some(&self.caller)
        } else {
            None
        }
    }

    /// Apply `event` originated by `from`, returning the resulting state.
    ///
    /// An illegal step leaves the session untouched.
    pub fn apply(
        &mut self,
        from: &UserId,
        event: CallEvent,
    ) -> Result<CallState, CallTransitionError> {
        if self.peer_of(from).is_none() {
            return Err(CallTransitionError::NotParticipant(from.to_string()));
        }
        if let Some(state) = self.state.filter(CallState::is_terminal) {
            return Err(CallTransitionError::Finished(state));
        }

        let from_caller = from == &self.caller;
        let next = match (self.state, event) {
            (None, CallEvent::Invite) if from_caller => CallState::Invited,
            (None | Some(CallState::Invited), CallEvent::Offer) if from_caller => {
                CallState::Offered
            }
            (Some(CallState::Offered), CallEvent::Answer) if !from_caller => CallState::Answered,
            (
                Some(state @ (CallState::Offered | CallState::Answered | CallState::Active)),
                CallEvent::IceCandidate,
            ) => state,
            (Some(CallState::Answered), CallEvent::TransportConnected) => CallState::Active,
            (Some(_), CallEvent::Reject) if !from_caller => CallState::Rejected,
            (Some(_), CallEvent::End) => CallState::Ended,
            (_, CallEvent::Fail) => CallState::Failed,
            (state, event) => {
                return Err(CallTransitionError::NotAllowed {
                    state,
                    event: event.name(),
                });
            }
        };

        self.state = Some(next);
        Ok(next)
    }
}

/// One client's view of its calls, keyed by call id.
#[derive(Debug, Default)]
pub struct CallSessionBook {
    sessions: HashMap<CallId, CallSession>,
}

impl CallSessionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new call attempt; an existing session with the same id is kept.
    pub fn open(&mut self, session: CallSession) -> &mut CallSession {
        self.sessions
            .entry(session.call_id.clone())
            .or_insert(session)
    }

    pub fn get(&self, call_id: &CallId) -> Option<&CallSession> {
        self.sessions.get(call_id)
    }

    /// Apply a step to a tracked call. Unknown call ids are reported as not allowed.
    pub fn apply(
        &mut self,
        call_id: &CallId,
        from: &UserId,
        event: CallEvent,
    ) -> Result<CallState, CallTransitionError> {
        match self.sessions.get_mut(call_id) {
            Some(session) => session.apply(from, event),
            None => Err(CallTransitionError::NotAllowed {
                state: None,
                event: event.name(),
            }),
        }
    }

    /// Drop sessions that reached a terminal state and return how many were removed.
    pub fn prune_finished(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_finished());
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn create_test_session() -> CallSession {
        CallSession::new(
            CallId::new("c1".to_string()).unwrap(),
            CallType::Video,
            user("alice"),
            user("bob"),
        )
    }

    #[test]
    fn test_invitation_flow_reaches_active() {
        // テスト項目: 招待 → offer → answer → ICE → 接続で Active になる
        // given (前提条件):
        let mut session = create_test_session();
        let (alice, bob) = (user("alice"), user("bob"));

        // when (操作):
        let steps = [
            session.apply(&alice, CallEvent::Invite),
            session.apply(&alice, CallEvent::Offer),
            session.apply(&alice, CallEvent::IceCandidate),
            session.apply(&bob, CallEvent::Answer),
            session.apply(&bob, CallEvent::IceCandidate),
            session.apply(&alice, CallEvent::IceCandidate),
            session.apply(&alice, CallEvent::TransportConnected),
        ];

        // then (期待する結果):
        assert_eq!(
            steps,
            [
                Ok(CallState::Invited),
                Ok(CallState::Offered),
                Ok(CallState::Offered),
                Ok(CallState::Answered),
                Ok(CallState::Answered),
                Ok(CallState::Answered),
                Ok(CallState::Active),
            ]
        );
    }

    #[test]
    fn test_legacy_offer_skips_invitation() {
        // テスト項目: 直接 offer する経路では Invited を経由しない
        // given (前提条件):
        let mut session = create_test_session();

        // when (操作):
        let result = session.apply(&user("alice"), CallEvent::Offer);

        // then (期待する結果):
        assert_eq!(result, Ok(CallState::Offered));
    }

    #[test]
    fn test_only_callee_can_answer_or_reject() {
        // テスト項目: answer と reject は着信側のみが行える
        // given (前提条件):
        let mut session = create_test_session();
        let alice = user("alice");
        session.apply(&alice, CallEvent::Offer).unwrap();

        // when (操作):
        let answer = session.apply(&alice, CallEvent::Answer);
        let reject = session.apply(&alice, CallEvent::Reject);

        // then (期待する結果):
        assert!(matches!(answer, Err(CallTransitionError::NotAllowed { .. })));
        assert!(matches!(reject, Err(CallTransitionError::NotAllowed { .. })));
        assert_eq!(session.state(), Some(CallState::Offered));
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        // テスト項目: 終了状態からはどのイベントも受け付けない
        // given (前提条件):
        let mut session = create_test_session();
        let (alice, bob) = (user("alice"), user("bob"));
        session.apply(&alice, CallEvent::Invite).unwrap();
        session.apply(&bob, CallEvent::Reject).unwrap();

        // when (操作):
        let end = session.apply(&alice, CallEvent::End);
        let fail = session.apply(&alice, CallEvent::Fail);

        // then (期待する結果):
        assert_eq!(end, Err(CallTransitionError::Finished(CallState::Rejected)));
        assert_eq!(fail, Err(CallTransitionError::Finished(CallState::Rejected)));
        assert!(session.is_finished());
    }

    #[test]
    fn test_failure_before_first_signal() {
        // テスト項目: シグナリング開始前のメディアエラーでも Failed になる
        // given (前提条件):
        let mut session = create_test_session();

        // when (操作):
        let result = session.apply(&user("alice"), CallEvent::Fail);

        // then (期待する結果):
        assert_eq!(result, Ok(CallState::Failed));
    }

    #[test]
    fn test_outsider_is_rejected() {
        // テスト項目: 参加者以外からのイベントは拒否される
        // given (前提条件):
        let mut session = create_test_session();

        // when (操作):
        let result = session.apply(&user("mallory"), CallEvent::End);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CallTransitionError::NotParticipant("mallory".to_string()))
        );
        assert_eq!(session.state(), None);
    }

    #[test]
    fn test_book_tracks_and_prunes_sessions() {
        // テスト項目: CallSessionBook が通話を追跡し、終了した通話を削除できる
        // given (前提条件):
        let mut book = CallSessionBook::new();
        let call_id = CallId::new("c1".to_string()).unwrap();
        let alice = user("alice");
        book.open(create_test_session());

        // when (操作):
        book.apply(&call_id, &alice, CallEvent::Invite).unwrap();
        book.apply(&call_id, &alice, CallEvent::End).unwrap();
        let unknown = book.apply(
            &CallId::new("c2".to_string()).unwrap(),
            &alice,
            CallEvent::Offer,
        );
        let pruned = book.prune_finished();

        // then (期待する結果):
        assert!(unknown.is_err());
        assert_eq!(pruned, 1);
        assert!(book.is_empty());
    }
}
