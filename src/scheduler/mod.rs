//! The turn scheduler: the single authoritative match loop.
//!
//! `MatchSession` alternates the active player strictly between the two
//! parties. The human seat submits one action per invocation via
//! `submit`; the adaptive seat is driven by `step_ai`, which asks the
//! policy for an action and forwards it to the engine. No action is
//! accepted out of turn, and nothing is accepted after termination
//! (`MatchAlreadyOver`).
//!
//! Rejected actions do not consume the turn: the same player may retry.
//! Applied actions consume the turn, run the termination check, and
//! hand the turn over.

pub mod snapshot;

pub use snapshot::MatchSnapshot;

use tracing::info;

use crate::ai::AiPolicy;
use crate::board::{deal_hands, BoardState};
use crate::core::{EngineError, MatchConfig, MatchRng, PlayerId, RejectReason, Rejection};
use crate::engine::{
    Action, ActionEngine, ActionRecord, MatchEvent, MatchResult, TerminationReason,
};
use crate::oracle::DivinationOracle;

/// What a submitted action produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// The action was applied; the match may have ended.
    Applied {
        event: MatchEvent,
        result: Option<MatchResult>,
    },
    /// The action was refused; the turn was not consumed.
    Rejected(Rejection),
}

/// One running match: engine, board, and opponent policy.
pub struct MatchSession {
    engine: ActionEngine,
    board: BoardState,
    policy: AiPolicy,
    result: Option<MatchResult>,
}

impl MatchSession {
    /// Validate the configuration, deal hands, and seat the players.
    pub fn start(config: MatchConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let rng = MatchRng::new(config.seed);
        let oracle = DivinationOracle::new(rng.for_context("divination"), config.yang_bias);
        let board = BoardState::new(
            deal_hands(config.cards_per_player, &mut rng.for_context("deal")),
            config.balance_bound,
        );
        let policy = AiPolicy::new(config.ai, rng.for_context("exploration"));

        info!(seed = config.seed, ai_seat = %config.ai_seat, "match started");

        Ok(Self {
            engine: ActionEngine::new(config, oracle),
            board,
            policy,
            result: None,
        })
    }

    // === Read API ===

    /// Snapshot view of the board.
    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// The ordered sequence of applied actions.
    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        self.board.history()
    }

    /// The terminal result, once the match is over.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    /// Whether the match has terminated.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        self.engine.config()
    }

    /// Whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.board.active_player()
    }

    /// Whether the adaptive opponent holds the active turn.
    #[must_use]
    pub fn is_ai_turn(&self) -> bool {
        self.board.active_player() == self.engine.config().ai_seat
    }

    // === Turn API ===

    /// Submit one action for a player (the human path).
    ///
    /// Legality failures come back as `ActionOutcome::Rejected` with no
    /// turn consumed; submissions after termination are
    /// `MatchAlreadyOver`.
    pub fn submit(&mut self, player: PlayerId, action: Action) -> Result<ActionOutcome, EngineError> {
        if self.result.is_some() {
            return Err(EngineError::MatchAlreadyOver);
        }
        if player != self.board.active_player() {
            return Ok(ActionOutcome::Rejected(Rejection {
                kind: action.kind(),
                reason: RejectReason::OutOfTurn { player },
            }));
        }
        if self.board.player(player).actions_remaining == 0 {
            return Ok(ActionOutcome::Rejected(Rejection {
                kind: action.kind(),
                reason: RejectReason::NoActionBudget { player },
            }));
        }

        match self.engine.apply(&mut self.board, player, action) {
            Ok(event) => Ok(self.conclude_turn(event)),
            Err(reason) => Ok(ActionOutcome::Rejected(Rejection {
                kind: action.kind(),
                reason,
            })),
        }
    }

    /// Drive one adaptive-opponent turn.
    ///
    /// Chooses via the policy, applies, and feeds the observed outcome
    /// signal back into the policy memory. A policy choice the engine
    /// refuses is a broken invariant, not a rejection.
    pub fn step_ai(&mut self) -> Result<ActionOutcome, EngineError> {
        if self.result.is_some() {
            return Err(EngineError::MatchAlreadyOver);
        }
        let player = self.engine.config().ai_seat;
        if player != self.board.active_player() {
            return Ok(ActionOutcome::Rejected(Rejection {
                kind: crate::engine::ActionKind::Pass,
                reason: RejectReason::OutOfTurn { player },
            }));
        }

        let opponent = player.opponent();
        let dao_before = self.board.player(player).dao_xing;
        let opp_dao_before = self.board.player(opponent).dao_xing;
        let disorder_before = self.disorder(player);

        let action = self.policy.choose(&self.engine, &self.board, player)?;
        let event = self
            .engine
            .apply(&mut self.board, player, action)
            .map_err(|reason| {
                EngineError::InternalInvariant(format!(
                    "policy chose an illegal action ({}): {reason}",
                    action.kind()
                ))
            })?;

        let dao_delta = self.board.player(player).dao_xing - dao_before;
        let opp_dao_delta = self.board.player(opponent).dao_xing - opp_dao_before;
        let stability_delta = disorder_before - self.disorder(player);
        let signal = (dao_delta - opp_dao_delta) as f64 + 0.5 * stability_delta;
        self.policy.observe(action.kind(), signal);

        Ok(self.conclude_turn(event))
    }

    /// Voluntary concession: the opponent wins immediately.
    pub fn concede(&mut self, player: PlayerId) -> Result<MatchResult, EngineError> {
        if self.result.is_some() {
            return Err(EngineError::MatchAlreadyOver);
        }
        let result = MatchResult {
            winner: Some(player.opponent()),
            reason: TerminationReason::Concession,
        };
        self.finish(result);
        Ok(result)
    }

    // === Internals ===

    /// Spend the turn, run the termination check, and either end the
    /// match or pass the turn across.
    fn conclude_turn(&mut self, event: MatchEvent) -> ActionOutcome {
        self.board.spend_action();

        let result = self.engine.check_termination(&self.board);
        match result {
            Some(result) => self.finish(result),
            None => self.board.advance_turn(),
        }

        ActionOutcome::Applied { event, result }
    }

    fn finish(&mut self, result: MatchResult) {
        self.result = Some(result);
        self.policy.finish_match();
        info!(
            winner = ?result.winner.map(|w| w.index() + 1),
            reason = ?result.reason,
            turns = self.board.turn_number(),
            "match over"
        );
    }

    /// Normalized balance disorder for the outcome signal.
    fn disorder(&self, player: PlayerId) -> f64 {
        self.board.player(player).balance.abs() as f64
            / self.engine.config().balance_bound as f64
    }

    // === Persistence ===

    /// Capture everything needed to resume this match later.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            config: self.engine.config().clone(),
            board: self.board.clone(),
            ai: self.policy.memory(),
            oracle: self.engine.oracle().state(),
            result: self.result,
        }
    }

    /// Rebuild a session from a snapshot.
    pub fn restore(snapshot: MatchSnapshot) -> Result<Self, EngineError> {
        snapshot.config.validate()?;

        let oracle = DivinationOracle::from_state(&snapshot.oracle, snapshot.config.yang_bias);
        let policy = AiPolicy::from_memory(snapshot.config.ai, &snapshot.ai);

        Ok(Self {
            engine: ActionEngine::new(snapshot.config, oracle),
            board: snapshot.board,
            policy,
            result: snapshot.result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiConfig;
    use crate::board::Position;
    use crate::hexagram::Trigram;

    #[test]
    fn test_start_validates_config() {
        let bad = MatchConfig::default().with_balance_bound(-1);
        assert!(matches!(
            MatchSession::start(bad),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_out_of_turn_rejected_without_consumption() {
        let mut session = MatchSession::start(MatchConfig::default()).unwrap();
        assert_eq!(session.active_player(), PlayerId::First);

        let outcome = session.submit(PlayerId::Second, Action::Pass).unwrap();
        assert!(matches!(
            outcome,
            ActionOutcome::Rejected(Rejection {
                reason: RejectReason::OutOfTurn { .. },
                ..
            })
        ));
        assert_eq!(session.active_player(), PlayerId::First);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_rejection_keeps_turn_for_retry() {
        let mut session = MatchSession::start(MatchConfig::default()).unwrap();

        // Meditating at equilibrium is illegal; the turn survives.
        let outcome = session.submit(PlayerId::First, Action::Meditate).unwrap();
        assert!(matches!(outcome, ActionOutcome::Rejected(_)));
        assert_eq!(session.active_player(), PlayerId::First);

        // Retry within the same turn with a legal action.
        let outcome = session.submit(PlayerId::First, Action::Study).unwrap();
        assert!(matches!(outcome, ActionOutcome::Applied { .. }));
        assert_eq!(session.active_player(), PlayerId::Second);
    }

    #[test]
    fn test_strict_alternation() {
        let config = MatchConfig::default().with_turn_limit(None);
        let mut session = MatchSession::start(config).unwrap();

        for _ in 0..3 {
            assert_eq!(session.active_player(), PlayerId::First);
            session.submit(PlayerId::First, Action::Pass).unwrap();
            assert_eq!(session.active_player(), PlayerId::Second);
            assert!(session.is_ai_turn());
            session.step_ai().unwrap();
        }
    }

    #[test]
    fn test_step_ai_out_of_turn() {
        let mut session = MatchSession::start(MatchConfig::default()).unwrap();
        let outcome = session.step_ai().unwrap();
        assert!(matches!(outcome, ActionOutcome::Rejected(_)));
    }

    #[test]
    fn test_concession() {
        let mut session = MatchSession::start(MatchConfig::default()).unwrap();
        let result = session.concede(PlayerId::First).unwrap();

        assert_eq!(result.winner, Some(PlayerId::Second));
        assert_eq!(result.reason, TerminationReason::Concession);
        assert!(session.is_over());
        assert!(matches!(
            session.submit(PlayerId::First, Action::Pass),
            Err(EngineError::MatchAlreadyOver)
        ));
        assert!(matches!(session.step_ai(), Err(EngineError::MatchAlreadyOver)));
        assert!(matches!(
            session.concede(PlayerId::Second),
            Err(EngineError::MatchAlreadyOver)
        ));
    }

    #[test]
    fn test_ai_vs_ai_style_match_terminates() {
        // Drive both seats through the engine until a result appears.
        let config = MatchConfig::default()
            .with_turn_limit(Some(60))
            .with_ai(AiConfig::default().with_exploration(0.1));
        let mut session = MatchSession::start(config).unwrap();

        let mut guard = 0;
        while !session.is_over() && guard < 500 {
            let active = session.active_player();
            if session.is_ai_turn() {
                session.step_ai().unwrap();
            } else {
                // Human stand-in: mirror the engine's first legal action.
                let action = Action::Study;
                match session.submit(active, action).unwrap() {
                    ActionOutcome::Applied { .. } => {}
                    ActionOutcome::Rejected(_) => {
                        session.submit(active, Action::Pass).unwrap();
                    }
                }
            }
            guard += 1;
        }

        assert!(session.is_over(), "match should terminate");
        assert!(session.result().is_some());
    }

    #[test]
    fn test_snapshot_roundtrip_resumes() {
        let config = MatchConfig::default();
        let mut session = MatchSession::start(config).unwrap();

        session.submit(PlayerId::First, Action::Study).unwrap();
        session.step_ai().unwrap();

        let snapshot = session.snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        let restored_snapshot = MatchSnapshot::from_bytes(&bytes).unwrap();
        let mut restored = MatchSession::restore(restored_snapshot).unwrap();

        assert_eq!(restored.board(), session.board());
        assert_eq!(restored.result(), session.result());

        // Both sessions continue identically.
        session.submit(PlayerId::First, Action::Divine).unwrap();
        restored.submit(PlayerId::First, Action::Divine).unwrap();
        assert_eq!(restored.board(), session.board());
    }

    #[test]
    fn test_play_flows_through_session() {
        let mut session = MatchSession::start(MatchConfig::default()).unwrap();
        let card = session.board().player(PlayerId::First).hand()[0];

        let outcome = session
            .submit(
                PlayerId::First,
                Action::Play {
                    card: card.id,
                    position: Position::Bagua(Trigram::Kan),
                },
            )
            .unwrap();

        assert!(matches!(outcome, ActionOutcome::Applied { .. }));
        assert_eq!(
            session
                .board()
                .placement(Position::Bagua(Trigram::Kan))
                .map(|c| c.id),
            Some(card.id)
        );
        assert_eq!(session.history().len(), 1);
    }
}
