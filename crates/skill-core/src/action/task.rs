//! Running Actions
//!
//! An action is a cooperative task advanced one tick at a time. Its resumption
//! point is plain data (a [`Phase`] plus a tick countdown), so driving it is
//! ordinary synchronous code. The only suspension is the wait after each swing.

use skill_events::{ActionEvent, ActionEventKind, ActorId, Notice, StopReason, Tick};

use crate::deferred::{DeferredEventQueue, RestoreObject};
use crate::error::ActionError;
use crate::host::{GameHost, RandomSource, WorldObject};

use super::definition::{ActionDefinition, ContainerFullPolicy};

/// Lifecycle of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    /// Created, not yet bound to a slot
    Idle,
    /// Waiting for the actor to come within the target radius
    AwaitingProximity,
    /// Executing steps
    Running,
    /// Finished; never executes again
    Stopped,
}

/// Where a running action picks up when it is next driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Face the target and check requirements (once)
    Begin,
    /// Notice, animation, then suspend
    Swing,
    /// Re-resolve target, reward, depletion roll
    Resume,
}

/// Everything an action may touch while it is driven for one tick
pub struct TickContext<'a, H: ?Sized, R: ?Sized> {
    pub now: Tick,
    pub host: &'a mut H,
    pub rng: &'a mut R,
    pub deferred: &'a mut DeferredEventQueue,
    pub journal: &'a mut Vec<ActionEvent>,
}

enum Flow {
    Continue(Phase),
    Suspend,
    Finish(StopReason),
}

/// A long-running activity bound to one actor
#[derive(Debug, Clone)]
pub struct Action {
    actor: ActorId,
    definition: ActionDefinition,
    state: ActionState,
    phase: Phase,
    remaining: u32,
    resume_at: Option<Tick>,
    approach_requested: bool,
    steps_completed: u32,
    rewards_granted: u32,
    stop_reason: Option<StopReason>,
}

impl Action {
    pub fn new(actor: ActorId, definition: ActionDefinition) -> Self {
        Self {
            actor,
            definition,
            state: ActionState::Idle,
            phase: Phase::Begin,
            remaining: 0,
            resume_at: None,
            approach_requested: false,
            steps_completed: 0,
            rewards_granted: 0,
            stop_reason: None,
        }
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Tick on which the current suspension ends
    pub fn resume_at(&self) -> Option<Tick> {
        self.resume_at
    }

    pub fn steps_completed(&self) -> u32 {
        self.steps_completed
    }

    pub fn rewards_granted(&self) -> u32 {
        self.rewards_granted
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Loop continuation condition
    pub fn is_running(&self) -> bool {
        matches!(
            self.state,
            ActionState::AwaitingProximity | ActionState::Running
        )
    }

    pub(crate) fn begin(&mut self) {
        if self.state == ActionState::Idle {
            self.state = ActionState::AwaitingProximity;
        }
    }

    pub(crate) fn stop(&mut self, reason: StopReason) {
        if self.state != ActionState::Stopped {
            self.state = ActionState::Stopped;
            self.stop_reason = Some(reason);
            self.remaining = 0;
            self.resume_at = None;
        }
    }

    /// Drive the action for tick `cx.now`.
    pub fn advance<H, R>(&mut self, cx: &mut TickContext<'_, H, R>)
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        match self.state {
            ActionState::Idle | ActionState::Stopped => {}
            ActionState::AwaitingProximity => self.check_proximity(cx),
            ActionState::Running => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.run_until_suspended(cx);
                }
            }
        }
    }

    fn check_proximity<H, R>(&mut self, cx: &mut TickContext<'_, H, R>)
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        match self.try_reach(cx) {
            Ok(true) => {
                self.state = ActionState::Running;
                self.phase = Phase::Begin;
                self.record(cx, ActionEventKind::Running);
                self.run_until_suspended(cx);
            }
            Ok(false) => {}
            Err(err) => self.fail(cx, err),
        }
    }

    fn try_reach<H, R>(&mut self, cx: &mut TickContext<'_, H, R>) -> Result<bool, ActionError>
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        let target = self.definition.target.position;
        let radius = self.definition.radius;
        let position = cx.host.position(&self.actor).ok_or(ActionError::ActorGone)?;

        if position.is_within(&target, radius) {
            // A walk left over from an earlier action must not carry the actor away.
            cx.host.halt(&self.actor);
            return Ok(true);
        }
        if !cx.host.approach(&self.actor, target, radius) {
            return Err(ActionError::Unreachable);
        }
        if !self.approach_requested {
            self.approach_requested = true;
            self.record(
                cx,
                ActionEventKind::Approaching {
                    distance: position.distance_to(&target),
                },
            );
        }
        Ok(false)
    }

    fn run_until_suspended<H, R>(&mut self, cx: &mut TickContext<'_, H, R>)
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        loop {
            let flow = match self.phase {
                Phase::Begin => self.begin_work(cx),
                Phase::Swing => Ok(self.swing(cx)),
                Phase::Resume => self.resume(cx),
            };

            match flow {
                Ok(Flow::Continue(next)) => self.phase = next,
                Ok(Flow::Suspend) => return,
                Ok(Flow::Finish(reason)) => {
                    self.finish(cx, reason);
                    return;
                }
                Err(err) => {
                    self.fail(cx, err);
                    return;
                }
            }
        }
    }

    fn begin_work<H, R>(&mut self, cx: &mut TickContext<'_, H, R>) -> Result<Flow, ActionError>
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        let definition = &self.definition;
        cx.host.turn_to(&self.actor, definition.target.position);

        let current = cx.host.skill_level(&self.actor, &definition.skill);
        if current < definition.required_level {
            return Err(ActionError::PreconditionFailed {
                skill: definition.skill.clone(),
                required: definition.required_level,
                current,
            });
        }
        Ok(Flow::Continue(Phase::Swing))
    }

    fn swing<H, R>(&mut self, cx: &mut TickContext<'_, H, R>) -> Flow
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        cx.host.notify(
            &self.actor,
            Notice::Performing {
                skill: self.definition.skill.clone(),
            },
        );
        cx.host.play_animation(&self.actor, self.definition.animation);

        self.remaining = self.definition.step_ticks();
        let resume_at = cx.now + u64::from(self.remaining);
        self.resume_at = Some(resume_at);
        self.phase = Phase::Resume;
        self.record(cx, ActionEventKind::Performing { resume_at });
        Flow::Suspend
    }

    fn resume<H, R>(&mut self, cx: &mut TickContext<'_, H, R>) -> Result<Flow, ActionError>
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.resume_at = None;
        cx.host.position(&self.actor).ok_or(ActionError::ActorGone)?;
        // Another actor may have taken the target while we were suspended.
        let target = self
            .definition
            .target
            .resolve(&*cx.host)
            .ok_or(ActionError::TargetVanished)?;

        self.steps_completed += 1;
        let reward = self.definition.reward;
        if cx.host.add_item(&self.actor, reward.item) {
            cx.host.notify(&self.actor, Notice::Rewarded { item: reward.item });
            cx.host
                .add_experience(&self.actor, &self.definition.skill, reward.experience);
            self.rewards_granted += 1;
            self.record(
                cx,
                ActionEventKind::Rewarded {
                    item: reward.item,
                    experience: reward.experience,
                },
            );
        } else {
            self.record(cx, ActionEventKind::RewardMissed { item: reward.item });
            if self.definition.on_container_full == ContainerFullPolicy::Stop {
                return Err(ActionError::ContainerFull);
            }
        }

        if self.definition.depletion.roll(cx.rng) {
            self.deplete(cx, target);
            return Ok(Flow::Finish(StopReason::Depleted));
        }
        Ok(Flow::Continue(Phase::Swing))
    }

    fn deplete<H, R>(&self, cx: &mut TickContext<'_, H, R>, target: WorldObject)
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        let depletion = self.definition.depletion;
        let delay = depletion.respawn.roll_delay(cx.rng);

        cx.host
            .replace_object(target.position, target.id, depletion.replacement);
        let key = cx.deferred.schedule(
            cx.now,
            delay,
            RestoreObject::new(target.position, depletion.replacement, target.id),
        );

        tracing::info!(
            actor = %self.actor,
            object = %target.id,
            position = %target.position,
            respawn_at = key.fire_at,
            "target depleted"
        );
        self.record(
            cx,
            ActionEventKind::DepletionScheduled {
                object: target.id,
                replacement: depletion.replacement,
                position: target.position,
                fire_at: key.fire_at,
            },
        );
    }

    fn fail<H, R>(&mut self, cx: &mut TickContext<'_, H, R>, err: ActionError)
    where
        H: GameHost + ?Sized,
        R: RandomSource + ?Sized,
    {
        if let Some(notice) = err.notice() {
            cx.host.notify(&self.actor, notice);
        }
        tracing::debug!(actor = %self.actor, error = %err, "action ended early");
        self.finish(cx, err.stop_reason());
    }

    fn finish<H, R>(&mut self, cx: &mut TickContext<'_, H, R>, reason: StopReason)
    where
        H: GameHost + ?Sized,
        R: ?Sized,
    {
        cx.host.halt(&self.actor);
        self.stop(reason);
        self.record(cx, ActionEventKind::Stopped { reason });
    }

    fn record<H: ?Sized, R: ?Sized>(&self, cx: &mut TickContext<'_, H, R>, kind: ActionEventKind) {
        cx.journal
            .push(ActionEvent::for_actor(cx.now, self.actor.clone(), kind));
    }
}
