use arena_shared::config::ArenaConfig;
use arena_shared::participant::{Facing, ParticipantId, ParticipantState};
use arena_shared::protocol::{
    CalculateGravityMsg, ClientMsg, GravUpdateMsg, JoinedMsg, ServerMsg, PROTOCOL_VERSION,
};

use crate::error::EngineError;
use crate::input::{apply_to_intent, InputEvent, Key};
use crate::mirror::{MergeOutcome, Mirror};
use crate::motion;
use crate::physics::LocalPhysics;
use crate::render::SpriteFrame;

/// Output of one render frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub sprites: Vec<SpriteFrame>,
    /// Movement update to send for the local participant
    pub outbound: ClientMsg,
}

/// Client-side reconciliation of the room.
///
/// Owns the mirror of every known participant plus the local participant's
/// physics. The local entry lives in the mirror like any other; only this
/// engine writes it, and inbound updates for it are ignored.
#[derive(Debug, Clone)]
pub struct LocalEngine {
    config: ArenaConfig,
    local_id: Option<ParticipantId>,
    room: Option<String>,
    mirror: Mirror,
    physics: LocalPhysics,
    jump_held: bool,
    last_gravity_preview: Option<GravUpdateMsg>,
}

impl LocalEngine {
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            local_id: None,
            room: None,
            mirror: Mirror::new(),
            physics: LocalPhysics::airborne(),
            jump_held: false,
            last_gravity_preview: None,
        }
    }

    pub fn local_id(&self) -> Option<&ParticipantId> {
        self.local_id.as_ref()
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn physics(&self) -> &LocalPhysics {
        &self.physics
    }

    pub fn last_gravity_preview(&self) -> Option<&GravUpdateMsg> {
        self.last_gravity_preview.as_ref()
    }

    pub fn local(&self) -> Result<&ParticipantState, EngineError> {
        let id = self.local_id.as_ref().ok_or(EngineError::NotJoined)?;
        self.mirror
            .get(id)
            .ok_or_else(|| EngineError::LocalParticipantMissing(id.clone()))
    }

    /// Adopt the state allocated by the server.
    ///
    /// Anything mirrored from an earlier session is discarded, and the local
    /// participant starts airborne so the first ticks drop it to the floor.
    pub fn on_joined(&mut self, joined: JoinedMsg) -> Result<(), EngineError> {
        if joined.protocol_version != PROTOCOL_VERSION {
            return Err(EngineError::ProtocolMismatch {
                server: joined.protocol_version,
                client: PROTOCOL_VERSION,
            });
        }

        tracing::info!("Joined {} as {}", joined.room, joined.participant.id);
        self.mirror.clear();
        self.local_id = Some(joined.participant.id.clone());
        self.room = Some(joined.room);
        self.mirror.insert(joined.participant);
        self.physics = LocalPhysics::airborne();
        self.jump_held = false;
        self.last_gravity_preview = None;
        Ok(())
    }

    /// Forget the session, e.g. after the connection dropped.
    pub fn reset(&mut self) {
        self.mirror.clear();
        self.local_id = None;
        self.room = None;
        self.physics = LocalPhysics::airborne();
        self.jump_held = false;
        self.last_gravity_preview = None;
    }

    /// Merge a relayed update. Updates carrying the local id are ignored,
    /// the local entry is authoritative here.
    pub fn merge(&mut self, incoming: ParticipantState) -> Option<MergeOutcome> {
        if self.local_id.as_ref() == Some(&incoming.id) {
            return None;
        }
        Some(self.mirror.merge(incoming))
    }

    /// Remove a departed participant. The local entry is never removed.
    pub fn remove(&mut self, id: &ParticipantId) -> bool {
        if self.local_id.as_ref() == Some(id) {
            return false;
        }
        self.mirror.remove(id).is_some()
    }

    pub fn handle_server_msg(&mut self, msg: ServerMsg) -> Result<(), EngineError> {
        match msg {
            ServerMsg::Joined(joined) => self.on_joined(joined)?,
            ServerMsg::UpdatedMovement(state) => {
                if let Some(MergeOutcome::Stale) = self.merge(state) {
                    tracing::trace!("Discarded stale update");
                }
            }
            ServerMsg::Left(left) => {
                if self.remove(&left.id) {
                    tracing::debug!("Participant {} left", left.id);
                }
            }
            ServerMsg::GravityTick => {
                // Ticks before `joined` have nothing to act on.
                if self.local_id.is_some() {
                    self.apply_gravity_tick()?;
                }
            }
            ServerMsg::GravUpdate(preview) => {
                self.last_gravity_preview = Some(preview);
            }
        }
        Ok(())
    }

    /// Apply a key press or release to the local participant.
    /// Directional keys take effect at the next frame's step.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), EngineError> {
        match event {
            InputEvent::Pressed(Key::Jump) => {
                let already_held = self.jump_held;
                self.jump_held = true;
                if !already_held {
                    self.jump()?;
                }
            }
            InputEvent::Released(Key::Jump) => self.jump_held = false,
            InputEvent::Pressed(key) => {
                apply_to_intent(&mut self.local_mut()?.intent, key, true);
            }
            InputEvent::Released(key) => {
                apply_to_intent(&mut self.local_mut()?.intent, key, false);
            }
        }
        Ok(())
    }

    /// Per-frame step of the local participant: move the horizontal target,
    /// refresh facing and restart the interpolation segment from the
    /// rendered position. Returns the state to send as a movement update.
    pub fn step_local_intent(&mut self) -> Result<ParticipantState, EngineError> {
        let config = self.config;
        let local = self.local_mut()?;
        local.previous_position = local.position;
        motion::step_horizontal(local, &config);
        local.facing = Facing::from_intent(local.intent, local.facing);
        local.interpolation_progress = 0.0;
        local.version += 1;
        Ok(local.clone())
    }

    /// Advance every participant's interpolation by one frame.
    pub fn interpolate(&mut self) {
        let increment = self.config.interpolation_increment;
        for state in self.mirror.iter_mut() {
            motion::interpolate(state, increment);
        }
    }

    /// Advance every participant's walk cycle by one frame.
    pub fn advance_animation(&mut self) {
        let frames = self.config.frames_per_animation_step;
        let columns = self.config.animation_columns;
        for state in self.mirror.iter_mut() {
            motion::advance_animation(state, frames, columns);
        }
    }

    /// Integrate one gravity tick into the local vertical target.
    pub fn apply_gravity_tick(&mut self) -> Result<(), EngineError> {
        let config = self.config;
        let local = local_entry(&self.local_id, &mut self.mirror)?;
        self.physics
            .apply_tick(&mut local.target_position.y, &config);
        local.fall_velocity = self.physics.fall_speed;
        local.version += 1;
        Ok(())
    }

    /// Jump if grounded. Returns whether the jump happened.
    pub fn jump(&mut self) -> Result<bool, EngineError> {
        let config = self.config;
        let local = local_entry(&self.local_id, &mut self.mirror)?;
        if !self.physics.jump(&mut local.target_position.y, &config) {
            return Ok(false);
        }
        local.version += 1;
        Ok(true)
    }

    /// Sprite frames for every known participant, local one included.
    pub fn sprites(&self) -> Vec<SpriteFrame> {
        self.mirror
            .iter()
            .map(|state| {
                let is_local = self.local_id.as_ref() == Some(&state.id);
                SpriteFrame::for_state(state, is_local, &self.config)
            })
            .collect()
    }

    /// Run one render frame: local step, then interpolation and animation
    /// for everyone, then sprite selection.
    pub fn frame(&mut self) -> Result<Frame, EngineError> {
        self.step_local_intent()?;
        self.interpolate();
        self.advance_animation();
        let outbound = ClientMsg::MovementUpdate(self.local()?.clone());
        Ok(Frame {
            sprites: self.sprites(),
            outbound,
        })
    }

    /// Build an advisory `calculateGravity` request for the local participant.
    pub fn gravity_preview_request(&self) -> Result<ClientMsg, EngineError> {
        Ok(ClientMsg::CalculateGravity(CalculateGravityMsg {
            grav_mult: self.physics.fall_speed,
            square: self.local()?.clone(),
        }))
    }

    fn local_mut(&mut self) -> Result<&mut ParticipantState, EngineError> {
        local_entry(&self.local_id, &mut self.mirror)
    }
}

fn local_entry<'a>(
    local_id: &Option<ParticipantId>,
    mirror: &'a mut Mirror,
) -> Result<&'a mut ParticipantState, EngineError> {
    let id = local_id.as_ref().ok_or(EngineError::NotJoined)?;
    mirror
        .get_mut(id)
        .ok_or_else(|| EngineError::LocalParticipantMissing(id.clone()))
}
