use glam::{Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::axis::{ActionAxes, Axis, CameraAction, RigComponent, TranslateAlong};
use super::node::{Camera, Projection, Transform};
use super::transition::{PoseTransition, Transition, TransitionKind, TransitionState};
use super::{ActionOutcome, Rejection, TransitionOutcome};
use crate::animation::{AnimationClip, Ease, Tween};
use crate::error::RigError;
use crate::event::{Subject, Subscription};

const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 179.0;

/// Rig configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct RigOptions {
    /// Axis that pan rotates around and pedestal moves along.
    pub up_axis: Axis,
    /// Rotations routed to the body node.
    pub translate_along: TranslateAlong,
    /// Clip track prefix that drives the body position.
    pub translation_name: String,
    /// Clip track prefix that drives the head rotation.
    pub rotation_name: String,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            up_axis: Axis::Y,
            translate_along: TranslateAlong::default(),
            translation_name: "Translation".to_owned(),
            rotation_name: "Rotation".to_owned(),
        }
    }
}

/// Events emitted by [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigEvent {
    /// A transition was accepted.
    CameraMoveStart,
    /// A transition advanced.
    CameraMoveUpdate {
        /// Linear progress in [0, 1].
        progress: f32,
    },
    /// A transition finished.
    CameraMoveEnd,
}

/// A bound clip and the rig's read cursor into it.
#[derive(Debug, Clone)]
struct ClipBinding {
    clip: AnimationClip,
    position_track: String,
    rotation_track: String,
    time: f32,
}

impl ClipBinding {
    fn keyframe_time(&self, frame: usize) -> Option<f32> {
        self.clip.tracks.first()?.times.get(frame).copied()
    }

    /// Move the cursor (clamped to `[0, duration)`) and write the sampled
    /// pose to the nodes the tracks are bound to.
    fn seek(&mut self, time: f32, body: &mut Transform, head: &mut Transform) {
        let last = self.clip.duration.next_down().max(0.0);
        self.time = time.clamp(0.0, last);
        if let Some(position) = self
            .clip
            .track(&self.position_track)
            .and_then(|track| track.sample_vec3(self.time))
        {
            body.translation = position;
        }
        if let Some(rotation) = self
            .clip
            .track(&self.rotation_track)
            .and_then(|track| track.sample_quat(self.time))
        {
            head.rotation = rotation;
        }
    }
}

/// Three-node camera rig: `body` owns `head` owns `eyes` owns the camera.
///
/// The camera's world pose is always `body ∘ head ∘ eyes` while the rig is
/// assembled. Actions write to a single node; transitions write the body
/// translation and head rotation, leaving the eyes free for look-around
/// schemes layered on top.
#[derive(Debug)]
pub struct CameraRig {
    camera: Camera,
    body: Transform,
    head: Transform,
    eyes: Transform,
    assembled: bool,
    up_axis: Axis,
    axes: ActionAxes,
    translate_along: TranslateAlong,
    translation_name: String,
    rotation_name: String,
    clip: Option<ClipBinding>,
    transition: TransitionState,
    events: Subject<RigEvent>,
}

impl CameraRig {
    /// Wrap `camera` in a rig. The camera's current transform is taken as
    /// its world pose and redistributed across the nodes.
    #[must_use]
    pub fn new(camera: Camera, options: RigOptions) -> Self {
        let world = camera.transform;
        let mut rig = Self {
            camera,
            body: Transform::IDENTITY,
            head: Transform::IDENTITY,
            eyes: Transform::IDENTITY,
            assembled: true,
            up_axis: options.up_axis,
            axes: ActionAxes::for_up_axis(options.up_axis),
            translate_along: options.translate_along,
            translation_name: options.translation_name,
            rotation_name: options.rotation_name,
            clip: None,
            transition: TransitionState::Idle,
            events: Subject::new(),
        };
        rig.distribute(world);
        rig
    }

    /// Listen for transition events.
    pub fn subscribe(&mut self) -> Subscription<RigEvent> {
        self.events.subscribe()
    }

    // -- Queries --

    /// Axis `action` maps to under the current up axis.
    #[must_use]
    pub fn get_axis_for(&self, action: CameraAction) -> Option<Axis> {
        self.axes.axis_for(action)
    }

    /// Unit vector for [`get_axis_for`](Self::get_axis_for).
    #[must_use]
    pub fn get_axis_vector_for(&self, action: CameraAction) -> Option<Vec3> {
        self.get_axis_for(action).map(Axis::unit)
    }

    /// Active up axis.
    #[must_use]
    pub fn up_axis(&self) -> Axis {
        self.up_axis
    }

    /// Whether a transition is in flight.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self.transition, TransitionState::Transitioning(_))
    }

    /// Whether the camera is attached to the rig.
    #[must_use]
    pub fn is_assembled(&self) -> bool {
        self.assembled
    }

    /// Local transform of one rig node.
    #[must_use]
    pub fn node(&self, component: RigComponent) -> &Transform {
        match component {
            RigComponent::Body => &self.body,
            RigComponent::Head => &self.head,
            RigComponent::Eyes => &self.eyes,
        }
    }

    fn node_mut(&mut self, component: RigComponent) -> &mut Transform {
        match component {
            RigComponent::Body => &mut self.body,
            RigComponent::Head => &mut self.head,
            RigComponent::Eyes => &mut self.eyes,
        }
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Direct access to the camera while the rig is disassembled.
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        (!self.assembled).then_some(&mut self.camera)
    }

    /// Replace the camera projection.
    pub fn set_projection(&mut self, projection: Projection) {
        self.camera.projection = projection;
    }

    /// The pose the host should render with.
    #[must_use]
    pub fn camera_world_transform(&self) -> Transform {
        if self.assembled {
            self.body
                .compose(&self.head)
                .compose(&self.eyes)
                .compose(&self.camera.transform)
        } else {
            self.camera.transform
        }
    }

    /// Camera world pose.
    #[must_use]
    pub fn get_world_coordinates(&self) -> Transform {
        self.camera_world_transform()
    }

    /// Rotation flags.
    #[must_use]
    pub fn translate_along(&self) -> TranslateAlong {
        self.translate_along
    }

    // -- Direct manipulation --

    fn write_guard(&self) -> Option<Rejection> {
        if !self.assembled {
            Some(Rejection::Disassembled)
        } else if self.is_moving() {
            Some(Rejection::InTransit)
        } else {
            None
        }
    }

    fn default_component(&self, action: CameraAction) -> RigComponent {
        if action.is_rotation() && !self.translate_along.get(action) {
            RigComponent::Eyes
        } else {
            RigComponent::Body
        }
    }

    /// Apply a camera action.
    ///
    /// Rotations go to the eyes, or to the body when the action is flagged
    /// in [`TranslateAlong`]; translations go to the body. `target`
    /// overrides that choice. While a transition is in flight only writes
    /// to the eyes are applied.
    pub fn perform(
        &mut self,
        action: CameraAction,
        amount: f32,
        target: Option<RigComponent>,
    ) -> ActionOutcome {
        if !self.assembled {
            return ActionOutcome::Rejected(Rejection::Disassembled);
        }
        let Some(axis) = self.get_axis_vector_for(action) else {
            return self.zoom(amount);
        };
        let component = target.unwrap_or_else(|| self.default_component(action));
        if self.is_moving() && component != RigComponent::Eyes {
            log::trace!("{action:?} on {component:?} rejected in transit");
            return ActionOutcome::Rejected(Rejection::InTransit);
        }
        let node = self.node_mut(component);
        if action.is_rotation() {
            node.rotate_on_axis(axis, amount);
        } else {
            node.translate_on_axis(axis, amount);
        }
        ActionOutcome::Applied
    }

    fn zoom(&mut self, amount: f32) -> ActionOutcome {
        match &mut self.camera.projection {
            Projection::Perspective { fov } => {
                *fov = (*fov + amount).clamp(MIN_FOV, MAX_FOV);
                ActionOutcome::Applied
            }
            Projection::Orthographic => ActionOutcome::Rejected(Rejection::Orthographic),
        }
    }

    /// Place the camera at a world pose: translation on the body, rotation
    /// split between body and eyes per [`TranslateAlong`].
    pub fn set_world_coordinates(&mut self, pose: Transform) -> ActionOutcome {
        if let Some(rejection) = self.write_guard() {
            return ActionOutcome::Rejected(rejection);
        }
        self.distribute(pose);
        ActionOutcome::Applied
    }

    fn distribute(&mut self, pose: Transform) {
        let (a, b, c) = pose.rotation.to_euler(self.axes.rotation_order);
        let mut body_rotation = Quat::IDENTITY;
        let mut eyes_rotation = Quat::IDENTITY;
        for (action, angle) in CameraAction::ROTATIONS.into_iter().zip([a, b, c]) {
            let Some(axis) = self.get_axis_vector_for(action) else {
                continue;
            };
            let rotation = Quat::from_axis_angle(axis, angle);
            if self.translate_along.get(action) {
                body_rotation *= rotation;
            } else {
                eyes_rotation *= rotation;
            }
        }
        self.body = Transform::new(pose.translation, body_rotation);
        self.head = Transform::IDENTITY;
        self.eyes = Transform::from_rotation(eyes_rotation);
        self.camera.transform = Transform::IDENTITY;
    }

    fn pack(&mut self) {
        let world = self.camera_world_transform();
        self.body = Transform::from_translation(world.translation);
        self.head = Transform::from_rotation(world.rotation);
        self.eyes = Transform::IDENTITY;
    }

    /// Collapse the world pose into body translation and head rotation,
    /// zeroing the eyes.
    pub fn pack_transform(&mut self) -> ActionOutcome {
        if let Some(rejection) = self.write_guard() {
            return ActionOutcome::Rejected(rejection);
        }
        self.pack();
        ActionOutcome::Applied
    }

    /// Redistribute the world pose across all three nodes.
    pub fn unpack_transform(&mut self) -> ActionOutcome {
        if let Some(rejection) = self.write_guard() {
            return ActionOutcome::Rejected(rejection);
        }
        self.distribute(self.camera_world_transform());
        ActionOutcome::Applied
    }

    /// Detach the camera for external control. The camera keeps its world
    /// pose and the rig nodes freeze. No-op when already disassembled.
    pub fn disassemble(&mut self) -> ActionOutcome {
        if !self.assembled {
            return ActionOutcome::Applied;
        }
        if self.is_moving() {
            return ActionOutcome::Rejected(Rejection::InTransit);
        }
        self.camera.transform = self.camera_world_transform();
        self.assembled = false;
        log::debug!("rig disassembled");
        ActionOutcome::Applied
    }

    /// Reattach the camera, redistributing its current world pose across
    /// the nodes. No-op when already assembled.
    pub fn assemble(&mut self) -> ActionOutcome {
        if self.assembled {
            return ActionOutcome::Applied;
        }
        let world = self.camera.transform;
        self.assembled = true;
        self.distribute(world);
        log::debug!("rig assembled");
        ActionOutcome::Applied
    }

    /// Switch the up axis. Existing node rotations are not re-expressed.
    pub fn set_up_axis(&mut self, axis: Axis) {
        if self.is_moving() {
            log::warn!("changing up axis to {axis:?} during a transition");
        }
        self.up_axis = axis;
        self.axes = ActionAxes::for_up_axis(axis);
        log::debug!("up axis set to {axis:?}");
    }

    /// Change which rotations are routed to the body.
    pub fn set_translate_along(&mut self, translate_along: TranslateAlong) {
        self.translate_along = translate_along;
    }

    // -- Animation clip --

    /// Bind a clip whose `"<translation>.position"` track drives the body
    /// and `"<rotation>.quaternion"` track drives the head. Names default
    /// to the rig options.
    ///
    /// # Errors
    ///
    /// [`RigError::ClipAlreadyBound`] if a clip is bound, or
    /// [`RigError::InvalidClip`] if the clip fails validation.
    pub fn set_animation_clip(
        &mut self,
        clip: AnimationClip,
        translation_name: Option<&str>,
        rotation_name: Option<&str>,
    ) -> Result<(), RigError> {
        if self.clip.is_some() {
            return Err(RigError::ClipAlreadyBound);
        }
        clip.validate()?;
        if let Some(name) = translation_name {
            name.clone_into(&mut self.translation_name);
        }
        if let Some(name) = rotation_name {
            name.clone_into(&mut self.rotation_name);
        }
        log::debug!(
            "bound clip '{}' ({} tracks, {}s)",
            clip.name,
            clip.tracks.len(),
            clip.duration
        );
        self.clip = Some(ClipBinding {
            position_track: format!("{}.position", self.translation_name),
            rotation_track: format!("{}.quaternion", self.rotation_name),
            clip,
            time: 0.0,
        });
        Ok(())
    }

    /// Unbind the clip, returning it.
    pub fn clear_animation_clip(&mut self) -> Option<AnimationClip> {
        self.clip.take().map(|binding| binding.clip)
    }

    /// Whether a clip is bound.
    #[must_use]
    pub fn has_animation_clip(&self) -> bool {
        self.clip.is_some()
    }

    /// Clip cursor time, if a clip is bound.
    #[must_use]
    pub fn animation_time(&self) -> Option<f32> {
        self.clip.as_ref().map(|binding| binding.time)
    }

    fn seek_guard(&self) -> Result<(), Rejection> {
        if let Some(rejection) = self.write_guard() {
            return Err(rejection);
        }
        if self.clip.is_none() {
            return Err(Rejection::NoAnimationClip);
        }
        Ok(())
    }

    fn seek(&mut self, time: f32) -> TransitionOutcome {
        if let Err(rejection) = self.seek_guard() {
            return TransitionOutcome::Rejected(rejection);
        }
        if let Some(binding) = self.clip.as_mut() {
            binding.seek(time, &mut self.body, &mut self.head);
        }
        TransitionOutcome::Accepted
    }

    /// Move the clip cursor to `time` seconds.
    pub fn set_animation_time(&mut self, time: f32) -> TransitionOutcome {
        self.seek(time)
    }

    /// Move the clip cursor to a fraction of the clip duration.
    pub fn set_animation_percentage(&mut self, percentage: f32) -> TransitionOutcome {
        let duration = self.clip.as_ref().map_or(0.0, |b| b.clip.duration);
        self.seek(percentage * duration)
    }

    /// Move the clip cursor to the time of keyframe `frame` on the clip's
    /// first track.
    pub fn set_animation_keyframe(&mut self, frame: usize) -> TransitionOutcome {
        match self.clip.as_ref().map(|b| b.keyframe_time(frame)) {
            Some(None) => TransitionOutcome::Rejected(Rejection::KeyframeOutOfRange),
            Some(Some(time)) => self.seek(time),
            None => TransitionOutcome::Rejected(Rejection::NoAnimationClip),
        }
    }

    // -- Transitions --

    /// Fly to a world pose over `duration` seconds.
    ///
    /// Rejected while another transition is in flight. The pose is packed
    /// into body and head for the flight and unpacked when it ends.
    /// [`RigEvent::CameraMoveStart`] is emitted before this returns.
    pub fn fly_to(
        &mut self,
        position: Vec3,
        rotation: Quat,
        duration: f32,
        ease: Ease,
        use_slerp: bool,
    ) -> TransitionOutcome {
        if let Some(rejection) = self.write_guard() {
            log::debug!("fly_to rejected: {rejection:?}");
            return TransitionOutcome::Rejected(rejection);
        }
        self.pack();
        let world = self.camera_world_transform();
        self.transition = TransitionState::Transitioning(Transition {
            tween: Tween::from_secs(duration, ease),
            kind: TransitionKind::Pose(PoseTransition {
                from_position: world.translation,
                to_position: position,
                from_rotation: world.rotation,
                to_rotation: rotation.normalize(),
                use_slerp,
            }),
        });
        log::debug!("fly_to {position} over {duration}s ({ease})");
        self.events.emit(RigEvent::CameraMoveStart);
        TransitionOutcome::Accepted
    }

    /// Tween the clip cursor to keyframe `frame` over `duration` seconds.
    pub fn fly_to_keyframe(&mut self, frame: usize, duration: f32, ease: Ease) -> TransitionOutcome {
        if let Err(rejection) = self.seek_guard() {
            log::debug!("fly_to_keyframe rejected: {rejection:?}");
            return TransitionOutcome::Rejected(rejection);
        }
        let Some((from_time, Some(to_time))) = self
            .clip
            .as_ref()
            .map(|b| (b.time, b.keyframe_time(frame)))
        else {
            return TransitionOutcome::Rejected(Rejection::KeyframeOutOfRange);
        };
        self.transition = TransitionState::Transitioning(Transition {
            tween: Tween::from_secs(duration, ease),
            kind: TransitionKind::Keyframe { from_time, to_time },
        });
        log::debug!("fly_to_keyframe {frame} ({from_time}s -> {to_time}s)");
        self.events.emit(RigEvent::CameraMoveStart);
        TransitionOutcome::Accepted
    }

    /// Advance the active transition. Call once per frame.
    pub fn update(&mut self, now: Instant) {
        let TransitionState::Transitioning(transition) = &mut self.transition else {
            return;
        };
        let frame = transition.tick(now);
        let is_pose = match &transition.kind {
            TransitionKind::Pose(pose) => {
                let (position, rotation) = pose.sample(frame.eased_t);
                self.body.translation = position;
                self.head.rotation = rotation;
                true
            }
            TransitionKind::Keyframe { from_time, to_time } => {
                let time = from_time + (to_time - from_time) * frame.eased_t;
                if let Some(binding) = self.clip.as_mut() {
                    binding.seek(time, &mut self.body, &mut self.head);
                }
                false
            }
        };
        self.events.emit(RigEvent::CameraMoveUpdate {
            progress: frame.raw_t,
        });
        if !frame.is_complete() {
            return;
        }

        self.transition = TransitionState::Idle;
        if is_pose {
            self.distribute(self.camera_world_transform());
        }
        log::debug!("transition complete");
        self.events.emit(RigEvent::CameraMoveEnd);
    }
}
