use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::config::TileMaterial;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn na_iso_to_pos_rot(iso: &nalgebra::Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Handle pair for one rigid body and its single collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// Two bodies whose colliders are touching after a step.
///
/// Reported on the step the contact begins and on every later step it persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
}

/// Static floor and side walls of the container.
#[derive(Debug, Clone, Copy)]
pub struct Container {
    pub floor: PhysicsBody,
    pub left_wall: PhysicsBody,
    pub right_wall: PhysicsBody,
}

/// Bounds applied to a single integration step.
#[derive(Debug, Clone, Copy)]
pub struct StepLimits {
    /// Longest step integrated in one call, in milliseconds.
    pub max_step_ms: f32,
    /// Correction ratios above this are treated as a pacing spike.
    pub max_correction: f32,
}

impl Default for StepLimits {
    fn default() -> Self {
        Self {
            max_step_ms: 1000.0 / 30.0,
            max_correction: 2.0,
        }
    }
}

/// How one frame is integrated: `count` steps of `step_ms` each.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepPlan {
    pub count: u32,
    pub step_ms: f32,
}

impl StepPlan {
    pub fn total_ms(&self) -> f32 {
        self.count as f32 * self.step_ms
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps the Rapier2D pipeline behind the handful of primitives the game needs.
///
/// Bodies leave the simulation by being disabled rather than dropped, so a
/// removed body can be handed back with [`PhysicsWorld::add_body`].
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    limits: StepLimits,
}

impl PhysicsWorld {
    /// Create an empty world. Y-down: positive Y gravity pulls toward the floor.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            limits: StepLimits::default(),
        }
    }

    pub fn set_limits(&mut self, limits: StepLimits) {
        self.limits = limits;
    }

    /// Add the floor and side walls for a `width` × `height` container whose
    /// inner top-left corner is the origin. Walls extend one container height
    /// above the top so tiles cannot escape sideways while dropping.
    pub fn add_container(&mut self, width: f32, height: f32, thickness: f32) -> Container {
        let half_t = thickness * 0.5;
        let floor = self.create_fixed_box(Vec2::new(width * 0.5, height + half_t), width * 0.5, half_t);
        let left_wall = self.create_fixed_box(Vec2::new(-half_t, 0.0), half_t, height);
        let right_wall = self.create_fixed_box(Vec2::new(width + half_t, 0.0), half_t, height);
        Container {
            floor,
            left_wall,
            right_wall,
        }
    }

    /// Create a dynamic circle body and add it to the simulation.
    pub fn create_circle_body(&mut self, pos: Vec2, radius: f32, material: TileMaterial) -> PhysicsBody {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .ccd_enabled(true)
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(radius)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Scale a circle body's collider. Circles stay circles, so a non-uniform
    /// request scales the radius by the area-preserving factor `sqrt(sx * sy)`.
    pub fn scale_body(&mut self, body: &PhysicsBody, sx: f32, sy: f32) {
        let factor = (sx * sy).abs().sqrt();
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring degenerate body scale ({sx}, {sy})");
            return;
        }
        let Some(radius) = self.body_radius(body) else {
            return;
        };
        if let Some(collider) = self.colliders.get_mut(body.collider_handle) {
            collider.set_shape(SharedShape::ball(radius * factor));
        }
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.wake_up(true);
        }
    }

    /// Teleport a body without touching its velocity.
    pub fn set_body_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
        }
    }

    /// Clear linear and angular velocity, rotation, and accumulated forces.
    pub fn reset_motion(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(nalgebra::Vector2::zeros(), true);
            rb.set_angvel(0.0, true);
            rb.set_rotation(nalgebra::UnitComplex::new(0.0), true);
            rb.reset_forces(true);
            rb.reset_torques(true);
        }
    }

    /// Take a body out of the simulation. The handle stays valid for [`Self::add_body`].
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_enabled(false);
        }
    }

    /// Put a previously removed body back into the simulation.
    pub fn add_body(&mut self, body: &PhysicsBody) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_enabled(true);
            rb.wake_up(true);
        }
    }

    /// Split one frame of `delta_ms` into equal substeps no longer than `max_step_ms`.
    ///
    /// `correction` is `delta_ms / previous_delta_ms`. Ratios above the
    /// configured bound are treated as a pacing spike and the frame budget is
    /// shortened to `previous_delta_ms * max_correction`. Any other frame is
    /// integrated in full.
    pub fn plan_steps(&self, delta_ms: f32, correction: f32) -> StepPlan {
        let budget_ms = self.frame_budget_ms(delta_ms, correction);
        if budget_ms <= 0.0 {
            return StepPlan::default();
        }
        let count = (budget_ms / self.limits.max_step_ms).ceil().max(1.0) as u32;
        StepPlan {
            count,
            step_ms: budget_ms / count as f32,
        }
    }

    /// Integrate a single step of `step_ms` and collect every touching pair.
    /// Returns the milliseconds integrated (0 for an empty or invalid step).
    pub fn step_into(&mut self, step_ms: f32, contacts: &mut Vec<ContactPair>) -> f32 {
        if !step_ms.is_finite() || step_ms <= 0.0 {
            return 0.0;
        }
        self.integration_parameters.dt = step_ms / 1000.0;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(body_a), Some(body_b)) = (
                self.collider_parent(pair.collider1),
                self.collider_parent(pair.collider2),
            ) else {
                continue;
            };
            contacts.push(ContactPair { body_a, body_b });
        }
        step_ms
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> (Vec2, f32) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pos_rot(rb.position()))
            .unwrap_or((Vec2::ZERO, 0.0))
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    /// Set the angular velocity of a body directly.
    pub fn set_angular_velocity(&mut self, body: &PhysicsBody, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_angvel(angvel, true);
        }
    }

    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn angular_velocity(&self, body: &PhysicsBody) -> f32 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.angvel())
            .unwrap_or(0.0)
    }

    /// Current collider radius, or `None` for non-circle or missing colliders.
    pub fn body_radius(&self, body: &PhysicsBody) -> Option<f32> {
        let collider = self.colliders.get(body.collider_handle)?;
        collider.shape().as_ball().map(|ball| ball.radius)
    }

    /// Whether the body currently takes part in the simulation.
    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .is_some_and(|rb| rb.is_enabled())
    }

    /// Number of rigid bodies ever allocated and not destroyed, enabled or not.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of rigid bodies currently in the simulation.
    pub fn active_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, rb)| rb.is_enabled()).count()
    }

    // -- private helpers --

    fn frame_budget_ms(&self, delta_ms: f32, correction: f32) -> f32 {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0.0;
        }
        let mut step_ms = delta_ms;
        if correction.is_finite() && correction > 0.0 {
            let clamped = correction.min(self.limits.max_correction.max(1.0));
            if clamped < correction {
                let previous_ms = delta_ms / correction;
                step_ms = previous_ms * clamped;
                log::debug!(
                    "pacing spike: ratio {correction:.2} clamped to {clamped:.2}, step {delta_ms:.1}ms -> {step_ms:.1}ms"
                );
            }
        }
        step_ms
    }

    fn create_fixed_box(&mut self, center: Vec2, half_width: f32, half_height: f32) -> PhysicsBody {
        let rb = RigidBodyBuilder::fixed().translation(vec2_to_na(center)).build();
        let body_handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_width, half_height)
            .friction(0.5)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);
        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    fn collider_parent(&self, collider_handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider_handle)?.parent()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn step_n(world: &mut PhysicsWorld, n: usize) -> Vec<ContactPair> {
        let mut contacts = Vec::new();
        for _ in 0..n {
            contacts.clear();
            world.step_into(1000.0 / 60.0, &mut contacts);
        }
        contacts
    }

    #[test]
    fn container_adds_three_fixed_bodies() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.add_container(300.0, 500.0, 20.0);
        assert_eq!(world.body_count(), 3);
        assert_eq!(world.active_body_count(), 3);
    }

    #[test]
    fn circle_falls_and_rests_on_floor() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        world.add_container(300.0, 500.0, 20.0);
        let body = world.create_circle_body(Vec2::new(150.0, 100.0), 10.0, TileMaterial::default());

        let contacts = step_n(&mut world, 240);
        let (pos, _) = world.body_position(&body);
        assert!(pos.y > 480.0 && pos.y < 495.0, "should rest on floor: y={}", pos.y);
        assert!(
            contacts.iter().any(|c| c.body_a == body.body_handle || c.body_b == body.body_handle),
            "resting contact should be reported every step"
        );
    }

    #[test]
    fn removed_body_keeps_handle_and_leaves_simulation() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        let body = world.create_circle_body(Vec2::new(50.0, 50.0), 10.0, TileMaterial::default());

        world.remove_body(&body);
        assert!(!world.contains(&body));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.active_body_count(), 0);

        step_n(&mut world, 10);
        let (pos, _) = world.body_position(&body);
        assert!((pos.y - 50.0).abs() < 0.001, "disabled body must not move: y={}", pos.y);

        world.add_body(&body);
        assert!(world.contains(&body));
    }

    #[test]
    fn scale_body_changes_radius() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_circle_body(Vec2::ZERO, 10.0, TileMaterial::default());
        world.scale_body(&body, 2.5, 2.5);
        assert!((world.body_radius(&body).unwrap() - 25.0).abs() < 0.001);

        world.scale_body(&body, 0.0, 0.0);
        assert!((world.body_radius(&body).unwrap() - 25.0).abs() < 0.001);
    }

    #[test]
    fn reset_motion_clears_velocity_and_spin() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_circle_body(Vec2::ZERO, 10.0, TileMaterial::default());
        world.set_velocity(&body, Vec2::new(40.0, -20.0));
        world.set_angular_velocity(&body, 3.0);
        step_n(&mut world, 5);

        world.reset_motion(&body);
        assert_eq!(world.velocity(&body), Vec2::ZERO);
        assert_eq!(world.angular_velocity(&body), 0.0);
        let (_, rot) = world.body_position(&body);
        assert!(rot.abs() < 0.0001);
    }

    #[test]
    fn set_body_position_teleports() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_circle_body(Vec2::ZERO, 10.0, TileMaterial::default());
        world.set_body_position(&body, Vec2::new(120.0, 80.0));
        let (pos, _) = world.body_position(&body);
        assert!((pos.x - 120.0).abs() < 0.001);
        assert!((pos.y - 80.0).abs() < 0.001);
    }

    #[test]
    fn overlapping_circles_report_contact() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.create_circle_body(Vec2::new(0.0, 0.0), 10.0, TileMaterial::default());
        let b = world.create_circle_body(Vec2::new(15.0, 0.0), 10.0, TileMaterial::default());

        let contacts = step_n(&mut world, 1);
        assert!(contacts.iter().any(|c| {
            (c.body_a == a.body_handle && c.body_b == b.body_handle)
                || (c.body_a == b.body_handle && c.body_b == a.body_handle)
        }));
    }

    #[test]
    fn pacing_spike_is_shortened() {
        let world = PhysicsWorld::new(Vec2::ZERO);
        // previous 16ms, now 64ms: ratio 4 clamps to 2, so 32ms is integrated.
        let plan = world.plan_steps(64.0, 4.0);
        assert!((plan.total_ms() - 32.0).abs() < 0.001, "plan={plan:?}");
        assert_eq!(plan.count, 1);

        let steady = world.plan_steps(16.0, 1.0);
        assert_eq!(steady.count, 1);
        assert!((steady.step_ms - 16.0).abs() < 0.001);
        assert_eq!(world.plan_steps(0.0, 1.0), StepPlan::default());
        assert_eq!(world.plan_steps(f32::NAN, 1.0), StepPlan::default());
    }

    #[test]
    fn slow_frames_are_split_not_truncated() {
        let world = PhysicsWorld::new(Vec2::ZERO);
        let plan = world.plan_steps(50.0, 1.0);
        assert_eq!(plan.count, 2);
        assert!((plan.step_ms - 25.0).abs() < 0.001);

        let plan = world.plan_steps(90.0, 1.0);
        assert_eq!(plan.count, 3);
        assert!((plan.total_ms() - 90.0).abs() < 0.001);
        assert!(plan.step_ms <= 1000.0 / 30.0 + 0.001);
    }

    #[test]
    fn zero_delta_does_not_step() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 1000.0));
        let body = world.create_circle_body(Vec2::new(0.0, 0.0), 10.0, TileMaterial::default());
        let mut contacts = Vec::new();
        assert_eq!(world.step_into(0.0, &mut contacts), 0.0);
        let (pos, _) = world.body_position(&body);
        assert_eq!(pos.y, 0.0);
    }
}
