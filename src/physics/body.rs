//! The stateful rigid body: geometry, mass properties, velocity, sleep flag,
//! per-step integration (`spec.md` §3, §4.3).

use anyhow::{bail, Result};

use super::bounds::Bounds;
use super::contact::Contact;
use super::events::EventSink;
use super::vector::Vector;
use super::vertices;

/// Index of a body in `Engine`'s body list. `Engine` owns the list; `BodyId`s
/// stay valid for the engine's lifetime (removal is out of scope — §1/§6 do
/// not describe a `remove_body` operation, bodies live for the simulation).
pub type BodyId = usize;

/// Direction-angle tolerance used to merge two face normals into one axis
/// (§4.3 "Axis deduplication"). Collinear edges produce normals whose
/// `direction()` differs only by floating-point noise.
const AXIS_DIRECTION_EPSILON: f64 = 1e-9;

/// Construction option bag (§6 "Body API"). Fields mirror the documented
/// defaults; `vertices` has no sensible default and must be supplied.
#[derive(Debug, Clone)]
pub struct BodyOptions {
    pub vertices: Vec<Vector>,
    pub position: Vector,
    pub previous_position: Option<Vector>,
    pub velocity: Vector,
    pub force: Vector,
    pub angular_velocity: f64,
    pub angle: f64,
    pub previous_angle: Option<f64>,
    pub torque: f64,
    pub density: f64,
    pub is_static: bool,
    pub slop: f64,
    pub restitution: f64,
    pub friction: f64,
    pub friction_air: f64,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            position: Vector::ZERO,
            previous_position: None,
            velocity: Vector::ZERO,
            force: Vector::ZERO,
            angular_velocity: 0.0,
            angle: 0.0,
            previous_angle: None,
            torque: 0.0,
            density: 0.001,
            is_static: false,
            slop: 0.05,
            restitution: 0.5,
            friction: 0.1,
            friction_air: 0.01,
        }
    }
}

#[derive(Debug)]
pub struct Body {
    pub vertices: Vec<Vector>,
    pub position: Vector,
    pub previous_position: Vector,
    pub angle: f64,
    pub previous_angle: f64,
    pub velocity: Vector,
    pub angular_velocity: f64,
    pub force: Vector,
    pub torque: f64,
    pub density: f64,
    pub area: f64,
    pub mass: f64,
    pub inv_mass: f64,
    pub inertia: f64,
    pub inv_inertia: f64,
    pub bounds: Bounds,
    pub axes: Vec<Vector>,
    pub is_static: bool,
    pub is_sleeping: bool,
    pub slop: f64,
    pub restitution: f64,
    pub friction: f64,
    pub friction_air: f64,

    /// Per-body transient solver state (§3), reset at the end of position
    /// solving.
    pub(crate) position_impulse: Vector,
    pub(crate) total_contacts: u32,

    /// Sleep-management state (§4.6). Modeled as explicit fields per §9's
    /// instruction to turn the source's ad-hoc keys into real struct fields.
    pub(crate) motion: f64,
    pub(crate) sleep_counter: u32,

    pub on_sleep_enter: EventSink<()>,
    pub on_sleep_exit: EventSink<()>,
    pub on_collision: EventSink<Contact>,
}

impl Body {
    /// Construct a body. `opts.vertices` are given relative to
    /// `opts.position`; they are translated into world space and then
    /// re-centered so the polygon's true centroid lands exactly on
    /// `opts.position`, keeping invariant 1 (vertices/bounds/axes/area/
    /// mass/inertia mutually consistent) from the first tick.
    pub fn new(opts: BodyOptions) -> Result<Self> {
        if opts.vertices.len() < 3 {
            bail!("body requires at least 3 vertices, got {}", opts.vertices.len());
        }

        let world_vertices: Vec<Vector> =
            opts.vertices.iter().map(|v| *v + opts.position).collect();
        if vertices::area(&world_vertices) < 1e-12 {
            bail!("body vertices have zero area (collinear or degenerate polygon)");
        }

        let previous_position = opts.previous_position.unwrap_or(opts.position);
        let previous_angle = opts.previous_angle.unwrap_or(opts.angle);

        let mut body = Body {
            vertices: world_vertices,
            position: opts.position,
            previous_position,
            angle: opts.angle,
            previous_angle,
            velocity: opts.velocity,
            angular_velocity: opts.angular_velocity,
            force: opts.force,
            torque: opts.torque,
            density: opts.density,
            area: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            bounds: Bounds::new(Vector::ZERO, Vector::ZERO),
            axes: Vec::new(),
            is_static: opts.is_static,
            is_sleeping: false,
            slop: opts.slop,
            restitution: opts.restitution,
            friction: opts.friction,
            friction_air: opts.friction_air,
            position_impulse: Vector::ZERO,
            total_contacts: 0,
            motion: 0.0,
            sleep_counter: 0,
            on_sleep_enter: EventSink::new(),
            on_sleep_exit: EventSink::new(),
            on_collision: EventSink::new(),
        };

        // Seed angle-driven vertex rotation if the caller asked for a
        // non-zero starting angle (the raw vertices above are unrotated).
        if opts.angle != 0.0 {
            vertices::rotate(&mut body.vertices, opts.angle, opts.position);
        }

        body.recompute_from_vertices();
        Ok(body)
    }

    pub fn should_update(&self) -> bool {
        !self.is_static && !self.is_sleeping
    }

    /// Recompute area, mass, bounds, axes, centroid alignment, and inertia
    /// from `self.vertices`. Called by the constructor and by every setter
    /// that changes geometry (§3 invariant 1).
    fn recompute_from_vertices(&mut self) {
        let computed_centroid = vertices::centroid(&self.vertices);
        let drift = self.position - computed_centroid;
        if drift.magnitude_squared() > 1e-18 {
            vertices::translate(&mut self.vertices, drift);
        }

        self.area = vertices::area(&self.vertices);
        self.recompute_mass();
        self.recompute_inertia();
        self.bounds = Bounds::from_vertices(&self.vertices);
        self.recompute_axes();
    }

    fn recompute_mass(&mut self) {
        if self.is_static {
            self.mass = f64::INFINITY;
            self.inv_mass = 0.0;
        } else {
            self.mass = self.density * self.area;
            self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
        }
    }

    fn recompute_inertia(&mut self) {
        if self.is_static {
            self.inertia = f64::INFINITY;
            self.inv_inertia = 0.0;
            return;
        }
        let centered: Vec<Vector> = self.vertices.iter().map(|v| *v - self.position).collect();
        self.inertia = vertices::inertia(&centered, self.mass);
        self.inv_inertia = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };
    }

    fn recompute_axes(&mut self) {
        let n = self.vertices.len();
        let mut axes: Vec<Vector> = Vec::new();
        for i in 0..n {
            let normal = vertices::edge_normal(&self.vertices, i);
            let dir = normal.direction();
            let is_duplicate = axes
                .iter()
                .any(|a: &Vector| (a.direction() - dir).abs() < AXIS_DIRECTION_EPSILON);
            if !is_duplicate {
                axes.push(normal);
            }
        }
        self.axes = axes;
    }

    /// Replace the body's world-space vertices, recomputing every dependent
    /// (§3 invariant 1, §6 "Properties that have derived dependents...
    /// recompute the dependents on assignment").
    pub fn set_vertices(&mut self, vertices: Vec<Vector>) -> Result<()> {
        if vertices.len() < 3 {
            bail!("body requires at least 3 vertices, got {}", vertices.len());
        }
        if vertices::area(&vertices) < 1e-12 {
            bail!("body vertices have zero area (collinear or degenerate polygon)");
        }
        self.vertices = vertices;
        self.recompute_from_vertices();
        Ok(())
    }

    /// Translate vertices and `previous_position` by the delta, preserving
    /// velocity (§3 invariant 4, §4.3).
    pub fn set_position(&mut self, position: Vector) {
        let delta = position - self.position;
        vertices::translate(&mut self.vertices, delta);
        self.bounds = self.bounds.translate(delta);
        self.previous_position = self.previous_position + delta;
        self.position = position;
    }

    /// Rotate vertices and axes about `position`, recompute bounds, and
    /// shift `previous_angle` by the same delta (angular velocity preserved).
    pub fn set_angle(&mut self, angle: f64) {
        let delta = angle - self.angle;
        vertices::rotate(&mut self.vertices, delta, self.position);
        for axis in self.axes.iter_mut() {
            *axis = axis.rotate(delta);
        }
        self.bounds = Bounds::from_vertices(&self.vertices);
        self.previous_angle += delta;
        self.angle = angle;
    }

    /// Forces `mass = inf, invMass = 0` (symmetrically for inertia) when
    /// `true` (§3, §4.3).
    pub fn set_is_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        self.recompute_mass();
        self.recompute_inertia();
    }

    /// Time-Corrected Verlet integration for one tick (§4.3).
    pub fn integrate(&mut self, delta: f64, last_delta: f64) {
        let prev_velocity = self.position - self.previous_position;
        let c1 = delta / last_delta;
        let c2 = 0.5 * delta * (delta + last_delta);
        let air_damp = 1.0 - self.friction_air;

        self.velocity = Vector::new(
            prev_velocity.x * air_damp * c1 + (self.force.x * self.inv_mass) * c2,
            prev_velocity.y * air_damp * c1 + (self.force.y * self.inv_mass) * c2,
        );
        self.angular_velocity = (self.angle - self.previous_angle) * air_damp * c1
            + (self.torque * self.inv_inertia) * c2;

        self.previous_angle = self.angle;
        self.angle += self.angular_velocity;
        self.previous_position = self.position;
        self.position = self.position + self.velocity;

        vertices::translate(&mut self.vertices, self.velocity);
        if self.angular_velocity != 0.0 {
            vertices::rotate(&mut self.vertices, self.angular_velocity, self.position);
            for axis in self.axes.iter_mut() {
                *axis = axis.rotate(self.angular_velocity);
            }
            self.bounds = Bounds::from_vertices(&self.vertices);
        } else {
            self.bounds = self.bounds.translate(self.velocity);
        }

        log::trace!(
            "integrated body: position=({:.3},{:.3}) velocity=({:.3},{:.3})",
            self.position.x, self.position.y, self.velocity.x, self.velocity.y
        );
    }
}
