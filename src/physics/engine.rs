//! The simulation owner: body list, tick orchestration (`spec.md` §4.7, §6).

use super::body::{Body, BodyId};
use super::broadphase;
use super::contact::Contact;
use super::events::EventSink;
use super::narrowphase;
use super::sleep;
use super::solver;
use super::vector::Vector;

/// Construction options (§6 "Engine API"). Defaults match the documented
/// values exactly.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub position_iterations: u32,
    pub velocity_iterations: u32,
    pub gravity: Vector,
    pub enable_sleeping: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            position_iterations: 6,
            velocity_iterations: 4,
            gravity: Vector::new(0.0, 0.001),
            enable_sleeping: true,
        }
    }
}

/// Owns the body list exclusively during `update` (§5). Not `Send`/`Sync` by
/// design — a tick is synchronous, single-threaded, cooperative execution.
pub struct Engine {
    pub bodies: Vec<Body>,
    pub options: EngineOptions,
    pub on_pre_update: EventSink<()>,
    pub on_update: EventSink<Vec<Contact>>,
}

impl Engine {
    pub fn new(bodies: Vec<Body>, options: EngineOptions) -> Self {
        Self { bodies, options, on_pre_update: EventSink::new(), on_update: EventSink::new() }
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id]
    }

    pub fn body_mut(&mut self, id: BodyId) -> &mut Body {
        &mut self.bodies[id]
    }

    /// `update(delta)`: the bare-number form — `lastDelta = delta` (§6).
    pub fn update(&mut self, delta: f64) {
        self.tick(delta, delta);
    }

    /// `update({delta, lastDelta})`: the explicit pair form (§6).
    pub fn update_with_last_delta(&mut self, delta: f64, last_delta: f64) {
        self.tick(delta, last_delta);
    }

    fn tick(&mut self, delta: f64, last_delta: f64) {
        self.on_pre_update.emit(&());

        if self.options.enable_sleeping {
            sleep::update_sleeping(&mut self.bodies);
        }

        for body in self.bodies.iter_mut() {
            if body.should_update() {
                body.force = body.force + self.options.gravity * body.mass;
            }
        }

        for body in self.bodies.iter_mut() {
            if body.should_update() {
                body.integrate(delta, last_delta);
            }
        }

        let pairs = broadphase::find_pairs(&self.bodies);
        let mut contacts: Vec<Contact> = pairs
            .into_iter()
            .filter_map(|(a, b)| narrowphase::test_collision(&self.bodies[a], &self.bodies[b], a, b))
            .collect();

        sleep::wake_from_contacts(&mut self.bodies, &contacts);

        solver::prepare_position_solve(&mut self.bodies, &contacts);
        for _ in 0..self.options.position_iterations {
            solver::solve_position_iteration(&mut self.bodies, &mut contacts);
        }
        solver::post_solve_position(&mut self.bodies);

        for _ in 0..self.options.velocity_iterations {
            solver::solve_velocity_iteration(&mut self.bodies, &mut contacts);
        }

        for contact in &contacts {
            self.bodies[contact.body1].on_collision.emit(contact);
            self.bodies[contact.body2].on_collision.emit(contact);
        }

        for body in self.bodies.iter_mut() {
            body.force = Vector::ZERO;
            body.torque = 0.0;
        }

        self.on_update.emit(&contacts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyOptions;

    fn square(side: f64, position: Vector, is_static: bool) -> Body {
        let h = side / 2.0;
        Body::new(BodyOptions {
            vertices: vec![
                Vector::new(-h, -h),
                Vector::new(h, -h),
                Vector::new(h, h),
                Vector::new(-h, h),
            ],
            position,
            is_static,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn force_and_torque_are_zero_after_a_tick() {
        let mut engine = Engine::new(vec![square(10.0, Vector::new(0.0, 0.0), false)], EngineOptions::default());
        engine.update(1.0);
        assert_eq!(engine.bodies[0].force, Vector::ZERO);
        assert_eq!(engine.bodies[0].torque, 0.0);
    }

    #[test]
    fn gravity_accelerates_a_falling_body() {
        let mut engine = Engine::new(vec![square(10.0, Vector::new(0.0, 0.0), false)], EngineOptions::default());
        let y0 = engine.bodies[0].position.y;
        for _ in 0..5 {
            engine.update(1.0);
        }
        assert!(engine.bodies[0].position.y > y0);
    }

    #[test]
    fn a_box_resting_on_a_static_floor_does_not_sink_through() {
        let floor = square(200.0, Vector::new(0.0, 105.0), true);
        let falling = square(10.0, Vector::new(0.0, 0.0), false);
        let mut engine = Engine::new(vec![floor, falling], EngineOptions::default());
        for _ in 0..300 {
            engine.update(1.0);
        }
        // The floor top edge is at y=5; the box should settle above it, not
        // tunnel through to the floor's center.
        assert!(engine.bodies[1].position.y < 10.0);
    }

    #[test]
    fn collision_events_fire_on_both_participants() {
        let a = square(10.0, Vector::new(0.0, 0.0), true);
        let b = square(10.0, Vector::new(9.0, 0.0), false);
        let mut engine = Engine::new(vec![a, b], EngineOptions::default());
        let hit_a = std::rc::Rc::new(std::cell::RefCell::new(false));
        let hit_a2 = hit_a.clone();
        engine.bodies[0].on_collision.subscribe(move |_| *hit_a2.borrow_mut() = true);
        engine.update(1.0);
        assert!(*hit_a.borrow());
    }

    #[test]
    fn preupdate_and_update_events_fire_once_per_tick() {
        let mut engine = Engine::new(vec![square(10.0, Vector::new(0.0, 0.0), false)], EngineOptions::default());
        let pre_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let pre_count2 = pre_count.clone();
        engine.on_pre_update.subscribe(move |_| *pre_count2.borrow_mut() += 1);
        let update_count = std::rc::Rc::new(std::cell::RefCell::new(0));
        let update_count2 = update_count.clone();
        engine.on_update.subscribe(move |_| *update_count2.borrow_mut() += 1);
        engine.update(1.0);
        engine.update(1.0);
        assert_eq!(*pre_count.borrow(), 2);
        assert_eq!(*update_count.borrow(), 2);
    }
}
