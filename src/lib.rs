//! A 2D rigid-body physics engine: Time-Corrected Verlet integration, SAT
//! collision detection, and an iterative position/velocity solver.
//!
//! ```ignore
//! use verlet2d::{Engine, EngineOptions, factory};
//!
//! let floor = factory::rect(0.0, 580.0, 800.0, 20.0, None)?;
//! let mut engine = Engine::new(vec![floor], EngineOptions::default());
//! let ball = factory::circle(400.0, 0.0, 20.0, None)?;
//! engine.add_body(ball);
//! engine.update(16.67);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod physics;

pub use physics::body::{Body, BodyId, BodyOptions};
pub use physics::bounds::Bounds;
pub use physics::contact::{Contact, ContactPoint};
pub use physics::engine::{Engine, EngineOptions};
pub use physics::events::EventSink;
pub use physics::vector::Vector;
pub use physics::{factory, vertices};
