//! Sleep management: motion low-pass filter and sleep/wake transitions
//! (`spec.md` §4.6).

use super::body::Body;
use super::contact::Contact;
use super::vector::Vector;

const MAX_FOR_SLEEP: f64 = 0.04;
const MIN_FOR_WAKEUP: f64 = 0.09;
const SLEEP_COUNTER_CAP: u32 = 60;

/// Run once per tick, before integration, over every non-static body.
pub fn update_sleeping(bodies: &mut [Body]) {
    for body in bodies.iter_mut() {
        if body.is_static {
            continue;
        }

        if body.force != Vector::ZERO || body.torque != 0.0 {
            wake(body);
            continue;
        }

        let m = body.velocity.magnitude_squared() + body.angular_velocity * body.angular_velocity;
        body.motion = 0.9 * body.motion.min(m) + 0.1 * body.motion.max(m);

        if body.motion < MAX_FOR_SLEEP {
            body.sleep_counter = (body.sleep_counter + 1).min(SLEEP_COUNTER_CAP);
            if body.sleep_counter >= SLEEP_COUNTER_CAP {
                sleep(body);
            }
        } else {
            body.sleep_counter = body.sleep_counter.saturating_sub(1);
        }
    }
}

fn sleep(body: &mut Body) {
    if body.is_sleeping {
        return;
    }
    body.is_sleeping = true;
    body.velocity = Vector::ZERO;
    body.angular_velocity = 0.0;
    body.previous_position = body.position;
    body.previous_angle = body.angle;
    body.on_sleep_enter.emit(&());
}

fn wake(body: &mut Body) {
    if !body.is_sleeping {
        return;
    }
    body.is_sleeping = false;
    body.sleep_counter = 0;
    body.on_sleep_exit.emit(&());
}

/// Run once per tick after narrow phase: a sleeping body touched by an awake,
/// sufficiently fast neighbor wakes up (§4.6 closing paragraph).
pub fn wake_from_contacts(bodies: &mut [Body], contacts: &[Contact]) {
    let mut to_wake = Vec::new();
    for contact in contacts {
        let (a, b) = (contact.body1, contact.body2);
        for (sleeper, other) in [(a, b), (b, a)] {
            let sleeping = bodies[sleeper].is_sleeping;
            let other_awake = !bodies[other].is_static && !bodies[other].is_sleeping;
            if sleeping && other_awake {
                let m = bodies[other].velocity.magnitude_squared()
                    + bodies[other].angular_velocity * bodies[other].angular_velocity;
                if m > MIN_FOR_WAKEUP {
                    to_wake.push(sleeper);
                }
            }
        }
    }
    for id in to_wake {
        wake(&mut bodies[id]);
    }
}
