use protocol::Position;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1]` driving the random walk.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Production source backed by a `rand` generator.
pub struct RngSource<R> {
    rng: R,
}

impl RngSource<StdRng> {
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A replayable walk: the same seed gives the same sequence of ticks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Moves `current` by up to `speed / 2` on x and z. Height is left alone.
///
/// Draws x first, then z.
pub fn generate_movement(
    current: &Position,
    speed: f64,
    random: &mut impl RandomSource,
) -> Position {
    let dx = (random.next_unit() - 0.5) * speed;
    let dz = (random.next_unit() - 0.5) * speed;
    Position {
        x: current.x + dx,
        y: current.y,
        z: current.z + dz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl RandomSource for Constant {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn centred_draw_does_not_move() {
        let start = Position::new(2.0, 0.5, 0.0);
        let next = generate_movement(&start, 0.15, &mut Constant(0.5));
        assert_eq!(next, start);
    }

    #[test]
    fn extreme_draws_move_half_the_speed() {
        let start = Position::new(0.0, 0.5, 0.0);
        let up = generate_movement(&start, 0.1, &mut Constant(1.0));
        assert_eq!(up, Position::new(0.05, 0.5, 0.05));

        let down = generate_movement(&start, 0.1, &mut Constant(0.0));
        assert_eq!(down, Position::new(-0.05, 0.5, -0.05));
    }

    #[test]
    fn walk_stays_on_the_height_plane_and_within_speed() {
        let mut random = RngSource::seeded(7);
        let mut position = Position::new(-2.0, 0.5, 0.0);
        for _ in 0..1_000 {
            let next = generate_movement(&position, 0.12, &mut random);
            assert_eq!(next.y, 0.5);
            assert!((next.x - position.x).abs() <= 0.06);
            assert!((next.z - position.z).abs() <= 0.06);
            position = next;
        }
    }

    #[test]
    fn same_seed_replays_the_same_walk() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        let start = Position::default();
        for _ in 0..16 {
            assert_eq!(
                generate_movement(&start, 1.0, &mut a),
                generate_movement(&start, 1.0, &mut b)
            );
        }
    }
}
