//! Paddleball entry point
//!
//! Runs a headless, scripted session: a seeded brick wall, a driver that
//! aims and serves with seeded timing, and a paddle that chases the ball.
//!
//! Usage: `paddleball [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use paddleball::consts::SIM_DT;
    use paddleball::sim::{Aabb, BallState, Brick, BrickField, ObstacleId, Session, TickInput};
    use paddleball::{Settings, SettingsError};

    const BRICK_ROWS: u32 = 5;
    const BRICK_COLS: u32 = 8;
    const BRICK_HEIGHT: f32 = 0.5;
    const BRICK_GAP: f32 = 0.1;
    /// Gap between the ceiling and the top brick row
    const TOP_MARGIN: f32 = 2.5;
    const START_LIVES: i32 = 3;
    /// Five minutes of simulated play
    const MAX_TICKS: u64 = 50 * 60 * 5;

    /// Lay out a grid of bricks under the ceiling with seeded hit points
    fn brick_wall(settings: &Settings, rng: &mut Pcg32) -> BrickField {
        let cell_w = settings.arena.width / BRICK_COLS as f32;
        let size = Vec2::new(cell_w - BRICK_GAP, BRICK_HEIGHT);
        let left = -settings.arena.width / 2.0 + cell_w / 2.0;
        let top = settings.arena.height - TOP_MARGIN;

        let mut bricks = Vec::with_capacity((BRICK_ROWS * BRICK_COLS) as usize);
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let center = Vec2::new(
                    left + col as f32 * cell_w,
                    top - row as f32 * (BRICK_HEIGHT + BRICK_GAP),
                );
                let hp = rng.random_range(1..=3);
                bricks.push(Brick::new(
                    ObstacleId(row * BRICK_COLS + col),
                    Aabb::from_center(center, size),
                    hp,
                ));
            }
        }
        BrickField::new(bricks)
    }

    /// Scripted player: holds shoot for a random number of ticks, releases,
    /// then chases the ball and sometimes tries to catch it
    struct Driver {
        rng: Pcg32,
        aim_ticks_left: Option<u32>,
        wants_catch: bool,
        was_held: bool,
    }

    impl Driver {
        fn new(rng: Pcg32) -> Self {
            Self {
                rng,
                aim_ticks_left: None,
                wants_catch: false,
                was_held: false,
            }
        }

        fn next_input(&mut self, session: &Session) -> TickInput {
            let ball_state = session.ball().state();
            let ball_x = session.ball().body.position.x;
            let paddle_x = session.paddle().position.x;

            let mut input = TickInput::default();
            match ball_state {
                BallState::Held | BallState::Aiming => {
                    let ticks = self
                        .aim_ticks_left
                        .get_or_insert_with(|| self.rng.random_range(5..60));
                    if *ticks > 0 {
                        *ticks -= 1;
                        input.shoot_held = true;
                        input.shoot_pressed = !self.was_held;
                    } else {
                        input.shoot_released = self.was_held;
                        self.aim_ticks_left = None;
                        self.wants_catch = self.rng.random_bool(0.3);
                    }
                }
                BallState::Flying => {
                    input.move_axis = ((ball_x - paddle_x) * 2.0).clamp(-1.0, 1.0);
                    input.shoot_held = self.wants_catch;
                }
            }
            self.was_held = input.shoot_held;
            input
        }
    }

    pub fn run() -> Result<(), SettingsError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(&path)?,
            None => Settings::default(),
        }
        .sanitized()?;
        let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(12345);
        log::info!("Seed: {}", seed);

        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = brick_wall(&settings, &mut rng);
        let mut session = Session::new(&settings, bricks, START_LIVES);
        let mut driver = Driver::new(rng);

        let (mut catches, mut losses, mut hits) = (0u32, 0u32, 0u32);
        while session.time_ticks < MAX_TICKS && !session.is_over() {
            let input = driver.next_input(&session);
            let report = session.tick(&input);

            hits += report.bricks_hit;
            if report.caught {
                catches += 1;
                log::info!(
                    "Caught at {:.2}s",
                    session.time_ticks as f32 * SIM_DT
                );
            }
            if report.lost {
                losses += 1;
                log::info!(
                    "Lost at {:.2}s, {} lives left",
                    session.time_ticks as f32 * SIM_DT,
                    session.lives()
                );
            }
        }

        if session.bricks.is_cleared() {
            log::info!("Cleared in {} ticks", session.time_ticks);
        } else if session.lives() <= 0 {
            log::info!("Out of lives after {} ticks", session.time_ticks);
        } else {
            log::info!("Stopped after {} ticks", session.time_ticks);
        }
        log::info!(
            "Hits: {}, catches: {}, losses: {}, bricks left: {}, final speed {:.2}",
            hits,
            catches,
            losses,
            session.bricks.remaining(),
            session.ball().speed()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Paddleball (headless) starting...");

    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the product on wasm
}
