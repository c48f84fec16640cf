//! Demo game: steer the yellow square into the target.
//!
//! Arrow keys move, `R` starts a new round, `Escape` quits.

use engine::{
    number_remap, Body, Canvas, Color, Context, ControlledBody, Game, GameEvent, KeyCode,
    MoveKeys, WindowConfig,
};
use log::{debug, info, trace};
use rand::Rng;

const PLAYER_SIZE: f64 = 30.0;
const TARGET_SIZE: f64 = 20.0;
const PLAYER_SPEED: f64 = 6.0;

struct Round {
    player: ControlledBody,
    target: Body,
    target_color: Color,
    score: u32,
}

#[derive(Default)]
pub struct Chase {
    round: Option<Round>,
    rounds: u32,
    best: u32,
}

impl Chase {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_target(config: &WindowConfig) -> engine::Result<Body> {
        let mut rng = rand::thread_rng();
        let x = rng.gen_range(0.0..=(f64::from(config.width) - TARGET_SIZE).max(0.0));
        let y = rng.gen_range(0.0..=(f64::from(config.height) - TARGET_SIZE).max(0.0));
        Body::new(config, x, y, TARGET_SIZE, TARGET_SIZE)
    }
}

impl Game for Chase {
    fn continuous_setup(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        info!("Chase ready: arrows move, R restarts, Escape quits");
        Ok(())
    }

    fn setup(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let config = &ctx.config;
        let start_x = ((f64::from(config.width) - PLAYER_SIZE) / 2.0).max(0.0);
        let start_y = ((f64::from(config.height) - PLAYER_SIZE) / 2.0).max(0.0);
        let body = Body::new(config, start_x, start_y, PLAYER_SIZE, PLAYER_SIZE)?;

        self.round = Some(Round {
            player: ControlledBody::new(body, PLAYER_SPEED, MoveKeys::arrows())?,
            target: Self::spawn_target(config)?,
            target_color: Color::random(false),
            score: 0,
        });
        self.rounds += 1;
        debug!("Round {} started", self.rounds);
        Ok(())
    }

    fn handle_user_event(&mut self, ctx: &mut Context, event: &GameEvent) -> anyhow::Result<()> {
        match event {
            GameEvent::KeyDown(KeyCode::Escape) => ctx.quit(),
            GameEvent::KeyDown(KeyCode::KeyR) => {
                info!("Restarting round");
                ctx.restart();
            }
            _ => {}
        }
        Ok(())
    }

    fn redraw_screen(&mut self, ctx: &Context, canvas: &mut Canvas) -> anyhow::Result<()> {
        let Some(round) = &self.round else {
            canvas.fill(ctx.config.background);
            return Ok(());
        };

        // Background brightens as the player moves right
        let shade = number_remap(
            round.player.body().x(),
            0.0,
            f64::from(ctx.config.width),
            60.0,
            190.0,
        )? as u8;
        canvas.fill(Color::rgb(shade, shade, shade));

        round.target.draw(canvas, round.target_color);
        round.player.body().draw(canvas, Color::YELLOW);
        canvas.stroke_rect(round.player.body().hitbox(), Color::BLACK, 2.0);
        Ok(())
    }

    fn tick(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };

        if let Err(err) = round.player.move_by_input(&ctx.input) {
            if !err.is_value_error() {
                return Err(err.into());
            }
            trace!("Player blocked at the edge: {err}");
        }

        if round.player.body().collides(&round.target) {
            round.score += 1;
            round.target = Self::spawn_target(&ctx.config)?;
            round.target_color = Color::random(false);
            info!("Score: {}", round.score);
        }
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        if let Some(round) = &self.round {
            self.best = self.best.max(round.score);
            info!("Round over with score {} (best {})", round.score, self.best);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{GameLoop, HeadlessBackend};

    fn config() -> WindowConfig {
        WindowConfig {
            width: 200,
            height: 100,
            tick_rate: 0,
            ..WindowConfig::default()
        }
    }

    fn player_x(game: &Chase) -> f64 {
        game.round.as_ref().unwrap().player.body().x()
    }

    #[test]
    fn setup_centers_player() {
        let mut ctx = Context::new(config());
        let mut game = Chase::new();
        game.setup(&mut ctx).unwrap();

        let round = game.round.as_ref().unwrap();
        assert_eq!(round.player.body().x(), 85.0);
        assert_eq!(round.player.body().y(), 35.0);
        assert_eq!(round.score, 0);
    }

    #[test]
    fn arrows_move_player() {
        let backend = HeadlessBackend::with_script([
            vec![GameEvent::KeyDown(KeyCode::ArrowRight)],
            vec![],
            vec![GameEvent::KeyUp(KeyCode::ArrowRight)],
        ]);
        let mut game_loop = GameLoop::new(backend, config());
        let mut game = Chase::new();

        game_loop.start(&mut game).unwrap();

        assert_eq!(player_x(&game), 85.0 + 2.0 * PLAYER_SPEED);
    }

    #[test]
    fn edge_stops_player_without_error() {
        let mut ctx = Context::new(config());
        let mut game = Chase::new();
        game.setup(&mut ctx).unwrap();
        ctx.input.process_key_down(KeyCode::ArrowUp);

        for _ in 0..20 {
            game.tick(&mut ctx).unwrap();
        }
        let y = game.round.as_ref().unwrap().player.body().y();
        assert!((0.0..PLAYER_SPEED).contains(&y));
    }

    #[test]
    fn touching_target_scores() {
        let mut ctx = Context::new(config());
        let mut game = Chase::new();
        game.setup(&mut ctx).unwrap();

        let round = game.round.as_mut().unwrap();
        round.target = Body::new(&ctx.config, 90.0, 40.0, TARGET_SIZE, TARGET_SIZE).unwrap();
        game.tick(&mut ctx).unwrap();

        assert_eq!(game.round.as_ref().unwrap().score, 1);
    }

    #[test]
    fn r_starts_a_new_round() {
        let backend = HeadlessBackend::with_script([vec![GameEvent::KeyDown(KeyCode::KeyR)]]);
        let mut game_loop = GameLoop::new(backend, config());
        let mut game = Chase::new();

        game_loop.run_continually(&mut game).unwrap();

        assert_eq!(game.rounds, 2);
    }

    #[test]
    fn escape_quits() {
        let backend = HeadlessBackend::with_script([vec![GameEvent::KeyDown(KeyCode::Escape)]])
            .keep_alive();
        let mut game_loop = GameLoop::new(backend, config());
        let mut game = Chase::new();

        game_loop.run_continually(&mut game).unwrap();

        assert_eq!(game.rounds, 1);
        assert!(game_loop.context().state.ended());
    }

    #[test]
    fn frame_shows_player() {
        let backend = HeadlessBackend::with_script([vec![]]);
        let mut game_loop = GameLoop::new(backend, config());
        game_loop.start(&mut Chase::new()).unwrap();

        // Player interior at (100, 50)
        assert_eq!(game_loop.canvas().pixel(100, 50), Some(Color::YELLOW));
    }
}
