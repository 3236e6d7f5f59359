use std::{thread::sleep, time::{Duration, Instant}};

use crate::{Cell, GridInt};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::term::{Canvas, Paint, TermManager};
use crate::snake::{Snake, Direction::{*, self}};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Every this many meals the scratch buffer gets written.
const SCRATCH_EVERY: usize = 5;
const SCRATCH_LEN: usize = 4;

/// One eaten food, kept for the end-of-game summary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Meal {
    pub tick: u64,
    pub cell: Cell,
    pub length: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Crashed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Pause,
    Quit,
}

/// Fixed-timestep snake simulation on a wrapping grid.
pub struct GameLoop<R = StdRng> {
    width: GridInt,
    height: GridInt,
    step: Duration,
    snake: Snake,
    turn: Option<Direction>,
    food: Cell,
    acc: Duration,
    alive: bool,
    paused: bool,
    ticks: u64,
    meals: Vec<Meal>,
    rng: R,
}

impl GameLoop<StdRng> {
    pub fn new(config: &GameConfig) -> Self {
        GameLoop::with_rng(config, StdRng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> GameLoop<R> {
    pub fn with_rng(config: &GameConfig, mut rng: R) -> Self {
        let (width, height) = (config.width, config.height);
        let snake = Snake::new((width / 2, height / 2), Right);
        let food = random_cell(&mut rng, width, height);

        GameLoop {
            width,
            height,
            step: config.step,
            snake,
            turn: None,
            food,
            acc: Duration::ZERO,
            alive: true,
            paused: false,
            ticks: 0,
            meals: vec![],
            rng,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn score(&self) -> usize {
        self.meals.len()
    }

    /// Queues a turn for the next tick. Only turns across the axis the snake
    /// last moved on are taken; the latest accepted one wins.
    pub fn steer(&mut self, dir: Direction) {
        if self.paused {
            return;
        }

        if dir.is_perpendicular_to(self.snake.direction()) {
            self.turn = Some(dir);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("{}", if self.paused {"Paused"} else {"Resumed"});
    }

    /// Feeds one frame's elapsed time. Returns the tick outcome if a step ran.
    pub fn update(&mut self, dt: Duration) -> Option<TickOutcome> {
        if self.paused || !self.alive {
            return None;
        }

        self.acc += dt;
        if self.acc < self.step {
            return None;
        }

        self.acc = Duration::ZERO;
        self.tick()
    }

    /// Advances the snake by one cell. Does nothing once the snake has crashed.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.alive {
            return None;
        }

        if let Some(dir) = self.turn.take() {
            self.snake.set_direction(dir);
        }

        self.ticks += 1;
        let new_head = self.snake.next_head(self.width, self.height);

        if self.snake.occupies(new_head) {
            self.alive = false;
        }

        // Even a crashing head is kept, so the last frame shows the impact
        self.snake.push_head(new_head);

        if self.alive && new_head == self.food {
            self.food = random_cell(&mut self.rng, self.width, self.height);
            self.meals.push(Meal { tick: self.ticks, cell: new_head, length: self.snake.len() });

            let eaten = self.meals.len();
            info!("Ate food at {:?}, length {}, next food at {:?}", new_head, self.snake.len(), self.food);
            if eaten % SCRATCH_EVERY == 0 {
                scratch_write(eaten);
            }

            return Some(TickOutcome::Ate);
        }

        self.snake.drop_tail();

        if self.alive {
            Some(TickOutcome::Moved)
        } else {
            info!("Crashed at {:?} after {} ticks, score {}", new_head, self.ticks, self.score());
            Some(TickOutcome::Crashed)
        }
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C) -> Result<(), GameError> {
        canvas.clear();
        canvas.fill_cell(self.food, Paint::Food);

        for (i, cell) in self.snake.body().iter().enumerate() {
            let paint = match i {
                0 if self.alive => Paint::Head(self.snake.direction()),
                0 => Paint::Crash,
                _ => Paint::Body,
            };
            canvas.fill_cell(*cell, paint);
        }

        let status = if !self.alive {
            format!("Game over! Score: {} - Esc to quit", self.score())
        } else if self.paused {
            format!("Paused. Score: {} - p to resume", self.score())
        } else {
            format!("Score: {}", self.score())
        };
        canvas.draw_status(&status);

        canvas.present()
    }
}

/// Uniform cell over the whole grid, x and y drawn independently.
fn random_cell<R: Rng>(rng: &mut R, width: GridInt, height: GridInt) -> Cell {
    let x = rng.gen_range(0..width);
    let y = rng.gen_range(0..height);
    (x, y)
}

/// Bounded write into a stack buffer that lives for this call only.
fn scratch_write(eaten: usize) {
    let mut scratch = [0usize; SCRATCH_LEN];
    if let Some(last) = scratch.last_mut() {
        *last = eaten;
    }
    debug!("Scratch write for meal {}: {:?}", eaten, scratch);
}

pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Steer(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Steer(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Steer(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Steer(Right)),
        KeyCode::Char('p') => Some(Command::Pause),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

/// Runs frames until a quit key is pressed.
pub fn play(config: &GameConfig, term: &mut TermManager) -> Result<(), GameError> {
    let mut game = GameLoop::new(config);
    let mut last_frame = Instant::now();

    'frames: loop {
        for key_ev in term.read_key_events_queue()? {
            match command_for(&key_ev) {
                Some(Command::Steer(dir)) => game.steer(dir),
                Some(Command::Pause) => game.toggle_pause(),
                Some(Command::Quit) => break 'frames,
                None => {}
            }
        }

        let now = Instant::now();
        game.update(now - last_frame);
        last_frame = now;

        game.render(term)?;
        sleep(config.frame_interval);
    }

    let longest = game.meals().last().map_or(1, |meal| meal.length);
    if let Some(meal) = game.meals().last() {
        debug!("Last meal on tick {} at {:?}", meal.tick, meal.cell);
    }
    info!(
        "Quit after {} ticks: score {}, longest snake {}, alive {}",
        game.ticks(), game.score(), longest, game.is_alive()
    );
    Ok(())
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
