mod display;

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use space_raiders::config::GameConfig;
use space_raiders::entities::PlayerId;
use space_raiders::math::Vec2;
use space_raiders::playfield::{AlienWave, PlayField, WallRow};
use space_raiders::ports::{InputSource, MessageSink, RandomInput, Steering};

use display::{Banner, Hud, HUD_ROWS};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Fixed simulation step in seconds.
const TICK: f32 = 1.0 / 60.0;

/// Longest wall-clock gap fed into the accumulator at once.
const MAX_CATCH_UP: f32 = 0.25;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Seconds a HUD message stays on screen.
const MESSAGE_LIFETIME: f32 = 3.0;

// ── Level script ──────────────────────────────────────────────────────────────

enum LevelEvent {
    Wave(AlienWave),
    Walls(WallRow),
    Message(&'static str),
}

const fn wave(count: usize, row_y: f32, direction: f32, normal_profile: usize) -> LevelEvent {
    LevelEvent::Wave(AlienWave {
        count,
        spacing: 8.0,
        row_y,
        direction,
        normal_profile,
        better_profile: normal_profile + 1,
    })
}

const LEVEL: &[(f32, LevelEvent)] = &[
    (0.0, wave(4, 3.0, 1.0, 0)),
    (0.0, LevelEvent::Message("Here they come!")),
    (12.0, wave(4, 3.0, -1.0, 2)),
    (12.0, LevelEvent::Walls(WallRow { count: 3, x: 20.0, y: 20.0 })),
    (24.0, wave(8, 3.0, 1.0, 4)),
    (24.0, LevelEvent::Walls(WallRow { count: 3, x: 50.0, y: 24.0 })),
    (24.0, LevelEvent::Message("Destroy All Aliens!")),
    (36.0, wave(8, 6.0, 1.0, 6)),
    (48.0, wave(8, 3.0, 1.0, 0)),
    (48.0, LevelEvent::Message("Don't let them reach the bottom!")),
];

// ── Messages ──────────────────────────────────────────────────────────────────

/// Short-lived HUD notifications, oldest first.
#[derive(Default)]
struct MessageLog {
    entries: VecDeque<(f32, String)>,
}

impl MessageLog {
    fn tick(&mut self, dt: f32) {
        for (age, _) in &mut self.entries {
            *age += dt;
        }
        while self.entries.front().is_some_and(|(age, _)| *age > MESSAGE_LIFETIME) {
            self.entries.pop_front();
        }
    }

    fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, text)| text.as_str()).collect()
    }
}

impl MessageSink for MessageLog {
    fn push_message(&mut self, text: &str) {
        self.entries.push_back((0.0, text.to_owned()));
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Frame number of the last press/repeat event of every held key.
#[derive(Default)]
struct HeldKeys {
    key_frame: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    fn is_held(&self, key: &KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(key)
            .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
    }
}

/// Steering from the arrow keys or A / D.
#[derive(Default)]
struct KeyboardInput {
    current: Steering,
}

impl KeyboardInput {
    fn refresh(&mut self, held: &HeldKeys, frame: u64) {
        let any = |keys: &[KeyCode]| keys.iter().any(|k| held.is_held(k, frame));
        self.current = Steering {
            left: any(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
            right: any(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
        };
    }
}

impl InputSource for KeyboardInput {
    fn sample(&mut self, _dt: f32, _rng: &mut dyn RngCore) -> Steering {
        self.current
    }
}

enum Pilot {
    Keyboard,
    Cpu(RandomInput),
}

#[derive(Parser)]
#[command(name = "space_raiders")]
#[command(about = "Terminal arcade shooter: clear every alien wave before one reaches the bottom")]
struct Options {
    /// JSON file overriding the default tuning
    config: Option<PathBuf>,

    /// Let the CPU fly the first ship
    #[arg(long)]
    cpu: bool,

    /// Add a CPU-flown second ship
    #[arg(long)]
    coop: bool,
}

impl Options {
    fn pilots(&self) -> Vec<Pilot> {
        let mut pilots = vec![if self.cpu { Pilot::Cpu(RandomInput::new()) } else { Pilot::Keyboard }];
        if self.coop {
            pilots.push(Pilot::Cpu(RandomInput::new()));
        }
        pilots
    }
}

// ── Round ─────────────────────────────────────────────────────────────────────

enum Outcome {
    Quit,
    Restart,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Status {
    Playing,
    Paused,
    Over(Banner),
}

struct Round {
    pilots: Vec<Pilot>,
    keyboard: KeyboardInput,
    messages: MessageLog,
    clock: f32,
    next_event: usize,
    status: Status,
}

impl Round {
    fn start(field: &mut PlayField, pilots: Vec<Pilot>) -> Self {
        field.reset();
        let bounds = field.bounds();
        let count = pilots.len();
        for i in 0..count {
            let x = bounds.x * (i + 1) as f32 / (count + 1) as f32;
            field.spawn_player(PlayerId(i as u8), x);
        }
        Self {
            pilots,
            keyboard: KeyboardInput::default(),
            messages: MessageLog::default(),
            clock: 0.0,
            next_event: 0,
            status: Status::Playing,
        }
    }

    fn run_script(&mut self, field: &mut PlayField) {
        while let Some((at, event)) = LEVEL.get(self.next_event) {
            if *at > self.clock {
                break;
            }
            match event {
                LevelEvent::Wave(wave) => {
                    field.spawn_wave(wave);
                }
                LevelEvent::Walls(row) => field.spawn_walls(row),
                LevelEvent::Message(text) => self.messages.push_message(text),
            }
            self.next_event += 1;
        }
    }

    fn step(&mut self, field: &mut PlayField, rng: &mut StdRng) {
        self.clock += TICK;
        self.run_script(field);
        self.messages.tick(TICK);

        let keyboard = &mut self.keyboard;
        let steering: Vec<Steering> = self
            .pilots
            .iter_mut()
            .map(|pilot| match pilot {
                Pilot::Keyboard => keyboard.sample(TICK, rng),
                Pilot::Cpu(ai) => ai.sample(TICK, rng),
            })
            .collect();

        let report = field.update(TICK, rng, &steering, None, &mut self.messages);

        if report.bottom_reached || field.no_players() {
            info!(clock = self.clock, "round lost");
            self.status = Status::Over(Banner::GameOver);
        } else if self.next_event >= LEVEL.len() && field.no_aliens() {
            info!(clock = self.clock, "round won");
            self.status = Status::Over(Banner::Victory);
        }
    }
}

/// Drive one round until the player quits or asks for another.
fn play_round<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    field: &mut PlayField,
    rng: &mut StdRng,
    options: &Options,
) -> std::io::Result<Outcome> {
    let mut round = Round::start(field, options.pilots());
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut accumulator = 0.0f32;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    held.key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(Outcome::Quit),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Outcome::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if matches!(round.status, Status::Over(_)) => {
                            return Ok(Outcome::Restart);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            round.status = match round.status {
                                Status::Playing => Status::Paused,
                                Status::Paused => Status::Playing,
                                over => over,
                            };
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    held.key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    held.key_frame.remove(&code);
                }
            }
        }
        round.keyboard.refresh(&held, frame);

        let now = Instant::now();
        accumulator += (now - last).as_secs_f32().min(MAX_CATCH_UP);
        last = now;
        while accumulator >= TICK {
            accumulator -= TICK;
            if round.status == Status::Playing {
                round.step(field, rng);
            }
        }

        let scores = field.scores();
        let banner = match round.status {
            Status::Over(banner) => banner,
            Status::Playing | Status::Paused => Banner::None,
        };
        let hud = Hud { scores: &scores, messages: round.messages.texts(), banner };
        display::render(out, field, &hud)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Log to the file named by `RAIDERS_LOG`; stdout belongs to the game.
fn init_tracing() -> std::io::Result<()> {
    let Ok(path) = std::env::var("RAIDERS_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> std::io::Result<GameConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(GameConfig::default()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let options = Options::parse();
    init_tracing()?;
    let config = load_config(options.config.as_deref())?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Blocking event reads live on their own thread so the game loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, config, &options);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    options: &Options,
) -> std::io::Result<()> {
    let seed = if config.random_seed != 0 { config.random_seed } else { rand::random() };
    let mut rng = StdRng::seed_from_u64(seed);

    let (width, height) = terminal::size()?;
    let bounds = Vec2::new(f32::from(width), f32::from(height.saturating_sub(HUD_ROWS + 2)));
    info!(seed, width = bounds.x, height = bounds.y, "starting");
    let mut field = PlayField::new(bounds, config);

    loop {
        match play_round(out, rx, &mut field, &mut rng, options)? {
            Outcome::Quit => break,
            Outcome::Restart => info!(scores = ?field.scores(), "restarting"),
        }
    }
    Ok(())
}
