use std::{
    io::{self, Stdout, Write},
    thread,
    time::{Duration, Instant},
};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    proc::World,
};

const ALIVE: char = '@';
const DEAD: char = '.';

/// Frame delays in milliseconds that `j` and `k` move between.
static DELAYS: [u64; 14] = [1, 10, 20, 40, 60, 100, 150, 200, 300, 450, 800, 1200, 1500, 2000];

pub const DEFAULT_DELAY_MS: u64 = 450;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Rect {
    w: u16, // j
    h: u16, // i
}

impl Rect {
    #[inline]
    pub fn new(width: u16, height: u16) -> Self {
        Rect { w: width, h: height }
    }

    #[inline]
    pub fn term_size() -> Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Rect { w: width, h: height })
    }

    /// Space needed to show `world` plus the time-step line below it.
    pub fn for_world(world: &World) -> Self {
        let w = u16::try_from(world.cols()).unwrap_or(u16::MAX);
        let h = u16::try_from(world.rows().saturating_add(2)).unwrap_or(u16::MAX);
        Rect { w, h }
    }

    #[inline]
    pub fn w(&self) -> u16 {
        self.w
    }

    #[inline]
    pub fn h(&self) -> u16 {
        self.h
    }

    #[inline]
    pub fn fits(&self, inner: &Rect) -> bool {
        inner.w <= self.w && inner.h <= self.h
    }
}

/// Output sink that shows one generation at a time.
pub trait Render {
    fn render(&mut self, world: &World, generation: u64) -> Result<()>;

    /// Waits up to `timeout` for a key press. Sinks without input just sleep.
    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        thread::sleep(timeout);
        Ok(None)
    }
}

fn frame_rows(world: &World) -> impl Iterator<Item = String> + '_ {
    world.cells().chunks(world.cols()).map(|row| {
        row.iter()
            .map(|&alive| if alive { ALIVE } else { DEAD })
            .collect::<String>()
    })
}

/// Full-screen crossterm display. The terminal is restored when dropped.
pub struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        runup()?;
        Ok(Terminal { out: io::stdout() })
    }
}

impl Render for Terminal {
    fn render(&mut self, world: &World, generation: u64) -> Result<()> {
        let have = Rect::term_size()?;
        let need = Rect::for_world(world);
        if !have.fits(&need) {
            return Err(Error::TerminalTooSmall {
                need_w: need.w(),
                need_h: need.h(),
                have_w: have.w(),
                have_h: have.h(),
            });
        }

        queue!(self.out, Clear(ClearType::All))?;
        for (i, line) in frame_rows(world).enumerate() {
            queue!(self.out, MoveTo(0, i as u16), Print(line))?;
        }
        queue!(
            self.out,
            MoveTo(0, need.h() - 1),
            Print(format!("Time Step: {generation}"))
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if !event::poll(left)? {
                return Ok(None);
            }
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if let Err(e) = shutdown() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

fn runup() -> Result<()> {
    execute!(io::stderr(), EnterAlternateScreen, SetTitle("Life on a torus"), Hide)?;
    enable_raw_mode()?;
    Ok(())
}

fn shutdown() -> Result<()> {
    execute!(io::stderr(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

/// Line-oriented sink writing each generation as text.
pub struct Plain<W: Write> {
    out: W,
}

impl<W: Write> Plain<W> {
    pub fn new(out: W) -> Self {
        Plain { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for Plain<W> {
    fn render(&mut self, world: &World, generation: u64) -> Result<()> {
        for line in frame_rows(world) {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "Time Step: {generation}")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

enum Hotkey {
    Quit,
    Step,
    Other,
}

/// Drives one world through successive generations.
pub struct App {
    world: World,
    generation: u64,
    maxgen: Option<u64>,
    upd_timeout: u64,
    pause: bool,
    should_exit: bool,
}

impl App {

    #[inline]
    pub fn new(world: World) -> Self {
        App {
            world,
            generation: 0,
            maxgen: None,
            upd_timeout: DEFAULT_DELAY_MS,
            pause: false,
            should_exit: false,
        }
    }

    /// Stop after generation `maxgen`.
    pub fn with_maxgen(mut self, maxgen: u64) -> Self {
        self.maxgen = Some(maxgen);
        self
    }

    pub fn with_timeout(mut self, ms: u64) -> Self {
        self.upd_timeout = ms;
        self
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn upd_timeout(&self) -> u64 {
        self.upd_timeout
    }

    #[inline]
    pub fn pause(&self) -> bool {
        self.pause
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn finished(&self) -> bool {
        self.should_exit || self.maxgen.is_some_and(|m| self.generation >= m)
    }

    /// Computes the next generation.
    pub fn advance(&mut self) -> Result<()> {
        self.world.step()?;
        self.generation += 1;
        debug!(generation = self.generation, "advanced");
        Ok(())
    }

    /// Shows the current generation, then steps and shows again until the
    /// generation limit is reached or the user quits.
    pub fn run<R: Render>(&mut self, sink: &mut R) -> Result<()> {
        sink.render(&self.world, self.generation)?;
        while !self.finished() {
            if !self.pace(sink)? {
                continue;
            }
            self.advance()?;
            sink.render(&self.world, self.generation)?;
        }
        info!(generation = self.generation, "simulation stopped");
        Ok(())
    }

    /// Waits out one frame while handling keys. Returns whether to step.
    fn pace<R: Render>(&mut self, sink: &mut R) -> Result<bool> {
        let deadline = Instant::now() + Duration::from_millis(self.upd_timeout);
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match sink.next_key(left)? {
                Some(key) => match self.hotkey(key) {
                    Hotkey::Quit => return Ok(false),
                    Hotkey::Step => return Ok(true),
                    Hotkey::Other => {},
                },
                None => return Ok(!self.pause),
            }
        }
    }

    fn hotkey(&mut self, key: KeyEvent) -> Hotkey {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => self.quit(),
                _ => Hotkey::Other,
            };
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('p') => {
                self.pause = !self.pause;
                info!(paused = self.pause, generation = self.generation, "pause toggled");
                Hotkey::Other
            },
            KeyCode::Char('n') if self.pause => Hotkey::Step,
            KeyCode::Char('j') => {
                self.upd_timeout = faster(self.upd_timeout);
                debug!(delay_ms = self.upd_timeout, "faster");
                Hotkey::Other
            },
            KeyCode::Char('k') => {
                self.upd_timeout = slower(self.upd_timeout);
                debug!(delay_ms = self.upd_timeout, "slower");
                Hotkey::Other
            },
            _ => Hotkey::Other,
        }
    }

    fn quit(&mut self) -> Hotkey {
        self.should_exit = true;
        Hotkey::Quit
    }
}

fn faster(current: u64) -> u64 {
    DELAYS.iter().rev().copied().find(|&d| d < current).unwrap_or(DELAYS[0])
}

fn slower(current: u64) -> u64 {
    DELAYS.iter().copied().find(|&d| d > current).unwrap_or(DELAYS[DELAYS.len() - 1])
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn blinker() -> World {
        "5 5 3\n1 2\n2 2\n3 2\n".parse().unwrap()
    }

    /// Records frames and replays scripted key presses, one per frame wait.
    #[derive(Default)]
    struct Script {
        keys: VecDeque<Option<KeyEvent>>,
        frames: Vec<(u64, usize)>,
    }

    impl Script {
        fn press(mut self, c: char) -> Self {
            self.keys.push_back(Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
            self
        }

        fn idle(mut self) -> Self {
            self.keys.push_back(None);
            self
        }
    }

    impl Render for Script {
        fn render(&mut self, world: &World, generation: u64) -> Result<()> {
            self.frames.push((generation, world.population()));
            Ok(())
        }

        fn next_key(&mut self, _timeout: Duration) -> Result<Option<KeyEvent>> {
            Ok(self.keys.pop_front().flatten())
        }
    }

    #[test]
    fn rect_fits() {
        let term = Rect::new(80, 24);
        assert!(term.fits(&Rect::new(80, 24)));
        assert!(term.fits(&Rect::new(10, 10)));
        assert!(!term.fits(&Rect::new(81, 2)));
        assert!(!term.fits(&Rect::new(2, 25)));
    }

    #[test]
    fn rect_for_world_leaves_room_for_status() {
        let w = World::dead(3, 7).unwrap();
        assert_eq!(Rect::for_world(&w), Rect::new(7, 5));
    }

    #[test]
    fn plain_frame() {
        let mut sink = Plain::new(Vec::new());
        sink.render(&"2 3 2\n0 0\n2 1\n".parse().unwrap(), 4).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "@..\n..@\nTime Step: 4\n\n");
    }

    #[test]
    fn run_renders_every_generation() {
        let mut app = App::new(blinker()).with_maxgen(3).with_timeout(0);
        let mut sink = Plain::new(Vec::new());
        app.run(&mut sink).unwrap();

        assert_eq!(app.generation(), 3);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.matches("Time Step:").count(), 4);
        assert!(text.starts_with(".....\n.....\n.@@@.\n"));
        assert!(text.ends_with("Time Step: 3\n\n"));
    }

    #[test]
    fn zero_maxgen_renders_initial_world_only() {
        let mut app = App::new(blinker()).with_maxgen(0).with_timeout(0);
        let mut sink = Script::default();
        app.run(&mut sink).unwrap();
        assert_eq!(sink.frames, vec![(0, 3)]);
    }

    #[test]
    fn quit_key_stops_run() {
        let mut app = App::new(blinker()).with_timeout(0);
        let mut sink = Script::default().idle().idle().press('q');
        app.run(&mut sink).unwrap();
        assert!(app.should_exit());
        assert_eq!(app.generation(), 2);
        assert_eq!(sink.frames.len(), 3);
    }

    #[test]
    fn pause_holds_generation_until_single_step() {
        let mut app = App::new(blinker()).with_maxgen(2).with_timeout(0);
        let mut sink = Script::default()
            .press('p')
            .idle()
            .idle()
            .press('n')
            .press('p')
            .idle();
        app.run(&mut sink).unwrap();

        assert!(!app.pause());
        assert_eq!(app.generation(), 2);
        assert_eq!(sink.frames, vec![(0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(blinker()).with_timeout(0);
        let mut sink = Script::default();
        sink.keys
            .push_back(Some(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        app.run(&mut sink).unwrap();
        assert_eq!(app.generation(), 0);
    }

    #[test]
    fn speed_keys_walk_the_delay_ladder() {
        let mut app = App::new(blinker()).with_maxgen(1);
        let mut sink = Script::default()
            .press('j')
            .press('j')
            .press('k')
            .press('k')
            .press('k')
            .idle();
        assert_eq!(app.upd_timeout(), DEFAULT_DELAY_MS);
        app.run(&mut sink).unwrap();
        assert_eq!(app.upd_timeout(), 800);
    }

    #[test]
    fn delay_ladder_edges() {
        assert_eq!(faster(1), 1);
        assert_eq!(faster(450), 300);
        assert_eq!(faster(455), 450);
        assert_eq!(slower(2000), 2000);
        assert_eq!(slower(450), 800);
        assert_eq!(slower(0), 1);
    }
}
