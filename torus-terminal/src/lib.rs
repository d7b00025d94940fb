//! Terminal frontend for the wireframe torus
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue, terminal,
};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};
use torus_core::{
    FramePacer, FrameScheduler, InputController, Motion, Result as TorusResult, RunSummary,
    SceneConfig, Speed, StrokeColor, Surface, TorusError,
};
use tracing::{debug, error, info, warn};

pub mod input;
pub mod renderer;

pub use input::{map_key, HoldTracker, KeyAction};
pub use renderer::BrailleCanvas;

/// Reports the terminal size as (columns, rows)
pub type SizeProbe = fn() -> io::Result<(u16, u16)>;

/// Drawing surface backed by a braille canvas and a terminal writer
pub struct TerminalSurface<W: Write> {
    canvas: BrailleCanvas,
    out: W,
    probe: SizeProbe,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, probe: SizeProbe, width: u32, height: u32) -> io::Result<Self> {
        let (cols, rows) = probe()?;
        Ok(Self {
            canvas: BrailleCanvas::new(cols as usize, rows as usize, width, height),
            out,
            probe,
        })
    }

    pub fn canvas(&self) -> &BrailleCanvas {
        &self.canvas
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        self.canvas.draw(&mut self.out)?;
        self.out.flush()?;

        // Pick up terminal resizes for the next frame
        let (cols, rows) = (self.probe)()?;
        if (cols as usize, rows as usize) != self.canvas.grid() {
            debug!(cols, rows, "Terminal resized");
            self.canvas.fit(cols as usize, rows as usize);
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        }
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn dimensions(&self) -> TorusResult<(u32, u32)> {
        Ok(self.canvas.size())
    }

    fn clear(&mut self, _width: u32, _height: u32) {
        self.canvas.clear();
    }

    fn set_stroke_color(&mut self, color: StrokeColor) {
        self.canvas.set_color(color);
    }

    fn begin_path(&mut self) {
        self.canvas.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.canvas.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.canvas.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.canvas.close_path();
    }

    fn stroke(&mut self) {
        self.canvas.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.canvas.fill_text(text, x, y);
    }

    fn present(&mut self) -> TorusResult<()> {
        self.flush_frame()
            .map_err(|e| TorusError::SurfaceUnavailable(e.to_string()))
    }
}

/// Fixed-interval frame ticks, draining keyboard input between them
pub struct TerminalPacer {
    interval: Duration,
    next_tick: Instant,
    input: InputController,
    keys: HoldTracker,
    release_events: bool,
    detached: bool,
}

impl TerminalPacer {
    pub fn new(fps: u32, input: InputController, keys: HoldTracker, release_events: bool) -> Self {
        let interval = Duration::from_secs(1) / fps.max(1);
        Self {
            interval,
            next_tick: Instant::now(),
            input,
            keys,
            release_events,
            detached: false,
        }
    }

    /// Feed one terminal event to the input register; `false` means quit.
    fn handle_event(&mut self, event: Event, now: Instant) -> bool {
        if let Event::Key(key) = event {
            match self.keys.on_key(&key, now) {
                Some(KeyAction::Quit) => return false,
                Some(KeyAction::Control(control)) => self.input.apply(control),
                None => {}
            }
        }
        true
    }
}

impl FramePacer for TerminalPacer {
    fn next_frame(&mut self) -> Option<Motion> {
        if self.detached {
            return None;
        }

        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                break;
            }
            match event::poll(self.next_tick - now) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    error!(%err, "Input polling failed");
                    return None;
                }
            }
            match event::read() {
                Ok(event) => {
                    if !self.handle_event(event, Instant::now()) {
                        info!("Quit requested");
                        return None;
                    }
                }
                Err(err) => {
                    error!(%err, "Reading input failed");
                    return None;
                }
            }
        }

        let now = Instant::now();
        self.next_tick += self.interval;
        if self.next_tick < now {
            // Fell behind; don't try to catch up with a burst of frames
            self.next_tick = now + self.interval;
        }

        if let Some(control) = self.keys.expire(now) {
            self.input.apply(control);
        }
        Some(self.input.snapshot())
    }

    fn detach(&mut self) {
        self.detached = true;
        if self.release_events {
            if let Err(err) = execute!(stdout(), PopKeyboardEnhancementFlags) {
                warn!(%err, "Failed to restore keyboard mode");
            }
        }
        debug!("Input detached");
    }
}

/// Frontend settings that aren't part of the scene
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub fps: u32,
    /// Hold inference window for terminals without key-release events
    pub hold_timeout: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            hold_timeout: Duration::from_millis(500),
        }
    }
}

/// Main application struct for terminal torus rendering
pub struct TerminalApp {
    scheduler: FrameScheduler,
    initial_speed: Speed,
    options: AppOptions,
}

impl TerminalApp {
    pub fn new(config: &SceneConfig, options: AppOptions) -> TorusResult<Self> {
        Ok(Self {
            scheduler: config.build()?,
            initial_speed: config.initial_speed,
            options,
        })
    }

    pub fn run(&mut self) -> io::Result<RunSummary> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup: every step runs even if an earlier one failed
        let cleanup = [
            terminal::disable_raw_mode(),
            execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show),
        ];
        finish(result, cleanup)
    }

    fn main_loop(&mut self) -> io::Result<RunSummary> {
        let settings = *self.scheduler.projector().settings();
        let mut surface: TerminalSurface<Stdout> =
            TerminalSurface::new(stdout(), terminal::size, settings.width, settings.height)?;

        // Popped again by the pacer on detach
        let release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true));
        if release_events {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        let hold_timeout = (!release_events).then_some(self.options.hold_timeout);
        info!(release_events, fps = self.options.fps, "Terminal ready");

        let mut pacer = TerminalPacer::new(
            self.options.fps,
            InputController::new(self.initial_speed),
            HoldTracker::new(hold_timeout),
            release_events,
        );

        Ok(self.scheduler.run(&mut pacer, &mut surface))
    }
}

/// The loop's result, or the first cleanup failure if the loop succeeded.
fn finish<T>(result: io::Result<T>, cleanup: [io::Result<()>; 2]) -> io::Result<T> {
    for err in cleanup.iter().filter_map(|step| step.as_ref().err()) {
        warn!(%err, "Terminal cleanup failed");
    }
    let value = result?;
    cleanup.into_iter().collect::<io::Result<()>>()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use torus_core::{Projector, TorusMesh, TorusParams};

    fn fixed_size() -> io::Result<(u16, u16)> {
        Ok((40, 15))
    }

    fn gone() -> io::Result<(u16, u16)> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
    }

    fn scheduler() -> FrameScheduler {
        let params = TorusParams::new(1.5, 0.5, 16, 16).unwrap();
        FrameScheduler::new(
            TorusMesh::generate(&params),
            Projector::default(),
            StrokeColor::CYAN,
        )
        .unwrap()
    }

    #[test]
    fn test_surface_draws_torus() {
        let mut surface = TerminalSurface::new(Vec::new(), fixed_size, 800, 600).unwrap();
        let mut scheduler = scheduler();

        scheduler.step(Motion::default(), &mut surface);

        // The reference vertex (480, 300) lands in cell (24, 7)
        assert_ne!(surface.canvas().cell(24, 7), ' ');
        // The hole in the middle stays empty
        assert_eq!(surface.canvas().cell(20, 7), ' ');
        let output = String::from_utf8(surface.out.clone()).unwrap();
        assert!(output.contains("\x1b[38;2;0;255;255m"));
    }

    #[test]
    fn test_lost_terminal_stops_scheduler() {
        let mut surface = TerminalSurface {
            canvas: BrailleCanvas::new(40, 15, 800, 600),
            out: Vec::new(),
            probe: gone,
        };
        let mut scheduler = scheduler();

        scheduler.step(Motion::default(), &mut surface);
        assert!(scheduler.is_stopped());
    }

    fn failed(kind: io::ErrorKind) -> io::Result<()> {
        Err(io::Error::new(kind, "cleanup"))
    }

    #[test]
    fn test_finish_keeps_loop_error() {
        let result: io::Result<u64> = Err(io::Error::new(io::ErrorKind::Other, "loop"));
        let err = finish(result, [failed(io::ErrorKind::BrokenPipe), Ok(())]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_finish_reports_first_cleanup_error() {
        let cleanup = [
            failed(io::ErrorKind::PermissionDenied),
            failed(io::ErrorKind::BrokenPipe),
        ];
        let err = finish(Ok(3u64), cleanup).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        assert_eq!(finish(Ok(3u64), [Ok(()), Ok(())]).unwrap(), 3);
    }

    #[test]
    fn test_pacer_interval() {
        let pacer = TerminalPacer::new(
            50,
            InputController::default(),
            HoldTracker::new(None),
            true,
        );
        assert_eq!(pacer.interval, Duration::from_millis(20));
    }

    #[test]
    fn test_quit_key_ends_handling() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut pacer = TerminalPacer::new(
            60,
            InputController::default(),
            HoldTracker::new(None),
            true,
        );
        let now = Instant::now();
        let right = Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));

        assert!(pacer.handle_event(right, now));
        assert!(!pacer.input.snapshot().velocity.is_idle());
        assert!(!pacer.handle_event(quit, now));
    }
}
