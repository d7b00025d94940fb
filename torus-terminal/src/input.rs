//! Key bindings and held-key tracking for crossterm key events
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};
use torus_core::{Axis, Control, Sign};

/// What a key does once bindings are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Control(Control),
    Quit,
}

/// Default bindings: arrows rotate, `[` / `]` change speed, q / Esc / Ctrl+C quit
pub fn map_key(event: &KeyEvent) -> Option<KeyAction> {
    let action = match event.code {
        KeyCode::Left => KeyAction::Control(Control::Rotate(Axis::Yaw, Sign::Negative)),
        KeyCode::Right => KeyAction::Control(Control::Rotate(Axis::Yaw, Sign::Positive)),
        KeyCode::Up => KeyAction::Control(Control::Rotate(Axis::Pitch, Sign::Negative)),
        KeyCode::Down => KeyAction::Control(Control::Rotate(Axis::Pitch, Sign::Positive)),
        KeyCode::Char('[') => KeyAction::Control(Control::SlowDown),
        KeyCode::Char(']') => KeyAction::Control(Control::SpeedUp),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Turns press / repeat / release events into controls.
///
/// Terminals that can't report key releases only send repeats while a key is
/// held; with a `hold_timeout` set, a rotation key that stops repeating for
/// that long counts as released.
#[derive(Debug, Clone)]
pub struct HoldTracker {
    hold_timeout: Option<Duration>,
    last_rotate: Option<Instant>,
}

impl HoldTracker {
    pub fn new(hold_timeout: Option<Duration>) -> Self {
        Self {
            hold_timeout,
            last_rotate: None,
        }
    }

    pub fn on_key(&mut self, event: &KeyEvent, now: Instant) -> Option<KeyAction> {
        let action = map_key(event)?;
        let rotating = matches!(action, KeyAction::Control(Control::Rotate(..)));

        match event.kind {
            KeyEventKind::Release if rotating => {
                self.last_rotate = None;
                Some(KeyAction::Control(Control::ReleaseRotation))
            }
            KeyEventKind::Release => None,
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if rotating {
                    self.last_rotate = Some(now);
                }
                Some(action)
            }
        }
    }

    /// Release an inferred hold once its key has gone quiet.
    pub fn expire(&mut self, now: Instant) -> Option<Control> {
        let timeout = self.hold_timeout?;
        let last = self.last_rotate?;
        if now.saturating_duration_since(last) < timeout {
            return None;
        }
        self.last_rotate = None;
        Some(Control::ReleaseRotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_default_bindings() {
        assert_eq!(
            map_key(&press(KeyCode::Left)),
            Some(KeyAction::Control(Control::Rotate(Axis::Yaw, Sign::Negative)))
        );
        assert_eq!(
            map_key(&press(KeyCode::Right)),
            Some(KeyAction::Control(Control::Rotate(Axis::Yaw, Sign::Positive)))
        );
        assert_eq!(
            map_key(&press(KeyCode::Up)),
            Some(KeyAction::Control(Control::Rotate(Axis::Pitch, Sign::Negative)))
        );
        assert_eq!(
            map_key(&press(KeyCode::Down)),
            Some(KeyAction::Control(Control::Rotate(Axis::Pitch, Sign::Positive)))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('['))),
            Some(KeyAction::Control(Control::SlowDown))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char(']'))),
            Some(KeyAction::Control(Control::SpeedUp))
        );
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(KeyAction::Quit));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(map_key(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_stops_rotation() {
        let mut tracker = HoldTracker::new(None);
        let now = Instant::now();

        assert!(tracker.on_key(&press(KeyCode::Up), now).is_some());
        assert_eq!(
            tracker.on_key(&release(KeyCode::Up), now),
            Some(KeyAction::Control(Control::ReleaseRotation))
        );
        // Releasing a speed key does nothing
        assert_eq!(tracker.on_key(&release(KeyCode::Char(']')), now), None);
    }

    #[test]
    fn test_no_timeout_without_inference() {
        let mut tracker = HoldTracker::new(None);
        let now = Instant::now();
        tracker.on_key(&press(KeyCode::Left), now);
        assert_eq!(tracker.expire(now + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_inferred_release_after_timeout() {
        let timeout = Duration::from_millis(500);
        let mut tracker = HoldTracker::new(Some(timeout));
        let start = Instant::now();

        tracker.on_key(&press(KeyCode::Left), start);
        assert_eq!(tracker.expire(start + Duration::from_millis(300)), None);

        // Auto-repeat keeps the hold alive
        tracker.on_key(&press(KeyCode::Left), start + Duration::from_millis(400));
        assert_eq!(tracker.expire(start + Duration::from_millis(800)), None);

        assert_eq!(
            tracker.expire(start + Duration::from_millis(900)),
            Some(Control::ReleaseRotation)
        );
        assert_eq!(tracker.expire(start + Duration::from_millis(2000)), None);
    }
}
