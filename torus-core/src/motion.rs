//! Held-key state: which way the torus spins and how fast.

use nalgebra::Vector3;
use tracing::debug;

/// Rotation axis the user can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Tilt about the X axis.
    Pitch,
    /// Turn about the Y axis.
    Yaw,
}

/// Direction of spin about an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Positive,
}

impl Sign {
    fn unit(self) -> f64 {
        match self {
            Sign::Negative => -1.0,
            Sign::Positive => 1.0,
        }
    }
}

/// Per-frame rotation direction. At most one axis spins at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AngularVelocity {
    #[default]
    Idle,
    Spin { axis: Axis, sign: Sign },
}

impl AngularVelocity {
    /// The (x, y, z) unit-step vector; every component is -1, 0 or 1.
    pub fn components(&self) -> Vector3<f64> {
        match *self {
            AngularVelocity::Idle => Vector3::zeros(),
            AngularVelocity::Spin { axis: Axis::Pitch, sign } => {
                Vector3::new(sign.unit(), 0.0, 0.0)
            }
            AngularVelocity::Spin { axis: Axis::Yaw, sign } => {
                Vector3::new(0.0, sign.unit(), 0.0)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AngularVelocity::Idle)
    }
}

/// Rotation speed multiplier, kept in hundredths so stepping is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed {
    hundredths: u8,
}

impl Speed {
    const MIN_HUNDREDTHS: u8 = 1;
    const MAX_HUNDREDTHS: u8 = 10;

    pub const MIN: Speed = Speed {
        hundredths: Self::MIN_HUNDREDTHS,
    };
    pub const MAX: Speed = Speed {
        hundredths: Self::MAX_HUNDREDTHS,
    };
    pub const DEFAULT: Speed = Speed { hundredths: 5 };

    /// Round to the nearest hundredth and clamp into [0.01, 0.10].
    pub fn from_value(value: f64) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        let scaled = (value * 100.0).round().clamp(
            f64::from(Self::MIN_HUNDREDTHS),
            f64::from(Self::MAX_HUNDREDTHS),
        );
        Self {
            hundredths: scaled as u8,
        }
    }

    pub fn value(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }

    /// One step (0.01) faster, saturating at the maximum.
    pub fn increase(self) -> Self {
        Self {
            hundredths: (self.hundredths + 1).min(Self::MAX_HUNDREDTHS),
        }
    }

    /// One step (0.01) slower, saturating at the minimum.
    pub fn decrease(self) -> Self {
        Self {
            hundredths: self.hundredths.saturating_sub(1).max(Self::MIN_HUNDREDTHS),
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything the frame loop needs from the input side for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub velocity: AngularVelocity,
    pub speed: Speed,
}

impl Motion {
    /// Angle delta for one frame: velocity scaled by speed.
    pub fn step(&self) -> Vector3<f64> {
        self.velocity.components() * self.speed.value()
    }
}

/// An input event after key bindings have been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// A rotation key went down (or is auto-repeating).
    Rotate(Axis, Sign),
    /// A rotation key went up.
    ReleaseRotation,
    SlowDown,
    SpeedUp,
}

/// Single writer of the velocity/speed register.
///
/// Events are applied as they are drained from the host's queue; the frame
/// loop reads one [`Motion`] snapshot at the top of each frame.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    velocity: AngularVelocity,
    speed: Speed,
}

impl InputController {
    pub fn new(speed: Speed) -> Self {
        Self {
            velocity: AngularVelocity::Idle,
            speed,
        }
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::Rotate(axis, sign) => {
                self.velocity = AngularVelocity::Spin { axis, sign };
            }
            Control::ReleaseRotation => {
                self.velocity = AngularVelocity::Idle;
            }
            Control::SlowDown => {
                self.speed = self.speed.decrease();
                debug!(speed = self.speed.value(), "Speed decreased");
            }
            Control::SpeedUp => {
                self.speed = self.speed.increase();
                debug!(speed = self.speed.value(), "Speed increased");
            }
        }
    }

    pub fn snapshot(&self) -> Motion {
        Motion {
            velocity: self.velocity,
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_steps() {
        let speed = Speed::DEFAULT;
        assert_eq!(speed.value(), 0.05);
        assert_eq!(speed.increase().value(), 0.06);
        assert_eq!(speed.decrease().value(), 0.04);
        assert_eq!(Speed::MAX.increase(), Speed::MAX);
        assert_eq!(Speed::MIN.decrease(), Speed::MIN);
    }

    #[test]
    fn test_speed_from_value() {
        assert_eq!(Speed::from_value(0.05), Speed::DEFAULT);
        assert_eq!(Speed::from_value(0.071), Speed::from_value(0.07));
        assert_eq!(Speed::from_value(1.0), Speed::MAX);
        assert_eq!(Speed::from_value(-3.0), Speed::MIN);
        assert_eq!(Speed::from_value(f64::NAN), Speed::DEFAULT);
    }

    #[test]
    fn test_speed_clamps_under_repeated_steps() {
        let mut speed = Speed::from_value(0.09);
        for _ in 0..5 {
            speed = speed.increase();
            assert!(speed.value() <= 0.10);
        }
        assert_eq!(speed, Speed::MAX);

        let mut speed = Speed::from_value(0.02);
        for _ in 0..5 {
            speed = speed.decrease();
            assert!(speed.value() >= 0.01);
        }
        assert_eq!(speed, Speed::MIN);
    }

    #[test]
    fn test_single_axis_velocity() {
        let mut input = InputController::default();
        assert!(input.snapshot().velocity.is_idle());

        input.apply(Control::Rotate(Axis::Yaw, Sign::Negative));
        assert_eq!(
            input.snapshot().velocity.components(),
            Vector3::new(0.0, -1.0, 0.0)
        );

        // A new rotation key replaces the axis rather than combining
        input.apply(Control::Rotate(Axis::Pitch, Sign::Positive));
        assert_eq!(
            input.snapshot().velocity.components(),
            Vector3::new(1.0, 0.0, 0.0)
        );

        input.apply(Control::ReleaseRotation);
        assert_eq!(input.snapshot().velocity.components(), Vector3::zeros());
    }

    #[test]
    fn test_speed_controls_keep_velocity() {
        let mut input = InputController::default();
        input.apply(Control::Rotate(Axis::Yaw, Sign::Positive));
        input.apply(Control::SpeedUp);
        input.apply(Control::SpeedUp);

        let motion = input.snapshot();
        assert_eq!(motion.speed.value(), 0.07);
        assert!(!motion.velocity.is_idle());
        assert_eq!(motion.step(), Vector3::new(0.0, 0.07, 0.0));
    }
}
