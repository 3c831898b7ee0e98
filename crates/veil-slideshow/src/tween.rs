//! Frame-driven numeric interpolation.
//!
//! An [`Interpolator`] animates named scalar fields from a start value to a
//! target over a duration with an easing curve, and reports an optional
//! completion signal. Animating a field that is already animating supersedes
//! the running tween: last writer wins and the superseded completion never
//! fires.

/// Easing curves. Input and output are in `[0, 1]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Easing {
    Linear,
    /// Decelerating quadratic; the usual default for smoothing.
    #[default]
    QuadOut,
    QuadInOut,
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// One requested animation of `field` from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Tween<F, S> {
    pub field: F,
    pub from: f32,
    pub to: f32,
    /// Seconds. Zero or less completes on the next advance.
    pub duration: f32,
    pub easing: Easing,
    pub on_complete: Option<S>,
}

impl<F, S> Tween<F, S> {
    pub fn new(field: F, from: f32, to: f32) -> Self {
        Self {
            field,
            from,
            to,
            duration: 0.0,
            easing: Easing::default(),
            on_complete: None,
        }
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn on_complete(mut self, signal: S) -> Self {
        self.on_complete = Some(signal);
        self
    }

    fn value_at(&self, elapsed: f32) -> (f32, bool) {
        if self.duration <= 0.0 || elapsed >= self.duration {
            return (self.to, true);
        }
        let k = self.easing.apply(elapsed / self.duration);
        (self.from + (self.to - self.from) * k, false)
    }
}

/// Output of one [`Interpolator::advance`] call.
#[derive(Debug)]
pub struct TweenStep<F, S> {
    /// New value of every field that was animating.
    pub values: Vec<(F, f32)>,
    /// Completion signals of tweens that finished during this step.
    pub completed: Vec<S>,
}

impl<F, S> TweenStep<F, S> {
    fn empty() -> Self {
        Self { values: Vec::new(), completed: Vec::new() }
    }
}

/// Interpolation service used by tiles.
pub trait Interpolator<F, S> {
    /// Starts `tween`, superseding any running tween on the same field.
    fn animate(&mut self, tween: Tween<F, S>);

    /// Stops the tween on `field` without firing its completion.
    fn cancel(&mut self, field: F);

    fn is_animating(&self, field: F) -> bool;

    /// Target of the running tween on `field`.
    fn target(&self, field: F) -> Option<f32>;

    /// Advances every running tween by `dt` seconds.
    fn advance(&mut self, dt: f32) -> TweenStep<F, S>;
}

struct Running<F, S> {
    tween: Tween<F, S>,
    elapsed: f32,
}

/// Default [`Interpolator`]: a flat list of running tweens, advanced by the
/// owner's frame clock.
pub struct Tweener<F, S> {
    running: Vec<Running<F, S>>,
}

impl<F, S> Default for Tweener<F, S> {
    fn default() -> Self {
        Self { running: Vec::new() }
    }
}

impl<F, S> Tweener<F, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

impl<F, S> Interpolator<F, S> for Tweener<F, S>
where
    F: Copy + Eq,
{
    fn animate(&mut self, tween: Tween<F, S>) {
        self.cancel(tween.field);
        self.running.push(Running { tween, elapsed: 0.0 });
    }

    fn cancel(&mut self, field: F) {
        self.running.retain(|r| r.tween.field != field);
    }

    fn is_animating(&self, field: F) -> bool {
        self.running.iter().any(|r| r.tween.field == field)
    }

    fn target(&self, field: F) -> Option<f32> {
        self.running
            .iter()
            .find(|r| r.tween.field == field)
            .map(|r| r.tween.to)
    }

    fn advance(&mut self, dt: f32) -> TweenStep<F, S> {
        if self.running.is_empty() {
            return TweenStep::empty();
        }

        let dt = dt.max(0.0);
        let mut step = TweenStep::empty();
        let mut still_running = Vec::with_capacity(self.running.len());

        for mut r in self.running.drain(..) {
            r.elapsed += dt;
            let (value, done) = r.tween.value_at(r.elapsed);
            step.values.push((r.tween.field, value));
            if done {
                if let Some(signal) = r.tween.on_complete.take() {
                    step.completed.push(signal);
                }
            } else {
                still_running.push(r);
            }
        }

        self.running = still_running;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    enum Field {
        A,
        B,
    }

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    enum Signal {
        First,
        Second,
    }

    fn value_of(step: &TweenStep<Field, Signal>, field: Field) -> Option<f32> {
        step.values.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }

    #[test]
    fn easings_hit_endpoints() {
        for e in [Easing::Linear, Easing::QuadOut, Easing::QuadInOut, Easing::CubicInOut] {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?}");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?}");
        }
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
    }

    #[test]
    fn reaches_target_and_fires_once() {
        let mut tw: Tweener<Field, Signal> = Tweener::new();
        tw.animate(Tween::new(Field::A, 0.0, 1.0).duration(1.0).easing(Easing::Linear).on_complete(Signal::First));

        let step = tw.advance(0.5);
        assert!((value_of(&step, Field::A).unwrap_or_default() - 0.5).abs() < 1e-6);
        assert!(step.completed.is_empty());

        let step = tw.advance(0.6);
        assert_eq!(value_of(&step, Field::A), Some(1.0));
        assert_eq!(step.completed, vec![Signal::First]);

        let step = tw.advance(1.0);
        assert!(step.values.is_empty());
        assert!(step.completed.is_empty());
    }

    #[test]
    fn superseded_completion_never_fires() {
        let mut tw: Tweener<Field, Signal> = Tweener::new();
        tw.animate(Tween::new(Field::A, 1.0, 0.0).duration(0.5).on_complete(Signal::First));
        tw.advance(0.25);
        tw.animate(Tween::new(Field::A, 0.5, 1.0).duration(0.5).on_complete(Signal::Second));
        assert_eq!(tw.len(), 1);

        let mut fired = Vec::new();
        for _ in 0..4 {
            fired.extend(tw.advance(0.25).completed);
        }
        assert_eq!(fired, vec![Signal::Second]);
    }

    #[test]
    fn fields_are_independent() {
        let mut tw: Tweener<Field, Signal> = Tweener::new();
        tw.animate(Tween::new(Field::A, 0.0, 10.0).duration(1.0));
        tw.animate(Tween::new(Field::B, 0.0, 20.0).duration(2.0));
        assert_eq!(tw.target(Field::B), Some(20.0));

        tw.advance(1.0);
        assert!(!tw.is_animating(Field::A));
        assert!(tw.is_animating(Field::B));
    }

    #[test]
    fn cancel_drops_without_signal() {
        let mut tw: Tweener<Field, Signal> = Tweener::new();
        tw.animate(Tween::new(Field::A, 0.0, 1.0).duration(1.0).on_complete(Signal::First));
        tw.cancel(Field::A);
        let step = tw.advance(2.0);
        assert!(step.values.is_empty() && step.completed.is_empty());
    }

    #[test]
    fn zero_duration_snaps() {
        let mut tw: Tweener<Field, Signal> = Tweener::new();
        tw.animate(Tween::new(Field::A, 3.0, 7.0));
        let step = tw.advance(0.0);
        assert_eq!(value_of(&step, Field::A), Some(7.0));
    }
}
