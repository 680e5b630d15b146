use std::ops::{Index, IndexMut};

use glam::{Quat, Vec3};

use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Holds the value of the current keyframe.
    Constant,
    #[default]
    Linear,
    /// Hermite spline using the keyframes' tangents.
    Cubic,
}

/// One time-stamped sample with its Hermite tangents.
///
/// Tangents are only read by [`InterpolationMode::Cubic`] tracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T: Interpolatable> {
    pub time: f32,
    pub value: T,
    pub in_tangent: T,
    pub out_tangent: T,
}

impl<T: Interpolatable> Keyframe<T> {
    #[must_use]
    pub fn new(time: f32, value: T) -> Self {
        Self {
            time,
            value,
            in_tangent: T::zero(),
            out_tangent: T::zero(),
        }
    }

    #[must_use]
    pub fn with_tangents(time: f32, in_tangent: T, value: T, out_tangent: T) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

impl<T: Interpolatable> Default for Keyframe<T> {
    fn default() -> Self {
        Self::new(0.0, T::zero())
    }
}

/// Keyframed animation curve for one scalar, vector or quaternion channel.
///
/// Keyframes must be sorted by non-decreasing time; the track never sorts.
/// A track with fewer than two keyframes is inert: every sample returns
/// [`Interpolatable::zero`].
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack<T: Interpolatable> {
    frames: Vec<Keyframe<T>>,
    interpolation: InterpolationMode,
}

pub type ScalarTrack = KeyframeTrack<f32>;
pub type VectorTrack = KeyframeTrack<Vec3>;
pub type QuaternionTrack = KeyframeTrack<Quat>;

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self {
            frames: Vec::new(),
            interpolation,
        }
    }

    #[must_use]
    pub fn from_keyframes(frames: Vec<Keyframe<T>>, interpolation: InterpolationMode) -> Self {
        Self {
            frames,
            interpolation,
        }
    }

    /// Builds a track from parallel time/value arrays.
    ///
    /// For [`InterpolationMode::Cubic`] `values` holds three entries per
    /// keyframe: `[in_tangent, value, out_tangent]`. Otherwise one entry per
    /// keyframe and zero tangents. Trailing values without a time are ignored.
    #[must_use]
    pub fn from_samples(times: &[f32], values: &[T], interpolation: InterpolationMode) -> Self {
        let frames = if interpolation == InterpolationMode::Cubic {
            times
                .iter()
                .zip(values.chunks_exact(3))
                .map(|(&time, v)| Keyframe::with_tangents(time, v[0], v[1], v[2]))
                .collect()
        } else {
            times
                .iter()
                .zip(values)
                .map(|(&time, &value)| Keyframe::new(time, value))
                .collect()
        };

        Self {
            frames,
            interpolation,
        }
    }

    pub fn resize(&mut self, size: usize) {
        self.frames.resize(size, Keyframe::default());
    }

    pub fn push(&mut self, frame: Keyframe<T>) {
        self.frames.push(frame);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True when the track has at least two keyframes and can drive a value.
    #[inline]
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[Keyframe<T>] {
        &self.frames
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: InterpolationMode) {
        self.interpolation = interpolation;
    }

    /// Time of the first keyframe, 0 for an empty track.
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.frames.first().map_or(0.0, |f| f.time)
    }

    /// Time of the last keyframe, 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.frames.last().map_or(0.0, |f| f.time)
    }

    #[must_use]
    pub fn sample(&self, time: f32, looping: bool) -> T {
        match self.interpolation {
            InterpolationMode::Constant => self.sample_constant(time, looping),
            InterpolationMode::Linear => self.sample_linear(time, looping),
            InterpolationMode::Cubic => self.sample_cubic(time, looping),
        }
    }

    /// Index of the keyframe that starts the segment containing `time`.
    ///
    /// Returns `None` for inert tracks. Looping tracks wrap `time` into
    /// `[start, end)` first; non-looping tracks clamp to the first and the
    /// second-to-last keyframe.
    #[must_use]
    pub fn frame_index(&self, time: f32, looping: bool) -> Option<usize> {
        let size = self.frames.len();
        if size <= 1 {
            return None;
        }

        let time = if looping {
            let start = self.frames[0].time;
            let end = self.frames[size - 1].time;
            wrap_time(time, start, end)
        } else {
            if time <= self.frames[0].time {
                return Some(0);
            }
            if time >= self.frames[size - 2].time {
                return Some(size - 2);
            }
            time
        };

        // Rightmost keyframe at or before `time`. Tracks are short, a linear
        // scan is enough.
        (0..size).rev().find(|&i| time >= self.frames[i].time)
    }

    /// The time actually used to compute the interpolation parameter:
    /// wrapped the same way as [`frame_index`](Self::frame_index) when
    /// looping, clamped to the track otherwise. Zero for inert or
    /// zero-length tracks.
    #[must_use]
    pub fn adjust_time_to_fit_track(&self, time: f32, looping: bool) -> f32 {
        let size = self.frames.len();
        if size <= 1 {
            return 0.0;
        }

        let start = self.frames[0].time;
        let end = self.frames[size - 1].time;
        let duration = end - start;
        if duration <= 0.0 {
            return 0.0;
        }

        if looping {
            wrap_time(time, start, end)
        } else {
            time.clamp(start, end)
        }
    }

    fn sample_constant(&self, time: f32, looping: bool) -> T {
        match self.frame_index(time, looping) {
            Some(frame) if frame < self.frames.len() => self.frames[frame].value.renormalize(),
            _ => T::zero(),
        }
    }

    /// Resolves the segment `[i, i + 1]` and the local parameter within it.
    fn segment(&self, time: f32, looping: bool) -> Option<(usize, f32, f32)> {
        let this_frame = self.frame_index(time, looping)?;
        if this_frame + 1 >= self.frames.len() {
            return None;
        }

        let next_frame = this_frame + 1;
        let track_time = self.adjust_time_to_fit_track(time, looping);
        let frame_delta = self.frames[next_frame].time - self.frames[this_frame].time;
        if frame_delta <= 0.0 {
            return None;
        }

        let t = (track_time - self.frames[this_frame].time) / frame_delta;
        Some((this_frame, t, frame_delta))
    }

    fn sample_linear(&self, time: f32, looping: bool) -> T {
        let Some((i, t, _)) = self.segment(time, looping) else {
            return T::zero();
        };

        let start = self.frames[i].value.renormalize();
        let end = self.frames[i + 1].value.renormalize();
        T::interpolate_linear(start, end, t)
    }

    fn sample_cubic(&self, time: f32, looping: bool) -> T {
        let Some((i, t, dt)) = self.segment(time, looping) else {
            return T::zero();
        };

        let this_frame = &self.frames[i];
        let next_frame = &self.frames[i + 1];

        T::interpolate_cubic(
            this_frame.value.renormalize(),
            this_frame.out_tangent,
            next_frame.in_tangent,
            next_frame.value.renormalize(),
            t,
            dt,
        )
    }
}

impl<T: Interpolatable> Index<usize> for KeyframeTrack<T> {
    type Output = Keyframe<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<T: Interpolatable> IndexMut<usize> for KeyframeTrack<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.frames[index]
    }
}

/// Wraps `time` into `[start, end)`.
///
/// Shared by tracks and clips so that both land on the same value at the
/// loop seam. Rounding can push a folded time onto `end` itself (a tiny
/// negative offset plus the duration); that lands on `start` instead.
#[inline]
pub(crate) fn wrap_time(time: f32, start: f32, end: f32) -> f32 {
    let duration = end - start;
    let mut local = (time - start) % duration;
    if local < 0.0 {
        local += duration;
    }
    if local >= duration {
        local = 0.0;
    }

    let wrapped = start + local;
    if wrapped >= end { start } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_time_folds_negative_offsets() {
        assert!((wrap_time(-0.5, 0.0, 2.0) - 1.5).abs() < 1e-6);
        assert!((wrap_time(5.5, 1.0, 3.0) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_time_never_returns_end() {
        assert_eq!(wrap_time(-1e-9, 0.0, 1.0), 0.0);
        let just_before = f32::from_bits(0.5_f32.to_bits() - 1);
        assert_eq!(wrap_time(just_before, 0.5, 1.5), 0.5);
        assert_eq!(wrap_time(3.0, 1.0, 3.0), 1.0);
    }

    #[test]
    fn zero_length_track_adjusts_to_zero() {
        let track = ScalarTrack::from_samples(&[2.0, 2.0], &[1.0, 3.0], InterpolationMode::Linear);
        assert_eq!(track.adjust_time_to_fit_track(7.0, true), 0.0);
        assert_eq!(track.adjust_time_to_fit_track(7.0, false), 0.0);
    }
}
