use crate::animation::tracks::wrap_time;
use crate::animation::transform_track::TransformTrack;
use crate::scene::pose::Pose;

/// A named animation: one [`TransformTrack`] per animated joint.
///
/// The playable range `[start_time, end_time]` is derived from the tracks and
/// is *not* kept up to date automatically. Call
/// [`recalculate_duration`](Self::recalculate_duration) after adding or
/// editing tracks.
#[derive(Debug, Clone)]
pub struct Clip {
    name: String,
    tracks: Vec<TransformTrack>,
    start_time: f32,
    end_time: f32,
    looping: bool,
}

impl Default for Clip {
    fn default() -> Self {
        Self {
            name: String::new(),
            tracks: Vec::new(),
            start_time: 0.0,
            end_time: 0.0,
            looping: true,
        }
    }
}

impl Clip {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    /// Number of joint tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn tracks(&self) -> &[TransformTrack] {
        &self.tracks
    }

    /// Joint id of the track stored at `index`.
    #[must_use]
    pub fn id_at_index(&self, index: usize) -> u32 {
        self.tracks[index].id()
    }

    pub fn set_id_at_index(&mut self, index: usize, id: u32) {
        self.tracks[index].set_id(id);
    }

    /// Existing track for `joint`, if any.
    #[must_use]
    pub fn track(&self, joint: u32) -> Option<&TransformTrack> {
        self.tracks.iter().find(|t| t.id() == joint)
    }

    /// Track for `joint`, created empty on first access.
    pub fn track_mut(&mut self, joint: u32) -> &mut TransformTrack {
        let index = match self.tracks.iter().position(|t| t.id() == joint) {
            Some(index) => index,
            None => {
                self.tracks.push(TransformTrack::new(joint));
                self.tracks.len() - 1
            }
        };
        &mut self.tracks[index]
    }

    /// Samples the clip into `pose` and returns the time actually used.
    ///
    /// Each track reads its joint's current local transform as the fallback
    /// for channels it does not animate. A clip with zero duration leaves the
    /// pose untouched and returns 0.
    pub fn sample(&self, pose: &mut Pose, time: f32) -> f32 {
        self.sample_with_looping(pose, time, self.looping)
    }

    /// [`sample`](Self::sample) with an explicit loop flag instead of the
    /// clip's own.
    pub fn sample_with_looping(&self, pose: &mut Pose, time: f32, looping: bool) -> f32 {
        if self.duration() == 0.0 {
            return 0.0;
        }

        let time = self.adjust_time_to_fit_range(time, looping);

        for track in &self.tracks {
            let joint = track.id() as usize;
            let local = pose.local_transform(joint);
            let animated = track.sample(&local, time, looping);
            pose.set_local_transform(joint, animated);
        }

        time
    }

    fn adjust_time_to_fit_range(&self, time: f32, looping: bool) -> f32 {
        if looping {
            let duration = self.duration();
            if duration <= 0.0 {
                return 0.0;
            }
            wrap_time(time, self.start_time, self.end_time)
        } else {
            time.max(self.start_time).min(self.end_time)
        }
    }

    /// Recomputes `[start_time, end_time]` from the valid tracks.
    ///
    /// The first valid track sets the range, later ones can only widen it.
    /// Without any valid track the range collapses to `[0, 0]`.
    pub fn recalculate_duration(&mut self) {
        self.start_time = 0.0;
        self.end_time = 0.0;

        let mut is_set = false;
        for track in self.tracks.iter().filter(|t| t.is_valid()) {
            let track_start = track.start_time();
            let track_end = track.end_time();

            if !is_set {
                self.start_time = track_start;
                self.end_time = track_end;
                is_set = true;
                continue;
            }

            if track_start < self.start_time {
                self.start_time = track_start;
            }
            if track_end > self.end_time {
                self.end_time = track_end;
            }
        }
    }
}
