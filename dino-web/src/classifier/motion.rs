//! Fallback motion detector
//!
//! Used only when the landmark model failed to load. It compares consecutive
//! RGBA frames and, when enough pixels changed, occasionally picks a random
//! pose. The output is intentionally coarse and non-deterministic.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::pose::{Pose, POSES};
use crate::config::ClassifierConfig;

/// Fraction of pixels whose summed RGB delta exceeds `pixel_threshold`.
///
/// Both frames must be RGBA and the same length; alpha is ignored.
pub fn frame_difference(previous: &[u8], current: &[u8], pixel_threshold: u32) -> f32 {
    let pixels = previous.len().min(current.len()) / 4;
    if pixels == 0 {
        return 0.0;
    }

    let moving = previous
        .chunks_exact(4)
        .zip(current.chunks_exact(4))
        .filter(|(a, b)| {
            let delta = (a[0] as i32 - b[0] as i32).unsigned_abs()
                + (a[1] as i32 - b[1] as i32).unsigned_abs()
                + (a[2] as i32 - b[2] as i32).unsigned_abs();
            delta > pixel_threshold
        })
        .count();

    moving as f32 / pixels as f32
}

pub struct MotionDetector {
    last_frame: Option<(u32, u32, Vec<u8>)>,
    pixel_threshold: u32,
    ratio_threshold: f32,
    trigger_probability: f32,
    rng: SmallRng,
    last_motion: f32,
}

impl MotionDetector {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            last_frame: None,
            pixel_threshold: config.motion_pixel_threshold,
            ratio_threshold: config.motion_ratio_threshold,
            trigger_probability: config.motion_trigger_probability,
            rng: SmallRng::seed_from_u64(config.seed),
            last_motion: 0.0,
        }
    }

    /// Feed one RGBA frame; returns a candidate pose when motion fired.
    ///
    /// A frame whose buffer does not match `width * height * 4` is dropped and
    /// clears the stored frame.
    pub fn observe(&mut self, rgba: &[u8], width: u32, height: u32) -> Option<Pose> {
        if rgba.len() != width as usize * height as usize * 4 || rgba.is_empty() {
            self.last_frame = None;
            self.last_motion = 0.0;
            return None;
        }

        let motion = match &self.last_frame {
            Some((w, h, previous)) if *w == width && *h == height => {
                frame_difference(previous, rgba, self.pixel_threshold)
            }
            _ => 0.0,
        };
        self.last_motion = motion;

        // Reuse the stored allocation when the size is unchanged
        match &mut self.last_frame {
            Some((w, h, buffer)) if *w == width && *h == height => buffer.copy_from_slice(rgba),
            slot => *slot = Some((width, height, rgba.to_vec())),
        }

        let trigger_roll: f32 = self.rng.gen();
        let pose_index = self.rng.gen_range(0..POSES.len());
        self.decide(motion, trigger_roll, pose_index)
    }

    /// Pure decision step: motion must exceed the threshold and the roll must
    /// land under the trigger probability.
    pub fn decide(&self, motion: f32, trigger_roll: f32, pose_index: usize) -> Option<Pose> {
        if motion > self.ratio_threshold && trigger_roll < self.trigger_probability {
            POSES.get(pose_index).copied()
        } else {
            None
        }
    }

    pub fn last_motion(&self) -> f32 {
        self.last_motion
    }

    pub fn clear(&mut self) {
        self.last_frame = None;
        self.last_motion = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(pixels: usize, value: u8) -> Vec<u8> {
        let mut frame = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            frame.extend_from_slice(&[value, value, value, 255]);
        }
        frame
    }

    #[test]
    fn test_frame_difference_ratio() {
        let a = solid_frame(4, 0);
        let mut b = a.clone();
        // One pixel moves by 40 total, one by exactly 30 (not counted)
        b[0] = 40;
        b[4] = 10;
        b[5] = 10;
        b[6] = 10;
        assert_eq!(frame_difference(&a, &b, 30), 0.25);
        assert_eq!(frame_difference(&a, &a, 30), 0.0);
    }

    #[test]
    fn test_decide_requires_motion_and_roll() {
        let detector = MotionDetector::new(&ClassifierConfig::default());
        assert_eq!(detector.decide(0.05, 0.0, 0), None);
        assert_eq!(detector.decide(0.5, 0.5, 0), None);
        assert_eq!(detector.decide(0.5, 0.05, 1), Some(Pose::Duck));
    }

    #[test]
    fn test_still_frames_never_fire() {
        let mut detector = MotionDetector::new(&ClassifierConfig::default());
        let frame = solid_frame(16, 90);
        for _ in 0..500 {
            assert_eq!(detector.observe(&frame, 4, 4), None);
        }
    }

    #[test]
    fn test_motion_fires_rarely() {
        let mut detector = MotionDetector::new(&ClassifierConfig::default());
        let dark = solid_frame(16, 0);
        let bright = solid_frame(16, 200);
        let mut fired = 0;
        for i in 0..2000 {
            let frame = if i % 2 == 0 { &dark } else { &bright };
            if detector.observe(frame, 4, 4).is_some() {
                fired += 1;
            }
        }
        assert!(fired > 0);
        assert!(fired < 1000, "fired {fired} times");
        assert_eq!(detector.last_motion(), 1.0);
    }

    #[test]
    fn test_size_mismatch_resets() {
        let mut detector = MotionDetector::new(&ClassifierConfig::default());
        detector.observe(&solid_frame(16, 0), 4, 4);
        assert_eq!(detector.observe(&solid_frame(4, 200), 4, 4), None);
        assert_eq!(detector.last_motion(), 0.0);
    }
}
