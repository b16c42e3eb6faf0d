//! Part offsets derived from the pose history.

use glam::Vec3;
use world::direction_deg;

use super::part::{PART_COUNT, TAIL_SEGMENTS};
use crate::error::SimResult;
use crate::history::SegmentHistory;

/// Lookback of the reference sample the body is posed from.
pub const BASE_LOOKBACK: usize = 5;

/// Lookback compared against the base sample to pitch head and tail.
pub const PITCH_LOOKBACK: usize = 10;

/// Lookback of the first tail segment; each further segment adds two.
pub const TAIL_LOOKBACK: usize = 12;

const HEAD_DISTANCE: f32 = 6.5;
const NECK_DISTANCE: f32 = 5.5;
const WING_DISTANCE: f32 = 4.5;
const WING_HEIGHT: f32 = 2.0;
const TAIL_BASE_DISTANCE: f32 = 1.5;

/// Computes every part's offset from the dragon, in `PartKind::ALL` order.
///
/// `yaw` is the current facing in degrees. `ducking` lowers the head by one
/// block, used while sitting or hovering.
pub fn part_offsets(
    history: &SegmentHistory,
    yaw: f32,
    ducking: bool,
) -> SimResult<[Vec3; PART_COUNT]> {
    let facing = direction_deg(yaw);
    let base = history.get(BASE_LOOKBACK)?;
    let pitch = (10.0 * (base.y - history.get(PITCH_LOOKBACK)?.y)).to_radians();
    let (pitch_y, pitch_xz) = pitch.sin_cos();

    let duck = if ducking {
        -1.0
    } else {
        base.y - history.get(0)?.y
    };

    let raised = (facing + Vec3::Y * pitch_y) * Vec3::new(pitch_xz, 1.0, -pitch_xz);
    let head = raised * HEAD_DISTANCE + Vec3::Y * duck;
    let neck = raised * NECK_DISTANCE + Vec3::Y * duck;
    let body = facing * Vec3::new(0.5, 0.0, -0.5);

    let right_wing = direction_deg(90.0 - yaw) * WING_DISTANCE + Vec3::Y * WING_HEIGHT;
    // mirrored horizontally
    let left_wing = right_wing * Vec3::new(-1.0, 1.0, -1.0);

    let tail_base = facing * TAIL_BASE_DISTANCE;
    let mut tail = [Vec3::ZERO; TAIL_SEGMENTS];
    for (i, slot) in tail.iter_mut().enumerate() {
        let distance = (i + 1) as f32 * 2.0;
        let target = history.get(TAIL_LOOKBACK + 2 * i)?;
        // curls the tail when turning
        let angle = yaw + target.yaw - base.yaw;
        let y_offset = target.y - base.y - (distance + 1.5) * pitch_y + 1.5;
        *slot = (direction_deg(angle) * distance + tail_base) * Vec3::new(-pitch_xz, 1.0, pitch_xz)
            + Vec3::Y * y_offset;
    }

    Ok([
        head, neck, body, left_wing, right_wing, tail[0], tail[1], tail[2],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::history::Segment;
    use std::num::NonZeroUsize;

    fn still(yaw: f32, y: f32) -> SegmentHistory {
        SegmentHistory::filled(NonZeroUsize::new(19).unwrap(), Segment::new(yaw, y))
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn stationary_pose_is_axis_aligned() {
        let offsets = part_offsets(&still(0.0, 70.0), 0.0, false).unwrap();
        assert_close(offsets[0], Vec3::new(0.0, 0.0, -6.5));
        assert_close(offsets[1], Vec3::new(0.0, 0.0, -5.5));
        assert_close(offsets[2], Vec3::new(0.0, 0.0, -0.5));
        assert_close(offsets[3], Vec3::new(-4.5, 2.0, 0.0));
        assert_close(offsets[4], Vec3::new(4.5, 2.0, 0.0));
        assert_close(offsets[5], Vec3::new(0.0, 1.5, 3.5));
        assert_close(offsets[6], Vec3::new(0.0, 1.5, 5.5));
        assert_close(offsets[7], Vec3::new(0.0, 1.5, 7.5));
    }

    #[test]
    fn ducking_lowers_head_and_neck() {
        let history = still(0.0, 70.0);
        let upright = part_offsets(&history, 0.0, false).unwrap();
        let ducked = part_offsets(&history, 0.0, true).unwrap();
        assert_close(ducked[0], upright[0] - Vec3::Y);
        assert_close(ducked[1], upright[1] - Vec3::Y);
        assert_close(ducked[2], upright[2]);
    }

    #[test]
    fn climbing_pitches_head_up() {
        let mut history = still(0.0, 60.0);
        for i in 0..19 {
            history.push(Segment::new(0.0, 60.0 + i as f32 * 0.1));
        }
        let offsets = part_offsets(&history, 0.0, false).unwrap();
        let level = part_offsets(&still(0.0, 60.0), 0.0, false).unwrap();
        // Rising: the base sample sits above the pitch sample.
        assert!(offsets[0].y > level[0].y);
        assert!(offsets[5].y < level[5].y);
    }

    #[test]
    fn turning_curls_tail() {
        let mut history = still(0.0, 64.0);
        for i in 0..19 {
            history.push(Segment::new(i as f32 * 5.0, 64.0));
        }
        let offsets = part_offsets(&history, 90.0, false).unwrap();
        let straight = part_offsets(&still(90.0, 64.0), 90.0, false).unwrap();
        assert!((offsets[7] - straight[7]).length() > 0.1);
    }

    #[test]
    fn short_history_is_rejected() {
        let history = SegmentHistory::filled(NonZeroUsize::new(8).unwrap(), Segment::default());
        assert!(matches!(
            part_offsets(&history, 0.0, false),
            Err(SimError::LookbackOutOfRange { .. })
        ));
    }
}
