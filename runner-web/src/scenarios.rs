//! End-to-end scenarios through the full control loop
//!
//! Pose frames go in through the slot, ticks come from a fake 60Hz clock.

use crate::character::{CharacterController, CharacterMode, CharacterState, PhysicsConfig, RunCycleConfig};
use crate::control::{ControlLoop, FrameOutput, RunnerConfig};
use crate::gesture::{CalibrationState, GestureState};
use crate::pose::{BodyPart, Keypoint, PoseSample};

const FRAME_MS: f64 = 16.0;

fn pose(shoulder_y: f32) -> PoseSample {
    PoseSample::new(0.0)
        .with_keypoint(BodyPart::Nose, Keypoint::new(320.0, shoulder_y - 150.0, 0.95))
        .with_keypoint(BodyPart::LeftShoulder, Keypoint::new(260.0, shoulder_y, 0.9))
        .with_keypoint(BodyPart::RightShoulder, Keypoint::new(380.0, shoulder_y, 0.9))
}

/// Session driver with its own clock
struct Harness {
    session: ControlLoop,
    now: f64,
}

impl Harness {
    fn new(config: RunnerConfig) -> Self {
        let mut session = ControlLoop::new(config).unwrap();
        session.tick(0.0);
        Self { session, now: 0.0 }
    }

    fn frame(&mut self, sample: Option<PoseSample>) -> FrameOutput {
        match sample {
            Some(s) => self.session.publish_pose(s),
            None => self.session.clear_pose(),
        }
        self.now += FRAME_MS;
        self.session.tick(self.now)
    }

    /// Refresh without a new detection
    fn refresh(&mut self) -> FrameOutput {
        self.now += FRAME_MS;
        self.session.tick(self.now)
    }

    /// Stand at `shoulder_y` until calibrated
    fn calibrate(&mut self, shoulder_y: f32) {
        for _ in 0..1000 {
            if self.frame(Some(pose(shoulder_y))).calibration == CalibrationState::Calibrated {
                return;
            }
        }
        panic!("calibration never completed");
    }
}

fn quick_config() -> RunnerConfig {
    let mut config = RunnerConfig::default();
    config.calibration.delay_ms = 160.0;
    config
}

#[test]
fn scenario_a_jump_gesture_launches_character() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    assert!((h.session.baseline().reference_shoulder_y - 300.0).abs() < 1e-4);

    let first = h.frame(Some(pose(220.0)));
    assert_eq!(first.gesture, GestureState::Standing);
    assert_eq!(first.character.mode, CharacterMode::Running);

    let second = h.frame(Some(pose(220.0)));
    assert_eq!(second.gesture, GestureState::Jumping);
    assert_eq!(second.character.mode, CharacterMode::Jumping);
    assert_eq!(second.character.vertical_velocity, PhysicsConfig::default().jump_speed);
}

#[test]
fn scenario_b_gravity_step() {
    let mut c = CharacterController::from_state(
        PhysicsConfig::default(),
        RunCycleConfig::default(),
        CharacterState {
            mode: CharacterMode::Jumping,
            vertical_offset: 5.0,
            vertical_velocity: 0.01,
            ..CharacterState::default()
        },
    );
    let s = c.advance(GestureState::Standing, 40.0);
    assert!((s.vertical_offset - 5.4).abs() < 1e-4);
    assert!((s.vertical_velocity + 0.05).abs() < 1e-6);
}

#[test]
fn scenario_c_landing_clamps_to_ground() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(220.0)));
    h.frame(Some(pose(220.0)));

    let mut landed = None;
    for _ in 0..200 {
        let out = h.frame(Some(pose(300.0)));
        assert!(out.character.vertical_offset >= 0.0);
        if out.character.mode != CharacterMode::Jumping {
            landed = Some(out);
            break;
        }
    }
    let out = landed.expect("character never landed");
    assert_eq!(out.character.mode, CharacterMode::Running);
    assert_eq!(out.character.vertical_offset, 0.0);
    assert_eq!(out.character.vertical_velocity, 0.0);
}

#[test]
fn scenario_d_calibration_retries_after_dropout() {
    let mut h = Harness::new(quick_config());
    assert_eq!(h.frame(Some(pose(300.0))).calibration, CalibrationState::Calibrating);

    // Player walks out of frame through the capture time
    for _ in 0..20 {
        assert_eq!(h.frame(None).calibration, CalibrationState::Calibrating);
    }

    // Back in frame: a fresh delay must run before capture
    assert_eq!(h.frame(Some(pose(310.0))).calibration, CalibrationState::Calibrating);
    h.calibrate(310.0);
    assert!((h.session.baseline().reference_shoulder_y - 310.0).abs() < 1e-4);
}

#[test]
fn scenario_e_duck_while_airborne_applies_on_landing() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(200.0)));
    assert_eq!(h.frame(Some(pose(200.0))).character.mode, CharacterMode::Jumping);

    // Duck mid-air
    let mut out = h.frame(Some(pose(400.0)));
    for _ in 0..200 {
        if out.character.mode != CharacterMode::Jumping {
            break;
        }
        assert!(out.character.crouch_depth == 0.0);
        out = h.frame(Some(pose(400.0)));
    }
    assert_eq!(out.character.mode, CharacterMode::Ducking);
    assert_eq!(out.character.vertical_offset, 0.0);

    // Stand back up
    h.frame(Some(pose(300.0)));
    assert_eq!(h.frame(Some(pose(300.0))).character.mode, CharacterMode::Running);
}

#[test]
fn no_gestures_before_calibration() {
    let mut h = Harness::new(RunnerConfig::default());
    for _ in 0..100 {
        let out = h.frame(Some(pose(150.0)));
        assert_eq!(out.gesture, GestureState::Standing);
        assert_eq!(out.character.mode, CharacterMode::Running);
    }
    assert_eq!(h.session.calibration_state(), CalibrationState::Calibrating);
}

#[test]
fn calibration_survives_the_whole_round() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    for y in [200.0, 250.0, 380.0, 120.0, 300.0] {
        for _ in 0..30 {
            h.frame(Some(pose(y)));
        }
    }
    assert!((h.session.baseline().reference_shoulder_y - 300.0).abs() < 1e-4);
}

#[test]
fn single_frame_spike_does_not_jump() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(150.0)));
    for _ in 0..10 {
        let out = h.frame(Some(pose(300.0)));
        assert_eq!(out.character.mode, CharacterMode::Running);
    }
}

#[test]
fn tab_stall_cannot_launch_off_screen() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(220.0)));
    h.frame(Some(pose(220.0)));

    // Ten-second stall between two refreshes
    h.now += 10_000.0;
    let out = h.session.tick(h.now);
    assert_eq!(out.delta_ms, 100.0);
    assert!(out.character.vertical_offset <= 0.45 * 100.0 + 1e-3);
}

#[test]
fn restart_with_recalibration() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.session.mark_lost();
    assert_eq!(h.frame(Some(pose(300.0))).sprite.to_string(), "lose");

    h.session.restart_run(true);
    let out = h.frame(Some(pose(280.0)));
    assert_eq!(out.calibration, CalibrationState::Calibrating);
    assert_eq!(out.sprite.to_string(), "run-0");
    h.calibrate(280.0);
    assert!((h.session.baseline().reference_shoulder_y - 280.0).abs() < 1e-4);
}

#[test]
fn detector_dropout_holds_duck_briefly() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(390.0)));
    assert_eq!(h.frame(Some(pose(390.0))).character.mode, CharacterMode::Ducking);

    // One missing detection does not stand the character up
    assert_eq!(h.frame(None).character.mode, CharacterMode::Ducking);
    assert_eq!(h.frame(Some(pose(390.0))).character.mode, CharacterMode::Ducking);
}

#[test]
fn slow_detector_spike_does_not_jump() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);

    // Detector at ~20Hz: each detection is seen on three refreshes
    let out = h.frame(Some(pose(150.0)));
    assert_eq!(out.gesture, GestureState::Standing);
    for _ in 0..2 {
        assert_eq!(h.refresh().character.mode, CharacterMode::Running);
    }
    for _ in 0..3 {
        let out = h.frame(Some(pose(300.0)));
        assert_eq!(out.gesture, GestureState::Standing);
        assert_eq!(out.character.mode, CharacterMode::Running);
        h.refresh();
        h.refresh();
    }
}

#[test]
fn slow_detector_still_jumps_on_two_detections() {
    let mut h = Harness::new(quick_config());
    h.calibrate(300.0);
    h.frame(Some(pose(200.0)));
    h.refresh();
    h.refresh();
    let out = h.frame(Some(pose(200.0)));
    assert_eq!(out.gesture, GestureState::Jumping);
    assert_eq!(out.character.mode, CharacterMode::Jumping);
}

#[test]
fn dropout_hold_counts_detections_not_refreshes() {
    let mut config = quick_config();
    config.gesture.hold_limit_frames = 2;
    let mut h = Harness::new(config);
    h.calibrate(300.0);
    h.frame(Some(pose(390.0)));
    assert_eq!(h.frame(Some(pose(390.0))).character.mode, CharacterMode::Ducking);

    // One "no person" report followed by many refreshes
    h.frame(None);
    for _ in 0..20 {
        assert_eq!(h.refresh().character.mode, CharacterMode::Ducking);
    }
    h.frame(None);
    assert_eq!(h.frame(None).gesture, GestureState::Standing);
}
