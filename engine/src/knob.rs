//! Rotary dial geometry: linear rescaling between a knob's integer value
//! range and the angular sweep of the dial, pointer-bearing computation for
//! drags, and tick mark placement.

use std::f32::consts::PI;

use wasm_bindgen::prelude::*;

pub const DEFAULT_DEGREES: f32 = 270.;

/// Linear rescale of `value` from `[old_min, old_max]` to `[new_min, new_max]`.
/// A degenerate source range maps everything to `new_min`.
pub fn convert_range(old_min: f32, old_max: f32, new_min: f32, new_max: f32, value: f32) -> f32 {
  if old_max == old_min {
    return new_min;
  }
  ((value - old_min) * (new_max - new_min)) / (old_max - old_min) + new_min
}

/// Static geometry of one dial: its integer value range and the arc it sweeps,
/// centered on the dial.  `min == max` yields a fixed dial: the indicator pins
/// to the start angle and every drag sample returns `min`.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct KnobShape {
  min: i32,
  max: i32,
  degrees: f32,
}

#[wasm_bindgen]
impl KnobShape {
  #[wasm_bindgen(constructor)]
  pub fn new(min: i32, max: i32, degrees: f32) -> KnobShape { KnobShape { min, max, degrees } }

  pub fn with_default_sweep(min: i32, max: i32) -> KnobShape {
    KnobShape::new(min, max, DEFAULT_DEGREES)
  }

  pub fn start_angle(&self) -> f32 { (360. - self.degrees) / 2. }

  pub fn end_angle(&self) -> f32 { self.start_angle() + self.degrees }

  /// Rotation of the inner indicator, in whole degrees, for `value`
  pub fn rotation_for_value(&self, value: i32) -> i32 {
    convert_range(
      self.min as f32,
      self.max as f32,
      self.start_angle(),
      self.end_angle(),
      value as f32,
    )
    .floor() as i32
  }

  /// Full 0-360° bearing of the pointer around the dial center, clamped to
  /// the sweep.  The arctangent only covers half the circle, so a quadrant
  /// correction of 90° applies left of center and 270° right of it.
  pub fn pointer_bearing(&self, pointer_x: f32, pointer_y: f32, center_x: f32, center_y: f32) -> f32 {
    let dx = pointer_x - center_x;
    let dy = pointer_y - center_y;
    let mut deg = (dy / dx).atan() * 180. / PI;
    if dx < 0. {
      deg += 90.;
    } else {
      deg += 270.;
    }
    deg.max(self.start_angle()).min(self.end_angle())
  }

  /// Integer value for a bearing; bearings outside the sweep clamp to the
  /// nearer end of the range
  pub fn value_for_bearing(&self, bearing: f32) -> i32 {
    let clamped = bearing.max(self.start_angle()).min(self.end_angle());
    convert_range(
      self.start_angle(),
      self.end_angle(),
      self.min as f32,
      self.max as f32,
      clamped,
    )
    .floor() as i32
  }

  pub fn value_from_pointer(
    &self,
    pointer_x: f32,
    pointer_y: f32,
    center_x: f32,
    center_y: f32,
  ) -> i32 {
    self.value_for_bearing(self.pointer_bearing(pointer_x, pointer_y, center_x, center_y))
  }

  /// Tick mark angles, evenly spaced at `degrees / num_ticks` intervals from
  /// the start angle to the end angle inclusive.  Purely visual.
  pub fn tick_angles(&self, num_ticks: u32) -> Vec<f32> {
    if num_ticks == 0 {
      return Vec::new();
    }
    let incr = self.degrees / num_ticks as f32;
    let mut angles = Vec::new();
    let mut deg = self.start_angle();
    while deg <= self.end_angle() {
      angles.push(deg);
      deg += incr;
    }
    angles
  }
}

/// One in-progress drag gesture, created at pointer-down and consumed at
/// pointer-release.  The JS caller binds its transient move listener to this
/// object's lifetime, so releasing the drag tears the listener down with it
/// and repeated gestures can't accumulate listeners.
#[wasm_bindgen]
pub struct KnobDrag {
  shape: KnobShape,
  center_x: f32,
  center_y: f32,
}

#[wasm_bindgen]
impl KnobDrag {
  /// Starts a drag from a pointer-down at the dial whose center is at
  /// (`center_x`, `center_y`).  Disabled knobs never start a drag; `None`
  /// surfaces as `null` on the JS side.
  pub fn begin(shape: &KnobShape, center_x: f32, center_y: f32, disabled: bool) -> Option<KnobDrag> {
    if disabled {
      return None;
    }
    Some(KnobDrag {
      shape: *shape,
      center_x,
      center_y,
    })
  }

  /// Value under the current pointer position; called on every pointer-move
  /// while the drag is held.
  pub fn sample(&self, pointer_x: f32, pointer_y: f32) -> i32 {
    self
      .shape
      .value_from_pointer(pointer_x, pointer_y, self.center_x, self.center_y)
  }

  /// Ends the gesture on pointer-release, consuming the wasm-side state.
  pub fn end(self) {}
}

#[test]
fn test_value_angle_round_trip() {
  for (min, max) in [(0, 127), (0, 8), (0, 31), (10, 30), (0, 118), (-5, 5)] {
    for degrees in [270., 180., 300.] {
      let shape = KnobShape::new(min, max, degrees);
      for value in min..=max {
        let angle = shape.rotation_for_value(value);
        let back = shape.value_for_bearing(angle as f32);
        assert!(
          (back - value).abs() <= 1,
          "value {} -> angle {} -> value {} (range [{}, {}], {}°)",
          value,
          angle,
          back,
          min,
          max,
          degrees
        );
      }
    }
  }
}

#[test]
fn test_bearings_outside_sweep_clamp_to_range_ends() {
  let shape = KnobShape::with_default_sweep(0, 127);
  assert_eq!(shape.start_angle(), 45.);
  assert_eq!(shape.end_angle(), 315.);

  for bearing in [0., 10., 44.9] {
    assert_eq!(shape.value_for_bearing(bearing), 0);
  }
  for bearing in [315.1, 340., 360.] {
    assert_eq!(shape.value_for_bearing(bearing), 127);
  }
  assert_eq!(shape.value_for_bearing(315.), 127);
  assert_eq!(shape.value_for_bearing(45.), 0);
}

#[test]
fn test_pointer_bearing_quadrants() {
  let shape = KnobShape::new(0, 270, 270.);

  // left of center -> 90°, which rescales to 45 on a [0, 270] knob
  assert_eq!(shape.pointer_bearing(-10., 0., 0., 0.), 90.);
  assert_eq!(shape.value_from_pointer(-10., 0., 0., 0.), 45);
  // above center -> 180°
  assert!((shape.pointer_bearing(0.001, -10., 0., 0.) - 180.).abs() < 0.01);
  // right of center -> 270°
  assert_eq!(shape.pointer_bearing(10., 0., 0., 0.), 270.);
  // below-left and below-right straddle the dead zone at the bottom of the
  // dial and clamp to the respective sweep ends
  assert_eq!(shape.pointer_bearing(-0.001, 10., 0., 0.), 45.);
  assert_eq!(shape.pointer_bearing(0.001, 10., 0., 0.), 315.);
}

#[test]
fn test_degenerate_range_is_fixed_dial() {
  let shape = KnobShape::with_default_sweep(4, 4);
  assert_eq!(shape.rotation_for_value(4), 45);
  for bearing in [0., 45., 180., 315., 360.] {
    assert_eq!(shape.value_for_bearing(bearing), 4);
  }

  let drag = KnobDrag::begin(&shape, 100., 100., false).unwrap();
  assert_eq!(drag.sample(55., 192.), 4);
}

#[test]
fn test_disabled_knob_ignores_pointer_down() {
  let shape = KnobShape::with_default_sweep(0, 127);
  assert!(KnobDrag::begin(&shape, 100., 100., true).is_none());
}

#[test]
fn test_drag_samples_track_pointer() {
  let shape = KnobShape::with_default_sweep(0, 127);
  let drag = KnobDrag::begin(&shape, 100., 100., false).unwrap();

  // far left of center -> bearing 90°
  let left = drag.sample(0., 100.);
  // far right of center -> bearing 270°
  let right = drag.sample(200., 100.);
  assert!(left < right);
  assert_eq!(left, shape.value_for_bearing(90.));
  assert_eq!(right, shape.value_for_bearing(270.));

  drag.end();
}

#[test]
fn test_tick_angles() {
  let shape = KnobShape::with_default_sweep(0, 127);
  let ticks = shape.tick_angles(10);
  assert_eq!(ticks.len(), 11);
  assert_eq!(ticks[0], 45.);
  assert_eq!(*ticks.last().unwrap(), 315.);
  for pair in ticks.windows(2) {
    assert!((pair[1] - pair[0] - 27.).abs() < 1e-3);
  }

  assert!(shape.tick_angles(0).is_empty());
}
