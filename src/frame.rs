//! Turns one instant of time into a list of draw primitives.
//!
//! This is the pass that decides what the pure geometry becomes: leaf points,
//! branch lines, clock hands or tick marks. Primitives are emitted in surface
//! pixels in a fixed order: clear, leaf points, hands, branches, face ticks.

use crate::clock_face::ClockFace;
use crate::color::ColorScheme;
use crate::constants::{
    BRANCH_STROKE, HOUR_HAND_STROKE, HOUR_TICK_STROKE, MINUTE_HAND_STROKE, MINUTE_TICK_STROKE,
    SECOND_HAND_STROKE,
};
use crate::fractal::{Fork, FractalGeometry, FrameContext, Layout};
use crate::rotation::{apply_tick, BranchRatio, RotationState};
use crate::settings::{Hand, Settings};
use crate::types::{HandEndpoints, PackedColor, Vector2};

/// A single drawing instruction in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Fill the whole surface
    Clear(PackedColor),
    /// A dot of diameter `width`
    Point {
        /// Center of the dot
        at: Vector2,
        /// Fill color
        color: PackedColor,
        /// Stroke width in pixels
        width: f32,
    },
    /// A straight line
    Line {
        /// Start point
        from: Vector2,
        /// End point
        to: Vector2,
        /// Stroke color
        color: PackedColor,
        /// Stroke width in pixels
        width: f32,
    },
}

/// Representative colors of a frame, for hosts that tint their chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    /// The current glow color
    pub primary: PackedColor,
    /// The clock face color
    pub secondary: PackedColor,
    /// The background color
    pub tertiary: PackedColor,
}

/// Hand endpoints captured from the top fork, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HandCapture {
    /// Root of the tree
    pub base: Vector2,
    /// Tip per active hand
    pub tips: Vec<(Hand, Vector2)>,
}

impl HandCapture {
    fn from_fork(fork: &Fork, layout: &Layout) -> Self {
        Self {
            base: layout.to_surface(fork.base),
            tips: fork
                .tips
                .iter()
                .map(|&(hand, tip)| (hand, layout.to_surface(tip)))
                .collect(),
        }
    }

    /// Writes the captured positions into `endpoints`; inactive hands are left alone.
    pub fn apply_to(&self, endpoints: &mut HandEndpoints) {
        endpoints.base = self.base;
        for &(hand, tip) in &self.tips {
            match hand {
                Hand::Hour => endpoints.hour = tip,
                Hand::Minute => endpoints.minute = tip,
                Hand::Second => endpoints.second = tip,
            }
        }
    }

    fn tip(&self, hand: Hand) -> Option<Vector2> {
        self.tips
            .iter()
            .find(|(h, _)| *h == hand)
            .map(|(_, tip)| *tip)
    }
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Draw calls in painting order
    pub primitives: Vec<Primitive>,
    /// Whether sinks should anti-alias
    pub anti_alias: bool,
    /// Captured hands, when the clock overlay is on and the tree has a fork
    pub hands: Option<HandCapture>,
    /// The palette used for this frame
    pub colors: ColorScheme,
    /// Summary colors for the host
    pub theme: ThemeColors,
}

impl Frame {
    /// Number of leaf points in the frame.
    pub fn point_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Point { .. }))
            .count()
    }

    /// Number of lines in the frame (hands, branches and ticks).
    pub fn line_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .count()
    }
}

/// Surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl SurfaceSize {
    /// Creates a size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Builds the frame for `elapsed` seconds since midnight.
///
/// `face` must have been built for the same size and settings; it is only
/// painted while the clock overlay is on.
pub fn compose_frame(
    settings: &Settings,
    size: SurfaceSize,
    elapsed: f64,
    face: &ClockFace,
) -> Frame {
    let iteration_count = settings.iteration_count();
    let top_depth = iteration_count - 1;
    let ratios = BranchRatio::STANDARD;
    let layout = Layout::new(size.width, size.height, settings.scaling_factor, &ratios);

    let rotation = RotationState::from_elapsed(elapsed, settings.use_tick);
    // Colors tick with the hands.
    let palette_time = if settings.use_tick {
        apply_tick(elapsed)
    } else {
        elapsed
    };
    let colors = ColorScheme::generate(
        palette_time as f32,
        iteration_count,
        settings.draw_clock,
        settings.clock_face_color,
    );
    let ctx = FrameContext::new(rotation, settings.clock_type);
    let geometry = FractalGeometry::generate(layout.center, layout.trunk(), top_depth, &ctx);

    let hands = match (&geometry.top, settings.draw_clock) {
        (Some(fork), true) => Some(HandCapture::from_fork(fork, &layout)),
        _ => None,
    };

    let mut primitives = Vec::with_capacity(1 + geometry.leaves.len() + geometry.branches.len());
    primitives.push(Primitive::Clear(settings.background_color));

    let point_width = 1.0 / layout.scaling_factor;
    primitives.extend(geometry.leaves.iter().map(|&leaf| Primitive::Point {
        at: layout.to_surface(leaf),
        color: colors.glow(),
        width: point_width,
    }));

    if let Some(capture) = &hands {
        push_hands(&mut primitives, capture, settings.clock_face_color);
    }

    if settings.draw_branches {
        let mut push_branch = |from: Vector2, to: Vector2, depth: usize| {
            primitives.push(Primitive::Line {
                from: layout.to_surface(from),
                to: layout.to_surface(to),
                color: colors.at(depth),
                width: BRANCH_STROKE,
            });
        };
        for branch in &geometry.branches {
            push_branch(branch.from, branch.to, branch.depth);
        }
        // With the overlay on, the top fork is drawn as hands instead.
        if !settings.draw_clock {
            for branch in geometry.top_segments(top_depth) {
                push_branch(branch.from, branch.to, branch.depth);
            }
        }
    }

    if settings.draw_clock {
        push_face(&mut primitives, face, &layout);
    }

    let theme = ThemeColors {
        primary: colors.glow(),
        secondary: settings.clock_face_color,
        tertiary: settings.background_color,
    };

    Frame {
        primitives,
        anti_alias: settings.anti_aliasing,
        hands,
        colors,
        theme,
    }
}

fn push_hands(primitives: &mut Vec<Primitive>, capture: &HandCapture, color: PackedColor) {
    let strokes = [
        (Hand::Hour, HOUR_HAND_STROKE),
        (Hand::Minute, MINUTE_HAND_STROKE),
        (Hand::Second, SECOND_HAND_STROKE),
    ];
    for (hand, width) in strokes {
        if let Some(tip) = capture.tip(hand) {
            primitives.push(Primitive::Line {
                from: capture.base,
                to: tip,
                color,
                width,
            });
        }
    }
}

fn push_face(primitives: &mut Vec<Primitive>, face: &ClockFace, layout: &Layout) {
    let groups = [
        (&face.hour_marks, HOUR_TICK_STROKE),
        (&face.minute_marks, MINUTE_TICK_STROKE),
    ];
    for (marks, width) in groups {
        primitives.extend(marks.iter().map(|mark| Primitive::Line {
            from: layout.to_surface(mark.inner.position),
            to: layout.to_surface(mark.outer.position),
            color: mark.inner.color,
            width,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock_face::FaceKey;
    use crate::settings::ClockType;

    const SIZE: SurfaceSize = SurfaceSize::new(800.0, 600.0);

    fn face_for(settings: &Settings) -> ClockFace {
        ClockFace::build(&FaceKey {
            width: SIZE.width,
            height: SIZE.height,
            scaling_factor: settings.scaling_factor,
            color: settings.clock_face_color,
        })
    }

    fn compose(settings: &Settings, elapsed: f64) -> Frame {
        compose_frame(settings, SIZE, elapsed, &face_for(settings))
    }

    #[test]
    fn frame_starts_with_clear() {
        let settings = Settings::default();
        let frame = compose(&settings, 1000.0);
        assert_eq!(frame.primitives[0], Primitive::Clear(settings.background_color));
    }

    #[test]
    fn primitive_order_is_points_hands_branches_ticks() {
        let settings = Settings {
            clock_type: ClockType::HourMinute,
            max_iterations: 5,
            ..Settings::default()
        };
        let frame = compose(&settings, 1000.0);
        let kinds: Vec<u8> = frame.primitives[1..]
            .iter()
            .map(|p| match p {
                Primitive::Clear(_) => 0,
                Primitive::Point { .. } => 1,
                Primitive::Line { width, .. } if *width == BRANCH_STROKE => 3,
                Primitive::Line { .. } => 2,
            })
            .collect();
        // 16 points, 2 hands, 28 branches, 60 ticks (minute ticks share the branch width)
        assert_eq!(frame.point_count(), 16);
        assert!(kinds[..16].iter().all(|&k| k == 1));
        assert!(kinds[16..18].iter().all(|&k| k == 2));
        assert!(kinds[18..46].iter().all(|&k| k == 3));
        assert_eq!(kinds.len(), 16 + 2 + 28 + 60);
    }

    #[test]
    fn overlay_replaces_top_fork_with_hands() {
        let settings = Settings {
            clock_type: ClockType::HourMinuteSecond,
            max_iterations: 7,
            ..Settings::default()
        };
        let with_clock = compose(&settings, 5000.0);
        // 4 levels: 27 leaves, 3 hands, 9 + 27 branches below the fork, 60 ticks
        assert_eq!(with_clock.point_count(), 27);
        assert_eq!(with_clock.line_count(), 3 + 36 + 60);
        assert!(with_clock.hands.is_some());

        let without_clock = compose(
            &Settings {
                draw_clock: false,
                ..settings.clone()
            },
            5000.0,
        );
        // top fork drawn as branches, no hands or ticks
        assert_eq!(without_clock.line_count(), 3 + 36);
        assert!(without_clock.hands.is_none());
    }

    #[test]
    fn branches_can_be_hidden() {
        let settings = Settings {
            draw_branches: false,
            draw_clock: false,
            clock_type: ClockType::MinuteSecond,
            max_iterations: 4,
            ..Settings::default()
        };
        let frame = compose(&settings, 10.0);
        assert_eq!(frame.line_count(), 0);
        assert_eq!(frame.point_count(), 8);
    }

    #[test]
    fn captured_hands_at_midnight() {
        let settings = Settings {
            clock_type: ClockType::HourMinuteSecond,
            ..Settings::default()
        };
        let frame = compose(&settings, 0.0);
        let capture = frame.hands.expect("hands captured");
        assert_eq!(capture.base, Vector2::new(400.0, 300.0));

        let mut endpoints = HandEndpoints::default();
        capture.apply_to(&mut endpoints);
        let layout = Layout::new(800.0, 600.0, settings.scaling_factor, &BranchRatio::STANDARD);
        let trunk = layout.start_magnitude / settings.scaling_factor;
        assert!((endpoints.hour.y - (300.0 - trunk * 0.5)).abs() < 1e-2);
        assert!((endpoints.hour.x - 400.0).abs() < 1e-3);
        assert!((endpoints.second.y - endpoints.minute.y).abs() < 1e-3);
    }

    #[test]
    fn inactive_hand_keeps_previous_endpoint() {
        let settings = Settings {
            clock_type: ClockType::HourMinute,
            ..Settings::default()
        };
        let frame = compose(&settings, 0.0);
        let stale = Vector2::new(-1.0, -1.0);
        let mut endpoints = HandEndpoints {
            second: stale,
            ..HandEndpoints::default()
        };
        frame.hands.expect("hands").apply_to(&mut endpoints);
        assert_eq!(endpoints.second, stale);
    }

    #[test]
    fn single_iteration_is_one_point() {
        let settings = Settings {
            max_iterations: 0,
            clock_type: ClockType::HourMinute,
            draw_clock: false,
            ..Settings::default()
        };
        let frame = compose(&settings, 100.0);
        assert_eq!(frame.point_count(), 1);
        assert_eq!(frame.line_count(), 0);
        assert!(frame.hands.is_none());
    }

    #[test]
    fn zero_sized_surface_still_composes() {
        let settings = Settings::default();
        let face = ClockFace::build(&FaceKey {
            width: 0.0,
            height: 0.0,
            scaling_factor: settings.scaling_factor,
            color: settings.clock_face_color,
        });
        let frame = compose_frame(&settings, SurfaceSize::new(0.0, 0.0), 100.0, &face);
        assert_eq!(frame.point_count(), 3usize.pow(8));
    }

    fn lines(frame: &Frame) -> Vec<Primitive> {
        frame
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
            .copied()
            .collect()
    }

    #[test]
    fn branch_lines_take_the_color_of_their_depth() {
        let settings = Settings {
            clock_type: ClockType::HourMinuteSecond,
            max_iterations: 7,
            draw_clock: false,
            ..Settings::default()
        };
        let elapsed = 12_345.6;
        let frame = compose(&settings, elapsed);

        let top_depth = settings.iteration_count() - 1;
        let layout = Layout::new(
            SIZE.width,
            SIZE.height,
            settings.scaling_factor,
            &BranchRatio::STANDARD,
        );
        let ctx = FrameContext::new(
            RotationState::from_elapsed(elapsed, false),
            settings.clock_type,
        );
        let geometry = FractalGeometry::generate(layout.center, layout.trunk(), top_depth, &ctx);
        let expected: Vec<Primitive> = geometry
            .branches
            .iter()
            .copied()
            .chain(geometry.top_segments(top_depth))
            .map(|segment| Primitive::Line {
                from: layout.to_surface(segment.from),
                to: layout.to_surface(segment.to),
                color: frame.colors.at(segment.depth),
                width: BRANCH_STROKE,
            })
            .collect();

        let drawn = lines(&frame);
        assert_eq!(drawn, expected);
        for line in &drawn {
            if let Primitive::Line { color, .. } = line {
                assert_ne!(*color, frame.colors.glow());
            }
        }
        // The top fork uses the deepest palette entry.
        for line in &drawn[drawn.len() - 3..] {
            if let Primitive::Line { color, .. } = line {
                assert_eq!(*color, frame.colors.at(settings.iteration_count() - 1));
            }
        }
    }

    #[test]
    fn hand_strokes_per_clock_type() {
        for clock_type in ClockType::ALL {
            let settings = Settings {
                clock_type,
                max_iterations: 6,
                ..Settings::default()
            };
            let frame = compose(&settings, 30_000.0);
            let capture = frame.hands.clone().expect("hands");
            let first = 1 + frame.point_count();
            let hand_lines = &frame.primitives[first..first + clock_type.branch_factor()];

            for line in hand_lines {
                let Primitive::Line { from, to, color, width } = *line else {
                    panic!("expected a hand line, got {line:?}");
                };
                assert_eq!(from, capture.base);
                assert_eq!(color, settings.clock_face_color);
                let hand = capture
                    .tips
                    .iter()
                    .find(|(_, tip)| *tip == to)
                    .map(|(hand, _)| *hand)
                    .expect("line ends at a hand tip");
                let expected = match hand {
                    Hand::Hour => 5.0,
                    Hand::Minute => 4.0,
                    Hand::Second => 2.0,
                };
                assert_eq!(width, expected, "{clock_type:?} {hand:?}");
            }
        }
    }

    #[test]
    fn ticking_palette_follows_eased_time() {
        let elapsed = 40_000.05;
        let settings = Settings {
            use_tick: true,
            ..Settings::default()
        };
        let n = settings.iteration_count();
        let face_color = settings.clock_face_color;
        let frame = compose(&settings, elapsed);
        let eased = ColorScheme::generate(apply_tick(elapsed) as f32, n, true, face_color);
        assert_eq!(frame.colors, eased);

        let smooth = compose(
            &Settings {
                use_tick: false,
                ..settings
            },
            elapsed,
        );
        let raw = ColorScheme::generate(elapsed as f32, n, true, face_color);
        assert_eq!(smooth.colors, raw);
    }

    #[test]
    fn points_use_glow_color_and_scaled_width() {
        let settings = Settings {
            scaling_factor: 0.25,
            ..Settings::default()
        };
        let frame = compose(&settings, 100.0);
        let glow = frame.colors.glow();
        assert_eq!(frame.theme.primary, glow);
        assert_eq!(frame.theme.tertiary, settings.background_color);
        for primitive in &frame.primitives {
            if let Primitive::Point { color, width, .. } = primitive {
                assert_eq!(*color, glow);
                assert_eq!(*width, 4.0);
            }
        }
    }
}
