//! Fractal tree geometry.
//!
//! Every node forks into one child per active hand. A child is the parent
//! branch rotated by the hand's rotation and shrunk by the hand's ratio, so
//! the first fork always lines up with the real clock hands.
//!
//! Generation is pure: it returns the leaves, the branch segments and the
//! top-level fork in scaled space. [`crate::frame`] decides what gets drawn.

use crate::rotation::{BranchRatio, RotationState};
use crate::settings::{ClockType, Hand};
use crate::types::Vector2;

/// Upper bound on buffer pre-allocation; deeper trees just grow the vectors.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Where the tree sits on a surface.
///
/// Geometry lives in scaled space (surface pixels times the scaling factor)
/// and is divided by the scaling factor on the way to the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Tree root in scaled space
    pub center: Vector2,
    /// Length of the trunk in scaled space
    pub start_magnitude: f32,
    /// Scaled space per surface pixel
    pub scaling_factor: f32,
}

impl Layout {
    /// Computes the layout for a `width` x `height` surface.
    ///
    /// The trunk is sized with `(1 - ratio) / ratio` so the geometric series of
    /// the longest branches reaches exactly half the shorter surface side.
    pub fn new(width: f32, height: f32, scaling_factor: f32, ratios: &BranchRatio) -> Self {
        let scaling_factor = if scaling_factor > 0.0 && scaling_factor.is_finite() {
            scaling_factor
        } else {
            1.0
        };
        let width = width.max(0.0);
        let height = height.max(0.0);
        let ratio = ratios.max();
        Self {
            center: Vector2::new(width * scaling_factor * 0.5, height * scaling_factor * 0.5),
            start_magnitude: width.min(height) * scaling_factor * 0.5 * (1.0 - ratio) / ratio,
            scaling_factor,
        }
    }

    /// The trunk vector, pointing straight up.
    pub fn trunk(&self) -> Vector2 {
        Vector2::new(0.0, -self.start_magnitude)
    }

    /// Maps a scaled-space point to surface pixels.
    pub fn to_surface(&self, point: Vector2) -> Vector2 {
        point * (1.0 / self.scaling_factor)
    }
}

/// Read-only inputs shared by every recursive call of one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// This frame's hand rotations
    pub rotation: RotationState,
    /// Per-hand shrink ratios
    pub ratios: BranchRatio,
    /// Hands that fork each node, in recursion order
    pub hands: &'static [Hand],
}

impl FrameContext {
    /// Context for `clock_type` with the standard ratios.
    pub fn new(rotation: RotationState, clock_type: ClockType) -> Self {
        Self {
            rotation,
            ratios: BranchRatio::STANDARD,
            hands: clock_type.hands(),
        }
    }

    /// Child branch of `branch` for `hand`.
    pub fn child(&self, branch: Vector2, hand: Hand) -> Vector2 {
        branch.rotate(self.rotation.for_hand(hand)) * self.ratios.for_hand(hand)
    }
}

/// One line from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSegment {
    /// Parent node
    pub from: Vector2,
    /// Child node
    pub to: Vector2,
    /// Remaining depth of the parent; selects the color
    pub depth: usize,
}

/// The first fork of the tree: one child per hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Fork {
    /// Root of the tree
    pub base: Vector2,
    /// Child endpoint for each active hand
    pub tips: Vec<(Hand, Vector2)>,
}

impl Fork {
    /// Endpoint of `hand`, if it takes part in this fork.
    pub fn tip(&self, hand: Hand) -> Option<Vector2> {
        self.tips
            .iter()
            .find(|(h, _)| *h == hand)
            .map(|(_, tip)| *tip)
    }
}

/// Everything one frame's recursion produced, in scaled space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FractalGeometry {
    /// Depth-0 nodes in visiting order
    pub leaves: Vec<Vector2>,
    /// Branches below the top fork, children before parents
    pub branches: Vec<BranchSegment>,
    /// The top fork; `None` when the tree is a single point
    pub top: Option<Fork>,
}

impl FractalGeometry {
    /// Grows the tree from `origin` along `branch` for `depth` levels.
    pub fn generate(origin: Vector2, branch: Vector2, depth: usize, ctx: &FrameContext) -> Self {
        let branch_factor = ctx.hands.len().max(1);
        let leaf_estimate = branch_factor
            .checked_pow(depth as u32)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED);
        let mut geometry = Self {
            leaves: Vec::with_capacity(leaf_estimate),
            branches: Vec::with_capacity(leaf_estimate.saturating_mul(branch_factor)),
            top: None,
        };

        if depth == 0 {
            geometry.leaves.push(origin);
            return geometry;
        }

        let tips: Vec<(Hand, Vector2)> = ctx
            .hands
            .iter()
            .map(|&hand| (hand, ctx.child(branch, hand)))
            .collect();
        for &(_, child) in &tips {
            geometry.grow(origin + child, child, depth - 1, ctx);
        }
        geometry.top = Some(Fork {
            base: origin,
            tips: tips
                .into_iter()
                .map(|(hand, child)| (hand, origin + child))
                .collect(),
        });
        geometry
    }

    fn grow(&mut self, origin: Vector2, branch: Vector2, depth: usize, ctx: &FrameContext) {
        if depth == 0 {
            self.leaves.push(origin);
            return;
        }
        let mut slots = [Vector2::ZERO; 3];
        for (slot, &hand) in slots.iter_mut().zip(ctx.hands) {
            *slot = ctx.child(branch, hand);
        }
        let children = &slots[..ctx.hands.len().min(slots.len())];
        for &child in children {
            self.grow(origin + child, child, depth - 1, ctx);
        }
        for &child in children {
            self.branches.push(BranchSegment {
                from: origin,
                to: origin + child,
                depth,
            });
        }
    }

    /// Segments of the top fork, tagged with `top_depth`.
    pub fn top_segments(&self, top_depth: usize) -> impl Iterator<Item = BranchSegment> + '_ {
        self.top.iter().flat_map(move |fork| {
            fork.tips.iter().map(move |&(_, tip)| BranchSegment {
                from: fork.base,
                to: tip,
                depth: top_depth,
            })
        })
    }
}
