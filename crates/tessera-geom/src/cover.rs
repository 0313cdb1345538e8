//! Union-of-rectangles coverage test for cube faces.

/// Hard bound on outer sweep steps. Exceeding it means the input broke the
/// positive-area precondition, which is a static data bug.
pub const MAX_SWEEP_STEPS: usize = 1000;

// Larger than any coordinate a block-local box can have.
const SWEEP_SENTINEL: f32 = 1000.0;

/// A rectangle on a cube face, spanned by the face's two tangent axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceRect {
    pub min_a: f32,
    pub min_b: f32,
    pub max_a: f32,
    pub max_b: f32,
}

impl FaceRect {
    pub const UNIT: FaceRect = FaceRect {
        min_a: 0.0,
        min_b: 0.0,
        max_a: 1.0,
        max_b: 1.0,
    };

    #[inline]
    pub const fn new(min_a: f32, min_b: f32, max_a: f32, max_b: f32) -> Self {
        Self {
            min_a,
            min_b,
            max_a,
            max_b,
        }
    }

    // Half-open on the max side so a rectangle ending exactly at the sweep
    // point never stalls the sweep; tilings that share edges still cover.
    // With closed bounds on both sides such tilings were reported uncovered,
    // e.g. two halves meeting at 0.5.
    #[inline]
    fn extends_past(&self, a: f32, b: f32) -> bool {
        self.min_a <= a && a < self.max_a && self.min_b <= b && b < self.max_b
    }
}

/// Returns true if the union of `rects` covers all of `target`.
///
/// Sweeps columns along `a`. Within a column the point `(a, b)` is pushed
/// along `b` to the far edge of any rectangle containing it, remembering the
/// nearest right edge seen; once `b` reaches `target.max_b` the column
/// `[a, nearest right edge)` is known to be covered and the sweep moves on.
/// A pass that cannot move `b` means an uncovered point was found.
///
/// Every rectangle is expected to have positive extent on both axes.
///
/// # Panics
///
/// Panics if the sweep needs more than [`MAX_SWEEP_STEPS`] columns.
pub fn rects_cover(rects: &[FaceRect], target: FaceRect) -> bool {
    let mut best_a = target.min_a;
    let mut best_b = target.min_b;

    for _ in 0..MAX_SWEEP_STEPS {
        let old_best_a = best_a;
        let mut next_a = SWEEP_SENTINEL;

        loop {
            let old_best_b = best_b;
            for r in rects {
                if r.extends_past(best_a, best_b) {
                    best_b = r.max_b;
                    next_a = next_a.min(r.max_a);
                }
            }
            if old_best_b == best_b {
                return false;
            }
            if best_b >= target.max_b {
                best_b = target.min_b;
                best_a = next_a;
                break;
            }
        }

        if best_a >= target.max_a {
            return true;
        }
        if old_best_a == best_a {
            return false;
        }
    }

    panic!(
        "face coverage sweep exceeded {} steps over {} rects; a degenerate rect slipped through",
        MAX_SWEEP_STEPS,
        rects.len()
    );
}
