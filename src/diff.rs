//! Token-level differ: an LCS-style matcher (via the `diffs` crate, feature-
//! switchable between Myers and patience just like the delta encoder) that
//! emits a sorted list of `equal`/`insert`/`delete` operations between two
//! token sequences, followed by a boundary-tuning pass that slides
//! insert/delete windows along runs of identical tokens so their endpoints
//! land on break-token boundaries whenever that's reachable without
//! changing the alignment.

use diffs::Diff as DiffsDiff;
#[cfg(feature = "diff_mydrs")]
use diffs::myers;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffName {
    Equal,
    Insert,
    Delete,
}

/// A single diff operation. `a1..a2` index the old sequence, `b1..b2` the
/// new one. `tokens` holds the literal inserted tokens (from new) or
/// deleted tokens (from old); it is empty for `equal` ops.
#[derive(Debug, Clone)]
pub struct DiffOp {
    pub name: DiffName,
    pub a1: usize,
    pub a2: usize,
    pub b1: usize,
    pub b2: usize,
    pub tokens: Vec<Token>,
}

impl DiffOp {
    fn equal(a1: usize, a2: usize, b1: usize, b2: usize) -> Self {
        Self { name: DiffName::Equal, a1, a2, b1, b2, tokens: Vec::new() }
    }
}

/// Accumulates `diffs::Diff` callbacks into our `DiffOp` representation.
struct TokenDiffBuilder<'a> {
    ops: Vec<DiffOp>,
    old: &'a [Token],
    new: &'a [Token],
}

impl<'a> DiffsDiff for TokenDiffBuilder<'a> {
    type Error = std::convert::Infallible;

    fn equal(&mut self, old: usize, new: usize, len: usize) -> Result<(), Self::Error> {
        self.ops.push(DiffOp::equal(old, old + len, new, new + len));
        Ok(())
    }

    fn delete(&mut self, old: usize, old_len: usize, new: usize) -> Result<(), Self::Error> {
        self.ops.push(DiffOp {
            name: DiffName::Delete,
            a1: old,
            a2: old + old_len,
            b1: new,
            b2: new,
            tokens: self.old[old..old + old_len].to_vec(),
        });
        Ok(())
    }

    fn insert(&mut self, old: usize, new: usize, new_len: usize) -> Result<(), Self::Error> {
        self.ops.push(DiffOp {
            name: DiffName::Insert,
            a1: old,
            a2: old,
            b1: new,
            b2: new + new_len,
            tokens: self.new[new..new + new_len].to_vec(),
        });
        Ok(())
    }
}

/// Diff two token sequences, returning a sorted list of ops covering
/// `[0,|old|) x [0,|new|)`. `tune` controls whether the break-boundary
/// tuning pass runs; callers normally pass `config.break_boundary_required`.
pub fn diff(old: &[Token], new: &[Token], tune: bool) -> Vec<DiffOp> {
    let mut builder = TokenDiffBuilder { ops: Vec::new(), old, new };

    #[cfg(feature = "diff_mydrs")]
    myers::diff(&mut builder, old, 0, old.len(), new, 0, new.len()).unwrap();

    #[cfg(not(feature = "diff_mydrs"))]
    diffs::patience::diff(&mut builder, old, 0, old.len(), new, 0, new.len()).unwrap();

    let mut ops = builder.ops;
    ops.sort_by_key(|o| o.a1);

    if tune {
        tune_diff_ops(&mut ops, old, new);
    }

    ops
}

/// Find the widest window `[lo,hi)` reachable from `(lo,hi)` by sliding
/// along runs of identical tokens (in either direction) whose endpoints are
/// both break boundaries, constrained to stay within `[floor,ceil)`.
/// Ties favor the leftmost candidate. Returns the original window if no
/// such alignment is reachable.
fn slide_to_break_boundary(
    tokens: &[Token],
    lo: usize,
    hi: usize,
    floor: usize,
    ceil: usize,
) -> (usize, usize) {
    let width = hi - lo;
    if width == 0 {
        return (lo, hi);
    }
    let is_boundary = |lo: usize, hi: usize| -> bool {
        (lo == 0 || tokens[lo - 1].is_break()) && (hi == tokens.len() || tokens[hi - 1].is_break())
    };

    let mut candidates = vec![(lo, hi)];
    {
        let (mut l, mut h) = (lo, hi);
        while l > floor && tokens[l - 1] == tokens[h - 1] {
            l -= 1;
            h -= 1;
            candidates.push((l, h));
        }
    }
    {
        let (mut l, mut h) = (lo, hi);
        while h < ceil && tokens[h] == tokens[l] {
            l += 1;
            h += 1;
            candidates.push((l, h));
        }
    }
    candidates.sort_by_key(|&(l, _)| l);
    for &(l, h) in &candidates {
        if is_boundary(l, h) {
            return (l, h);
        }
    }
    (lo, hi)
}

/// Slide each insert/delete window towards a break-boundary alignment,
/// shrinking/growing the immediately adjacent `equal` ops to compensate so
/// the op list stays disjoint and sorted.
fn tune_diff_ops(ops: &mut [DiffOp], old: &[Token], new: &[Token]) {
    for i in 0..ops.len() {
        match ops[i].name {
            DiffName::Insert => {
                let floor = if i > 0 { ops[i - 1].b1 } else { 0 };
                let ceil = if i + 1 < ops.len() { ops[i + 1].b2 } else { new.len() };
                let (lo, hi) = slide_to_break_boundary(new, ops[i].b1, ops[i].b2, floor, ceil);
                if lo == ops[i].b1 {
                    continue;
                }
                if i > 0 && ops[i - 1].name == DiffName::Equal {
                    let prev = &mut ops[i - 1];
                    prev.a2 = prev.a1 + (lo - prev.b1);
                    prev.b2 = lo;
                }
                if i + 1 < ops.len() && ops[i + 1].name == DiffName::Equal {
                    let next = &mut ops[i + 1];
                    next.a1 = next.a2 - (next.b2 - hi);
                    next.b1 = hi;
                }
                ops[i].b1 = lo;
                ops[i].b2 = hi;
                ops[i].tokens = new[lo..hi].to_vec();
            }
            DiffName::Delete => {
                let floor = if i > 0 { ops[i - 1].a1 } else { 0 };
                let ceil = if i + 1 < ops.len() { ops[i + 1].a2 } else { old.len() };
                let (lo, hi) = slide_to_break_boundary(old, ops[i].a1, ops[i].a2, floor, ceil);
                if lo == ops[i].a1 {
                    continue;
                }
                if i > 0 && ops[i - 1].name == DiffName::Equal {
                    let prev = &mut ops[i - 1];
                    prev.b2 = prev.b1 + (lo - prev.a1);
                    prev.a2 = lo;
                }
                if i + 1 < ops.len() && ops[i + 1].name == DiffName::Equal {
                    let next = &mut ops[i + 1];
                    next.b1 = next.b2 - (next.a2 - hi);
                    next.a1 = hi;
                }
                ops[i].a1 = lo;
                ops[i].a2 = hi;
                ops[i].tokens = old[lo..hi].to_vec();
            }
            DiffName::Equal => {}
        }
    }
}
