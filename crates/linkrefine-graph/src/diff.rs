//! Line-oriented diff between a page's original and refined content.
//!
//! Shortest-edit-script diff over the changed region; the output is deterministic
//! (removals are emitted before additions at each change point).

use serde::Serialize;

/// Kind of a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Unchanged,
    Removed,
    Added,
}

/// One line of a diff, with its 1-based line numbers on each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
}

/// A contiguous group of changes with surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Unified-diff style header, e.g. `@@ -3,4 +3,4 @@`.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_len, self.new_start, self.new_len
        )
    }
}

/// Full line diff of two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineDiff {
    pub lines: Vec<DiffLine>,
}

impl LineDiff {
    /// Diff `old` against `new` line by line.
    ///
    /// Lines shared at both ends are matched directly; only the changed
    /// region in between is searched for a shortest edit script.
    pub fn compute(old: &str, new: &str) -> Self {
        let a: Vec<&str> = old.lines().collect();
        let b: Vec<&str> = new.lines().collect();

        let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
        let suffix = a[prefix..]
            .iter()
            .rev()
            .zip(b[prefix..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();
        let mut middle = shortest_edit(
            &a[prefix..a.len() - suffix],
            &b[prefix..b.len() - suffix],
        );
        removals_first(&mut middle);

        let edits = std::iter::repeat(Edit::Keep)
            .take(prefix)
            .chain(middle)
            .chain(std::iter::repeat(Edit::Keep).take(suffix));

        let mut lines = Vec::with_capacity(a.len().max(b.len()));
        let (mut i, mut j) = (0, 0);
        for edit in edits {
            match edit {
                Edit::Keep => {
                    lines.push(DiffLine {
                        kind: LineKind::Unchanged,
                        text: a[i].to_string(),
                        old_line: Some(i + 1),
                        new_line: Some(j + 1),
                    });
                    i += 1;
                    j += 1;
                }
                Edit::Remove => {
                    lines.push(DiffLine {
                        kind: LineKind::Removed,
                        text: a[i].to_string(),
                        old_line: Some(i + 1),
                        new_line: None,
                    });
                    i += 1;
                }
                Edit::Add => {
                    lines.push(DiffLine {
                        kind: LineKind::Added,
                        text: b[j].to_string(),
                        old_line: None,
                        new_line: Some(j + 1),
                    });
                    j += 1;
                }
            }
        }

        Self { lines }
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.kind != LineKind::Unchanged)
    }

    /// Number of (removed, added) lines.
    pub fn stats(&self) -> (usize, usize) {
        self.lines.iter().fold((0, 0), |(r, a), line| match line.kind {
            LineKind::Removed => (r + 1, a),
            LineKind::Added => (r, a + 1),
            LineKind::Unchanged => (r, a),
        })
    }

    /// Group changes into hunks with up to `context` unchanged lines around
    /// each change. Changes closer than `2 * context` lines share a hunk.
    pub fn hunks(&self, context: usize) -> Vec<Hunk> {
        let changed: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.kind != LineKind::Unchanged)
            .map(|(idx, _)| idx)
            .collect();
        let Some(&first) = changed.first() else {
            return Vec::new();
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        let mut start = first.saturating_sub(context);
        let mut end = (first + context).min(self.lines.len() - 1);
        for &idx in &changed[1..] {
            let lo = idx.saturating_sub(context);
            if lo <= end + 1 {
                end = (idx + context).min(self.lines.len() - 1);
            } else {
                ranges.push((start, end));
                start = lo;
                end = (idx + context).min(self.lines.len() - 1);
            }
        }
        ranges.push((start, end));

        ranges
            .into_iter()
            .map(|(start, end)| self.hunk(start, end))
            .collect()
    }

    fn hunk(&self, start: usize, end: usize) -> Hunk {
        let lines = self.lines[start..=end].to_vec();
        let old_len = lines.iter().filter(|l| l.kind != LineKind::Added).count();
        let new_len = lines.iter().filter(|l| l.kind != LineKind::Removed).count();

        // Line numbers the hunk starts at; for an empty side, the line before.
        let old_start = lines
            .iter()
            .find_map(|l| l.old_line)
            .unwrap_or_else(|| self.old_lines_before(start));
        let new_start = lines
            .iter()
            .find_map(|l| l.new_line)
            .unwrap_or_else(|| self.new_lines_before(start));

        Hunk {
            old_start,
            old_len,
            new_start,
            new_len,
            lines,
        }
    }

    fn old_lines_before(&self, idx: usize) -> usize {
        self.lines[..idx].iter().filter(|l| l.old_line.is_some()).count()
    }

    fn new_lines_before(&self, idx: usize) -> usize {
        self.lines[..idx].iter().filter(|l| l.new_line.is_some()).count()
    }
}

/// Edit distance past which the changed region is shown as one block
/// replacement instead of a minimal script.
const MAX_EDIT_DISTANCE: isize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Keep,
    Remove,
    Add,
}

/// Shortest edit script turning `a` into `b` (Myers' greedy algorithm).
///
/// Runs in O((n + m) * d) time and keeps O(d^2) state, where `d` is the
/// number of changed lines.
fn shortest_edit(a: &[&str], b: &[&str]) -> Vec<Edit> {
    let (n, m) = (a.len() as isize, b.len() as isize);
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }
    let idx = |k: isize| (max + 1 + k) as usize;

    // v[k] is the furthest x reached on diagonal k, or -1 if unreached.
    let mut v = vec![-1isize; 2 * max as usize + 3];
    v[idx(1)] = 0;
    // trace[d] holds v[-d-1..=d+1] as it stood before step d.
    let mut trace: Vec<Vec<isize>> = Vec::new();
    for d in 0..=max {
        if d > MAX_EDIT_DISTANCE {
            return block_replace(a.len(), b.len());
        }
        trace.push(v[idx(-d - 1)..=idx(d + 1)].to_vec());

        let mut k = -d;
        while k <= d {
            let Some((_, mut x)) = next_step(|k| v[idx(k)], k, n, m) else {
                v[idx(k)] = -1;
                k += 2;
                continue;
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x == n && y == m {
                return backtrack(&trace, n, m);
            }
            k += 2;
        }
    }
    block_replace(a.len(), b.len())
}

/// The move onto diagonal `k` that reaches furthest while staying inside
/// the edit grid: `(true, x)` for an addition, `(false, x)` for a removal.
fn next_step(at: impl Fn(isize) -> isize, k: isize, n: isize, m: isize) -> Option<(bool, isize)> {
    let down = at(k + 1);
    let down = (down >= 0 && down - k <= m).then_some(down);
    let right = at(k - 1);
    let right = (right >= 0 && right < n).then_some(right + 1);
    match (down, right) {
        (Some(x), Some(r)) if x >= r => Some((true, x)),
        (_, Some(x)) => Some((false, x)),
        (Some(x), None) => Some((true, x)),
        (None, None) => None,
    }
}

fn backtrack(trace: &[Vec<isize>], n: isize, m: isize) -> Vec<Edit> {
    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, snapshot) in trace.iter().enumerate().rev() {
        let d = d as isize;
        if d == 0 {
            while x > 0 && y > 0 {
                edits.push(Edit::Keep);
                x -= 1;
                y -= 1;
            }
            break;
        }
        let at = |k: isize| snapshot[(k + d + 1) as usize];
        let k = x - y;
        let Some((down, _)) = next_step(at, k, n, m) else {
            break;
        };
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            edits.push(Edit::Keep);
            x -= 1;
            y -= 1;
        }
        edits.push(if down { Edit::Add } else { Edit::Remove });
        x = prev_x;
        y = prev_y;
    }
    edits.reverse();
    edits
}

fn block_replace(n: usize, m: usize) -> Vec<Edit> {
    let mut edits = vec![Edit::Remove; n];
    edits.resize(n + m, Edit::Add);
    edits
}

/// Within each run of changes, put every removal before every addition.
fn removals_first(edits: &mut [Edit]) {
    let mut start = 0;
    while start < edits.len() {
        if edits[start] == Edit::Keep {
            start += 1;
            continue;
        }
        let end = edits[start..]
            .iter()
            .position(|e| *e == Edit::Keep)
            .map_or(edits.len(), |len| start + len);
        let removed = edits[start..end].iter().filter(|e| **e == Edit::Remove).count();
        edits[start..start + removed].fill(Edit::Remove);
        edits[start + removed..end].fill(Edit::Add);
        start = end;
    }
}
