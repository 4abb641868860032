//! Mask patterns and the four penalty rules used to pick one.

/// Number of standard mask patterns.
pub const MASK_COUNT: u8 = 8;

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

/// 1:1:3:1:1 finder-like run preceded or followed by four light modules.
/// Matching treats the four modules past each edge as light quiet zone.
const FINDER_LIKE: [[bool; 11]; 2] = [
    [true, false, true, true, true, false, true, false, false, false, false],
    [false, false, false, false, true, false, true, true, true, false, true],
];

/// Whether mask pattern `mask` inverts the module at (`row`, `col`).
pub fn applies(mask: u8, row: usize, col: usize) -> bool {
    match mask {
        0 => (row + col) % 2 == 0,
        1 => row % 2 == 0,
        2 => col % 3 == 0,
        3 => (row + col) % 3 == 0,
        4 => (row / 2 + col / 3) % 2 == 0,
        5 => (row * col) % 2 + (row * col) % 3 == 0,
        6 => ((row * col) % 2 + (row * col) % 3) % 2 == 0,
        7 => ((row + col) % 2 + (row * col) % 3) % 2 == 0,
        _ => false,
    }
}

/// Penalty score of a finished, masked grid (`size * size`, row-major).
pub fn penalty(modules: &[bool], size: usize) -> u32 {
    let at = |r: usize, c: usize| modules[r * size + c];
    let mut score = 0u32;

    // Rule 1: runs of five or more same-coloured modules in a row or column.
    for line in 0..size {
        score += run_penalty((0..size).map(|i| at(line, i)));
        score += run_penalty((0..size).map(|i| at(i, line)));
    }

    // Rule 2: 2x2 blocks of one colour.
    for r in 0..size - 1 {
        for c in 0..size - 1 {
            let color = at(r, c);
            if at(r, c + 1) == color && at(r + 1, c) == color && at(r + 1, c + 1) == color {
                score += PENALTY_N2;
            }
        }
    }

    // Rule 3: finder-like patterns.
    score += finder_penalty(modules, size);

    // Rule 4: deviation of the dark proportion from 50%, in 5% steps.
    let total = (size * size) as u32;
    let dark = modules.iter().filter(|&&d| d).count() as u32;
    let deviation = (dark * 20).abs_diff(total * 10);
    let k = (deviation + total - 1) / total;
    score += k.saturating_sub(1) * PENALTY_N4;

    score
}

/// Rule 3 score: every row and column is scanned with four light modules
/// of quiet zone on each side.
fn finder_penalty(modules: &[bool], size: usize) -> u32 {
    let size = size as isize;
    let at = |r: isize, c: isize| {
        r >= 0 && c >= 0 && r < size && c < size && modules[(r * size + c) as usize]
    };
    let mut score = 0;
    for line in 0..size {
        for start in -4..=size - 7 {
            for pattern in &FINDER_LIKE {
                if (0..11).all(|i| at(line, start + i) == pattern[i as usize]) {
                    score += PENALTY_N3;
                }
                if (0..11).all(|i| at(start + i, line) == pattern[i as usize]) {
                    score += PENALTY_N3;
                }
            }
        }
    }
    score
}

fn run_penalty(line: impl Iterator<Item = bool>) -> u32 {
    let mut score = 0;
    let mut prev = None;
    let mut run = 0u32;
    for module in line {
        if Some(module) == prev {
            run += 1;
        } else {
            if run >= 5 {
                score += PENALTY_N1 + run - 5;
            }
            prev = Some(module);
            run = 1;
        }
    }
    if run >= 5 {
        score += PENALTY_N1 + run - 5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_conditions_at_origin() {
        // Every pattern inverts (0, 0).
        for mask in 0..MASK_COUNT {
            assert!(applies(mask, 0, 0), "mask {mask}");
        }
        assert!(!applies(0, 0, 1));
        assert!(applies(1, 0, 5));
        assert!(!applies(2, 4, 1));
        assert!(applies(4, 1, 2));
        assert!(!applies(4, 2, 0));
    }

    #[test]
    fn run_penalty_rule_one() {
        assert_eq!(run_penalty([true; 4].into_iter()), 0);
        assert_eq!(run_penalty([true; 5].into_iter()), 3);
        assert_eq!(run_penalty([false; 7].into_iter()), 5);
        let mixed = [true, true, true, true, true, false, true, true, true, true, true, true];
        assert_eq!(run_penalty(mixed.into_iter()), 3 + 4);
    }

    #[test]
    fn checkerboard_scores_only_balance_free() {
        let size = 21;
        let modules: Vec<bool> = (0..size * size).map(|i| (i / size + i % size) % 2 == 0).collect();
        // No runs, no blocks, no finder patterns; 221 of 441 dark is within 5%.
        assert_eq!(penalty(&modules, size), 0);
    }

    #[test]
    fn all_dark_grid_is_heavily_penalised() {
        let size = 21;
        let modules = vec![true; size * size];
        let rule1 = 2 * size as u32 * (PENALTY_N1 + 16);
        let rule2 = (size as u32 - 1).pow(2) * PENALTY_N2;
        let rule4 = 9 * PENALTY_N4;
        assert_eq!(penalty(&modules, size), rule1 + rule2 + rule4);
    }

    #[test]
    fn finder_like_pattern_detected() {
        let size = 21;
        let mut modules = vec![false; size * size];
        // Lay 1011101 into row 10 starting at column 4, light on both sides.
        for (i, &d) in [true, false, true, true, true, false, true].iter().enumerate() {
            modules[10 * size + 4 + i] = d;
        }
        let with = penalty(&modules, size);
        modules[10 * size + 4 + 3] = false;
        let without = penalty(&modules, size);
        assert!(with >= without + PENALTY_N3);
    }

    #[test]
    fn finder_like_pattern_against_edge_counts_quiet_zone() {
        let size = 21;
        let mut modules = vec![false; size * size];
        let run = [true, false, true, true, true, false, true];
        // Row 10 starts with the run at the left edge; column 8 is dark, so
        // only the quiet zone supplies the four light modules.
        for (i, &d) in run.iter().enumerate() {
            modules[10 * size + i] = d;
        }
        modules[10 * size + 8] = true;
        assert_eq!(finder_penalty(&modules, size), PENALTY_N3);

        // Mirror image against the right edge of row 4.
        for (i, &d) in run.iter().enumerate() {
            modules[4 * size + size - 7 + i] = d;
        }
        modules[4 * size + size - 9] = true;
        assert_eq!(finder_penalty(&modules, size), 2 * PENALTY_N3);
    }
}
