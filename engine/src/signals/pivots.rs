// Local extrema over a symmetric five-point window
use shared::models::{Pivot, PivotKind};

/// Bars compared on each side of a pivot candidate.
pub const PIVOT_SPAN: usize = 2;

/// Points whose two neighbours on each side are all defined and strictly greater.
///
/// Equal neighbours disqualify a candidate, so flat bottoms never form a pivot.
pub fn local_lows(series: &[Option<f64>]) -> Vec<Pivot> {
    find_pivots(series, PivotKind::Low)
}

/// Mirror of [`local_lows`]: neighbours strictly smaller.
pub fn local_highs(series: &[Option<f64>]) -> Vec<Pivot> {
    find_pivots(series, PivotKind::High)
}

pub fn local_lows_of(prices: &[f64]) -> Vec<Pivot> {
    local_lows(&defined(prices))
}

pub fn local_highs_of(prices: &[f64]) -> Vec<Pivot> {
    local_highs(&defined(prices))
}

fn defined(prices: &[f64]) -> Vec<Option<f64>> {
    prices.iter().copied().map(Some).collect()
}

fn find_pivots(series: &[Option<f64>], kind: PivotKind) -> Vec<Pivot> {
    if series.len() < 2 * PIVOT_SPAN + 1 {
        return Vec::new();
    }

    (PIVOT_SPAN..series.len() - PIVOT_SPAN)
        .filter_map(|i| {
            let center = series[i]?;
            let window = &series[i - PIVOT_SPAN..=i + PIVOT_SPAN];
            let is_pivot = window.iter().enumerate().all(|(offset, neighbour)| {
                if offset == PIVOT_SPAN {
                    return true;
                }
                match (neighbour, kind) {
                    (Some(n), PivotKind::Low) => *n > center,
                    (Some(n), PivotKind::High) => *n < center,
                    (None, _) => false,
                }
            });
            is_pivot.then_some(Pivot { index: i, value: center, kind })
        })
        .collect()
}

/// The last `n` pivots, oldest first.
pub fn most_recent(pivots: &[Pivot], n: usize) -> &[Pivot] {
    &pivots[pivots.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_strict_lows_and_highs() {
        let prices = [5.0, 4.0, 1.0, 4.0, 5.0, 8.0, 9.0, 8.0, 7.0];
        let lows = local_lows_of(&prices);
        assert_eq!(lows, vec![Pivot { index: 2, value: 1.0, kind: PivotKind::Low }]);
        let highs = local_highs_of(&prices);
        assert_eq!(highs, vec![Pivot { index: 6, value: 9.0, kind: PivotKind::High }]);
    }

    #[test]
    fn ties_are_not_pivots() {
        assert!(local_lows_of(&[5.0, 4.0, 1.0, 1.0, 5.0, 6.0]).is_empty());
        assert!(local_highs_of(&[1.0, 9.0, 3.0, 9.0, 1.0]).is_empty());
    }

    #[test]
    fn non_monotonic_left_side_still_counts() {
        // Only strict minimality over the window matters.
        let lows = local_lows_of(&[3.0, 4.0, 1.0, 2.0, 2.5]);
        assert_eq!(lows.len(), 1);
        assert_eq!(lows[0].index, 2);
    }

    #[test]
    fn edges_and_short_series_never_pivot() {
        assert!(local_lows_of(&[1.0, 2.0, 3.0, 4.0]).is_empty());
        assert!(local_lows_of(&[0.0, 5.0, 5.0, 5.0, 5.0, 0.0]).is_empty());
        assert!(local_highs_of(&[]).is_empty());
    }

    #[test]
    fn undefined_neighbours_disqualify() {
        let series = [None, Some(5.0), Some(1.0), Some(5.0), Some(6.0), Some(2.0), Some(7.0), Some(8.0)];
        let lows = local_lows(&series);
        assert_eq!(lows.len(), 1);
        assert_eq!(lows[0].index, 5);
    }

    #[test]
    fn most_recent_keeps_tail_in_order() {
        let prices = [9.0, 8.0, 1.0, 8.0, 9.0, 8.0, 2.0, 8.0, 9.0, 8.0, 3.0, 8.0, 9.0];
        let lows = local_lows_of(&prices);
        assert_eq!(lows.len(), 3);
        let last_two = most_recent(&lows, 2);
        assert_eq!(last_two.iter().map(|p| p.value).collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert_eq!(most_recent(&lows[..1], 2).len(), 1);
    }
}
