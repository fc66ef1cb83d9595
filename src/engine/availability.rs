use chrono::NaiveDate;

use crate::model::Stay;

// ── Free-range algebra ───────────────────────────────────────────
//
// Spans here are half-open day ranges, the same shape as a stay: the end
// day itself is free.

/// Merge sorted overlapping/adjacent spans into disjoint spans.
pub fn merge_spans(sorted: &[Stay]) -> Vec<Stay> {
    let mut merged: Vec<Stay> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.check_in <= last.check_out {
                last.check_out = last.check_out.max(span.check_out);
                continue;
            }
        merged.push(span);
    }
    merged
}

/// Subtract sorted disjoint spans from sorted base spans.
pub fn subtract_spans(base: &[Stay], to_remove: &[Stay]) -> Vec<Stay> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut current_start = b.check_in;
        let current_end = b.check_out;

        while ri < to_remove.len() && to_remove[ri].check_out <= current_start {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].check_in < current_end {
            let r = &to_remove[j];
            if r.check_in > current_start {
                result.push(Stay::new(current_start, r.check_in));
            }
            current_start = current_start.max(r.check_out);
            j += 1;
        }

        if current_start < current_end {
            result.push(Stay::new(current_start, current_end));
        }
    }

    result
}

/// Free day-gaps of a room inside `[start, end)` given its active stays.
pub fn free_ranges(start: NaiveDate, end: NaiveDate, booked: &[Stay]) -> Vec<Stay> {
    let mut spans: Vec<Stay> = booked
        .iter()
        .filter_map(|s| {
            let lo = s.check_in.max(start);
            let hi = s.check_out.min(end);
            (lo < hi).then(|| Stay::new(lo, hi))
        })
        .collect();
    spans.sort_by_key(|s| s.check_in);
    let spans = merge_spans(&spans);
    subtract_spans(&[Stay::new(start, end)], &spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn span(start: u32, end: u32) -> Stay {
        Stay::new(d(start), d(end))
    }

    // ── subtract_spans ────────────────────────────────────

    #[test]
    fn subtract_no_overlap() {
        let base = vec![span(1, 5), span(10, 15)];
        let remove = vec![span(5, 10)];
        assert_eq!(subtract_spans(&base, &remove), base);
    }

    #[test]
    fn subtract_full_overlap() {
        let base = vec![span(5, 10)];
        let remove = vec![span(1, 15)];
        assert!(subtract_spans(&base, &remove).is_empty());
    }

    #[test]
    fn subtract_partial_left() {
        let base = vec![span(5, 15)];
        let remove = vec![span(1, 10)];
        assert_eq!(subtract_spans(&base, &remove), vec![span(10, 15)]);
    }

    #[test]
    fn subtract_partial_right() {
        let base = vec![span(5, 15)];
        let remove = vec![span(10, 20)];
        assert_eq!(subtract_spans(&base, &remove), vec![span(5, 10)]);
    }

    #[test]
    fn subtract_middle_punch() {
        let base = vec![span(1, 20)];
        let remove = vec![span(5, 10)];
        assert_eq!(subtract_spans(&base, &remove), vec![span(1, 5), span(10, 20)]);
    }

    #[test]
    fn subtract_multiple_punches() {
        let base = vec![span(1, 28)];
        let remove = vec![span(3, 5), span(10, 12), span(20, 22)];
        assert_eq!(
            subtract_spans(&base, &remove),
            vec![span(1, 3), span(5, 10), span(12, 20), span(22, 28)]
        );
    }

    // ── merge_spans ───────────────────────────────────────

    #[test]
    fn merge_spans_basic() {
        let spans = vec![span(1, 8), span(5, 12), span(20, 25)];
        assert_eq!(merge_spans(&spans), vec![span(1, 12), span(20, 25)]);
    }

    #[test]
    fn merge_spans_adjacent() {
        let spans = vec![span(1, 5), span(5, 10)];
        assert_eq!(merge_spans(&spans), vec![span(1, 10)]);
    }

    // ── free_ranges ───────────────────────────────────────

    #[test]
    fn free_ranges_empty_room() {
        assert_eq!(free_ranges(d(1), d(28), &[]), vec![span(1, 28)]);
    }

    #[test]
    fn free_ranges_splits_around_stays() {
        let booked = vec![span(5, 8), span(15, 20)];
        assert_eq!(
            free_ranges(d(1), d(28), &booked),
            vec![span(1, 5), span(8, 15), span(20, 28)]
        );
    }

    #[test]
    fn free_ranges_clamps_to_query() {
        // Stay starting before and ending inside the query window.
        let booked = vec![span(1, 10)];
        assert_eq!(free_ranges(d(5), d(20), &booked), vec![span(10, 20)]);
    }

    #[test]
    fn free_ranges_fully_booked() {
        let booked = vec![span(1, 15), span(15, 28)];
        assert!(free_ranges(d(2), d(27), &booked).is_empty());
    }

    #[test]
    fn free_ranges_unsorted_input() {
        let booked = vec![span(15, 20), span(5, 8)];
        assert_eq!(
            free_ranges(d(1), d(28), &booked),
            vec![span(1, 5), span(8, 15), span(20, 28)]
        );
    }
}
