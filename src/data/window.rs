use crate::error::{ExploreError, Result};

/// Default number of entries shown at once.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Parse a user-entered window size: a positive integer, surrounding
/// whitespace allowed.
pub fn parse_window_size(input: &str) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ExploreError::InvalidWindowSize(input.to_string())),
    }
}

/// Largest valid offset for `total` entries shown `size` at a time.
fn max_offset(total: usize, size: usize) -> usize {
    total.saturating_sub(size)
}

// ---------------------------------------------------------------------------
// Page – one clamped slice of an ordered result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// First visible index.
    pub offset: usize,
    /// One past the last visible index.
    pub end: usize,
    pub total: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Human-readable position, e.g. `"Showing proteins 11-20 of 42"`.
    pub fn progress_label(&self, noun: &str) -> String {
        if self.total == 0 {
            format!("No {noun} to show")
        } else {
            format!("Showing {noun} {}-{} of {}", self.offset + 1, self.end, self.total)
        }
    }
}

/// The slice of `results` starting at `offset` (clamped) holding at most
/// `size` entries.
pub fn page<T>(results: &[T], offset: usize, size: usize) -> Page<'_, T> {
    let total = results.len();
    let offset = offset.min(max_offset(total, size));
    let end = (offset + size).min(total);
    Page {
        items: &results[offset..end],
        offset,
        end,
        total,
    }
}

// ---------------------------------------------------------------------------
// WindowState – offset + size, kept valid across result changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    offset: usize,
    size: usize,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            offset: 0,
            size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl WindowState {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ExploreError::InvalidWindowSize(size.to_string()));
        }
        Ok(Self { offset: 0, size })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Parse and apply a new size; on error the state is left as it was.
    pub fn set_size(&mut self, input: &str) -> Result<()> {
        self.size = parse_window_size(input)?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Bring the offset back into range after the entry count changed.
    pub fn clamp(&mut self, total: usize) {
        self.offset = self.offset.min(max_offset(total, self.size));
    }

    pub fn move_left(&mut self) {
        self.offset = self.offset.saturating_sub(self.size);
    }

    pub fn move_right(&mut self, total: usize) {
        self.offset = self
            .offset
            .saturating_add(self.size)
            .min(max_offset(total, self.size));
    }

    pub fn page<'a, T>(&self, results: &'a [T]) -> Page<'a, T> {
        page(results, self.offset, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_size() {
        assert_eq!(parse_window_size(" 12 ").unwrap(), 12);
        for bad in ["abc", "0", "-3", "", "2.5"] {
            assert_eq!(
                parse_window_size(bad).unwrap_err(),
                ExploreError::InvalidWindowSize(bad.to_string())
            );
        }
    }

    #[test]
    fn test_page_bounds_hold_for_all_inputs() {
        let data: Vec<usize> = (0..7).collect();
        for total in 0..=7 {
            for size in 1..=9 {
                for offset in 0..=12 {
                    let p = page(&data[..total], offset, size);
                    assert!(p.offset + size >= p.end);
                    assert!(p.end <= p.total);
                    assert!(p.offset <= p.end);
                    assert_eq!(p.items.len(), p.end - p.offset);
                    assert_eq!(p.total, total);
                }
            }
        }
    }

    #[test]
    fn test_paging_walkthrough() {
        let data = ["a", "b", "c", "d", "e"];
        let mut w = WindowState::new(2).unwrap();
        assert_eq!(w.page(&data).items, &["a", "b"]);

        w.move_right(data.len());
        assert_eq!(w.offset(), 2);
        assert_eq!(w.page(&data).items, &["c", "d"]);

        w.move_right(data.len());
        assert_eq!(w.offset(), 3);
        let p = w.page(&data);
        assert_eq!((p.offset, p.end), (3, 5));
        assert_eq!(p.items, &["d", "e"]);
    }

    #[test]
    fn test_paging_stabilizes_at_both_ends() {
        let mut w = WindowState::new(4).unwrap();
        for _ in 0..5 {
            w.move_right(10);
        }
        assert_eq!(w.offset(), 6);
        w.move_right(10);
        assert_eq!(w.offset(), 6);

        for _ in 0..5 {
            w.move_left();
        }
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn test_move_right_when_fewer_than_size() {
        let mut w = WindowState::new(10).unwrap();
        w.move_right(3);
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut w = WindowState::new(5).unwrap();
        w.move_right(50);
        w.move_right(50);
        assert_eq!(w.offset(), 10);
        w.clamp(7);
        assert_eq!(w.offset(), 2);
        w.clamp(0);
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn test_invalid_size_leaves_state() {
        let mut w = WindowState::new(3).unwrap();
        w.move_right(10);
        let before = w;
        assert!(w.set_size("abc").is_err());
        assert_eq!(w, before);
        assert!(WindowState::new(0).is_err());
    }

    #[test]
    fn test_move_right_with_huge_size() {
        let mut w = WindowState::new(3).unwrap();
        w.move_right(10);
        assert_eq!(w.offset(), 3);
        w.set_size(&usize::MAX.to_string()).unwrap();
        w.move_right(10);
        assert_eq!(w.offset(), 0);
        assert_eq!(w.page(&[1, 2, 3]).items, &[1, 2, 3]);
    }

    #[test]
    fn test_progress_label() {
        let data: Vec<u8> = vec![0; 42];
        assert_eq!(page(&data, 10, 10).progress_label("proteins"), "Showing proteins 11-20 of 42");
        assert_eq!(page::<u8>(&[], 0, 10).progress_label("groups"), "No groups to show");
    }
}
