pub mod formulas;
pub mod help;
pub mod landing;
pub mod toc;

use ratatui::layout::Rect;

/// Compute a centered popup area within the given area.
pub fn centered_popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    // Never larger than `len`, so the result fits back into u16.
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, width_percent);
    let height = scale(area.height, height_percent);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_popup_area(area, 50, 50), Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn wide_terminals_do_not_overflow() {
        let area = Rect::new(0, 0, 1000, 300);
        assert_eq!(centered_popup_area(area, 60, 70), Rect::new(200, 45, 600, 210));
    }
}
