//! Reusable clickable UI components.
//!
//! Each component keeps what it draws and where it can be clicked together,
//! so click targets always line up with the rendered text.
//!
//! - [`ClickableList`]: vertical list with per-row click targets.
//! - [`grid_cells`]: cell rectangles for a fixed-column grid (the card board).
//! - [`fit_columns`]: widen a grid so every cell gets a row on short screens.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

// ── ClickableList ──────────────────────────────────────────────

/// A builder that pairs rendered [`Line`]s with click actions.
///
/// Annotate lines as clickable while adding them, then call
/// [`register_targets`](ClickableList::register_targets) once with the area
/// the lines are drawn into.
///
/// # Example
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Battle Card Matcher"));
/// cl.push_clickable(Line::from("[N] New Game"), NEW_GAME);
/// cl.register_targets(area, &mut cs, 1, 1, 0, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a clickable line. The action follows the line if rows are
    /// inserted before it later.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    /// Insert blank rows above everything pushed so far, so the content
    /// sits vertically centred in `height` rows.
    pub fn center_vertically(&mut self, height: u16) {
        let pad = height.saturating_sub(self.len() as u16) / 2;
        if pad == 0 {
            return;
        }
        let mut lines: Vec<Line<'a>> = (0..pad).map(|_| Line::from("")).collect();
        lines.append(&mut self.lines);
        self.lines = lines;
        for (idx, _) in &mut self.actions {
            *idx += pad;
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Consume the builder, returning the lines for rendering.
    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines.
    ///
    /// * `area` - the widget area (including borders).
    /// * `top_offset` / `bottom_offset` - rows taken by borders above/below content.
    /// * `scroll` - vertical scroll offset in visual rows.
    /// * `inner_width` - content width when the paragraph wraps; `0` means
    ///   each line occupies exactly one row.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        // Visual row where each logical line starts, and how many rows it spans.
        let w = inner_width as usize;
        let mut spans: Vec<(u16, u16)> = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            let lw = line.width();
            let h = if w == 0 || lw <= w { 1 } else { lw.div_ceil(w) as u16 };
            spans.push((cumulative, h));
            cumulative += h;
        }

        for &(line_idx, action_id) in &self.actions {
            let Some(&(vstart, vheight)) = spans.get(line_idx as usize) else {
                continue;
            };
            for vr in vstart..vstart + vheight {
                if vr < scroll {
                    continue;
                }
                let screen_row = content_y + (vr - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }
}

// ── Grid ───────────────────────────────────────────────────────

/// Lay `count` cells out left-to-right, top-to-bottom in `cols` columns
/// inside `area`. Cells share the width evenly; their height is the
/// available height per row, capped at `max_height`. Cells that would fall
/// below the area are dropped.
pub fn grid_cells(area: Rect, count: usize, cols: u16, max_height: u16) -> Vec<Rect> {
    if count == 0 || cols == 0 || area.width < cols || area.height == 0 {
        return Vec::new();
    }
    let rows = (count as u16).div_ceil(cols);
    let cell_w = area.width / cols;
    let cell_h = (area.height / rows).clamp(1, max_height.max(1));
    // Centre the block of cells inside the area.
    let x0 = area.x + (area.width - cell_w * cols) / 2;
    let y0 = area.y + area.height.saturating_sub(cell_h * rows) / 2;

    (0..count as u16)
        .map(|i| Rect::new(x0 + (i % cols) * cell_w, y0 + (i / cols) * cell_h, cell_w, cell_h))
        .filter(|r| r.y + r.height <= area.y + area.height)
        .collect()
}

/// Widen a grid from `cols` columns until `count` cells fit in `area` at
/// one row each. Returns `cols` unchanged when the rows already fit, and
/// stops widening once a column would be narrower than `min_width`.
pub fn fit_columns(area: Rect, count: usize, cols: u16, min_width: u16) -> u16 {
    let mut cols = cols.max(1);
    let max_cols = (count as u16).min(area.width / min_width.max(1)).max(cols);
    while cols < max_cols && (count as u16).div_ceil(cols) > area.height {
        cols += 1;
    }
    cols
}
