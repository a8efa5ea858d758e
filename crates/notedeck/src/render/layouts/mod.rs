pub mod content;
pub mod end;
pub mod image;
pub mod image_text;
pub mod list;
pub mod quote;
pub mod section;
pub mod stat;
pub mod title;

/// Horizontal margin of the canvas, in design units.
pub const MARGIN: f32 = 120.0;
/// Usable width between the margins.
pub const CONTENT_WIDTH: f32 = super::canvas::DESIGN_WIDTH - 2.0 * MARGIN;

pub const HEADING_SIZE: f32 = 64.0;
pub const BODY_SIZE: f32 = 40.0;
pub const SMALL_SIZE: f32 = 28.0;

/// Top of a block of `height` design units centered on the canvas, never
/// above `min_top`.
pub fn centered_top(height: f32, min_top: f32) -> f32 {
    ((super::canvas::DESIGN_HEIGHT - height) / 2.0).max(min_top)
}
