use egui::Color32;

pub mod menu;
pub mod replay;

pub(crate) const PALETTE_BACKGROUND: Color32 = Color32::from_rgb(20, 25, 35);
pub(crate) const PALETTE_PANEL: Color32 = Color32::from_rgb(30, 35, 45);
pub(crate) const PALETTE_STATUS_BAR: Color32 = Color32::from_rgb(40, 45, 55);
pub(crate) const PALETTE_BUTTON: Color32 = Color32::from_rgb(60, 65, 75);
pub(crate) const PALETTE_BUTTON_BORDER: Color32 = Color32::from_rgb(100, 100, 100);
pub(crate) const PALETTE_ROW: Color32 = Color32::from_rgb(50, 55, 65);
pub(crate) const PALETTE_ROW_BORDER: Color32 = Color32::from_rgb(70, 70, 70);
pub(crate) const PALETTE_ACCENT: Color32 = Color32::from_rgb(200, 30, 30);
pub(crate) const PALETTE_LAUNCH: Color32 = Color32::from_rgb(40, 180, 40);
pub(crate) const PALETTE_TEXT: Color32 = Color32::from_rgb(200, 200, 200);
pub(crate) const PALETTE_TEXT_DIM: Color32 = Color32::from_rgb(150, 150, 150);

// Fallback car colors for drivers recorded without a team color.
pub(crate) const CAR_PALETTE: [Color32; 10] = [
    Color32::from_rgb(225, 6, 0),
    Color32::from_rgb(0, 210, 190),
    Color32::from_rgb(6, 0, 239),
    Color32::from_rgb(255, 135, 0),
    Color32::from_rgb(0, 111, 98),
    Color32::from_rgb(0, 144, 255),
    Color32::from_rgb(200, 200, 200),
    Color32::from_rgb(43, 69, 98),
    Color32::from_rgb(144, 0, 32),
    Color32::from_rgb(82, 226, 82),
];

pub(crate) fn rgb_color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}
