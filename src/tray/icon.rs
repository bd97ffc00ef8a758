use anyhow::Result;
use tray_icon::Icon;

pub const ICON_SIZE: u32 = 64;

const BACKGROUND: [u8; 4] = [40, 40, 40, 255];
const ACCENT: [u8; 4] = [220, 60, 40, 255];

/// RGBA pixels of the app icon: a dark disc with a red "Q". Shared by the
/// tray and the window.
pub fn icon_rgba() -> Vec<u8> {
    let mut data = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
    let center = ICON_SIZE as i32 / 2;

    for y in 0..ICON_SIZE as i32 {
        for x in 0..ICON_SIZE as i32 {
            let dx = x - center;
            let dy = y - center;
            let dist_sq = dx * dx + dy * dy;

            let color = if is_glyph(dx, dy, dist_sq) {
                ACCENT
            } else if dist_sq <= 30 * 30 {
                BACKGROUND
            } else {
                continue;
            };

            let idx = ((y as u32 * ICON_SIZE + x as u32) * 4) as usize;
            data[idx..idx + 4].copy_from_slice(&color);
        }
    }
    data
}

fn is_glyph(dx: i32, dy: i32, dist_sq: i32) -> bool {
    let ring = (14 * 14..=21 * 21).contains(&dist_sq);
    let tail = (8..=22).contains(&dx) && (8..=22).contains(&dy) && (dx - dy).abs() <= 3;
    ring || tail
}

pub fn create_icon() -> Result<Icon> {
    Ok(Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE)?)
}
