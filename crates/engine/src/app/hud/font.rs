//! Tiny 3x5 bitmap font used for every piece of on-screen text. Glyphs
//! cover printable ASCII; anything else renders as a blank cell.

pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;

pub(crate) const fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) const fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * glyph_advance(scale)
}

/// Source-over blend of `color` onto the frame pixel, honoring the color's
/// alpha. Out-of-range coordinates are ignored.
pub(crate) fn blend_pixel(frame: &mut [u8], width: usize, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x as usize >= width {
        return;
    }
    let x = x as usize;
    let y = y as usize;
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    let alpha = color[3];
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        frame[byte_offset..end].copy_from_slice(&color);
        return;
    }

    let a = alpha as u16;
    let inv = 255 - a;
    for channel in 0..3 {
        let src = color[channel] as u16;
        let dst = frame[byte_offset + channel] as u16;
        frame[byte_offset + channel] = ((src * a + dst * inv) / 255) as u8;
    }
    frame[byte_offset + 3] = 255;
}

pub(crate) fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + rect_width).min(width as i32);
    let end_y = (y + rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            blend_pixel(frame, width_usize, px, py, color);
        }
    }
}

pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - 1,
        rect_width,
        1,
        color,
    );
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_width - 1,
        y,
        1,
        rect_height,
        color,
    );
}

pub(crate) fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: [u8; 4],
) {
    if width == 0 || height == 0 || scale < 1 {
        return;
    }
    for ch in text.chars() {
        draw_glyph(frame, width, height, x, y, glyph_rows(ch), scale, color);
        x += glyph_advance(scale);
    }
}

fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rows: [u8; GLYPH_HEIGHT as usize],
    scale: i32,
    color: [u8; 4],
) {
    let width_i32 = width as i32;
    let height_i32 = height as i32;
    let width_usize = width as usize;

    for (row_index, row_bits) in rows.iter().enumerate() {
        let glyph_y = y + row_index as i32 * scale;
        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }
            let glyph_x = x + col * scale;
            for sy in 0..scale {
                let pixel_y = glyph_y + sy;
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..scale {
                    let pixel_x = glyph_x + sx;
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    blend_pixel(frame, width_usize, pixel_x, pixel_y, color);
                }
            }
        }
    }
}

const BLANK: [u8; 5] = [0, 0, 0, 0, 0];

fn glyph_rows(ch: char) -> [u8; 5] {
    match ch {
        ' ' => BLANK,
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '$' => [0b111, 0b110, 0b111, 0b011, 0b111],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '@' => [0b111, 0b101, 0b111, 0b100, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        '\\' => [0b100, 0b100, 0b010, 0b001, 0b001],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '^' => [0b010, 0b101, 0b000, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '`' => [0b100, 0b010, 0b000, 0b000, 0b000],
        'a' => [0b000, 0b111, 0b001, 0b111, 0b111],
        'b' => [0b100, 0b100, 0b110, 0b101, 0b110],
        'c' => [0b000, 0b111, 0b100, 0b100, 0b111],
        'd' => [0b001, 0b001, 0b111, 0b101, 0b111],
        'e' => [0b000, 0b111, 0b110, 0b100, 0b111],
        'f' => [0b011, 0b100, 0b110, 0b100, 0b100],
        'g' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'h' => [0b100, 0b100, 0b110, 0b101, 0b101],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'j' => [0b001, 0b000, 0b001, 0b101, 0b010],
        'k' => [0b100, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b000, 0b110, 0b111, 0b101, 0b101],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        'o' => [0b000, 0b111, 0b101, 0b101, 0b111],
        'p' => [0b000, 0b110, 0b101, 0b110, 0b100],
        'q' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'r' => [0b000, 0b110, 0b101, 0b100, 0b100],
        's' => [0b000, 0b111, 0b110, 0b001, 0b111],
        't' => [0b010, 0b111, 0b010, 0b010, 0b011],
        'u' => [0b000, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b000, 0b101, 0b101, 0b101, 0b010],
        'w' => [0b000, 0b101, 0b101, 0b111, 0b010],
        'x' => [0b000, 0b101, 0b010, 0b010, 0b101],
        'y' => [0b000, 0b101, 0b101, 0b111, 0b001],
        'z' => [0b000, 0b111, 0b001, 0b010, 0b111],
        '{' => [0b011, 0b010, 0b110, 0b010, 0b011],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '}' => [0b110, 0b010, 0b011, 0b010, 0b110],
        '~' => [0b000, 0b011, 0b110, 0b000, 0b000],
        _ => BLANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn printable_ascii_has_non_blank_glyphs() {
        for code in 33u8..=126u8 {
            let ch = char::from(code);
            assert_ne!(glyph_rows(ch), BLANK, "blank glyph for '{ch}'");
        }
    }

    #[test]
    fn unknown_character_draws_like_space() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        draw_text(&mut frame, 16, 16, 0, 0, "\u{1f3ac}", 1, WHITE);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn clipped_text_draw_with_negative_origin_is_safe() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text(&mut frame, 8, 8, -2, -2, "TALK", 2, WHITE);
        assert_eq!(frame.len(), 8 * 8 * 4);
    }

    #[test]
    fn text_beyond_bounds_writes_nothing() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_text(&mut frame, 8, 8, 64, 64, "TALK", 1, WHITE);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn tiny_viewports_never_panic() {
        let mut frame_1x1 = vec![0u8; 4];
        draw_text(&mut frame_1x1, 1, 1, -10, -10, "Film Set", 3, WHITE);

        let mut frame_0x8: Vec<u8> = vec![];
        draw_text(&mut frame_0x8, 0, 8, 0, 0, "Loading", 1, WHITE);
    }

    #[test]
    fn text_width_scales_with_glyph_advance() {
        assert_eq!(glyph_advance(1), 4);
        assert_eq!(glyph_advance(3), 12);
        assert_eq!(text_width_px("TALK", 2), 4 * 8);
        assert_eq!(line_advance(3), 21);
    }

    #[test]
    fn opaque_blend_overwrites_and_zero_alpha_is_noop() {
        let mut frame = vec![10u8; 4];
        blend_pixel(&mut frame, 1, 0, 0, [200, 100, 50, 255]);
        assert_eq!(&frame[0..3], &[200, 100, 50]);

        let mut frame = vec![10u8; 4];
        blend_pixel(&mut frame, 1, 0, 0, [200, 100, 50, 0]);
        assert_eq!(&frame[0..3], &[10, 10, 10]);
    }

    #[test]
    fn partial_alpha_blends_toward_source() {
        let mut frame = vec![0u8; 4];
        blend_pixel(&mut frame, 1, 0, 0, [255, 255, 255, 128]);
        // 255 * 128 / 255 = 128
        assert_eq!(frame[0], 128);
        assert_eq!(frame[3], 255);
    }

    #[test]
    fn out_of_bounds_blend_is_ignored() {
        let mut frame = vec![0u8; 4 * 4];
        blend_pixel(&mut frame, 2, 5, 0, [255, 255, 255, 255]);
        blend_pixel(&mut frame, 2, 0, 5, [255, 255, 255, 255]);
        blend_pixel(&mut frame, 2, -1, 0, [255, 255, 255, 255]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }
}
