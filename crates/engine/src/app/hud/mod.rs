//! Screen-space UI: dialog panel, talk prompt, controls hint, loading bar
//! and scene-fade overlay. Layout reflows from the viewport every frame,
//! so window resizes need no extra bookkeeping.

mod font;

pub(crate) use font::{
    blend_pixel, draw_filled_rect, draw_rect_outline, draw_text, line_advance, text_width_px,
};

use super::collision::SourceBitmap;
use super::scene::DialogContent;

pub(crate) const DIALOG_MAX_WIDTH_PX: i32 = 760;
pub(crate) const DIALOG_VIEW_MARGIN_PX: i32 = 32;
pub(crate) const DIALOG_HEIGHT_PX: i32 = 160;
pub(crate) const DIALOG_BOTTOM_GAP_PX: i32 = 16;
const DIALOG_INSET_PX: i32 = 16;
const DIALOG_AVATAR_SIZE_PX: i32 = 40;
const DIALOG_BG_COLOR: [u8; 4] = [12, 14, 22, 230];
const DIALOG_TEXT_COLOR: [u8; 4] = [236, 240, 246, 255];
const DIALOG_DIM_COLOR: [u8; 4] = [150, 160, 178, 255];
const DIALOG_CLOSE_HINT: &str = "Space to close";

pub(crate) const PROMPT_WIDTH_PX: i32 = 220;
pub(crate) const PROMPT_HEIGHT_PX: i32 = 44;
pub(crate) const PROMPT_CENTER_FROM_BOTTOM_PX: i32 = 70;
const PROMPT_BG_COLOR: [u8; 4] = [16, 18, 28, 220];
const PROMPT_BORDER_COLOR: [u8; 4] = [120, 200, 255, 255];
const PROMPT_TEXT: &str = "TALK";

pub(crate) const PROGRESS_WIDTH_PX: i32 = 360;
pub(crate) const PROGRESS_HEIGHT_PX: i32 = 16;
pub(crate) const PROGRESS_BELOW_CENTER_PX: i32 = 60;
const PROGRESS_FILL_COLOR: [u8; 4] = [120, 200, 255, 255];
const PROGRESS_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

const HINT_TOP_PX: i32 = 16;
const HINT_TEXT: &str = "Use Arrow Keys to move - Press Space to talk";

const BODY_TEXT_SCALE: i32 = 2;
const TITLE_TEXT_SCALE: i32 = 3;
const SMALL_TEXT_SCALE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RectPx {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

pub(crate) fn dialog_panel_rect(viewport: (u32, u32)) -> RectPx {
    let view_w = viewport.0 as i32;
    let view_h = viewport.1 as i32;
    let w = DIALOG_MAX_WIDTH_PX.min(view_w - DIALOG_VIEW_MARGIN_PX).max(1);
    RectPx {
        x: (view_w - w) / 2,
        y: view_h - DIALOG_HEIGHT_PX - DIALOG_BOTTOM_GAP_PX,
        w,
        h: DIALOG_HEIGHT_PX,
    }
}

pub(crate) fn prompt_rect(viewport: (u32, u32)) -> RectPx {
    let view_w = viewport.0 as i32;
    let view_h = viewport.1 as i32;
    RectPx {
        x: (view_w - PROMPT_WIDTH_PX) / 2,
        y: view_h - PROMPT_CENTER_FROM_BOTTOM_PX - PROMPT_HEIGHT_PX / 2,
        w: PROMPT_WIDTH_PX,
        h: PROMPT_HEIGHT_PX,
    }
}

pub(crate) fn progress_bar_rect(viewport: (u32, u32)) -> RectPx {
    let view_w = viewport.0 as i32;
    let view_h = viewport.1 as i32;
    RectPx {
        x: (view_w - PROGRESS_WIDTH_PX) / 2,
        y: view_h / 2 + PROGRESS_BELOW_CENTER_PX - PROGRESS_HEIGHT_PX / 2,
        w: PROGRESS_WIDTH_PX,
        h: PROGRESS_HEIGHT_PX,
    }
}

/// Greedy word wrap. Words longer than the line are emitted on their own
/// line rather than split.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Nearest-neighbor stretch of a bitmap into a destination rect, with an
/// extra opacity multiplier on top of the source alpha.
pub(crate) fn blit_scaled(
    frame: &mut [u8],
    frame_width: u32,
    frame_height: u32,
    bitmap: &SourceBitmap,
    dst: RectPx,
    opacity: f32,
) {
    if dst.w <= 0 || dst.h <= 0 || frame_width == 0 || frame_height == 0 {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }

    let src_w = bitmap.width() as usize;
    let rgba = bitmap.rgba();

    let draw_left = dst.x.max(0);
    let draw_top = dst.y.max(0);
    let draw_right = (dst.x + dst.w).min(frame_width as i32);
    let draw_bottom = (dst.y + dst.h).min(frame_height as i32);

    for out_y in draw_top..draw_bottom {
        let v = (out_y - dst.y) as f32 / dst.h as f32;
        let src_y = ((v * bitmap.height() as f32) as u32).min(bitmap.height() - 1) as usize;
        for out_x in draw_left..draw_right {
            let u = (out_x - dst.x) as f32 / dst.w as f32;
            let src_x = ((u * bitmap.width() as f32) as u32).min(bitmap.width() - 1) as usize;
            let offset = (src_y * src_w + src_x) * 4;
            let alpha = (rgba[offset + 3] as f32 * opacity) as u8;
            if alpha == 0 {
                continue;
            }
            blend_pixel(
                frame,
                frame_width as usize,
                out_x,
                out_y,
                [rgba[offset], rgba[offset + 1], rgba[offset + 2], alpha],
            );
        }
    }
}

pub(crate) fn draw_dialog(
    frame: &mut [u8],
    width: u32,
    height: u32,
    content: &DialogContent,
    avatar: Option<&SourceBitmap>,
) {
    let panel = dialog_panel_rect((width, height));
    draw_filled_rect(frame, width, height, panel.x, panel.y, panel.w, panel.h, DIALOG_BG_COLOR);
    draw_rect_outline(
        frame,
        width,
        height,
        panel.x,
        panel.y,
        panel.w,
        panel.h,
        content.accent_rgba,
    );

    let avatar_rect = RectPx {
        x: panel.x + DIALOG_INSET_PX,
        y: panel.y + DIALOG_INSET_PX,
        w: DIALOG_AVATAR_SIZE_PX,
        h: DIALOG_AVATAR_SIZE_PX,
    };
    match avatar {
        Some(bitmap) => blit_scaled(frame, width, height, bitmap, avatar_rect, 1.0),
        None => draw_filled_rect(
            frame,
            width,
            height,
            avatar_rect.x,
            avatar_rect.y,
            avatar_rect.w,
            avatar_rect.h,
            content.accent_rgba,
        ),
    }

    let text_left = avatar_rect.x + DIALOG_AVATAR_SIZE_PX + DIALOG_INSET_PX;
    let mut y = panel.y + DIALOG_INSET_PX;
    draw_text(
        frame,
        width,
        height,
        text_left,
        y,
        &content.name,
        TITLE_TEXT_SCALE,
        DIALOG_TEXT_COLOR,
    );
    y += line_advance(TITLE_TEXT_SCALE);
    draw_text(
        frame,
        width,
        height,
        text_left,
        y,
        &content.role,
        SMALL_TEXT_SCALE,
        DIALOG_DIM_COLOR,
    );
    y += line_advance(SMALL_TEXT_SCALE) + 4;

    let body_width = panel.w - (text_left - panel.x) - DIALOG_INSET_PX;
    let max_chars = (body_width / font::glyph_advance(BODY_TEXT_SCALE)).max(1) as usize;
    for line in wrap_text(&content.text, max_chars) {
        if y + line_advance(BODY_TEXT_SCALE) > panel.y + panel.h - DIALOG_INSET_PX {
            break;
        }
        draw_text(
            frame,
            width,
            height,
            text_left,
            y,
            &line,
            BODY_TEXT_SCALE,
            DIALOG_TEXT_COLOR,
        );
        y += line_advance(BODY_TEXT_SCALE);
    }

    let hint_x =
        panel.x + panel.w - DIALOG_INSET_PX - text_width_px(DIALOG_CLOSE_HINT, SMALL_TEXT_SCALE);
    let hint_y = panel.y + panel.h - DIALOG_INSET_PX;
    draw_text(
        frame,
        width,
        height,
        hint_x,
        hint_y,
        DIALOG_CLOSE_HINT,
        SMALL_TEXT_SCALE,
        DIALOG_DIM_COLOR,
    );
}

pub(crate) fn draw_talk_prompt(frame: &mut [u8], width: u32, height: u32) {
    let rect = prompt_rect((width, height));
    draw_filled_rect(frame, width, height, rect.x, rect.y, rect.w, rect.h, PROMPT_BG_COLOR);
    draw_rect_outline(
        frame,
        width,
        height,
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        PROMPT_BORDER_COLOR,
    );
    let text_x = rect.x + (rect.w - text_width_px(PROMPT_TEXT, BODY_TEXT_SCALE)) / 2;
    let text_y = rect.y + (rect.h - line_advance(BODY_TEXT_SCALE)) / 2 + 2;
    draw_text(
        frame,
        width,
        height,
        text_x,
        text_y,
        PROMPT_TEXT,
        BODY_TEXT_SCALE,
        DIALOG_TEXT_COLOR,
    );
}

pub(crate) fn draw_controls_hint(frame: &mut [u8], width: u32, height: u32, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let text_x = (width as i32 - text_width_px(HINT_TEXT, BODY_TEXT_SCALE)) / 2;
    let color = [
        DIALOG_TEXT_COLOR[0],
        DIALOG_TEXT_COLOR[1],
        DIALOG_TEXT_COLOR[2],
        (alpha * 255.0) as u8,
    ];
    draw_text(
        frame,
        width,
        height,
        text_x,
        HINT_TOP_PX,
        HINT_TEXT,
        BODY_TEXT_SCALE,
        color,
    );
}

pub(crate) fn draw_progress_bar(
    frame: &mut [u8],
    width: u32,
    height: u32,
    progress: f32,
    title: Option<&str>,
) {
    if let Some(title) = title {
        let title_x = (width as i32 - text_width_px(title, TITLE_TEXT_SCALE * 2)) / 2;
        let title_y = height as i32 / 2 - line_advance(TITLE_TEXT_SCALE * 2);
        draw_text(
            frame,
            width,
            height,
            title_x,
            title_y,
            title,
            TITLE_TEXT_SCALE * 2,
            DIALOG_TEXT_COLOR,
        );
    }

    let rect = progress_bar_rect((width, height));
    draw_rect_outline(
        frame,
        width,
        height,
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        PROGRESS_BORDER_COLOR,
    );
    let fill_w = ((rect.w - 4) as f32 * progress.clamp(0.0, 1.0)) as i32;
    if fill_w > 0 {
        draw_filled_rect(
            frame,
            width,
            height,
            rect.x + 2,
            rect.y + 2,
            fill_w,
            rect.h - 4,
            PROGRESS_FILL_COLOR,
        );
    }
}

pub(crate) fn draw_fade(frame: &mut [u8], width: u32, height: u32, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    draw_filled_rect(
        frame,
        width,
        height,
        0,
        0,
        width as i32,
        height as i32,
        [0, 0, 0, (alpha * 255.0) as u8],
    );
}
