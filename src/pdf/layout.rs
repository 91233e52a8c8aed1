use super::style::StyleContext;

/// Points per millimetre. Layout runs in millimetres; fonts are sized in points.
pub(super) const PT_PER_MM: f32 = 72.0 / 25.4;

/// Leading between the lines of one emitted text block, as a multiple of the font size.
pub(super) const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Width of `text` in millimetres under `style`.
pub fn measure_text_width(text: &str, style: &StyleContext) -> f32 {
    style.font().text_width(text, style.size) / PT_PER_MM
}

/// Greedy word wrap to `max_width` millimetres.
/// Words wider than a whole line are broken between characters.
/// Always returns at least one (possibly empty) line.
pub fn wrap_text(text: &str, style: &StyleContext, max_width: f32) -> Vec<String> {
    let font = style.font();
    let size = style.size;
    let max_pt = max_width * PT_PER_MM;
    let space_w = font.space_width(size);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w: f32 = 0.0;

    for word in text.split_whitespace() {
        let ww = font.text_width(word, size);

        if ww > max_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_w = 0.0;
            }
            for piece in break_word(word, style, max_pt) {
                lines.push(piece);
            }
            // The last fragment keeps accepting words.
            if let Some(last) = lines.pop() {
                current_w = font.text_width(&last, size);
                current = last;
            }
            continue;
        }

        let proposed = if current.is_empty() {
            ww
        } else {
            current_w + space_w + ww
        };
        if !current.is_empty() && proposed > max_pt {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = ww;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_w = proposed;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, style: &StyleContext, max_pt: f32) -> Vec<String> {
    let font = style.font();
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_w: f32 = 0.0;
    for ch in word.chars() {
        let cw = font.char_width_1000(ch) * style.size / 1000.0;
        if !piece.is_empty() && piece_w + cw > max_pt {
            pieces.push(std::mem::take(&mut piece));
            piece_w = 0.0;
        }
        piece.push(ch);
        piece_w += cw;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
