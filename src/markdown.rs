use std::sync::LazyLock;

use regex::Regex;

use crate::model::Block;

static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[(.*?)\]\((.*?)\)$").expect("static image pattern"));

/// Classify one line. The checks run in a fixed order and the first match
/// wins, so `# [SCREENSHOT: x]` is a heading, never a placeholder.
pub fn classify(line: &str) -> Block {
    if let Some(caps) = IMAGE_REF.captures(line) {
        return Block::ImageRef {
            alt: caps[1].to_string(),
            id: caps[2].to_string(),
        };
    }
    if let Some(text) = line.strip_prefix("# ") {
        return Block::Heading1(text.to_string());
    }
    if let Some(text) = line.strip_prefix("## ") {
        return Block::Heading2(text.to_string());
    }
    if let Some(text) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return Block::BulletItem(text.to_string());
    }
    if line.contains("[SCREENSHOT") {
        return Block::Placeholder(placeholder_caption(line));
    }
    if line.trim().is_empty() {
        return Block::Blank;
    }
    Block::Paragraph(line.to_string())
}

/// Split on `'\n'` and classify every line, keeping input order.
pub fn classify_document(text: &str) -> Vec<Block> {
    text.split('\n').map(classify).collect()
}

fn placeholder_caption(line: &str) -> String {
    let unbracketed: String = line.chars().filter(|&c| c != '[' && c != ']').collect();
    unbracketed.replacen("SCREENSHOT:", "", 1).trim().to_string()
}
