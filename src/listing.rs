use std::fmt::Write as _;

use crate::engine::LineResult;
use crate::image::OutputImage;

/// `location  word  source`, one row per line. The word is read back from
/// the image so patched forward references show their final value.
pub fn render(lines: &[LineResult], image: &OutputImage) -> String {
    let mut buf = String::new();
    for l in lines {
        if l.is_placeholder() {
            let _ = writeln!(buf, "{:04}  ----  {}", l.location, l.source);
        } else {
            let w = image.words().get(l.location).copied().unwrap_or(l.word);
            let _ = writeln!(buf, "{:04}  {w:04X}  {}", l.location, l.source);
        }
    }
    buf
}
