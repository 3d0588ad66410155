//! Plain-text PPM (`P3`) reading and writing.
//!
//! ```text
//! P3
//! # comments run to the end of the line
//! <width> <height>
//! <max value>
//! r g b  r g b  ...
//! ```

use rastra_core::Image;

use crate::error::CodecError;

const MAGIC: &str = "P3";

/// Whitespace-separated tokens paired with their 1-based line number.
struct Tokens<'a> {
    tokens: Vec<(&'a str, usize)>,
    pos: usize,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut last_line = 1;
        for (i, line) in text.lines().enumerate() {
            let content = line.split('#').next().unwrap_or("");
            tokens.extend(content.split_whitespace().map(|t| (t, i + 1)));
            last_line = i + 1;
        }
        Self {
            tokens,
            pos: 0,
            last_line,
        }
    }

    fn take(&mut self, what: &str) -> Result<(&'a str, usize), CodecError> {
        let tok = self.tokens.get(self.pos).copied().ok_or_else(|| CodecError::Ppm {
            line: self.last_line,
            reason: format!("unexpected end of file, expected {what}"),
        })?;
        self.pos += 1;
        Ok(tok)
    }

    fn number(&mut self, what: &str) -> Result<(u32, usize), CodecError> {
        let (tok, line) = self.take(what)?;
        let value = tok.parse().map_err(|_| CodecError::Ppm {
            line,
            reason: format!("expected {what}, found {tok:?}"),
        })?;
        Ok((value, line))
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }
}

/// Parse a `P3` document.
pub fn decode(text: &str) -> Result<Image, CodecError> {
    let mut tokens = Tokens::new(text);

    let (magic, line) = tokens.take("magic number")?;
    if magic != MAGIC {
        return Err(CodecError::Ppm {
            line,
            reason: format!("expected {MAGIC} magic number, found {magic:?}"),
        });
    }
    let (width, _) = tokens.number("width")?;
    let (height, _) = tokens.number("height")?;
    let (max_value, _) = tokens.number("max value")?;

    let count = width as usize * height as usize;
    let mut pixels = Vec::with_capacity(count.min(tokens.remaining() / 3));
    for _ in 0..count {
        let mut px = [0u32; 3];
        for v in &mut px {
            let (value, line) = tokens.number("pixel value")?;
            if value > max_value {
                return Err(CodecError::Ppm {
                    line,
                    reason: format!("pixel value {value} exceeds max value {max_value}"),
                });
            }
            *v = value;
        }
        pixels.push(px);
    }
    if tokens.remaining() > 0 {
        tracing::warn!("ignoring {} trailing PPM tokens", tokens.remaining());
    }

    Ok(Image::from_pixels(
        height as usize,
        width as usize,
        &pixels,
        max_value,
    )?)
}

/// Render an image as a `P3` document, one pixel per line.
pub fn encode(image: &Image) -> String {
    let mut out = format!(
        "{MAGIC}\n{} {}\n{}\n",
        image.width(),
        image.height(),
        image.max_value()
    );
    out.reserve(image.width() * image.height() * 12);
    let [r, g, b] = image.channels().map(|c| c.values());
    for i in 0..r.len() {
        out.push_str(&format!("{} {} {}\n", r[i], g[i], b[i]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_comments() {
        let text = "P3\n# made by hand\n2 1 # width height\n255\n1 2 3   4 5 6\n";
        let img = decode(text).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 1);
        assert_eq!(img.pixel(0, 0), Ok([1, 2, 3]));
        assert_eq!(img.pixel(0, 1), Ok([4, 5, 6]));
    }

    #[test]
    fn test_encode_then_decode_preserves_pixels() {
        let img = Image::from_pixels(2, 2, &[[0, 1, 2], [3, 4, 5], [6, 7, 8], [9, 10, 11]], 15)
            .unwrap();
        let text = encode(&img);
        assert!(text.starts_with("P3\n2 2\n15\n0 1 2\n"));
        assert_eq!(decode(&text).unwrap(), img);
    }

    #[test]
    fn test_encode_layout() {
        let img = Image::from_pixels(1, 2, &[[1, 2, 3], [40, 50, 60]], 99).unwrap();
        assert_eq!(encode(&img), "P3\n2 1\n99\n1 2 3\n40 50 60\n");
    }

    #[test]
    fn test_bad_magic_reports_line() {
        let err = decode("\n\nP6\n1 1\n255\n0 0 0\n").unwrap_err();
        assert!(matches!(err, CodecError::Ppm { line: 3, .. }), "{err}");
    }

    #[test]
    fn test_truncated_data() {
        let err = decode("P3\n2 1\n255\n1 2 3\n4 5\n").unwrap_err();
        assert!(matches!(err, CodecError::Ppm { line: 5, .. }), "{err}");
    }

    #[test]
    fn test_value_above_max() {
        let err = decode("P3\n1 1\n100\n1 200 3\n").unwrap_err();
        assert!(matches!(err, CodecError::Ppm { line: 4, .. }), "{err}");
    }

    #[test]
    fn test_non_numeric_token() {
        let err = decode("P3\n1 x\n255\n").unwrap_err();
        assert!(matches!(err, CodecError::Ppm { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_zero_sized_image() {
        let img = decode("P3 0 0 255").unwrap();
        assert_eq!(img.width(), 0);
        assert_eq!(img.height(), 0);
    }
}
