//! Strips markup and prompt-control tokens from extracted text.
//!
//! The denylist is a blunt literal substring filter. It is not a security
//! boundary: it has no word-boundary or encoding-variant handling.
//!
//! HTML entities are left as written (`R&amp;D` stays `R&amp;D`). Decoding
//! them after tag removal could reintroduce markup such as `&lt;b&gt;`.

use crate::errors::InputError;
use crate::ingestion::CleanText;

/// Literal tokens that look like conversation-role or instruction markers.
pub const DENYLIST: [&str; 6] = ["###", ">>>", "User:", "Assistant:", "System:", "```"];

/// Strips tags, removes denylisted tokens, collapses whitespace.
///
/// A tag is anything shaped like `</?[A-Za-z!?][^>]*>`: opening, closing,
/// comment or processing tags. This applies to plain text too, so
/// `<name@example.com>` is removed. Removing one tag or token can splice a
/// new one together (`#User:##` becomes `###`); those are removed as well,
/// so `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> Result<CleanText, InputError> {
    CleanText::new(collapse_whitespace(&strip_markup(raw)))
}

/// One left-to-right pass over a stack of kept characters.
///
/// A pushed char can only complete a tag (when it is `>`) or a token at the
/// top of the stack, and either is popped at once. Popping returns the stack
/// to an earlier state that held neither, so the output contains no tag and
/// no token and the pass stays linear in the input.
fn strip_markup(raw: &str) -> String {
    let tokens: Vec<Vec<char>> = DENYLIST.iter().map(|t| t.chars().collect()).collect();

    let mut kept: Vec<char> = Vec::with_capacity(raw.len());
    // open[i]: leftmost tag opener after the last `>` in kept[..=i]
    let mut open: Vec<Option<usize>> = Vec::with_capacity(raw.len());

    for c in raw.chars() {
        let prev_open = open.last().copied().flatten();
        if c == '>' {
            if let Some(start) = prev_open {
                kept.truncate(start);
                open.truncate(start);
                continue;
            }
        }

        kept.push(c);
        open.push(if c == '>' {
            None
        } else {
            prev_open.or_else(|| tag_opener(&kept))
        });

        if let Some(token) = tokens.iter().find(|t| kept.ends_with(t.as_slice())) {
            let len = kept.len() - token.len();
            kept.truncate(len);
            open.truncate(len);
        }
    }

    kept.into_iter().collect()
}

/// Index of a `<x` or `</x` opener ending at the top of the stack,
/// with `x` in `[A-Za-z!?]`.
fn tag_opener(kept: &[char]) -> Option<usize> {
    let (&last, rest) = kept.split_last()?;
    if !(last.is_ascii_alphabetic() || last == '!' || last == '?') {
        return None;
    }
    match rest {
        [.., '<', '/'] => Some(rest.len() - 2),
        [.., '<'] => Some(rest.len() - 1),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
