//! Nested-brace block scanner
//!
//! A minimal structural scanner for brace-delimited configuration blocks.
//! It has no awareness of string literals or comments; callers strip those
//! before handing a slice over. Unbalanced braces inside string literals are
//! an accepted limitation of this subset.

use droidbuild_core::error::{Error, Result};

/// Find the end of a brace-delimited block.
///
/// `open_index` must point just past an opening `{` that the caller has
/// already consumed, so the depth counter starts at 1. Returns the index one
/// past the `}` that balances it.
///
/// Fails with `MalformedInput` when the text ends before the block closes.
pub fn find_block_end(text: &str, open_index: usize) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut depth: usize = 1;
    let mut i = open_index;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(Error::malformed_input(format!(
        "Unbalanced braces: block opened before offset {} never closes",
        open_index
    )))
}
