//! SHA-1 message expansion, used as an external check on search results.
//!
//! The expansion is linear over GF(2), so the expanded words of all 512-bit messages form a
//! binary linear code. [`sha1_expansion_code`] builds its generator matrix and
//! [`expand_codeword`] recomputes the expansion of a codeword's leading 16 words so that a
//! zero constraint found by the search can be confirmed independently.

use crate::code_matrix::CodeMatrix;
use crate::code_word::CodeWord;
use crate::error::{Error, Result};
use gf2::{BitMatrix, BitVec};

/// Number of 32-bit words in one SHA-1 message block.
pub const BLOCK_WORDS: usize = 16;

/// Number of bits in one SHA-1 message block, the dimension of the expansion code.
pub const BLOCK_BITS: usize = BLOCK_WORDS * 32;

/// Applies `m[j] = ROTL1(m[j-3] ^ m[j-8] ^ m[j-14] ^ m[j-16])` for `16 <= j < m.len()`.
///
/// ```
/// use lowweight::expansion::sha1_message_expansion;
///
/// let mut words = [0u32; 20];
/// words[0] = 1;
/// sha1_message_expansion(&mut words);
/// assert_eq!(&words[16..], &[2, 0, 0, 4]);
/// ```
pub fn sha1_message_expansion(words: &mut [u32]) {
    for j in BLOCK_WORDS..words.len() {
        words[j] = (words[j - 3] ^ words[j - 8] ^ words[j - 14] ^ words[j - 16]).rotate_left(1);
    }
}

/// Generator matrix of the expansion code with `words` 32-bit words per codeword.
///
/// Row `i` is the expansion of the message whose only set bit is bit `i`, where bit `32 j + b`
/// is the most significant bit `b` of word `j`. Its first 512 columns form an identity block,
/// so the matrix always has full rank. Fails with [`Error::Dimension`] for fewer than 16 words.
pub fn sha1_expansion_code(words: usize) -> Result<CodeMatrix> {
    if words < BLOCK_WORDS {
        return Err(Error::Dimension {
            expected: BLOCK_WORDS,
            found: words,
        });
    }
    let rows: Vec<BitVec> = (0..BLOCK_BITS)
        .map(|bit| {
            let mut message = vec![0u32; words];
            message[bit / 32] = 1 << (31 - bit % 32);
            sha1_message_expansion(&mut message);
            words_to_bits(&message)
        })
        .collect();
    CodeMatrix::new(BitMatrix::from_rows(&rows, words * 32))
}

/// Expands the first 16 words of `codeword` to `words` words.
///
/// Fails with [`Error::Dimension`] for fewer than 16 words and with [`Error::Index`] when the
/// codeword is shorter than one message block.
pub fn expand_codeword(codeword: &CodeWord, words: usize) -> Result<Vec<u32>> {
    if words < BLOCK_WORDS {
        return Err(Error::Dimension {
            expected: BLOCK_WORDS,
            found: words,
        });
    }
    let mut message = vec![0u32; words];
    for (index, word) in message.iter_mut().take(BLOCK_WORDS).enumerate() {
        *word = codeword.word32(index)?;
    }
    sha1_message_expansion(&mut message);
    Ok(message)
}

fn words_to_bits(words: &[u32]) -> BitVec {
    words
        .iter()
        .flat_map(|&word| (0..32).rev().map(move |shift| (word >> shift) & 1 == 1))
        .collect()
}
