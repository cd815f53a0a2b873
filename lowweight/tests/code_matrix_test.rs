use gf2::{BitMatrix, BitVec};
use lowweight::{CodeMatrix, CodeWord, Error, LowWeightSearch, SearchParameters, WordWidth, retained_columns};
use proptest::prelude::*;
use rand::prelude::*;
use std::io::Cursor;
use std::str::FromStr;

proptest! {
    #[test]
    fn shortened_words_lengthen_to_codewords((code, forced) in code_and_forced_columns(12, 40), seed in any::<u64>()) {
        let shortened = code.code_shortening(&forced).unwrap();
        assert_eq!(shortened.length(), code.length() - forced.len());
        assert_eq!(shortened.rank(), shortened.dimension());

        let mut rng = StdRng::seed_from_u64(seed);
        let coefficients = BitVec::random_with_rng(shortened.dimension(), &mut rng);
        let word = CodeWord::from_combination(&shortened, coefficients).unwrap();
        let lengthened = word.lengthened(&forced, code.length());
        assert!(code.contains(&lengthened));
        for &column in &forced {
            assert!(!lengthened.index(column));
        }
        assert_eq!(lengthened.select(&retained_columns(&forced, code.length())), *word.bits());
    }

    #[test]
    fn shortening_keeps_every_vanishing_codeword((code, forced) in code_and_forced_columns(12, 40)) {
        let shortened = code.code_shortening(&forced).unwrap();
        let forced_rank = code.generator().select_columns(&forced).rank();
        assert_eq!(shortened.dimension(), code.dimension() - forced_rank);
    }

    #[test]
    fn shortening_never_modifies_its_input((code, forced) in code_and_forced_columns(12, 40)) {
        let copy = code.clone();
        let _ = code.code_shortening(&forced);
        assert_eq!(code, copy);
    }

    #[test]
    fn bytes_roundtrip(code in arbitrary_code(20, 80)) {
        let mut buffer = Vec::new();
        code.write_to(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 16 + code.dimension() * code.length().div_ceil(8));
        let restored = CodeMatrix::read_from(Cursor::new(buffer)).unwrap();
        assert_eq!(restored, code);
    }

    #[test]
    fn combination_matches_right_multiply(code in arbitrary_code(20, 80), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let coefficients = BitVec::random_with_rng(code.dimension(), &mut rng);
        let word = CodeWord::from_combination(&code, coefficients.clone()).unwrap();
        assert_eq!(*word.bits(), code.generator().right_multiply(&coefficients));
        assert_eq!(word.hamming_weight(), word.bits().iter().filter(|&bit| bit).count());
        let recovered = CodeWord::from_bits(&code, word.bits().clone()).unwrap();
        assert_eq!(recovered.coefficients(), &coefficients);
    }
}

#[test]
fn identity_block_is_unchanged_by_shortening_on_zero_columns() {
    let code = CodeMatrix::new(BitMatrix::from_str("10000000|01000000|00100000|00010000").unwrap()).unwrap();
    let shortened = code.code_shortening(&[4, 5, 6, 7]).unwrap();
    assert_eq!(shortened.generator(), &BitMatrix::identity(4));
}

#[test]
fn shortening_keeps_only_words_vanishing_on_forced_column() {
    let code = CodeMatrix::new(BitMatrix::from_str("1100|0011").unwrap()).unwrap();
    let shortened = code.code_shortening(&[3]).unwrap();
    assert_eq!(shortened.generator(), &BitMatrix::from_str("110").unwrap());
    assert_eq!((shortened.rows(), shortened.columns()), (1, 3));
}

#[test]
fn shortening_rejects_more_columns_than_rows() {
    let code = CodeMatrix::new(BitMatrix::from_str("1100|0011").unwrap()).unwrap();
    assert!(matches!(code.code_shortening(&[0, 1, 2]), Err(Error::Rank(_))));
}

#[test]
fn shortening_to_the_zero_code_has_dimension_zero() {
    let code = CodeMatrix::new(BitMatrix::identity(2)).unwrap();
    let shortened = code.code_shortening(&[0, 1]).unwrap();
    assert_eq!((shortened.dimension(), shortened.length()), (0, 0));

    let code = CodeMatrix::new(BitMatrix::from_str("1100|0011").unwrap()).unwrap();
    let shortened = code.code_shortening(&[0, 2]).unwrap();
    assert_eq!((shortened.dimension(), shortened.length()), (0, 2));
    let result = LowWeightSearch::new(SearchParameters::default()).canteaut_chabaud(&shortened);
    assert!(matches!(result, Err(Error::NotFound)));
}

#[test]
fn shortening_rejects_columns_out_of_range() {
    let code = CodeMatrix::new(BitMatrix::from_str("1100|0011").unwrap()).unwrap();
    assert!(matches!(code.code_shortening(&[4]), Err(Error::Index(_))));
}

#[test]
fn shortening_ignores_duplicate_columns() {
    let code = CodeMatrix::new(BitMatrix::from_str("1100|0011").unwrap()).unwrap();
    let shortened = code.code_shortening(&[3, 3, 3]).unwrap();
    assert_eq!(shortened.length(), 3);
}

#[test]
fn dependent_rows_are_rejected() {
    let generator = BitMatrix::from_str("110|011|101").unwrap();
    assert!(matches!(CodeMatrix::new(generator), Err(Error::Rank(_))));
}

#[test]
fn truncated_header_is_a_format_error() {
    assert!(matches!(CodeMatrix::from_bytes(&[1, 0, 0]), Err(Error::Format(_))));
}

#[test]
fn truncated_body_is_a_format_error() {
    let mut bytes = header(2, 9);
    bytes.extend_from_slice(&[0b1000_0000, 0, 0b0100_0000]);
    assert!(matches!(CodeMatrix::from_bytes(&bytes), Err(Error::Format(_))));
}

#[test]
fn trailing_bytes_are_a_format_error() {
    let mut bytes = header(1, 8);
    bytes.extend_from_slice(&[0b1000_0000, 0]);
    assert!(matches!(CodeMatrix::from_bytes(&bytes), Err(Error::Format(_))));
}

#[test]
fn padding_bits_are_a_format_error() {
    let mut bytes = header(1, 4);
    bytes.push(0b1000_0001);
    assert!(matches!(CodeMatrix::from_bytes(&bytes), Err(Error::Format(_))));
}

#[test]
fn rows_are_read_msb_first() {
    let mut bytes = header(2, 10);
    bytes.extend_from_slice(&[0b1010_0000, 0b0100_0000, 0b0000_0000, 0b1000_0000]);
    let code = CodeMatrix::from_bytes(&bytes).unwrap();
    assert_eq!(code.generator(), &BitMatrix::from_str("1010000001|0000000010").unwrap());
}

#[test]
fn missing_file_is_an_io_error() {
    let result = CodeMatrix::read_from_file("/nonexistent/lowweight/matrix.cm");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn weight_of_extreme_words() {
    let code = CodeMatrix::new(BitMatrix::identity(70)).unwrap();
    let zero = CodeWord::from_combination(&code, BitVec::zeros(70)).unwrap();
    assert!(zero.is_zero());
    assert_eq!(zero.hamming_weight(), 0);
    let ones = CodeWord::from_combination(&code, BitVec::ones(70)).unwrap();
    assert_eq!(ones.hamming_weight(), 70);
    assert_eq!(ones.len(), 70);
}

#[test]
fn word_chunks_follow_file_bit_order() {
    let code = CodeMatrix::new(BitMatrix::identity(70)).unwrap();
    let coefficients: BitVec = (0..70).map(|index| index == 0 || index == 33 || index == 69).collect();
    let word = CodeWord::from_combination(&code, coefficients).unwrap();
    assert_eq!(word.chunk_count(WordWidth::W32), 3);
    assert_eq!(word.words32().collect::<Vec<_>>(), vec![0x8000_0000, 0x4000_0000, 0x0400_0000]);
    assert_eq!(word.word64(0).unwrap(), 0x8000_0000_4000_0000);
    assert_eq!(word.word64(1).unwrap(), 0x0400_0000_0000_0000);
    assert!(matches!(word.word_at(2, WordWidth::W64), Err(Error::Index(_))));
    assert_eq!(word.hex_dump(), "     0: 8000000040000000\n    64: 0400000000000000\n");
}

fn header(row_count: u64, column_count: u64) -> Vec<u8> {
    let mut bytes = row_count.to_le_bytes().to_vec();
    bytes.extend_from_slice(&column_count.to_le_bytes());
    bytes
}

prop_compose! {
    fn arbitrary_code(max_dimension: usize, max_length: usize)
        (length in 1..max_length, seed in any::<u64>())
        (dimension in 0..=length.min(max_dimension), length in Just(length), seed in Just(seed)) -> CodeMatrix {
        random_code(dimension, length, seed)
    }
}

prop_compose! {
    fn code_and_forced_columns(max_dimension: usize, max_length: usize)
        (code in arbitrary_code(max_dimension, max_length), seed in any::<u64>())
        (forced_count in 0..=code.dimension(), code in Just(code), seed in Just(seed)) -> (CodeMatrix, Vec<usize>) {
        let mut columns: Vec<usize> = (0..code.length()).collect();
        columns.shuffle(&mut StdRng::seed_from_u64(seed));
        columns.truncate(forced_count);
        columns.sort_unstable();
        (code, columns)
    }
}

fn random_code(dimension: usize, length: usize, seed: u64) -> CodeMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = BitMatrix::random_with_rng(dimension, length, &mut rng);
    let rank = matrix.echelonize().len();
    let mut permutation: Vec<usize> = (0..length).collect();
    permutation.shuffle(&mut rng);
    let rows: Vec<usize> = (0..rank).collect();
    CodeMatrix::new(matrix.select_rows(&rows).permuted_columns(&permutation)).unwrap()
}
