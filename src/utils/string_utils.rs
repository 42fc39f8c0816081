//! String handling helpers for TIFF ASCII data

/// Remove trailing null bytes from a buffer in place
///
/// TIFF ASCII values are null-terminated and may carry padding nulls.
pub fn trim_trailing_nulls(buffer: &mut Vec<u8>) {
    while let Some(&0) = buffer.last() {
        buffer.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_nulls() {
        let mut buffer = vec![b'-', b'9', b'9', b'9', b'9', 0, 0];
        trim_trailing_nulls(&mut buffer);
        assert_eq!(buffer, b"-9999");

        let mut empty: Vec<u8> = vec![0, 0];
        trim_trailing_nulls(&mut empty);
        assert!(empty.is_empty());
    }
}
