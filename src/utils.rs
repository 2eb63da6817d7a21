use bytes::BytesMut;

pub(crate) trait BufferWriter {
    fn write_to_buffer(&self, buffer: &mut BytesMut);
}

/// ASCII case-insensitive `strip_prefix`.
#[inline]
pub(crate) fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}
