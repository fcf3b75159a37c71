use std::borrow::Cow;
use std::ffi::c_char;
use std::slice;

pub(crate) fn str_from_raw<'a>(ptr: *const c_char, size: usize) -> Cow<'a, str> {
    if ptr.is_null() {
        return Cow::Borrowed("");
    }
    let bytes = unsafe { slice::from_raw_parts(ptr as *const u8, size) };
    String::from_utf8_lossy(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_from_raw_handles_null() {
        assert_eq!(str_from_raw(std::ptr::null(), 0), "");
    }
}
