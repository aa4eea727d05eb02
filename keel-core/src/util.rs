/// Leading run of ASCII digits of `input` parsed as a number, `None` if there is none.
pub fn leading_number(input: &str) -> Option<u16> {
    let len = input.bytes().take_while(u8::is_ascii_digit).count();
    input[..len].parse().ok()
}

/// Longest prefix of `value` not exceeding `max` bytes that ends on a char boundary.
pub fn truncate_str(value: &str, max: usize) -> (&str, bool) {
    if value.len() <= max {
        return (value, false);
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    (&value[..end], true)
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {{
        let (head, truncated) = $crate::truncate_str(&$query, 497);
        format!("{}{}", head.trim_end(), if truncated { "..." } else { "" })
    }};
}
