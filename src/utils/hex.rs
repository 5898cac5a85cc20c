/// Renders bytes as a space separated list of `0xNN` tokens.
///
/// ```
/// use flvkit::utils::hex_string_list;
///
/// assert_eq!(hex_string_list(&[0x0a, 0xff, 0x00]), "0x0A 0xFF 0x00");
/// assert_eq!(hex_string_list(&[]), "");
/// ```
pub fn hex_string_list(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
