use regex::Regex;
use std::sync::LazyLock;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

const INDONESIA_PREFIX: &str = "62";

/// 轉成 Fonnte 接受的印尼號碼格式 (62xxx)
pub fn normalize_phone(raw: &str) -> String {
    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.is_empty() {
        return String::new();
    }

    if let Some(rest) = digits.strip_prefix('0').filter(|rest| rest.starts_with('8')) {
        // 08xxx -> 628xxx
        format!("{}{}", INDONESIA_PREFIX, rest)
    } else if digits.starts_with(INDONESIA_PREFIX) {
        digits.to_string()
    } else {
        // 8xxx 以及其他號碼都補上 62
        format!("{}{}", INDONESIA_PREFIX, digits)
    }
}
