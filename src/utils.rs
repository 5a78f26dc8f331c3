/// Key processing utility functions / 对象键处理工具函数

/// Strip the final extension of a key / 去掉对象键最后的扩展名
/// 1. Only a dot inside the last path segment counts / 只处理最后一段中的点
/// 2. A leading dot (dot-file) is not an extension / 以点开头的文件名不算扩展名
/// "images/abc123.png" -> "images/abc123", "images/a.b/c" -> "images/a.b/c"
pub fn clean_key(key: &str) -> &str {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    match key[name_start..].rfind('.') {
        Some(0) | None => key,
        Some(dot) => &key[..name_start + dot],
    }
}

/// Directory prefix for a key: "a/b" -> "a/b/", "a/b/" unchanged / 目录前缀
pub fn dir_prefix(key: &str) -> String {
    if key.ends_with('/') {
        key.to_string()
    } else {
        format!("{}/", key)
    }
}

/// Human readable size (base 1024, 4 significant digits) / 格式化文件大小
/// 2048 -> "2.000KiB", 500 -> "500.0B", 1023 -> "1023B"
pub fn format_size(size: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if size < KIB {
        format!("{}B", to_precision(size as f64, 4))
    } else if size < MIB {
        format!("{}KiB", to_precision(size as f64 / KIB as f64, 4))
    } else {
        format!("{}MiB", to_precision(size as f64 / MIB as f64, 4))
    }
}

/// Format with `digits` significant digits, never in exponent form / 保留有效数字
fn to_precision(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return format!("{:.*}", digits - 1, 0.0);
    }

    let integer_digits = value.abs().log10().floor() as i64 + 1;
    let decimals = (digits as i64 - integer_digits).max(0) as usize;
    let formatted = format!("{:.*}", decimals, round_half_up(value, decimals));

    // Rounding can carry into a new integer digit: 9.9996 -> "10.000"
    let carried = formatted.split('.').next().map_or(0, |int| int.trim_start_matches('-').len()) as i64;
    if carried > integer_digits && decimals > 0 {
        format!("{:.*}", decimals - 1, round_half_up(value, decimals - 1))
    } else {
        formatted
    }
}

/// Round to `decimals` places, ties away from zero (10.125 -> 10.13) / 四舍五入
fn round_half_up(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Escape text for HTML content and attributes / HTML转义
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
