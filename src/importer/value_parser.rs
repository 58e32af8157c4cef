// ==========================================
// 商品数据导入工具 - 字段值类型解析
// ==========================================
// 职责: 字符串 → 类型化值（整数/小数/停产标记）
// 使用方: FieldValidator（判定是否合法）与 transform（生成 NewProduct）
// ==========================================

use thiserror::Error;

/// 字段值解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("值为空")]
    Empty,

    #[error("不是整数: {0}")]
    NotInteger(String),

    #[error("不是数值: {0}")]
    NotNumeric(String),

    #[error("不在允许取值范围内: {0}")]
    NotInSet(String),
}

/// Result 类型别名
pub type ParseResult<T> = Result<T, ParseError>;

/// 停产标记允许的取值（区分大小写，空串等同 "no"）
pub const DISCONTINUED_VALUES: [&str; 3] = ["", "yes", "no"];

/// 解析整数
///
/// 规则: 可选正负号 + 十进制数字；多位数时不允许前导 0（"007" 非法）
pub fn parse_integer(raw: &str) -> ParseResult<i64> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }

    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !(digits.len() > 1 && digits.starts_with('0'));

    if !well_formed {
        return Err(ParseError::NotInteger(raw.to_string()));
    }

    raw.parse::<i64>()
        .map_err(|_| ParseError::NotInteger(raw.to_string()))
}

/// 解析小数
///
/// 规则: 有限的十进制数（支持 "4.50" / ".5" / "1e3"），拒绝 inf / NaN
pub fn parse_decimal(raw: &str) -> ParseResult<f64> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }

    // f64::from_str 接受 "inf"/"nan"，先排除字母开头的写法
    let first = raw.trim_start_matches(['+', '-']).chars().next();
    if !matches!(first, Some(c) if c.is_ascii_digit() || c == '.') {
        return Err(ParseError::NotNumeric(raw.to_string()));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::NotNumeric(raw.to_string())),
    }
}

/// 解析停产标记
pub fn parse_discontinued(raw: &str) -> ParseResult<bool> {
    match raw {
        "yes" => Ok(true),
        "" | "no" => Ok(false),
        other => Err(ParseError::NotInSet(other.to_string())),
    }
}

/// 金额保留 2 位小数
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
