// ==========================================
// 商品数据导入工具 - 类型转换
// ==========================================
// 职责: 校验通过的 ProductCandidate → NewProduct
// 规则:
// - discontinued: "yes" → true，"" / "no" → false
// - discontinued_at: 停产时取 now，否则为空
// - cost: 保留 2 位小数
// ==========================================

use crate::domain::product::{NewProduct, ProductCandidate};
use crate::importer::value_parser::{
    parse_decimal, parse_discontinued, parse_integer, round_to_cents, ParseResult,
};
use chrono::{DateTime, Utc};

/// 转换为待落库商品
pub fn to_new_product(candidate: &ProductCandidate, now: DateTime<Utc>) -> ParseResult<NewProduct> {
    let discontinued = parse_discontinued(&candidate.discontinued)?;

    Ok(NewProduct {
        code: candidate.code.clone(),
        name: candidate.name.clone(),
        description: candidate.description.clone(),
        stock: parse_integer(&candidate.stock)?,
        cost: round_to_cents(parse_decimal(&candidate.cost)?),
        discontinued,
        discontinued_at: discontinued.then_some(now),
    })
}
