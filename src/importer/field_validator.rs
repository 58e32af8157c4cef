// ==========================================
// 商品数据导入工具 - 字段校验器实现
// ==========================================
// 职责: 按字段执行有序规则列表，汇总全部违规（不跨字段短路）
// 规则执行语义:
// - Required 失败 → 记录违规并停止该字段剩余规则
// - 可选字段为空 → 跳过该字段剩余规则
// - 其他规则相互独立，全部执行
// 行号由调用方附加，校验器本身不感知行号
// ==========================================

use crate::domain::product::ProductCandidate;
use crate::domain::types::{ProductField, ValidationSettings};
use crate::importer::value_parser::{parse_decimal, parse_integer, DISCONTINUED_VALUES};
use crate::repository::{ProductRepository, RepositoryResult};
use serde::Serialize;

// ==========================================
// 校验消息（对外兼容，不可随意修改）
// ==========================================
pub const MSG_CODE_REQUIRED: &str = "Product Code is required";
pub const MSG_CODE_NOT_UNIQUE: &str = "Product Code must be unique in Products Table";
pub const MSG_NAME_REQUIRED: &str = "Product Name is required";
pub const MSG_DESCRIPTION_REQUIRED: &str = "Product Description is required";
pub const MSG_STOCK_REQUIRED: &str = "Stock Level is required";
pub const MSG_STOCK_NOT_INTEGER: &str = "Stock Level must be an integer";
pub const MSG_COST_REQUIRED: &str = "Cost is required";
pub const MSG_COST_NOT_NUMERIC: &str = "Cost must be numeric";
pub const MSG_DISCONTINUED_INVALID: &str = "Discontinued can only be 'yes','no' or empty";
pub const MSG_COLUMN_COUNT_MISMATCH: &str = "Incorrect number of columns";

/// 库存/成本交叉规则消息（阈值随配置变化）
pub fn stock_cost_pair_message(settings: &ValidationSettings) -> String {
    format!(
        "Stock Level must be greater than {} to import with a cost lower than £{}",
        settings.min_stock, settings.min_cost
    )
}

/// 成本上限消息
pub fn too_expensive_message(settings: &ValidationSettings) -> String {
    format!("Cost must be less than £{}", settings.max_cost)
}

// ==========================================
// Violation - 单条规则违规
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    Required,             // 必填
    NotUnique,            // 编码重复（库内或本次导入前序行）
    NotInteger,           // 非整数
    InvalidStockCostPair, // 低价且低库存
    NotNumeric,           // 非数值
    TooExpensive,         // 超过成本上限
    InvalidEnum,          // 不在允许取值内
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: ProductField,
    pub kind: ViolationKind,
    pub message: String,
}

// ==========================================
// FieldRule - 字段规则接口
// ==========================================
/// 单条规则的执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCheck {
    Pass,
    SkipRemaining,
    Fail(ViolationKind, String),
    FailAndStop(ViolationKind, String),
}

/// 规则执行上下文
pub struct RuleContext<'a> {
    pub value: &'a str,
    pub candidate: &'a ProductCandidate,
    pub repository: &'a dyn ProductRepository,
}

pub trait FieldRule: Send + Sync {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck>;
}

// ===== 必填 =====
struct Required {
    message: String,
}

impl Required {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl FieldRule for Required {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        if ctx.value.is_empty() {
            return Ok(RuleCheck::FailAndStop(
                ViolationKind::Required,
                self.message.clone(),
            ));
        }
        Ok(RuleCheck::Pass)
    }
}

// ===== 可选（空值跳过剩余规则）=====
struct Optional;

impl FieldRule for Optional {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        if ctx.value.is_empty() {
            return Ok(RuleCheck::SkipRemaining);
        }
        Ok(RuleCheck::Pass)
    }
}

// ===== 编码唯一（委托仓储查重，仓储可见本次导入已写入的记录）=====
struct UniqueCode;

impl FieldRule for UniqueCode {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        if ctx.repository.exists_by_code(ctx.value)? {
            return Ok(RuleCheck::Fail(
                ViolationKind::NotUnique,
                MSG_CODE_NOT_UNIQUE.to_string(),
            ));
        }
        Ok(RuleCheck::Pass)
    }
}

// ===== 整数 =====
struct Integer;

impl FieldRule for Integer {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        match parse_integer(ctx.value) {
            Ok(_) => Ok(RuleCheck::Pass),
            Err(_) => Ok(RuleCheck::Fail(
                ViolationKind::NotInteger,
                MSG_STOCK_NOT_INTEGER.to_string(),
            )),
        }
    }
}

// ===== 数值 =====
struct Numeric;

impl FieldRule for Numeric {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        match parse_decimal(ctx.value) {
            Ok(_) => Ok(RuleCheck::Pass),
            Err(_) => Ok(RuleCheck::Fail(
                ViolationKind::NotNumeric,
                MSG_COST_NOT_NUMERIC.to_string(),
            )),
        }
    }
}

// ===== 数值上限（非数值时不判定）=====
struct MaxValue {
    max: f64,
    message: String,
}

impl FieldRule for MaxValue {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        match parse_decimal(ctx.value) {
            Ok(value) if value > self.max => Ok(RuleCheck::Fail(
                ViolationKind::TooExpensive,
                self.message.clone(),
            )),
            _ => Ok(RuleCheck::Pass),
        }
    }
}

// ===== 库存/成本交叉规则 =====
// cost > min_cost 或 stock > min_stock 任一成立即通过（严格大于）
// 任一侧非数值时视为未超过阈值
struct StockCostPair {
    min_cost: f64,
    min_stock: f64,
    message: String,
}

impl FieldRule for StockCostPair {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        let cost_ok = matches!(parse_decimal(&ctx.candidate.cost), Ok(cost) if cost > self.min_cost);
        let stock_ok = matches!(parse_decimal(ctx.value), Ok(stock) if stock > self.min_stock);

        if cost_ok || stock_ok {
            return Ok(RuleCheck::Pass);
        }
        Ok(RuleCheck::Fail(
            ViolationKind::InvalidStockCostPair,
            self.message.clone(),
        ))
    }
}

// ===== 枚举取值 =====
struct OneOf {
    allowed: &'static [&'static str],
    message: String,
}

impl FieldRule for OneOf {
    fn check(&self, ctx: &RuleContext<'_>) -> RepositoryResult<RuleCheck> {
        if self.allowed.contains(&ctx.value) {
            return Ok(RuleCheck::Pass);
        }
        Ok(RuleCheck::Fail(
            ViolationKind::InvalidEnum,
            self.message.clone(),
        ))
    }
}

// ==========================================
// FieldValidator - 组合校验器
// ==========================================
pub struct FieldValidator {
    rules: Vec<(ProductField, Vec<Box<dyn FieldRule>>)>,
}

impl FieldValidator {
    /// 按阈值配置构建商品 Feed 的规则集
    pub fn new(settings: &ValidationSettings) -> Self {
        let code_required = if settings.legacy_code_required_message {
            MSG_NAME_REQUIRED
        } else {
            MSG_CODE_REQUIRED
        };

        let mut validator = Self { rules: Vec::new() };

        // 商品编码
        validator.add_rule(ProductField::Code, Required::new(code_required));
        validator.add_rule(ProductField::Code, UniqueCode);

        // 名称 / 描述
        validator.add_rule(ProductField::Name, Required::new(MSG_NAME_REQUIRED));
        validator.add_rule(
            ProductField::Description,
            Required::new(MSG_DESCRIPTION_REQUIRED),
        );

        // 库存（交叉规则挂在库存字段上，读取同一记录的成本）
        validator.add_rule(ProductField::Stock, Required::new(MSG_STOCK_REQUIRED));
        validator.add_rule(ProductField::Stock, Integer);
        validator.add_rule(
            ProductField::Stock,
            StockCostPair {
                min_cost: settings.min_cost,
                min_stock: settings.min_stock as f64,
                message: stock_cost_pair_message(settings),
            },
        );

        // 成本
        validator.add_rule(ProductField::Cost, Required::new(MSG_COST_REQUIRED));
        validator.add_rule(ProductField::Cost, Numeric);
        validator.add_rule(
            ProductField::Cost,
            MaxValue {
                max: settings.max_cost,
                message: too_expensive_message(settings),
            },
        );

        // 停产标记
        validator.add_rule(ProductField::Discontinued, Optional);
        validator.add_rule(
            ProductField::Discontinued,
            OneOf {
                allowed: &DISCONTINUED_VALUES,
                message: MSG_DISCONTINUED_INVALID.to_string(),
            },
        );

        validator
    }

    /// 追加字段规则（同一字段按追加顺序执行）
    pub fn add_rule<F: FieldRule + 'static>(&mut self, field: ProductField, rule: F) {
        let boxed: Box<dyn FieldRule> = Box::new(rule);
        match self.rules.iter_mut().find(|(f, _)| *f == field) {
            Some((_, rules)) => rules.push(boxed),
            None => self.rules.push((field, vec![boxed])),
        }
    }

    /// 校验一条候选记录
    ///
    /// # 返回
    /// - Ok(vec![]): 校验通过
    /// - Ok(violations): 全部违规（按字段顺序、规则顺序）
    /// - Err: 查重时仓储访问失败
    pub fn validate(
        &self,
        candidate: &ProductCandidate,
        repository: &dyn ProductRepository,
    ) -> RepositoryResult<Vec<Violation>> {
        let mut violations = Vec::new();

        for (field, rules) in &self.rules {
            let ctx = RuleContext {
                value: candidate.value(*field),
                candidate,
                repository,
            };

            for rule in rules {
                match rule.check(&ctx)? {
                    RuleCheck::Pass => {}
                    RuleCheck::SkipRemaining => break,
                    RuleCheck::Fail(kind, message) => violations.push(Violation {
                        field: *field,
                        kind,
                        message,
                    }),
                    RuleCheck::FailAndStop(kind, message) => {
                        violations.push(Violation {
                            field: *field,
                            kind,
                            message,
                        });
                        break;
                    }
                }
            }
        }

        Ok(violations)
    }
}
