// ==========================================
// 商品数据导入工具 - 商品仓储 Trait
// ==========================================
// 职责: 定义商品数据访问接口（不包含业务逻辑）
// 红线: Repository 不含校验规则，只做数据 CRUD
// ==========================================

use crate::domain::product::{NewProduct, Product};
use crate::repository::error::RepositoryResult;

// ==========================================
// ProductRepository Trait
// ==========================================
// 用途: 导入流程的外部协作者（编码查重 + 落库）
// 实现者: ProductRepositoryImpl（使用 rusqlite）
// 约束: exists_by_code 必须能看到同一次导入中已写入的记录
pub trait ProductRepository: Send + Sync {
    /// 检查商品编码是否已存在
    fn exists_by_code(&self, code: &str) -> RepositoryResult<bool>;

    /// 保存新商品
    ///
    /// # 返回
    /// - Ok(Product): 已落库商品（created_at / updated_at 由仓储赋值）
    /// - Err: 数据库错误（编码冲突时为 UniqueConstraintViolation）
    fn save(&self, product: NewProduct) -> RepositoryResult<Product>;

    /// 按编码查询商品
    fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Product>>;

    /// 商品总数
    fn count(&self) -> RepositoryResult<usize>;
}
