//! 流程相关的常量定义
//!
//! 统一管理 ID 前缀、字段名和阈值等魔法值

/// ID 前缀
pub mod prefixes {
    pub const CONDITION_BLOCK: &str = "if";
    pub const ACTION_BLOCK: &str = "then";
    pub const PREDICATE: &str = "condition";
    pub const FLOW: &str = "flow";
}

/// 条件字段
pub mod predicates {
    /// 抽取字段选项的前缀，例如 `extracted:OrderNumber`
    pub const EXTRACTED_PREFIX: &str = "extracted:";
    pub const SUBJECT_CONTAINS: &str = "subject-contains";
    pub const FROM_EMAIL: &str = "from-email";
    pub const BODY_CONTAINS: &str = "body-contains";
}

/// 情感分析阈值
pub mod sentiment {
    pub const DEFAULT_THRESHOLD: f64 = 0.5;
    pub const STEP: f64 = 0.05;
    /// 低于此值显示为偏负面
    pub const NEGATIVE_BELOW: f64 = 0.4;
    /// 高于此值显示为偏正面
    pub const POSITIVE_ABOVE: f64 = 0.6;
}

/// 测试运行步骤
pub mod test_run {
    pub const CHECK_CONDITIONS: &str = "Checking conditions";
    pub const APPLY_EXTRACTION: &str = "Applying AI extraction";
    pub const GENERATE_RESPONSE: &str = "Generating response";

    pub const STEPS: [&str; 3] = [CHECK_CONDITIONS, APPLY_EXTRACTION, GENERATE_RESPONSE];
}
