//! 原始类型名
//!
//! 类型检查器认识的内建类型，类型声明节点以字符串形式引用它们。

pub const NUMBER: &str = "Number";
pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const FUNCTION: &str = "Function";

/// 缺少类型注解的参数在限定函数名中的占位
pub const UNKNOWN: &str = "Unknown";
