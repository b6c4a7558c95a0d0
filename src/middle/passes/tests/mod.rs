//! 优化阶段测试套件

mod scope;
