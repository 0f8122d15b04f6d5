//! 访问策略引擎
//!
//! 所有资源的授权判定都经过 [`AccessPolicy::authorize`]：
//! 输入调用者、资源与动作，输出 [`Decision`]。
//!
//! - 课程目录（主题 / 视频 / 任务）：读公开，写仅限教职人员
//! - 提交：列表按调用者收窄，实例操作限本人或教职人员，成绩仅教职人员可写
//! - 文件、用户账户与接口描述的规则见 [`engine`]
//!
//! 引擎是纯函数，不做 I/O，也不读取全局状态；调用者上下文由请求显式传入。

pub mod caller;
pub mod decision;
pub mod engine;

pub use caller::Caller;
pub use decision::{
    Action, Decision, DenyReason, FieldMask, FileTarget, Ownership, Resource, SubmissionField,
};
pub use engine::{AccessPolicy, SubmissionScope};
