pub mod portfolio;
pub mod position;
pub mod position_event;
pub mod user;

// 重新匯出常用模型類型
pub use portfolio::*;
pub use position::*;
pub use position_event::*;
pub use user::*;
