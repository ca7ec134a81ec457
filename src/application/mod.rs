pub mod category_service;
pub mod item_service;
pub mod member_service;
pub mod order_service;

pub use category_service::CategoryService;
pub use item_service::ItemService;
pub use member_service::MemberService;
pub use order_service::OrderService;
