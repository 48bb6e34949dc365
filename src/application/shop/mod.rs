pub mod member_service;
pub mod product_service;
pub mod purchase_service;

pub use member_service::{LoginRequest, MemberRequest, MemberService};
pub use product_service::{ProductRequest, ProductService};
pub use purchase_service::{PurchaseRequest, PurchaseService};
